// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Stamps `SCRAPE_AGENT_VERSION` into the binary. Release pipelines may replace the
//! patch segment through `SCRAPE_AGENT_PATCH_VERSION`.

use std::env;

const PATCH_OVERRIDE: &str = "SCRAPE_AGENT_PATCH_VERSION";

fn is_number(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

fn main() {
    println!("cargo:rerun-if-changed=Cargo.toml");
    println!("cargo:rerun-if-env-changed={PATCH_OVERRIDE}");

    let package_version = env::var("CARGO_PKG_VERSION").unwrap_or_default();
    let segments: Vec<&str> = package_version.split('.').collect();
    let [major, minor, patch] = segments[..] else {
        panic!("package version must be MAJOR.MINOR.PATCH, got {package_version:?}");
    };

    let patch = match env::var(PATCH_OVERRIDE) {
        Ok(value) if is_number(&value) => value,
        Ok(value) => panic!("{PATCH_OVERRIDE} must be a number, got {value:?}"),
        Err(_) => patch.to_string(),
    };

    println!("cargo:rustc-env=SCRAPE_AGENT_VERSION={major}.{minor}.{patch}");
}
