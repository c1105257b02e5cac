// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

pub mod batch;
pub mod fetcher;
pub mod links;
pub mod logging;
pub mod scrape;
pub mod text;
