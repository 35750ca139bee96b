// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
pub mod config;
pub mod constants;
pub mod diagnostics;
pub mod duration;
pub mod error;
pub mod kubernetes;
pub mod liqoctl;
pub mod peering;
pub mod provider;
pub mod resources;
pub mod types;

#[cfg(test)]
pub mod test_utils;
