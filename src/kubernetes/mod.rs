// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes connection handling: kubeconfig loading, overrides and client creation.

pub mod client;
pub mod kubeconfig;

pub use client::create_client;
