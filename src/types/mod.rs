// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Liqo custom resources the provider reads and writes.

pub mod namespace_offloading;

pub use namespace_offloading::{
    NamespaceMappingStrategy, NamespaceOffloading, NamespaceOffloadingSpec,
    NamespaceOffloadingStatus, PodOffloadingStrategy,
};
