// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Resource lifecycle (create, read, update, delete) and the resources the provider offers.

pub mod offload;
pub mod peer;

use crate::constants::PROVIDER_TYPE_NAME;
use crate::diagnostics::Diagnostics;
use crate::error::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub use offload::{OffloadResource, OffloadResourceModel};
pub use peer::{PeerResource, PeerResourceModel};

/// State produced by a create or update, with any warnings raised on the way
#[derive(Debug, Clone, PartialEq)]
pub struct Applied<M> {
    pub state: M,
    pub diagnostics: Diagnostics,
}

impl<M> Applied<M> {
    pub fn new(state: M) -> Self {
        Self {
            state,
            diagnostics: Diagnostics::new(),
        }
    }
}

/// A managed resource.
///
/// `Model` is the flat configuration record the user writes; the stored state
/// is the same record with computed attributes filled in.
#[async_trait]
pub trait Resource: Send + Sync {
    type Model: Serialize + DeserializeOwned + Clone + Send + Sync + 'static;

    /// Appended to the provider type name, e.g. `_peer`
    const TYPE_SUFFIX: &'static str;

    fn type_name(&self) -> String {
        format!("{}{}", PROVIDER_TYPE_NAME, Self::TYPE_SUFFIX)
    }

    async fn create(&self, plan: Self::Model) -> Result<Applied<Self::Model>>;

    /// Refresh the state; `None` means the resource no longer exists
    async fn read(&self, state: Self::Model) -> Result<Option<Self::Model>>;

    async fn update(&self, plan: Self::Model, state: Self::Model) -> Result<Applied<Self::Model>>;

    async fn delete(&self, state: Self::Model) -> Result<()>;
}
