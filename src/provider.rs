// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Provider entry point: configuration and resource construction

use crate::config::ProviderConfig;
use crate::constants::PROVIDER_TYPE_NAME;
use crate::error::Result;
use crate::kubernetes::create_client;
use crate::liqoctl::{resolve_liqoctl, Liqoctl};
use crate::resources::{OffloadResource, PeerResource, Resource};
use tracing::info;

pub struct LiqoProvider {
    config: ProviderConfig,
}

impl LiqoProvider {
    pub fn configure(config: ProviderConfig) -> Self {
        info!(
            liqo_version = config.liqo_version(),
            "Configured {} provider", PROVIDER_TYPE_NAME
        );
        Self { config }
    }

    /// Type names of the resources this provider manages
    pub fn resource_types(&self) -> Vec<String> {
        vec![
            format!("{}{}", PROVIDER_TYPE_NAME, PeerResource::<Liqoctl>::TYPE_SUFFIX),
            format!("{}{}", PROVIDER_TYPE_NAME, OffloadResource::TYPE_SUFFIX),
        ]
    }

    pub async fn peer_resource(&self) -> Result<PeerResource<Liqoctl>> {
        let liqoctl = Liqoctl::new(resolve_liqoctl(&self.config).await?);
        info!("Using liqoctl at {}", liqoctl.path().display());
        Ok(PeerResource::new(liqoctl, &self.config))
    }

    pub async fn offload_resource(&self) -> Result<OffloadResource> {
        let client = create_client(self.config.kubernetes.as_ref()).await?;
        Ok(OffloadResource::new(client))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;

    #[test]
    fn test_resource_types() {
        let provider = LiqoProvider::configure(ProviderConfig::default());

        assert_eq!(provider.resource_types(), vec!["liqo_peer", "liqo_offload"]);
    }

    #[tokio::test]
    async fn test_peer_resource_with_missing_liqoctl_path() {
        let provider = LiqoProvider::configure(ProviderConfig {
            liqoctl_path: Some("/nonexistent/liqoctl".into()),
            ..Default::default()
        });

        let err = provider.peer_resource().await.err().unwrap();

        assert!(matches!(err, ProviderError::InvalidConfig(_)));
    }

    #[tokio::test]
    async fn test_peer_resource_with_configured_liqoctl() {
        let dir = tempfile::tempdir().unwrap();
        let binary = dir.path().join("liqoctl");
        std::fs::write(&binary, "#!/bin/sh\n").unwrap();
        let provider = LiqoProvider::configure(ProviderConfig {
            liqoctl_path: Some(binary),
            ..Default::default()
        });

        assert!(provider.peer_resource().await.is_ok());
    }
}
