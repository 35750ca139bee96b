// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Local cluster client creation from provider settings

use crate::config::KubernetesConfig;
use crate::error::{ProviderError, Result};
use crate::kubernetes::kubeconfig::{apply_overrides, config_paths};
use kube::config::Kubeconfig;
use kube::{Client, Config as KConfig};
use std::path::PathBuf;
use tracing::{debug, info, instrument};

/// Create a Kubernetes client for the local cluster
#[instrument(skip(settings))]
pub async fn create_client(settings: Option<&KubernetesConfig>) -> Result<Client> {
    let Some(settings) = settings else {
        return create_inferred_client().await;
    };

    let paths = config_paths(settings)?;
    let kubeconfig = if !paths.is_empty() {
        load_kubeconfigs(&paths)?
    } else if settings.host.as_ref().is_some_and(|h| !h.is_empty()) {
        debug!("No kubeconfig paths set, building configuration from provider settings");
        Kubeconfig::default()
    } else {
        match Kubeconfig::read() {
            Ok(kubeconfig) => kubeconfig,
            Err(e) => {
                debug!("No default kubeconfig available ({}), inferring configuration", e);
                return create_inferred_client().await;
            }
        }
    };

    let (kubeconfig, options) = apply_overrides(kubeconfig, settings)?;
    info!(
        "Using kubeconfig context '{}'",
        options.context.as_deref().unwrap_or_default()
    );

    let client_config = KConfig::from_custom_kubeconfig(kubeconfig, &options)
        .await
        .map_err(|e| ProviderError::KubeconfigError(format!("Failed to create config: {}", e)))?;

    Client::try_from(client_config)
        .map_err(|e| ProviderError::KubeconfigError(format!("Failed to create client: {}", e)))
}

/// Fall back to the environment (KUBECONFIG, ~/.kube/config or in-cluster)
async fn create_inferred_client() -> Result<Client> {
    let config = KConfig::infer()
        .await
        .map_err(|e| ProviderError::KubeconfigError(format!("Failed to infer config: {}", e)))?;

    Client::try_from(config)
        .map_err(|e| ProviderError::KubeconfigError(format!("Failed to create client: {}", e)))
}

/// Read and merge kubeconfig files; entries from earlier files win
fn load_kubeconfigs(paths: &[PathBuf]) -> Result<Kubeconfig> {
    let mut merged: Option<Kubeconfig> = None;

    for path in paths {
        debug!("Reading kubeconfig {}", path.display());
        let next = Kubeconfig::read_from(path).map_err(|e| {
            ProviderError::KubeconfigError(format!(
                "Failed to read kubeconfig {}: {}",
                path.display(),
                e
            ))
        })?;

        merged = Some(match merged {
            None => next,
            Some(current) => current.merge(next).map_err(|e| {
                ProviderError::KubeconfigError(format!("Failed to merge kubeconfigs: {}", e))
            })?,
        });
    }

    merged.ok_or_else(|| ProviderError::KubeconfigError("no kubeconfig paths given".to_string()))
}
