// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};

use crate::constants::{self, env as env_vars};

/// Exec API version kubectl no longer accepts
const UNSUPPORTED_EXEC_API_VERSION: &str = "client.authentication.k8s.io/v1alpha1";

/// Provider configuration, shared by every resource
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ProviderConfig {
    /// Liqo release used when liqoctl has to be downloaded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liqo_version: Option<String>,
    /// Use this liqoctl binary instead of looking it up
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liqoctl_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kubernetes: Option<KubernetesConfig>,
}

/// Connection settings for the local cluster
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct KubernetesConfig {
    pub host: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub insecure: Option<bool>,
    /// PEM-encoded client certificate
    pub client_certificate: Option<String>,
    /// PEM-encoded client certificate key
    pub client_key: Option<String>,
    /// PEM-encoded root certificates bundle
    pub cluster_ca_certificate: Option<String>,
    pub config_path: Option<String>,
    pub config_paths: Vec<String>,
    pub config_context: Option<String>,
    pub config_context_auth_info: Option<String>,
    pub config_context_cluster: Option<String>,
    pub token: Option<String>,
    pub proxy_url: Option<String>,
    pub exec: Option<ExecConfig>,
}

/// Credential plugin invoked by the Kubernetes client
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ExecConfig {
    pub api_version: String,
    pub command: String,
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    #[serde(default)]
    pub args: Vec<String>,
}

impl ProviderConfig {
    /// Load the configuration file (if any) and apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read provider config {}", path.display()))?;
        serde_yaml::from_str(&raw)
            .with_context(|| format!("failed to parse provider config {}", path.display()))
    }

    /// Environment variables fill in settings the file leaves unset
    pub fn apply_env(&mut self) {
        if self.liqo_version.is_none() {
            self.liqo_version = env::var(env_vars::LIQO_VERSION).ok().filter(|v| !v.is_empty());
        }
        if self.liqoctl_path.is_none() {
            self.liqoctl_path = env::var_os(env_vars::LIQOCTL_PATH)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(exec) = self.kubernetes.as_ref().and_then(|k| k.exec.as_ref()) {
            anyhow::ensure!(
                exec.api_version != UNSUPPORTED_EXEC_API_VERSION,
                "kubernetes.exec.api_version {} is not supported",
                UNSUPPORTED_EXEC_API_VERSION
            );
            anyhow::ensure!(!exec.command.is_empty(), "kubernetes.exec.command must be set");
        }
        Ok(())
    }

    pub fn liqo_version(&self) -> &str {
        self.liqo_version
            .as_deref()
            .filter(|v| !v.is_empty())
            .unwrap_or(constants::liqoctl::DEFAULT_VERSION)
    }

    /// Kubeconfig handed to liqoctl for the local cluster; `None` lets liqoctl pick its default
    pub fn local_kubeconfig(&self) -> Option<&str> {
        self.kubernetes
            .as_ref()
            .and_then(|k| k.config_path.as_deref())
            .filter(|p| !p.is_empty())
    }
}
