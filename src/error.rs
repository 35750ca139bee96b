// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Failed to load kubeconfig: {0}")]
    KubeconfigError(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid duration {input:?}: {reason}")]
    InvalidDuration { input: String, reason: String },

    #[error("liqoctl {invocation} command failed: {message}\nOutput: {output}")]
    CommandFailed {
        invocation: String,
        message: String,
        output: String,
    },

    #[error("Failed to execute liqoctl: {0}")]
    CommandSpawn(#[from] std::io::Error),

    #[error("failed to parse {cluster} cluster info YAML: {message}")]
    StatusParse { cluster: String, message: String },

    #[error("remote cluster ID is empty")]
    EmptyClusterId,

    #[error("peering failed: {0}")]
    PeeringFailed(String),

    #[error("Unable to download liqoctl: {0}")]
    DownloadError(String),

    #[error("Update is not supported/permitted yet for {0}.")]
    UpdateNotSupported(&'static str),

    #[error("{0} cannot be changed in place, the resource must be replaced")]
    RequiresReplacement(&'static str),
}

impl ProviderError {
    /// Whether a failed status check may succeed if retried later.
    pub fn is_transient(&self) -> bool {
        matches!(self, ProviderError::EmptyClusterId)
    }

    /// Short title used when the error is shown as a diagnostic.
    pub fn summary(&self) -> &'static str {
        match self {
            ProviderError::KubeError(_) => "Kubernetes API Error",
            ProviderError::KubeconfigError(_) => "Unable to Configure Kubernetes Client",
            ProviderError::InvalidConfig(_) | ProviderError::InvalidDuration { .. } => {
                "Invalid Configuration"
            }
            ProviderError::CommandFailed { .. } | ProviderError::CommandSpawn(_) => {
                "liqoctl Command Failed"
            }
            ProviderError::StatusParse { .. }
            | ProviderError::EmptyClusterId
            | ProviderError::PeeringFailed(_) => "Peering Status Check Failed",
            ProviderError::DownloadError(_) => "Unable to Download liqoctl",
            ProviderError::UpdateNotSupported(_) | ProviderError::RequiresReplacement(_) => {
                "Unable to Update Resource"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ProviderError>;
