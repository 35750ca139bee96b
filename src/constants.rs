// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Type name of the provider; resource type names are prefixed with it
pub const PROVIDER_TYPE_NAME: &str = "liqo";

/// The field manager used for server-side apply
pub const FIELD_MANAGER: &str = "liqo-provider";

/// liqoctl binary lookup and download
pub mod liqoctl {
    /// Release used when the provider configuration does not pin one
    pub const DEFAULT_VERSION: &str = "v1.0.0";
    pub const BINARY_NAME: &str = "liqoctl";
    pub const RELEASE_BASE_URL: &str = "https://github.com/liqotech/liqo/releases/download";
}

/// Peering status polling
pub mod peering {
    /// Interval between two `liqoctl info` checks
    pub const POLL_INTERVAL_SECS: u64 = 10;
    /// Deadline used when the resource sets no timeout
    pub const DEFAULT_TIMEOUT_SECS: u64 = 5 * 60;
}

/// Namespace offloading custom resource
pub mod offloading {
    /// Liqo only acts on the NamespaceOffloading with this name
    pub const RESOURCE_NAME: &str = "offloading";
}

/// Environment variables read on top of the configuration file
pub mod env {
    pub const LIQO_VERSION: &str = "LIQO_VERSION";
    pub const LIQOCTL_PATH: &str = "LIQOCTL_PATH";
    pub const KUBE_CONFIG_PATHS: &str = "KubeConfigPaths";
}
