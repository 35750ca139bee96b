// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Model of `liqoctl info -o yaml`

use crate::error::{ProviderError, Result};
use serde::Deserialize;

/// Output of `liqoctl info -o yaml`; fields liqoctl adds later are ignored
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct LiqoctlInfo {
    pub health: Health,
    pub local: LocalInfo,
    pub peerings: Peerings,
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Health {
    pub healthy: bool,
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct LocalInfo {
    #[serde(rename = "APIServerAddr")]
    pub api_server_addr: String,
    #[serde(rename = "clusterID")]
    pub cluster_id: String,
    pub version: String,
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Peerings {
    pub peers: Vec<PeerInfo>,
}

/// One peered cluster as seen from the queried cluster
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct PeerInfo {
    pub authentication_status: String,
    #[serde(rename = "clusterID")]
    pub cluster_id: String,
    pub networking_status: String,
    pub offloading_status: String,
    pub role: String,
}

impl LiqoctlInfo {
    /// Parse the YAML printed by liqoctl; `cluster` names the side for error messages
    pub fn parse(yaml: &str, cluster: &str) -> Result<Self> {
        // An empty document deserializes to unit, not to a map
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(|e| ProviderError::StatusParse {
            cluster: cluster.to_string(),
            message: e.to_string(),
        })
    }

    pub fn find_peer(&self, cluster_id: &str) -> Option<&PeerInfo> {
        self.peerings.peers.iter().find(|p| p.cluster_id == cluster_id)
    }
}
