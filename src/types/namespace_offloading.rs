// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use k8s_openapi::api::core::v1::NodeSelector;
use kube::CustomResource;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How pods of an offloaded namespace are scheduled
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, schemars::JsonSchema)]
pub enum PodOffloadingStrategy {
    Local,
    Remote,
    #[default]
    LocalAndRemote,
}

/// How the remote namespace is named
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, schemars::JsonSchema)]
pub enum NamespaceMappingStrategy {
    #[default]
    DefaultName,
    EnforceSameName,
    SelectedName,
}

impl fmt::Display for PodOffloadingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PodOffloadingStrategy::Local => "Local",
            PodOffloadingStrategy::Remote => "Remote",
            PodOffloadingStrategy::LocalAndRemote => "LocalAndRemote",
        };
        f.write_str(name)
    }
}

impl fmt::Display for NamespaceMappingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NamespaceMappingStrategy::DefaultName => "DefaultName",
            NamespaceMappingStrategy::EnforceSameName => "EnforceSameName",
            NamespaceMappingStrategy::SelectedName => "SelectedName",
        };
        f.write_str(name)
    }
}

/// Liqo NamespaceOffloading, enabling offloading for the namespace it lives in
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, PartialEq, schemars::JsonSchema)]
#[kube(group = "offloading.liqo.io", version = "v1beta1", kind = "NamespaceOffloading")]
#[kube(namespaced)]
#[kube(status = "NamespaceOffloadingStatus")]
#[serde(rename_all = "camelCase")]
pub struct NamespaceOffloadingSpec {
    #[serde(default)]
    pub namespace_mapping_strategy: NamespaceMappingStrategy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_namespace_name: Option<String>,
    #[serde(default)]
    pub pod_offloading_strategy: PodOffloadingStrategy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_selector: Option<NodeSelector>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceOffloadingStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offloading_phase: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_namespace_name: Option<String>,
}

impl NamespaceOffloading {
    /// Offloading phase reported by Liqo, if any
    pub fn phase(&self) -> Option<&str> {
        self.status.as_ref().and_then(|s| s.offloading_phase.as_deref())
    }
}
