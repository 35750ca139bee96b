// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! `liqo_peer`: peering towards a remote provider cluster through liqoctl

use crate::config::ProviderConfig;
use crate::constants::peering::{DEFAULT_TIMEOUT_SECS, POLL_INTERVAL_SECS};
use crate::duration::parse_duration;
use crate::error::{ProviderError, Result};
use crate::liqoctl::args::{peer_args, unpeer_args};
use crate::liqoctl::LiqoctlRunner;
use crate::peering::{wait_for_peering_completion, PeerStatus, PeeringTarget};
use crate::resources::{Applied, Resource};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, instrument};

/// Configuration of a peering, mirroring the `liqoctl peer` flags
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct PeerResourceModel {
    /// Path to the remote (provider) cluster kubeconfig
    pub remote_kubeconfig: String,

    /// How long to wait for the peering to complete (e.g. `10m`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_validation: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub liqo_namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_liqo_namespace: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub networking_disabled: Option<bool>,
    /// LoadBalancer, NodePort or ClusterIP
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gw_server_service_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gw_server_service_port: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gw_server_service_nodeport: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gw_server_service_loadbalancer_ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gw_client_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gw_client_port: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mtu: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_resource_slice: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_slice_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_band: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_virtual_node: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pods: Option<String>,

    /// Computed: outcome of the last peering operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peer_status: Option<PeerStatus>,
}

impl PeerResourceModel {
    /// Deadline for the status polling after `liqoctl peer` returns
    pub fn completion_timeout(&self) -> Result<Duration> {
        match self.timeout.as_deref().filter(|t| !t.is_empty()) {
            Some(timeout) => parse_duration(timeout),
            None => Ok(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
        }
    }
}

pub struct PeerResource<R> {
    runner: R,
    local_kubeconfig: Option<String>,
    poll_interval: Duration,
}

impl<R: LiqoctlRunner> PeerResource<R> {
    pub fn new(runner: R, config: &ProviderConfig) -> Self {
        Self {
            runner,
            local_kubeconfig: config.local_kubeconfig().map(str::to_string),
            poll_interval: Duration::from_secs(POLL_INTERVAL_SECS),
        }
    }

    fn target(&self, model: &PeerResourceModel) -> PeeringTarget {
        PeeringTarget {
            local_kubeconfig: self.local_kubeconfig.clone(),
            local_namespace: model.liqo_namespace.clone(),
            remote_kubeconfig: model.remote_kubeconfig.clone(),
            remote_namespace: model.remote_liqo_namespace.clone(),
        }
    }
}

#[async_trait]
impl<R: LiqoctlRunner> Resource for PeerResource<R> {
    type Model = PeerResourceModel;

    const TYPE_SUFFIX: &'static str = "_peer";

    #[instrument(skip(self, plan), fields(remote = %plan.remote_kubeconfig))]
    async fn create(&self, mut plan: PeerResourceModel) -> Result<Applied<PeerResourceModel>> {
        if plan.remote_kubeconfig.trim().is_empty() {
            return Err(ProviderError::InvalidConfig(
                "remote_kubeconfig is required".to_string(),
            ));
        }
        let deadline = plan.completion_timeout()?;

        info!("Peering with remote cluster");
        let args = peer_args(&plan, self.local_kubeconfig.as_deref());
        self.runner.run(&args).await?.check("peer")?;

        let status =
            wait_for_peering_completion(&self.runner, &self.target(&plan), deadline, self.poll_interval)
                .await?;

        plan.peer_status = Some(status);
        let mut applied = Applied::new(plan);
        if status == PeerStatus::Timeout {
            applied.diagnostics.add_warning(
                "Peering Timeout",
                "Peering command was executed but timeout occurred while waiting for completion. \
                 The peering may still be in progress.",
            );
        }
        Ok(applied)
    }

    async fn read(&self, state: PeerResourceModel) -> Result<Option<PeerResourceModel>> {
        Ok(Some(state))
    }

    async fn update(
        &self,
        _plan: PeerResourceModel,
        _state: PeerResourceModel,
    ) -> Result<Applied<PeerResourceModel>> {
        Err(ProviderError::UpdateNotSupported("liqo_peer"))
    }

    #[instrument(skip(self, state), fields(remote = %state.remote_kubeconfig))]
    async fn delete(&self, state: PeerResourceModel) -> Result<()> {
        info!("Unpeering from remote cluster");
        let args = unpeer_args(&state, self.local_kubeconfig.as_deref());
        self.runner.run(&args).await?.check("unpeer")?;
        info!("Unpeering completed");
        Ok(())
    }
}
