// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Peering status as reported by `liqoctl info`

use crate::error::{ProviderError, Result};
use crate::liqoctl::args::info_args;
use crate::liqoctl::info::{LiqoctlInfo, PeerInfo};
use crate::liqoctl::LiqoctlRunner;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, instrument};

/// Status of a peering, stored as the `peer_status` attribute
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PeerStatus {
    Ready,
    Establishing,
    NoPeers,
    Error,
    Timeout,
}

impl PeerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PeerStatus::Ready => "ready",
            PeerStatus::Establishing => "establishing",
            PeerStatus::NoPeers => "no_peers",
            PeerStatus::Error => "error",
            PeerStatus::Timeout => "timeout",
        }
    }
}

impl fmt::Display for PeerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two clusters of a peering and how to reach them with liqoctl
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PeeringTarget {
    /// `None` uses liqoctl's default kubeconfig
    pub local_kubeconfig: Option<String>,
    pub local_namespace: Option<String>,
    pub remote_kubeconfig: String,
    pub remote_namespace: Option<String>,
}

/// Classify a peer from its authentication, networking and offloading status.
///
/// Any unhealthy module means the peering is still being established; a
/// peering with at least one healthy module and none unhealthy is ready.
/// Disabled modules count as neither.
pub fn evaluate_peer_status(peer: &PeerInfo) -> PeerStatus {
    let mut healthy = 0;
    let mut unhealthy = 0;

    for status in [
        &peer.authentication_status,
        &peer.networking_status,
        &peer.offloading_status,
    ] {
        // "Unhealthy" contains "Healthy", so it must be checked first
        if status.contains("Unhealthy") {
            unhealthy += 1;
        } else if status.contains("Disabled") {
            continue;
        } else if status.contains("Healthy") {
            healthy += 1;
        }
    }

    if unhealthy == 0 && healthy > 0 {
        PeerStatus::Ready
    } else {
        PeerStatus::Establishing
    }
}

/// Cluster ID of the remote cluster, from its own `liqoctl info`
#[instrument(skip(runner, target), fields(remote = %target.remote_kubeconfig))]
pub async fn remote_cluster_id<R: LiqoctlRunner + ?Sized>(
    runner: &R,
    target: &PeeringTarget,
) -> Result<String> {
    let args = info_args(
        Some(target.remote_kubeconfig.as_str()),
        target.remote_namespace.as_deref(),
    );
    let output = runner.run(&args).await?.check("info on remote cluster")?;
    let info = LiqoctlInfo::parse(&output.stdout, "remote")?;

    if info.local.cluster_id.is_empty() {
        return Err(ProviderError::EmptyClusterId);
    }
    Ok(info.local.cluster_id)
}

/// Status of the peering towards the remote cluster, as seen from the local cluster
#[instrument(skip(runner, target), fields(remote = %target.remote_kubeconfig))]
pub async fn check_peering_status<R: LiqoctlRunner + ?Sized>(
    runner: &R,
    target: &PeeringTarget,
) -> Result<PeerStatus> {
    let remote_id = remote_cluster_id(runner, target).await?;

    let args = info_args(
        target.local_kubeconfig.as_deref(),
        target.local_namespace.as_deref(),
    );
    let output = runner.run(&args).await?.check("info on local cluster")?;
    let local = LiqoctlInfo::parse(&output.stdout, "local")?;

    let Some(peer) = local.find_peer(&remote_id) else {
        debug!("Remote cluster {} not found in the local peer list", remote_id);
        return Ok(PeerStatus::NoPeers);
    };

    let status = evaluate_peer_status(peer);
    debug!(
        cluster_id = %remote_id,
        authentication = %peer.authentication_status,
        networking = %peer.networking_status,
        offloading = %peer.offloading_status,
        "Peering status: {}",
        status
    );
    Ok(status)
}
