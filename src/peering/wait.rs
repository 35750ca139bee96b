// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Bounded polling of the peering status

use crate::error::{ProviderError, Result};
use crate::liqoctl::LiqoctlRunner;
use crate::peering::status::{check_peering_status, PeerStatus, PeeringTarget};
use std::time::Duration;
use tokio::time::{interval, timeout, MissedTickBehavior};
use tracing::{debug, info, instrument, warn};

/// Poll the peering status until it is ready, fails, or `deadline` elapses.
///
/// The first check runs immediately, then once per `poll_interval`.
/// Returns `Ready` or `Timeout`; an explicit error status or a non-transient
/// check failure is returned as an error.
#[instrument(skip(runner, target), fields(remote = %target.remote_kubeconfig))]
pub async fn wait_for_peering_completion<R: LiqoctlRunner + ?Sized>(
    runner: &R,
    target: &PeeringTarget,
    deadline: Duration,
    poll_interval: Duration,
) -> Result<PeerStatus> {
    let poll = async {
        let mut ticker = interval(poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            match check_peering_status(runner, target).await {
                Ok(PeerStatus::Ready) => return Ok(PeerStatus::Ready),
                Ok(PeerStatus::Error) => {
                    return Err(ProviderError::PeeringFailed(
                        "liqoctl reported the peering in error".to_string(),
                    ))
                }
                Ok(status) => debug!("Peering not ready yet ({}), polling again", status),
                Err(e) if e.is_transient() => warn!("Transient peering status error: {}", e),
                Err(e) => return Err(e),
            }
        }
    };

    match timeout(deadline, poll).await {
        Ok(result) => {
            if result.is_ok() {
                info!("Peering is ready");
            }
            result
        }
        Err(_) => {
            warn!("Timeout waiting for peering completion after {:?}", deadline);
            Ok(PeerStatus::Timeout)
        }
    }
}
