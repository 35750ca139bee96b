// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Peering status classification and completion polling.

pub mod status;
pub mod wait;

pub use status::{check_peering_status, evaluate_peer_status, PeerStatus, PeeringTarget};
pub use wait::wait_for_peering_completion;
