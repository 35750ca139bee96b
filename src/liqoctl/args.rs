// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! liqoctl command lines built from resource models

use crate::resources::peer::PeerResourceModel;

/// Small builder that only emits flags for values that are actually set
#[derive(Debug, Default)]
struct Args(Vec<String>);

impl Args {
    fn new(subcommand: &str) -> Self {
        Self(vec![subcommand.to_string()])
    }

    fn string(&mut self, flag: &str, value: Option<&str>) -> &mut Self {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.0.push(flag.to_string());
            self.0.push(value.to_string());
        }
        self
    }

    fn int(&mut self, flag: &str, value: Option<i64>) -> &mut Self {
        if let Some(value) = value {
            self.0.push(flag.to_string());
            self.0.push(value.to_string());
        }
        self
    }

    /// `--flag` when explicitly true
    fn enabled(&mut self, flag: &str, value: Option<bool>) -> &mut Self {
        if value == Some(true) {
            self.0.push(flag.to_string());
        }
        self
    }

    /// `--flag=false` when explicitly false; liqoctl defaults these to true
    fn disabled(&mut self, flag: &str, value: Option<bool>) -> &mut Self {
        if value == Some(false) {
            self.0.push(format!("{}=false", flag));
        }
        self
    }

    fn raw(&mut self, arg: &str) -> &mut Self {
        self.0.push(arg.to_string());
        self
    }

    fn build(&mut self) -> Vec<String> {
        std::mem::take(&mut self.0)
    }
}

/// `liqoctl peer` arguments for a peer resource plan
pub fn peer_args(plan: &PeerResourceModel, local_kubeconfig: Option<&str>) -> Vec<String> {
    Args::new("peer")
        .string("--kubeconfig", local_kubeconfig)
        .string("--remote-kubeconfig", Some(plan.remote_kubeconfig.as_str()))
        .string("--timeout", plan.timeout.as_deref())
        .enabled("--skip-validation", plan.skip_validation)
        .string("--namespace", plan.liqo_namespace.as_deref())
        .string("--remote-namespace", plan.remote_liqo_namespace.as_deref())
        // networking
        .enabled("--networking-disabled", plan.networking_disabled)
        .string("--gw-server-service-type", plan.gw_server_service_type.as_deref())
        .int("--gw-server-service-port", plan.gw_server_service_port)
        .int("--gw-server-service-nodeport", plan.gw_server_service_nodeport)
        .string(
            "--gw-server-service-loadbalancerip",
            plan.gw_server_service_loadbalancer_ip.as_deref(),
        )
        .string("--gw-client-address", plan.gw_client_address.as_deref())
        .int("--gw-client-port", plan.gw_client_port)
        .int("--mtu", plan.mtu)
        // authentication
        .disabled("--create-resource-slice", plan.create_resource_slice)
        .string("--resource-slice-class", plan.resource_slice_class.as_deref())
        .enabled("--in-band", plan.in_band)
        .string("--proxy-url", plan.proxy_url.as_deref())
        // resources
        .disabled("--create-virtual-node", plan.create_virtual_node)
        .string("--cpu", plan.cpu.as_deref())
        .string("--memory", plan.memory.as_deref())
        .string("--pods", plan.pods.as_deref())
        .build()
}

/// `liqoctl unpeer` arguments for a peer resource state
pub fn unpeer_args(state: &PeerResourceModel, local_kubeconfig: Option<&str>) -> Vec<String> {
    Args::new("unpeer")
        .string("--kubeconfig", local_kubeconfig)
        .string("--remote-kubeconfig", Some(state.remote_kubeconfig.as_str()))
        .string("--timeout", state.timeout.as_deref())
        .string("--namespace", state.liqo_namespace.as_deref())
        .string("--remote-namespace", state.remote_liqo_namespace.as_deref())
        .build()
}

/// `liqoctl info` arguments producing YAML output
pub fn info_args(kubeconfig: Option<&str>, liqo_namespace: Option<&str>) -> Vec<String> {
    Args::new("info")
        .string("--kubeconfig", kubeconfig)
        .string("--namespace", liqo_namespace)
        .raw("-o")
        .raw("yaml")
        .build()
}
