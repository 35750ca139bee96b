// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! `liqo_offload`: the NamespaceOffloading object enabling offloading of a namespace

use crate::constants::{offloading::RESOURCE_NAME, FIELD_MANAGER};
use crate::error::{ProviderError, Result};
use crate::resources::{Applied, Resource};
use crate::types::{
    NamespaceMappingStrategy, NamespaceOffloading, NamespaceOffloadingSpec, PodOffloadingStrategy,
};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::{NodeSelector, NodeSelectorRequirement, NodeSelectorTerm};
use kube::api::{DeleteParams, Patch, PatchParams};
use kube::{Api, Client};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct OffloadResourceModel {
    /// Namespace to offload; the NamespaceOffloading is created inside it
    pub namespace: String,
    #[serde(default)]
    pub pod_offloading_strategy: PodOffloadingStrategy,
    #[serde(default)]
    pub namespace_mapping_strategy: NamespaceMappingStrategy,
    /// Only meaningful with the `SelectedName` mapping strategy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_namespace_name: Option<String>,
    /// Terms are ORed; an empty list selects every remote cluster
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cluster_selector_terms: Vec<ClusterSelectorTerm>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ClusterSelectorTerm {
    /// Requirements are ANDed
    #[serde(default)]
    pub match_expressions: Vec<MatchExpression>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct MatchExpression {
    pub key: String,
    /// In, NotIn, Exists, DoesNotExist, Gt or Lt
    pub operator: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
}

impl OffloadResourceModel {
    pub fn validate(&self) -> Result<()> {
        if self.namespace.trim().is_empty() {
            return Err(ProviderError::InvalidConfig(
                "namespace is required".to_string(),
            ));
        }
        if self.namespace_mapping_strategy == NamespaceMappingStrategy::SelectedName
            && self
                .remote_namespace_name
                .as_deref()
                .map_or(true, str::is_empty)
        {
            return Err(ProviderError::InvalidConfig(
                "remote_namespace_name is required with the SelectedName mapping strategy"
                    .to_string(),
            ));
        }
        Ok(())
    }

    pub fn to_spec(&self) -> NamespaceOffloadingSpec {
        let cluster_selector = (!self.cluster_selector_terms.is_empty()).then(|| NodeSelector {
            node_selector_terms: self
                .cluster_selector_terms
                .iter()
                .map(|term| NodeSelectorTerm {
                    match_expressions: Some(
                        term.match_expressions
                            .iter()
                            .map(|expr| NodeSelectorRequirement {
                                key: expr.key.clone(),
                                operator: expr.operator.clone(),
                                values: (!expr.values.is_empty()).then(|| expr.values.clone()),
                            })
                            .collect(),
                    ),
                    match_fields: None,
                })
                .collect(),
        });

        NamespaceOffloadingSpec {
            namespace_mapping_strategy: self.namespace_mapping_strategy,
            remote_namespace_name: self
                .remote_namespace_name
                .clone()
                .filter(|name| !name.is_empty()),
            pod_offloading_strategy: self.pod_offloading_strategy,
            cluster_selector,
        }
    }

    /// Model as seen on the cluster
    pub fn from_object(namespace: &str, object: &NamespaceOffloading) -> Self {
        let spec = &object.spec;
        let cluster_selector_terms = spec
            .cluster_selector
            .iter()
            .flat_map(|selector| selector.node_selector_terms.iter())
            .map(|term| ClusterSelectorTerm {
                match_expressions: term
                    .match_expressions
                    .iter()
                    .flatten()
                    .map(|req| MatchExpression {
                        key: req.key.clone(),
                        operator: req.operator.clone(),
                        values: req.values.clone().unwrap_or_default(),
                    })
                    .collect(),
            })
            .collect();

        Self {
            namespace: namespace.to_string(),
            pod_offloading_strategy: spec.pod_offloading_strategy,
            namespace_mapping_strategy: spec.namespace_mapping_strategy,
            remote_namespace_name: spec.remote_namespace_name.clone(),
            cluster_selector_terms,
        }
    }
}

pub struct OffloadResource {
    client: Client,
}

impl OffloadResource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn api(&self, namespace: &str) -> Api<NamespaceOffloading> {
        Api::namespaced(self.client.clone(), namespace)
    }

    async fn apply(&self, plan: &OffloadResourceModel) -> Result<NamespaceOffloading> {
        plan.validate()?;

        let offloading = NamespaceOffloading::new(RESOURCE_NAME, plan.to_spec());
        let pp = PatchParams::apply(FIELD_MANAGER).force();
        let applied = self
            .api(&plan.namespace)
            .patch(RESOURCE_NAME, &pp, &Patch::Apply(&offloading))
            .await?;

        debug!(
            phase = applied.phase().unwrap_or("Unknown"),
            "NamespaceOffloading applied"
        );
        Ok(applied)
    }
}

#[async_trait]
impl Resource for OffloadResource {
    type Model = OffloadResourceModel;

    const TYPE_SUFFIX: &'static str = "_offload";

    #[instrument(skip(self, plan), fields(namespace = %plan.namespace))]
    async fn create(&self, plan: OffloadResourceModel) -> Result<Applied<OffloadResourceModel>> {
        info!("Enabling offloading");
        self.apply(&plan).await?;
        Ok(Applied::new(plan))
    }

    #[instrument(skip(self, state), fields(namespace = %state.namespace))]
    async fn read(&self, state: OffloadResourceModel) -> Result<Option<OffloadResourceModel>> {
        match self.api(&state.namespace).get_opt(RESOURCE_NAME).await? {
            Some(object) => Ok(Some(OffloadResourceModel::from_object(
                &state.namespace,
                &object,
            ))),
            None => {
                info!("NamespaceOffloading no longer exists");
                Ok(None)
            }
        }
    }

    #[instrument(skip(self, plan, state), fields(namespace = %state.namespace))]
    async fn update(
        &self,
        plan: OffloadResourceModel,
        state: OffloadResourceModel,
    ) -> Result<Applied<OffloadResourceModel>> {
        if plan.namespace != state.namespace {
            return Err(ProviderError::RequiresReplacement("namespace"));
        }
        info!("Updating offloading");
        self.apply(&plan).await?;
        Ok(Applied::new(plan))
    }

    #[instrument(skip(self, state), fields(namespace = %state.namespace))]
    async fn delete(&self, state: OffloadResourceModel) -> Result<()> {
        match self
            .api(&state.namespace)
            .delete(RESOURCE_NAME, &DeleteParams::default())
            .await
        {
            Ok(_) => {
                info!("Offloading disabled");
                Ok(())
            }
            Err(kube::Error::Api(err)) if err.code == 404 => {
                debug!("NamespaceOffloading already gone");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}
