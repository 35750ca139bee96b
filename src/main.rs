// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::de::DeserializeOwned;
use tracing::info;
use tracing_subscriber::EnvFilter;

use liqo_provider::config::ProviderConfig;
use liqo_provider::diagnostics::Diagnostic;
use liqo_provider::provider::LiqoProvider;
use liqo_provider::resources::Resource;

/// Drive a liqo_peer or liqo_offload resource through one lifecycle operation
#[derive(Parser, Debug)]
#[command(name = "liqo-provider", version, about, long_about = None)]
struct Cli {
    /// Provider configuration (YAML)
    #[arg(long, env = "LIQO_PROVIDER_CONFIG")]
    provider_config: Option<PathBuf>,

    #[arg(value_enum)]
    operation: Operation,

    #[arg(value_enum)]
    resource: ResourceKind,

    /// Resource model (YAML): the plan for create/update, the state for read/delete
    #[arg(short = 'f', long)]
    file: PathBuf,

    /// Prior state (YAML), required for update
    #[arg(long)]
    state: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Operation {
    Create,
    Read,
    Update,
    Delete,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ResourceKind {
    Peer,
    Offload,
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the resulting state, logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = ProviderConfig::load(cli.provider_config.as_deref())?;
    let provider = LiqoProvider::configure(config);

    match cli.resource {
        ResourceKind::Peer => {
            let resource = provider.peer_resource().await?;
            run(&resource, &cli).await
        }
        ResourceKind::Offload => {
            let resource = provider.offload_resource().await?;
            run(&resource, &cli).await
        }
    }
}

async fn run<R: Resource>(resource: &R, cli: &Cli) -> Result<()> {
    let model: R::Model = read_model(&cli.file)?;
    info!("Running {:?} on {}", cli.operation, resource.type_name());

    let result = match cli.operation {
        Operation::Create => resource.create(model).await.map(|applied| {
            applied.diagnostics.iter().for_each(Diagnostic::log);
            Some(applied.state)
        }),
        Operation::Read => resource.read(model).await,
        Operation::Update => {
            let state_file = cli
                .state
                .as_deref()
                .context("--state is required for update")?;
            let state: R::Model = read_model(state_file)?;
            resource.update(model, state).await.map(|applied| {
                applied.diagnostics.iter().for_each(Diagnostic::log);
                Some(applied.state)
            })
        }
        Operation::Delete => resource.delete(model).await.map(|_| None),
    };

    let state = match result {
        Ok(state) => state,
        Err(e) => {
            Diagnostic::from(&e).log();
            return Err(e.into());
        }
    };

    match state {
        Some(state) => print!("{}", serde_yaml::to_string(&state)?),
        None if cli.operation == Operation::Read => {
            info!("{} no longer exists", resource.type_name())
        }
        None => {}
    }
    Ok(())
}

fn read_model<M: DeserializeOwned>(path: &Path) -> Result<M> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_yaml::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}
