// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Locating liqoctl, downloading a release when it is not installed

use crate::config::ProviderConfig;
use crate::constants::liqoctl::{BINARY_NAME, RELEASE_BASE_URL};
use crate::error::{ProviderError, Result};
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Find the liqoctl binary to run: configured path, then `PATH`, then a downloaded release
#[instrument(skip(config))]
pub async fn resolve_liqoctl(config: &ProviderConfig) -> Result<PathBuf> {
    if let Some(path) = &config.liqoctl_path {
        if !path.is_file() {
            return Err(ProviderError::InvalidConfig(format!(
                "liqoctl_path {} does not exist",
                path.display()
            )));
        }
        debug!("Using configured liqoctl {}", path.display());
        return Ok(path.clone());
    }

    if let Some(path) = find_in_path(&binary_file_name()) {
        debug!("Using liqoctl from PATH: {}", path.display());
        return Ok(path);
    }

    download_liqoctl(config.liqo_version(), &env::temp_dir()).await
}

/// Search the directories in `PATH` for an executable file
fn find_in_path(name: &str) -> Option<PathBuf> {
    let path_var = env::var_os("PATH")?;
    env::split_paths(&path_var)
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

fn binary_file_name() -> String {
    if cfg!(windows) {
        format!("{}.exe", BINARY_NAME)
    } else {
        BINARY_NAME.to_string()
    }
}

/// Release asset name for a platform, e.g. `liqoctl-linux-x86_64`
pub fn release_asset_name(os: &str, arch: &str) -> String {
    let os = match os {
        "macos" => "darwin",
        other => other,
    };
    let arch = match arch {
        "aarch64" => "arm64",
        other => other,
    };
    let mut name = format!("{}-{}-{}", BINARY_NAME, os, arch);
    if os == "windows" {
        name.push_str(".exe");
    }
    name
}

pub fn release_url(version: &str, asset: &str) -> String {
    format!("{}/{}/{}", RELEASE_BASE_URL, version, asset)
}

/// Download liqoctl into a per-version directory under `cache_root`, reusing earlier downloads
#[instrument]
async fn download_liqoctl(version: &str, cache_root: &Path) -> Result<PathBuf> {
    let target_dir = cache_root.join(format!("liqoctl-{}", version));
    let target = target_dir.join(binary_file_name());
    if target.is_file() {
        debug!("Reusing downloaded liqoctl {}", target.display());
        return Ok(target);
    }

    let url = release_url(version, &release_asset_name(env::consts::OS, env::consts::ARCH));
    info!("Downloading liqoctl {} from {}", version, url);

    let response = reqwest::get(&url)
        .await
        .map_err(|e| ProviderError::DownloadError(format!("failed to download liqoctl from {}: {}", url, e)))?;
    if !response.status().is_success() {
        return Err(ProviderError::DownloadError(format!(
            "failed to download liqoctl: HTTP {} from {}",
            response.status().as_u16(),
            url
        )));
    }
    let body = response
        .bytes()
        .await
        .map_err(|e| ProviderError::DownloadError(format!("failed to read liqoctl download: {}", e)))?;

    tokio::fs::create_dir_all(&target_dir).await.map_err(|e| {
        ProviderError::DownloadError(format!("failed to create {}: {}", target_dir.display(), e))
    })?;

    // Write next to the target and rename so a partial download is never picked up
    let partial = target_dir.join(format!("{}.partial", binary_file_name()));
    tokio::fs::write(&partial, &body).await.map_err(|e| {
        ProviderError::DownloadError(format!("failed to write liqoctl file: {}", e))
    })?;
    make_executable(&partial).await?;
    tokio::fs::rename(&partial, &target).await.map_err(|e| {
        ProviderError::DownloadError(format!("failed to install liqoctl file: {}", e))
    })?;

    info!("liqoctl {} installed at {}", version, target.display());
    Ok(target)
}

#[cfg(unix)]
async fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .await
        .map_err(|e| ProviderError::DownloadError(format!("failed to make liqoctl executable: {}", e)))
}

#[cfg(not(unix))]
async fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}
