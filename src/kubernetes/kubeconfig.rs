// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubeconfig path resolution and provider overrides
//!
//! Overrides are applied to the JSON form of the kubeconfig so that only the
//! fields the provider sets are touched; everything else in the loaded files
//! is preserved.

use crate::config::KubernetesConfig;
use crate::constants::env as env_vars;
use crate::error::{ProviderError, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use kube::config::{KubeConfigOptions, Kubeconfig};
use serde_json::{Map, Value};
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;
use url::Url;

/// Name given to the context, cluster and user entries the provider has to create
const GENERATED_ENTRY_NAME: &str = "liqo-provider";

/// Kubeconfig files to load, in precedence order.
///
/// `config_path` wins over `config_paths`, which wins over the `KubeConfigPaths`
/// environment variable.
pub fn config_paths(settings: &KubernetesConfig) -> Result<Vec<PathBuf>> {
    resolve_config_paths(settings, env::var_os(env_vars::KUBE_CONFIG_PATHS))
}

/// `env_paths` is the raw value of `KubeConfigPaths`, an OS path list
fn resolve_config_paths(
    settings: &KubernetesConfig,
    env_paths: Option<OsString>,
) -> Result<Vec<PathBuf>> {
    let raw: Vec<String> = if let Some(path) = settings.config_path.as_ref().filter(|p| !p.is_empty()) {
        vec![path.clone()]
    } else if !settings.config_paths.is_empty() {
        settings.config_paths.clone()
    } else if let Some(value) = env_paths.filter(|v| !v.is_empty()) {
        env::split_paths(&value)
            .map(|p| p.to_string_lossy().into_owned())
            .collect()
    } else {
        Vec::new()
    };

    raw.iter().map(|p| expand_home(p)).collect()
}

/// Expand a leading `~` to the user's home directory
pub fn expand_home(path: &str) -> Result<PathBuf> {
    let Some(rest) = path.strip_prefix('~') else {
        return Ok(PathBuf::from(path));
    };
    if !(rest.is_empty() || rest.starts_with('/') || rest.starts_with('\\')) {
        return Err(ProviderError::KubeconfigError(format!(
            "cannot expand user-specific home dir in {}",
            path
        )));
    }

    let home = env::var_os("HOME")
        .or_else(|| env::var_os("USERPROFILE"))
        .ok_or_else(|| {
            ProviderError::KubeconfigError(format!("cannot expand {}: home directory unknown", path))
        })?;

    let mut expanded = PathBuf::from(home);
    let rest = rest.trim_start_matches(['/', '\\']);
    if !rest.is_empty() {
        expanded.push(rest);
    }
    Ok(expanded)
}

/// Turn a `host` setting into an API server URL.
///
/// A bare `host[:port]` gets `https://` when TLS is in use and `http://`
/// otherwise. URLs carrying a path are rejected.
pub fn default_server_url(host: &str, default_tls: bool) -> Result<String> {
    let invalid = || {
        ProviderError::KubeconfigError(format!("host must be a URL or a host:port pair: {:?}", host))
    };

    let parsed = match Url::parse(host) {
        Ok(url) if url.has_host() => url,
        _ => {
            let scheme = if default_tls { "https://" } else { "http://" };
            Url::parse(&format!("{}{}", scheme, host)).map_err(|_| invalid())?
        }
    };

    if !matches!(parsed.path(), "" | "/") {
        return Err(invalid());
    }

    Ok(parsed.as_str().trim_end_matches('/').to_string())
}

/// Apply provider overrides to a loaded kubeconfig.
///
/// Returns the patched kubeconfig and the options selecting its context.
pub fn apply_overrides(
    kubeconfig: Kubeconfig,
    settings: &KubernetesConfig,
) -> Result<(Kubeconfig, KubeConfigOptions)> {
    let mut doc = serde_json::to_value(&kubeconfig)
        .map_err(|e| ProviderError::KubeconfigError(format!("Failed to serialize kubeconfig: {}", e)))?;

    let context_name = settings
        .config_context
        .clone()
        .filter(|c| !c.is_empty())
        .or_else(|| {
            doc.get("current-context")
                .and_then(Value::as_str)
                .filter(|c| !c.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| GENERATED_ENTRY_NAME.to_string());

    let (cluster_name, user_name) = {
        let context = named_entry(&mut doc, "contexts", "context", &context_name)?;
        if let Some(cluster) = settings.config_context_cluster.as_ref().filter(|c| !c.is_empty()) {
            context.insert("cluster".into(), Value::String(cluster.clone()));
        }
        if let Some(user) = settings.config_context_auth_info.as_ref().filter(|u| !u.is_empty()) {
            context.insert("user".into(), Value::String(user.clone()));
        }
        let cluster_name = string_field(context, "cluster").unwrap_or(GENERATED_ENTRY_NAME.to_string());
        let user_name = string_field(context, "user").unwrap_or(GENERATED_ENTRY_NAME.to_string());
        context.insert("cluster".into(), Value::String(cluster_name.clone()));
        context.insert("user".into(), Value::String(user_name.clone()));
        (cluster_name, user_name)
    };

    if let Some(root) = doc.as_object_mut() {
        root.insert("current-context".into(), Value::String(context_name.clone()));
    }

    let has_ca = settings.cluster_ca_certificate.is_some();
    let has_cert = settings.client_certificate.is_some();
    let insecure = settings.insecure.unwrap_or(false);

    {
        let cluster = named_entry(&mut doc, "clusters", "cluster", &cluster_name)?;
        if let Some(insecure) = settings.insecure {
            cluster.insert("insecure-skip-tls-verify".into(), Value::Bool(insecure));
        }
        if let Some(ca) = &settings.cluster_ca_certificate {
            cluster.remove("certificate-authority");
            cluster.insert("certificate-authority-data".into(), encode_pem(ca));
        }
        if let Some(host) = settings.host.as_ref().filter(|h| !h.is_empty()) {
            let server = default_server_url(host, has_ca || has_cert || insecure)?;
            cluster.insert("server".into(), Value::String(server));
        }
        if let Some(proxy_url) = settings.proxy_url.as_ref().filter(|p| !p.is_empty()) {
            cluster.insert("proxy-url".into(), Value::String(proxy_url.clone()));
        }
    }

    {
        let user = named_entry(&mut doc, "users", "user", &user_name)?;
        if let Some(cert) = &settings.client_certificate {
            user.remove("client-certificate");
            user.insert("client-certificate-data".into(), encode_pem(cert));
        }
        if let Some(key) = &settings.client_key {
            user.remove("client-key");
            user.insert("client-key-data".into(), encode_pem(key));
        }
        if let Some(username) = &settings.username {
            user.insert("username".into(), Value::String(username.clone()));
        }
        if let Some(password) = &settings.password {
            user.insert("password".into(), Value::String(password.clone()));
        }
        if let Some(token) = &settings.token {
            user.insert("token".into(), Value::String(token.clone()));
        }
        if let Some(exec) = &settings.exec {
            let env: Vec<Value> = exec
                .env
                .iter()
                .map(|(name, value)| serde_json::json!({ "name": name, "value": value }))
                .collect();
            user.insert(
                "exec".into(),
                serde_json::json!({
                    "apiVersion": exec.api_version,
                    "command": exec.command,
                    "args": exec.args,
                    "env": env,
                    "interactiveMode": "IfAvailable",
                    "provideClusterInfo": false,
                }),
            );
        }
    }

    let patched: Kubeconfig = serde_json::from_value(doc)
        .map_err(|e| ProviderError::KubeconfigError(format!("Failed to apply overrides: {}", e)))?;

    let options = KubeConfigOptions {
        context: Some(context_name),
        ..Default::default()
    };
    Ok((patched, options))
}

/// Kubeconfig `*-data` fields hold base64 of the PEM text
fn encode_pem(pem: &str) -> Value {
    Value::String(STANDARD.encode(pem.as_bytes()))
}

fn string_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    object
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Find (or create) the entry called `name` in one of the kubeconfig lists and
/// return its inner object, e.g. `clusters[name=x].cluster`.
fn named_entry<'a>(
    doc: &'a mut Value,
    list: &str,
    field: &str,
    name: &str,
) -> Result<&'a mut Map<String, Value>> {
    let malformed = || ProviderError::KubeconfigError(format!("malformed kubeconfig: bad {} entry", list));

    let root = doc.as_object_mut().ok_or_else(malformed)?;
    let entries = root.entry(list).or_insert(Value::Null);
    if entries.is_null() {
        *entries = Value::Array(Vec::new());
    }
    let entries = entries.as_array_mut().ok_or_else(malformed)?;

    let index = match entries
        .iter()
        .position(|e| e.get("name").and_then(Value::as_str) == Some(name))
    {
        Some(index) => index,
        None => {
            let mut entry = Map::new();
            entry.insert("name".into(), Value::String(name.to_string()));
            entries.push(Value::Object(entry));
            entries.len() - 1
        }
    };

    let entry = entries[index].as_object_mut().ok_or_else(malformed)?;
    let inner = entry.entry(field).or_insert(Value::Null);
    if inner.is_null() {
        *inner = Value::Object(Map::new());
    }
    inner.as_object_mut().ok_or_else(malformed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExecConfig;
    use std::collections::BTreeMap;

    const KUBECONFIG: &str = r#"
apiVersion: v1
kind: Config
current-context: kind-local
clusters:
- name: kind-local
  cluster:
    server: https://127.0.0.1:6443
    certificate-authority: /etc/ca.crt
- name: kind-remote
  cluster:
    server: https://127.0.0.1:7443
contexts:
- name: kind-local
  context:
    cluster: kind-local
    user: kind-local
- name: kind-remote
  context:
    cluster: kind-remote
    user: kind-remote
users:
- name: kind-local
  user:
    token: local-token
- name: kind-remote
  user:
    token: remote-token
"#;

    fn load() -> Kubeconfig {
        Kubeconfig::from_yaml(KUBECONFIG).unwrap()
    }

    fn cluster<'a>(kubeconfig: &'a Kubeconfig, name: &str) -> &'a kube::config::Cluster {
        kubeconfig
            .clusters
            .iter()
            .find(|c| c.name == name)
            .and_then(|c| c.cluster.as_ref())
            .unwrap()
    }

    #[test]
    fn test_default_server_url_adds_scheme() {
        assert_eq!(default_server_url("10.0.0.1:6443", true).unwrap(), "https://10.0.0.1:6443");
        assert_eq!(default_server_url("10.0.0.1:6443", false).unwrap(), "http://10.0.0.1:6443");
        assert_eq!(default_server_url("localhost", true).unwrap(), "https://localhost");
    }

    #[test]
    fn test_default_server_url_keeps_explicit_scheme() {
        assert_eq!(
            default_server_url("https://api.example.com:443", false).unwrap(),
            "https://api.example.com"
        );
        assert_eq!(
            default_server_url("http://api.example.com:8080/", true).unwrap(),
            "http://api.example.com:8080"
        );
    }

    #[test]
    fn test_default_server_url_rejects_path() {
        assert!(default_server_url("https://api.example.com/k8s", true).is_err());
    }

    #[test]
    fn test_expand_home() {
        let home = env::var("HOME").unwrap();
        assert_eq!(expand_home("~/.kube/config").unwrap(), PathBuf::from(&home).join(".kube/config"));
        assert_eq!(expand_home("/etc/kubeconfig").unwrap(), PathBuf::from("/etc/kubeconfig"));
        assert!(expand_home("~other/.kube/config").is_err());
    }

    #[test]
    fn test_config_paths_precedence() {
        let settings = KubernetesConfig {
            config_path: Some("/a".to_string()),
            config_paths: vec!["/b".to_string(), "/c".to_string()],
            ..Default::default()
        };
        assert_eq!(config_paths(&settings).unwrap(), vec![PathBuf::from("/a")]);

        let settings = KubernetesConfig {
            config_paths: vec!["/b".to_string(), "/c".to_string()],
            ..Default::default()
        };
        assert_eq!(
            config_paths(&settings).unwrap(),
            vec![PathBuf::from("/b"), PathBuf::from("/c")]
        );
    }

    #[test]
    fn test_overrides_without_settings_keep_current_context() {
        let (patched, options) = apply_overrides(load(), &KubernetesConfig::default()).unwrap();

        assert_eq!(options.context.as_deref(), Some("kind-local"));
        assert_eq!(patched.current_context.as_deref(), Some("kind-local"));
        assert_eq!(
            cluster(&patched, "kind-local").server.as_deref(),
            Some("https://127.0.0.1:6443")
        );
    }

    #[test]
    fn test_overrides_select_context() {
        let settings = KubernetesConfig {
            config_context: Some("kind-remote".to_string()),
            host: Some("10.1.1.1:6443".to_string()),
            insecure: Some(true),
            ..Default::default()
        };

        let (patched, options) = apply_overrides(load(), &settings).unwrap();

        assert_eq!(options.context.as_deref(), Some("kind-remote"));
        let remote = cluster(&patched, "kind-remote");
        assert_eq!(remote.server.as_deref(), Some("https://10.1.1.1:6443"));
        assert_eq!(remote.insecure_skip_tls_verify, Some(true));
        // other clusters are untouched
        assert_eq!(
            cluster(&patched, "kind-local").server.as_deref(),
            Some("https://127.0.0.1:6443")
        );
    }

    #[test]
    fn test_overrides_replace_ca_file_with_data() {
        let pem = "-----BEGIN CERTIFICATE-----\nMIIB\n-----END CERTIFICATE-----\n";
        let settings = KubernetesConfig {
            cluster_ca_certificate: Some(pem.to_string()),
            ..Default::default()
        };

        let (patched, _) = apply_overrides(load(), &settings).unwrap();

        let local = cluster(&patched, "kind-local");
        assert_eq!(local.certificate_authority, None);
        assert_eq!(
            local.certificate_authority_data.as_deref(),
            Some(STANDARD.encode(pem).as_str())
        );
    }

    #[test]
    fn test_overrides_on_empty_kubeconfig_create_entries() {
        let settings = KubernetesConfig {
            host: Some("api.example.com:6443".to_string()),
            token: Some("abc".to_string()),
            exec: Some(ExecConfig {
                api_version: "client.authentication.k8s.io/v1".to_string(),
                command: "aws".to_string(),
                env: BTreeMap::from([("AWS_PROFILE".to_string(), "prod".to_string())]),
                args: vec!["eks".to_string(), "get-token".to_string()],
            }),
            ..Default::default()
        };

        let (patched, options) = apply_overrides(Kubeconfig::default(), &settings).unwrap();

        assert_eq!(options.context.as_deref(), Some(GENERATED_ENTRY_NAME));
        assert_eq!(
            cluster(&patched, GENERATED_ENTRY_NAME).server.as_deref(),
            Some("http://api.example.com:6443")
        );
        let doc = serde_json::to_value(&patched).unwrap();
        let user = &doc["users"][0]["user"];
        assert_eq!(user["token"], "abc");
        assert_eq!(user["exec"]["command"], "aws");
        assert_eq!(user["exec"]["args"], serde_json::json!(["eks", "get-token"]));
        assert_eq!(user["exec"]["env"][0]["name"], "AWS_PROFILE");
    }

    #[test]
    fn test_overrides_context_cluster_and_user() {
        let settings = KubernetesConfig {
            config_context_cluster: Some("kind-remote".to_string()),
            config_context_auth_info: Some("kind-remote".to_string()),
            ..Default::default()
        };

        let (patched, _) = apply_overrides(load(), &settings).unwrap();

        let context = patched
            .contexts
            .iter()
            .find(|c| c.name == "kind-local")
            .and_then(|c| c.context.as_ref())
            .unwrap();
        assert_eq!(context.cluster, "kind-remote");
        let doc = serde_json::to_value(&patched).unwrap();
        assert_eq!(doc["contexts"][0]["name"], "kind-local");
        assert_eq!(doc["contexts"][0]["context"]["user"], "kind-remote");
    }

    #[test]
    fn test_config_paths_from_env_list() {
        let joined = env::join_paths(["/etc/kube/a.yaml", "/etc/kube/b.yaml"]).unwrap();

        let paths = resolve_config_paths(&KubernetesConfig::default(), Some(joined)).unwrap();

        assert_eq!(
            paths,
            vec![PathBuf::from("/etc/kube/a.yaml"), PathBuf::from("/etc/kube/b.yaml")]
        );
    }

    #[test]
    fn test_config_paths_settings_win_over_env() {
        let settings = KubernetesConfig {
            config_paths: vec!["/b".to_string()],
            ..Default::default()
        };

        let paths = resolve_config_paths(&settings, Some(OsString::from("/from-env"))).unwrap();
        assert_eq!(paths, vec![PathBuf::from("/b")]);

        let empty = resolve_config_paths(&KubernetesConfig::default(), Some(OsString::new())).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_host_defaults_to_https_with_tls_material() {
        let pem = "-----BEGIN CERTIFICATE-----\nMIIB\n-----END CERTIFICATE-----\n";
        let with_ca = KubernetesConfig {
            host: Some("10.2.2.2:6443".to_string()),
            cluster_ca_certificate: Some(pem.to_string()),
            ..Default::default()
        };
        let with_client_cert = KubernetesConfig {
            host: Some("10.2.2.2:6443".to_string()),
            client_certificate: Some(pem.to_string()),
            ..Default::default()
        };

        for settings in [with_ca, with_client_cert] {
            let (patched, _) = apply_overrides(Kubeconfig::default(), &settings).unwrap();
            assert_eq!(
                cluster(&patched, GENERATED_ENTRY_NAME).server.as_deref(),
                Some("https://10.2.2.2:6443")
            );
        }
    }

    #[test]
    fn test_overrides_set_proxy_url() {
        let settings = KubernetesConfig {
            proxy_url: Some("http://proxy.example:3128".to_string()),
            ..Default::default()
        };

        let (patched, _) = apply_overrides(load(), &settings).unwrap();

        assert_eq!(
            cluster(&patched, "kind-local").proxy_url.as_deref(),
            Some("http://proxy.example:3128")
        );
        assert_eq!(cluster(&patched, "kind-remote").proxy_url, None);
    }
}
