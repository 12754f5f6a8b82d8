//! Wire models shared by every repository variant
//!
//! Models mirror the server's camelCase JSON. Each variant is assembled from
//! a class base block (local, remote, virtual) and zero or more capability
//! blocks, joined with `#[serde(flatten)]`.
//!
//! Every struct deserializes with `#[serde(default)]`: the server omits
//! fields it considers unset, and a read overlays its response onto a blank
//! model anyway.
//!
//! Updates merge into the stored configuration, so user-settable fields are
//! always serialized: an empty value is what clears a field the user removed.
//! Only three-state flags and server-computed fields are skipped when unset.

use serde::{Deserialize, Serialize};

/// Class discriminator (`rclass` on the wire)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepositoryClass {
    #[default]
    Local,
    Remote,
    Virtual,
}

impl RepositoryClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepositoryClass::Local => "local",
            RepositoryClass::Remote => "remote",
            RepositoryClass::Virtual => "virtual",
        }
    }
}

impl std::fmt::Display for RepositoryClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_zero(n: &i64) -> bool {
    *n == 0
}

/// Parameters every repository carries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RepositoryBaseParams {
    /// Repository key, also the resource identifier
    pub key: String,

    pub rclass: RepositoryClass,

    pub package_type: String,

    pub description: String,

    pub notes: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub includes_pattern: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub excludes_pattern: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub repo_layout_ref: String,
}

impl RepositoryBaseParams {
    /// Base block with only the discriminators filled in
    pub fn blank(rclass: RepositoryClass, package_type: &str) -> Self {
        Self {
            rclass,
            package_type: package_type.to_string(),
            ..Default::default()
        }
    }
}

// ============ Class Base Blocks ============

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocalRepositoryBaseParams {
    #[serde(flatten)]
    pub base: RepositoryBaseParams,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub blacked_out: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub xray_index: Option<bool>,

    pub property_sets: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive_browsing_enabled: Option<bool>,
}

impl LocalRepositoryBaseParams {
    pub fn blank(package_type: &str) -> Self {
        Self {
            base: RepositoryBaseParams::blank(RepositoryClass::Local, package_type),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RemoteRepositoryBaseParams {
    #[serde(flatten)]
    pub base: RepositoryBaseParams,

    pub url: String,

    pub username: String,

    /// Write-only: the server never returns the real value
    pub password: String,

    pub proxy: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hard_fail: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub offline: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub blacked_out: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub xray_index: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_artifacts_locally: Option<bool>,

    #[serde(skip_serializing_if = "is_zero")]
    pub socket_timeout_millis: i64,

    pub local_address: String,

    #[serde(rename = "retrievalCachePeriodSecs", skip_serializing_if = "is_zero")]
    pub retrieval_cache_period_seconds: i64,

    #[serde(rename = "missedRetrievalCachePeriodSecs", skip_serializing_if = "is_zero")]
    pub missed_cache_period_seconds: i64,

    #[serde(skip_serializing_if = "is_zero")]
    pub unused_artifacts_cleanup_period_hours: i64,

    #[serde(skip_serializing_if = "is_zero")]
    pub assumed_offline_period_secs: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_configuration: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub synchronize_properties: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_mismatching_mime_types: Option<bool>,

    pub property_sets: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_any_host_auth: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_cookie_management: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bypass_head_requests: Option<bool>,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub client_tls_certificate: String,
}

impl RemoteRepositoryBaseParams {
    pub fn blank(package_type: &str) -> Self {
        Self {
            base: RepositoryBaseParams::blank(RepositoryClass::Remote, package_type),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VirtualRepositoryBaseParams {
    #[serde(flatten)]
    pub base: RepositoryBaseParams,

    /// Aggregated repository keys, sorted and deduplicated. Declaration order
    /// is not preserved, so it cannot express resolution priority.
    pub repositories: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifactory_requests_can_retrieve_remote_artifacts: Option<bool>,

    pub default_deployment_repo: String,
}

impl VirtualRepositoryBaseParams {
    pub fn blank(package_type: &str) -> Self {
        Self {
            base: RepositoryBaseParams::blank(RepositoryClass::Virtual, package_type),
            ..Default::default()
        }
    }
}

// ============ Capability Blocks ============

/// Maven and gradle layout handling on local repositories
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MavenGradleParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle_releases: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle_snapshots: Option<bool>,

    #[serde(skip_serializing_if = "is_zero")]
    pub max_unique_snapshots: i64,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub checksum_policy_type: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub snapshot_version_behavior: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub suppress_pom_consistency_checks: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DebianParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debian_trivial_layout: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DockerParams {
    #[serde(skip_serializing_if = "is_zero")]
    pub max_unique_tags: i64,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub docker_api_version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RpmParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calculate_yum_metadata: Option<bool>,

    pub yum_root_depth: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_file_lists_indexing: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_blank_carries_discriminators_and_empty_settable_fields() {
        let blank = RemoteRepositoryBaseParams::blank("cargo");
        let json = serde_json::to_value(&blank).unwrap();
        assert_eq!(
            json,
            json!({
                "key": "",
                "rclass": "remote",
                "packageType": "cargo",
                "description": "",
                "notes": "",
                "url": "",
                "username": "",
                "password": "",
                "proxy": "",
                "localAddress": "",
                "propertySets": []
            })
        );
    }

    #[test]
    fn test_flattened_wire_names() {
        let repo = LocalRepositoryBaseParams {
            base: RepositoryBaseParams {
                key: "libs".into(),
                rclass: RepositoryClass::Local,
                package_type: "maven".into(),
                repo_layout_ref: "maven-2-default".into(),
                ..Default::default()
            },
            xray_index: Some(false),
            property_sets: vec!["artifactory".into()],
            ..Default::default()
        };
        let json = serde_json::to_value(&repo).unwrap();
        assert_eq!(json["repoLayoutRef"], "maven-2-default");
        assert_eq!(json["xrayIndex"], false);
        assert_eq!(json["propertySets"], json!(["artifactory"]));
        assert!(json.get("blackedOut").is_none());
        assert!(json.get("includesPattern").is_none());
        assert_eq!(json["notes"], "");
    }

    #[test]
    fn test_missing_fields_default() {
        let repo: RemoteRepositoryBaseParams = serde_json::from_value(json!({
            "key": "central",
            "rclass": "remote",
            "packageType": "maven",
            "url": "https://repo1.maven.org/maven2",
            "retrievalCachePeriodSecs": 7200
        }))
        .unwrap();
        assert_eq!(repo.base.key, "central");
        assert_eq!(repo.retrieval_cache_period_seconds, 7200);
        assert_eq!(repo.offline, None);
        assert!(repo.password.is_empty());
    }
}
