//! Shared schemas and validators
//!
//! Each class has a base schema; package-type variants merge their own
//! fields on top with [`merge_schema`](artiform_core::merge_schema). The
//! capability-block schemas are merged the same way, so a variant carrying
//! the docker block declares exactly the docker fields.

use artiform_core::{FieldSchema, Schema, Validator};
use regex::Regex;
use std::sync::LazyLock;

/// Repository keys: at most 64 characters, no leading digit
pub const REPO_KEY_PATTERN: &str = r"^[A-Za-z_.\-][A-Za-z0-9_.\-]{0,63}$";

static REPO_KEY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(REPO_KEY_PATTERN).unwrap());

/// Package types the server accepts
pub const PACKAGE_TYPES: &[&str] = &[
    "alpine",
    "bower",
    "cargo",
    "chef",
    "cocoapods",
    "composer",
    "conan",
    "conda",
    "cran",
    "debian",
    "docker",
    "gems",
    "generic",
    "gitlfs",
    "go",
    "gradle",
    "helm",
    "ivy",
    "maven",
    "npm",
    "nuget",
    "opkg",
    "p2",
    "pub",
    "puppet",
    "pypi",
    "rpm",
    "sbt",
    "swift",
    "terraform",
    "vagrant",
    "yum",
];

/// Whether `key` is a usable repository key
pub fn is_valid_repo_key(key: &str) -> bool {
    REPO_KEY_RE.is_match(key)
}

pub fn repo_key_validator() -> Validator {
    Validator::Pattern(REPO_KEY_PATTERN.to_string())
}

pub fn package_type_validator() -> Validator {
    Validator::one_of(PACKAGE_TYPES.iter().copied())
}

fn key_field() -> FieldSchema {
    FieldSchema::string()
        .required()
        .force_new()
        .validate(repo_key_validator())
        .describe("Repository key, unique across the server")
}

/// Package type as the server reports it; fixed by each typed variant
fn package_type_field() -> FieldSchema {
    FieldSchema::string().computed()
}

fn common_schema() -> Schema {
    Schema::new()
        .field("key", key_field())
        .field("package_type", package_type_field())
        .field("description", FieldSchema::string().optional())
        .field("notes", FieldSchema::string().optional())
        .field(
            "includes_pattern",
            FieldSchema::string()
                .optional()
                .computed()
                .describe("Comma-separated Ant patterns of artifacts to include"),
        )
        .field(
            "excludes_pattern",
            FieldSchema::string()
                .optional()
                .computed()
                .describe("Comma-separated Ant patterns of artifacts to exclude"),
        )
        .field(
            "repo_layout_ref",
            FieldSchema::string().optional().computed(),
        )
}

pub fn base_local_schema() -> Schema {
    common_schema()
        .field("blacked_out", FieldSchema::bool().optional().computed())
        .field("xray_index", FieldSchema::bool().optional().computed())
        .field("property_sets", FieldSchema::string_set().optional())
        .field("archive_browsing_enabled", FieldSchema::bool().optional())
}

pub fn base_remote_schema() -> Schema {
    common_schema()
        .field(
            "url",
            FieldSchema::string()
                .required()
                .validate(Validator::HttpUrl)
                .describe("URL of the upstream repository"),
        )
        .field("username", FieldSchema::string().optional())
        .field(
            "password",
            FieldSchema::string()
                .optional()
                .describe("Write-only; the server never returns it"),
        )
        .field("proxy", FieldSchema::string().optional())
        .field("hard_fail", FieldSchema::bool().optional().computed())
        .field("offline", FieldSchema::bool().optional().computed())
        .field("blacked_out", FieldSchema::bool().optional().computed())
        .field("xray_index", FieldSchema::bool().optional().computed())
        .field(
            "store_artifacts_locally",
            FieldSchema::bool().optional().computed(),
        )
        .field(
            "socket_timeout_millis",
            FieldSchema::int()
                .optional()
                .computed()
                .validate(Validator::AtLeast(0)),
        )
        .field("local_address", FieldSchema::string().optional())
        .field(
            "retrieval_cache_period_seconds",
            FieldSchema::int()
                .optional()
                .computed()
                .validate(Validator::AtLeast(0)),
        )
        .field(
            "missed_cache_period_seconds",
            FieldSchema::int()
                .optional()
                .computed()
                .validate(Validator::AtLeast(0)),
        )
        .field(
            "unused_artifacts_cleanup_period_hours",
            FieldSchema::int()
                .optional()
                .computed()
                .validate(Validator::AtLeast(0)),
        )
        .field(
            "assumed_offline_period_secs",
            FieldSchema::int()
                .optional()
                .computed()
                .validate(Validator::AtLeast(0)),
        )
        .field("share_configuration", FieldSchema::bool().optional().computed())
        .field(
            "synchronize_properties",
            FieldSchema::bool().optional().computed(),
        )
        .field(
            "block_mismatching_mime_types",
            FieldSchema::bool().optional().computed(),
        )
        .field("property_sets", FieldSchema::string_set().optional())
        .field("allow_any_host_auth", FieldSchema::bool().optional().computed())
        .field(
            "enable_cookie_management",
            FieldSchema::bool().optional().computed(),
        )
        .field("bypass_head_requests", FieldSchema::bool().optional().computed())
        .field(
            "client_tls_certificate",
            FieldSchema::string().optional().computed(),
        )
}

pub fn base_virtual_schema() -> Schema {
    common_schema()
        .field(
            "repositories",
            FieldSchema::string_set()
                .optional()
                .describe("Keys of the aggregated repositories, as a set: order is not kept"),
        )
        .field(
            "artifactory_requests_can_retrieve_remote_artifacts",
            FieldSchema::bool().optional().computed(),
        )
        .field(
            "default_deployment_repo",
            FieldSchema::string().optional(),
        )
}

// ============ Capability Blocks ============

pub fn maven_gradle_schema() -> Schema {
    Schema::new()
        .field("handle_releases", FieldSchema::bool().optional().computed())
        .field("handle_snapshots", FieldSchema::bool().optional().computed())
        .field(
            "max_unique_snapshots",
            FieldSchema::int()
                .optional()
                .computed()
                .validate(Validator::AtLeast(0)),
        )
        .field(
            "checksum_policy_type",
            FieldSchema::string()
                .optional()
                .computed()
                .validate(Validator::one_of([
                    "client-checksums",
                    "server-generated-checksums",
                ])),
        )
        .field(
            "snapshot_version_behavior",
            FieldSchema::string()
                .optional()
                .computed()
                .validate(Validator::one_of(["unique", "non-unique", "deployer"])),
        )
        .field(
            "suppress_pom_consistency_checks",
            FieldSchema::bool().optional().computed(),
        )
}

pub fn debian_schema() -> Schema {
    Schema::new().field("debian_trivial_layout", FieldSchema::bool().optional())
}

pub fn docker_schema() -> Schema {
    Schema::new()
        .field(
            "max_unique_tags",
            FieldSchema::int()
                .optional()
                .computed()
                .validate(Validator::AtLeast(0)),
        )
        .field(
            "docker_api_version",
            FieldSchema::string()
                .optional()
                .computed()
                .validate(Validator::one_of(["V1", "V2"])),
        )
}

pub fn rpm_schema() -> Schema {
    Schema::new()
        .field("calculate_yum_metadata", FieldSchema::bool().optional())
        .field(
            "yum_root_depth",
            FieldSchema::int().optional().validate(Validator::AtLeast(0)),
        )
        .field(
            "enable_file_lists_indexing",
            FieldSchema::bool().optional().computed(),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use artiform_core::SchemaValidator;

    #[test]
    fn test_repo_keys() {
        for key in ["libs-release", "_private", ".hidden", "a", "my.repo_1"] {
            assert!(is_valid_repo_key(key), "{key}");
        }
        let long = "x".repeat(65);
        for key in ["", "1libs", "has space", "slash/key", long.as_str()] {
            assert!(!is_valid_repo_key(key), "{key}");
        }
    }

    #[test]
    fn test_key_pattern_agrees_with_json_schema() {
        let validator = SchemaValidator::new(&base_local_schema()).unwrap();
        for key in ["libs-release", "1libs", "has space"] {
            let result = validator.validate(&serde_json::json!({ "key": key }));
            assert_eq!(result.is_valid, is_valid_repo_key(key), "{key}");
        }
    }

    #[test]
    fn test_base_schemas_share_common_fields() {
        for schema in [base_local_schema(), base_remote_schema(), base_virtual_schema()] {
            for field in ["key", "package_type", "description", "notes", "repo_layout_ref"] {
                assert!(schema.contains(field), "{field}");
            }
            assert_eq!(schema.required_fields()[0], "key");
        }
        assert_eq!(base_remote_schema().required_fields(), vec!["key", "url"]);
    }

    #[test]
    fn test_package_types_include_yum_alias() {
        assert!(PACKAGE_TYPES.contains(&"yum"));
        assert!(PACKAGE_TYPES.contains(&"rpm"));
        assert!(PACKAGE_TYPES.windows(2).all(|w| w[0] < w[1]));
    }
}
