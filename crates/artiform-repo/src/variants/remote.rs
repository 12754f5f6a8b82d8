//! Remote repository variants
//!
//! All remote variants share `base_remote_schema` (upstream URL, credentials,
//! proxy, caching periods) and declare only their package-type deltas.

use serde::{Deserialize, Serialize};

use artiform_core::{FieldSchema, ResourceData, Result, Schema, Validator, merge_schema};

use crate::crud::{Codec, RepositoryResource};
use crate::error::Result as RepoResult;
use crate::marshal::{pack_base_remote, unpack_base_remote};
use crate::model::RemoteRepositoryBaseParams;
use crate::schema::base_remote_schema;

pub const REMOTE_GENERIC: &str = "artifactory_remote_generic_repository";
pub const REMOTE_CARGO: &str = "artifactory_remote_cargo_repository";
pub const REMOTE_DOCKER: &str = "artifactory_remote_docker_repository";
pub const REMOTE_MAVEN: &str = "artifactory_remote_maven_repository";

// ============ Generic ============

pub fn unpack_remote_generic(d: &ResourceData) -> Result<(RemoteRepositoryBaseParams, String)> {
    let repo = unpack_base_remote(d, "generic")?;
    let key = repo.base.key.clone();
    Ok((repo, key))
}

pub fn pack_remote_generic(repo: &RemoteRepositoryBaseParams, d: &mut ResourceData) -> Result<()> {
    let mut w = d.writer();
    pack_base_remote(&mut w, repo);
    w.finish(REMOTE_GENERIC)
}

pub fn remote_generic_resource() -> RepoResult<RepositoryResource<RemoteRepositoryBaseParams>> {
    RepositoryResource::new(
        REMOTE_GENERIC,
        base_remote_schema(),
        Codec {
            unpack: unpack_remote_generic,
            pack: pack_remote_generic,
            blank: || RemoteRepositoryBaseParams::blank("generic"),
        },
    )
}

// ============ Cargo ============

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteCargoRepository {
    #[serde(flatten)]
    pub remote: RemoteRepositoryBaseParams,

    /// Index URL, a git repository
    #[serde(rename = "gitRegistryUrl")]
    pub registry_url: String,

    #[serde(rename = "cargoAnonymousAccess")]
    pub anonymous_access: bool,
}

pub fn remote_cargo_schema() -> Schema {
    let extra = Schema::new()
        .field(
            "git_registry_url",
            FieldSchema::string()
                .required()
                .validate(Validator::HttpUrl)
                .describe(
                    "Index URL, expected to be a git repository; \
                     for a remote server use `{url}/git/{repo key}.git`",
                ),
        )
        .field(
            "anonymous_access",
            FieldSchema::bool().optional().describe(
                "Let the cargo client download and search crates without credentials",
            ),
        );
    merge_schema(&base_remote_schema(), &extra)
}

pub fn unpack_remote_cargo(d: &ResourceData) -> Result<(RemoteCargoRepository, String)> {
    let repo = RemoteCargoRepository {
        remote: unpack_base_remote(d, "cargo")?,
        registry_url: d.get_string("git_registry_url", false)?,
        anonymous_access: d.get_bool("anonymous_access", true)?,
    };
    let key = repo.remote.base.key.clone();
    Ok((repo, key))
}

pub fn pack_remote_cargo(repo: &RemoteCargoRepository, d: &mut ResourceData) -> Result<()> {
    let mut w = d.writer();
    pack_base_remote(&mut w, &repo.remote);
    w.set("git_registry_url", &repo.registry_url)
        .set("anonymous_access", repo.anonymous_access);
    w.finish(REMOTE_CARGO)
}

pub fn remote_cargo_resource() -> RepoResult<RepositoryResource<RemoteCargoRepository>> {
    RepositoryResource::new(
        REMOTE_CARGO,
        remote_cargo_schema(),
        Codec {
            unpack: unpack_remote_cargo,
            pack: pack_remote_cargo,
            blank: || RemoteCargoRepository {
                remote: RemoteRepositoryBaseParams::blank("cargo"),
                ..Default::default()
            },
        },
    )
}

// ============ Docker ============

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RemoteDockerRepository {
    #[serde(flatten)]
    pub remote: RemoteRepositoryBaseParams,

    pub external_dependencies_enabled: bool,

    pub external_dependencies_patterns: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_token_authentication: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_pushing_schema1: Option<bool>,
}

pub fn remote_docker_schema() -> Schema {
    let extra = Schema::new()
        .field(
            "external_dependencies_enabled",
            FieldSchema::bool()
                .optional()
                .describe("Follow foreign layers referenced by image manifests"),
        )
        .field(
            "external_dependencies_patterns",
            FieldSchema::string_set().optional(),
        )
        .field(
            "enable_token_authentication",
            FieldSchema::bool().optional().computed(),
        )
        .field(
            "block_pushing_schema1",
            FieldSchema::bool().optional().computed(),
        );
    merge_schema(&base_remote_schema(), &extra)
}

pub fn unpack_remote_docker(d: &ResourceData) -> Result<(RemoteDockerRepository, String)> {
    let repo = RemoteDockerRepository {
        remote: unpack_base_remote(d, "docker")?,
        external_dependencies_enabled: d.get_bool("external_dependencies_enabled", true)?,
        external_dependencies_patterns: d.get_set("external_dependencies_patterns")?,
        enable_token_authentication: d.get_bool_ref("enable_token_authentication", true)?,
        block_pushing_schema1: d.get_bool_ref("block_pushing_schema1", true)?,
    };
    let key = repo.remote.base.key.clone();
    Ok((repo, key))
}

pub fn pack_remote_docker(repo: &RemoteDockerRepository, d: &mut ResourceData) -> Result<()> {
    let mut w = d.writer();
    pack_base_remote(&mut w, &repo.remote);
    w.set(
        "external_dependencies_enabled",
        repo.external_dependencies_enabled,
    )
    .set(
        "external_dependencies_patterns",
        &repo.external_dependencies_patterns,
    )
    .set("enable_token_authentication", repo.enable_token_authentication)
    .set("block_pushing_schema1", repo.block_pushing_schema1);
    w.finish(REMOTE_DOCKER)
}

pub fn remote_docker_resource() -> RepoResult<RepositoryResource<RemoteDockerRepository>> {
    RepositoryResource::new(
        REMOTE_DOCKER,
        remote_docker_schema(),
        Codec {
            unpack: unpack_remote_docker,
            pack: pack_remote_docker,
            blank: || RemoteDockerRepository {
                remote: RemoteRepositoryBaseParams::blank("docker"),
                ..Default::default()
            },
        },
    )
}

// ============ Maven ============

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RemoteMavenRepository {
    #[serde(flatten)]
    pub remote: RemoteRepositoryBaseParams,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetch_jars_eagerly: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetch_sources_eagerly: Option<bool>,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub remote_repo_checksum_policy_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle_releases: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle_snapshots: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub suppress_pom_consistency_checks: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reject_invalid_jars: Option<bool>,
}

pub fn remote_maven_schema() -> Schema {
    let extra = Schema::new()
        .field("fetch_jars_eagerly", FieldSchema::bool().optional().computed())
        .field(
            "fetch_sources_eagerly",
            FieldSchema::bool().optional().computed(),
        )
        .field(
            "remote_repo_checksum_policy_type",
            FieldSchema::string()
                .optional()
                .computed()
                .validate(Validator::one_of([
                    "generate-if-absent",
                    "fail",
                    "ignore-and-generate",
                    "pass-thru",
                ])),
        )
        .field("handle_releases", FieldSchema::bool().optional().computed())
        .field("handle_snapshots", FieldSchema::bool().optional().computed())
        .field(
            "suppress_pom_consistency_checks",
            FieldSchema::bool().optional().computed(),
        )
        .field("reject_invalid_jars", FieldSchema::bool().optional().computed());
    merge_schema(&base_remote_schema(), &extra)
}

pub fn unpack_remote_maven(d: &ResourceData) -> Result<(RemoteMavenRepository, String)> {
    let repo = RemoteMavenRepository {
        remote: unpack_base_remote(d, "maven")?,
        fetch_jars_eagerly: d.get_bool_ref("fetch_jars_eagerly", true)?,
        fetch_sources_eagerly: d.get_bool_ref("fetch_sources_eagerly", true)?,
        remote_repo_checksum_policy_type: d.get_string("remote_repo_checksum_policy_type", true)?,
        handle_releases: d.get_bool_ref("handle_releases", true)?,
        handle_snapshots: d.get_bool_ref("handle_snapshots", true)?,
        suppress_pom_consistency_checks: d.get_bool_ref("suppress_pom_consistency_checks", true)?,
        reject_invalid_jars: d.get_bool_ref("reject_invalid_jars", true)?,
    };
    let key = repo.remote.base.key.clone();
    Ok((repo, key))
}

pub fn pack_remote_maven(repo: &RemoteMavenRepository, d: &mut ResourceData) -> Result<()> {
    let mut w = d.writer();
    pack_base_remote(&mut w, &repo.remote);
    w.set("fetch_jars_eagerly", repo.fetch_jars_eagerly)
        .set("fetch_sources_eagerly", repo.fetch_sources_eagerly)
        .set(
            "remote_repo_checksum_policy_type",
            &repo.remote_repo_checksum_policy_type,
        )
        .set("handle_releases", repo.handle_releases)
        .set("handle_snapshots", repo.handle_snapshots)
        .set(
            "suppress_pom_consistency_checks",
            repo.suppress_pom_consistency_checks,
        )
        .set("reject_invalid_jars", repo.reject_invalid_jars);
    w.finish(REMOTE_MAVEN)
}

pub fn remote_maven_resource() -> RepoResult<RepositoryResource<RemoteMavenRepository>> {
    RepositoryResource::new(
        REMOTE_MAVEN,
        remote_maven_schema(),
        Codec {
            unpack: unpack_remote_maven,
            pack: pack_remote_maven,
            blank: || RemoteMavenRepository {
                remote: RemoteRepositoryBaseParams::blank("maven"),
                ..Default::default()
            },
        },
    )
}
