//! Local repository variants
//!
//! `artifactory_local_repository` is the broad legacy type: the package type
//! is a user field and every capability block is present whatever the type.
//! The typed variants fix the package type and carry only their own blocks.

use serde::{Deserialize, Serialize};

use artiform_core::{FieldSchema, ResourceData, Result, Schema, merge_schema};

use crate::crud::{Codec, RepositoryResource};
use crate::error::Result as RepoResult;
use crate::marshal::{
    pack_base_local, pack_debian, pack_docker, pack_maven_gradle, pack_rpm, unpack_base_local,
    unpack_debian, unpack_docker, unpack_maven_gradle, unpack_rpm,
};
use crate::model::{DebianParams, DockerParams, LocalRepositoryBaseParams, MavenGradleParams, RpmParams};
use crate::schema::{
    base_local_schema, debian_schema, docker_schema, maven_gradle_schema, package_type_validator,
    rpm_schema,
};

pub const LOCAL: &str = "artifactory_local_repository";
pub const LOCAL_GENERIC: &str = "artifactory_local_generic_repository";
pub const LOCAL_MAVEN: &str = "artifactory_local_maven_repository";
pub const LOCAL_GRADLE: &str = "artifactory_local_gradle_repository";
pub const LOCAL_DEBIAN: &str = "artifactory_local_debian_repository";
pub const LOCAL_DOCKER: &str = "artifactory_local_docker_repository";
pub const LOCAL_RPM: &str = "artifactory_local_rpm_repository";

/// Package type used when the legacy variant leaves it empty
const DEFAULT_PACKAGE_TYPE: &str = "generic";

// ============ Legacy Local ============

/// Every local capability in one record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegacyLocalRepository {
    #[serde(flatten)]
    pub local: LocalRepositoryBaseParams,

    #[serde(flatten)]
    pub maven: MavenGradleParams,

    #[serde(flatten)]
    pub debian: DebianParams,

    #[serde(flatten)]
    pub docker: DockerParams,

    #[serde(flatten)]
    pub rpm: RpmParams,

    pub force_nuget_authentication: bool,
}

pub fn legacy_local_schema() -> Schema {
    let blocks = [maven_gradle_schema(), debian_schema(), docker_schema(), rpm_schema()]
        .iter()
        .fold(Schema::new(), |acc, block| merge_schema(&acc, block));

    let extra = blocks
        .field(
            "package_type",
            FieldSchema::string()
                .optional()
                .computed()
                .force_new()
                .validate(package_type_validator())
                // the server stores yum repositories as rpm
                .canonical_alias("yum", "rpm"),
        )
        .field(
            "force_nuget_authentication",
            FieldSchema::bool().optional().computed(),
        );

    merge_schema(&base_local_schema(), &extra)
}

pub fn unpack_legacy_local(d: &ResourceData) -> Result<(LegacyLocalRepository, String)> {
    let package_type = d.get_string("package_type", true)?;
    let package_type = if package_type.is_empty() {
        DEFAULT_PACKAGE_TYPE.to_string()
    } else {
        package_type
    };

    let repo = LegacyLocalRepository {
        local: unpack_base_local(d, &package_type)?,
        maven: unpack_maven_gradle(d)?,
        debian: unpack_debian(d)?,
        docker: unpack_docker(d)?,
        rpm: unpack_rpm(d)?,
        force_nuget_authentication: d.get_bool("force_nuget_authentication", true)?,
    };
    let key = repo.local.base.key.clone();
    Ok((repo, key))
}

pub fn pack_legacy_local(repo: &LegacyLocalRepository, d: &mut ResourceData) -> Result<()> {
    let mut w = d.writer();
    pack_base_local(&mut w, &repo.local);
    pack_maven_gradle(&mut w, &repo.maven);
    pack_debian(&mut w, &repo.debian);
    pack_docker(&mut w, &repo.docker);
    pack_rpm(&mut w, &repo.rpm);
    w.set("force_nuget_authentication", repo.force_nuget_authentication);
    w.finish(LOCAL)
}

/// The package type is whatever the server reports
fn blank_legacy_local() -> LegacyLocalRepository {
    LegacyLocalRepository {
        local: LocalRepositoryBaseParams::blank(""),
        ..Default::default()
    }
}

pub fn legacy_local_resource() -> RepoResult<RepositoryResource<LegacyLocalRepository>> {
    RepositoryResource::new(
        LOCAL,
        legacy_local_schema(),
        Codec {
            unpack: unpack_legacy_local,
            pack: pack_legacy_local,
            blank: blank_legacy_local,
        },
    )
}

// ============ Generic ============

pub fn unpack_local_generic(d: &ResourceData) -> Result<(LocalRepositoryBaseParams, String)> {
    let repo = unpack_base_local(d, "generic")?;
    let key = repo.base.key.clone();
    Ok((repo, key))
}

pub fn pack_local_generic(repo: &LocalRepositoryBaseParams, d: &mut ResourceData) -> Result<()> {
    let mut w = d.writer();
    pack_base_local(&mut w, repo);
    w.finish(LOCAL_GENERIC)
}

pub fn local_generic_resource() -> RepoResult<RepositoryResource<LocalRepositoryBaseParams>> {
    RepositoryResource::new(
        LOCAL_GENERIC,
        base_local_schema(),
        Codec {
            unpack: unpack_local_generic,
            pack: pack_local_generic,
            blank: || LocalRepositoryBaseParams::blank("generic"),
        },
    )
}

// ============ Maven / Gradle ============

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocalMavenGradleRepository {
    #[serde(flatten)]
    pub local: LocalRepositoryBaseParams,

    #[serde(flatten)]
    pub maven: MavenGradleParams,
}

fn unpack_maven_like(
    d: &ResourceData,
    package_type: &str,
) -> Result<(LocalMavenGradleRepository, String)> {
    let repo = LocalMavenGradleRepository {
        local: unpack_base_local(d, package_type)?,
        maven: unpack_maven_gradle(d)?,
    };
    let key = repo.local.base.key.clone();
    Ok((repo, key))
}

fn pack_maven_like(
    repo: &LocalMavenGradleRepository,
    d: &mut ResourceData,
    resource: &str,
) -> Result<()> {
    let mut w = d.writer();
    pack_base_local(&mut w, &repo.local);
    pack_maven_gradle(&mut w, &repo.maven);
    w.finish(resource)
}

pub fn unpack_local_maven(d: &ResourceData) -> Result<(LocalMavenGradleRepository, String)> {
    unpack_maven_like(d, "maven")
}

pub fn pack_local_maven(repo: &LocalMavenGradleRepository, d: &mut ResourceData) -> Result<()> {
    pack_maven_like(repo, d, LOCAL_MAVEN)
}

pub fn unpack_local_gradle(d: &ResourceData) -> Result<(LocalMavenGradleRepository, String)> {
    unpack_maven_like(d, "gradle")
}

pub fn pack_local_gradle(repo: &LocalMavenGradleRepository, d: &mut ResourceData) -> Result<()> {
    pack_maven_like(repo, d, LOCAL_GRADLE)
}

fn local_maven_gradle_schema() -> Schema {
    merge_schema(&base_local_schema(), &maven_gradle_schema())
}

pub fn local_maven_resource() -> RepoResult<RepositoryResource<LocalMavenGradleRepository>> {
    RepositoryResource::new(
        LOCAL_MAVEN,
        local_maven_gradle_schema(),
        Codec {
            unpack: unpack_local_maven,
            pack: pack_local_maven,
            blank: || LocalMavenGradleRepository {
                local: LocalRepositoryBaseParams::blank("maven"),
                ..Default::default()
            },
        },
    )
}

pub fn local_gradle_resource() -> RepoResult<RepositoryResource<LocalMavenGradleRepository>> {
    RepositoryResource::new(
        LOCAL_GRADLE,
        local_maven_gradle_schema(),
        Codec {
            unpack: unpack_local_gradle,
            pack: pack_local_gradle,
            blank: || LocalMavenGradleRepository {
                local: LocalRepositoryBaseParams::blank("gradle"),
                ..Default::default()
            },
        },
    )
}

// ============ Debian ============

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocalDebianRepository {
    #[serde(flatten)]
    pub local: LocalRepositoryBaseParams,

    #[serde(flatten)]
    pub debian: DebianParams,

    pub index_compression_formats: Vec<String>,

    pub primary_keypair_ref: String,
}

pub fn local_debian_schema() -> Schema {
    let extra = debian_schema()
        .field(
            "index_compression_formats",
            FieldSchema::string_set()
                .optional()
                .describe("Index file formats to generate, e.g. bz2, lzma, xz"),
        )
        .field("primary_keypair_ref", FieldSchema::string().optional());
    merge_schema(&base_local_schema(), &extra)
}

pub fn unpack_local_debian(d: &ResourceData) -> Result<(LocalDebianRepository, String)> {
    let repo = LocalDebianRepository {
        local: unpack_base_local(d, "debian")?,
        debian: unpack_debian(d)?,
        index_compression_formats: d.get_set("index_compression_formats")?,
        primary_keypair_ref: d.get_string("primary_keypair_ref", true)?,
    };
    let key = repo.local.base.key.clone();
    Ok((repo, key))
}

pub fn pack_local_debian(repo: &LocalDebianRepository, d: &mut ResourceData) -> Result<()> {
    let mut w = d.writer();
    pack_base_local(&mut w, &repo.local);
    pack_debian(&mut w, &repo.debian);
    w.set("index_compression_formats", &repo.index_compression_formats)
        .set("primary_keypair_ref", &repo.primary_keypair_ref);
    w.finish(LOCAL_DEBIAN)
}

pub fn local_debian_resource() -> RepoResult<RepositoryResource<LocalDebianRepository>> {
    RepositoryResource::new(
        LOCAL_DEBIAN,
        local_debian_schema(),
        Codec {
            unpack: unpack_local_debian,
            pack: pack_local_debian,
            blank: || LocalDebianRepository {
                local: LocalRepositoryBaseParams::blank("debian"),
                ..Default::default()
            },
        },
    )
}

// ============ Docker ============

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocalDockerRepository {
    #[serde(flatten)]
    pub local: LocalRepositoryBaseParams,

    #[serde(flatten)]
    pub docker: DockerParams,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_pushing_schema1: Option<bool>,
}

pub fn local_docker_schema() -> Schema {
    let extra = docker_schema().field(
        "block_pushing_schema1",
        FieldSchema::bool().optional().computed(),
    );
    merge_schema(&base_local_schema(), &extra)
}

pub fn unpack_local_docker(d: &ResourceData) -> Result<(LocalDockerRepository, String)> {
    let repo = LocalDockerRepository {
        local: unpack_base_local(d, "docker")?,
        docker: unpack_docker(d)?,
        block_pushing_schema1: d.get_bool_ref("block_pushing_schema1", true)?,
    };
    let key = repo.local.base.key.clone();
    Ok((repo, key))
}

pub fn pack_local_docker(repo: &LocalDockerRepository, d: &mut ResourceData) -> Result<()> {
    let mut w = d.writer();
    pack_base_local(&mut w, &repo.local);
    pack_docker(&mut w, &repo.docker);
    w.set("block_pushing_schema1", repo.block_pushing_schema1);
    w.finish(LOCAL_DOCKER)
}

pub fn local_docker_resource() -> RepoResult<RepositoryResource<LocalDockerRepository>> {
    RepositoryResource::new(
        LOCAL_DOCKER,
        local_docker_schema(),
        Codec {
            unpack: unpack_local_docker,
            pack: pack_local_docker,
            blank: || LocalDockerRepository {
                local: LocalRepositoryBaseParams::blank("docker"),
                ..Default::default()
            },
        },
    )
}

// ============ RPM ============

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocalRpmRepository {
    #[serde(flatten)]
    pub local: LocalRepositoryBaseParams,

    #[serde(flatten)]
    pub rpm: RpmParams,

    pub yum_group_file_names: String,
}

pub fn local_rpm_schema() -> Schema {
    let extra = rpm_schema().field(
        "yum_group_file_names",
        FieldSchema::string()
            .optional()
            .describe("Comma-separated list of YUM group files"),
    );
    merge_schema(&base_local_schema(), &extra)
}

pub fn unpack_local_rpm(d: &ResourceData) -> Result<(LocalRpmRepository, String)> {
    let repo = LocalRpmRepository {
        local: unpack_base_local(d, "rpm")?,
        rpm: unpack_rpm(d)?,
        yum_group_file_names: d.get_string("yum_group_file_names", true)?,
    };
    let key = repo.local.base.key.clone();
    Ok((repo, key))
}

pub fn pack_local_rpm(repo: &LocalRpmRepository, d: &mut ResourceData) -> Result<()> {
    let mut w = d.writer();
    pack_base_local(&mut w, &repo.local);
    pack_rpm(&mut w, &repo.rpm);
    w.set("yum_group_file_names", &repo.yum_group_file_names);
    w.finish(LOCAL_RPM)
}

pub fn local_rpm_resource() -> RepoResult<RepositoryResource<LocalRpmRepository>> {
    RepositoryResource::new(
        LOCAL_RPM,
        local_rpm_schema(),
        Codec {
            unpack: unpack_local_rpm,
            pack: pack_local_rpm,
            blank: || LocalRpmRepository {
                local: LocalRepositoryBaseParams::blank("rpm"),
                ..Default::default()
            },
        },
    )
}
