//! Virtual repository variants
//!
//! A virtual repository aggregates other repositories under one key.

use serde::{Deserialize, Serialize};

use artiform_core::{FieldSchema, ResourceData, Result, Schema, Validator, merge_schema};

use crate::crud::{Codec, RepositoryResource};
use crate::error::Result as RepoResult;
use crate::marshal::{pack_base_virtual, unpack_base_virtual};
use crate::model::VirtualRepositoryBaseParams;
use crate::schema::base_virtual_schema;

pub const VIRTUAL_GENERIC: &str = "artifactory_virtual_generic_repository";
pub const VIRTUAL_MAVEN: &str = "artifactory_virtual_maven_repository";

// ============ Generic ============

pub fn unpack_virtual_generic(d: &ResourceData) -> Result<(VirtualRepositoryBaseParams, String)> {
    let repo = unpack_base_virtual(d, "generic")?;
    let key = repo.base.key.clone();
    Ok((repo, key))
}

pub fn pack_virtual_generic(repo: &VirtualRepositoryBaseParams, d: &mut ResourceData) -> Result<()> {
    let mut w = d.writer();
    pack_base_virtual(&mut w, repo);
    w.finish(VIRTUAL_GENERIC)
}

pub fn virtual_generic_resource() -> RepoResult<RepositoryResource<VirtualRepositoryBaseParams>> {
    RepositoryResource::new(
        VIRTUAL_GENERIC,
        base_virtual_schema(),
        Codec {
            unpack: unpack_virtual_generic,
            pack: pack_virtual_generic,
            blank: || VirtualRepositoryBaseParams::blank("generic"),
        },
    )
}

// ============ Maven ============

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VirtualMavenRepository {
    #[serde(flatten)]
    pub virtual_base: VirtualRepositoryBaseParams,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub force_maven_authentication: Option<bool>,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub pom_repository_references_cleanup_policy: String,

    pub key_pair: String,
}

pub fn virtual_maven_schema() -> Schema {
    let extra = Schema::new()
        .field(
            "force_maven_authentication",
            FieldSchema::bool()
                .optional()
                .computed()
                .describe("Require authentication for anonymous requests too"),
        )
        .field(
            "pom_repository_references_cleanup_policy",
            FieldSchema::string()
                .optional()
                .computed()
                .validate(Validator::one_of([
                    "discard_active_reference",
                    "discard_any_reference",
                    "nothing",
                ])),
        )
        .field(
            "key_pair",
            FieldSchema::string()
                .optional()
                .describe("Key pair used to sign metadata files"),
        );
    merge_schema(&base_virtual_schema(), &extra)
}

pub fn unpack_virtual_maven(d: &ResourceData) -> Result<(VirtualMavenRepository, String)> {
    let repo = VirtualMavenRepository {
        virtual_base: unpack_base_virtual(d, "maven")?,
        force_maven_authentication: d.get_bool_ref("force_maven_authentication", true)?,
        pom_repository_references_cleanup_policy: d
            .get_string("pom_repository_references_cleanup_policy", true)?,
        key_pair: d.get_string("key_pair", true)?,
    };
    let key = repo.virtual_base.base.key.clone();
    Ok((repo, key))
}

pub fn pack_virtual_maven(repo: &VirtualMavenRepository, d: &mut ResourceData) -> Result<()> {
    let mut w = d.writer();
    pack_base_virtual(&mut w, &repo.virtual_base);
    w.set("force_maven_authentication", repo.force_maven_authentication)
        .set(
            "pom_repository_references_cleanup_policy",
            &repo.pom_repository_references_cleanup_policy,
        )
        .set("key_pair", &repo.key_pair);
    w.finish(VIRTUAL_MAVEN)
}

pub fn virtual_maven_resource() -> RepoResult<RepositoryResource<VirtualMavenRepository>> {
    RepositoryResource::new(
        VIRTUAL_MAVEN,
        virtual_maven_schema(),
        Codec {
            unpack: unpack_virtual_maven,
            pack: pack_virtual_maven,
            blank: || VirtualMavenRepository {
                virtual_base: VirtualRepositoryBaseParams::blank("maven"),
                ..Default::default()
            },
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_repositories_sorted_on_the_wire() {
        let d = ResourceData::from_json(
            Arc::new(virtual_maven_schema()),
            &json!({
                "key": "maven-all",
                "repositories": ["remote-central", "libs-release", "libs-release"],
                "pom_repository_references_cleanup_policy": "nothing"
            }),
        )
        .unwrap();

        let (repo, _) = unpack_virtual_maven(&d).unwrap();
        let body = serde_json::to_value(&repo).unwrap();
        assert_eq!(body["rclass"], "virtual");
        assert_eq!(body["packageType"], "maven");
        assert_eq!(body["repositories"], json!(["libs-release", "remote-central"]));
        assert_eq!(body["pomRepositoryReferencesCleanupPolicy"], "nothing");
    }
}
