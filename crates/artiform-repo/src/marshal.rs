//! Unpack and pack helpers for the shared blocks
//!
//! Variants build their models from these: an unpack helper reads exactly the
//! fields its block's schema declares, and the matching pack helper writes the
//! same fields back through a [`StateWriter`]. Write errors accumulate in the
//! writer; the variant calls `finish` once every block has been written.

use artiform_core::{ResourceData, Result, StateWriter};

use crate::model::{
    DebianParams, DockerParams, LocalRepositoryBaseParams, MavenGradleParams, RemoteRepositoryBaseParams,
    RepositoryBaseParams, RepositoryClass, RpmParams, VirtualRepositoryBaseParams,
};

/// Read the common fields; discriminators come from the caller, never from data
pub fn unpack_base(
    d: &ResourceData,
    rclass: RepositoryClass,
    package_type: &str,
) -> Result<RepositoryBaseParams> {
    Ok(RepositoryBaseParams {
        key: d.get_string("key", false)?,
        rclass,
        package_type: package_type.to_string(),
        description: d.get_string("description", true)?,
        notes: d.get_string("notes", true)?,
        includes_pattern: d.get_string("includes_pattern", true)?,
        excludes_pattern: d.get_string("excludes_pattern", true)?,
        repo_layout_ref: d.get_string("repo_layout_ref", true)?,
    })
}

pub fn pack_base(w: &mut StateWriter<'_>, repo: &RepositoryBaseParams) {
    w.set("key", &repo.key)
        .set("package_type", &repo.package_type)
        .set("description", &repo.description)
        .set("notes", &repo.notes)
        .set("includes_pattern", &repo.includes_pattern)
        .set("excludes_pattern", &repo.excludes_pattern)
        .set("repo_layout_ref", &repo.repo_layout_ref);
}

// ============ Class Bases ============

pub fn unpack_base_local(d: &ResourceData, package_type: &str) -> Result<LocalRepositoryBaseParams> {
    Ok(LocalRepositoryBaseParams {
        base: unpack_base(d, RepositoryClass::Local, package_type)?,
        blacked_out: d.get_bool_ref("blacked_out", true)?,
        xray_index: d.get_bool_ref("xray_index", true)?,
        property_sets: d.get_set("property_sets")?,
        archive_browsing_enabled: d.get_bool_ref("archive_browsing_enabled", true)?,
    })
}

pub fn pack_base_local(w: &mut StateWriter<'_>, repo: &LocalRepositoryBaseParams) {
    pack_base(w, &repo.base);
    w.set("blacked_out", repo.blacked_out)
        .set("xray_index", repo.xray_index)
        .set("property_sets", &repo.property_sets)
        .set("archive_browsing_enabled", repo.archive_browsing_enabled);
}

pub fn unpack_base_remote(
    d: &ResourceData,
    package_type: &str,
) -> Result<RemoteRepositoryBaseParams> {
    Ok(RemoteRepositoryBaseParams {
        base: unpack_base(d, RepositoryClass::Remote, package_type)?,
        url: d.get_string("url", false)?,
        username: d.get_string("username", true)?,
        password: d.get_string("password", true)?,
        proxy: d.get_string("proxy", true)?,
        hard_fail: d.get_bool_ref("hard_fail", true)?,
        offline: d.get_bool_ref("offline", true)?,
        blacked_out: d.get_bool_ref("blacked_out", true)?,
        xray_index: d.get_bool_ref("xray_index", true)?,
        store_artifacts_locally: d.get_bool_ref("store_artifacts_locally", true)?,
        socket_timeout_millis: d.get_int("socket_timeout_millis", true)?,
        local_address: d.get_string("local_address", true)?,
        retrieval_cache_period_seconds: d.get_int("retrieval_cache_period_seconds", true)?,
        missed_cache_period_seconds: d.get_int("missed_cache_period_seconds", true)?,
        unused_artifacts_cleanup_period_hours: d
            .get_int("unused_artifacts_cleanup_period_hours", true)?,
        assumed_offline_period_secs: d.get_int("assumed_offline_period_secs", true)?,
        share_configuration: d.get_bool_ref("share_configuration", true)?,
        synchronize_properties: d.get_bool_ref("synchronize_properties", true)?,
        block_mismatching_mime_types: d.get_bool_ref("block_mismatching_mime_types", true)?,
        property_sets: d.get_set("property_sets")?,
        allow_any_host_auth: d.get_bool_ref("allow_any_host_auth", true)?,
        enable_cookie_management: d.get_bool_ref("enable_cookie_management", true)?,
        bypass_head_requests: d.get_bool_ref("bypass_head_requests", true)?,
        client_tls_certificate: d.get_string("client_tls_certificate", true)?,
    })
}

/// `password` is left alone: the server masks it, so state keeps what was configured
pub fn pack_base_remote(w: &mut StateWriter<'_>, repo: &RemoteRepositoryBaseParams) {
    pack_base(w, &repo.base);
    w.set("url", &repo.url)
        .set("username", &repo.username)
        .set("proxy", &repo.proxy)
        .set("hard_fail", repo.hard_fail)
        .set("offline", repo.offline)
        .set("blacked_out", repo.blacked_out)
        .set("xray_index", repo.xray_index)
        .set("store_artifacts_locally", repo.store_artifacts_locally)
        .set("socket_timeout_millis", repo.socket_timeout_millis)
        .set("local_address", &repo.local_address)
        .set("retrieval_cache_period_seconds", repo.retrieval_cache_period_seconds)
        .set("missed_cache_period_seconds", repo.missed_cache_period_seconds)
        .set(
            "unused_artifacts_cleanup_period_hours",
            repo.unused_artifacts_cleanup_period_hours,
        )
        .set("assumed_offline_period_secs", repo.assumed_offline_period_secs)
        .set("share_configuration", repo.share_configuration)
        .set("synchronize_properties", repo.synchronize_properties)
        .set("block_mismatching_mime_types", repo.block_mismatching_mime_types)
        .set("property_sets", &repo.property_sets)
        .set("allow_any_host_auth", repo.allow_any_host_auth)
        .set("enable_cookie_management", repo.enable_cookie_management)
        .set("bypass_head_requests", repo.bypass_head_requests)
        .set("client_tls_certificate", &repo.client_tls_certificate);
}

pub fn unpack_base_virtual(
    d: &ResourceData,
    package_type: &str,
) -> Result<VirtualRepositoryBaseParams> {
    Ok(VirtualRepositoryBaseParams {
        base: unpack_base(d, RepositoryClass::Virtual, package_type)?,
        repositories: d.get_set("repositories")?,
        artifactory_requests_can_retrieve_remote_artifacts: d
            .get_bool_ref("artifactory_requests_can_retrieve_remote_artifacts", true)?,
        default_deployment_repo: d.get_string("default_deployment_repo", true)?,
    })
}

pub fn pack_base_virtual(w: &mut StateWriter<'_>, repo: &VirtualRepositoryBaseParams) {
    pack_base(w, &repo.base);
    w.set("repositories", &repo.repositories)
        .set(
            "artifactory_requests_can_retrieve_remote_artifacts",
            repo.artifactory_requests_can_retrieve_remote_artifacts,
        )
        .set("default_deployment_repo", &repo.default_deployment_repo);
}

// ============ Capability Blocks ============

pub fn unpack_maven_gradle(d: &ResourceData) -> Result<MavenGradleParams> {
    Ok(MavenGradleParams {
        handle_releases: d.get_bool_ref("handle_releases", true)?,
        handle_snapshots: d.get_bool_ref("handle_snapshots", true)?,
        max_unique_snapshots: d.get_int("max_unique_snapshots", true)?,
        checksum_policy_type: d.get_string("checksum_policy_type", true)?,
        snapshot_version_behavior: d.get_string("snapshot_version_behavior", true)?,
        suppress_pom_consistency_checks: d.get_bool_ref("suppress_pom_consistency_checks", true)?,
    })
}

pub fn pack_maven_gradle(w: &mut StateWriter<'_>, block: &MavenGradleParams) {
    w.set("handle_releases", block.handle_releases)
        .set("handle_snapshots", block.handle_snapshots)
        .set("max_unique_snapshots", block.max_unique_snapshots)
        .set("checksum_policy_type", &block.checksum_policy_type)
        .set("snapshot_version_behavior", &block.snapshot_version_behavior)
        .set(
            "suppress_pom_consistency_checks",
            block.suppress_pom_consistency_checks,
        );
}

pub fn unpack_debian(d: &ResourceData) -> Result<DebianParams> {
    Ok(DebianParams {
        debian_trivial_layout: d.get_bool_ref("debian_trivial_layout", true)?,
    })
}

pub fn pack_debian(w: &mut StateWriter<'_>, block: &DebianParams) {
    w.set("debian_trivial_layout", block.debian_trivial_layout);
}

pub fn unpack_docker(d: &ResourceData) -> Result<DockerParams> {
    Ok(DockerParams {
        max_unique_tags: d.get_int("max_unique_tags", true)?,
        docker_api_version: d.get_string("docker_api_version", true)?,
    })
}

pub fn pack_docker(w: &mut StateWriter<'_>, block: &DockerParams) {
    w.set("max_unique_tags", block.max_unique_tags)
        .set("docker_api_version", &block.docker_api_version);
}

pub fn unpack_rpm(d: &ResourceData) -> Result<RpmParams> {
    Ok(RpmParams {
        calculate_yum_metadata: d.get_bool_ref("calculate_yum_metadata", true)?,
        yum_root_depth: d.get_int("yum_root_depth", true)?,
        enable_file_lists_indexing: d.get_bool_ref("enable_file_lists_indexing", true)?,
    })
}

pub fn pack_rpm(w: &mut StateWriter<'_>, block: &RpmParams) {
    w.set("calculate_yum_metadata", block.calculate_yum_metadata)
        .set("yum_root_depth", block.yum_root_depth)
        .set("enable_file_lists_indexing", block.enable_file_lists_indexing);
}
