//! HTTP service tests against a mock server

use artiform_repo::{
    HttpRepositoryService, ProviderConfig, RepoError, RepositoryService, ResourceRegistry,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const REPO_PATH: &str = "/artifactory/api/repositories/my-cargo";

fn token_config(server: &MockServer) -> ProviderConfig {
    ProviderConfig {
        access_token: Some("secret-token".to_string()),
        ..ProviderConfig::new(format!("{}/artifactory", server.uri()))
    }
}

fn service(server: &MockServer) -> HttpRepositoryService {
    HttpRepositoryService::new(&token_config(server)).unwrap()
}

fn cargo_response() -> serde_json::Value {
    json!({
        "key": "my-cargo",
        "rclass": "remote",
        "packageType": "cargo",
        "url": "https://crates.io",
        "gitRegistryUrl": "https://example.com/repo.git",
        "cargoAnonymousAccess": true,
        "description": null,
        "repoLayoutRef": "cargo-default",
        "xrayIndex": false,
        "socketTimeoutMillis": 15000
    })
}

mod requests {
    use super::*;

    #[tokio::test]
    async fn test_create_puts_then_reads_back() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path(REPO_PATH))
            .and(header("Authorization", "Bearer secret-token"))
            .and(body_partial_json(json!({
                "key": "my-cargo",
                "rclass": "remote",
                "packageType": "cargo",
                "gitRegistryUrl": "https://example.com/repo.git",
                "cargoAnonymousAccess": true
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(REPO_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(cargo_response()))
            .expect(1)
            .mount(&server)
            .await;

        let registry = ResourceRegistry::builtin().unwrap();
        let resource = registry.get("artifactory_remote_cargo_repository").unwrap();
        let mut data = resource
            .data_from_json(&json!({
                "key": "my-cargo",
                "url": "https://crates.io",
                "git_registry_url": "https://example.com/repo.git",
                "anonymous_access": true
            }))
            .unwrap();

        resource.create(&service(&server), &mut data).await.unwrap();

        assert_eq!(data.id(), Some("my-cargo"));
        assert_eq!(data.get_string("package_type", false).unwrap(), "cargo");
        assert_eq!(data.get_string("repo_layout_ref", false).unwrap(), "cargo-default");
        assert_eq!(data.get_int("socket_timeout_millis", false).unwrap(), 15000);
        // null in the response leaves the field at its zero value
        assert_eq!(data.get_string("description", true).unwrap(), "");
    }

    #[tokio::test]
    async fn test_update_posts_to_id() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(REPO_PATH))
            .and(body_partial_json(json!({ "notes": "moved" })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(REPO_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(cargo_response()))
            .mount(&server)
            .await;

        let registry = ResourceRegistry::builtin().unwrap();
        let resource = registry.get("artifactory_remote_cargo_repository").unwrap();
        let mut data = resource
            .data_from_json(&json!({
                "key": "my-cargo",
                "url": "https://crates.io",
                "git_registry_url": "https://example.com/repo.git",
                "notes": "moved"
            }))
            .unwrap();
        data.set_id("my-cargo");

        resource.update(&service(&server), &mut data).await.unwrap();
        assert_eq!(data.id(), Some("my-cargo"));
    }

    #[tokio::test]
    async fn test_delete_and_exists() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path(REPO_PATH))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .and(path(REPO_PATH))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/artifactory/api/repositories/gone"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let svc = service(&server);
        svc.delete_repository("my-cargo").await.unwrap();
        assert!(svc.repository_exists("my-cargo").await.unwrap());
        assert!(!svc.repository_exists("gone").await.unwrap());
    }

    #[tokio::test]
    async fn test_api_key_header() {
        let server = MockServer::start().await;

        Mock::given(method("HEAD"))
            .and(path(REPO_PATH))
            .and(header("X-JFrog-Art-Api", "key-123"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let config = ProviderConfig {
            api_key: Some("key-123".to_string()),
            ..ProviderConfig::new(format!("{}/artifactory", server.uri()))
        };
        let svc = HttpRepositoryService::new(&config).unwrap();
        assert!(svc.repository_exists("my-cargo").await.unwrap());
    }

    #[tokio::test]
    async fn test_basic_auth_header() {
        let server = MockServer::start().await;

        Mock::given(method("HEAD"))
            .and(path(REPO_PATH))
            .and(header("Authorization", "Basic dXNlcjpwYXNz"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let config = ProviderConfig {
            username: Some("user".to_string()),
            password: Some("pass".to_string()),
            ..ProviderConfig::new(format!("{}/artifactory", server.uri()))
        };
        let svc = HttpRepositoryService::new(&config).unwrap();
        assert!(svc.repository_exists("my-cargo").await.unwrap());
    }
}

mod errors {
    use super::*;

    #[tokio::test]
    async fn test_not_found_read_clears_id() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(REPO_PATH))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let registry = ResourceRegistry::builtin().unwrap();
        let resource = registry.get("artifactory_remote_cargo_repository").unwrap();
        let mut data = resource.import("my-cargo").unwrap();

        resource.read(&service(&server), &mut data).await.unwrap();
        assert_eq!(data.id(), None);
    }

    #[tokio::test]
    async fn test_delete_not_found_succeeds() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path(REPO_PATH))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let registry = ResourceRegistry::builtin().unwrap();
        let resource = registry.get("artifactory_remote_cargo_repository").unwrap();
        let data = resource.import("my-cargo").unwrap();

        resource.delete(&service(&server), &data).await.unwrap();
    }

    #[tokio::test]
    async fn test_server_message_passed_through() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path(REPO_PATH))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "errors": [{ "status": 400, "message": "Invalid git registry URL" }]
            })))
            .mount(&server)
            .await;

        let err = service(&server)
            .create_repository("my-cargo", &json!({ "key": "my-cargo" }))
            .await
            .unwrap_err();
        match err {
            RepoError::Remote { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Invalid git registry URL");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_failed_create_leaves_id_unset() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path(REPO_PATH))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let registry = ResourceRegistry::builtin().unwrap();
        let resource = registry.get("artifactory_remote_cargo_repository").unwrap();
        let mut data = resource
            .data_from_json(&json!({
                "key": "my-cargo",
                "url": "https://crates.io",
                "git_registry_url": "https://example.com/repo.git"
            }))
            .unwrap();

        let err = resource.create(&service(&server), &mut data).await.unwrap_err();
        assert!(err.to_string().contains("boom"));
        assert_eq!(data.id(), None);
    }

    #[tokio::test]
    async fn test_auth_statuses() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/artifactory/api/repositories/unauthorized"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/artifactory/api/repositories/forbidden"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/artifactory/api/repositories/busy"))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "7"))
            .mount(&server)
            .await;

        let svc = service(&server);
        assert!(matches!(
            svc.get_repository("unauthorized").await,
            Err(RepoError::AuthRequired { .. })
        ));
        assert!(matches!(
            svc.get_repository("forbidden").await,
            Err(RepoError::AuthFailed { .. })
        ));
        assert!(matches!(
            svc.get_repository("busy").await,
            Err(RepoError::RateLimited { retry_after: 7 })
        ));
    }

    #[tokio::test]
    async fn test_redirect_is_not_followed() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(REPO_PATH))
            .respond_with(
                ResponseTemplate::new(302).insert_header("Location", "https://elsewhere.example/"),
            )
            .mount(&server)
            .await;

        let err = service(&server).get_repository("my-cargo").await.unwrap_err();
        assert!(matches!(err, RepoError::Remote { status: 302, .. }));
    }
}
