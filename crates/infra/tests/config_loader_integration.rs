//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading configuration from files and
//! building the tenant registry from it.

use std::io::Write;

use helpdesk_domain::{HelpdeskError, Revision};
use helpdesk_infra::{config, TenantRegistry};
use tempfile::NamedTempFile;

fn temp_config(contents: &str, extension: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(&format!(".{extension}"))
        .tempfile()
        .expect("Failed to create temp file");
    file.write_all(contents.as_bytes()).expect("Failed to write to temp file");
    file
}

#[test]
fn test_load_config_from_json_file() {
    let file = temp_config(
        r#"{
            "server": { "bind": "0.0.0.0:9000", "service_prefix": "rest:ext:desk" },
            "http": { "timeout_ms": 2500, "pagination_backoff_ms": 0 },
            "helpdesk": {
                "acme": {
                    "baseUrl": "https://acme.example",
                    "revision": "v2",
                    "publicKey": "acme-pub",
                    "privateKey": "acme-sec"
                }
            }
        }"#,
        "json",
    );

    let config = config::load_from_file(Some(file.path().to_path_buf()))
        .expect("Failed to load config from JSON file");

    assert_eq!(config.server.bind, "0.0.0.0:9000");
    assert_eq!(config.server.service_prefix, "rest:ext:desk");
    assert_eq!(config.http.timeout_ms, 2500);
    assert_eq!(config.http.pagination_backoff_ms, 0);
    assert_eq!(config.helpdesk["acme"].credentials.public_key, "acme-pub");
}

#[test]
fn test_load_config_from_toml_file() {
    let file = temp_config(
        r#"
[logging]
json = true

[helpdesk.acme]
base_url = "https://acme.example"
public_key = "acme-pub"
private_key = "acme-sec"

[helpdesk.legacy]
base_url = "https://legacy.example"
revision = "v1"
public_key = "legacy-pub"
private_key = "legacy-sec"
"#,
        "toml",
    );

    let config = config::load_from_file(Some(file.path().to_path_buf()))
        .expect("Failed to load config from TOML file");

    assert!(config.logging.json);
    assert_eq!(config.helpdesk.len(), 2);
    assert_eq!(config.helpdesk["acme"].revision, Revision::V2);
    assert_eq!(config.helpdesk["legacy"].revision, Revision::V1);
    assert_eq!(
        config.helpdesk["legacy"].prefix_url().unwrap().as_str(),
        "https://legacy.example/api/v1"
    );
}

#[test]
fn test_invalid_tenant_is_rejected_at_load() {
    let file = temp_config(
        r#"
[helpdesk.acme]
base_url = "https://acme.example"
public_key = "acme-pub"
private_key = ""
"#,
        "toml",
    );

    let err = config::load_from_file(Some(file.path().to_path_buf())).unwrap_err();
    assert!(matches!(err, HelpdeskError::Config(ref msg) if msg.contains("tenant 'acme'")));
}

#[test]
fn test_malformed_file_is_a_config_error() {
    let file = temp_config("{ \"helpdesk\": ", "json");

    let err = config::load_from_file(Some(file.path().to_path_buf())).unwrap_err();
    assert!(err.to_string().starts_with("Configuration error: Invalid JSON format"));
}

#[tokio::test]
async fn test_loaded_config_builds_registry() {
    let file = temp_config(
        r#"
[helpdesk.acme]
baseUrl = "https://acme.example"
publicKey = "acme-pub"
privateKey = "acme-sec"

[helpdesk.globex]
baseUrl = "https://globex.example"
revision = "v1"
publicKey = "globex-pub"
privateKey = "globex-sec"
"#,
        "toml",
    );

    let config = config::load_from_file(Some(file.path().to_path_buf())).unwrap();
    let registry = TenantRegistry::from_config(&config).unwrap();

    assert_eq!(registry.len(), 2);
    let names: Vec<_> = registry.snapshot().into_iter().map(|status| status.name).collect();
    assert_eq!(names, vec!["acme", "globex"]);
}
