//! Layered configuration: defaults, global file, workspace files, environment.

use crate::integration::test_utils::with_xdg_env;
use pagewright::analysis::ViolationCode;
use pagewright::catalog::Category;
use pagewright::config::{ConfigLoader, ATTEMPT_HARD_CAP};
use pagewright::error::ApiError;
use std::fs;
use tempfile::TempDir;

fn write_workspace_config(workspace: &std::path::Path, name: &str, body: &str) {
    let dir = workspace.join("config");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(name), body).unwrap();
}

#[test]
fn test_defaults_without_any_files() {
    let test_dir = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();

    let config = with_xdg_env(&test_dir, || ConfigLoader::load(workspace.path())).unwrap();
    assert_eq!(config.policy.max_attempts, ATTEMPT_HARD_CAP);
    assert_eq!(config.policy.max_dark_sections, 2);
    assert!(config.policy.is_critical(ViolationCode::DarkMisuse));
    assert!(!config.policy.is_critical(ViolationCode::CtaDuplicate));
    assert!(config.telemetry.enabled);
    assert!(config.source.endpoint.is_none());
}

#[test]
fn test_workspace_file_overrides_global_file() {
    let test_dir = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();

    let global_dir = test_dir.path().join("pagewright");
    fs::create_dir_all(&global_dir).unwrap();
    fs::write(
        global_dir.join("config.toml"),
        "[policy]\nmax_attempts = 1\nmax_dark_sections = 1\n",
    )
    .unwrap();
    write_workspace_config(workspace.path(), "config.toml", "[policy]\nmax_attempts = 2\n");

    let config = with_xdg_env(&test_dir, || ConfigLoader::load(workspace.path())).unwrap();
    assert_eq!(config.policy.max_attempts, 2);
    assert_eq!(config.policy.max_dark_sections, 1);
}

#[test]
fn test_environment_overrides_files() {
    let test_dir = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    write_workspace_config(workspace.path(), "config.toml", "[policy]\nmax_attempts = 2\n");

    let config = with_xdg_env(&test_dir, || {
        std::env::set_var("PAGEWRIGHT__POLICY__MAX_ATTEMPTS", "1");
        let loaded = ConfigLoader::load(workspace.path());
        std::env::remove_var("PAGEWRIGHT__POLICY__MAX_ATTEMPTS");
        loaded
    })
    .unwrap();
    assert_eq!(config.policy.max_attempts, 1);
}

#[test]
fn test_catalog_additions_and_critical_set_from_file() {
    let test_dir = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    write_workspace_config(
        workspace.path(),
        "config.toml",
        r#"
[policy]
critical_violations = ["MISSING_FINAL_CTA", "CTA_DUPLICATE"]

[catalog.categories]
promo_band = "trust_metrics"
"#,
    );

    let config = with_xdg_env(&test_dir, || ConfigLoader::load(workspace.path())).unwrap();
    assert!(config.policy.is_critical(ViolationCode::CtaDuplicate));
    assert!(!config.policy.is_critical(ViolationCode::DarkMisuse));

    let catalog = config.catalog();
    assert_eq!(catalog.resolve_category("promo_band"), Category::TrustMetrics);
    assert!(catalog.is_dark_allowed("promo_band"));
}

#[test]
fn test_invalid_policy_is_rejected() {
    let test_dir = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    write_workspace_config(
        workspace.path(),
        "config.toml",
        "[policy]\nmax_attempts = 7\n\n[source]\nendpoint = \"ftp://example.com\"\n",
    );

    let err = with_xdg_env(&test_dir, || ConfigLoader::load(workspace.path())).unwrap_err();
    match err {
        ApiError::ConfigError(msg) => {
            assert!(msg.contains("max_attempts"));
            assert!(msg.contains("endpoint"));
        }
        other => panic!("expected ConfigError, got {:?}", other),
    }
}

#[test]
fn test_load_from_explicit_file() {
    let test_dir = TempDir::new().unwrap();
    let path = test_dir.path().join("gate.toml");
    fs::write(
        &path,
        "[telemetry]\nenabled = false\n\n[source]\nendpoint = \"http://localhost:8080/generate\"\ntimeout_secs = 5\n",
    )
    .unwrap();

    let config = with_xdg_env(&test_dir, || ConfigLoader::load_from_file(&path)).unwrap();
    assert!(!config.telemetry.enabled);
    assert_eq!(
        config.source.endpoint.as_deref(),
        Some("http://localhost:8080/generate")
    );
    assert_eq!(config.source.timeout_secs, 5);

    let missing = test_dir.path().join("absent.toml");
    assert!(with_xdg_env(&test_dir, || ConfigLoader::load_from_file(&missing)).is_err());
}
