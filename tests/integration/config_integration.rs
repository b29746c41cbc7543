//! Integration tests for layered configuration

use super::test_utils::with_isolated_env;
use agentflow::cli::{Commands, ConfigCommands, RunContext};
use agentflow::config::{ConfigLoader, ServiceKind, DEFAULT_RELAY_ENDPOINT};
use agentflow::GenerationOrchestrator;
use tempfile::TempDir;

#[test]
fn test_defaults_without_any_files() {
    let temp_dir = TempDir::new().unwrap();
    let workspace = temp_dir.path().join("ws");
    std::fs::create_dir_all(&workspace).unwrap();

    let config = with_isolated_env(&temp_dir, || ConfigLoader::load(&workspace).unwrap());

    assert_eq!(config.service.kind, ServiceKind::Relay);
    assert_eq!(config.service.resolved_endpoint(), DEFAULT_RELAY_ENDPOINT);
    assert!(config.service.system_instruction);
    assert_eq!(config.logging.output, "stderr");
}

#[test]
fn test_workspace_file_overrides_global_file() {
    let temp_dir = TempDir::new().unwrap();
    let global_dir = temp_dir.path().join("agentflow");
    std::fs::create_dir_all(&global_dir).unwrap();
    std::fs::write(
        global_dir.join("config.toml"),
        r#"
[service]
model = "global-model"
request_timeout_secs = 30
"#,
    )
    .unwrap();

    let workspace = temp_dir.path().join("ws");
    std::fs::create_dir_all(workspace.join("config")).unwrap();
    std::fs::write(
        workspace.join("config").join("config.toml"),
        r#"
[service]
model = "workspace-model"
"#,
    )
    .unwrap();

    let config = with_isolated_env(&temp_dir, || ConfigLoader::load(&workspace).unwrap());

    assert_eq!(config.service.model, "workspace-model");
    assert_eq!(config.service.request_timeout_secs, 30);
}

#[test]
fn test_environment_overrides_files() {
    let temp_dir = TempDir::new().unwrap();
    let workspace = temp_dir.path().join("ws");
    std::fs::create_dir_all(workspace.join("config")).unwrap();
    std::fs::write(
        workspace.join("config").join("config.toml"),
        "[service]\nmodel = \"file-model\"\n",
    )
    .unwrap();

    let config = with_isolated_env(&temp_dir, || {
        std::env::set_var("AGENTFLOW_SERVICE__MODEL", "env-model");
        ConfigLoader::load(&workspace).unwrap()
    });

    assert_eq!(config.service.model, "env-model");
}

#[test]
fn test_explicit_file_selects_openai() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("agentflow.toml");
    std::fs::write(
        &config_file,
        r#"
[service]
kind = "openai"
model = "gpt-4o"
api_key_env = "AGENTFLOW_IT_OPENAI_KEY"

[logging]
level = "debug"
"#,
    )
    .unwrap();

    let config = with_isolated_env(&temp_dir, || {
        ConfigLoader::load_from_file(&config_file).unwrap()
    });

    assert_eq!(config.service.kind, ServiceKind::OpenAi);
    assert_eq!(config.service.resolved_endpoint(), "https://api.openai.com/v1");
    assert_eq!(config.logging.level, "debug");

    let orchestrator = GenerationOrchestrator::from_config(&config.service).unwrap();
    assert_eq!(orchestrator.service().service_name(), "openai");
}

#[test]
fn test_missing_explicit_file_fails_context() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("nope.toml");

    let result = with_isolated_env(&temp_dir, || {
        RunContext::new(temp_dir.path().to_path_buf(), Some(missing.clone()))
    });

    let err = match result {
        Ok(_) => panic!("missing config file should fail"),
        Err(err) => err,
    };
    assert!(err.to_string().contains("Config file not found"));
}

#[tokio::test]
async fn test_config_show_prints_effective_settings() {
    let temp_dir = TempDir::new().unwrap();
    let workspace = temp_dir.path().join("ws");
    std::fs::create_dir_all(workspace.join("config")).unwrap();
    std::fs::write(
        workspace.join("config").join("config.toml"),
        "[service]\nendpoint = \"http://localhost:8080/chat\"\n",
    )
    .unwrap();

    let context = with_isolated_env(&temp_dir, || RunContext::new(workspace.clone(), None).unwrap());
    let out = context
        .execute(&Commands::Config {
            command: ConfigCommands::Show,
        })
        .await
        .unwrap();

    assert!(out.contains("endpoint = \"http://localhost:8080/chat\""));
    assert!(out.contains("[logging]"));
}
