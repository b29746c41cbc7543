//! Shared test utilities for integration tests
//!
//! Serializes environment access across tests and builds service configs that point at a
//! local mock server.

use agentflow::config::ServiceConfig;
use serde_json::{json, Value};
use std::sync::Mutex;
use tempfile::TempDir;

/// Global mutex to serialize environment variable access across all tests
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Variables a test may change; restored afterwards.
const TRACKED_VARS: &[&str] = &[
    "HOME",
    "XDG_CONFIG_HOME",
    "AGENTFLOW_ENV",
    "AGENTFLOW_SERVICE__MODEL",
    "AGENTFLOW_SERVICE__KIND",
    "AGENTFLOW_LOGGING__LEVEL",
];

struct EnvState(Vec<(&'static str, Option<String>)>);

impl EnvState {
    fn capture() -> Self {
        Self(
            TRACKED_VARS
                .iter()
                .map(|name| (*name, std::env::var(name).ok()))
                .collect(),
        )
    }

    fn restore(self) {
        for (name, value) in self.0 {
            match value {
                Some(value) => std::env::set_var(name, value),
                None => std::env::remove_var(name),
            }
        }
    }
}

/// Run `f` with HOME and XDG_CONFIG_HOME inside `test_dir` and AGENTFLOW_* overrides cleared.
pub fn with_isolated_env<F, R>(test_dir: &TempDir, f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let env_state = EnvState::capture();

    let test_home = test_dir.path().join("home");
    std::fs::create_dir_all(&test_home).unwrap();
    for name in TRACKED_VARS.iter().filter(|name| name.starts_with("AGENTFLOW")) {
        std::env::remove_var(name);
    }
    std::env::set_var("HOME", test_home.to_str().unwrap());
    std::env::set_var("XDG_CONFIG_HOME", test_dir.path().to_str().unwrap());

    let result = f();

    env_state.restore();
    result
}

/// Relay service config for a mock endpoint, with no credential involved.
pub fn relay_config(endpoint: String) -> ServiceConfig {
    ServiceConfig {
        endpoint: Some(endpoint),
        api_key_env: "AGENTFLOW_IT_UNSET_KEY".to_string(),
        ..ServiceConfig::default()
    }
}

/// A relay reply whose content is the JSON object of the given fields.
pub fn structured_reply(fields: &[(&str, &str)]) -> Value {
    let object: serde_json::Map<String, Value> = fields
        .iter()
        .map(|(key, value)| (key.to_string(), Value::String(value.to_string())))
        .collect();
    json!({ "content": Value::Object(object).to_string() })
}
