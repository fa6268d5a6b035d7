use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Set to a truthy value when the client is on a constrained connection.
pub const SAVE_DATA_VAR: &str = "SHEETFETCH_SAVE_DATA";

/// Process-wide override for environment lookups.
static ENV_CONTEXT: RwLock<Option<EnvContext>> = RwLock::new(None);

#[derive(Debug, Clone)]
pub struct EnvContext {
    vars: HashMap<String, String>,
}

impl EnvContext {
    pub fn new() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    pub fn empty() -> Self {
        Self {
            vars: HashMap::new(),
        }
    }

    /// The installed global context, or a fresh snapshot of the process environment.
    pub fn current() -> Self {
        let guard = ENV_CONTEXT.read().unwrap_or_else(PoisonError::into_inner);
        guard.clone().unwrap_or_default()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }

    pub fn set(&mut self, key: String, value: String) {
        self.vars.insert(key, value);
    }

    /// Whether the runtime reports a low-bandwidth connection.
    pub fn save_data(&self) -> bool {
        self.get(SAVE_DATA_VAR).is_some_and(|v| {
            matches!(
                v.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            )
        })
    }
}

impl Default for EnvContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Install a global environment context, replacing the process environment
/// for every query created afterwards.
pub fn init_env_context(context: EnvContext) {
    let mut guard = ENV_CONTEXT.write().unwrap_or_else(PoisonError::into_inner);
    *guard = Some(context);
}
