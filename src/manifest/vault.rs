use std::collections::HashMap;
use std::sync::RwLock;

/// External key store the engine consults before deploy. The readiness check
/// is a pure predicate; the engine never manages the credentials themselves.
pub trait CredentialStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// All required keys present and non-blank.
    fn is_ready(&self, required: &[String]) -> bool {
        self.missing(required).is_empty()
    }

    fn missing(&self, required: &[String]) -> Vec<String> {
        required
            .iter()
            .filter(|key| {
                self.get(key)
                    .map(|value| value.trim().is_empty())
                    .unwrap_or(true)
            })
            .cloned()
            .collect()
    }
}

/// In-memory credential vault.
#[derive(Debug, Default)]
pub struct Vault {
    values: RwLock<HashMap<String, String>>,
}

impl Vault {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        if let Ok(mut values) = self.values.write() {
            values.insert(key.into(), value.into());
        }
    }
}

impl CredentialStore for Vault {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().ok().and_then(|v| v.get(key).cloned())
    }
}
