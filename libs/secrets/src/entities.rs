//! Addressing and result types shared by all providers

use secrecy::Secret;

/// Logical address of one secret, independent of any backend
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyPath {
    /// Hierarchical path, e.g. `api/prod`
    pub path: String,
    /// Environment variable style name of the secret
    pub env: String,
    /// Backend specific field name; wins over `env` when set
    pub field: String,
    /// Backend resource the secret lives in, e.g. a Worker script name
    pub source: String,
}

impl KeyPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Copy of this path with `env` replaced
    pub fn with_env(&self, env: impl Into<String>) -> Self {
        Self {
            env: env.into(),
            ..self.clone()
        }
    }

    pub fn with_field(&self, field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ..self.clone()
        }
    }

    pub fn with_source(&self, source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..self.clone()
        }
    }

    /// Name the secret is stored under: `field`, else `env`, else nothing
    pub fn resolved_key(&self) -> Option<&str> {
        [self.field.as_str(), self.env.as_str()]
            .into_iter()
            .find(|k| !k.is_empty())
    }
}

/// Join a mapping key onto a path prefix with `/`
pub fn join_path(prefix: &str, key: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}/{key}")
    }
}

/// A secret resolved by a read capable provider, with where it came from
#[derive(Debug, Clone)]
pub struct EnvEntry {
    pub key: String,
    pub value: Secret<String>,
    pub provider_name: &'static str,
    pub resolved_path: String,
    pub source: String,
    pub field: String,
}

impl EnvEntry {
    pub fn found(
        path: &KeyPath,
        provider_name: &'static str,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            value: Secret::new(value.into()),
            provider_name,
            resolved_path: path.path.clone(),
            source: path.source.clone(),
            field: path.field.clone(),
        }
    }
}
