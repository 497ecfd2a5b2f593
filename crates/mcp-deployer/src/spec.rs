//! Desired state of an MCP server.

use std::collections::BTreeMap;
use std::fs::read_to_string;
use std::path::Path;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::{DEFAULT_NAMESPACE, DEFAULT_PORT};
use crate::k8::ResourceRequirements;

/// Describe a MCP server to deploy
#[derive(Builder, Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[builder(build_fn(validate = "Self::validate_required"))]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ServerSpec {
    #[builder(setter(into))]
    pub name: String,
    #[builder(setter(into), default = "DEFAULT_NAMESPACE.to_string()")]
    pub namespace: String,
    #[builder(setter(into))]
    pub image: String,
    #[builder(default = "DEFAULT_PORT")]
    pub port: u16,
    #[builder(default)]
    pub env: Vec<EnvEntry>,
    #[builder(default)]
    pub args: Vec<String>,
    #[builder(default)]
    pub secret_mounts: Vec<SecretMount>,
    /// empty means the namespace default service account
    #[builder(setter(into), default)]
    pub service_account: String,
    #[builder(default)]
    pub labels: BTreeMap<String, String>,
    #[builder(default)]
    pub annotations: BTreeMap<String, String>,
    #[builder(setter(strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourceRequirements>,
}

impl Default for ServerSpec {
    fn default() -> Self {
        Self {
            name: String::new(),
            namespace: DEFAULT_NAMESPACE.to_owned(),
            image: String::new(),
            port: DEFAULT_PORT,
            env: vec![],
            args: vec![],
            secret_mounts: vec![],
            service_account: String::new(),
            labels: BTreeMap::new(),
            annotations: BTreeMap::new(),
            resources: None,
        }
    }
}

impl ServerSpec {
    pub fn builder() -> ServerSpecBuilder {
        ServerSpecBuilder::default()
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, SpecError> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SpecError> {
        let path = path.as_ref();
        let content = read_to_string(path).map_err(|source| SpecError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Check the fields that must be set before the server is deployed.
    /// Manifest translation does not depend on this.
    pub fn validate(&self) -> Result<(), SpecError> {
        if self.name.trim().is_empty() {
            return Err(SpecError::MissingField("name"));
        }
        if self.namespace.trim().is_empty() {
            return Err(SpecError::MissingField("namespace"));
        }
        if self.image.trim().is_empty() {
            return Err(SpecError::MissingField("image"));
        }
        if self.port == 0 {
            return Err(SpecError::InvalidPort);
        }
        if let Some(mount) = self
            .secret_mounts
            .iter()
            .find(|mount| mount.mount_path.trim().is_empty())
        {
            return Err(SpecError::MissingMountPath(mount.secret_name.clone()));
        }

        Ok(())
    }
}

impl ServerSpecBuilder {
    fn validate_required(&self) -> Result<(), String> {
        if matches!(&self.name, Some(name) if name.trim().is_empty()) {
            return Err("name must not be empty".to_owned());
        }
        if matches!(&self.namespace, Some(namespace) if namespace.trim().is_empty()) {
            return Err("namespace must not be empty".to_owned());
        }
        if matches!(&self.image, Some(image) if image.trim().is_empty()) {
            return Err("image must not be empty".to_owned());
        }
        Ok(())
    }
}

/// Environment variable of the server container
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EnvEntry {
    pub name: String,
    #[serde(flatten)]
    pub source: EnvSource,
}

impl EnvEntry {
    pub fn value(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: EnvSource::Value(value.into()),
        }
    }

    pub fn secret(
        name: impl Into<String>,
        secret: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            source: EnvSource::Secret {
                name: secret.into(),
                key: key.into(),
            },
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum EnvSource {
    /// literal value
    Value(String),
    /// key of a secret in the same namespace
    Secret { name: String, key: String },
}

/// Secret mounted read-only into the server container
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SecretMount {
    pub secret_name: String,
    pub mount_path: String,
}

impl SecretMount {
    pub fn new(secret_name: impl Into<String>, mount_path: impl Into<String>) -> Self {
        Self {
            secret_name: secret_name.into(),
            mount_path: mount_path.into(),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum SpecError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("port must be between 1 and 65535")]
    InvalidPort,
    #[error("mount path is required for secret '{0}'")]
    MissingMountPath(String),
    #[error("failed to read server spec from {path}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid server spec")]
    Yaml(#[from] serde_yaml::Error),
}
