use std::collections::BTreeMap;

use serde::de::{self, Deserializer};
use serde::ser::{self, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use k8_types::{Crd, DefaultHeader, Spec};

use super::quantity::Quantity;
use super::{DeploymentSpec, DeploymentStatus};

pub const RESOURCE_CPU: &str = "cpu";
pub const RESOURCE_MEMORY: &str = "memory";

const TEMPLATE_METADATA: &str = "/template/metadata";
const FIRST_CONTAINER: &str = "/template/spec/containers/0";

/// Deployment as submitted by this crate: a `k8_types` Deployment plus the
/// fields it does not model, merged into the same object on the wire.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct WorkloadSpec {
    pub deployment: DeploymentSpec,
    pub overlay: WorkloadOverlay,
}

impl Spec for WorkloadSpec {
    type Status = DeploymentStatus;
    type Header = DefaultHeader;

    fn metadata() -> &'static Crd {
        DeploymentSpec::metadata()
    }
}

impl From<DeploymentSpec> for WorkloadSpec {
    fn from(deployment: DeploymentSpec) -> Self {
        Self {
            deployment,
            overlay: WorkloadOverlay::default(),
        }
    }
}

impl Serialize for WorkloadSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut value = serde_json::to_value(&self.deployment).map_err(ser::Error::custom)?;
        self.overlay.apply(&mut value).map_err(ser::Error::custom)?;
        value.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for WorkloadSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let overlay = WorkloadOverlay::extract(&value).map_err(de::Error::custom)?;
        let deployment = serde_json::from_value(value).map_err(de::Error::custom)?;
        Ok(Self {
            deployment,
            overlay,
        })
    }
}

/// Pod template fields missing from `k8_types`.
///
/// `env` and `resources` belong to the first container, `annotations` to the
/// pod template metadata.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WorkloadOverlay {
    pub annotations: BTreeMap<String, String>,
    pub env: Vec<EnvVar>,
    pub resources: ResourceRequirements,
}

impl WorkloadOverlay {
    fn apply(&self, deployment: &mut Value) -> Result<(), serde_json::Error> {
        if !self.annotations.is_empty() {
            if let Some(metadata) = deployment
                .pointer_mut(TEMPLATE_METADATA)
                .and_then(Value::as_object_mut)
            {
                metadata.insert(
                    "annotations".to_owned(),
                    serde_json::to_value(&self.annotations)?,
                );
            }
        }

        if let Some(container) = deployment
            .pointer_mut(FIRST_CONTAINER)
            .and_then(Value::as_object_mut)
        {
            if !self.env.is_empty() {
                container.insert("env".to_owned(), serde_json::to_value(&self.env)?);
            }
            container.insert(
                "resources".to_owned(),
                serde_json::to_value(&self.resources)?,
            );
        }
        Ok(())
    }

    fn extract(deployment: &Value) -> Result<Self, serde_json::Error> {
        let metadata = deployment.pointer(TEMPLATE_METADATA);
        let container = deployment.pointer(FIRST_CONTAINER);
        Ok(Self {
            annotations: field(metadata, "annotations")?,
            env: field(container, "env")?,
            resources: field(container, "resources")?,
        })
    }
}

fn field<T>(object: Option<&Value>, key: &str) -> Result<T, serde_json::Error>
where
    T: for<'de> Deserialize<'de> + Default,
{
    match object.and_then(|object| object.get(key)) {
        Some(Value::Null) | None => Ok(T::default()),
        Some(value) => T::deserialize(value),
    }
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EnvVar {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_from: Option<EnvVarSource>,
}

impl EnvVar {
    pub fn key_value(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
            value_from: None,
        }
    }

    pub fn secret_key(
        name: impl Into<String>,
        secret: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value: None,
            value_from: Some(EnvVarSource {
                secret_key_ref: Some(SecretKeySelector {
                    name: secret.into(),
                    key: key.into(),
                }),
            }),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct EnvVarSource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_key_ref: Option<SecretKeySelector>,
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SecretKeySelector {
    pub name: String,
    pub key: String,
}

/// Compute bounds of a container, keyed by resource name (`cpu`, `memory`).
/// Serializes as `{}` when nothing is set.
#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourceRequirements {
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub limits: BTreeMap<String, Quantity>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub requests: BTreeMap<String, Quantity>,
}

impl ResourceRequirements {
    pub fn is_empty(&self) -> bool {
        self.limits.is_empty() && self.requests.is_empty()
    }

    pub fn with_request(mut self, resource: &str, quantity: Quantity) -> Self {
        self.requests.insert(resource.to_owned(), quantity);
        self
    }

    pub fn with_limit(mut self, resource: &str, quantity: Quantity) -> Self {
        self.limits.insert(resource.to_owned(), quantity);
        self
    }
}
