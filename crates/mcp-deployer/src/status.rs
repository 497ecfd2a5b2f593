//! Project observed Deployments back into a [`ServerStatus`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::k8::{DeploymentCondition, DeploymentSpec, K8Obj, ServiceSpec};

/// What a listing reports about one deployed server
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerStatus {
    pub name: String,
    pub namespace: String,
    pub image: String,
    pub available: bool,
    /// `<service>:<port>`, empty unless the server is available
    pub endpoint: String,
    pub labels: BTreeMap<String, String>,
    pub annotations: BTreeMap<String, String>,
    pub conditions: Vec<String>,
}

/// A server is available once at least one replica is available
pub fn is_available(workload: &K8Obj<DeploymentSpec>) -> bool {
    workload.status.available_replicas.unwrap_or_default() > 0
}

/// `<name>:<port>` of the first service port, if any
pub fn format_endpoint(service: &K8Obj<ServiceSpec>) -> Option<String> {
    service
        .spec
        .ports
        .first()
        .map(|port| format!("{}:{}", service.metadata.name, port.port))
}

pub fn format_condition(condition: &DeploymentCondition) -> String {
    format!(
        "{}: {} - {}",
        condition.type_,
        condition.status,
        condition.message.as_deref().unwrap_or_default()
    )
}

/// Build the status of a Deployment.
///
/// `service` is the Service with the same name, when it could be fetched.
/// It is only used for the endpoint of an available server.
pub fn project_status(
    workload: &K8Obj<DeploymentSpec>,
    service: Option<&K8Obj<ServiceSpec>>,
) -> ServerStatus {
    let available = is_available(workload);

    let image = workload
        .spec
        .template
        .spec
        .containers
        .first()
        .and_then(|container| container.image.clone())
        .unwrap_or_default();

    let endpoint = if available {
        service.and_then(format_endpoint).unwrap_or_default()
    } else {
        String::new()
    };

    ServerStatus {
        name: workload.metadata.name.clone(),
        namespace: workload.metadata.namespace.clone(),
        image,
        available,
        endpoint,
        labels: sorted(&workload.metadata.labels),
        annotations: sorted(&workload.metadata.annotations),
        conditions: workload
            .status
            .conditions
            .iter()
            .map(format_condition)
            .collect(),
    }
}

fn sorted<'a>(map: impl IntoIterator<Item = (&'a String, &'a String)>) -> BTreeMap<String, String> {
    map.into_iter()
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
