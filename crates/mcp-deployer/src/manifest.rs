//! Translate a [`ServerSpec`] into the Deployment and Service to submit.
//!
//! Translation is pure: the same spec always yields the same pair of
//! manifests and malformed input is passed through untouched. Checking the
//! spec is up to the caller, see [`ServerSpec::validate`].

use std::collections::BTreeMap;

use tracing::trace;

use crate::{MCP_SERVER_LABEL, MCP_SERVER_LABEL_VALUE};
use crate::k8::{
    ContainerPortSpec, ContainerSpec, DeploymentSpec, EnvVar, InputK8Obj, InputObjectMeta,
    LabelProvider, LabelSelector, LoadBalancerType, PodSpec, SecretVolumeSpec, ServicePort,
    ServiceSpec, TargetPort, TemplateMeta, TemplateSpec, VolumeMount, VolumeSpec,
    WorkloadOverlay, WorkloadSpec,
};
use crate::spec::{EnvEntry, EnvSource, SecretMount, ServerSpec};

pub const CONTAINER_NAME: &str = "mcp-server";
pub const PORT_NAME: &str = "mcp";

/// Identity shared by both objects of a server
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ManifestMeta {
    pub name: String,
    pub namespace: String,
    pub labels: BTreeMap<String, String>,
    pub annotations: BTreeMap<String, String>,
}

impl ManifestMeta {
    fn from_spec(spec: &ServerSpec) -> Self {
        Self {
            name: spec.name.clone(),
            namespace: spec.namespace.clone(),
            labels: merge_labels(&spec.labels),
            annotations: spec.annotations.clone(),
        }
    }

    fn as_input(&self) -> InputObjectMeta {
        InputObjectMeta {
            name: self.name.clone(),
            namespace: self.namespace.clone(),
            labels: copy_map(&self.labels),
            annotations: copy_map(&self.annotations),
            ..Default::default()
        }
    }
}

/// Deployment of a server
#[derive(Debug, Default, Clone)]
pub struct WorkloadManifest {
    pub metadata: ManifestMeta,
    pub spec: WorkloadSpec,
}

impl From<WorkloadManifest> for InputK8Obj<WorkloadSpec> {
    fn from(manifest: WorkloadManifest) -> Self {
        InputK8Obj::new(manifest.spec, manifest.metadata.as_input())
    }
}

/// Service routing to the Deployment of a server
#[derive(Debug, Default, Clone)]
pub struct NetworkManifest {
    pub metadata: ManifestMeta,
    pub spec: ServiceSpec,
}

impl From<NetworkManifest> for InputK8Obj<ServiceSpec> {
    fn from(manifest: NetworkManifest) -> Self {
        InputK8Obj::new(manifest.spec, manifest.metadata.as_input())
    }
}

pub fn build_manifests(spec: &ServerSpec) -> (WorkloadManifest, NetworkManifest) {
    (build_workload(spec), build_network(spec))
}

/// Copy of the user labels with [`MCP_SERVER_LABEL`] forced to `"true"`.
///
/// A user supplied value for that key is dropped so the object always
/// matches the listing selector.
pub fn merge_labels(user_labels: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    let mut labels = user_labels.clone();
    labels.insert(
        MCP_SERVER_LABEL.to_owned(),
        MCP_SERVER_LABEL_VALUE.to_owned(),
    );
    labels
}

/// Name of the volume backing the secret mount at `index`
pub fn secret_volume_name(index: usize) -> String {
    format!("secret-{index}")
}

/// One volume and one read-only mount per secret, in spec order.
/// Volumes are named by position so the same secret may be mounted twice.
pub fn secret_volumes(mounts: &[SecretMount]) -> (Vec<VolumeSpec>, Vec<VolumeMount>) {
    mounts
        .iter()
        .enumerate()
        .map(|(index, mount)| {
            let name = secret_volume_name(index);
            let volume = VolumeSpec {
                name: name.clone(),
                secret: Some(SecretVolumeSpec {
                    secret_name: mount.secret_name.clone(),
                    ..Default::default()
                }),
                ..Default::default()
            };
            let volume_mount = VolumeMount {
                name,
                mount_path: mount.mount_path.clone(),
                read_only: Some(true),
                ..Default::default()
            };
            (volume, volume_mount)
        })
        .unzip()
}

pub fn build_workload(spec: &ServerSpec) -> WorkloadManifest {
    let metadata = ManifestMeta::from_spec(spec);
    let (volumes, volume_mounts) = secret_volumes(&spec.secret_mounts);

    let mut port = ContainerPortSpec {
        container_port: spec.port,
        ..Default::default()
    };
    port.name = Some(PORT_NAME.to_owned());

    let container = ContainerSpec {
        name: CONTAINER_NAME.to_owned(),
        image: Some(spec.image.clone()),
        ports: vec![port],
        args: spec.args.clone(),
        volume_mounts,
        ..Default::default()
    };

    let service_account_name =
        (!spec.service_account.is_empty()).then(|| spec.service_account.clone());

    let template = TemplateSpec {
        metadata: Some(TemplateMeta::default().set_labels(label_pairs(&metadata.labels))),
        spec: PodSpec {
            service_account_name,
            containers: vec![container],
            volumes,
            ..Default::default()
        },
    };

    // single replica, servers are not scaled
    let deployment = DeploymentSpec {
        replicas: Some(1),
        selector: LabelSelector {
            match_labels: copy_map(&metadata.labels),
        },
        template,
        ..Default::default()
    };

    let overlay = WorkloadOverlay {
        annotations: metadata.annotations.clone(),
        env: spec.env.iter().map(env_var).collect(),
        resources: spec.resources.clone().unwrap_or_default(),
    };

    let workload = WorkloadSpec {
        deployment,
        overlay,
    };
    trace!(?workload, "built deployment");

    WorkloadManifest {
        metadata,
        spec: workload,
    }
}

/// ClusterIP Service exposing the container port under the same number.
/// Protocol is left to the API server default, TCP.
pub fn build_network(spec: &ServerSpec) -> NetworkManifest {
    let metadata = ManifestMeta::from_spec(spec);

    let mut port = ServicePort {
        port: spec.port,
        ..Default::default()
    };
    port.name = Some(PORT_NAME.to_owned());
    port.target_port = Some(TargetPort::Number(spec.port));

    let service = ServiceSpec {
        selector: Some(copy_map(&metadata.labels)),
        ports: vec![port],
        r#type: Some(LoadBalancerType::ClusterIP),
        ..Default::default()
    };
    trace!(?service, "built service");

    NetworkManifest {
        metadata,
        spec: service,
    }
}

fn env_var(entry: &EnvEntry) -> EnvVar {
    match &entry.source {
        EnvSource::Value(value) => EnvVar::key_value(&entry.name, value),
        EnvSource::Secret { name, key } => EnvVar::secret_key(&entry.name, name, key),
    }
}

fn label_pairs(labels: &BTreeMap<String, String>) -> Vec<(String, String)> {
    copy_map(labels)
}

fn copy_map<M>(map: &BTreeMap<String, String>) -> M
where
    M: FromIterator<(String, String)>,
{
    map.iter()
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
