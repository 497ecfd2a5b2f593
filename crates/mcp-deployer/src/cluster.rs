//! Cluster operations used by the deployer.

use std::fmt;

use async_trait::async_trait;
use tracing::{debug, trace};

use k8_client::{ClientError, SharedK8Client, load_and_share};
use k8_client::meta_client::{ListArg, MetadataClient, MetadataClientError};

use crate::k8::{DeploymentSpec, InputK8Obj, InputObjectMeta, K8Obj, ServiceSpec, WorkloadSpec};
use crate::manifest::{NetworkManifest, WorkloadManifest};

/// Primitives of the orchestration API.
///
/// Manifests are submitted as they are and errors are reported without
/// retrying.
#[async_trait]
pub trait ClusterApi: Send + Sync {
    async fn create_workload(&self, manifest: WorkloadManifest) -> Result<(), ClusterApiError>;

    async fn create_network(&self, manifest: NetworkManifest) -> Result<(), ClusterApiError>;

    /// Deployments of `namespace` matching `label_selector`
    async fn list_workloads(
        &self,
        namespace: &str,
        label_selector: &str,
    ) -> Result<Vec<K8Obj<DeploymentSpec>>, ClusterApiError>;

    async fn get_network(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<K8Obj<ServiceSpec>, ClusterApiError>;

    async fn delete_workload(&self, namespace: &str, name: &str) -> Result<(), ClusterApiError>;

    async fn delete_network(&self, namespace: &str, name: &str) -> Result<(), ClusterApiError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Deployment,
    Service,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Deployment => write!(f, "deployment"),
            Self::Service => write!(f, "service"),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ClusterApiError {
    #[error("{kind} '{namespace}/{name}' not found")]
    NotFound {
        kind: ObjectKind,
        namespace: String,
        name: String,
    },
    #[error("Kubernetes client error")]
    Client(#[from] ClientError),
}

impl ClusterApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    fn from_client(err: ClientError, kind: ObjectKind, namespace: &str, name: &str) -> Self {
        if err.not_found() {
            Self::NotFound {
                kind,
                namespace: namespace.to_owned(),
                name: name.to_owned(),
            }
        } else {
            Self::Client(err)
        }
    }
}

/// [`ClusterApi`] backed by the Kubernetes API server
#[derive(Clone)]
pub struct K8Cluster {
    client: SharedK8Client,
}

impl fmt::Debug for K8Cluster {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "K8Cluster")
    }
}

impl K8Cluster {
    pub fn new(client: SharedK8Client) -> Self {
        Self { client }
    }

    /// Connect using the current kubeconfig context
    pub fn try_default() -> Result<Self, ClusterApiError> {
        let client = load_and_share()?;
        Ok(Self::new(client))
    }
}

#[async_trait]
impl ClusterApi for K8Cluster {
    async fn create_workload(&self, manifest: WorkloadManifest) -> Result<(), ClusterApiError> {
        let input: InputK8Obj<WorkloadSpec> = manifest.into();
        trace!(?input, "creating deployment");
        let created = self.client.create_item(input).await?;
        debug!(name = %created.metadata.name, "deployment created");
        Ok(())
    }

    async fn create_network(&self, manifest: NetworkManifest) -> Result<(), ClusterApiError> {
        let input: InputK8Obj<ServiceSpec> = manifest.into();
        trace!(?input, "creating service");
        let created = self.client.create_item(input).await?;
        debug!(name = %created.metadata.name, "service created");
        Ok(())
    }

    async fn list_workloads(
        &self,
        namespace: &str,
        label_selector: &str,
    ) -> Result<Vec<K8Obj<DeploymentSpec>>, ClusterApiError> {
        let option = ListArg {
            label_selector: Some(label_selector.to_owned()),
            ..Default::default()
        };
        let list = self
            .client
            .retrieve_items_with_option::<DeploymentSpec, _>(namespace, Some(option))
            .await?;
        Ok(list.items)
    }

    async fn get_network(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<K8Obj<ServiceSpec>, ClusterApiError> {
        self.client
            .retrieve_item::<ServiceSpec, _>(&InputObjectMeta::named(name, namespace))
            .await
            .map_err(|err| ClusterApiError::from_client(err, ObjectKind::Service, namespace, name))
    }

    async fn delete_workload(&self, namespace: &str, name: &str) -> Result<(), ClusterApiError> {
        self.client
            .delete_item_with_option::<DeploymentSpec, _>(
                &InputObjectMeta::named(name, namespace),
                None,
            )
            .await
            .map_err(|err| {
                ClusterApiError::from_client(err, ObjectKind::Deployment, namespace, name)
            })?;
        Ok(())
    }

    async fn delete_network(&self, namespace: &str, name: &str) -> Result<(), ClusterApiError> {
        self.client
            .delete_item_with_option::<ServiceSpec, _>(
                &InputObjectMeta::named(name, namespace),
                None,
            )
            .await
            .map_err(|err| ClusterApiError::from_client(err, ObjectKind::Service, namespace, name))?;
        Ok(())
    }
}
