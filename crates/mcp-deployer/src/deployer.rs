use tracing::{debug, info, instrument};

use crate::cluster::{ClusterApi, ClusterApiError, K8Cluster};
use crate::error::DeployerError;
use crate::manifest::build_manifests;
use crate::spec::ServerSpec;
use crate::status::{ServerStatus, is_available, project_status};
use crate::server_label_selector;

/// Deploys, lists and deletes MCP servers on a cluster.
///
/// Every call is a fixed sequence of cluster calls. Nothing is retried and
/// nothing completed before a failure is undone.
#[derive(Debug)]
pub struct SimpleDeployer<C> {
    cluster: C,
}

impl SimpleDeployer<K8Cluster> {
    /// Deployer talking to the cluster of the current kubeconfig context
    pub fn try_default() -> Result<Self, ClusterApiError> {
        Ok(Self::new(K8Cluster::try_default()?))
    }
}

impl<C> SimpleDeployer<C>
where
    C: ClusterApi,
{
    pub fn new(cluster: C) -> Self {
        Self { cluster }
    }

    pub fn cluster(&self) -> &C {
        &self.cluster
    }

    /// Create the Deployment, then the Service.
    ///
    /// If the Service can't be created the Deployment stays behind.
    #[instrument(skip(self, spec), fields(name = %spec.name, namespace = %spec.namespace))]
    pub async fn deploy_server(&self, spec: &ServerSpec) -> Result<(), DeployerError> {
        spec.validate()?;

        let (workload, network) = build_manifests(spec);

        debug!("creating deployment");
        self.cluster
            .create_workload(workload)
            .await
            .map_err(DeployerError::CreateWorkload)?;

        debug!("creating service");
        self.cluster
            .create_network(network)
            .await
            .map_err(DeployerError::CreateNetwork)?;

        info!("server deployed");
        Ok(())
    }

    /// Status of every server in `namespace`, in the order the cluster lists them.
    ///
    /// The endpoint is looked up only for available servers. A failed lookup
    /// leaves the endpoint empty.
    #[instrument(skip(self))]
    pub async fn list_servers(&self, namespace: &str) -> Result<Vec<ServerStatus>, DeployerError> {
        let workloads = self
            .cluster
            .list_workloads(namespace, &server_label_selector())
            .await
            .map_err(DeployerError::ListWorkloads)?;

        debug!(count = workloads.len(), "deployments found");

        let mut servers = Vec::with_capacity(workloads.len());
        for workload in &workloads {
            let service = if is_available(workload) {
                let name = &workload.metadata.name;
                match self.cluster.get_network(namespace, name).await {
                    Ok(service) => Some(service),
                    Err(err) => {
                        debug!(%name, %err, "no endpoint");
                        None
                    }
                }
            } else {
                None
            };
            servers.push(project_status(workload, service.as_ref()));
        }

        Ok(servers)
    }

    /// Delete the Deployment, then the Service.
    ///
    /// The Service is left alone if the Deployment can't be deleted.
    #[instrument(skip(self))]
    pub async fn delete_server(&self, name: &str, namespace: &str) -> Result<(), DeployerError> {
        self.cluster
            .delete_workload(namespace, name)
            .await
            .map_err(DeployerError::DeleteWorkload)?;

        debug!("deployment deleted");

        self.cluster
            .delete_network(namespace, name)
            .await
            .map_err(DeployerError::DeleteNetwork)?;

        info!("server deleted");
        Ok(())
    }
}
