use crate::cluster::ClusterApiError;
use crate::spec::SpecError;

/// Failure of a deploy, list or delete, naming the step that failed.
///
/// Steps already completed before the failure are not rolled back.
#[derive(thiserror::Error, Debug)]
pub enum DeployerError {
    #[error("invalid server spec")]
    InvalidSpec(#[from] SpecError),
    #[error("failed to create deployment")]
    CreateWorkload(#[source] ClusterApiError),
    /// the deployment was created and is left in place
    #[error("failed to create service")]
    CreateNetwork(#[source] ClusterApiError),
    #[error("failed to list deployments")]
    ListWorkloads(#[source] ClusterApiError),
    /// the service was not touched
    #[error("failed to delete deployment")]
    DeleteWorkload(#[source] ClusterApiError),
    /// the deployment is already gone
    #[error("failed to delete service")]
    DeleteNetwork(#[source] ClusterApiError),
}

impl DeployerError {
    /// error reported by the cluster, if any
    pub fn cluster_error(&self) -> Option<&ClusterApiError> {
        match self {
            Self::InvalidSpec(_) => None,
            Self::CreateWorkload(err)
            | Self::CreateNetwork(err)
            | Self::ListWorkloads(err)
            | Self::DeleteWorkload(err)
            | Self::DeleteNetwork(err) => Some(err),
        }
    }
}
