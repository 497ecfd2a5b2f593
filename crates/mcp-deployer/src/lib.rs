//! Deploy MCP servers on Kubernetes.
//!
//! A [`ServerSpec`] is translated into a Deployment and a Service, both
//! tagged with [`MCP_SERVER_LABEL`] so every managed server can be found
//! again with a single label query. [`SimpleDeployer`] drives the three
//! operations (deploy, list, delete) against a [`ClusterApi`].

pub mod cluster;
pub mod deployer;
pub mod error;
pub mod k8;
pub mod manifest;
pub mod spec;
pub mod status;

pub use cluster::{ClusterApi, ClusterApiError, K8Cluster, ObjectKind};
pub use deployer::SimpleDeployer;
pub use error::DeployerError;
pub use manifest::{NetworkManifest, WorkloadManifest, build_manifests};
pub use spec::{EnvEntry, EnvSource, SecretMount, ServerSpec, ServerSpecBuilder, SpecError};
pub use status::ServerStatus;

/// Label carried by every object managed by this crate
pub const MCP_SERVER_LABEL: &str = "mcp.opendatahub.io/mcp-server";

/// Required value of [`MCP_SERVER_LABEL`]
pub const MCP_SERVER_LABEL_VALUE: &str = "true";

pub const DEFAULT_NAMESPACE: &str = "default";

pub const DEFAULT_PORT: u16 = 8080;

/// label selector matching every managed server
pub fn server_label_selector() -> String {
    format!("{MCP_SERVER_LABEL}={MCP_SERVER_LABEL_VALUE}")
}
