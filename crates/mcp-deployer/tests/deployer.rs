use std::collections::{BTreeMap, HashSet};

use async_lock::Mutex;
use async_trait::async_trait;

use k8_client::ClientError;
use serde_json::json;

use mcp_deployer::k8::{DeploymentSpec, K8Obj, ServiceSpec};
use mcp_deployer::{
    ClusterApi, ClusterApiError, DeployerError, MCP_SERVER_LABEL, NetworkManifest, ObjectKind,
    SecretMount, ServerSpec, SimpleDeployer, WorkloadManifest, server_label_selector,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Op {
    CreateWorkload,
    CreateNetwork,
    ListWorkloads,
    GetNetwork,
    DeleteWorkload,
    DeleteNetwork,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Call {
    op: Op,
    namespace: String,
    name: String,
}

/// Records every call and fails the operations it is told to fail.
/// `failing` ops report a missing object, `broken` ops a client error.
#[derive(Default)]
struct RecordingCluster {
    calls: Mutex<Vec<Call>>,
    failing: HashSet<Op>,
    broken: HashSet<Op>,
    workloads: Vec<K8Obj<DeploymentSpec>>,
    networks: BTreeMap<String, K8Obj<ServiceSpec>>,
    created_workloads: Mutex<Vec<WorkloadManifest>>,
    created_networks: Mutex<Vec<NetworkManifest>>,
}

impl RecordingCluster {
    fn failing(ops: &[Op]) -> Self {
        Self {
            failing: ops.iter().copied().collect(),
            ..Default::default()
        }
    }

    async fn record(&self, op: Op, namespace: &str, name: &str) -> Result<(), ClusterApiError> {
        self.calls.lock().await.push(Call {
            op,
            namespace: namespace.to_owned(),
            name: name.to_owned(),
        });
        if self.broken.contains(&op) {
            return Err(ClusterApiError::Client(ClientError::Other(format!(
                "connection refused during {op:?}"
            ))));
        }
        if self.failing.contains(&op) {
            let kind = match op {
                Op::CreateNetwork | Op::GetNetwork | Op::DeleteNetwork => ObjectKind::Service,
                _ => ObjectKind::Deployment,
            };
            Err(ClusterApiError::NotFound {
                kind,
                namespace: namespace.to_owned(),
                name: name.to_owned(),
            })
        } else {
            Ok(())
        }
    }

    async fn ops(&self) -> Vec<Op> {
        self.calls.lock().await.iter().map(|call| call.op).collect()
    }
}

#[async_trait]
impl ClusterApi for RecordingCluster {
    async fn create_workload(&self, manifest: WorkloadManifest) -> Result<(), ClusterApiError> {
        self.record(
            Op::CreateWorkload,
            &manifest.metadata.namespace,
            &manifest.metadata.name,
        )
        .await?;
        self.created_workloads.lock().await.push(manifest);
        Ok(())
    }

    async fn create_network(&self, manifest: NetworkManifest) -> Result<(), ClusterApiError> {
        self.record(
            Op::CreateNetwork,
            &manifest.metadata.namespace,
            &manifest.metadata.name,
        )
        .await?;
        self.created_networks.lock().await.push(manifest);
        Ok(())
    }

    async fn list_workloads(
        &self,
        namespace: &str,
        label_selector: &str,
    ) -> Result<Vec<K8Obj<DeploymentSpec>>, ClusterApiError> {
        self.record(Op::ListWorkloads, namespace, label_selector)
            .await?;
        Ok(self.workloads.clone())
    }

    async fn get_network(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<K8Obj<ServiceSpec>, ClusterApiError> {
        self.record(Op::GetNetwork, namespace, name).await?;
        self.networks
            .get(name)
            .cloned()
            .ok_or_else(|| ClusterApiError::NotFound {
                kind: ObjectKind::Service,
                namespace: namespace.to_owned(),
                name: name.to_owned(),
            })
    }

    async fn delete_workload(&self, namespace: &str, name: &str) -> Result<(), ClusterApiError> {
        self.record(Op::DeleteWorkload, namespace, name).await
    }

    async fn delete_network(&self, namespace: &str, name: &str) -> Result<(), ClusterApiError> {
        self.record(Op::DeleteNetwork, namespace, name).await
    }
}

fn server_spec() -> ServerSpec {
    ServerSpec::builder()
        .name("s1")
        .namespace("ns1")
        .image("img:v1")
        .port(9090)
        .secret_mounts(vec![SecretMount::new("sec1", "/a")])
        .build()
        .expect("spec")
}

fn workload(name: &str, available_replicas: Option<i32>) -> K8Obj<DeploymentSpec> {
    let spec = serde_json::from_value(json!({
        "template": {
            "spec": {"containers": [{"name": "mcp-server", "image": format!("{name}:latest")}]}
        }
    }))
    .expect("deployment");
    let mut obj = K8Obj::new(name.to_owned(), spec);
    obj.metadata.namespace = "ns1".to_owned();
    obj.status = serde_json::from_value(json!({ "availableReplicas": available_replicas }))
        .expect("status");
    obj
}

fn service(name: &str, port: u16) -> K8Obj<ServiceSpec> {
    let spec = serde_json::from_value(json!({
        "ports": [{"name": "mcp", "port": port, "targetPort": port}]
    }))
    .expect("service");
    K8Obj::new(name.to_owned(), spec)
}

#[fluvio_future::test]
async fn test_deploy_creates_deployment_then_service() {
    let deployer = SimpleDeployer::new(RecordingCluster::default());

    deployer.deploy_server(&server_spec()).await.expect("deploy");

    let cluster = deployer.cluster();
    assert_eq!(cluster.ops().await, vec![Op::CreateWorkload, Op::CreateNetwork]);

    let workloads = cluster.created_workloads.lock().await;
    let networks = cluster.created_networks.lock().await;
    assert_eq!(workloads.len(), 1);
    assert_eq!(networks.len(), 1);
    assert_eq!(workloads[0].metadata.name, "s1");
    assert_eq!(workloads[0].metadata.namespace, "ns1");
    assert_eq!(workloads[0].metadata.labels[MCP_SERVER_LABEL], "true");
    assert_eq!(networks[0].metadata.labels[MCP_SERVER_LABEL], "true");
    assert_eq!(networks[0].spec.ports[0].port, 9090);
}

#[fluvio_future::test]
async fn test_deploy_stops_when_deployment_fails() {
    let deployer = SimpleDeployer::new(RecordingCluster::failing(&[Op::CreateWorkload]));

    let err = deployer
        .deploy_server(&server_spec())
        .await
        .expect_err("should fail");

    assert!(matches!(err, DeployerError::CreateWorkload(_)));
    assert_eq!(deployer.cluster().ops().await, vec![Op::CreateWorkload]);
}

#[fluvio_future::test]
async fn test_deploy_reports_service_failure() {
    let deployer = SimpleDeployer::new(RecordingCluster::failing(&[Op::CreateNetwork]));

    let err = deployer
        .deploy_server(&server_spec())
        .await
        .expect_err("should fail");

    assert!(matches!(err, DeployerError::CreateNetwork(_)));
    assert_eq!(err.to_string(), "failed to create service");
    // deployment is not rolled back
    let cluster = deployer.cluster();
    assert_eq!(cluster.ops().await, vec![Op::CreateWorkload, Op::CreateNetwork]);
    assert_eq!(cluster.created_workloads.lock().await.len(), 1);
}

#[fluvio_future::test]
async fn test_deploy_rejects_invalid_spec_before_any_call() {
    let deployer = SimpleDeployer::new(RecordingCluster::default());

    let mut spec = server_spec();
    spec.image = String::new();

    let err = deployer.deploy_server(&spec).await.expect_err("invalid");
    assert!(matches!(err, DeployerError::InvalidSpec(_)));
    assert!(err.cluster_error().is_none());
    assert!(deployer.cluster().ops().await.is_empty());
}

#[fluvio_future::test]
async fn test_delete_removes_deployment_then_service() {
    let deployer = SimpleDeployer::new(RecordingCluster::default());

    deployer.delete_server("s1", "ns1").await.expect("delete");

    let calls = deployer.cluster().calls.lock().await.clone();
    assert_eq!(
        calls,
        vec![
            Call {
                op: Op::DeleteWorkload,
                namespace: "ns1".to_owned(),
                name: "s1".to_owned(),
            },
            Call {
                op: Op::DeleteNetwork,
                namespace: "ns1".to_owned(),
                name: "s1".to_owned(),
            },
        ]
    );
}

#[fluvio_future::test]
async fn test_delete_keeps_service_when_deployment_delete_fails() {
    let deployer = SimpleDeployer::new(RecordingCluster::failing(&[Op::DeleteWorkload]));

    let err = deployer
        .delete_server("s1", "ns1")
        .await
        .expect_err("should fail");

    assert!(matches!(err, DeployerError::DeleteWorkload(_)));
    assert!(err.cluster_error().expect("cluster").is_not_found());
    assert_eq!(deployer.cluster().ops().await, vec![Op::DeleteWorkload]);
}

#[fluvio_future::test]
async fn test_delete_reports_service_failure() {
    let deployer = SimpleDeployer::new(RecordingCluster::failing(&[Op::DeleteNetwork]));

    let err = deployer
        .delete_server("s1", "ns1")
        .await
        .expect_err("should fail");

    assert!(matches!(err, DeployerError::DeleteNetwork(_)));
    assert_eq!(
        deployer.cluster().ops().await,
        vec![Op::DeleteWorkload, Op::DeleteNetwork]
    );
}

#[fluvio_future::test]
async fn test_list_uses_label_selector() {
    let deployer = SimpleDeployer::new(RecordingCluster::default());

    let servers = deployer.list_servers("ns1").await.expect("list");
    assert!(servers.is_empty());

    let calls = deployer.cluster().calls.lock().await.clone();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].op, Op::ListWorkloads);
    assert_eq!(calls[0].namespace, "ns1");
    assert_eq!(calls[0].name, server_label_selector());
    assert_eq!(calls[0].name, "mcp.opendatahub.io/mcp-server=true");
}

#[fluvio_future::test]
async fn test_list_looks_up_endpoint_only_when_available() {
    let mut networks = BTreeMap::new();
    networks.insert("ready".to_owned(), service("ready", 9000));
    networks.insert("pending".to_owned(), service("pending", 9001));

    let cluster = RecordingCluster {
        workloads: vec![workload("ready", Some(1)), workload("pending", Some(0))],
        networks,
        ..Default::default()
    };
    let deployer = SimpleDeployer::new(cluster);

    let servers = deployer.list_servers("ns1").await.expect("list");

    assert_eq!(servers.len(), 2);
    assert_eq!(servers[0].name, "ready");
    assert!(servers[0].available);
    assert_eq!(servers[0].endpoint, "ready:9000");
    assert_eq!(servers[0].image, "ready:latest");
    assert_eq!(servers[1].name, "pending");
    assert!(!servers[1].available);
    assert_eq!(servers[1].endpoint, "");

    assert_eq!(
        deployer.cluster().ops().await,
        vec![Op::ListWorkloads, Op::GetNetwork]
    );
}

#[fluvio_future::test]
async fn test_list_ignores_endpoint_lookup_failure() {
    let cluster = RecordingCluster {
        workloads: vec![workload("ready", Some(1)), workload("orphan", Some(2))],
        failing: [Op::GetNetwork].into_iter().collect(),
        ..Default::default()
    };
    let deployer = SimpleDeployer::new(cluster);

    let servers = deployer.list_servers("ns1").await.expect("list");

    assert_eq!(servers.len(), 2);
    for server in &servers {
        assert!(server.available);
        assert_eq!(server.endpoint, "");
    }
}

#[fluvio_future::test]
async fn test_list_ignores_endpoint_client_error() {
    let mut networks = BTreeMap::new();
    networks.insert("ready".to_owned(), service("ready", 9000));

    let cluster = RecordingCluster {
        workloads: vec![workload("ready", Some(1))],
        networks,
        broken: [Op::GetNetwork].into_iter().collect(),
        ..Default::default()
    };
    let deployer = SimpleDeployer::new(cluster);

    let servers = deployer.list_servers("ns1").await.expect("list");

    assert_eq!(servers.len(), 1);
    assert_eq!(servers[0].name, "ready");
    assert!(servers[0].available);
    assert_eq!(servers[0].endpoint, "");
    assert_eq!(
        deployer.cluster().ops().await,
        vec![Op::ListWorkloads, Op::GetNetwork]
    );
}

#[fluvio_future::test]
async fn test_list_failure_is_reported() {
    let deployer = SimpleDeployer::new(RecordingCluster::failing(&[Op::ListWorkloads]));

    let err = deployer.list_servers("ns1").await.expect_err("should fail");
    assert!(matches!(err, DeployerError::ListWorkloads(_)));
    assert_eq!(err.to_string(), "failed to list deployments");
}
