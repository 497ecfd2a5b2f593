//! Kubernetes objects sent to and read from the API server.
//!
//! Deployments and Services are the `k8_types` `app` and `core` objects.
//! The few fields those types leave out live in [`WorkloadOverlay`]: quantity
//! checked resources, secret backed environment variables and pod template
//! annotations.

mod quantity;
mod workload;

pub use quantity::*;
pub use workload::*;

pub use k8_types::app::deployment::{DeploymentCondition, DeploymentSpec, DeploymentStatus};
pub use k8_types::core::pod::{
    ContainerPortSpec, ContainerSpec, PodSpec, SecretVolumeSpec, VolumeMount, VolumeSpec,
};
pub use k8_types::core::service::{LoadBalancerType, ServicePort, ServiceSpec, TargetPort};
pub use k8_types::{
    InputK8Obj, InputObjectMeta, K8Obj, LabelProvider, LabelSelector, TemplateMeta, TemplateSpec,
};
