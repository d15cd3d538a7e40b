//! Readiness predicates for kinds that are polled after apply
//!
//! These are pure functions over the desired object and the object the API
//! server returned; fetching is done by the handler.

use k8s_openapi::api::apps::v1::{DaemonSet, Deployment};
use k8s_openapi::api::core::v1::Service;

const LOAD_BALANCER: &str = "LoadBalancer";

/// A Deployment is ready when its available replicas equal the desired count
///
/// The desired count comes from the manifest and defaults to 1.
pub fn deployment_ready(desired: &Deployment, observed: &Deployment) -> bool {
    let wanted = desired.spec.as_ref().and_then(|s| s.replicas).unwrap_or(1);
    let available = observed
        .status
        .as_ref()
        .and_then(|s| s.available_replicas)
        .unwrap_or(0);

    available == wanted
}

/// A DaemonSet is ready when no scheduled pod is unavailable
pub fn daemonset_ready(observed: &DaemonSet) -> bool {
    observed
        .status
        .as_ref()
        .and_then(|s| s.number_unavailable)
        .unwrap_or(0)
        == 0
}

/// A LoadBalancer Service is ready once an external address is assigned
///
/// Other Service types offer no signal to wait on and count as ready.
pub fn service_ready(observed: &Service) -> bool {
    if !is_load_balancer(observed) {
        return true;
    }

    observed
        .status
        .as_ref()
        .and_then(|s| s.load_balancer.as_ref())
        .and_then(|lb| lb.ingress.as_ref())
        .is_some_and(|ingress| !ingress.is_empty())
}

/// `http://<address>:<first port>` for every assigned load-balancer address
pub fn load_balancer_endpoints(service: &Service) -> Vec<String> {
    let port = service
        .spec
        .as_ref()
        .and_then(|s| s.ports.as_ref())
        .and_then(|ports| ports.first())
        .map(|p| p.port);

    let Some(ingress) = service
        .status
        .as_ref()
        .and_then(|s| s.load_balancer.as_ref())
        .and_then(|lb| lb.ingress.as_ref())
    else {
        return Vec::new();
    };

    ingress
        .iter()
        .filter_map(|entry| entry.ip.as_deref().or(entry.hostname.as_deref()))
        .map(|address| match port {
            Some(port) => format!("http://{}:{}", address, port),
            None => format!("http://{}", address),
        })
        .collect()
}

fn is_load_balancer(service: &Service) -> bool {
    service
        .spec
        .as_ref()
        .and_then(|s| s.type_.as_deref())
        == Some(LOAD_BALANCER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::apps::v1::{DaemonSetStatus, DeploymentSpec, DeploymentStatus};
    use k8s_openapi::api::core::v1::{
        LoadBalancerIngress, LoadBalancerStatus, ServicePort, ServiceSpec, ServiceStatus,
    };

    fn deployment(replicas: Option<i32>, available: Option<i32>) -> Deployment {
        Deployment {
            spec: Some(DeploymentSpec {
                replicas,
                ..Default::default()
            }),
            status: Some(DeploymentStatus {
                available_replicas: available,
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn service(type_: &str, addresses: &[&str]) -> Service {
        Service {
            spec: Some(ServiceSpec {
                type_: Some(type_.to_string()),
                ports: Some(vec![ServicePort {
                    port: 9090,
                    ..Default::default()
                }]),
                ..Default::default()
            }),
            status: Some(ServiceStatus {
                load_balancer: Some(LoadBalancerStatus {
                    ingress: Some(
                        addresses
                            .iter()
                            .map(|ip| LoadBalancerIngress {
                                ip: Some(ip.to_string()),
                                ..Default::default()
                            })
                            .collect(),
                    ),
                }),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_deployment_ready_exactly_at_desired() {
        let desired = deployment(Some(3), None);
        for available in 0..3 {
            assert!(!deployment_ready(&desired, &deployment(None, Some(available))));
        }
        assert!(deployment_ready(&desired, &deployment(None, Some(3))));
    }

    #[test]
    fn test_deployment_desired_defaults_to_one() {
        let desired = Deployment::default();
        assert!(!deployment_ready(&desired, &Deployment::default()));
        assert!(deployment_ready(&desired, &deployment(None, Some(1))));
    }

    #[test]
    fn test_daemonset_ready() {
        let unavailable = |n: Option<i32>| DaemonSet {
            status: Some(DaemonSetStatus {
                number_unavailable: n,
                ..Default::default()
            }),
            ..Default::default()
        };

        assert!(daemonset_ready(&unavailable(None)));
        assert!(daemonset_ready(&unavailable(Some(0))));
        assert!(!daemonset_ready(&unavailable(Some(2))));
        assert!(daemonset_ready(&DaemonSet::default()));
    }

    #[test]
    fn test_service_ready() {
        assert!(service_ready(&service("ClusterIP", &[])));
        assert!(service_ready(&service("NodePort", &[])));
        assert!(!service_ready(&service("LoadBalancer", &[])));
        assert!(service_ready(&service("LoadBalancer", &["203.0.113.7"])));
    }

    #[test]
    fn test_load_balancer_endpoints() {
        let svc = service("LoadBalancer", &["203.0.113.7", "203.0.113.8"]);
        assert_eq!(
            load_balancer_endpoints(&svc),
            vec!["http://203.0.113.7:9090", "http://203.0.113.8:9090"]
        );
        assert!(load_balancer_endpoints(&Service::default()).is_empty());
    }
}
