use k8s_openapi::serde_json::{self, json};

use super::*;

fn pod(value: serde_json::Value) -> corev1::Pod {
    serde_json::from_value(value).unwrap()
}

#[test]
fn node_without_spec_is_schedulable() {
    let node = corev1::Node::new("ip-10-0-0-1");
    assert!(!node.is_unschedulable());
    assert_eq!(node.metadata.name.as_deref(), Some("ip-10-0-0-1"));
}

#[test]
fn unschedulable_sets_the_spec_flag() {
    let node = corev1::Node::new("ip-10-0-0-1").unschedulable(true);
    assert!(node.is_unschedulable());

    let node = node.unschedulable(false);
    assert!(!node.is_unschedulable());
    assert_eq!(node.spec.and_then(|spec| spec.unschedulable), Some(false));
}

#[test]
fn namespaced_name() {
    let pod = pod(json!({"metadata": {"name": "web-0", "namespace": "shop"}}));
    assert_eq!(pod.namespaced_name(), "shop/web-0");
}

#[test]
fn mirror_pod_is_detected_by_annotation() {
    let mirror = pod(json!({
        "metadata": {
            "name": "kube-apiserver",
            "annotations": {"kubernetes.io/config.mirror": "abc"},
        }
    }));
    assert!(mirror.is_mirror());
    assert!(!pod(json!({"metadata": {"name": "web-0"}})).is_mirror());
}

#[test]
fn finished_phases() {
    for (phase, finished) in [
        ("Succeeded", true),
        ("Failed", true),
        ("Running", false),
        ("Pending", false),
    ] {
        let pod = pod(json!({"status": {"phase": phase}}));
        assert_eq!(pod.is_finished(), finished, "{phase}");
    }
}

#[test]
fn only_the_controller_owner_counts() {
    let pod = pod(json!({
        "metadata": {
            "ownerReferences": [
                {"apiVersion": "v1", "kind": "ConfigMap", "name": "cfg", "uid": "1"},
                {"apiVersion": "apps/v1", "kind": "DaemonSet", "name": "aws-node", "uid": "2", "controller": true},
            ]
        }
    }));
    assert_eq!(pod.controller().map(|owner| owner.name.as_str()), Some("aws-node"));
    let daemonset = pod.controlled_by("DaemonSet");
    assert_eq!(daemonset.map(|owner| owner.uid.as_str()), Some("2"));
    assert!(pod.controlled_by("ConfigMap").is_none());
}

#[test]
fn empty_dir_is_local_storage() {
    let scratch = pod(json!({
        "spec": {
            "containers": [],
            "volumes": [{"name": "scratch", "emptyDir": {}}],
        }
    }));
    assert!(scratch.has_local_storage());

    let config = pod(json!({
        "spec": {
            "containers": [],
            "volumes": [{"name": "config", "configMap": {"name": "cfg"}}],
        }
    }));
    assert!(!config.has_local_storage());
}

#[test]
fn namespaced_metadata() {
    let meta = metav1::ObjectMeta::with_namespace("web-0", "shop");
    assert_eq!(meta.name.as_deref(), Some("web-0"));
    assert_eq!(meta.namespace.as_deref(), Some("shop"));
    assert!(meta.labels.is_none());
}
