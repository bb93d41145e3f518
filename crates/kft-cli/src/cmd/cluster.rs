use crate::output::{print_json, print_names};
use crate::session::Session;
use anyhow::Context;
use kft_core::selection::{auto_container, auto_namespace};

// ---------------------------------------------------------------------------
// contexts
// ---------------------------------------------------------------------------

pub fn contexts(session: &Session) -> anyhow::Result<()> {
    let kubectl = session.kubectl()?;
    let contexts = kubectl
        .get_contexts()
        .context("failed to load kubectl contexts")?;
    let current = kubectl.current_context()?;

    if session.json {
        return print_json(&serde_json::json!({
            "contexts": contexts,
            "current": current,
        }));
    }

    if contexts.is_empty() {
        println!("No contexts in kubeconfig.");
        return Ok(());
    }
    print_names(&contexts, current.as_deref());
    Ok(())
}

// ---------------------------------------------------------------------------
// namespaces
// ---------------------------------------------------------------------------

pub fn namespaces(session: &Session) -> anyhow::Result<()> {
    let kubectl = session.kubectl()?;
    let context = session.context(&kubectl)?;
    let namespaces = kubectl
        .get_namespaces(Some(&context))
        .context("failed to load namespaces")?;
    let selected = session
        .explicit_namespace()
        .map(str::to_string)
        .or_else(|| auto_namespace(&namespaces));

    if session.json {
        return print_json(&serde_json::json!({
            "context": context,
            "namespaces": namespaces,
            "selected": selected,
        }));
    }

    print_names(&namespaces, selected.as_deref());
    Ok(())
}

// ---------------------------------------------------------------------------
// pods
// ---------------------------------------------------------------------------

pub fn pods(session: &Session) -> anyhow::Result<()> {
    let kubectl = session.kubectl()?;
    let (context, namespace) = session.scope(&kubectl)?;
    let pods = kubectl
        .get_pods(Some(&context), Some(&namespace))
        .context("failed to load pods")?;

    if session.json {
        return print_json(&serde_json::json!({
            "context": context,
            "namespace": namespace,
            "pods": pods,
        }));
    }

    if pods.is_empty() {
        println!("No pods in namespace '{namespace}'.");
        return Ok(());
    }
    print_names(&pods, None);
    Ok(())
}

// ---------------------------------------------------------------------------
// containers
// ---------------------------------------------------------------------------

pub fn containers(session: &Session, pod: &str) -> anyhow::Result<()> {
    let kubectl = session.kubectl()?;
    let (context, namespace) = session.scope(&kubectl)?;
    let containers = kubectl
        .get_pod_containers(Some(&context), Some(&namespace), pod)
        .with_context(|| format!("failed to load containers for pod '{pod}'"))?;
    let selected = auto_container(&containers);

    if session.json {
        return print_json(&serde_json::json!({
            "context": context,
            "namespace": namespace,
            "pod": pod,
            "containers": containers,
            "selected": selected,
        }));
    }

    print_names(&containers, selected.as_deref());
    Ok(())
}
