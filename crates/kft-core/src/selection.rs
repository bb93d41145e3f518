//! Target resolution: explicit choices, then configured defaults, then the
//! same auto-selection a user would get from the cluster browser.

use crate::config::Defaults;
use crate::error::{KftError, Result};
use crate::kubectl::Kubectl;
use crate::target::PodTarget;

pub const DEFAULT_NAMESPACE: &str = "default";

/// A context is picked automatically only when it is the only one.
pub fn auto_context(contexts: &[String]) -> Option<String> {
    match contexts {
        [only] => Some(only.clone()),
        _ => None,
    }
}

/// `default` is picked whenever the cluster has it.
pub fn auto_namespace(namespaces: &[String]) -> Option<String> {
    namespaces
        .iter()
        .find(|ns| *ns == DEFAULT_NAMESPACE)
        .cloned()
}

/// A single-container pod gets its container picked; with several, the
/// choice is left to the user (kubectl then uses the default container).
pub fn auto_container(containers: &[String]) -> Option<String> {
    match containers {
        [only] => Some(only.clone()),
        _ => None,
    }
}

/// Explicit choices the user made for this invocation.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub context: Option<String>,
    pub namespace: Option<String>,
    pub container: Option<String>,
}

/// Resolve the context: override, default, the only context, then
/// kubectl's current-context.
pub fn resolve_context(
    kubectl: &Kubectl,
    defaults: &Defaults,
    overrides: &Overrides,
) -> Result<String> {
    if let Some(c) = overrides.context.clone().or_else(|| defaults.context.clone()) {
        return Ok(c);
    }
    let contexts = kubectl.get_contexts()?;
    if let Some(c) = auto_context(&contexts) {
        return Ok(c);
    }
    kubectl
        .current_context()?
        .ok_or(KftError::IncompleteTarget("context"))
}

/// Resolve only context and namespace (for listing pods).
pub fn resolve_scope(
    kubectl: &Kubectl,
    defaults: &Defaults,
    overrides: &Overrides,
) -> Result<(String, String)> {
    let context = resolve_context(kubectl, defaults, overrides)?;

    let namespace = match overrides
        .namespace
        .clone()
        .or_else(|| defaults.namespace.clone())
    {
        Some(ns) => ns,
        None => {
            let namespaces = kubectl.get_namespaces(Some(&context))?;
            auto_namespace(&namespaces).ok_or(KftError::IncompleteTarget("namespace"))?
        }
    };

    tracing::debug!(%context, %namespace, "resolved scope");
    Ok((context, namespace))
}

/// Resolve a full target for `pod`. The container is looked up only when
/// neither an override nor a default names one.
pub fn resolve_target(
    kubectl: &Kubectl,
    defaults: &Defaults,
    overrides: &Overrides,
    pod: &str,
) -> Result<PodTarget> {
    let (context, namespace) = resolve_scope(kubectl, defaults, overrides)?;
    let mut target = PodTarget::new(pod)
        .with_context(context)
        .with_namespace(namespace);

    target.container = match overrides
        .container
        .clone()
        .or_else(|| defaults.container.clone())
    {
        Some(c) => Some(c),
        None => {
            let containers = kubectl.get_pod_containers(
                target.context.as_deref(),
                target.namespace.as_deref(),
                pod,
            )?;
            auto_container(&containers)
        }
    };

    let target = target.normalized();
    target.validate()?;
    Ok(target)
}
