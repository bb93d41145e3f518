use crate::error::{KftError, Result};
use crate::paths::validate_name;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The pod (and optionally container) a listing or transfer is addressed to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodTarget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub pod: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
}

impl PodTarget {
    pub fn new(pod: impl Into<String>) -> Self {
        Self {
            pod: pod.into(),
            ..Self::default()
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_container(mut self, container: impl Into<String>) -> Self {
        self.container = Some(container.into());
        self
    }

    /// Drop empty strings so `Some("")` never reaches a kubectl argv.
    pub fn normalized(mut self) -> Self {
        fn clean(v: Option<String>) -> Option<String> {
            v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
        }
        self.context = clean(self.context);
        self.namespace = clean(self.namespace);
        self.container = clean(self.container);
        self.pod = self.pod.trim().to_string();
        self
    }

    /// Context, namespace and pod must all be chosen before a transfer.
    pub fn is_ready(&self) -> bool {
        self.first_missing().is_none()
    }

    fn first_missing(&self) -> Option<&'static str> {
        let empty = |v: &Option<String>| v.as_deref().map_or(true, str::is_empty);
        if empty(&self.context) {
            Some("context")
        } else if empty(&self.namespace) {
            Some("namespace")
        } else if self.pod.is_empty() {
            Some("pod")
        } else {
            None
        }
    }

    /// Error with the first missing field when the target is incomplete.
    pub fn require_ready(&self) -> Result<()> {
        match self.first_missing() {
            Some(field) => Err(KftError::IncompleteTarget(field)),
            None => Ok(()),
        }
    }

    /// Validate object names. Context names are free-form in kubeconfig and
    /// are not checked.
    pub fn validate(&self) -> Result<()> {
        if self.pod.is_empty() {
            return Err(KftError::IncompleteTarget("pod"));
        }
        validate_name("pod", &self.pod)?;
        if let Some(ns) = &self.namespace {
            validate_name("namespace", ns)?;
        }
        if let Some(c) = &self.container {
            validate_name("container", c)?;
        }
        Ok(())
    }

    /// Remote operand for `kubectl cp`: `NS/POD:PATH`, or `POD:PATH` without
    /// a namespace.
    pub fn pod_ref(&self, path: &str) -> String {
        match &self.namespace {
            Some(ns) => format!("{ns}/{}:{path}", self.pod),
            None => format!("{}:{path}", self.pod),
        }
    }
}

impl fmt::Display for PodTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ns) = &self.namespace {
            write!(f, "{ns}/")?;
        }
        write!(f, "{}", self.pod)?;
        if let Some(c) = &self.container {
            write!(f, " ({c})")?;
        }
        Ok(())
    }
}
