use anyhow::Context;
use kft_core::config::Config;
use kft_core::kubectl::Kubectl;
use kft_core::paths;
use kft_core::selection::{self, Overrides};
use kft_core::target::PodTarget;
use std::path::{Path, PathBuf};

/// Everything a command needs: resolved home, loaded config and the
/// global flags.
pub struct Session {
    pub home: PathBuf,
    pub config: Config,
    pub json: bool,
    kubectl_override: Option<PathBuf>,
    overrides: Overrides,
}

impl Session {
    pub fn open(
        home: Option<&Path>,
        kubectl_override: Option<PathBuf>,
        context: Option<String>,
        namespace: Option<String>,
        json: bool,
    ) -> anyhow::Result<Self> {
        let home = paths::resolve_home(home)?;
        let config = Config::load(&home)
            .with_context(|| format!("failed to load {}", paths::config_path(&home).display()))?;
        Ok(Self {
            home,
            config,
            json,
            kubectl_override,
            overrides: Overrides {
                context,
                namespace,
                container: None,
            },
        })
    }

    pub fn kubectl(&self) -> anyhow::Result<Kubectl> {
        Ok(Kubectl::from_config(
            &self.config.kubectl,
            self.kubectl_override.as_deref(),
        )?)
    }

    pub fn context(&self, kubectl: &Kubectl) -> anyhow::Result<String> {
        selection::resolve_context(kubectl, &self.config.defaults, &self.overrides)
            .context("failed to resolve context")
    }

    /// Namespace given on the command line or in config, without querying.
    pub fn explicit_namespace(&self) -> Option<&str> {
        self.overrides
            .namespace
            .as_deref()
            .or(self.config.defaults.namespace.as_deref())
    }

    /// Context and namespace, auto-selected when not given.
    pub fn scope(&self, kubectl: &Kubectl) -> anyhow::Result<(String, String)> {
        selection::resolve_scope(kubectl, &self.config.defaults, &self.overrides)
            .context("failed to resolve context and namespace")
    }

    /// Full pod target; `container` overrides the configured default.
    pub fn target(
        &self,
        kubectl: &Kubectl,
        pod: &str,
        container: Option<String>,
    ) -> anyhow::Result<PodTarget> {
        let overrides = Overrides {
            container,
            ..self.overrides.clone()
        };
        selection::resolve_target(kubectl, &self.config.defaults, &overrides, pod)
            .with_context(|| format!("failed to resolve target for pod '{pod}'"))
    }

    pub fn default_pod_path(&self) -> &str {
        &self.config.defaults.pod_path
    }
}
