//! kubectl subprocess invocation.
//!
//! Every cluster query and copy goes through [`Kubectl`]. Arguments are
//! passed to the child as an argv vector; nothing is interpreted by a shell,
//! so pod names and paths with spaces or quotes arrive at kubectl verbatim.
//!
//! # Commands
//! - contexts:   `kubectl config get-contexts -o name`
//! - namespaces: `kubectl [--context=C] get namespaces -o name`
//! - pods:       `kubectl [--context=C] get pods -o name [-n NS]`
//! - containers: `kubectl [--context=C] get pod [-n NS] POD -o jsonpath=...`
//! - files:      `kubectl [--context=C] exec POD [-n NS] [-c C] -- ls -la PATH`
//! - copy:       `kubectl [--context=C] cp SRC DST [-c C]`

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use serde::Serialize;

use crate::config::KubectlConfig;
use crate::error::{KftError, Result};
use crate::listing::{parse_ls_long, PodFileEntry};
use crate::target::PodTarget;

const CONTAINERS_JSONPATH: &str = "jsonpath={.spec.containers[*].name}";

// ---------------------------------------------------------------------------
// CommandOutput
// ---------------------------------------------------------------------------

/// Captured result of one kubectl process.
#[derive(Debug, Clone, Serialize)]
pub struct CommandOutput {
    /// `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    fn into_result(self) -> Result<Self> {
        if self.success() {
            Ok(self)
        } else {
            Err(KftError::CommandFailed {
                code: self.code,
                stderr: self.stderr,
            })
        }
    }
}

/// Raw and parsed output of `ls -la` inside a pod.
#[derive(Debug, Clone, Serialize)]
pub struct PodListing {
    pub path: String,
    pub raw: String,
    pub entries: Vec<PodFileEntry>,
}

// ---------------------------------------------------------------------------
// Kubectl
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Kubectl {
    binary: PathBuf,
    kubeconfig: Option<PathBuf>,
    request_timeout: Option<String>,
}

impl Kubectl {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            kubeconfig: None,
            request_timeout: None,
        }
    }

    /// Build from config. `binary_override` (flag or env) beats
    /// `config.binary`, which beats a PATH lookup.
    pub fn from_config(config: &KubectlConfig, binary_override: Option<&Path>) -> Result<Self> {
        let binary = match binary_override.or(config.binary.as_deref()) {
            Some(p) => p.to_path_buf(),
            None => which::which("kubectl").map_err(|_| KftError::KubectlNotFound)?,
        };
        Ok(Self {
            binary,
            kubeconfig: config.kubeconfig.clone(),
            request_timeout: config.request_timeout.clone(),
        })
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    // -----------------------------------------------------------------------
    // argv builders
    // -----------------------------------------------------------------------

    /// Leading flags shared by every call. `query` adds the request timeout,
    /// which would otherwise cut long copies short.
    fn global_args(&self, context: Option<&str>, query: bool) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(kc) = &self.kubeconfig {
            args.push(format!("--kubeconfig={}", kc.display()));
        }
        if query {
            if let Some(t) = &self.request_timeout {
                args.push(format!("--request-timeout={t}"));
            }
        }
        if let Some(ctx) = context {
            args.push(format!("--context={ctx}"));
        }
        args
    }

    pub fn contexts_args(&self) -> Vec<String> {
        let mut args = self.global_args(None, true);
        args.extend(["config", "get-contexts", "-o", "name"].map(String::from));
        args
    }

    pub fn current_context_args(&self) -> Vec<String> {
        let mut args = self.global_args(None, true);
        args.extend(["config", "current-context"].map(String::from));
        args
    }

    pub fn namespaces_args(&self, context: Option<&str>) -> Vec<String> {
        let mut args = self.global_args(context, true);
        args.extend(["get", "namespaces", "-o", "name"].map(String::from));
        args
    }

    pub fn pods_args(&self, context: Option<&str>, namespace: Option<&str>) -> Vec<String> {
        let mut args = self.global_args(context, true);
        args.extend(["get", "pods", "-o", "name"].map(String::from));
        if let Some(ns) = namespace {
            args.extend(["-n".to_string(), ns.to_string()]);
        }
        args
    }

    pub fn containers_args(
        &self,
        context: Option<&str>,
        namespace: Option<&str>,
        pod: &str,
    ) -> Vec<String> {
        let mut args = self.global_args(context, true);
        args.extend(["get", "pod"].map(String::from));
        if let Some(ns) = namespace {
            args.extend(["-n".to_string(), ns.to_string()]);
        }
        args.extend([pod.to_string(), "-o".to_string(), CONTAINERS_JSONPATH.to_string()]);
        args
    }

    pub fn list_files_args(&self, target: &PodTarget, path: &str) -> Vec<String> {
        let mut args = self.global_args(target.context.as_deref(), false);
        args.extend(["exec".to_string(), target.pod.clone()]);
        if let Some(ns) = &target.namespace {
            args.extend(["-n".to_string(), ns.clone()]);
        }
        if let Some(c) = &target.container {
            args.extend(["-c".to_string(), c.clone()]);
        }
        args.extend(["--", "ls", "-la"].map(String::from));
        args.push(path.to_string());
        args
    }

    pub fn cp_args(
        &self,
        context: Option<&str>,
        src: &str,
        dst: &str,
        container: Option<&str>,
    ) -> Vec<String> {
        let mut args = self.global_args(context, false);
        args.extend(["cp".to_string(), src.to_string(), dst.to_string()]);
        if let Some(c) = container {
            args.extend(["-c".to_string(), c.to_string()]);
        }
        args
    }

    // -----------------------------------------------------------------------
    // execution
    // -----------------------------------------------------------------------

    /// Run kubectl with `args` and capture its output regardless of exit code.
    pub fn output<I, S>(&self, args: I) -> Result<CommandOutput>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        tracing::debug!(binary = %self.binary.display(), ?args, "running kubectl");

        let output = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => KftError::KubectlNotFound,
                _ => KftError::SpawnFailed(e.to_string()),
            })?;

        let out = CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        if !out.success() {
            tracing::debug!(code = ?out.code, stderr = %out.stderr.trim(), "kubectl failed");
        }
        Ok(out)
    }

    /// Like [`Kubectl::output`] but a non-zero exit becomes `CommandFailed`.
    pub fn run<I, S>(&self, args: I) -> Result<CommandOutput>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.output(args)?.into_result()
    }

    // -----------------------------------------------------------------------
    // queries
    // -----------------------------------------------------------------------

    pub fn get_contexts(&self) -> Result<Vec<String>> {
        let out = self.run(self.contexts_args())?;
        Ok(parse_names(&out.stdout, ""))
    }

    /// The kubeconfig's current context, or `None` when it is unset.
    pub fn current_context(&self) -> Result<Option<String>> {
        let out = self.output(self.current_context_args())?;
        if !out.success() {
            return Ok(None);
        }
        let ctx = out.stdout.trim();
        Ok((!ctx.is_empty()).then(|| ctx.to_string()))
    }

    pub fn get_namespaces(&self, context: Option<&str>) -> Result<Vec<String>> {
        let out = self.run(self.namespaces_args(context))?;
        Ok(parse_names(&out.stdout, "namespace/"))
    }

    pub fn get_pods(&self, context: Option<&str>, namespace: Option<&str>) -> Result<Vec<String>> {
        let out = self.run(self.pods_args(context, namespace))?;
        Ok(parse_names(&out.stdout, "pod/"))
    }

    pub fn get_pod_containers(
        &self,
        context: Option<&str>,
        namespace: Option<&str>,
        pod: &str,
    ) -> Result<Vec<String>> {
        let out = self.run(self.containers_args(context, namespace, pod))?;
        Ok(parse_words(&out.stdout))
    }

    pub fn list_pod_files(&self, target: &PodTarget, path: &str) -> Result<PodListing> {
        let out = self.run(self.list_files_args(target, path))?;
        let entries = parse_ls_long(&out.stdout);
        Ok(PodListing {
            path: path.to_string(),
            raw: out.stdout,
            entries,
        })
    }

    /// Run `kubectl cp`. The exit code is returned, not raised.
    pub fn cp(
        &self,
        context: Option<&str>,
        src: &str,
        dst: &str,
        container: Option<&str>,
    ) -> Result<CommandOutput> {
        self.output(self.cp_args(context, src, dst, container))
    }
}

// ---------------------------------------------------------------------------
// stdout parsing
// ---------------------------------------------------------------------------

/// One name per line, with an optional `kind/` prefix stripped.
pub fn parse_names(stdout: &str, prefix: &str) -> Vec<String> {
    stdout
        .trim()
        .lines()
        .map(|line| {
            let line = line.trim();
            line.strip_prefix(prefix).unwrap_or(line).to_string()
        })
        .filter(|name| !name.is_empty())
        .collect()
}

/// Whitespace-separated words, as printed by a `[*]` jsonpath.
pub fn parse_words(stdout: &str) -> Vec<String> {
    stdout.split_whitespace().map(String::from).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
