use std::fmt;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::default_pod_path;
use crate::error::{KftError, Result};
use crate::kubectl::Kubectl;
use crate::target::PodTarget;

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// local -> pod
    Upload,
    /// pod -> local
    Download,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Upload => "upload",
            Direction::Download => "download",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Direction::Upload => "Upload to Pod",
            Direction::Download => "Download from Pod",
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Direction::Upload => Direction::Download,
            Direction::Download => Direction::Upload,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TransferRequest
// ---------------------------------------------------------------------------

/// One `kubectl cp` between a local path and a path inside a pod.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub direction: Direction,
    pub local_path: String,
    #[serde(default = "default_pod_path")]
    pub pod_path: String,
    #[serde(flatten)]
    pub target: PodTarget,
}

impl TransferRequest {
    pub fn new(
        direction: Direction,
        local_path: impl Into<String>,
        pod_path: impl Into<String>,
        target: PodTarget,
    ) -> Self {
        Self {
            direction,
            local_path: local_path.into(),
            pod_path: pod_path.into(),
            target,
        }
    }

    /// One upload per local source, all to the same pod path.
    pub fn uploads(local_paths: &[String], pod_path: &str, target: &PodTarget) -> Vec<Self> {
        local_paths
            .iter()
            .map(|local| Self::new(Direction::Upload, local.clone(), pod_path, target.clone()))
            .collect()
    }

    pub fn normalized(mut self) -> Self {
        self.local_path = self.local_path.trim().to_string();
        self.pod_path = self.pod_path.trim().to_string();
        self.target = self.target.normalized();
        self
    }

    /// Flip the direction and exchange the local and pod paths.
    pub fn swapped(self) -> Self {
        Self {
            direction: self.direction.flipped(),
            local_path: self.pod_path,
            pod_path: self.local_path,
            target: self.target,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.target.require_ready()?;
        self.target.validate()?;
        if self.local_path.trim().is_empty() {
            return Err(KftError::MissingPath("local"));
        }
        if self.pod_path.trim().is_empty() {
            return Err(KftError::MissingPath("pod"));
        }
        Ok(())
    }

    /// `(source, destination)` operands for `kubectl cp`.
    pub fn operands(&self) -> (String, String) {
        let remote = self.target.pod_ref(&self.pod_path);
        match self.direction {
            Direction::Upload => (self.local_path.clone(), remote),
            Direction::Download => (remote, self.local_path.clone()),
        }
    }
}

// ---------------------------------------------------------------------------
// TransferOutcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferOutcome {
    pub success: bool,
    pub output: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i32>,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
}

/// Validate and run a single transfer. A kubectl failure is reported in the
/// outcome; only an invalid request or a kubectl that cannot be started is
/// an `Err`.
pub fn execute(kubectl: &Kubectl, request: &TransferRequest) -> Result<TransferOutcome> {
    request.validate()?;
    let (src, dst) = request.operands();
    tracing::info!(direction = %request.direction, %src, %dst, "transfer started");

    let started_at = Utc::now();
    let clock = Instant::now();
    let out = kubectl.cp(
        request.target.context.as_deref(),
        &src,
        &dst,
        request.target.container.as_deref(),
    )?;
    let duration_ms = clock.elapsed().as_millis() as u64;

    let success = out.success();
    let error = (!success).then(|| {
        let stderr = out.stderr.trim();
        if stderr.is_empty() {
            match out.code {
                Some(code) => format!("kubectl exited with code {code}"),
                None => "kubectl was terminated by a signal".to_string(),
            }
        } else {
            stderr.to_string()
        }
    });

    if success {
        tracing::info!(direction = %request.direction, duration_ms, "transfer completed");
    } else {
        tracing::warn!(
            direction = %request.direction,
            code = ?out.code,
            error = error.as_deref().unwrap_or_default(),
            "transfer failed"
        );
    }

    Ok(TransferOutcome {
        success,
        output: out.stdout,
        error,
        code: out.code,
        started_at,
        duration_ms,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
