use crate::error::{KftError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// File layout under the kft home directory
// ---------------------------------------------------------------------------

pub const HOME_DIR: &str = ".kft";
pub const CONFIG_FILE: &str = "config.yaml";
pub const HISTORY_FILE: &str = "history.yaml";

pub fn config_path(home: &Path) -> PathBuf {
    home.join(CONFIG_FILE)
}

pub fn history_path(home: &Path) -> PathBuf {
    home.join(HISTORY_FILE)
}

/// Resolve the kft home directory.
///
/// Priority:
/// 1. `--home` flag / `KFT_HOME` env var (passed in as `explicit`)
/// 2. `~/.kft`
pub fn resolve_home(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(p) = explicit {
        return Ok(p.to_path_buf());
    }
    let home = home::home_dir().ok_or(KftError::HomeNotFound)?;
    Ok(home.join(HOME_DIR))
}

// ---------------------------------------------------------------------------
// Kubernetes object name validation
// ---------------------------------------------------------------------------

static NAME_RE: OnceLock<Regex> = OnceLock::new();

fn name_re() -> &'static Regex {
    NAME_RE.get_or_init(|| {
        Regex::new(r"^[a-z0-9]([a-z0-9.\-]*[a-z0-9])?$").expect("object name regex is valid")
    })
}

/// Validate a namespace, pod or container name (RFC 1123 subdomain rules).
pub fn validate_name(kind: &'static str, name: &str) -> Result<()> {
    if name.is_empty() || name.len() > 253 || !name_re().is_match(name) {
        return Err(KftError::InvalidName {
            kind,
            name: name.to_string(),
        });
    }
    Ok(())
}
