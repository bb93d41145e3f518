use thiserror::Error;

#[derive(Debug, Error)]
pub enum KftError {
    #[error("kubectl not found: install it or pass --kubectl")]
    KubectlNotFound,

    #[error("failed to spawn kubectl: {0}")]
    SpawnFailed(String),

    #[error("kubectl exited with code {}: {}", code_display(.code), .stderr.trim())]
    CommandFailed { code: Option<i32>, stderr: String },

    #[error("invalid {kind} name '{name}': must be lowercase alphanumeric with '-' or '.'")]
    InvalidName { kind: &'static str, name: String },

    #[error("no {0} selected: configure the Kubernetes connection first")]
    IncompleteTarget(&'static str),

    #[error("{0} path is required")]
    MissingPath(&'static str),

    #[error("invalid config key '{0}'")]
    InvalidConfigKey(String),

    #[error("home directory not found: set HOME or KFT_HOME")]
    HomeNotFound,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn code_display(code: &Option<i32>) -> String {
    code.map(|c| c.to_string())
        .unwrap_or_else(|| "signal".to_string())
}

pub type Result<T> = std::result::Result<T, KftError>;
