use kft_core::config::Config;
use kft_core::kubectl::Kubectl;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub home: PathBuf,
    pub config: Arc<Config>,
    pub kubectl: Kubectl,
    /// Serializes reads and writes of `history.yaml` so a clear cannot be
    /// undone by a transfer that loaded the file before it.
    pub history_lock: Arc<std::sync::Mutex<()>>,
    transfer_slot: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(home: PathBuf, config: Config, kubectl: Kubectl) -> Self {
        Self {
            home,
            config: Arc::new(config),
            kubectl,
            history_lock: Arc::new(std::sync::Mutex::new(())),
            transfer_slot: Arc::new(Mutex::new(())),
        }
    }

    /// Claim the single transfer slot. `None` while another transfer runs;
    /// the slot frees when the guard drops.
    pub fn try_begin_transfer(&self) -> Option<OwnedMutexGuard<()>> {
        self.transfer_slot.clone().try_lock_owned().ok()
    }
}
