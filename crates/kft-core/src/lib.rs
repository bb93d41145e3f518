pub mod config;
pub mod error;
pub mod history;
pub mod io;
pub mod kubectl;
pub mod listing;
pub mod paths;
pub mod selection;
pub mod target;
pub mod transfer;

#[cfg(all(test, unix))]
pub(crate) mod testing;

pub use error::{KftError, Result};
