pub mod cluster;
pub mod config;
pub mod files;
pub mod history;
pub mod serve;
pub mod transfer;
