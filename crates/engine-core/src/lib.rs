pub mod collate;
pub mod config;
pub mod context;
pub mod error;
pub mod metrics;
pub mod progress;
