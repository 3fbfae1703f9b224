pub mod config;
pub mod history;
pub mod log;
pub mod predict;
pub mod stats;
