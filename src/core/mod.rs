pub mod config;
pub mod ids;
pub mod memory;
pub mod stage;
