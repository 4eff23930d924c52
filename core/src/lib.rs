pub mod api;
pub mod config;
pub mod console;
pub mod error;
pub mod inventory;
pub mod orchestrator;
pub mod processor;
pub mod result;
