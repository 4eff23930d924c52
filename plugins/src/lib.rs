pub mod factory;
pub mod plan;
pub mod processors;
pub mod renderers;
pub mod tasks;
