pub mod cli;
pub mod inventory;
pub mod run;
