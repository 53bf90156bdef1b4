pub mod bot;
pub mod commands;
pub mod completion;
pub mod config;
pub mod error;
pub mod memory;
pub mod relay;
pub mod types;

pub use bot::run;
