pub mod config;
pub mod error;
pub mod supervisor;
pub mod tracing_init;
