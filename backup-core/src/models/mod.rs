pub mod log;
pub mod project;
pub mod record;

// Re-export all models for easier imports
pub use log::*;
pub use project::*;
pub use record::*;
