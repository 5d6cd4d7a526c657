pub mod project;

// Re-export all models for easier imports
pub use project::*;
