pub mod project;
pub mod system;

// Re-export all handlers for easier imports
pub use project::*;
pub use system::*;
