//! Core type definitions for Parley

pub mod contact;
pub mod conversation;
pub mod primitives;
pub mod settings;

// Re-export commonly used types
pub use contact::*;
pub use conversation::*;
pub use primitives::*;
pub use settings::*;
