//! Parley Convex Storage
//!
//! Client for the widget backend's hosted Convex deployment. Functions are
//! invoked over the HTTP function API (`/api/query`, `/api/mutation`,
//! `/api/action`). The client implements both bootstrap validators and the
//! dashboard's widget-settings calls.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Re-exports
pub use parley_core;

pub mod convex;
pub mod validators;
pub mod widget_settings;

pub use convex::{ConvexClient, ConvexConfig, FunctionKind};
