//! Parley Widget
//!
//! Runtime for the embeddable support widget. On mount the widget runs a
//! short bootstrap: validate the organization it was embedded for, validate
//! any cached contact session, then route to the error, auth or selection
//! screen. After that the widget moves between its screens in response to
//! visitor actions.
//!
//! # Example
//!
//! ```no_run
//! use parley_widget::*;
//! use std::sync::Arc;
//!
//! # async fn run(
//! #     organizations: Arc<dyn OrganizationValidator>,
//! #     sessions: Arc<dyn SessionValidator>,
//! # ) -> parley_core::Result<()> {
//! let sequencer = BootstrapSequencer::new(organizations, sessions);
//! let mut controller = WidgetController::new(sequencer, ContactSessionStore::default());
//! let screen = controller.bootstrap(Some("org_1")).await?;
//! println!("first screen: {}", screen);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub use parley_core;

pub mod bootstrap;
pub mod controller;
pub mod mount;
pub mod screens;
pub mod session_store;
pub mod validators;

pub use bootstrap::{
    transition, BootstrapEffect, BootstrapInput, BootstrapMachine, BootstrapOptions,
    BootstrapOutcome, BootstrapSequencer, BootstrapState, BootstrapStream, BootstrapUpdate,
    ScreenSelection, StatusMessage, ValidationOutcome,
};
pub use controller::WidgetController;
pub use mount::WidgetMount;
pub use screens::{WidgetScreen, WidgetState};
pub use session_store::ContactSessionStore;
pub use validators::{
    OrganizationValidation, OrganizationValidator, SessionValidation, SessionValidator,
};
