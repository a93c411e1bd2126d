//! Session bootstrap
//!
//! Decides which screen a freshly mounted widget shows first. The decision
//! logic is a pure state machine ([`transition`]); [`BootstrapSequencer`]
//! drives it against the real validators and publishes progress as a stream.

pub mod messages;
mod sequencer;
mod state;
mod transition;

pub use sequencer::{BootstrapOptions, BootstrapSequencer, BootstrapStream};
pub use state::{
    BootstrapOutcome, BootstrapState, BootstrapUpdate, ScreenSelection, StatusMessage,
    ValidationOutcome,
};
pub use transition::{transition, BootstrapEffect, BootstrapInput, BootstrapMachine};
