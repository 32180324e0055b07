//! Location module
//!
//! Device-location acquisition modelled as an explicit state machine.
//! Platform callbacks are translated into [`LocationEvent`]s by the caller;
//! this module only decides what state follows.

mod machine;

pub use machine::{
    transition, Coordinates, FailureReason, LocationEvent, LocationFlow, LocationState,
};
