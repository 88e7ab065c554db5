//! Externally visible payload shapes.
//!
//! Input models are validated field by field before a handler touches the
//! store; view models are the outward projection of entities. Each update
//! model is an explicit allow-list of the fields that operation may change.

mod inputs;
mod views;

pub use inputs::{
    ClientInput, ProjectInput, TimeEntryInput, TimeEntryUpdate, UserInput,
};
pub use views::{ClientView, ProjectView, TimeEntryView, UserView};
