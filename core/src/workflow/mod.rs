// shopfront/src/workflow/mod.rs

//! A small step runner the storefront flows are built on.

pub mod control;
pub mod definition;
pub mod execution;

pub use control::{StepControl, WorkflowOutcome};
pub use definition::{HandlerFuture, StepDef, StepHandler, Workflow};
