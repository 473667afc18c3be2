// shopfront/src/workflow/control.rs

/// Returned by every step handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepControl {
  Continue,
  /// Halt the workflow. Remaining handlers and steps do not run.
  Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowOutcome {
  Completed,
  /// A handler returned `StepControl::Stop`.
  Stopped,
}
