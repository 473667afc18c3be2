// shopfront/src/workflow/execution.rs
use crate::error::{Result, StorefrontError};
use crate::shared::Shared;
use crate::workflow::control::{StepControl, WorkflowOutcome};
use crate::workflow::definition::{Phase, StepDef, Workflow};
use tracing::{event, info_span, instrument, Instrument, Level};

enum StepOutcome {
  Continue,
  Stop,
}

impl<TData> Workflow<TData>
where
  TData: 'static + Send + Sync,
{
  /// Runs every step in order against `ctx`.
  ///
  /// A failing non-optional step ends the run with `StepFailed`; a failing
  /// optional step is logged and the run moves on to the next step.
  #[instrument(
    name = "Workflow::run",
    skip_all,
    fields(workflow = %self.name, num_steps = self.steps.len()),
    err(Display)
  )]
  pub async fn run(&self, ctx: Shared<TData>) -> Result<WorkflowOutcome> {
    event!(Level::DEBUG, "Workflow starting.");

    for (step_idx, step_def) in self.steps.iter().enumerate() {
      let step_span = info_span!(
        "workflow_step",
        step_name = step_def.name.as_str(),
        step_index = step_idx,
        optional = step_def.optional
      );

      if !self.has_handlers(&step_def.name) {
        if step_def.optional {
          event!(parent: &step_span, Level::DEBUG, "Optional step has no handlers, skipping.");
          continue;
        }
        event!(parent: &step_span, Level::ERROR, "Non-optional step has no handlers.");
        return Err(StorefrontError::HandlerMissing {
          step_name: step_def.name.clone(),
        });
      }

      match self.run_step(step_def, &ctx).instrument(step_span.clone()).await {
        Ok(StepOutcome::Continue) => {}
        Ok(StepOutcome::Stop) => {
          event!(parent: &step_span, Level::INFO, "Workflow stopped by handler.");
          return Ok(WorkflowOutcome::Stopped);
        }
        Err(e) if step_def.optional => {
          event!(parent: &step_span, Level::WARN, error = %e, "Optional step failed; continuing.");
        }
        Err(e) => {
          event!(parent: &step_span, Level::ERROR, error = %e, "Step failed.");
          return Err(StorefrontError::StepFailed {
            step_name: step_def.name.clone(),
            source: Box::new(e),
          });
        }
      }
    }

    event!(Level::DEBUG, "Workflow completed.");
    Ok(WorkflowOutcome::Completed)
  }

  async fn run_step(&self, step_def: &StepDef, ctx: &Shared<TData>) -> Result<StepOutcome> {
    for phase in Phase::ORDER {
      for (handler_idx, handler_fn) in self.handlers_for(&step_def.name, phase).iter().enumerate() {
        event!(Level::TRACE, phase = phase.label(), handler_index = handler_idx, "Running handler.");
        if handler_fn(ctx.clone()).await? == StepControl::Stop {
          return Ok(StepOutcome::Stop);
        }
      }
    }
    Ok(StepOutcome::Continue)
  }
}
