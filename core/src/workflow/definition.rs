// shopfront/src/workflow/definition.rs

//! `Workflow<TData>`: an ordered list of named steps, each with `before`, `on`
//! and `after` handlers operating on a `Shared<TData>` context.

use crate::error::Result;
use crate::shared::Shared;
use crate::workflow::control::StepControl;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<StepControl>> + Send>>;

/// Async handler over the workflow context.
///
/// Handlers must drop any lock guard on the context before awaiting.
pub type StepHandler<TData> = Box<dyn Fn(Shared<TData>) -> HandlerFuture + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepDef {
  pub name: String,
  /// Optional steps may have no handlers, and their failures are logged
  /// instead of failing the run.
  pub optional: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Phase {
  Before,
  On,
  After,
}

impl Phase {
  pub(crate) const ORDER: [Phase; 3] = [Phase::Before, Phase::On, Phase::After];

  pub(crate) fn label(&self) -> &'static str {
    match self {
      Phase::Before => "before",
      Phase::On => "on",
      Phase::After => "after",
    }
  }
}

pub struct Workflow<TData>
where
  TData: 'static + Send + Sync,
{
  pub(crate) name: String,
  pub(crate) steps: Vec<StepDef>,
  pub(crate) handlers: HashMap<(String, Phase), Vec<StepHandler<TData>>>,
}

impl<TData> std::fmt::Debug for Workflow<TData>
where
  TData: 'static + Send + Sync,
{
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Workflow")
      .field("name", &self.name)
      .field("steps", &self.steps)
      .field("handler_count", &self.handlers.values().map(Vec::len).sum::<usize>())
      .finish()
  }
}

impl<TData> Workflow<TData>
where
  TData: 'static + Send + Sync,
{
  /// `step_defs` are `(name, optional)` pairs in execution order.
  pub fn new(name: &str, step_defs: &[(&str, bool)]) -> Self {
    Self {
      name: name.to_string(),
      steps: step_defs
        .iter()
        .map(|(name, optional)| StepDef {
          name: (*name).to_string(),
          optional: *optional,
        })
        .collect(),
      handlers: HashMap::new(),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn step_names(&self) -> Vec<&str> {
    self.steps.iter().map(|s| s.name.as_str()).collect()
  }

  /// Setup errors (a misspelled step name) are programming errors and panic.
  fn ensure_step_exists(&self, step_name: &str) {
    if !self.steps.iter().any(|s| s.name == step_name) {
      panic!(
        "Workflow '{}' setup error: step '{}' is not defined.",
        self.name, step_name
      );
    }
  }

  pub fn insert_after_step(&mut self, existing_step_name: &str, new_step_name: &str, optional: bool) {
    self.ensure_step_exists(existing_step_name);
    if self.steps.iter().any(|s| s.name == new_step_name) {
      panic!(
        "Workflow '{}' setup error: step '{}' already exists.",
        self.name, new_step_name
      );
    }
    let idx = self
      .steps
      .iter()
      .position(|s| s.name == existing_step_name)
      .map_or(self.steps.len(), |i| i + 1);
    self.steps.insert(
      idx,
      StepDef {
        name: new_step_name.to_string(),
        optional,
      },
    );
  }

  pub fn set_optional(&mut self, step_name: &str, optional: bool) {
    self.ensure_step_exists(step_name);
    for step in self.steps.iter_mut().filter(|s| s.name == step_name) {
      step.optional = optional;
    }
  }

  pub fn before<F, Fut>(&mut self, step_name: &str, handler_fn: F)
  where
    F: Fn(Shared<TData>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<StepControl>> + Send + 'static,
  {
    self.register(step_name, Phase::Before, handler_fn);
  }

  pub fn on<F, Fut>(&mut self, step_name: &str, handler_fn: F)
  where
    F: Fn(Shared<TData>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<StepControl>> + Send + 'static,
  {
    self.register(step_name, Phase::On, handler_fn);
  }

  pub fn after<F, Fut>(&mut self, step_name: &str, handler_fn: F)
  where
    F: Fn(Shared<TData>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<StepControl>> + Send + 'static,
  {
    self.register(step_name, Phase::After, handler_fn);
  }

  fn register<F, Fut>(&mut self, step_name: &str, phase: Phase, handler_fn: F)
  where
    F: Fn(Shared<TData>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<StepControl>> + Send + 'static,
  {
    self.ensure_step_exists(step_name);
    let handler: StepHandler<TData> = Box::new(move |ctx| -> HandlerFuture { Box::pin(handler_fn(ctx)) });
    self
      .handlers
      .entry((step_name.to_string(), phase))
      .or_default()
      .push(handler);
  }

  pub(crate) fn handlers_for(&self, step_name: &str, phase: Phase) -> &[StepHandler<TData>] {
    self
      .handlers
      .get(&(step_name.to_string(), phase))
      .map(Vec::as_slice)
      .unwrap_or(&[])
  }

  pub(crate) fn has_handlers(&self, step_name: &str) -> bool {
    Phase::ORDER
      .iter()
      .any(|phase| !self.handlers_for(step_name, *phase).is_empty())
  }
}
