//! Per-evaluation state.

use crate::value::Value;

/// Carries the host environment through one evaluation.
///
/// A context also keeps the value produced by the most recent call, which is
/// handy when diagnosing why a record did or did not match. Evaluation takes
/// the context by `&mut`, so one context can never serve two evaluations at
/// once; reuse it sequentially (see [`Context::set_env`]) or create one per
/// thread.
#[derive(Debug)]
pub struct Context<'a, E: ?Sized> {
    env: &'a E,
    result: Option<Value>,
}

impl<'a, E: ?Sized> Context<'a, E> {
    /// Creates a context over the given environment.
    pub fn new(env: &'a E) -> Self {
        Self { env, result: None }
    }

    /// The environment accessors are invoked against.
    pub fn env(&self) -> &'a E {
        self.env
    }

    /// Points the context at another environment and clears the scratch value.
    pub fn set_env(&mut self, env: &'a E) {
        self.env = env;
        self.result = None;
    }

    /// The value returned by the most recent call, if any call has run.
    pub fn last_result(&self) -> Option<&Value> {
        self.result.as_ref()
    }

    pub(crate) fn store_result(&mut self, value: Value) -> &Value {
        self.result.insert(value)
    }
}
