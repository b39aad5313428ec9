// src/engine/fold.rs

//! Serial fold with an explicit continue/bail decision.

use crate::graph::ScriptResult;

/// Whether a serial chain may schedule its next element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Bail,
}

impl Flow {
    /// Bail check against the latest settled result of a chain.
    ///
    /// Only a failed result under `bail = true` stops the chain; an element
    /// that produced nothing lets it continue.
    pub fn after(bail: bool, latest: Option<&ScriptResult>) -> Self {
        match latest {
            Some(result) if bail && !result.is_success() => Flow::Bail,
            _ => Flow::Continue,
        }
    }
}

/// Accumulator of a serial chain.
///
/// Each settled element is pushed together with the flow it implies. Once a
/// push reports `Flow::Bail` the chain is closed and later elements are
/// never started, so they contribute no entries.
#[derive(Debug, Clone)]
pub struct SerialFold<T> {
    items: Vec<T>,
    flow: Flow,
}

impl<T> SerialFold<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            flow: Flow::Continue,
        }
    }

    pub fn should_continue(&self) -> bool {
        self.flow == Flow::Continue
    }

    pub fn push(&mut self, item: T, flow: Flow) {
        debug_assert!(self.should_continue(), "pushed into a bailed chain");
        self.items.push(item);
        self.flow = flow;
    }

    pub fn finish(self) -> (Vec<T>, Flow) {
        (self.items, self.flow)
    }
}
