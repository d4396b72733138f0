//! Per-invocation state handed to command handlers.

use crate::parsers::Value;
use crate::principal::Principal;

/// Originating principal plus every parameter value bound so far along the
/// matched path, in binding order (ancestors first).
///
/// Created fresh for each dispatch and dropped when the walk ends.
pub struct InvocationContext<'a> {
    principal: &'a dyn Principal,
    arguments: Vec<(String, Value)>,
}

impl<'a> InvocationContext<'a> {
    pub fn new(principal: &'a dyn Principal) -> Self {
        Self {
            principal,
            arguments: Vec::new(),
        }
    }

    pub fn principal(&self) -> &'a dyn Principal {
        self.principal
    }

    /// Value bound under `label`; the most recent binding wins.
    pub fn get(&self, label: &str) -> Option<&Value> {
        self.arguments
            .iter()
            .rev()
            .find(|(bound, _)| bound == label)
            .map(|(_, value)| value)
    }

    pub fn arguments(&self) -> &[(String, Value)] {
        &self.arguments
    }

    /// Unlabelled parameters are passed positionally but never bound here.
    pub(crate) fn bind(&mut self, label: &str, value: Value) {
        if !label.is_empty() {
            self.arguments.push((label.to_string(), value));
        }
    }
}
