//! Promise evaluators and their registry.
//!
//! Each evaluator is one strategy for judging a promise against evidence:
//! [`RuleBasedEvaluator`] applies deterministic rules, the
//! [`InterpretiveEvaluator`] delegates to a reasoning backend behind the
//! [`Interpreter`] seam. The registry maps strategy names to instances and
//! is immutable after construction — the table is built once from an
//! explicit list, with no late registration.

mod interpretive;
mod rules;

pub use interpretive::{
    Assessment, EvidenceSummary, HeuristicInterpreter, Interpreter, InterpretiveEvaluator,
    WeeklyElevatedSummary, WeeklySessionCount, MAX_INTERPRETIVE_CONFIDENCE,
};
pub use rules::RuleBasedEvaluator;

use crate::evidence::Evidence;
use crate::promise::Promise;
use crate::verdict::Verdict;

/// Uniform evaluation contract.
///
/// `evaluate` is a pure function of its inputs: no shared mutable state, no
/// I/O, no partial failure. Unknown promise kinds degrade to a failure
/// verdict, never a panic or error. Implementations are `Send + Sync` so
/// independent evaluations can run on separate threads without
/// coordination.
pub trait PromiseEvaluator: Send + Sync {
    fn evaluate(&self, promise: &Promise, evidence: &Evidence) -> Verdict;
}

/// Name-keyed table of evaluator instances.
///
/// Built once from an explicit `(name, instance)` list; lookups borrow from
/// the table and there is no way to add entries afterwards.
pub struct EvaluatorRegistry {
    entries: Vec<(&'static str, Box<dyn PromiseEvaluator>)>,
}

impl EvaluatorRegistry {
    /// The standard table: the deterministic rule evaluator and the
    /// interpretive evaluator with its built-in heuristic backend.
    pub fn with_defaults() -> Self {
        Self {
            entries: vec![
                ("rule_based", Box::new(RuleBasedEvaluator::new())),
                ("interpretive", Box::new(InterpretiveEvaluator::heuristic())),
            ],
        }
    }

    /// Build a registry from an explicit entry list.
    pub fn new(entries: Vec<(&'static str, Box<dyn PromiseEvaluator>)>) -> Self {
        Self { entries }
    }

    /// Find an evaluator by strategy name.
    pub fn lookup(&self, name: &str) -> Option<&dyn PromiseEvaluator> {
        self.entries
            .iter()
            .find(|(entry_name, _)| *entry_name == name)
            .map(|(_, evaluator)| evaluator.as_ref())
    }

    /// Registered strategy names, in registration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|(name, _)| *name).collect()
    }
}

impl Default for EvaluatorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_entries() {
        let registry = EvaluatorRegistry::with_defaults();
        assert_eq!(registry.names(), vec!["rule_based", "interpretive"]);
        assert!(registry.lookup("rule_based").is_some());
        assert!(registry.lookup("interpretive").is_some());
    }

    #[test]
    fn test_lookup_unknown_name_is_none() {
        let registry = EvaluatorRegistry::with_defaults();
        assert!(registry.lookup("llm").is_none());
        assert!(registry.lookup("").is_none());
    }
}
