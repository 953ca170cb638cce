//! Verdict type and composition.
//!
//! Every evaluator funnels its raw facts through [`Verdict::compose`], which
//! normalizes them into the one output schema the downstream ledger trusts:
//! fulfilled flag, clamped confidence, human-readable reasoning, structured
//! breakdown. A verdict is always fully populated; evaluation never
//! partially fails.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::promise::PromiseKind;

/// The engine's output for one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    /// Whether the promise was fulfilled.
    pub fulfilled: bool,
    /// Confidence in the verdict, 0.0 to 1.0. Rule-based evaluators always
    /// report 1.0; interpretive verdicts stay below 1.0.
    pub confidence: f64,
    /// Explanation of the verdict.
    pub reasoning: String,
    /// Evaluator-specific structured breakdown (per-period counts, gaps).
    pub details: Value,
}

impl Verdict {
    /// Normalize evaluator facts into a verdict.
    ///
    /// Confidence is clamped into `[0, 1]` (non-finite values collapse to
    /// 0.0); `details` is serialized into a JSON value with sorted keys so
    /// identical inputs always produce byte-identical verdicts.
    pub fn compose<D: Serialize>(
        fulfilled: bool,
        confidence: f64,
        reasoning: impl Into<String>,
        details: &D,
    ) -> Self {
        Self {
            fulfilled,
            confidence: clamp_confidence(confidence),
            reasoning: reasoning.into(),
            details: serde_json::to_value(details).unwrap_or(Value::Null),
        }
    }

    /// Deterministic failure verdict for a promise kind no evaluator knows.
    pub fn unknown_kind(kind: &PromiseKind) -> Self {
        Self {
            fulfilled: false,
            confidence: 0.0,
            reasoning: format!("Unknown promise type: {kind}"),
            details: Value::Object(Default::default()),
        }
    }
}

/// Clamp a confidence score into `[0, 1]`, treating NaN and infinities as
/// no confidence at all.
pub fn clamp_confidence(confidence: f64) -> f64 {
    if !confidence.is_finite() {
        return 0.0;
    }
    confidence.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Breakdown {
        total_periods: usize,
        fulfilled_periods: usize,
    }

    #[test]
    fn test_compose_serializes_details() {
        let verdict = Verdict::compose(
            true,
            1.0,
            "all periods satisfied",
            &Breakdown {
                total_periods: 4,
                fulfilled_periods: 4,
            },
        );
        assert!(verdict.fulfilled);
        assert_eq!(verdict.details["total_periods"], 4);
    }

    #[test]
    fn test_compose_clamps_out_of_range_confidence() {
        assert_eq!(Verdict::compose(true, 1.7, "", &()).confidence, 1.0);
        assert_eq!(Verdict::compose(false, -0.3, "", &()).confidence, 0.0);
    }

    #[test]
    fn test_compose_collapses_non_finite_confidence() {
        assert_eq!(Verdict::compose(false, f64::NAN, "", &()).confidence, 0.0);
        assert_eq!(Verdict::compose(false, f64::INFINITY, "", &()).confidence, 0.0);
    }

    #[test]
    fn test_unknown_kind_names_the_kind() {
        let verdict = Verdict::unknown_kind(&PromiseKind::Other("foo".to_string()));
        assert!(!verdict.fulfilled);
        assert_eq!(verdict.confidence, 0.0);
        assert!(verdict.reasoning.contains("foo"));
    }
}
