//! # PromiseKeeper Core Library
//!
//! This library provides the promise evaluation engine for PromiseKeeper.
//! Given a structured commitment (a "promise": a goal with a time window and
//! numeric or categorical parameters) and time-stamped activity evidence, it
//! produces a deterministic, auditable verdict: fulfilled or not, a
//! confidence score, human-readable reasoning, and a structured breakdown.
//!
//! ## Architecture
//!
//! - **Period Segmenter**: splits a date range into contiguous calendar
//!   buckets (day/week/month) and classifies timestamped items into them
//! - **Elevated-Interval Detector**: finds continuous above-threshold runs
//!   in an ordered heart-rate series
//! - **Rule Evaluators**: one deterministic strategy per promise kind
//!   (frequency, duration, consistency)
//! - **Interpretive Evaluator**: delegates judgment to a reasoning backend
//!   behind the narrow [`Interpreter`] interface
//! - **Evaluator Registry**: immutable name-keyed dispatch table
//! - **Evidence Simulator**: seeded mock tracker data for demos and tests
//!
//! The engine is a pure library boundary: no I/O, no persistence, no shared
//! state between calls. Fetching evidence and submitting verdicts to a
//! ledger belong to outside collaborators, along with their retry policies.
//!
//! ## Key Components
//!
//! - [`Promise`] / [`Evidence`]: caller-owned inputs
//! - [`EvaluatorRegistry`]: strategy selection
//! - [`Verdict`]: the engine's only output

pub mod detector;
pub mod error;
pub mod evaluator;
pub mod evidence;
pub mod period;
pub mod promise;
pub mod simulator;
pub mod verdict;
pub mod wire;

pub use detector::ElevatedIntervalDetector;
pub use error::{CoreError, Result, ValidationError};
pub use evaluator::{
    Assessment, EvaluatorRegistry, EvidenceSummary, HeuristicInterpreter, Interpreter,
    InterpretiveEvaluator, PromiseEvaluator, RuleBasedEvaluator,
};
pub use evidence::{ElevatedInterval, Evidence, ExerciseSession, HeartRateSample};
pub use period::{generate_periods, group_by_period, Granularity, Period};
pub use promise::{ParamValue, Parameters, Promise, PromiseKind};
pub use simulator::{EvidenceSimulator, SimulatorConfig};
pub use verdict::Verdict;
