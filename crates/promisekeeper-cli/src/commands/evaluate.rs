use std::fs;
use std::path::PathBuf;

use clap::Args;
use promisekeeper_core::{Evidence, EvaluatorRegistry};

use crate::store::{CliError, PromiseStatus, PromiseStore};

#[derive(Args)]
pub struct EvaluateArgs {
    #[arg(long)]
    pub promise_id: String,
    /// Evidence JSON file
    #[arg(long)]
    pub evidence: PathBuf,
    /// Evaluation strategy
    #[arg(long, default_value = "rule_based")]
    pub evaluator: String,
}

pub fn run(args: EvaluateArgs) -> Result<(), CliError> {
    let store = PromiseStore::open()?;
    let stored = store.get(&args.promise_id)?;

    let evidence = Evidence::from_json(&fs::read_to_string(&args.evidence)?)?;

    let registry = EvaluatorRegistry::with_defaults();
    let evaluator = registry.lookup(&args.evaluator).ok_or_else(|| {
        format!(
            "evaluator '{}' not found (available: {})",
            args.evaluator,
            registry.names().join(", ")
        )
    })?;

    let verdict = evaluator.evaluate(&stored.promise, &evidence);
    store.set_status(
        &args.promise_id,
        PromiseStatus::Evaluated {
            fulfilled: verdict.fulfilled,
        },
    )?;

    println!("{}", serde_json::to_string_pretty(&verdict)?);
    Ok(())
}
