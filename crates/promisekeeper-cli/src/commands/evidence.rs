use std::fs;
use std::path::PathBuf;

use clap::Subcommand;
use promisekeeper_core::{EvidenceSimulator, SimulatorConfig};

use crate::store::{CliError, PromiseStore};

#[derive(Subcommand)]
pub enum EvidenceAction {
    /// Generate mock evidence for a promise's window
    Generate {
        #[arg(long)]
        promise_id: String,
        /// File to write the evidence JSON to
        #[arg(long)]
        output: PathBuf,
        /// Random seed; the same seed reproduces the same evidence
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Heart-rate sample cadence in minutes
        #[arg(long, default_value_t = 1)]
        interval_minutes: i64,
    },
}

pub fn run(action: EvidenceAction) -> Result<(), CliError> {
    match action {
        EvidenceAction::Generate {
            promise_id,
            output,
            seed,
            interval_minutes,
        } => {
            let stored = PromiseStore::open()?.get(&promise_id)?;
            let simulator = EvidenceSimulator::new(SimulatorConfig {
                seed,
                sample_interval_minutes: interval_minutes,
                ..Default::default()
            });
            let evidence = simulator.generate(stored.promise.start, stored.promise.end);

            fs::write(&output, serde_json::to_string_pretty(&evidence)?)?;
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "output": output,
                    "heart_rate_samples": evidence.heart_rate_data.len(),
                    "exercise_sessions": evidence.exercise_sessions.len(),
                    "elevated_hr_periods": evidence
                        .elevated_hr_periods
                        .as_ref()
                        .map_or(0, Vec::len),
                }))?
            );
        }
    }
    Ok(())
}
