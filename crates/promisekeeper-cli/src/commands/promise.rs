use chrono::{NaiveDate, NaiveTime};
use clap::Subcommand;
use promisekeeper_core::{Parameters, Promise, PromiseKind};

use crate::store::{CliError, PromiseStore};

/// Built-in promise templates, mirroring the on-chain template table.
const TEMPLATES: [(u32, PromiseKind, &str); 3] = [
    (
        1,
        PromiseKind::ExerciseFrequency,
        "Exercise a number of times per period",
    ),
    (
        2,
        PromiseKind::ExerciseDuration,
        "Sustain an elevated heart rate for a minimum duration",
    ),
    (
        3,
        PromiseKind::ExerciseConsistency,
        "Never go more than a number of days without exercise",
    ),
];

#[derive(Subcommand)]
pub enum PromiseAction {
    /// List the available promise templates
    Templates,
    /// Create a new promise
    Create {
        /// ID of the promise template
        #[arg(long)]
        template_id: u32,
        /// JSON object of promise parameters, e.g. '{"frequency": 3}'
        #[arg(long, default_value = "{}")]
        parameters: String,
        /// Start date in YYYY-MM-DD format
        #[arg(long)]
        start_date: NaiveDate,
        /// End date in YYYY-MM-DD format
        #[arg(long)]
        end_date: NaiveDate,
    },
    /// List stored promises
    List,
    /// View one stored promise
    View {
        #[arg(long)]
        promise_id: String,
    },
}

pub fn run(action: PromiseAction) -> Result<(), CliError> {
    match action {
        PromiseAction::Templates => {
            let listing: Vec<_> = TEMPLATES
                .iter()
                .map(|(id, kind, description)| {
                    serde_json::json!({
                        "template_id": id,
                        "type": kind.as_str(),
                        "description": description,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&listing)?);
        }
        PromiseAction::Create {
            template_id,
            parameters,
            start_date,
            end_date,
        } => {
            let (_, kind, _) = TEMPLATES
                .iter()
                .find(|(id, _, _)| *id == template_id)
                .ok_or_else(|| format!("unknown template id {template_id}"))?;

            let parameters: Parameters = serde_json::from_str(&parameters)
                .map_err(|e| format!("invalid --parameters JSON: {e}"))?;

            let promise = Promise {
                kind: kind.clone(),
                start: start_date.and_time(NaiveTime::MIN).and_utc(),
                end: end_date.and_time(NaiveTime::MIN).and_utc(),
                parameters,
            };
            promise.validate()?;

            let stored = PromiseStore::open()?.add(promise)?;
            println!("{}", serde_json::to_string_pretty(&stored)?);
        }
        PromiseAction::List => {
            let promises = PromiseStore::open()?.load()?;
            println!("{}", serde_json::to_string_pretty(&promises)?);
        }
        PromiseAction::View { promise_id } => {
            let stored = PromiseStore::open()?.get(&promise_id)?;
            println!("{}", serde_json::to_string_pretty(&stored)?);
        }
    }
    Ok(())
}
