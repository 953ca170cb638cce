use chrono::{Duration, Utc};
use clap::{Subcommand, ValueEnum};

use crate::store::{CliError, TrackerConfig};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Provider {
    /// Mock provider for local use
    Mockfit,
    /// Fitbit (simulated authorization in this build)
    Fitbit,
}

impl Provider {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Mockfit => "mockfit",
            Self::Fitbit => "fitbit",
        }
    }

    fn token_lifetime(&self) -> Duration {
        match self {
            // Fitbit tokens typically last 8 hours
            Self::Fitbit => Duration::hours(8),
            Self::Mockfit => Duration::hours(24),
        }
    }
}

#[derive(Subcommand)]
pub enum TrackerAction {
    /// Connect a fitness tracker to provide evidence data
    Connect {
        #[arg(long, value_enum, default_value = "mockfit")]
        provider: Provider,
    },
    /// Show the current tracker connection
    Status,
    /// Remove the stored tracker connection
    Disconnect,
}

pub fn run(action: TrackerAction) -> Result<(), CliError> {
    match action {
        TrackerAction::Connect { provider } => {
            // The authorization flow is simulated: no network, just a stored
            // mock token shaped like a real provider's response.
            let now = Utc::now();
            let token = uuid::Uuid::new_v4().simple().to_string();
            let config = TrackerConfig {
                provider: provider.as_str().to_string(),
                access_token: format!("mock_access_token_{token}"),
                refresh_token: format!("mock_refresh_token_{token}"),
                connected_at: now,
                expires_at: now + provider.token_lifetime(),
            };
            config.save()?;
            println!("{} tracker connected", provider.as_str());
        }
        TrackerAction::Status => match TrackerConfig::load()? {
            Some(config) => {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "provider": config.provider,
                        "connected_at": config.connected_at,
                        "expires_at": config.expires_at,
                    }))?
                );
            }
            None => println!("no tracker connected"),
        },
        TrackerAction::Disconnect => {
            if TrackerConfig::remove()? {
                println!("tracker disconnected");
            } else {
                println!("no tracker connected");
            }
        }
    }
    Ok(())
}
