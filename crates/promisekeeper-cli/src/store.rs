//! Local CLI state: stored promises and the tracker connection.
//!
//! Promises live in `promises.json`, the tracker connection in
//! `tracker.toml`, both under `~/.config/promisekeeper[-dev]/`. Set
//! `PROMISEKEEPER_ENV=dev` to use the development directory, or
//! `PROMISEKEEPER_CONFIG_DIR` to pin an explicit path (tests do).

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use promisekeeper_core::Promise;
use serde::{Deserialize, Serialize};

pub type CliError = Box<dyn std::error::Error>;

/// Returns the CLI configuration directory, creating it if needed.
pub fn config_dir() -> Result<PathBuf, CliError> {
    if let Ok(explicit) = std::env::var("PROMISEKEEPER_CONFIG_DIR") {
        let dir = PathBuf::from(explicit);
        fs::create_dir_all(&dir)?;
        return Ok(dir);
    }

    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("PROMISEKEEPER_ENV").unwrap_or_else(|_| "production".to_string());
    let dir = if env == "dev" {
        base_dir.join("promisekeeper-dev")
    } else {
        base_dir.join("promisekeeper")
    };

    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Lifecycle state of a stored promise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "state")]
pub enum PromiseStatus {
    Active,
    Evaluated { fulfilled: bool },
}

/// A promise as stored by the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredPromise {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub status: PromiseStatus,
    #[serde(flatten)]
    pub promise: Promise,
}

/// JSON-file-backed promise store.
pub struct PromiseStore {
    path: PathBuf,
}

impl PromiseStore {
    pub fn open() -> Result<Self, CliError> {
        Ok(Self {
            path: config_dir()?.join("promises.json"),
        })
    }

    pub fn load(&self) -> Result<Vec<StoredPromise>, CliError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn save(&self, promises: &[StoredPromise]) -> Result<(), CliError> {
        fs::write(&self.path, serde_json::to_string_pretty(promises)?)?;
        Ok(())
    }

    pub fn add(&self, promise: Promise) -> Result<StoredPromise, CliError> {
        let stored = StoredPromise {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            status: PromiseStatus::Active,
            promise,
        };
        let mut promises = self.load()?;
        promises.push(stored.clone());
        self.save(&promises)?;
        Ok(stored)
    }

    pub fn get(&self, id: &str) -> Result<StoredPromise, CliError> {
        self.load()?
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| format!("no promise with id '{id}'").into())
    }

    pub fn set_status(&self, id: &str, status: PromiseStatus) -> Result<(), CliError> {
        let mut promises = self.load()?;
        let entry = promises
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| format!("no promise with id '{id}'"))?;
        entry.status = status;
        self.save(&promises)
    }
}

/// Stored tracker connection, TOML at `tracker.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    pub provider: String,
    pub access_token: String,
    pub refresh_token: String,
    pub connected_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl TrackerConfig {
    fn path() -> Result<PathBuf, CliError> {
        Ok(config_dir()?.join("tracker.toml"))
    }

    pub fn save(&self) -> Result<(), CliError> {
        fs::write(Self::path()?, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn load() -> Result<Option<Self>, CliError> {
        let path = Self::path()?;
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(toml::from_str(&fs::read_to_string(path)?)?))
    }

    pub fn remove() -> Result<bool, CliError> {
        let path = Self::path()?;
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(path)?;
        Ok(true)
    }
}
