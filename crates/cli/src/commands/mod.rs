//! Subcommand implementations.
//!
//! Commands write results to stdout; logs go to stderr.

#![allow(clippy::print_stdout)]

pub mod admin;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod order;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use airshop_storefront::StorefrontError;
use airshop_storefront::api::{ApiClient, ApiError};
use airshop_storefront::cart::Cart;
use airshop_storefront::catalog::SearchHistory;
use airshop_storefront::checkout::CheckoutError;
use airshop_storefront::config::{ConfigError, StorefrontConfig};
use airshop_storefront::session::CredentialSession;
use airshop_storefront::storage::{FileStore, KeyValueStore, StorageError};

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Storefront(#[from] StorefrontError),

    #[error("Failed to read {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid JSON in {}: {source}", path.display())]
    InvalidJson {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to format output: {0}")]
    Output(serde_json::Error),

    #[error("Not logged in. Run `airshop admin login` first")]
    NotLoggedIn,
}

impl CliError {
    /// Whether the failure should go to Sentry.
    pub const fn is_reportable(&self) -> bool {
        match self {
            Self::Storefront(e) => e.is_reportable(),
            Self::Output(_) => true,
            Self::ReadFile { .. } | Self::InvalidJson { .. } | Self::NotLoggedIn => false,
        }
    }
}

impl From<ApiError> for CliError {
    fn from(e: ApiError) -> Self {
        Self::Storefront(e.into())
    }
}

impl From<CheckoutError> for CliError {
    fn from(e: CheckoutError) -> Self {
        Self::Storefront(e.into())
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::Storefront(e.into())
    }
}

impl From<StorageError> for CliError {
    fn from(e: StorageError) -> Self {
        Self::Storefront(e.into())
    }
}

/// Shared state for one CLI invocation.
pub struct Context {
    pub api: ApiClient,
    pub cart: Cart,
    pub history: SearchHistory,
    pub config: StorefrontConfig,
    json: bool,
}

impl Context {
    /// Open the data directory and build the API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created or the HTTP
    /// client fails to build.
    pub fn open(config: &StorefrontConfig, json: bool) -> Result<Self, CliError> {
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&config.data_dir)?);
        let api = ApiClient::new(&config.api, CredentialSession::new(Arc::clone(&store)))?;

        Ok(Self {
            api,
            cart: Cart::new(Arc::clone(&store)),
            history: SearchHistory::new(store),
            config: config.clone(),
            json,
        })
    }

    /// Whether output should be JSON.
    pub const fn json(&self) -> bool {
        self.json
    }

    /// Fail early when no admin token is stored.
    pub fn require_admin(&self) -> Result<(), CliError> {
        if self.api.session().is_authenticated() {
            Ok(())
        } else {
            Err(CliError::NotLoggedIn)
        }
    }

    /// Print `value` as pretty JSON.
    pub fn print_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<(), CliError> {
        let text = serde_json::to_string_pretty(value).map_err(CliError::Output)?;
        println!("{text}");
        Ok(())
    }
}

/// Read and deserialize a JSON file.
pub fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let text = read_text(path)?;
    serde_json::from_str(&text).map_err(|source| CliError::InvalidJson {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a text file.
pub fn read_text(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::ReadFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Bad argument value.
pub fn invalid_input(message: impl Into<String>) -> CliError {
    CliError::Storefront(StorefrontError::InvalidInput(message.into()))
}
