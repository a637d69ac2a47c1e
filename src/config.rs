use std::env;

use crate::controller::UpdateErrorPolicy;
use crate::error::AppError;
use crate::remote::StoreConfig;

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// `None` runs against the in-memory store.
    pub store: Option<StoreConfig>,
    pub update_errors: UpdateErrorPolicy,
}

impl AppConfig {
    /// Reads `.env` and the process environment. `offline` forces the in-memory store.
    pub fn new_from_env(offline: bool) -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok(), offline)
    }

    pub fn from_lookup<F>(lookup: F, offline: bool) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let offline = offline
            || lookup("TASKPAD_OFFLINE")
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false);

        let store = if offline {
            None
        } else {
            let base_url = lookup("TASKPAD_BASE_URL").ok_or_else(|| {
                AppError::Config("TASKPAD_BASE_URL is not set (or run with --offline)".to_string())
            })?;
            Some(StoreConfig::new(base_url)?)
        };

        let update_errors = match lookup("TASKPAD_UPDATE_ERRORS") {
            Some(value) => value.parse()?,
            None => UpdateErrorPolicy::default(),
        };

        Ok(Self { store, update_errors })
    }
}
