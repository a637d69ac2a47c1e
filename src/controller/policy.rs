use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::AppError;

type Predicate = Arc<dyn Fn(&AppError) -> bool + Send + Sync>;

/// Decides which failed updates are treated as success.
///
/// CrudCrud answers a successful PUT with an empty body, which some clients
/// report as a failure. `IgnoreAll` refreshes the list whatever the error.
#[derive(Clone, Default)]
pub enum UpdateErrorPolicy {
    #[default]
    IgnoreAll,
    Surface,
    Custom(Predicate),
}

impl UpdateErrorPolicy {
    pub fn custom(predicate: impl Fn(&AppError) -> bool + Send + Sync + 'static) -> Self {
        UpdateErrorPolicy::Custom(Arc::new(predicate))
    }

    pub fn is_ignorable(&self, err: &AppError) -> bool {
        match self {
            UpdateErrorPolicy::IgnoreAll => true,
            UpdateErrorPolicy::Surface => false,
            UpdateErrorPolicy::Custom(predicate) => predicate(err),
        }
    }
}

impl fmt::Debug for UpdateErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateErrorPolicy::IgnoreAll => f.write_str("IgnoreAll"),
            UpdateErrorPolicy::Surface => f.write_str("Surface"),
            UpdateErrorPolicy::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl FromStr for UpdateErrorPolicy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ignore" => Ok(UpdateErrorPolicy::IgnoreAll),
            "surface" => Ok(UpdateErrorPolicy::Surface),
            other => Err(AppError::Config(format!(
                "TASKPAD_UPDATE_ERRORS must be \"ignore\" or \"surface\", got {:?}",
                other
            ))),
        }
    }
}
