//! Experiment status vocabulary.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const STATUS_IN_PROGRESS: &str = "In progress";
pub const STATUS_CONCLUDED: &str = "Concluded";

/// Lifecycle status of an experiment.
///
/// Two well-known values; anything else is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ExperimentStatus {
    #[default]
    InProgress,
    Concluded,
    Other(String),
}

impl ExperimentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::InProgress => STATUS_IN_PROGRESS,
            Self::Concluded => STATUS_CONCLUDED,
            Self::Other(s) => s,
        }
    }

    /// Parse an optional form value; blank means the default.
    pub fn from_form(raw: Option<&str>) -> Self {
        raw.map(|s| Self::from(s.trim().to_string()))
            .unwrap_or_default()
    }

    pub fn is_concluded(&self) -> bool {
        matches!(self, Self::Concluded)
    }
}

/// Blank text is the default status, whichever path it arrives by.
impl From<String> for ExperimentStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            t if t.trim().is_empty() => Self::default(),
            STATUS_IN_PROGRESS => Self::InProgress,
            STATUS_CONCLUDED => Self::Concluded,
            _ => Self::Other(s),
        }
    }
}

impl From<ExperimentStatus> for String {
    fn from(status: ExperimentStatus) -> Self {
        match status {
            ExperimentStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ExperimentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
