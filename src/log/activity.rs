use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ManateeError, ManateeResult};

const DEFAULT_UNIT: &str = "none";

/// Whether an activity records quantities per day or tracked time intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ActivityKind {
    Counting,
    Timing,
}

impl ActivityKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Counting => "counting",
            Self::Timing => "timing",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Something done some quantity of times per day, measured in `unit`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CountingActivity {
    pub name: String,
    #[serde(default = "default_unit")]
    pub unit: String,
}

impl CountingActivity {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            unit: default_unit(),
        }
    }

    #[must_use]
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }
}

/// Something time-tracked with start/end intervals.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimingActivity {
    pub name: String,
}

impl TimingActivity {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

fn default_unit() -> String {
    DEFAULT_UNIT.to_owned()
}

pub(crate) fn validate_name(name: &str) -> ManateeResult<()> {
    if name.trim().is_empty() {
        return Err(ManateeError::InvalidData(
            "activity name must not be blank".to_owned(),
        ));
    }
    Ok(())
}
