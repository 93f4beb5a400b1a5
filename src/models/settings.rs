use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Earliest and latest day a billing cycle may start on.
pub(crate) const CYCLE_START_RANGE: std::ops::RangeInclusive<u32> = 1..=28;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Settings {
    pub(crate) billing_cycle_start: u32,
    pub(crate) currency: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            billing_cycle_start: 1,
            currency: "₹".to_string(),
        }
    }
}

impl Settings {
    pub(crate) fn validate(&self) -> Result<(), Error> {
        if !CYCLE_START_RANGE.contains(&self.billing_cycle_start) {
            return Err(Error::CycleStartOutOfRange(self.billing_cycle_start));
        }
        if self.currency.trim().is_empty() {
            return Err(Error::EmptyCurrency);
        }
        Ok(())
    }
}
