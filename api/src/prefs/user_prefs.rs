use serde::Deserialize;
use serde::Serialize;

use super::display_preference::DisplayPreference;
use crate::fee_mode::TransactionFeeMode;

/// Represents all user prefs. Saved by a `SettingsStore`, edited in settings, etc.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize, Default)]
pub struct UserPrefs {
    display_preference: DisplayPreference,
    #[serde(default)]
    preferred_fee_mode: TransactionFeeMode,
}

impl UserPrefs {
    pub fn new(display_preference: DisplayPreference, preferred_fee_mode: TransactionFeeMode) -> Self {
        Self {
            display_preference,
            preferred_fee_mode,
        }
    }

    pub fn display_preference(&self) -> &DisplayPreference {
        &self.display_preference
    }

    /// The fee tier preselected when a confirmation screen opens.
    pub fn preferred_fee_mode(&self) -> TransactionFeeMode {
        self.preferred_fee_mode
    }

    pub fn set_preferred_fee_mode(&mut self, mode: TransactionFeeMode) {
        self.preferred_fee_mode = mode;
    }
}
