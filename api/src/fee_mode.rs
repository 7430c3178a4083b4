//! The discrete miner-fee strategies a user can prefer.

use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

/// Average time between bitcoin blocks.
const BLOCK_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// A fee tier, trading confirmation speed against cost.
///
/// Iteration order is fast, slow, cheap.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::EnumIs,
    strum::EnumIter,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TransactionFeeMode {
    #[default]
    Fast,
    Slow,
    Cheap,
}

impl TransactionFeeMode {
    /// Number of blocks the fee estimate targets for confirmation.
    pub fn target_blocks(&self) -> u32 {
        match self {
            Self::Fast => 1,
            Self::Slow => 6,
            Self::Cheap => 144,
        }
    }

    /// Expected wait until the first confirmation.
    pub fn estimated_wait(&self) -> Duration {
        BLOCK_INTERVAL * self.target_blocks()
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Fast => "Fast",
            Self::Slow => "Slow",
            Self::Cheap => "Cheap",
        }
    }

    /// Renders the wait estimate, e.g. "~10 minutes" or "~24 hours".
    pub fn wait_description(&self) -> String {
        describe_wait(self.estimated_wait())
    }
}

/// Renders a wait duration rounded to the largest whole unit.
pub fn describe_wait(wait: Duration) -> String {
    let minutes = wait.as_secs() / 60;
    match minutes {
        0..=59 => format!("~{minutes} minute{}", plural(minutes)),
        _ => {
            let hours = minutes / 60;
            format!("~{hours} hour{}", plural(hours))
        }
    }
}

fn plural(n: u64) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}
