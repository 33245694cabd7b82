//! ZRC-20 ticker validation.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::InscriptionError;

/// Maximum ticker length in bytes.
pub const MAX_TICKER_LEN: usize = 10;

static RE_TICKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z0-9]{1,10}$").unwrap());

/// A validated ticker: 1 to 10 uppercase ASCII letters or digits.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ticker(String);

impl Ticker {
    /// Validate and wrap a ticker.
    ///
    /// # Arguments
    /// * `tick` - Candidate ticker text. No case folding is applied.
    ///
    /// # Returns
    /// The ticker, or `Validation` for bad length or characters.
    pub fn new(tick: &str) -> Result<Self, InscriptionError> {
        if !RE_TICKER.is_match(tick) {
            return Err(InscriptionError::Validation(format!(
                "ticker '{}' must be 1-{} uppercase alphanumeric characters",
                tick, MAX_TICKER_LEN
            )));
        }
        Ok(Ticker(tick.to_string()))
    }

    /// Borrow the ticker text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Ticker {
    type Error = InscriptionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Ticker::new(&value)
    }
}

impl From<Ticker> for String {
    fn from(t: Ticker) -> Self {
        t.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
