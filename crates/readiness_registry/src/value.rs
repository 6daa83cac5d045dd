use std::fmt;
use std::str::FromStr;

use crate::ReadinessError;

/// How the textual `value` of a readiness update is turned into a flag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ValueParsing {
    /// Only `"true"` is ready; any other text is not ready.
    #[default]
    Lenient,
    /// `true`/`false`/`1`/`0`, case-insensitive; anything else is rejected.
    Strict,
}

impl FromStr for ValueParsing {
    type Err = ReadinessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(Self::Lenient),
            "strict" => Ok(Self::Strict),
            other => Err(ReadinessError::Config(format!(
                "unknown value parsing mode {other:?} (expected \"lenient\" or \"strict\")"
            ))),
        }
    }
}

impl fmt::Display for ValueParsing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lenient => f.write_str("lenient"),
            Self::Strict => f.write_str("strict"),
        }
    }
}

pub fn parse_ready_value(raw: &str, mode: ValueParsing) -> Result<bool, ReadinessError> {
    match mode {
        ValueParsing::Lenient => Ok(raw == "true"),
        ValueParsing::Strict => {
            if raw.eq_ignore_ascii_case("true") || raw == "1" {
                Ok(true)
            } else if raw.eq_ignore_ascii_case("false") || raw == "0" {
                Ok(false)
            } else {
                Err(ReadinessError::InvalidValue(raw.to_string()))
            }
        }
    }
}
