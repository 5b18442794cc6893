//! Station code types.

use std::fmt;

/// Number of digits in a railway station code.
const CODE_LEN: usize = 7;

/// Error returned when parsing an invalid station code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station code: {reason}")]
pub struct InvalidStationCode {
    reason: &'static str,
}

/// A valid 7-digit station code as used by the railway availability API.
///
/// Codes are always exactly seven ASCII digits (e.g. `2900000` for
/// Tashkent). This type guarantees that any `StationCode` value is valid
/// by construction.
///
/// # Examples
///
/// ```
/// use railway_bot::domain::StationCode;
///
/// let tashkent = StationCode::parse("2900000").unwrap();
/// assert_eq!(tashkent.as_str(), "2900000");
///
/// // Letters are rejected
/// assert!(StationCode::parse("29000AB").is_err());
///
/// // Wrong length is rejected
/// assert!(StationCode::parse("290000").is_err());
/// assert!(StationCode::parse("29000000").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct StationCode([u8; CODE_LEN]);

impl StationCode {
    /// Parse a station code from a string.
    ///
    /// The input must be exactly seven ASCII digits.
    pub fn parse(s: &str) -> Result<Self, InvalidStationCode> {
        let bytes = s.as_bytes();

        if bytes.len() != CODE_LEN {
            return Err(InvalidStationCode {
                reason: "must be exactly 7 characters",
            });
        }

        if !bytes.iter().all(u8::is_ascii_digit) {
            return Err(InvalidStationCode {
                reason: "must be ASCII digits 0-9",
            });
        }

        let mut code = [0u8; CODE_LEN];
        code.copy_from_slice(bytes);
        Ok(StationCode(code))
    }

    /// Parse a code known at compile time to be valid.
    ///
    /// Used for the static city table; invalid input fails the const
    /// evaluation rather than producing a bad value at runtime.
    pub(crate) const fn from_static(s: &'static str) -> Self {
        let bytes = s.as_bytes();
        assert!(bytes.len() == CODE_LEN, "station code must be 7 digits");

        let mut code = [0u8; CODE_LEN];
        let mut i = 0;
        while i < CODE_LEN {
            assert!(bytes[i].is_ascii_digit(), "station code must be digits");
            code[i] = bytes[i];
            i += 1;
        }
        StationCode(code)
    }

    /// Returns the station code as a string slice.
    pub fn as_str(&self) -> &str {
        // Only ASCII digits are ever stored.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl fmt::Debug for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationCode({})", self.as_str())
    }
}

impl fmt::Display for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
