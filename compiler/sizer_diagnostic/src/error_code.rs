use std::fmt;

/// Error codes for governor diagnostics.
///
/// Format: E#### where first digit indicates the area:
/// - E5xxx: Code-size errors
/// - E9xxx: Internal errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Code-size Errors (E5xxx)
    /// Compiled unit exceeds the hard size ceiling
    E5001,

    // Internal Errors (E9xxx)
    /// Internal error: illegal extraction
    E9001,
}

impl ErrorCode {
    /// Get the numeric code as a string (e.g., "E5001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E5001 => "E5001",
            ErrorCode::E9001 => "E9001",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
