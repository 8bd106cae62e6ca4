//! Exit codes for the rgw-admin CLI
//!
//! Scripts rely on these values. Changing one is a breaking change.

use rgw_core::Error;

/// Process exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Request completed and the response was printed
    Success = 0,

    /// Unclassified failure, including unparseable responses
    GeneralError = 1,

    /// Bad arguments, unknown verb, missing resource or incomplete config
    UsageError = 2,

    /// Connection failure or a 5xx from the gateway
    NetworkError = 3,

    /// 401 or 403 from the gateway
    AuthError = 4,

    /// 404 from the gateway
    NotFound = 5,

    /// 409 from the gateway
    Conflict = 6,
}

impl ExitCode {
    #[inline]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    /// Map a known exit code value back to the enum
    pub const fn from_i32(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Success),
            1 => Some(Self::GeneralError),
            2 => Some(Self::UsageError),
            3 => Some(Self::NetworkError),
            4 => Some(Self::AuthError),
            5 => Some(Self::NotFound),
            6 => Some(Self::Conflict),
            _ => None,
        }
    }

    /// Exit code for a library error
    pub fn from_error(error: &Error) -> Self {
        Self::from_i32(error.exit_code()).unwrap_or(Self::GeneralError)
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Success => "Operation completed successfully",
            Self::GeneralError => "General error",
            Self::UsageError => "Invalid arguments or configuration",
            Self::NetworkError => "Network or server error (retryable)",
            Self::AuthError => "Authentication or permission failure",
            Self::NotFound => "Resource not found",
            Self::Conflict => "Conflict with existing resource",
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.as_i32()
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.description(), self.as_i32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rgw_core::Error;

    fn http(status: u16) -> Error {
        Error::Http {
            status: status.try_into().unwrap(),
            body: String::new(),
        }
    }

    #[test]
    fn test_exit_code_round_trip_values() {
        for code in 0..=6 {
            assert_eq!(ExitCode::from_i32(code).unwrap().as_i32(), code);
        }
        assert_eq!(ExitCode::from_i32(7), None);
        assert_eq!(ExitCode::from_i32(130), None);
    }

    #[test]
    fn test_exit_code_from_error() {
        assert_eq!(
            ExitCode::from_error(&Error::Config("missing".into())),
            ExitCode::UsageError
        );
        assert_eq!(
            ExitCode::from_error(&Error::Usage("verb".into())),
            ExitCode::UsageError
        );
        assert_eq!(
            ExitCode::from_error(&Error::Network("refused".into())),
            ExitCode::NetworkError
        );
        assert_eq!(ExitCode::from_error(&http(403)), ExitCode::AuthError);
        assert_eq!(ExitCode::from_error(&http(404)), ExitCode::NotFound);
        assert_eq!(ExitCode::from_error(&http(409)), ExitCode::Conflict);
        assert_eq!(ExitCode::from_error(&http(503)), ExitCode::NetworkError);
        assert_eq!(ExitCode::from_error(&http(400)), ExitCode::GeneralError);
        assert_eq!(
            ExitCode::from_error(&Error::ResponseParse("eof".into())),
            ExitCode::GeneralError
        );
    }

    #[test]
    fn test_exit_code_display() {
        let display = ExitCode::NotFound.to_string();
        assert!(display.contains('5'));
        assert!(display.contains("not found"));
    }
}
