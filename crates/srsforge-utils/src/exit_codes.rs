//! Exit code constants for the srsforge CLI.
//!
//! # Exit Code Table
//!
//! | Code | Constant | Description |
//! |------|----------|-------------|
//! | 0 | `SUCCESS` | Pipeline reached the success terminal |
//! | 1 | `PIPELINE_FAILED` | Pipeline routed to the error sink |
//! | 2 | `CLI_ARGS` | Invalid CLI arguments or configuration |
//! | 3 | `GRAPH_CONFIG` | Stage graph misconfiguration detected |

/// Type-safe exit code for CLI termination.
///
/// The numeric values are part of the CLI contract; scripts may rely on
/// them to distinguish a failed generation run from an operator mistake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(i32);

impl ExitCode {
    /// Pipeline reached the success terminal.
    pub const SUCCESS: Self = Self(0);
    /// Pipeline routed to the error sink; errors were reported.
    pub const PIPELINE_FAILED: Self = Self(1);
    /// Invalid CLI arguments or configuration file.
    pub const CLI_ARGS: Self = Self(2);
    /// The stage graph itself was misconfigured (a programming error).
    pub const GRAPH_CONFIG: Self = Self(3);

    /// Numeric value for `std::process::exit`.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self.0
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        // Exit codes are small constants; the cast cannot truncate.
        Self::from(code.0 as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_documented_table() {
        assert_eq!(ExitCode::SUCCESS.as_i32(), 0);
        assert_eq!(ExitCode::PIPELINE_FAILED.as_i32(), 1);
        assert_eq!(ExitCode::CLI_ARGS.as_i32(), 2);
        assert_eq!(ExitCode::GRAPH_CONFIG.as_i32(), 3);
    }
}
