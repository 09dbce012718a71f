//! CLI failures and the process exit codes they map to.
//!
//! | code | meaning                                              |
//! |------|------------------------------------------------------|
//! | 0    | success                                              |
//! | 2    | argument parse error (reported by clap)              |
//! | 10   | sketch rejected its configuration                    |
//! | 11   | reading a script or writing the PNG failed           |
//! | 12   | bad user input: palette, pointer, params or script   |
//! | 13   | JSON output could not be produced                    |

use thiserror::Error;
use wheels_core::SketchError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Sketch(SketchError),
    #[error("{0}")]
    Io(String),
    #[error("{0}")]
    Input(String),
    #[error("{0}")]
    Serialization(String),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Sketch(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl From<SketchError> for CliError {
    /// File errors keep their I/O code; a palette name typed by the user is
    /// an input error.
    fn from(e: SketchError) -> Self {
        match e {
            SketchError::Io(msg) => CliError::Io(msg),
            SketchError::UnknownPalette(_) => CliError::Input(e.to_string()),
            other => CliError::Sketch(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}
