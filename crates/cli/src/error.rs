//! CLI failures and the exit code each one ends the process with.
//!
//! | code | meaning                                                     |
//! |------|-------------------------------------------------------------|
//! | 0    | frames rendered                                             |
//! | 2    | rejected by clap before a scene is built                    |
//! | 10   | rendering failed (surface, run loop, raster allocation)     |
//! | 11   | a file could not be read or written                         |
//! | 12   | the scene or a flag is unusable: bad `--scene` JSON, two    |
//! |      | controllable emitters, zero size, bad `--pointer`/`--background` |
//! | 13   | the JSON report could not be serialized                     |

use drift_core::DriftError;
use std::fmt;

#[derive(Debug)]
pub enum CliError {
    /// Rendering went wrong after the scene was accepted.
    Render(DriftError),
    Io(String),
    /// The user handed us something we cannot render.
    Input(String),
    Serialization(String),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Render(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }

    /// Routes a failure found while resolving the scene. Anything but I/O is
    /// the user's to fix, so it becomes [`CliError::Input`] prefixed with
    /// where the scene came from.
    pub fn scene(origin: &str, e: DriftError) -> Self {
        match e {
            DriftError::Io(msg) => CliError::Io(format!("{origin}: {msg}")),
            other => CliError::Input(format!("{origin}: {other}")),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Render(e) => write!(f, "render failed: {e}"),
            CliError::Io(msg) | CliError::Input(msg) | CliError::Serialization(msg) => {
                f.write_str(msg)
            }
        }
    }
}

/// Errors past scene resolution. Scene problems go through
/// [`CliError::scene`] instead.
impl From<DriftError> for CliError {
    fn from(e: DriftError) -> Self {
        match e {
            DriftError::Io(msg) => CliError::Io(msg),
            other => CliError::Render(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}
