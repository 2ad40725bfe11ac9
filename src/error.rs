//! Error types for nmctl

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NmctlError {
    /// The tool exited non-zero or could not be spawned. `output`
    /// carries the captured diagnostic text.
    #[error("command '{cmd}' failed{}: {output}", .code.map(|c| format!(" with code {c}")).unwrap_or_default())]
    CommandFailed {
        cmd: String,
        code: Option<i32>,
        output: String,
    },
    /// The tool did not exit within the configured timeout
    #[error("command '{0}' timed out")]
    Timeout(String),
}

pub type NmctlResult<T> = Result<T, NmctlError>;
