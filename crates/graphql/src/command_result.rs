use std::process::ExitCode;

#[derive(Debug)]
pub(crate) struct CommandResult {
    pub exit_code: ExitCode,
    pub stderr: Option<String>,
    pub stdout: Option<String>,
}

impl CommandResult {
    pub fn stderr(fmt_args: std::fmt::Arguments<'_>) -> Self {
        Self {
            exit_code: ExitCode::FAILURE,
            stderr: Some(format!("{fmt_args}")),
            stdout: None,
        }
    }

    pub fn stdout(fmt_args: std::fmt::Arguments<'_>) -> Self {
        Self {
            exit_code: ExitCode::SUCCESS,
            stderr: None,
            stdout: Some(format!("{fmt_args}")),
        }
    }

    /// Output of a command that processed several inputs and reports each
    /// one; fails if any input failed.
    pub fn report(stdout: String, stderr: String) -> Self {
        Self {
            exit_code: if stderr.is_empty() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            },
            stderr: (!stderr.is_empty()).then_some(stderr),
            stdout: (!stdout.is_empty()).then_some(stdout),
        }
    }
}
