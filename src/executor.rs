use crate::error::RenderError;
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

/// A trait class for wrapping the actual tool invocations.
///
/// Only here to make unit testing the renderer possible, this is cheating a
/// bit, but the other option is not testing it at all, or partially through
/// integration tests.
pub trait CommandExecutor {
    /// Run `argv` inside `workdir` and wait for it to finish.
    fn execute(&self, workdir: &Path, argv: &[String]) -> Result<(), RenderError>;
}

/// Runs tools as real child processes.
pub struct RealCommandExecutor;

impl CommandExecutor for RealCommandExecutor {
    fn execute(&self, workdir: &Path, argv: &[String]) -> Result<(), RenderError> {
        let tool = &argv[0];
        let mut command = Command::new(tool);
        command
            .args(&argv[1..])
            .current_dir(workdir)
            // The tools must never sit waiting on terminal input.
            .stdin(Stdio::null());

        log::debug!("Command: {:?}", &command);
        log::debug!("Working dir {:?}", workdir);

        let output = command.output().map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                RenderError::ToolNotFound { tool: tool.clone() }
            } else {
                RenderError::Spawn {
                    tool: tool.clone(),
                    reason: e,
                }
            }
        })?;

        if output.status.success() {
            log::debug!("Command success {:?}", output.status);
            Ok(())
        } else {
            let detail = {
                let stderr = String::from_utf8_lossy(&output.stderr);
                let stderr = stderr.trim();
                if stderr.is_empty() {
                    String::from_utf8_lossy(&output.stdout).trim().to_string()
                } else {
                    stderr.to_string()
                }
            };
            log::error!("Command error {:?}: {:?}", output.status, detail);
            Err(RenderError::ToolFailed {
                tool: tool.clone(),
                code: output.status.code().unwrap_or(-1),
                detail,
            })
        }
    }
}
