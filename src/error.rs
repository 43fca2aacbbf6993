//! Error types for the render pipeline

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Everything that can go wrong between receiving circuit code and handing
/// back image data. Each pipeline step fails with its own variant, so a
/// LaTeX failure is never reported as a missing PNG three steps later.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The executable could not be found on the PATH.
    #[error("'{tool}' was not found; install it or point the config at it")]
    ToolNotFound { tool: String },

    /// The executable exists but could not be started.
    #[error("could not run '{tool}' ({reason})")]
    Spawn { tool: String, reason: io::Error },

    /// The tool ran, but exited with a non-zero status.
    #[error("'{tool}' exited with status {code} ({detail})")]
    ToolFailed {
        tool: String,
        code: i32,
        detail: String,
    },

    /// The tool reported success, but the file it should have produced is
    /// not there.
    #[error("'{tool}' did not produce {}", path.display())]
    OutputMissing { tool: String, path: PathBuf },

    /// Requested output format is not one of png/svg.
    #[error("unsupported output format '{0}', expected png or svg")]
    UnsupportedFormat(String),

    /// A configured command line could not be split into program + arguments.
    #[error("cannot parse command line '{0}'")]
    InvalidCommand(String),

    /// Writing the generated LaTeX source failed.
    #[error("failed to write {} ({reason})", path.display())]
    WriteFailed { path: PathBuf, reason: io::Error },

    /// Reading a produced artifact back failed.
    #[error("failed to read {} ({reason})", path.display())]
    ReadFailed { path: PathBuf, reason: io::Error },

    /// Removing a stale artifact or renaming the cropped PDF failed.
    #[error("failed to clean up {} ({reason})", path.display())]
    Cleanup { path: PathBuf, reason: io::Error },

    /// An SVG artifact turned out not to be valid UTF-8.
    #[error("{} is not valid UTF-8", path.display())]
    NotUtf8 { path: PathBuf },

    /// The configuration file could not be loaded or parsed.
    #[error("failed to load config {} ({detail})", path.display())]
    Config { path: PathBuf, detail: String },
}

impl RenderError {
    pub(crate) fn output_missing(tool: &str, path: &Path) -> Self {
        RenderError::OutputMissing {
            tool: tool.to_string(),
            path: path.to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn tool_failed_message_includes_code_and_detail() {
        let e = RenderError::ToolFailed {
            tool: "pdflatex".to_string(),
            code: 1,
            detail: "! Undefined control sequence.".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "'pdflatex' exited with status 1 (! Undefined control sequence.)"
        );
    }

    #[test]
    fn output_missing_names_the_responsible_tool() {
        let e = RenderError::output_missing("pdfcrop", Path::new("qcirc-tmp.pdf"));
        assert_eq!(e.to_string(), "'pdfcrop' did not produce qcirc-tmp.pdf");
    }

    #[test]
    fn unsupported_format_message() {
        let e = RenderError::UnsupportedFormat("gif".to_string());
        assert_eq!(
            e.to_string(),
            "unsupported output format 'gif', expected png or svg"
        );
    }
}
