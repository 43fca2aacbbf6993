use crate::config::Config;
use crate::error::RenderError;
use which::which;

/// Split a shell command into its parts, e.g. "python D:\\foo" will become ["python", "D:/foo"]
pub fn split_command(cmd: &str) -> Result<Vec<String>, RenderError> {
    let preprocessed: String = {
        // Windows paths are converted to forward slash paths (shlex assumes
        // posix paths and treats the backslashes as escape characters), which
        // would make C:\foo\bar become C:foobar
        if cfg!(target_family = "windows") {
            cmd.replace('\\', "/")
        } else {
            String::from(cmd)
        }
    };

    let parts = shlex::split(preprocessed.as_str())
        .ok_or_else(|| RenderError::InvalidCommand(cmd.to_string()))?;
    if parts.is_empty() {
        return Err(RenderError::InvalidCommand(cmd.to_string()));
    }

    Ok(parts)
}

/// The external programs the pipeline drives, split into ready-to-extend
/// argument vectors.
#[derive(Debug, Clone)]
pub struct Toolchain {
    pub latex: Vec<String>,
    pub pdfcrop: Vec<String>,
    pub convert: Vec<String>,
    pub pdf2svg: Vec<String>,
    pub density: u32,
}

impl Toolchain {
    pub fn from_config(config: &Config) -> Result<Toolchain, RenderError> {
        Ok(Toolchain {
            latex: split_command(&config.latex_cmd)?,
            pdfcrop: split_command(&config.pdfcrop_cmd)?,
            convert: split_command(&config.convert_cmd)?,
            pdf2svg: split_command(&config.pdf2svg_cmd)?,
            density: config.density,
        })
    }

    /// The configured programs that cannot be found on the PATH.
    ///
    /// A missing program is not an error here; the render pipeline reports
    /// it when the tool is actually needed. This probe exists so the CLI
    /// `check` command can name every absent tool at once.
    pub fn missing_tools(&self) -> Vec<String> {
        [&self.latex, &self.pdfcrop, &self.convert, &self.pdf2svg]
            .iter()
            .filter_map(|argv| {
                let program = &argv[0];
                match which(program) {
                    Ok(path) => {
                        log::info!("Found '{}' at {:?}", program, path);
                        None
                    }
                    Err(_) => Some(program.clone()),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_command() {
        // String with multiple arguments
        assert_eq!(
            vec![
                String::from("python"),
                String::from("foo"),
                String::from("bar")
            ],
            split_command("python foo bar").unwrap()
        );

        // Empty commands cannot be run
        assert!(split_command("").is_err());
        assert!(split_command("   ").is_err());

        // Unclosed quoted string
        assert!(split_command("python \"/foo").is_err());

        if cfg!(target_family = "windows") {
            // On windows backslashes are converted to forward slashes paths
            assert_eq!(
                vec![String::from("python"), String::from("D:/foo/bar")],
                split_command("python D:\\foo\\bar").unwrap()
            );

            // String with escaped space (escaping with backslashes is not a thing on windows)
            assert_eq!(
                vec![
                    String::from("python"),
                    String::from("foo/"),
                    String::from("bar")
                ],
                split_command("python foo\\ bar").unwrap()
            );
        }

        // And on non windows platforms they are treated as posix paths, meaning backslashes are treated as escape characters
        if !cfg!(target_family = "windows") {
            assert_eq!(
                vec![String::from("python"), String::from("D:foobar")],
                split_command("python D:\\foo\\bar").unwrap()
            );

            // String with escaped spaces
            assert_eq!(
                vec![String::from("python"), String::from("foo bar")],
                split_command("python foo\\ bar").unwrap()
            );
        }
    }

    #[test]
    fn from_config_splits_every_command() {
        let config = Config {
            latex_cmd: String::from("lualatex --halt-on-error"),
            density: 300,
            ..Config::default()
        };

        let toolchain = Toolchain::from_config(&config).unwrap();
        assert_eq!(
            toolchain.latex,
            vec![String::from("lualatex"), String::from("--halt-on-error")]
        );
        assert_eq!(toolchain.pdfcrop, vec![String::from("pdfcrop")]);
        assert_eq!(toolchain.convert, vec![String::from("convert")]);
        assert_eq!(toolchain.pdf2svg, vec![String::from("pdf2svg")]);
        assert_eq!(toolchain.density, 300);
    }

    #[test]
    fn from_config_rejects_bad_commands() {
        let config = Config {
            pdfcrop_cmd: String::from("\"unbalanced"),
            ..Config::default()
        };

        let err = Toolchain::from_config(&config).unwrap_err();
        assert!(matches!(err, RenderError::InvalidCommand(cmd) if cmd == "\"unbalanced"));
    }

    #[cfg(unix)]
    #[test]
    fn missing_tools_reports_unfindable_programs() {
        let config = Config {
            latex_cmd: String::from("qcircuit-render-no-such-latex"),
            convert_cmd: String::from("qcircuit-render-no-such-convert"),
            pdfcrop_cmd: String::from("sh"),
            pdf2svg_cmd: String::from("sh"),
            ..Config::default()
        };

        let toolchain = Toolchain::from_config(&config).unwrap();
        assert_eq!(
            toolchain.missing_tools(),
            vec![
                String::from("qcircuit-render-no-such-latex"),
                String::from("qcircuit-render-no-such-convert")
            ]
        );
    }
}
