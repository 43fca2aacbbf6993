use crate::error::RenderError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn default_latex_cmd() -> String {
    String::from("pdflatex")
}
fn default_pdfcrop_cmd() -> String {
    String::from("pdfcrop")
}
fn default_convert_cmd() -> String {
    String::from("convert")
}
fn default_pdf2svg_cmd() -> String {
    String::from("pdf2svg")
}
fn default_density() -> u32 {
    100
}

/// The configuration options for the LaTeX toolchain.
///
/// Each `*_cmd` value is a full command line; the first word is the program,
/// the rest are extra arguments prepended to the ones the renderer adds
/// itself (e.g. `latex-cmd = "lualatex --halt-on-error"`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// LaTeX compiler producing a PDF (defaults to `pdflatex`).
    #[serde(default = "default_latex_cmd")]
    pub latex_cmd: String,
    /// PDF margin cropper (defaults to `pdfcrop` from TeX Live).
    #[serde(default = "default_pdfcrop_cmd")]
    pub pdfcrop_cmd: String,
    /// PDF rasterizer used for PNG output (defaults to ImageMagick's
    /// `convert`).
    #[serde(default = "default_convert_cmd")]
    pub convert_cmd: String,
    /// PDF to SVG converter used for SVG output (defaults to `pdf2svg`).
    #[serde(default = "default_pdf2svg_cmd")]
    pub pdf2svg_cmd: String,
    /// Rasterization density in DPI for PNG output (defaults to 100).
    #[serde(default = "default_density")]
    pub density: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            latex_cmd: default_latex_cmd(),
            pdfcrop_cmd: default_pdfcrop_cmd(),
            convert_cmd: default_convert_cmd(),
            pdf2svg_cmd: default_pdf2svg_cmd(),
            density: default_density(),
        }
    }
}

impl Config {
    /// Load the configuration from a TOML file. Missing keys fall back to
    /// their defaults.
    pub fn from_file(path: &Path) -> Result<Config, RenderError> {
        let raw = fs::read_to_string(path).map_err(|e| RenderError::Config {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        toml::from_str(&raw).map_err(|e| RenderError::Config {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default() {
        let cfg = Config::default();
        assert_eq!(cfg.latex_cmd, "pdflatex");
        assert_eq!(cfg.pdfcrop_cmd, "pdfcrop");
        assert_eq!(cfg.convert_cmd, "convert");
        assert_eq!(cfg.pdf2svg_cmd, "pdf2svg");
        assert_eq!(cfg.density, 100);
    }

    #[test]
    fn from_file_overrides_some_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("render.toml");
        std::fs::write(&path, "latex-cmd = \"lualatex\"\ndensity = 300\n").unwrap();

        let cfg = Config::from_file(&path).unwrap();
        assert_eq!(cfg.latex_cmd, "lualatex");
        assert_eq!(cfg.density, 300);
        // untouched keys keep their defaults
        assert_eq!(cfg.pdfcrop_cmd, "pdfcrop");
        assert_eq!(cfg.pdf2svg_cmd, "pdf2svg");
    }

    #[test]
    fn from_file_rejects_malformed_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("render.toml");
        std::fs::write(&path, "latex-cmd = [nonsense").unwrap();

        let err = Config::from_file(&path).unwrap_err();
        assert!(matches!(err, RenderError::Config { .. }));
    }

    #[test]
    fn from_file_missing_file() {
        let err = Config::from_file(Path::new("does-not-exist.toml")).unwrap_err();
        assert!(matches!(err, RenderError::Config { .. }));
    }
}
