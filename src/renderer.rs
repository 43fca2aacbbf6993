use crate::config::Config;
use crate::error::RenderError;
use crate::executor::{CommandExecutor, RealCommandExecutor};
use crate::template;
use crate::toolchain::Toolchain;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Base file name used when the caller does not pick one.
pub const DEFAULT_BASENAME: &str = "qcirc";

/// The image formats the pipeline can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Svg,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Svg => "svg",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("png") {
            Ok(OutputFormat::Png)
        } else if s.eq_ignore_ascii_case("svg") {
            Ok(OutputFormat::Svg)
        } else {
            Err(RenderError::UnsupportedFormat(s.to_string()))
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// One render job: circuit code plus artifact naming.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    /// The circuit rows, inserted into the LaTeX document verbatim.
    pub code: String,
    /// Base name of every file the pipeline touches (`{name}.tex`,
    /// `{name}.pdf`, the image). Used as given; callers passing untrusted
    /// names must sanitize them first.
    pub name: String,
    pub format: OutputFormat,
}

impl RenderRequest {
    /// A request with the conventional defaults: base name `qcirc`, PNG.
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: String::from(DEFAULT_BASENAME),
            format: OutputFormat::Png,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }
}

/// A rendered image: PNG bytes or SVG text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    Png(Vec<u8>),
    Svg(String),
}

impl Rendered {
    pub fn format(&self) -> OutputFormat {
        match self {
            Rendered::Png(_) => OutputFormat::Png,
            Rendered::Svg(_) => OutputFormat::Svg,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Rendered::Png(bytes) => bytes,
            Rendered::Svg(text) => text.as_bytes(),
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Rendered::Png(bytes) => bytes,
            Rendered::Svg(text) => text.into_bytes(),
        }
    }
}

/// Drives the latex -> pdfcrop -> convert/pdf2svg pipeline inside a working
/// directory.
///
/// The renderer holds no per-render state; one instance can serve any number
/// of sequential calls. Concurrent calls sharing a working directory and a
/// base name trample each other's files.
pub struct Renderer {
    toolchain: Toolchain,
    workdir: PathBuf,
    executor: Box<dyn CommandExecutor>,
}

impl Renderer {
    /// A renderer running the real tools in the current working directory.
    pub fn new(config: &Config) -> Result<Self, RenderError> {
        Ok(Self {
            toolchain: Toolchain::from_config(config)?,
            workdir: PathBuf::from("."),
            executor: Box::new(RealCommandExecutor),
        })
    }

    pub fn with_workdir(mut self, workdir: impl Into<PathBuf>) -> Self {
        self.workdir = workdir.into();
        self
    }

    pub fn with_executor(mut self, executor: Box<dyn CommandExecutor>) -> Self {
        self.executor = executor;
        self
    }

    /// Where the image for `request` ends up.
    pub fn output_path(&self, request: &RenderRequest) -> PathBuf {
        self.artifact(&request.name, request.format.extension())
    }

    // `{name}.{ext}` by concatenation; `Path::with_extension` would eat
    // everything after a dot in the base name.
    fn artifact(&self, name: &str, ext: &str) -> PathBuf {
        self.workdir.join(format!("{name}.{ext}"))
    }

    fn tmp_pdf(&self, name: &str) -> PathBuf {
        self.workdir.join(format!("{name}-tmp.pdf"))
    }

    fn remove_stale(&self, path: &Path) -> Result<(), RenderError> {
        match fs::remove_file(path) {
            Ok(()) => {
                log::debug!("Removed stale {:?}", path);
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(RenderError::Cleanup {
                path: path.to_path_buf(),
                reason: e,
            }),
        }
    }

    fn expect_artifact(&self, tool: &str, path: &Path) -> Result<(), RenderError> {
        if path.exists() {
            Ok(())
        } else {
            Err(RenderError::output_missing(tool, path))
        }
    }

    fn run(&self, prefix: &[String], tail: Vec<String>) -> Result<(), RenderError> {
        let mut args = prefix.to_vec();
        args.extend(tail);
        self.executor.execute(&self.workdir, &args)
    }

    /// Run the full pipeline for `request` and hand back the image.
    ///
    /// The intermediate and final files (`{name}.tex`, the cropped
    /// `{name}.pdf`, `{name}.png` or `{name}.svg`) stay in the working
    /// directory after the call; the returned data is read back from the
    /// image file. When the LaTeX compile fails, `{name}.log` stays behind
    /// too so the failure can be inspected.
    pub fn render(&self, request: &RenderRequest) -> Result<Rendered, RenderError> {
        let name = &request.name;
        log::info!("Rendering '{}' as {}", name, request.format);

        // Leftovers of an earlier run must never satisfy the artifact
        // checks further down.
        for path in [
            self.artifact(name, "tex"),
            self.artifact(name, "pdf"),
            self.artifact(name, "png"),
            self.artifact(name, "svg"),
            self.tmp_pdf(name),
        ] {
            self.remove_stale(&path)?;
        }

        let tex_file = self.artifact(name, "tex");
        fs::write(&tex_file, template::latex_document(&request.code)).map_err(|e| {
            RenderError::WriteFailed {
                path: tex_file.clone(),
                reason: e,
            }
        })?;

        let pdf_file = self.artifact(name, "pdf");
        self.run(
            &self.toolchain.latex,
            vec![
                String::from("-interaction"),
                String::from("batchmode"),
                format!("{name}.tex"),
            ],
        )?;
        self.expect_artifact(&self.toolchain.latex[0], &pdf_file)?;

        // Compile succeeded; the .aux and .log are noise from here on.
        self.remove_stale(&self.artifact(name, "aux"))?;
        self.remove_stale(&self.artifact(name, "log"))?;

        // Crop in place: pdfcrop writes a sibling file, which then replaces
        // the uncropped PDF.
        let tmp_pdf = self.tmp_pdf(name);
        self.run(
            &self.toolchain.pdfcrop,
            vec![format!("{name}.pdf"), format!("{name}-tmp.pdf")],
        )?;
        self.expect_artifact(&self.toolchain.pdfcrop[0], &tmp_pdf)?;
        fs::rename(&tmp_pdf, &pdf_file).map_err(|e| RenderError::Cleanup {
            path: tmp_pdf.clone(),
            reason: e,
        })?;

        match request.format {
            OutputFormat::Png => {
                let png_file = self.artifact(name, "png");
                self.run(
                    &self.toolchain.convert,
                    vec![
                        String::from("-density"),
                        self.toolchain.density.to_string(),
                        format!("{name}.pdf"),
                        format!("{name}.png"),
                    ],
                )?;
                self.expect_artifact(&self.toolchain.convert[0], &png_file)?;

                let bytes = fs::read(&png_file).map_err(|e| RenderError::ReadFailed {
                    path: png_file.clone(),
                    reason: e,
                })?;
                log::info!("Rendered {:?} ({} bytes)", png_file, bytes.len());
                Ok(Rendered::Png(bytes))
            }
            OutputFormat::Svg => {
                let svg_file = self.artifact(name, "svg");
                self.run(
                    &self.toolchain.pdf2svg,
                    vec![format!("{name}.pdf"), format!("{name}.svg")],
                )?;
                self.expect_artifact(&self.toolchain.pdf2svg[0], &svg_file)?;

                let bytes = fs::read(&svg_file).map_err(|e| RenderError::ReadFailed {
                    path: svg_file.clone(),
                    reason: e,
                })?;
                let text = String::from_utf8(bytes).map_err(|_| RenderError::NotUtf8 {
                    path: svg_file.clone(),
                })?;
                log::info!("Rendered {:?} ({} bytes)", svg_file, text.len());
                Ok(Rendered::Svg(text))
            }
        }
    }
}
