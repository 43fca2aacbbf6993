//! Render Qcircuit quantum circuit diagrams to PNG or SVG images.
//!
//! The heavy lifting is done by external tools: a LaTeX compiler turns the
//! generated document into a PDF, `pdfcrop` trims the page margins, and
//! ImageMagick's `convert` or `pdf2svg` produces the final image. This crate
//! assembles the document, drives those tools in order and reads the result
//! back; see [`Renderer::render`] for the exact pipeline.

pub mod config;
pub mod error;
pub mod executor;
pub mod renderer;
pub mod template;
pub mod toolchain;

pub use config::Config;
pub use error::RenderError;
pub use executor::{CommandExecutor, RealCommandExecutor};
pub use renderer::{DEFAULT_BASENAME, OutputFormat, RenderRequest, Rendered, Renderer};
pub use template::{QCIRCUIT_MACROS, latex_document};
pub use toolchain::Toolchain;
