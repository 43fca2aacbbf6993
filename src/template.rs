//! LaTeX document assembly
//!
//! The Qcircuit macro package is embedded at compile time and pasted into
//! every generated document, so rendering needs no `.sty` files installed,
//! only the LaTeX toolchain itself.

/// The Qcircuit macro definitions, loaded from src/qcircuit.tex.
pub const QCIRCUIT_MACROS: &str = include_str!("qcircuit.tex");

/// Wrap circuit code in a complete standalone LaTeX document.
///
/// The body ends up between `\Qcircuit @C=1cm @R=1cm {` and the closing
/// brace exactly as passed in. It is not escaped or validated here; TeX
/// specials like `%`, `\` and `&` are the circuit language, and malformed
/// input is the LaTeX compiler's to reject.
pub fn latex_document(circuit_body: &str) -> String {
    let mut doc = String::with_capacity(QCIRCUIT_MACROS.len() + circuit_body.len() + 128);
    doc.push_str("\n\\documentclass{standalone}\n\n");
    doc.push_str(QCIRCUIT_MACROS);
    doc.push_str("\n\\begin{document}\n\\Qcircuit @C=1cm @R=1cm {\n");
    doc.push_str(circuit_body);
    doc.push_str("}\n\\end{document}\n");
    doc
}
