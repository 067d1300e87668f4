//! Builder-pattern printer for rendering diagnostics.

use std::fmt::Write;

use netweave_core::Colors;

use super::Diagnostics;
use super::message::Severity;

/// Builder for rendering diagnostics with various options.
pub struct DiagnosticsPrinter<'d> {
    diagnostics: &'d Diagnostics,
    colored: bool,
}

impl<'d> DiagnosticsPrinter<'d> {
    pub fn new(diagnostics: &'d Diagnostics) -> Self {
        Self {
            diagnostics,
            colored: false,
        }
    }

    pub fn colored(mut self, value: bool) -> Self {
        self.colored = value;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    /// One block per diagnostic:
    ///
    /// ```text
    /// error: [SyncVar] field cannot be static: `score`
    ///   --> Player::score
    ///   = hint: ...
    /// ```
    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        let c = Colors::new(self.colored);
        for diag in self.diagnostics.iter() {
            let color = match diag.severity() {
                Severity::Error => c.red,
                Severity::Warning => c.yellow,
            };
            writeln!(w, "{color}{}{}: {}", diag.severity(), c.reset, diag.message)?;
            writeln!(w, "  {}-->{} {}", c.dim, c.reset, diag.location)?;
            let hints = diag.hints.iter().map(String::as_str);
            for hint in diag.kind.default_hint().into_iter().chain(hints) {
                writeln!(w, "  {}= hint:{} {hint}", c.dim, c.reset)?;
            }
        }
        Ok(())
    }
}
