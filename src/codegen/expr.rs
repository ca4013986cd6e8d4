use tracing::debug;

use super::{Comparison, Generator};
use crate::ast::{BinOp, Node};
use crate::diagnostic::Diagnostic;

/// Values `PrintNumber` renders as written. It reads `AX` as signed, so
/// anything above 32767 prints as a negative number.
const WORD_RANGE: std::ops::RangeInclusive<i64> = -32768..=32767;

/// Parse a numeric literal the way the listing expects it: as a floating
/// value first, then truncated toward zero.
pub(crate) fn parse_number(text: &str) -> Result<i64, Diagnostic> {
    let malformed = || {
        Diagnostic::error(format!("malformed number literal '{}'", text))
            .with_help("numeric literals are decimal, optionally with a fraction or exponent".to_string())
    };
    let value: f64 = text.trim().parse().map_err(|_| malformed())?;
    if !value.is_finite() {
        return Err(malformed());
    }
    Ok(value.trunc() as i64)
}

impl Generator<'_> {
    pub(super) fn emit_number(&mut self, text: &str) -> Result<i64, Diagnostic> {
        let value = parse_number(text)?;
        if !WORD_RANGE.contains(&value) {
            self.diagnostics.push(
                Diagnostic::warning(format!("number {} does not fit in a signed 16-bit word", value))
                    .with_note(format!("written as '{}'", text))
                    .with_note("values are held in AX and printed as signed decimals".to_string()),
            );
        }
        self.i_mov("AX", &value.to_string());
        Ok(value)
    }

    pub(super) fn emit_identifier(&mut self, name: &str) {
        // Reading a name nobody assigned yet is worth a warning, but the
        // data segment declares every identifier, so the load stays valid.
        self.symbols.lookup(name);
        self.absorb_symbol_diagnostics();
        self.load_var(name);
    }

    pub(super) fn emit_boolean(&mut self, value: bool) {
        self.i_mov("AX", if value { "1" } else { "0" });
    }

    /// A bare string literal prints itself followed by a line break.
    pub(super) fn emit_string(&mut self, text: &str) -> Result<(), Diagnostic> {
        let label = self.string_label(text)?;
        self.print_label(&label);
        self.print_new_line();
        Ok(())
    }

    /// Left operand ends up in `AX`, right operand in `BX`. A comparison
    /// operand is used as 0 or 1.
    pub(super) fn emit_operator(
        &mut self,
        op: BinOp,
        lhs: &Node,
        rhs: &Node,
    ) -> Result<Option<Comparison>, Diagnostic> {
        self.emit_value(lhs)?;
        self.i_push("AX");
        self.emit_value(rhs)?;
        self.i_mov("BX", "AX");
        self.i_pop("AX");

        match op {
            BinOp::Add => self.i_add("AX", "BX"),
            BinOp::Sub => self.i_sub("AX", "BX"),
            BinOp::Mul => self.i_mul("BX"),
            BinOp::Div => {
                // DX holds the high word of the dividend.
                self.i_xor("DX", "DX");
                self.i_div("BX");
            }
            BinOp::Eq | BinOp::Ne | BinOp::Lt | BinOp::Gt | BinOp::Le | BinOp::Ge => {
                self.i_cmp("AX", "BX");
                debug!(op = %op, "comparison left for the enclosing branch");
                return Ok(Comparison::from_op(op));
            }
        }
        Ok(None)
    }

    pub(super) fn string_label(&self, text: &str) -> Result<String, Diagnostic> {
        match self.data.get(text) {
            Some(label) => Ok(label.to_string()),
            None => Err(Diagnostic::error(format!(
                "string literal {:?} has no data declaration",
                text
            ))
            .with_help("collect static data from the same tree before generating code".to_string())),
        }
    }

    pub(super) fn message_label(&self, name: &str) -> Result<String, Diagnostic> {
        match self.data.message(name) {
            Some(label) => Ok(label.to_string()),
            None => Err(Diagnostic::error(format!(
                "variable '{}' has no data declaration",
                name
            ))
            .with_help("collect static data from the same tree before generating code".to_string())),
        }
    }
}
