use tracing::debug;

use super::expr::parse_number;
use super::{Construct, Generator};
use crate::api::RedeclarationPolicy;
use crate::ast::{Alternative, BinOp, Node};
use crate::diagnostic::Diagnostic;
use crate::symbols::DataKind;

impl Generator<'_> {
    /// Store `value` in `target` and echo `<target> is <value>`. Values of
    /// string kind are addresses and print through `print_string`; every
    /// other value prints as a number, with comparisons stored as 0 or 1.
    pub(super) fn emit_assignment(&mut self, target: &str, value: &Node) -> Result<(), Diagnostic> {
        let kind = self.infer_kind(value);
        let message = self.message_label(target)?;

        match value {
            Node::String { value: text } => {
                let label = self.string_label(text)?;
                self.i_lea("AX", &label);
                self.store_var(target);
                self.print_label(&message);
                self.print_label(&label);
                self.print_new_line();
            }
            _ if kind == DataKind::String => {
                self.emit_value(value)?;
                self.store_var(target);
                self.print_label(&message);
                self.print_stored_string(target);
                self.print_new_line();
            }
            _ => {
                self.emit_value(value)?;
                self.store_var(target);
                self.print_label(&message);
                // print_string clobbers AH, so reload the stored value.
                self.load_var(target);
                self.print_ax();
            }
        }

        self.register(target, kind);
        match value {
            Node::String { value: text } => self.symbols.update_str(target, text),
            Node::Number { value: text } => {
                if let Ok(n) = parse_number(text) {
                    self.symbols.update_int(target, n);
                }
            }
            Node::Boolean { value: flag } => self.symbols.update_int(target, i64::from(*flag)),
            Node::Identifier { name } => {
                if let Some(source) = self.symbols.get(name).cloned() {
                    self.symbols.update_int(target, source.int_value);
                    if let Some(text) = &source.str_value {
                        self.symbols.update_str(target, text);
                    }
                }
            }
            _ => {}
        }
        self.absorb_symbol_diagnostics();
        Ok(())
    }

    /// Walk a statement chain iteratively so long programs do not count
    /// against the nesting limit.
    pub(super) fn emit_sequence(&mut self, node: &Node) -> Result<(), Diagnostic> {
        let mut current = Some(node);
        while let Some(Node::Sequence { first, next }) = current {
            self.emit_node(first)?;
            current = next.as_deref();
        }
        if let Some(tail) = current {
            self.emit_node(tail)?;
        }
        Ok(())
    }

    pub(super) fn emit_if(
        &mut self,
        cond: &Node,
        body: &Node,
        alternative: Option<&Alternative>,
    ) -> Result<(), Diagnostic> {
        let tag = self.labels.next(Construct::If);
        let else_label = format!("else_{}", tag);
        let end_label = format!("endif_{}", tag);
        debug!(tag, has_alternative = alternative.is_some(), "lowering if");

        self.emit_branch_unless(cond, &else_label)?;
        self.emit_node(body)?;
        self.i_jump("JMP", &end_label);
        self.emit_label(&else_label);
        if let Some(alt) = alternative {
            debug!(tag, kind = %alt.kind(), "lowering alternative");
            self.emit_node(alt.body())?;
        }
        self.emit_label(&end_label);
        Ok(())
    }

    pub(super) fn emit_while(&mut self, cond: &Node, body: &Node) -> Result<(), Diagnostic> {
        let tag = self.labels.next(Construct::While);
        let start_label = format!("while_start_{}", tag);
        let end_label = format!("while_end_{}", tag);
        debug!(tag, "lowering while");

        self.emit_label(&start_label);
        self.emit_branch_unless(cond, &end_label)?;
        self.emit_node(body)?;
        self.i_jump("JMP", &start_label);
        self.emit_label(&end_label);
        Ok(())
    }

    pub(super) fn emit_for(
        &mut self,
        init: &Node,
        cond: &Node,
        step: &Node,
        body: &Node,
    ) -> Result<(), Diagnostic> {
        let tag = self.labels.next(Construct::For);
        let start_label = format!("for_start_{}", tag);
        let end_label = format!("for_end_{}", tag);
        debug!(tag, "lowering for");

        self.emit_node(init)?;
        self.emit_label(&start_label);
        self.emit_branch_unless(cond, &end_label)?;
        self.emit_node(body)?;
        self.emit_node(step)?;
        self.i_jump("JMP", &start_label);
        self.emit_label(&end_label);
        Ok(())
    }

    /// Evaluate `cond` and jump to `target` when it is false. A condition
    /// that is not a comparison is false when it evaluates to zero.
    fn emit_branch_unless(&mut self, cond: &Node, target: &str) -> Result<(), Diagnostic> {
        match self.emit_node(cond)? {
            Some(cmp) => self.i_jump(cmp.false_jump(), target),
            None => {
                self.i_cmp("AX", "0");
                self.i_jump("JE", target);
            }
        }
        Ok(())
    }

    fn register(&mut self, name: &str, kind: DataKind) {
        match self.options.redeclaration {
            RedeclarationPolicy::Warn => self.symbols.declare(name, kind),
            RedeclarationPolicy::Allow => {
                if !self.symbols.is_declared(name) {
                    self.symbols.declare(name, kind);
                }
            }
        }
    }

    fn infer_kind(&self, value: &Node) -> DataKind {
        match value {
            Node::Number { value: text } => {
                if text.contains(['.', 'e', 'E']) {
                    DataKind::Float
                } else {
                    DataKind::Integer
                }
            }
            Node::String { .. } => DataKind::String,
            Node::Boolean { .. } => DataKind::Boolean,
            Node::Identifier { name } => self
                .symbols
                .get(name)
                .map(|info| info.kind)
                .unwrap_or(DataKind::Undefined),
            Node::Operator { op, .. } if op.is_comparison() => DataKind::Boolean,
            Node::Operator {
                op: BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div,
                ..
            } => DataKind::Integer,
            _ => DataKind::Undefined,
        }
    }
}
