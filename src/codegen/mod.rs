//! Tree-to-instruction lowering.
//!
//! [`Generator`] walks a [`Node`] and appends one instruction per line to a
//! [`Sink`], leaving expression results in `AX`. All state a compilation
//! needs (symbol table, per-construct label counters, diagnostics) lives in
//! the generator, so independent compilations never share anything.

mod expr;
mod inst;
mod stmt;

use tracing::trace;

use crate::api::CompileOptions;
use crate::ast::{BinOp, Node};
use crate::collect::DataLabels;
use crate::diagnostic::Diagnostic;
use crate::symbols::SymbolTable;

/// Destination for emitted listing lines.
pub trait Sink {
    fn line(&mut self, line: String);
}

impl Sink for Vec<String> {
    fn line(&mut self, line: String) {
        self.push(line);
    }
}

/// A comparison whose flags are left set by `CMP AX, BX`, waiting for the
/// enclosing `if`/`while`/`for` to pick a conditional jump.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

impl Comparison {
    pub fn from_op(op: BinOp) -> Option<Comparison> {
        Some(match op {
            BinOp::Eq => Comparison::Eq,
            BinOp::Ne => Comparison::Ne,
            BinOp::Lt => Comparison::Lt,
            BinOp::Gt => Comparison::Gt,
            BinOp::Le => Comparison::Le,
            BinOp::Ge => Comparison::Ge,
            BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div => return None,
        })
    }

    /// Jump taken when the comparison is false.
    pub fn false_jump(self) -> &'static str {
        match self {
            Comparison::Eq => "JNE",
            Comparison::Ne => "JE",
            Comparison::Lt => "JGE",
            Comparison::Gt => "JLE",
            Comparison::Le => "JG",
            Comparison::Ge => "JL",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Construct {
    If,
    While,
    For,
    /// A comparison turned into a 0/1 value.
    Bool,
}

/// Independent label counters, one per control-flow construct.
#[derive(Clone, Debug, Default)]
pub(crate) struct LabelCounters {
    if_count: u32,
    while_count: u32,
    for_count: u32,
    bool_count: u32,
}

impl LabelCounters {
    /// Return the current tag for `construct` and advance its counter.
    pub(crate) fn next(&mut self, construct: Construct) -> u32 {
        let counter = match construct {
            Construct::If => &mut self.if_count,
            Construct::While => &mut self.while_count,
            Construct::For => &mut self.for_count,
            Construct::Bool => &mut self.bool_count,
        };
        let tag = *counter;
        *counter += 1;
        tag
    }
}

/// Lowers nodes into instructions.
pub struct Generator<'a> {
    sink: &'a mut dyn Sink,
    options: &'a CompileOptions,
    data: &'a DataLabels,
    symbols: SymbolTable,
    labels: LabelCounters,
    diagnostics: Vec<Diagnostic>,
    depth: usize,
}

impl<'a> Generator<'a> {
    pub fn new(
        sink: &'a mut dyn Sink,
        data: &'a DataLabels,
        options: &'a CompileOptions,
    ) -> Self {
        Self {
            sink,
            options,
            data,
            symbols: SymbolTable::new(),
            labels: LabelCounters::default(),
            diagnostics: Vec::new(),
            depth: 0,
        }
    }

    /// Emit the instructions for `node`. An absent node emits nothing.
    ///
    /// Recoverable problems are collected (see [`Generator::finish`]); the
    /// returned error is the first fatal one, after which nothing more is
    /// emitted for the tree.
    pub fn generate(&mut self, node: Option<&Node>) -> Result<(), Diagnostic> {
        match node {
            Some(node) => self.emit_node(node).map(|_| ()),
            None => Ok(()),
        }
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Consume the generator, yielding the symbol table and the
    /// recoverable diagnostics in the order they were raised.
    pub fn finish(self) -> (SymbolTable, Vec<Diagnostic>) {
        (self.symbols, self.diagnostics)
    }

    /// Lower one node. Returns the comparison an `Operator` node left in the
    /// flags, so a branch can consume it immediately.
    fn emit_node(&mut self, node: &Node) -> Result<Option<Comparison>, Diagnostic> {
        if self.depth >= self.options.max_depth {
            return Err(Diagnostic::error(format!(
                "program nesting exceeds {} levels",
                self.options.max_depth
            ))
            .with_note(format!("while lowering a {} node", node.kind()))
            .with_help("raise `max_depth` in tasmgen.toml or pass --max-depth".to_string()));
        }
        trace!(kind = %node.kind(), depth = self.depth, "lowering node");

        self.depth += 1;
        let result = self.lower(node);
        self.depth -= 1;
        result
    }

    fn lower(&mut self, node: &Node) -> Result<Option<Comparison>, Diagnostic> {
        match node {
            Node::Number { value } => {
                self.emit_number(value)?;
            }
            Node::Identifier { name } => self.emit_identifier(name),
            Node::String { value } => self.emit_string(value)?,
            Node::Boolean { value } => self.emit_boolean(*value),
            Node::Operator { op, lhs, rhs } => return self.emit_operator(*op, lhs, rhs),
            Node::Assignment { target, value } => self.emit_assignment(target, value)?,
            Node::Sequence { .. } => self.emit_sequence(node)?,
            Node::If {
                cond,
                body,
                alternative,
            } => self.emit_if(cond, body, alternative.as_ref())?,
            Node::While { cond, body } => self.emit_while(cond, body)?,
            Node::For {
                init,
                cond,
                step,
                body,
            } => self.emit_for(init, cond, step, body)?,
            Node::Unknown => {
                self.diagnostics.push(
                    Diagnostic::warning(format!("unexpected node kind '{}'", node.kind()))
                        .with_note("no code was emitted for it".to_string()),
                );
            }
        }
        Ok(None)
    }

    /// Lower a node whose result is used as a value. A comparison leaves
    /// only flags behind, so it is turned into 0 or 1 in `AX`.
    fn emit_value(&mut self, node: &Node) -> Result<(), Diagnostic> {
        if let Some(cmp) = self.emit_node(node)? {
            let tag = self.labels.next(Construct::Bool);
            let end_label = format!("bool_end_{}", tag);
            // MOV leaves the flags alone.
            self.i_mov("AX", "0");
            self.i_jump(cmp.false_jump(), &end_label);
            self.i_mov("AX", "1");
            self.emit_label(&end_label);
        }
        Ok(())
    }

    /// Move warnings raised by the symbol table into the generator's list.
    fn absorb_symbol_diagnostics(&mut self) {
        let raised = self.symbols.take_diagnostics();
        self.diagnostics.extend(raised);
    }
}
