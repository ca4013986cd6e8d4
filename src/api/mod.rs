use tracing::debug;

use crate::ast::Node;
use crate::codegen::{Generator, Sink};
use crate::collect::{DataLabels, StaticData};
use crate::diagnostic::Diagnostic;
use crate::runtime;
use crate::symbols::SymbolTable;

pub mod pipeline;

#[cfg(test)]
mod tests;

/// What to do when an assignment targets a name that is already declared.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum RedeclarationPolicy {
    /// Keep the first entry and report a warning.
    #[default]
    Warn,
    /// Treat it as an ordinary reassignment.
    Allow,
}

impl RedeclarationPolicy {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "warn" => Some(RedeclarationPolicy::Warn),
            "allow" => Some(RedeclarationPolicy::Allow),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RedeclarationPolicy::Warn => "warn",
            RedeclarationPolicy::Allow => "allow",
        }
    }
}

/// Options controlling a compilation.
#[derive(Clone, Debug)]
pub struct CompileOptions {
    pub redeclaration: RedeclarationPolicy,
    /// Deepest node nesting the generator will descend into.
    pub max_depth: usize,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            redeclaration: RedeclarationPolicy::Warn,
            max_depth: 256,
        }
    }
}

/// A finished listing and what the compilation learned along the way.
#[derive(Clone, Debug)]
pub struct Compiled {
    pub listing: String,
    pub data: StaticData,
    pub symbols: SymbolTable,
    /// Recoverable diagnostics, in the order they were raised.
    pub warnings: Vec<Diagnostic>,
}

/// A compilation stopped by a fatal diagnostic.
#[derive(Clone, Debug)]
pub struct CompileFailure {
    /// Every diagnostic raised; the fatal one is last.
    pub diagnostics: Vec<Diagnostic>,
    /// Whatever had been emitted when generation stopped.
    pub partial_listing: String,
}

/// Compile a tree with default options.
pub fn compile(root: &Node) -> Result<Compiled, CompileFailure> {
    compile_with_options(root, &CompileOptions::default())
}

/// Compile a tree into a complete listing: data segment, code segment with
/// the generated instructions, runtime procedures and program exit.
pub fn compile_with_options(
    root: &Node,
    options: &CompileOptions,
) -> Result<Compiled, CompileFailure> {
    let data = StaticData::collect(root);
    let labels = data.labels();
    debug!(
        identifiers = data.identifiers.len(),
        strings = data.strings.len(),
        "collected static data"
    );

    let mut lines: Vec<String> = Vec::new();
    emit_data_segment(&data, &labels, &mut lines);
    lines.push(String::new());
    emit_code_prologue(&mut lines);

    let mut generator = Generator::new(&mut lines, &labels, options);
    let outcome = generator.generate(Some(root));
    let (symbols, mut diagnostics) = generator.finish();

    if let Err(fatal) = outcome {
        debug!(message = %fatal.message, "generation aborted");
        diagnostics.push(fatal);
        return Err(CompileFailure {
            diagnostics,
            partial_listing: join_lines(&lines),
        });
    }

    emit_code_epilogue(&mut lines);
    debug!(lines = lines.len(), "listing complete");

    Ok(Compiled {
        listing: join_lines(&lines),
        data,
        symbols,
        warnings: diagnostics,
    })
}

/// Parse a tree from JSON and compile it.
pub fn compile_json(source: &str, options: &CompileOptions) -> Result<Compiled, CompileFailure> {
    let root = pipeline::parse_tree(source).map_err(|diag| CompileFailure {
        diagnostics: vec![diag],
        partial_listing: String::new(),
    })?;
    compile_with_options(&root, options)
}

/// Data segment lines alone, for inspection.
pub fn data_segment(root: &Node) -> String {
    let data = StaticData::collect(root);
    let labels = data.labels();
    let mut lines: Vec<String> = Vec::new();
    emit_data_segment(&data, &labels, &mut lines);
    join_lines(&lines)
}

fn emit_data_segment(data: &StaticData, labels: &DataLabels, sink: &mut dyn Sink) {
    sink.line("DATA SEGMENT".to_string());
    for name in &data.identifiers {
        sink.line(format!("{} DW ?", name));
        if let Some(message) = labels.message(name) {
            sink.line(format!("{} DB '{} is $'", message, quote(name)));
        }
    }
    for (literal, label) in labels.iter() {
        sink.line(format!("{} DB '{} $' , 0", label, quote(literal)));
    }
    sink.line(format!("{} DB 0Dh, 0Ah, '$'", labels.new_line()));
    sink.line("DATA ENDS".to_string());
}

fn emit_code_prologue(sink: &mut dyn Sink) {
    for line in [
        "CODE SEGMENT",
        "ASSUME CS:CODE, DS:DATA",
        "START:",
        "MOV AX, DATA",
        "MOV DS, AX",
    ] {
        sink.line(line.to_string());
    }
}

fn emit_code_epilogue(sink: &mut dyn Sink) {
    sink.line("JMP ProgramEnd".to_string());
    runtime::emit_runtime(sink);
    for line in ["ProgramEnd:", "MOV AH, 4CH", "INT 21H", "CODE ENDS", "END START"] {
        sink.line(line.to_string());
    }
}

/// Double single quotes so the text survives inside a `'...'` operand.
fn quote(text: &str) -> String {
    text.replace('\'', "''")
}

fn join_lines(lines: &[String]) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
