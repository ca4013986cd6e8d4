//! Symbol table for assigned identifiers.
//!
//! Every identifier is global. An entry is created the first time a name is
//! the target of an assignment and lives for the rest of the compilation.
//! Misuse (redeclaring, updating or reading an undeclared name) never fails
//! hard: a warning is queued and a default stands in so generation goes on.

use std::collections::HashMap;

use crate::diagnostic::Diagnostic;

/// Data kind inferred for an identifier at its first declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataKind {
    Integer,
    Float,
    String,
    Boolean,
    Undefined,
}

impl std::fmt::Display for DataKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DataKind::Integer => "integer",
            DataKind::Float => "float",
            DataKind::String => "string",
            DataKind::Boolean => "boolean",
            DataKind::Undefined => "undefined",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolInfo {
    pub kind: DataKind,
    /// Last known integral value. Bookkeeping only; never drives emission.
    pub int_value: i64,
    pub str_value: Option<String>,
}

impl SymbolInfo {
    fn new(kind: DataKind) -> Self {
        Self {
            kind,
            int_value: 0,
            str_value: None,
        }
    }

    pub fn undefined() -> Self {
        Self::new(DataKind::Undefined)
    }
}

#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    entries: HashMap<String, SymbolInfo>,
    diagnostics: Vec<Diagnostic>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `name` with `kind`. A name that is already present keeps its
    /// original entry and a warning is queued.
    pub fn declare(&mut self, name: &str, kind: DataKind) {
        if let Some(existing) = self.entries.get(name) {
            let existing_kind = existing.kind;
            self.diagnostics.push(
                Diagnostic::warning(format!("variable '{}' already declared", name))
                    .with_note(format!("first declared as {}", existing_kind)),
            );
            return;
        }
        self.entries.insert(name.to_string(), SymbolInfo::new(kind));
    }

    pub fn update_int(&mut self, name: &str, value: i64) {
        match self.entries.get_mut(name) {
            Some(info) => info.int_value = value,
            None => self.report_undefined(name),
        }
    }

    pub fn update_str(&mut self, name: &str, value: &str) {
        match self.entries.get_mut(name) {
            Some(info) => info.str_value = Some(value.to_string()),
            None => self.report_undefined(name),
        }
    }

    /// Entry for `name`, or an undefined default (with a warning) when the
    /// name was never declared.
    pub fn lookup(&mut self, name: &str) -> SymbolInfo {
        match self.entries.get(name) {
            Some(info) => info.clone(),
            None => {
                self.report_undefined(name);
                SymbolInfo::undefined()
            }
        }
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&SymbolInfo> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by name.
    pub fn iter_sorted(&self) -> Vec<(&str, &SymbolInfo)> {
        let mut entries: Vec<_> = self
            .entries
            .iter()
            .map(|(name, info)| (name.as_str(), info))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }

    /// Drain the warnings queued since the last call.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    fn report_undefined(&mut self, name: &str) {
        self.diagnostics
            .push(Diagnostic::warning(format!("undefined variable '{}'", name)));
    }
}
