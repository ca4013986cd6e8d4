//! Static data collection.
//!
//! Before any code is generated, one walk over the whole tree gathers every
//! distinct identifier and string literal so the data segment can declare
//! them up front. The walk uses an explicit work-list, so tree depth costs
//! heap rather than call stack.

use std::collections::{BTreeMap, BTreeSet};

use crate::ast::Node;

/// Identifiers and string literals appearing anywhere in a program.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StaticData {
    pub identifiers: BTreeSet<String>,
    pub strings: BTreeSet<String>,
}

impl StaticData {
    /// Walk the entire tree rooted at `root`.
    pub fn collect(root: &Node) -> Self {
        let mut data = StaticData::default();
        let mut pending: Vec<&Node> = vec![root];

        while let Some(node) = pending.pop() {
            match node {
                Node::Identifier { name } => {
                    data.identifiers.insert(name.clone());
                }
                Node::String { value } => {
                    data.strings.insert(value.clone());
                }
                Node::Number { .. } | Node::Boolean { .. } | Node::Unknown => {}
                Node::Operator { lhs, rhs, .. } => {
                    pending.push(rhs);
                    pending.push(lhs);
                }
                Node::Assignment { target, value } => {
                    data.identifiers.insert(target.clone());
                    pending.push(value);
                }
                Node::Sequence { first, next } => {
                    if let Some(next) = next {
                        pending.push(next);
                    }
                    pending.push(first);
                }
                Node::If {
                    cond,
                    body,
                    alternative,
                } => {
                    if let Some(alt) = alternative {
                        pending.push(alt.body());
                    }
                    pending.push(body);
                    pending.push(cond);
                }
                Node::While { cond, body } => {
                    pending.push(body);
                    pending.push(cond);
                }
                Node::For {
                    init,
                    cond,
                    step,
                    body,
                } => {
                    pending.push(body);
                    pending.push(step);
                    pending.push(cond);
                    pending.push(init);
                }
            }
        }

        data
    }

    /// Data labels for everything the data segment declares besides the
    /// identifiers themselves.
    pub fn labels(&self) -> DataLabels {
        DataLabels::assign(&self.identifiers, &self.strings)
    }
}

/// Base name of the line-break data item.
const NEW_LINE_BASE: &str = "new_line";

/// Labels for derived data items: the line break, one message per
/// identifier and one item per string literal.
///
/// Identifiers keep their own names and are reserved first. The line break
/// is `new_line`, messages are `msg_<name>`, and string labels are the
/// literal with spaces removed and any other character that cannot appear
/// in an assembler label replaced by `_`, behind a `str_` prefix. A label
/// already taken gets `_2`, `_3`, ...
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataLabels {
    new_line: String,
    messages: BTreeMap<String, String>,
    strings: BTreeMap<String, String>,
}

impl Default for DataLabels {
    fn default() -> Self {
        DataLabels::assign(&BTreeSet::new(), &BTreeSet::new())
    }
}

impl DataLabels {
    pub fn assign(identifiers: &BTreeSet<String>, literals: &BTreeSet<String>) -> Self {
        let mut taken: BTreeSet<String> = identifiers.clone();
        let new_line = claim(&mut taken, NEW_LINE_BASE.to_string());
        let messages = identifiers
            .iter()
            .map(|name| (name.clone(), claim(&mut taken, format!("msg_{}", name))))
            .collect();
        let strings = literals
            .iter()
            .map(|literal| (literal.clone(), claim(&mut taken, sanitize_label(literal))))
            .collect();
        Self {
            new_line,
            messages,
            strings,
        }
    }

    pub fn new_line(&self) -> &str {
        &self.new_line
    }

    /// Label of the `"<name> is "` message for an identifier.
    pub fn message(&self, name: &str) -> Option<&str> {
        self.messages.get(name).map(String::as_str)
    }

    /// Label of a string literal.
    pub fn get(&self, literal: &str) -> Option<&str> {
        self.strings.get(literal).map(String::as_str)
    }

    /// `(literal, label)` pairs in literal order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.strings.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

fn claim(taken: &mut BTreeSet<String>, base: String) -> String {
    let mut label = base.clone();
    let mut n = 2;
    while taken.contains(&label) {
        label = format!("{}_{}", base, n);
        n += 1;
    }
    taken.insert(label.clone());
    label
}

fn sanitize_label(literal: &str) -> String {
    let mut label = String::from("str_");
    for c in literal.chars() {
        if c == ' ' {
            continue;
        }
        if c.is_ascii_alphanumeric() || c == '_' {
            label.push(c);
        } else {
            label.push('_');
        }
    }
    label
}
