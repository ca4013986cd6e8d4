//! Reading program trees from disk and writing listings back.

use std::path::{Path, PathBuf};

use crate::ast::Node;
use crate::diagnostic::Diagnostic;

/// Extension appended to the caller's base name for the listing file.
pub const LISTING_EXTENSION: &str = "asm";

/// A program tree together with the document it came from.
pub struct LoadedProgram {
    pub path: PathBuf,
    pub source: String,
    pub root: Node,
}

impl LoadedProgram {
    pub fn load(path: &Path) -> Result<Self, Diagnostic> {
        let source = std::fs::read_to_string(path).map_err(|e| {
            Diagnostic::error(format!("cannot read '{}': {}", path.display(), e))
        })?;
        let root = parse_tree(&source)?;
        Ok(Self {
            path: path.to_path_buf(),
            source,
            root,
        })
    }

    pub fn filename(&self) -> String {
        self.path.to_string_lossy().to_string()
    }
}

/// Parse the JSON form of a program tree.
pub fn parse_tree(source: &str) -> Result<Node, Diagnostic> {
    Node::from_json(source).map_err(|e| {
        Diagnostic::error("invalid program tree".to_string())
            .with_note(format!("{} (line {}, column {})", e, e.line(), e.column()))
            .with_help(
                "trees are JSON objects tagged by \"kind\", e.g. {\"kind\":\"Number\",\"value\":\"5\"}"
                    .to_string(),
            )
    })
}

/// `base` with the listing extension appended (`out/prog` -> `out/prog.asm`).
pub fn artifact_path(base: &Path) -> PathBuf {
    let mut name = base.as_os_str().to_owned();
    name.push(".");
    name.push(LISTING_EXTENSION);
    PathBuf::from(name)
}

/// Default base name for an input: the input path without its extension.
pub fn default_base(input: &Path) -> PathBuf {
    input.with_extension("")
}

pub fn write_listing(base: &Path, listing: &str) -> Result<PathBuf, Diagnostic> {
    let out_path = artifact_path(base);
    std::fs::write(&out_path, listing).map_err(|e| {
        Diagnostic::error(format!("cannot write '{}': {}", out_path.display(), e))
    })?;
    Ok(out_path)
}
