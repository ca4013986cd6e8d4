use std::path::{Path, PathBuf};

use crate::api::{CompileOptions, RedeclarationPolicy};
use crate::diagnostic::Diagnostic;

/// Name of the per-project configuration file.
pub const CONFIG_FILE: &str = "tasmgen.toml";

/// Settings read from a tasmgen.toml. Unset keys leave the defaults alone.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProjectConfig {
    pub root_dir: PathBuf,
    pub redeclaration: Option<RedeclarationPolicy>,
    pub max_depth: Option<usize>,
}

impl ProjectConfig {
    /// Load configuration from a tasmgen.toml file.
    pub fn load(toml_path: &Path) -> Result<ProjectConfig, Diagnostic> {
        let content = std::fs::read_to_string(toml_path).map_err(|e| {
            Diagnostic::error(format!("cannot read '{}': {}", toml_path.display(), e))
        })?;
        let root_dir = toml_path.parent().unwrap_or(Path::new(".")).to_path_buf();
        let mut config = Self::parse(&content)?;
        config.root_dir = root_dir;
        Ok(config)
    }

    /// Section-aware minimal TOML parsing: only `[codegen]` is read.
    pub fn parse(content: &str) -> Result<ProjectConfig, Diagnostic> {
        let mut config = ProjectConfig::default();
        let mut current_section = String::new();

        for (index, line) in content.lines().enumerate() {
            let trimmed = strip_comment(line).trim();
            if trimmed.is_empty() {
                continue;
            }
            if trimmed.starts_with('[') && trimmed.ends_with(']') {
                current_section = trimmed[1..trimmed.len() - 1].trim().to_string();
                continue;
            }
            if current_section != "codegen" {
                continue;
            }
            let Some((key, value)) = trimmed.split_once('=') else {
                continue;
            };
            let key = key.trim().trim_matches('"');
            let value = value.trim().trim_matches('"');
            let invalid = |expected: &str| {
                Diagnostic::error(format!(
                    "invalid value '{}' for '{}' in {}",
                    value, key, CONFIG_FILE
                ))
                .with_note(format!("line {}", index + 1))
                .with_help(format!("expected {}", expected))
            };
            match key {
                "redeclaration" => {
                    config.redeclaration = Some(
                        RedeclarationPolicy::parse(value)
                            .ok_or_else(|| invalid("\"warn\" or \"allow\""))?,
                    );
                }
                "max_depth" => {
                    let depth: usize = value
                        .parse()
                        .ok()
                        .filter(|d| *d > 0)
                        .ok_or_else(|| invalid("a positive integer"))?;
                    config.max_depth = Some(depth);
                }
                _ => {}
            }
        }

        Ok(config)
    }

    /// Try to find a tasmgen.toml in the given directory or its ancestors.
    pub fn find(start_dir: &Path) -> Option<PathBuf> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(CONFIG_FILE);
            if candidate.exists() {
                return Some(candidate);
            }
            if !dir.pop() {
                return None;
            }
        }
    }

    /// Overlay the configured values on `options`.
    pub fn apply(&self, options: &mut CompileOptions) {
        if let Some(policy) = self.redeclaration {
            options.redeclaration = policy;
        }
        if let Some(depth) = self.max_depth {
            options.max_depth = depth;
        }
    }
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}
