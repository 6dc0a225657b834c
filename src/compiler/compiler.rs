use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::recorder::step::Step;

use super::declarative::Declarative;
use super::imperative::Imperative;

// ============================================================================
// Dialects
// ============================================================================

/// Target script syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Keyword-driven suite (`.robot`)
    Declarative,
    /// Programmatic test module (`.py`)
    Imperative,
}

impl Dialect {
    pub const ALL: [Dialect; 2] = [Dialect::Declarative, Dialect::Imperative];

    pub fn extension(&self) -> &'static str {
        match self {
            Dialect::Declarative => "robot",
            Dialect::Imperative => "py",
        }
    }

    pub fn file_name(&self, stem: &str) -> String {
        format!("{}.{}", stem, self.extension())
    }

    fn rules(&self) -> &'static dyn DialectRules {
        match self {
            Dialect::Declarative => &Declarative,
            Dialect::Imperative => &Imperative,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Declarative => f.write_str("declarative"),
            Dialect::Imperative => f.write_str("imperative"),
        }
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "declarative" | "robot" => Ok(Dialect::Declarative),
            "imperative" | "python" | "pytest" => Ok(Dialect::Imperative),
            other => Err(format!("unknown dialect '{}'", other)),
        }
    }
}

/// Per-dialect translation rules wrapped by `compile`.
pub trait DialectRules {
    fn header(&self) -> String;

    /// Body emitted when there are no steps, keeping the script valid.
    fn empty_body(&self) -> String;

    fn footer(&self) -> String {
        String::new()
    }

    /// Statement for one step; `index` is zero-based.
    fn statement(&self, index: usize, step: &Step) -> String;
}

// ============================================================================
// Compilation
// ============================================================================

/// Compile a step log into one self-contained script. Steps keep their
/// recorded order; nothing is merged or dropped.
pub fn compile<S: AsRef<Step>>(steps: &[S], dialect: Dialect) -> String {
    let rules = dialect.rules();
    let mut out = rules.header();

    if steps.is_empty() {
        out.push_str(&rules.empty_body());
    }
    for (index, step) in steps.iter().enumerate() {
        out.push_str(&rules.statement(index, step.as_ref()));
    }

    out.push_str(&rules.footer());
    out
}

/// A compiled script ready to be saved or downloaded.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptArtifact {
    pub dialect: Dialect,
    pub file_name: String,
    pub text: String,
}

/// Compile `steps` once per requested dialect.
pub fn export<S: AsRef<Step>>(steps: &[S], dialects: &[Dialect], stem: &str) -> Vec<ScriptArtifact> {
    dialects
        .iter()
        .map(|&dialect| ScriptArtifact {
            dialect,
            file_name: dialect.file_name(stem),
            text: compile(steps, dialect),
        })
        .collect()
}
