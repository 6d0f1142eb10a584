mod expr;
mod stmt;
mod types;

pub use expr::*;
pub use stmt::*;
pub use types::*;

use serde::{Deserialize, Serialize};

use crate::visit::{StmtResult, StmtVisitor};

/// Root of one compiled file's tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranslationUnit {
    statements: Vec<Stmt>,
}

impl TranslationUnit {
    pub fn new(statements: Vec<Stmt>) -> Self {
        Self { statements }
    }

    pub fn statements(&self) -> &[Stmt] {
        &self.statements
    }

    /// Visit every top-level statement in order, collecting each result.
    pub fn accept_all<V: StmtVisitor + ?Sized>(&self, visitor: &mut V) -> Vec<StmtResult> {
        self.statements.iter().map(|stmt| stmt.accept(visitor)).collect()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
