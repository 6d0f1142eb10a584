use std::fmt;

use serde::{Deserialize, Serialize};

/// The built-in value types a declaration can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveType {
    Integer,
    Double,
    Boolean,
    String,
    Null,
    Void,
}

impl PrimitiveType {
    /// Source keyword for this type.
    pub fn keyword(self) -> &'static str {
        match self {
            PrimitiveType::Integer => "int",
            PrimitiveType::Double => "double",
            PrimitiveType::Boolean => "bool",
            PrimitiveType::String => "string",
            PrimitiveType::Null => "null",
            PrimitiveType::Void => "void",
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, PrimitiveType::Integer | PrimitiveType::Double)
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A named, typed function parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    name: String,
    param_type: PrimitiveType,
    line: u32,
}

impl Parameter {
    pub fn new(name: impl Into<String>, param_type: PrimitiveType, line: u32) -> Self {
        Self { name: name.into(), param_type, line }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn param_type(&self) -> PrimitiveType {
        self.param_type
    }

    pub fn line(&self) -> u32 {
        self.line
    }
}
