//! Defines the core rendering trait and context for converting AST to SQL.

use crate::query::dialect::Dialect;
use model::core::value::Value;

pub mod insert;
pub mod select;

/// A trait for any AST node that can be rendered into a SQL string.
pub trait Render {
    fn render(&self, renderer: &mut Renderer);
}

/// How values are emitted into the statement text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueMode {
    /// Values become placeholders and are collected as parameters.
    Bind,
    /// Values are written as escaped literals; no parameters are produced.
    Inline,
}

/// A context that holds the state during the rendering process.
///
/// It accumulates the SQL string and the parameters, and provides
/// access to the dialect for syntax-specific details.
pub struct Renderer<'a> {
    pub sql: String,
    pub params: Vec<Value>,
    pub dialect: &'a dyn Dialect,
    pub mode: ValueMode,
}

impl<'a> Renderer<'a> {
    pub fn new(dialect: &'a dyn Dialect) -> Self {
        Self {
            sql: String::new(),
            params: Vec::new(),
            dialect,
            mode: ValueMode::Bind,
        }
    }

    pub fn inline(dialect: &'a dyn Dialect) -> Self {
        Self {
            mode: ValueMode::Inline,
            ..Self::new(dialect)
        }
    }

    /// Consumes the renderer and returns the final SQL string and parameters.
    pub fn finish(self) -> (String, Vec<Value>) {
        (self.sql, self.params)
    }

    pub fn add_param(&mut self, value: Value) {
        self.params.push(value);
        let placeholder = self.dialect.get_placeholder(self.params.len() - 1);
        self.sql.push_str(&placeholder);
    }

    /// Emits `value` in the renderer's mode. NULL is always the bare
    /// keyword: a bound NULL carries a parameter type, and SQL Server will
    /// not convert an nvarchar NULL into a binary column.
    pub fn push_value(&mut self, value: &Value) {
        match self.mode {
            ValueMode::Bind if matches!(value, Value::Null) => self.sql.push_str("null"),
            ValueMode::Bind => self.add_param(value.clone()),
            ValueMode::Inline => {
                let literal = self.dialect.render_literal(value);
                self.sql.push_str(&literal);
            }
        }
    }
}
