use model::records::row::RowData;
use planner::query::{
    ast::insert::Insert,
    dialect::Dialect,
    renderer::{Render, Renderer},
};

/// Turns rows into standalone insert statements with inline literals.
///
/// These are the statements persisted in the replay file, one per row, and
/// the body of the destination script when the destination runs in script mode.
pub struct StatementGenerator<'a> {
    dialect: &'a dyn Dialect,
}

impl<'a> StatementGenerator<'a> {
    pub fn new(dialect: &'a dyn Dialect) -> Self {
        Self { dialect }
    }

    /// `insert into <table> (<columns>) values (<values>);`
    pub fn render(&self, table: &str, row: &RowData) -> String {
        let ast = Insert::from_row(table, row);
        let mut renderer = Renderer::inline(self.dialect);
        ast.render(&mut renderer);
        let (sql, _) = renderer.finish();
        sql
    }

    pub fn render_all(&self, table: &str, rows: &[RowData]) -> Vec<String> {
        rows.iter().map(|row| self.render(table, row)).collect()
    }

    pub fn identity_directive(&self, table: &str) -> Option<String> {
        self.dialect.identity_insert(table)
    }

    /// Identity directive followed by every statement, one per line,
    /// executed by the destination as a single request.
    pub fn render_script(&self, table: &str, statements: &[String]) -> String {
        let mut script = String::new();
        if let Some(directive) = self.identity_directive(table) {
            script.push_str(&directive);
            script.push('\n');
        }
        for statement in statements {
            script.push_str(statement);
            script.push('\n');
        }
        script
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::{core::value::Value, records::row::FieldValue};
    use planner::query::dialect::MsSql;

    fn row(id: i64, name: Value) -> RowData {
        RowData::new(
            "Users",
            vec![
                FieldValue::new("Id", Value::Int(id)),
                FieldValue::new("Name", name),
                FieldValue::new("Nick", Value::Null),
            ],
        )
    }

    #[test]
    fn test_render_escapes_quotes_and_nulls() {
        let generator = StatementGenerator::new(&MsSql);
        let sql = generator.render("Users", &row(1, Value::String("O'Brien".into())));

        assert_eq!(
            sql,
            "insert into Users ([Id],[Name],[Nick]) values ('1','O''Brien',null);"
        );
    }

    #[test]
    fn test_render_script_prefixes_identity_directive() {
        let generator = StatementGenerator::new(&MsSql);
        let statements = generator.render_all(
            "Users",
            &[
                row(1, Value::String("a".into())),
                row(2, Value::String("b".into())),
            ],
        );
        let script = generator.render_script("Users", &statements);

        let lines: Vec<&str> = script.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "SET IDENTITY_INSERT Users ON;");
        assert!(lines[1].ends_with("values ('1','a',null);"));
        assert!(lines[2].ends_with("values ('2','b',null);"));
    }
}
