use crate::query::{
    ast::insert::Insert,
    renderer::{Render, Renderer},
};

impl Render for Insert {
    fn render(&self, r: &mut Renderer) {
        // 1. insert into table (...)
        r.sql.push_str("insert into ");
        r.sql.push_str(&self.table);
        r.sql.push_str(" (");
        let quoted_columns: Vec<String> = self
            .columns
            .iter()
            .map(|c| r.dialect.quote_identifier(c))
            .collect();
        r.sql.push_str(&quoted_columns.join(","));
        r.sql.push(')');

        // 2. values (...)
        r.sql.push_str(" values ");
        for (i, row) in self.values.iter().enumerate() {
            if i > 0 {
                r.sql.push(',');
            }
            r.sql.push('(');
            for (j, val) in row.iter().enumerate() {
                if j > 0 {
                    r.sql.push(',');
                }
                r.push_value(val);
            }
            r.sql.push(')');
        }
        r.sql.push(';');
    }
}
