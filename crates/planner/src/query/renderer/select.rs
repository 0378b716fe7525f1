use crate::query::{
    ast::select::PagedSelect,
    renderer::{Render, Renderer},
};

impl Render for PagedSelect {
    fn render(&self, r: &mut Renderer) {
        r.sql.push_str("select * from ");
        r.sql.push_str(&self.table);
        r.sql.push_str(" order by ");
        r.sql.push_str(&r.dialect.quote_identifier(&self.order_by));
        r.sql.push(' ');
        r.sql
            .push_str(&r.dialect.pagination_clause(self.offset, self.limit));
    }
}

#[cfg(test)]
mod tests {
    use crate::query::{
        ast::select::PagedSelect,
        dialect::{MsSql, Postgres},
        renderer::{Render, Renderer},
    };

    #[test]
    fn test_render_paged_select_mssql() {
        let ast = PagedSelect::new("Users", "Id", 200, 100);
        let mut renderer = Renderer::new(&MsSql);
        ast.render(&mut renderer);
        let (sql, _) = renderer.finish();

        assert_eq!(
            sql,
            "select * from Users order by [Id] offset 200 rows fetch next 100 rows only"
        );
    }

    #[test]
    fn test_render_paged_select_postgres() {
        let ast = PagedSelect::new("public.users", "Id", 0, 50);
        let mut renderer = Renderer::new(&Postgres);
        ast.render(&mut renderer);
        let (sql, _) = renderer.finish();

        assert_eq!(
            sql,
            r#"select * from public.users order by "Id" offset 0 limit 50"#
        );
    }
}
