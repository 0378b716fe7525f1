//! Defines the AST for an ordered, paginated `SELECT *`.

#[derive(Debug, Clone, PartialEq)]
pub struct PagedSelect {
    pub table: String,
    pub order_by: String,
    pub offset: usize,
    pub limit: usize,
}

impl PagedSelect {
    pub fn new(table: &str, order_by: &str, offset: usize, limit: usize) -> Self {
        PagedSelect {
            table: table.to_string(),
            order_by: order_by.to_string(),
            offset,
            limit,
        }
    }
}
