//! Incremental SELECT builder for filtered list queries.

use super::filter::Pagination;
use crate::db::UNICODE_LOWER_FN;
use rusqlite::types::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Eq,
    ContainsIgnoreCase,
}

#[derive(Debug, Clone)]
enum Condition {
    Fixed(&'static str),
    Bound {
        column: &'static str,
        op: Op,
        value: String,
    },
}

/// Final SQL text plus positional parameters for `params_from_iter`.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

/// Collects optional `(column, value)` conditions and emits numbered
/// placeholders (`?1`, `?2`, ...) when built.
#[derive(Debug, Clone)]
pub struct SelectBuilder {
    select: &'static str,
    conditions: Vec<Condition>,
    group_by: Option<&'static str>,
    order_by: Option<&'static str>,
    pagination: Pagination,
}

impl SelectBuilder {
    /// Starts from `SELECT <columns> FROM <table>` without a WHERE clause.
    pub fn new(select: &'static str) -> Self {
        Self {
            select,
            conditions: Vec::new(),
            group_by: None,
            order_by: None,
            pagination: Pagination::default(),
        }
    }

    /// Adds a parameterless predicate that always applies.
    pub fn filter_fixed(mut self, predicate: &'static str) -> Self {
        self.conditions.push(Condition::Fixed(predicate));
        self
    }

    /// Adds `column = ?` when `value` is present and non-empty.
    pub fn filter_eq(self, column: &'static str, value: Option<&str>) -> Self {
        self.push_bound(column, Op::Eq, value)
    }

    /// Adds a case-insensitive substring match when `value` is present and
    /// non-empty. `%`, `_` and `\` in the value match literally.
    ///
    /// Both sides are folded by Unicode lowercasing, so the connection must
    /// come from `db::open_db*`.
    pub fn filter_contains(self, column: &'static str, value: Option<&str>) -> Self {
        self.push_bound(column, Op::ContainsIgnoreCase, value)
    }

    pub fn group_by(mut self, clause: &'static str) -> Self {
        self.group_by = Some(clause);
        self
    }

    pub fn order_by(mut self, clause: &'static str) -> Self {
        self.order_by = Some(clause);
        self
    }

    pub fn paginate(mut self, pagination: Pagination) -> Self {
        self.pagination = pagination;
        self
    }

    pub fn build(self) -> BuiltQuery {
        let mut sql = String::from(self.select);
        let mut params: Vec<Value> = Vec::new();

        for (index, condition) in self.conditions.into_iter().enumerate() {
            sql.push_str(if index == 0 { " WHERE " } else { " AND " });
            match condition {
                Condition::Fixed(predicate) => sql.push_str(predicate),
                Condition::Bound { column, op, value } => {
                    params.push(match op {
                        Op::Eq => Value::Text(value),
                        Op::ContainsIgnoreCase => {
                            Value::Text(format!("%{}%", escape_like(&value.to_lowercase())))
                        }
                    });
                    let slot = params.len();
                    match op {
                        Op::Eq => sql.push_str(&format!("{column} = ?{slot}")),
                        Op::ContainsIgnoreCase => {
                            sql.push_str(&format!(
                                "{UNICODE_LOWER_FN}({column}) LIKE ?{slot} ESCAPE '\\'"
                            ))
                        }
                    }
                }
            }
        }

        if let Some(group_by) = self.group_by {
            sql.push_str(" GROUP BY ");
            sql.push_str(group_by);
        }

        if let Some(order_by) = self.order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(order_by);
        }

        let Pagination { limit, offset } = self.pagination;
        if limit > 0 {
            params.push(Value::Integer(i64::from(limit)));
            sql.push_str(&format!(" LIMIT ?{}", params.len()));
        }
        if offset > 0 {
            if limit == 0 {
                // SQLite only accepts OFFSET after a LIMIT clause.
                sql.push_str(" LIMIT -1");
            }
            params.push(Value::Integer(i64::from(offset)));
            sql.push_str(&format!(" OFFSET ?{}", params.len()));
        }

        BuiltQuery { sql, params }
    }

    fn push_bound(mut self, column: &'static str, op: Op, value: Option<&str>) -> Self {
        if let Some(value) = value.filter(|value| !value.is_empty()) {
            self.conditions.push(Condition::Bound {
                column,
                op,
                value: value.to_string(),
            });
        }
        self
    }
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
