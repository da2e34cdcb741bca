//! SQL for list endpoints.
//!
//! Column names always come from a static [`ListSchema`](gourze_core::ListSchema)
//! whitelist; every user-supplied value goes through `push_bind`.

use gourze_core::{FieldFilter, FilterOp, FilterValues, ListQuery};
use sqlx::{Postgres, QueryBuilder};

/// `SELECT COUNT(*) FROM <table> WHERE ...` over the query's filters.
pub fn count(table: &str, query: &ListQuery) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT COUNT(*) FROM {table}"));
    push_filters(&mut qb, &query.filters);
    qb
}

/// `<select> WHERE ... ORDER BY ... LIMIT ... OFFSET ...` for one page.
///
/// `select` is a complete `SELECT ... FROM <table>` prefix without a WHERE.
pub fn page(select: &str, query: &ListQuery) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(select.to_string());
    push_filters(&mut qb, &query.filters);

    let pagination = &query.pagination;
    qb.push(format_args!(
        " ORDER BY {} {}",
        pagination.sort_column,
        pagination.sort_order.as_sql()
    ));
    qb.push(" LIMIT ");
    qb.push_bind(pagination.limit());
    qb.push(" OFFSET ");
    qb.push_bind(pagination.offset());
    qb
}

/// Appends ` WHERE a AND b ...`. Filters with no values add nothing.
pub fn push_filters(qb: &mut QueryBuilder<'static, Postgres>, filters: &[FieldFilter]) {
    let mut first = true;

    for filter in filters.iter().filter(|f| !f.values.is_empty()) {
        qb.push(if first { " WHERE " } else { " AND " });
        first = false;
        push_predicate(qb, filter);
    }
}

fn push_predicate(qb: &mut QueryBuilder<'static, Postgres>, filter: &FieldFilter) {
    let column = filter.column;

    match filter.op {
        FilterOp::In => {
            qb.push(format_args!("{column} = ANY("));
            push_array(qb, &filter.values);
            qb.push(")");
        }
        FilterOp::NotIn => {
            qb.push(format_args!("{column} <> ALL("));
            push_array(qb, &filter.values);
            qb.push(")");
        }
        FilterOp::Contains | FilterOp::StartsWith | FilterOp::EndsWith => {
            // Only text fields accept the LIKE operators.
            let FilterValues::Text(values) = &filter.values else {
                return;
            };
            let pattern = values
                .first()
                .and_then(|v| filter.op.like_pattern(v))
                .unwrap_or_default();
            qb.push(format_args!("{column} LIKE "));
            qb.push_bind(pattern);
        }
        op => {
            qb.push(format_args!("{column} {} ", comparison(op)));
            push_scalar(qb, &filter.values);
        }
    }
}

fn comparison(op: FilterOp) -> &'static str {
    match op {
        FilterOp::NotEquals => "<>",
        FilterOp::GreaterThan => ">",
        FilterOp::LessThan => "<",
        FilterOp::GreaterThanOrEqual => ">=",
        FilterOp::LessThanOrEqual => "<=",
        _ => "=",
    }
}

fn push_scalar(qb: &mut QueryBuilder<'static, Postgres>, values: &FilterValues) {
    match values {
        FilterValues::Text(v) => qb.push_bind(v.first().cloned().unwrap_or_default()),
        FilterValues::Integer(v) => qb.push_bind(v.first().copied().unwrap_or_default()),
        FilterValues::Float(v) => qb.push_bind(v.first().copied().unwrap_or_default()),
        FilterValues::Timestamp(v) => qb.push_bind(v.first().copied().unwrap_or_default()),
    };
}

fn push_array(qb: &mut QueryBuilder<'static, Postgres>, values: &FilterValues) {
    match values {
        FilterValues::Text(v) => qb.push_bind(v.clone()),
        FilterValues::Integer(v) => qb.push_bind(v.clone()),
        FilterValues::Float(v) => qb.push_bind(v.clone()),
        FilterValues::Timestamp(v) => qb.push_bind(v.clone()),
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use gourze_core::{FieldKind, FilterField, ListSchema, SortField};

    const USERS: ListSchema = ListSchema {
        filters: &[
            FilterField::new("username", "username", FieldKind::Text),
            FilterField::new("id", "id", FieldKind::Integer),
            FilterField::new("createdAt", "created_at", FieldKind::Timestamp),
        ],
        sortable: &[
            SortField::new("id", "id"),
            SortField::new("createdAt", "created_at"),
        ],
    };

    fn parse(pairs: &[(&str, &str)]) -> ListQuery {
        let pairs: Vec<(String, String)> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ListQuery::parse(&pairs, &USERS).unwrap()
    }

    #[test]
    fn test_no_filters_has_no_where() {
        let query = parse(&[]);
        assert_eq!(count("users", &query).sql(), "SELECT COUNT(*) FROM users");
    }

    #[test]
    fn test_contains_uses_like() {
        let query = parse(&[("username.op", "contains"), ("username.val", "doe")]);

        let qb = count("users", &query);
        assert_eq!(qb.sql(), "SELECT COUNT(*) FROM users WHERE username LIKE $1");
    }

    #[test]
    fn test_in_uses_any() {
        let query = parse(&[("id.op", "in"), ("id.val", "1"), ("id.val", "2")]);

        let qb = count("users", &query);
        assert_eq!(qb.sql(), "SELECT COUNT(*) FROM users WHERE id = ANY($1)");
    }

    #[test]
    fn test_not_in_uses_all() {
        let query = parse(&[("id.op", "not_in"), ("id.val", "3")]);

        let qb = count("users", &query);
        assert_eq!(qb.sql(), "SELECT COUNT(*) FROM users WHERE id <> ALL($1)");
    }

    #[test]
    fn test_filters_join_with_and() {
        let query = parse(&[
            ("username.op", "starts_with"),
            ("username.val", "jo"),
            ("id.op", "greater_than_or_equal"),
            ("id.val", "10"),
            ("createdAt.op", "less_than"),
            ("createdAt.val", "2024-01-01"),
        ]);

        let qb = count("users", &query);
        assert_eq!(
            qb.sql(),
            "SELECT COUNT(*) FROM users WHERE username LIKE $1 AND id >= $2 AND created_at < $3"
        );
    }

    #[test]
    fn test_default_operator_is_equals() {
        let query = parse(&[("id.val", "5")]);

        let qb = count("users", &query);
        assert_eq!(qb.sql(), "SELECT COUNT(*) FROM users WHERE id = $1");
    }

    #[test]
    fn test_page_orders_and_limits() {
        let query = parse(&[
            ("username.op", "not_equals"),
            ("username.val", "root"),
            ("sortBy", "createdAt"),
            ("sortOrder", "desc"),
            ("page", "2"),
            ("take", "5"),
        ]);

        let qb = page("SELECT id, username FROM users", &query);
        assert_eq!(
            qb.sql(),
            "SELECT id, username FROM users WHERE username <> $1 ORDER BY created_at DESC LIMIT $2 OFFSET $3"
        );
        assert_eq!(query.pagination.offset(), 5);
    }

    #[test]
    fn test_scoping_filter_is_appended() {
        let mut query = parse(&[("id.op", "greater_than"), ("id.val", "1")]);
        query.push_filter(FieldFilter::new(
            "user_id",
            FilterOp::Equals,
            FilterValues::Integer(vec![9]),
        ));

        let qb = count("orders", &query);
        assert_eq!(
            qb.sql(),
            "SELECT COUNT(*) FROM orders WHERE id > $1 AND user_id = $2"
        );
    }

    #[test]
    fn test_empty_values_are_skipped() {
        let mut query = ListQuery::default();
        query.push_filter(FieldFilter::new(
            "id",
            FilterOp::In,
            FilterValues::Integer(vec![]),
        ));

        assert_eq!(count("users", &query).sql(), "SELECT COUNT(*) FROM users");
    }
}
