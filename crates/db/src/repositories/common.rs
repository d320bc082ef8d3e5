//! Helpers shared by the repositories.

use chrono::NaiveDate;
use comptoir_shared::types::{PageRequest, PageResponse};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, FromQueryResult, PaginatorTrait,
    QueryFilter, QuerySelect, Select, SqlErr,
};

/// Returns true if the error is a unique-constraint violation.
#[must_use]
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Returns true if the error is a foreign-key violation.
#[must_use]
pub fn is_foreign_key_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::ForeignKeyConstraintViolation(_)))
}

/// Formats a document reference: `PO-20261018-0007`.
#[must_use]
pub fn format_reference(prefix: &str, date: NaiveDate, sequence: u64) -> String {
    format!("{prefix}-{}-{sequence:04}", date.format("%Y%m%d"))
}

/// Next reference for the day, counting existing references with the same
/// stem. Concurrent callers can collide; the unique index turns that into a
/// conflict.
pub async fn next_reference<E, C>(
    conn: &C,
    column: E::Column,
    prefix: &str,
    date: NaiveDate,
) -> Result<String, DbErr>
where
    E: EntityTrait,
    E::Model: FromQueryResult + Send + Sync,
    C: ConnectionTrait,
{
    let stem = format!("{prefix}-{}-", date.format("%Y%m%d"));
    let existing = E::find()
        .filter(column.starts_with(&stem))
        .count(conn)
        .await?;
    Ok(format_reference(prefix, date, existing + 1))
}

/// Runs a counted, offset-paginated query.
pub async fn fetch_page<E, C>(
    conn: &C,
    query: Select<E>,
    page: &PageRequest,
) -> Result<PageResponse<E::Model>, DbErr>
where
    E: EntityTrait,
    E::Model: FromQueryResult + Send + Sync,
    C: ConnectionTrait,
{
    let total = query.clone().count(conn).await?;
    let data = query
        .offset(page.offset())
        .limit(page.limit())
        .all(conn)
        .await?;
    Ok(PageResponse::new(data, page, total))
}

#[cfg(test)]
#[path = "common_tests.rs"]
mod tests;
