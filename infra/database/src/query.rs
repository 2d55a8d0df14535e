use surrealdb::types::SurrealValue;

/// Row produced by `SELECT count() AS total FROM ... GROUP ALL`.
///
/// An empty table yields no row at all, so callers take an `Option<Total>`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, SurrealValue)]
pub struct Total {
    pub total: i64,
}

impl Total {
    /// Count of an optional result, zero when the query matched nothing.
    #[must_use]
    pub fn of(row: Option<Self>) -> u64 {
        row.map_or(0, |row| u64::try_from(row.total).unwrap_or_default())
    }
}
