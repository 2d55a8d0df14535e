use crate::error::LeadError;
use crate::model::LeadRow;
use folio_database::{Database, Total};
use folio_kernel::pagination::PageRequest;

const SELECT_LEAD: &str = "SELECT * OMIT id FROM lead";

#[derive(Debug, Clone)]
pub(crate) struct LeadRepository {
    db: Database,
}

impl LeadRepository {
    pub(crate) const fn new(db: Database) -> Self {
        Self { db }
    }

    pub(crate) async fn create(&self, row: LeadRow) -> Result<(), LeadError> {
        self.db
            .query("CREATE lead CONTENT $row RETURN NONE")
            .bind(("row", row))
            .await?
            .check()
            .map_err(surrealdb::Error::from)?;
        Ok(())
    }

    /// Newest first, optionally restricted to one status.
    pub(crate) async fn list(
        &self,
        status: Option<String>,
        page: PageRequest,
    ) -> Result<(Vec<LeadRow>, u64), LeadError> {
        let condition = if status.is_some() { "WHERE status = $status" } else { "" };
        let mut response = self
            .db
            .query(format!("SELECT count() AS total FROM lead {condition} GROUP ALL"))
            .query(format!("{SELECT_LEAD} {condition} ORDER BY created_at DESC LIMIT $limit START $start"))
            .bind(("status", status))
            .bind(("limit", i64::from(page.limit)))
            .bind(("start", i64::try_from(page.offset()).unwrap_or(i64::MAX)))
            .await?;

        let total = Total::of(response.take::<Option<Total>>(0)?);
        let rows = response.take::<Vec<LeadRow>>(1)?;
        Ok((rows, total))
    }

    /// Sets the status and returns the updated lead, `None` when it does not exist.
    pub(crate) async fn set_status(
        &self,
        uid: &str,
        status: String,
        updated_at: String,
    ) -> Result<Option<LeadRow>, LeadError> {
        let mut rows = self
            .db
            .query("UPDATE lead SET status = $status, updated_at = $updated_at WHERE uid = $uid RETURN NONE")
            .query(format!("{SELECT_LEAD} WHERE uid = $uid LIMIT 1"))
            .bind(("uid", uid.to_owned()))
            .bind(("status", status))
            .bind(("updated_at", updated_at))
            .await?
            .take::<Vec<LeadRow>>(1)?;
        Ok(rows.pop())
    }
}
