use crate::error::ProjectError;
use crate::model::{ProjectListQuery, ProjectRow};
use folio_database::{Database, Total};
use folio_kernel::pagination::{PageRequest, Sort};

const SELECT_PROJECT: &str = "SELECT * OMIT id FROM project";
const FEATURED_LIMIT: u32 = 6;

/// Parsed list filters, ready to bind.
#[derive(Debug, Default)]
pub(crate) struct ProjectFilter {
    pub status: Option<String>,
    pub featured: Option<bool>,
    pub tags: Vec<String>,
    pub search: Option<String>,
}

impl ProjectFilter {
    pub(crate) fn from_query(query: &ProjectListQuery) -> Self {
        Self {
            status: query.status.map(|status| status.to_string()),
            featured: query.featured,
            tags: query
                .tags
                .as_deref()
                .map(|tags| tags.split(',').map(str::trim).filter(|t| !t.is_empty()).map(str::to_owned).collect())
                .unwrap_or_default(),
            search: query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_lowercase),
        }
    }

    fn condition(&self) -> String {
        let mut parts = Vec::new();
        if self.status.is_some() {
            parts.push("status = $status");
        }
        if self.featured.is_some() {
            parts.push("featured = $featured");
        }
        if !self.tags.is_empty() {
            parts.push("tags CONTAINSANY $tags");
        }
        if self.search.is_some() {
            parts.push(
                "(string::contains(string::lowercase(title), $search) \
                 OR string::contains(string::lowercase(description), $search))",
            );
        }
        if parts.is_empty() { String::new() } else { format!("WHERE {}", parts.join(" AND ")) }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ProjectRepository {
    db: Database,
}

impl ProjectRepository {
    pub(crate) const fn new(db: Database) -> Self {
        Self { db }
    }

    pub(crate) async fn list(
        &self,
        filter: ProjectFilter,
        sort: Sort,
        page: PageRequest,
    ) -> Result<(Vec<ProjectRow>, u64), ProjectError> {
        let condition = filter.condition();
        let mut response = self
            .db
            .query(format!("SELECT count() AS total FROM project {condition} GROUP ALL"))
            .query(format!(
                "{SELECT_PROJECT} {condition} ORDER BY {} LIMIT $limit START $start",
                sort.clause()
            ))
            .bind(("status", filter.status))
            .bind(("featured", filter.featured))
            .bind(("tags", filter.tags))
            .bind(("search", filter.search))
            .bind(("limit", i64::from(page.limit)))
            .bind(("start", i64::try_from(page.offset()).unwrap_or(i64::MAX)))
            .await?;

        let total = Total::of(response.take::<Option<Total>>(0)?);
        let rows = response.take::<Vec<ProjectRow>>(1)?;
        Ok((rows, total))
    }

    /// Active featured projects by `position`, newest first within a position.
    pub(crate) async fn featured(&self) -> Result<Vec<ProjectRow>, ProjectError> {
        let rows = self
            .db
            .query(format!(
                "{SELECT_PROJECT} WHERE featured = true AND status = 'active' \
                 ORDER BY position ASC, created_at DESC LIMIT {FEATURED_LIMIT}"
            ))
            .await?
            .take::<Vec<ProjectRow>>(0)?;
        Ok(rows)
    }

    pub(crate) async fn find(&self, uid: &str) -> Result<Option<ProjectRow>, ProjectError> {
        let mut rows = self
            .db
            .query(format!("{SELECT_PROJECT} WHERE uid = $uid LIMIT 1"))
            .bind(("uid", uid.to_owned()))
            .await?
            .take::<Vec<ProjectRow>>(0)?;
        Ok(rows.pop())
    }

    /// Adds one to a counter (`views` or `likes`) and returns the updated project.
    pub(crate) async fn bump(&self, uid: &str, counter: Counter) -> Result<Option<ProjectRow>, ProjectError> {
        let mut rows = self
            .db
            .query(format!("UPDATE project SET {0} += 1 WHERE uid = $uid RETURN NONE", counter.field()))
            .query(format!("{SELECT_PROJECT} WHERE uid = $uid LIMIT 1"))
            .bind(("uid", uid.to_owned()))
            .await?
            .take::<Vec<ProjectRow>>(1)?;
        Ok(rows.pop())
    }

    pub(crate) async fn create(&self, row: ProjectRow) -> Result<(), ProjectError> {
        self.db
            .query("CREATE project CONTENT $row RETURN NONE")
            .bind(("row", row))
            .await?
            .check()
            .map_err(surrealdb::Error::from)?;
        Ok(())
    }

    pub(crate) async fn replace(&self, row: ProjectRow) -> Result<(), ProjectError> {
        self.db
            .query("UPDATE project CONTENT $row WHERE uid = $row.uid RETURN NONE")
            .bind(("row", row))
            .await?
            .check()
            .map_err(surrealdb::Error::from)?;
        Ok(())
    }

    pub(crate) async fn delete(&self, uid: &str) -> Result<(), ProjectError> {
        self.db
            .query("DELETE project WHERE uid = $uid RETURN NONE")
            .bind(("uid", uid.to_owned()))
            .await?
            .check()
            .map_err(surrealdb::Error::from)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Counter {
    Views,
    Likes,
}

impl Counter {
    const fn field(self) -> &'static str {
        match self {
            Self::Views => "views",
            Self::Likes => "likes",
        }
    }
}
