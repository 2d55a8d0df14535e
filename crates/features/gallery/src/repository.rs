use crate::error::GalleryError;
use crate::model::{ImageListQuery, ImageRow, split_tags};
use folio_database::{Database, Total};
use folio_kernel::pagination::{PageRequest, Sort};

const SELECT_IMAGE: &str = "SELECT * OMIT id FROM image";

#[derive(Debug, Default)]
pub(crate) struct ImageFilter {
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub is_public: Option<bool>,
}

impl ImageFilter {
    pub(crate) fn from_query(query: &ImageListQuery) -> Self {
        Self {
            category: query.category.map(|category| category.to_string()),
            tags: query.tags.as_deref().map(|tags| split_tags(tags.split(','))).unwrap_or_default(),
            is_public: query.is_public,
        }
    }

    fn condition(&self) -> String {
        let mut parts = Vec::new();
        if self.category.is_some() {
            parts.push("category = $category");
        }
        if !self.tags.is_empty() {
            parts.push("tags CONTAINSANY $tags");
        }
        if self.is_public.is_some() {
            parts.push("is_public = $is_public");
        }
        if parts.is_empty() { String::new() } else { format!("WHERE {}", parts.join(" AND ")) }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ImageRepository {
    db: Database,
}

impl ImageRepository {
    pub(crate) const fn new(db: Database) -> Self {
        Self { db }
    }

    pub(crate) async fn list(
        &self,
        filter: ImageFilter,
        sort: Sort,
        page: PageRequest,
    ) -> Result<(Vec<ImageRow>, u64), GalleryError> {
        let condition = filter.condition();
        let mut response = self
            .db
            .query(format!("SELECT count() AS total FROM image {condition} GROUP ALL"))
            .query(format!("{SELECT_IMAGE} {condition} ORDER BY {} LIMIT $limit START $start", sort.clause()))
            .bind(("category", filter.category))
            .bind(("tags", filter.tags))
            .bind(("is_public", filter.is_public))
            .bind(("limit", i64::from(page.limit)))
            .bind(("start", i64::try_from(page.offset()).unwrap_or(i64::MAX)))
            .await?;

        let total = Total::of(response.take::<Option<Total>>(0)?);
        let rows = response.take::<Vec<ImageRow>>(1)?;
        Ok((rows, total))
    }

    /// Public images of one category, newest first.
    pub(crate) async fn public_in_category(&self, category: String, limit: u32) -> Result<Vec<ImageRow>, GalleryError> {
        let rows = self
            .db
            .query(format!(
                "{SELECT_IMAGE} WHERE category = $category AND is_public = true ORDER BY created_at DESC LIMIT $limit"
            ))
            .bind(("category", category))
            .bind(("limit", i64::from(limit)))
            .await?
            .take::<Vec<ImageRow>>(0)?;
        Ok(rows)
    }

    pub(crate) async fn find(&self, uid: &str) -> Result<Option<ImageRow>, GalleryError> {
        let mut rows = self
            .db
            .query(format!("{SELECT_IMAGE} WHERE uid = $uid LIMIT 1"))
            .bind(("uid", uid.to_owned()))
            .await?
            .take::<Vec<ImageRow>>(0)?;
        Ok(rows.pop())
    }

    /// Increments the view counter and returns the updated image.
    pub(crate) async fn viewed(&self, uid: &str) -> Result<Option<ImageRow>, GalleryError> {
        let mut rows = self
            .db
            .query("UPDATE image SET views += 1 WHERE uid = $uid RETURN NONE")
            .query(format!("{SELECT_IMAGE} WHERE uid = $uid LIMIT 1"))
            .bind(("uid", uid.to_owned()))
            .await?
            .take::<Vec<ImageRow>>(1)?;
        Ok(rows.pop())
    }

    pub(crate) async fn create(&self, row: ImageRow) -> Result<(), GalleryError> {
        self.db
            .query("CREATE image CONTENT $row RETURN NONE")
            .bind(("row", row))
            .await?
            .check()
            .map_err(surrealdb::Error::from)?;
        Ok(())
    }

    pub(crate) async fn replace(&self, row: ImageRow) -> Result<(), GalleryError> {
        self.db
            .query("UPDATE image CONTENT $row WHERE uid = $row.uid RETURN NONE")
            .bind(("row", row))
            .await?
            .check()
            .map_err(surrealdb::Error::from)?;
        Ok(())
    }

    pub(crate) async fn delete(&self, uid: &str) -> Result<(), GalleryError> {
        self.db
            .query("DELETE image WHERE uid = $uid RETURN NONE")
            .bind(("uid", uid.to_owned()))
            .await?
            .check()
            .map_err(surrealdb::Error::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_domain::models::ImageCategory;

    #[test]
    fn test_condition_only_mentions_supplied_filters() {
        assert_eq!(ImageFilter::default().condition(), "");

        let filter = ImageFilter::from_query(&ImageListQuery {
            category: Some(ImageCategory::Hero),
            is_public: Some(false),
            ..ImageListQuery::default()
        });
        assert_eq!(filter.category.as_deref(), Some("hero"));
        assert_eq!(filter.condition(), "WHERE category = $category AND is_public = $is_public");
    }
}
