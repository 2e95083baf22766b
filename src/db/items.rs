use crate::db::models::{Item, ItemDraft};
use crate::db::sqlite::SqlitePool;
use crate::error::CatalogError;

const SELECT_ITEMS: &str =
    "SELECT id, title, category, quantity, details, price, image FROM items";

/// Catalog rows. Every write commits on its own; there is no batching across requests.
#[derive(Clone)]
pub struct ItemStore {
    pool: SqlitePool,
}

impl ItemStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> Result<Vec<Item>, CatalogError> {
        let items = sqlx::query_as::<_, Item>(&format!("{SELECT_ITEMS} ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    /// Items whose category contains `term` as a literal substring.
    ///
    /// `LIKE` keeps SQLite's ASCII case-insensitivity; `%`, `_` and `\` in `term` match themselves.
    pub async fn search_by_category(&self, term: &str) -> Result<Vec<Item>, CatalogError> {
        let pattern = format!("%{}%", escape_like(term));
        let items = sqlx::query_as::<_, Item>(&format!(
            r"{SELECT_ITEMS} WHERE category LIKE ? ESCAPE '\' ORDER BY id"
        ))
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    pub async fn get(&self, id: i64) -> Result<Item, CatalogError> {
        sqlx::query_as::<_, Item>(&format!("{SELECT_ITEMS} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(CatalogError::NotFound)
    }

    /// Insert a new row. Returns the row id.
    pub async fn insert(
        &self,
        draft: &ItemDraft,
        image: Option<&[u8]>,
    ) -> Result<i64, CatalogError> {
        let result = sqlx::query(
            r#"
            INSERT INTO items (title, category, quantity, details, price, image)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&draft.title)
        .bind(&draft.category)
        .bind(draft.quantity)
        .bind(&draft.details)
        .bind(draft.price)
        .bind(image)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    /// Overwrite every field of `id`. `image: None` keeps the stored bytes.
    pub async fn update(
        &self,
        id: i64,
        draft: &ItemDraft,
        image: Option<&[u8]>,
    ) -> Result<(), CatalogError> {
        let result = sqlx::query(
            r#"UPDATE items SET
                title = ?,
                category = ?,
                quantity = ?,
                details = ?,
                price = ?,
                image = COALESCE(?, image)
              WHERE id = ?"#,
        )
        .bind(&draft.title)
        .bind(&draft.category)
        .bind(draft.quantity)
        .bind(&draft.details)
        .bind(draft.price)
        .bind(image)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::NotFound);
        }
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> Result<(), CatalogError> {
        let result = sqlx::query("DELETE FROM items WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::NotFound);
        }
        Ok(())
    }

    pub async fn count(&self) -> Result<i64, CatalogError> {
        let rec: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM items")
            .fetch_one(&self.pool)
            .await?;
        Ok(rec.0)
    }
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::test_support::temp_pool;

    fn draft(title: &str, category: &str) -> ItemDraft {
        ItemDraft {
            title: title.to_string(),
            category: category.to_string(),
            quantity: 3,
            details: None,
            price: 9.5,
        }
    }

    #[tokio::test]
    async fn insert_then_get_returns_every_field() {
        let (_dir, pool) = temp_pool().await;
        let store = ItemStore::new(pool);

        let mut d = draft("Hammer", "Tools");
        d.details = Some("claw".to_string());
        let id = store.insert(&d, Some(b"\x89PNG")).await.unwrap();

        let item = store.get(id).await.unwrap();
        assert_eq!(item.title, "Hammer");
        assert_eq!(item.category, "Tools");
        assert_eq!(item.quantity, 3);
        assert_eq!(item.details.as_deref(), Some("claw"));
        assert_eq!(item.price, 9.5);
        assert_eq!(item.image.as_deref(), Some(&b"\x89PNG"[..]));
    }

    #[tokio::test]
    async fn category_search_is_a_literal_substring_match() {
        let (_dir, pool) = temp_pool().await;
        let store = ItemStore::new(pool);
        for (title, category) in [
            ("Hammer", "Hand Tools"),
            ("Drill", "Power Tools"),
            ("Apple", "Produce"),
            ("Coupon", "100% off"),
        ] {
            store.insert(&draft(title, category), None).await.unwrap();
        }

        let tools = store.search_by_category("Tools").await.unwrap();
        let titles: Vec<_> = tools.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, ["Hammer", "Drill"]);

        let pct = store.search_by_category("0%").await.unwrap();
        assert_eq!(pct.len(), 1);
        assert_eq!(pct[0].title, "Coupon");

        let lower = store.search_by_category("tools").await.unwrap();
        assert_eq!(lower.len(), 2);
        let upper = store.search_by_category("HAND").await.unwrap();
        assert_eq!(upper.len(), 1);
        assert_eq!(upper[0].title, "Hammer");

        assert!(store.search_by_category("_").await.unwrap().is_empty());
        assert_eq!(store.list_all().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn update_without_image_keeps_stored_bytes() {
        let (_dir, pool) = temp_pool().await;
        let store = ItemStore::new(pool);
        let id = store
            .insert(&draft("Hammer", "Tools"), Some(b"old"))
            .await
            .unwrap();

        let mut d = draft("Mallet", "Tools");
        d.quantity = -2;
        store.update(id, &d, None).await.unwrap();
        let item = store.get(id).await.unwrap();
        assert_eq!(item.title, "Mallet");
        assert_eq!(item.quantity, -2);
        assert_eq!(item.image.as_deref(), Some(&b"old"[..]));

        store.update(id, &d, Some(b"new")).await.unwrap();
        let item = store.get(id).await.unwrap();
        assert_eq!(item.image.as_deref(), Some(&b"new"[..]));
    }

    #[tokio::test]
    async fn missing_rows_report_not_found() {
        let (_dir, pool) = temp_pool().await;
        let store = ItemStore::new(pool);
        store.insert(&draft("Hammer", "Tools"), None).await.unwrap();

        assert!(matches!(store.get(42).await, Err(CatalogError::NotFound)));
        assert!(matches!(
            store.update(42, &draft("x", "y"), None).await,
            Err(CatalogError::NotFound)
        ));
        assert!(matches!(store.delete(42).await, Err(CatalogError::NotFound)));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(escape_like(r"50%_a\b"), r"50\%\_a\\b");
    }
}
