//! SQLite storage implementation.
//!
//! A file-based storage backend using SQLite. Good for:
//! - Local development
//! - Single-server deployments
//! - Testing with persistent data

use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;

use crate::error::{ExtractorError, Result};
use crate::stores::eviction::EvictionPolicy;
use crate::traits::store::{DownloadStore, DownloadTextStore, ExtractorCache};
use crate::types::{
    download::{Download, Story},
    extraction::{DownloadText, ExtractionResult},
};

fn storage_err(e: sqlx::Error) -> ExtractorError {
    ExtractorError::Storage(e.to_string().into())
}

/// SQLite-based extractor store.
pub struct SqliteStore {
    pool: SqlitePool,
    policy: EvictionPolicy,
}

impl SqliteStore {
    /// Create a new SQLite store with the given connection URL.
    ///
    /// # Example URLs
    /// - `sqlite::memory:` - In-memory database (ephemeral)
    /// - `sqlite://./extractor.db` - File-based database
    /// - `sqlite://./test.db?mode=rwc` - Create if not exists
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .map_err(storage_err)?;

        Self::from_pool(pool, EvictionPolicy::default()).await
    }

    /// Create an in-memory SQLite store (for testing).
    ///
    /// Every connection to `:memory:` is its own database, so the pool
    /// is capped at a single connection.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(storage_err)?;

        Self::from_pool(pool, EvictionPolicy::default()).await
    }

    /// Create a store from an existing pool and run migrations.
    pub async fn from_pool(pool: SqlitePool, policy: EvictionPolicy) -> Result<Self> {
        let store = Self { pool, policy };
        store.run_migrations().await?;
        Ok(store)
    }

    /// Replace the eviction policy.
    pub fn with_policy(mut self, policy: EvictionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Run database migrations.
    async fn run_migrations(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS cached_extractor_results (
                cached_extractor_results_id INTEGER PRIMARY KEY AUTOINCREMENT,
                downloads_id INTEGER NOT NULL,
                extracted_html TEXT NOT NULL,
                extracted_text TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_cached_extractor_results_downloads_id
                ON cached_extractor_results(downloads_id);
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS stories (
                stories_id INTEGER PRIMARY KEY,
                url TEXT NOT NULL,
                title TEXT NOT NULL,
                publish_date TEXT
            );

            CREATE TABLE IF NOT EXISTS downloads (
                downloads_id INTEGER PRIMARY KEY,
                stories_id INTEGER NOT NULL,
                url TEXT NOT NULL,
                type TEXT NOT NULL DEFAULT 'content',
                extracted INTEGER NOT NULL DEFAULT 0
            );

            CREATE INDEX IF NOT EXISTS idx_downloads_stories_id ON downloads(stories_id);
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS download_texts (
                download_texts_id INTEGER PRIMARY KEY AUTOINCREMENT,
                downloads_id INTEGER NOT NULL UNIQUE,
                download_text TEXT NOT NULL,
                download_text_length INTEGER NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Insert or replace a story.
    pub async fn insert_story(&self, story: &Story) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO stories (stories_id, url, title, publish_date)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(stories_id) DO UPDATE SET
                url = excluded.url,
                title = excluded.title,
                publish_date = excluded.publish_date
            "#,
        )
        .bind(story.stories_id)
        .bind(&story.url)
        .bind(&story.title)
        .bind(story.publish_date.map(|d| d.to_rfc3339()))
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(())
    }

    /// Insert or replace a download.
    pub async fn insert_download(&self, download: &Download) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO downloads (downloads_id, stories_id, url, type, extracted)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(downloads_id) DO UPDATE SET
                stories_id = excluded.stories_id,
                url = excluded.url,
                type = excluded.type,
                extracted = excluded.extracted
            "#,
        )
        .bind(download.downloads_id)
        .bind(download.stories_id)
        .bind(&download.url)
        .bind(download.kind.as_str())
        .bind(download.extracted)
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(())
    }
}

// Row types for sqlx queries
#[derive(Debug, FromRow)]
struct CacheRow {
    extracted_html: String,
    extracted_text: String,
}

#[derive(Debug, FromRow)]
struct DownloadRow {
    downloads_id: i64,
    stories_id: i64,
    url: String,
    #[sqlx(rename = "type")]
    kind: String,
    extracted: bool,
}

impl DownloadRow {
    fn into_download(self) -> Result<Download> {
        Ok(Download {
            downloads_id: self.downloads_id,
            stories_id: self.stories_id,
            url: self.url,
            kind: self.kind.parse()?,
            extracted: self.extracted,
        })
    }
}

#[derive(Debug, FromRow)]
struct StoryRow {
    stories_id: i64,
    url: String,
    title: String,
    publish_date: Option<String>,
}

impl StoryRow {
    fn into_story(self) -> Result<Story> {
        let publish_date = self
            .publish_date
            .map(|d| {
                chrono::DateTime::parse_from_rfc3339(&d)
                    .map(|d| d.with_timezone(&chrono::Utc))
                    .map_err(|e| ExtractorError::Storage(format!("Invalid date: {}", e).into()))
            })
            .transpose()?;

        Ok(Story {
            stories_id: self.stories_id,
            url: self.url,
            title: self.title,
            publish_date,
        })
    }
}

#[derive(Debug, FromRow)]
struct DownloadTextRow {
    download_texts_id: i64,
    downloads_id: i64,
    download_text: String,
    download_text_length: i64,
}

impl From<DownloadTextRow> for DownloadText {
    fn from(row: DownloadTextRow) -> Self {
        Self {
            download_texts_id: row.download_texts_id,
            downloads_id: row.downloads_id,
            download_text: row.download_text,
            download_text_length: row.download_text_length as usize,
        }
    }
}

#[async_trait]
impl ExtractorCache for SqliteStore {
    async fn get_cached(&self, downloads_id: i64) -> Result<Option<ExtractionResult>> {
        let row = sqlx::query_as::<_, CacheRow>(
            r#"
            SELECT extracted_html, extracted_text
            FROM cached_extractor_results
            WHERE downloads_id = ?
            ORDER BY cached_extractor_results_id DESC
            LIMIT 1
            "#,
        )
        .bind(downloads_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(row.map(|r| ExtractionResult {
            extracted_html: r.extracted_html,
            extracted_text: r.extracted_text,
        }))
    }

    async fn insert_cached(&self, downloads_id: i64, result: &ExtractionResult) -> Result<i64> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO cached_extractor_results (downloads_id, extracted_html, extracted_text)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(downloads_id)
        .bind(&result.extracted_html)
        .bind(&result.extracted_text)
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(inserted.last_insert_rowid())
    }

    async fn trim_cache(&self, keep: usize) -> Result<usize> {
        // SQLite needs a LIMIT before OFFSET; -1 means unbounded.
        let deleted = sqlx::query(
            r#"
            DELETE FROM cached_extractor_results
            WHERE cached_extractor_results_id IN (
                SELECT cached_extractor_results_id
                FROM cached_extractor_results
                ORDER BY cached_extractor_results_id DESC
                LIMIT -1 OFFSET ?
            )
            "#,
        )
        .bind(keep as i64)
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(deleted.rows_affected() as usize)
    }

    async fn cache_len(&self) -> Result<usize> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM cached_extractor_results")
            .fetch_one(&self.pool)
            .await
            .map_err(storage_err)?;

        Ok(count.0 as usize)
    }

    fn eviction_policy(&self) -> &EvictionPolicy {
        &self.policy
    }
}

#[async_trait]
impl DownloadTextStore for SqliteStore {
    async fn get_download_text(&self, downloads_id: i64) -> Result<Option<DownloadText>> {
        let row = sqlx::query_as::<_, DownloadTextRow>(
            "SELECT download_texts_id, downloads_id, download_text, download_text_length FROM download_texts WHERE downloads_id = ?",
        )
        .bind(downloads_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(row.map(DownloadText::from))
    }

    async fn create_download_text(
        &self,
        download: &Download,
        result: &ExtractionResult,
    ) -> Result<DownloadText> {
        let persist_err = |e: sqlx::Error| ExtractorError::Persist(e.to_string().into());
        let length = result.extracted_text.chars().count() as i64;

        let mut tx = self.pool.begin().await.map_err(persist_err)?;

        let row = sqlx::query_as::<_, DownloadTextRow>(
            r#"
            INSERT INTO download_texts (downloads_id, download_text, download_text_length)
            VALUES (?, ?, ?)
            ON CONFLICT(downloads_id) DO UPDATE SET
                download_text = excluded.download_text,
                download_text_length = excluded.download_text_length
            RETURNING download_texts_id, downloads_id, download_text, download_text_length
            "#,
        )
        .bind(download.downloads_id)
        .bind(&result.extracted_text)
        .bind(length)
        .fetch_one(&mut *tx)
        .await
        .map_err(persist_err)?;

        sqlx::query("UPDATE downloads SET extracted = 1 WHERE downloads_id = ?")
            .bind(download.downloads_id)
            .execute(&mut *tx)
            .await
            .map_err(persist_err)?;

        tx.commit().await.map_err(persist_err)?;

        Ok(row.into())
    }
}

#[async_trait]
impl DownloadStore for SqliteStore {
    async fn get_download(&self, downloads_id: i64) -> Result<Option<Download>> {
        let row = sqlx::query_as::<_, DownloadRow>(
            "SELECT downloads_id, stories_id, url, type, extracted FROM downloads WHERE downloads_id = ?",
        )
        .bind(downloads_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_err)?;

        row.map(DownloadRow::into_download).transpose()
    }

    async fn unextracted_content_downloads(&self, stories_id: i64) -> Result<Vec<Download>> {
        let rows = sqlx::query_as::<_, DownloadRow>(
            r#"
            SELECT downloads_id, stories_id, url, type, extracted
            FROM downloads
            WHERE stories_id = ?
              AND extracted = 0
              AND type = 'content'
            ORDER BY downloads_id
            "#,
        )
        .bind(stories_id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;

        rows.into_iter().map(DownloadRow::into_download).collect()
    }

    async fn get_story(&self, stories_id: i64) -> Result<Option<Story>> {
        let row = sqlx::query_as::<_, StoryRow>(
            "SELECT stories_id, url, title, publish_date FROM stories WHERE stories_id = ?",
        )
        .bind(stories_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_err)?;

        row.map(StoryRow::into_story).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_store() -> SqliteStore {
        SqliteStore::in_memory().await.unwrap()
    }

    fn result(tag: &str) -> ExtractionResult {
        ExtractionResult::new(format!("<p>{}</p>", tag), tag)
    }

    #[tokio::test]
    async fn test_newest_cache_row_wins() {
        let store = test_store().await;
        assert!(store.get(1).await.unwrap().is_none());

        store.put(1, &result("old")).await.unwrap();
        store.put(1, &result("new")).await.unwrap();

        assert_eq!(store.cache_len().await.unwrap(), 2);
        assert_eq!(store.get(1).await.unwrap(), Some(result("new")));
    }

    #[tokio::test]
    async fn test_forced_eviction_bounds_rows_to_max_plus_one() {
        let store = test_store().await.with_policy(EvictionPolicy::always(5));
        for id in 0..40 {
            store.put(id, &result("x")).await.unwrap();
        }

        assert!(store.cache_len().await.unwrap() <= 6);
        assert!(store.get(39).await.unwrap().is_some());
        assert!(store.get(0).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_trim_deletes_oldest_rows() {
        let store = test_store().await.with_policy(EvictionPolicy::never(3));
        for id in 0..10 {
            store.put(id, &result("x")).await.unwrap();
        }
        assert_eq!(store.cache_len().await.unwrap(), 10);

        assert_eq!(store.trim_cache(3).await.unwrap(), 7);
        assert!(store.get(6).await.unwrap().is_none());
        assert!(store.get(7).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_download_text_marks_extracted() {
        let store = test_store().await;
        let download = Download::new(11, 3, "https://example.com/a");
        store.insert_story(&Story::new(3, "https://example.com/a", "A")).await.unwrap();
        store.insert_download(&download).await.unwrap();

        assert_eq!(store.unextracted_content_downloads(3).await.unwrap().len(), 1);

        let text = store
            .create_download_text(&download, &result("hello"))
            .await
            .unwrap();
        assert_eq!(text.download_text, "hello");
        assert_eq!(text.download_text_length, 5);

        assert!(store.unextracted_content_downloads(3).await.unwrap().is_empty());
        assert_eq!(store.get_download_text(11).await.unwrap(), Some(text));
        assert_eq!(store.get_story(3).await.unwrap().unwrap().title, "A");
    }
}
