use async_trait::async_trait;
use helpdesk_types::Attachment;
use sqlx::Row;

use super::{format_datetime, parse_datetime, SqliteDatabase};
use crate::error::Result;
use crate::traits::AttachmentStore;

pub struct SqliteAttachmentStore {
    db: SqliteDatabase,
}

impl SqliteAttachmentStore {
    pub fn new(db: SqliteDatabase) -> Self {
        Self { db }
    }
}

const COLUMNS: &str = "id, chat_id, filename, mime, size, extracted_text, created_at";

fn attachment_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Attachment> {
    let size: i64 = row.try_get("size")?;
    let created_at: String = row.try_get("created_at")?;

    Ok(Attachment {
        id: row.try_get("id")?,
        chat_id: row.try_get("chat_id")?,
        filename: row.try_get("filename")?,
        mime: row.try_get("mime")?,
        size: size.max(0) as u64,
        extracted_text: row.try_get("extracted_text")?,
        created_at: parse_datetime(&created_at)?,
    })
}

#[async_trait]
impl AttachmentStore for SqliteAttachmentStore {
    async fn upsert(&self, attachment: Attachment) -> Result<()> {
        sqlx::query(
            "INSERT INTO attachments (id, chat_id, filename, mime, size, extracted_text, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                chat_id = excluded.chat_id,
                filename = excluded.filename,
                mime = excluded.mime,
                size = excluded.size,
                extracted_text = excluded.extracted_text,
                created_at = excluded.created_at",
        )
        .bind(&attachment.id)
        .bind(&attachment.chat_id)
        .bind(&attachment.filename)
        .bind(&attachment.mime)
        .bind(attachment.size as i64)
        .bind(&attachment.extracted_text)
        .bind(format_datetime(&attachment.created_at))
        .execute(self.db.pool())
        .await?;

        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Attachment>> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM attachments WHERE id = ?"))
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(attachment_from_row).transpose()
    }

    async fn find_by_chat(
        &self,
        chat_id: &str,
        ids: Option<&[String]>,
        limit: usize,
    ) -> Result<Vec<Attachment>> {
        let mut sql = format!("SELECT {COLUMNS} FROM attachments WHERE chat_id = ?");
        if let Some(ids) = ids {
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            let placeholders = vec!["?"; ids.len()].join(", ");
            sql.push_str(&format!(" AND id IN ({placeholders})"));
        }
        sql.push_str(" ORDER BY created_at DESC LIMIT ?");

        let mut query = sqlx::query(&sql).bind(chat_id);
        for id in ids.unwrap_or_default() {
            query = query.bind(id);
        }
        let rows = query.bind(limit as i64).fetch_all(self.db.pool()).await?;

        rows.iter().map(attachment_from_row).collect()
    }

    async fn delete_by_chat(&self, chat_id: &str) -> Result<Vec<String>> {
        let mut tx = self.db.pool().begin().await?;

        let ids: Vec<String> = sqlx::query_scalar("SELECT id FROM attachments WHERE chat_id = ?")
            .bind(chat_id)
            .fetch_all(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM attachments WHERE chat_id = ?")
            .bind(chat_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn attachment(id: &str, chat_id: &str, age_secs: i64) -> Attachment {
        Attachment {
            id: id.to_string(),
            chat_id: chat_id.to_string(),
            filename: format!("{id}.txt"),
            mime: "text/plain".to_string(),
            size: 3,
            extracted_text: "abc".to_string(),
            created_at: Utc::now() - Duration::seconds(age_secs),
        }
    }

    #[tokio::test]
    async fn test_find_by_chat_filters_and_orders() {
        let store = SqliteAttachmentStore::new(SqliteDatabase::in_memory().await.unwrap());
        store.upsert(attachment("old", "c1", 60)).await.unwrap();
        store.upsert(attachment("new", "c1", 0)).await.unwrap();
        store.upsert(attachment("other", "c2", 0)).await.unwrap();

        let all = store.find_by_chat("c1", None, 10).await.unwrap();
        let ids: Vec<&str> = all.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old"]);

        let only = vec!["old".to_string()];
        let filtered = store.find_by_chat("c1", Some(&only), 10).await.unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "old");

        let limited = store.find_by_chat("c1", None, 1).await.unwrap();
        assert_eq!(limited[0].id, "new");
    }

    #[tokio::test]
    async fn test_delete_by_chat_returns_ids() {
        let store = SqliteAttachmentStore::new(SqliteDatabase::in_memory().await.unwrap());
        store.upsert(attachment("a", "c1", 0)).await.unwrap();
        store.upsert(attachment("b", "c2", 0)).await.unwrap();

        let removed = store.delete_by_chat("c1").await.unwrap();
        assert_eq!(removed, vec!["a".to_string()]);
        assert!(store.get("a").await.unwrap().is_none());
        assert!(store.get("b").await.unwrap().is_some());
    }
}
