use async_trait::async_trait;
use chrono::Utc;
use helpdesk_types::ConversationRecord;
use sqlx::Row;

use super::{format_datetime, parse_datetime, SqliteDatabase};
use crate::error::Result;
use crate::traits::ConversationLog;

pub struct SqliteConversationLog {
    db: SqliteDatabase,
}

impl SqliteConversationLog {
    pub fn new(db: SqliteDatabase) -> Self {
        Self { db }
    }
}

fn record_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<ConversationRecord> {
    let timestamp: String = row.try_get("timestamp")?;
    Ok(ConversationRecord {
        id: row.try_get("id")?,
        user_query: row.try_get("user_query")?,
        bot_response: row.try_get("bot_response")?,
        timestamp: parse_datetime(&timestamp)?,
    })
}

#[async_trait]
impl ConversationLog for SqliteConversationLog {
    async fn append(&self, user_query: &str, bot_response: &str) -> Result<ConversationRecord> {
        let timestamp = Utc::now();

        let result = sqlx::query(
            "INSERT INTO conversations (user_query, bot_response, timestamp) VALUES (?, ?, ?)",
        )
        .bind(user_query)
        .bind(bot_response)
        .bind(format_datetime(&timestamp))
        .execute(self.db.pool())
        .await?;

        Ok(ConversationRecord {
            id: result.last_insert_rowid(),
            user_query: user_query.to_string(),
            bot_response: bot_response.to_string(),
            timestamp,
        })
    }

    async fn recent(&self, limit: usize) -> Result<Vec<ConversationRecord>> {
        let rows = sqlx::query(
            "SELECT id, user_query, bot_response, timestamp FROM conversations ORDER BY id DESC LIMIT ?",
        )
        .bind(limit as i64)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(record_from_row).collect()
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM conversations WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn clear(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM conversations")
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_recent_is_newest_first() {
        let log = SqliteConversationLog::new(SqliteDatabase::in_memory().await.unwrap());

        let first = log.append("q1", "a1").await.unwrap();
        let second = log.append("q2", "a2").await.unwrap();
        assert!(second.id > first.id);

        let recent = log.recent(10).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].user_query, "q2");
        assert_eq!(recent[1].bot_response, "a1");
    }

    #[tokio::test]
    async fn test_delete_and_clear() {
        let log = SqliteConversationLog::new(SqliteDatabase::in_memory().await.unwrap());

        let record = log.append("q", "a").await.unwrap();
        log.append("q", "b").await.unwrap();

        assert!(log.delete(record.id).await.unwrap());
        assert!(!log.delete(record.id).await.unwrap());
        assert_eq!(log.clear().await.unwrap(), 1);
        assert!(log.recent(5).await.unwrap().is_empty());
    }
}
