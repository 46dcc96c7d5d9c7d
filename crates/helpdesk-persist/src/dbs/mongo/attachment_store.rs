use async_trait::async_trait;
use futures::TryStreamExt;
use helpdesk_types::Attachment;
use mongodb::bson::doc;
use mongodb::{Collection, Database};

use super::models::MongoAttachment;
use crate::error::Result;
use crate::traits::AttachmentStore;

#[derive(Clone)]
pub struct MongoAttachmentStore {
    collection: Collection<MongoAttachment>,
}

impl MongoAttachmentStore {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("attachments_meta"),
        }
    }
}

#[async_trait]
impl AttachmentStore for MongoAttachmentStore {
    async fn upsert(&self, attachment: Attachment) -> Result<()> {
        let id = attachment.id.clone();
        self.collection
            .replace_one(doc! { "id": &id }, MongoAttachment::from(attachment))
            .upsert(true)
            .await?;
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Attachment>> {
        let found = self.collection.find_one(doc! { "id": id }).await?;
        Ok(found.map(Attachment::from))
    }

    async fn find_by_chat(
        &self,
        chat_id: &str,
        ids: Option<&[String]>,
        limit: usize,
    ) -> Result<Vec<Attachment>> {
        let mut filter = doc! { "chat_id": chat_id };
        if let Some(ids) = ids {
            filter.insert("id", doc! { "$in": ids.to_vec() });
        }

        let docs: Vec<MongoAttachment> = self
            .collection
            .find(filter)
            .sort(doc! { "created_at": -1 })
            .limit(limit as i64)
            .await?
            .try_collect()
            .await?;

        Ok(docs.into_iter().map(Attachment::from).collect())
    }

    async fn delete_by_chat(&self, chat_id: &str) -> Result<Vec<String>> {
        let docs: Vec<MongoAttachment> = self
            .collection
            .find(doc! { "chat_id": chat_id })
            .await?
            .try_collect()
            .await?;
        let ids: Vec<String> = docs.into_iter().map(|d| d.id).collect();

        self.collection.delete_many(doc! { "chat_id": chat_id }).await?;
        Ok(ids)
    }
}
