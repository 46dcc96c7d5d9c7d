use std::sync::Arc;

use helpdesk_persist::{
    ChatStore, ConversationLog, FeedbackLog, JsonChatStore, JsonFeedbackLog, PersistClient, PersistClientBuilder,
};
use helpdesk_types::{FeedbackRecord, MessageRole, Rating};

#[tokio::test]
async fn test_chat_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chats_data.json");

    let chat_id = {
        let store = JsonChatStore::open(&path).await.unwrap();
        let chat = store.create_chat().await.unwrap();
        store.append_turn(&chat.id, "How do I reset?", "Hold the button.").await.unwrap();
        store.set_title_if_placeholder(&chat.id, "Device reset").await.unwrap();
        chat.id
    };

    let reopened = JsonChatStore::open(&path).await.unwrap();
    let chat = reopened.get_chat(&chat_id).await.unwrap().unwrap();

    assert_eq!(chat.title, "Device reset");
    assert_eq!(chat.messages.len(), 2);
    assert_eq!(chat.messages[0].role, MessageRole::User);
    assert_eq!(chat.messages[1].content, "Hold the button.");
}

#[tokio::test]
async fn test_corrupt_chat_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chats_data.json");
    std::fs::write(&path, "{not json").unwrap();

    assert!(JsonChatStore::open(&path).await.is_err());
}

#[tokio::test]
async fn test_concurrent_turns_are_all_kept() {
    let store = Arc::new(JsonChatStore::in_memory());
    let chat = store.create_chat().await.unwrap();

    let mut handles = Vec::new();
    for i in 0..20 {
        let store = store.clone();
        let id = chat.id.clone();
        handles.push(tokio::spawn(async move {
            store.append_turn(&id, &format!("q{i}"), &format!("a{i}")).await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let chat = store.get_chat(&chat.id).await.unwrap().unwrap();
    assert_eq!(chat.messages.len(), 40);
    for pair in chat.messages.chunks(2) {
        assert_eq!(pair[0].role, MessageRole::User);
        assert_eq!(pair[1].role, MessageRole::Assistant);
        assert_eq!(pair[0].content[1..], pair[1].content[1..]);
    }
}

#[tokio::test]
async fn test_list_chats_newest_first() {
    let store = JsonChatStore::in_memory();
    let first = store.create_chat().await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = store.create_chat().await.unwrap();

    let listed = store.list_chats().await.unwrap();
    assert_eq!(listed[0].id, second.id);
    assert_eq!(listed[1].id, first.id);
}

#[tokio::test]
async fn test_feedback_log_appends_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("feedback_log.json");

    let log = JsonFeedbackLog::open(&path).await.unwrap();
    log.append(FeedbackRecord::new(Rating::Like, "great", "q", "r")).await.unwrap();
    log.append(FeedbackRecord::new(Rating::Dislike, "bad", "q", "r")).await.unwrap();

    let reopened = JsonFeedbackLog::open(&path).await.unwrap();
    let all = reopened.all().await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[1].rating, Rating::Dislike);
}

#[tokio::test]
async fn test_delete_cascade_removes_attachments() {
    let client = PersistClient::in_memory().await.unwrap();
    let chat = client.chats().create_chat().await.unwrap();

    let attachment = client
        .attachments()
        .store_upload(&chat.id, Some("notes.txt"), None, b"router model X".to_vec())
        .await
        .unwrap();
    assert_eq!(attachment.mime, "text/plain");
    assert_eq!(attachment.extracted_text, "router model X");
    assert!(client.attachments().open(&attachment.id).await.unwrap().is_some());

    assert!(client.delete_chat_cascade(&chat.id).await.unwrap());

    assert!(client.chats().get_chat(&chat.id).await.unwrap().is_none());
    assert!(client.attachments().open(&attachment.id).await.unwrap().is_none());
    assert!(client
        .attachments()
        .find_by_chat(&chat.id, None, 10)
        .await
        .unwrap()
        .is_empty());
    assert!(!client.delete_chat_cascade(&chat.id).await.unwrap());
}

#[tokio::test]
async fn test_builder_with_files() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("history.db");

    let client = PersistClientBuilder::new()
        .chats_file(dir.path().join("chats.json"))
        .feedback_file(dir.path().join("feedback.json"))
        .database_url(format!("sqlite://{}", db_path.display()))
        .blob_dir(dir.path().join("blobs"))
        .build()
        .await
        .unwrap();

    let record = client.conversations().append("q", "a").await.unwrap();
    assert_eq!(record.id, 1);

    let chat = client.chats().create_chat().await.unwrap();
    let stored = client
        .attachments()
        .store_upload(&chat.id, None, Some("application/pdf"), vec![1, 2, 3])
        .await
        .unwrap();
    assert_eq!(stored.filename, "upload.bin");
    assert_eq!(stored.extracted_text, "");

    let blob = client.attachments().open(&stored.id).await.unwrap().unwrap();
    assert_eq!(blob.content_type, "application/pdf");
    assert_eq!(blob.bytes, vec![1, 2, 3]);
}
