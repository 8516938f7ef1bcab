//! DynamoDB-backed note store
//!
//! ```text
//! Table: NotesTable (configurable via DYNAMO_TABLE)
//!
//! Primary Key:
//!   - id (String, Partition Key)
//!
//! Attributes:
//!   - title: String
//!   - content: String
//!   - summary: String - derived from content on every write
//!   - created_at: String (RFC3339)
//! ```

use async_trait::async_trait;
use aws_sdk_dynamodb::config::Region;
use aws_sdk_dynamodb::error::{DisplayErrorContext, SdkError};
use aws_sdk_dynamodb::operation::delete_item::DeleteItemError;
use aws_sdk_dynamodb::operation::update_item::UpdateItemError;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use aws_sdk_dynamodb::Client;
use aws_smithy_types::timeout::TimeoutConfig;
use notes_schemas::{Note, NoteId};
use serde_dynamo::aws_sdk_dynamodb_1::{from_item, to_item};
use tracing::{debug, info};

use crate::config::DynamoConfig;
use crate::error::{NotesError, Result};
use crate::store::NoteStore;

/// Partition key attribute
pub const ATTR_ID: &str = "id";
pub const ATTR_TITLE: &str = "title";
pub const ATTR_CONTENT: &str = "content";
pub const ATTR_SUMMARY: &str = "summary";

/// Build a DynamoDB client from the ambient AWS config plus our overrides.
///
/// Called once per process; the client is cheap to clone and safe to share.
pub async fn connect(config: &DynamoConfig) -> Client {
    let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new(config.region.clone()))
        .load()
        .await;

    let mut builder = aws_sdk_dynamodb::config::Builder::from(&sdk_config);

    if let Some(endpoint) = &config.endpoint {
        info!("Using DynamoDB endpoint override: {}", endpoint);
        builder = builder.endpoint_url(endpoint);
    }

    if let Some(timeout) = config.timeout {
        let timeout_config = TimeoutConfig::builder()
            .operation_timeout(timeout)
            .build();
        builder = builder.timeout_config(timeout_config);
    }

    Client::from_conf(builder.build())
}

#[derive(Clone)]
pub struct DynamoStore {
    client: Client,
    table_name: String,
}

impl std::fmt::Debug for DynamoStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamoStore")
            .field("table_name", &self.table_name)
            .finish()
    }
}

impl DynamoStore {
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    fn key(id: &NoteId) -> AttributeValue {
        AttributeValue::S(id.0.clone())
    }

    fn is_update_conditional_check_failed(err: &SdkError<UpdateItemError>) -> bool {
        matches!(
            err.as_service_error(),
            Some(UpdateItemError::ConditionalCheckFailedException(_))
        )
    }

    fn is_delete_conditional_check_failed(err: &SdkError<DeleteItemError>) -> bool {
        matches!(
            err.as_service_error(),
            Some(DeleteItemError::ConditionalCheckFailedException(_))
        )
    }
}

#[async_trait]
impl NoteStore for DynamoStore {
    async fn put(&self, note: &Note) -> Result<()> {
        let item = to_item(note).map_err(|e| NotesError::store("Serialize note", e))?;

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| NotesError::store("DynamoDB PutItem", DisplayErrorContext(e)))?;

        debug!("Put note {} into {}", note.id, self.table_name);
        Ok(())
    }

    async fn scan(&self) -> Result<Vec<Note>> {
        let mut notes = Vec::new();
        let mut last_evaluated_key = None;

        loop {
            let mut request = self.client.scan().table_name(&self.table_name);

            if let Some(key) = last_evaluated_key.take() {
                request = request.set_exclusive_start_key(Some(key));
            }

            let response = request
                .send()
                .await
                .map_err(|e| NotesError::store("DynamoDB Scan", DisplayErrorContext(e)))?;

            let next_key = response.last_evaluated_key().cloned();

            for item in response.items.unwrap_or_default() {
                let note: Note =
                    from_item(item).map_err(|e| NotesError::store("Deserialize note", e))?;
                notes.push(note);
            }

            match next_key {
                Some(key) if !key.is_empty() => {
                    last_evaluated_key = Some(key);
                }
                _ => break,
            }
        }

        debug!("Scanned {} notes from {}", notes.len(), self.table_name);
        Ok(notes)
    }

    async fn get(&self, id: &NoteId) -> Result<Option<Note>> {
        let response = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(ATTR_ID, Self::key(id))
            .send()
            .await
            .map_err(|e| NotesError::store("DynamoDB GetItem", DisplayErrorContext(e)))?;

        match response.item {
            Some(item) => {
                let note: Note =
                    from_item(item).map_err(|e| NotesError::store("Deserialize note", e))?;
                Ok(Some(note))
            }
            None => Ok(None),
        }
    }

    async fn update(
        &self,
        id: &NoteId,
        title: &str,
        content: &str,
        summary: &str,
    ) -> Result<Option<Note>> {
        // "content" and friends collide with DynamoDB reserved words, so every
        // attribute goes through ExpressionAttributeNames
        let result = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .key(ATTR_ID, Self::key(id))
            .update_expression("SET #title = :title, #content = :content, #summary = :summary")
            .condition_expression("attribute_exists(#id)")
            .expression_attribute_names("#id", ATTR_ID)
            .expression_attribute_names("#title", ATTR_TITLE)
            .expression_attribute_names("#content", ATTR_CONTENT)
            .expression_attribute_names("#summary", ATTR_SUMMARY)
            .expression_attribute_values(":title", AttributeValue::S(title.to_string()))
            .expression_attribute_values(":content", AttributeValue::S(content.to_string()))
            .expression_attribute_values(":summary", AttributeValue::S(summary.to_string()))
            .return_values(ReturnValue::AllNew)
            .send()
            .await;

        match result {
            Ok(output) => {
                let attributes = output.attributes.ok_or_else(|| {
                    NotesError::Store("DynamoDB UpdateItem returned no attributes".to_string())
                })?;
                let note: Note =
                    from_item(attributes).map_err(|e| NotesError::store("Deserialize note", e))?;
                Ok(Some(note))
            }
            Err(e) if Self::is_update_conditional_check_failed(&e) => Ok(None),
            Err(e) => Err(NotesError::store(
                "DynamoDB UpdateItem",
                DisplayErrorContext(e),
            )),
        }
    }

    async fn delete(&self, id: &NoteId) -> Result<bool> {
        let result = self
            .client
            .delete_item()
            .table_name(&self.table_name)
            .key(ATTR_ID, Self::key(id))
            .condition_expression("attribute_exists(#id)")
            .expression_attribute_names("#id", ATTR_ID)
            .send()
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(e) if Self::is_delete_conditional_check_failed(&e) => Ok(false),
            Err(e) => Err(NotesError::store(
                "DynamoDB DeleteItem",
                DisplayErrorContext(e),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn sample_note() -> Note {
        Note {
            id: NoteId("note_01J0000000000000000000000".into()),
            title: "A".into(),
            content: "Hello world".into(),
            summary: "Hello world".into(),
            created_at: "2025-11-02T18:00:00+00:00".into(),
        }
    }

    #[test]
    fn test_note_item_layout() {
        let item: HashMap<String, AttributeValue> = to_item(sample_note()).unwrap();

        assert_eq!(
            item.get(ATTR_ID),
            Some(&AttributeValue::S("note_01J0000000000000000000000".into()))
        );
        assert_eq!(item.get(ATTR_TITLE), Some(&AttributeValue::S("A".into())));
        assert_eq!(
            item.get(ATTR_SUMMARY),
            Some(&AttributeValue::S("Hello world".into()))
        );
        assert_eq!(item.len(), 5);
    }

    #[test]
    fn test_note_from_item() {
        let item: HashMap<String, AttributeValue> = to_item(sample_note()).unwrap();
        let note: Note = from_item(item).unwrap();
        assert_eq!(note, sample_note());
    }

    mod against_mocked_client {
        use super::*;
        use aws_sdk_dynamodb::operation::delete_item::DeleteItemOutput;
        use aws_sdk_dynamodb::operation::scan::ScanOutput;
        use aws_sdk_dynamodb::operation::update_item::UpdateItemOutput;
        use aws_sdk_dynamodb::types::error::{
            ConditionalCheckFailedException, ResourceNotFoundException,
        };
        use aws_smithy_mocks::{mock, mock_client, RuleMode};

        fn note_item(id: &str, content: &str) -> HashMap<String, AttributeValue> {
            to_item(Note {
                id: NoteId(id.to_string()),
                title: "t".into(),
                content: content.into(),
                summary: content.into(),
                created_at: "2025-11-02T18:00:00+00:00".into(),
            })
            .unwrap()
        }

        fn conditional_check_failed() -> ConditionalCheckFailedException {
            ConditionalCheckFailedException::builder()
                .message("The conditional request failed")
                .build()
        }

        #[tokio::test]
        async fn test_scan_follows_last_evaluated_key() {
            let first_page = mock!(Client::scan)
                .match_requests(|req| req.exclusive_start_key().is_none())
                .then_output(|| {
                    ScanOutput::builder()
                        .items(note_item("a", "first"))
                        .last_evaluated_key(ATTR_ID, AttributeValue::S("a".into()))
                        .build()
                });
            let second_page = mock!(Client::scan)
                .match_requests(|req| {
                    req.exclusive_start_key()
                        .and_then(|key| key.get(ATTR_ID))
                        == Some(&AttributeValue::S("a".into()))
                })
                .then_output(|| ScanOutput::builder().items(note_item("b", "second")).build());

            let client = mock_client!(aws_sdk_dynamodb, RuleMode::Sequential, [&first_page, &second_page]);
            let store = DynamoStore::new(client, "NotesTable");

            let notes = store.scan().await.unwrap();
            let ids: Vec<&str> = notes.iter().map(|n| n.id.0.as_str()).collect();
            assert_eq!(ids, vec!["a", "b"]);
            assert_eq!(first_page.num_calls(), 1);
            assert_eq!(second_page.num_calls(), 1);
        }

        #[tokio::test]
        async fn test_update_reads_back_new_attributes() {
            let update = mock!(Client::update_item)
                .match_requests(|req| {
                    req.key().and_then(|key| key.get(ATTR_ID))
                        == Some(&AttributeValue::S("a".into()))
                        && req.return_values() == Some(&ReturnValue::AllNew)
                })
                .then_output(|| {
                    UpdateItemOutput::builder()
                        .set_attributes(Some(note_item("a", "Bye")))
                        .build()
                });

            let client = mock_client!(aws_sdk_dynamodb, RuleMode::Sequential, [&update]);
            let store = DynamoStore::new(client, "NotesTable");

            let note = store
                .update(&NoteId("a".into()), "t", "Bye", "Bye")
                .await
                .unwrap()
                .unwrap();
            assert_eq!(note.id.0, "a");
            assert_eq!(note.content, "Bye");
        }

        #[tokio::test]
        async fn test_update_missing_note_is_none() {
            let update = mock!(Client::update_item).then_error(|| {
                UpdateItemError::ConditionalCheckFailedException(conditional_check_failed())
            });

            let client = mock_client!(aws_sdk_dynamodb, RuleMode::Sequential, [&update]);
            let store = DynamoStore::new(client, "NotesTable");

            let updated = store
                .update(&NoteId("missing".into()), "t", "c", "c")
                .await
                .unwrap();
            assert!(updated.is_none());
        }

        #[tokio::test]
        async fn test_delete_reports_presence() {
            let missing = mock!(Client::delete_item).then_error(|| {
                DeleteItemError::ConditionalCheckFailedException(conditional_check_failed())
            });
            let present = mock!(Client::delete_item).then_output(|| DeleteItemOutput::builder().build());

            let client = mock_client!(aws_sdk_dynamodb, RuleMode::Sequential, [&missing, &present]);
            let store = DynamoStore::new(client, "NotesTable");

            assert!(!store.delete(&NoteId("gone".into())).await.unwrap());
            assert!(store.delete(&NoteId("here".into())).await.unwrap());
        }

        #[tokio::test]
        async fn test_other_service_errors_are_store_errors() {
            let update = mock!(Client::update_item).then_error(|| {
                UpdateItemError::ResourceNotFoundException(
                    ResourceNotFoundException::builder()
                        .message("Requested resource not found")
                        .build(),
                )
            });
            let delete = mock!(Client::delete_item).then_error(|| {
                DeleteItemError::ResourceNotFoundException(
                    ResourceNotFoundException::builder()
                        .message("Requested resource not found")
                        .build(),
                )
            });

            let client = mock_client!(aws_sdk_dynamodb, RuleMode::Sequential, [&update, &delete]);
            let store = DynamoStore::new(client, "NotesTable");

            let err = store
                .update(&NoteId("a".into()), "t", "c", "c")
                .await
                .unwrap_err();
            assert!(matches!(&err, NotesError::Store(msg) if msg.contains("UpdateItem")));

            let err = store.delete(&NoteId("a".into())).await.unwrap_err();
            assert!(matches!(&err, NotesError::Store(msg) if msg.contains("DeleteItem")));
        }
    }
}
