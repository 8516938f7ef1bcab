use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::operation::create_table::CreateTableError;
use aws_sdk_dynamodb::operation::describe_table::DescribeTableError;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, KeySchemaElement, KeyType, ScalarAttributeType, TableStatus,
};
use aws_sdk_dynamodb::Client;
use std::time::Duration;
use tracing::{debug, info};

use crate::dynamo::ATTR_ID;
use crate::error::{NotesError, Result};

const READY_POLL_INTERVAL: Duration = Duration::from_secs(1);
const READY_MAX_ATTEMPTS: u32 = 60;

/// Shape of the notes table. Pure data, no I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDefinition {
    pub table_name: String,
    pub partition_key: String,
    pub partition_key_type: ScalarAttributeType,
    pub billing_mode: BillingMode,
}

pub fn notes_table_definition(table_name: &str) -> TableDefinition {
    TableDefinition {
        table_name: table_name.to_string(),
        partition_key: ATTR_ID.to_string(),
        partition_key_type: ScalarAttributeType::S,
        billing_mode: BillingMode::PayPerRequest,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionOutcome {
    AlreadyExists,
    Created,
}

/// Make sure the notes table exists, creating it when absent.
///
/// Safe to run repeatedly and concurrently: a create that loses a race
/// with another provisioner is treated as "already exists". Either way the
/// function returns only once the table is `ACTIVE`.
pub async fn ensure_table(client: &Client, definition: &TableDefinition) -> Result<ProvisionOutcome> {
    let table_name = &definition.table_name;

    match client.describe_table().table_name(table_name).send().await {
        Ok(_) => {
            info!("Table {} already exists", table_name);
            return Ok(ProvisionOutcome::AlreadyExists);
        }
        Err(e)
            if matches!(
                e.as_service_error(),
                Some(DescribeTableError::ResourceNotFoundException(_))
            ) =>
        {
            debug!("Table {} not found", table_name);
        }
        Err(e) => {
            return Err(NotesError::store(
                "DynamoDB DescribeTable",
                DisplayErrorContext(e),
            ))
        }
    }

    if !create_table(client, definition).await? {
        info!("Table {} was created concurrently, waiting for it", table_name);
        wait_until_active(client, table_name).await?;
        return Ok(ProvisionOutcome::AlreadyExists);
    }

    info!("Creating table {}...", table_name);
    wait_until_active(client, table_name).await?;
    info!("Table {} is ready", table_name);

    Ok(ProvisionOutcome::Created)
}

/// Returns `false` if the table already existed.
async fn create_table(client: &Client, definition: &TableDefinition) -> Result<bool> {
    let key_schema = KeySchemaElement::builder()
        .attribute_name(&definition.partition_key)
        .key_type(KeyType::Hash)
        .build()
        .map_err(|e| NotesError::store("Build key schema", e))?;

    let attribute = AttributeDefinition::builder()
        .attribute_name(&definition.partition_key)
        .attribute_type(definition.partition_key_type.clone())
        .build()
        .map_err(|e| NotesError::store("Build attribute definition", e))?;

    let result = client
        .create_table()
        .table_name(&definition.table_name)
        .key_schema(key_schema)
        .attribute_definitions(attribute)
        .billing_mode(definition.billing_mode.clone())
        .send()
        .await;

    match result {
        Ok(_) => Ok(true),
        Err(e)
            if matches!(
                e.as_service_error(),
                Some(CreateTableError::ResourceInUseException(_))
            ) =>
        {
            Ok(false)
        }
        Err(e) => Err(NotesError::store(
            "DynamoDB CreateTable",
            DisplayErrorContext(e),
        )),
    }
}

async fn wait_until_active(client: &Client, table_name: &str) -> Result<()> {
    for attempt in 1..=READY_MAX_ATTEMPTS {
        let output = client
            .describe_table()
            .table_name(table_name)
            .send()
            .await
            .map_err(|e| NotesError::store("DynamoDB DescribeTable", DisplayErrorContext(e)))?;

        let status = output.table().and_then(|t| t.table_status());
        if matches!(status, Some(TableStatus::Active)) {
            return Ok(());
        }

        debug!(
            "Table {} status {:?} (attempt {}/{})",
            table_name, status, attempt, READY_MAX_ATTEMPTS
        );
        tokio::time::sleep(READY_POLL_INTERVAL).await;
    }

    Err(NotesError::Store(format!(
        "table {} did not become ACTIVE after {} attempts",
        table_name, READY_MAX_ATTEMPTS
    )))
}
