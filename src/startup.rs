use anyhow::{Context, Result};
use aws_sdk_dynamodb::{
    Client as DynamoDbClient,
    error::SdkError,
    types::{
        AttributeDefinition, BillingMode, KeySchemaElement, KeyType, ScalarAttributeType,
    },
};

use crate::config::Config;

/// Creates one document table if it doesn't exist.
///
/// Every collection uses `id` as the partition (hash) key and PayPerRequest
/// billing.
async fn create_table_if_not_exists(client: &DynamoDbClient, table_name: &str) -> Result<()> {
    let result = client
        .create_table()
        .table_name(table_name)
        .attribute_definitions(
            AttributeDefinition::builder()
                .attribute_name("id")
                .attribute_type(ScalarAttributeType::S)
                .build()?,
        )
        .key_schema(
            KeySchemaElement::builder()
                .attribute_name("id")
                .key_type(KeyType::Hash)
                .build()?,
        )
        .billing_mode(BillingMode::PayPerRequest)
        .send()
        .await;

    match result {
        Ok(_) => {
            tracing::info!("Startup: Table '{}' created.", table_name);
            Ok(())
        }
        Err(e) => {
            if let SdkError::ServiceError(service_err) = &e {
                if service_err.err().is_resource_in_use_exception() {
                    tracing::info!("Startup: Table '{}' already exists, no action needed.", table_name);
                    return Ok(());
                }
            }
            Err(anyhow::Error::new(e)
                .context(format!("Startup: Failed to create DynamoDB table '{table_name}'")))
        }
    }
}

/// Ensures the meme, upload, and status-check tables exist.
pub async fn init_tables(client: &DynamoDbClient, config: &Config) -> Result<()> {
    tracing::info!("Startup: Initializing document tables...");
    create_table_if_not_exists(client, &config.memes_table())
        .await
        .context("memes table")?;
    create_table_if_not_exists(client, &config.uploads_table())
        .await
        .context("uploads table")?;
    create_table_if_not_exists(client, &config.status_checks_table())
        .await
        .context("status checks table")?;
    tracing::info!("Startup: Document table initialization complete.");
    Ok(())
}
