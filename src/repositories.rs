//! DynamoDB-backed implementations of the store traits.
//!
//! Each record is independently keyed by a fresh UUID, so no conditional
//! writes are needed. Listings scan the table (small demo-scale data sets)
//! and order in memory.

use std::collections::HashMap;

use anyhow::Context;
use async_trait::async_trait;
use aws_sdk_dynamodb::{
    Client as DynamoDbClient,
    types::{AttributeValue, ReturnValue},
};
use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use crate::domain::{MemeRepository, StatusRepository, UploadRepository};
use crate::errors::RepoError;
use crate::models::{Meme, StatusCheck, Upload};

/// Scans the whole table, following `LastEvaluatedKey` pagination.
async fn scan_all(
    client: &DynamoDbClient,
    table_name: &str,
) -> Result<Vec<HashMap<String, AttributeValue>>, RepoError> {
    let mut items = Vec::new();
    let mut last_evaluated_key: Option<HashMap<String, AttributeValue>> = None;

    loop {
        let mut request = client.scan().table_name(table_name);
        if let Some(lek) = last_evaluated_key {
            request = request.set_exclusive_start_key(Some(lek));
        }

        let resp = request
            .send()
            .await
            .context(format!("DynamoDB: Failed to scan table '{table_name}'"))
            .map_err(RepoError::BackendError)?;

        if let Some(page) = resp.items {
            items.extend(page);
        }

        last_evaluated_key = resp.last_evaluated_key;
        if last_evaluated_key.is_none() {
            break;
        }
        tracing::debug!(table_name, "DynamoDB scan: continuing with LastEvaluatedKey");
    }

    Ok(items)
}

fn get_s(item: &HashMap<String, AttributeValue>, key: &str) -> Option<String> {
    item.get(key)?.as_s().ok().map(|s| s.to_string())
}

fn get_timestamp(item: &HashMap<String, AttributeValue>, key: &str) -> Option<DateTime<Utc>> {
    let raw = get_s(item, key)?;
    DateTime::parse_from_rfc3339(&raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn get_uuid(item: &HashMap<String, AttributeValue>, key: &str) -> Option<Uuid> {
    get_s(item, key).and_then(|s| Uuid::parse_str(&s).ok())
}

// --- Memes ---

#[derive(Debug, Clone)]
pub struct DynamoMemeRepository {
    client: DynamoDbClient,
    table_name: String,
}

impl DynamoMemeRepository {
    pub fn new(client: DynamoDbClient, table_name: String) -> Self {
        info!(%table_name, "Initializing DynamoMemeRepository");
        Self { client, table_name }
    }
}

fn item_to_meme(item: &HashMap<String, AttributeValue>) -> Option<Meme> {
    Some(Meme {
        id: get_uuid(item, "id")?,
        template_id: get_s(item, "template_id")?,
        url: get_s(item, "url")?,
        page_url: get_s(item, "page_url")?,
        created_at: get_timestamp(item, "created_at")?,
    })
}

#[async_trait]
impl MemeRepository for DynamoMemeRepository {
    async fn save(&self, meme: &Meme) -> Result<(), RepoError> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .item("id", AttributeValue::S(meme.id.to_string()))
            .item("template_id", AttributeValue::S(meme.template_id.clone()))
            .item("url", AttributeValue::S(meme.url.clone()))
            .item("page_url", AttributeValue::S(meme.page_url.clone()))
            .item(
                "created_at",
                AttributeValue::S(meme.created_at.to_rfc3339()),
            )
            .send()
            .await
            .context(format!(
                "DynamoDB (table: {}): Failed to put meme (id: {})",
                self.table_name, meme.id
            ))
            .map_err(RepoError::BackendError)?;
        Ok(())
    }

    async fn list(&self, limit: usize) -> Result<Vec<Meme>, RepoError> {
        let items = scan_all(&self.client, &self.table_name).await?;

        let mut memes = Vec::with_capacity(items.len());
        for item in &items {
            match item_to_meme(item) {
                Some(meme) => memes.push(meme),
                None => {
                    let item_id = item.get("id").and_then(|v| v.as_s().ok());
                    tracing::error!(item.id = ?item_id, table_name = %self.table_name, "DynamoDB: Failed to parse item into Meme");
                    return Err(RepoError::DataCorruption(format!(
                        "DynamoDB: Failed to parse item {:?} during scan of table '{}'",
                        item_id, self.table_name
                    )));
                }
            }
        }

        memes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        memes.truncate(limit);
        Ok(memes)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, RepoError> {
        // ALL_OLD distinguishes "removed a row" from "nothing was there".
        let resp = self
            .client
            .delete_item()
            .table_name(&self.table_name)
            .key("id", AttributeValue::S(id.to_string()))
            .return_values(ReturnValue::AllOld)
            .send()
            .await
            .context(format!(
                "DynamoDB (table: {}): Failed to delete meme (id: {id})",
                self.table_name
            ))
            .map_err(RepoError::BackendError)?;

        Ok(resp.attributes.is_some())
    }
}

// --- Uploads ---

#[derive(Debug, Clone)]
pub struct DynamoUploadRepository {
    client: DynamoDbClient,
    table_name: String,
}

impl DynamoUploadRepository {
    pub fn new(client: DynamoDbClient, table_name: String) -> Self {
        info!(%table_name, "Initializing DynamoUploadRepository");
        Self { client, table_name }
    }
}

fn item_to_upload(item: &HashMap<String, AttributeValue>) -> Option<Upload> {
    Some(Upload {
        id: get_uuid(item, "id")?,
        filename: get_s(item, "filename")?,
        content_type: get_s(item, "content_type")?,
        data_url: get_s(item, "data_url")?,
        uploaded_at: get_timestamp(item, "uploaded_at")?,
    })
}

#[async_trait]
impl UploadRepository for DynamoUploadRepository {
    async fn save(&self, upload: &Upload) -> Result<(), RepoError> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .item("id", AttributeValue::S(upload.id.to_string()))
            .item("filename", AttributeValue::S(upload.filename.clone()))
            .item(
                "content_type",
                AttributeValue::S(upload.content_type.clone()),
            )
            .item("data_url", AttributeValue::S(upload.data_url.clone()))
            .item(
                "uploaded_at",
                AttributeValue::S(upload.uploaded_at.to_rfc3339()),
            )
            .send()
            .await
            .context(format!(
                "DynamoDB (table: {}): Failed to put upload (id: {})",
                self.table_name, upload.id
            ))
            .map_err(RepoError::BackendError)?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Upload>, RepoError> {
        let items = scan_all(&self.client, &self.table_name).await?;

        let mut uploads = Vec::with_capacity(items.len());
        for item in &items {
            match item_to_upload(item) {
                Some(upload) => uploads.push(upload),
                None => {
                    let item_id = item.get("id").and_then(|v| v.as_s().ok());
                    tracing::error!(item.id = ?item_id, table_name = %self.table_name, "DynamoDB: Failed to parse item into Upload");
                    return Err(RepoError::DataCorruption(format!(
                        "DynamoDB: Failed to parse item {:?} during scan of table '{}'",
                        item_id, self.table_name
                    )));
                }
            }
        }

        uploads.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        Ok(uploads)
    }
}

// --- Status checks ---

#[derive(Debug, Clone)]
pub struct DynamoStatusRepository {
    client: DynamoDbClient,
    table_name: String,
}

impl DynamoStatusRepository {
    pub fn new(client: DynamoDbClient, table_name: String) -> Self {
        info!(%table_name, "Initializing DynamoStatusRepository");
        Self { client, table_name }
    }
}

fn item_to_status_check(item: &HashMap<String, AttributeValue>) -> Option<StatusCheck> {
    Some(StatusCheck {
        id: get_uuid(item, "id")?,
        client_name: get_s(item, "client_name")?,
        timestamp: get_timestamp(item, "timestamp")?,
    })
}

#[async_trait]
impl StatusRepository for DynamoStatusRepository {
    async fn save(&self, check: &StatusCheck) -> Result<(), RepoError> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .item("id", AttributeValue::S(check.id.to_string()))
            .item("client_name", AttributeValue::S(check.client_name.clone()))
            .item(
                "timestamp",
                AttributeValue::S(check.timestamp.to_rfc3339()),
            )
            .send()
            .await
            .context(format!(
                "DynamoDB (table: {}): Failed to put status check (id: {})",
                self.table_name, check.id
            ))
            .map_err(RepoError::BackendError)?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<StatusCheck>, RepoError> {
        let items = scan_all(&self.client, &self.table_name).await?;
        // Parse failures are skipped rather than fatal: a liveness artifact is
        // not worth failing a health probe over.
        let checks = items.iter().filter_map(item_to_status_check).collect();
        Ok(checks)
    }
}
