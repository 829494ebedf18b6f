//! Goal documents as whole JSON objects.
//!
//! Reads and writes always move the full document. Writes carry no
//! precondition, so two writers racing on one key resolve as last-write-wins.

use aws_sdk_s3::Client;
use aws_smithy_types::byte_stream::ByteStream;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::StorageError;

const JSON: &str = "application/json";

/// Fetch and decode the document at `key`. `None` when no object exists.
pub async fn get_json<T: DeserializeOwned>(
    client: &Client,
    bucket: &str,
    key: &str,
) -> Result<Option<T>, StorageError> {
    let resp = match client.get_object().bucket(bucket).key(key).send().await {
        Ok(resp) => resp,
        Err(e) => {
            let err = e.into_service_error();
            if err.is_no_such_key() {
                debug!(key, "document not stored yet");
                return Ok(None);
            }
            return Err(StorageError::GetObject(err.to_string()));
        }
    };

    let bytes = resp
        .body
        .collect()
        .await
        .map_err(|e| StorageError::GetObject(e.to_string()))?
        .into_bytes();
    Ok(Some(serde_json::from_slice(&bytes)?))
}

/// Replace the object at `key` with `value` encoded as JSON.
pub async fn put_json<T: Serialize>(
    client: &Client,
    bucket: &str,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let body = serde_json::to_vec(value)?;
    let size = body.len();
    client
        .put_object()
        .bucket(bucket)
        .key(key)
        .content_type(JSON)
        .body(ByteStream::from(body))
        .send()
        .await
        .map_err(|e| StorageError::PutObject(e.into_service_error().to_string()))?;
    debug!(key, size, "document written");
    Ok(())
}

/// Every key under `prefix`, across all result pages.
pub async fn list_keys(client: &Client, bucket: &str, prefix: &str) -> Result<Vec<String>, StorageError> {
    let mut pages = client
        .list_objects_v2()
        .bucket(bucket)
        .prefix(prefix)
        .into_paginator()
        .send();

    let mut keys = Vec::new();
    while let Some(page) = pages.next().await {
        let page = page.map_err(|e| StorageError::ListObjects(e.into_service_error().to_string()))?;
        keys.extend(page.contents().iter().filter_map(|obj| obj.key().map(str::to_string)));
    }
    Ok(keys)
}
