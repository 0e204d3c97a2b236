//! Firestore REST calls.
//!
//! Documents live under
//! `projects/{project}/databases/(default)/documents/{collection}`.
//! Queries go through `:runQuery` with a structured query; writes are
//! plain document create/patch/delete.

use anyhow::{Context, Result, bail};
use serde_json::{Value, json};

use daydesk_core::store::{Document, QueryFilter};

use crate::config::FirebaseConfig;
use crate::convert::{from_firestore_fields, to_firestore_fields};

const FIRESTORE_BASE: &str = "https://firestore.googleapis.com/v1";

fn documents_base(config: &FirebaseConfig) -> String {
    format!(
        "{FIRESTORE_BASE}/projects/{}/databases/(default)/documents",
        config.project_id
    )
}

/// Pull the provider-assigned id out of a full document resource name.
fn id_from_name(name: &str) -> String {
    name.rsplit('/').next().unwrap_or(name).to_string()
}

async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let message = response
        .json::<Value>()
        .await
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| status.to_string());
    bail!("Firestore request failed: {message}");
}

/// Run an equality-filter-plus-order-by query against a collection.
pub async fn query(
    config: &FirebaseConfig,
    id_token: &str,
    collection: &str,
    filter: &QueryFilter,
) -> Result<Vec<Document>> {
    let body = json!({
        "structuredQuery": {
            "from": [{ "collectionId": collection }],
            "where": {
                "fieldFilter": {
                    "field": { "fieldPath": "userId" },
                    "op": "EQUAL",
                    "value": { "stringValue": filter.user_id },
                }
            },
            "orderBy": [{
                "field": { "fieldPath": filter.order_by },
                "direction": if filter.descending { "DESCENDING" } else { "ASCENDING" },
            }],
        }
    });

    let response = reqwest::Client::new()
        .post(format!("{}:runQuery", documents_base(config)))
        .bearer_auth(id_token)
        .json(&body)
        .send()
        .await
        .context("Failed to reach Firestore")?;
    let response = check_response(response).await?;

    // runQuery streams one result object per matched document; entries
    // without a `document` key are progress markers.
    let results: Vec<Value> = response.json().await.context("Invalid query response")?;

    let documents = results
        .iter()
        .filter_map(|entry| entry.get("document"))
        .filter_map(|doc| {
            let name = doc.get("name")?.as_str()?;
            let fields = doc.get("fields").cloned().unwrap_or(json!({}));
            Some(Document {
                id: id_from_name(name),
                fields: from_firestore_fields(&fields),
            })
        })
        .collect();

    Ok(documents)
}

/// Create a document; Firestore assigns the id.
pub async fn add(
    config: &FirebaseConfig,
    id_token: &str,
    collection: &str,
    fields: &Value,
) -> Result<String> {
    let body = json!({ "fields": to_firestore_fields(fields)? });

    let response = reqwest::Client::new()
        .post(format!("{}/{collection}", documents_base(config)))
        .bearer_auth(id_token)
        .json(&body)
        .send()
        .await
        .context("Failed to reach Firestore")?;
    let response = check_response(response).await?;

    let created: Value = response.json().await.context("Invalid create response")?;
    let name = created
        .get("name")
        .and_then(|n| n.as_str())
        .context("Create response has no document name")?;

    Ok(id_from_name(name))
}

/// Patch only the supplied fields of a document.
pub async fn update(
    config: &FirebaseConfig,
    id_token: &str,
    collection: &str,
    document_id: &str,
    fields: &Value,
) -> Result<()> {
    // The update mask restricts the write to the supplied fields;
    // without it a patch would clear everything else.
    let mask: Vec<(&str, String)> = fields
        .as_object()
        .map(|obj| {
            obj.keys()
                .map(|k| ("updateMask.fieldPaths", k.clone()))
                .collect()
        })
        .unwrap_or_default();

    let body = json!({ "fields": to_firestore_fields(fields)? });

    let response = reqwest::Client::new()
        .patch(format!(
            "{}/{collection}/{document_id}",
            documents_base(config)
        ))
        .query(&mask)
        .bearer_auth(id_token)
        .json(&body)
        .send()
        .await
        .context("Failed to reach Firestore")?;
    check_response(response).await?;

    Ok(())
}

/// Delete a document.
pub async fn delete(
    config: &FirebaseConfig,
    id_token: &str,
    collection: &str,
    document_id: &str,
) -> Result<()> {
    let response = reqwest::Client::new()
        .delete(format!(
            "{}/{collection}/{document_id}",
            documents_base(config)
        ))
        .bearer_auth(id_token)
        .send()
        .await
        .context("Failed to reach Firestore")?;
    check_response(response).await?;

    Ok(())
}
