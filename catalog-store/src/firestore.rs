//! Firestore document store over the REST API (v1)
//!
//! Documents travel as Firestore `Document` resources whose `fields` carry typed
//! values (`stringValue`, `doubleValue`, ...). This module converts between
//! those and plain JSON so the rest of the crate only sees `serde_json::Value`.

use crate::document_store::DocumentStore;
use crate::error::{StoreError, StoreResult};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Number, Value};

const FIRESTORE_HOST: &str = "https://firestore.googleapis.com/v1";

/// Documents requested per list page
const PAGE_SIZE: u32 = 300;

/// Configuration for the Firestore backend
#[derive(Debug, Clone)]
pub struct FirestoreConfig {
    pub project_id: String,
    pub api_key: String,
    /// Firebase ID token of the signed-in user
    pub id_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<FirestoreDocument>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FirestoreDocument {
    #[serde(default)]
    fields: Map<String, Value>,
}

/// Firestore-backed document store
pub struct FirestoreDocumentStore {
    config: FirestoreConfig,
    client: reqwest::Client,
}

impl FirestoreDocumentStore {
    pub fn new(config: FirestoreConfig) -> StoreResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .connect_timeout(std::time::Duration::from_secs(10))
            .user_agent("Marketplace/0.1.0")
            .build()
            .map_err(|e| StoreError::Document(format!("Client build failed: {}", e)))?;
        Ok(Self { config, client })
    }

    /// URL of a document or collection path, each segment percent-encoded
    fn url(&self, path: &str) -> StoreResult<reqwest::Url> {
        let base = format!(
            "{}/projects/{}/databases/(default)/documents",
            FIRESTORE_HOST, self.config.project_id
        );
        let mut url = reqwest::Url::parse(&base)
            .map_err(|e| StoreError::Document(format!("Invalid Firestore URL: {}", e)))?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| StoreError::Document("Firestore URL cannot be a base".to_string()))?;
            segments.extend(path.split('/').filter(|s| !s.is_empty()));
        }
        url.query_pairs_mut().append_pair("key", &self.config.api_key);
        Ok(url)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.id_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn check(response: reqwest::Response, path: &str) -> StoreResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        match status.as_u16() {
            401 | 403 => Err(StoreError::Unauthorized(format!("{}: {}", path, body))),
            404 => Err(StoreError::NotFound(path.to_string())),
            _ => Err(StoreError::Document(format!(
                "{} returned status {}: {}",
                path, status, body
            ))),
        }
    }
}

#[async_trait]
impl DocumentStore for FirestoreDocumentStore {
    async fn get_all(&self, collection: &str) -> StoreResult<Vec<Value>> {
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = self.url(collection)?;
            url.query_pairs_mut()
                .append_pair("pageSize", &PAGE_SIZE.to_string());
            if let Some(token) = &page_token {
                url.query_pairs_mut().append_pair("pageToken", token);
            }

            let response = self
                .authorize(self.client.get(url))
                .send()
                .await
                .map_err(|e| StoreError::Document(format!("Request failed: {}", e)))?;

            let page = match Self::check(response, collection).await {
                Ok(response) => response
                    .json::<ListDocumentsResponse>()
                    .await
                    .map_err(|e| StoreError::Document(format!("Failed to parse response: {}", e)))?,
                // A collection without documents does not exist in Firestore
                Err(StoreError::NotFound(_)) => break,
                Err(e) => return Err(e),
            };

            documents.extend(page.documents.iter().map(|doc| decode_fields(&doc.fields)));
            log::debug!("Fetched {} documents from {}", documents.len(), collection);

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(documents)
    }

    async fn set(&self, path: &str, document: &Value) -> StoreResult<()> {
        let fields = match document {
            Value::Object(map) => encode_fields(map),
            _ => {
                return Err(StoreError::Document(format!(
                    "Document at {} must be a JSON object",
                    path
                )))
            }
        };

        let response = self
            .authorize(self.client.patch(self.url(path)?))
            .json(&serde_json::json!({ "fields": fields }))
            .send()
            .await
            .map_err(|e| StoreError::Document(format!("Request failed: {}", e)))?;
        Self::check(response, path).await?;

        log::debug!("Wrote document {}", path);
        Ok(())
    }

    async fn delete(&self, path: &str) -> StoreResult<()> {
        let response = self
            .authorize(self.client.delete(self.url(path)?))
            .send()
            .await
            .map_err(|e| StoreError::Document(format!("Request failed: {}", e)))?;

        match Self::check(response, path).await {
            Ok(_) | Err(StoreError::NotFound(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }
}

/// Encodes a JSON object as Firestore `fields`
pub fn encode_fields(map: &Map<String, Value>) -> Map<String, Value> {
    map.iter()
        .map(|(key, value)| (key.clone(), encode_value(value)))
        .collect()
}

/// Encodes one JSON value as a typed Firestore value
pub fn encode_value(value: &Value) -> Value {
    let mut typed = Map::new();
    match value {
        Value::Null => {
            typed.insert("nullValue".to_string(), Value::Null);
        }
        Value::Bool(b) => {
            typed.insert("booleanValue".to_string(), Value::Bool(*b));
        }
        Value::Number(n) => match n.as_i64() {
            // Firestore transports 64-bit integers as strings
            Some(i) => {
                typed.insert("integerValue".to_string(), Value::String(i.to_string()));
            }
            None => {
                typed.insert("doubleValue".to_string(), Value::Number(n.clone()));
            }
        },
        Value::String(s) => {
            typed.insert("stringValue".to_string(), Value::String(s.clone()));
        }
        Value::Array(items) => {
            let values: Vec<Value> = items.iter().map(encode_value).collect();
            typed.insert(
                "arrayValue".to_string(),
                serde_json::json!({ "values": values }),
            );
        }
        Value::Object(map) => {
            typed.insert(
                "mapValue".to_string(),
                serde_json::json!({ "fields": encode_fields(map) }),
            );
        }
    }
    Value::Object(typed)
}

/// Decodes Firestore `fields` into a plain JSON object
pub fn decode_fields(fields: &Map<String, Value>) -> Value {
    Value::Object(
        fields
            .iter()
            .map(|(key, value)| (key.clone(), decode_value(value)))
            .collect(),
    )
}

/// Decodes one typed Firestore value; unknown types become `null`
pub fn decode_value(value: &Value) -> Value {
    let Some((kind, inner)) = value.as_object().and_then(|map| map.iter().next()) else {
        return Value::Null;
    };

    match kind.as_str() {
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => inner.clone(),
        "booleanValue" => inner.clone(),
        "doubleValue" => match inner {
            Value::Number(_) => inner.clone(),
            // NaN and infinities arrive as strings
            Value::String(s) => s
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            _ => Value::Null,
        },
        "integerValue" => match inner {
            Value::String(s) => s
                .parse::<i64>()
                .map(|i| Value::Number(i.into()))
                .unwrap_or(Value::Null),
            Value::Number(_) => inner.clone(),
            _ => Value::Null,
        },
        "arrayValue" => Value::Array(
            inner
                .get("values")
                .and_then(Value::as_array)
                .map(|values| values.iter().map(decode_value).collect())
                .unwrap_or_default(),
        ),
        "mapValue" => inner
            .get("fields")
            .and_then(Value::as_object)
            .map(decode_fields)
            .unwrap_or_else(|| Value::Object(Map::new())),
        _ => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProjectRecord;
    use serde_json::json;

    #[test]
    fn test_encode_record_fields() {
        let doc = json!({
            "projectId": "p1",
            "price": 100.0,
            "count": 3,
            "tags": ["a"],
            "owner": {"id": "u1"},
        });
        let fields = encode_fields(doc.as_object().unwrap());

        assert_eq!(fields["projectId"], json!({"stringValue": "p1"}));
        assert_eq!(fields["price"], json!({"doubleValue": 100.0}));
        assert_eq!(fields["count"], json!({"integerValue": "3"}));
        assert_eq!(
            fields["tags"],
            json!({"arrayValue": {"values": [{"stringValue": "a"}]}})
        );
        assert_eq!(
            fields["owner"],
            json!({"mapValue": {"fields": {"id": {"stringValue": "u1"}}}})
        );
    }

    #[test]
    fn test_decode_into_record() {
        let fields = json!({
            "projectId": {"stringValue": "p1"},
            "title": {"stringValue": "Chatbot"},
            "category": {"stringValue": "AI"},
            "price": {"integerValue": "25"},
            "description": {"stringValue": "Answers questions"},
            "userId": {"stringValue": "u1"},
            "displayName": {"stringValue": "Ada"},
        });
        let value = decode_fields(fields.as_object().unwrap());
        let record: ProjectRecord = serde_json::from_value(value).unwrap();

        assert_eq!(record.project_id, "p1");
        assert_eq!(record.price, 25.0);
        assert_eq!(record.owner_display_name, "Ada");
    }

    #[test]
    fn test_decode_unknown_type_is_null() {
        assert_eq!(decode_value(&json!({"geoPointValue": {}})), Value::Null);
        assert_eq!(decode_value(&json!("bare")), Value::Null);
    }

    #[test]
    fn test_url_encodes_segments() {
        let store = FirestoreDocumentStore::new(FirestoreConfig {
            project_id: "market".to_string(),
            api_key: "k".to_string(),
            id_token: None,
        })
        .unwrap();
        let url = store.url("Web Development/p1").unwrap();
        assert_eq!(
            url.as_str(),
            "https://firestore.googleapis.com/v1/projects/market/databases/(default)/documents/Web%20Development/p1?key=k"
        );
    }
}
