//! Table client: configuration bound once, CRUD over any table of a base.
//!
//! # Design
//! `TableClient` holds an immutable `ClientConfig`, the pre-built base path
//! and a `Transport`. Every method takes `&self`, so one client can serve
//! concurrent calls without locking. Each method composes the URL builder
//! with the executor and decodes the payload into the caller's field type.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

use crate::attachment::AttachmentUpload;
use crate::config::ClientConfig;
use crate::error::{ApiError, Payload};
use crate::executor::{self, RequestOptions};
use crate::http::{HttpMethod, Transport};
use crate::pagination;
use crate::transport::UreqTransport;
use crate::types::{DeletedRecord, Fields, ListAllOptions, ListParams, ListResponse, Record};
use crate::url::{build_base_path, build_list_query, build_record_path, build_table_path};

/// Async client for the tables of one base.
#[derive(Debug, Clone)]
pub struct TableClient<T: Transport = UreqTransport> {
    config: ClientConfig,
    base_path: String,
    transport: T,
}

impl TableClient<UreqTransport> {
    /// Build a client using the bundled ureq transport.
    ///
    /// Fails before any network activity if the token or base id is empty.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        config.validate()?;
        let transport = UreqTransport::new(config.timeout());
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> TableClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Result<Self, ApiError> {
        config.validate()?;
        let base_path = build_base_path(config.api_root(), config.base_id());
        Ok(Self {
            config,
            base_path,
            transport,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// `{api_root}/{base_id}`, percent-encoded.
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Fetch one page of records.
    pub async fn list<F: DeserializeOwned>(
        &self,
        table: &str,
        params: &ListParams,
    ) -> Result<ListResponse<F>, ApiError> {
        let path = format!("{}{}", build_table_path(table), build_list_query(params));
        let payload = self.request(HttpMethod::Get, &path, None).await?;
        decode(payload)
    }

    /// Fetch every page, following offsets until the server stops returning one.
    pub async fn list_all<F: DeserializeOwned>(
        &self,
        table: &str,
        params: &ListParams,
        options: ListAllOptions,
    ) -> Result<Vec<Record<F>>, ApiError> {
        pagination::collect_all(
            |page_params| async move { self.list::<F>(table, &page_params).await },
            params,
            options,
        )
        .await
    }

    pub async fn get<F: DeserializeOwned>(
        &self,
        table: &str,
        record_id: &str,
    ) -> Result<Record<F>, ApiError> {
        let payload = self
            .request(HttpMethod::Get, &build_record_path(table, record_id), None)
            .await?;
        decode(payload)
    }

    /// Create a record from `fields`. Fields not given take the table's defaults.
    pub async fn create<F, P>(&self, table: &str, fields: &P) -> Result<Record<F>, ApiError>
    where
        F: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let body = fields_body(fields)?;
        let payload = self
            .request(HttpMethod::Post, &build_table_path(table), Some(&body))
            .await?;
        decode(payload)
    }

    /// Partially update a record. Fields absent from `fields` are left untouched.
    pub async fn update<F, P>(
        &self,
        table: &str,
        record_id: &str,
        fields: &P,
    ) -> Result<Record<F>, ApiError>
    where
        F: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let body = fields_body(fields)?;
        let payload = self
            .request(HttpMethod::Patch, &build_record_path(table, record_id), Some(&body))
            .await?;
        decode(payload)
    }

    /// Delete a record. An empty success body counts as a deletion of `record_id`.
    pub async fn delete(&self, table: &str, record_id: &str) -> Result<DeletedRecord, ApiError> {
        let payload = self
            .request(HttpMethod::Delete, &build_record_path(table, record_id), None)
            .await?;
        match payload {
            None => Ok(DeletedRecord {
                id: record_id.to_string(),
                deleted: true,
            }),
            some => decode(some),
        }
    }

    /// Set an attachment field to the given URLs; the server fetches and stores them.
    pub async fn attach_urls(
        &self,
        table: &str,
        record_id: &str,
        field: &str,
        uploads: &[AttachmentUpload],
    ) -> Result<Record<Fields>, ApiError> {
        let mut fields = Fields::new();
        let uploads = serde_json::to_value(uploads).map_err(|e| ApiError::Encode(e.to_string()))?;
        fields.insert(field.to_string(), uploads);
        self.update(table, record_id, &fields).await
    }

    /// Issue a raw request against `{base_path}{path}` and return the untyped payload.
    ///
    /// `path` must already be encoded and start with `/`.
    pub async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Option<Payload>, ApiError> {
        let url = format!("{}{path}", self.base_path);
        let options = RequestOptions {
            token: self.config.token(),
            timeout: self.config.timeout(),
        };
        executor::execute(&self.transport, method, &url, options, body).await
    }
}

fn fields_body<P: Serialize + ?Sized>(fields: &P) -> Result<Value, ApiError> {
    let fields = serde_json::to_value(fields).map_err(|e| ApiError::Encode(e.to_string()))?;
    Ok(json!({ "fields": fields }))
}

fn decode<D: DeserializeOwned>(payload: Option<Payload>) -> Result<D, ApiError> {
    match payload {
        Some(Payload::Json(value)) => {
            serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
        }
        Some(Payload::Text(_)) => Err(ApiError::Decode("expected a JSON response body".to_string())),
        None => Err(ApiError::Decode("empty response body".to_string())),
    }
}
