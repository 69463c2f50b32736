//! Model-typed access to one table.
//!
//! A `FieldMapper` converts between the caller's domain model and the
//! table's field shape; `TableRepository` applies it around every
//! `TableClient` call and otherwise adds nothing.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::client::TableClient;
use crate::error::ApiError;
use crate::http::Transport;
use crate::transport::UreqTransport;
use crate::types::{DeletedRecord, ListAllOptions, ListParams, Record};

/// Pure, synchronous conversion between a model and table fields.
pub trait FieldMapper {
    type Model;
    /// Field shape on the wire. Use `Option` members with
    /// `skip_serializing_if` to express partial writes.
    type Fields: Serialize + DeserializeOwned;

    fn to_fields(&self, model: &Self::Model) -> Self::Fields;

    fn from_record(&self, record: Record<Self::Fields>) -> Self::Model;
}

/// One page of models plus the offset to resume from.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<M> {
    pub items: Vec<M>,
    pub offset: Option<String>,
}

/// CRUD on one table in terms of a domain model.
pub struct TableRepository<'c, M, T: Transport = UreqTransport> {
    client: &'c TableClient<T>,
    table: String,
    mapper: M,
}

impl<'c, M: FieldMapper, T: Transport> TableRepository<'c, M, T> {
    pub fn new(client: &'c TableClient<T>, table: impl Into<String>, mapper: M) -> Self {
        Self {
            client,
            table: table.into(),
            mapper,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub async fn list(&self, params: &ListParams) -> Result<Page<M::Model>, ApiError> {
        let response = self.client.list::<M::Fields>(&self.table, params).await?;
        Ok(Page {
            items: self.map_records(response.records),
            offset: response.offset,
        })
    }

    pub async fn list_all(
        &self,
        params: &ListParams,
        options: ListAllOptions,
    ) -> Result<Vec<M::Model>, ApiError> {
        let records = self
            .client
            .list_all::<M::Fields>(&self.table, params, options)
            .await?;
        Ok(self.map_records(records))
    }

    pub async fn get(&self, id: &str) -> Result<M::Model, ApiError> {
        let record = self.client.get::<M::Fields>(&self.table, id).await?;
        Ok(self.mapper.from_record(record))
    }

    pub async fn create(&self, model: &M::Model) -> Result<M::Model, ApiError> {
        let fields = self.mapper.to_fields(model);
        let record = self
            .client
            .create::<M::Fields, _>(&self.table, &fields)
            .await?;
        Ok(self.mapper.from_record(record))
    }

    pub async fn update(&self, id: &str, model: &M::Model) -> Result<M::Model, ApiError> {
        let fields = self.mapper.to_fields(model);
        let record = self
            .client
            .update::<M::Fields, _>(&self.table, id, &fields)
            .await?;
        Ok(self.mapper.from_record(record))
    }

    pub async fn delete(&self, id: &str) -> Result<DeletedRecord, ApiError> {
        self.client.delete(&self.table, id).await
    }

    fn map_records(&self, records: Vec<Record<M::Fields>>) -> Vec<M::Model> {
        records
            .into_iter()
            .map(|record| self.mapper.from_record(record))
            .collect()
    }
}
