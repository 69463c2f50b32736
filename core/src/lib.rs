//! Typed async client for a hosted tabular-data REST API.
//!
//! # Overview
//! `TableClient` lists, fetches, creates, updates and deletes records in the
//! tables of one base. Every failure is normalized into `ApiError`, whose
//! variants classify the HTTP status (auth, not found, validation, rate
//! limit, generic) or report a timeout (408) or transport failure (503).
//! `list_all` follows continuation offsets up to a record ceiling, and
//! `TableRepository` maps records to caller-defined models.
//!
//! # Design
//! - Configuration is validated at construction and never mutated after.
//! - Requests and responses are plain data passed through a `Transport`;
//!   the bundled `UreqTransport` is the default, tests script their own.
//! - The executor owns the per-request timeout, JSON parsing and error
//!   classification; transports only move bytes.
//! - No retries, caching or rate limiting: every error reaches the caller.

pub mod attachment;
pub mod classify;
pub mod client;
pub mod config;
pub mod error;
pub mod executor;
pub mod http;
pub mod pagination;
pub mod repository;
pub mod transport;
pub mod types;
pub mod url;

pub use attachment::{Attachment, AttachmentUpload};
pub use client::TableClient;
pub use config::{ClientConfig, DEFAULT_API_ROOT, DEFAULT_TIMEOUT_MS};
pub use error::{ApiError, ErrorKind, HttpFailure, Payload};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
pub use repository::{FieldMapper, Page, TableRepository};
pub use transport::UreqTransport;
pub use types::{
    DeletedRecord, Fields, ListAllOptions, ListParams, ListResponse, Record, Sort, SortDirection,
    DEFAULT_MAX_TOTAL_RECORDS,
};
