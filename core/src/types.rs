//! Record and list DTOs for the table API.
//!
//! # Design
//! `Record` is generic over its field shape. The default, an untyped JSON
//! map, is what the client hands back when the caller has no schema; a
//! caller-defined struct can be used anywhere instead. The type parameter
//! has no runtime effect beyond which serde impl decodes `fields`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Untyped field map.
pub type Fields = Map<String, Value>;

/// Ceiling applied by `list_all` when the caller does not set one.
pub const DEFAULT_MAX_TOTAL_RECORDS: usize = 10_000;

/// One row of a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<F = Fields> {
    pub id: String,
    #[serde(rename = "createdTime", default, skip_serializing_if = "Option::is_none")]
    pub created_time: Option<String>,
    pub fields: F,
}

/// Sort order for one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// One `(field, direction)` sort pair. Without a direction the server default applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<SortDirection>,
}

impl Sort {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: None,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Some(SortDirection::Asc),
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Some(SortDirection::Desc),
        }
    }
}

/// Query parameters for the list endpoint. Every field is optional and
/// passed through to the server verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_by_formula: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_records: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<Sort>,
}

/// One page of a list call. `offset` present means more pages exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResponse<F = Fields> {
    pub records: Vec<Record<F>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<String>,
}

/// Acknowledgment returned by delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedRecord {
    pub id: String,
    pub deleted: bool,
}

/// Options for `list_all`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListAllOptions {
    /// Fail once more than this many records have been accumulated.
    pub max_total_records: usize,
}

impl Default for ListAllOptions {
    fn default() -> Self {
        Self {
            max_total_records: DEFAULT_MAX_TOTAL_RECORDS,
        }
    }
}
