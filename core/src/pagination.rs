//! Offset-following pagination.

use std::future::Future;

use tracing::debug;

use crate::error::ApiError;
use crate::types::{ListAllOptions, ListParams, ListResponse, Record};

/// Fetch every page of a list call, strictly one request at a time.
///
/// `fetch_page` is called with `params` plus the current offset; any offset
/// already present in `params` is ignored. The server's offset is echoed
/// back verbatim on the next call. The ceiling is checked after each page is
/// appended, so the failing page is always fully fetched first.
pub async fn collect_all<F, L, Fut>(
    mut fetch_page: L,
    params: &ListParams,
    options: ListAllOptions,
) -> Result<Vec<Record<F>>, ApiError>
where
    L: FnMut(ListParams) -> Fut,
    Fut: Future<Output = Result<ListResponse<F>, ApiError>>,
{
    let mut records = Vec::new();
    let mut offset: Option<String> = None;
    let mut page = 0usize;

    loop {
        let request = ListParams {
            offset: offset.take(),
            ..params.clone()
        };
        let response = fetch_page(request).await?;
        page += 1;

        let fetched = response.records.len();
        records.extend(response.records);
        debug!(page, fetched, total = records.len(), "fetched page");

        if records.len() > options.max_total_records {
            return Err(ApiError::Configuration(format!(
                "list_all exceeded max_total_records ({}); narrow the query with a filter formula, view or max_records",
                options.max_total_records
            )));
        }

        match response.offset {
            Some(next) => offset = Some(next),
            None => return Ok(records),
        }
    }
}
