//! Path and query-string building for the table endpoints.
//!
//! All functions are pure. Names, ids and parameter values are
//! percent-encoded but otherwise passed through untouched; formulas and
//! field names are never validated here.

use crate::types::ListParams;

/// `{root}/{base}` with any trailing slash on `root` removed.
pub fn build_base_path(api_root: &str, base_id: &str) -> String {
    format!(
        "{}/{}",
        api_root.trim_end_matches('/'),
        urlencoding::encode(base_id)
    )
}

/// `/{table}`.
pub fn build_table_path(table: &str) -> String {
    format!("/{}", urlencoding::encode(table))
}

/// `/{table}/{record_id}`.
pub fn build_record_path(table: &str, record_id: &str) -> String {
    format!(
        "/{}/{}",
        urlencoding::encode(table),
        urlencoding::encode(record_id)
    )
}

/// Serialize list parameters as `?k=v&...`, or an empty string when none are set.
///
/// Sort pairs become `sort[i][field]` / `sort[i][direction]` in array order;
/// the bracketed keys are written literally.
pub fn build_list_query(params: &ListParams) -> String {
    let mut pairs: Vec<(String, String)> = Vec::new();

    if let Some(view) = &params.view {
        pairs.push(("view".to_string(), view.clone()));
    }
    if let Some(formula) = &params.filter_by_formula {
        pairs.push(("filterByFormula".to_string(), formula.clone()));
    }
    if let Some(max) = params.max_records {
        pairs.push(("maxRecords".to_string(), max.to_string()));
    }
    if let Some(size) = params.page_size {
        pairs.push(("pageSize".to_string(), size.to_string()));
    }
    if let Some(offset) = &params.offset {
        pairs.push(("offset".to_string(), offset.clone()));
    }
    for (i, sort) in params.sort.iter().enumerate() {
        pairs.push((format!("sort[{i}][field]"), sort.field.clone()));
        if let Some(direction) = sort.direction {
            pairs.push((format!("sort[{i}][direction]"), direction.as_str().to_string()));
        }
    }

    if pairs.is_empty() {
        return String::new();
    }

    let query = pairs
        .iter()
        .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");
    format!("?{query}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Sort;

    #[test]
    fn base_path_strips_trailing_slash() {
        assert_eq!(
            build_base_path("https://api.example.test/v0/", "app 1"),
            "https://api.example.test/v0/app%201"
        );
    }

    #[test]
    fn table_path_encodes_spaces() {
        assert_eq!(build_table_path("My Table"), "/My%20Table");
    }

    #[test]
    fn record_path_encodes_slashes() {
        assert_eq!(build_record_path("Tasks", "rec/123"), "/Tasks/rec%2F123");
    }

    #[test]
    fn empty_params_yield_empty_query() {
        assert_eq!(build_list_query(&ListParams::default()), "");
    }

    #[test]
    fn sort_pairs_keep_order_and_skip_missing_direction() {
        let params = ListParams {
            sort: vec![Sort::asc("A"), Sort::new("B")],
            ..Default::default()
        };
        let query = build_list_query(&params);
        assert!(query.starts_with('?'));
        assert!(query.contains("sort[0][field]=A&sort[0][direction]=asc&sort[1][field]=B"));
        assert!(!query.contains("sort[1][direction]"));
    }

    #[test]
    fn flat_params_in_fixed_order() {
        let params = ListParams {
            view: Some("Grid view".to_string()),
            filter_by_formula: Some("{Status}='Done'".to_string()),
            max_records: Some(50),
            page_size: Some(10),
            offset: Some("itr/abc".to_string()),
            sort: Vec::new(),
        };
        assert_eq!(
            build_list_query(&params),
            "?view=Grid%20view&filterByFormula=%7BStatus%7D%3D%27Done%27&maxRecords=50&pageSize=10&offset=itr%2Fabc"
        );
    }
}
