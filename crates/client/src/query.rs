//! Query configuration for listings.
//!
//! Directory listings take [`GraphParams`] (OData-style `$filter`, `$select`
//! and friends); resource-management listings take [`RmParams`]. Both are
//! immutable once handed to a listing: the client fills in a page size when
//! none was given, and that is the only adjustment ever made.

/// Anything that can be encoded onto a request.
pub trait Params {
    /// Query string pairs, in a stable order.
    fn query(&self) -> Vec<(String, String)>;

    /// Extra request headers required by this query.
    fn headers(&self) -> Vec<(String, String)> {
        Vec::new()
    }
}

/// Split, trim and deduplicate a list of field names, keeping first-seen
/// order.
///
/// Entries may themselves be comma-separated lists (`"id,displayName"`), which
/// is how field lists tend to arrive from configuration. Empty entries are
/// dropped, so `[""]` means "no explicit selection".
pub fn unique_fields<I, S>(fields: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut unique: Vec<String> = Vec::new();
    for field in fields {
        for name in field.as_ref().split(',').map(str::trim).filter(|name| !name.is_empty()) {
            if !unique.iter().any(|seen| seen == name) {
                unique.push(name.to_string());
            }
        }
    }
    unique
}

/// Query parameters for directory listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphParams {
    pub filter: String,
    pub search: String,
    /// Fields to return. Only ever set through [`with_select`](Self::with_select),
    /// so it is always deduplicated.
    select: Vec<String>,
    pub expand: String,
    pub count: bool,
    /// Page size. `0` means "let the client pick".
    pub top: u32,
}
impl GraphParams {
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_select<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.select = unique_fields(fields);
        self
    }

    pub fn select(&self) -> &[String] {
        &self.select
    }

    pub fn with_expand(mut self, expand: impl Into<String>) -> Self {
        self.expand = expand.into();
        self
    }

    pub fn with_count(mut self, count: bool) -> Self {
        self.count = count;
        self
    }

    pub fn with_top(mut self, top: u32) -> Self {
        self.top = top;
        self
    }

    /// Replace a zero page size with `default`.
    pub fn or_top(mut self, default: u32) -> Self {
        if self.top == 0 {
            self.top = default;
        }
        self
    }
}
impl Params for GraphParams {
    fn query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if !self.filter.is_empty() {
            query.push(("$filter".to_string(), self.filter.clone()));
        }
        if !self.search.is_empty() {
            query.push(("$search".to_string(), self.search.clone()));
        }
        if !self.select.is_empty() {
            query.push(("$select".to_string(), self.select.join(",")));
        }
        if !self.expand.is_empty() {
            query.push(("$expand".to_string(), self.expand.clone()));
        }
        if self.count {
            query.push(("$count".to_string(), "true".to_string()));
        }
        if self.top > 0 {
            query.push(("$top".to_string(), self.top.to_string()));
        }
        query
    }

    fn headers(&self) -> Vec<(String, String)> {
        // Advanced directory queries are rejected without it.
        if self.count || !self.search.is_empty() {
            vec![("ConsistencyLevel".to_string(), "eventual".to_string())]
        } else {
            Vec::new()
        }
    }
}

/// Query parameters for resource-management listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RmParams {
    pub api_version: String,
    pub filter: String,
    pub expand: String,
    /// Page size. `0` leaves it to the API; several resource providers reject
    /// `$top` outright.
    pub top: u32,
}
impl RmParams {
    pub fn new(api_version: impl Into<String>) -> Self {
        Self { api_version: api_version.into(), ..Self::default() }
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    pub fn with_expand(mut self, expand: impl Into<String>) -> Self {
        self.expand = expand.into();
        self
    }
}
impl Params for RmParams {
    fn query(&self) -> Vec<(String, String)> {
        let mut query = vec![("api-version".to_string(), self.api_version.clone())];
        if !self.filter.is_empty() {
            query.push(("$filter".to_string(), self.filter.clone()));
        }
        if !self.expand.is_empty() {
            query.push(("$expand".to_string(), self.expand.clone()));
        }
        if self.top > 0 {
            query.push(("$top".to_string(), self.top.to_string()));
        }
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn pair(key: &str, value: &str) -> (String, String) {
        (key.to_string(), value.to_string())
    }

    #[rstest]
    #[case(vec!["id,displayName,createdDateTime"], vec!["id", "displayName", "createdDateTime"])]
    #[case(vec!["id", "displayName", "id"], vec!["id", "displayName"])]
    #[case(vec!["id, mail", " mail ,id"], vec!["id", "mail"])]
    #[case(vec![""], vec![])]
    #[case(vec![",,"], vec![])]
    fn test_unique_fields(#[case] input: Vec<&str>, #[case] expected: Vec<&str>) {
        assert_eq!(unique_fields(input), expected);
    }

    #[test]
    fn test_empty_graph_params_encode_nothing() {
        let params = GraphParams::default();
        assert!(params.query().is_empty());
        assert!(params.headers().is_empty());
    }

    #[test]
    fn test_graph_params_encoding() {
        let params = GraphParams::default()
            .with_filter("groupTypes/any(g:g eq 'Unified')")
            .with_select(["id,displayName", "id"])
            .with_top(50);
        assert_eq!(
            params.query(),
            vec![
                pair("$filter", "groupTypes/any(g:g eq 'Unified')"),
                pair("$select", "id,displayName"),
                pair("$top", "50"),
            ]
        );
    }

    #[test]
    fn test_select_stays_deduplicated_across_calls() {
        let params = GraphParams::default().with_select(["mail"]).with_select(["id", "displayName,id", " id "]);
        assert_eq!(params.select(), ["id", "displayName"]);
        assert_eq!(params.query(), vec![pair("$select", "id,displayName")]);
    }

    #[rstest]
    #[case(GraphParams::default().with_count(true))]
    #[case(GraphParams::default().with_search("\"displayName:ops\""))]
    fn test_advanced_queries_request_eventual_consistency(#[case] params: GraphParams) {
        assert_eq!(params.headers(), vec![pair("ConsistencyLevel", "eventual")]);
    }

    #[rstest]
    #[case(0, 99)]
    #[case(10, 10)]
    fn test_or_top(#[case] top: u32, #[case] expected: u32) {
        assert_eq!(GraphParams::default().with_top(top).or_top(99).top, expected);
    }

    #[test]
    fn test_rm_params_always_carry_api_version() {
        assert_eq!(RmParams::new("2024-03-01").query(), vec![pair("api-version", "2024-03-01")]);
        assert_eq!(
            RmParams::new("2022-08-01").with_filter("location eq 'westeurope'").query(),
            vec![pair("api-version", "2022-08-01"), pair("$filter", "location eq 'westeurope'")]
        );
    }
}
