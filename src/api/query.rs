//! List requests and the filters applied to them

/// A GET against a collection, plus its query string
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListRequest {
    pub path: String,
    pub query: Vec<(String, String)>,
}

/// Mutates a list request before it is sent
pub type ListFilter = Box<dyn FnOnce(ListRequest) -> ListRequest>;

impl ListRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
        }
    }

    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// `filter.<property>=<value>`
    pub fn filter(self, property: &str, value: impl ToString) -> Self {
        self.param(format!("filter.{}", property), value)
    }

    /// Apply filters in order
    pub fn apply(self, filters: impl IntoIterator<Item = ListFilter>) -> Self {
        filters.into_iter().fold(self, |req, f| f(req))
    }
}

/// Add `filter.<property>` when a value was given
pub fn filter_by(property: &'static str, value: Option<String>) -> Option<ListFilter> {
    value.map(|v| Box::new(move |req: ListRequest| req.filter(property, v)) as ListFilter)
}

pub fn offset(value: Option<u32>) -> Option<ListFilter> {
    value.map(|v| Box::new(move |req: ListRequest| req.param("offset", v)) as ListFilter)
}

pub fn limit(value: Option<u32>) -> Option<ListFilter> {
    value.map(|v| Box::new(move |req: ListRequest| req.param("limit", v)) as ListFilter)
}

pub fn depth(value: u32) -> ListFilter {
    Box::new(move |req: ListRequest| req.param("depth", value))
}

pub fn order_by(value: Option<String>) -> Option<ListFilter> {
    value.map(|v| Box::new(move |req: ListRequest| req.param("orderBy", v)) as ListFilter)
}

pub fn max_results(value: Option<u32>) -> Option<ListFilter> {
    value.map(|v| Box::new(move |req: ListRequest| req.param("maxResults", v)) as ListFilter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filters_apply_in_order() {
        let filters: Vec<ListFilter> = [
            filter_by("state", Some("AVAILABLE".into())),
            filter_by("domain", None),
            offset(Some(10)),
            limit(Some(5)),
        ]
        .into_iter()
        .flatten()
        .collect();

        let req = ListRequest::new("/distributions").apply(filters);
        assert_eq!(
            req.query,
            vec![
                ("filter.state".to_string(), "AVAILABLE".to_string()),
                ("offset".to_string(), "10".to_string()),
                ("limit".to_string(), "5".to_string()),
            ]
        );
    }

    #[test]
    fn test_no_filters_is_identity() {
        let req = ListRequest::new("/clusters").apply(Vec::new());
        assert_eq!(req, ListRequest::new("/clusters"));
    }

    #[test]
    fn test_depth_and_ordering() {
        let req = ListRequest::new("/images").apply(
            [Some(depth(1)), order_by(Some("name".into())), max_results(Some(3))]
                .into_iter()
                .flatten(),
        );
        assert_eq!(req.query.len(), 3);
        assert_eq!(req.query[1], ("orderBy".to_string(), "name".to_string()));
    }
}
