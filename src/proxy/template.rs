use std::collections::HashMap;

use thiserror::Error;
use url::Url;

use super::fields::QueryParams;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    /// The route table references a parameter the request cannot supply.
    #[error("route template references unknown parameter `{0}`")]
    UnknownParameter(String),

    #[error("Invalid path parameter: {0}")]
    InvalidSegment(String),

    #[error("route template `{0}` has a placeholder inside a segment")]
    Unsupported(&'static str),
}

/// A backend path and query, ready to be joined onto a base URL.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub segments: Vec<String>,
    pub query: Vec<(String, String)>,
}

impl ResolvedTarget {
    /// Join onto `base`, appending `raw_query` verbatim before the
    /// template's own query pairs.
    pub fn to_url(&self, base: &Url, raw_query: Option<&str>) -> Url {
        let mut url = base.clone();
        url.set_query(None);
        url.set_fragment(None);
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(&self.segments);
        }

        url.set_query(raw_query.filter(|q| !q.is_empty()));
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.query);
        }
        url
    }
}

/// Fill a template from path parameters, falling back to query parameters.
pub fn render(
    template: &'static str,
    params: &HashMap<String, String>,
    query: &QueryParams,
) -> Result<ResolvedTarget, TemplateError> {
    let (path, query_part) = match template.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (template, None),
    };

    let mut resolved = ResolvedTarget::default();

    for segment in path.split('/').filter(|s| !s.is_empty()) {
        match placeholder(segment, template)? {
            None => resolved.segments.push(segment.to_string()),
            Some(name) if name.starts_with('*') => {
                let value = lookup(&name[1..], params, query)?;
                let before = resolved.segments.len();
                for part in value.split('/').filter(|s| !s.is_empty()) {
                    resolved.segments.push(checked_segment(part)?);
                }
                // An empty catch-all would address the parent collection
                if resolved.segments.len() == before {
                    return Err(TemplateError::InvalidSegment(value.to_string()));
                }
            }
            Some(name) => resolved.segments.push(checked_segment(lookup(name, params, query)?)?),
        }
    }

    for pair in query_part.into_iter().flat_map(|q| q.split('&')) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let value = match placeholder(value, template)? {
            Some(name) => lookup(name, params, query)?.to_string(),
            None => value.to_string(),
        };
        resolved.query.push((key.to_string(), value));
    }

    Ok(resolved)
}

fn lookup<'a>(
    name: &str,
    params: &'a HashMap<String, String>,
    query: &'a QueryParams,
) -> Result<&'a str, TemplateError> {
    params
        .get(name)
        .map(String::as_str)
        .or_else(|| query.get(name))
        .ok_or_else(|| TemplateError::UnknownParameter(name.to_string()))
}

/// `Some(name)` for `{name}` or `{*name}`; `None` for a literal.
fn placeholder<'s>(
    segment: &'s str,
    template: &'static str,
) -> Result<Option<&'s str>, TemplateError> {
    match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
        Some(name) => Ok(Some(name)),
        None if segment.contains(&['{', '}'][..]) => Err(TemplateError::Unsupported(template)),
        None => Ok(None),
    }
}

/// Dot segments would let a parameter climb out of the intended resource.
fn checked_segment(value: &str) -> Result<String, TemplateError> {
    match value.trim() {
        "" | "." | ".." => Err(TemplateError::InvalidSegment(value.to_string())),
        _ => Ok(value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn base(url: &str) -> Url {
        Url::parse(url).unwrap()
    }

    #[test]
    fn substitutes_path_parameters() {
        let target = render(
            "/api/agreements/{id}/tasks",
            &params(&[("id", "a-17")]),
            &QueryParams::default(),
        )
        .unwrap();
        let url = target.to_url(&base("http://localhost:3001"), None);
        assert_eq!(url.as_str(), "http://localhost:3001/api/agreements/a-17/tasks");
    }

    #[test]
    fn single_segment_values_are_encoded() {
        let target = render(
            "/api/documents/{path}",
            &params(&[("path", "lease 1/v2")]),
            &QueryParams::default(),
        )
        .unwrap();
        let url = target.to_url(&base("http://backend"), None);
        assert_eq!(url.path(), "/api/documents/lease%201%2Fv2");
    }

    #[test]
    fn catch_all_keeps_its_slashes() {
        let target = render(
            "/api/documents/{*path}",
            &params(&[("path", "property-9/leases//signed.pdf")]),
            &QueryParams::default(),
        )
        .unwrap();
        assert_eq!(target.segments, ["api", "documents", "property-9", "leases", "signed.pdf"]);
    }

    #[test]
    fn dot_segments_are_rejected() {
        let err = render(
            "/api/documents/{*path}",
            &params(&[("path", "property-9/../../admin")]),
            &QueryParams::default(),
        )
        .unwrap_err();
        assert_eq!(err, TemplateError::InvalidSegment("..".to_string()));
    }

    #[test]
    fn empty_catch_all_is_rejected() {
        for value in ["", "/", "//"] {
            let err = render(
                "/api/documents/{*path}",
                &params(&[("path", value)]),
                &QueryParams::default(),
            )
            .unwrap_err();
            assert_eq!(err, TemplateError::InvalidSegment(value.to_string()));
        }
    }

    #[test]
    fn query_section_pulls_from_query_params() {
        let query = QueryParams::parse(Some("email=a%2Bb%40renthive.app"));
        let target = render("/users/lookup?email={email}", &HashMap::new(), &query).unwrap();
        let url = target.to_url(&base("http://localhost:3001/api"), None);
        assert_eq!(url.as_str(), "http://localhost:3001/api/users/lookup?email=a%2Bb%40renthive.app");
    }

    #[test]
    fn raw_query_is_appended_verbatim() {
        let target = render("/timeline/all", &HashMap::new(), &QueryParams::default()).unwrap();
        let url = target.to_url(&base("http://localhost:3001/api/"), Some("days=30&kind=lease"));
        assert_eq!(url.as_str(), "http://localhost:3001/api/timeline/all?days=30&kind=lease");
    }

    #[test]
    fn unknown_parameter_is_a_route_bug() {
        let err = render("/users/{id}", &HashMap::new(), &QueryParams::default()).unwrap_err();
        assert_eq!(err, TemplateError::UnknownParameter("id".to_string()));
    }

    #[test]
    fn partial_placeholders_are_unsupported() {
        let err = render("/users/v{id}", &params(&[("id", "1")]), &QueryParams::default())
            .unwrap_err();
        assert!(matches!(err, TemplateError::Unsupported(_)));
    }
}
