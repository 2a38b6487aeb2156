//! Authenticated proxy routes.
//!
//! Every route is a `ProxyRoute` value in `routes::ROUTES`; one generic
//! handler (`handler::forward`) checks the route's preconditions, forwards
//! the call to the backend and normalizes whatever comes back.

pub mod fields;
pub mod forward;
pub mod handler;
pub mod routes;
pub mod template;

use axum::http::Method;
use axum::routing::MethodFilter;
use serde_json::{json, Value};

pub use fields::{Field, FieldKind};
pub use forward::BackendClient;
pub use handler::router;
pub use routes::ROUTES;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_method(&self) -> Method {
        match self {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    pub fn filter(&self) -> MethodFilter {
        match self {
            HttpMethod::Get => MethodFilter::GET,
            HttpMethod::Post => MethodFilter::POST,
            HttpMethod::Put => MethodFilter::PUT,
            HttpMethod::Delete => MethodFilter::DELETE,
        }
    }

    /// POST and PUT always send a JSON body, `{}` when the client sent none.
    pub fn requires_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// Which configured base URL a route forwards to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// `BACKEND_URL`, templates carry the `/api` prefix themselves
    Dedicated,
    /// `PUBLIC_API_URL`, already ends in `/api`
    Public,
}

impl Backend {
    pub fn env_key(&self) -> &'static str {
        match self {
            Backend::Dedicated => "BACKEND_URL",
            Backend::Public => "PUBLIC_API_URL",
        }
    }
}

/// Backend path for a route. Templates use whole-segment placeholders:
/// `{name}` for one segment, `{*name}` for a catch-all, and may carry a
/// query section such as `?email={email}`.
#[derive(Debug, Clone, Copy)]
pub enum Target {
    Path(&'static str),
    /// The first query key present selects its template.
    FirstOf(&'static [(&'static str, &'static str)]),
}

/// What to do with a successful backend body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relay {
    Verbatim,
    /// Return only `data` from a `{ "success": true, "data": ... }` envelope.
    UnwrapData,
}

#[derive(Debug)]
pub struct ProxyRoute {
    pub name: &'static str,
    pub method: HttpMethod,
    /// Inbound axum path
    pub path: &'static str,
    pub backend: Backend,
    pub target: Target,
    pub requires_credential: bool,
    pub body: &'static [Field],
    pub query: &'static [Field],
    /// Replaces the generated "Missing required fields: ..." message
    pub missing_message: Option<&'static str>,
    /// Append the inbound query string to the backend URL
    pub forward_query: bool,
    pub relay: Relay,
}

impl ProxyRoute {
    pub fn summary(&self) -> Value {
        let target = match self.target {
            Target::Path(template) => json!(template),
            Target::FirstOf(candidates) => json!(candidates
                .iter()
                .map(|(key, template)| json!({ "when": key, "target": template }))
                .collect::<Vec<_>>()),
        };

        json!({
            "name": self.name,
            "method": self.method.as_str(),
            "path": self.path,
            "backend": self.backend.env_key(),
            "target": target,
            "requires_credential": self.requires_credential,
            "body": self.body.iter().map(Field::summary).collect::<Vec<_>>(),
            "query": self.query.iter().map(Field::summary).collect::<Vec<_>>(),
        })
    }
}
