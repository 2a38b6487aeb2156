use serde_json::{json, Map, Value};

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    PositiveInteger,
    /// A non-empty string or an integer
    Identifier,
    List,
}

impl FieldKind {
    fn describe(&self) -> &'static str {
        match self {
            FieldKind::Text => "a string",
            FieldKind::PositiveInteger => "a positive integer",
            FieldKind::Identifier => "a string or integer identifier",
            FieldKind::List => "a list",
        }
    }

    fn accepts_json(&self, value: &Value) -> bool {
        match self {
            FieldKind::Text => value.is_string(),
            FieldKind::PositiveInteger => value.as_u64().is_some_and(|n| n > 0),
            FieldKind::Identifier => value.is_string() || value.is_i64() || value.is_u64(),
            FieldKind::List => value.is_array(),
        }
    }

    fn accepts_text(&self, value: &str) -> bool {
        match self {
            FieldKind::PositiveInteger => value.parse::<u64>().is_ok_and(|n| n > 0),
            FieldKind::Text | FieldKind::Identifier | FieldKind::List => true,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl Field {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
        }
    }

    pub fn summary(&self) -> Value {
        json!({ "name": self.name, "kind": self.kind.describe(), "required": self.required })
    }
}

/// Query parameters in arrival order; the first occurrence of a key wins.
#[derive(Debug, Default, Clone)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn parse(raw: Option<&str>) -> Self {
        let pairs = raw
            .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default();
        Self(pairs)
    }

    /// Value of `key`, treating an empty value as absent.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.trim().is_empty())
    }
}

fn missing_message(fields: &[Field], custom: Option<&'static str>) -> String {
    custom.map(str::to_string).unwrap_or_else(|| {
        let names: Vec<&str> = fields.iter().filter(|f| f.required).map(|f| f.name).collect();
        format!("Missing required fields: {}", names.join(", "))
    })
}

fn invalid(field: &Field) -> ApiError {
    ApiError::validation_error(format!(
        "Invalid field: {} must be {}",
        field.name,
        field.kind.describe()
    ))
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| match v {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    })
}

/// Check body fields. All required fields are checked for presence before
/// any kind check, so the missing-field message wins.
pub fn check_body(
    fields: &[Field],
    body: Option<&Value>,
    custom: Option<&'static str>,
) -> Result<(), ApiError> {
    if fields.is_empty() {
        return Ok(());
    }

    let empty = Map::new();
    let object = match body {
        None => &empty,
        Some(Value::Object(map)) => map,
        Some(_) => return Err(ApiError::bad_request("Request body must be a JSON object")),
    };

    if fields
        .iter()
        .any(|f| f.required && present(object.get(f.name)).is_none())
    {
        return Err(ApiError::validation_error(missing_message(fields, custom)));
    }

    for field in fields {
        if let Some(value) = present(object.get(field.name)) {
            if !field.kind.accepts_json(value) {
                return Err(invalid(field));
            }
        }
    }

    Ok(())
}

/// Same contract as `check_body`, for query parameters.
pub fn check_query(
    fields: &[Field],
    query: &QueryParams,
    custom: Option<&'static str>,
) -> Result<(), ApiError> {
    if fields.iter().any(|f| f.required && query.get(f.name).is_none()) {
        return Err(ApiError::validation_error(missing_message(fields, custom)));
    }

    for field in fields {
        if let Some(value) = query.get(field.name) {
            if !field.kind.accepts_text(value) {
                return Err(invalid(field));
            }
        }
    }

    Ok(())
}
