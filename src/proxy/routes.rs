use super::fields::{Field, FieldKind};
use super::{Backend, HttpMethod, ProxyRoute, Relay, Target};

const fn route(
    name: &'static str,
    method: HttpMethod,
    path: &'static str,
    backend: Backend,
    target: &'static str,
) -> ProxyRoute {
    ProxyRoute {
        name,
        method,
        path,
        backend,
        target: Target::Path(target),
        requires_credential: true,
        body: &[],
        query: &[],
        missing_message: None,
        forward_query: false,
        relay: Relay::Verbatim,
    }
}

/// Every proxied endpoint. Documents list and delete share one catch-all
/// path because axum cannot hold `:propertyId` and `*path` side by side.
pub static ROUTES: &[ProxyRoute] = &[
    // Agreements
    route(
        "agreement_tasks_list",
        HttpMethod::Get,
        "/api/agreements/:id/tasks",
        Backend::Dedicated,
        "/api/agreements/{id}/tasks",
    ),
    ProxyRoute {
        body: &[Field::required("tasks", FieldKind::List)],
        ..route(
            "agreement_tasks_update",
            HttpMethod::Put,
            "/api/agreements/:id/tasks",
            Backend::Dedicated,
            "/api/agreements/{id}/tasks",
        )
    },
    // Contracts
    route(
        "contract_summary",
        HttpMethod::Get,
        "/api/contracts/summaries/:id",
        Backend::Dedicated,
        "/api/contracts/summaries/{id}",
    ),
    // Documents; `path` is the property id for listing
    route(
        "documents_list",
        HttpMethod::Get,
        "/api/documents/*path",
        Backend::Dedicated,
        "/api/documents/{path}",
    ),
    route(
        "document_delete",
        HttpMethod::Delete,
        "/api/documents/*path",
        Backend::Dedicated,
        "/api/documents/{*path}",
    ),
    // Invitations
    ProxyRoute {
        body: &[Field::required("token", FieldKind::Text)],
        missing_message: Some("Invitation token is required"),
        ..route(
            "invitation_accept",
            HttpMethod::Post,
            "/api/invitations/accept",
            Backend::Public,
            "/invitations/accept",
        )
    },
    // Property users
    ProxyRoute {
        query: &[
            Field::required("propertyId", FieldKind::Identifier),
            Field::required("userId", FieldKind::Identifier),
        ],
        missing_message: Some("Property ID and User ID are required"),
        ..route(
            "property_user_remove",
            HttpMethod::Delete,
            "/api/property-users/remove",
            Backend::Public,
            "/property-users/remove?propertyId={propertyId}&userId={userId}",
        )
    },
    // Stripe metered usage
    ProxyRoute {
        body: &[
            Field::required("action", FieldKind::Text),
            Field::optional("quantity", FieldKind::PositiveInteger),
        ],
        ..route(
            "stripe_increment_usage",
            HttpMethod::Post,
            "/api/stripe/increment-usage",
            Backend::Public,
            "/stripe/increment-usage",
        )
    },
    // Timeline
    ProxyRoute {
        query: &[Field::optional("days", FieldKind::PositiveInteger)],
        forward_query: true,
        ..route(
            "timeline_all",
            HttpMethod::Get,
            "/api/timeline/all",
            Backend::Public,
            "/timeline/all",
        )
    },
    ProxyRoute {
        body: &[
            Field::required("property_id", FieldKind::Identifier),
            Field::required("title", FieldKind::Text),
            Field::required("event_type", FieldKind::Text),
            Field::required("start_date", FieldKind::Text),
            Field::optional("end_date", FieldKind::Text),
        ],
        ..route(
            "timeline_event_create",
            HttpMethod::Post,
            "/api/timeline/events",
            Backend::Public,
            "/timeline/events",
        )
    },
    route(
        "timeline_property_sync",
        HttpMethod::Post,
        "/api/timeline/properties/:propertyId/sync",
        Backend::Public,
        "/timeline/properties/{propertyId}/sync",
    ),
    // Uploads
    route(
        "property_images",
        HttpMethod::Get,
        "/api/upload/property/:propertyId/images",
        Backend::Dedicated,
        "/api/upload/property/{propertyId}/images",
    ),
    // Users
    ProxyRoute {
        target: Target::FirstOf(&[("id", "/users/{id}"), ("email", "/users/lookup?email={email}")]),
        query: &[
            Field::optional("id", FieldKind::Identifier),
            Field::optional("email", FieldKind::Text),
        ],
        missing_message: Some("Email or ID is required"),
        relay: Relay::UnwrapData,
        ..route(
            "user_lookup",
            HttpMethod::Get,
            "/api/users/lookup",
            Backend::Public,
            "/users/lookup",
        )
    },
];

pub fn find(name: &str) -> Option<&'static ProxyRoute> {
    ROUTES.iter().find(|r| r.name == name)
}
