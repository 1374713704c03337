//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the JSON endpoints, their schemas and the session
//! cookie security scheme. Swagger UI serves it at `/docs` in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::error::ErrorDto;
use crate::domain::{
    ErrorCode, SecondaryEntry, SecondaryEntryDraft, SessionClaims, StoredAttachment,
    SubmissionDraft, SubmissionDto,
};
use crate::inbound::http::auth::{LoginRequest, MessageResponse, RegisterRequest, SessionResponse};
use crate::inbound::http::data::{DaysResponse, SavedResponse};
use crate::inbound::http::health::StoreHealth;

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Encrypted session cookie issued by POST /api/auth/login.",
            ))),
        );
    }
}

/// OpenAPI document for the JSON API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Daybook API",
        description = "Record labelled time blocks per day, with optional attachments."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::current_session,
        crate::inbound::http::auth::sign_in,
        crate::inbound::http::auth::callback,
        crate::inbound::http::data::list_submissions,
        crate::inbound::http::data::create_submission,
        crate::inbound::http::uploads::upload,
        crate::inbound::http::uploads::download,
        crate::inbound::http::health::store_health,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorDto,
        ErrorCode,
        SessionClaims,
        RegisterRequest,
        LoginRequest,
        MessageResponse,
        SessionResponse,
        SubmissionDraft,
        SecondaryEntryDraft,
        SubmissionDto,
        SecondaryEntry,
        DaysResponse,
        SavedResponse,
        StoredAttachment,
        StoreHealth,
    )),
    tags(
        (name = "auth", description = "Registration, login and federated sign-in"),
        (name = "data", description = "Recorded days"),
        (name = "uploads", description = "Attachment storage"),
        (name = "health", description = "Health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn object_fields(doc: &utoipa::openapi::OpenApi, name: &str) -> Vec<String> {
        let schemas = &doc.components.as_ref().expect("components").schemas;
        match schemas.get(name).unwrap_or_else(|| panic!("{name} schema registered")) {
            RefOr::T(Schema::Object(obj)) => obj.properties.keys().cloned().collect(),
            _ => panic!("{name} should be an object schema"),
        }
    }

    #[rstest]
    fn error_schema_uses_wire_names() {
        let fields = object_fields(&ApiDoc::openapi(), "Error");
        for field in ["code", "message", "error", "traceId"] {
            assert!(fields.iter().any(|f| f == field), "missing {field}");
        }
    }

    #[rstest]
    fn submission_schema_uses_snake_case_columns() {
        let fields = object_fields(&ApiDoc::openapi(), "SubmissionDto");
        for field in ["label_one", "dynamic_fields", "file_url", "created_at"] {
            assert!(fields.iter().any(|f| f == field), "missing {field}");
        }
    }

    #[rstest]
    fn documents_api_paths() {
        let doc = ApiDoc::openapi();
        for path in ["/api/data", "/api/auth/register", "/api/uploads", "/health/ready"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
