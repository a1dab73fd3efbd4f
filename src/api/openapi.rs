//! OpenAPI documentation and schema generation

use utoipa::OpenApi;

/// OpenAPI documentation for the audiograb REST API
///
/// Served as JSON at `/openapi.json`, and through Swagger UI at `/swagger-ui`
/// when enabled.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "audiograb REST API",
        version = "0.2.0",
        description = "Submit a video URL, poll the job, download the extracted MP3 before it expires",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // Conversion
        crate::api::routes::convert,
        crate::api::routes::get_status,
        crate::api::routes::download,

        // System
        crate::api::routes::service_status,
        crate::api::routes::openapi_spec,
        crate::api::routes::event_stream,
    ),
    components(
        schemas(
            crate::api::routes::ConvertRequest,
            crate::api::routes::ConvertResponse,
            crate::api::routes::ServiceStatus,
            crate::types::JobId,
            crate::types::JobStatus,
            crate::types::JobView,
            crate::types::Event,
            crate::types::StrategyAttempt,
            crate::types::AttemptOutcome,
            crate::types::Capabilities,
            crate::error::ApiError,
            crate::error::ErrorDetail,
        )
    ),
    tags(
        (name = "conversion", description = "Job submission, status and file download"),
        (name = "system", description = "Liveness, event stream and API documentation")
    )
)]
pub struct ApiDoc;
