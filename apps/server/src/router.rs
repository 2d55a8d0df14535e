use crate::shell::render_shell;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, header};
use axum::routing::{any, get};
use axum::{Json, Router};
use folio::domain::constants::{TAG_AUTH, TAG_CONFIG, TAG_IMAGES, TAG_LEADS, TAG_PROJECTS, TAG_SITE, TAG_SYSTEM};
use folio::kernel::server::ApiState;
use folio::kernel::server::router::api_not_found;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::warn;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable};

const DOCS_PATH: &str = "/api/docs";
const OPENAPI_PATH: &str = "/api/openapi.json";

#[derive(OpenApi)]
#[openapi(
    info(title = "Folio API", description = "Portfolio content and runtime site customization"),
    modifiers(&BearerAuth),
    tags(
        (name = TAG_SYSTEM), (name = TAG_AUTH), (name = TAG_PROJECTS), (name = TAG_LEADS),
        (name = TAG_CONFIG), (name = TAG_IMAGES), (name = TAG_SITE),
    ),
)]
struct ApiDoc;

/// Registers the `bearer_auth` scheme referenced by protected handlers.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build()),
        );
    }
}

fn cors(origins: &[String]) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            HeaderValue::from_str(origin.trim())
                .inspect_err(|_| warn!(origin = %origin, "Ignoring invalid CORS origin"))
                .ok()
        })
        .collect();
    if origins.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true),
    )
}

pub(crate) fn init(state: ApiState) -> Router {
    let cfg = state.config.clone();

    let (api_routes, api_doc) =
        OpenApiRouter::with_openapi(ApiDoc::openapi()).merge(folio::api_router()).split_for_parts();

    let scalar_routes = Scalar::with_url(DOCS_PATH, api_doc.clone());
    let spec_route = get(move || async move { Json(api_doc) });

    // Asset requests that miss fall through to the rendered shell so client-side routes work.
    let frontend = ServeDir::new(&cfg.storage.static_dir)
        .append_index_html_on_directories(false)
        .fallback(get(render_shell).with_state(state.clone()));

    let mut app = Router::new()
        .merge(api_routes)
        .route(OPENAPI_PATH, spec_route)
        .route("/api", any(api_not_found))
        .route("/api/{*rest}", any(api_not_found))
        .route("/", get(render_shell))
        .route("/index.html", get(render_shell))
        .with_state(state)
        .merge(scalar_routes)
        .fallback_service(frontend)
        .layer(DefaultBodyLimit::max(cfg.server.body_limit_bytes))
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = cors(&cfg.server.cors_origins) {
        app = app.layer(cors);
    }
    app
}
