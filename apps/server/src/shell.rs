//! The single-page frontend's HTML shell, rendered with the current customization plan.

use axum::extract::State;
use axum::http::header;
use axum::response::{Html, IntoResponse};
use folio::features::settings::Settings;
use folio::kernel::server::ApiState;
use folio_customize::{HtmlDocument, apply};
use tracing::{debug, warn};

/// Served when the configured shell file cannot be read.
pub const FALLBACK_SHELL: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Folio</title>
</head>
<body>
<div id="root"></div>
</body>
</html>
"#;

async fn shell_source(state: &ApiState) -> String {
    let path = &state.config.storage.shell;
    match tokio::fs::read_to_string(path).await {
        Ok(source) => source,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "Shell not readable, serving the built-in page");
            FALLBACK_SHELL.to_owned()
        },
    }
}

pub(crate) async fn render_shell(State(state): State<ApiState>) -> impl IntoResponse {
    let source = shell_source(&state).await;
    let mut page = HtmlDocument::parse(&source);

    if state.config.site.customization {
        match state.get_slice::<Settings>() {
            Some(settings) => {
                let plan = settings.current_plan().await;
                apply(&mut page, &plan);
                debug!(blocks = plan.len(), "Shell customized");
            },
            None => warn!("Settings slice missing, shell served without customization"),
        }
    }

    ([(header::CACHE_CONTROL, "no-cache")], Html(page.render()))
}
