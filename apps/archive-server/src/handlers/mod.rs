//! HTTP handlers and route configuration.

mod archive;
mod health;
mod home;
mod view;
mod write;

use actix_web::error::JsonPayloadError;
use actix_web::web;

use crate::middleware::error::AppError;
use crate::state::AppState;

#[cfg(feature = "rate-limit")]
use crate::middleware::rate_limit::RateLimitMiddleware;

/// Room for a form whose `imageUrl` embeds the largest accepted image.
fn json_limit(max_image_bytes: usize) -> usize {
    max_image_bytes.saturating_mul(2).saturating_add(1024 * 1024)
}

fn json_config(max_image_bytes: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(json_limit(max_image_bytes))
        .error_handler(|err, _req| {
            let app_error = match &err {
                JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
                    AppError::PayloadTooLarge(err.to_string())
                }
                _ => AppError::BadRequest(err.to_string()),
            };
            app_error.into()
        })
}

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig, state: &AppState) {
    let assistant = web::scope("/{group_id}")
        .route("/prompt", web::post().to(write::prompt))
        .route("/polish", web::post().to(write::polish));

    #[cfg(feature = "rate-limit")]
    let assistant = assistant.wrap(RateLimitMiddleware::new(
        state.rate_limiter.clone(),
        state.trust_proxy_headers,
    ));

    cfg.service(
        web::scope("/api")
            .app_data(json_config(state.max_image_bytes))
            .route("/health", web::get().to(health::health_check))
            .route("/home", web::get().to(home::home))
            .route("/groups", web::get().to(home::groups))
            .route("/archive/{group_id}", web::get().to(archive::list_posts))
            .service(
                web::scope("/write")
                    .route("/{group_id}", web::get().to(write::open))
                    .route("/{group_id}", web::post().to(write::submit))
                    .route("/{group_id}/draft", web::put().to(write::save_draft))
                    .route("/{group_id}/draft", web::delete().to(write::discard_draft))
                    .route("/{group_id}/format", web::post().to(write::format))
                    .service(
                        web::resource("/{group_id}/image")
                            .app_data(web::PayloadConfig::new(state.max_image_bytes + 1))
                            .route(web::post().to(write::upload_image)),
                    )
                    .service(assistant),
            )
            .route("/view/{post_id}", web::get().to(view::get_post))
            .route("/view/{post_id}", web::delete().to(view::delete_post)),
    );
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use pokshin_infra::{DisabledAssistant, InMemoryStore};

    use crate::config::AppConfig;
    use crate::state::AppState;

    /// Ephemeral state with no assistant credentials.
    pub async fn test_state() -> AppState {
        AppState::with_parts(
            Arc::new(InMemoryStore::new()),
            Arc::new(DisabledAssistant),
            &AppConfig::for_tests(),
        )
        .await
    }

    /// Full route table over the given state.
    macro_rules! init_app {
        ($state:expr) => {{
            let state: $crate::state::AppState = $state;
            let routes = state.clone();
            actix_web::test::init_service(
                actix_web::App::new()
                    .app_data(actix_web::web::Data::new(state))
                    .configure(move |cfg| $crate::handlers::configure_routes(cfg, &routes)),
            )
            .await
        }};
    }

    macro_rules! get_json {
        ($app:expr, $uri:expr) => {{
            let req = actix_web::test::TestRequest::get().uri($uri).to_request();
            let body: serde_json::Value = actix_web::test::call_and_read_body_json($app, req).await;
            body
        }};
    }

    pub(crate) use {get_json, init_app};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_limit_fits_encoded_image() {
        let max = 5 * 1024 * 1024;
        assert!(json_limit(max) > max / 3 * 4 + 1024);
        assert_eq!(json_limit(usize::MAX), usize::MAX);
    }
}
