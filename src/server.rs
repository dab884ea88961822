//! Webhook HTTP surface.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode};
use axum::routing::any;
use axum::Router;
use tower_http::trace::{self, TraceLayer};
use tracing::{debug, error, Level};

use crate::bot::dispatcher::{DispatchStatus, Dispatcher};
use crate::bot::services::link_info::Enricher;
use crate::bot::services::status_store::StatusBackend;
use crate::bot::services::telegram_api::Gateway;
use crate::bot::update::InboundUpdate;

pub const WEBHOOK_PATH: &str = "/api/webhook";

const LOGGED_BODY_CHARS: usize = 3000;

/// `dispatcher` is `None` when the bot credential or owner are not
/// configured; every delivery is then refused.
pub struct AppState<B, G, E> {
    dispatcher: Option<Arc<Dispatcher<B, G, E>>>,
}

impl<B, G, E> AppState<B, G, E> {
    pub fn new(dispatcher: Option<Arc<Dispatcher<B, G, E>>>) -> Self {
        Self { dispatcher }
    }
}

impl<B, G, E> Clone for AppState<B, G, E> {
    fn clone(&self) -> Self {
        Self {
            dispatcher: self.dispatcher.clone(),
        }
    }
}

pub fn router<B, G, E>(state: AppState<B, G, E>) -> Router
where
    B: StatusBackend + 'static,
    G: Gateway + 'static,
    E: Enricher + 'static,
{
    Router::new()
        .route(WEBHOOK_PATH, any(webhook::<B, G, E>))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new().level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new().level(Level::INFO)),
        )
}

async fn webhook<B, G, E>(
    State(state): State<AppState<B, G, E>>,
    method: Method,
    body: Bytes,
) -> (StatusCode, &'static str)
where
    B: StatusBackend + 'static,
    G: Gateway + 'static,
    E: Enricher + 'static,
{
    if method != Method::POST {
        return (StatusCode::OK, "Bot Active");
    }

    let logged: String = String::from_utf8_lossy(&body)
        .chars()
        .take(LOGGED_BODY_CHARS)
        .collect();
    debug!("Webhook update: {logged}");

    let update = match InboundUpdate::from_slice(&body) {
        Ok(v) => v,
        Err(err) => {
            error!("Cannot parse an update: {err}");
            return (StatusCode::OK, "error");
        }
    };

    let dispatcher = match &state.dispatcher {
        Some(v) => v,
        None => {
            error!("Missing BOT_TOKEN or OWNER_CHAT_ID");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Server not configured");
        }
    };

    let update = match update {
        Some(v) => v,
        None => return (StatusCode::OK, "OK"),
    };

    if dispatcher.handle(&update).await.status == DispatchStatus::Degraded {
        debug!("Update handled in degraded mode");
    }

    (StatusCode::OK, "OK")
}
