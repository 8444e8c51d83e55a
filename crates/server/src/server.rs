use std::{
    any::Any,
    future::{Future, IntoFuture},
    sync::Arc,
    time::{Duration, Instant},
};

use api_types::{ErrorResponse, StatusResponse};
use axum::{
    Json, Router,
    extract::Request,
    http::{Method, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
};
use tokio::sync::oneshot;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any as AnyOrigin, CorsLayer},
};

use crate::transactions;
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

async fn health() -> Json<StatusResponse> {
    Json(StatusResponse::ok())
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started = Instant::now();

    let response = next.run(request).await;

    tracing::info!(
        %method,
        %path,
        status = response.status().as_u16(),
        latency_ms = started.elapsed().as_millis() as u64,
        "request handled"
    );
    response
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = panic.downcast_ref::<String>() {
        message.as_str()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else {
        "unknown panic payload"
    };
    tracing::error!("panic recovered: {detail}");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "internal server error".to_string(),
        }),
    )
        .into_response()
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

pub fn router(state: ServerState) -> Router {
    let api = Router::new()
        .route(
            "/transaction/{id}",
            get(transactions::get).put(transactions::create),
        )
        .route("/types/{type}", get(transactions::by_type))
        .route("/sum/{id}", get(transactions::sum));

    Router::new()
        .route("/health", get(health))
        .nest("/transactionservice", api)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn(log_request))
        .layer(cors())
        .with_state(state)
}

/// Serve until `shutdown` resolves, then drain in-flight requests for at most
/// `grace`.
pub async fn run_with_listener<F>(
    engine: Engine,
    listener: tokio::net::TcpListener,
    shutdown: F,
    grace: Duration,
) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
    };

    let (draining_tx, draining_rx) = oneshot::channel::<()>();
    let signal = async move {
        shutdown.await;
        tracing::info!("shutdown requested, draining connections");
        let _ = draining_tx.send(());
    };
    let deadline = async move {
        if draining_rx.await.is_err() {
            std::future::pending::<()>().await;
        }
        tokio::time::sleep(grace).await;
    };

    let serve = axum::serve(listener, router(state))
        .with_graceful_shutdown(signal)
        .into_future();

    tokio::select! {
        result = serve => {
            if result.is_ok() {
                tracing::info!("Server stopped gracefully");
            }
            result
        }
        () = deadline => Err(std::io::Error::new(
            std::io::ErrorKind::TimedOut,
            format!("graceful shutdown timed out after {grace:?}"),
        )),
    }
}
