use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use http::{HeaderMap, HeaderValue};
use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
    time::Instant,
};
use tempus_core::{
    config::ServerTimingConfig,
    context,
    header::SERVER_TIMING,
    timing::Timing,
};
use tower::{Layer, Service};
use tracing::Span;

/// A layer which binds a fresh timing scope to every request
/// and injects the `Server-Timing` header into its response.
#[derive(Debug, Clone, Default)]
pub struct ServerTimingLayer {
    /// Shared settings.
    config: Arc<ServerTimingConfig>,
}

impl ServerTimingLayer {
    /// Creates a new instance with the default settings.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new instance with the settings.
    #[inline]
    pub fn from_config(config: ServerTimingConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

impl<S> Layer<S> for ServerTimingLayer {
    type Service = ServerTimingService<S>;

    #[inline]
    fn layer(&self, inner: S) -> Self::Service {
        ServerTimingService {
            inner,
            config: self.config.clone(),
        }
    }
}

/// A service created by [`ServerTimingLayer`].
#[derive(Debug, Clone)]
pub struct ServerTimingService<S> {
    /// Inner service.
    inner: S,
    /// Shared settings.
    config: Arc<ServerTimingConfig>,
}

impl<S, ReqBody, ResBody> Service<http::Request<ReqBody>> for ServerTimingService<S>
where
    S: Service<http::Request<ReqBody>, Response = http::Response<ResBody>>,
    S::Error: Send + 'static,
    S::Future: Send + 'static,
    ResBody: Send + 'static,
{
    type Response = http::Response<ResBody>;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    #[inline]
    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: http::Request<ReqBody>) -> Self::Future {
        if !self.config.instruments_path(req.uri().path()) {
            return Box::pin(self.inner.call(req));
        }

        let config = self.config.clone();
        let timing = Timing::new();
        let start_time = Instant::now();
        let inner = &mut self.inner;
        let future = context::run_sync(timing.clone(), || inner.call(req));
        Box::pin(async move {
            let mut res = context::run(timing.clone(), future).await?;
            inject_server_timing(&config, &timing, start_time, res.headers_mut());
            Ok(res)
        })
    }
}

/// A middleware for [`axum::middleware::from_fn`] with the default settings.
///
/// Use [`server_timing_middleware_with_config`] or [`ServerTimingLayer::from_config`]
/// to skip paths or record the total time.
#[inline]
pub async fn server_timing_middleware(req: Request, next: Next) -> Response {
    instrument(&ServerTimingConfig::default(), req, next).await
}

/// A middleware for [`axum::middleware::from_fn_with_state`] with the shared settings.
#[inline]
pub async fn server_timing_middleware_with_config(
    State(config): State<Arc<ServerTimingConfig>>,
    req: Request,
    next: Next,
) -> Response {
    instrument(&config, req, next).await
}

/// Runs the rest of the middleware stack inside a fresh timing scope.
async fn instrument(config: &ServerTimingConfig, req: Request, next: Next) -> Response {
    if !config.instruments_path(req.uri().path()) {
        return next.run(req).await;
    }

    let timing = Timing::new();
    let start_time = Instant::now();
    let mut res = context::run(timing.clone(), next.run(req)).await;
    inject_server_timing(config, &timing, start_time, res.headers_mut());
    res
}

/// Serializes the timing entries into a new `server-timing` header line.
/// Values set by the handler are kept as they are.
fn inject_server_timing(
    config: &ServerTimingConfig,
    timing: &Timing,
    start_time: Instant,
    headers: &mut HeaderMap,
) {
    if config.record_total() {
        let duration = start_time.elapsed();
        timing.with_scope(|scope| {
            let entry = scope.entry(config.total_metric().to_owned());
            entry.set_duration(duration);
            if let Some(description) = config.total_description() {
                entry.set_desc(description.to_owned());
            }
        });
    }

    let server_timing = timing.header_value();
    if server_timing.is_empty() {
        return;
    }

    match HeaderValue::try_from(server_timing.as_str()) {
        Ok(value) => {
            Span::current().record("http.response.header.server_timing", server_timing.as_str());
            headers.append(SERVER_TIMING, value);
        }
        Err(err) => {
            tracing::warn!(
                server_timing,
                "fail to convert the server timing into a header value: {err}"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ServerTimingLayer, server_timing_middleware, server_timing_middleware_with_config,
    };
    use axum::{
        Router,
        body::Body,
        http::{
            Request, StatusCode,
            header::{HeaderMap, HeaderValue},
        },
        middleware::{from_fn, from_fn_with_state},
        response::IntoResponse,
        routing::get,
    };
    use std::{sync::Arc, time::Duration};
    use tempus_core::{config::ServerTimingConfig, context};
    use tower::ServiceExt;

    async fn query_products() -> &'static str {
        let _guard = context::timing().start("db").with_desc("query");
        tokio::time::sleep(Duration::from_millis(2)).await;
        "products"
    }

    async fn render_page() -> impl IntoResponse {
        context::timing().set_dur("render", 3.5);
        (
            [("server-timing", HeaderValue::from_static("cdn;desc=\"hit\""))],
            "page",
        )
    }

    async fn render_from_edge() -> impl IntoResponse {
        context::timing().set_dur("render", 1.0);
        let mut headers = HeaderMap::new();
        headers.append("server-timing", HeaderValue::from_static("cdn;desc=\"hit\""));
        headers.append("server-timing", HeaderValue::from_static("edge;dur=4"));
        (headers, "edge")
    }

    async fn health() -> StatusCode {
        context::timing().set_dur("health", 1.0);
        StatusCode::OK
    }

    fn app(config: ServerTimingConfig) -> Router {
        Router::new()
            .route("/products", get(query_products))
            .route("/page", get(render_page))
            .route("/edge", get(render_from_edge))
            .route("/health", get(health))
            .layer(ServerTimingLayer::from_config(config))
    }

    fn server_timing_values(res: &axum::response::Response) -> Vec<&str> {
        res.headers()
            .get_all("server-timing")
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect()
    }

    fn server_timing(res: &axum::response::Response) -> Option<&str> {
        res.headers()
            .get("server-timing")
            .and_then(|v| v.to_str().ok())
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn it_injects_server_timing_header() {
        let res = app(ServerTimingConfig::new())
            .oneshot(get_request("/products"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let server_timing = server_timing(&res).unwrap_or_default();
        assert!(server_timing.starts_with("db;dur="));
        assert!(server_timing.ends_with(";desc=\"query\""));
    }

    #[tokio::test]
    async fn it_appends_to_existing_header_and_records_total() {
        let config = ServerTimingConfig::new().with_total("total");
        let res = app(config).oneshot(get_request("/page")).await.unwrap();
        let values = server_timing_values(&res);
        assert_eq!(values.len(), 2);
        assert_eq!(values[0], "cdn;desc=\"hit\"");
        assert!(values[1].starts_with("render;dur=3.5, total;dur="));
    }

    #[tokio::test]
    async fn it_keeps_every_handler_value() {
        let res = app(ServerTimingConfig::new())
            .oneshot(get_request("/edge"))
            .await
            .unwrap();
        assert_eq!(
            server_timing_values(&res),
            ["cdn;desc=\"hit\"", "edge;dur=4", "render;dur=1"],
        );

        let app = Router::new()
            .route("/edge", get(render_from_edge))
            .layer(from_fn(server_timing_middleware));
        let res = app.oneshot(get_request("/edge")).await.unwrap();
        assert_eq!(
            server_timing_values(&res),
            ["cdn;desc=\"hit\"", "edge;dur=4", "render;dur=1"],
        );
    }

    #[tokio::test]
    async fn it_applies_config_in_middleware_fn() {
        let config = ServerTimingConfig::parse_toml(
            r#"
            [server-timing]
            record-total = true
            skip-paths = ["/health"]
            "#,
        )
        .unwrap();
        let app = Router::new()
            .route("/page", get(render_page))
            .route("/health", get(health))
            .layer(from_fn_with_state(
                Arc::new(config),
                server_timing_middleware_with_config,
            ));

        let res = app.clone().oneshot(get_request("/health")).await.unwrap();
        assert!(server_timing_values(&res).is_empty());

        let res = app.oneshot(get_request("/page")).await.unwrap();
        let values = server_timing_values(&res);
        assert_eq!(values.len(), 2);
        assert!(values[1].starts_with("render;dur=3.5, total;dur="));
    }

    #[tokio::test]
    async fn it_skips_configured_paths() {
        let config = ServerTimingConfig::parse_toml(
            r#"
            [server-timing]
            skip-paths = ["/health"]
            "#,
        )
        .unwrap();
        let res = app(config).oneshot(get_request("/health")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(server_timing(&res), None);
    }

    #[tokio::test]
    async fn it_isolates_concurrent_requests() {
        let app = Router::new()
            .route(
                "/{name}",
                get(|axum::extract::Path(name): axum::extract::Path<String>| async move {
                    for i in 0..3 {
                        context::timing().set_dur(format!("{name}{i}"), f64::from(i));
                        tokio::time::sleep(Duration::from_millis(1)).await;
                    }
                    StatusCode::OK
                }),
            )
            .layer(from_fn(server_timing_middleware));
        let (a, b) = tokio::join!(
            app.clone().oneshot(get_request("/a")),
            app.clone().oneshot(get_request("/b")),
        );
        let (a, b) = (a.unwrap(), b.unwrap());
        assert_eq!(server_timing(&a), Some("a0;dur=0, a1;dur=1, a2;dur=2"));
        assert_eq!(server_timing(&b), Some("b0;dur=0, b1;dur=1, b2;dur=2"));
    }
}
