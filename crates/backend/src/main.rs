mod config;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::http::HeaderValue;
use axum::{extract::State, response::Html, routing::get, Router};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::ServerConfig;

const CACHE_1DAY: &str = "public, max-age=86400, must-revalidate";
const CACHE_IMMUTABLE: &str = "public, max-age=31536000, immutable";

const FALLBACK_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>FRA Atlas</title></head>
<body>
<h1>FRA Atlas</h1>
<p>Frontend not built yet. Run <code>dx bundle</code> in <code>crates/frontend</code> and point <code>DIST_DIR</code> at the output.</p>
</body>
</html>"#;

#[derive(Clone)]
struct AppState {
    index_path: Arc<PathBuf>,
}

/// Build a cache-controlled static file router.
///
/// Separated so tests can exercise the caching layer with arbitrary directories.
fn cached_static_router(dir: &Path, cache_header: &'static str) -> Router {
    let layer = SetResponseHeaderLayer::overriding(
        axum::http::header::CACHE_CONTROL,
        HeaderValue::from_static(cache_header),
    );
    Router::new()
        .fallback_service(ServeDir::new(dir))
        .layer(layer)
}

/// Build the full application router.
///
/// Any path not claimed by a static mount gets the app shell so client-side
/// routes survive a reload.
fn build_app(config: &ServerConfig) -> Router {
    let state = AppState {
        index_path: Arc::new(config.index_path()),
    };

    let static_files = Router::new()
        .nest(
            "/static",
            cached_static_router(&config.assets_dir, CACHE_1DAY),
        )
        .nest(
            "/assets",
            cached_static_router(&config.dist_dir.join("assets"), CACHE_IMMUTABLE),
        );

    Router::new()
        .route("/", get(serve_index))
        .fallback(serve_index)
        .with_state(state)
        .merge(static_files)
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}

async fn serve_index(State(state): State<AppState>) -> Html<String> {
    match tokio::fs::read_to_string(state.index_path.as_path()).await {
        Ok(html) => Html(html),
        Err(e) => {
            tracing::debug!(path = %state.index_path.display(), error = %e, "index not found, serving fallback page");
            Html(FALLBACK_PAGE.to_string())
        }
    }
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();
    let app = build_app(&config);

    tracing::info!(
        dist = %config.dist_dir.display(),
        assets = %config.assets_dir.display(),
        "serving frontend bundle"
    );
    tracing::info!("Server running at http://localhost:{}", config.port);

    let listener = tokio::net::TcpListener::bind(config.addr()).await?;
    axum::serve(listener, app).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    struct Dirs {
        dist: tempfile::TempDir,
        assets: tempfile::TempDir,
    }

    impl Dirs {
        fn config(&self) -> ServerConfig {
            ServerConfig {
                port: 0,
                dist_dir: self.dist.path().to_path_buf(),
                assets_dir: self.assets.path().to_path_buf(),
            }
        }
    }

    /// A built bundle with an index page and one hashed asset, plus a static dir.
    fn built_dirs() -> Dirs {
        let dist = tempfile::tempdir().unwrap();
        std::fs::write(dist.path().join("index.html"), "<html>atlas</html>").unwrap();
        std::fs::create_dir(dist.path().join("assets")).unwrap();
        std::fs::write(dist.path().join("assets/app-abc123.js"), "bundle()").unwrap();
        let assets = tempfile::tempdir().unwrap();
        std::fs::write(assets.path().join("claims.geojson"), "{}").unwrap();
        Dirs { dist, assets }
    }

    async fn get(app: Router, uri: &str) -> axum::response::Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_text(resp: axum::response::Response) -> String {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_static_files_have_1day_cache() {
        let dirs = built_dirs();
        let resp = get(build_app(&dirs.config()), "/static/claims.geojson").await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("cache-control").unwrap(),
            "public, max-age=86400, must-revalidate"
        );
    }

    #[tokio::test]
    async fn test_bundle_assets_have_immutable_cache() {
        let dirs = built_dirs();
        let resp = get(build_app(&dirs.config()), "/assets/app-abc123.js").await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("cache-control").unwrap(),
            "public, max-age=31536000, immutable"
        );
    }

    #[tokio::test]
    async fn test_missing_static_file_returns_404() {
        let dirs = built_dirs();
        let resp = get(build_app(&dirs.config()), "/static/nonexistent.txt").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_root_serves_built_index() {
        let dirs = built_dirs();
        let resp = get(build_app(&dirs.config()), "/").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().get("cache-control").is_none());
        assert_eq!(body_text(resp).await, "<html>atlas</html>");
    }

    #[tokio::test]
    async fn test_unknown_paths_fall_back_to_index() {
        let dirs = built_dirs();
        let resp = get(build_app(&dirs.config()), "/state/odisha").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_text(resp).await, "<html>atlas</html>");
    }

    #[tokio::test]
    async fn test_fallback_page_when_not_built() {
        let dirs = Dirs {
            dist: tempfile::tempdir().unwrap(),
            assets: tempfile::tempdir().unwrap(),
        };
        let resp = get(build_app(&dirs.config()), "/").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_text(resp).await.contains("Frontend not built yet"));
    }

    #[tokio::test]
    async fn test_cors_is_permissive() {
        let dirs = built_dirs();
        let resp = build_app(&dirs.config())
            .oneshot(
                Request::builder()
                    .uri("/static/claims.geojson")
                    .header("origin", "https://example.org")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            resp.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
    }
}
