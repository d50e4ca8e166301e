use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::MatchedPath;
use dotenvy::dotenv;
use http::HeaderValue;
use tokio::time::{Duration, sleep};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use api::bootstrap::app_context::{AppContext, AppServices};
use api::bootstrap::config::Config;
use api::infrastructure::db::repositories::session_store_sqlx::SqlxSessionStore;
use api::infrastructure::db::repositories::upload_link_repository_sqlx::SqlxUploadLinkRepository;
use api::infrastructure::fileserver::SearpcTokenIssuer;
use api::infrastructure::license::ConfigLicense;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

const SESSION_SWEEP_INTERVAL_SECS: u64 = 60 * 60;

#[derive(OpenApi)]
#[openapi(
        paths(
            api::presentation::http::upload_links::get_file_upload_url_ul,
            api::presentation::http::upload_links::create_upload_link,
            api::presentation::http::upload_links::list_upload_links,
            api::presentation::http::upload_links::delete_upload_link,
            api::presentation::http::upload_links::check_upload_link_password,
            api::presentation::http::upload_links::set_anonymous_email,
            api::presentation::http::health::health,
        ),
        components(schemas(
            api::presentation::http::upload_links::UploadUrlResponse,
            api::presentation::http::upload_links::CreateUploadLinkBody,
            api::presentation::http::upload_links::UploadLinkItem,
            api::presentation::http::upload_links::PasswordBody,
            api::presentation::http::upload_links::AnonymousEmailBody,
            api::presentation::http::upload_links::SuccessResponse,
            api::presentation::http::error::ErrorResponse,
            api::presentation::http::health::HealthResp,
        )),
        tags(
            (name = "Upload Links", description = "Upload-only share links and their upload URLs"),
            (name = "Health", description = "System health checks")
        )
    )]
struct ApiDoc;

fn allowed_methods() -> [http::Method; 4] {
    [
        http::Method::GET,
        http::Method::POST,
        http::Method::DELETE,
        http::Method::OPTIONS,
    ]
}

fn allowed_headers() -> [http::HeaderName; 3] {
    [
        http::header::CONTENT_TYPE,
        http::header::AUTHORIZATION,
        http::HeaderName::from_static("x-requested-with"),
    ]
}

fn build_cors(cfg: &Config) -> CorsLayer {
    let origin = match cfg.frontend_url.as_deref().map(HeaderValue::from_str) {
        Some(Ok(v)) => AllowOrigin::exact(v),
        Some(Err(_)) | None if cfg.is_production => {
            // No usable FRONTEND_URL in production: deny cross-origin calls
            AllowOrigin::exact(HeaderValue::from_static("http://invalid"))
        }
        _ => AllowOrigin::mirror_request(),
    };
    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(allowed_methods())
        .allow_headers(allowed_headers())
        .allow_credentials(true)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "api=debug,axum=info,tower_http=info".into()),
        )
        .init();

    let cfg = Config::from_env()?;
    info!(
        api_port = cfg.api_port,
        site_root = %cfg.site_root,
        file_server_root = %cfg.file_server_root,
        pro = cfg.is_pro_version,
        upload_link_virus_check = cfg.enable_upload_link_virus_check,
        "Starting upload link service"
    );

    // Database
    let pool = api::infrastructure::db::connect_pool(&cfg.database_url).await?;
    api::infrastructure::db::migrate(&pool).await?;

    let upload_link_repo = Arc::new(SqlxUploadLinkRepository::new(pool.clone()));
    let session_store = Arc::new(SqlxSessionStore::new(pool.clone()));
    let token_issuer = Arc::new(SearpcTokenIssuer::new(
        &cfg.seafile_rpc_url,
        cfg.seafile_rpc_secret.clone(),
        cfg.fileserver_rpc_timeout_secs,
    )?);
    let license = Arc::new(ConfigLicense {
        pro: cfg.is_pro_version,
    });

    let services = AppServices::new(
        upload_link_repo,
        session_store.clone(),
        token_issuer,
        license,
    );
    let ctx = AppContext::new(cfg.clone(), services);

    let app = Router::new()
        .nest(
            "/api",
            api::presentation::http::health::routes(pool.clone()),
        )
        .merge(api::presentation::http::upload_links::routes(ctx.clone()))
        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", ApiDoc::openapi()))
        .layer(build_cors(&cfg))
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &http::Request<_>| {
                let method = req.method().clone();
                let uri = req.uri().clone();
                let matched = req
                    .extensions()
                    .get::<MatchedPath>()
                    .map(|p| p.as_str().to_string())
                    .unwrap_or_default();
                tracing::info_span!("http", %method, %uri, matched_path = %matched)
            }),
        );

    // Expired session rows are never read back, only swept
    tokio::spawn(async move {
        let interval = Duration::from_secs(SESSION_SWEEP_INTERVAL_SECS);
        loop {
            match session_store.clear_expired().await {
                Ok(n) if n > 0 => tracing::debug!(removed = n, "expired_sessions_cleared"),
                Ok(_) => {}
                Err(e) => tracing::error!(error = ?e, "session_sweep_failed"),
            }
            sleep(interval).await;
        }
    });

    let api_addr = SocketAddr::from(([0, 0, 0, 0], cfg.api_port));
    info!(%api_addr, "HTTP API listening");
    let listener = tokio::net::TcpListener::bind(api_addr).await?;

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
    {
        error!(?e, "API server failed");
        return Err(e.into());
    }
    Ok(())
}
