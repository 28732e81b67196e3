use crate::config::ServerConfig;
use crate::error::Result;
use axum::http::StatusCode;
use axum::{response::IntoResponse, routing::get, Router};
use futures::FutureExt;
use langs_app::rest_api::LANGUAGES_PATH;
use langs_app::state::AppState;
use tower_http::trace::TraceLayer;
use tracing::info;

pub async fn run(args: ServerConfig) -> Result<()> {
    let state = build_state(&args).await?;
    run_with_state(args, state).await
}

pub async fn run_with_state(args: ServerConfig, state: AppState) -> Result<()> {
    let shutdown = tokio::signal::ctrl_c().map(|_| ());
    run_graceful_with_state(args, state, shutdown).await
}

pub async fn run_graceful_with_state<S>(
    args: ServerConfig,
    state: AppState,
    shutdown_signal: S,
) -> Result<()>
where
    S: std::future::Future<Output = ()> + Send + 'static,
{
    let mut app = main_router(state);

    if args.cors {
        app = app.layer(tower_http::cors::CorsLayer::very_permissive());
    }
    app = app.layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(args.listen_addr()?).await?;
    info!("Servidor corriendo en http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server stopped");
    Ok(())
}

#[cfg(feature = "openapi")]
fn api_docs() -> utoipa::openapi::OpenApi {
    #[derive(utoipa::OpenApi)]
    #[openapi(info(
        title = "Languages API",
        description = "Catalogue of programming languages"
    ))]
    struct OpenApi;

    use utoipa::OpenApi as _;
    OpenApi::openapi().nest(LANGUAGES_PATH, langs_app::rest_api::language::api_docs())
}

pub fn main_router(state: AppState) -> Router<()> {
    #[allow(unused_mut)]
    let mut router = Router::new()
        .nest(LANGUAGES_PATH, langs_app::rest_api::language::router())
        .with_state(state)
        .route("/health", get(health));

    #[cfg(feature = "openapi")]
    {
        let docs = api_docs();
        router = router.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", docs),
        );
    }
    router
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

pub async fn build_state(config: &ServerConfig) -> Result<AppState> {
    let pool = langs_dal::new_pool(&config.database_url, config.max_connections).await?;
    if config.init_schema {
        langs_dal::init_schema(&pool).await?;
        info!("Database schema is ready");
    }
    Ok(AppState::new(pool))
}
