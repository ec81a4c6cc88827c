use axum::{
    extract::{rejection::JsonRejection, Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use coplay_engine::{
    app::{FRIEND_LIST_TIMEOUT, PRIVATE_FRIEND_LIST},
    providers::Fixture,
    ranking::{retain_displayable, sort_friends},
    CoplayEngine, EngineConfig, EngineError, GameCandidate, IntersectRequest, IntersectResponse, RankedList,
    RankingContext, Ranker, SteamUser, TierRanker,
};

#[derive(Clone)]
struct AppState {
    engine: Arc<CoplayEngine>,
    config: EngineConfig,
}

#[derive(Debug, Deserialize)]
struct RankRequest {
    group_size: usize,
    #[serde(default)]
    games: Vec<GameCandidate>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "coplay_server=debug,coplay_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let fixture_path = std::env::var("FIXTURE_PATH").unwrap_or_else(|_| "fixture.json".to_string());
    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8090);
    let config = EngineConfig::from_env()?;

    tracing::info!("🚀 Starting Coplay Server");
    tracing::info!("📦 Fixture: {}", fixture_path);
    tracing::info!("🔌 Port: {}", port);
    tracing::info!("👥 Group size: {}-{}", config.min_group_size, config.max_group_size);

    let (library, catalog, friends) = Fixture::load(&fixture_path)?.into_providers(config.zero_encoding());
    let engine = CoplayEngine::new(Arc::new(library), Arc::new(catalog), config)?.with_friends(Arc::new(friends));

    let state = AppState {
        engine: Arc::new(engine),
        config,
    };

    let addr = format!("0.0.0.0:{}", port);
    tracing::info!("🎮 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/v1/rank", post(rank_handler))
        .route("/api/v1/friends/:steam_id", get(friends_handler))
        .route("/api/v1/intersect_owned_games", post(intersect_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: coplay_engine::VERSION.to_string(),
    })
}

async fn rank_handler(
    State(state): State<AppState>,
    body: Result<Json<RankRequest>, JsonRejection>,
) -> Result<Json<RankedList>, AppError> {
    let Json(req) = body?;

    let encoding = state.config.zero_encoding();
    let games = req.games.into_iter().map(|g| g.normalized(encoding)).collect();

    let list = TierRanker::new().rank(games, RankingContext::new(req.group_size));
    tracing::info!("✅ {}", list.display());

    Ok(Json(list))
}

/// Friends of `steam_id` the picker can show, in display order
async fn friends_handler(
    State(state): State<AppState>,
    Path(steam_id): Path<u64>,
) -> Result<Json<Vec<SteamUser>>, AppError> {
    let mut friends = state.engine.friends(steam_id).await?;
    retain_displayable(&mut friends);
    sort_friends(&mut friends);

    Ok(Json(friends))
}

/// Always 200; failures are carried in `errcode`
async fn intersect_handler(
    State(state): State<AppState>,
    body: Result<Json<IntersectRequest>, JsonRejection>,
) -> Json<IntersectResponse> {
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => {
            tracing::warn!("Rejected intersect request: {}", rejection.body_text());
            return Json(IntersectResponse::bad_request());
        }
    };

    tracing::debug!("Intersect request: {:?}", req);

    Json(state.engine.respond(&req.steamids, req.include_free_games).await)
}

// Error handling
struct AppError(EngineError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self.0 {
            EngineError::Other(message) => (StatusCode::BAD_REQUEST, message),
            EngineError::PrivateFriendsList(_) => (StatusCode::FORBIDDEN, PRIVATE_FRIEND_LIST.to_string()),
            EngineError::Timeout { .. } => (StatusCode::GATEWAY_TIMEOUT, FRIEND_LIST_TIMEOUT.to_string()),
            e => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        };

        tracing::error!("❌ Error: {} - {}", status, message);

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self(EngineError::Other(rejection.body_text()))
    }
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        Self(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, extract::FromRequest, http::Request};
    use coplay_engine::providers::{MemoryCatalog, MemoryFriends, MemoryLibrary};

    fn state() -> AppState {
        let config = EngineConfig::default();
        let library = MemoryLibrary::new().with_library(1, [10]).with_library(2, [10]);
        let catalog = MemoryCatalog::new([GameCandidate::new(10, "Ten", coplay_engine::PlayerCount::Known(2))]);
        let friends = MemoryFriends::new().with_private(1);
        let engine = CoplayEngine::new(Arc::new(library), Arc::new(catalog), config)
            .unwrap()
            .with_friends(Arc::new(friends));

        AppState { engine: Arc::new(engine), config }
    }

    async fn intersect(body: &str) -> IntersectResponse {
        let request = Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let extracted = Json::<IntersectRequest>::from_request(request, &()).await;

        let Json(response) = intersect_handler(State(state()), extracted).await;
        response
    }

    #[tokio::test]
    async fn test_intersect_ok() {
        let response = intersect(r#"{"steamids": ["1", 2]}"#).await;
        assert_eq!(response.errcode(), 0);
    }

    #[tokio::test]
    async fn test_bad_steam_id_is_errcode_failure() {
        let response = intersect(r#"{"steamids": ["abc", 2]}"#).await;
        assert_eq!(response, IntersectResponse::bad_request());
    }

    #[tokio::test]
    async fn test_malformed_body_is_errcode_failure() {
        assert_eq!(intersect("not json").await, IntersectResponse::bad_request());
        assert_eq!(intersect(r#"{"users": [1, 2]}"#).await, IntersectResponse::bad_request());
    }

    #[tokio::test]
    async fn test_private_friend_list_status() {
        let err = friends_handler(State(state()), Path(1)).await.err().unwrap();
        assert_eq!(err.into_response().status(), StatusCode::FORBIDDEN);
    }
}
