//! HTTP routes.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tracing::Instrument;

use rdm_shared::MapDataParams;

use super::session::{resolve_capabilities, SessionToken};
use crate::app::App;
use crate::infrastructure::correlation::CorrelationId;
use crate::infrastructure::ports::RepoError;
use crate::use_cases::map_data::{MapDataError, MapDataRequest};

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/", get(health))
        .route("/api/health", get(health))
        .route("/api/get_data", get(get_data))
}

async fn health() -> &'static str {
    "OK"
}

async fn get_data(
    State(app): State<Arc<App>>,
    SessionToken(token): SessionToken,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let correlation_id = CorrelationId::new();
    let span = tracing::info_span!("get_data", correlation_id = %correlation_id.short());

    async move {
        let caps = resolve_capabilities(app.sessions.as_ref(), token.as_deref()).await?;
        let request = MapDataRequest::from(MapDataParams::from_query(&query));

        let outcome = app
            .use_cases
            .map_data
            .get_data
            .execute(request, &caps)
            .await?;

        let body = serde_json::to_vec(&outcome.response)
            .map_err(|e| ApiError::Internal(format!("serialize response: {e}")))?;

        Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
    }
    .instrument(span)
    .await
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized,
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized").into_response(),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
            }
        }
    }
}

impl From<RepoError> for ApiError {
    fn from(e: RepoError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<MapDataError> for ApiError {
    fn from(e: MapDataError) -> Self {
        match e {
            MapDataError::Unauthorized => ApiError::Unauthorized,
            MapDataError::BadRequest(msg) => ApiError::BadRequest(msg),
            MapDataError::StorageUnavailable(source) => ApiError::Internal(source.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use axum::{body::Body, http::Request as HttpRequest};
    use chrono::{Offset, Utc};
    use rdm_domain::{Capability, CapabilitySet};
    use tower::ServiceExt;

    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::fragments::HtmlFragmentRenderer;
    use crate::infrastructure::localizer::JsonLocalizer;
    use crate::infrastructure::ports::{MockSessionRepo, MockStoragePort, SessionRepo, StoragePort};
    use crate::infrastructure::sqlite::test_support::{exec, storage, NOW};
    use crate::infrastructure::sqlite::SqliteStorage;
    use crate::use_cases::map_data::MapDataSettings;

    fn settings() -> MapDataSettings {
        MapDataSettings {
            max_pokemon_id: 3,
            category_timeout: Duration::from_secs(5),
        }
    }

    fn app(storage: Arc<dyn StoragePort>, sessions: Arc<dyn SessionRepo>) -> Router {
        let app = App::new(
            storage,
            sessions,
            Arc::new(JsonLocalizer::builtin(Utc.fix())),
            Arc::new(HtmlFragmentRenderer::new()),
            Arc::new(FixedClock::at(NOW)),
            settings(),
        );
        routes().with_state(Arc::new(app))
    }

    fn sqlite_app(storage: &SqliteStorage) -> Router {
        app(
            Arc::new(storage.clone()),
            Arc::new(storage.session_repo()),
        )
    }

    async fn grant(storage: &SqliteStorage, token: &str, caps: &[Capability]) {
        let mask = caps.iter().copied().collect::<CapabilitySet>().to_mask();
        exec(
            storage,
            &format!("INSERT INTO web_session (token, perms) VALUES ('{token}', {mask})"),
        )
        .await;
    }

    async fn send(router: Router, uri: &str, token: Option<&str>) -> (StatusCode, String) {
        let mut builder = HttpRequest::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header("X-Session-Id", token);
        }
        let request = builder.body(Body::empty()).expect("request");
        let response = router.oneshot(request).await.expect("response");
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        (status, String::from_utf8(body.to_vec()).expect("utf8"))
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let (_dir, storage) = storage().await;
        let (status, body) = send(sqlite_app(&storage), "/api/health", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK");
    }

    #[tokio::test]
    async fn no_session_is_unauthorized() {
        let (_dir, storage) = storage().await;
        let (status, _) = send(
            sqlite_app(&storage),
            "/api/get_data?show_devices=true",
            None,
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn unknown_token_is_unauthorized() {
        let (_dir, storage) = storage().await;
        let (status, _) = send(
            sqlite_app(&storage),
            "/api/get_data?show_devices=true",
            Some("nobody"),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn unusable_stored_mask_is_unauthorized() {
        let (_dir, storage) = storage().await;
        exec(
            &storage,
            "INSERT INTO web_session (token, perms) VALUES \
             ('big', 4294967296), ('neg', -1), ('txt', 'admin')",
        )
        .await;

        for token in ["big", "neg", "txt"] {
            let (status, _) = send(
                sqlite_app(&storage),
                "/api/get_data?show_devices=true",
                Some(token),
            )
            .await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "token {token}");
        }
    }

    #[tokio::test]
    async fn spatial_request_without_bounds_is_bad_request() {
        let (_dir, storage) = storage().await;
        grant(&storage, "abc", &[Capability::ViewMap, Capability::ViewMapPokemon]).await;

        let (status, _) = send(
            sqlite_app(&storage),
            "/api/get_data?show_pokemon=true&min_lat=1&max_lat=2&min_lon=3",
            Some("abc"),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn empty_viewport_returns_empty_pokemon_list() {
        let (_dir, storage) = storage().await;
        grant(&storage, "abc", &[Capability::ViewMap, Capability::ViewMapPokemon]).await;

        let (status, body) = send(
            sqlite_app(&storage),
            "/api/get_data?show_pokemon=true&min_lat=0&max_lat=1&min_lon=0&max_lon=1&last_update=0",
            Some("abc"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).expect("json");
        assert_eq!(json["pokemon"], serde_json::json!([]));
        assert_eq!(json["timestamp"], serde_json::json!(NOW));
        assert!(json.get("gyms").is_none());
        assert!(json.get("devices").is_none());
    }

    #[tokio::test]
    async fn denied_category_is_absent_not_empty() {
        let (_dir, storage) = storage().await;
        grant(&storage, "abc", &[Capability::ViewMap]).await;

        let (status, body) = send(
            sqlite_app(&storage),
            "/api/get_data?show_devices=true&show_gyms=true&min_lat=0&max_lat=1&min_lon=0&max_lon=1",
            Some("abc"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).expect("json");
        assert!(json.get("devices").is_none());
        assert!(json.get("gyms").is_none());
        assert!(json.get("timestamp").is_some());
    }

    #[tokio::test]
    async fn session_store_fault_is_internal_error() {
        let mut sessions = MockSessionRepo::new();
        sessions
            .expect_get_permissions()
            .returning(|_| Err(RepoError::database("session.get_permissions", "locked")));
        let mut storage = MockStoragePort::new();
        storage.expect_connect().never();

        let (status, body) = send(
            app(Arc::new(storage), Arc::new(sessions)),
            "/api/get_data?show_devices=true",
            Some("abc"),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "Internal error");
    }

    #[tokio::test]
    async fn unavailable_storage_is_internal_error() {
        let mut sessions = MockSessionRepo::new();
        sessions.expect_get_permissions().returning(|_| {
            Ok(Some(
                [Capability::ViewMap, Capability::AdminSetting]
                    .into_iter()
                    .collect::<CapabilitySet>()
                    .to_mask(),
            ))
        });
        let mut storage = MockStoragePort::new();
        storage
            .expect_connect()
            .times(1)
            .returning(|| Err(RepoError::unavailable("pool closed")));

        let (status, _) = send(
            app(Arc::new(storage), Arc::new(sessions)),
            "/api/get_data?show_devices=true",
            Some("abc"),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
