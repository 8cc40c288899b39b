//! Router assembly

use axum::routing::{get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let request_timeout = state.request_timeout();

    let user_routes = Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/me", get(handlers::me))
        .route("/all", get(handlers::list_all))
        .route("/change-password", post(handlers::change_password))
        .route("/refresh-token", post(handlers::refresh));

    // Health routes (no timeout - must always respond quickly)
    let health_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/ready", get(handlers::ready));

    // Build middleware stack (order matters - outermost first)
    let middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TimeoutLayer::new(request_timeout));

    Router::new()
        .nest("/api/users", user_routes)
        .layer(middleware)
        .merge(health_routes)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use kanban_auth_core::AuthService;
    use kanban_db::{CredentialRepository, MemoryCredentialRepository};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;

    fn fixture(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../../crates/kanban-auth-core/tests/fixtures")
            .join(name)
    }

    fn test_router() -> Router {
        let private = fixture("private.pem");
        let public = fixture("public.pem");
        let config = Config::from_lookup(|key| match key {
            "JWT_PRIVATE_KEY_PATH" => Some(private.display().to_string()),
            "JWT_PUBLIC_KEY_PATH" => Some(public.display().to_string()),
            "ARGON2_M_COST" => Some("1024".to_string()),
            "ARGON2_T_COST" => Some("1".to_string()),
            _ => None,
        })
        .unwrap();

        let repo: Arc<dyn CredentialRepository> = Arc::new(MemoryCredentialRepository::new());
        let auth = AuthService::new(config.auth.clone(), repo).unwrap();

        build_router(AppState::new(auth, None, config))
    }

    fn json_request(method: Method, uri: &str, body: Value, bearer: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    async fn register(router: &Router, login: &str, password: &str) -> Value {
        let (status, body) = send(
            router,
            json_request(
                Method::POST,
                "/api/users/register",
                json!({"login": login, "password": password}),
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body
    }

    #[tokio::test]
    async fn test_health() {
        let router = test_router();
        let request = Request::get("/health").body(Body::empty()).unwrap();
        let (status, body) = send(&router, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_ready_without_database() {
        let router = test_router();
        let request = Request::get("/ready").body(Body::empty()).unwrap();
        let (status, body) = send(&router, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["checks"]["database"]["status"], "in-memory");
    }

    #[tokio::test]
    async fn test_register_then_me() {
        let router = test_router();
        let issued = register(&router, "alice", "correct horse").await;
        assert_eq!(issued["token_type"], "Bearer");
        assert_eq!(issued["expires_in"], 1200);

        let access = issued["access_token"].as_str().unwrap();
        let request = Request::get("/api/users/me")
            .header(header::AUTHORIZATION, format!("Bearer {access}"))
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&router, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], issued["id"]);
        assert_eq!(body["login"], "alice");
        assert!(body.get("password_hash").is_none());
    }

    #[tokio::test]
    async fn test_register_duplicate_conflicts() {
        let router = test_router();
        register(&router, "bob", "correct horse").await;

        let (status, body) = send(
            &router,
            json_request(
                Method::POST,
                "/api/users/register",
                json!({"login": "bob", "password": "another one"}),
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "ALREADY_EXISTS");
    }

    #[tokio::test]
    async fn test_login() {
        let router = test_router();
        register(&router, "carol", "correct horse").await;

        let (status, body) = send(
            &router,
            json_request(
                Method::POST,
                "/api/users/login",
                json!({"login": "carol", "password": "correct horse"}),
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["access_token"].is_string());

        let (status, body) = send(
            &router,
            json_request(
                Method::POST,
                "/api/users/login",
                json!({"login": "carol", "password": "wrong horse"}),
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn test_me_requires_access_token() {
        let router = test_router();
        let issued = register(&router, "dave", "correct horse").await;
        let refresh = issued["refresh_token"].as_str().unwrap();

        let request = Request::get("/api/users/me")
            .header(header::AUTHORIZATION, format!("Bearer {refresh}"))
            .body(Body::empty())
            .unwrap();
        let response = router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers().get(header::WWW_AUTHENTICATE).unwrap(), "Bearer");

        let request = Request::get("/api/users/me")
            .header(header::AUTHORIZATION, "Token abc123")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&router, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "INVALID_TOKEN");

        let request = Request::get("/api/users/me").body(Body::empty()).unwrap();
        let (status, _) = send(&router, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_list_all_users() {
        let router = test_router();
        let issued = register(&router, "gina", "correct horse").await;
        register(&router, "hank", "correct horse").await;

        let access = issued["access_token"].as_str().unwrap();
        let request = Request::get("/api/users/all")
            .header(header::AUTHORIZATION, format!("Bearer {access}"))
            .body(Body::empty())
            .unwrap();
        let response = router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(!text.contains("password_hash"));
        assert!(!text.contains("$argon2id$"));

        let body: Value = serde_json::from_str(&text).unwrap();
        let users = body.as_array().unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0]["login"], "gina");
        assert_eq!(users[0]["id"], issued["id"]);
        assert_eq!(users[1]["login"], "hank");

        let refresh = issued["refresh_token"].as_str().unwrap();
        let request = Request::get("/api/users/all")
            .header(header::AUTHORIZATION, format!("Bearer {refresh}"))
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&router, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "INVALID_TOKEN");
    }

    #[tokio::test]
    async fn test_change_password() {
        let router = test_router();
        let issued = register(&router, "erin", "first password").await;
        let access = issued["access_token"].as_str().unwrap();

        let (status, body) = send(
            &router,
            json_request(
                Method::POST,
                "/api/users/change-password",
                json!({
                    "old_password": "first password",
                    "new_password": "second password",
                    "new_password_again": "second pasword",
                }),
                Some(access),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "PASSWORD_MISMATCH");

        let (status, body) = send(
            &router,
            json_request(
                Method::POST,
                "/api/users/change-password",
                json!({
                    "old_password": "first password",
                    "new_password": "second password",
                    "new_password_again": "second password",
                }),
                Some(access),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::Null);

        let (status, _) = send(
            &router,
            json_request(
                Method::POST,
                "/api/users/login",
                json!({"login": "erin", "password": "second password"}),
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_refresh_token() {
        let router = test_router();
        let issued = register(&router, "frank", "correct horse").await;

        let (status, body) = send(
            &router,
            json_request(
                Method::POST,
                "/api/users/refresh-token",
                json!({"refresh_token": issued["refresh_token"]}),
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], issued["id"]);

        let (status, body) = send(
            &router,
            json_request(
                Method::POST,
                "/api/users/refresh-token",
                json!({"refresh_token": issued["access_token"]}),
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "INVALID_TOKEN");
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let router = test_router();
        let request = Request::post("/api/users/register")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"login\": 5"))
            .unwrap();
        let (status, body) = send(&router, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_request_id_propagated() {
        let router = test_router();
        let request = Request::get("/api/users/me")
            .header("x-request-id", "req-123")
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.headers().get("x-request-id").unwrap(), "req-123");
    }
}
