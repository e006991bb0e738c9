mod common;

use axum::http::StatusCode;

use common::*;

mod health {
    use super::*;

    #[tokio::test]
    async fn should_report_database_check() {
        let app = setup().await;

        let (status, body) = call(&app, "GET", "/health", None, None).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["checks"]["database"]["status"].as_bool().unwrap());
        assert!(body["version"].is_string());
    }
}

mod request_id {
    use super::*;

    #[tokio::test]
    async fn should_echo_request_id_header() {
        let app = setup().await;

        let (_, headers, _) = call_raw(&app, "GET", "/health", None, None).await;

        assert!(headers.contains_key("x-request-id"));
    }
}

mod openapi {
    use super::*;

    #[tokio::test]
    async fn should_serve_openapi_document() {
        let app = setup().await;

        let (status, body) = call(&app, "GET", "/api-docs/openapi.json", None, None).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/api/points"].is_object());
        assert!(body["components"]["securitySchemes"]["bearer_auth"].is_object());
    }
}

mod malformed_body {
    use super::*;
    use axum::{body::Body, http::Request};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    #[tokio::test]
    async fn should_return_common400_for_invalid_json() {
        let app = setup().await;
        let request = Request::builder()
            .method("POST")
            .uri("/api/points")
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", token(1)))
            .body(Body::from("{not json"))
            .unwrap();

        let response = app.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "COMMON400");
    }
}
