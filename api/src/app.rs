use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::handler::{home, predict};
use crate::predictor::Predictor;

#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<dyn Predictor>,
}

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/predict", post(predict))
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PredictError;
    use crate::model::FeatureVector;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tower::ServiceExt;

    /// Returns a fixed class and records every vector it is asked to score.
    struct StubPredictor {
        class: i64,
        calls: AtomicUsize,
        seen: Mutex<Vec<FeatureVector>>,
    }

    impl StubPredictor {
        fn returning(class: i64) -> Arc<Self> {
            Arc::new(Self {
                class,
                calls: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    impl Predictor for StubPredictor {
        fn predict(&self, features: &FeatureVector) -> Result<i64, PredictError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(*features);
            Ok(self.class)
        }
    }

    struct FailingPredictor;

    impl Predictor for FailingPredictor {
        fn predict(&self, _: &FeatureVector) -> Result<i64, PredictError> {
            Err(PredictError::NonFiniteFeature { index: 7 })
        }
    }

    fn router(predictor: Arc<dyn Predictor>) -> Router {
        create_router(AppState { predictor })
    }

    fn engineer() -> Value {
        json!({
            "occupation": "Engineer",
            "age": 35,
            "sleep_duration": 6.5,
            "heart_rate": 72,
            "physical_activity": "Normal",
            "stress_level": "High",
            "athlete": "No",
            "height": 175,
            "weight": 70
        })
    }

    async fn post_json(app: Router, body: String) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::post("/predict")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn home_reports_liveness() {
        let app = router(StubPredictor::returning(0));
        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"Sleep Quality Prediction API is running!");
    }

    #[tokio::test]
    async fn predicts_good_for_class_zero() {
        let stub = StubPredictor::returning(0);
        let (status, body) = post_json(router(stub.clone()), engineer().to_string()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "predicted_sleep_quality": "Good" }));

        let seen = stub.seen.lock().unwrap();
        let x = seen[0].as_array();
        assert_eq!(&x[..7], &[0.0, 35.0, 6.5, 72.0, 1.0, 2.0, 1.0]);
        assert!((x[7] - 70.0 / (1.75 * 1.75)).abs() < 1e-9);
    }

    #[tokio::test]
    async fn maps_other_classes() {
        let (_, body) =
            post_json(router(StubPredictor::returning(1)), engineer().to_string()).await;
        assert_eq!(body["predicted_sleep_quality"], "Bad");

        let (status, body) =
            post_json(router(StubPredictor::returning(7)), engineer().to_string()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["predicted_sleep_quality"], "Unknown");
    }

    #[tokio::test]
    async fn missing_field_is_a_client_error() {
        let stub = StubPredictor::returning(0);
        let mut payload = engineer();
        payload.as_object_mut().unwrap().remove("sleep_duration");

        let (status, body) = post_json(router(stub.clone()), payload.to_string()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Missing field: 'sleep_duration'" }));
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unknown_category_skips_the_predictor() {
        let stub = StubPredictor::returning(0);
        let mut payload = engineer();
        payload["occupation"] = json!("Astronaut");

        let (status, body) = post_json(router(stub.clone()), payload.to_string()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({ "error": "Invalid input, please check your categories." })
        );
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn malformed_number_is_a_client_error() {
        let stub = StubPredictor::returning(0);
        let mut payload = engineer();
        payload["age"] = json!("thirty-five");

        let (status, body) = post_json(router(stub.clone()), payload.to_string()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("'age'"));
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn invalid_json_is_a_client_error() {
        let (status, body) =
            post_json(router(StubPredictor::returning(0)), "{\"age\": ".to_string()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn missing_content_type_is_a_client_error() {
        let stub = StubPredictor::returning(0);
        let response = router(stub.clone())
            .oneshot(
                Request::post("/predict")
                    .body(Body::from(engineer().to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["error"].is_string());
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn degenerate_body_measurements_are_client_errors() {
        let stub = StubPredictor::returning(0);
        let mut payload = engineer();
        payload["height"] = json!(1e-160);

        let (status, body) = post_json(router(stub.clone()), payload.to_string()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("'height'"));
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn predictor_failure_is_a_server_error() {
        let (status, body) =
            post_json(router(Arc::new(FailingPredictor)), engineer().to_string()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "feature 7 is not a finite number" }));
    }

    #[tokio::test]
    async fn identical_payloads_get_identical_labels() {
        let raw = r#"{"n_features": 8, "classes": [0, 1], "trees": [{ "nodes": [
            { "feature": 2, "threshold": 7.0, "left": 1, "right": 2 },
            { "value": [1.0, 4.0] },
            { "value": [4.0, 1.0] }
        ] }]}"#;
        let model = Arc::new(crate::predictor::TreeEnsemble::from_json(raw).unwrap());

        let (_, first) = post_json(router(model.clone()), engineer().to_string()).await;
        let (_, second) = post_json(router(model), engineer().to_string()).await;

        assert_eq!(first, json!({ "predicted_sleep_quality": "Bad" }));
        assert_eq!(first, second);
    }
}
