// ============================================
// PETDIAG - Provider Tests against a local fake upstream
// ============================================

#[cfg(test)]
mod llm_tests {
    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio::net::TcpListener;

    use petdiag::llm::{LlmClient, LlmError, OpenRouterProvider, RetryConfig, OPENROUTER_MODEL};

    /// Canned upstream answers, served in order; the last one repeats.
    #[derive(Clone)]
    struct Upstream {
        answers: Arc<Vec<(StatusCode, Value)>>,
        hits: Arc<AtomicUsize>,
        last_body: Arc<Mutex<Option<Value>>>,
        last_auth: Arc<Mutex<Option<String>>>,
    }

    async fn completions(
        State(upstream): State<Upstream>,
        headers: axum::http::HeaderMap,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        let n = upstream.hits.fetch_add(1, Ordering::SeqCst);
        *upstream.last_body.lock().unwrap() = Some(body);
        *upstream.last_auth.lock().unwrap() = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        let index = n.min(upstream.answers.len() - 1);
        let (status, answer) = upstream.answers[index].clone();
        (status, Json(answer))
    }

    async fn spawn_upstream(answers: Vec<(StatusCode, Value)>) -> (String, Upstream) {
        let upstream = Upstream {
            answers: Arc::new(answers),
            hits: Arc::new(AtomicUsize::new(0)),
            last_body: Arc::new(Mutex::new(None)),
            last_auth: Arc::new(Mutex::new(None)),
        };
        let app = Router::new()
            .route("/v1/chat/completions", post(completions))
            .with_state(upstream.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}/v1", addr), upstream)
    }

    fn completion(content: &str) -> Value {
        json!({
            "id": "gen-1",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }]
        })
    }

    fn client(base_url: String) -> LlmClient {
        let provider = OpenRouterProvider::new(
            "sk-or-test".to_string(),
            Some(base_url),
            Some(Duration::from_secs(5)),
        );
        LlmClient::new(Arc::new(provider)).with_retry_config(RetryConfig {
            max_attempts: 2,
            initial_delay: Duration::from_millis(10),
            max_delay: Duration::from_millis(20),
            backoff_multiplier: 2.0,
        })
    }

    #[tokio::test]
    async fn test_request_shape() {
        let (url, upstream) = spawn_upstream(vec![(StatusCode::OK, completion("{}"))]).await;

        let reply = client(url).send("Describe otitis").await.unwrap();

        assert_eq!(reply, "{}");
        let body = upstream.last_body.lock().unwrap().clone().unwrap();
        assert_eq!(body["model"], OPENROUTER_MODEL);
        assert_eq!(body["messages"], json!([{"role": "user", "content": "Describe otitis"}]));
        assert!((body["temperature"].as_f64().unwrap() - 0.15).abs() < 1e-6);
        assert_eq!(
            upstream.last_auth.lock().unwrap().as_deref(),
            Some("Bearer sk-or-test")
        );
    }

    #[tokio::test]
    async fn test_overload_becomes_unavailable_after_retries() {
        let (url, upstream) = spawn_upstream(vec![(
            StatusCode::SERVICE_UNAVAILABLE,
            json!({"error": {"message": "overloaded"}}),
        )])
        .await;

        let err = client(url).send("hi").await.unwrap_err();

        assert!(matches!(err, LlmError::Unavailable(_)));
        assert_eq!(upstream.hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_recovers_on_second_attempt() {
        let (url, upstream) = spawn_upstream(vec![
            (StatusCode::BAD_GATEWAY, json!({"error": {"message": "bad gateway"}})),
            (StatusCode::OK, completion(r#"{"urgent": true}"#)),
        ])
        .await;

        let reply = client(url).send("hi").await.unwrap();

        assert_eq!(reply, r#"{"urgent": true}"#);
        assert_eq!(upstream.hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_unauthorized_not_retried() {
        let (url, upstream) = spawn_upstream(vec![(
            StatusCode::UNAUTHORIZED,
            json!({"error": {"message": "No auth credentials found"}}),
        )])
        .await;

        let err = client(url).send("hi").await.unwrap_err();

        assert!(matches!(err, LlmError::Http { status: 401, .. }));
        assert_eq!(upstream.hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_inband_error_on_ok_status() {
        let (url, _upstream) = spawn_upstream(vec![(
            StatusCode::OK,
            json!({"error": {"code": 503, "message": "Provider returned error"}}),
        )])
        .await;

        let err = client(url).send("hi").await.unwrap_err();
        assert!(err.is_unavailable());
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport() {
        // Bind then drop to get a port with nothing listening.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(format!("http://{}/v1", addr))
            .send("hi")
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Transport(_)));
    }
}
