use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};

use lexchat_widget::{
    Backend, ChatReply, ChatRequest, ChatSession, ChatWidgetController, FeedbackRequest,
    HttpBackend, MessageKind, QueryId, Rating, TransportError, WidgetConfig,
};

async fn chat(Json(body): Json<Value>) -> Json<Value> {
    let history_len = body["history"].as_array().map(Vec::len).unwrap_or(0);
    let message = body["message"].as_str().unwrap_or_default();

    if message == "fail" {
        return Json(json!({ "error": "No message provided" }));
    }

    Json(json!({
        "response": format!("Received {message} with {history_len} turns. See Art. 22"),
        "citations": ["https://www.planalto.gov.br/ccivil_03/leis/l8245.htm"],
        "query_id": "q-100",
    }))
}

async fn feedback(Json(body): Json<Value>) -> Json<Value> {
    let valid = body["query_id"] == "q-100" && body["rating"].as_u64() == Some(4);
    if valid {
        Json(json!({ "success": true }))
    } else {
        Json(json!({ "success": false, "error": "invalid feedback" }))
    }
}

async fn broken() -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "boom" })),
    )
}

async fn not_json() -> &'static str {
    "<html>maintenance</html>"
}

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("listener address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve test router");
    });
    format!("http://{addr}")
}

fn backend_app() -> Router {
    Router::new()
        .route("/api/chat", post(chat))
        .route("/api/feedback", post(feedback))
}

#[tokio::test]
async fn chat_round_trip_decodes_answer() {
    let origin = serve(backend_app()).await;
    let backend = HttpBackend::new(&origin, &WidgetConfig::default());
    assert_eq!(backend.chat_url(), format!("{origin}/api/chat"));

    let reply = backend
        .send_chat(&ChatRequest {
            message: "hello".to_string(),
            history: vec!["hello".to_string()],
        })
        .await
        .expect("chat reply");

    let ChatReply::Answer(answer) = reply else {
        panic!("expected an answer, got {reply:?}");
    };
    assert_eq!(answer.response, "Received hello with 1 turns. See Art. 22");
    assert_eq!(answer.citations.len(), 1);
    assert_eq!(answer.query_id, Some(QueryId::new("q-100")));
}

#[tokio::test]
async fn application_error_is_decoded_not_raised() {
    let origin = serve(backend_app()).await;
    let backend = HttpBackend::new(&origin, &WidgetConfig::default());

    let reply = backend
        .send_chat(&ChatRequest {
            message: "fail".to_string(),
            history: vec!["fail".to_string()],
        })
        .await
        .expect("chat reply");

    assert_eq!(
        reply,
        ChatReply::Failure {
            error: "No message provided".to_string()
        }
    );
}

#[tokio::test]
async fn non_success_status_is_transport_error() {
    let origin = serve(Router::new().route("/api/chat", post(broken))).await;
    let backend = HttpBackend::new(&origin, &WidgetConfig::default());

    let error = backend
        .send_chat(&ChatRequest {
            message: "hi".to_string(),
            history: vec!["hi".to_string()],
        })
        .await
        .expect_err("500 must fail");

    assert!(matches!(error, TransportError::Status { status: 500, .. }));
}

#[tokio::test]
async fn undecodable_body_is_transport_error() {
    let origin = serve(Router::new().route("/api/feedback", post(not_json))).await;
    let backend = HttpBackend::new(&origin, &WidgetConfig::default());

    let error = backend
        .send_feedback(&FeedbackRequest {
            query_id: QueryId::new("q-100"),
            rating: Rating::new(4).expect("valid rating"),
            comments: String::new(),
        })
        .await
        .expect_err("html body must fail to decode");

    assert!(matches!(error, TransportError::Decode { .. }));
}

#[tokio::test]
async fn unreachable_backend_renders_fallback() {
    let config = WidgetConfig::default();
    let backend = HttpBackend::new("http://127.0.0.1:9", &config);
    let session = ChatSession::new(ChatWidgetController::new(config), backend);

    let id = session.send_message("hello?").await.expect("dispatched");

    let controller = session.controller().borrow();
    let message = controller.message(id).expect("fallback bubble");
    assert_eq!(message.kind, MessageKind::Error);
    assert_eq!(message.text, controller.config().fallback_error);
}

#[tokio::test]
async fn session_submits_feedback_over_http() {
    let origin = serve(backend_app()).await;
    let config = WidgetConfig::default();
    let session = ChatSession::new(
        ChatWidgetController::new(config.clone()),
        HttpBackend::new(&origin, &config),
    );

    let id = session
        .send_message("What does Art. 22 say?")
        .await
        .expect("dispatched");
    session
        .update(|controller| controller.click_star(id, 4))
        .expect("rating accepted");
    session.submit_feedback(id).await.expect("feedback sent");

    let controller = session.controller().borrow();
    let html = controller
        .message_view(id)
        .expect("answer view")
        .to_html();
    assert!(html.contains("<strong>Art. 22</strong>"));
    assert!(html.contains("Thank you for your feedback!"));
    assert!(!html.contains(r#"data-action="star""#));
}
