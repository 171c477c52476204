use super::*;

#[test]
fn set_header_replaces_case_insensitively() {
    let req = ApiRequest::get("/x").header("content-type", "text/plain").header(CONTENT_TYPE, JSON_CONTENT_TYPE);
    assert_eq!(req.headers.len(), 1);
    assert_eq!(req.header_value("CONTENT-TYPE"), Some(JSON_CONTENT_TYPE));
}

#[test]
fn json_sets_body() {
    let req = ApiRequest::post("/api/auth/login").json(&serde_json::json!({"username": "guest"})).unwrap();
    assert_eq!(req.method, Method::Post);
    assert_eq!(req.body.as_deref(), Some(r#"{"username":"guest"}"#));
}

#[test]
fn with_timeout_records_ms() {
    assert_eq!(ApiRequest::delete("/x").with_timeout(250).timeout_ms, Some(250));
    assert_eq!(ApiRequest::put("/x").timeout_ms, None);
}

#[test]
fn bearer_formats_authorization_value() {
    assert_eq!(bearer("t1"), "Bearer t1");
}

#[test]
fn response_success_range() {
    assert!(ApiResponse::new(200, "").is_success());
    assert!(ApiResponse::new(204, "").is_success());
    assert!(!ApiResponse::new(301, "").is_success());
    assert!(!ApiResponse::new(401, "").is_success());
}

#[test]
fn response_message_reads_json_message() {
    let resp = ApiResponse::new(400, r#"{"message": "  Invalid password  "}"#);
    assert_eq!(resp.message().as_deref(), Some("Invalid password"));
}

#[test]
fn response_message_or_falls_back_for_blank_or_non_json() {
    assert_eq!(ApiResponse::new(500, "<html>").message_or("fallback"), "fallback");
    assert_eq!(ApiResponse::new(500, r#"{"message": ""}"#).message_or("fallback"), "fallback");
    assert_eq!(ApiResponse::new(500, "{}").message_or("fallback"), "fallback");
}

#[test]
fn method_names() {
    assert_eq!(Method::Get.as_str(), "GET");
    assert_eq!(Method::Delete.as_str(), "DELETE");
}

#[cfg(not(feature = "hydrate"))]
#[tokio::test]
async fn browser_transport_is_unavailable_outside_hydrate() {
    let err = BrowserTransport.send(ApiRequest::get("/api/auth/me")).await.unwrap_err();
    assert_eq!(err, TransportError::Unavailable);
}
