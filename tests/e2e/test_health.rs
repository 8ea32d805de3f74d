use crate::e2e::helpers::TestContext;
use hyper::StatusCode;

#[tokio::test]
async fn it_should_report_healthy() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx.client.get("/health").await.unwrap();
    response.assert_status(StatusCode::OK);
    assert_eq!(response.body_bytes, b"OK");
}

#[tokio::test]
async fn it_should_report_ready_when_tts_is_configured() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx.client.get("/health/ready").await.unwrap();
    response.assert_status(StatusCode::OK);

    let body = response.body.as_ref().unwrap();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["providers"], 1);
}

#[tokio::test]
async fn it_should_attach_request_id_to_responses() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx.client.get("/health").await.unwrap();
    response.assert_header_exists("x-request-id");
}
