use crate::e2e::helpers::TestContext;
use hyper::StatusCode;

#[tokio::test]
async fn it_should_list_available_tts_services() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx.client.get("/api/services").await.unwrap();
    response.assert_status(StatusCode::OK);

    let body = response.body.as_ref().unwrap();
    assert_eq!(body["default_provider"], "mock");

    let services = body["services"].as_array().unwrap();
    assert_eq!(services.len(), 1);
    assert_eq!(services[0]["name"], "mock");
    assert_eq!(services[0]["default_voice"], "narrator");

    let voices = services[0]["voices"].as_array().unwrap();
    assert_eq!(voices.len(), 2);
    assert_eq!(voices[0]["name"], "narrator");
    assert!(voices[0]["description"].as_str().unwrap().len() > 0);
}
