use crate::e2e::helpers::{fixtures, TestContext};
use hyper::StatusCode;
use serde_json::json;
use serial_test::serial;

#[tokio::test]
#[serial]
async fn it_should_convert_an_uploaded_pdf_to_an_audiobook() {
    let ctx = TestContext::new().await.unwrap();
    let job_id = ctx
        .upload_pdf("voyage.pdf", fixtures::sample_book_pdf())
        .await
        .unwrap();

    let response = ctx
        .client
        .post(
            "/api/convert",
            &json!({
                "job_id": job_id,
                "settings": { "provider": "mock", "voice": "narrator", "speed": 1.0 }
            }),
        )
        .await
        .unwrap();
    response.assert_status(StatusCode::ACCEPTED);

    let status = ctx.wait_for_terminal(&job_id).await.unwrap();
    assert_eq!(status["status"], "completed", "job: {:?}", status);
    assert_eq!(status["progress"], 100.0);
    assert_eq!(status["output_available"], true);

    // Two chapter headings in the fixture
    let chapters = status["chapters"].as_array().unwrap();
    assert_eq!(chapters.len(), 2);
    assert!(chapters[0]["title"].as_str().unwrap().contains("Chapter 1"));
}

#[tokio::test]
#[serial]
async fn it_should_download_the_finished_mp3() {
    let ctx = TestContext::new().await.unwrap();
    let job_id = ctx
        .upload_pdf("voyage.pdf", fixtures::sample_book_pdf())
        .await
        .unwrap();

    ctx.client
        .post("/api/convert", &json!({ "job_id": job_id }))
        .await
        .unwrap()
        .assert_status(StatusCode::ACCEPTED);
    let status = ctx.wait_for_terminal(&job_id).await.unwrap();
    assert_eq!(status["status"], "completed", "job: {:?}", status);

    let response = ctx
        .client
        .get(&format!("/api/download/{}", job_id))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.header("content-type").unwrap(), "audio/mpeg");
    assert!(response
        .header("content-disposition")
        .unwrap()
        .contains("voyage.mp3"));
    assert!(!response.body_bytes.is_empty());
    // Synthesized audio starts with an MPEG frame sync
    assert_eq!(response.body_bytes[0], 0xFF);
}

#[tokio::test]
async fn it_should_reject_download_before_completion() {
    let ctx = TestContext::new().await.unwrap();
    let job_id = ctx
        .upload_pdf("voyage.pdf", fixtures::sample_book_pdf())
        .await
        .unwrap();

    let response = ctx
        .client
        .get(&format!("/api/download/{}", job_id))
        .await
        .unwrap();

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_error_message("not finished");
}

#[tokio::test]
async fn it_should_list_jobs_after_upload() {
    let ctx = TestContext::new().await.unwrap();
    let job_id = ctx
        .upload_pdf("voyage.pdf", fixtures::sample_book_pdf())
        .await
        .unwrap();

    let response = ctx.client.get("/api/jobs").await.unwrap();
    response.assert_status(StatusCode::OK);

    let jobs = response.body.as_ref().unwrap().as_array().unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0]["job_id"], job_id.as_str());
    assert_eq!(jobs[0]["filename"], "voyage.pdf");
    assert_eq!(jobs[0]["status"], "uploaded");
}

#[tokio::test]
async fn it_should_return_404_for_unknown_job_status() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx
        .client
        .get(&format!("/api/status/{}", uuid::Uuid::new_v4()))
        .await
        .unwrap();

    response.assert_status(StatusCode::NOT_FOUND);
    response.assert_error_message("Job not found");
}

#[tokio::test]
async fn it_should_return_404_when_converting_an_unknown_job() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx
        .client
        .post("/api/convert", &json!({ "job_id": uuid::Uuid::new_v4() }))
        .await
        .unwrap();

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn it_should_reject_invalid_speed() {
    let ctx = TestContext::new().await.unwrap();
    let job_id = ctx
        .upload_pdf("voyage.pdf", fixtures::sample_book_pdf())
        .await
        .unwrap();

    let response = ctx
        .client
        .post(
            "/api/convert",
            &json!({ "job_id": job_id, "settings": { "speed": 3.5 } }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_error_message("Speed must be between");
}

#[tokio::test]
async fn it_should_reject_unknown_providers() {
    let ctx = TestContext::new().await.unwrap();
    let job_id = ctx
        .upload_pdf("voyage.pdf", fixtures::sample_book_pdf())
        .await
        .unwrap();

    let response = ctx
        .client
        .post(
            "/api/convert",
            &json!({ "job_id": job_id, "settings": { "provider": "espeak" } }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_error_message("Unknown TTS provider");
}

#[tokio::test]
async fn it_should_cancel_a_pending_job() {
    let ctx = TestContext::new().await.unwrap();
    let job_id = ctx
        .upload_pdf("voyage.pdf", fixtures::sample_book_pdf())
        .await
        .unwrap();

    let response = ctx
        .client
        .delete(&format!("/api/jobs/{}", job_id))
        .await
        .unwrap();
    response.assert_status(StatusCode::OK);

    let status = ctx
        .client
        .get(&format!("/api/status/{}", job_id))
        .await
        .unwrap();
    assert_eq!(status.body.as_ref().unwrap()["status"], "cancelled");

    // A cancelled job cannot be converted
    let convert = ctx
        .client
        .post("/api/convert", &json!({ "job_id": job_id }))
        .await
        .unwrap();
    convert.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
#[serial]
async fn it_should_reject_converting_the_same_job_twice() {
    let ctx = TestContext::new().await.unwrap();
    let job_id = ctx
        .upload_pdf("voyage.pdf", fixtures::sample_book_pdf())
        .await
        .unwrap();

    ctx.client
        .post("/api/convert", &json!({ "job_id": job_id }))
        .await
        .unwrap()
        .assert_status(StatusCode::ACCEPTED);

    // Whether it is still processing or already done, a second start conflicts
    let second = ctx
        .client
        .post("/api/convert", &json!({ "job_id": job_id }))
        .await
        .unwrap();
    second.assert_status(StatusCode::CONFLICT);

    ctx.wait_for_terminal(&job_id).await.unwrap();
}

#[tokio::test]
async fn it_should_return_404_when_cancelling_an_unknown_job() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx
        .client
        .delete(&format!("/api/jobs/{}", uuid::Uuid::new_v4()))
        .await
        .unwrap();

    response.assert_status(StatusCode::NOT_FOUND);
}
