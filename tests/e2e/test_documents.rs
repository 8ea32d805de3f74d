use crate::e2e::helpers::{fixtures, TestContext};
use hyper::StatusCode;

#[tokio::test]
async fn it_should_accept_a_pdf_upload() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx
        .client
        .post_pdf("/api/upload", "voyage.pdf", fixtures::sample_book_pdf())
        .await
        .unwrap();

    response.assert_status(StatusCode::CREATED);
    let body = response.body.as_ref().unwrap();
    assert!(body.get("job_id").and_then(|v| v.as_str()).is_some());
    assert_eq!(body["filename"], "voyage.pdf");
    assert_eq!(body["metadata"]["title"], "The Test Voyage");
    assert_eq!(body["metadata"]["author"], "A. Writer");
}

#[tokio::test]
async fn it_should_default_metadata_when_pdf_has_none() {
    let ctx = TestContext::new().await.unwrap();
    let pdf = fixtures::pdf_with_pages(&["Some plain content on a page."], None);

    let response = ctx.client.post_pdf("/api/upload", "plain.pdf", pdf).await.unwrap();

    response.assert_status(StatusCode::CREATED);
    let body = response.body.as_ref().unwrap();
    assert_eq!(body["metadata"]["title"], "Unknown Title");
    assert_eq!(body["metadata"]["author"], "Unknown Author");
}

#[tokio::test]
async fn it_should_reject_non_pdf_extensions() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx
        .client
        .post_multipart("/api/upload", "file", "notes.txt", "text/plain", b"hello".to_vec())
        .await
        .unwrap();

    response.assert_status(StatusCode::UNSUPPORTED_MEDIA_TYPE);
    response.assert_error_message("Only PDF files are supported");
}

#[tokio::test]
async fn it_should_reject_uploads_without_a_file_field() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx
        .client
        .post_multipart("/api/upload", "document", "book.pdf", "application/pdf", b"x".to_vec())
        .await
        .unwrap();

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_error_message("Missing 'file' field");
}

#[tokio::test]
async fn it_should_reject_files_that_are_not_parseable_pdfs() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx
        .client
        .post_pdf("/api/upload", "fake.pdf", b"definitely not a pdf".to_vec())
        .await
        .unwrap();

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_error_message("Not a readable PDF");
}

#[tokio::test]
async fn it_should_reject_uploads_just_over_the_size_limit() {
    let ctx = TestContext::new().await.unwrap();

    // One byte over the configured limit, caught by the handler's size check
    let oversized = vec![0u8; ctx.config.max_upload_bytes + 1];
    let response = ctx
        .client
        .post_pdf("/api/upload", "big.pdf", oversized)
        .await
        .unwrap();

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn it_should_reject_uploads_far_over_the_size_limit() {
    let ctx = TestContext::new().await.unwrap();

    // Well past the body limit itself, rejected while reading the stream
    let oversized = vec![0u8; ctx.config.max_upload_bytes + 1024 * 1024];
    let response = ctx
        .client
        .post_pdf("/api/upload", "huge.pdf", oversized)
        .await
        .unwrap();

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn it_should_reject_empty_files() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx
        .client
        .post_pdf("/api/upload", "empty.pdf", Vec::new())
        .await
        .unwrap();

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_error_message("empty");
}
