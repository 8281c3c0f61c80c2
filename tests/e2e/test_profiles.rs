use crate::e2e::helpers;

use ai_voice_backend::domain::profile::ProfileUploadResponse;
use helpers::api_client::UploadFile;
use helpers::fakes::{FakeTranscoder, CANONICAL_MARKER};
use helpers::{TestContext, TestOptions};
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_context::test_context;

const UPLOAD_PATH: &str = "/voice-profiles/upload";

fn voice_file(bytes: &[u8]) -> UploadFile<'_> {
    UploadFile {
        field: "file",
        file_name: "sample.m4a",
        bytes,
    }
}

fn canonical(bytes: &[u8]) -> Vec<u8> {
    let mut expected = CANONICAL_MARKER.to_vec();
    expected.extend_from_slice(bytes);
    expected
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_store_converted_reference(ctx: &TestContext) {
    let response = ctx
        .client
        .post_multipart(UPLOAD_PATH, &[("userId", "demo")], &[voice_file(b"m4a-audio")])
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let body: ProfileUploadResponse = response.json().unwrap();
    assert!(body.ok);
    assert_eq!(body.path, "/profiles/demo/user_clean.wav");
    assert_eq!(ctx.transcoder.convert_count(), 1);

    // Only the canonical file is left behind
    let files = ctx.profile_files("demo");
    assert_eq!(files.len(), 1);
    assert!(files[0].ends_with("user_clean.wav"));
    assert_eq!(std::fs::read(&files[0]).unwrap(), canonical(b"m4a-audio"));

    // Converted in the work area and moved into place
    let converted = ctx.transcoder.outputs();
    assert_eq!(converted.len(), 1);
    assert!(converted[0].starts_with(&ctx.config.work_dir));
    assert!(ctx.work_files().is_empty());

    let served = ctx.client.get(&body.path).await.unwrap();
    served.assert_status(StatusCode::OK);
    assert_eq!(served.body_bytes, canonical(b"m4a-audio"));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_replace_previous_reference(ctx: &TestContext) {
    for sample in [b"first".as_slice(), b"second".as_slice()] {
        ctx.client
            .post_multipart(UPLOAD_PATH, &[("userId", "demo")], &[voice_file(sample)])
            .await
            .unwrap()
            .assert_status(StatusCode::OK);
    }

    let files = ctx.profile_files("demo");
    assert_eq!(files.len(), 1);
    assert_eq!(std::fs::read(&files[0]).unwrap(), canonical(b"second"));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_incomplete_form(ctx: &TestContext) {
    let missing_file = ctx
        .client
        .post_multipart(UPLOAD_PATH, &[("userId", "demo")], &[])
        .await
        .unwrap();
    missing_file
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_code("INVALID_ARGUMENT")
        .assert_error_message("file required");

    let missing_user = ctx
        .client
        .post_multipart(UPLOAD_PATH, &[], &[voice_file(b"audio")])
        .await
        .unwrap();
    missing_user
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_code("INVALID_ARGUMENT")
        .assert_error_message("userId required");

    let blank_user = ctx
        .client
        .post_multipart(UPLOAD_PATH, &[("userId", "   ")], &[voice_file(b"audio")])
        .await
        .unwrap();
    blank_user
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_code("INVALID_ARGUMENT");

    assert_eq!(ctx.transcoder.convert_count(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_path_like_user_id(ctx: &TestContext) {
    let response = ctx
        .client
        .post_multipart(UPLOAD_PATH, &[("userId", "../../etc")], &[voice_file(b"audio")])
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_code("INVALID_ARGUMENT");
    assert!(helpers::files_in(&ctx.config.profiles_dir).is_empty());
}

#[tokio::test]
async fn it_should_report_missing_transcoder_and_drop_raw_upload() {
    let ctx = TestContext::with(TestOptions {
        transcoder: FakeTranscoder::unavailable(),
        ..Default::default()
    })
    .await;

    let response = ctx
        .client
        .post_multipart(UPLOAD_PATH, &[("userId", "demo")], &[voice_file(b"audio")])
        .await
        .unwrap();

    response
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_error_code("TRANSCODER_UNAVAILABLE");
    assert!(ctx.profile_files("demo").is_empty());
    assert!(ctx.work_files().is_empty());
}

#[tokio::test]
async fn it_should_keep_previous_reference_when_conversion_fails() {
    let ctx = TestContext::with(TestOptions {
        transcoder: FakeTranscoder::failing("moov atom not found"),
        ..Default::default()
    })
    .await;
    let existing = ctx.seed_profile("demo");
    let before = std::fs::read(&existing).unwrap();

    let response = ctx
        .client
        .post_multipart(UPLOAD_PATH, &[("userId", "demo")], &[voice_file(b"not audio")])
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_code("TRANSCODER_FAILED")
        .assert_error_message("moov atom not found");

    assert_eq!(ctx.profile_files("demo"), vec![existing.clone()]);
    assert_eq!(std::fs::read(&existing).unwrap(), before);
    assert!(ctx.work_files().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_fail_before_conversion_when_upload_cannot_be_saved(ctx: &TestContext) {
    // A plain file where the user's profile directory should be
    std::fs::write(ctx.config.profiles_dir.join("demo"), b"not a directory").unwrap();

    let response = ctx
        .client
        .post_multipart(UPLOAD_PATH, &[("userId", "demo")], &[voice_file(b"audio")])
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_code("UPLOAD_FAILED");
    assert_eq!(ctx.transcoder.convert_count(), 0);
    assert!(ctx.work_files().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_synthesize_with_uploaded_reference(ctx: &TestContext) {
    ctx.client
        .post_multipart(UPLOAD_PATH, &[("userId", "demo")], &[voice_file(b"my voice")])
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    ctx.client
        .post(
            "/tts/synthesize",
            &json!({ "text": "안녕하세요.", "userId": "demo", "language": "ko" }),
        )
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    let calls = ctx.engine.calls();
    assert_eq!(calls.len(), 1);
    let reference = calls[0].reference_wav.clone().unwrap();
    assert_eq!(reference, ctx.config.profiles_dir.join("demo").join("user_clean.wav"));
    assert_eq!(std::fs::read(reference).unwrap(), canonical(b"my voice"));
}
