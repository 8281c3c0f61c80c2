use crate::e2e::helpers;

use helpers::fakes::{FakeTranscoder, ScriptedEngine};
use helpers::{TestContext, TestOptions};
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_context::test_context;

fn numbered_sentences(count: usize) -> Vec<String> {
    (1..=count).map(|i| format!("문장 {}.", i)).collect()
}

async fn fetch_output(ctx: &TestContext, audio_url: &str) -> Vec<u8> {
    let response = ctx.client.get(audio_url).await.unwrap();
    response.assert_status(StatusCode::OK);
    response.body_bytes.clone()
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_synthesize_single_chunk_verbatim(ctx: &TestContext) {
    let reference = ctx.seed_profile("demo");

    let response = ctx
        .client
        .post(
            "/tts/synthesize",
            &json!({
                "text": "안녕. 반가워요.",
                "engine": "xtts",
                "userId": "demo"
            }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.body.as_ref().unwrap();
    let audio_url = body.get("audioUrl").and_then(|v| v.as_str()).unwrap();
    assert!(audio_url.starts_with("/generated/"));
    assert_eq!(body.get("chunks").and_then(|v| v.as_u64()), Some(1));
    assert_eq!(body.get("sentences").and_then(|v| v.as_u64()), Some(2));

    let calls = ctx.engine.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].text, "안녕. 반가워요.");
    assert_eq!(calls[0].reference_wav.as_deref(), Some(reference.as_path()));
    assert_eq!(calls[0].language, "ko");

    // Byte-identical copy of the only part, no transcoder involved
    assert_eq!(fetch_output(ctx, audio_url).await, ScriptedEngine::audio_for("안녕. 반가워요."));
    assert_eq!(ctx.transcoder.concat_count(), 0);
    assert_eq!(ctx.output_files().len(), 1);
    assert!(ctx.work_files().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_merge_chunks_in_order(ctx: &TestContext) {
    ctx.seed_profile("demo");
    let sentences = numbered_sentences(12);

    let response = ctx
        .client
        .post(
            "/tts/synthesize",
            &json!({
                "text": sentences.join(" "),
                "userId": "demo"
            }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.body.as_ref().unwrap();
    assert_eq!(body.get("chunks").and_then(|v| v.as_u64()), Some(3));

    let expected_chunks = vec![
        sentences[0..5].join(" "),
        sentences[5..10].join(" "),
        sentences[10..12].join(" "),
    ];
    let texts: Vec<String> = ctx.engine.calls().into_iter().map(|c| c.text).collect();
    assert_eq!(texts, expected_chunks);
    assert_eq!(ctx.transcoder.concat_count(), 1);

    let expected_audio: Vec<u8> = expected_chunks
        .iter()
        .flat_map(|chunk| ScriptedEngine::audio_for(chunk))
        .collect();
    let audio_url = body.get("audioUrl").and_then(|v| v.as_str()).unwrap();
    assert_eq!(fetch_output(ctx, audio_url).await, expected_audio);

    // Merged in the work area, never in place
    let merge_outputs = ctx.transcoder.outputs();
    assert_eq!(merge_outputs.len(), 1);
    assert!(merge_outputs[0].starts_with(&ctx.config.work_dir));

    // Parts and manifest are gone
    assert!(ctx.work_files().is_empty());
    assert_eq!(ctx.output_files().len(), 1);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_empty_text(ctx: &TestContext) {
    ctx.seed_profile("demo");

    for text in ["", "   \n  "] {
        let response = ctx
            .client
            .post("/tts/synthesize", &json!({ "text": text, "userId": "demo" }))
            .await
            .unwrap();

        response
            .assert_status(StatusCode::BAD_REQUEST)
            .assert_error_code("EMPTY_INPUT");
    }

    assert!(ctx.engine.calls().is_empty());
    assert_eq!(ctx.loader.load_count(), 0);
    assert!(ctx.output_files().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_refuse_disabled_engine_without_loading(ctx: &TestContext) {
    ctx.seed_profile("demo");

    let response = ctx
        .client
        .post(
            "/tts/synthesize",
            &json!({ "text": "안녕.", "engine": "kss", "userId": "demo" }),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_code("ENGINE_DISABLED")
        .assert_error_message("use 'xtts'");
    assert_eq!(ctx.loader.load_count(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_malformed_request(ctx: &TestContext) {
    for body in [json!({ "engine": "xtts" }), json!({ "text": 5 })] {
        let response = ctx.client.post("/tts/synthesize", &body).await.unwrap();

        response
            .assert_status(StatusCode::BAD_REQUEST)
            .assert_error_code("INVALID_ARGUMENT");
    }

    assert_eq!(ctx.loader.load_count(), 0);
    assert!(ctx.engine.calls().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_unknown_engine(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/tts/synthesize", &json!({ "text": "Hello.", "engine": "glow-tts" }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_code("UNSUPPORTED_ENGINE")
        .assert_error_message("glow-tts");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_require_uploaded_profile(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/tts/synthesize", &json!({ "text": "안녕.", "userId": "demo" }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_code("MISSING_REFERENCE_VOICE")
        .assert_error_message("userId=demo");
    assert!(ctx.engine.calls().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_require_user_id_for_voice_cloning(ctx: &TestContext) {
    for body in [json!({ "text": "안녕." }), json!({ "text": "안녕.", "userId": "  " })] {
        let response = ctx.client.post("/tts/synthesize", &body).await.unwrap();

        response
            .assert_status(StatusCode::BAD_REQUEST)
            .assert_error_code("MISSING_REFERENCE_VOICE")
            .assert_error_message("requires userId");
    }
    assert!(ctx.engine.calls().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_unsafe_user_id(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/tts/synthesize", &json!({ "text": "안녕.", "userId": "../etc" }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_code("INVALID_ARGUMENT");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_load_engine_once_across_requests(ctx: &TestContext) {
    ctx.seed_profile("demo");

    for text in ["첫 번째.", "두 번째."] {
        ctx.client
            .post("/tts/synthesize", &json!({ "text": text, "userId": "demo" }))
            .await
            .unwrap()
            .assert_status(StatusCode::OK);
    }

    assert_eq!(ctx.loader.load_count(), 1);
    assert_eq!(ctx.output_files().len(), 2);
}

#[tokio::test]
async fn it_should_stop_at_first_engine_failure_and_clean_up() {
    let ctx = TestContext::with(TestOptions {
        engine: ScriptedEngine::failing_on(1),
        ..Default::default()
    })
    .await;
    ctx.seed_profile("demo");

    let response = ctx
        .client
        .post(
            "/tts/synthesize",
            &json!({ "text": numbered_sentences(12).join(" "), "userId": "demo" }),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_error_code("ENGINE_SYNTHESIS_FAILED")
        .assert_error_message("chunk 1");

    assert_eq!(ctx.engine.calls().len(), 2);
    assert_eq!(ctx.transcoder.concat_count(), 0);
    assert!(ctx.output_files().is_empty());
    assert!(ctx.work_files().is_empty());
}

#[tokio::test]
async fn it_should_fail_when_engine_writes_no_audio() {
    let ctx = TestContext::with(TestOptions {
        engine: ScriptedEngine::silent_on(0),
        ..Default::default()
    })
    .await;
    ctx.seed_profile("demo");

    let response = ctx
        .client
        .post("/tts/synthesize", &json!({ "text": "안녕.", "userId": "demo" }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_error_code("ENGINE_SYNTHESIS_FAILED");
    assert!(ctx.output_files().is_empty());
}

#[tokio::test]
async fn it_should_require_transcoder_only_for_multiple_chunks() {
    let ctx = TestContext::with(TestOptions {
        transcoder: FakeTranscoder::unavailable(),
        ..Default::default()
    })
    .await;
    ctx.seed_profile("demo");

    // One chunk: plain copy, no transcoder needed
    ctx.client
        .post("/tts/synthesize", &json!({ "text": "안녕. 반가워요.", "userId": "demo" }))
        .await
        .unwrap()
        .assert_status(StatusCode::OK);
    assert_eq!(ctx.output_files().len(), 1);

    let response = ctx
        .client
        .post(
            "/tts/synthesize",
            &json!({ "text": numbered_sentences(6).join(" "), "userId": "demo" }),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_error_code("TRANSCODER_UNAVAILABLE")
        .assert_error_message("FFMPEG_PATH");
    assert_eq!(ctx.output_files().len(), 1);
    assert!(ctx.work_files().is_empty());
}

#[tokio::test]
async fn it_should_not_publish_output_when_merge_fails() {
    let ctx = TestContext::with(TestOptions {
        transcoder: FakeTranscoder::failing("Invalid data found when processing input"),
        ..Default::default()
    })
    .await;
    ctx.seed_profile("demo");

    let response = ctx
        .client
        .post(
            "/tts/synthesize",
            &json!({ "text": numbered_sentences(7).join(" "), "userId": "demo" }),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_error_code("TRANSCODER_FAILED")
        .assert_error_message("Invalid data found");
    assert_eq!(ctx.transcoder.concat_count(), 1);
    assert!(ctx.output_files().is_empty());
    assert!(ctx.work_files().is_empty());
}
