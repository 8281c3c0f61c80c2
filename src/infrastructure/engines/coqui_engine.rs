use super::speech_engine::{EngineInput, EngineLoader, SpeechEngine};
use crate::infrastructure::process::{locate_program, stderr_excerpt, STDERR_EXCERPT_CHARS};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::Mutex;

/// Runs inside the Python interpreter. Loads the model once, then answers one
/// JSON request per stdin line with one JSON reply per stdout line. Anything
/// the TTS library prints goes to stderr.
const WORKER_SCRIPT: &str = r#"
import json, sys
out = sys.stdout
sys.stdout = sys.stderr

def reply(message):
    out.write(json.dumps(message) + "\n")
    out.flush()

try:
    from TTS.api import TTS
    tts = TTS(sys.argv[1])
except Exception as e:
    reply({"ready": False, "error": str(e)})
    sys.exit(1)

reply({"ready": True})
for line in sys.stdin:
    request = json.loads(line)
    try:
        tts.tts_to_file(
            text=request["text"],
            speaker_wav=request.get("speaker_wav"),
            language=request["language"],
            file_path=request["out_path"],
        )
        reply({"id": request["id"], "ok": True})
    except Exception as e:
        reply({"id": request["id"], "ok": False, "error": str(e)})
"#;

#[derive(Debug, Serialize)]
struct WorkerRequest<'a> {
    id: u64,
    text: &'a str,
    speaker_wav: Option<&'a Path>,
    language: &'a str,
    out_path: &'a Path,
}

#[derive(Debug, Deserialize)]
struct WorkerReply {
    #[serde(default)]
    id: Option<u64>,
    #[serde(default)]
    ready: bool,
    #[serde(default)]
    ok: bool,
    error: Option<String>,
}

struct WorkerPipes {
    // Killed when the engine is dropped
    _child: Child,
    stdin: ChildStdin,
    replies: Lines<BufReader<ChildStdout>>,
}

impl WorkerPipes {
    /// Next stdout line that parses as a reply, `None` once the worker exits
    async fn next_reply(&mut self) -> Result<Option<WorkerReply>, String> {
        while let Some(line) = self
            .replies
            .next_line()
            .await
            .map_err(|e| format!("failed to read from Coqui TTS worker: {}", e))?
        {
            match serde_json::from_str::<WorkerReply>(line.trim()) {
                Ok(reply) => return Ok(Some(reply)),
                Err(_) => tracing::debug!(line = %line, "Ignoring worker output"),
            }
        }
        Ok(None)
    }
}

/// XTTS v2 served by a long-lived Coqui TTS worker process.
///
/// The model stays resident in the worker; calls are sent one at a time over
/// its stdin and matched to replies by id.
pub struct CoquiTtsEngine {
    model_name: String,
    next_id: AtomicU64,
    pipes: Mutex<WorkerPipes>,
}

#[async_trait]
impl SpeechEngine for CoquiTtsEngine {
    fn requires_reference_voice(&self) -> bool {
        true
    }

    async fn synthesize_to_file(&self, input: EngineInput<'_>, output: &Path) -> Result<(), String> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut request = serde_json::to_string(&WorkerRequest {
            id,
            text: input.text,
            speaker_wav: input.reference_wav,
            language: input.language,
            out_path: output,
        })
        .map_err(|e| format!("failed to encode worker request: {}", e))?;
        request.push('\n');

        tracing::debug!(
            model = %self.model_name,
            request_id = id,
            language = input.language,
            text_length = input.text.len(),
            "Sending chunk to Coqui TTS worker"
        );

        let mut pipes = self.pipes.lock().await;
        pipes
            .stdin
            .write_all(request.as_bytes())
            .await
            .map_err(|e| format!("Coqui TTS worker is not accepting requests: {}", e))?;
        pipes
            .stdin
            .flush()
            .await
            .map_err(|e| format!("Coqui TTS worker is not accepting requests: {}", e))?;

        loop {
            let reply = pipes.next_reply().await?.ok_or_else(|| {
                tracing::error!(model = %self.model_name, "Coqui TTS worker exited");
                "Coqui TTS worker exited".to_string()
            })?;

            // Replies to requests whose callers went away
            if reply.id != Some(id) {
                continue;
            }

            return if reply.ok {
                Ok(())
            } else {
                let error = reply.error.unwrap_or_else(|| "unknown worker error".to_string());
                Err(stderr_excerpt(error.as_bytes(), STDERR_EXCERPT_CHARS))
            };
        }
    }
}

/// Starts the Coqui TTS worker for one model and waits until the model is loaded
pub struct CoquiTtsLoader {
    program: PathBuf,
    args: Vec<OsString>,
    model_name: String,
}

impl CoquiTtsLoader {
    pub fn new(python: impl Into<PathBuf>, model_name: impl Into<String>) -> Self {
        let model_name = model_name.into();
        Self {
            program: python.into(),
            args: vec![
                "-u".into(),
                "-c".into(),
                WORKER_SCRIPT.into(),
                model_name.clone().into(),
            ],
            model_name,
        }
    }
}

#[async_trait]
impl EngineLoader for CoquiTtsLoader {
    async fn load(&self) -> Result<Arc<dyn SpeechEngine>, String> {
        let program = locate_program(&self.program).ok_or_else(|| {
            format!(
                "Python interpreter '{}' not found. Install Python with Coqui TTS (pip install TTS) or set TTS_PYTHON.",
                self.program.display()
            )
        })?;

        tracing::info!(
            program = %program.display(),
            model = %self.model_name,
            "Starting Coqui TTS worker"
        );

        let mut child = Command::new(&program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| format!("failed to start {}: {}", program.display(), e))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| "Coqui TTS worker stdin was not captured".to_string())?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| "Coqui TTS worker stdout was not captured".to_string())?;

        let mut pipes = WorkerPipes {
            _child: child,
            stdin,
            replies: BufReader::new(stdout).lines(),
        };

        match pipes.next_reply().await? {
            Some(reply) if reply.ready => {}
            Some(reply) => {
                return Err(format!(
                    "Coqui TTS could not load model '{}': {}",
                    self.model_name,
                    reply.error.unwrap_or_default()
                ))
            }
            None => {
                return Err(format!(
                    "Coqui TTS worker exited before model '{}' was loaded",
                    self.model_name
                ))
            }
        }

        tracing::info!(model = %self.model_name, "Coqui TTS model loaded");

        Ok(Arc::new(CoquiTtsEngine {
            model_name: self.model_name.clone(),
            next_id: AtomicU64::new(0),
            pipes: Mutex::new(pipes),
        }))
    }
}
