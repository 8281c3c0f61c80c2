use super::{Transcoder, TranscoderError, CANONICAL_CHANNELS, CANONICAL_CODEC, CANONICAL_SAMPLE_RATE};
use crate::infrastructure::process::{locate_program, stderr_excerpt, STDERR_EXCERPT_CHARS};
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// [`Transcoder`] backed by the `ffmpeg` binary
pub struct FfmpegTranscoder {
    program: PathBuf,
}

impl FfmpegTranscoder {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn canonical_output_args(output: &Path) -> Vec<OsString> {
        vec![
            "-ar".into(),
            CANONICAL_SAMPLE_RATE.to_string().into(),
            "-ac".into(),
            CANONICAL_CHANNELS.to_string().into(),
            "-c:a".into(),
            CANONICAL_CODEC.into(),
            output.into(),
        ]
    }

    fn convert_args(input: &Path, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-y".into(), "-i".into(), input.into()];
        args.extend(Self::canonical_output_args(output));
        args
    }

    fn concat_args(manifest: &Path, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-y".into(),
            "-f".into(),
            "concat".into(),
            "-safe".into(),
            "0".into(),
            "-i".into(),
            manifest.into(),
        ];
        args.extend(Self::canonical_output_args(output));
        args
    }

    /// Concat demuxer list: one `file '<path>'` line per input, in order
    fn concat_manifest(inputs: &[PathBuf]) -> String {
        inputs
            .iter()
            .map(|path| {
                let mut path = path.to_string_lossy().into_owned();
                if cfg!(windows) {
                    path = path.replace('\\', "/");
                }
                format!("file '{}'\n", path.replace('\'', r"'\''"))
            })
            .collect()
    }

    async fn run(&self, program: &Path, args: Vec<OsString>) -> Result<(), TranscoderError> {
        let output = Command::new(program)
            .args(&args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => TranscoderError::Unavailable(format!(
                    "ffmpeg not found at resolved path {}",
                    program.display()
                )),
                _ => TranscoderError::Io(e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::error!(
                status = %output.status,
                stderr = %stderr,
                "ffmpeg failed"
            );
            return Err(TranscoderError::Failed(stderr_excerpt(
                &output.stderr,
                STDERR_EXCERPT_CHARS,
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    fn ensure_available(&self) -> Result<PathBuf, TranscoderError> {
        locate_program(&self.program).ok_or_else(|| {
            TranscoderError::Unavailable(format!(
                "ffmpeg not found ('{}'). Install ffmpeg or set FFMPEG_PATH.",
                self.program.display()
            ))
        })
    }

    async fn convert_to_canonical(&self, input: &Path, output: &Path) -> Result<(), TranscoderError> {
        let program = self.ensure_available()?;
        tracing::debug!(input = %input.display(), output = %output.display(), "Converting to canonical wav");
        self.run(&program, Self::convert_args(input, output)).await
    }

    async fn concatenate(
        &self,
        inputs: &[PathBuf],
        manifest: &Path,
        output: &Path,
    ) -> Result<(), TranscoderError> {
        let program = self.ensure_available()?;
        tokio::fs::write(manifest, Self::concat_manifest(inputs)).await?;
        tracing::debug!(
            parts = inputs.len(),
            manifest = %manifest.display(),
            output = %output.display(),
            "Concatenating audio parts"
        );
        self.run(&program, Self::concat_args(manifest, output)).await
    }
}
