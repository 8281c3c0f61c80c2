use std::path::PathBuf;
use uuid::Uuid;

/// Final audio file of one synthesis call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputArtifact {
    pub id: String,
    pub path: PathBuf,
}

/// Where synthesized audio is published, plus the private work area used for
/// per-chunk files and concat manifests.
pub struct ArtifactRepository {
    output_dir: PathBuf,
    work_dir: PathBuf,
    public_prefix: String,
}

impl ArtifactRepository {
    pub fn new(output_dir: impl Into<PathBuf>, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            work_dir: work_dir.into(),
            public_prefix: "/generated".to_string(),
        }
    }

    /// Reserve a fresh, never reused output location
    pub fn allocate(&self) -> OutputArtifact {
        let id = Uuid::new_v4().simple().to_string();
        let path = self.output_dir.join(format!("{}.wav", id));
        OutputArtifact { id, path }
    }

    /// Work-area location the output is produced at before it is published
    pub fn staging_path(&self, artifact: &OutputArtifact) -> PathBuf {
        self.work_dir.join(format!("{}.wav", artifact.id))
    }

    pub fn intermediate_path(&self, artifact: &OutputArtifact, chunk_index: usize) -> PathBuf {
        self.work_dir
            .join(format!("{}_part{}.wav", artifact.id, chunk_index))
    }

    pub fn manifest_path(&self, artifact: &OutputArtifact) -> PathBuf {
        self.work_dir.join(format!("{}_concat.txt", artifact.id))
    }

    pub fn locator(&self, artifact: &OutputArtifact) -> String {
        format!("{}/{}.wav", self.public_prefix, artifact.id)
    }
}
