pub mod artifact_repository;
pub mod profile_repository;

pub use artifact_repository::{ArtifactRepository, OutputArtifact};
pub use profile_repository::ProfileRepository;
