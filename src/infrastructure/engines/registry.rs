use super::speech_engine::{EngineLoader, SpeechEngine};
use moka::future::Cache;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("unknown engine: {0}")]
    Unsupported(String),
    #[error("{reason}")]
    Disabled { engine: String, reason: String },
    #[error("failed to load engine '{engine}': {message}")]
    LoadFailed { engine: String, message: String },
}

enum EngineEntry {
    Enabled(Arc<dyn EngineLoader>),
    Disabled(String),
}

/// Catalog of known engines plus the process-wide cache of loaded handles.
///
/// Handles are loaded on first use and kept for the life of the process.
/// Concurrent first requests for one engine share a single load.
pub struct EngineRegistry {
    catalog: HashMap<String, EngineEntry>,
    loaded: Cache<String, Arc<dyn SpeechEngine>>,
}

impl EngineRegistry {
    pub fn new() -> Self {
        Self {
            catalog: HashMap::new(),
            loaded: Cache::builder().build(),
        }
    }

    pub fn with_engine(mut self, engine_id: impl Into<String>, loader: Arc<dyn EngineLoader>) -> Self {
        self.catalog.insert(engine_id.into(), EngineEntry::Enabled(loader));
        self
    }

    /// Register an engine that is recognized but refused with `reason`
    pub fn with_disabled(mut self, engine_id: impl Into<String>, reason: impl Into<String>) -> Self {
        self.catalog.insert(engine_id.into(), EngineEntry::Disabled(reason.into()));
        self
    }

    /// Return the cached handle for `engine_id`, loading it on first use
    pub async fn get(&self, engine_id: &str) -> Result<Arc<dyn SpeechEngine>, RegistryError> {
        let loader = match self.catalog.get(engine_id) {
            None => return Err(RegistryError::Unsupported(engine_id.to_string())),
            Some(EngineEntry::Disabled(reason)) => {
                return Err(RegistryError::Disabled {
                    engine: engine_id.to_string(),
                    reason: reason.clone(),
                })
            }
            Some(EngineEntry::Enabled(loader)) => loader.clone(),
        };

        let engine = engine_id.to_string();
        self.loaded
            .try_get_with(engine_id.to_string(), async move {
                let start_time = std::time::Instant::now();
                tracing::info!(engine = %engine, "Loading speech engine");
                let handle = loader.load().await?;
                tracing::info!(
                    engine = %engine,
                    latency_ms = start_time.elapsed().as_millis(),
                    "Speech engine loaded"
                );
                Ok::<_, String>(handle)
            })
            .await
            .map_err(|e| RegistryError::LoadFailed {
                engine: engine_id.to_string(),
                message: e.to_string(),
            })
    }

    pub fn is_loaded(&self, engine_id: &str) -> bool {
        self.loaded.contains_key(engine_id)
    }
}

impl Default for EngineRegistry {
    fn default() -> Self {
        Self::new()
    }
}
