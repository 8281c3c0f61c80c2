pub mod coqui_engine;
pub mod registry;
pub mod speech_engine;

pub use coqui_engine::{CoquiTtsEngine, CoquiTtsLoader};
pub use registry::{EngineRegistry, RegistryError};
pub use speech_engine::{EngineInput, EngineLoader, SpeechEngine};
