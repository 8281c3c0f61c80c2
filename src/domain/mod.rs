pub mod profile;
pub mod tts;
