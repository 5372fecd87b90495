pub mod audio_models;
pub mod config;
pub mod encoding;
pub mod error;
pub mod recording;
pub mod state;
