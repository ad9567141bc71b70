pub mod backend;
pub mod energy;
pub mod file;
pub mod scripted;

pub use backend::{AudioBackend, AudioBackendConfig, AudioBackendFactory, AudioFrame, AudioSource};
pub use energy::{band_energy, rms};
pub use file::AudioFile;
pub use scripted::ScriptedBackend;
