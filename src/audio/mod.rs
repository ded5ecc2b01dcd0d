pub mod player;
pub mod session;
pub mod voice;

pub use player::RodioBackend;
pub use session::{AudioBackend, AudioError, AudioSession, NullBackend, Playback};
pub use voice::Voice;

/// Open the default output device, or fall back to a backend that refuses
/// every clip so the rest of the app keeps running.
pub fn open_session(volume: f32) -> AudioSession {
    match RodioBackend::new(volume) {
        Ok(backend) => AudioSession::new(Box::new(backend)),
        Err(e) => {
            log::warn!("[Audio] {}; adhan playback disabled", e);
            AudioSession::new(Box::new(NullBackend))
        }
    }
}
