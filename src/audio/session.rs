use thiserror::Error;

use crate::audio::Voice;
use crate::models::Prayer;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio output device: {0}")]
    Device(#[from] rodio::StreamError),
    #[error("could not start playback: {0}")]
    Play(#[from] rodio::PlayError),
    #[error("could not download clip: {0}")]
    Download(#[from] reqwest::Error),
    #[error("could not decode clip: {0}")]
    Decode(#[from] rodio::decoder::DecoderError),
    #[error("audio output unavailable")]
    Unavailable,
}

/// Where a playback request came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playback {
    Adhan(Prayer),
    Preview(Prayer),
}

pub trait AudioBackend {
    /// Begin playing `voice`. May return before any sound is produced.
    fn play(&mut self, voice: Voice) -> Result<(), AudioError>;
    fn stop(&mut self);
    /// Still loading or still producing sound.
    fn is_active(&self) -> bool;
}

/// The one audio output of the app. Starting a clip always stops whatever
/// was playing first, whether it was an adhan or a preview.
pub struct AudioSession {
    backend: Box<dyn AudioBackend>,
    current: Option<(Playback, Voice)>,
}

impl AudioSession {
    pub fn new(backend: Box<dyn AudioBackend>) -> Self {
        Self {
            backend,
            current: None,
        }
    }

    pub fn start(&mut self, kind: Playback, voice: Voice) -> Result<(), AudioError> {
        self.stop();
        self.backend.play(voice)?;
        log::info!("[Audio] Playing {} ({:?})", voice.as_str(), kind);
        self.current = Some((kind, voice));
        Ok(())
    }

    pub fn stop(&mut self) {
        if self.current.take().is_some() {
            log::debug!("[Audio] Stopping playback");
        }
        self.backend.stop();
    }

    /// Preview button behaviour: pressing it again on the prayer whose
    /// preview is playing stops it, otherwise the preview replaces whatever
    /// is playing.
    pub fn toggle_preview(&mut self, prayer: Prayer, voice: Voice) -> Result<(), AudioError> {
        if self.current() == Some(Playback::Preview(prayer)) {
            self.stop();
            return Ok(());
        }
        self.start(Playback::Preview(prayer), voice)
    }

    /// What is playing now. Clears itself once the backend has finished.
    pub fn current(&mut self) -> Option<Playback> {
        if self.current.is_some() && !self.backend.is_active() {
            self.current = None;
        }
        self.current.map(|(kind, _)| kind)
    }

    pub fn current_voice(&self) -> Option<Voice> {
        self.current.map(|(_, voice)| voice)
    }

    pub fn is_playing(&mut self) -> bool {
        self.current().is_some()
    }
}

/// Used when no output device could be opened. Refuses every clip.
pub struct NullBackend;

impl AudioBackend for NullBackend {
    fn play(&mut self, _voice: Voice) -> Result<(), AudioError> {
        Err(AudioError::Unavailable)
    }

    fn stop(&mut self) {}

    fn is_active(&self) -> bool {
        false
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Call {
        Play(Voice),
        Stop,
    }

    /// Records calls; stays "active" until `finish` is called.
    #[derive(Clone, Default)]
    pub struct RecordingBackend {
        pub calls: Rc<RefCell<Vec<Call>>>,
        pub active: Rc<RefCell<bool>>,
    }

    impl RecordingBackend {
        pub fn plays(&self) -> Vec<Voice> {
            self.calls
                .borrow()
                .iter()
                .filter_map(|c| match c {
                    Call::Play(v) => Some(*v),
                    Call::Stop => None,
                })
                .collect()
        }

        pub fn finish(&self) {
            *self.active.borrow_mut() = false;
        }
    }

    impl AudioBackend for RecordingBackend {
        fn play(&mut self, voice: Voice) -> Result<(), AudioError> {
            self.calls.borrow_mut().push(Call::Play(voice));
            *self.active.borrow_mut() = true;
            Ok(())
        }

        fn stop(&mut self) {
            self.calls.borrow_mut().push(Call::Stop);
            *self.active.borrow_mut() = false;
        }

        fn is_active(&self) -> bool {
            *self.active.borrow()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fake::{Call, RecordingBackend};
    use super::*;

    fn session() -> (AudioSession, RecordingBackend) {
        let backend = RecordingBackend::default();
        (AudioSession::new(Box::new(backend.clone())), backend)
    }

    #[test]
    fn start_stops_previous_clip_first() {
        let (mut session, backend) = session();
        session
            .start(Playback::Preview(Prayer::Asr), Voice::Madina)
            .unwrap();
        session
            .start(Playback::Adhan(Prayer::Maghrib), Voice::Makkah)
            .unwrap();

        assert_eq!(
            *backend.calls.borrow(),
            vec![
                Call::Stop,
                Call::Play(Voice::Madina),
                Call::Stop,
                Call::Play(Voice::Makkah)
            ]
        );
        assert_eq!(session.current(), Some(Playback::Adhan(Prayer::Maghrib)));
        assert_eq!(session.current_voice(), Some(Voice::Makkah));
    }

    #[test]
    fn preview_toggle_on_same_prayer_stops() {
        let (mut session, backend) = session();
        session.toggle_preview(Prayer::Fajr, Voice::Mishary).unwrap();
        assert_eq!(session.current(), Some(Playback::Preview(Prayer::Fajr)));

        session.toggle_preview(Prayer::Fajr, Voice::Mishary).unwrap();
        assert_eq!(session.current(), None);
        assert_eq!(backend.plays(), vec![Voice::Mishary]);
    }

    #[test]
    fn preview_on_other_prayer_replaces() {
        let (mut session, backend) = session();
        session.toggle_preview(Prayer::Fajr, Voice::Mishary).unwrap();
        session.toggle_preview(Prayer::Isha, Voice::Madina).unwrap();
        assert_eq!(session.current(), Some(Playback::Preview(Prayer::Isha)));
        assert_eq!(backend.plays(), vec![Voice::Mishary, Voice::Madina]);
    }

    #[test]
    fn finished_clip_clears_current() {
        let (mut session, backend) = session();
        session
            .start(Playback::Adhan(Prayer::Dhuhr), Voice::Makkah)
            .unwrap();
        backend.finish();
        assert!(!session.is_playing());
        // A finished preview can be started again with one press
        session.toggle_preview(Prayer::Dhuhr, Voice::Makkah).unwrap();
        assert!(session.is_playing());
    }

    #[test]
    fn null_backend_refuses() {
        let mut session = AudioSession::new(Box::new(NullBackend));
        let err = session
            .start(Playback::Adhan(Prayer::Fajr), Voice::Makkah)
            .unwrap_err();
        assert!(matches!(err, AudioError::Unavailable));
        assert!(!session.is_playing());
    }
}
