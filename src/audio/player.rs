use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::audio::session::{AudioBackend, AudioError};
use crate::audio::Voice;

type ClipCache = Arc<Mutex<HashMap<Voice, Arc<[u8]>>>>;

/// rodio output with clips fetched over HTTP. Each `play` gets a fresh sink
/// and a ticket; the download thread only appends to its sink if its ticket
/// is still the latest, so a slow download cannot resurrect a stopped clip.
pub struct RodioBackend {
    _stream: OutputStream,
    handle: OutputStreamHandle,
    sink: Option<Arc<Sink>>,
    ticket: Arc<AtomicU64>,
    loading: Arc<AtomicBool>,
    http: reqwest::blocking::Client,
    cache: ClipCache,
    volume: f32,
}

impl RodioBackend {
    pub fn new(volume: f32) -> Result<Self, AudioError> {
        let (_stream, handle) = OutputStream::try_default()?;
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(Self {
            _stream,
            handle,
            sink: None,
            ticket: Arc::new(AtomicU64::new(0)),
            loading: Arc::new(AtomicBool::new(false)),
            http,
            cache: Arc::new(Mutex::new(HashMap::new())),
            volume: volume.clamp(0.0, 1.0),
        })
    }
}

impl AudioBackend for RodioBackend {
    fn play(&mut self, voice: Voice) -> Result<(), AudioError> {
        self.stop();

        let sink = Arc::new(Sink::try_new(&self.handle)?);
        sink.set_volume(self.volume);
        self.sink = Some(Arc::clone(&sink));

        let my_ticket = self.ticket.fetch_add(1, Ordering::SeqCst) + 1;
        self.loading.store(true, Ordering::SeqCst);

        let ticket = Arc::clone(&self.ticket);
        let loading = Arc::clone(&self.loading);
        let cache = Arc::clone(&self.cache);
        let http = self.http.clone();

        std::thread::spawn(move || {
            let result = load_clip(&http, &cache, voice).and_then(|bytes| {
                let source = Decoder::new(Cursor::new(bytes))?;
                if ticket.load(Ordering::SeqCst) == my_ticket {
                    sink.append(source);
                }
                Ok(())
            });
            if let Err(e) = result {
                log::error!("[Audio] Playback of {} failed: {}", voice.as_str(), e);
            }
            if ticket.load(Ordering::SeqCst) == my_ticket {
                loading.store(false, Ordering::SeqCst);
            }
        });

        Ok(())
    }

    fn stop(&mut self) {
        self.ticket.fetch_add(1, Ordering::SeqCst);
        self.loading.store(false, Ordering::SeqCst);
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }

    fn is_active(&self) -> bool {
        self.loading.load(Ordering::SeqCst) || self.sink.as_ref().is_some_and(|s| !s.empty())
    }
}

fn load_clip(
    http: &reqwest::blocking::Client,
    cache: &ClipCache,
    voice: Voice,
) -> Result<Arc<[u8]>, AudioError> {
    if let Some(bytes) = cache.lock().ok().and_then(|c| c.get(&voice).cloned()) {
        return Ok(bytes);
    }

    log::debug!("[Audio] Downloading {}", voice.url());
    let bytes: Arc<[u8]> = http
        .get(voice.url())
        .send()?
        .error_for_status()?
        .bytes()?
        .to_vec()
        .into();

    if let Ok(mut c) = cache.lock() {
        c.insert(voice, Arc::clone(&bytes));
    }
    Ok(bytes)
}
