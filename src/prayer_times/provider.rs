use anyhow::{anyhow, Result};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use crate::prayer_times::client::{DayTimings, FetchError, TimingsRequest, TimingsSource};

#[derive(Debug, Clone, PartialEq)]
pub enum FetchState {
    Idle,
    Loading,
    Ready(DayTimings),
    Failed(String),
}

type FetchResult = (TimingsRequest, Result<DayTimings, FetchError>);

/// Fetches one day of timings per request key on a worker thread and holds
/// the latest result. Results for a key that is no longer current are
/// dropped. A failed key is not retried until the key changes.
pub struct PrayerTimesProvider {
    source: Arc<dyn TimingsSource>,
    current: Option<TimingsRequest>,
    state: FetchState,
    tx: Sender<FetchResult>,
    rx: Receiver<FetchResult>,
}

impl PrayerTimesProvider {
    pub fn new(source: Arc<dyn TimingsSource>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            source,
            current: None,
            state: FetchState::Idle,
            tx,
            rx,
        }
    }

    /// Ask for the timings identified by `req`. Returns true if this started a
    /// fetch; asking again for the current key does nothing.
    pub fn request(&mut self, req: TimingsRequest) -> bool {
        if self.current.as_ref() == Some(&req) {
            return false;
        }

        log::info!(
            "[Provider] Fetching {} for {}, {} (method {}, school {})",
            req.date,
            req.city,
            req.country,
            req.method,
            req.school.id()
        );
        self.current = Some(req.clone());
        self.state = FetchState::Loading;

        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let result = source.fetch(&req);
            // Receiver gone means the provider was dropped; nothing to report to
            let _ = tx.send((req, result));
        });
        true
    }

    /// Apply every result that has arrived. Returns true if the state changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok((req, result)) = self.rx.try_recv() {
            changed |= self.accept(req, result);
        }
        changed
    }

    /// Block until the current request settles or `timeout` passes.
    pub fn wait(&mut self, timeout: Duration) -> Result<&FetchState> {
        let deadline = Instant::now() + timeout;
        while self.state == FetchState::Loading {
            let left = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(left) {
                Ok((req, result)) => {
                    self.accept(req, result);
                }
                Err(RecvTimeoutError::Timeout) => {
                    return Err(anyhow!("Timed out waiting for prayer times"));
                }
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(anyhow!("Prayer times worker stopped"));
                }
            }
        }
        Ok(&self.state)
    }

    fn accept(&mut self, req: TimingsRequest, result: Result<DayTimings, FetchError>) -> bool {
        if self.current.as_ref() != Some(&req) {
            log::debug!("[Provider] Dropping stale response for {}", req.date);
            return false;
        }
        self.state = match result {
            Ok(day) => {
                log::info!("[Provider] Timings ready for {}", day.date);
                FetchState::Ready(day)
            }
            Err(e) => {
                log::error!("[Provider] Fetch for {} failed: {}", req.date, e);
                FetchState::Failed(e.user_message().to_string())
            }
        };
        true
    }

    pub fn state(&self) -> &FetchState {
        &self.state
    }

    pub fn day(&self) -> Option<&DayTimings> {
        match &self.state {
            FetchState::Ready(day) => Some(day),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            FetchState::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use crate::models::HijriDate;
    use crate::models::timings::sample_timings;
    use std::sync::Mutex;

    /// Answers from a script and records every request it sees.
    pub struct FakeSource {
        pub calls: Mutex<Vec<TimingsRequest>>,
        pub fail: bool,
    }

    impl FakeSource {
        pub fn ok() -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                fail: false,
            })
        }

        pub fn failing() -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                fail: true,
            })
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    pub fn day_for(req: &TimingsRequest) -> DayTimings {
        DayTimings {
            date: req.date,
            timings: sample_timings(),
            hijri: HijriDate {
                day: "08".to_string(),
                month_name: "Jumada al-Awwal".to_string(),
                year: "1448".to_string(),
                weekday: "Al Athnayn".to_string(),
                designation: "AH".to_string(),
                holidays: vec![],
            },
            method_name: None,
        }
    }

    impl TimingsSource for FakeSource {
        fn fetch(&self, req: &TimingsRequest) -> Result<DayTimings, FetchError> {
            self.calls.lock().unwrap().push(req.clone());
            if self.fail {
                Err(FetchError::Api {
                    code: 500,
                    status: "INTERNAL".to_string(),
                })
            } else {
                Ok(day_for(req))
            }
        }
    }
}
