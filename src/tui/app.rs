use anyhow::Result;
use chrono::NaiveDateTime;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph},
    Frame,
};
use std::sync::Arc;
use std::time::Duration;

use crate::audio::{AudioSession, Playback, Voice};
use crate::config::{AppConfig, Settings, SettingsStore};
use crate::models::Prayer;
use crate::notify::AdhanTrigger;
use crate::prayer_times::{
    next_prayer, Clock, NextPrayer, PrayerTimesProvider, SystemClock, TimingsRequest,
    TimingsSource,
};
use crate::tui::events::{Event, EventHandler};
use crate::tui::theme;
use crate::tui::widgets::settings_panel::SettingsRow;
use crate::tui::widgets::{
    adhan, detail, header, next_prayer as next_widget, prayers, settings_panel, statusbar,
};

const TICK_RATE: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum View {
    Dashboard,
    Detail,
    Settings,
    Help,
}

pub struct App {
    pub view: View,
    pub config: AppConfig,
    pub focus_idx: usize,
    pub settings_idx: usize,
    pub should_quit: bool,
    pub message: Option<String>,

    store: SettingsStore,
    provider: PrayerTimesProvider,
    audio: AudioSession,
    trigger: AdhanTrigger,
    clock: Box<dyn Clock>,

    // Refreshed every tick
    pub now: NaiveDateTime,
    pub next: Option<NextPrayer>,
    pub playing: Option<(Playback, Voice)>,
}

impl App {
    pub fn new(
        config: AppConfig,
        store: SettingsStore,
        source: Arc<dyn TimingsSource>,
        audio: AudioSession,
        clock: Box<dyn Clock>,
        armed: bool,
    ) -> Self {
        let now = clock.now();
        App {
            view: View::Dashboard,
            config,
            focus_idx: 0,
            settings_idx: 0,
            should_quit: false,
            message: None,
            store,
            provider: PrayerTimesProvider::new(source),
            audio,
            trigger: AdhanTrigger::new(armed),
            clock,
            now,
            next: None,
            playing: None,
        }
    }

    fn timings_request(&self) -> TimingsRequest {
        let settings = self.store.snapshot();
        TimingsRequest {
            date: self.now.date(),
            city: self.config.location.city.clone(),
            country: self.config.location.country.clone(),
            method: settings.method,
            school: settings.school,
        }
    }

    /// One step of the 1 s loop: make sure today's timings are requested,
    /// pick up finished fetches, re-derive the next prayer and let the
    /// trigger decide about the adhan.
    pub fn tick(&mut self) {
        self.now = self.clock.now();

        let req = self.timings_request();
        self.provider.request(req);
        self.provider.poll();

        self.next = self
            .provider
            .day()
            .map(|day| next_prayer(&day.timings, self.now.time()));

        if let Some(next) = &self.next {
            let fire = self
                .trigger
                .evaluate(self.now.date(), next, self.store.snapshot());
            if let Some((prayer, voice)) = fire {
                // Not retried; the trigger has already recorded the prayer
                if let Err(e) = self.audio.start(Playback::Adhan(prayer), voice) {
                    log::error!("[Audio] Adhan for {} did not start: {}", prayer, e);
                }
            }
        }

        self.refresh_playing();
    }

    fn refresh_playing(&mut self) {
        self.playing = self
            .audio
            .current()
            .zip(self.audio.current_voice());
    }

    pub fn focused_prayer(&self) -> Prayer {
        Prayer::ALL[self.focus_idx.min(Prayer::ALL.len() - 1)]
    }

    pub fn is_armed(&self) -> bool {
        self.trigger.is_armed()
    }

    pub fn settings(&self) -> &Settings {
        self.store.snapshot()
    }

    fn update_settings<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Settings),
    {
        match self.store.update(f) {
            Ok(()) => self.message = None,
            Err(e) => {
                log::error!("[Settings] {:#}", e);
                self.message = Some(format!("Could not save settings: {}", e));
            }
        }
    }

    fn preview(&mut self, prayer: Prayer) {
        let voice = self.store.snapshot().audio_sources.get(prayer);
        if let Err(e) = self.audio.toggle_preview(prayer, voice) {
            log::error!("[Audio] Preview blocked: {}", e);
        }
        self.refresh_playing();
    }

    fn stop_audio(&mut self) {
        self.audio.stop();
        self.refresh_playing();
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        // Some terminals also report release and repeat events
        if key.kind != KeyEventKind::Press {
            return;
        }
        match self.view {
            View::Dashboard => self.handle_dashboard_key(key),
            View::Detail => self.handle_detail_key(key),
            View::Settings => self.handle_settings_key(key),
            View::Help => self.handle_help_key(key),
        }
    }

    /// Keys that act on the focused prayer from both the list and its
    /// detail panel. Returns true if the key was used.
    fn handle_prayer_key(&mut self, key: KeyEvent) -> bool {
        let prayer = self.focused_prayer();
        match key.code {
            KeyCode::Char('n') => self.update_settings(|s| s.toggle_notification(prayer)),
            KeyCode::Char('v') => self.update_settings(|s| s.cycle_voice(prayer)),
            KeyCode::Char('p') => self.preview(prayer),
            KeyCode::Char('x') => self.stop_audio(),
            _ => return false,
        }
        true
    }

    fn handle_dashboard_key(&mut self, key: KeyEvent) {
        if self.handle_prayer_key(key) {
            return;
        }
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.audio.stop();
                self.should_quit = true;
            }
            KeyCode::Up => {
                self.focus_idx = self.focus_idx.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.focus_idx + 1 < Prayer::ALL.len() {
                    self.focus_idx += 1;
                }
            }
            KeyCode::Enter => self.view = View::Detail,
            KeyCode::Char('a') => self.trigger.toggle_armed(),
            KeyCode::Char('h') => self.update_settings(|s| s.toggle_school()),
            KeyCode::Char('m') => self.update_settings(|s| s.cycle_method()),
            KeyCode::Char('s') => self.view = View::Settings,
            KeyCode::Char('?') => self.view = View::Help,
            _ => {}
        }
    }

    fn handle_detail_key(&mut self, key: KeyEvent) {
        if self.handle_prayer_key(key) {
            return;
        }
        if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
            self.view = View::Dashboard;
        }
    }

    fn handle_settings_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('s') | KeyCode::Char('q') => {
                // Closing the panel also ends any preview started from it
                if matches!(self.playing, Some((Playback::Preview(_), _))) {
                    self.stop_audio();
                }
                self.view = View::Dashboard;
            }
            KeyCode::Up => {
                self.settings_idx = self.settings_idx.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.settings_idx + 1 < SettingsRow::COUNT {
                    self.settings_idx += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Right => {
                match SettingsRow::at(self.settings_idx) {
                    SettingsRow::School => self.update_settings(|s| s.toggle_school()),
                    SettingsRow::Method => self.update_settings(|s| s.cycle_method()),
                    SettingsRow::Voice(prayer) => self.update_settings(|s| s.cycle_voice(prayer)),
                }
            }
            KeyCode::Char('p') => {
                if let SettingsRow::Voice(prayer) = SettingsRow::at(self.settings_idx) {
                    self.preview(prayer);
                }
            }
            KeyCode::Char('x') => self.stop_audio(),
            _ => {}
        }
    }

    fn handle_help_key(&mut self, key: KeyEvent) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            self.view = View::Dashboard;
        }
    }

    pub fn draw(&self, frame: &mut Frame) {
        self.draw_dashboard(frame);

        match self.view {
            View::Dashboard => {}
            View::Detail => self.draw_detail(frame),
            View::Settings => self.draw_settings(frame),
            View::Help => self.draw_help_overlay(frame),
        }
    }

    fn draw_dashboard(&self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(theme::base()), area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5), // header
                Constraint::Length(8), // next prayer
                Constraint::Length(7), // prayers
                Constraint::Length(4), // adhan
                Constraint::Min(0),
                Constraint::Length(1), // status bar
            ])
            .split(area);

        let day = self.provider.day();
        header::render(
            frame,
            chunks[0],
            self.now.date(),
            &self.config.location.label(),
            day.map(|d| &d.hijri),
        );

        next_widget::render(
            frame,
            chunks[1],
            self.provider.state(),
            self.next.as_ref(),
            self.now.time(),
        );

        prayers::render(
            frame,
            chunks[2],
            day.map(|d| &d.timings),
            self.store.snapshot(),
            self.next.as_ref().map(|n| n.prayer),
            self.focus_idx,
        );

        let next_voice = self
            .next
            .as_ref()
            .map(|n| self.store.snapshot().audio_sources.get(n.prayer));
        adhan::render(frame, chunks[3], self.is_armed(), self.playing, next_voice);

        if let Some(method) = day.and_then(|d| d.method_name.as_deref()) {
            let line = Line::from(Span::styled(format!("  {}", method), theme::dim()));
            frame.render_widget(Paragraph::new(line), chunks[4]);
        }

        statusbar::render(frame, chunks[5], self.message.as_deref());
    }

    fn draw_detail(&self, frame: &mut Frame) {
        let area = frame.area();
        let width = 44u16.min(area.width);
        let panel = Rect {
            x: area.width - width,
            y: 0,
            width,
            height: area.height,
        };
        let prayer = self.focused_prayer();
        let window = self.provider.day().map(|d| d.timings.window(prayer));
        let settings = self.store.snapshot();
        detail::render(
            frame,
            panel,
            prayer,
            window.as_ref(),
            settings.notifications.enabled(prayer),
            settings.audio_sources.get(prayer),
        );
    }

    fn draw_settings(&self, frame: &mut Frame) {
        let area = frame.area();
        let popup = centered(area, 48, 15);
        settings_panel::render(
            frame,
            popup,
            self.store.snapshot(),
            self.settings_idx,
            self.playing.map(|(kind, _)| kind),
        );
    }

    fn draw_help_overlay(&self, frame: &mut Frame) {
        let area = frame.area();
        let popup_area = centered(area, 44, 17);
        frame.render_widget(Clear, popup_area);

        let bindings = [
            ("[↑ ↓]", "Select prayer"),
            ("[Enter]", "Prayer window details"),
            ("[n]", "Toggle notification"),
            ("[v]", "Cycle muazzin voice"),
            ("[p]", "Preview voice / stop preview"),
            ("[x]", "Stop audio"),
            ("[a]", "Arm / disarm auto-adhan"),
            ("[h]", "Toggle Asr school"),
            ("[m]", "Cycle calculation method"),
            ("[s]", "Settings panel"),
            ("[?]", "Toggle help"),
            ("[q] [Esc]", "Quit"),
        ];

        let mut help_text = vec![
            Line::from(Span::styled(
                "  Keybindings",
                theme::gold().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        for (key, what) in bindings {
            help_text.push(Line::from(vec![
                Span::styled(format!("  {:<12}", key), theme::gold()),
                Span::styled(what, theme::dim()),
            ]));
        }

        let paragraph = Paragraph::new(help_text).block(theme::panel(" Help ", true));
        frame.render_widget(paragraph, popup_area);
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Run the TUI event loop.
pub fn run(
    config: AppConfig,
    store: SettingsStore,
    source: Arc<dyn TimingsSource>,
    audio: AudioSession,
    armed: bool,
) -> Result<()> {
    let mut app = App::new(config, store, source, audio, Box::new(SystemClock), armed);
    app.tick();

    let mut terminal = ratatui::init();
    let events = EventHandler::new(TICK_RATE);

    let result = loop {
        if let Err(e) = terminal.draw(|frame| app.draw(frame)) {
            break Err(e.into());
        }

        match events.next() {
            Ok(Event::Key(key)) => {
                app.handle_key(key);
                if app.should_quit {
                    break Ok(());
                }
            }
            Ok(Event::Resize) => {}
            Ok(Event::Tick) => app.tick(),
            Err(e) => break Err(e.into()),
        }
    };

    ratatui::restore();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::session::fake::RecordingBackend;
    use crate::prayer_times::provider::fake::FakeSource;
    use crate::prayer_times::schedule::FixedClock;
    use crossterm::event::KeyModifiers;
    use std::rc::Rc;

    struct SharedClock(Rc<FixedClock>);

    impl Clock for SharedClock {
        fn now(&self) -> NaiveDateTime {
            self.0.now()
        }
    }

    struct Harness {
        app: App,
        source: Arc<FakeSource>,
        audio: RecordingBackend,
        clock: Rc<FixedClock>,
        _dir: tempfile::TempDir,
    }

    fn harness(h: u32, m: u32, s: u32, armed: bool) -> Harness {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::open(dir.path().join("settings.json"));
        let audio = RecordingBackend::default();
        let clock = Rc::new(FixedClock::at(2026, 10, 19, h, m, s));
        let source = FakeSource::ok();
        let app = App::new(
            AppConfig::default(),
            store,
            source.clone(),
            AudioSession::new(Box::new(audio.clone())),
            Box::new(SharedClock(Rc::clone(&clock))),
            armed,
        );
        Harness {
            app,
            source,
            audio,
            clock,
            _dir: dir,
        }
    }

    /// Tick until the fake fetch lands.
    fn load(app: &mut App) {
        app.tick();
        app.provider.wait(Duration::from_secs(5)).unwrap();
        app.tick();
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn tick_derives_next_prayer_once_loaded() {
        let mut h = harness(13, 0, 0, false);
        load(&mut h.app);
        let next = h.app.next.clone().unwrap();
        assert_eq!(next.prayer, Prayer::Asr);
        assert_eq!(next.diff_minutes, 150);
    }

    #[test]
    fn armed_app_plays_adhan_once_at_start_minute() {
        let mut h = harness(15, 29, 58, true);
        load(&mut h.app);
        for _ in 0..30 {
            h.clock.advance_secs(1);
            h.app.tick();
        }
        assert_eq!(h.audio.plays(), vec![Voice::Makkah]);
        assert_eq!(h.app.playing, Some((Playback::Adhan(Prayer::Asr), Voice::Makkah)));
    }

    #[test]
    fn disabled_prayer_stays_silent_but_preview_still_plays() {
        let mut h = harness(15, 29, 58, true);
        load(&mut h.app);

        h.app.focus_idx = Prayer::Asr.index();
        press(&mut h.app, KeyCode::Char('n'));
        assert!(!h.app.settings().notifications.enabled(Prayer::Asr));

        for _ in 0..10 {
            h.clock.advance_secs(1);
            h.app.tick();
        }
        assert!(h.audio.plays().is_empty());

        press(&mut h.app, KeyCode::Char('p'));
        assert_eq!(h.audio.plays(), vec![Voice::Makkah]);
        assert_eq!(h.app.playing.map(|(k, _)| k), Some(Playback::Preview(Prayer::Asr)));
    }

    #[test]
    fn changing_method_refetches_with_new_key() {
        let mut h = harness(9, 0, 0, false);
        load(&mut h.app);
        press(&mut h.app, KeyCode::Char('m'));
        assert_eq!(h.app.settings().method, 2);
        load(&mut h.app);

        let calls = h.source.calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].method, 2);
        assert!(h.app.provider.day().is_some());
    }

    #[test]
    fn settings_panel_cycles_selected_voice() {
        let mut h = harness(9, 0, 0, false);
        press(&mut h.app, KeyCode::Char('s'));
        assert_eq!(h.app.view, View::Settings);
        // School, Method, then Fajr's voice
        press(&mut h.app, KeyCode::Down);
        press(&mut h.app, KeyCode::Down);
        press(&mut h.app, KeyCode::Enter);
        assert_eq!(h.app.settings().audio_sources.get(Prayer::Fajr), Voice::Madina);

        press(&mut h.app, KeyCode::Char('p'));
        assert_eq!(h.audio.plays(), vec![Voice::Madina]);
        press(&mut h.app, KeyCode::Esc);
        assert_eq!(h.app.view, View::Dashboard);
        assert!(h.app.playing.is_none());
    }

    #[test]
    fn arm_key_toggles_trigger() {
        let mut h = harness(9, 0, 0, false);
        press(&mut h.app, KeyCode::Char('a'));
        assert!(h.app.is_armed());
        press(&mut h.app, KeyCode::Char('a'));
        assert!(!h.app.is_armed());
    }
}
