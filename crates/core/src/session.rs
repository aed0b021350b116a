use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::log_buffer::LogBuffer;
use crate::logger;
use crate::origin::OriginTransform;
use crate::platform::PlatformProbe;
use crate::refresh::RefreshLoop;
use crate::sample::{self, Sample};
use crate::scheduler::{ActionScheduler, ActionState, Step};
use crate::settings::Settings;
use crate::sinks::{Clipboard, FileSink};
use crate::timer::TimerQueue;
use crate::types::*;

/// Everything one open window owns.
///
/// All methods run on the thread that created the session; timer deliveries
/// and user input are the only entry points.
pub struct Session {
    probe: Box<dyn PlatformProbe>,
    caps: PlatformCapabilities,
    clipboard: Box<dyn Clipboard>,
    files: Box<dyn FileSink>,
    origin: OriginTransform,
    origin_text: String,
    sample: Sample,
    log: LogBuffer,
    actions: ActionScheduler,
    refresh: RefreshLoop,
    timers: TimerQueue<TimerEvent>,
    delay_enabled: bool,
    log_path: PathBuf,
    screenshot_path: PathBuf,
    status: String,
}

impl Session {
    pub fn new(
        probe: Box<dyn PlatformProbe>,
        clipboard: Box<dyn Clipboard>,
        files: Box<dyn FileSink>,
        settings: &Settings,
    ) -> Self {
        let caps = probe.capabilities();
        logger::info_p(
            "session",
            &format!(
                "probe {}: color sampling {}, screenshots {}",
                probe.name(),
                if caps.color_sampling_reliable { "on" } else { "off" },
                if caps.screenshot_available { "on" } else { "off" },
            ),
        );
        Self {
            probe,
            caps,
            clipboard,
            files,
            origin: OriginTransform::new(),
            origin_text: RawPosition::default().to_string(),
            sample: Sample::default(),
            log: LogBuffer::new(),
            actions: ActionScheduler::new(),
            refresh: RefreshLoop::new(settings.refresh_interval()),
            timers: TimerQueue::new(),
            delay_enabled: settings.delay_enabled,
            log_path: settings.log_path.clone(),
            screenshot_path: settings.screenshot_path.clone(),
            status: String::new(),
        }
    }

    /// Take the first sample and start the refresh timeline.
    pub fn start(&mut self, now: Instant) {
        self.refresh_sample();
        self.refresh.schedule(now, &mut self.timers);
    }

    /// Deliver every timer event due at `now`. Returns how many ran.
    pub fn pump(&mut self, now: Instant) -> usize {
        let mut delivered = 0;
        while let Some(event) = self.timers.pop_due(now) {
            self.handle(event, now);
            delivered += 1;
        }
        delivered
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_due()
    }

    fn handle(&mut self, event: TimerEvent, now: Instant) {
        match event {
            TimerEvent::Refresh => {
                if self.refresh.begin_tick() {
                    self.refresh_sample();
                    self.refresh.schedule(now, &mut self.timers);
                }
            }
            // Follow-up steps wait a full step from delivery, so a late pump
            // delivers at most one step per action.
            TimerEvent::Countdown(kind) => {
                let step = self.actions.tick(kind);
                self.apply(kind, step, now);
            }
        }
    }

    fn refresh_sample(&mut self) {
        let raw = self.probe.position();
        let geom = self.probe.screen_size();
        let probe = &self.probe;
        self.sample = sample::derive(raw, &self.origin, geom, self.caps, || probe.capture());
    }

    /// A button press: counts down first when the delay is on.
    pub fn trigger(&mut self, kind: ActionKind, now: Instant) {
        let step = self.actions.trigger(kind, self.delay_enabled);
        self.apply(kind, step, now);
    }

    /// Fire without a countdown, for the global hotkey.
    pub fn fire_now(&mut self, kind: ActionKind, now: Instant) {
        let step = self.actions.trigger(kind, false);
        self.apply(kind, step, now);
    }

    fn apply(&mut self, kind: ActionKind, step: Option<Step>, from: Instant) {
        match step {
            Some(Step::Wait(after)) => self.timers.schedule(from, after, TimerEvent::Countdown(kind)),
            Some(Step::Fire) => self.perform(kind),
            None => {}
        }
    }

    fn perform(&mut self, kind: ActionKind) {
        let Some(field) = kind.field() else {
            // SetOrigin reads the pointer itself rather than the last sample.
            let p = self.probe.position();
            self.origin.set(p);
            self.origin_text = p.to_string();
            self.post_status(format!("Set XY Origin to {}", p));
            return;
        };
        let text = self.sample.text(field);
        if kind.is_copy() {
            match self.clipboard.copy(&text) {
                Ok(()) => self.post_status(format!("Copied {}", text)),
                Err(e) => self.post_status(format!("Clipboard error: {}", e)),
            }
        } else {
            self.log.append(text.clone());
            self.post_status(format!("Logged {}", text));
        }
    }

    /// Manual origin entry. Text that is not "X, Y" is kept but ignored.
    pub fn set_origin_text(&mut self, text: &str) {
        self.origin_text = text.to_string();
        if let Some(p) = self.origin.set_from_text(text) {
            self.post_status(format!("Set XY Origin to {}", p));
        }
    }

    pub fn reset_origin(&mut self) {
        self.origin.reset();
        self.origin_text = self.origin.origin().to_string();
        self.post_status("Reset XY Origin to 0, 0".to_string());
    }

    pub fn save_log(&mut self) {
        let path = self.log_path.clone();
        match self.files.write_log(&path, &self.log.text()) {
            Ok(()) => self.post_status(format!("Log file saved to {}", path.display())),
            Err(e) => self.post_status(format!("ERROR: {}", e)),
        }
    }

    pub fn save_screenshot(&mut self) {
        let path = self.screenshot_path.clone();
        match self.probe.save_screenshot(&path) {
            Ok(()) => self.post_status(format!("Screenshot file saved to {}", path.display())),
            Err(e) => self.post_status(format!("ERROR: {}", e)),
        }
    }

    /// Window is closing; the refresh timeline ends at its next tick.
    pub fn close(&mut self) {
        self.refresh.stop();
        logger::info_p("session", "closed");
    }

    fn post_status(&mut self, message: String) {
        logger::info_p("session", &message);
        self.status = message;
    }

    pub fn set_delay_enabled(&mut self, on: bool) {
        self.delay_enabled = on;
    }

    pub fn set_log_path(&mut self, path: impl Into<PathBuf>) {
        self.log_path = path.into();
    }

    pub fn set_screenshot_path(&mut self, path: impl Into<PathBuf>) {
        self.screenshot_path = path.into();
    }

    pub fn delay_enabled(&self) -> bool {
        self.delay_enabled
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    pub fn screenshot_path(&self) -> &Path {
        &self.screenshot_path
    }

    pub fn sample(&self) -> &Sample {
        &self.sample
    }

    pub fn origin(&self) -> RawPosition {
        self.origin.origin()
    }

    pub fn origin_text(&self) -> &str {
        &self.origin_text
    }

    pub fn log(&self) -> &LogBuffer {
        &self.log
    }

    pub fn label(&self, kind: ActionKind) -> String {
        self.actions.label(kind)
    }

    pub fn action_state(&self, kind: ActionKind) -> ActionState {
        self.actions.state(kind)
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn probe_name(&self) -> &'static str {
        self.probe.name()
    }

    pub fn is_running(&self) -> bool {
        self.refresh.is_running()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn pending_refreshes(&self) -> usize {
        self.timers.count(|e| *e == TimerEvent::Refresh)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::platform::stub::StubProbe;
    use crate::sample::{NaReason, Validity};
    use crate::sinks::{FsSink, MemoryClipboard};

    const GEOM: ScreenGeometry = ScreenGeometry::new(1920, 1080);
    const RELIABLE: PlatformCapabilities =
        PlatformCapabilities { color_sampling_reliable: true, screenshot_available: true };
    const SEC: Duration = Duration::from_secs(1);

    struct Rig {
        session: Session,
        probe: StubProbe,
        clipboard: MemoryClipboard,
        t0: Instant,
    }

    fn rig(caps: PlatformCapabilities, delay: bool) -> Rig {
        let probe = StubProbe::new(GEOM, caps);
        probe.set_position(RawPosition::new(500, 300));
        probe.set_pixel(RawPosition::new(500, 300), (18, 52, 86));
        let clipboard = MemoryClipboard::new();
        let settings = Settings { delay_enabled: delay, ..Settings::default() };
        let mut session = Session::new(
            Box::new(probe.clone()),
            Box::new(clipboard.clone()),
            Box::new(FsSink),
            &settings,
        );
        let t0 = Instant::now();
        session.start(t0);
        Rig { session, probe, clipboard, t0 }
    }

    /// Pump once per countdown step, on time.
    fn run_countdown(r: &mut Rig) {
        for step in 1..=3 {
            r.session.pump(r.t0 + step * SEC);
        }
    }

    #[test]
    fn first_sample_matches_pixel_under_pointer() {
        let r = rig(RELIABLE, false);
        let s = r.session.sample();
        assert_eq!(s.validity(), Validity::Valid);
        assert_eq!(s.rgb(), Some((18, 52, 86)));
        assert_eq!(s.rgb_hex(), Some("#123456"));
        assert_eq!(s.display_xy(), (500, 300));
    }

    #[test]
    fn refresh_follows_pointer_and_origin() {
        let mut r = rig(RELIABLE, false);
        r.session.set_origin_text("100, 50");
        r.probe.set_position(RawPosition::new(2000, 300));

        assert_eq!(r.session.pump(r.t0 + Duration::from_millis(99)), 0);
        assert_eq!(r.session.pump(r.t0 + Duration::from_millis(100)), 1);

        let s = r.session.sample();
        assert_eq!(s.display_xy(), (1900, 250));
        assert_eq!(s.validity(), Validity::NotAvailable(NaReason::OutOfPrimaryBounds));
        assert_eq!(s.rgb(), None);
        assert_eq!(r.session.pending_refreshes(), 1);
    }

    #[test]
    fn delayed_copy_runs_three_second_countdown() {
        let mut r = rig(RELIABLE, true);
        let t0 = r.t0;
        r.session.trigger(ActionKind::CopyXY, t0);
        assert_eq!(r.session.label(ActionKind::CopyXY), "Copy in 3");

        // refresh ticks interleave with the countdown
        r.session.pump(t0 + SEC - Duration::from_millis(1));
        assert_eq!(r.session.label(ActionKind::CopyXY), "Copy in 3");

        r.session.pump(t0 + SEC);
        assert_eq!(r.session.label(ActionKind::CopyXY), "Copy in 2");
        r.session.pump(t0 + 2 * SEC);
        assert_eq!(r.session.label(ActionKind::CopyXY), "Copy in 1");
        assert!(r.clipboard.history().is_empty());

        r.probe.set_position(RawPosition::new(10, 20));
        r.session.pump(t0 + 3 * SEC);
        assert_eq!(r.session.label(ActionKind::CopyXY), "Copy XY");
        assert_eq!(r.session.action_state(ActionKind::CopyXY), ActionState::Idle);
        // the value copied is the sample current at firing time
        assert_eq!(r.clipboard.history(), ["10,20"]);
        assert_eq!(r.session.status(), "Copied 10,20");

        r.session.pump(t0 + 10 * SEC);
        assert_eq!(r.clipboard.history().len(), 1);
    }

    #[test]
    fn late_pump_delivers_one_countdown_step() {
        let mut r = rig(RELIABLE, true);
        r.session.trigger(ActionKind::CopyXY, r.t0);

        let late = r.t0 + Duration::from_millis(2500);
        r.session.pump(late);
        assert_eq!(r.session.label(ActionKind::CopyXY), "Copy in 2");
        assert!(r.clipboard.history().is_empty());

        // the next step waits a full second from the late delivery
        r.session.pump(late + SEC - Duration::from_millis(1));
        assert_eq!(r.session.label(ActionKind::CopyXY), "Copy in 2");
        r.session.pump(late + SEC);
        assert_eq!(r.session.label(ActionKind::CopyXY), "Copy in 1");
        r.session.pump(late + 2 * SEC);
        assert_eq!(r.clipboard.history(), ["500,300"]);
        assert_eq!(r.session.action_state(ActionKind::CopyXY), ActionState::Idle);
    }

    #[test]
    fn retrigger_during_countdown_fires_once() {
        let mut r = rig(RELIABLE, true);
        r.session.trigger(ActionKind::LogXY, r.t0);
        r.session.trigger(ActionKind::LogXY, r.t0 + Duration::from_millis(500));
        run_countdown(&mut r);
        r.session.pump(r.t0 + 5 * SEC);
        assert_eq!(r.session.log().lines(), ["500,300"]);
    }

    #[test]
    fn undelayed_actions_fire_immediately() {
        let mut r = rig(RELIABLE, false);
        r.session.trigger(ActionKind::CopyAll, r.t0);
        assert_eq!(r.clipboard.contents().as_deref(), Some("500,300 18,52,86 #123456"));

        r.session.trigger(ActionKind::LogRGB, r.t0);
        r.session.trigger(ActionKind::LogRGBHex, r.t0);
        assert_eq!(r.session.log().text(), "18,52,86\n#123456\n");
        assert_eq!(r.session.status(), "Logged #123456");
        assert_eq!(r.session.pending_timers(), 1);
    }

    #[test]
    fn restricted_platform_logs_markers() {
        let caps = PlatformCapabilities { color_sampling_reliable: false, screenshot_available: true };
        let mut r = rig(caps, false);
        r.session.trigger(ActionKind::LogAll, r.t0);
        assert_eq!(r.session.log().lines(), ["500,300 NA_platform_restricted NA_platform_restricted"]);
        assert_eq!(r.probe.captures(), 0);
    }

    #[test]
    fn clipboard_failure_only_changes_status() {
        let mut r = rig(RELIABLE, true);
        r.clipboard.set_failure(Some("no selection owner"));
        r.session.trigger(ActionKind::CopyRGB, r.t0);
        run_countdown(&mut r);
        assert_eq!(r.session.status(), "Clipboard error: no selection owner");
        assert_eq!(r.session.action_state(ActionKind::CopyRGB), ActionState::Idle);
        assert_eq!(r.session.label(ActionKind::CopyRGB), "Copy RGB");
        assert!(r.session.is_running());
    }

    #[test]
    fn set_origin_snapshots_position_at_fire_time() {
        let mut r = rig(RELIABLE, true);
        r.session.trigger(ActionKind::SetOrigin, r.t0);
        assert_eq!(r.session.label(ActionKind::SetOrigin), "Setting in 3");
        r.probe.set_position(RawPosition::new(640, 480));
        run_countdown(&mut r);

        assert_eq!(r.session.origin(), RawPosition::new(640, 480));
        assert_eq!(r.session.origin_text(), "640, 480");
        assert_eq!(r.session.status(), "Set XY Origin to 640, 480");

        r.session.pump(r.t0 + 3 * SEC + Duration::from_millis(100));
        assert_eq!(r.session.sample().display_xy(), (0, 0));

        r.session.reset_origin();
        r.session.reset_origin();
        assert_eq!(r.session.origin(), RawPosition::new(0, 0));
        assert_eq!(r.session.origin_text(), "0, 0");
    }

    #[test]
    fn bad_origin_text_is_ignored_silently() {
        let mut r = rig(RELIABLE, false);
        r.session.set_origin_text("12, 7");
        assert_eq!(r.session.origin(), RawPosition::new(12, 7));
        assert_eq!(r.session.status(), "Set XY Origin to 12, 7");

        r.session.set_origin_text("abc");
        assert_eq!(r.session.origin(), RawPosition::new(12, 7));
        assert_eq!(r.session.status(), "Set XY Origin to 12, 7");
        assert_eq!(r.session.origin_text(), "abc");
    }

    #[test]
    fn capture_failure_does_not_stop_refresh() {
        let mut r = rig(RELIABLE, false);
        r.probe.set_capture_failure(Some("helper vanished"));
        r.session.pump(r.t0 + Duration::from_millis(100));
        assert_eq!(r.session.sample().validity(), Validity::NotAvailable(NaReason::OutOfPrimaryBounds));
        assert_eq!(r.session.pending_refreshes(), 1);

        r.probe.set_capture_failure(None);
        r.session.pump(r.t0 + Duration::from_millis(200));
        assert_eq!(r.session.sample().validity(), Validity::Valid);
    }

    #[test]
    fn close_stops_rescheduling() {
        let mut r = rig(RELIABLE, false);
        r.session.close();
        assert_eq!(r.session.pump(r.t0 + SEC), 1);
        assert_eq!(r.session.pending_refreshes(), 0);
        assert_eq!(r.session.pump(r.t0 + 10 * SEC), 0);
        assert!(!r.session.is_running());
    }

    #[test]
    fn long_run_keeps_one_refresh_pending() {
        let mut r = rig(RELIABLE, true);
        for i in 1..=50u64 {
            if i % 7 == 0 {
                r.session.trigger(ActionKind::LogXY, r.t0 + Duration::from_millis(i * 100));
            }
            r.session.pump(r.t0 + Duration::from_millis(i * 100));
            assert_eq!(r.session.pending_refreshes(), 1);
        }
    }

    #[test]
    fn save_log_overwrites_with_full_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mouseInfoLog.txt");
        std::fs::write(&path, "stale contents that must go\n").unwrap();

        let mut r = rig(RELIABLE, false);
        r.session.set_log_path(&path);
        r.session.trigger(ActionKind::LogXY, r.t0);
        r.session.trigger(ActionKind::LogRGBHex, r.t0);
        r.session.save_log();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "500,300\n#123456\n");
        assert_eq!(r.session.status(), format!("Log file saved to {}", path.display()));
    }

    #[test]
    fn save_failures_become_error_status() {
        let dir = tempfile::tempdir().unwrap();
        let mut r = rig(RELIABLE, false);
        r.session.set_log_path(dir.path().join("missing").join("log.txt"));
        r.session.save_log();
        assert!(r.session.status().starts_with("ERROR: "), "{}", r.session.status());

        let caps = PlatformCapabilities { color_sampling_reliable: false, screenshot_available: false };
        let mut r = rig(caps, false);
        r.session.set_screenshot_path(dir.path().join("shot.png"));
        r.session.save_screenshot();
        assert!(r.session.status().starts_with("ERROR: "), "{}", r.session.status());
        assert!(r.session.is_running());
    }

    #[test]
    fn save_screenshot_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mouseInfoScreenshot.png");
        let mut r = rig(RELIABLE, false);
        r.session.set_screenshot_path(&path);
        r.session.save_screenshot();

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!((img.width(), img.height()), (1920, 1080));
        assert_eq!(img.get_pixel(500, 300).0, [18, 52, 86, 255]);
    }

    #[test]
    fn hotkey_fire_skips_countdown() {
        let mut r = rig(RELIABLE, true);
        r.session.fire_now(ActionKind::LogAll, r.t0);
        assert_eq!(r.session.log().len(), 1);
        assert_eq!(r.session.label(ActionKind::LogAll), "Log All");
    }
}
