//! Real-clock runs of a session against the stub probe.
//!
//! Unit tests drive the timer queue with synthetic instants; these check that
//! the same code keeps its cadence when it actually sleeps.

use std::thread;
use std::time::{Duration, Instant};

use libtest_mimic::{Arguments, Failed, Trial};

use mouseinfo_core::platform::stub::StubProbe;
use mouseinfo_core::session::Session;
use mouseinfo_core::settings::Settings;
use mouseinfo_core::sinks::{FsSink, MemoryClipboard};
use mouseinfo_core::types::*;

const SLACK: Duration = Duration::from_millis(300);

fn rig(delay: bool, refresh_ms: u64) -> (Session, StubProbe, MemoryClipboard) {
    let probe = StubProbe::new(
        ScreenGeometry::new(640, 480),
        PlatformCapabilities { color_sampling_reliable: true, screenshot_available: true },
    );
    probe.set_position(RawPosition::new(64, 48));
    let clipboard = MemoryClipboard::new();
    let settings = Settings { delay_enabled: delay, refresh_interval_ms: refresh_ms, ..Settings::default() };
    let session = Session::new(
        Box::new(probe.clone()),
        Box::new(clipboard.clone()),
        Box::new(FsSink),
        &settings,
    );
    (session, probe, clipboard)
}

/// Sleep until the next deadline and pump, until `done` or `limit` passes.
fn drive(session: &mut Session, limit: Duration, mut done: impl FnMut(&Session) -> bool) -> Duration {
    let t0 = Instant::now();
    while !done(session) && t0.elapsed() < limit {
        let wait = match session.next_deadline() {
            Some(due) => due.saturating_duration_since(Instant::now()),
            None => Duration::from_millis(5),
        };
        thread::sleep(wait);
        session.pump(Instant::now());
    }
    t0.elapsed()
}

fn delayed_copy_takes_three_seconds() -> Result<(), Failed> {
    let (mut session, _probe, clipboard) = rig(true, 100);
    session.start(Instant::now());
    session.trigger(ActionKind::CopyXY, Instant::now());

    let elapsed = drive(&mut session, Duration::from_secs(6), |_| !clipboard.history().is_empty());
    if elapsed < Duration::from_secs(3) || elapsed > Duration::from_secs(3) + SLACK {
        return Err(format!("copy fired after {:?}", elapsed).into());
    }
    if clipboard.history() != ["64,48"] {
        return Err(format!("clipboard holds {:?}", clipboard.history()).into());
    }
    Ok(())
}

fn labels_count_down_once_per_second() -> Result<(), Failed> {
    let (mut session, _probe, _clipboard) = rig(true, 100);
    session.start(Instant::now());
    session.trigger(ActionKind::LogAll, Instant::now());

    let mut seen = vec![session.label(ActionKind::LogAll)];
    drive(&mut session, Duration::from_secs(5), |s| {
        let label = s.label(ActionKind::LogAll);
        if seen.last() != Some(&label) {
            seen.push(label);
        }
        !s.log().is_empty()
    });
    let want = ["Log in 3", "Log in 2", "Log in 1", "Log All"];
    if seen != want {
        return Err(format!("labels went {:?}", seen).into());
    }
    Ok(())
}

fn refresh_keeps_its_interval() -> Result<(), Failed> {
    let (mut session, probe, _clipboard) = rig(false, 50);
    session.start(Instant::now());
    let before = probe.captures();

    drive(&mut session, Duration::from_secs(1), |_| false);
    let ticks = probe.captures() - before;
    // 20 ticks nominal; a loaded machine only ever delivers fewer
    if !(14..=21).contains(&ticks) {
        return Err(format!("{} refresh ticks in one second", ticks).into());
    }
    if session.pending_refreshes() != 1 {
        return Err("refresh timeline lost its pending tick".into());
    }
    Ok(())
}

fn pointer_moves_show_up_within_one_tick() -> Result<(), Failed> {
    let (mut session, probe, _clipboard) = rig(false, 100);
    session.start(Instant::now());
    probe.set_position(RawPosition::new(600, 10));

    let elapsed = drive(&mut session, Duration::from_secs(1), |s| s.sample().display_xy() == (600, 10));
    if elapsed > Duration::from_millis(100) + SLACK {
        return Err(format!("sample caught up after {:?}", elapsed).into());
    }
    Ok(())
}

fn close_ends_the_timeline() -> Result<(), Failed> {
    let (mut session, _probe, _clipboard) = rig(false, 20);
    session.start(Instant::now());
    drive(&mut session, Duration::from_millis(100), |_| false);
    session.close();
    drive(&mut session, Duration::from_millis(100), |_| false);
    if session.pending_timers() != 0 {
        return Err(format!("{} timers still pending", session.pending_timers()).into());
    }
    Ok(())
}

fn main() {
    let args = Arguments::from_args();

    let tests = vec![
        Trial::test("delayed_copy_takes_three_seconds", delayed_copy_takes_three_seconds),
        Trial::test("labels_count_down_once_per_second", labels_count_down_once_per_second),
        Trial::test("refresh_keeps_its_interval", refresh_keeps_its_interval),
        Trial::test("pointer_moves_show_up_within_one_tick", pointer_moves_show_up_within_one_tick),
        Trial::test("close_ends_the_timeline", close_ends_the_timeline),
    ];

    libtest_mimic::run(&args, tests).exit();
}
