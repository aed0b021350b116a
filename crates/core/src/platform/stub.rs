use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use image::{Rgba, RgbaImage};

use crate::error::CaptureError;
use crate::logger;
use crate::types::*;
use super::PlatformProbe;

/// Synthetic probe for `--stub` runs and tests.
///
/// Clones share state, so a test can keep a handle and move the pointer or
/// break the capture after giving the probe to a session.
#[derive(Clone)]
pub struct StubProbe {
    state: Rc<RefCell<StubState>>,
}

struct StubState {
    geometry: ScreenGeometry,
    caps: PlatformCapabilities,
    position: RawPosition,
    image: RgbaImage,
    failure: Option<String>,
    captures: usize,
    /// When set, the pointer drifts over the screen instead of staying put.
    animate_from: Option<Instant>,
}

impl StubProbe {
    pub fn new(geometry: ScreenGeometry, caps: PlatformCapabilities) -> Self {
        let image = gradient(geometry);
        Self {
            state: Rc::new(RefCell::new(StubState {
                geometry,
                caps,
                position: RawPosition::default(),
                image,
                failure: None,
                captures: 0,
                animate_from: None,
            })),
        }
    }

    /// Moving pointer over a gradient, for trying the UI without a display.
    pub fn demo() -> Self {
        let probe = Self::new(
            ScreenGeometry::new(1280, 720),
            PlatformCapabilities { color_sampling_reliable: true, screenshot_available: true },
        );
        probe.state.borrow_mut().animate_from = Some(Instant::now());
        logger::info_p("stub", "synthetic 1280x720 display");
        probe
    }

    pub fn set_position(&self, p: RawPosition) {
        self.state.borrow_mut().position = p;
    }

    pub fn set_pixel(&self, p: RawPosition, rgb: (u8, u8, u8)) {
        let mut s = self.state.borrow_mut();
        s.image.put_pixel(p.x as u32, p.y as u32, Rgba([rgb.0, rgb.1, rgb.2, 255]));
    }

    /// Make captures fail with `reason`, or succeed again on `None`.
    pub fn set_capture_failure(&self, reason: Option<&str>) {
        self.state.borrow_mut().failure = reason.map(str::to_string);
    }

    pub fn captures(&self) -> usize {
        self.state.borrow().captures
    }
}

impl PlatformProbe for StubProbe {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn position(&self) -> RawPosition {
        let s = self.state.borrow();
        match s.animate_from {
            Some(t0) => drift(s.geometry, t0.elapsed().as_secs_f64()),
            None => s.position,
        }
    }

    fn screen_size(&self) -> ScreenGeometry {
        self.state.borrow().geometry
    }

    fn capabilities(&self) -> PlatformCapabilities {
        self.state.borrow().caps
    }

    fn capture(&self) -> Result<RgbaImage, CaptureError> {
        let mut s = self.state.borrow_mut();
        s.captures += 1;
        if !s.caps.screenshot_available {
            return Err(CaptureError::Unavailable("stub has no screenshots".into()));
        }
        if let Some(reason) = &s.failure {
            return Err(CaptureError::Native(reason.clone()));
        }
        Ok(s.image.clone())
    }
}

/// Red across, green down, constant blue.
fn gradient(geometry: ScreenGeometry) -> RgbaImage {
    let (w, h) = (geometry.width.max(1) as u32, geometry.height.max(1) as u32);
    let scale = |v: u32, span: u32| (v as u64 * 255 / (span as u64 - 1).max(1)) as u8;
    RgbaImage::from_fn(w, h, |x, y| Rgba([scale(x, w), scale(y, h), 128, 255]))
}

/// Lissajous path that pokes slightly past the screen edges.
fn drift(geometry: ScreenGeometry, secs: f64) -> RawPosition {
    let (w, h) = (geometry.width as f64, geometry.height as f64);
    RawPosition::new(
        (w / 2.0 + 0.55 * w * (secs * 0.35).sin()) as i32,
        (h / 2.0 + 0.45 * h * (secs * 0.6).sin()) as i32,
    )
}
