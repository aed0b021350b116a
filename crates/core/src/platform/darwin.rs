use std::cell::Cell;
use std::path::Path;

use core_graphics::display::CGDisplay;
use core_graphics::event::CGEvent;
use core_graphics::event_source::{CGEventSource, CGEventSourceStateID};
use image::RgbaImage;

use crate::error::CaptureError;
use crate::logger;
use crate::types::*;
use super::{helper, PlatformProbe};

const SCREENCAPTURE: &str = "screencapture";

/// Quartz pointer queries plus `screencapture` for images.
///
/// `screencapture` always draws the cursor glyph over the pixel being
/// sampled, so colors are never reported here.
pub struct DarwinProbe {
    last: Cell<RawPosition>,
}

impl DarwinProbe {
    pub fn new() -> Self {
        logger::info_p("darwin", "pixel colors are unavailable on macOS (cursor is part of every capture)");
        DarwinProbe { last: Cell::new(RawPosition::default()) }
    }
}

impl PlatformProbe for DarwinProbe {
    fn name(&self) -> &'static str {
        "darwin"
    }

    fn position(&self) -> RawPosition {
        // Global display coordinates, origin at the top-left of the main display.
        let location = CGEventSource::new(CGEventSourceStateID::CombinedSessionState)
            .and_then(CGEvent::new)
            .map(|event| event.location());
        if let Ok(point) = location {
            self.last.set(RawPosition::new(point.x as i32, point.y as i32));
        }
        self.last.get()
    }

    fn screen_size(&self) -> ScreenGeometry {
        let main = CGDisplay::main();
        ScreenGeometry::new(main.pixels_wide() as i32, main.pixels_high() as i32)
    }

    fn capabilities(&self) -> PlatformCapabilities {
        PlatformCapabilities { color_sampling_reliable: false, screenshot_available: true }
    }

    fn capture(&self) -> Result<RgbaImage, CaptureError> {
        helper::capture_with_helper(SCREENCAPTURE, &["-x"], None)
    }

    fn save_screenshot(&self, path: &Path) -> Result<(), CaptureError> {
        helper::capture_with_helper(SCREENCAPTURE, &["-x"], Some(path)).map(|_| ())
    }
}
