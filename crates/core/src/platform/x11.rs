use std::os::raw::{c_int, c_uint};
use std::path::Path;
use std::ptr;

use image::RgbaImage;
use x11::xlib;

use crate::error::{CaptureError, StartupError};
use crate::logger;
use crate::types::*;
use super::{helper, PlatformProbe};

const SCROT: &str = "scrot";

/// Xlib pointer queries plus `scrot` for pixels.
pub struct X11Probe {
    display: *mut xlib::Display,
    screen: c_int,
    root: xlib::Window,
    scrot: bool,
}

impl X11Probe {
    /// Connect to `$DISPLAY` and look for the capture helper.
    pub fn open() -> Result<Self, StartupError> {
        // NULL means "use $DISPLAY"
        let display = unsafe { xlib::XOpenDisplay(ptr::null()) };
        if display.is_null() {
            return Err(StartupError::DisplayUnavailable {
                reason: format!(
                    "cannot open X display {:?}",
                    std::env::var("DISPLAY").unwrap_or_default()
                ),
                remediation: "MouseInfo needs an X11 server (XWayland works). \
                              Set DISPLAY, or run with --stub.",
            });
        }
        let screen = unsafe { xlib::XDefaultScreen(display) };
        let root = unsafe { xlib::XRootWindow(display, screen) };

        let scrot = match which::which(SCROT) {
            Ok(path) => {
                logger::info_p("x11", &format!("capture helper: {}", path.display()));
                true
            }
            Err(_) => {
                logger::warn_p(
                    "x11",
                    "scrot not found, colors and screenshots are disabled. Run: sudo apt-get install scrot",
                );
                false
            }
        };

        Ok(Self { display, screen, root, scrot })
    }
}

impl Drop for X11Probe {
    fn drop(&mut self) {
        unsafe {
            xlib::XCloseDisplay(self.display);
        }
    }
}

impl PlatformProbe for X11Probe {
    fn name(&self) -> &'static str {
        "x11"
    }

    fn position(&self) -> RawPosition {
        let (mut root_ret, mut child_ret): (xlib::Window, xlib::Window) = (0, 0);
        let (mut root_x, mut root_y, mut win_x, mut win_y): (c_int, c_int, c_int, c_int) = (0, 0, 0, 0);
        let mut mask: c_uint = 0;
        // Coordinates are filled in even when the pointer is on another screen.
        unsafe {
            xlib::XQueryPointer(
                self.display,
                self.root,
                &mut root_ret,
                &mut child_ret,
                &mut root_x,
                &mut root_y,
                &mut win_x,
                &mut win_y,
                &mut mask,
            );
        }
        RawPosition::new(root_x, root_y)
    }

    fn screen_size(&self) -> ScreenGeometry {
        unsafe {
            ScreenGeometry::new(
                xlib::XDisplayWidth(self.display, self.screen),
                xlib::XDisplayHeight(self.display, self.screen),
            )
        }
    }

    fn capabilities(&self) -> PlatformCapabilities {
        PlatformCapabilities { color_sampling_reliable: self.scrot, screenshot_available: self.scrot }
    }

    fn capture(&self) -> Result<RgbaImage, CaptureError> {
        scrot_capture(self.scrot, None)
    }

    // scrot picks the format from the name itself.
    fn save_screenshot(&self, path: &Path) -> Result<(), CaptureError> {
        scrot_capture(self.scrot, Some(path)).map(|_| ())
    }
}

/// Run `scrot`, or refuse up front when it was not found at startup.
fn scrot_capture(available: bool, keep: Option<&Path>) -> Result<RgbaImage, CaptureError> {
    if !available {
        return Err(CaptureError::Unavailable(
            "\"scrot\" must be installed to take screenshots on X11".into(),
        ));
    }
    helper::capture_with_helper(SCROT, &["-z"], keep)
}
