pub mod stub;
pub mod hotkey;
#[cfg(unix)]
mod helper;

#[cfg(target_os = "macos")]
pub mod darwin;
#[cfg(target_os = "windows")]
pub mod win32;
#[cfg(all(unix, not(target_os = "macos")))]
pub mod x11;

use std::path::Path;

use image::RgbaImage;

use crate::error::{CaptureError, StartupError};
use crate::logger;
use crate::types::*;

/// Pointer, display and capture access for one desktop environment.
pub trait PlatformProbe {
    /// Short tag used as the log prefix.
    fn name(&self) -> &'static str;
    fn position(&self) -> RawPosition;
    fn screen_size(&self) -> ScreenGeometry;
    fn capabilities(&self) -> PlatformCapabilities;
    /// Full image of the primary display.
    fn capture(&self) -> Result<RgbaImage, CaptureError>;

    /// Write a capture to `path`, format chosen by extension.
    fn save_screenshot(&self, path: &Path) -> Result<(), CaptureError> {
        self.capture()?.save(path)?;
        Ok(())
    }
}

/// Pick the probe for the current OS. Called once; the result is used for
/// the life of the process.
pub fn create_probe(force_stub: bool) -> Result<Box<dyn PlatformProbe>, StartupError> {
    logger::register_prefix("sample", logger::COLOR_GRAY);
    logger::register_prefix("session", logger::COLOR_BLUE);
    if force_stub {
        logger::register_prefix("stub", logger::COLOR_GRAY);
        return Ok(Box::new(stub::StubProbe::demo()));
    }
    #[cfg(target_os = "macos")]
    {
        logger::register_prefix("darwin", logger::COLOR_GRAY);
        return Ok(Box::new(darwin::DarwinProbe::new()));
    }
    #[cfg(target_os = "windows")]
    {
        logger::register_prefix("win32", logger::COLOR_GRAY);
        return Ok(Box::new(win32::Win32Probe::new()));
    }
    #[cfg(all(unix, not(target_os = "macos")))]
    {
        logger::register_prefix("x11", logger::COLOR_GRAY);
        return Ok(Box::new(x11::X11Probe::open()?));
    }
    #[cfg(not(any(unix, target_os = "windows")))]
    {
        return Err(StartupError::DisplayUnavailable {
            reason: "unsupported operating system".into(),
            remediation: "Run with --stub to use the synthetic display.",
        });
    }
}
