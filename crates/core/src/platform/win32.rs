use std::cell::Cell;

use image::RgbaImage;
use windows::Win32::Foundation::{HWND, POINT};
use windows::Win32::Graphics::Gdi::*;
use windows::Win32::UI::WindowsAndMessaging::{
    GetCursorPos, GetSystemMetrics, SetProcessDPIAware, SM_CXSCREEN, SM_CYSCREEN,
};

use crate::error::CaptureError;
use crate::logger;
use crate::types::*;
use super::PlatformProbe;

/// Direct Win32 cursor and GDI screen access.
pub struct Win32Probe {
    last: Cell<RawPosition>,
}

impl Win32Probe {
    pub fn new() -> Self {
        // Otherwise GetSystemMetrics reports scaled sizes on HiDPI displays.
        if !unsafe { SetProcessDPIAware() }.as_bool() {
            logger::warn_p("win32", "SetProcessDPIAware failed, coordinates may be scaled");
        }
        Win32Probe { last: Cell::new(RawPosition::default()) }
    }
}

impl PlatformProbe for Win32Probe {
    fn name(&self) -> &'static str {
        "win32"
    }

    fn position(&self) -> RawPosition {
        let mut pt = POINT::default();
        // Fails while the secure desktop is up; keep the last known position.
        if unsafe { GetCursorPos(&mut pt) }.is_ok() {
            self.last.set(RawPosition::new(pt.x, pt.y));
        }
        self.last.get()
    }

    fn screen_size(&self) -> ScreenGeometry {
        unsafe { ScreenGeometry::new(GetSystemMetrics(SM_CXSCREEN), GetSystemMetrics(SM_CYSCREEN)) }
    }

    fn capabilities(&self) -> PlatformCapabilities {
        PlatformCapabilities { color_sampling_reliable: true, screenshot_available: true }
    }

    fn capture(&self) -> Result<RgbaImage, CaptureError> {
        let ScreenGeometry { width, height } = self.screen_size();
        if width <= 0 || height <= 0 {
            return Err(CaptureError::Native("primary display has no size".into()));
        }

        unsafe {
            let screen_dc = GetDC(HWND::default());
            if screen_dc.is_invalid() {
                return Err(CaptureError::Native("GetDC failed".into()));
            }
            let mem_dc = CreateCompatibleDC(screen_dc);
            let bitmap = CreateCompatibleBitmap(screen_dc, width, height);

            let result = if bitmap.is_invalid() {
                Err(CaptureError::Native("CreateCompatibleBitmap failed".into()))
            } else {
                let previous = SelectObject(mem_dc, bitmap);
                let copied = BitBlt(mem_dc, 0, 0, width, height, screen_dc, 0, 0, SRCCOPY);

                let mut bmi = BITMAPINFO {
                    bmiHeader: BITMAPINFOHEADER {
                        biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
                        biWidth: width,
                        biHeight: -height, // top-down rows
                        biPlanes: 1,
                        biBitCount: 32,
                        biCompression: BI_RGB.0,
                        ..Default::default()
                    },
                    ..Default::default()
                };
                let mut data = vec![0u8; width as usize * height as usize * 4];
                let rows = GetDIBits(
                    mem_dc,
                    bitmap,
                    0,
                    height as u32,
                    Some(data.as_mut_ptr() as *mut _),
                    &mut bmi,
                    DIB_RGB_COLORS,
                );

                SelectObject(mem_dc, previous);
                let _ = DeleteObject(bitmap);

                match (copied, rows) {
                    (Err(e), _) => Err(CaptureError::Native(format!("BitBlt failed: {}", e))),
                    (_, 0) => Err(CaptureError::Native("GetDIBits copied no rows".into())),
                    _ => bgra_to_rgba(width as u32, height as u32, data),
                }
            };

            let _ = DeleteDC(mem_dc);
            ReleaseDC(HWND::default(), screen_dc);
            result
        }
    }
}

/// GDI hands back BGRX; alpha is undefined.
fn bgra_to_rgba(width: u32, height: u32, mut data: Vec<u8>) -> Result<RgbaImage, CaptureError> {
    for px in data.chunks_exact_mut(4) {
        px.swap(0, 2);
        px[3] = 255;
    }
    RgbaImage::from_raw(width, height, data)
        .ok_or_else(|| CaptureError::Native("pixel buffer does not match display size".into()))
}
