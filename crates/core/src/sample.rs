use image::RgbaImage;

use crate::error::CaptureError;
use crate::logger;
use crate::origin::OriginTransform;
use crate::types::*;

/// Why a sample carries no color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NaReason {
    PlatformRestricted,
    OutOfPrimaryBounds,
}

impl NaReason {
    /// Text shown in place of the RGB and hex fields.
    pub fn marker(self) -> &'static str {
        match self {
            NaReason::PlatformRestricted => "NA_platform_restricted",
            NaReason::OutOfPrimaryBounds => "NA_on_multimonitor_setups",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validity {
    Valid,
    NotAvailable(NaReason),
}

/// Position and color under the pointer for one refresh tick.
///
/// `rgb` and `rgb_hex` are present exactly when `validity` is `Valid`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    display_xy: (i32, i32),
    rgb: Option<(u8, u8, u8)>,
    rgb_hex: Option<String>,
    validity: Validity,
}

impl Default for Sample {
    fn default() -> Self {
        Self::unavailable((0, 0), NaReason::PlatformRestricted)
    }
}

impl Sample {
    pub fn valid(display_xy: (i32, i32), rgb: (u8, u8, u8)) -> Self {
        Self { display_xy, rgb: Some(rgb), rgb_hex: Some(rgb_hex(rgb)), validity: Validity::Valid }
    }

    pub fn unavailable(display_xy: (i32, i32), reason: NaReason) -> Self {
        Self { display_xy, rgb: None, rgb_hex: None, validity: Validity::NotAvailable(reason) }
    }

    pub fn display_xy(&self) -> (i32, i32) {
        self.display_xy
    }

    pub fn rgb(&self) -> Option<(u8, u8, u8)> {
        self.rgb
    }

    pub fn rgb_hex(&self) -> Option<&str> {
        self.rgb_hex.as_deref()
    }

    pub fn validity(&self) -> Validity {
        self.validity
    }

    pub fn xy_text(&self) -> String {
        format!("{},{}", self.display_xy.0, self.display_xy.1)
    }

    pub fn rgb_text(&self) -> String {
        match self.rgb {
            Some((r, g, b)) => format!("{},{},{}", r, g, b),
            None => self.na_marker().to_string(),
        }
    }

    pub fn rgb_hex_text(&self) -> String {
        match &self.rgb_hex {
            Some(hex) => hex.clone(),
            None => self.na_marker().to_string(),
        }
    }

    fn na_marker(&self) -> &'static str {
        match self.validity {
            Validity::NotAvailable(reason) => reason.marker(),
            Validity::Valid => "",
        }
    }

    pub fn text(&self, field: SampleField) -> String {
        match field {
            SampleField::Xy => self.xy_text(),
            SampleField::Rgb => self.rgb_text(),
            SampleField::RgbHex => self.rgb_hex_text(),
            SampleField::All => format!("{} {} {}", self.xy_text(), self.rgb_text(), self.rgb_hex_text()),
        }
    }
}

/// `#RRGGBB`, upper-case, zero-padded.
pub fn rgb_hex((r, g, b): (u8, u8, u8)) -> String {
    format!("#{:02X}{:02X}{:02X}", r, g, b)
}

/// Inverse of [`rgb_hex`].
pub fn parse_rgb_hex(s: &str) -> Option<(u8, u8, u8)> {
    let digits = s.strip_prefix('#')?;
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// Build the sample for `raw`. `capture` is called at most once, and only
/// when the color can be trusted and `raw` is on the primary display.
pub fn derive(
    raw: RawPosition,
    origin: &OriginTransform,
    geom: ScreenGeometry,
    caps: PlatformCapabilities,
    capture: impl FnOnce() -> Result<RgbaImage, CaptureError>,
) -> Sample {
    let display_xy = origin.to_display(raw);

    if !caps.color_sampling_reliable {
        return Sample::unavailable(display_xy, NaReason::PlatformRestricted);
    }
    if !geom.contains(raw) {
        return Sample::unavailable(display_xy, NaReason::OutOfPrimaryBounds);
    }

    let image = match capture() {
        Ok(image) => image,
        Err(e) => {
            logger::warn_p("sample", &format!("capture failed: {}", e));
            return Sample::unavailable(display_xy, NaReason::OutOfPrimaryBounds);
        }
    };

    // contains() above guarantees both coordinates are non-negative
    let (x, y) = (raw.x as u32, raw.y as u32);
    if x >= image.width() || y >= image.height() {
        logger::warn_p(
            "sample",
            &format!("capture is {}x{}, pointer at {}", image.width(), image.height(), raw),
        );
        return Sample::unavailable(display_xy, NaReason::OutOfPrimaryBounds);
    }

    let px = image.get_pixel(x, y).0;
    Sample::valid(display_xy, (px[0], px[1], px[2]))
}
