use std::fmt;
use std::ops::Sub;

use serde::{Deserialize, Serialize};

/// Absolute pointer position in screen pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RawPosition {
    pub x: i32,
    pub y: i32,
}

impl RawPosition {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Sub for RawPosition {
    type Output = (i32, i32);

    fn sub(self, rhs: RawPosition) -> (i32, i32) {
        (self.x.saturating_sub(rhs.x), self.y.saturating_sub(rhs.y))
    }
}

impl fmt::Display for RawPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.x, self.y)
    }
}

/// Size of the primary display, used for bounds checks only
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScreenGeometry {
    pub width: i32,
    pub height: i32,
}

impl ScreenGeometry {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// True when `p` lies in `[0, width) x [0, height)`.
    pub fn contains(&self, p: RawPosition) -> bool {
        (0..self.width).contains(&p.x) && (0..self.height).contains(&p.y)
    }
}

/// What a probe can be trusted to do. Fixed once the probe exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformCapabilities {
    pub color_sampling_reliable: bool,
    pub screenshot_available: bool,
}

/// One button's worth of behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    CopyXY,
    CopyRGB,
    CopyRGBHex,
    CopyAll,
    LogXY,
    LogRGB,
    LogRGBHex,
    LogAll,
    SetOrigin,
}

impl ActionKind {
    pub const ALL: [ActionKind; 9] = [
        ActionKind::CopyXY,
        ActionKind::CopyRGB,
        ActionKind::CopyRGBHex,
        ActionKind::CopyAll,
        ActionKind::LogXY,
        ActionKind::LogRGB,
        ActionKind::LogRGBHex,
        ActionKind::LogAll,
        ActionKind::SetOrigin,
    ];

    /// Position in `ALL`.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Label shown while the action is idle.
    pub fn resting_label(self) -> &'static str {
        match self {
            ActionKind::CopyXY => "Copy XY",
            ActionKind::CopyRGB => "Copy RGB",
            ActionKind::CopyRGBHex => "Copy RGB Hex",
            ActionKind::CopyAll => "Copy All",
            ActionKind::LogXY => "Log XY",
            ActionKind::LogRGB => "Log RGB",
            ActionKind::LogRGBHex => "Log RGB Hex",
            ActionKind::LogAll => "Log All",
            ActionKind::SetOrigin => "Set XY Origin",
        }
    }

    /// Verb used in the countdown label ("Copy in 3").
    pub fn countdown_verb(self) -> &'static str {
        match self {
            ActionKind::CopyXY | ActionKind::CopyRGB | ActionKind::CopyRGBHex | ActionKind::CopyAll => "Copy",
            ActionKind::LogXY | ActionKind::LogRGB | ActionKind::LogRGBHex | ActionKind::LogAll => "Log",
            ActionKind::SetOrigin => "Setting",
        }
    }

    pub fn is_copy(self) -> bool {
        matches!(
            self,
            ActionKind::CopyXY | ActionKind::CopyRGB | ActionKind::CopyRGBHex | ActionKind::CopyAll
        )
    }

    /// Which sample field(s) a copy or log action renders.
    pub fn field(self) -> Option<SampleField> {
        match self {
            ActionKind::CopyXY | ActionKind::LogXY => Some(SampleField::Xy),
            ActionKind::CopyRGB | ActionKind::LogRGB => Some(SampleField::Rgb),
            ActionKind::CopyRGBHex | ActionKind::LogRGBHex => Some(SampleField::RgbHex),
            ActionKind::CopyAll | ActionKind::LogAll => Some(SampleField::All),
            ActionKind::SetOrigin => None,
        }
    }
}

/// Text renderings of a sample that can be copied or logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleField {
    Xy,
    Rgb,
    RgbHex,
    All,
}

/// Events carried by the timer queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    Refresh,
    Countdown(ActionKind),
}
