use crate::error::OriginParseError;
use crate::types::RawPosition;

/// Reference point subtracted from raw coordinates before display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OriginTransform {
    origin: RawPosition,
}

impl OriginTransform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn origin(&self) -> RawPosition {
        self.origin
    }

    pub fn set(&mut self, p: RawPosition) {
        self.origin = p;
    }

    pub fn reset(&mut self) {
        self.origin = RawPosition::default();
    }

    /// `p - origin`, saturating at the i32 limits.
    pub fn to_display(&self, p: RawPosition) -> (i32, i32) {
        p - self.origin
    }

    /// Apply manual "X, Y" text. Returns the new origin, or `None` when the
    /// text was ignored.
    pub fn set_from_text(&mut self, text: &str) -> Option<RawPosition> {
        let p = parse_origin(text).ok()?;
        self.origin = p;
        Some(p)
    }
}

/// Parse "X, Y" where both parts are non-negative decimal integers.
pub fn parse_origin(text: &str) -> Result<RawPosition, OriginParseError> {
    let parts: Vec<&str> = text.split(',').collect();
    let [x, y] = parts.as_slice() else {
        return Err(OriginParseError::Shape);
    };
    Ok(RawPosition::new(component(x)?, component(y)?))
}

fn component(raw: &str) -> Result<i32, OriginParseError> {
    let s = raw.trim();
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(OriginParseError::Component(s.to_string()));
    }
    s.parse().map_err(|_| OriginParseError::Component(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_exact_difference_including_negatives() {
        let mut o = OriginTransform::new();
        o.set(RawPosition::new(800, 600));
        assert_eq!(o.to_display(RawPosition::new(500, 300)), (-300, -300));
        assert_eq!(o.to_display(RawPosition::new(800, 600)), (0, 0));
        assert_eq!(o.to_display(RawPosition::new(-5, 1000)), (-805, 400));

        for (px, py, ox, oy) in [(0, 0, 0, 0), (1919, 1079, 1, 2), (-100, 50, 7, -7), (3, 4, 3000, 4000)] {
            o.set(RawPosition::new(ox, oy));
            assert_eq!(o.to_display(RawPosition::new(px, py)), (px - ox, py - oy));
        }
    }

    #[test]
    fn display_clamps_instead_of_wrapping() {
        let mut o = OriginTransform::new();
        o.set(RawPosition::new(-10, 10));
        assert_eq!(o.to_display(RawPosition::new(i32::MAX, i32::MIN)), (i32::MAX, i32::MIN));
    }

    #[test]
    fn reset_is_idempotent() {
        let mut o = OriginTransform::new();
        o.set(RawPosition::new(12, 7));
        o.reset();
        assert_eq!(o.origin(), RawPosition::new(0, 0));
        o.reset();
        assert_eq!(o.origin(), RawPosition::new(0, 0));
    }

    #[test]
    fn manual_entry() {
        let mut o = OriginTransform::new();
        assert_eq!(o.set_from_text("12, 7"), Some(RawPosition::new(12, 7)));
        assert_eq!(o.origin(), RawPosition::new(12, 7));

        assert_eq!(o.set_from_text("abc"), None);
        assert_eq!(o.origin(), RawPosition::new(12, 7));

        assert_eq!(o.set_from_text(" 3 ,4 "), Some(RawPosition::new(3, 4)));
    }

    #[test]
    fn rejected_entries_leave_origin_alone() {
        let mut o = OriginTransform::new();
        o.set(RawPosition::new(1, 1));
        for bad in ["", "5", "1,2,3", "-1, 2", "1.5, 2", "1, ", "+1, 2", "99999999999, 1"] {
            assert_eq!(o.set_from_text(bad), None, "{bad:?}");
        }
        assert_eq!(o.origin(), RawPosition::new(1, 1));
    }

    #[test]
    fn parse_errors_name_the_problem() {
        assert_eq!(parse_origin("1,2,3"), Err(OriginParseError::Shape));
        assert_eq!(parse_origin("x, 2"), Err(OriginParseError::Component("x".into())));
    }
}
