//! Core types shared across the engine.
//!
//! Kept deliberately small: geometry for hit testing and plot layout,
//! per-node state flags, and the bar fill tones.

// =============================================================================
// Rect - Document-space geometry
// =============================================================================

/// Axis-aligned rectangle in document coordinates.
///
/// The embedder owns layout; it writes each element's rect into the tree and
/// the engine reads them back for hit testing and plot geometry.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Check whether a point falls inside this rect (left/top inclusive,
    /// right/bottom exclusive).
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    /// True when the rect has no area (unset or collapsed).
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

// =============================================================================
// Node Flags (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Per-node lifecycle and interaction state as a bitfield.
    ///
    /// Combine with bitwise OR: `NodeFlags::DRAWN | NodeFlags::HOVERING`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct NodeFlags: u8 {
        const NONE = 0;
        /// One-time setup has run; `draw` is structural only the first time.
        const DRAWN = 1 << 0;
        /// Node writes back into the model on drag.
        const ADJUSTABLE = 1 << 1;
        /// Pointer is currently over this node.
        const HOVERING = 1 << 2;
        /// This node owns the active drag.
        const DRAGGING = 1 << 3;
    }
}

// =============================================================================
// Fill - Bar tones
// =============================================================================

/// Fill tone of a plot bar.
///
/// Each series group gets a base/highlight pair: series 0 renders in the
/// neutral pair, later series in the accent pair. Highlighting swaps within
/// the pair, never across.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fill {
    Neutral,
    NeutralHi,
    Accent,
    AccentHi,
}

impl Fill {
    /// The tone for a freshly drawn bar of the given series position.
    pub fn for_series(series: usize) -> Self {
        if series == 0 { Fill::Neutral } else { Fill::Accent }
    }

    /// The highlighted counterpart of this tone.
    pub fn highlighted(self) -> Self {
        match self {
            Fill::Neutral | Fill::NeutralHi => Fill::NeutralHi,
            Fill::Accent | Fill::AccentHi => Fill::AccentHi,
        }
    }

    /// The base counterpart of this tone.
    pub fn base(self) -> Self {
        match self {
            Fill::Neutral | Fill::NeutralHi => Fill::Neutral,
            Fill::Accent | Fill::AccentHi => Fill::Accent,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Fill::Neutral => "neutral",
            Fill::NeutralHi => "neutral-hi",
            Fill::Accent => "accent",
            Fill::AccentHi => "accent-hi",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "neutral" => Some(Fill::Neutral),
            "neutral-hi" => Some(Fill::NeutralHi),
            "accent" => Some(Fill::Accent),
            "accent-hi" => Some(Fill::AccentHi),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains() {
        let r = Rect::new(10.0, 10.0, 20.0, 5.0);

        assert!(r.contains(10.0, 10.0));
        assert!(r.contains(29.9, 14.9));
        assert!(!r.contains(30.0, 12.0));
        assert!(!r.contains(15.0, 15.0));
        assert!(!r.contains(9.9, 12.0));
    }

    #[test]
    fn test_rect_empty() {
        assert!(Rect::default().is_empty());
        assert!(!Rect::new(0.0, 0.0, 1.0, 1.0).is_empty());
    }

    #[test]
    fn test_fill_pairs() {
        assert_eq!(Fill::for_series(0), Fill::Neutral);
        assert_eq!(Fill::for_series(3), Fill::Accent);

        assert_eq!(Fill::Neutral.highlighted(), Fill::NeutralHi);
        assert_eq!(Fill::AccentHi.base(), Fill::Accent);
        assert_eq!(Fill::NeutralHi.highlighted(), Fill::NeutralHi);
    }

    #[test]
    fn test_fill_round_trip() {
        for fill in [Fill::Neutral, Fill::NeutralHi, Fill::Accent, Fill::AccentHi] {
            assert_eq!(Fill::parse(fill.as_str()), Some(fill));
        }
        assert_eq!(Fill::parse("plaid"), None);
    }
}
