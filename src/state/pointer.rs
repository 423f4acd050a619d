//! Pointer input - logical events and hit testing.
//!
//! The engine consumes three logical pointer events (down, move, up) plus a
//! cancel that behaves exactly like up. Whatever produces them - mouse,
//! touch, a test script - is outside the engine; an adapter for crossterm
//! mouse events is provided for terminal embedders.
//!
//! Hit testing walks a flat list of regions collected from drawn interactive
//! elements. Later regions win, matching document paint order.

use crate::types::Rect;

// =============================================================================
// Events
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerAction {
    Down,
    Move,
    Up,
    /// Treated identically to `Up`: same transition, same cleanup.
    Cancel,
}

/// A pointer event in absolute document coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub action: PointerAction,
    pub x: f64,
    pub y: f64,
}

impl PointerEvent {
    pub fn down(x: f64, y: f64) -> Self {
        Self { action: PointerAction::Down, x, y }
    }

    pub fn move_to(x: f64, y: f64) -> Self {
        Self { action: PointerAction::Move, x, y }
    }

    pub fn up(x: f64, y: f64) -> Self {
        Self { action: PointerAction::Up, x, y }
    }

    pub fn cancel(x: f64, y: f64) -> Self {
        Self { action: PointerAction::Cancel, x, y }
    }

    /// Translate a crossterm mouse event into a logical pointer event.
    ///
    /// Only the left button participates; scroll and other buttons map to
    /// `None`.
    pub fn from_mouse(ev: &crossterm::event::MouseEvent) -> Option<Self> {
        use crossterm::event::{MouseButton, MouseEventKind};

        let (x, y) = (ev.column as f64, ev.row as f64);
        match ev.kind {
            MouseEventKind::Down(MouseButton::Left) => Some(Self::down(x, y)),
            MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
                Some(Self::move_to(x, y))
            }
            MouseEventKind::Up(MouseButton::Left) => Some(Self::up(x, y)),
            _ => None,
        }
    }
}

// =============================================================================
// Hit testing
// =============================================================================

/// What a pointer position resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    /// A bound node, by registry arena index.
    Outlet(usize),
    /// One option of an option group.
    Option { selection: usize, option: usize },
}

/// A rectangular region mapping to a hit target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRegion {
    pub rect: Rect,
    pub target: HitTarget,
}

/// Flat region list rebuilt whenever element geometry changes.
#[derive(Debug, Default)]
pub struct HitMap {
    regions: Vec<HitRegion>,
}

impl HitMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.regions.clear();
    }

    /// Register a region. Empty rects are ignored - an element that has not
    /// been laid out yet cannot be hit.
    pub fn push(&mut self, rect: Rect, target: HitTarget) {
        if rect.is_empty() {
            return;
        }
        self.regions.push(HitRegion { rect, target });
    }

    /// The topmost region containing the point.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<HitTarget> {
        self.regions
            .iter()
            .rev()
            .find(|r| r.rect.contains(x, y))
            .map(|r| r.target)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_test_basic() {
        let mut map = HitMap::new();
        map.push(Rect::new(0.0, 0.0, 10.0, 10.0), HitTarget::Outlet(1));
        map.push(Rect::new(20.0, 0.0, 10.0, 10.0), HitTarget::Outlet(2));

        assert_eq!(map.hit_test(5.0, 5.0), Some(HitTarget::Outlet(1)));
        assert_eq!(map.hit_test(25.0, 5.0), Some(HitTarget::Outlet(2)));
        assert_eq!(map.hit_test(15.0, 5.0), None);
    }

    #[test]
    fn test_last_region_wins() {
        let mut map = HitMap::new();
        map.push(Rect::new(0.0, 0.0, 10.0, 10.0), HitTarget::Outlet(1));
        map.push(
            Rect::new(5.0, 5.0, 10.0, 10.0),
            HitTarget::Option { selection: 0, option: 1 },
        );

        assert_eq!(
            map.hit_test(7.0, 7.0),
            Some(HitTarget::Option { selection: 0, option: 1 })
        );
        assert_eq!(map.hit_test(2.0, 2.0), Some(HitTarget::Outlet(1)));
    }

    #[test]
    fn test_empty_rect_ignored() {
        let mut map = HitMap::new();
        map.push(Rect::default(), HitTarget::Outlet(1));
        assert!(map.is_empty());
        assert_eq!(map.hit_test(0.0, 0.0), None);
    }

    #[test]
    fn test_crossterm_adapter() {
        use crossterm::event::{KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

        let down = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 4,
            row: 2,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(PointerEvent::from_mouse(&down), Some(PointerEvent::down(4.0, 2.0)));

        let drag = MouseEvent {
            kind: MouseEventKind::Drag(MouseButton::Left),
            column: 6,
            row: 2,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(
            PointerEvent::from_mouse(&drag),
            Some(PointerEvent::move_to(6.0, 2.0))
        );

        let scroll = MouseEvent {
            kind: MouseEventKind::ScrollUp,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(PointerEvent::from_mouse(&scroll), None);
    }
}
