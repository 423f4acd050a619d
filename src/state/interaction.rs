//! Interaction state - drag exclusivity and hover tracking.
//!
//! One `InteractionState` is shared by every node wired to a registry. It is
//! an explicit value (cloning shares the underlying signals) rather than an
//! ambient global, with a single-writer contract: only pointer dispatch
//! mutates it; nodes only query.
//!
//! Invariant: at most one node drags at a time. While any node drags,
//! hover-driven highlighting on every *other* node is suppressed; the
//! dragging node's own highlight stays live.

use spark_signals::{signal, Signal};

use super::pointer::HitTarget;

#[derive(Clone)]
pub struct InteractionState {
    /// Arena index of the node that owns the active drag, if any.
    active_drag: Signal<Option<usize>>,
    /// Hit target currently under the pointer.
    hovered: Signal<Option<HitTarget>>,
    /// Option armed by pointer-down, completed as a click on pointer-up.
    pressed_option: Signal<Option<(usize, usize)>>,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionState {
    pub fn new() -> Self {
        Self {
            active_drag: signal(None),
            hovered: signal(None),
            pressed_option: signal(None),
        }
    }

    /// True while any adjustable node is being dragged.
    pub fn is_dragging(&self) -> bool {
        self.active_drag.get().is_some()
    }

    /// The node owning the active drag.
    pub fn drag_target(&self) -> Option<usize> {
        self.active_drag.get()
    }

    pub fn begin_drag(&self, node: usize) {
        debug_assert!(
            self.active_drag.get().is_none(),
            "drag started while another drag is active"
        );
        self.active_drag.set(Some(node));
    }

    pub fn end_drag(&self) {
        self.active_drag.set(None);
    }

    pub fn hovered(&self) -> Option<HitTarget> {
        self.hovered.get()
    }

    pub fn set_hovered(&self, target: Option<HitTarget>) {
        self.hovered.set(target);
    }

    pub fn pressed_option(&self) -> Option<(usize, usize)> {
        self.pressed_option.get()
    }

    pub fn set_pressed_option(&self, target: Option<(usize, usize)>) {
        self.pressed_option.set(target);
    }
}
