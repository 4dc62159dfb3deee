//! Pointer input types and the event admission gate.

use kurbo::Point;

/// Kind of pointing device behind an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerType {
    Mouse,
    Pen,
    Touch,
}

/// Pointer button for down events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Right,
    Middle,
}

/// Keyboard modifier state accompanying a pointer event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    /// Any selection-extending modifier held.
    pub fn extends_selection(&self) -> bool {
        self.shift || self.ctrl
    }
}

/// A single pointer event, normalized across devices.
#[derive(Debug, Clone, Copy)]
pub struct PointerInput {
    /// Screen-space position. None when the backend reports no position;
    /// such events are no-ops.
    pub position: Option<Point>,
    /// Stable id for the physical pointer across a gesture.
    pub pointer_id: u64,
    pub pointer_type: PointerType,
    /// Contact pressure in 0..=1. Zero for a pen means hover, not contact.
    pub pressure: f64,
    /// Whether this is the primary pointer of its type.
    pub is_primary: bool,
    pub button: PointerButton,
    pub modifiers: Modifiers,
}

impl PointerInput {
    /// A primary left mouse event, the common case.
    pub fn mouse(position: Point) -> Self {
        Self {
            position: Some(position),
            pointer_id: 0,
            pointer_type: PointerType::Mouse,
            pressure: 1.0,
            is_primary: true,
            button: PointerButton::Left,
            modifiers: Modifiers::default(),
        }
    }

    pub fn with_button(mut self, button: PointerButton) -> Self {
        self.button = button;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn is_pen(&self) -> bool {
        self.pointer_type == PointerType::Pen
    }
}

/// Admission gate: filters hover/secondary pointers and enforces pointer
/// capture between down and up.
#[derive(Debug, Default)]
pub struct PointerGate {
    captured: Option<u64>,
}

impl PointerGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit a down event. On success the pointer is captured until
    /// `release`. While a capture is active, downs from other pointers
    /// are refused so a second contact cannot steal the gesture.
    pub fn admit_down(&mut self, input: &PointerInput) -> bool {
        if input.is_pen() && input.pressure == 0.0 {
            return false;
        }
        if !input.is_pen() && !input.is_primary {
            return false;
        }
        if self.captured.is_some_and(|id| id != input.pointer_id) {
            return false;
        }
        self.captured = Some(input.pointer_id);
        true
    }

    /// Admit a move event. Pen hovers (zero pressure) are dropped; for
    /// other devices only the captured pointer gets through.
    pub fn admit_move(&self, input: &PointerInput) -> bool {
        if input.is_pen() {
            return input.pressure > 0.0;
        }
        self.captured == Some(input.pointer_id)
    }

    /// Handle an up event. Capture is released only by the pointer that
    /// owns it; ups from other pointers leave the gesture running.
    /// Returns whether a capture was released.
    pub fn release(&mut self, input: &PointerInput) -> bool {
        if self.captured == Some(input.pointer_id) {
            self.captured = None;
            return true;
        }
        false
    }

    pub fn is_captured(&self) -> bool {
        self.captured.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pen(pressure: f64) -> PointerInput {
        PointerInput {
            pointer_type: PointerType::Pen,
            pressure,
            pointer_id: 7,
            ..PointerInput::mouse(Point::ZERO)
        }
    }

    #[test]
    fn test_pen_hover_down_rejected() {
        let mut gate = PointerGate::new();
        assert!(!gate.admit_down(&pen(0.0)));
        assert!(!gate.is_captured());
        assert!(gate.admit_down(&pen(0.5)));
    }

    #[test]
    fn test_secondary_touch_rejected() {
        let mut gate = PointerGate::new();
        let secondary = PointerInput {
            pointer_type: PointerType::Touch,
            is_primary: false,
            ..PointerInput::mouse(Point::ZERO)
        };
        assert!(!gate.admit_down(&secondary));
    }

    #[test]
    fn test_capture_filters_other_pointers() {
        let mut gate = PointerGate::new();
        let first = PointerInput {
            pointer_id: 1,
            pointer_type: PointerType::Touch,
            ..PointerInput::mouse(Point::ZERO)
        };
        let other = PointerInput {
            pointer_id: 2,
            ..first
        };
        assert!(gate.admit_down(&first));
        assert!(gate.admit_move(&first));
        assert!(!gate.admit_move(&other));
        // Only the owning pointer's up releases capture
        assert!(!gate.release(&other));
        assert!(gate.admit_move(&first));
        assert!(gate.release(&first));
        assert!(!gate.admit_move(&first));
    }

    #[test]
    fn test_captured_gesture_refuses_other_downs() {
        let mut gate = PointerGate::new();
        let first = PointerInput {
            pointer_id: 1,
            pointer_type: PointerType::Touch,
            ..PointerInput::mouse(Point::ZERO)
        };
        let second = PointerInput {
            pointer_id: 2,
            ..first
        };
        assert!(gate.admit_down(&first));
        assert!(!gate.admit_down(&second));
        // The owning pointer still gets through
        assert!(gate.admit_move(&first));
        gate.release(&first);
        assert!(gate.admit_down(&second));
    }

    #[test]
    fn test_pen_move_ignores_capture() {
        let gate = PointerGate::new();
        assert!(gate.admit_move(&pen(0.8)));
        assert!(!gate.admit_move(&pen(0.0)));
    }
}
