//! Pointer input and cursor styles
//!
//! Coordinates are CSS pixels relative to the host element's top-left corner.

/// Pointer button
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Primary (left) button or touch contact
    Primary,
    /// Secondary (right) button
    Secondary,
    /// Middle button
    Middle,
}

/// Pointer input delivered to a scene
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    /// Pointer moved to position
    Moved { x: f32, y: f32 },
    /// Button pressed at position
    Pressed { button: PointerButton, x: f32, y: f32 },
    /// Button released at position
    Released { button: PointerButton, x: f32, y: f32 },
    /// Wheel or trackpad scroll
    Wheel { delta_x: f32, delta_y: f32 },
    /// Pointer left the host element
    Left,
}

impl PointerEvent {
    /// Position carried by the event, if any
    pub fn position(&self) -> Option<(f32, f32)> {
        match *self {
            PointerEvent::Moved { x, y }
            | PointerEvent::Pressed { x, y, .. }
            | PointerEvent::Released { x, y, .. } => Some((x, y)),
            PointerEvent::Wheel { .. } | PointerEvent::Left => None,
        }
    }

    pub fn is_wheel(&self) -> bool {
        matches!(self, PointerEvent::Wheel { .. })
    }
}

/// Cursor style a scene may request from its host
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Cursor {
    /// Default arrow cursor
    #[default]
    Default,
    /// Pointer/hand cursor (for clickable elements)
    Pointer,
    /// Grab cursor (open hand)
    Grab,
    /// Grabbing cursor (closed hand)
    Grabbing,
}

impl Cursor {
    /// CSS keyword for the cursor
    pub fn css_name(&self) -> &'static str {
        match self {
            Cursor::Default => "default",
            Cursor::Pointer => "pointer",
            Cursor::Grab => "grab",
            Cursor::Grabbing => "grabbing",
        }
    }
}
