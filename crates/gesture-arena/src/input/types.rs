use gesture_arena_core::Point;

use crate::detector::GestureCallback;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    Down,
    Move,
    Up,
    Cancel,
}

impl PointerEventKind {
    /// Observation callback fired on the bubble chain for this phase.
    pub fn touch_callback(self) -> GestureCallback {
        match self {
            PointerEventKind::Down => GestureCallback::OnTouchesDown,
            PointerEventKind::Move => GestureCallback::OnTouchesMove,
            PointerEventKind::Up => GestureCallback::OnTouchesUp,
            PointerEventKind::Cancel => GestureCallback::OnTouchesCancel,
        }
    }

    /// Web-style touch event name the host reports for this phase.
    pub fn touch_event_name(self) -> &'static str {
        match self {
            PointerEventKind::Down => "touchstart",
            PointerEventKind::Move => "touchmove",
            PointerEventKind::Up => "touchend",
            PointerEventKind::Cancel => "touchcancel",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, PointerEventKind::Up | PointerEventKind::Cancel)
    }
}

/// Raw pointer phase as delivered by the host, position in px.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub position: Point,
    pub time_millis: u64,
}

impl PointerEvent {
    pub fn new(kind: PointerEventKind, position: Point, time_millis: u64) -> Self {
        Self {
            kind,
            position,
            time_millis,
        }
    }
}

/// Normalized touch payload forwarded to event listeners, points in px.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct TouchPayload {
    pub name: String,
    pub timestamp: u64,
    pub client_point: Option<Point>,
    pub page_point: Option<Point>,
    pub view_point: Option<Point>,
}

impl TouchPayload {
    /// Payload for `event` with every coordinate space set to its position.
    pub fn from_pointer(event: &PointerEvent) -> Self {
        Self {
            name: event.kind.touch_event_name().to_string(),
            timestamp: event.time_millis,
            client_point: Some(event.position),
            page_point: Some(event.position),
            view_point: Some(event.position),
        }
    }
}

/// Pointer phase as seen by a recognizer.
///
/// `down_position` lets a recognizer that first sees the gesture in the
/// middle (a candidate promoted after the first one failed) measure travel
/// from where the finger actually went down.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSample {
    pub kind: PointerEventKind,
    pub position: Point,
    pub down_position: Point,
    pub time_millis: u64,
    pub down_time_millis: u64,
}

impl PointerSample {
    pub fn elapsed_since_down(&self) -> u64 {
        self.time_millis.saturating_sub(self.down_time_millis)
    }
}

/// What a recognizer is fed: a pointer phase, one frame of fling travel, or
/// the terminal sentinel that says no further motion will follow.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MotionInput {
    Pointer(PointerSample),
    Fling { delta_x: f32, delta_y: f32 },
    Terminal,
}

impl MotionInput {
    pub fn fling(delta: Point) -> Self {
        MotionInput::Fling {
            delta_x: delta.x,
            delta_y: delta.y,
        }
    }
}
