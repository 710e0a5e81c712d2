//! Events emitted to the application and the replies it may send back.

use gesture_arena_core::Point;
use indexmap::IndexMap;

use crate::detector::{GestureCallback, GestureId};
use crate::input::TouchPayload;
use crate::member::MemberId;

/// State an event listener may request for the recognizer that emitted the
/// event. Applied before the emitting call returns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureState {
    Active,
    Fail,
    End,
}

/// Raw touch fields, coordinates already in dp.
#[derive(Clone, Debug, PartialEq)]
pub struct TouchParams {
    pub name: String,
    pub timestamp: u64,
    pub view: Option<Point>,
    pub page: Option<Point>,
    pub client: Option<Point>,
}

impl TouchParams {
    pub fn from_payload(payload: &TouchPayload, density: f32) -> Self {
        Self {
            name: payload.name.clone(),
            timestamp: payload.timestamp,
            view: payload.view_point.map(|p| p.to_dp(density)),
            page: payload.page_point.map(|p| p.to_dp(density)),
            client: payload.client_point.map(|p| p.to_dp(density)),
        }
    }
}

/// Parameters of one event. Built fresh for every dispatch.
#[derive(Clone, Debug, PartialEq)]
pub struct GestureEventParams {
    pub scroll_x: f32,
    pub scroll_y: f32,
    pub delta_x: f32,
    pub delta_y: f32,
    pub is_at_start: bool,
    pub is_at_end: bool,
    pub touch: Option<TouchParams>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ParamValue {
    Number(f64),
    Bool(bool),
    Text(String),
}

impl GestureEventParams {
    /// Flattens into the key order listeners expect.
    pub fn to_param_map(&self) -> IndexMap<&'static str, ParamValue> {
        let mut map = IndexMap::new();
        map.insert("scrollX", ParamValue::Number(self.scroll_x as f64));
        map.insert("scrollY", ParamValue::Number(self.scroll_y as f64));
        map.insert("deltaX", ParamValue::Number(self.delta_x as f64));
        map.insert("deltaY", ParamValue::Number(self.delta_y as f64));
        map.insert("isAtStart", ParamValue::Bool(self.is_at_start));
        map.insert("isAtEnd", ParamValue::Bool(self.is_at_end));

        if let Some(touch) = &self.touch {
            map.insert("type", ParamValue::Text(touch.name.clone()));
            map.insert("timestamp", ParamValue::Number(touch.timestamp as f64));
            let points = [
                ("x", "y", touch.view),
                ("pageX", "pageY", touch.page),
                ("clientX", "clientY", touch.client),
            ];
            for (x_key, y_key, point) in points {
                if let Some(point) = point {
                    map.insert(x_key, ParamValue::Number(point.x as f64));
                    map.insert(y_key, ParamValue::Number(point.y as f64));
                }
            }
        }
        map
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GestureEvent {
    pub member_id: MemberId,
    pub gesture_id: GestureId,
    pub callback: GestureCallback,
    pub params: GestureEventParams,
}

/// Receives gesture events on the input thread.
pub trait GestureEventEmitter {
    /// Delivers `event`. A returned state is applied to the emitting
    /// recognizer immediately; observation callbacks ignore it.
    fn send_gesture_event(&self, event: GestureEvent) -> Option<GestureState>;

    /// A new touch stopped a running fling; the host should not treat that
    /// touch as a tap.
    fn on_gesture_recognized(&self) {}
}

/// Emitter that drops everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopEmitter;

impl GestureEventEmitter for NoopEmitter {
    fn send_gesture_event(&self, _event: GestureEvent) -> Option<GestureState> {
        None
    }
}
