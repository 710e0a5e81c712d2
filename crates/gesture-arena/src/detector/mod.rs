//! Gesture detector descriptions.
//!
//! A [`GestureDetector`] is the immutable, authoring-time description of one
//! recognizer attached to an arena member: which kind of gesture it
//! recognizes, its thresholds, which lifecycle callbacks the application
//! listens to, and how it relates to other detectors.

pub mod manager;

use std::fmt;

use indexmap::IndexMap;

use crate::gesture_constants::{
    DEFAULT_MAX_DISTANCE_DP, DEFAULT_MAX_DURATION_MS, DEFAULT_MIN_DISTANCE_DP,
    DEFAULT_MIN_DURATION_MS, MAX_DISTANCE, MAX_DURATION, MIN_DISTANCE, MIN_DURATION, ON_BEGIN,
    ON_END, ON_START, ON_TOUCHES_CANCEL, ON_TOUCHES_DOWN, ON_TOUCHES_MOVE, ON_TOUCHES_UP,
    ON_UPDATE, RELATION_CONTINUE_WITH, RELATION_SIMULTANEOUS, RELATION_WAIT_FOR,
};

pub use manager::{GestureDetectorManager, SimultaneousResolver, SimultaneousWinners};

pub type GestureId = u32;

/// Recognizer kind. Discriminants are the host's wire codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GestureKind {
    Pan = 0,
    Fling = 1,
    Default = 2,
    Tap = 3,
    LongPress = 4,
    Native = 7,
}

impl GestureKind {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(GestureKind::Pan),
            1 => Some(GestureKind::Fling),
            2 => Some(GestureKind::Default),
            3 => Some(GestureKind::Tap),
            4 => Some(GestureKind::LongPress),
            7 => Some(GestureKind::Native),
            _ => None,
        }
    }

    pub fn code(self) -> i64 {
        self as i64
    }
}

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GestureCallback {
    OnTouchesDown = 0,
    OnTouchesMove = 1,
    OnTouchesUp = 2,
    OnTouchesCancel = 3,
    OnBegin = 4,
    OnUpdate = 5,
    OnStart = 6,
    OnEnd = 7,
}

impl GestureCallback {
    pub const ALL: [GestureCallback; 8] = [
        GestureCallback::OnTouchesDown,
        GestureCallback::OnTouchesMove,
        GestureCallback::OnTouchesUp,
        GestureCallback::OnTouchesCancel,
        GestureCallback::OnBegin,
        GestureCallback::OnUpdate,
        GestureCallback::OnStart,
        GestureCallback::OnEnd,
    ];

    pub fn name(self) -> &'static str {
        match self {
            GestureCallback::OnTouchesDown => ON_TOUCHES_DOWN,
            GestureCallback::OnTouchesMove => ON_TOUCHES_MOVE,
            GestureCallback::OnTouchesUp => ON_TOUCHES_UP,
            GestureCallback::OnTouchesCancel => ON_TOUCHES_CANCEL,
            GestureCallback::OnBegin => ON_BEGIN,
            GestureCallback::OnUpdate => ON_UPDATE,
            GestureCallback::OnStart => ON_START,
            GestureCallback::OnEnd => ON_END,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|callback| callback.name() == name)
    }

    pub fn is_touch_observation(self) -> bool {
        (self as u8) <= GestureCallback::OnTouchesCancel as u8
    }
}

impl fmt::Display for GestureCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Set of callbacks the application listens to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct GestureCallbacks(u8);

impl GestureCallbacks {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(u8::MAX);

    pub fn with(mut self, callback: GestureCallback) -> Self {
        self.insert(callback);
        self
    }

    pub fn insert(&mut self, callback: GestureCallback) {
        self.0 |= 1 << (callback as u8);
    }

    pub fn remove(&mut self, callback: GestureCallback) {
        self.0 &= !(1 << (callback as u8));
    }

    pub fn contains(&self, callback: GestureCallback) -> bool {
        (self.0 & (1 << (callback as u8))) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl FromIterator<GestureCallback> for GestureCallbacks {
    fn from_iter<I: IntoIterator<Item = GestureCallback>>(iter: I) -> Self {
        iter.into_iter()
            .fold(GestureCallbacks::NONE, |set, callback| set.with(callback))
    }
}

/// Typed view over a detector's numeric config map.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GestureConfig {
    values: IndexMap<String, f64>,
}

impl GestureConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: f64) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(key, value)| (key.as_str(), *value))
    }

    pub fn min_duration_millis(&self) -> u64 {
        self.duration(MIN_DURATION, DEFAULT_MIN_DURATION_MS)
    }

    pub fn max_duration_millis(&self) -> u64 {
        self.duration(MAX_DURATION, DEFAULT_MAX_DURATION_MS)
    }

    pub fn min_distance_dp(&self) -> f32 {
        self.distance(MIN_DISTANCE, DEFAULT_MIN_DISTANCE_DP)
    }

    pub fn max_distance_dp(&self) -> f32 {
        self.distance(MAX_DISTANCE, DEFAULT_MAX_DISTANCE_DP)
    }

    fn duration(&self, key: &str, default: u64) -> u64 {
        match self.get(key) {
            Some(value) if value.is_finite() && value >= 0.0 => value as u64,
            _ => default,
        }
    }

    fn distance(&self, key: &str, default: f32) -> f32 {
        match self.get(key) {
            Some(value) if value.is_finite() && value >= 0.0 => value as f32,
            _ => default,
        }
    }
}

/// Static relations to other detectors, by gesture id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GestureRelations {
    /// Detectors allowed to stay running while this one wins.
    pub simultaneous: Vec<GestureId>,
    /// Detectors that get to compete before this one.
    pub wait_for: Vec<GestureId>,
    /// Detectors that take over the chain right after this one.
    pub continue_with: Vec<GestureId>,
}

impl GestureRelations {
    pub fn is_empty(&self) -> bool {
        self.simultaneous.is_empty() && self.wait_for.is_empty() && self.continue_with.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GestureDetector {
    id: GestureId,
    kind: GestureKind,
    callbacks: GestureCallbacks,
    relations: GestureRelations,
    config: GestureConfig,
}

impl GestureDetector {
    /// A detector with every callback enabled and default thresholds.
    pub fn new(id: GestureId, kind: GestureKind) -> Self {
        Self {
            id,
            kind,
            callbacks: GestureCallbacks::ALL,
            relations: GestureRelations::default(),
            config: GestureConfig::default(),
        }
    }

    pub fn with_callbacks(mut self, callbacks: impl IntoIterator<Item = GestureCallback>) -> Self {
        self.callbacks = callbacks.into_iter().collect();
        self
    }

    pub fn with_config(mut self, key: impl Into<String>, value: f64) -> Self {
        self.config = self.config.with(key, value);
        self
    }

    pub fn simultaneous_with(mut self, ids: impl IntoIterator<Item = GestureId>) -> Self {
        self.relations.simultaneous.extend(ids);
        self
    }

    pub fn wait_for(mut self, ids: impl IntoIterator<Item = GestureId>) -> Self {
        self.relations.wait_for.extend(ids);
        self
    }

    pub fn continue_with(mut self, ids: impl IntoIterator<Item = GestureId>) -> Self {
        self.relations.continue_with.extend(ids);
        self
    }

    pub fn id(&self) -> GestureId {
        self.id
    }

    pub fn kind(&self) -> GestureKind {
        self.kind
    }

    pub fn callbacks(&self) -> GestureCallbacks {
        self.callbacks
    }

    pub fn is_callback_enabled(&self, callback: GestureCallback) -> bool {
        self.callbacks.contains(callback)
    }

    pub fn relations(&self) -> &GestureRelations {
        &self.relations
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Validates a loosely typed host description.
    ///
    /// Unknown callback names and relation keys are skipped with a warning;
    /// anything that would make the detector meaningless is an error.
    pub fn from_raw(raw: &RawGestureDetector) -> Result<Self, DetectorDecodeError> {
        let id = GestureId::try_from(raw.id).map_err(|_| DetectorDecodeError::InvalidId {
            id: raw.id,
        })?;
        let kind = GestureKind::from_code(raw.kind)
            .ok_or(DetectorDecodeError::UnsupportedKind { id, code: raw.kind })?;

        let mut callbacks = GestureCallbacks::NONE;
        for name in &raw.callback_names {
            match GestureCallback::from_name(name) {
                Some(callback) => callbacks.insert(callback),
                None => log::warn!("gesture {id}: ignoring unknown callback {name:?}"),
            }
        }

        let mut relations = GestureRelations::default();
        for (key, targets) in &raw.relations {
            let slot = match key.as_str() {
                RELATION_SIMULTANEOUS => &mut relations.simultaneous,
                RELATION_WAIT_FOR => &mut relations.wait_for,
                RELATION_CONTINUE_WITH => &mut relations.continue_with,
                _ => {
                    log::warn!("gesture {id}: ignoring unknown relation {key:?}");
                    continue;
                }
            };
            for &target in targets {
                let target = GestureId::try_from(target).map_err(|_| {
                    DetectorDecodeError::InvalidRelationTarget {
                        id,
                        relation: key.clone(),
                        target,
                    }
                })?;
                slot.push(target);
            }
        }

        let mut config = GestureConfig::default();
        for (key, value) in &raw.config {
            let threshold = matches!(
                key.as_str(),
                MIN_DURATION | MAX_DURATION | MIN_DISTANCE | MAX_DISTANCE
            );
            if !value.is_finite() || (threshold && *value < 0.0) {
                return Err(DetectorDecodeError::InvalidConfigValue {
                    id,
                    key: key.clone(),
                    value: *value,
                });
            }
            config = config.with(key.clone(), *value);
        }

        Ok(Self {
            id,
            kind,
            callbacks,
            relations,
            config,
        })
    }
}

/// Detector description as a host bridge delivers it, before validation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawGestureDetector {
    pub id: i64,
    pub kind: i64,
    pub callback_names: Vec<String>,
    pub relations: Vec<(String, Vec<i64>)>,
    pub config: Vec<(String, f64)>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DetectorDecodeError {
    InvalidId {
        id: i64,
    },
    UnsupportedKind {
        id: GestureId,
        code: i64,
    },
    InvalidRelationTarget {
        id: GestureId,
        relation: String,
        target: i64,
    },
    InvalidConfigValue {
        id: GestureId,
        key: String,
        value: f64,
    },
}

impl fmt::Display for DetectorDecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectorDecodeError::InvalidId { id } => write!(f, "invalid gesture id {id}"),
            DetectorDecodeError::UnsupportedKind { id, code } => {
                write!(f, "gesture {id}: unsupported kind {code}")
            }
            DetectorDecodeError::InvalidRelationTarget {
                id,
                relation,
                target,
            } => write!(f, "gesture {id}: invalid {relation} target {target}"),
            DetectorDecodeError::InvalidConfigValue { id, key, value } => {
                write!(f, "gesture {id}: invalid value {value} for {key}")
            }
        }
    }
}

impl std::error::Error for DetectorDecodeError {}

/// Decodes every valid description, logging and skipping the rest.
pub fn decode_gesture_detectors<'a>(
    raw: impl IntoIterator<Item = &'a RawGestureDetector>,
) -> Vec<GestureDetector> {
    raw.into_iter()
        .filter_map(|entry| match GestureDetector::from_raw(entry) {
            Ok(detector) => Some(detector),
            Err(err) => {
                log::warn!("skipping gesture detector: {err}");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: i64, kind: i64) -> RawGestureDetector {
        RawGestureDetector {
            id,
            kind,
            ..Default::default()
        }
    }

    #[test]
    fn config_falls_back_to_defaults() {
        let config = GestureConfig::new().with(MAX_DISTANCE, 24.0).with(MIN_DURATION, -1.0);
        assert_eq!(config.max_distance_dp(), 24.0);
        assert_eq!(config.min_duration_millis(), DEFAULT_MIN_DURATION_MS);
        assert_eq!(config.max_duration_millis(), DEFAULT_MAX_DURATION_MS);
        assert_eq!(config.min_distance_dp(), 0.0);
    }

    #[test]
    fn callback_names_round_trip() {
        for callback in GestureCallback::ALL {
            assert_eq!(GestureCallback::from_name(callback.name()), Some(callback));
        }
        assert_eq!(GestureCallback::from_name("onPinch"), None);
        assert!(GestureCallback::OnTouchesCancel.is_touch_observation());
        assert!(!GestureCallback::OnBegin.is_touch_observation());
    }

    #[test]
    fn from_raw_keeps_known_names_and_relations() {
        let mut entry = raw(12, 3);
        entry.callback_names = vec!["onBegin".into(), "onEnd".into(), "onWobble".into()];
        entry.relations = vec![
            ("simultaneous".into(), vec![4, 5]),
            ("waitFor".into(), vec![9]),
            ("somethingElse".into(), vec![1]),
        ];
        entry.config = vec![("maxDuration".into(), 300.0)];

        let detector = GestureDetector::from_raw(&entry).expect("valid detector");
        assert_eq!(detector.id(), 12);
        assert_eq!(detector.kind(), GestureKind::Tap);
        assert!(detector.is_callback_enabled(GestureCallback::OnBegin));
        assert!(detector.is_callback_enabled(GestureCallback::OnEnd));
        assert!(!detector.is_callback_enabled(GestureCallback::OnUpdate));
        assert_eq!(detector.relations().simultaneous, vec![4, 5]);
        assert_eq!(detector.relations().wait_for, vec![9]);
        assert!(detector.relations().continue_with.is_empty());
        assert_eq!(detector.config().max_duration_millis(), 300);
    }

    #[test]
    fn from_raw_rejects_bad_descriptions() {
        assert_eq!(
            GestureDetector::from_raw(&raw(-1, 0)),
            Err(DetectorDecodeError::InvalidId { id: -1 })
        );
        assert_eq!(
            GestureDetector::from_raw(&raw(3, 6)),
            Err(DetectorDecodeError::UnsupportedKind { id: 3, code: 6 })
        );

        let mut negative = raw(3, 0);
        negative.config = vec![("minDistance".into(), -4.0)];
        assert!(matches!(
            GestureDetector::from_raw(&negative),
            Err(DetectorDecodeError::InvalidConfigValue { id: 3, .. })
        ));
    }

    #[test]
    fn batch_decode_skips_invalid_entries() {
        let entries = [raw(1, 0), raw(2, 99), raw(3, 7)];
        let detectors = decode_gesture_detectors(&entries);
        let ids: Vec<_> = detectors.iter().map(|d| d.id()).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(detectors[1].kind(), GestureKind::Native);
    }

    #[test]
    fn error_messages_name_the_gesture() {
        let err = DetectorDecodeError::UnsupportedKind { id: 8, code: 5 };
        assert_eq!(err.to_string(), "gesture 8: unsupported kind 5");
    }
}
