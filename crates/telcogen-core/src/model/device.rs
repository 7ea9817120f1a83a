use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use super::Entity;
use crate::entity::EntityKind;
use crate::error::Error;

/// One handset/modem per subscriber.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub device_id: i64,
    pub subscriber_id: i64,
    pub device_class_id: i64,
    pub imei: String,
    pub model: String,
    pub activated_at: DateTime<Utc>,
}

impl Entity for Device {
    const KIND: EntityKind = EntityKind::Device;
    const COLUMNS: &'static [&'static str] = &[
        "device_id",
        "subscriber_id",
        "device_class_id",
        "imei",
        "model",
        "activated_at",
    ];
    type Key = i64;

    fn key(&self) -> i64 {
        self.device_id
    }
}

/// Closed vocabulary of device event discriminants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventType {
    RadioAttach,
    Handover,
    SessionStart,
    SessionEnd,
    LatencyProbe,
    AttachFailure,
}

impl EventType {
    pub const ALL: [EventType; 6] = [
        EventType::RadioAttach,
        EventType::Handover,
        EventType::SessionStart,
        EventType::SessionEnd,
        EventType::LatencyProbe,
        EventType::AttachFailure,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EventType::RadioAttach => "radio_attach",
            EventType::Handover => "handover",
            EventType::SessionStart => "session_start",
            EventType::SessionEnd => "session_end",
            EventType::LatencyProbe => "latency_probe",
            EventType::AttachFailure => "attach_failure",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = Error;

    /// Accepts the canonical spelling, ignoring case, surrounding whitespace
    /// and `-` in place of `_`. Anything else is rejected.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
        EventType::ALL
            .into_iter()
            .find(|event_type| event_type.as_str() == normalized)
            .ok_or_else(|| Error::InvalidRecord(format!("unknown device event type '{value}'")))
    }
}

impl Serialize for EventType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RadioAttach {
    pub cell_id: String,
    pub rat: String,
    pub signal_dbm: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Handover {
    pub from_cell_id: String,
    pub to_cell_id: String,
    pub interruption_ms: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionStart {
    pub session_id: String,
    pub apn: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionEnd {
    pub session_id: String,
    pub bytes_up: i64,
    pub bytes_down: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LatencyProbe {
    pub target: String,
    pub rtt_ms: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttachFailure {
    pub cause_code: i64,
    pub reason: String,
}

/// Event payload; each variant has its own fixed field set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EventPayload {
    RadioAttach(RadioAttach),
    Handover(Handover),
    SessionStart(SessionStart),
    SessionEnd(SessionEnd),
    LatencyProbe(LatencyProbe),
    AttachFailure(AttachFailure),
}

impl EventPayload {
    pub fn event_type(&self) -> EventType {
        match self {
            EventPayload::RadioAttach(_) => EventType::RadioAttach,
            EventPayload::Handover(_) => EventType::Handover,
            EventPayload::SessionStart(_) => EventType::SessionStart,
            EventPayload::SessionEnd(_) => EventType::SessionEnd,
            EventPayload::LatencyProbe(_) => EventType::LatencyProbe,
            EventPayload::AttachFailure(_) => EventType::AttachFailure,
        }
    }

    /// Decode a payload whose shape is selected by `event_type`.
    pub fn decode(event_type: EventType, payload: Value) -> Result<Self, Error> {
        Ok(match event_type {
            EventType::RadioAttach => EventPayload::RadioAttach(decode_variant(event_type, payload)?),
            EventType::Handover => EventPayload::Handover(decode_variant(event_type, payload)?),
            EventType::SessionStart => {
                EventPayload::SessionStart(decode_variant(event_type, payload)?)
            }
            EventType::SessionEnd => EventPayload::SessionEnd(decode_variant(event_type, payload)?),
            EventType::LatencyProbe => {
                EventPayload::LatencyProbe(decode_variant(event_type, payload)?)
            }
            EventType::AttachFailure => {
                EventPayload::AttachFailure(decode_variant(event_type, payload)?)
            }
        })
    }
}

fn decode_variant<T: DeserializeOwned>(event_type: EventType, payload: Value) -> Result<T, Error> {
    serde_json::from_value(payload)
        .map_err(|err| Error::InvalidRecord(format!("{event_type} payload: {err}")))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "DeviceEventRecord", try_from = "RawDeviceEvent")]
pub struct DeviceEvent {
    pub device_event_id: i64,
    pub device_id: i64,
    pub occurred_at: DateTime<Utc>,
    pub payload: EventPayload,
}

impl DeviceEvent {
    pub fn event_type(&self) -> EventType {
        self.payload.event_type()
    }
}

impl Entity for DeviceEvent {
    const KIND: EntityKind = EntityKind::DeviceEvent;
    const COLUMNS: &'static [&'static str] = &[
        "device_event_id",
        "device_id",
        "event_type",
        "occurred_at",
        "payload",
    ];
    type Key = i64;

    fn key(&self) -> i64 {
        self.device_event_id
    }
}

#[derive(Serialize)]
struct DeviceEventRecord {
    device_event_id: i64,
    device_id: i64,
    event_type: EventType,
    occurred_at: DateTime<Utc>,
    payload: EventPayload,
}

impl From<DeviceEvent> for DeviceEventRecord {
    fn from(event: DeviceEvent) -> Self {
        Self {
            device_event_id: event.device_event_id,
            device_id: event.device_id,
            event_type: event.payload.event_type(),
            occurred_at: event.occurred_at,
            payload: event.payload,
        }
    }
}

#[derive(Deserialize)]
struct RawDeviceEvent {
    device_event_id: i64,
    device_id: i64,
    event_type: String,
    occurred_at: DateTime<Utc>,
    payload: Value,
}

impl TryFrom<RawDeviceEvent> for DeviceEvent {
    type Error = Error;

    fn try_from(raw: RawDeviceEvent) -> Result<Self, Self::Error> {
        let event_type = raw.event_type.parse::<EventType>()?;
        Ok(Self {
            device_event_id: raw.device_event_id,
            device_id: raw.device_id,
            occurred_at: raw.occurred_at,
            payload: EventPayload::decode(event_type, raw.payload)?,
        })
    }
}
