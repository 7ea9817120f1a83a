use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Entity;
use crate::entity::EntityKind;

const VOICE_CENTS_PER_MINUTE: i64 = 4;
const DATA_CENTS_PER_MEGABYTE: i64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageType {
    Voice,
    Sms,
    Data,
}

impl UsageType {
    pub fn as_str(self) -> &'static str {
        match self {
            UsageType::Voice => "voice",
            UsageType::Sms => "sms",
            UsageType::Data => "data",
        }
    }

    /// Meaning of `units` for this usage type.
    pub fn unit_name(self) -> &'static str {
        match self {
            UsageType::Voice => "seconds",
            UsageType::Sms => "messages",
            UsageType::Data => "kilobytes",
        }
    }
}

/// Metered quantity, typed by usage kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Usage {
    Voice { seconds: u64 },
    Sms { messages: u64 },
    Data { kilobytes: u64 },
}

impl Usage {
    pub fn from_parts(usage_type: UsageType, units: u64) -> Self {
        match usage_type {
            UsageType::Voice => Usage::Voice { seconds: units },
            UsageType::Sms => Usage::Sms { messages: units },
            UsageType::Data => Usage::Data { kilobytes: units },
        }
    }

    pub fn usage_type(self) -> UsageType {
        match self {
            Usage::Voice { .. } => UsageType::Voice,
            Usage::Sms { .. } => UsageType::Sms,
            Usage::Data { .. } => UsageType::Data,
        }
    }

    pub fn units(self) -> u64 {
        match self {
            Usage::Voice { seconds } => seconds,
            Usage::Sms { messages } => messages,
            Usage::Data { kilobytes } => kilobytes,
        }
    }
}

/// Price a usage record in cents.
///
/// Voice bills started minutes at 4 cents, data bills started megabytes
/// (1024 KB) at 2 cents, SMS is free.
pub fn rate_usage(usage: Usage) -> i64 {
    match usage {
        Usage::Voice { seconds } => seconds.div_ceil(60) as i64 * VOICE_CENTS_PER_MINUTE,
        Usage::Data { kilobytes } => kilobytes.div_ceil(1024) as i64 * DATA_CENTS_PER_MEGABYTE,
        Usage::Sms { .. } => 0,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "UsageRecordRow", from = "UsageRecordRow")]
pub struct UsageRecord {
    pub usage_record_id: i64,
    pub subscriber_id: i64,
    pub region_id: i64,
    pub usage: Usage,
    pub rated_cents: i64,
    pub started_at: DateTime<Utc>,
}

impl Entity for UsageRecord {
    const KIND: EntityKind = EntityKind::UsageRecord;
    const COLUMNS: &'static [&'static str] = &[
        "usage_record_id",
        "subscriber_id",
        "region_id",
        "usage_type",
        "units",
        "rated_cents",
        "started_at",
    ];
    type Key = i64;

    fn key(&self) -> i64 {
        self.usage_record_id
    }
}

#[derive(Serialize, Deserialize)]
struct UsageRecordRow {
    usage_record_id: i64,
    subscriber_id: i64,
    region_id: i64,
    usage_type: UsageType,
    units: u64,
    rated_cents: i64,
    started_at: DateTime<Utc>,
}

impl From<UsageRecord> for UsageRecordRow {
    fn from(record: UsageRecord) -> Self {
        Self {
            usage_record_id: record.usage_record_id,
            subscriber_id: record.subscriber_id,
            region_id: record.region_id,
            usage_type: record.usage.usage_type(),
            units: record.usage.units(),
            rated_cents: record.rated_cents,
            started_at: record.started_at,
        }
    }
}

impl From<UsageRecordRow> for UsageRecord {
    fn from(row: UsageRecordRow) -> Self {
        Self {
            usage_record_id: row.usage_record_id,
            subscriber_id: row.subscriber_id,
            region_id: row.region_id,
            usage: Usage::from_parts(row.usage_type, row.units),
            rated_cents: row.rated_cents,
            started_at: row.started_at,
        }
    }
}
