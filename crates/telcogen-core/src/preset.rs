use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Named dataset scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeClass {
    Small,
    Medium,
    Large,
}

impl SizeClass {
    pub const ALL: [SizeClass; 3] = [SizeClass::Small, SizeClass::Medium, SizeClass::Large];

    pub fn as_str(self) -> &'static str {
        match self {
            SizeClass::Small => "small",
            SizeClass::Medium => "medium",
            SizeClass::Large => "large",
        }
    }

    pub fn preset(self) -> Preset {
        Preset::for_size(self)
    }
}

impl fmt::Display for SizeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SizeClass {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "small" => Ok(SizeClass::Small),
            "medium" => Ok(SizeClass::Medium),
            "large" => Ok(SizeClass::Large),
            _ => Err(Error::InvalidConfiguration(format!(
                "unknown size class '{value}' (expected small, medium or large)"
            ))),
        }
    }
}

/// Inclusive count range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRange {
    pub min: u32,
    pub max: u32,
}

impl CountRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub const fn fixed(count: u32) -> Self {
        Self {
            min: count,
            max: count,
        }
    }
}

/// Entity-count configuration for a size class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    pub accounts: u32,
    pub subscribers_per_account: CountRange,
    pub orders_per_account: CountRange,
    pub items_per_order: CountRange,
    pub tickets_per_subscriber: CountRange,
    pub device_events_per_device: CountRange,
    pub usage_records_per_subscriber: u32,
    /// Width of the generation time window.
    pub day_span: u32,
    /// Attach sorted feature codes to subscribers in the optimized shape.
    pub embed_feature_codes: bool,
}

impl Preset {
    pub fn for_size(size: SizeClass) -> Self {
        match size {
            SizeClass::Small => Self {
                accounts: 3,
                subscribers_per_account: CountRange::fixed(2),
                orders_per_account: CountRange::new(1, 2),
                items_per_order: CountRange::new(1, 3),
                tickets_per_subscriber: CountRange::new(0, 1),
                device_events_per_device: CountRange::new(2, 4),
                usage_records_per_subscriber: 8,
                day_span: 30,
                embed_feature_codes: true,
            },
            SizeClass::Medium => Self {
                accounts: 200,
                subscribers_per_account: CountRange::new(1, 5),
                orders_per_account: CountRange::new(1, 4),
                items_per_order: CountRange::new(1, 4),
                tickets_per_subscriber: CountRange::new(0, 2),
                device_events_per_device: CountRange::new(3, 8),
                usage_records_per_subscriber: 40,
                day_span: 90,
                embed_feature_codes: true,
            },
            SizeClass::Large => Self {
                accounts: 2000,
                subscribers_per_account: CountRange::new(1, 6),
                orders_per_account: CountRange::new(1, 6),
                items_per_order: CountRange::new(1, 5),
                tickets_per_subscriber: CountRange::new(0, 3),
                device_events_per_device: CountRange::new(4, 12),
                usage_records_per_subscriber: 120,
                day_span: 180,
                embed_feature_codes: false,
            },
        }
    }

    /// Resolve a size class name to its preset.
    pub fn resolve(size: &str) -> Result<(SizeClass, Preset)> {
        let size = size.parse::<SizeClass>()?;
        Ok((size, Preset::for_size(size)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_has_two_subscribers_per_account() {
        let preset = Preset::for_size(SizeClass::Small);
        assert_eq!(preset.accounts, 3);
        assert_eq!(preset.subscribers_per_account, CountRange::fixed(2));
    }

    #[test]
    fn every_range_is_ordered() {
        for size in SizeClass::ALL {
            let preset = size.preset();
            for range in [
                preset.subscribers_per_account,
                preset.orders_per_account,
                preset.items_per_order,
                preset.tickets_per_subscriber,
                preset.device_events_per_device,
            ] {
                assert!(range.min <= range.max, "{size}: {range:?}");
            }
        }
    }

    #[test]
    fn unknown_size_is_invalid_configuration() {
        assert!(matches!(
            Preset::resolve("huge"),
            Err(Error::InvalidConfiguration(_))
        ));
        assert_eq!(
            Preset::resolve(" Medium ").expect("medium").0,
            SizeClass::Medium
        );
    }
}
