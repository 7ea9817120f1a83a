use serde::{Deserialize, Serialize};

use super::Entity;
use crate::entity::EntityKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub region_id: i64,
    pub code: String,
    pub name: String,
    /// Added to a plan's base price for every rate in this region.
    pub rate_delta_cents: i64,
}

impl Entity for Region {
    const KIND: EntityKind = EntityKind::Region;
    const COLUMNS: &'static [&'static str] = &["region_id", "code", "name", "rate_delta_cents"];
    type Key = i64;

    fn key(&self) -> i64 {
        self.region_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub plan_id: i64,
    pub code: String,
    pub name: String,
    pub base_price_cents: i64,
    pub data_allowance_mb: i64,
}

impl Entity for Plan {
    const KIND: EntityKind = EntityKind::Plan;
    const COLUMNS: &'static [&'static str] = &[
        "plan_id",
        "code",
        "name",
        "base_price_cents",
        "data_allowance_mb",
    ];
    type Key = i64;

    fn key(&self) -> i64 {
        self.plan_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceClass {
    pub device_class_id: i64,
    pub code: String,
    pub name: String,
    pub rate_delta_cents: i64,
}

impl Entity for DeviceClass {
    const KIND: EntityKind = EntityKind::DeviceClass;
    const COLUMNS: &'static [&'static str] =
        &["device_class_id", "code", "name", "rate_delta_cents"];
    type Key = i64;

    fn key(&self) -> i64 {
        self.device_class_id
    }
}

/// One cell of the plan × region × device class price cube.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rate {
    pub plan_id: i64,
    pub region_id: i64,
    pub device_class_id: i64,
    pub price_cents: i64,
}

impl Entity for Rate {
    const KIND: EntityKind = EntityKind::Rate;
    const COLUMNS: &'static [&'static str] =
        &["plan_id", "region_id", "device_class_id", "price_cents"];
    type Key = (i64, i64, i64);

    fn key(&self) -> (i64, i64, i64) {
        (self.plan_id, self.region_id, self.device_class_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub feature_id: i64,
    pub code: String,
    pub name: String,
    pub monthly_cents: i64,
}

impl Entity for Feature {
    const KIND: EntityKind = EntityKind::Feature;
    const COLUMNS: &'static [&'static str] = &["feature_id", "code", "name", "monthly_cents"];
    type Key = i64;

    fn key(&self) -> i64 {
        self.feature_id
    }
}

/// Node of the organisation forest. Roots have no parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgUnit {
    pub org_unit_id: i64,
    pub parent_org_unit_id: Option<i64>,
    pub code: String,
    pub name: String,
}

impl Entity for OrgUnit {
    const KIND: EntityKind = EntityKind::OrgUnit;
    const COLUMNS: &'static [&'static str] =
        &["org_unit_id", "parent_org_unit_id", "code", "name"];
    type Key = i64;

    fn key(&self) -> i64 {
        self.org_unit_id
    }
}
