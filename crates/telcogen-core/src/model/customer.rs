use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::Entity;
use crate::entity::EntityKind;

/// Billing root, one per organisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub account_id: i64,
    pub account_number: String,
    pub name: String,
    pub region_id: i64,
    pub billing_cycle_day: i64,
    pub paperless_billing: bool,
    pub created_at: DateTime<Utc>,
}

impl Entity for Account {
    const KIND: EntityKind = EntityKind::Account;
    const COLUMNS: &'static [&'static str] = &[
        "account_id",
        "account_number",
        "name",
        "region_id",
        "billing_cycle_day",
        "paperless_billing",
        "created_at",
    ];
    type Key = i64;

    fn key(&self) -> i64 {
        self.account_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriberStatus {
    Active,
    Suspended,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscriber {
    pub subscriber_id: i64,
    pub account_id: i64,
    pub msisdn: String,
    pub plan_id: i64,
    pub status: SubscriberStatus,
    pub activated_at: DateTime<Utc>,
}

impl Entity for Subscriber {
    const KIND: EntityKind = EntityKind::Subscriber;
    const COLUMNS: &'static [&'static str] = &[
        "subscriber_id",
        "account_id",
        "msisdn",
        "plan_id",
        "status",
        "activated_at",
    ];
    type Key = i64;

    fn key(&self) -> i64 {
        self.subscriber_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostalAddress {
    pub line1: String,
    pub city: String,
    pub postal_code: String,
}

/// PII attributes, 1:1 with [`Subscriber`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriberProfile {
    pub subscriber_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub preferred_language: String,
    pub marketing_opt_in: bool,
    pub address: PostalAddress,
}

impl Entity for SubscriberProfile {
    const KIND: EntityKind = EntityKind::SubscriberProfile;
    const COLUMNS: &'static [&'static str] = &[
        "subscriber_id",
        "first_name",
        "last_name",
        "email",
        "date_of_birth",
        "preferred_language",
        "marketing_opt_in",
        "address",
    ];
    type Key = i64;

    fn key(&self) -> i64 {
        self.subscriber_id
    }
}

/// Bridge row: subscriber holds feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriberFeature {
    pub subscriber_id: i64,
    pub feature_id: i64,
}

impl Entity for SubscriberFeature {
    const KIND: EntityKind = EntityKind::SubscriberFeature;
    const COLUMNS: &'static [&'static str] = &["subscriber_id", "feature_id"];
    type Key = (i64, i64);

    fn key(&self) -> (i64, i64) {
        (self.subscriber_id, self.feature_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProvisioningState {
    Pending,
    Provisioned,
    Deprovisioned,
}

impl ProvisioningState {
    pub const ALL: [ProvisioningState; 3] = [
        ProvisioningState::Pending,
        ProvisioningState::Provisioned,
        ProvisioningState::Deprovisioned,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisioningEvent {
    pub state: ProvisioningState,
    pub at: DateTime<Utc>,
}

/// Provisioning history for a bridge row. Not every bridge row has one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriberFeatureState {
    pub subscriber_feature_state_id: i64,
    pub subscriber_id: i64,
    pub feature_id: i64,
    pub state: ProvisioningState,
    pub updated_at: DateTime<Utc>,
    pub history: Vec<ProvisioningEvent>,
}

impl Entity for SubscriberFeatureState {
    const KIND: EntityKind = EntityKind::SubscriberFeatureState;
    const COLUMNS: &'static [&'static str] = &[
        "subscriber_feature_state_id",
        "subscriber_id",
        "feature_id",
        "state",
        "updated_at",
        "history",
    ];
    type Key = i64;

    fn key(&self) -> i64 {
        self.subscriber_feature_state_id
    }
}
