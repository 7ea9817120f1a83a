use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use serde::Serialize;

use crate::dataset::CanonicalDataset;
use crate::entity::EntityKind;
use crate::model::rate_usage;

/// A single integrity violation with its location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub code: String,
    pub path: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(
        code: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code, self.path, self.message)
    }
}

/// Aggregated result of an integrity pass.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
    /// Number of individual references and keys checked.
    pub checked: u64,
}

impl ValidationReport {
    /// Returns true when there are no errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Error counts keyed by issue code.
    pub fn errors_by_code(&self) -> BTreeMap<String, u64> {
        let mut counts = BTreeMap::new();
        for issue in &self.errors {
            *counts.entry(issue.code.clone()).or_insert(0) += 1;
        }
        counts
    }

    fn require(
        &mut self,
        ok: bool,
        code: &str,
        path: impl FnOnce() -> String,
        message: impl FnOnce() -> String,
    ) {
        self.checked += 1;
        if !ok {
            self.errors.push(ValidationIssue::new(code, path(), message()));
        }
    }
}

/// Check keys, identifier blocks and every foreign key of a canonical dataset.
pub fn validate_dataset(dataset: &CanonicalDataset) -> ValidationReport {
    let mut report = ValidationReport::default();

    let regions = check_ids(&mut report, EntityKind::Region, &dataset.regions, |row| row.region_id);
    let plans = check_ids(&mut report, EntityKind::Plan, &dataset.plans, |row| row.plan_id);
    let device_classes = check_ids(
        &mut report,
        EntityKind::DeviceClass,
        &dataset.device_classes,
        |row| row.device_class_id,
    );
    let features = check_ids(&mut report, EntityKind::Feature, &dataset.features, |row| {
        row.feature_id
    });
    let org_units = check_ids(&mut report, EntityKind::OrgUnit, &dataset.org_units, |row| {
        row.org_unit_id
    });
    let accounts = check_ids(&mut report, EntityKind::Account, &dataset.accounts, |row| {
        row.account_id
    });
    let subscribers = check_ids(
        &mut report,
        EntityKind::Subscriber,
        &dataset.subscribers,
        |row| row.subscriber_id,
    );
    let devices = check_ids(&mut report, EntityKind::Device, &dataset.devices, |row| row.device_id);
    let orders = check_ids(&mut report, EntityKind::Order, &dataset.orders, |row| row.order_id);
    check_ids(
        &mut report,
        EntityKind::OrderItem,
        &dataset.order_items,
        |row| row.order_item_id,
    );
    check_ids(
        &mut report,
        EntityKind::SubscriberFeatureState,
        &dataset.subscriber_feature_states,
        |row| row.subscriber_feature_state_id,
    );
    let tickets = check_ids(&mut report, EntityKind::Ticket, &dataset.tickets, |row| row.ticket_id);
    check_ids(&mut report, EntityKind::Note, &dataset.notes, |row| row.note_id);
    check_ids(
        &mut report,
        EntityKind::DeviceEvent,
        &dataset.device_events,
        |row| row.device_event_id,
    );
    check_ids(
        &mut report,
        EntityKind::UsageRecord,
        &dataset.usage_records,
        |row| row.usage_record_id,
    );

    let mut status_codes = HashSet::new();
    for (index, row) in dataset.ticket_status_codes.iter().enumerate() {
        let fresh = status_codes.insert(row.code.as_str());
        report.require(
            fresh,
            "duplicate_key",
            || path(EntityKind::TicketStatusCode, index, "code"),
            || format!("duplicate status code '{}'", row.code),
        );
    }

    let mut rate_keys = HashSet::new();
    for (index, row) in dataset.rates.iter().enumerate() {
        let fresh = rate_keys.insert((row.plan_id, row.region_id, row.device_class_id));
        report.require(
            fresh,
            "duplicate_key",
            || path(EntityKind::Rate, index, "plan_id"),
            || "duplicate (plan, region, device class) rate".to_string(),
        );
        check_ref(&mut report, EntityKind::Rate, index, "plan_id", row.plan_id, &plans);
        check_ref(&mut report, EntityKind::Rate, index, "region_id", row.region_id, &regions);
        check_ref(
            &mut report,
            EntityKind::Rate,
            index,
            "device_class_id",
            row.device_class_id,
            &device_classes,
        );
    }
    let cube = plans.len() * regions.len() * device_classes.len();
    report.require(
        rate_keys.len() == cube,
        "incomplete_rate_table",
        || EntityKind::Rate.name().to_string(),
        || format!("expected {cube} rates, found {}", rate_keys.len()),
    );

    for (index, row) in dataset.org_units.iter().enumerate() {
        if let Some(parent) = row.parent_org_unit_id {
            check_ref(
                &mut report,
                EntityKind::OrgUnit,
                index,
                "parent_org_unit_id",
                parent,
                &org_units,
            );
            report.require(
                parent < row.org_unit_id,
                "forward_reference",
                || path(EntityKind::OrgUnit, index, "parent_org_unit_id"),
                || format!("parent {parent} is not older than {}", row.org_unit_id),
            );
        }
    }

    for (index, row) in dataset.accounts.iter().enumerate() {
        check_ref(&mut report, EntityKind::Account, index, "region_id", row.region_id, &regions);
    }

    for (index, row) in dataset.subscribers.iter().enumerate() {
        check_ref(
            &mut report,
            EntityKind::Subscriber,
            index,
            "account_id",
            row.account_id,
            &accounts,
        );
        check_ref(&mut report, EntityKind::Subscriber, index, "plan_id", row.plan_id, &plans);
    }

    let mut profiled = HashSet::new();
    for (index, row) in dataset.subscriber_profiles.iter().enumerate() {
        check_ref(
            &mut report,
            EntityKind::SubscriberProfile,
            index,
            "subscriber_id",
            row.subscriber_id,
            &subscribers,
        );
        let fresh = profiled.insert(row.subscriber_id);
        report.require(
            fresh,
            "duplicate_key",
            || path(EntityKind::SubscriberProfile, index, "subscriber_id"),
            || format!("second profile for subscriber {}", row.subscriber_id),
        );
    }
    report.require(
        profiled.len() == subscribers.len(),
        "missing_child",
        || EntityKind::SubscriberProfile.name().to_string(),
        || format!("{} subscribers but {} profiles", subscribers.len(), profiled.len()),
    );

    let mut equipped = HashSet::new();
    for (index, row) in dataset.devices.iter().enumerate() {
        check_ref(
            &mut report,
            EntityKind::Device,
            index,
            "subscriber_id",
            row.subscriber_id,
            &subscribers,
        );
        check_ref(
            &mut report,
            EntityKind::Device,
            index,
            "device_class_id",
            row.device_class_id,
            &device_classes,
        );
        let fresh = equipped.insert(row.subscriber_id);
        report.require(
            fresh,
            "duplicate_child",
            || path(EntityKind::Device, index, "subscriber_id"),
            || format!("second device for subscriber {}", row.subscriber_id),
        );
    }
    report.require(
        equipped.len() == subscribers.len(),
        "missing_child",
        || EntityKind::Device.name().to_string(),
        || format!("{} subscribers but {} devices", subscribers.len(), equipped.len()),
    );

    for (index, row) in dataset.orders.iter().enumerate() {
        check_ref(&mut report, EntityKind::Order, index, "account_id", row.account_id, &accounts);
    }

    let mut order_totals: HashMap<i64, i64> = HashMap::new();
    for (index, row) in dataset.order_items.iter().enumerate() {
        check_ref(&mut report, EntityKind::OrderItem, index, "order_id", row.order_id, &orders);
        *order_totals.entry(row.order_id).or_insert(0) += row.line_total_cents();
    }
    for (index, row) in dataset.orders.iter().enumerate() {
        let expected = order_totals.get(&row.order_id).copied().unwrap_or(0);
        report.require(
            row.total_cents == expected,
            "derived_value",
            || path(EntityKind::Order, index, "total_cents"),
            || format!("total {} does not match items sum {expected}", row.total_cents),
        );
    }

    let mut bridge = HashSet::new();
    for (index, row) in dataset.subscriber_features.iter().enumerate() {
        check_ref(
            &mut report,
            EntityKind::SubscriberFeature,
            index,
            "subscriber_id",
            row.subscriber_id,
            &subscribers,
        );
        check_ref(
            &mut report,
            EntityKind::SubscriberFeature,
            index,
            "feature_id",
            row.feature_id,
            &features,
        );
        let fresh = bridge.insert((row.subscriber_id, row.feature_id));
        report.require(
            fresh,
            "duplicate_key",
            || path(EntityKind::SubscriberFeature, index, "feature_id"),
            || format!("feature {} held twice by {}", row.feature_id, row.subscriber_id),
        );
    }

    let mut stated = HashSet::new();
    for (index, row) in dataset.subscriber_feature_states.iter().enumerate() {
        let pair = (row.subscriber_id, row.feature_id);
        report.require(
            bridge.contains(&pair),
            "dangling_reference",
            || path(EntityKind::SubscriberFeatureState, index, "subscriber_id,feature_id"),
            || format!("({}, {}) not in subscriber_features", pair.0, pair.1),
        );
        let fresh = stated.insert(pair);
        report.require(
            fresh,
            "duplicate_key",
            || path(EntityKind::SubscriberFeatureState, index, "subscriber_id,feature_id"),
            || format!("second state row for ({}, {})", pair.0, pair.1),
        );
        report.require(
            row.history.last().map(|event| event.state) == Some(row.state),
            "derived_value",
            || path(EntityKind::SubscriberFeatureState, index, "state"),
            || "state does not match the latest history entry".to_string(),
        );
    }

    for (index, row) in dataset.tickets.iter().enumerate() {
        check_ref(
            &mut report,
            EntityKind::Ticket,
            index,
            "subscriber_id",
            row.subscriber_id,
            &subscribers,
        );
        report.require(
            status_codes.contains(row.status_code.as_str()),
            "dangling_reference",
            || path(EntityKind::Ticket, index, "status_code"),
            || format!("unknown status code '{}'", row.status_code),
        );
        check_ref(
            &mut report,
            EntityKind::Ticket,
            index,
            "assigned_org_unit_id",
            row.assigned_org_unit_id,
            &org_units,
        );
    }

    let note_targets: HashMap<EntityKind, &HashSet<i64>> = HashMap::from([
        (EntityKind::Subscriber, &subscribers),
        (EntityKind::Order, &orders),
        (EntityKind::Ticket, &tickets),
    ]);
    for (index, row) in dataset.notes.iter().enumerate() {
        let kind = row.target.ref_type().target_kind();
        let ref_id = row.target.ref_id();
        report.require(
            note_targets
                .get(&kind)
                .is_some_and(|ids| ids.contains(&ref_id)),
            "dangling_reference",
            || path(EntityKind::Note, index, "ref_id"),
            || format!("{ref_id} not found in {kind}"),
        );
    }

    for (index, row) in dataset.device_events.iter().enumerate() {
        check_ref(&mut report, EntityKind::DeviceEvent, index, "device_id", row.device_id, &devices);
    }

    for (index, row) in dataset.usage_records.iter().enumerate() {
        check_ref(
            &mut report,
            EntityKind::UsageRecord,
            index,
            "subscriber_id",
            row.subscriber_id,
            &subscribers,
        );
        check_ref(
            &mut report,
            EntityKind::UsageRecord,
            index,
            "region_id",
            row.region_id,
            &regions,
        );
        let expected = rate_usage(row.usage);
        report.require(
            row.rated_cents == expected,
            "derived_value",
            || path(EntityKind::UsageRecord, index, "rated_cents"),
            || format!("rated {} but pricing rule gives {expected}", row.rated_cents),
        );
    }

    report
}

fn check_ids<E>(
    report: &mut ValidationReport,
    kind: EntityKind,
    rows: &[E],
    id: impl Fn(&E) -> i64,
) -> HashSet<i64> {
    let column = kind.primary_key().first().copied().unwrap_or("id");
    let range = kind.id_range();
    let mut seen = HashSet::with_capacity(rows.len());

    for (index, row) in rows.iter().enumerate() {
        let value = id(row);
        let fresh = seen.insert(value);
        report.require(
            fresh,
            "duplicate_key",
            || path(kind, index, column),
            || format!("duplicate identifier {value}"),
        );
        if let Some(range) = &range {
            report.require(
                range.contains(&value),
                "id_out_of_block",
                || path(kind, index, column),
                || format!("{value} outside {}..={}", range.start(), range.end()),
            );
        }
    }

    seen
}

fn check_ref(
    report: &mut ValidationReport,
    kind: EntityKind,
    index: usize,
    column: &str,
    value: i64,
    targets: &HashSet<i64>,
) {
    report.require(
        targets.contains(&value),
        "dangling_reference",
        || path(kind, index, column),
        || format!("{value} does not resolve"),
    );
}

fn path(kind: EntityKind, index: usize, column: &str) -> String {
    format!("{}[{index}].{column}", kind.name())
}
