use telcogen_core::{
    DeviceClass, EntityKind, Feature, OrgUnit, Plan, Rate, Region, TicketStatusCode,
};

use crate::catalog;
use crate::errors::GenerationError;
use crate::ids::IdAllocator;

/// Reference catalogs. Materialized without consuming random draws.
#[derive(Debug, Clone, Default)]
pub struct ReferenceCatalogs {
    pub regions: Vec<Region>,
    pub plans: Vec<Plan>,
    pub device_classes: Vec<DeviceClass>,
    pub rates: Vec<Rate>,
    pub features: Vec<Feature>,
    pub ticket_status_codes: Vec<TicketStatusCode>,
    pub org_units: Vec<OrgUnit>,
}

pub fn build_reference(ids: &mut IdAllocator) -> Result<ReferenceCatalogs, GenerationError> {
    let mut catalogs = ReferenceCatalogs::default();

    for (code, name, rate_delta_cents) in catalog::REGIONS {
        catalogs.regions.push(Region {
            region_id: ids.next(EntityKind::Region)?,
            code: code.to_string(),
            name: name.to_string(),
            rate_delta_cents: *rate_delta_cents,
        });
    }

    for (code, name, base_price_cents, data_allowance_mb) in catalog::PLANS {
        catalogs.plans.push(Plan {
            plan_id: ids.next(EntityKind::Plan)?,
            code: code.to_string(),
            name: name.to_string(),
            base_price_cents: *base_price_cents,
            data_allowance_mb: *data_allowance_mb,
        });
    }

    for (code, name, rate_delta_cents) in catalog::DEVICE_CLASSES {
        catalogs.device_classes.push(DeviceClass {
            device_class_id: ids.next(EntityKind::DeviceClass)?,
            code: code.to_string(),
            name: name.to_string(),
            rate_delta_cents: *rate_delta_cents,
        });
    }

    // Full cube: one rate per plan, region and device class.
    for plan in &catalogs.plans {
        for region in &catalogs.regions {
            for class in &catalogs.device_classes {
                catalogs.rates.push(Rate {
                    plan_id: plan.plan_id,
                    region_id: region.region_id,
                    device_class_id: class.device_class_id,
                    price_cents: plan.base_price_cents
                        + region.rate_delta_cents
                        + class.rate_delta_cents,
                });
            }
        }
    }

    for (code, name, monthly_cents) in catalog::FEATURES {
        catalogs.features.push(Feature {
            feature_id: ids.next(EntityKind::Feature)?,
            code: code.to_string(),
            name: name.to_string(),
            monthly_cents: *monthly_cents,
        });
    }

    for (code, description, is_terminal) in catalog::TICKET_STATUS_CODES {
        catalogs.ticket_status_codes.push(TicketStatusCode {
            code: code.to_string(),
            description: description.to_string(),
            is_terminal: *is_terminal,
        });
    }

    for (code, name, parent) in catalog::ORG_UNITS {
        let parent_org_unit_id = match parent {
            Some(index) => Some(
                catalogs
                    .org_units
                    .get(*index)
                    .map(|unit| unit.org_unit_id)
                    .ok_or_else(|| {
                        GenerationError::InvalidConfiguration(format!(
                            "org unit {code} references a later parent"
                        ))
                    })?,
            ),
            None => None,
        };
        catalogs.org_units.push(OrgUnit {
            org_unit_id: ids.next(EntityKind::OrgUnit)?,
            parent_org_unit_id,
            code: code.to_string(),
            name: name.to_string(),
        });
    }

    Ok(catalogs)
}
