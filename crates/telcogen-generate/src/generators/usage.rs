use std::collections::HashMap;

use telcogen_core::{
    Account, EntityKind, Region, Subscriber, Usage, UsageRecord, UsageType, rate_usage,
};

use crate::errors::GenerationError;
use crate::generators::GenerationContext;
use crate::rng::RandomSource;

const VOICE_SHARE: f64 = 0.45;
const SMS_SHARE: f64 = 0.25;
const ROAMING_RATE: f64 = 0.10;

/// Fixed number of rated usage records per subscriber.
pub fn generate_usage(
    ctx: &mut GenerationContext,
    subscribers: &[Subscriber],
    accounts: &[Account],
    regions: &[Region],
) -> Result<Vec<UsageRecord>, GenerationError> {
    let home_regions: HashMap<i64, i64> = accounts
        .iter()
        .map(|account| (account.account_id, account.region_id))
        .collect();
    let per_subscriber = ctx.preset.usage_records_per_subscriber as usize;
    let mut records = Vec::with_capacity(subscribers.len() * per_subscriber);

    for subscriber in subscribers {
        let home_region = home_regions
            .get(&subscriber.account_id)
            .copied()
            .ok_or_else(|| {
                GenerationError::InvalidRecord(format!(
                    "subscriber {} references unknown account {}",
                    subscriber.subscriber_id, subscriber.account_id
                ))
            })?;

        for _ in 0..per_subscriber {
            let usage_record_id = ctx.ids.next(EntityKind::UsageRecord)?;
            let usage = draw_usage(&mut ctx.rng);
            let region_id = if ctx.rng.chance(ROAMING_RATE) {
                ctx.rng.pick(regions).region_id
            } else {
                home_region
            };
            let started_at = ctx.window.instant_after(subscriber.activated_at, &mut ctx.rng);

            records.push(UsageRecord {
                usage_record_id,
                subscriber_id: subscriber.subscriber_id,
                region_id,
                usage,
                rated_cents: rate_usage(usage),
                started_at,
            });
        }
    }
    Ok(records)
}

/// Type from one draw (voice 45%, sms 25%, data 30%), units from a second.
fn draw_usage(rng: &mut RandomSource) -> Usage {
    let roll = rng.next_f64();
    let usage_type = if roll < VOICE_SHARE {
        UsageType::Voice
    } else if roll < VOICE_SHARE + SMS_SHARE {
        UsageType::Sms
    } else {
        UsageType::Data
    };
    let units = match usage_type {
        UsageType::Voice => rng.int_in(1, 3_600),
        UsageType::Sms => rng.int_in(1, 20),
        UsageType::Data => rng.int_in(1, 2_097_152),
    };
    Usage::from_parts(usage_type, units as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn units_are_positive_for_every_type() {
        let mut rng = RandomSource::new(12);
        for _ in 0..500 {
            assert!(draw_usage(&mut rng).units() >= 1);
        }
    }
}
