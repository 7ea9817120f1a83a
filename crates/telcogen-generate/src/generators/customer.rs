use chrono::{Days, NaiveDate};

use telcogen_core::{
    Account, EntityKind, Feature, Plan, PostalAddress, ProvisioningEvent, ProvisioningState,
    Region, Subscriber, SubscriberFeature, SubscriberFeatureState, SubscriberProfile,
    SubscriberStatus,
};

use crate::catalog;
use crate::errors::GenerationError;
use crate::generators::{GenerationContext, reference_instant};

const PAPERLESS_BILLING_RATE: f64 = 0.6;
const SUSPENDED_RATE: f64 = 0.10;
const MISSING_EMAIL_RATE: f64 = 0.15;
const MISSING_BIRTH_DATE_RATE: f64 = 0.20;
const MARKETING_OPT_IN_RATE: f64 = 0.35;
const FEATURE_STATE_RATE: f64 = 0.45;
const MAX_FEATURES_PER_SUBSCRIBER: i64 = 3;

pub fn generate_accounts(
    ctx: &mut GenerationContext,
    regions: &[Region],
) -> Result<Vec<Account>, GenerationError> {
    let mut accounts = Vec::with_capacity(ctx.preset.accounts as usize);
    for index in 0..ctx.preset.accounts {
        let account_id = ctx.ids.next(EntityKind::Account)?;
        let prefix = ctx.rng.pick(catalog::COMPANY_PREFIXES);
        let suffix = ctx.rng.pick(catalog::COMPANY_SUFFIXES);
        let region = ctx.rng.pick(regions);
        let billing_cycle_day = ctx.rng.int_in(1, 28);
        let paperless_billing = ctx.rng.chance(PAPERLESS_BILLING_RATE);
        let created_at = ctx.window.instant(&mut ctx.rng);

        accounts.push(Account {
            account_id,
            account_number: format!("ACC-{:07}", index + 1),
            name: format!("{prefix} {suffix}"),
            region_id: region.region_id,
            billing_cycle_day,
            paperless_billing,
            created_at,
        });
    }
    Ok(accounts)
}

pub fn generate_subscribers(
    ctx: &mut GenerationContext,
    accounts: &[Account],
    plans: &[Plan],
) -> Result<Vec<Subscriber>, GenerationError> {
    let mut subscribers = Vec::new();
    for account in accounts {
        let count = ctx.count(ctx.preset.subscribers_per_account);
        for _ in 0..count {
            let subscriber_id = ctx.ids.next(EntityKind::Subscriber)?;
            let line = ctx.rng.int_in(0, 9_999_999);
            let plan = ctx.rng.pick(plans);
            let status = if ctx.rng.chance(SUSPENDED_RATE) {
                SubscriberStatus::Suspended
            } else {
                SubscriberStatus::Active
            };
            let activated_at = ctx.window.instant_after(account.created_at, &mut ctx.rng);

            subscribers.push(Subscriber {
                subscriber_id,
                account_id: account.account_id,
                msisdn: format!("+1555{line:07}"),
                plan_id: plan.plan_id,
                status,
                activated_at,
            });
        }
    }
    Ok(subscribers)
}

/// One profile per subscriber, in subscriber order.
pub fn generate_profiles(
    ctx: &mut GenerationContext,
    subscribers: &[Subscriber],
) -> Vec<SubscriberProfile> {
    let today = reference_instant().date_naive();
    subscribers
        .iter()
        .map(|subscriber| {
            let first_name = *ctx.rng.pick(catalog::FIRST_NAMES);
            let last_name = *ctx.rng.pick(catalog::LAST_NAMES);
            let email = if ctx.rng.chance(MISSING_EMAIL_RATE) {
                None
            } else {
                let suffix = ctx.rng.int_in(1, 99);
                let domain = ctx.rng.pick(catalog::EMAIL_DOMAINS);
                Some(format!(
                    "{}.{}{suffix}@{domain}",
                    email_local(first_name),
                    email_local(last_name)
                ))
            };
            let date_of_birth = if ctx.rng.chance(MISSING_BIRTH_DATE_RATE) {
                None
            } else {
                let age_days = ctx.rng.int_in(18 * 365, 80 * 365) as u64;
                birth_date(today, age_days)
            };
            let preferred_language = ctx.rng.pick(catalog::LANGUAGES).to_string();
            let marketing_opt_in = ctx.rng.chance(MARKETING_OPT_IN_RATE);
            let house = ctx.rng.int_in(1, 9_999);
            let street = ctx.rng.pick(catalog::STREETS);
            let (city, postal_prefix) = ctx.rng.pick(catalog::CITIES);
            let postal_suffix = ctx.rng.int_in(0, 99);

            SubscriberProfile {
                subscriber_id: subscriber.subscriber_id,
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                email,
                date_of_birth,
                preferred_language,
                marketing_opt_in,
                address: PostalAddress {
                    line1: format!("{house} {street}"),
                    city: city.to_string(),
                    postal_code: format!("{postal_prefix}{postal_suffix:02}"),
                },
            }
        })
        .collect()
}

/// Bridge rows plus the optional provisioning state for each of them.
pub fn generate_subscriber_features(
    ctx: &mut GenerationContext,
    subscribers: &[Subscriber],
    features: &[Feature],
) -> Result<(Vec<SubscriberFeature>, Vec<SubscriberFeatureState>), GenerationError> {
    let feature_ids: Vec<i64> = features.iter().map(|feature| feature.feature_id).collect();
    let mut bridge = Vec::new();
    let mut states = Vec::new();

    for subscriber in subscribers {
        let count = ctx.rng.int_in(0, MAX_FEATURES_PER_SUBSCRIBER) as usize;
        let mut chosen = ctx.rng.sample(&feature_ids, count);
        chosen.sort_unstable();

        for feature_id in chosen {
            bridge.push(SubscriberFeature {
                subscriber_id: subscriber.subscriber_id,
                feature_id,
            });
            if !ctx.rng.chance(FEATURE_STATE_RATE) {
                continue;
            }

            let subscriber_feature_state_id = ctx.ids.next(EntityKind::SubscriberFeatureState)?;
            let steps = ctx.rng.int_in(1, ProvisioningState::ALL.len() as i64) as usize;
            let mut history = Vec::with_capacity(steps);
            let mut at = subscriber.activated_at;
            for state in ProvisioningState::ALL.into_iter().take(steps) {
                at = ctx.window.instant_after(at, &mut ctx.rng);
                history.push(ProvisioningEvent { state, at });
            }
            let state = history
                .last()
                .map(|event| event.state)
                .unwrap_or(ProvisioningState::Pending);

            states.push(SubscriberFeatureState {
                subscriber_feature_state_id,
                subscriber_id: subscriber.subscriber_id,
                feature_id,
                state,
                updated_at: at,
                history,
            });
        }
    }

    Ok((bridge, states))
}

fn email_local(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn birth_date(today: NaiveDate, age_days: u64) -> Option<NaiveDate> {
    today.checked_sub_days(Days::new(age_days))
}
