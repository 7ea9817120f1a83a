//! Field probabilities converge on their targets at the large size.

use telcogen_core::{Preset, SizeClass, SubscriberStatus, Usage};
use telcogen_generate::generate_canonical;

fn share(hits: usize, total: usize) -> f64 {
    hits as f64 / total as f64
}

fn assert_within(label: &str, observed: f64, target: f64, tolerance: f64) {
    assert!(
        (observed - target).abs() < tolerance,
        "{label}: observed {observed:.4}, expected {target:.2}"
    );
}

fn assert_near(label: &str, observed: f64, target: f64) {
    assert_within(label, observed, target, 0.02);
}

#[test]
fn large_dataset_matches_field_probabilities() {
    let data = generate_canonical(2024, &Preset::for_size(SizeClass::Large)).expect("dataset");

    // Only one draw per account, so the sample is small.
    let accounts = data.accounts.len();
    let paperless = data.accounts.iter().filter(|row| row.paperless_billing).count();
    assert_within("paperless billing", share(paperless, accounts), 0.60, 0.04);

    let subscribers = data.subscribers.len();
    assert!(subscribers > 5_000);

    let suspended = data
        .subscribers
        .iter()
        .filter(|row| row.status == SubscriberStatus::Suspended)
        .count();
    assert_near("suspended", share(suspended, subscribers), 0.10);

    let profiles = data.subscriber_profiles.len();
    let no_email = data.subscriber_profiles.iter().filter(|p| p.email.is_none()).count();
    let no_birth = data
        .subscriber_profiles
        .iter()
        .filter(|p| p.date_of_birth.is_none())
        .count();
    let opt_in = data
        .subscriber_profiles
        .iter()
        .filter(|p| p.marketing_opt_in)
        .count();
    assert_near("email null", share(no_email, profiles), 0.15);
    assert_near("birth date null", share(no_birth, profiles), 0.20);
    assert_near("marketing opt-in", share(opt_in, profiles), 0.35);

    assert_near(
        "feature state",
        share(
            data.subscriber_feature_states.len(),
            data.subscriber_features.len(),
        ),
        0.45,
    );

    let usage = data.usage_records.len();
    let voice = data
        .usage_records
        .iter()
        .filter(|row| matches!(row.usage, Usage::Voice { .. }))
        .count();
    let sms = data
        .usage_records
        .iter()
        .filter(|row| matches!(row.usage, Usage::Sms { .. }))
        .count();
    assert_near("voice", share(voice, usage), 0.45);
    assert_near("sms", share(sms, usage), 0.25);
    assert_near("data", share(usage - voice - sms, usage), 0.30);
}
