//! Static vocabularies and reference tables.
//!
//! Reference rows are materialized in declaration order, so the tables here
//! fix both content and identifiers of the reference catalogs.

/// `(code, name, rate_delta_cents)`
pub const REGIONS: &[(&str, &str, i64)] = &[
    ("NE", "Northeast", 0),
    ("SE", "Southeast", -100),
    ("MW", "Midwest", -50),
    ("WC", "West Coast", 150),
];

/// `(code, name, base_price_cents, data_allowance_mb)`
pub const PLANS: &[(&str, &str, i64, i64)] = &[
    ("BASIC", "Basic Talk & Text", 1500, 1024),
    ("PLUS15", "Plus 15GB", 3000, 15_360),
    ("UNLTD", "Unlimited Everything", 5500, 1_048_576),
    ("IOT", "IoT Connect", 500, 100),
];

/// `(code, name, rate_delta_cents)`
pub const DEVICE_CLASSES: &[(&str, &str, i64)] = &[
    ("PHONE", "Smartphone", 0),
    ("TABLET", "Tablet", 300),
    ("HOTSPOT", "Mobile Hotspot", 500),
    ("MODULE", "IoT Module", -200),
];

/// Models per device class, indexed like [`DEVICE_CLASSES`].
pub const DEVICE_MODELS: &[&[&str]] = &[
    &["Pixel 8", "iPhone 15", "Galaxy S24", "Moto G Power"],
    &["iPad Air", "Galaxy Tab S9", "Lenovo Tab M10"],
    &["Nighthawk M6", "Inseego MiFi X PRO"],
    &["Quectel BG95", "u-blox SARA-R5"],
];

/// `(code, name, monthly_cents)`
pub const FEATURES: &[(&str, &str, i64)] = &[
    ("VOLTE", "Voice over LTE", 0),
    ("WIFI_CALLING", "Wi-Fi Calling", 0),
    ("VOICEMAIL_PLUS", "Visual Voicemail", 299),
    ("INTL_ROAMING", "International Roaming", 1000),
    ("HOTSPOT", "Mobile Hotspot", 1500),
    ("NR_SA", "5G Standalone", 500),
];

/// `(code, description, is_terminal)`
pub const TICKET_STATUS_CODES: &[(&str, &str, bool)] = &[
    ("open", "Opened, not yet triaged", false),
    ("in_progress", "Being worked by an agent", false),
    ("pending_customer", "Waiting on the customer", false),
    ("resolved", "Fix delivered, awaiting confirmation", true),
    ("closed", "Closed", true),
];

/// `(code, name, parent index)`. Parents always precede their children.
pub const ORG_UNITS: &[(&str, &str, Option<usize>)] = &[
    ("HQ", "Headquarters", None),
    ("CARE", "Customer Care", Some(0)),
    ("CARE-T1", "Care Tier 1", Some(1)),
    ("CARE-T2", "Care Tier 2", Some(1)),
    ("NOC", "Network Operations Center", Some(0)),
    ("FIELD", "Field Services", None),
    ("FIELD-N", "Field Services North", Some(5)),
];

/// Org units that tickets are routed to, as indexes into [`ORG_UNITS`].
pub const TICKET_QUEUES: &[usize] = &[2, 3, 4, 6];

/// `(sku, description, unit_price_cents)`
pub const SKUS: &[(&str, &str, i64)] = &[
    ("SIM-STD", "Standard SIM kit", 500),
    ("ESIM-ACT", "eSIM activation", 0),
    ("PHN-PX8", "Pixel 8, 128GB", 69_900),
    ("PHN-IP15", "iPhone 15, 128GB", 79_900),
    ("CASE-RUG", "Rugged case", 2_999),
    ("CHG-USBC", "USB-C fast charger, 30W", 2_499),
    ("HSP-M6", "Mobile hotspot M6", 14_900),
    ("TAB-10", "Tablet 10\" LTE", 32_900),
];

pub const COMPANY_PREFIXES: &[&str] = &[
    "Acme", "Northwind", "Blue Harbor", "Summit", "Redwood", "Keystone", "Lakeside", "Granite",
];

pub const COMPANY_SUFFIXES: &[&str] = &[
    "Logistics", "Dental", "Holdings", "Household", "Builders", "Cafe", "Studios", "Farms",
];

pub const FIRST_NAMES: &[&str] = &[
    "Ada", "Bruno", "Carla", "Diego", "Elena", "Farah", "Gustavo", "Hana", "Ivan", "Julia",
    "Kofi", "Lucia", "Marco", "Nadia", "Omar", "Priya",
];

pub const LAST_NAMES: &[&str] = &[
    "Moreno", "Okafor", "Schmidt", "Tanaka", "Silva", "Novak", "Haddad", "Kowalski", "Reyes",
    "Lindqvist", "O'Brien", "Nguyen",
];

pub const EMAIL_DOMAINS: &[&str] = &["example.com", "mail.test", "inbox.example.org"];

pub const LANGUAGES: &[&str] = &["en", "es", "fr", "pt"];

pub const STREETS: &[&str] = &[
    "Main St", "Oak Ave", "Maple Dr", "Harbor Rd", "Cedar Ln", "Elm St", "Park Blvd",
];

/// `(city, postal prefix)`
pub const CITIES: &[(&str, &str)] = &[
    ("Springfield", "011"),
    ("Riverton", "845"),
    ("Fairview", "372"),
    ("Lakewood", "802"),
    ("Greenville", "296"),
];

pub const TICKET_SUBJECTS: &[&str] = &[
    "Dropped calls, mostly indoors",
    "Bill shows \"roaming\" charges at home",
    "No data after SIM swap",
    "Porting request stuck",
    "Hotspot disconnects every hour",
    "Voicemail PIN reset, not working",
];

pub const NOTE_AUTHORS: &[&str] = &["care.agent01", "care.agent07", "noc.oncall", "field.tech03"];

pub const NOTE_BODIES: &[&str] = &[
    "Customer called about invoice.\nExplained proration on plan change.",
    "Escalated to tier 2, awaiting \"callback\" window.",
    "Verified identity.\nReissued SIM, shipped to address on file.",
    "Order delayed by carrier; customer informed.",
    "Speed test from site: 3 Mbps down, 1 Mbps up.\nOpened NOC investigation.",
];

pub const RADIO_TECHNOLOGIES: &[&str] = &["LTE", "NR", "UMTS"];

pub const APNS: &[&str] = &["internet", "ims", "iot.m2m"];

pub const PROBE_TARGETS: &[&str] = &["dns.probe.example.net", "edge-1.cdn.example.net"];

/// `(cause_code, reason)` from the EMM cause table.
pub const ATTACH_FAILURES: &[(i64, &str)] = &[
    (7, "EPS services not allowed"),
    (11, "PLMN not allowed"),
    (15, "No suitable cells in tracking area"),
    (17, "Network failure"),
];
