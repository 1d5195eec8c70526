use chrono::{TimeZone, Utc};
use postings_core::{
    capitalize_words, normalize, normalize_company, normalize_experience, normalize_tags,
    normalize_title, JobRecord, ProvisionalRecord, NOT_AVAILABLE, NOT_LISTED,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    ingest_logging::initialize_for_tests();
}

fn provisional() -> ProvisionalRecord {
    ProvisionalRecord {
        title: "  senior BACKEND engineer - lightning job by cutshort ⚡ ".into(),
        company: " at Acme Labs ".into(),
        location: " Bengaluru,\n  India ".into(),
        description: "<div class=\"prose\"><p>Build things</p></div>".into(),
        apply_link: "https://cutshort.io/job/Senior-Backend-Engineer-abc123".into(),
        tags: vec![" Rust ".into(), "".into(), "PostgreSQL".into()],
        pay: " ₹30L - ₹45L ".into(),
        experience: "Experience: 4 - 8 years".into(),
    }
}

fn created_at() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

fn renormalize(record: &JobRecord) -> JobRecord {
    normalize(
        ProvisionalRecord {
            title: record.title.clone(),
            company: record.company.clone(),
            location: record.location.clone(),
            description: record.description.clone(),
            apply_link: record.apply_link.clone(),
            tags: record.tags.as_slice().to_vec(),
            pay: record.pay.clone(),
            experience: record.experience.clone(),
        },
        record.created_at,
    )
}

#[test]
fn normalize_cleans_every_field() {
    init_logging();
    let record = normalize(provisional(), created_at());

    assert_eq!(record.title, "Senior Backend Engineer");
    assert_eq!(record.company, "Acme Labs");
    assert_eq!(record.location, "Bengaluru, India");
    assert_eq!(record.pay, "₹30L - ₹45L");
    assert_eq!(record.experience, "4 - 8 years");
    assert_eq!(record.tags.as_slice(), ["Rust", "PostgreSQL"]);
    assert_eq!(record.created_at, created_at());
}

#[test]
fn normalize_never_touches_apply_link() {
    let mut input = provisional();
    input.apply_link = "  https://example.com/Apply?id=AbC ".into();
    let record = normalize(input, created_at());
    assert_eq!(record.apply_link, "  https://example.com/Apply?id=AbC ");
}

#[test]
fn normalize_is_idempotent() {
    let once = normalize(provisional(), created_at());
    let twice = renormalize(&once);
    assert_eq!(once, twice);
}

#[test]
fn sentinels_survive_normalization() {
    let input = ProvisionalRecord {
        title: NOT_AVAILABLE.into(),
        company: NOT_AVAILABLE.into(),
        location: "   ".into(),
        description: NOT_AVAILABLE.into(),
        apply_link: "https://topstartups.io/jobs/1".into(),
        tags: Vec::new(),
        pay: NOT_LISTED.into(),
        experience: "".into(),
    };
    let record = normalize(input, created_at());
    assert_eq!(record.title, NOT_AVAILABLE);
    assert_eq!(record.company, NOT_AVAILABLE);
    assert_eq!(record.location, NOT_AVAILABLE);
    assert_eq!(record.description, NOT_AVAILABLE);
    assert_eq!(record.pay, NOT_LISTED);
    assert_eq!(record.experience, NOT_AVAILABLE);
    assert!(record.tags.is_empty());
    assert_eq!(record.tags.to_json_string(), "[]");
    assert_eq!(renormalize(&record), record);
}

#[test]
fn title_badges_are_removed_only_at_the_edges() {
    assert_eq!(normalize_title("Machine Learning Engineer New"), "Machine Learning Engineer");
    assert_eq!(normalize_title("New\n  Data Scientist"), "Data Scientist");
    assert_eq!(normalize_title("Newsletter Editor"), "Newsletter Editor");
    assert_eq!(normalize_title("Head Of New Markets"), "Head Of New Markets");
    assert_eq!(normalize_title("new"), NOT_AVAILABLE);
}

#[test]
fn company_prefix_is_stripped_once_per_occurrence_at_start() {
    assert_eq!(normalize_company("at Acme"), "Acme");
    assert_eq!(normalize_company("AT  Acme"), "Acme");
    assert_eq!(normalize_company("Data at Scale"), "Data at Scale");
    assert_eq!(normalize_company("At&T"), "At&T");
}

#[test]
fn experience_label_is_stripped() {
    assert_eq!(normalize_experience("Experience: 2+ years"), "2+ years");
    assert_eq!(normalize_experience("3-5 years"), "3-5 years");
    assert_eq!(normalize_experience("Experience:"), NOT_AVAILABLE);
}

#[test]
fn capitalize_words_lowercases_tails() {
    assert_eq!(capitalize_words("full-stack DEVELOPER (remote)"), "Full-stack Developer (remote)");
}

#[test]
fn tags_keep_source_order() {
    let tags = normalize_tags(vec!["Go".into(), " Kafka ".into(), "Go".into()]);
    assert_eq!(tags.as_slice(), ["Go", "Kafka", "Go"]);
}
