use chrono::{DateTime, Utc};

use crate::{JobRecord, ProvisionalRecord, TagList, NOT_AVAILABLE};

/// Site boilerplate appended to titles, matched word by word, case-insensitively.
const TITLE_BOILERPLATE: &[&[&str]] = &[&["-", "lightning", "job", "by", "cutshort", "⚡"]];

/// Badge text that sources render inside the title element.
const TITLE_BADGES: &[&str] = &["new"];

const COMPANY_PREFIX: &str = "at ";
const EXPERIENCE_LABEL: &str = "experience:";

/// Turns a provisional record into its stored form. Idempotent on every field;
/// `apply_link` passes through untouched.
pub fn normalize(record: ProvisionalRecord, created_at: DateTime<Utc>) -> JobRecord {
    JobRecord {
        title: normalize_title(&record.title),
        company: normalize_company(&record.company),
        location: normalize_text(&record.location),
        description: or_sentinel(record.description.trim()),
        apply_link: record.apply_link,
        tags: normalize_tags(record.tags),
        pay: normalize_text(&record.pay),
        experience: normalize_experience(&record.experience),
        created_at,
    }
}

pub fn normalize_title(raw: &str) -> String {
    let mut words: Vec<&str> = raw.split_whitespace().collect();
    for phrase in TITLE_BOILERPLATE {
        remove_phrase(&mut words, phrase);
    }
    while words.first().is_some_and(|w| is_badge(w)) {
        words.remove(0);
    }
    while words.last().is_some_and(|w| is_badge(w)) {
        words.pop();
    }
    let title = words.join(" ");
    if title == NOT_AVAILABLE {
        return title;
    }
    or_sentinel(&capitalize_words(&title))
}

pub fn normalize_company(raw: &str) -> String {
    let mut company = raw.trim();
    while let Some(rest) = strip_prefix_ignore_case(company, COMPANY_PREFIX) {
        company = rest.trim_start();
    }
    or_sentinel(&collapse_whitespace(company))
}

pub fn normalize_experience(raw: &str) -> String {
    let mut experience = raw.trim();
    while let Some(rest) = strip_prefix_ignore_case(experience, EXPERIENCE_LABEL) {
        experience = rest.trim_start();
    }
    or_sentinel(&collapse_whitespace(experience))
}

/// Trims and collapses inner whitespace; empty becomes the `N/A` sentinel.
pub fn normalize_text(raw: &str) -> String {
    or_sentinel(&collapse_whitespace(raw))
}

pub fn normalize_tags(raw: Vec<String>) -> TagList {
    raw.into_iter()
        .map(|tag| collapse_whitespace(&tag))
        .filter(|tag| !tag.is_empty())
        .collect::<Vec<_>>()
        .into()
}

/// Upper-cases the first letter of each word and lower-cases the rest.
pub fn capitalize_words(raw: &str) -> String {
    raw.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn remove_phrase(words: &mut Vec<&str>, phrase: &[&str]) {
    let mut idx = 0;
    while idx + phrase.len() <= words.len() {
        let matches = words[idx..idx + phrase.len()]
            .iter()
            .zip(phrase)
            .all(|(word, expected)| word.to_lowercase() == *expected);
        if matches {
            words.drain(idx..idx + phrase.len());
            // The removal can close up a copy that started before `idx`.
            idx = idx.saturating_sub(phrase.len().saturating_sub(1));
        } else {
            idx += 1;
        }
    }
}

fn is_badge(word: &str) -> bool {
    TITLE_BADGES
        .iter()
        .any(|badge| word.eq_ignore_ascii_case(badge))
}

fn strip_prefix_ignore_case<'a>(value: &'a str, prefix: &str) -> Option<&'a str> {
    let head = value.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&value[prefix.len()..])
    } else {
        None
    }
}

fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn or_sentinel(value: &str) -> String {
    if value.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        value.to_string()
    }
}
