//! Postings core: pure record model, normalization and paging rules.
mod discard;
mod normalize;
mod record;
mod trim;

pub use discard::{DiscardReason, Discarded, Extraction};
pub use normalize::{
    capitalize_words, normalize, normalize_company, normalize_experience, normalize_tags,
    normalize_text, normalize_title,
};
pub use record::{JobRecord, ProvisionalRecord, TagList, NOT_AVAILABLE, NOT_LISTED};
pub use trim::trim_page_boundaries;
