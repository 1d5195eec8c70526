//! cutshort.io featured jobs: one page, styled-component class names.
use postings_core::{DiscardReason, Discarded, Extraction, ProvisionalRecord, NOT_AVAILABLE};
use scraper::{ElementRef, Html};

use super::{non_empty_attr, select_all, select_first, select_in_document, text_of};

const LISTING: &str = "div.sc-fa532d7-1";
const POSTING: &str = "div.sc-7c1b58ff-0";
const TITLE: &str = "div.etmRhT";
const COMPANY: &str = "div.jHwvAU";
const LOCATION: &str = "div.iuWDyb";
const DESCRIPTION: &str = "div.prose";
const APPLY: &str = "a.gFhnqg";
const TAG: &str = "span.cKTdnH";
/// Entry 0 holds experience, entry 1 holds pay.
const DETAIL_BLOCK: &str = "div.hsLjb";

const EXPERIENCE_ENTRY: usize = 0;
const PAY_ENTRY: usize = 1;
/// Label div first, value div second.
const VALUE_DIV: usize = 1;

pub(super) fn extract(html: &Html) -> Vec<Extraction> {
    let Some(listing) = select_in_document(html, LISTING).into_iter().next() else {
        return Vec::new();
    };
    select_all(listing, POSTING)
        .into_iter()
        .map(extract_posting)
        .collect()
}

fn extract_posting(posting: ElementRef<'_>) -> Extraction {
    let title = select_first(posting, TITLE).map(text_of);
    let company = select_first(posting, COMPANY).map(text_of);
    let discard = |reason| Discarded::new(reason).with_context(title.clone(), company.clone());

    let details = select_all(posting, DETAIL_BLOCK);
    if details.len() <= PAY_ENTRY {
        return Err(discard(DiscardReason::ShapeMismatch {
            field: "pay/experience",
            expected: PAY_ENTRY + 1,
            found: details.len(),
        }));
    }

    let Some(apply_link) = select_first(posting, APPLY).and_then(|a| non_empty_attr(a, "href"))
    else {
        return Err(discard(DiscardReason::MissingApplyLink));
    };

    Ok(ProvisionalRecord {
        title: title.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        company: company.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        location: select_first(posting, LOCATION)
            .map(text_of)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        // Kept as markup; the site renders rich descriptions.
        description: select_first(posting, DESCRIPTION)
            .map(|element| element.html())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        apply_link,
        tags: select_all(posting, TAG).into_iter().map(text_of).collect(),
        pay: detail_value(details[PAY_ENTRY]),
        experience: detail_value(details[EXPERIENCE_ENTRY]),
    })
}

fn detail_value(block: ElementRef<'_>) -> String {
    select_all(block, "div")
        .get(VALUE_DIV)
        .map(|value| text_of(*value))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}
