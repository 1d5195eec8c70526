//! topstartups.io job cards.
use postings_core::{DiscardReason, Discarded, Extraction, ProvisionalRecord, NOT_AVAILABLE};
use scraper::node::Node;
use scraper::{ElementRef, Html};

use super::{
    non_empty_attr, parent_element, select_all, select_first, select_in_document, text_of,
    SourceAdapter,
};

const CARD: &str = "div.card.card-body";
const TITLE: &str = "h5#job-title";
/// Alternating anchors: even positions wrap the company name, odd ones are the apply link.
const STARTUP_LINK: &str = "a#startup-website-link";
const COMPANY_NAME: &str = "h7";
const LOCATION_ICON: &str = "i.fas.fa-map-marker-alt";
const EXPERIENCE_ICON: &str = "i.fas.fa-briefcase";
const DESCRIPTION_MARKER: &str = "b#card-header";
const TAG: &str = "span.badge";
const SALARY: &str = "span.salary";

pub(super) fn extract(html: &Html) -> Vec<Extraction> {
    select_in_document(html, CARD)
        .into_iter()
        .map(extract_card)
        .collect()
}

fn extract_card(card: ElementRef<'_>) -> Extraction {
    let title = select_first(card, TITLE)
        .map(heading_text)
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    let mut company = None;
    let mut apply_link = None;
    for (idx, anchor) in select_all(card, STARTUP_LINK).into_iter().enumerate() {
        if idx % 2 == 0 {
            if let Some(name) = select_first(anchor, COMPANY_NAME) {
                company = Some(text_of(name));
            }
        } else if let Some(href) = non_empty_attr(anchor, "href") {
            apply_link = Some(href);
        }
    }

    let Some(apply_link) = apply_link else {
        return Err(Discarded::new(DiscardReason::MissingApplyLink)
            .with_context(Some(title), company));
    };

    Ok(ProvisionalRecord {
        title,
        company: company.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        location: icon_label(card, LOCATION_ICON),
        description: description(card),
        apply_link,
        tags: select_all(card, TAG).into_iter().map(text_of).collect(),
        pay: select_first(card, SALARY)
            .map(text_of)
            .unwrap_or_else(|| SourceAdapter::TopStartups.pay_sentinel().to_string()),
        experience: icon_label(card, EXPERIENCE_ICON),
    })
}

/// Title text without the `<span>` badges rendered inside the heading,
/// which may sit flush against the last word.
fn heading_text(heading: ElementRef<'_>) -> String {
    let parts: Vec<String> = heading
        .children()
        .filter_map(|child| match child.value() {
            Node::Text(text) => Some(text.trim().to_string()),
            Node::Element(element) if element.name() != "span" => {
                ElementRef::wrap(child).map(text_of)
            }
            _ => None,
        })
        .filter(|part| !part.is_empty())
        .collect();
    parts.join(" ")
}

/// Text of the element an icon sits in, e.g. `<h7><i class="fas fa-briefcase"></i> 3+ years</h7>`.
fn icon_label(card: ElementRef<'_>, icon: &str) -> String {
    select_first(card, icon)
        .and_then(parent_element)
        .map(text_of)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Bare text of the paragraph introduced by the card header, without its
/// `<b>` header and `<span>` decorations.
fn description(card: ElementRef<'_>) -> String {
    let paragraph = select_first(card, DESCRIPTION_MARKER).and_then(|marker| {
        marker
            .ancestors()
            .filter_map(ElementRef::wrap)
            .find(|ancestor| ancestor.value().name() == "p")
    });
    let Some(paragraph) = paragraph else {
        return NOT_AVAILABLE.to_string();
    };

    let parts: Vec<&str> = paragraph
        .children()
        .filter_map(|child| match child.value() {
            Node::Text(text) => Some(text.trim()),
            _ => None,
        })
        .filter(|part| !part.is_empty())
        .collect();
    if parts.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        parts.join(" ")
    }
}
