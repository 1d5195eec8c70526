//! Per-site extraction of postings from listing pages.
//!
//! Every site is a variant of [`SourceAdapter`]; all of them turn one
//! [`RawDocument`] into records in document order. A container either becomes
//! a [`ProvisionalRecord`] or a [`Discarded`] entry, never an error for the
//! page. Sub-fields that are simply absent fall back to sentinels; positional
//! reads into sub-lists of the wrong shape abandon the container.
mod cutshort;
mod topstartups;

use std::fmt;
use std::str::FromStr;

use ingest_logging::{ingest_debug, ingest_warn};
use postings_core::{Discarded, Extraction, ProvisionalRecord, NOT_AVAILABLE, NOT_LISTED};
use scraper::{ElementRef, Html, Selector};

use crate::upsert::UpsertMode;
use crate::RawDocument;

const TOPSTARTUPS_URL: &str = "https://topstartups.io/jobs/?job_location=India&startup__markets=Artificial+Intelligence&startup__markets=Analytics&startup__markets=Biotech&startup__markets=Crypto&startup__markets=Cybersecurity&startup__markets=Data+Science&startup__markets=E-Commerce&startup__markets=EdTech&startup__markets=Enterprise+Software&startup__markets=FinTech&startup__markets=Hardware&startup__markets=SaaS&startup__company_size=1-10+employees&startup__company_size=11-50+employees&startup__company_size=51-100+employees&startup__company_size=101-200+employees&startup__company_size=201-500+employees";

/// The origin sites postings are scraped from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceAdapter {
    Cutshort,
    TopStartups,
}

/// How a source spreads its listings over requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pagination {
    /// One request, no page parameter.
    Single,
    /// `page=1..=pages` query parameter.
    Paged {
        default_pages: u32,
        /// Drop the first and last record of each page (listings repeat across page edges).
        trim_boundaries: bool,
    },
}

/// Records and discards from one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdapterOutput {
    pub records: Vec<ProvisionalRecord>,
    pub discarded: Vec<Discarded>,
}

impl AdapterOutput {
    /// Number of matched containers, kept or not.
    pub fn container_count(&self) -> usize {
        self.records.len() + self.discarded.len()
    }

    fn from_extractions(extractions: Vec<Extraction>) -> Self {
        let mut output = Self::default();
        for extraction in extractions {
            match extraction {
                Ok(record) => output.records.push(record),
                Err(discarded) => output.discarded.push(discarded),
            }
        }
        output
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown source {0:?} (expected one of: cutshort, topstartups)")]
pub struct UnknownSource(pub String);

impl SourceAdapter {
    pub const ALL: [SourceAdapter; 2] = [SourceAdapter::Cutshort, SourceAdapter::TopStartups];

    pub fn as_str(self) -> &'static str {
        match self {
            SourceAdapter::Cutshort => "cutshort",
            SourceAdapter::TopStartups => "topstartups",
        }
    }

    pub fn default_url(self) -> &'static str {
        match self {
            SourceAdapter::Cutshort => "https://cutshort.io/jobs",
            SourceAdapter::TopStartups => TOPSTARTUPS_URL,
        }
    }

    pub fn pagination(self) -> Pagination {
        match self {
            SourceAdapter::Cutshort => Pagination::Single,
            SourceAdapter::TopStartups => Pagination::Paged {
                default_pages: 2,
                trim_boundaries: true,
            },
        }
    }

    pub fn default_upsert_mode(self) -> UpsertMode {
        match self {
            SourceAdapter::Cutshort => UpsertMode::PerRecord,
            SourceAdapter::TopStartups => UpsertMode::Batch,
        }
    }

    pub fn pay_sentinel(self) -> &'static str {
        match self {
            SourceAdapter::Cutshort => NOT_AVAILABLE,
            SourceAdapter::TopStartups => NOT_LISTED,
        }
    }

    /// Extracts every posting container on the page, logging each discard.
    pub fn extract(self, doc: &RawDocument) -> AdapterOutput {
        let html = Html::parse_document(&doc.html);
        let extractions = match self {
            SourceAdapter::Cutshort => cutshort::extract(&html),
            SourceAdapter::TopStartups => topstartups::extract(&html),
        };
        let output = AdapterOutput::from_extractions(extractions);
        for discarded in &output.discarded {
            ingest_warn!(
                "[{}] skipping posting on {}: {}",
                self.as_str(),
                doc.url,
                discarded
            );
        }
        ingest_debug!(
            "[{}] {} containers, {} records on {}",
            self.as_str(),
            output.container_count(),
            output.records.len(),
            doc.url
        );
        output
    }
}

impl fmt::Display for SourceAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceAdapter {
    type Err = UnknownSource;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|source| source.as_str().eq_ignore_ascii_case(raw.trim()))
            .ok_or_else(|| UnknownSource(raw.to_string()))
    }
}

// Selector helpers. A selector that fails to parse matches nothing.

fn select_all<'a>(scope: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => scope.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

fn select_first<'a>(scope: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    scope.select(&selector).next()
}

fn select_in_document<'a>(html: &'a Html, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => html.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn parent_element(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element.parent().and_then(ElementRef::wrap)
}

fn non_empty_attr(element: ElementRef<'_>, name: &str) -> Option<String> {
    element
        .value()
        .attr(name)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
