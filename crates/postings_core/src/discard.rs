use std::fmt;

use crate::ProvisionalRecord;

/// Why a container was dropped instead of becoming a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscardReason {
    /// A positional read into a sub-list found fewer entries than required.
    ShapeMismatch {
        field: &'static str,
        expected: usize,
        found: usize,
    },
    /// The container carries no usable apply link, so it has no identity.
    MissingApplyLink,
}

impl fmt::Display for DiscardReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscardReason::ShapeMismatch {
                field,
                expected,
                found,
            } => write!(
                f,
                "{field}: expected at least {expected} entries, found {found}"
            ),
            DiscardReason::MissingApplyLink => write!(f, "missing apply link"),
        }
    }
}

/// A container that was abandoned, with whatever context was already read.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("record discarded ({reason}) title={title:?} company={company:?}")]
pub struct Discarded {
    pub reason: DiscardReason,
    pub title: Option<String>,
    pub company: Option<String>,
}

impl Discarded {
    pub fn new(reason: DiscardReason) -> Self {
        Self {
            reason,
            title: None,
            company: None,
        }
    }

    pub fn with_context(mut self, title: Option<String>, company: Option<String>) -> Self {
        self.title = title;
        self.company = company;
        self
    }
}

/// Outcome of extracting one container.
pub type Extraction = Result<ProvisionalRecord, Discarded>;
