//! Page planning for bounded and adaptive pagination
//!
//! A site either knows its page count up front (bounded) or has to discover
//! it (adaptive). Servers answer out-of-range page indices in one of two
//! ways: an empty listing, or an echo of the last real page. Discovery
//! treats both as termination signals and additionally enforces a hard
//! ceiling, so it can never loop indefinitely.

use crate::scrape::fetcher::PageRequest;
use scraper::Html;
use std::fmt;
use url::Url;

/// Builds the URL of a given 1-based page of a site's listing
pub type PageUrlFn = fn(&Url, u32) -> Result<Url, url::ParseError>;

/// Reads a total page count out of a page's embedded pagination control
pub type PageHintFn = fn(&Html) -> Option<u32>;

/// How many pages a run visits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagePolicy {
    /// Fetch pages 1..=pages unconditionally
    Bounded { pages: u32 },
    /// Probe forward from page 1 until a termination signal or the ceiling
    Adaptive { ceiling: u32 },
}

impl PagePolicy {
    /// The largest page number the policy could ever request
    pub fn ceiling(&self) -> u32 {
        match self {
            PagePolicy::Bounded { pages } => *pages,
            PagePolicy::Adaptive { ceiling } => *ceiling,
        }
    }
}

/// Why adaptive discovery stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The page contained zero matching rows
    NoMatchingRows,
    /// The page body was byte-identical to the previous page
    UnchangedContent,
    /// The hard iteration ceiling was reached
    CeilingReached,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::NoMatchingRows => write!(f, "no matching rows"),
            StopReason::UnchangedContent => write!(f, "content unchanged from previous page"),
            StopReason::CeilingReached => write!(f, "page ceiling reached"),
        }
    }
}

/// Builds the full request plan for a bounded page range
pub fn bounded_plan(
    page_url: PageUrlFn,
    base: &Url,
    first: u32,
    last: u32,
) -> crate::Result<Vec<PageRequest>> {
    let mut plan = Vec::with_capacity(last.saturating_sub(first) as usize + 1);
    for page in first..=last {
        plan.push(PageRequest::new(page_url(base, page)?, page));
    }
    Ok(plan)
}

/// Tracks adaptive discovery across successively fetched pages
///
/// The caller alternates `next_page` and `observe`: `next_page` hands out
/// page numbers until the ceiling, `observe` inspects a fetched page and
/// reports whether discovery is over. A page whose observation returns a
/// `StopReason` contributed nothing new and its rows must be discarded.
#[derive(Debug)]
pub struct Discovery {
    ceiling: u32,
    next: u32,
    previous_body: Option<String>,
    stopped: Option<StopReason>,
}

impl Discovery {
    pub fn new(ceiling: u32) -> Self {
        Discovery {
            ceiling,
            next: 1,
            previous_body: None,
            stopped: None,
        }
    }

    /// Next page number to fetch, `None` once discovery is over
    pub fn next_page(&mut self) -> Option<u32> {
        if self.stopped.is_some() {
            return None;
        }
        if self.next > self.ceiling {
            self.stopped = Some(StopReason::CeilingReached);
            return None;
        }
        let page = self.next;
        self.next += 1;
        Some(page)
    }

    /// Feeds one fetched page back into discovery
    ///
    /// The identity signal is checked before the row-count signal: an echoed
    /// page usually still contains rows, all of them already extracted from
    /// the page before it.
    pub fn observe(&mut self, body: &str, rows: usize) -> Option<StopReason> {
        if self
            .previous_body
            .as_deref()
            .is_some_and(|previous| previous == body)
        {
            self.stopped = Some(StopReason::UnchangedContent);
            return self.stopped;
        }
        if rows == 0 {
            self.stopped = Some(StopReason::NoMatchingRows);
            return self.stopped;
        }
        self.previous_body = Some(body.to_string());
        None
    }

    pub fn stop_reason(&self) -> Option<StopReason> {
        self.stopped
    }
}
