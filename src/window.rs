use serde::{Deserialize, Serialize};

/// How the first page of the transaction history is found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "policy")]
pub enum WindowStart {
    /// Open on the first page whose text contains the marker.
    Marker { marker: String },
    /// Open at a fixed zero-based page index.
    PageIndex { index: usize },
}

/// Gate state across a document's pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gate {
    Waiting,
    Open,
    Closed,
}

/// Tracks whether each page lies inside the transaction history section.
#[derive(Debug)]
pub struct PageWindow<'a> {
    start: &'a WindowStart,
    end_marker: &'a str,
    gate: Gate,
    first: Option<usize>,
    last: Option<usize>,
}

impl<'a> PageWindow<'a> {
    pub fn new(start: &'a WindowStart, end_marker: &'a str) -> Self {
        Self {
            start,
            end_marker,
            gate: Gate::Waiting,
            first: None,
            last: None,
        }
    }

    fn opens_on(&self, index: usize, text: &str) -> bool {
        match self.start {
            WindowStart::Marker { marker } => text.contains(marker.as_str()),
            WindowStart::PageIndex { index: start } => index >= *start,
        }
    }

    /// Feed the next page in order. Returns true when it should be extracted.
    pub fn admit(&mut self, index: usize, text: &str) -> bool {
        if self.gate == Gate::Waiting && self.opens_on(index, text) {
            tracing::debug!(page = index + 1, "transaction window opens");
            self.gate = Gate::Open;
            self.first = Some(index);
        }
        if self.gate != Gate::Open {
            return false;
        }
        self.last = Some(index);
        if !self.end_marker.is_empty() && text.contains(self.end_marker) {
            tracing::debug!(page = index + 1, "transaction window closes");
            self.gate = Gate::Closed;
        }
        true
    }

    /// No later page can be admitted.
    pub fn is_closed(&self) -> bool {
        self.gate == Gate::Closed
    }

    pub fn was_opened(&self) -> bool {
        self.first.is_some()
    }

    /// Opened but never saw the end marker.
    pub fn is_unterminated(&self) -> bool {
        self.gate == Gate::Open
    }

    /// Zero-based inclusive page range that was admitted.
    pub fn span(&self) -> Option<(usize, usize)> {
        Some((self.first?, self.last?))
    }
}
