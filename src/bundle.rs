//! Bundle

use std::ops::Deref;

use smallvec::SmallVec;

use crate::deliverables::{DeliverableRequest, post_units};

/// The set of deliverables being priced, in the order the caller added them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bundle {
    requests: SmallVec<[DeliverableRequest; 8]>,
}

impl Bundle {
    /// Create an empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a bundle from existing requests.
    pub fn from_requests(requests: impl IntoIterator<Item = DeliverableRequest>) -> Self {
        Self {
            requests: requests.into_iter().collect(),
        }
    }

    /// Append a request. Duplicates of an existing kind are kept as separate entries.
    pub fn push(&mut self, request: DeliverableRequest) {
        self.requests.push(request);
    }

    /// Iterate over the requests.
    pub fn iter(&self) -> impl Iterator<Item = &DeliverableRequest> {
        self.requests.iter()
    }

    /// Number of requests (not total quantity).
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// Check if the bundle has no requests.
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Borrow the requests as a slice.
    pub fn as_slice(&self) -> &[DeliverableRequest] {
        &self.requests
    }

    /// Combined quantity of post-like deliverables.
    pub fn post_units(&self) -> u64 {
        post_units(&self.requests)
    }

    /// Return a copy with duplicate kinds collapsed into one request each.
    ///
    /// Kinds keep the position of their first appearance. Quantities saturate at `u32::MAX`.
    #[must_use]
    pub fn merged(&self) -> Self {
        let mut merged: SmallVec<[DeliverableRequest; 8]> = SmallVec::new();

        for request in &self.requests {
            if let Some(existing) = merged.iter_mut().find(|r| r.kind() == request.kind()) {
                *existing = DeliverableRequest::new(
                    existing.kind(),
                    existing.quantity().saturating_add(request.quantity()),
                );
            } else {
                merged.push(*request);
            }
        }

        Self { requests: merged }
    }
}

impl Deref for Bundle {
    type Target = [DeliverableRequest];

    fn deref(&self) -> &Self::Target {
        &self.requests
    }
}

impl FromIterator<DeliverableRequest> for Bundle {
    fn from_iter<I: IntoIterator<Item = DeliverableRequest>>(iter: I) -> Self {
        Self::from_requests(iter)
    }
}
