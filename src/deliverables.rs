//! Deliverables

use std::{fmt, str::FromStr};

use serde::Deserialize;
use thiserror::Error;

/// Errors related to deliverable parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeliverableError {
    /// The deliverable type is not one of the known kinds.
    #[error("unknown deliverable type: {0}")]
    UnknownKind(String),
}

/// The kinds of content a seller can be booked to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliverableKind {
    /// A single story frame.
    Story,

    /// A feed post.
    Post,

    /// A short-form video reel.
    Reel,

    /// User-generated-content video delivered to the brand.
    UgcVideo,

    /// A sequence of story frames.
    StorySeries,

    /// A multi-image carousel post.
    CarouselPost,

    /// A long-form IGTV video.
    Igtv,
}

impl DeliverableKind {
    /// Every deliverable kind, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Story,
        Self::Post,
        Self::Reel,
        Self::UgcVideo,
        Self::StorySeries,
        Self::CarouselPost,
        Self::Igtv,
    ];

    /// Whether this kind counts towards package discount tiers.
    pub const fn is_post_like(self) -> bool {
        matches!(self, Self::Post | Self::CarouselPost)
    }

    /// The snake case identifier used in fixtures.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Story => "story",
            Self::Post => "post",
            Self::Reel => "reel",
            Self::UgcVideo => "ugc_video",
            Self::StorySeries => "story_series",
            Self::CarouselPost => "carousel_post",
            Self::Igtv => "igtv",
        }
    }

    /// Human readable label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Story => "Story",
            Self::Post => "Post",
            Self::Reel => "Reel",
            Self::UgcVideo => "UGC Video",
            Self::StorySeries => "Story Series",
            Self::CarouselPost => "Carousel Post",
            Self::Igtv => "IGTV",
        }
    }
}

impl fmt::Display for DeliverableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DeliverableKind {
    type Err = DeliverableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();

        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| DeliverableError::UnknownKind(s.to_string()))
    }
}

/// A requested quantity of one deliverable kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DeliverableRequest {
    #[serde(rename = "type")]
    kind: DeliverableKind,
    quantity: u32,
}

impl DeliverableRequest {
    /// Create a new request.
    pub const fn new(kind: DeliverableKind, quantity: u32) -> Self {
        Self { kind, quantity }
    }

    /// The requested deliverable kind.
    pub const fn kind(&self) -> DeliverableKind {
        self.kind
    }

    /// The requested quantity.
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }
}

/// Sum of quantities across post-like requests.
pub fn post_units(requests: &[DeliverableRequest]) -> u64 {
    requests
        .iter()
        .filter(|request| request.kind.is_post_like())
        .map(|request| u64::from(request.quantity))
        .sum()
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn only_posts_and_carousels_are_post_like() {
        let post_like: Vec<_> = DeliverableKind::ALL
            .into_iter()
            .filter(|kind| kind.is_post_like())
            .collect();

        assert_eq!(
            post_like,
            [DeliverableKind::Post, DeliverableKind::CarouselPost]
        );
    }

    #[test]
    fn parses_snake_case_identifiers() -> TestResult {
        assert_eq!(
            "ugc_video".parse::<DeliverableKind>()?,
            DeliverableKind::UgcVideo
        );
        assert_eq!(" IGTV ".parse::<DeliverableKind>()?, DeliverableKind::Igtv);

        Ok(())
    }

    #[test]
    fn unknown_identifier_is_rejected() {
        let result = "podcast".parse::<DeliverableKind>();

        assert_eq!(
            result,
            Err(DeliverableError::UnknownKind("podcast".to_string()))
        );
    }

    #[test]
    fn post_units_counts_posts_and_carousels_only() {
        let requests = [
            DeliverableRequest::new(DeliverableKind::Post, 2),
            DeliverableRequest::new(DeliverableKind::Reel, 4),
            DeliverableRequest::new(DeliverableKind::CarouselPost, 3),
            DeliverableRequest::new(DeliverableKind::Post, 1),
        ];

        assert_eq!(post_units(&requests), 6);
    }

    #[test]
    fn display_uses_label() {
        assert_eq!(DeliverableKind::StorySeries.to_string(), "Story Series");
    }
}
