//! Bundle Fixtures

use serde::Deserialize;

use crate::{bundle::Bundle, deliverables::DeliverableRequest};

/// Wrapper for a bundle in YAML
#[derive(Debug, Deserialize)]
pub struct BundleFixture {
    /// Requested deliverables, in order
    #[serde(default)]
    pub deliverables: Vec<DeliverableRequest>,
}

impl From<BundleFixture> for Bundle {
    fn from(fixture: BundleFixture) -> Self {
        Bundle::from_requests(fixture.deliverables)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::deliverables::DeliverableKind;

    use super::*;

    #[test]
    fn bundle_fixture_keeps_order_and_duplicates() -> TestResult {
        let yaml = r"
deliverables:
  - type: reel
    quantity: 1
  - type: post
    quantity: 3
  - type: reel
    quantity: 2
";

        let fixture: BundleFixture = serde_norway::from_str(yaml)?;
        let bundle = Bundle::from(fixture);

        assert_eq!(
            bundle.as_slice(),
            [
                DeliverableRequest::new(DeliverableKind::Reel, 1),
                DeliverableRequest::new(DeliverableKind::Post, 3),
                DeliverableRequest::new(DeliverableKind::Reel, 2),
            ]
        );

        Ok(())
    }

    #[test]
    fn unknown_deliverable_type_fails_to_parse() {
        let yaml = r"
deliverables:
  - type: podcast
    quantity: 1
";

        let result: Result<BundleFixture, _> = serde_norway::from_str(yaml);

        assert!(result.is_err(), "unknown type should not deserialize");
    }

    #[test]
    fn negative_quantity_fails_to_parse() {
        let yaml = r"
deliverables:
  - type: post
    quantity: -1
";

        let result: Result<BundleFixture, _> = serde_norway::from_str(yaml);

        assert!(result.is_err(), "negative quantity should not deserialize");
    }
}
