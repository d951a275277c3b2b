//! Barcode → top container lookup, built once per run.

use std::collections::HashMap;

use aiu_aspace::TopContainer;

/// Read-only projection of a resource's top containers keyed by barcode.
///
/// Containers without a barcode are not indexed. When two containers share a
/// barcode the later one wins.
#[derive(Debug, Clone, Default)]
pub struct ContainerIndex {
    by_barcode: HashMap<String, TopContainer>,
}

impl ContainerIndex {
    pub fn build(containers: impl IntoIterator<Item = TopContainer>) -> Self {
        let mut by_barcode = HashMap::new();
        for tc in containers {
            if tc.barcode().is_empty() {
                continue;
            }
            let barcode = tc.barcode().to_owned();
            if let Some(previous) = by_barcode.insert(barcode, tc) {
                tracing::warn!(
                    "duplicate barcode {}: {} replaced by a later container",
                    previous.barcode(),
                    previous.uri
                );
            }
        }
        Self { by_barcode }
    }

    pub fn get(&self, barcode: &str) -> Option<&TopContainer> {
        self.by_barcode.get(barcode)
    }

    /// URI of the container holding `barcode`.
    pub fn uri_for(&self, barcode: &str) -> Option<&str> {
        self.get(barcode).map(|tc| tc.uri.as_str())
    }

    pub fn len(&self) -> usize {
        self.by_barcode.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_barcode.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tc(n: u32, barcode: Option<&str>) -> TopContainer {
        TopContainer {
            uri: format!("/repositories/2/top_containers/{n}"),
            barcode: barcode.map(str::to_owned),
            indicator: n.to_string(),
        }
    }

    #[test]
    fn indexes_by_barcode() {
        let index = ContainerIndex::build(vec![tc(1, Some("B1")), tc(2, Some("B2"))]);
        assert_eq!(index.len(), 2);
        assert_eq!(index.uri_for("B2"), Some("/repositories/2/top_containers/2"));
        assert_eq!(index.get("B1").unwrap().indicator, "1");
        assert_eq!(index.uri_for("B9"), None);
    }

    #[test]
    fn empty_and_missing_barcodes_are_skipped() {
        let index = ContainerIndex::build(vec![tc(1, Some("")), tc(2, None), tc(3, Some("B3"))]);
        assert_eq!(index.len(), 1);
        assert_eq!(index.uri_for(""), None);
    }

    #[test]
    fn later_duplicate_wins() {
        let index = ContainerIndex::build(vec![tc(1, Some("B1")), tc(2, Some("B1"))]);
        assert_eq!(index.len(), 1);
        assert_eq!(index.uri_for("B1"), Some("/repositories/2/top_containers/2"));
    }

    #[test]
    fn empty_input_builds_empty_index() {
        assert!(ContainerIndex::build(Vec::new()).is_empty());
    }
}
