// src/reconcile/mod.rs
pub mod values;

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, trace};

use crate::{identifiers::IdentifierSet, table::Dataset};

/// Result of matching identifiers against the names in a dataset.
///
/// Every identifier of the input set is either in `matched` or in
/// `unmatched`, never both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    /// Identifier → dataset key it matched.
    pub matched: BTreeMap<String, String>,
    pub unmatched: BTreeSet<String>,
}

impl Reconciliation {
    /// Number of identifiers covered.
    pub fn len(&self) -> usize {
        self.matched.len() + self.unmatched.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matched.is_empty() && self.unmatched.is_empty()
    }

    /// True if `matched` and `unmatched` split exactly the keys of `identifiers`.
    pub fn is_partition_of(&self, identifiers: &IdentifierSet) -> bool {
        self.len() == identifiers.len()
            && identifiers
                .keys()
                .all(|code| self.matched.contains_key(code) != self.unmatched.contains(code))
    }
}

/// Match each identifier's display name against the dataset keys.
///
/// Matching is exact and case sensitive. A name that is not found is a
/// normal outcome and lands in `unmatched`.
pub fn reconcile(identifiers: &IdentifierSet, dataset: &Dataset) -> Reconciliation {
    let mut out = Reconciliation::default();

    for (code, name) in identifiers {
        if dataset.contains_key(name) {
            out.matched.insert(code.clone(), name.clone());
        } else {
            trace!(code = %code, name = %name, "no dataset row for name");
            out.unmatched.insert(code.clone());
        }
    }

    debug!(
        matched = out.matched.len(),
        unmatched = out.unmatched.len(),
        "reconciled identifiers"
    );
    out
}


#[cfg(test)]
mod tests {
    use super::test_support::{dataset, ids};
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn matches_by_exact_name() {
        let ids = ids(&[("us", "United States"), ("fr", "France"), ("xx", "Nowhereland")]);
        let data = dataset(&[
            ("United States", "2000", "1"),
            ("France", "2000", "2"),
            ("Germany", "2000", "3"),
        ]);

        let rec = reconcile(&ids, &data);
        assert_eq!(rec.matched.len(), 2);
        assert_eq!(rec.matched["us"], "United States");
        assert_eq!(rec.matched["fr"], "France");
        assert_eq!(rec.unmatched, BTreeSet::from(["xx".to_string()]));
        assert!(rec.is_partition_of(&ids));
    }

    #[test]
    fn case_difference_is_unmatched() {
        let ids = ids(&[("us", "united states")]);
        let data = dataset(&[("United States", "2000", "1")]);

        let rec = reconcile(&ids, &data);
        assert!(rec.matched.is_empty());
        assert!(rec.unmatched.contains("us"));
    }

    #[test]
    fn empty_dataset_leaves_everything_unmatched() {
        let ids = ids(&[("XX", "Nowhereland")]);
        let rec = reconcile(&ids, &Dataset::new());
        assert!(rec.matched.is_empty());
        assert_eq!(rec.unmatched.len(), 1);
        assert!(rec.is_partition_of(&ids));
    }

    #[test]
    fn empty_identifier_set_gives_empty_result() {
        let data = dataset(&[("France", "2000", "2")]);
        let rec = reconcile(&IdentifierSet::new(), &data);
        assert!(rec.is_empty());
    }

    #[test]
    fn two_codes_may_share_a_name() {
        let ids = ids(&[("cd", "Congo"), ("cg", "Congo")]);
        let data = dataset(&[("Congo", "2000", "9")]);

        let rec = reconcile(&ids, &data);
        assert_eq!(rec.matched.len(), 2);
        assert!(rec.is_partition_of(&ids));
    }

    #[test]
    fn partition_holds_over_mixed_inputs() {
        let names = ["A", "b", "C ", "D", "é", ""];
        let data = dataset(&[
            ("A", "2000", "1"),
            ("B", "2000", "1"),
            ("C", "2000", "1"),
            ("é", "2000", "1"),
            ("", "2000", "1"),
        ]);
        let ids: IdentifierSet = names
            .iter()
            .enumerate()
            .map(|(i, n)| (format!("c{i}"), n.to_string()))
            .collect();

        let rec = reconcile(&ids, &data);
        assert!(rec.is_partition_of(&ids));
        assert_eq!(
            rec.matched.keys().cloned().collect::<Vec<_>>(),
            vec!["c0", "c4", "c5"]
        );
        assert_eq!(reconcile(&ids, &data), rec);
    }

    #[test]
    fn partition_check_rejects_overlap() {
        let ids = ids(&[("us", "United States")]);
        let mut rec = Reconciliation::default();
        rec.matched.insert("us".into(), "United States".into());
        rec.unmatched.insert("us".into());
        assert!(!rec.is_partition_of(&ids));
    }

    proptest! {
        #[test]
        fn matched_and_unmatched_partition_the_codes(
            ids in prop::collection::btree_map("[A-Z]{2}", "[aAbB ]{0,3}", 0..16),
            names in prop::collection::hash_set("[aAbB ]{0,3}", 0..10),
        ) {
            let data: Dataset = names.into_iter().map(|n| (n, crate::table::Record::new())).collect();

            let rec = reconcile(&ids, &data);
            prop_assert!(rec.is_partition_of(&ids));
            for (code, name) in &rec.matched {
                prop_assert_eq!(&ids[code], name);
                prop_assert!(data.contains_key(name));
            }
            // exact match only: "ab" never stands in for "AB"
            for code in &rec.unmatched {
                prop_assert!(!data.contains_key(&ids[code]));
            }
            prop_assert_eq!(reconcile(&ids, &data), rec);
        }
    }
}
