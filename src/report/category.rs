//! Counts of transactions per category, used for the pie chart.

use std::collections::HashMap;

use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::{report::match_month_by_substring, transaction::Transaction};

/// The number of transactions for each category label.
///
/// Labels are kept exactly as stored (case sensitive, untrimmed) and in the
/// order they were first seen. Only categories with at least one
/// transaction appear.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CategoryDistribution {
    counts: Vec<(String, u64)>,
}

impl CategoryDistribution {
    /// The count for `category`, or `None` if it did not appear.
    pub fn get(&self, category: &str) -> Option<u64> {
        self.counts
            .iter()
            .find(|(label, _)| label == category)
            .map(|(_, count)| *count)
    }

    /// The categories and their counts in first seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts
            .iter()
            .map(|(label, count)| (label.as_str(), *count))
    }

    /// The number of distinct categories.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether no transactions were counted.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// The sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|(_, count)| count).sum()
    }
}

impl Serialize for CategoryDistribution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.counts.len()))?;
        for (label, count) in self.iter() {
            map.serialize_entry(label, &count)?;
        }
        map.end()
    }
}

/// Count the transactions matching `month` per category.
pub fn compute_category_distribution(
    transactions: &[Transaction],
    month: &str,
) -> CategoryDistribution {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(String, u64)> = Vec::new();

    for transaction in match_month_by_substring(transactions, month) {
        let category = transaction.category.as_str();
        match positions.get(category) {
            Some(&position) => counts[position].1 += 1,
            None => {
                positions.insert(category, counts.len());
                counts.push((category.to_owned(), 1));
            }
        }
    }

    CategoryDistribution { counts }
}

#[cfg(test)]
mod tests {
    use crate::{report::compute_category_distribution, transaction::Transaction};

    fn transaction(category: &str, date_of_sale: &str) -> Transaction {
        Transaction {
            id: 0,
            title: String::new(),
            description: String::new(),
            price: 1.0,
            category: category.to_owned(),
            date_of_sale: date_of_sale.to_owned(),
            sold: true,
        }
    }

    #[test]
    fn counts_each_category() {
        let transactions = [
            transaction("A", "2021-03-01"),
            transaction("B", "2021-03-15"),
        ];

        let got = compute_category_distribution(&transactions, "03");

        assert_eq!(got.get("A"), Some(1));
        assert_eq!(got.get("B"), Some(1));
        assert_eq!(got.len(), 2);
    }

    #[test]
    fn keeps_first_seen_order() {
        let transactions = [
            transaction("jewelery", "2021-03-01"),
            transaction("electronics", "2021-03-02"),
            transaction("jewelery", "2021-03-03"),
            transaction("books", "2021-03-04"),
        ];

        let got: Vec<_> = compute_category_distribution(&transactions, "")
            .iter()
            .map(|(label, count)| (label.to_owned(), count))
            .collect();

        assert_eq!(
            got,
            [
                ("jewelery".to_owned(), 2),
                ("electronics".to_owned(), 1),
                ("books".to_owned(), 1),
            ]
        );
    }

    #[test]
    fn labels_are_not_normalized() {
        let transactions = [
            transaction("Books", "2021-03-01"),
            transaction("books", "2021-03-01"),
            transaction("books ", "2021-03-01"),
        ];

        let got = compute_category_distribution(&transactions, "");

        assert_eq!(got.len(), 3);
    }

    #[test]
    fn absent_categories_are_omitted() {
        let transactions = [
            transaction("A", "2021-03-01"),
            transaction("B", "2021-04-01"),
        ];

        let got = compute_category_distribution(&transactions, "-03-");

        assert_eq!(got.get("B"), None);
        assert!(got.iter().all(|(_, count)| count > 0));
        assert_eq!(got.total(), 1);
    }

    #[test]
    fn empty_selection_is_empty() {
        let got = compute_category_distribution(&[], "03");

        assert!(got.is_empty());
        assert_eq!(serde_json::to_string(&got).unwrap(), "{}");
    }

    #[test]
    fn serializes_in_first_seen_order() {
        let transactions = [
            transaction("zebra", "2021-03-01"),
            transaction("apple", "2021-03-01"),
        ];

        let json = serde_json::to_string(&compute_category_distribution(&transactions, "")).unwrap();

        assert_eq!(json, r#"{"zebra":1,"apple":1}"#);
    }
}
