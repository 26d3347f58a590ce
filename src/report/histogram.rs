//! Counts of transactions per price range, used for the bar chart.

use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::{report::match_month_by_substring, transaction::Transaction};

/// One of the ten fixed price ranges.
///
/// Each range includes its upper bound, so a price of exactly 100 is in
/// [PriceBucket::UpTo100] and 100.01 is in [PriceBucket::UpTo200].
/// Prices are never negative in the store, so no bucket handles them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriceBucket {
    /// 0 to 100.
    UpTo100,
    /// Above 100 up to 200.
    UpTo200,
    /// Above 200 up to 300.
    UpTo300,
    /// Above 300 up to 400.
    UpTo400,
    /// Above 400 up to 500.
    UpTo500,
    /// Above 500 up to 600.
    UpTo600,
    /// Above 600 up to 700.
    UpTo700,
    /// Above 700 up to 800.
    UpTo800,
    /// Above 800 up to 900.
    UpTo900,
    /// Anything above 900.
    Above900,
}

impl PriceBucket {
    /// Every bucket, in display order.
    pub const ALL: [PriceBucket; 10] = [
        PriceBucket::UpTo100,
        PriceBucket::UpTo200,
        PriceBucket::UpTo300,
        PriceBucket::UpTo400,
        PriceBucket::UpTo500,
        PriceBucket::UpTo600,
        PriceBucket::UpTo700,
        PriceBucket::UpTo800,
        PriceBucket::UpTo900,
        PriceBucket::Above900,
    ];

    /// The label used as the key in chart output.
    pub fn label(self) -> &'static str {
        match self {
            PriceBucket::UpTo100 => "0-100",
            PriceBucket::UpTo200 => "101-200",
            PriceBucket::UpTo300 => "201-300",
            PriceBucket::UpTo400 => "301-400",
            PriceBucket::UpTo500 => "401-500",
            PriceBucket::UpTo600 => "501-600",
            PriceBucket::UpTo700 => "601-700",
            PriceBucket::UpTo800 => "701-800",
            PriceBucket::UpTo900 => "801-900",
            PriceBucket::Above900 => "901-above",
        }
    }

    /// The inclusive upper bound, `None` for the open ended last bucket.
    pub fn upper_bound(self) -> Option<f64> {
        match self {
            PriceBucket::UpTo100 => Some(100.0),
            PriceBucket::UpTo200 => Some(200.0),
            PriceBucket::UpTo300 => Some(300.0),
            PriceBucket::UpTo400 => Some(400.0),
            PriceBucket::UpTo500 => Some(500.0),
            PriceBucket::UpTo600 => Some(600.0),
            PriceBucket::UpTo700 => Some(700.0),
            PriceBucket::UpTo800 => Some(800.0),
            PriceBucket::UpTo900 => Some(900.0),
            PriceBucket::Above900 => None,
        }
    }

    /// The first bucket whose upper bound is at least `price`.
    pub fn classify(price: f64) -> Self {
        Self::ALL
            .into_iter()
            .find(|bucket| bucket.upper_bound().is_none_or(|bound| price <= bound))
            .unwrap_or(PriceBucket::Above900)
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// The number of transactions in each [PriceBucket].
///
/// Every bucket is always present, and serializes as a JSON object whose
/// keys follow [PriceBucket::ALL] order rather than alphabetical order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PriceHistogram {
    counts: [u64; 10],
}

impl PriceHistogram {
    /// Add one transaction with `price`.
    pub fn record(&mut self, price: f64) {
        self.counts[PriceBucket::classify(price).index()] += 1;
    }

    /// The count for `bucket`.
    pub fn count(&self, bucket: PriceBucket) -> u64 {
        self.counts[bucket.index()]
    }

    /// The buckets and their counts in display order.
    pub fn iter(&self) -> impl Iterator<Item = (PriceBucket, u64)> + '_ {
        PriceBucket::ALL
            .into_iter()
            .map(|bucket| (bucket, self.count(bucket)))
    }

    /// The sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

impl Serialize for PriceHistogram {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(PriceBucket::ALL.len()))?;
        for (bucket, count) in self.iter() {
            map.serialize_entry(bucket.label(), &count)?;
        }
        map.end()
    }
}

/// Count the transactions matching `month` in each price bucket.
pub fn compute_price_histogram(transactions: &[Transaction], month: &str) -> PriceHistogram {
    let mut histogram = PriceHistogram::default();

    for transaction in match_month_by_substring(transactions, month) {
        histogram.record(transaction.price);
    }

    histogram
}
