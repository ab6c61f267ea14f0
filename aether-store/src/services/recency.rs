//! Recency grouping
//!
//! Partitions timestamped items into the fixed age buckets shown by the
//! search screen: Today, This week, This month and Older.

use crate::config::{MONTH_MAX_AGE_DAYS, MS_PER_DAY, TODAY_MAX_AGE_DAYS, WEEK_MAX_AGE_DAYS};
use crate::database::{Note, SearchResult, Todo};
use serde::Serialize;

/// Anything carrying a creation timestamp in epoch milliseconds
pub trait Timestamped {
    fn created_at(&self) -> i64;
}

impl Timestamped for Note {
    fn created_at(&self) -> i64 {
        self.created_at
    }
}

impl Timestamped for Todo {
    fn created_at(&self) -> i64 {
        self.created_at
    }
}

impl Timestamped for SearchResult {
    fn created_at(&self) -> i64 {
        self.created_at
    }
}

/// Named age range, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum RecencyBucket {
    #[serde(rename = "Today")]
    Today,
    #[serde(rename = "This week")]
    ThisWeek,
    #[serde(rename = "This month")]
    ThisMonth,
    #[serde(rename = "Older")]
    Older,
}

impl RecencyBucket {
    pub const ALL: [RecencyBucket; 4] = [
        RecencyBucket::Today,
        RecencyBucket::ThisWeek,
        RecencyBucket::ThisMonth,
        RecencyBucket::Older,
    ];

    /// Bucket for an item of the given age. Negative ages (clock skew,
    /// items dated in the future) count as Today.
    pub fn for_age(age_ms: i64) -> Self {
        if age_ms < TODAY_MAX_AGE_DAYS * MS_PER_DAY {
            RecencyBucket::Today
        } else if age_ms < WEEK_MAX_AGE_DAYS * MS_PER_DAY {
            RecencyBucket::ThisWeek
        } else if age_ms < MONTH_MAX_AGE_DAYS * MS_PER_DAY {
            RecencyBucket::ThisMonth
        } else {
            RecencyBucket::Older
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RecencyBucket::Today => "Today",
            RecencyBucket::ThisWeek => "This week",
            RecencyBucket::ThisMonth => "This month",
            RecencyBucket::Older => "Older",
        }
    }
}

/// A non-empty bucket and its members
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecencyGroup<T> {
    pub bucket: RecencyBucket,
    pub items: Vec<T>,
}

/// Group items by age relative to `now` (epoch ms).
///
/// Empty buckets are omitted and the rest come back in display order.
/// Items keep their input order within a bucket.
pub fn group_by_recency<T, I>(now: i64, items: I) -> Vec<RecencyGroup<T>>
where
    T: Timestamped,
    I: IntoIterator<Item = T>,
{
    let mut buckets: [Vec<T>; 4] = Default::default();

    for item in items {
        let bucket = RecencyBucket::for_age(now - item.created_at());
        buckets[bucket as usize].push(item);
    }

    RecencyBucket::ALL
        .into_iter()
        .zip(buckets)
        .filter(|(_, items)| !items.is_empty())
        .map(|(bucket, items)| RecencyGroup { bucket, items })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item(&'static str, i64);

    impl Timestamped for Item {
        fn created_at(&self) -> i64 {
            self.1
        }
    }

    const NOW: i64 = 1_700_000_000_000;

    fn days_ago(days: f64) -> i64 {
        NOW - (days * MS_PER_DAY as f64) as i64
    }

    #[test]
    fn test_four_buckets_in_order() {
        let items = vec![
            Item("old", days_ago(40.0)),
            Item("month", days_ago(20.0)),
            Item("today", days_ago(0.5)),
            Item("week", days_ago(3.0)),
        ];

        let groups = group_by_recency(NOW, items);

        let buckets: Vec<RecencyBucket> = groups.iter().map(|g| g.bucket).collect();
        assert_eq!(buckets, RecencyBucket::ALL.to_vec());
        assert!(groups.iter().all(|g| g.items.len() == 1));
        assert_eq!(groups[0].items[0].0, "today");
        assert_eq!(groups[1].items[0].0, "week");
        assert_eq!(groups[2].items[0].0, "month");
        assert_eq!(groups[3].items[0].0, "old");
    }

    #[test]
    fn test_empty_buckets_omitted() {
        let items = vec![Item("a", days_ago(45.0)), Item("b", days_ago(0.1))];

        let groups = group_by_recency(NOW, items);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].bucket, RecencyBucket::Today);
        assert_eq!(groups[1].bucket, RecencyBucket::Older);
    }

    #[test]
    fn test_input_order_kept_within_bucket() {
        let items = vec![Item("first", days_ago(2.0)), Item("second", days_ago(5.0))];

        let groups = group_by_recency(NOW, items);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].items, vec![Item("first", days_ago(2.0)), Item("second", days_ago(5.0))]);
    }

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(RecencyBucket::for_age(MS_PER_DAY - 1), RecencyBucket::Today);
        assert_eq!(RecencyBucket::for_age(MS_PER_DAY), RecencyBucket::ThisWeek);
        assert_eq!(RecencyBucket::for_age(7 * MS_PER_DAY), RecencyBucket::ThisMonth);
        assert_eq!(RecencyBucket::for_age(30 * MS_PER_DAY), RecencyBucket::Older);
        assert_eq!(RecencyBucket::for_age(-5_000), RecencyBucket::Today);
    }

    #[test]
    fn test_empty_input() {
        let groups = group_by_recency::<Item, _>(NOW, Vec::new());
        assert!(groups.is_empty());
    }

    #[test]
    fn test_bucket_serializes_as_label() {
        let json = serde_json::to_string(&RecencyBucket::ThisWeek).unwrap();
        assert_eq!(json, format!("\"{}\"", RecencyBucket::ThisWeek.label()));
    }
}
