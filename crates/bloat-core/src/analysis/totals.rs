use crate::resource::ResourceRecord;
use serde::Serialize;

/// Name of the bucket every record is counted in
pub const TOTAL: &str = "Total";

/// Running byte sums plus the largest record seen so far
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ByteTotals {
    pub count: usize,
    pub encoded_bytes: u64,
    pub decoded_bytes: u64,
    pub largest: Option<ResourceRecord>,
}

impl ByteTotals {
    /// Accumulate a record; `largest` moves only on strictly more encoded bytes
    pub fn add(&mut self, record: &ResourceRecord) {
        self.count += 1;
        self.encoded_bytes = self.encoded_bytes.saturating_add(record.encoded_bytes);
        self.decoded_bytes = self.decoded_bytes.saturating_add(record.decoded_bytes);

        let is_larger = self
            .largest
            .as_ref()
            .is_none_or(|current| record.encoded_bytes > current.encoded_bytes);
        if is_larger {
            self.largest = Some(record.clone());
        }
    }

    /// Share of `whole`, in percent rounded to two decimals
    pub fn percent_of(&self, whole: &ByteTotals) -> Percentages {
        Percentages {
            encoded: percentage(self.encoded_bytes, whole.encoded_bytes),
            decoded: percentage(self.decoded_bytes, whole.decoded_bytes),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Percentages {
    pub encoded: f64,
    pub decoded: f64,
}

/// Byte totals for one named bucket
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotals {
    pub name: String,
    #[serde(flatten)]
    pub totals: ByteTotals,
}

impl CategoryTotals {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            totals: ByteTotals::default(),
        }
    }

    pub fn add(&mut self, record: &ResourceRecord) {
        self.totals.add(record);
    }

    pub fn count(&self) -> usize {
        self.totals.count
    }

    pub fn encoded_bytes(&self) -> u64 {
        self.totals.encoded_bytes
    }

    pub fn decoded_bytes(&self) -> u64 {
        self.totals.decoded_bytes
    }

    pub fn largest(&self) -> Option<&ResourceRecord> {
        self.totals.largest.as_ref()
    }

    pub fn percent_of(&self, whole: &CategoryTotals) -> Percentages {
        self.totals.percent_of(&whole.totals)
    }
}

fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    // Round to hundredths in integers so exact halves round away from zero
    let whole = u128::from(whole);
    let hundredths = (u128::from(part) * 20_000 + whole) / (2 * whole);
    hundredths as f64 / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(url: &str, encoded: u64) -> ResourceRecord {
        ResourceRecord::new(url, "text/javascript", encoded, encoded * 3)
    }

    #[test]
    fn test_first_largest_wins_ties() {
        let mut totals = CategoryTotals::new("JavaScript");
        totals.add(&record("https://a.test/10.js", 10));
        totals.add(&record("https://a.test/50-first.js", 50));
        totals.add(&record("https://a.test/50-second.js", 50));
        totals.add(&record("https://a.test/30.js", 30));

        assert_eq!(totals.encoded_bytes(), 140);
        assert_eq!(totals.decoded_bytes(), 420);
        assert_eq!(totals.count(), 4);
        assert_eq!(totals.largest().unwrap().url, "https://a.test/50-first.js");
    }

    #[test]
    fn test_zero_byte_record_becomes_first_largest() {
        let mut totals = ByteTotals::default();
        totals.add(&record("https://a.test/empty.js", 0));
        assert_eq!(totals.largest.as_ref().unwrap().url, "https://a.test/empty.js");
    }

    #[test]
    fn test_percent_of_rounds_to_two_decimals() {
        let part = ByteTotals {
            encoded_bytes: 50,
            decoded_bytes: 1,
            ..Default::default()
        };
        let whole = ByteTotals {
            encoded_bytes: 200,
            decoded_bytes: 3,
            ..Default::default()
        };

        let percent = part.percent_of(&whole);
        assert_eq!(percent.encoded, 25.00);
        assert_eq!(percent.decoded, 33.33);
    }

    #[test]
    fn test_percent_rounds_half_up() {
        // 3.125 is exact in binary
        assert_eq!(percentage(1, 32), 3.13);
        assert_eq!(percentage(2, 3), 66.67);
    }

    #[test]
    fn test_percent_half_not_representable_in_binary() {
        // 1.005 as a float sits just below the half
        assert_eq!(percentage(201, 20000), 1.01);
        assert_eq!(percentage(1, 800), 0.13);
        assert_eq!(percentage(3000, 7000), 42.86);
    }

    #[test]
    fn test_percent_of_empty_whole_is_zero() {
        let empty = ByteTotals::default();
        let percent = empty.percent_of(&ByteTotals::default());
        assert_eq!(percent.encoded, 0.0);
        assert_eq!(percent.decoded, 0.0);
    }
}
