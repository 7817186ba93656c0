//! Statistics Accumulator

use std::collections::BTreeMap;
use std::sync::{Mutex, OnceLock};

/// Return the global statistics accumulator.
pub fn stats_accumulator() -> &'static Mutex<StatsAccumulator> {
    static DATA: OnceLock<Mutex<StatsAccumulator>> = OnceLock::new();
    DATA.get_or_init(|| Mutex::new(StatsAccumulator::default()))
}

/// Integer distribution statistic.
#[derive(Default, Clone, Copy, Debug)]
pub struct StatsDistribution {
    /// Sum of all values.
    sum: i64,

    /// Count of all values.
    count: u64,

    /// Minimum value.
    min: Option<i64>,

    /// Maximum value.
    max: Option<i64>,
}

impl StatsDistribution {
    /// Report a sample value.
    ///
    /// * `val`  - Sample value.
    pub fn report(&mut self, val: i64) {
        self.sum += val;
        self.count += 1;
        self.min = Some(self.min.map_or(val, |m| m.min(val)));
        self.max = Some(self.max.map_or(val, |m| m.max(val)));
    }

    /// Merge another distribution into this one.
    ///
    /// * `other` - The other distribution.
    pub fn accumulate(&mut self, other: &Self) {
        self.sum += other.sum;
        self.count += other.count;
        self.min = match (self.min, other.min) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        self.max = match (self.max, other.max) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
    }

    /// Returns the number of samples reported.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Returns the average of reported values.
    pub fn average(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum as f64 / self.count as f64
        }
    }

    /// Clear stats.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Aggregate different types of statistics.
#[derive(Default)]
pub struct StatsAccumulator {
    /// Counters.
    counters: BTreeMap<String, i64>,

    /// Memory counters.
    memory_counters: BTreeMap<String, u64>,

    /// Integer distributions.
    int_distributions: BTreeMap<String, StatsDistribution>,

    /// Percentages.
    percentages: BTreeMap<String, (i64, i64)>,
}

impl StatsAccumulator {
    /// Accumulates a counter value.
    ///
    /// * `name` - Statistic name.
    /// * `val`  - Counter value.
    pub fn report_counter(&mut self, name: &str, val: i64) {
        *self.counters.entry(name.to_string()).or_insert(0) += val;
    }

    /// Accumulates a memory counter value.
    ///
    /// * `name` - Statistic name.
    /// * `val`  - Memory counter value.
    pub fn report_memory_counter(&mut self, name: &str, val: u64) {
        *self.memory_counters.entry(name.to_string()).or_insert(0) += val;
    }

    /// Accumulates integer distribution samples.
    ///
    /// * `name`    - Statistic name.
    /// * `distrib` - Distribution.
    pub fn report_int_distribution(&mut self, name: &str, distrib: &StatsDistribution) {
        self.int_distributions
            .entry(name.to_string())
            .or_default()
            .accumulate(distrib);
    }

    /// Accumulates a percentage value.
    ///
    /// * `name`  - Statistic name.
    /// * `num`   - Numerator (actual count).
    /// * `denom` - Denominator (total count).
    pub fn report_percentage(&mut self, name: &str, num: i64, denom: i64) {
        let v = self.percentages.entry(name.to_string()).or_insert((0, 0));
        v.0 += num;
        v.1 += denom;
    }

    /// Returns an accumulated counter value.
    ///
    /// * `name` - Statistic name.
    pub fn counter(&self, name: &str) -> i64 {
        self.counters.get(name).copied().unwrap_or(0)
    }

    /// Returns an accumulated percentage as (numerator, denominator).
    ///
    /// * `name` - Statistic name.
    pub fn percentage(&self, name: &str) -> (i64, i64) {
        self.percentages.get(name).copied().unwrap_or((0, 0))
    }

    /// Prints the report grouped by category.
    pub fn print(&self) {
        let mut to_print: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for (k, v) in self.counters.iter().filter(|(_, v)| **v != 0) {
            let (category, title) = get_category_and_title(k);
            to_print
                .entry(category)
                .or_default()
                .push(format!("{title:-42}               {v:12}"));
        }

        for (k, v) in self.memory_counters.iter().filter(|(_, v)| **v != 0) {
            let (category, title) = get_category_and_title(k);
            let kb = *v as f64 / 1024.0;
            let s = if kb < 1024.0 {
                format!("{title:-42}                  {kb:9.2} kB")
            } else if kb < 1024.0 * 1024.0 {
                format!("{title:-42}                  {:9.2} MiB", kb / 1024.0)
            } else {
                format!("{title:-42}                  {:9.2} GiB", kb / (1024.0 * 1024.0))
            };
            to_print.entry(category).or_default().push(s);
        }

        for (k, v) in self.int_distributions.iter().filter(|(_, v)| v.count > 0) {
            let (category, title) = get_category_and_title(k);
            let mn = v.min.unwrap_or(i64::MAX);
            let mx = v.max.unwrap_or(i64::MIN);
            let s = format!("{title:-42}                      {:.3} avg [range {mn} - {mx}]", v.average());
            to_print.entry(category).or_default().push(s);
        }

        for (k, &(num, denom)) in self.percentages.iter().filter(|(_, v)| v.1 != 0) {
            let (category, title) = get_category_and_title(k);
            let s = format!(
                "{title:-42}{num:12} / {denom:12} ({:.2}%)",
                (100.0 * num as f64) / denom as f64,
            );
            to_print.entry(category).or_default().push(s);
        }

        println!("Statistics:");
        for (category, items) in to_print {
            println!("  {category}");
            for item in items {
                println!("    {item}");
            }
        }
    }

    /// Clear the accumulated statistics.
    pub fn clear(&mut self) {
        self.counters.clear();
        self.memory_counters.clear();
        self.int_distributions.clear();
        self.percentages.clear();
    }
}

/// Splits a statistic name at the first `/` and returns category and title.
/// If there is no `/`, then category is the empty string.
///
/// * `s` - The statistic name to split.
fn get_category_and_title(s: &str) -> (String, String) {
    match s.split_once('/') {
        Some((category, title)) => (category.to_string(), title.to_string()),
        None => (String::new(), s.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distribution_tracks_range() {
        let mut d = StatsDistribution::default();
        d.report(3);
        d.report(7);
        let mut e = StatsDistribution::default();
        e.report(1);
        d.accumulate(&e);
        assert_eq!(d.count(), 3);
        assert_eq!(d.min, Some(1));
        assert_eq!(d.max, Some(7));
        assert!((d.average() - 11.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn categories_split_at_first_slash() {
        assert_eq!(
            get_category_and_title("Integrator/Path length"),
            ("Integrator".to_string(), "Path length".to_string())
        );
        assert_eq!(get_category_and_title("plain"), (String::new(), "plain".to_string()));
    }

    #[test]
    fn counters_and_percentages_accumulate() {
        let mut accum = StatsAccumulator::default();
        accum.report_counter("A/b", 2);
        accum.report_counter("A/b", 3);
        accum.report_percentage("A/p", 1, 4);
        accum.report_percentage("A/p", 1, 4);
        assert_eq!(accum.counter("A/b"), 5);
        assert_eq!(accum.percentage("A/p"), (2, 8));
    }
}
