use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

use crate::{
    core::record::{ReportRecord, ReportTable},
    quantity::energy::MegawattHours,
};

const WEEK: TimeDelta = TimeDelta::weeks(1);

/// Monday-to-Sunday week boundaries.
///
/// Weeks are `[Monday 00:00, next Monday 00:00)`, counted from the Monday on or before
/// the earliest timestamp.
#[must_use]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Weeks {
    anchor: NaiveDateTime,
}

impl Weeks {
    pub fn anchored_at(first: NaiveDateTime) -> Self {
        let date = first.date();
        let monday = date - TimeDelta::days(i64::from(date.weekday().num_days_from_monday()));
        Self { anchor: monday.and_time(NaiveTime::MIN) }
    }

    /// Anchor the weeks at the earliest record across all the tables.
    ///
    /// Returns [`None`] when all the tables are empty.
    pub fn spanning<'a>(tables: impl IntoIterator<Item = &'a ReportTable>) -> Option<Self> {
        tables
            .into_iter()
            .filter_map(ReportTable::time_span)
            .map(|span| *span.start())
            .min()
            .map(Self::anchored_at)
    }

    #[must_use]
    pub fn start_of(self, timestamp: NaiveDateTime) -> NaiveDate {
        let n_weeks = (timestamp - self.anchor).num_seconds().div_euclid(WEEK.num_seconds());
        (self.anchor + TimeDelta::weeks(n_weeks)).date()
    }
}

/// Energy per resource per week.
#[must_use]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WeeklyBucket(BTreeMap<(String, NaiveDate), MegawattHours>);

impl WeeklyBucket {
    pub fn aggregate(table: &ReportTable, weeks: Weeks) -> Self {
        table
            .records()
            .iter()
            .map(|record| {
                (record.resource_id.clone(), weeks.start_of(record.timestamp), record.energy())
            })
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn get(&self, resource_id: &str, week_start: NaiveDate) -> Option<MegawattHours> {
        self.0.get(&(resource_id.to_owned(), week_start)).copied()
    }

    /// Iterate over `(resource_id, week_start, energy)` ordered by resource and week.
    pub fn iter(&self) -> impl Iterator<Item = (&str, NaiveDate, MegawattHours)> {
        self.0
            .iter()
            .map(|((resource_id, week_start), energy)| (resource_id.as_str(), *week_start, *energy))
    }

    pub fn total(&self) -> MegawattHours {
        self.0.values().copied().sum()
    }

    /// Weekly energy summed across the resources.
    #[must_use]
    pub fn totals_by_week(&self) -> BTreeMap<NaiveDate, MegawattHours> {
        let mut totals = BTreeMap::<NaiveDate, MegawattHours>::new();
        for (_, week_start, energy) in self.iter() {
            *totals.entry(week_start).or_default() += energy;
        }
        totals
    }
}

impl<R: Into<String>> FromIterator<(R, NaiveDate, MegawattHours)> for WeeklyBucket {
    fn from_iter<T: IntoIterator<Item = (R, NaiveDate, MegawattHours)>>(iter: T) -> Self {
        let mut bucket = BTreeMap::<(String, NaiveDate), MegawattHours>::new();
        for (resource_id, week_start, energy) in iter {
            *bucket.entry((resource_id.into(), week_start)).or_default() += energy;
        }
        Self(bucket)
    }
}

/// Split the table into weekly tables, keeping the record order within each week.
#[must_use]
pub fn split_weekly(table: &ReportTable, weeks: Weeks) -> BTreeMap<NaiveDate, ReportTable> {
    let mut split = BTreeMap::<NaiveDate, ReportTable>::new();
    for record in table.records() {
        split
            .entry(weeks.start_of(record.timestamp))
            .or_insert_with(|| ReportTable::empty(table.kind))
            .push(ReportRecord::clone(record));
    }
    split
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::Weekday;
    use itertools::Itertools;

    use super::*;
    use crate::{
        core::record::{ReportKind, tests::at},
        quantity::power::Megawatts,
    };

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, day).unwrap()
    }

    /// Half-hourly table from Monday, June 3 through Wednesday, June 19.
    fn table() -> ReportTable {
        let start = at(3, 0, 0);
        let records = (0..(17 * 48))
            .flat_map(|i| {
                let timestamp = start + TimeDelta::minutes(30 * i);
                #[expect(clippy::cast_precision_loss)]
                let value = (i % 7) as f64 + 0.25;
                [
                    ReportRecord::new(timestamp, Megawatts(value), "DSU_401400"),
                    ReportRecord::new(timestamp, Megawatts(value * 2.0), "DSU_503460"),
                ]
            })
            .collect();
        ReportTable::new(ReportKind::Forecast, records)
    }

    #[test]
    fn anchored_at_monday() {
        let weeks = Weeks::anchored_at(at(5, 13, 30));
        assert_eq!(weeks, Weeks::anchored_at(at(3, 0, 0)));
        assert_eq!(weeks.start_of(at(5, 0, 0)), date(6, 3));
        assert_eq!(weeks.start_of(at(9, 23, 30)), date(6, 3));
        assert_eq!(weeks.start_of(at(10, 0, 0)), date(6, 10));
        assert_eq!(weeks.start_of(at(2, 23, 30)), date(5, 27));
    }

    #[test]
    fn mid_week_start_gives_monday_weeks() {
        let table = ReportTable::new(
            ReportKind::Forecast,
            vec![
                ReportRecord::new(at(5, 12, 0), Megawatts(2.0), "A"),
                ReportRecord::new(at(10, 0, 0), Megawatts(4.0), "A"),
            ],
        );
        let weeks = Weeks::spanning([&table]).unwrap();
        let bucket = WeeklyBucket::aggregate(&table, weeks);
        let week_starts = bucket.iter().map(|(_, week_start, _)| week_start).collect_vec();
        assert_eq!(week_starts, [date(6, 3), date(6, 10)]);
        assert!(week_starts.iter().all(|week_start| week_start.weekday() == Weekday::Mon));
        let split = split_weekly(&table, weeks);
        assert!(split.keys().all(|week_start| week_start.weekday() == Weekday::Mon));
    }

    #[test]
    fn monday_start_gives_monday_weeks() {
        let table = table();
        let weeks = Weeks::spanning([&table]).unwrap();
        let split = split_weekly(&table, weeks);
        assert_eq!(split.keys().copied().collect_vec(), [date(6, 3), date(6, 10), date(6, 17)]);
        assert!(split.keys().all(|week_start| week_start.weekday() == Weekday::Mon));
        assert_eq!(split[&date(6, 3)].len(), 7 * 48 * 2);
        assert_eq!(split[&date(6, 17)].len(), 3 * 48 * 2);
    }

    #[test]
    fn spanning_takes_earliest_table() {
        let late = ReportTable::new(
            ReportKind::Forecast,
            vec![ReportRecord::new(at(5, 1, 0), Megawatts(1.0), "A")],
        );
        let early = ReportTable::new(
            ReportKind::Outturn,
            vec![ReportRecord::new(at(2, 23, 30), Megawatts(1.0), "A")],
        );
        let weeks = Weeks::spanning([&late, &early]).unwrap();
        assert_eq!(weeks, Weeks::anchored_at(at(2, 23, 30)));
        assert_eq!(weeks.start_of(at(2, 23, 30)), date(5, 27));
        assert_eq!(weeks.start_of(at(5, 1, 0)), date(6, 3));
        assert!(Weeks::spanning([&ReportTable::empty(ReportKind::Forecast)]).is_none());
    }

    #[test]
    fn aggregation_conserves_energy() {
        let table = table();
        let weeks = Weeks::spanning([&table]).unwrap();
        let bucket = WeeklyBucket::aggregate(&table, weeks);
        let raw: f64 = table.records().iter().map(|record| record.availability.0 * 0.5).sum();
        assert_abs_diff_eq!(bucket.total().0, raw, epsilon = 1e-6);
        assert_eq!(bucket.len(), 2 * 3);
        let weekly_total: f64 = bucket.totals_by_week().values().map(|energy| energy.0).sum();
        assert_abs_diff_eq!(weekly_total, raw, epsilon = 1e-6);
    }

    #[test]
    fn aggregation_sums_per_resource_and_week() {
        let table = ReportTable::new(
            ReportKind::Outturn,
            vec![
                ReportRecord::new(at(3, 0, 0), Megawatts(2.0), "A"),
                ReportRecord::new(at(3, 0, 30), Megawatts(4.0), "A"),
                ReportRecord::new(at(3, 0, 30), Megawatts(1.0), "B"),
                ReportRecord::new(at(10, 0, 0), Megawatts(6.0), "A"),
            ],
        );
        let bucket = WeeklyBucket::aggregate(&table, Weeks::anchored_at(at(3, 0, 0)));
        assert_eq!(bucket.get("A", date(6, 3)), Some(MegawattHours(3.0)));
        assert_eq!(bucket.get("B", date(6, 3)), Some(MegawattHours(0.5)));
        assert_eq!(bucket.get("A", date(6, 10)), Some(MegawattHours(3.0)));
        assert_eq!(bucket.get("B", date(6, 10)), None);
        assert_eq!(
            bucket.totals_by_week().into_iter().collect_vec(),
            [(date(6, 3), MegawattHours(3.5)), (date(6, 10), MegawattHours(3.0))],
        );
    }

    #[test]
    fn empty_table_gives_empty_bucket() {
        let table = ReportTable::empty(ReportKind::Forecast);
        let bucket = WeeklyBucket::aggregate(&table, Weeks::anchored_at(at(3, 0, 0)));
        assert!(bucket.is_empty());
        assert_eq!(bucket.total(), MegawattHours::ZERO);
        assert!(split_weekly(&table, Weeks::anchored_at(at(3, 0, 0))).is_empty());
    }

    #[test]
    fn split_keeps_record_order() {
        let table = ReportTable::new(
            ReportKind::Outturn,
            vec![
                ReportRecord::new(at(4, 0, 0), Megawatts(1.0), "A"),
                ReportRecord::new(at(11, 0, 0), Megawatts(2.0), "A"),
                ReportRecord::new(at(3, 0, 0), Megawatts(3.0), "A"),
            ],
        );
        let split = split_weekly(&table, Weeks::anchored_at(at(3, 0, 0)));
        let first_week = split[&date(6, 3)].records().iter().map(|record| record.availability.0);
        assert_eq!(first_week.collect_vec(), [1.0, 3.0]);
    }
}
