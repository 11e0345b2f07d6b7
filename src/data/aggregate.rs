use std::collections::BTreeMap;

use super::model::{ExperienceLevel, SalaryRecord};

// ---------------------------------------------------------------------------
// Group-by keys
// ---------------------------------------------------------------------------

/// The closed set of fields a view may group records by.  User input selects
/// one of these variants at the boundary; the accessor below does the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey {
    WorkYear,
    JobTitle,
    Experience,
    Employment,
    CompanySize,
    RemoteMode,
    CompanyLocation,
    EmployeeResidence,
}

impl GroupKey {
    pub fn label(self) -> &'static str {
        match self {
            GroupKey::WorkYear => "Work Year",
            GroupKey::JobTitle => "Job Title",
            GroupKey::Experience => "Experience Level",
            GroupKey::Employment => "Employment Type",
            GroupKey::CompanySize => "Company Size",
            GroupKey::RemoteMode => "Remote Type",
            GroupKey::CompanyLocation => "Company Location",
            GroupKey::EmployeeResidence => "Employee Residence",
        }
    }

    /// The record's value for this key, as a group label.
    pub fn value(self, record: &SalaryRecord) -> String {
        match self {
            GroupKey::WorkYear => record.work_year.to_string(),
            GroupKey::JobTitle => record.job_title.clone(),
            GroupKey::Experience => record.experience.label().to_string(),
            GroupKey::Employment => record.employment.label().to_string(),
            GroupKey::CompanySize => record.company_size.label().to_string(),
            GroupKey::RemoteMode => record.remote_mode.label().to_string(),
            GroupKey::CompanyLocation => record.company_location.clone(),
            GroupKey::EmployeeResidence => record.employee_residence.clone(),
        }
    }
}

/// Aggregation applied to the salary column of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    Mean,
    Median,
    Count,
}

/// Ranking metric for [`top_n`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    MeanSalary,
    MedianSalary,
    Count,
}

// ---------------------------------------------------------------------------
// Basic statistics
// ---------------------------------------------------------------------------

/// Arithmetic mean; `None` on an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median with interpolation of the two middle values; `None` on empty input.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

/// Linearly interpolated percentile over a sorted slice, `p` in `[0, 1]`.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let rank = p * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        let frac = rank - lo as f64;
        sorted[lo] + (sorted[hi] - sorted[lo]) * frac
    }
}

/// (q1, median, q3) of the values; `None` on empty input.
pub fn quartiles(values: &[f64]) -> Option<(f64, f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    Some((
        percentile(&sorted, 0.25),
        percentile(&sorted, 0.5),
        percentile(&sorted, 0.75),
    ))
}

// ---------------------------------------------------------------------------
// Grouped aggregates
// ---------------------------------------------------------------------------

/// Per-group aggregate summary.  `mean`/`median` are `None` when the group
/// has no salary data (rows with an empty salary never count as zero).
#[derive(Debug, Clone, PartialEq)]
pub struct GroupStats {
    pub key: String,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    /// Total rows in the group, including rows without a salary.
    pub count: usize,
}

/// Partition records by key: (salary values present, total row count).
fn grouped<'a, I>(records: I, key: GroupKey) -> BTreeMap<String, (Vec<f64>, usize)>
where
    I: IntoIterator<Item = &'a SalaryRecord>,
{
    let mut groups: BTreeMap<String, (Vec<f64>, usize)> = BTreeMap::new();
    for record in records {
        let entry = groups.entry(key.value(record)).or_default();
        if let Some(salary) = record.salary_in_usd {
            entry.0.push(salary);
        }
        entry.1 += 1;
    }
    groups
}

/// Mean salary per group.  Groups without salary data are absent.
pub fn group_mean<'a, I>(records: I, key: GroupKey) -> BTreeMap<String, f64>
where
    I: IntoIterator<Item = &'a SalaryRecord>,
{
    grouped(records, key)
        .into_iter()
        .filter_map(|(k, (values, _))| mean(&values).map(|m| (k, m)))
        .collect()
}

/// Median salary per group.  Groups without salary data are absent.
pub fn group_median<'a, I>(records: I, key: GroupKey) -> BTreeMap<String, f64>
where
    I: IntoIterator<Item = &'a SalaryRecord>,
{
    grouped(records, key)
        .into_iter()
        .filter_map(|(k, (values, _))| median(&values).map(|m| (k, m)))
        .collect()
}

/// Row count per group (includes rows without a salary).
pub fn group_count<'a, I>(records: I, key: GroupKey) -> BTreeMap<String, usize>
where
    I: IntoIterator<Item = &'a SalaryRecord>,
{
    grouped(records, key)
        .into_iter()
        .map(|(k, (_, count))| (k, count))
        .collect()
}

/// Full per-group summary, ordered by key ascending.
pub fn group_stats<'a, I>(records: I, key: GroupKey) -> Vec<GroupStats>
where
    I: IntoIterator<Item = &'a SalaryRecord>,
{
    grouped(records, key)
        .into_iter()
        .map(|(k, (values, count))| GroupStats {
            key: k,
            mean: mean(&values),
            median: median(&values),
            count,
        })
        .collect()
}

impl Metric {
    fn value_of(self, stats: &GroupStats) -> Option<f64> {
        match self {
            Metric::MeanSalary => stats.mean,
            Metric::MedianSalary => stats.median,
            Metric::Count => Some(stats.count as f64),
        }
    }
}

/// The `n` groups with the highest metric, descending; ties break by key
/// ascending; groups lacking the metric sort last.
pub fn top_n<'a, I>(records: I, key: GroupKey, metric: Metric, n: usize) -> Vec<GroupStats>
where
    I: IntoIterator<Item = &'a SalaryRecord>,
{
    let mut stats = group_stats(records, key);
    stats.sort_by(|a, b| {
        match (metric.value_of(a), metric.value_of(b)) {
            (Some(x), Some(y)) => y.total_cmp(&x).then_with(|| a.key.cmp(&b.key)),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.key.cmp(&b.key),
        }
    });
    stats.truncate(n);
    stats
}

// ---------------------------------------------------------------------------
// Pivot tables
// ---------------------------------------------------------------------------

/// Two-dimensional cross-tabulation.  Cells for (row, col) combinations with
/// no records, or no salary data under a salary aggregate, are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotTable {
    pub row_key: GroupKey,
    pub col_key: GroupKey,
    pub rows: Vec<String>,
    pub cols: Vec<String>,
    cells: Vec<Vec<Option<f64>>>,
}

impl PivotTable {
    /// Cell by position.
    pub fn cell(&self, row: usize, col: usize) -> Option<f64> {
        self.cells.get(row).and_then(|r| r.get(col)).copied().flatten()
    }

    /// Cell by label.
    pub fn value(&self, row: &str, col: &str) -> Option<f64> {
        let ri = self.rows.iter().position(|r| r == row)?;
        let ci = self.cols.iter().position(|c| c == col)?;
        self.cell(ri, ci)
    }

    /// The table with row and column keys swapped.
    pub fn transpose(&self) -> PivotTable {
        let cells = (0..self.cols.len())
            .map(|c| (0..self.rows.len()).map(|r| self.cells[r][c]).collect())
            .collect();
        PivotTable {
            row_key: self.col_key,
            col_key: self.row_key,
            rows: self.cols.clone(),
            cols: self.rows.clone(),
            cells,
        }
    }

    /// (min, max) over the present cells, `None` when the table is all empty.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let mut range: Option<(f64, f64)> = None;
        for v in self.cells.iter().flatten().flatten() {
            range = Some(match range {
                Some((lo, hi)) => (lo.min(*v), hi.max(*v)),
                None => (*v, *v),
            });
        }
        range
    }
}

impl Aggregate {
    fn apply(self, values: &[f64], count: usize) -> Option<f64> {
        match self {
            Aggregate::Mean => mean(values),
            Aggregate::Median => median(values),
            Aggregate::Count => Some(count as f64),
        }
    }
}

/// Cross-tabulate an aggregate of the salary column over two group keys.
pub fn pivot<'a, I>(records: I, row_key: GroupKey, col_key: GroupKey, agg: Aggregate) -> PivotTable
where
    I: IntoIterator<Item = &'a SalaryRecord>,
{
    let mut groups: BTreeMap<(String, String), (Vec<f64>, usize)> = BTreeMap::new();
    for record in records {
        let entry = groups
            .entry((row_key.value(record), col_key.value(record)))
            .or_default();
        if let Some(salary) = record.salary_in_usd {
            entry.0.push(salary);
        }
        entry.1 += 1;
    }

    let mut rows: Vec<String> = groups.keys().map(|(r, _)| r.clone()).collect();
    rows.dedup();
    let mut cols: Vec<String> = groups.keys().map(|(_, c)| c.clone()).collect();
    cols.sort();
    cols.dedup();

    let cells = rows
        .iter()
        .map(|r| {
            cols.iter()
                .map(|c| {
                    groups
                        .get(&(r.clone(), c.clone()))
                        .and_then(|(values, count)| agg.apply(values, *count))
                })
                .collect()
        })
        .collect();

    PivotTable {
        row_key,
        col_key,
        rows,
        cols,
        cells,
    }
}

// ---------------------------------------------------------------------------
// Substring search
// ---------------------------------------------------------------------------

/// Substring containment; the empty needle matches everything.
pub fn contains_substring(haystack: &str, needle: &str, case_insensitive: bool) -> bool {
    if needle.is_empty() {
        return true;
    }
    if case_insensitive {
        haystack.to_lowercase().contains(&needle.to_lowercase())
    } else {
        haystack.contains(needle)
    }
}

/// Records whose key value contains `query` (case-insensitive).
pub fn search_records<'a, I>(records: I, key: GroupKey, query: &str) -> Vec<&'a SalaryRecord>
where
    I: IntoIterator<Item = &'a SalaryRecord>,
{
    records
        .into_iter()
        .filter(|r| contains_substring(&key.value(r), query, true))
        .collect()
}

/// Group summaries whose key contains `query` (case-insensitive).
pub fn filter_groups(stats: &[GroupStats], query: &str) -> Vec<GroupStats> {
    stats
        .iter()
        .filter(|s| contains_substring(&s.key, query, true))
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// Country drill-down
// ---------------------------------------------------------------------------

/// Which country column a geographic view aggregates over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationField {
    CompanyLocation,
    EmployeeResidence,
}

impl LocationField {
    pub fn value(self, record: &SalaryRecord) -> &str {
        match self {
            LocationField::CompanyLocation => &record.company_location,
            LocationField::EmployeeResidence => &record.employee_residence,
        }
    }

    pub fn group_key(self) -> GroupKey {
        match self {
            LocationField::CompanyLocation => GroupKey::CompanyLocation,
            LocationField::EmployeeResidence => GroupKey::EmployeeResidence,
        }
    }
}

/// Summary of a single country's records for the map page.
#[derive(Debug, Clone, PartialEq)]
pub struct CountrySummary {
    pub records: usize,
    pub mean_salary: Option<f64>,
    pub median_salary: Option<f64>,
    /// Title of the record with the highest salary (first on ties).
    pub top_paid_title: Option<String>,
    /// Most frequent job title (alphabetically first on ties).
    pub common_title: Option<String>,
    /// Most frequent experience level (enum order first on ties).
    pub common_experience: Option<ExperienceLevel>,
}

/// Most frequent value; ties resolve to the smallest per `Ord`.
fn most_common<T: Ord>(values: impl IntoIterator<Item = T>) -> Option<T> {
    let mut counts: BTreeMap<T, usize> = BTreeMap::new();
    for v in values {
        *counts.entry(v).or_default() += 1;
    }
    let mut best: Option<(T, usize)> = None;
    for (value, count) in counts {
        match &best {
            Some((_, best_count)) if count <= *best_count => {}
            _ => best = Some((value, count)),
        }
    }
    best.map(|(value, _)| value)
}

/// Drill-down summary for one alpha-2 country code.
pub fn country_summary<'a, I>(records: I, code: &str, field: LocationField) -> CountrySummary
where
    I: IntoIterator<Item = &'a SalaryRecord>,
{
    let subset: Vec<&SalaryRecord> = records
        .into_iter()
        .filter(|r| field.value(r) == code)
        .collect();

    let salaries: Vec<f64> = subset.iter().filter_map(|r| r.salary_in_usd).collect();

    let top_paid_title = subset
        .iter()
        .filter_map(|r| r.salary_in_usd.map(|s| (s, &r.job_title)))
        .fold(None::<(f64, &String)>, |best, (s, title)| match best {
            Some((bs, _)) if bs >= s => best,
            _ => Some((s, title)),
        })
        .map(|(_, title)| title.clone());

    CountrySummary {
        records: subset.len(),
        mean_salary: mean(&salaries),
        median_salary: median(&salaries),
        top_paid_title,
        common_title: most_common(subset.iter().map(|r| r.job_title.clone())),
        common_experience: most_common(subset.iter().map(|r| r.experience)),
    }
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// Equal-width histogram: (bin center, count) per bin.
pub fn histogram(values: impl IntoIterator<Item = f64>, bins: usize) -> Vec<(f64, usize)> {
    let values: Vec<f64> = values.into_iter().collect();
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let width = (max - min) / bins as f64;
    if width <= 0.0 {
        return vec![(min, values.len())];
    }

    let mut counts = vec![0usize; bins];
    for v in &values {
        let bin = (((v - min) / width) as usize).min(bins - 1);
        counts[bin] += 1;
    }
    counts
        .into_iter()
        .enumerate()
        .map(|(i, c)| (min + (i as f64 + 0.5) * width, c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CompanySize, EmploymentType, RemoteMode};

    fn record(title: &str, salary: Option<f64>) -> SalaryRecord {
        SalaryRecord {
            work_year: 2022,
            job_title: title.to_string(),
            experience: ExperienceLevel::Mid,
            employment: EmploymentType::FullTime,
            salary_in_usd: salary,
            employee_residence: "US".to_string(),
            company_location: "US".to_string(),
            remote_ratio: 0,
            remote_mode: RemoteMode::Onsite,
            company_size: CompanySize::Medium,
        }
    }

    fn sized(title: &str, size: CompanySize, level: ExperienceLevel, salary: f64) -> SalaryRecord {
        SalaryRecord {
            experience: level,
            company_size: size,
            ..record(title, Some(salary))
        }
    }

    #[test]
    fn group_mean_matches_exact_subsets() {
        let records = vec![
            record("A", Some(100.0)),
            record("A", Some(200.0)),
            record("B", Some(300.0)),
        ];
        let means = group_mean(&records, GroupKey::JobTitle);
        assert_eq!(means.get("A"), Some(&150.0));
        assert_eq!(means.get("B"), Some(&300.0));
    }

    #[test]
    fn null_salaries_are_excluded_not_zero() {
        let records = vec![
            record("A", Some(100.0)),
            record("A", None),
            record("B", None),
        ];
        let means = group_mean(&records, GroupKey::JobTitle);
        assert_eq!(means.get("A"), Some(&100.0));
        // all-null group carries no aggregate at all
        assert_eq!(means.get("B"), None);

        // but the row still counts toward cardinality
        let counts = group_count(&records, GroupKey::JobTitle);
        assert_eq!(counts.get("A"), Some(&2));
        assert_eq!(counts.get("B"), Some(&1));
    }

    #[test]
    fn median_interpolates_even_counts() {
        assert_eq!(median(&[1.0, 3.0]), Some(2.0));
        assert_eq!(median(&[1.0, 2.0, 4.0]), Some(2.0));
        assert_eq!(median(&[]), None);
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn top_n_orders_descending_with_key_tiebreak() {
        let records = vec![
            record("A", Some(100.0)),
            record("A", Some(200.0)),
            record("B", Some(300.0)),
            record("C", Some(300.0)),
        ];
        let top = top_n(&records, GroupKey::JobTitle, Metric::MeanSalary, 10);
        let keys: Vec<&str> = top.iter().map(|s| s.key.as_str()).collect();
        // B and C tie on 300 → key ascending
        assert_eq!(keys, vec!["B", "C", "A"]);

        let top1 = top_n(&records, GroupKey::JobTitle, Metric::MeanSalary, 1);
        assert_eq!(top1.len(), 1);
        assert_eq!(top1[0].key, "B");

        // no inversions
        let top = top_n(&records, GroupKey::JobTitle, Metric::MeanSalary, 3);
        for pair in top.windows(2) {
            assert!(pair[0].mean.unwrap() >= pair[1].mean.unwrap());
        }
    }

    #[test]
    fn top_n_by_count_ignores_salary_gaps() {
        let records = vec![
            record("A", None),
            record("A", None),
            record("B", Some(500.0)),
        ];
        let top = top_n(&records, GroupKey::JobTitle, Metric::Count, 1);
        assert_eq!(top[0].key, "A");
        assert_eq!(top[0].count, 2);
    }

    #[test]
    fn pivot_swapping_keys_transposes() {
        let records = vec![
            sized("x", CompanySize::Small, ExperienceLevel::Entry, 50.0),
            sized("x", CompanySize::Small, ExperienceLevel::Senior, 150.0),
            sized("x", CompanySize::Large, ExperienceLevel::Senior, 250.0),
        ];
        let by_size = pivot(
            &records,
            GroupKey::CompanySize,
            GroupKey::Experience,
            Aggregate::Mean,
        );
        let by_level = pivot(
            &records,
            GroupKey::Experience,
            GroupKey::CompanySize,
            Aggregate::Mean,
        );
        assert_eq!(by_size.transpose(), by_level);

        assert_eq!(by_size.value("Small", "Entry"), Some(50.0));
        assert_eq!(by_size.value("Large", "Senior"), Some(250.0));
        // combination absent from the data: None, not zero
        assert_eq!(by_size.value("Large", "Entry"), None);
    }

    #[test]
    fn search_is_idempotent_and_empty_matches_all() {
        let records = vec![
            record("Security Engineer", Some(1.0)),
            record("Security Analyst", Some(2.0)),
            record("Pentester", Some(3.0)),
        ];
        let all = search_records(&records, GroupKey::JobTitle, "");
        assert_eq!(all.len(), 3);

        let hits = search_records(&records, GroupKey::JobTitle, "security");
        assert_eq!(hits.len(), 2);

        let again = search_records(hits.iter().copied(), GroupKey::JobTitle, "security");
        assert_eq!(again.len(), 2);

        let none = search_records(&records, GroupKey::JobTitle, "zzz");
        assert!(none.is_empty());
    }

    #[test]
    fn filter_groups_matches_substrings_case_insensitively() {
        let stats = group_stats(
            &vec![
                record("Security Engineer", Some(1.0)),
                record("Pentester", Some(2.0)),
            ],
            GroupKey::JobTitle,
        );
        assert_eq!(filter_groups(&stats, "ENGIN").len(), 1);
        assert_eq!(filter_groups(&stats, "").len(), 2);
    }

    #[test]
    fn country_summary_drills_down() {
        let mut a = record("Security Engineer", Some(100.0));
        a.company_location = "GB".to_string();
        let mut b = record("CISO", Some(400.0));
        b.company_location = "GB".to_string();
        let mut c = record("Security Engineer", Some(90.0));
        c.company_location = "GB".to_string();
        let d = record("Analyst", Some(70.0)); // US, excluded

        let summary = country_summary(
            &vec![a, b, c, d],
            "GB",
            LocationField::CompanyLocation,
        );
        assert_eq!(summary.records, 3);
        assert_eq!(summary.top_paid_title.as_deref(), Some("CISO"));
        assert_eq!(summary.common_title.as_deref(), Some("Security Engineer"));
        assert_eq!(summary.median_salary, Some(100.0));
    }

    #[test]
    fn empty_country_summary_has_no_data_sentinels() {
        let summary = country_summary(
            &Vec::<SalaryRecord>::new(),
            "GB",
            LocationField::CompanyLocation,
        );
        assert_eq!(summary.records, 0);
        assert_eq!(summary.mean_salary, None);
        assert_eq!(summary.top_paid_title, None);
    }

    #[test]
    fn histogram_covers_all_values() {
        let bins = histogram([0.0, 1.0, 2.0, 3.0, 10.0], 5);
        assert_eq!(bins.len(), 5);
        assert_eq!(bins.iter().map(|(_, c)| c).sum::<usize>(), 5);

        // degenerate single-value input collapses to one bin
        let flat = histogram([5.0, 5.0], 4);
        assert_eq!(flat, vec![(5.0, 2)]);
        assert!(histogram(std::iter::empty(), 4).is_empty());
    }
}
