use std::collections::BTreeSet;

use super::model::{
    CompanySize, EmploymentType, ExperienceLevel, RemoteMode, SalaryDataset, SalaryRecord,
};

// ---------------------------------------------------------------------------
// Filter predicate: which values are selected per field
// ---------------------------------------------------------------------------

/// Per-field selection state for the record-level filters in the side panel.
///
/// Semantics per field:
/// * every value selected → no constraint
/// * empty set → nothing selected → hide every record
/// * otherwise a record passes when its value is in the set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub years: BTreeSet<i32>,
    pub experience: BTreeSet<ExperienceLevel>,
    pub employment: BTreeSet<EmploymentType>,
    pub company_size: BTreeSet<CompanySize>,
    pub remote_mode: BTreeSet<RemoteMode>,
}

/// Initialise a [`FilterState`] with all values selected (i.e., show everything).
pub fn init_filter_state(dataset: &SalaryDataset) -> FilterState {
    FilterState {
        years: dataset.years.iter().copied().collect(),
        experience: ExperienceLevel::ALL.into_iter().collect(),
        employment: EmploymentType::ALL.into_iter().collect(),
        company_size: CompanySize::ALL.into_iter().collect(),
        remote_mode: RemoteMode::ALL.into_iter().collect(),
    }
}

fn passes(record: &SalaryRecord, filters: &FilterState) -> bool {
    filters.years.contains(&record.work_year)
        && filters.experience.contains(&record.experience)
        && filters.employment.contains(&record.employment)
        && filters.company_size.contains(&record.company_size)
        && filters.remote_mode.contains(&record.remote_mode)
}

/// Return indices of records that pass all active filters.
pub fn filtered_indices(dataset: &SalaryDataset, filters: &FilterState) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, r)| passes(r, filters))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> SalaryDataset {
        let base = SalaryRecord {
            work_year: 2022,
            job_title: "Security Engineer".to_string(),
            experience: ExperienceLevel::Senior,
            employment: EmploymentType::FullTime,
            salary_in_usd: Some(120_000.0),
            employee_residence: "US".to_string(),
            company_location: "US".to_string(),
            remote_ratio: 100,
            remote_mode: RemoteMode::Remote,
            company_size: CompanySize::Medium,
        };
        let mut other = base.clone();
        other.work_year = 2020;
        other.experience = ExperienceLevel::Entry;
        other.remote_ratio = 0;
        other.remote_mode = RemoteMode::Onsite;
        SalaryDataset::from_records(vec![base, other])
    }

    #[test]
    fn full_selection_shows_everything() {
        let ds = dataset();
        let filters = init_filter_state(&ds);
        assert_eq!(filtered_indices(&ds, &filters), vec![0, 1]);
    }

    #[test]
    fn empty_selection_hides_everything() {
        let ds = dataset();
        let mut filters = init_filter_state(&ds);
        filters.remote_mode.clear();
        assert!(filtered_indices(&ds, &filters).is_empty());
    }

    #[test]
    fn partial_selection_filters_records() {
        let ds = dataset();
        let mut filters = init_filter_state(&ds);
        filters.experience.remove(&ExperienceLevel::Entry);
        assert_eq!(filtered_indices(&ds, &filters), vec![0]);

        let mut filters = init_filter_state(&ds);
        filters.years.remove(&2022);
        assert_eq!(filtered_indices(&ds, &filters), vec![1]);
    }
}
