use crate::data::aggregate::{Aggregate, GroupKey, Metric};
use crate::data::filter::{FilterState, filtered_indices, init_filter_state};
use crate::data::model::{SalaryDataset, SalaryRecord};
use crate::data::predict::{self, FeatureInput, SalaryModel};
use crate::geo::{MapMetric, Region};

// ---------------------------------------------------------------------------
// Page navigation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Overview,
    Descriptive,
    Map,
    Predictor,
    About,
}

impl Page {
    pub const ALL: [Page; 5] = [
        Page::Overview,
        Page::Descriptive,
        Page::Map,
        Page::Predictor,
        Page::About,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Page::Overview => "Overview",
            Page::Descriptive => "Salary Descriptive",
            Page::Map => "World Map",
            Page::Predictor => "Salary Predictor",
            Page::About => "About",
        }
    }

    /// Whether the record-level filter side panel applies to this page.
    pub fn filterable(self) -> bool {
        matches!(self, Page::Overview | Page::Descriptive)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptiveTab {
    TopSalaries,
    Distribution,
    Heatmap,
    Comparison,
    JobExplorer,
}

impl DescriptiveTab {
    pub const ALL: [DescriptiveTab; 5] = [
        DescriptiveTab::TopSalaries,
        DescriptiveTab::Distribution,
        DescriptiveTab::Heatmap,
        DescriptiveTab::Comparison,
        DescriptiveTab::JobExplorer,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DescriptiveTab::TopSalaries => "Top Salaries",
            DescriptiveTab::Distribution => "Salary Distribution",
            DescriptiveTab::Heatmap => "Size × Experience",
            DescriptiveTab::Comparison => "Comparison",
            DescriptiveTab::JobExplorer => "Job Explorer",
        }
    }
}

/// Dimension selector for the comparison tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareBy {
    RemoteMode,
    Experience,
    Employment,
}

impl CompareBy {
    pub const ALL: [CompareBy; 3] =
        [CompareBy::RemoteMode, CompareBy::Experience, CompareBy::Employment];

    pub fn group_key(self) -> GroupKey {
        match self {
            CompareBy::RemoteMode => GroupKey::RemoteMode,
            CompareBy::Experience => GroupKey::Experience,
            CompareBy::Employment => GroupKey::Employment,
        }
    }

    pub fn label(self) -> &'static str {
        self.group_key().label()
    }
}

// ---------------------------------------------------------------------------
// Per-page view state
// ---------------------------------------------------------------------------

pub struct DescriptiveState {
    pub tab: DescriptiveTab,
    pub top_search: String,
    pub top_metric: Metric,
    pub job_search: String,
    pub compare_by: CompareBy,
    pub heatmap_agg: Aggregate,
    /// Swap the heatmap axes (experience rows, company-size columns).
    pub heatmap_swapped: bool,
}

impl Default for DescriptiveState {
    fn default() -> Self {
        Self {
            tab: DescriptiveTab::TopSalaries,
            top_search: String::new(),
            top_metric: Metric::MeanSalary,
            job_search: String::new(),
            compare_by: CompareBy::RemoteMode,
            heatmap_agg: Aggregate::Mean,
            heatmap_swapped: false,
        }
    }
}

/// View parameters of the landing page.
#[derive(Default)]
pub struct OverviewState {
    pub sample_search: String,
}

pub struct MapState {
    pub metric: MapMetric,
    pub region: Region,
    /// Alpha-2 code of the country selected for the drill-down table.
    pub selected_country: Option<String>,
}

impl Default for MapState {
    fn default() -> Self {
        Self {
            metric: MapMetric::MeanSalaryByCompanyLocation,
            region: Region::NorthAmerica,
            selected_country: None,
        }
    }
}

pub struct PredictorState {
    pub input: FeatureInput,
    /// Trained once per session on first use, then reused (never mutated).
    pub model: Option<SalaryModel>,
    pub train_error: Option<String>,
    last_input: Option<FeatureInput>,
    pub last_prediction: Option<f64>,
}

impl PredictorState {
    fn new(dataset: &SalaryDataset) -> Self {
        use crate::data::model::{CompanySize, EmploymentType, ExperienceLevel};

        let first = |values: &[String]| values.first().cloned().unwrap_or_default();
        Self {
            input: FeatureInput {
                job_title: first(&dataset.job_titles),
                experience: ExperienceLevel::Senior,
                employment: EmploymentType::FullTime,
                company_location: first(&dataset.company_locations),
                company_size: CompanySize::Medium,
                employee_residence: first(&dataset.employee_residences),
                remote_ratio: 100,
            },
            model: None,
            train_error: None,
            last_input: None,
            last_prediction: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.  Constructed once at startup
/// and passed to every page renderer; the dataset and the trained model are
/// the only compute-once members and both are immutable after construction.
pub struct AppState {
    /// Loaded dataset (immutable for the session).
    pub dataset: SalaryDataset,

    /// Currently shown page.
    pub page: Page,

    /// Per-field filter selections for the filterable pages.
    pub filters: FilterState,

    /// Indices of records passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    pub overview: OverviewState,
    pub descriptive: DescriptiveState,
    pub map: MapState,
    pub predictor: PredictorState,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(dataset: SalaryDataset) -> Self {
        let filters = init_filter_state(&dataset);
        let visible_indices = (0..dataset.len()).collect();
        let predictor = PredictorState::new(&dataset);
        Self {
            dataset,
            page: Page::Overview,
            filters,
            visible_indices,
            overview: OverviewState::default(),
            descriptive: DescriptiveState::default(),
            map: MapState::default(),
            predictor,
            status_message: None,
        }
    }

    /// Ingest a replacement dataset: a fresh session over the new records.
    pub fn set_dataset(&mut self, dataset: SalaryDataset) {
        *self = AppState {
            page: self.page,
            ..AppState::new(dataset)
        };
    }

    /// Recompute `visible_indices` after a filter change.
    pub fn refilter(&mut self) {
        self.visible_indices = filtered_indices(&self.dataset, &self.filters);
    }

    /// Records passing the current filters.
    pub fn visible_records(&self) -> impl Iterator<Item = &SalaryRecord> + Clone {
        self.visible_indices
            .iter()
            .map(|&i| &self.dataset.records[i])
    }

    /// Train the salary model on first use; later calls reuse the cache.
    pub fn ensure_model(&mut self) {
        if self.predictor.model.is_some() || self.predictor.train_error.is_some() {
            return;
        }
        log::info!(
            "training salary model on {} records",
            self.dataset.len()
        );
        match predict::train(&self.dataset.records) {
            Ok(model) => {
                log::info!("salary model ready ({} training rows)", model.training_rows);
                self.predictor.model = Some(model);
            }
            Err(e) => {
                log::error!("salary model training failed: {e}");
                self.predictor.train_error = Some(e.to_string());
            }
        }
    }

    /// Predict for the current selection, reusing the last result when the
    /// inputs have not changed.
    pub fn update_prediction(&mut self) {
        let Some(model) = &self.predictor.model else {
            return;
        };
        if self.predictor.last_input.as_ref() == Some(&self.predictor.input) {
            return;
        }
        match model.predict(&self.predictor.input) {
            Ok(value) => {
                self.predictor.last_prediction = Some(value);
                self.predictor.last_input = Some(self.predictor.input.clone());
            }
            Err(e) => {
                log::error!("prediction failed: {e}");
                self.status_message = Some(format!("Prediction failed: {e}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{
        CompanySize, EmploymentType, ExperienceLevel, RemoteMode, SalaryRecord,
    };

    fn dataset() -> SalaryDataset {
        let record = |year: i32, level: ExperienceLevel| SalaryRecord {
            work_year: year,
            job_title: "Security Engineer".to_string(),
            experience: level,
            employment: EmploymentType::FullTime,
            salary_in_usd: Some(100_000.0),
            employee_residence: "US".to_string(),
            company_location: "US".to_string(),
            remote_ratio: 0,
            remote_mode: RemoteMode::Onsite,
            company_size: CompanySize::Medium,
        };
        SalaryDataset::from_records(vec![
            record(2020, ExperienceLevel::Entry),
            record(2022, ExperienceLevel::Senior),
        ])
    }

    #[test]
    fn new_state_shows_all_records() {
        let state = AppState::new(dataset());
        assert_eq!(state.visible_indices, vec![0, 1]);
        assert_eq!(state.page, Page::Overview);
        assert_eq!(state.predictor.input.job_title, "Security Engineer");
    }

    #[test]
    fn refilter_updates_visible_indices() {
        let mut state = AppState::new(dataset());
        state.filters.experience.remove(&ExperienceLevel::Entry);
        state.refilter();
        assert_eq!(state.visible_indices, vec![1]);
    }

    #[test]
    fn set_dataset_resets_session_but_keeps_page() {
        let mut state = AppState::new(dataset());
        state.page = Page::Map;
        state.filters.years.clear();
        state.refilter();
        assert!(state.visible_indices.is_empty());

        state.set_dataset(dataset());
        assert_eq!(state.page, Page::Map);
        assert_eq!(state.visible_indices, vec![0, 1]);
    }
}
