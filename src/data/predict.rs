use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use thiserror::Error;

use super::model::{CompanySize, EmploymentType, ExperienceLevel, SalaryRecord};

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("no records with a salary to train on")]
    NoTrainingData,
    #[error("model training failed: {0}")]
    Train(String),
    #[error("prediction failed: {0}")]
    Predict(String),
}

// ---------------------------------------------------------------------------
// Feature assembly
// ---------------------------------------------------------------------------

/// User-selected feature values for a single prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureInput {
    pub job_title: String,
    pub experience: ExperienceLevel,
    pub employment: EmploymentType,
    pub company_location: String,
    pub company_size: CompanySize,
    pub employee_residence: String,
    pub remote_ratio: u8,
}

impl FeatureInput {
    fn feature_row(&self) -> Vec<String> {
        vec![
            self.job_title.clone(),
            self.experience.code().to_string(),
            self.employment.code().to_string(),
            self.company_location.clone(),
            self.company_size.code().to_string(),
            self.employee_residence.clone(),
            self.remote_ratio.to_string(),
        ]
    }
}

fn record_features(record: &SalaryRecord) -> Vec<String> {
    vec![
        record.job_title.clone(),
        record.experience.code().to_string(),
        record.employment.code().to_string(),
        record.company_location.clone(),
        record.company_size.code().to_string(),
        record.employee_residence.clone(),
        record.remote_ratio.to_string(),
    ]
}

// ---------------------------------------------------------------------------
// One-hot encoding
// ---------------------------------------------------------------------------

/// Categorical encoder fitted on the categories seen at training time.
/// A category unseen during fitting encodes as an all-zero block, so an
/// out-of-vocabulary input still yields a (low-confidence) prediction.
#[derive(Debug, Clone)]
pub struct OneHotEncoder {
    /// Sorted category values per feature column.
    categories: Vec<Vec<String>>,
}

impl OneHotEncoder {
    pub fn fit(rows: &[Vec<String>]) -> Self {
        let n_features = rows.first().map_or(0, Vec::len);
        let mut categories = vec![Vec::new(); n_features];
        for (j, column) in categories.iter_mut().enumerate() {
            let mut values: Vec<String> = rows.iter().map(|r| r[j].clone()).collect();
            values.sort();
            values.dedup();
            *column = values;
        }
        OneHotEncoder { categories }
    }

    /// Total width of the encoded vector.
    pub fn width(&self) -> usize {
        self.categories.iter().map(Vec::len).sum()
    }

    pub fn transform(&self, row: &[String]) -> Vec<f64> {
        let mut encoded = vec![0.0; self.width()];
        let mut offset = 0;
        for (j, values) in self.categories.iter().enumerate() {
            if let Some(value) = row.get(j) {
                if let Ok(pos) = values.binary_search(value) {
                    encoded[offset + pos] = 1.0;
                }
            }
            offset += values.len();
        }
        encoded
    }
}

// ---------------------------------------------------------------------------
// Random-forest regression on ln(1 + salary)
// ---------------------------------------------------------------------------

/// Trained salary model.  Built once per session and cached; read-only after
/// construction.
#[derive(Debug)]
pub struct SalaryModel {
    encoder: OneHotEncoder,
    forest: RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>,
    /// Number of salary-bearing records the forest was fitted on.
    pub training_rows: usize,
}

/// Fit the regression on every record that carries a salary.
pub fn train(records: &[SalaryRecord]) -> Result<SalaryModel, PredictError> {
    let mut rows = Vec::new();
    let mut targets = Vec::new();
    for record in records {
        if let Some(salary) = record.salary_in_usd {
            rows.push(record_features(record));
            targets.push(salary.ln_1p());
        }
    }
    if rows.is_empty() {
        return Err(PredictError::NoTrainingData);
    }

    let encoder = OneHotEncoder::fit(&rows);
    let encoded: Vec<Vec<f64>> = rows.iter().map(|r| encoder.transform(r)).collect();
    let row_refs: Vec<&[f64]> = encoded.iter().map(Vec::as_slice).collect();
    let x = DenseMatrix::from_2d_array(&row_refs);

    let params = RandomForestRegressorParameters::default()
        .with_n_trees(300)
        .with_max_depth(18)
        .with_min_samples_split(4)
        .with_min_samples_leaf(2)
        .with_seed(42);

    let forest = RandomForestRegressor::fit(&x, &targets, params)
        .map_err(|e| PredictError::Train(e.to_string()))?;

    Ok(SalaryModel {
        encoder,
        forest,
        training_rows: targets.len(),
    })
}

impl SalaryModel {
    /// Predict a salary in USD for the given feature selection.
    pub fn predict(&self, input: &FeatureInput) -> Result<f64, PredictError> {
        let encoded = self.encoder.transform(&input.feature_row());
        let x = DenseMatrix::from_2d_array(&[encoded.as_slice()]);
        let log_pred = self
            .forest
            .predict(&x)
            .map_err(|e| PredictError::Predict(e.to_string()))?;
        Ok(log_pred[0].exp_m1().max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::RemoteMode;

    fn record(title: &str, location: &str, salary: f64) -> SalaryRecord {
        SalaryRecord {
            work_year: 2022,
            job_title: title.to_string(),
            experience: ExperienceLevel::Senior,
            employment: EmploymentType::FullTime,
            salary_in_usd: Some(salary),
            employee_residence: location.to_string(),
            company_location: location.to_string(),
            remote_ratio: 100,
            remote_mode: RemoteMode::Remote,
            company_size: CompanySize::Medium,
        }
    }

    fn input(title: &str, location: &str) -> FeatureInput {
        FeatureInput {
            job_title: title.to_string(),
            experience: ExperienceLevel::Senior,
            employment: EmploymentType::FullTime,
            company_location: location.to_string(),
            company_size: CompanySize::Medium,
            employee_residence: location.to_string(),
            remote_ratio: 100,
        }
    }

    #[test]
    fn encoder_width_is_sum_of_category_counts() {
        let rows = vec![
            vec!["a".to_string(), "x".to_string()],
            vec!["b".to_string(), "x".to_string()],
            vec!["a".to_string(), "y".to_string()],
        ];
        let enc = OneHotEncoder::fit(&rows);
        // 2 categories in column 0, 2 in column 1
        assert_eq!(enc.width(), 4);

        let v = enc.transform(&rows[0]);
        assert_eq!(v, vec![1.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn unknown_categories_encode_to_zeros() {
        let rows = vec![vec!["a".to_string()], vec!["b".to_string()]];
        let enc = OneHotEncoder::fit(&rows);
        assert_eq!(enc.transform(&["zzz".to_string()]), vec![0.0, 0.0]);
    }

    #[test]
    fn training_needs_salary_rows() {
        let mut r = record("Security Engineer", "US", 1.0);
        r.salary_in_usd = None;
        let err = train(&[r]).unwrap_err();
        assert!(matches!(err, PredictError::NoTrainingData));
    }

    #[test]
    fn constant_target_round_trips_through_log_space() {
        // every training row earns the same salary, so the forest should
        // return it exactly after the exp(x)-1 inverse transform
        let records: Vec<SalaryRecord> = (0..12)
            .map(|i| {
                record(
                    if i % 2 == 0 { "Security Engineer" } else { "SOC Analyst" },
                    if i % 3 == 0 { "US" } else { "GB" },
                    100_000.0,
                )
            })
            .collect();

        let model = train(&records).unwrap();
        assert_eq!(model.training_rows, 12);

        let pred = model.predict(&input("Security Engineer", "US")).unwrap();
        assert!((pred - 100_000.0).abs() < 1.0, "got {pred}");
    }

    #[test]
    fn out_of_vocabulary_input_still_predicts() {
        let records: Vec<SalaryRecord> = (0..12)
            .map(|i| record("Security Engineer", "US", 90_000.0 + i as f64))
            .collect();
        let model = train(&records).unwrap();

        let pred = model.predict(&input("Quantum Sorcerer", "ZZ")).unwrap();
        assert!(pred.is_finite());
        assert!(pred >= 0.0);
    }
}
