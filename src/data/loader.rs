use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{
    Array, Float32Array, Float64Array, Int32Array, Int64Array, LargeStringArray, StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use thiserror::Error;

use super::model::{
    CompanySize, EmploymentType, ExperienceLevel, RemoteMode, SalaryDataset, SalaryRecord,
};

/// Columns every source file must provide.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    "work_year",
    "job_title",
    "experience_level",
    "employment_type",
    "salary_in_usd",
    "employee_residence",
    "company_location",
    "remote_ratio",
    "company_size",
];

/// Structural problems that make a source file unusable.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("no usable salary records in the input")]
    EmptyDataset,
}

/// Value-level problems that reject a single row.
#[derive(Debug, Error)]
enum RowError {
    #[error("unknown experience level '{0}'")]
    Experience(String),
    #[error("unknown employment type '{0}'")]
    Employment(String),
    #[error("unknown company size '{0}'")]
    CompanySize(String),
    #[error("remote ratio {0} is not one of 0/50/100")]
    RemoteRatio(i64),
    #[error("negative salary {0}")]
    NegativeSalary(f64),
    #[error("invalid {field} value '{value}'")]
    Invalid { field: &'static str, value: String },
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a salary dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the columns in [`REQUIRED_COLUMNS`]
/// * `.json`    – records-oriented array (`df.to_json(orient='records')`)
/// * `.parquet` – scalar columns with the same names
pub fn load_file(path: &Path) -> Result<SalaryDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(LoadError::UnsupportedExtension(other.to_string()).into()),
    }
}

// ---------------------------------------------------------------------------
// Shared row validation
// ---------------------------------------------------------------------------

/// One row as read from any source, before validation.
struct RawRow {
    work_year: i64,
    job_title: String,
    experience: String,
    employment: String,
    salary_in_usd: Option<f64>,
    employee_residence: String,
    company_location: String,
    remote_ratio: i64,
    company_size: String,
}

fn country_code(field: &'static str, value: &str) -> std::result::Result<String, RowError> {
    let code = value.trim().to_ascii_uppercase();
    if code.is_empty() {
        return Err(RowError::Invalid {
            field,
            value: value.to_string(),
        });
    }
    Ok(code)
}

fn build_record(raw: RawRow) -> std::result::Result<SalaryRecord, RowError> {
    let experience = ExperienceLevel::parse(&raw.experience)
        .ok_or_else(|| RowError::Experience(raw.experience.clone()))?;
    let employment = EmploymentType::parse(&raw.employment)
        .ok_or_else(|| RowError::Employment(raw.employment.clone()))?;
    let company_size = CompanySize::parse(&raw.company_size)
        .ok_or_else(|| RowError::CompanySize(raw.company_size.clone()))?;
    let remote_mode =
        RemoteMode::from_ratio(raw.remote_ratio).ok_or(RowError::RemoteRatio(raw.remote_ratio))?;

    let salary_in_usd = match raw.salary_in_usd {
        Some(v) if !v.is_finite() => {
            return Err(RowError::Invalid {
                field: "salary_in_usd",
                value: v.to_string(),
            });
        }
        Some(v) if v < 0.0 => return Err(RowError::NegativeSalary(v)),
        other => other,
    };

    let job_title = raw.job_title.trim().to_string();
    if job_title.is_empty() {
        return Err(RowError::Invalid {
            field: "job_title",
            value: raw.job_title,
        });
    }

    Ok(SalaryRecord {
        work_year: raw.work_year as i32,
        job_title,
        experience,
        employment,
        salary_in_usd,
        employee_residence: country_code("employee_residence", &raw.employee_residence)?,
        company_location: country_code("company_location", &raw.company_location)?,
        remote_ratio: raw.remote_ratio as u8,
        remote_mode,
        company_size,
    })
}

/// Collect validated rows, warning about and skipping the bad ones.
fn collect_records(
    raws: impl IntoIterator<Item = (usize, std::result::Result<RawRow, RowError>)>,
) -> Result<SalaryDataset> {
    let mut records = Vec::new();
    let mut skipped = 0usize;

    for (row_no, raw) in raws {
        match raw.and_then(build_record) {
            Ok(record) => records.push(record),
            Err(e) => {
                log::warn!("row {row_no}: {e}, skipping");
                skipped += 1;
            }
        }
    }

    if records.is_empty() {
        return Err(LoadError::EmptyDataset.into());
    }
    log::info!(
        "loaded {} salary records ({} skipped)",
        records.len(),
        skipped
    );
    Ok(SalaryDataset::from_records(records))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<SalaryDataset> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut idx = [0usize; REQUIRED_COLUMNS.len()];
    for (i, &col) in REQUIRED_COLUMNS.iter().enumerate() {
        idx[i] = headers
            .iter()
            .position(|h| h == col)
            .ok_or(LoadError::MissingColumn(col))?;
    }

    let mut raws = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        // +2: one for the header line, one for 1-based numbering
        let line = row_no + 2;
        let record = result.with_context(|| format!("CSV row {line}"))?;
        let cell = |i: usize| record.get(idx[i]).unwrap_or("").trim().to_string();

        let raw = parse_csv_row(
            cell(0),
            cell(1),
            cell(2),
            cell(3),
            cell(4),
            cell(5),
            cell(6),
            cell(7),
            cell(8),
        );
        raws.push((line, raw));
    }

    collect_records(raws)
}

#[allow(clippy::too_many_arguments)]
fn parse_csv_row(
    work_year: String,
    job_title: String,
    experience: String,
    employment: String,
    salary: String,
    residence: String,
    location: String,
    remote_ratio: String,
    company_size: String,
) -> std::result::Result<RawRow, RowError> {
    let work_year = work_year.parse::<i64>().map_err(|_| RowError::Invalid {
        field: "work_year",
        value: work_year.clone(),
    })?;
    let salary_in_usd = if salary.is_empty() {
        None
    } else {
        Some(salary.parse::<f64>().map_err(|_| RowError::Invalid {
            field: "salary_in_usd",
            value: salary.clone(),
        })?)
    };
    let remote_ratio = remote_ratio
        .parse::<f64>()
        .map_err(|_| RowError::Invalid {
            field: "remote_ratio",
            value: remote_ratio.clone(),
        })?
        .round() as i64;

    Ok(RawRow {
        work_year,
        job_title,
        experience,
        employment,
        salary_in_usd,
        employee_residence: residence,
        company_location: location,
        remote_ratio,
        company_size,
    })
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default
/// `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "work_year": 2022,
///     "job_title": "Security Engineer",
///     "experience_level": "SE",
///     "employment_type": "FT",
///     "salary_in_usd": 135000,
///     "employee_residence": "US",
///     "company_location": "US",
///     "remote_ratio": 100,
///     "company_size": "M"
///   },
///   ...
/// ]
/// ```
#[derive(Debug, Deserialize)]
struct JsonRecord {
    work_year: i64,
    job_title: String,
    experience_level: String,
    employment_type: String,
    #[serde(default)]
    salary_in_usd: Option<f64>,
    employee_residence: String,
    company_location: String,
    remote_ratio: i64,
    company_size: String,
}

fn load_json(path: &Path) -> Result<SalaryDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let rows: Vec<JsonRecord> = serde_json::from_str(&text).context("parsing JSON")?;

    collect_records(rows.into_iter().enumerate().map(|(i, r)| {
        (
            i,
            Ok(RawRow {
                work_year: r.work_year,
                job_title: r.job_title,
                experience: r.experience_level,
                employment: r.employment_type,
                salary_in_usd: r.salary_in_usd,
                employee_residence: r.employee_residence,
                company_location: r.company_location,
                remote_ratio: r.remote_ratio,
                company_size: r.company_size,
            }),
        )
    }))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one scalar column per required field.
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<SalaryDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut raws = Vec::new();
    let mut base_row = 0usize;

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let mut cols = Vec::with_capacity(REQUIRED_COLUMNS.len());
        for name in REQUIRED_COLUMNS {
            let i = schema
                .index_of(name)
                .map_err(|_| LoadError::MissingColumn(name))?;
            cols.push(batch.column(i).clone());
        }

        for row in 0..batch.num_rows() {
            raws.push((base_row + row, parquet_row(&cols, row)));
        }
        base_row += batch.num_rows();
    }

    collect_records(raws)
}

fn parquet_row(
    cols: &[Arc<dyn Array>],
    row: usize,
) -> std::result::Result<RawRow, RowError> {
    let int = |i: usize, field: &'static str| {
        extract_i64(&cols[i], row).ok_or(RowError::Invalid {
            field,
            value: "<null>".to_string(),
        })
    };
    let text = |i: usize, field: &'static str| {
        extract_str(&cols[i], row).ok_or(RowError::Invalid {
            field,
            value: "<null>".to_string(),
        })
    };

    Ok(RawRow {
        work_year: int(0, "work_year")?,
        job_title: text(1, "job_title")?,
        experience: text(2, "experience_level")?,
        employment: text(3, "employment_type")?,
        salary_in_usd: extract_f64(&cols[4], row),
        employee_residence: text(5, "employee_residence")?,
        company_location: text(6, "company_location")?,
        remote_ratio: int(7, "remote_ratio")?,
        company_size: text(8, "company_size")?,
    })
}

// -- Arrow column helpers --

fn extract_i64(col: &Arc<dyn Array>, row: usize) -> Option<i64> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .map(|a| a.value(row)),
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .map(|a| i64::from(a.value(row))),
        DataType::Float64 => col
            .as_any()
            .downcast_ref::<Float64Array>()
            .map(|a| a.value(row).round() as i64),
        _ => None,
    }
}

fn extract_f64(col: &Arc<dyn Array>, row: usize) -> Option<f64> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Float64 => col
            .as_any()
            .downcast_ref::<Float64Array>()
            .map(|a| a.value(row)),
        DataType::Float32 => col
            .as_any()
            .downcast_ref::<Float32Array>()
            .map(|a| f64::from(a.value(row))),
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .map(|a| a.value(row) as f64),
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .map(|a| f64::from(a.value(row))),
        _ => None,
    }
}

fn extract_str(col: &Arc<dyn Array>, row: usize) -> Option<String> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Utf8 => col
            .as_any()
            .downcast_ref::<StringArray>()
            .map(|a| a.value(row).to_string()),
        DataType::LargeUtf8 => col
            .as_any()
            .downcast_ref::<LargeStringArray>()
            .map(|a| a.value(row).to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "work_year,job_title,experience_level,employment_type,\
salary_in_usd,employee_residence,company_location,remote_ratio,company_size";

    fn write_csv(dir: &tempfile::TempDir, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "{HEADER}").unwrap();
        write!(f, "{body}").unwrap();
        path
    }

    #[test]
    fn loads_valid_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            "salaries.csv",
            "2022,Security Engineer,SE,FT,135000,US,US,100,M\n\
             2021,Security Analyst,EN,FT,62000,gb,GB,0,S\n",
        );

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].remote_mode, RemoteMode::Remote);
        assert_eq!(ds.records[1].experience, ExperienceLevel::Entry);
        // country codes are normalised to upper case
        assert_eq!(ds.records[1].employee_residence, "GB");
        assert_eq!(ds.job_titles.len(), 2);
    }

    #[test]
    fn empty_salary_cell_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "salaries.csv", "2022,Security Engineer,SE,FT,,US,US,50,M\n");

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records[0].salary_in_usd, None);
        assert_eq!(ds.records[0].remote_mode, RemoteMode::Hybrid);
    }

    #[test]
    fn invalid_rows_are_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            "salaries.csv",
            "2022,Security Engineer,SE,FT,135000,US,US,100,M\n\
             2022,Pentester,??,FT,90000,US,US,100,M\n\
             2022,Pentester,SE,FT,90000,US,US,42,M\n\
             2022,Pentester,SE,FT,-5,US,US,0,M\n",
        );

        let ds = load_file(&path).unwrap();
        // only the first row survives validation
        assert_eq!(ds.len(), 1);
    }

    #[test]
    fn missing_column_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("salaries.csv");
        std::fs::write(&path, "work_year,job_title\n2022,Security Engineer\n").unwrap();

        let err = load_file(&path).unwrap_err();
        let load_err = err.downcast_ref::<LoadError>().unwrap();
        assert!(matches!(load_err, LoadError::MissingColumn(_)));
    }

    #[test]
    fn all_rows_invalid_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "salaries.csv", "2022,Pentester,??,FT,1,US,US,0,M\n");

        let err = load_file(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LoadError>().unwrap(),
            LoadError::EmptyDataset
        ));
    }

    #[test]
    fn rejects_unknown_extension() {
        let err = load_file(Path::new("salaries.xlsx")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LoadError>().unwrap(),
            LoadError::UnsupportedExtension(_)
        ));
    }

    #[test]
    fn loads_records_oriented_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("salaries.json");
        std::fs::write(
            &path,
            r#"[
                {"work_year": 2022, "job_title": "Security Engineer",
                 "experience_level": "SE", "employment_type": "FT",
                 "salary_in_usd": 135000, "employee_residence": "US",
                 "company_location": "US", "remote_ratio": 100, "company_size": "M"},
                {"work_year": 2020, "job_title": "SOC Analyst",
                 "experience_level": "EN", "employment_type": "PT",
                 "salary_in_usd": null, "employee_residence": "DE",
                 "company_location": "DE", "remote_ratio": 0, "company_size": "L"}
            ]"#,
        )
        .unwrap();

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[1].salary_in_usd, None);
        assert_eq!(ds.years, vec![2020, 2022]);
    }
}
