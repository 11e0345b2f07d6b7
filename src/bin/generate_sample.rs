//! Generate a deterministic synthetic salary dataset so the explorer can be
//! tried without the real source file.  Writes both the CSV the application
//! loads at startup and a parquet twin.

use std::sync::Arc;

use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const N_RECORDS: usize = 3000;
const CSV_PATH: &str = "salaries_cyber_clean.csv";
const PARQUET_PATH: &str = "salaries_cyber_clean.parquet";

/// (title, sampling weight, base senior full-time salary in USD)
const TITLES: [(&str, f64, f64); 12] = [
    ("Security Engineer", 16.0, 145_000.0),
    ("Security Analyst", 14.0, 105_000.0),
    ("SOC Analyst", 10.0, 85_000.0),
    ("Penetration Tester", 8.0, 125_000.0),
    ("Security Architect", 6.0, 175_000.0),
    ("Incident Responder", 6.0, 115_000.0),
    ("Security Consultant", 6.0, 130_000.0),
    ("Threat Intelligence Analyst", 5.0, 110_000.0),
    ("Application Security Engineer", 5.0, 155_000.0),
    ("Cloud Security Engineer", 5.0, 160_000.0),
    ("Security Manager", 4.0, 165_000.0),
    ("Chief Information Security Officer", 2.0, 230_000.0),
];

const COUNTRIES: [(&str, f64, f64); 10] = [
    ("US", 45.0, 1.0),
    ("GB", 12.0, 0.75),
    ("CA", 8.0, 0.8),
    ("DE", 7.0, 0.7),
    ("FR", 5.0, 0.65),
    ("IN", 8.0, 0.25),
    ("JP", 4.0, 0.6),
    ("SG", 4.0, 0.7),
    ("BR", 4.0, 0.3),
    ("ZA", 3.0, 0.35),
];

const YEARS: [(i64, f64); 3] = [(2020, 1.0), (2021, 2.0), (2022, 4.0)];

const EXPERIENCE: [(&str, f64, f64); 4] = [
    ("EN", 2.0, 0.55),
    ("MI", 3.5, 0.80),
    ("SE", 3.5, 1.0),
    ("EX", 1.0, 1.6),
];

const EMPLOYMENT: [(&str, f64, f64); 4] = [
    ("FT", 92.0, 1.0),
    ("PT", 3.0, 0.40),
    ("CT", 3.0, 1.10),
    ("FL", 2.0, 0.90),
];

const SIZES: [(&str, f64, f64); 3] = [("S", 2.0, 0.85), ("M", 5.0, 1.0), ("L", 3.0, 1.15)];

const REMOTE: [(i64, f64); 3] = [(0, 3.0), (50, 2.0), (100, 5.0)];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Weighted draw from a `(value, weight, ...)` table.
fn pick<'a, T>(rng: &mut SimpleRng, items: &'a [T], weight: impl Fn(&T) -> f64) -> &'a T {
    let total: f64 = items.iter().map(&weight).sum();
    let mut roll = rng.next_f64() * total;
    for item in items {
        roll -= weight(item);
        if roll <= 0.0 {
            return item;
        }
    }
    items.last().expect("non-empty table")
}

struct Row {
    work_year: i64,
    job_title: &'static str,
    experience: &'static str,
    employment: &'static str,
    salary_in_usd: Option<f64>,
    employee_residence: &'static str,
    company_location: &'static str,
    remote_ratio: i64,
    company_size: &'static str,
}

fn generate_rows(rng: &mut SimpleRng) -> Vec<Row> {
    (0..N_RECORDS)
        .map(|_| {
            let &(title, _, base) = pick(rng, &TITLES, |t| t.1);
            let &(year, _) = pick(rng, &YEARS, |y| y.1);
            let &(exp, _, exp_mult) = pick(rng, &EXPERIENCE, |e| e.1);
            let &(emp, _, emp_mult) = pick(rng, &EMPLOYMENT, |e| e.1);
            let &(size, _, size_mult) = pick(rng, &SIZES, |s| s.1);
            let &(remote, _) = pick(rng, &REMOTE, |r| r.1);
            let &(location, _, country_mult) = pick(rng, &COUNTRIES, |c| c.1);
            // residence usually matches the company country
            let residence = if rng.next_f64() < 0.85 {
                location
            } else {
                pick(rng, &COUNTRIES, |c| c.1).0
            };

            // roughly 1% of rows are missing the salary figure
            let salary_in_usd = if rng.next_f64() < 0.01 {
                None
            } else {
                let noise = rng.gauss(0.0, 0.18).exp();
                let salary = base * exp_mult * emp_mult * size_mult * country_mult * noise;
                Some(salary.round().max(1_000.0))
            };

            Row {
                work_year: year,
                job_title: title,
                experience: exp,
                employment: emp,
                salary_in_usd,
                employee_residence: residence,
                company_location: location,
                remote_ratio: remote,
                company_size: size,
            }
        })
        .collect()
}

fn write_csv(rows: &[Row]) -> Result<(), Box<dyn std::error::Error>> {
    let mut writer = csv::Writer::from_path(CSV_PATH)?;
    writer.write_record([
        "work_year",
        "job_title",
        "experience_level",
        "employment_type",
        "salary_in_usd",
        "employee_residence",
        "company_location",
        "remote_ratio",
        "company_size",
    ])?;
    for row in rows {
        writer.write_record([
            row.work_year.to_string(),
            row.job_title.to_string(),
            row.experience.to_string(),
            row.employment.to_string(),
            row.salary_in_usd
                .map(|s| format!("{s:.0}"))
                .unwrap_or_default(),
            row.employee_residence.to_string(),
            row.company_location.to_string(),
            row.remote_ratio.to_string(),
            row.company_size.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(rows: &[Row]) -> Result<(), Box<dyn std::error::Error>> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("work_year", DataType::Int64, false),
        Field::new("job_title", DataType::Utf8, false),
        Field::new("experience_level", DataType::Utf8, false),
        Field::new("employment_type", DataType::Utf8, false),
        Field::new("salary_in_usd", DataType::Float64, true),
        Field::new("employee_residence", DataType::Utf8, false),
        Field::new("company_location", DataType::Utf8, false),
        Field::new("remote_ratio", DataType::Int64, false),
        Field::new("company_size", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from(
                rows.iter().map(|r| r.work_year).collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(
                rows.iter().map(|r| r.job_title).collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(
                rows.iter().map(|r| r.experience).collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(
                rows.iter().map(|r| r.employment).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(
                rows.iter().map(|r| r.salary_in_usd).collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(
                rows.iter().map(|r| r.employee_residence).collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(
                rows.iter().map(|r| r.company_location).collect::<Vec<_>>(),
            )),
            Arc::new(Int64Array::from(
                rows.iter().map(|r| r.remote_ratio).collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(
                rows.iter().map(|r| r.company_size).collect::<Vec<_>>(),
            )),
        ],
    )?;

    let file = std::fs::File::create(PARQUET_PATH)?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = SimpleRng::new(42);
    let rows = generate_rows(&mut rng);

    write_csv(&rows)?;
    write_parquet(&rows)?;

    println!("wrote {} records to {CSV_PATH} and {PARQUET_PATH}", rows.len());
    Ok(())
}
