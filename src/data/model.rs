use std::fmt;

// ---------------------------------------------------------------------------
// Categorical columns
// ---------------------------------------------------------------------------

/// Experience level of the employee, from the `experience_level` column
/// (source codes EN/MI/SE/EX).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExperienceLevel {
    Entry,
    Mid,
    Senior,
    Executive,
}

impl ExperienceLevel {
    pub const ALL: [ExperienceLevel; 4] = [
        ExperienceLevel::Entry,
        ExperienceLevel::Mid,
        ExperienceLevel::Senior,
        ExperienceLevel::Executive,
    ];

    /// Parse the two-letter source code.
    pub fn parse(code: &str) -> Option<Self> {
        match code.trim() {
            "EN" => Some(ExperienceLevel::Entry),
            "MI" => Some(ExperienceLevel::Mid),
            "SE" => Some(ExperienceLevel::Senior),
            "EX" => Some(ExperienceLevel::Executive),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            ExperienceLevel::Entry => "EN",
            ExperienceLevel::Mid => "MI",
            ExperienceLevel::Senior => "SE",
            ExperienceLevel::Executive => "EX",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExperienceLevel::Entry => "Entry",
            ExperienceLevel::Mid => "Mid",
            ExperienceLevel::Senior => "Senior",
            ExperienceLevel::Executive => "Executive",
        }
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Employment type, from the `employment_type` column (FT/PT/CT/FL).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EmploymentType {
    FullTime,
    PartTime,
    Contract,
    Freelance,
}

impl EmploymentType {
    pub const ALL: [EmploymentType; 4] = [
        EmploymentType::FullTime,
        EmploymentType::PartTime,
        EmploymentType::Contract,
        EmploymentType::Freelance,
    ];

    pub fn parse(code: &str) -> Option<Self> {
        match code.trim() {
            "FT" => Some(EmploymentType::FullTime),
            "PT" => Some(EmploymentType::PartTime),
            "CT" => Some(EmploymentType::Contract),
            "FL" => Some(EmploymentType::Freelance),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            EmploymentType::FullTime => "FT",
            EmploymentType::PartTime => "PT",
            EmploymentType::Contract => "CT",
            EmploymentType::Freelance => "FL",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EmploymentType::FullTime => "Full Time",
            EmploymentType::PartTime => "Part Time",
            EmploymentType::Contract => "Contract",
            EmploymentType::Freelance => "Freelance",
        }
    }
}

impl fmt::Display for EmploymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Company size bucket, from the `company_size` column (S/M/L).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CompanySize {
    Small,
    Medium,
    Large,
}

impl CompanySize {
    pub const ALL: [CompanySize; 3] =
        [CompanySize::Small, CompanySize::Medium, CompanySize::Large];

    pub fn parse(code: &str) -> Option<Self> {
        match code.trim() {
            "S" => Some(CompanySize::Small),
            "M" => Some(CompanySize::Medium),
            "L" => Some(CompanySize::Large),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            CompanySize::Small => "S",
            CompanySize::Medium => "M",
            CompanySize::Large => "L",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CompanySize::Small => "Small",
            CompanySize::Medium => "Medium",
            CompanySize::Large => "Large",
        }
    }
}

impl fmt::Display for CompanySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Work arrangement derived from `remote_ratio`:
/// 0 → Onsite, 50 → Hybrid, 100 → Remote.  No other ratios are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RemoteMode {
    Onsite,
    Hybrid,
    Remote,
}

impl RemoteMode {
    pub const ALL: [RemoteMode; 3] =
        [RemoteMode::Onsite, RemoteMode::Hybrid, RemoteMode::Remote];

    /// Valid source values for the `remote_ratio` column.
    pub const RATIOS: [u8; 3] = [0, 50, 100];

    pub fn from_ratio(ratio: i64) -> Option<Self> {
        match ratio {
            0 => Some(RemoteMode::Onsite),
            50 => Some(RemoteMode::Hybrid),
            100 => Some(RemoteMode::Remote),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RemoteMode::Onsite => "Onsite",
            RemoteMode::Hybrid => "Hybrid",
            RemoteMode::Remote => "Remote",
        }
    }
}

impl fmt::Display for RemoteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ---------------------------------------------------------------------------
// SalaryRecord – one row of the source table
// ---------------------------------------------------------------------------

/// A single salary observation.
#[derive(Debug, Clone, PartialEq)]
pub struct SalaryRecord {
    pub work_year: i32,
    pub job_title: String,
    pub experience: ExperienceLevel,
    pub employment: EmploymentType,
    /// `None` when the source cell is empty; never negative.
    pub salary_in_usd: Option<f64>,
    /// ISO 3166-1 alpha-2 code of the employee's country.
    pub employee_residence: String,
    /// ISO 3166-1 alpha-2 code of the company HQ country.
    pub company_location: String,
    /// One of 0, 50, 100.
    pub remote_ratio: u8,
    pub remote_mode: RemoteMode,
    pub company_size: CompanySize,
}

// ---------------------------------------------------------------------------
// SalaryDataset – the complete loaded record set
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed unique-value indices.
/// Immutable for the lifetime of a session; every view derives from it.
#[derive(Debug, Clone)]
pub struct SalaryDataset {
    /// All records (rows).
    pub records: Vec<SalaryRecord>,
    /// Sorted unique job titles.
    pub job_titles: Vec<String>,
    /// Sorted unique work years.
    pub years: Vec<i32>,
    /// Sorted unique company-location alpha-2 codes.
    pub company_locations: Vec<String>,
    /// Sorted unique employee-residence alpha-2 codes.
    pub employee_residences: Vec<String>,
}

impl SalaryDataset {
    /// Build the unique-value indices from the loaded records.
    pub fn from_records(records: Vec<SalaryRecord>) -> Self {
        let mut job_titles: Vec<String> =
            records.iter().map(|r| r.job_title.clone()).collect();
        job_titles.sort();
        job_titles.dedup();

        let mut years: Vec<i32> = records.iter().map(|r| r.work_year).collect();
        years.sort_unstable();
        years.dedup();

        let mut company_locations: Vec<String> =
            records.iter().map(|r| r.company_location.clone()).collect();
        company_locations.sort();
        company_locations.dedup();

        let mut employee_residences: Vec<String> =
            records.iter().map(|r| r.employee_residence.clone()).collect();
        employee_residences.sort();
        employee_residences.dedup();

        SalaryDataset {
            records,
            job_titles,
            years,
            company_locations,
            employee_residences,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First and last covered work years, `None` on an empty set.
    pub fn year_range(&self) -> Option<(i32, i32)> {
        match (self.years.first(), self.years.last()) {
            (Some(&a), Some(&b)) => Some((a, b)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_mode_accepts_only_known_ratios() {
        assert_eq!(RemoteMode::from_ratio(0), Some(RemoteMode::Onsite));
        assert_eq!(RemoteMode::from_ratio(50), Some(RemoteMode::Hybrid));
        assert_eq!(RemoteMode::from_ratio(100), Some(RemoteMode::Remote));
        assert_eq!(RemoteMode::from_ratio(30), None);
        assert_eq!(RemoteMode::from_ratio(-1), None);
        assert_eq!(RemoteMode::from_ratio(101), None);
    }

    #[test]
    fn enum_codes_round_trip() {
        for level in ExperienceLevel::ALL {
            assert_eq!(ExperienceLevel::parse(level.code()), Some(level));
        }
        for emp in EmploymentType::ALL {
            assert_eq!(EmploymentType::parse(emp.code()), Some(emp));
        }
        for size in CompanySize::ALL {
            assert_eq!(CompanySize::parse(size.code()), Some(size));
        }
        assert_eq!(ExperienceLevel::parse("ZZ"), None);
        assert_eq!(CompanySize::parse(""), None);
    }

    fn record(title: &str, year: i32) -> SalaryRecord {
        SalaryRecord {
            work_year: year,
            job_title: title.to_string(),
            experience: ExperienceLevel::Mid,
            employment: EmploymentType::FullTime,
            salary_in_usd: Some(100_000.0),
            employee_residence: "US".to_string(),
            company_location: "US".to_string(),
            remote_ratio: 100,
            remote_mode: RemoteMode::Remote,
            company_size: CompanySize::Medium,
        }
    }

    #[test]
    fn dataset_indices_are_sorted_and_deduplicated() {
        let ds = SalaryDataset::from_records(vec![
            record("Security Engineer", 2022),
            record("Analyst", 2020),
            record("Security Engineer", 2021),
        ]);
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.job_titles, vec!["Analyst", "Security Engineer"]);
        assert_eq!(ds.years, vec![2020, 2021, 2022]);
        assert_eq!(ds.year_range(), Some((2020, 2022)));
    }
}
