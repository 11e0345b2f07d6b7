use crate::data::aggregate::{self, LocationField};
use crate::data::model::SalaryRecord;

// ---------------------------------------------------------------------------
// Country-code resolution (thin wrapper over the ISO 3166-1 tables)
// ---------------------------------------------------------------------------

/// Resolve an alpha-2 code to the country's English name.
pub fn code_to_name(alpha2: &str) -> Option<&'static str> {
    rust_iso3166::from_alpha2(alpha2).map(|c| c.name)
}

/// Resolve an alpha-2 code to its alpha-3 form.
pub fn code_to_alpha3(alpha2: &str) -> Option<&'static str> {
    rust_iso3166::from_alpha2(alpha2).map(|c| c.alpha3)
}

/// UI label for a country code: `"US (United States of America)"`,
/// `"XX (Unknown)"` when the code does not resolve.
pub fn display_label(alpha2: &str) -> String {
    match code_to_name(alpha2) {
        Some(name) => format!("{alpha2} ({name})"),
        None => format!("{alpha2} (Unknown)"),
    }
}

// ---------------------------------------------------------------------------
// World regions
// ---------------------------------------------------------------------------

/// Map scope selector.  Membership sets are the alpha-2 codes the dataset
/// can plausibly contain per region; codes outside every set simply never
/// match a region filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    NorthAmerica,
    Europe,
    SouthAmerica,
    Africa,
    Asia,
}

impl Region {
    pub const ALL: [Region; 5] = [
        Region::NorthAmerica,
        Region::Europe,
        Region::SouthAmerica,
        Region::Africa,
        Region::Asia,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Region::NorthAmerica => "NA",
            Region::Europe => "EU",
            Region::SouthAmerica => "SA",
            Region::Africa => "AF",
            Region::Asia => "AS",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Region::NorthAmerica => "North America",
            Region::Europe => "Europe",
            Region::SouthAmerica => "South America",
            Region::Africa => "Africa",
            Region::Asia => "Asia",
        }
    }

    fn members(self) -> &'static [&'static str] {
        match self {
            Region::NorthAmerica => &["US", "CA", "MX"],
            Region::Europe => &[
                "GB", "FR", "DE", "ES", "IT", "NL", "PL", "SE", "NO", "FI", "BE", "DK", "PT",
                "IE", "CH", "AT", "CZ", "RO", "HU", "GR", "BG", "SK", "HR", "SI", "EE", "LV",
                "LT", "LU", "IS",
            ],
            Region::SouthAmerica => &[
                "BR", "AR", "CL", "CO", "PE", "VE", "UY", "PY", "BO", "EC", "GY", "SR",
            ],
            Region::Africa => &[
                "ZA", "NG", "EG", "DZ", "MA", "KE", "TZ", "UG", "GH", "CM", "CI", "ET", "SN",
                "ZM", "ZW", "SD", "RW", "TN", "MW", "NA",
            ],
            Region::Asia => &[
                "CN", "JP", "KR", "IN", "ID", "MY", "SG", "TH", "PH", "VN", "BD", "PK", "LK",
                "AE", "SA", "IL", "IR", "IQ", "TR", "KZ", "KG", "MM", "QA", "KW",
            ],
        }
    }

    pub fn contains(self, alpha2: &str) -> bool {
        self.members().contains(&alpha2)
    }
}

// ---------------------------------------------------------------------------
// Map view assembly
// ---------------------------------------------------------------------------

/// Which aggregate the map colors countries by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapMetric {
    /// Mean `salary_in_usd` grouped by `company_location`.
    MeanSalaryByCompanyLocation,
    /// Record count grouped by `employee_residence`.
    EmployeeCountByResidence,
}

impl MapMetric {
    pub fn label(self) -> &'static str {
        match self {
            MapMetric::MeanSalaryByCompanyLocation => "Average Salary by Company Location",
            MapMetric::EmployeeCountByResidence => "Number of Employees by Residence",
        }
    }

    pub fn location_field(self) -> LocationField {
        match self {
            MapMetric::MeanSalaryByCompanyLocation => LocationField::CompanyLocation,
            MapMetric::EmployeeCountByResidence => LocationField::EmployeeResidence,
        }
    }
}

/// One country's entry in a geographic view.
#[derive(Debug, Clone, PartialEq)]
pub struct MapRow {
    pub alpha2: String,
    pub alpha3: &'static str,
    pub name: &'static str,
    pub value: f64,
}

/// Aggregate per country, resolve codes, and sort by value descending.
///
/// Codes that do not resolve are warned about and dropped from this view
/// only; they stay in the base record set for every other page.
pub fn map_rows<'a, I>(records: I, metric: MapMetric, region: Option<Region>) -> Vec<MapRow>
where
    I: IntoIterator<Item = &'a SalaryRecord>,
{
    let key = metric.location_field().group_key();
    let per_country: Vec<(String, f64)> = match metric {
        MapMetric::MeanSalaryByCompanyLocation => {
            aggregate::group_mean(records, key).into_iter().collect()
        }
        MapMetric::EmployeeCountByResidence => aggregate::group_count(records, key)
            .into_iter()
            .map(|(k, c)| (k, c as f64))
            .collect(),
    };

    let mut rows = Vec::with_capacity(per_country.len());
    for (alpha2, value) in per_country {
        if let Some(region) = region {
            if !region.contains(&alpha2) {
                continue;
            }
        }
        match rust_iso3166::from_alpha2(&alpha2) {
            Some(country) => rows.push(MapRow {
                alpha2,
                alpha3: country.alpha3,
                name: country.name,
                value,
            }),
            None => log::warn!("unresolvable country code '{alpha2}', dropped from map view"),
        }
    }

    rows.sort_by(|a, b| b.value.total_cmp(&a.value).then_with(|| a.alpha2.cmp(&b.alpha2)));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{
        CompanySize, EmploymentType, ExperienceLevel, RemoteMode, SalaryRecord,
    };

    #[test]
    fn resolves_known_codes() {
        assert_eq!(code_to_alpha3("US"), Some("USA"));
        assert_eq!(code_to_alpha3("GB"), Some("GBR"));
        assert!(code_to_name("DE").is_some());
    }

    #[test]
    fn unknown_codes_resolve_to_none() {
        assert_eq!(code_to_name("XX"), None);
        assert_eq!(code_to_alpha3(""), None);
        assert_eq!(display_label("XX"), "XX (Unknown)");
    }

    #[test]
    fn regions_contain_their_members() {
        assert!(Region::NorthAmerica.contains("US"));
        assert!(Region::Europe.contains("DE"));
        assert!(Region::Africa.contains("NA")); // Namibia, not North America
        assert!(!Region::Asia.contains("US"));
    }

    fn record(location: &str, residence: &str, salary: Option<f64>) -> SalaryRecord {
        SalaryRecord {
            work_year: 2022,
            job_title: "Security Engineer".to_string(),
            experience: ExperienceLevel::Mid,
            employment: EmploymentType::FullTime,
            salary_in_usd: salary,
            employee_residence: residence.to_string(),
            company_location: location.to_string(),
            remote_ratio: 0,
            remote_mode: RemoteMode::Onsite,
            company_size: CompanySize::Medium,
        }
    }

    #[test]
    fn map_rows_aggregate_and_sort_descending() {
        let records = vec![
            record("US", "US", Some(100_000.0)),
            record("US", "US", Some(200_000.0)),
            record("CA", "CA", Some(120_000.0)),
        ];
        let rows = map_rows(
            &records,
            MapMetric::MeanSalaryByCompanyLocation,
            Some(Region::NorthAmerica),
        );
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].alpha2, "US");
        assert_eq!(rows[0].value, 150_000.0);
        assert_eq!(rows[0].alpha3, "USA");
        assert_eq!(rows[1].alpha2, "CA");
    }

    #[test]
    fn unresolvable_codes_are_dropped_from_map_views_only() {
        let records = vec![
            record("US", "US", Some(100_000.0)),
            record("XX", "XX", Some(500_000.0)),
        ];
        let rows = map_rows(&records, MapMetric::MeanSalaryByCompanyLocation, None);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].alpha2, "US");
    }

    #[test]
    fn region_filter_limits_rows() {
        let records = vec![
            record("US", "US", Some(100_000.0)),
            record("DE", "DE", Some(90_000.0)),
        ];
        let rows = map_rows(
            &records,
            MapMetric::MeanSalaryByCompanyLocation,
            Some(Region::Europe),
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].alpha2, "DE");
    }

    #[test]
    fn employee_count_metric_counts_rows() {
        let records = vec![
            record("US", "GB", None),
            record("US", "GB", Some(1.0)),
            record("US", "US", Some(2.0)),
        ];
        let rows = map_rows(&records, MapMetric::EmployeeCountByResidence, None);
        assert_eq!(rows[0].alpha2, "GB");
        assert_eq!(rows[0].value, 2.0);
    }
}
