use serde::de::{self, Unexpected};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_MAX_RESULTS: u32 = 50;
pub const MAX_RESULTS_LIMIT: u32 = 200;

/// Company size buckets as shown on public company pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CompanySize {
    #[default]
    Any,
    Micro,
    Small,
    Medium,
    Large,
    Larger,
    Enterprise,
    Major,
    Giant,
}

impl CompanySize {
    pub const ALL: [CompanySize; 9] = [
        CompanySize::Any,
        CompanySize::Micro,
        CompanySize::Small,
        CompanySize::Medium,
        CompanySize::Large,
        CompanySize::Larger,
        CompanySize::Enterprise,
        CompanySize::Major,
        CompanySize::Giant,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CompanySize::Any => "any",
            CompanySize::Micro => "1-10",
            CompanySize::Small => "11-50",
            CompanySize::Medium => "51-200",
            CompanySize::Large => "201-500",
            CompanySize::Larger => "501-1,000",
            CompanySize::Enterprise => "1,001-5,000",
            CompanySize::Major => "5,001-10,000",
            CompanySize::Giant => "10,001+",
        }
    }
}

impl fmt::Display for CompanySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CompanySize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s.trim().chars().filter(|c| *c != ',').collect();
        CompanySize::ALL
            .into_iter()
            .find(|size| size.label().replace(',', "").eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| {
                let labels: Vec<&str> = CompanySize::ALL.iter().map(|s| s.label()).collect();
                format!(
                    "unknown company size '{}'; expected one of: {}",
                    s,
                    labels.join(", ")
                )
            })
    }
}

impl TryFrom<String> for CompanySize {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CompanySize> for String {
    fn from(size: CompanySize) -> Self {
        size.label().to_string()
    }
}

/// Filters for one search submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchFilters {
    /// Comma-separated terms, matched as "any of".
    pub keywords: String,
    pub location: String,
    pub size: CompanySize,
    /// Name initial; a blank value means no constraint.
    #[serde(deserialize_with = "deserialize_initial")]
    pub starts_with: Option<char>,
    pub max_results: u32,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            keywords: String::new(),
            location: String::new(),
            size: CompanySize::Any,
            starts_with: None,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

fn deserialize_initial<'de, D>(deserializer: D) -> Result<Option<char>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let mut chars = raw.trim().chars();
    match (chars.next(), chars.next()) {
        (None, _) => Ok(None),
        (Some(c), None) => Ok(Some(c)),
        _ => Err(de::Error::invalid_value(
            Unexpected::Str(&raw),
            &"a single character or an empty string",
        )),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRecord {
    pub name: String,
    pub url: String,
}

/// Records found by one search, with the model text they were read from.
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    pub records: Vec<CompanyRecord>,
    pub raw_output: String,
}

impl SearchOutcome {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub fn file_name(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "companies.csv",
            ExportFormat::Xlsx => "companies.xlsx",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "xlsx" | "excel" => Ok(ExportFormat::Xlsx),
            other => Err(format!(
                "unsupported export format '{}'; expected csv or xlsx",
                other
            )),
        }
    }
}
