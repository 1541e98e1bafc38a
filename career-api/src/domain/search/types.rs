//! Core types for the search domain.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use time::OffsetDateTime;

/// Content collection a search result comes from.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ContentType {
    Job,
    Resource,
    Partner,
    Program,
}

/// Inclusive timestamp range. Either end may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub start: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub end: Option<OffsetDateTime>,
}

/// Salary bounds requested by the caller. Matches any posting whose own
/// range overlaps this one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SalaryRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Constraints narrowing the candidate set of every collection.
///
/// Every field is optional, `None` means "no constraint on this dimension".
/// A collection silently ignores the fields it has no counterpart for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchFilters {
    /// Restrict the search to these collections
    pub content_types: Option<Vec<ContentType>>,
    /// Resource category or program type
    pub categories: Option<Vec<String>>,
    /// Overlap-matched against each record's climate focus list
    pub climate_sectors: Option<Vec<String>>,
    pub difficulty_levels: Option<Vec<String>>,
    /// Applied to `created_at`
    pub date_range: Option<DateRange>,
    pub organization_types: Option<Vec<String>>,
    pub partnership_levels: Option<Vec<String>>,
    pub employment_types: Option<Vec<String>>,
    pub experience_levels: Option<Vec<String>>,
    /// OR-matched case-insensitive substrings of the record location
    pub locations: Option<Vec<String>>,
    pub salary_range: Option<SalaryRange>,
    /// Only `Some(true)` constrains
    pub remote_friendly: Option<bool>,
    pub verified_only: Option<bool>,
}

impl SearchFilters {
    /// Whether the given collection should be queried at all.
    pub fn includes(&self, content_type: ContentType) -> bool {
        match &self.content_types {
            Some(types) if !types.is_empty() => types.contains(&content_type),
            _ => true,
        }
    }

    pub fn verified_only(&self) -> bool {
        self.verified_only.unwrap_or(false)
    }
}

/// Paging and behaviour switches for a single search call.
///
/// `limit` and `offset` are signed so malformed input can be rejected
/// instead of wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub include_facets: bool,
    pub boost_recent: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit: None,
            offset: None,
            include_facets: true,
            boost_recent: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobMetadata {
    pub organization_name: Option<String>,
    pub employment_type: Option<String>,
    pub experience_level: Option<String>,
    pub location: Option<String>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub remote_friendly: bool,
    pub climate_focus: Vec<String>,
    /// Whether the posting partner is verified
    pub verified: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceMetadata {
    pub category: Option<String>,
    pub difficulty_level: Option<String>,
    pub author: Option<String>,
    pub reading_time_minutes: Option<i32>,
    pub climate_focus: Vec<String>,
    pub verified: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartnerMetadata {
    pub organization_type: Option<String>,
    pub partnership_level: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub climate_focus: Vec<String>,
    pub verified: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgramMetadata {
    pub provider: Option<String>,
    pub program_type: Option<String>,
    pub difficulty_level: Option<String>,
    pub duration: Option<String>,
    pub cost: Option<f64>,
    pub format: Option<String>,
    pub location: Option<String>,
    pub climate_focus: Vec<String>,
    pub verified: bool,
}

/// Typed per-collection metadata. Serialized as `"type"` + `"metadata"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "metadata", rename_all = "snake_case")]
pub enum ResultMetadata {
    Job(JobMetadata),
    Resource(ResourceMetadata),
    Partner(PartnerMetadata),
    Program(ProgramMetadata),
}

impl ResultMetadata {
    pub fn content_type(&self) -> ContentType {
        match self {
            ResultMetadata::Job(_) => ContentType::Job,
            ResultMetadata::Resource(_) => ContentType::Resource,
            ResultMetadata::Partner(_) => ContentType::Partner,
            ResultMetadata::Program(_) => ContentType::Program,
        }
    }

    pub fn verified(&self) -> bool {
        match self {
            ResultMetadata::Job(m) => m.verified,
            ResultMetadata::Resource(m) => m.verified,
            ResultMetadata::Partner(m) => m.verified,
            ResultMetadata::Program(m) => m.verified,
        }
    }

    pub fn climate_focus(&self) -> &[String] {
        match self {
            ResultMetadata::Job(m) => &m.climate_focus,
            ResultMetadata::Resource(m) => &m.climate_focus,
            ResultMetadata::Partner(m) => &m.climate_focus,
            ResultMetadata::Program(m) => &m.climate_focus,
        }
    }
}

/// A single ranked hit, regardless of the collection it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Unique within its content type
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    /// Base relevance plus ranking boosts (higher is better)
    pub relevance_score: f64,
    pub highlights: Vec<String>,
    #[serde(flatten)]
    pub metadata: ResultMetadata,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

impl SearchResult {
    pub fn content_type(&self) -> ContentType {
        self.metadata.content_type()
    }
}

/// Dimensions the facet aggregator builds histograms for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FacetDimension {
    ContentType,
    OrganizationType,
    EmploymentType,
    ExperienceLevel,
    ClimateFocus,
    PartnershipLevel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetCount {
    pub value: String,
    pub count: usize,
}

pub type Facets = BTreeMap<FacetDimension, Vec<FacetCount>>;

/// Number of ranked results per content type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakdown {
    pub jobs: usize,
    pub resources: usize,
    pub partners: usize,
    pub programs: usize,
}

impl Breakdown {
    pub fn from_results(results: &[SearchResult]) -> Self {
        results
            .iter()
            .fold(Self::default(), |mut acc, result| {
                match result.content_type() {
                    ContentType::Job => acc.jobs += 1,
                    ContentType::Resource => acc.resources += 1,
                    ContentType::Partner => acc.partners += 1,
                    ContentType::Program => acc.programs += 1,
                }
                acc
            })
    }
}

/// Envelope returned by [`SearchEngine::search`](super::SearchEngine::search).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
    pub total_count: usize,
    pub search_time_ms: u64,
    pub suggestions: Vec<String>,
    pub facets: Facets,
    pub query_expansion: Vec<String>,
    pub breakdown: Breakdown,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(verified: bool) -> SearchResult {
        SearchResult {
            id: "job-1".to_string(),
            title: "Solar Installer".to_string(),
            description: None,
            relevance_score: 1.0,
            highlights: vec![],
            metadata: ResultMetadata::Job(JobMetadata {
                verified,
                ..Default::default()
            }),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn content_type_display() {
        assert_eq!(ContentType::Job.to_string(), "job");
        assert_eq!(ContentType::Partner.to_string(), "partner");
        assert_eq!(FacetDimension::ClimateFocus.to_string(), "climate_focus");
        assert_eq!("Program".parse::<ContentType>().unwrap(), ContentType::Program);
    }

    #[test]
    fn filters_include_every_type_when_unset() {
        let filters = SearchFilters::default();
        assert!(filters.includes(ContentType::Job));
        assert!(filters.includes(ContentType::Program));

        let filters = SearchFilters {
            content_types: Some(vec![ContentType::Program]),
            ..Default::default()
        };
        assert!(!filters.includes(ContentType::Job));
        assert!(filters.includes(ContentType::Program));
    }

    #[test]
    fn result_serializes_type_and_metadata() {
        let value = serde_json::to_value(job(true)).unwrap();
        assert_eq!(value["type"], "job");
        assert_eq!(value["metadata"]["verified"], true);
        assert!(value["created_at"].is_null());
    }

    #[test]
    fn breakdown_counts_per_type() {
        let breakdown = Breakdown::from_results(&[job(true), job(false)]);
        assert_eq!(breakdown.jobs, 2);
        assert_eq!(breakdown.programs, 0);
        assert_eq!(breakdown.resources, 0);
    }

    #[test]
    fn options_default_to_facets_and_recency() {
        let options: SearchOptions = serde_json::from_str("{}").unwrap();
        assert!(options.include_facets);
        assert!(options.boost_recent);
        assert_eq!(options.limit, None);
    }
}
