//! Row types of the four searchable collections and their query mappings.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::traits::{Constraint, ContentRecord, FieldValue};
use super::types::{
    ContentType, DateRange, JobMetadata, PartnerMetadata, ProgramMetadata, ResourceMetadata,
    ResultMetadata, SearchFilters, SearchResult,
};

/// A job posting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct JobRecord {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub organization_name: Option<String>,
    pub employment_type: Option<String>,
    pub experience_level: Option<String>,
    pub location: Option<String>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub remote_friendly: bool,
    pub climate_focus: Vec<String>,
    /// Posting partner is verified
    pub verified: bool,
    pub is_active: bool,
    pub created_at: Option<OffsetDateTime>,
    pub updated_at: Option<OffsetDateTime>,
}

/// A knowledge article or learning resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ResourceRecord {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub difficulty_level: Option<String>,
    pub author: Option<String>,
    pub reading_time_minutes: Option<i32>,
    pub climate_focus: Vec<String>,
    pub verified: bool,
    pub is_published: bool,
    pub created_at: Option<OffsetDateTime>,
    pub updated_at: Option<OffsetDateTime>,
}

/// A partner organization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PartnerRecord {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub mission: Option<String>,
    pub organization_type: Option<String>,
    pub partnership_level: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub climate_focus: Vec<String>,
    pub verified: bool,
    pub created_at: Option<OffsetDateTime>,
    pub updated_at: Option<OffsetDateTime>,
}

/// A training or education program.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProgramRecord {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub provider: Option<String>,
    pub program_type: Option<String>,
    pub difficulty_level: Option<String>,
    pub duration: Option<String>,
    pub cost: Option<f64>,
    pub format: Option<String>,
    pub location: Option<String>,
    pub climate_focus: Vec<String>,
    pub verified: bool,
    pub is_active: bool,
    pub created_at: Option<OffsetDateTime>,
    pub updated_at: Option<OffsetDateTime>,
}

/// Builder collecting constraints for the filter fields a collection honors.
/// Unset and empty filter lists add nothing.
#[derive(Default)]
struct Constraints(Vec<Constraint>);

impl Constraints {
    fn list(values: &Option<Vec<String>>) -> Option<Vec<String>> {
        values.as_ref().filter(|v| !v.is_empty()).cloned()
    }

    fn any_of(mut self, field: &'static str, values: &Option<Vec<String>>) -> Self {
        if let Some(values) = Self::list(values) {
            self.0.push(Constraint::AnyOf { field, values });
        }
        self
    }

    fn overlaps(mut self, field: &'static str, values: &Option<Vec<String>>) -> Self {
        if let Some(values) = Self::list(values) {
            self.0.push(Constraint::Overlaps { field, values });
        }
        self
    }

    fn contains_any(mut self, field: &'static str, values: &Option<Vec<String>>) -> Self {
        if let Some(values) = Self::list(values) {
            self.0.push(Constraint::ContainsAny { field, values });
        }
        self
    }

    fn created_within(mut self, range: &Option<DateRange>) -> Self {
        if let Some(range) = range {
            if range.start.is_some() || range.end.is_some() {
                self.0.push(Constraint::Between {
                    field: "created_at",
                    start: range.start,
                    end: range.end,
                });
            }
        }
        self
    }

    fn flag(mut self, field: &'static str, enabled: bool) -> Self {
        if enabled {
            self.0.push(Constraint::IsTrue(field));
        }
        self
    }

    fn build(self) -> Vec<Constraint> {
        self.0
    }
}

impl ContentRecord for JobRecord {
    const CONTENT_TYPE: ContentType = ContentType::Job;
    const COLLECTION: &'static str = "jobs";
    const TEXT_FIELDS: &'static [&'static str] = &["title", "description", "requirements"];

    fn baseline() -> Vec<Constraint> {
        vec![Constraint::IsTrue("is_active")]
    }

    fn constraints(filters: &SearchFilters) -> Vec<Constraint> {
        let mut constraints = Constraints::default()
            .any_of("employment_type", &filters.employment_types)
            .any_of("experience_level", &filters.experience_levels)
            .overlaps("climate_focus", &filters.climate_sectors)
            .contains_any("location", &filters.locations)
            .flag("remote_friendly", filters.remote_friendly == Some(true))
            .flag("verified", filters.verified_only())
            .created_within(&filters.date_range);

        // Overlap of the requested range with the posting's own range
        if let Some(salary) = filters.salary_range {
            if let Some(min) = salary.min {
                constraints.0.push(Constraint::AtLeast {
                    field: "salary_max",
                    value: min,
                });
            }
            if let Some(max) = salary.max {
                constraints.0.push(Constraint::AtMost {
                    field: "salary_min",
                    value: max,
                });
            }
        }

        constraints.build()
    }

    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "title" => FieldValue::Text(Some(&self.title)),
            "description" => FieldValue::Text(self.description.as_deref()),
            "requirements" => FieldValue::Text(self.requirements.as_deref()),
            "employment_type" => FieldValue::Text(self.employment_type.as_deref()),
            "experience_level" => FieldValue::Text(self.experience_level.as_deref()),
            "location" => FieldValue::Text(self.location.as_deref()),
            "salary_min" => FieldValue::Number(self.salary_min),
            "salary_max" => FieldValue::Number(self.salary_max),
            "remote_friendly" => FieldValue::Bool(self.remote_friendly),
            "climate_focus" => FieldValue::List(&self.climate_focus),
            "verified" => FieldValue::Bool(self.verified),
            "is_active" => FieldValue::Bool(self.is_active),
            "created_at" => FieldValue::Timestamp(self.created_at),
            "updated_at" => FieldValue::Timestamp(self.updated_at),
            _ => FieldValue::Missing,
        }
    }

    fn into_result(self, relevance_score: f64, highlights: Vec<String>) -> SearchResult {
        SearchResult {
            id: self.id,
            title: self.title,
            description: self.description,
            relevance_score,
            highlights,
            metadata: ResultMetadata::Job(JobMetadata {
                organization_name: self.organization_name,
                employment_type: self.employment_type,
                experience_level: self.experience_level,
                location: self.location,
                salary_min: self.salary_min,
                salary_max: self.salary_max,
                remote_friendly: self.remote_friendly,
                climate_focus: self.climate_focus,
                verified: self.verified,
            }),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl ContentRecord for ResourceRecord {
    const CONTENT_TYPE: ContentType = ContentType::Resource;
    const COLLECTION: &'static str = "resources";
    const TEXT_FIELDS: &'static [&'static str] = &["title", "description", "content"];

    fn baseline() -> Vec<Constraint> {
        vec![Constraint::IsTrue("is_published")]
    }

    fn constraints(filters: &SearchFilters) -> Vec<Constraint> {
        Constraints::default()
            .any_of("category", &filters.categories)
            .any_of("difficulty_level", &filters.difficulty_levels)
            .overlaps("climate_focus", &filters.climate_sectors)
            .flag("verified", filters.verified_only())
            .created_within(&filters.date_range)
            .build()
    }

    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "title" => FieldValue::Text(Some(&self.title)),
            "description" => FieldValue::Text(self.description.as_deref()),
            "content" => FieldValue::Text(self.content.as_deref()),
            "category" => FieldValue::Text(self.category.as_deref()),
            "difficulty_level" => FieldValue::Text(self.difficulty_level.as_deref()),
            "climate_focus" => FieldValue::List(&self.climate_focus),
            "verified" => FieldValue::Bool(self.verified),
            "is_published" => FieldValue::Bool(self.is_published),
            "created_at" => FieldValue::Timestamp(self.created_at),
            "updated_at" => FieldValue::Timestamp(self.updated_at),
            _ => FieldValue::Missing,
        }
    }

    fn into_result(self, relevance_score: f64, highlights: Vec<String>) -> SearchResult {
        SearchResult {
            id: self.id,
            title: self.title,
            description: self.description,
            relevance_score,
            highlights,
            metadata: ResultMetadata::Resource(ResourceMetadata {
                category: self.category,
                difficulty_level: self.difficulty_level,
                author: self.author,
                reading_time_minutes: self.reading_time_minutes,
                climate_focus: self.climate_focus,
                verified: self.verified,
            }),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl ContentRecord for PartnerRecord {
    const CONTENT_TYPE: ContentType = ContentType::Partner;
    const COLLECTION: &'static str = "partners";
    const TEXT_FIELDS: &'static [&'static str] = &["name", "description", "mission"];

    fn baseline() -> Vec<Constraint> {
        vec![Constraint::IsTrue("verified")]
    }

    // Partners are verified by baseline, so `verified_only` adds nothing
    fn constraints(filters: &SearchFilters) -> Vec<Constraint> {
        Constraints::default()
            .any_of("organization_type", &filters.organization_types)
            .any_of("partnership_level", &filters.partnership_levels)
            .overlaps("climate_focus", &filters.climate_sectors)
            .contains_any("location", &filters.locations)
            .created_within(&filters.date_range)
            .build()
    }

    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "name" => FieldValue::Text(Some(&self.name)),
            "description" => FieldValue::Text(self.description.as_deref()),
            "mission" => FieldValue::Text(self.mission.as_deref()),
            "organization_type" => FieldValue::Text(self.organization_type.as_deref()),
            "partnership_level" => FieldValue::Text(self.partnership_level.as_deref()),
            "location" => FieldValue::Text(self.location.as_deref()),
            "climate_focus" => FieldValue::List(&self.climate_focus),
            "verified" => FieldValue::Bool(self.verified),
            "created_at" => FieldValue::Timestamp(self.created_at),
            "updated_at" => FieldValue::Timestamp(self.updated_at),
            _ => FieldValue::Missing,
        }
    }

    fn into_result(self, relevance_score: f64, highlights: Vec<String>) -> SearchResult {
        SearchResult {
            id: self.id,
            title: self.name,
            description: self.description,
            relevance_score,
            highlights,
            metadata: ResultMetadata::Partner(PartnerMetadata {
                organization_type: self.organization_type,
                partnership_level: self.partnership_level,
                location: self.location,
                website: self.website,
                climate_focus: self.climate_focus,
                verified: self.verified,
            }),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl ContentRecord for ProgramRecord {
    const CONTENT_TYPE: ContentType = ContentType::Program;
    const COLLECTION: &'static str = "programs";
    const TEXT_FIELDS: &'static [&'static str] = &["title", "description", "provider"];

    fn baseline() -> Vec<Constraint> {
        vec![Constraint::IsTrue("is_active")]
    }

    fn constraints(filters: &SearchFilters) -> Vec<Constraint> {
        Constraints::default()
            .any_of("program_type", &filters.categories)
            .any_of("difficulty_level", &filters.difficulty_levels)
            .overlaps("climate_focus", &filters.climate_sectors)
            .contains_any("location", &filters.locations)
            .flag("verified", filters.verified_only())
            .created_within(&filters.date_range)
            .build()
    }

    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "title" => FieldValue::Text(Some(&self.title)),
            "description" => FieldValue::Text(self.description.as_deref()),
            "provider" => FieldValue::Text(self.provider.as_deref()),
            "program_type" => FieldValue::Text(self.program_type.as_deref()),
            "difficulty_level" => FieldValue::Text(self.difficulty_level.as_deref()),
            "location" => FieldValue::Text(self.location.as_deref()),
            "cost" => FieldValue::Number(self.cost),
            "climate_focus" => FieldValue::List(&self.climate_focus),
            "verified" => FieldValue::Bool(self.verified),
            "is_active" => FieldValue::Bool(self.is_active),
            "created_at" => FieldValue::Timestamp(self.created_at),
            "updated_at" => FieldValue::Timestamp(self.updated_at),
            _ => FieldValue::Missing,
        }
    }

    fn into_result(self, relevance_score: f64, highlights: Vec<String>) -> SearchResult {
        SearchResult {
            id: self.id,
            title: self.title,
            description: self.description,
            relevance_score,
            highlights,
            metadata: ResultMetadata::Program(ProgramMetadata {
                provider: self.provider,
                program_type: self.program_type,
                difficulty_level: self.difficulty_level,
                duration: self.duration,
                cost: self.cost,
                format: self.format,
                location: self.location,
                climate_focus: self.climate_focus,
                verified: self.verified,
            }),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
