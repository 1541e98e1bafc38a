//! Value histograms over a result set, used for filter affordances.

use std::collections::HashMap;

use strum::IntoEnumIterator;

use super::types::{FacetCount, FacetDimension, Facets, ResultMetadata, SearchResult};

const MAX_FACET_VALUES: usize = 10;

/// Values a result contributes to `dimension`. Empty when it has none.
fn facet_values(result: &SearchResult, dimension: FacetDimension) -> Vec<String> {
    let single = |value: &Option<String>| -> Vec<String> { value.iter().cloned().collect() };

    match (dimension, &result.metadata) {
        (FacetDimension::ContentType, _) => vec![result.content_type().to_string()],
        (FacetDimension::ClimateFocus, metadata) => metadata.climate_focus().to_vec(),
        (FacetDimension::OrganizationType, ResultMetadata::Partner(m)) => {
            single(&m.organization_type)
        }
        (FacetDimension::PartnershipLevel, ResultMetadata::Partner(m)) => {
            single(&m.partnership_level)
        }
        (FacetDimension::EmploymentType, ResultMetadata::Job(m)) => single(&m.employment_type),
        (FacetDimension::ExperienceLevel, ResultMetadata::Job(m)) => single(&m.experience_level),
        _ => Vec::new(),
    }
}

/// Count values per facet dimension over `results`.
///
/// Every dimension is present in the output, possibly with no values. Each
/// list is sorted by count descending (ties by value) and holds at most ten
/// entries.
pub fn aggregate_facets(results: &[SearchResult]) -> Facets {
    FacetDimension::iter()
        .map(|dimension| {
            let mut counts: HashMap<String, usize> = HashMap::new();
            for result in results {
                for value in facet_values(result, dimension) {
                    if !value.is_empty() {
                        *counts.entry(value).or_insert(0) += 1;
                    }
                }
            }

            let mut values: Vec<FacetCount> = counts
                .into_iter()
                .map(|(value, count)| FacetCount { value, count })
                .collect();
            values.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
            values.truncate(MAX_FACET_VALUES);

            (dimension, values)
        })
        .collect()
}
