//! Posting Filters
//!
//! The browsing filter (origin province, destination province, truck type).
//! Province fields match case-insensitively on any substring; truck type
//! matches exactly. The SQL side uses `ILIKE` with [`PostingFilter::origin_pattern`]
//! and friends, the in-memory side uses [`PostingFilter::matches`].

use serde::{Deserialize, Serialize};

/// Filter applied when browsing postings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingFilter {
    /// Partial, case-insensitive origin province.
    #[serde(default)]
    pub origin_province: Option<String>,

    /// Partial, case-insensitive destination province.
    #[serde(default)]
    pub destination_province: Option<String>,

    /// Exact truck type.
    #[serde(default)]
    pub truck_type: Option<String>,
}

impl PostingFilter {
    /// Build a filter, treating blank strings as absent.
    pub fn new(
        origin_province: Option<String>,
        destination_province: Option<String>,
        truck_type: Option<String>,
    ) -> Self {
        Self {
            origin_province: non_blank(origin_province),
            destination_province: non_blank(destination_province),
            truck_type: non_blank(truck_type),
        }
    }

    /// A copy with blank fields removed.
    #[must_use]
    pub fn normalised(&self) -> Self {
        Self::new(
            self.origin_province.clone(),
            self.destination_province.clone(),
            self.truck_type.clone(),
        )
    }

    /// Whether no narrowing is requested.
    pub fn is_empty(&self) -> bool {
        let normalised = self.normalised();

        normalised.origin_province.is_none()
            && normalised.destination_province.is_none()
            && normalised.truck_type.is_none()
    }

    /// `ILIKE` pattern for the origin province.
    pub fn origin_pattern(&self) -> Option<String> {
        self.origin_province.as_deref().and_then(contains_pattern)
    }

    /// `ILIKE` pattern for the destination province.
    pub fn destination_pattern(&self) -> Option<String> {
        self.destination_province
            .as_deref()
            .and_then(contains_pattern)
    }

    /// Exact truck type, trimmed.
    pub fn truck_type(&self) -> Option<&str> {
        self.truck_type
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    /// In-memory equivalent of the SQL predicate.
    pub fn matches(
        &self,
        origin_province: Option<&str>,
        destination_province: Option<&str>,
        truck_type: &str,
    ) -> bool {
        province_matches(self.origin_province.as_deref(), origin_province)
            && province_matches(self.destination_province.as_deref(), destination_province)
            && self.truck_type().is_none_or(|wanted| wanted == truck_type)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn province_matches(wanted: Option<&str>, actual: Option<&str>) -> bool {
    let Some(wanted) = wanted.map(str::trim).filter(|value| !value.is_empty()) else {
        return true;
    };

    actual.is_some_and(|actual| actual.to_lowercase().contains(&wanted.to_lowercase()))
}

/// `%value%` with `LIKE` metacharacters escaped (backslash is Postgres' default
/// escape character).
fn contains_pattern(value: &str) -> Option<String> {
    let value = value.trim();

    if value.is_empty() {
        return None;
    }

    let mut pattern = String::with_capacity(value.len() + 2);

    pattern.push('%');

    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }

        pattern.push(ch);
    }

    pattern.push('%');

    Some(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(origin: Option<&str>, destination: Option<&str>, truck: Option<&str>) -> PostingFilter {
        PostingFilter::new(
            origin.map(str::to_string),
            destination.map(str::to_string),
            truck.map(str::to_string),
        )
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = PostingFilter::default();

        assert!(filter.is_empty());
        assert!(filter.matches(None, None, "semi"));
        assert!(filter.matches(Some("Córdoba"), Some("Salta"), "chasis"));
    }

    #[test]
    fn blank_strings_are_ignored() {
        let filter = filter(Some("  "), Some(""), Some(" "));

        assert!(filter.is_empty());
        assert_eq!(filter.origin_pattern(), None);
        assert_eq!(filter.truck_type(), None);
    }

    #[test]
    fn provinces_match_partially_and_case_insensitively() {
        let filter = filter(Some("buenos"), Some("CÓRD"), None);

        assert!(filter.matches(Some("Buenos Aires"), Some("Córdoba"), "semi"));
        assert!(!filter.matches(Some("Santa Fe"), Some("Córdoba"), "semi"));
        assert!(!filter.matches(None, Some("Córdoba"), "semi"));
    }

    #[test]
    fn truck_type_matches_exactly() {
        let filter = filter(None, None, Some("semi"));

        assert!(filter.matches(None, None, "semi"));
        assert!(!filter.matches(None, None, "semirremolque"));
        assert!(!filter.matches(None, None, "Semi"));
    }

    #[test]
    fn patterns_escape_like_metacharacters() {
        let filter = filter(Some("50%_off\\"), Some(" Entre Ríos "), None);

        assert_eq!(filter.origin_pattern().as_deref(), Some("%50\\%\\_off\\\\%"));
        assert_eq!(
            filter.destination_pattern().as_deref(),
            Some("%Entre Ríos%")
        );
    }
}
