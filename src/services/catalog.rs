//! Destination catalog backing `GET /autocomplete`.

const BUILT_IN_DESTINATIONS: &[&str] = &[
    "Agra, India",
    "Amritsar, India",
    "Bangalore, India",
    "Goa, India",
    "Hampi, India",
    "Jaipur, India",
    "Jaisalmer, India",
    "Kochi, India",
    "Leh, India",
    "Manali, India",
    "Mumbai, India",
    "Munnar, India",
    "New Delhi, India",
    "Pondicherry, India",
    "Rishikesh, India",
    "Udaipur, India",
    "Varanasi, India",
    "Amsterdam, Netherlands",
    "Bali, Indonesia",
    "Bangkok, Thailand",
    "Barcelona, Spain",
    "Cape Town, South Africa",
    "Dubai, United Arab Emirates",
    "Hanoi, Vietnam",
    "Istanbul, Turkey",
    "Kathmandu, Nepal",
    "Kyoto, Japan",
    "Lisbon, Portugal",
    "London, United Kingdom",
    "Maldives",
    "New York, United States",
    "Paris, France",
    "Prague, Czech Republic",
    "Rome, Italy",
    "Singapore",
    "Sydney, Australia",
    "Tokyo, Japan",
];

/// Minimum query length worth searching for; matches the destination rule.
const MIN_QUERY_LEN: usize = 2;

#[derive(Debug, Clone)]
pub struct DestinationCatalog {
    names: Vec<String>,
    limit: usize,
}

impl DestinationCatalog {
    /// Built-in destinations plus `extra`, de-duplicated case-insensitively.
    pub fn new(extra: &[String], limit: usize) -> Self {
        let mut names: Vec<String> = Vec::with_capacity(BUILT_IN_DESTINATIONS.len() + extra.len());
        for name in BUILT_IN_DESTINATIONS
            .iter()
            .map(|s| s.to_string())
            .chain(extra.iter().map(|s| s.trim().to_string()))
        {
            if !name.is_empty() && !names.iter().any(|n| n.eq_ignore_ascii_case(&name)) {
                names.push(name);
            }
        }

        tracing::info!(destinations = names.len(), "Destination catalog loaded");
        Self { names, limit }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Case-insensitive search: prefix matches first, then substring
    /// matches, each in catalog order, capped at the configured limit.
    pub fn search(&self, query: &str) -> Vec<String> {
        let query = query.trim().to_lowercase();
        if query.chars().count() < MIN_QUERY_LEN {
            return Vec::new();
        }

        let (prefix, contains): (Vec<&String>, Vec<&String>) = self
            .names
            .iter()
            .filter(|n| n.to_lowercase().contains(&query))
            .partition(|n| n.to_lowercase().starts_with(&query));

        prefix
            .into_iter()
            .chain(contains)
            .take(self.limit)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_matches_rank_first() {
        let catalog = DestinationCatalog::new(&[], 8);
        let results = catalog.search("ja");
        assert_eq!(results[0], "Jaipur, India");
        assert_eq!(results[1], "Jaisalmer, India");
        assert!(results.contains(&"Tokyo, Japan".to_string()));
    }

    #[test]
    fn short_queries_return_nothing() {
        let catalog = DestinationCatalog::new(&[], 8);
        assert!(catalog.search("a").is_empty());
        assert!(catalog.search("   ").is_empty());
    }

    #[test]
    fn results_are_capped() {
        let catalog = DestinationCatalog::new(&[], 3);
        assert_eq!(catalog.search("india").len(), 3);
    }

    #[test]
    fn extra_destinations_are_deduplicated() {
        let base = DestinationCatalog::new(&[], 8).len();
        let catalog = DestinationCatalog::new(&["agra, india".into(), "Ooty, India".into()], 8);
        assert_eq!(catalog.len(), base + 1);
        assert_eq!(catalog.search("oot"), vec!["Ooty, India".to_string()]);
    }
}
