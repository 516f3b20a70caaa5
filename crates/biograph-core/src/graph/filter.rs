//! Per-category visibility filter.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::category::Category;
use super::model::GraphEdge;
use super::store::GraphStore;

/// Errors raised by filter edits.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("{0} nodes are always shown and cannot be filtered")]
    NotFilterable(Category),
}

/// How category limits react when a merge changes the available counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LimitPolicy {
    /// Every limit jumps to the new available count.
    #[default]
    ResetToAvailable,
    /// A limit the user narrowed stays narrowed; a limit that was showing
    /// everything keeps showing everything.
    PreserveNarrowed,
}

impl FromStr for LimitPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reset-to-available" | "reset" => Ok(LimitPolicy::ResetToAvailable),
            "preserve-narrowed" | "preserve" => Ok(LimitPolicy::PreserveNarrowed),
            other => Err(other.to_string()),
        }
    }
}

/// Filter settings for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryFilter {
    pub enabled: bool,
    pub limit: usize,
}

impl CategoryFilter {
    /// Number of nodes this entry lets through. Disabled means none.
    pub fn effective_limit(&self) -> usize {
        if self.enabled {
            self.limit
        } else {
            0
        }
    }
}

impl Default for CategoryFilter {
    fn default() -> Self {
        Self {
            enabled: true,
            limit: 0,
        }
    }
}

/// Filter entries for every filterable category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterConfig {
    entries: BTreeMap<Category, CategoryFilter>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            entries: Category::FILTERABLE
                .iter()
                .map(|c| (*c, CategoryFilter::default()))
                .collect(),
        }
    }
}

impl FilterConfig {
    /// Overlay saved entries on the defaults, dropping anything that is not
    /// a filterable category.
    pub fn normalized(self) -> Self {
        let mut config = Self::default();
        for (category, filter) in self.entries {
            if category.is_filterable() {
                config.entries.insert(category, filter);
            }
        }
        config
    }

    pub fn get(&self, category: Category) -> Option<&CategoryFilter> {
        self.entries.get(&category)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &CategoryFilter)> {
        self.entries.iter().map(|(c, f)| (*c, f))
    }

    fn entry_mut(&mut self, category: Category) -> Result<&mut CategoryFilter, FilterError> {
        if !category.is_filterable() {
            return Err(FilterError::NotFilterable(category));
        }
        Ok(self.entries.entry(category).or_default())
    }

    pub fn set_enabled(&mut self, category: Category, enabled: bool) -> Result<(), FilterError> {
        self.entry_mut(category)?.enabled = enabled;
        Ok(())
    }

    /// Flip a category's enabled flag, returning the new value.
    pub fn toggle(&mut self, category: Category) -> Result<bool, FilterError> {
        let entry = self.entry_mut(category)?;
        entry.enabled = !entry.enabled;
        Ok(entry.enabled)
    }

    /// Set a category's limit, clamped into `[0, available]`.
    ///
    /// Returns the value actually stored.
    pub fn set_limit(
        &mut self,
        category: Category,
        requested: i64,
        available: usize,
    ) -> Result<usize, FilterError> {
        let clamped = if requested <= 0 {
            0
        } else {
            usize::try_from(requested).unwrap_or(usize::MAX).min(available)
        };
        self.entry_mut(category)?.limit = clamped;
        Ok(clamped)
    }

    /// Update limits after the store changed from `previous` to `current` counts.
    pub fn apply_counts(
        &mut self,
        previous: &BTreeMap<Category, usize>,
        current: &BTreeMap<Category, usize>,
        policy: LimitPolicy,
    ) {
        for (category, filter) in self.entries.iter_mut() {
            let available = current.get(category).copied().unwrap_or(0);
            filter.limit = match policy {
                LimitPolicy::ResetToAvailable => available,
                LimitPolicy::PreserveNarrowed => {
                    let before = previous.get(category).copied().unwrap_or(0);
                    if filter.limit >= before {
                        available
                    } else {
                        filter.limit.min(available)
                    }
                }
            };
        }
    }

    /// Clamp every limit to the available count.
    pub fn reclamp(&mut self, counts: &BTreeMap<Category, usize>) {
        for (category, filter) in self.entries.iter_mut() {
            let available = counts.get(category).copied().unwrap_or(0);
            filter.limit = filter.limit.min(available);
        }
    }
}

/// The node and edge ids that should currently be rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Visibility {
    nodes: HashSet<String>,
    edges: HashSet<String>,
}

impl Visibility {
    pub fn is_node_visible(&self, id: &str) -> bool {
        self.nodes.contains(id)
    }

    /// Visible iff both endpoints are visible.
    pub fn is_edge_visible(&self, edge: &GraphEdge) -> bool {
        self.nodes.contains(&edge.source) && self.nodes.contains(&edge.target)
    }

    pub fn node_ids(&self) -> &HashSet<String> {
        &self.nodes
    }

    pub fn edge_ids(&self) -> &HashSet<String> {
        &self.edges
    }

    pub fn visible_node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn visible_edge_count(&self) -> usize {
        self.edges.len()
    }
}

/// Compute the visible-id set.
///
/// Publications are always visible. Every other category contributes its
/// first `limit` nodes in insertion order when enabled, and nothing otherwise.
pub fn compute_visibility(store: &GraphStore, filters: &FilterConfig) -> Visibility {
    let mut visibility = Visibility::default();
    let mut taken: HashMap<Category, usize> = HashMap::new();

    for node in store.nodes() {
        if !node.category.is_filterable() {
            visibility.nodes.insert(node.id.clone());
            continue;
        }
        let cap = filters
            .get(node.category)
            .map(CategoryFilter::effective_limit)
            .unwrap_or(0);
        let used = taken.entry(node.category).or_insert(0);
        if *used < cap {
            *used += 1;
            visibility.nodes.insert(node.id.clone());
        }
    }

    let visible_edges: Vec<String> = store
        .edges()
        .filter(|e| visibility.is_edge_visible(e))
        .map(|e| e.id.clone())
        .collect();
    visibility.edges.extend(visible_edges);

    visibility
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(pairs: &[(Category, usize)]) -> BTreeMap<Category, usize> {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_set_limit_clamps() {
        let mut filters = FilterConfig::default();
        assert_eq!(filters.set_limit(Category::Gene, 50, 3), Ok(3));
        assert_eq!(filters.set_limit(Category::Gene, -4, 3), Ok(0));
        assert_eq!(filters.set_limit(Category::Gene, 2, 3), Ok(2));
        assert_eq!(filters.get(Category::Gene).unwrap().limit, 2);
    }

    #[test]
    fn test_publication_rejected() {
        let mut filters = FilterConfig::default();
        assert_eq!(
            filters.set_limit(Category::Publication, 1, 1),
            Err(FilterError::NotFilterable(Category::Publication))
        );
        assert!(filters.toggle(Category::Publication).is_err());
    }

    #[test]
    fn test_reset_policy() {
        let mut filters = FilterConfig::default();
        filters.set_limit(Category::Gene, 5, 50).unwrap();
        filters.apply_counts(
            &counts(&[(Category::Gene, 50)]),
            &counts(&[(Category::Gene, 60)]),
            LimitPolicy::ResetToAvailable,
        );
        assert_eq!(filters.get(Category::Gene).unwrap().limit, 60);
    }

    #[test]
    fn test_preserve_policy() {
        let mut filters = FilterConfig::default();
        filters.set_limit(Category::Gene, 5, 50).unwrap();
        filters.set_limit(Category::Disease, 10, 10).unwrap();
        filters.apply_counts(
            &counts(&[(Category::Gene, 50), (Category::Disease, 10)]),
            &counts(&[(Category::Gene, 60), (Category::Disease, 12)]),
            LimitPolicy::PreserveNarrowed,
        );
        assert_eq!(filters.get(Category::Gene).unwrap().limit, 5);
        assert_eq!(filters.get(Category::Disease).unwrap().limit, 12);
    }

    #[test]
    fn test_normalized_drops_publication() {
        let json = r#"{"Publication": {"enabled": false, "limit": 0}, "Gene": {"enabled": false, "limit": 2}}"#;
        let filters: FilterConfig = serde_json::from_str(json).unwrap();
        let filters = filters.normalized();
        assert!(filters.get(Category::Publication).is_none());
        assert_eq!(
            filters.get(Category::Gene),
            Some(&CategoryFilter {
                enabled: false,
                limit: 2
            })
        );
        assert_eq!(filters.get(Category::Disease), Some(&CategoryFilter::default()));
    }

    #[test]
    fn test_limit_policy_parse() {
        assert_eq!("preserve".parse::<LimitPolicy>(), Ok(LimitPolicy::PreserveNarrowed));
        assert_eq!("reset-to-available".parse::<LimitPolicy>(), Ok(LimitPolicy::ResetToAvailable));
        assert!("sometimes".parse::<LimitPolicy>().is_err());
    }
}
