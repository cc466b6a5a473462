//! Related-tag lookup and per-slot search tag planning

use crate::io::configuration::RELATED_SAMPLE_SIZE;
use crate::similarity::taxonomy::Taxonomy;
use rand::Rng;
use rand::seq::IndexedRandom;
use std::sync::Arc;

/// Derives related tags from a taxonomy; performs no I/O
#[derive(Debug, Clone)]
pub struct SimilarityResolver {
    taxonomy: Arc<Taxonomy>,
    sample_size: usize,
}

impl SimilarityResolver {
    /// Resolver over `taxonomy` with the default unknown-tag sample size
    pub const fn new(taxonomy: Arc<Taxonomy>) -> Self {
        Self {
            taxonomy,
            sample_size: RELATED_SAMPLE_SIZE,
        }
    }

    /// Override how many candidates an unknown seed yields
    #[must_use]
    pub const fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }

    /// The taxonomy this resolver reads
    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    /// Ordered, duplicate-free candidates related to `seed`
    ///
    /// Tags sharing the seed's category come first in declared order. A seed outside
    /// every category, or alone in its category, yields the first `sample_size`
    /// known tags instead. The seed itself is never returned.
    pub fn related_tags(&self, seed: &str) -> Vec<String> {
        let mut related = Vec::new();
        if let Some(category) = self.taxonomy.category_of(seed) {
            for tag in &category.tags {
                if tag != seed && !related.contains(tag) {
                    related.push(tag.clone());
                }
            }
        }
        if !related.is_empty() {
            return related;
        }

        for tag in self.taxonomy.all_tags() {
            if related.len() >= self.sample_size {
                break;
            }
            if tag != seed && !related.contains(tag) {
                related.push(tag.clone());
            }
        }
        related
    }

    /// Uniformly draw one tag related to `seed`, or the seed when nothing relates
    pub fn draw_related<R: Rng + ?Sized>(&self, seed: &str, rng: &mut R) -> String {
        self.related_tags(seed)
            .choose(rng)
            .cloned()
            .unwrap_or_else(|| seed.to_string())
    }

    /// Search tag for each of `count` new slots
    ///
    /// A non-empty `query` is used for every slot. With an empty query and at least
    /// one seed, every slot independently draws a seed and then a related tag of
    /// it. With neither, every slot searches unfiltered (empty string).
    pub fn plan_search_tags<R: Rng + ?Sized>(
        &self,
        query: &str,
        seeds: &[String],
        count: usize,
        rng: &mut R,
    ) -> Vec<String> {
        let query = query.trim();
        if !query.is_empty() {
            return vec![query.to_string(); count];
        }

        (0..count)
            .map(|_| {
                seeds
                    .choose(rng)
                    .map_or_else(String::new, |seed| self.draw_related(seed, rng))
            })
            .collect()
    }
}
