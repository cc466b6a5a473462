//! Bundled local placeholder images used whenever a fetch comes back short

use crate::board::slot::SlotFill;
use crate::io::configuration::{FALLBACK_DIRECTORY, FALLBACK_IMAGE_COUNT};
use crate::similarity::taxonomy::Taxonomy;
use rand::Rng;
use std::path::PathBuf;

/// Fixed, finite set of `sample1.png` … `sampleN.png`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackImages {
    directory: PathBuf,
    count: usize,
}

impl FallbackImages {
    /// Placeholder set of `count` images under `directory`; `count` is at least 1
    pub fn new(directory: impl Into<PathBuf>, count: usize) -> Self {
        Self {
            directory: directory.into(),
            count: count.max(1),
        }
    }

    /// Number of distinct placeholder images
    pub const fn len(&self) -> usize {
        self.count
    }

    /// Always false; the set holds at least one image
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Location of the placeholder for the `index`-th slot, cycling through the set
    pub fn location(&self, index: usize) -> String {
        self.directory
            .join(format!("sample{}.png", index % self.count + 1))
            .to_string_lossy()
            .into_owned()
    }

    /// Placeholder fill for the `index`-th slot, labelled with a random taxonomy tag
    pub fn fill<R: Rng + ?Sized>(&self, index: usize, taxonomy: &Taxonomy, rng: &mut R) -> SlotFill {
        SlotFill::fallback(self.location(index), taxonomy.random_tag(rng))
    }

    /// Deterministic placeholder fills for a whole board of `count` slots
    pub fn fills<R: Rng + ?Sized>(
        &self,
        count: usize,
        taxonomy: &Taxonomy,
        rng: &mut R,
    ) -> Vec<SlotFill> {
        (0..count).map(|index| self.fill(index, taxonomy, rng)).collect()
    }
}

impl Default for FallbackImages {
    fn default() -> Self {
        Self::new(FALLBACK_DIRECTORY, FALLBACK_IMAGE_COUNT)
    }
}
