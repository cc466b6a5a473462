//! Static category to tag mapping, loaded once and shared read-only

use crate::io::error::{MoodboardError, Result};
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Label used when a tag must be invented but the taxonomy is empty
pub const UNTAGGED: &str = "untagged";

/// A named, ordered group of tags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Display name of the category
    pub name: String,
    /// Member tags in declared order
    pub tags: Vec<String>,
}

/// Immutable tag taxonomy
///
/// Category order and tag order are preserved exactly as declared; both matter to
/// the similarity resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Taxonomy {
    categories: Vec<Category>,
    all_tags: Vec<String>,
}

const BUILTIN: &[(&str, &[&str])] = &[
    (
        "Mediums",
        &[
            "illustration",
            "collage",
            "3D render",
            "motion graphics",
            "animation",
            "painting",
            "drawing",
            "sculpture",
            "printmaking",
            "installation art",
            "AR/VR",
            "AI-generated",
            "cinematography",
            "fashion design",
            "product design",
            "industrial design",
            "UI design",
            "architecture",
            "interior design",
        ],
    ),
    (
        "Composition/Elements",
        &[
            "layout",
            "grid system",
            "negative space",
            "balance",
            "asymmetry",
            "overlap",
            "depth",
        ],
    ),
    (
        "Symbolic/Semiotic",
        &[
            "iconography",
            "diagram",
            "map",
            "infographic",
            "emoji",
            "logomark",
            "pictogram",
        ],
    ),
    (
        "Techniques",
        &[
            "double exposure",
            "halftone",
            "glitch",
            "pixel art",
            "datamoshing",
            "silhouette",
            "line art",
            "scanography",
            "hand-drawn",
        ],
    ),
    (
        "Texture/Material",
        &[
            "metal", "glass", "concrete", "plastic", "paper", "fabric", "wood", "skin", "fur",
            "water", "fire", "smoke", "dust", "mirror",
        ],
    ),
    (
        "Color Families",
        &[
            "black & white",
            "monochrome",
            "neon",
            "pastel",
            "primary colors",
            "complementary",
            "analogous",
            "duotone",
            "CMYK",
            "RGB",
        ],
    ),
    (
        "Color Temperatures",
        &["warm", "cool", "neutral", "vivid", "muted"],
    ),
    (
        "Color Keywords",
        &[
            "earth tones",
            "sunset tones",
            "underwater tones",
            "futuristic palette",
            "natural palette",
            "nostalgic palette",
            "psychedelic colors",
            "vaporwave palette",
            "minimal palette",
            "high contrast",
        ],
    ),
    (
        "Style/Aesthetic",
        &[
            "brutalism",
            "minimalism",
            "maximalism",
            "cyberpunk",
            "solarpunk",
            "biophilic",
            "memphis",
            "bauhaus",
            "de stijl",
            "baroque",
            "vintage",
            "retro-futurism",
            "Y2K",
            "new ugly",
            "editorial",
            "high fashion",
            "corporate memphis",
            "dada",
            "surrealism",
            "art deco",
            "modernist",
        ],
    ),
    (
        "Mood/Vibe",
        &[
            "dreamy",
            "gritty",
            "ethereal",
            "industrial",
            "romantic",
            "playful",
            "melancholy",
            "serene",
            "bold",
            "mysterious",
            "chaotic",
            "clinical",
            "organic",
            "eerie",
            "luxurious",
        ],
    ),
    (
        "Contextual",
        &[
            "editorial layout",
            "poster design",
            "book cover",
            "packaging",
            "social post",
            "web landing page",
            "billboard",
            "pitch deck",
            "logo system",
            "ad campaign",
        ],
    ),
];

impl Taxonomy {
    /// Build a taxonomy from categories in declared order
    pub fn new(categories: Vec<Category>) -> Self {
        let all_tags = categories
            .iter()
            .flat_map(|category| category.tags.iter().cloned())
            .collect();
        Self {
            categories,
            all_tags,
        }
    }

    /// The default design taxonomy
    pub fn builtin() -> Self {
        Self::new(
            BUILTIN
                .iter()
                .map(|(name, tags)| Category {
                    name: (*name).to_string(),
                    tags: tags.iter().map(|tag| (*tag).to_string()).collect(),
                })
                .collect(),
        )
    }

    /// Parse a taxonomy from a JSON array of `{"name", "tags"}` objects
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a JSON array of categories
    pub fn from_json(text: &str) -> Result<Self> {
        let categories: Vec<Category> =
            serde_json::from_str(text).map_err(|source| MoodboardError::TaxonomyParse {
                path: "<inline>".into(),
                source,
            })?;
        Ok(Self::new(categories))
    }

    /// Load a taxonomy from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a JSON array of categories
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| MoodboardError::FileSystem {
            path: path.to_path_buf(),
            operation: "read taxonomy",
            source,
        })?;
        let categories: Vec<Category> =
            serde_json::from_str(&text).map_err(|source| MoodboardError::TaxonomyParse {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::new(categories))
    }

    /// Categories in declared order
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Every tag of every category, in declaration order
    pub fn all_tags(&self) -> &[String] {
        &self.all_tags
    }

    /// First category that declares `tag`
    pub fn category_of(&self, tag: &str) -> Option<&Category> {
        self.categories
            .iter()
            .find(|category| category.tags.iter().any(|t| t == tag))
    }

    /// Whether any category declares `tag`
    pub fn contains(&self, tag: &str) -> bool {
        self.all_tags.iter().any(|t| t == tag)
    }

    /// Uniformly drawn tag, or [`UNTAGGED`] for an empty taxonomy
    pub fn random_tag<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        self.all_tags
            .choose(rng)
            .cloned()
            .unwrap_or_else(|| UNTAGGED.to_string())
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::builtin()
    }
}
