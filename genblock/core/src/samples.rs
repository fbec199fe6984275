//! Sample Provider
//!
//! Replacement content is never generated for real: every unit is drawn
//! uniformly, with replacement, from a fixed pool of sample sentences for the
//! block's kind. Pools and the random source are passed in explicitly so a
//! seeded RNG gives fully deterministic sessions in tests.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::content::ContentKind;

/// Default paragraph samples
pub const PARAGRAPH_SAMPLES: &[&str] = &[
    "Our latest analysis indicates a significant shift in consumer behavior toward sustainable products, with a 42% increase in eco-friendly purchases among millennials.",
    "The technological integration across departments has resulted in a 35% reduction in processing time and a marked improvement in cross-functional collaboration.",
    "Market research suggests that early adoption of AI-powered solutions correlates strongly with increased revenue growth in the following fiscal quarters.",
];

/// Default bullet samples
pub const BULLET_SAMPLES: &[&str] = &[
    "Complete user research interviews with 5 enterprise clients",
    "Update product roadmap to reflect new market priorities",
    "Schedule strategic planning session with leadership team",
    "Create documentation for the new API endpoints",
];

/// The fixed sample pools, one per content kind
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplePools {
    /// Pool for [`ContentKind::Paragraph`]
    pub paragraph: Vec<String>,
    /// Pool for [`ContentKind::BulletList`]
    pub bullet: Vec<String>,
}

impl Default for SamplePools {
    fn default() -> Self {
        Self {
            paragraph: PARAGRAPH_SAMPLES.iter().map(|s| (*s).to_string()).collect(),
            bullet: BULLET_SAMPLES.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

impl SamplePools {
    /// Pool for a kind
    #[must_use]
    pub fn pool(&self, kind: ContentKind) -> &[String] {
        match kind {
            ContentKind::Paragraph => &self.paragraph,
            ContentKind::BulletList => &self.bullet,
        }
    }

    /// Fail if any pool is empty
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyPool`] naming the first empty kind.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for kind in [ContentKind::Paragraph, ContentKind::BulletList] {
            if self.pool(kind).is_empty() {
                return Err(ConfigError::EmptyPool { kind });
            }
        }
        Ok(())
    }
}

/// Draws replacement units from the sample pools
pub struct SampleProvider {
    pools: SamplePools,
    rng: Box<dyn RngCore + Send>,
}

impl SampleProvider {
    /// Create a provider seeded from OS entropy
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyPool`] if either pool is empty.
    pub fn new(pools: SamplePools) -> Result<Self, ConfigError> {
        Self::with_rng(pools, StdRng::from_entropy())
    }

    /// Create a provider with a deterministic seed
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyPool`] if either pool is empty.
    pub fn seeded(pools: SamplePools, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(pools, StdRng::seed_from_u64(seed))
    }

    /// Create a provider with an injected random source
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyPool`] if either pool is empty.
    pub fn with_rng(pools: SamplePools, rng: impl RngCore + Send + 'static) -> Result<Self, ConfigError> {
        pools.validate()?;
        Ok(Self {
            pools,
            rng: Box::new(rng),
        })
    }

    /// The pools this provider draws from
    #[must_use]
    pub fn pools(&self) -> &SamplePools {
        &self.pools
    }

    /// Draw exactly `count` units for `kind`
    ///
    /// Each unit is sampled independently and uniformly with replacement.
    pub fn draw(&mut self, kind: ContentKind, count: usize) -> Vec<String> {
        let pool = self.pools.pool(kind);
        // Pools are validated non-empty at construction
        (0..count)
            .map(|_| pool[self.rng.gen_range(0..pool.len())].clone())
            .collect()
    }
}
