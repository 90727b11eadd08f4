//! Generation limits and dynamic budget redistribution.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ConfigError;

/// How many generations to follow in one direction.
///
/// Serializes as a plain integer where `-1` means unlimited, matching the
/// command-line surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum GenerationLimit {
    /// Follow the graph until it runs out.
    #[default]
    Unlimited,
    /// Follow at most this many generations.
    Max(u32),
}

impl GenerationLimit {
    /// Whether a node `generation` steps away from the root may be placed.
    pub fn allows(self, generation: u32) -> bool {
        match self {
            Self::Unlimited => true,
            Self::Max(max) => generation <= max,
        }
    }

    /// Whether this limit is `-1`.
    pub fn is_unlimited(self) -> bool {
        matches!(self, Self::Unlimited)
    }
}

impl TryFrom<i64> for GenerationLimit {
    type Error = ConfigError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Self::Unlimited),
            v => u32::try_from(v)
                .map(Self::Max)
                .map_err(|_| ConfigError::InvalidGenerationLimit(v)),
        }
    }
}

impl From<GenerationLimit> for i64 {
    fn from(limit: GenerationLimit) -> Self {
        match limit {
            GenerationLimit::Unlimited => -1,
            GenerationLimit::Max(max) => max as i64,
        }
    }
}

impl fmt::Display for GenerationLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unlimited => write!(f, "unlimited"),
            Self::Max(max) => write!(f, "{max}"),
        }
    }
}

/// Depth the graph actually reaches around a root, ignoring limits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NaturalDepths {
    /// Ancestor generations available.
    pub ancestors: u32,
    /// Descendant generations available.
    pub descendants: u32,
}

/// Limits the builder applies after redistribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveLimits {
    /// Ancestor limit.
    pub ancestors: GenerationLimit,
    /// Descendant limit.
    pub descendants: GenerationLimit,
}

impl EffectiveLimits {
    /// Use the configured limits unchanged.
    pub fn fixed(ancestors: GenerationLimit, descendants: GenerationLimit) -> Self {
        Self { ancestors, descendants }
    }

    /// Hand each direction's unused budget to the other direction.
    ///
    /// Only applies when both limits are finite. Both slacks are measured
    /// against the configured limits and applied once, at the same time.
    pub fn redistribute(
        ancestors: GenerationLimit,
        descendants: GenerationLimit,
        natural: NaturalDepths,
    ) -> Self {
        match (ancestors, descendants) {
            (GenerationLimit::Max(up), GenerationLimit::Max(down)) => {
                let up_slack = up.saturating_sub(natural.ancestors);
                let down_slack = down.saturating_sub(natural.descendants);
                Self {
                    ancestors: GenerationLimit::Max(up.saturating_add(down_slack)),
                    descendants: GenerationLimit::Max(down.saturating_add(up_slack)),
                }
            }
            _ => Self::fixed(ancestors, descendants),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn natural(ancestors: u32, descendants: u32) -> NaturalDepths {
        NaturalDepths { ancestors, descendants }
    }

    #[test]
    fn test_limit_from_i64() {
        assert_eq!(GenerationLimit::try_from(-1).unwrap(), GenerationLimit::Unlimited);
        assert_eq!(GenerationLimit::try_from(0).unwrap(), GenerationLimit::Max(0));
        assert_eq!(GenerationLimit::try_from(7).unwrap(), GenerationLimit::Max(7));
        assert!(matches!(
            GenerationLimit::try_from(-2),
            Err(ConfigError::InvalidGenerationLimit(-2))
        ));
        assert_eq!(i64::from(GenerationLimit::Unlimited), -1);
    }

    #[test]
    fn test_allows() {
        assert!(GenerationLimit::Max(0).allows(0));
        assert!(!GenerationLimit::Max(0).allows(1));
        assert!(GenerationLimit::Max(2).allows(2));
        assert!(GenerationLimit::Unlimited.allows(u32::MAX));
    }

    #[test]
    fn test_descendant_slack_goes_to_ancestors() {
        let limits = EffectiveLimits::redistribute(
            GenerationLimit::Max(3),
            GenerationLimit::Max(3),
            natural(10, 1),
        );
        assert_eq!(limits.ancestors, GenerationLimit::Max(5));
        assert_eq!(limits.descendants, GenerationLimit::Max(3));
    }

    #[test]
    fn test_slack_uses_configured_limits_on_both_sides() {
        let limits = EffectiveLimits::redistribute(
            GenerationLimit::Max(3),
            GenerationLimit::Max(4),
            natural(1, 2),
        );
        assert_eq!(limits.ancestors, GenerationLimit::Max(5));
        assert_eq!(limits.descendants, GenerationLimit::Max(6));
    }

    #[test]
    fn test_unlimited_side_disables_redistribution() {
        let limits = EffectiveLimits::redistribute(
            GenerationLimit::Unlimited,
            GenerationLimit::Max(3),
            natural(0, 0),
        );
        assert_eq!(limits.ancestors, GenerationLimit::Unlimited);
        assert_eq!(limits.descendants, GenerationLimit::Max(3));
    }
}
