//! Cart limits configuration.

use chrono::Duration;

/// Quantity caps and the inactivity threshold enforced on cart mutations.
///
/// The inactivity threshold is configuration, not a constant: observed
/// revisions of the original service disagreed on the value (1 vs 3
/// minutes), so deployments pick their own. The default keeps the more
/// lenient of the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartLimits {
    /// Maximum total units across all items of a cart.
    pub max_total_quantity: u32,
    /// Maximum units of any single product in a cart.
    pub max_per_product: u32,
    /// Inactivity window after which a cart expires. Expiry is evaluated
    /// lazily on access; there is no background sweeper.
    pub inactivity_timeout: Duration,
}

impl CartLimits {
    pub fn new(
        max_total_quantity: u32,
        max_per_product: u32,
        inactivity_timeout: Duration,
    ) -> Self {
        Self {
            max_total_quantity,
            max_per_product,
            inactivity_timeout,
        }
    }

    /// Default caps with a custom inactivity window.
    pub fn with_inactivity_timeout(inactivity_timeout: Duration) -> Self {
        Self {
            inactivity_timeout,
            ..Self::default()
        }
    }
}

impl Default for CartLimits {
    fn default() -> Self {
        Self {
            max_total_quantity: 15,
            max_per_product: 10,
            inactivity_timeout: Duration::minutes(3),
        }
    }
}
