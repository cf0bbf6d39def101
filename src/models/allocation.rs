//! Category allocation model
//!
//! Turns total period income and a set of category weights into absolute
//! per-category amounts, with the unassigned remainder tracked as an
//! explicit pseudo-category that can absorb future deficits.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;

/// Name of the pseudo-category holding income not assigned to any
/// real category. It participates in cross-category redistribution
/// like any other source.
pub const UNALLOCATED: &str = "Unallocated";

/// Priority rank assigned to the unallocated remainder. Rank 0 makes it
/// the first source drawn on when deficits occur.
pub const UNALLOCATED_PRIORITY: u32 = 0;

/// Tolerance for floating-point weight sums
const WEIGHT_SUM_EPSILON: f64 = 1e-9;

/// User-supplied configuration for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryConfig {
    /// Category name
    pub name: String,

    /// Fraction of period income assigned to this category (0-1)
    pub weight: f64,

    /// Priority rank; lower rank = more discretionary = drawn on first
    /// when another category runs a deficit
    pub priority: u32,
}

impl CategoryConfig {
    pub fn new(name: impl Into<String>, weight: f64, priority: u32) -> Self {
        Self {
            name: name.into(),
            weight,
            priority,
        }
    }
}

/// Absolute allocation for one category in one period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAllocation {
    /// Category name
    pub category: String,

    /// Fraction of income this category received
    pub weight: f64,

    /// Absolute amount for the period, derived from income * weight
    pub amount: Money,

    /// Priority rank; lower rank = drawn on first as a deficit source
    pub priority: u32,
}

impl fmt::Display for CategoryAllocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} ({:.1}%, rank {})",
            self.category,
            self.amount,
            self.weight * 100.0,
            self.priority
        )
    }
}

/// The full set of category allocations for a period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationSet {
    /// Total income the weights were applied to
    pub income: Money,

    /// Per-category allocations, including the unallocated remainder
    pub allocations: Vec<CategoryAllocation>,
}

impl AllocationSet {
    /// Build allocations from income and category weights.
    ///
    /// Amounts are derived with half-to-even rounding; the unassigned
    /// remainder becomes the `UNALLOCATED` pseudo-category so the
    /// allocation totals always sum exactly to the income. Calling this
    /// twice with identical inputs yields identical results.
    pub fn from_weights(
        income: Money,
        configs: &[CategoryConfig],
    ) -> Result<Self, AllocationValidationError> {
        let mut seen = std::collections::HashSet::new();
        let mut weight_sum = 0.0;

        for config in configs {
            if config.name.trim().is_empty() {
                return Err(AllocationValidationError::EmptyName);
            }
            if config.name == UNALLOCATED {
                return Err(AllocationValidationError::ReservedName);
            }
            if !seen.insert(config.name.as_str()) {
                return Err(AllocationValidationError::DuplicateCategory(
                    config.name.clone(),
                ));
            }
            if config.weight < 0.0 || !config.weight.is_finite() {
                return Err(AllocationValidationError::NegativeWeight {
                    category: config.name.clone(),
                    weight: config.weight,
                });
            }
            weight_sum += config.weight;
        }

        if weight_sum > 1.0 + WEIGHT_SUM_EPSILON {
            return Err(AllocationValidationError::WeightSumExceedsOne(weight_sum));
        }

        let mut allocations: Vec<CategoryAllocation> = configs
            .iter()
            .map(|c| CategoryAllocation {
                category: c.name.clone(),
                weight: c.weight,
                amount: income.apply_weight(c.weight),
                priority: c.priority,
            })
            .collect();

        // Rounding can push the assigned total a cent or two past the
        // income when weights sum to 1. Take the jitter back from the
        // largest allocation so the set conserves exactly.
        let assigned: Money = allocations.iter().map(|a| a.amount).sum();
        let mut remainder = income - assigned;
        if remainder.is_negative() {
            if let Some(largest) = allocations.iter_mut().max_by_key(|a| a.amount) {
                largest.amount += remainder;
                remainder = Money::zero();
            }
        }

        allocations.push(CategoryAllocation {
            category: UNALLOCATED.to_string(),
            weight: (1.0 - weight_sum).max(0.0),
            amount: remainder,
            priority: UNALLOCATED_PRIORITY,
        });

        allocations.sort_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then_with(|| a.category.cmp(&b.category))
        });

        Ok(Self {
            income,
            allocations,
        })
    }

    /// Look up one category's allocation
    pub fn get(&self, category: &str) -> Option<&CategoryAllocation> {
        self.allocations.iter().find(|a| a.category == category)
    }

    /// Mutable lookup; used by carryover and recalibration
    pub fn get_mut(&mut self, category: &str) -> Option<&mut CategoryAllocation> {
        self.allocations.iter_mut().find(|a| a.category == category)
    }

    /// Categories in redistribution source order: ascending priority
    /// rank, ties broken by category name
    pub fn by_priority(&self) -> impl Iterator<Item = &CategoryAllocation> {
        // `allocations` is kept sorted in this order by construction
        self.allocations.iter()
    }

    /// Real (non-pseudo) category names
    pub fn category_names(&self) -> Vec<&str> {
        self.allocations
            .iter()
            .filter(|a| a.category != UNALLOCATED)
            .map(|a| a.category.as_str())
            .collect()
    }

    /// Sum of all allocation amounts, including the unallocated remainder
    pub fn total(&self) -> Money {
        self.allocations.iter().map(|a| a.amount).sum()
    }
}

/// Validation errors for allocation configuration
#[derive(Debug, Clone, PartialEq)]
pub enum AllocationValidationError {
    EmptyName,
    ReservedName,
    DuplicateCategory(String),
    NegativeWeight { category: String, weight: f64 },
    WeightSumExceedsOne(f64),
}

impl fmt::Display for AllocationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Category name cannot be empty"),
            Self::ReservedName => {
                write!(f, "'{}' is reserved for the unassigned remainder", UNALLOCATED)
            }
            Self::DuplicateCategory(name) => write!(f, "Duplicate category: {}", name),
            Self::NegativeWeight { category, weight } => {
                write!(f, "Weight for '{}' must be non-negative, got {}", category, weight)
            }
            Self::WeightSumExceedsOne(sum) => {
                write!(f, "Category weights sum to {:.4}, which exceeds 1", sum)
            }
        }
    }
}

impl std::error::Error for AllocationValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn configs() -> Vec<CategoryConfig> {
        vec![
            CategoryConfig::new("Food", 0.3, 2),
            CategoryConfig::new("Transport", 0.1, 1),
            CategoryConfig::new("Entertainment", 0.1, 1),
        ]
    }

    #[test]
    fn test_from_weights_amounts() {
        let set = AllocationSet::from_weights(Money::from_cents(300_000), &configs()).unwrap();

        assert_eq!(set.get("Food").unwrap().amount.cents(), 90_000);
        assert_eq!(set.get("Transport").unwrap().amount.cents(), 30_000);
        assert_eq!(set.get(UNALLOCATED).unwrap().amount.cents(), 150_000);
        assert_eq!(set.total().cents(), 300_000);
    }

    #[test]
    fn test_idempotent() {
        let income = Money::from_cents(123_456);
        let a = AllocationSet::from_weights(income, &configs()).unwrap();
        let b = AllocationSet::from_weights(income, &configs()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_negative_weight_rejected() {
        let bad = vec![CategoryConfig::new("Food", -0.1, 1)];
        assert!(matches!(
            AllocationSet::from_weights(Money::from_cents(100), &bad),
            Err(AllocationValidationError::NegativeWeight { .. })
        ));
    }

    #[test]
    fn test_weight_sum_over_one_rejected() {
        let bad = vec![
            CategoryConfig::new("Food", 0.7, 1),
            CategoryConfig::new("Rent", 0.5, 2),
        ];
        assert!(matches!(
            AllocationSet::from_weights(Money::from_cents(100), &bad),
            Err(AllocationValidationError::WeightSumExceedsOne(_))
        ));
    }

    #[test]
    fn test_duplicate_rejected() {
        let bad = vec![
            CategoryConfig::new("Food", 0.2, 1),
            CategoryConfig::new("Food", 0.1, 2),
        ];
        assert!(matches!(
            AllocationSet::from_weights(Money::from_cents(100), &bad),
            Err(AllocationValidationError::DuplicateCategory(_))
        ));
    }

    #[test]
    fn test_reserved_name_rejected() {
        let bad = vec![CategoryConfig::new(UNALLOCATED, 0.2, 1)];
        assert!(matches!(
            AllocationSet::from_weights(Money::from_cents(100), &bad),
            Err(AllocationValidationError::ReservedName)
        ));
    }

    #[test]
    fn test_full_allocation_conserves() {
        // Weights summing to exactly 1 with awkward income; rounding
        // jitter must not create or destroy cents.
        let cfg = vec![
            CategoryConfig::new("A", 1.0 / 3.0, 1),
            CategoryConfig::new("B", 1.0 / 3.0, 2),
            CategoryConfig::new("C", 1.0 / 3.0, 3),
        ];
        let income = Money::from_cents(100_001);
        let set = AllocationSet::from_weights(income, &cfg).unwrap();
        assert_eq!(set.total(), income);
        assert!(!set.get(UNALLOCATED).unwrap().amount.is_negative());
    }

    #[test]
    fn test_priority_order_with_name_tiebreak() {
        let set = AllocationSet::from_weights(Money::from_cents(300_000), &configs()).unwrap();
        let order: Vec<_> = set.by_priority().map(|a| a.category.as_str()).collect();
        // Unallocated (rank 0), then rank 1 ties by name, then rank 2
        assert_eq!(order, vec![UNALLOCATED, "Entertainment", "Transport", "Food"]);
    }

    #[test]
    fn test_serialization() {
        let set = AllocationSet::from_weights(Money::from_cents(300_000), &configs()).unwrap();
        let json = serde_json::to_string(&set).unwrap();
        let deserialized: AllocationSet = serde_json::from_str(&json).unwrap();
        assert_eq!(set, deserialized);
    }
}
