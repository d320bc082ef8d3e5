//! Bills of materials and production orders.

use std::collections::HashSet;
use std::fmt;

use comptoir_shared::types::{
    OutOfRange, QUANTITY_SCALE, checked_cost, checked_quantity, ensure_fits,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::InvalidTransition;
use crate::inventory::{InventoryError, StockRequirement};

const DOCUMENT: &str = "production order";

/// Manufacturing rule violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManufacturingError {
    /// Status change not allowed.
    #[error(transparent)]
    Transition(#[from] InvalidTransition),

    /// BOM has no components.
    #[error("Bill of materials must have at least one component")]
    NoComponents,

    /// Output or production quantity is not positive.
    #[error("Quantity must be greater than zero")]
    NonPositiveQuantity,

    /// A component is the finished product itself.
    #[error("Product {0} cannot be a component of its own bill of materials")]
    SelfReference(Uuid),

    /// A component is listed twice.
    #[error("Component {0} appears more than once")]
    DuplicateComponent(Uuid),

    /// Component stock check failed.
    #[error(transparent)]
    Inventory(#[from] InventoryError),

    /// A quantity or cost does not fit its column.
    #[error(transparent)]
    OutOfRange(#[from] OutOfRange),
}

/// One component line of a BOM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BomComponent {
    /// Component product.
    pub component_id: Uuid,
    /// Quantity needed per `output_quantity` of finished product.
    pub quantity: Decimal,
}

/// A component with its current unit cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CostedComponent {
    /// Component product.
    pub component_id: Uuid,
    /// Quantity per `output_quantity`.
    pub quantity: Decimal,
    /// Current weighted-average cost.
    pub unit_cost: Decimal,
}

/// Validates a BOM definition.
///
/// # Errors
///
/// Returns an error for an empty recipe, non-positive or oversize
/// quantities, a component equal to the product, or a repeated component.
pub fn validate_bom(
    product_id: Uuid,
    output_quantity: Decimal,
    components: &[BomComponent],
) -> Result<(), ManufacturingError> {
    if output_quantity <= Decimal::ZERO {
        return Err(ManufacturingError::NonPositiveQuantity);
    }
    ensure_fits(output_quantity, QUANTITY_SCALE, "output quantity")?;
    if components.is_empty() {
        return Err(ManufacturingError::NoComponents);
    }
    let mut seen = HashSet::new();
    for component in components {
        if component.quantity <= Decimal::ZERO {
            return Err(ManufacturingError::NonPositiveQuantity);
        }
        ensure_fits(component.quantity, QUANTITY_SCALE, "component quantity")?;
        if component.component_id == product_id {
            return Err(ManufacturingError::SelfReference(product_id));
        }
        if !seen.insert(component.component_id) {
            return Err(ManufacturingError::DuplicateComponent(component.component_id));
        }
    }
    Ok(())
}

/// Component quantities needed to produce `production_quantity` units.
///
/// # Errors
///
/// Returns `NonPositiveQuantity` if either quantity is not positive and
/// `OutOfRange` if a requirement does not fit a quantity column.
pub fn material_requirements(
    components: &[BomComponent],
    output_quantity: Decimal,
    production_quantity: Decimal,
) -> Result<Vec<StockRequirement>, ManufacturingError> {
    if output_quantity <= Decimal::ZERO || production_quantity <= Decimal::ZERO {
        return Err(ManufacturingError::NonPositiveQuantity);
    }
    components
        .iter()
        .map(|c| -> Result<StockRequirement, ManufacturingError> {
            let needed = c
                .quantity
                .checked_mul(production_quantity)
                .and_then(|q| q.checked_div(output_quantity));
            Ok(StockRequirement::new(
                c.component_id,
                checked_quantity(needed, "component requirement")?,
            ))
        })
        .collect()
}

/// Material cost of one unit of finished product (4 dp).
///
/// # Errors
///
/// Returns `NonPositiveQuantity` if `output_quantity` is not positive and
/// `OutOfRange` if the cost does not fit a cost column.
pub fn bom_unit_cost(
    components: &[CostedComponent],
    output_quantity: Decimal,
) -> Result<Decimal, ManufacturingError> {
    if output_quantity <= Decimal::ZERO {
        return Err(ManufacturingError::NonPositiveQuantity);
    }
    let batch = components.iter().try_fold(Decimal::ZERO, |acc, c| {
        c.quantity
            .checked_mul(c.unit_cost)
            .and_then(|cost| acc.checked_add(cost))
            .ok_or(OutOfRange { what: "batch cost" })
    })?;
    Ok(checked_cost(batch.checked_div(output_quantity), "unit cost")?)
}

/// Production order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductionStatus {
    /// Scheduled, nothing consumed.
    Planned,
    /// On the shop floor.
    InProgress,
    /// Components consumed, output in stock (final).
    Completed,
    /// Abandoned (final).
    Cancelled,
}

impl ProductionStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a status from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "planned" => Some(Self::Planned),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Returns true while the order can still be started, completed or cancelled.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Planned | Self::InProgress)
    }

    /// Returns true if the order can be deleted.
    #[must_use]
    pub const fn is_deletable(&self) -> bool {
        matches!(self, Self::Planned | Self::Cancelled)
    }

    /// Planned → InProgress.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless planned.
    pub fn start(self) -> Result<Self, ManufacturingError> {
        match self {
            Self::Planned => Ok(Self::InProgress),
            _ => Err(Self::transition(self, Self::InProgress)),
        }
    }

    /// Planned | InProgress → Completed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` for final statuses.
    pub fn complete(self) -> Result<Self, ManufacturingError> {
        if self.is_active() {
            Ok(Self::Completed)
        } else {
            Err(Self::transition(self, Self::Completed))
        }
    }

    /// Planned | InProgress → Cancelled.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` for final statuses.
    pub fn cancel(self) -> Result<Self, ManufacturingError> {
        if self.is_active() {
            Ok(Self::Cancelled)
        } else {
            Err(Self::transition(self, Self::Cancelled))
        }
    }

    fn transition(from: Self, to: Self) -> ManufacturingError {
        InvalidTransition::new(DOCUMENT, from.as_str(), to.as_str()).into()
    }
}

impl fmt::Display for ProductionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn component(quantity: Decimal) -> BomComponent {
        BomComponent {
            component_id: Uuid::new_v4(),
            quantity,
        }
    }

    #[test]
    fn test_validate_bom() {
        let product = Uuid::new_v4();
        let flour = component(dec!(2));
        assert!(validate_bom(product, dec!(10), &[flour, component(dec!(0.5))]).is_ok());

        assert_eq!(
            validate_bom(product, dec!(10), &[]),
            Err(ManufacturingError::NoComponents)
        );
        assert_eq!(
            validate_bom(product, dec!(0), &[flour]),
            Err(ManufacturingError::NonPositiveQuantity)
        );
        assert_eq!(
            validate_bom(product, dec!(1), &[flour, flour]),
            Err(ManufacturingError::DuplicateComponent(flour.component_id))
        );
        assert_eq!(
            validate_bom(
                product,
                dec!(1),
                &[BomComponent {
                    component_id: product,
                    quantity: dec!(1),
                }]
            ),
            Err(ManufacturingError::SelfReference(product))
        );
    }

    #[test]
    fn test_material_requirements_scale_with_batch() {
        let parts = [component(dec!(2)), component(dec!(0.25))];
        // recipe yields 4 units; producing 10
        let needs = material_requirements(&parts, dec!(4), dec!(10)).unwrap();
        assert_eq!(needs[0].quantity, dec!(5));
        assert_eq!(needs[1].quantity, dec!(0.625));
        assert_eq!(needs[0].product_id, parts[0].component_id);
    }

    #[test]
    fn test_oversize_recipes_are_rejected() {
        let product = Uuid::new_v4();
        assert!(matches!(
            validate_bom(product, dec!(1), &[component(dec!(1000000000000000))]),
            Err(ManufacturingError::OutOfRange(_))
        ));
        assert!(matches!(
            validate_bom(product, dec!(0.0001), &[component(dec!(1))]),
            Err(ManufacturingError::OutOfRange(_))
        ));
        // Each figure fits, the scaled requirement does not.
        let parts = [component(dec!(999999999999999))];
        assert!(matches!(
            material_requirements(&parts, dec!(0.001), dec!(999999999999999)),
            Err(ManufacturingError::OutOfRange(_))
        ));

        let costed = [CostedComponent {
            component_id: Uuid::new_v4(),
            quantity: dec!(999999999999999),
            unit_cost: dec!(99999999999999),
        }];
        assert!(matches!(
            bom_unit_cost(&costed, dec!(1)),
            Err(ManufacturingError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_bom_unit_cost() {
        let parts = [
            CostedComponent {
                component_id: Uuid::new_v4(),
                quantity: dec!(2),
                unit_cost: dec!(1.5),
            },
            CostedComponent {
                component_id: Uuid::new_v4(),
                quantity: dec!(1),
                unit_cost: dec!(4),
            },
        ];
        // (3 + 4) / 3 = 2.3333
        assert_eq!(bom_unit_cost(&parts, dec!(3)).unwrap(), dec!(2.3333));
        assert!(bom_unit_cost(&parts, dec!(0)).is_err());
    }

    #[test]
    fn test_production_transitions() {
        use ProductionStatus::{Cancelled, Completed, InProgress, Planned};

        assert_eq!(Planned.start().unwrap(), InProgress);
        assert_eq!(Planned.complete().unwrap(), Completed);
        assert_eq!(InProgress.complete().unwrap(), Completed);
        assert_eq!(InProgress.cancel().unwrap(), Cancelled);

        assert!(InProgress.start().is_err());
        assert!(Completed.cancel().is_err());
        assert!(Cancelled.complete().is_err());

        assert!(Planned.is_deletable());
        assert!(Cancelled.is_deletable());
        assert!(!InProgress.is_deletable());
        assert!(!Completed.is_deletable());
    }
}
