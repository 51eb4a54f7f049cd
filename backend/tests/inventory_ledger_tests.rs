//! Inventory settlement tests
//!
//! Tests for the order-settlement semantics including:
//! - Stock may go negative; there is no floor on deductions
//! - Settlement fires exactly once per order
//! - Completion happens whether or not a deduction occurred
//! - Interleaved deductions accumulate, none are lost

use proptest::prelude::*;
use std::collections::HashMap;
use uuid::Uuid;

use shared::models::OrderStatus;

// ============================================================================
// Settlement Simulation Helpers
// ============================================================================

/// In-memory model of the stock table plus the one-shot settlement
/// keyed on the order id, mirroring the database semantics.
#[derive(Debug, Default)]
struct SettlementModel {
    stocks: HashMap<(Uuid, Uuid), f64>,
    order_status: HashMap<Uuid, OrderStatus>,
    settled_orders: Vec<Uuid>,
}

#[derive(Debug, PartialEq)]
enum SettlementError {
    AlreadyReconciled,
    InvalidState,
}

impl SettlementModel {
    fn with_order(order_id: Uuid, status: OrderStatus) -> Self {
        let mut model = Self::default();
        model.order_status.insert(order_id, status);
        model
    }

    fn set_stock(&mut self, product_id: Uuid, farm_id: Uuid, quantity: f64) {
        self.stocks.insert((product_id, farm_id), quantity);
    }

    fn stock(&self, product_id: Uuid, farm_id: Uuid) -> Option<f64> {
        self.stocks.get(&(product_id, farm_id)).copied()
    }

    /// Mirror of the transactional settlement: unique-key check,
    /// conditional deduction, unconditional completion.
    fn settle(
        &mut self,
        order_id: Uuid,
        product_id: Uuid,
        farm_id: Option<Uuid>,
        required_volume_liters: Option<f64>,
    ) -> Result<(), SettlementError> {
        match self.order_status.get(&order_id) {
            Some(OrderStatus::Completed) => return Err(SettlementError::AlreadyReconciled),
            Some(OrderStatus::Cancelled) => return Err(SettlementError::InvalidState),
            _ => {}
        }
        if self.settled_orders.contains(&order_id) {
            return Err(SettlementError::AlreadyReconciled);
        }
        self.settled_orders.push(order_id);

        let volume = required_volume_liters.unwrap_or(0.0);
        if volume > 0.0 {
            if let Some(farm_id) = farm_id {
                // Lazy row creation, then an atomic subtraction
                let entry = self.stocks.entry((product_id, farm_id)).or_insert(0.0);
                *entry -= volume;
            }
        }

        self.order_status.insert(order_id, OrderStatus::Completed);
        Ok(())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_deduction_may_go_negative() {
        let order_id = Uuid::new_v4();
        let product_id = Uuid::new_v4();
        let farm_id = Uuid::new_v4();

        let mut model = SettlementModel::with_order(order_id, OrderStatus::Planned);
        model.set_stock(product_id, farm_id, 15.0);

        model
            .settle(order_id, product_id, Some(farm_id), Some(20.0))
            .unwrap();

        assert_eq!(model.stock(product_id, farm_id), Some(-5.0));
        assert_eq!(model.order_status[&order_id], OrderStatus::Completed);
    }

    #[test]
    fn test_missing_stock_row_is_created_on_first_deduction() {
        let order_id = Uuid::new_v4();
        let product_id = Uuid::new_v4();
        let farm_id = Uuid::new_v4();

        let mut model = SettlementModel::with_order(order_id, OrderStatus::Planned);
        assert_eq!(model.stock(product_id, farm_id), None);

        model
            .settle(order_id, product_id, Some(farm_id), Some(12.5))
            .unwrap();

        assert_eq!(model.stock(product_id, farm_id), Some(-12.5));
    }

    #[test]
    fn test_second_settlement_fails_and_changes_nothing() {
        let order_id = Uuid::new_v4();
        let product_id = Uuid::new_v4();
        let farm_id = Uuid::new_v4();

        let mut model = SettlementModel::with_order(order_id, OrderStatus::InProgress);
        model.set_stock(product_id, farm_id, 100.0);

        model
            .settle(order_id, product_id, Some(farm_id), Some(30.0))
            .unwrap();
        assert_eq!(model.stock(product_id, farm_id), Some(70.0));

        let second = model.settle(order_id, product_id, Some(farm_id), Some(30.0));
        assert_eq!(second, Err(SettlementError::AlreadyReconciled));

        // Stock and status are exactly as the first settlement left them
        assert_eq!(model.stock(product_id, farm_id), Some(70.0));
        assert_eq!(model.order_status[&order_id], OrderStatus::Completed);
    }

    #[test]
    fn test_cancelled_order_cannot_settle() {
        let order_id = Uuid::new_v4();
        let product_id = Uuid::new_v4();
        let farm_id = Uuid::new_v4();

        let mut model = SettlementModel::with_order(order_id, OrderStatus::Cancelled);
        model.set_stock(product_id, farm_id, 50.0);

        let result = model.settle(order_id, product_id, Some(farm_id), Some(10.0));
        assert_eq!(result, Err(SettlementError::InvalidState));
        assert_eq!(model.stock(product_id, farm_id), Some(50.0));
    }

    #[test]
    fn test_unknown_volume_completes_without_deduction() {
        let order_id = Uuid::new_v4();
        let product_id = Uuid::new_v4();
        let farm_id = Uuid::new_v4();

        let mut model = SettlementModel::with_order(order_id, OrderStatus::Planned);
        model.set_stock(product_id, farm_id, 50.0);

        model.settle(order_id, product_id, Some(farm_id), None).unwrap();

        assert_eq!(model.stock(product_id, farm_id), Some(50.0));
        assert_eq!(model.order_status[&order_id], OrderStatus::Completed);
    }

    #[test]
    fn test_zero_volume_completes_without_deduction() {
        let order_id = Uuid::new_v4();
        let product_id = Uuid::new_v4();
        let farm_id = Uuid::new_v4();

        let mut model = SettlementModel::with_order(order_id, OrderStatus::Planned);
        model.set_stock(product_id, farm_id, 50.0);

        model
            .settle(order_id, product_id, Some(farm_id), Some(0.0))
            .unwrap();

        assert_eq!(model.stock(product_id, farm_id), Some(50.0));
        assert_eq!(model.order_status[&order_id], OrderStatus::Completed);
    }

    #[test]
    fn test_order_without_plots_still_completes() {
        let order_id = Uuid::new_v4();
        let product_id = Uuid::new_v4();

        let mut model = SettlementModel::with_order(order_id, OrderStatus::Planned);

        // No assigned plots means no primary farm to charge
        model.settle(order_id, product_id, None, Some(25.0)).unwrap();

        assert!(model.stocks.is_empty());
        assert_eq!(model.order_status[&order_id], OrderStatus::Completed);
    }

    #[test]
    fn test_deductions_only_touch_their_own_pair() {
        let product_id = Uuid::new_v4();
        let farm_a = Uuid::new_v4();
        let farm_b = Uuid::new_v4();
        let order_id = Uuid::new_v4();

        let mut model = SettlementModel::with_order(order_id, OrderStatus::Planned);
        model.set_stock(product_id, farm_a, 100.0);
        model.set_stock(product_id, farm_b, 100.0);

        model
            .settle(order_id, product_id, Some(farm_a), Some(40.0))
            .unwrap();

        assert_eq!(model.stock(product_id, farm_a), Some(60.0));
        assert_eq!(model.stock(product_id, farm_b), Some(100.0));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn volume_strategy() -> impl Strategy<Value = f64> {
        0.1f64..500.0
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Interleaved settlements for the same pair accumulate exactly
        #[test]
        fn prop_deductions_accumulate(
            initial in 0.0f64..1000.0,
            volumes in prop::collection::vec(volume_strategy(), 1..20)
        ) {
            let product_id = Uuid::new_v4();
            let farm_id = Uuid::new_v4();

            let mut model = SettlementModel::default();
            model.set_stock(product_id, farm_id, initial);

            for volume in &volumes {
                let order_id = Uuid::new_v4();
                model.order_status.insert(order_id, OrderStatus::Planned);
                model
                    .settle(order_id, product_id, Some(farm_id), Some(*volume))
                    .unwrap();
            }

            let expected = initial - volumes.iter().sum::<f64>();
            let actual = model.stock(product_id, farm_id).unwrap();
            prop_assert!((actual - expected).abs() < 1e-9);
        }

        /// Settlement succeeds exactly once regardless of retries
        #[test]
        fn prop_settlement_is_single_fire(
            volume in volume_strategy(),
            attempts in 2usize..10
        ) {
            let order_id = Uuid::new_v4();
            let product_id = Uuid::new_v4();
            let farm_id = Uuid::new_v4();

            let mut model = SettlementModel::with_order(order_id, OrderStatus::Planned);
            model.set_stock(product_id, farm_id, 0.0);

            let mut successes = 0;
            for _ in 0..attempts {
                if model
                    .settle(order_id, product_id, Some(farm_id), Some(volume))
                    .is_ok()
                {
                    successes += 1;
                }
            }

            prop_assert_eq!(successes, 1);
            let stock = model.stock(product_id, farm_id).unwrap();
            prop_assert!((stock + volume).abs() < 1e-9);
        }

        /// Every accepted settlement leaves the order Completed
        #[test]
        fn prop_settlement_always_completes(
            volume in prop::option::of(-100.0f64..500.0)
        ) {
            let order_id = Uuid::new_v4();
            let product_id = Uuid::new_v4();
            let farm_id = Uuid::new_v4();

            let mut model = SettlementModel::with_order(order_id, OrderStatus::InProgress);
            model.settle(order_id, product_id, Some(farm_id), volume).unwrap();

            prop_assert_eq!(model.order_status[&order_id], OrderStatus::Completed);
        }

        /// Non-positive volumes never move stock
        #[test]
        fn prop_non_positive_volume_never_deducts(
            initial in 0.0f64..1000.0,
            volume in -500.0f64..=0.0
        ) {
            let order_id = Uuid::new_v4();
            let product_id = Uuid::new_v4();
            let farm_id = Uuid::new_v4();

            let mut model = SettlementModel::with_order(order_id, OrderStatus::Planned);
            model.set_stock(product_id, farm_id, initial);

            model
                .settle(order_id, product_id, Some(farm_id), Some(volume))
                .unwrap();

            prop_assert_eq!(model.stock(product_id, farm_id), Some(initial));
        }
    }
}
