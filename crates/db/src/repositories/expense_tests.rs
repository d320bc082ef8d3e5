//! Tests for the expense repository.

use super::*;
use rstest::rstest;
use rust_decimal_macros::dec;
use sea_orm::{DatabaseBackend, MockDatabase};

fn input(amount: Decimal) -> CreateExpenseInput {
    CreateExpenseInput {
        category: ExpenseCategory::Rent,
        description: "October rent".into(),
        amount,
        expense_date: None,
        payment_method: PaymentMethod::BankTransfer,
        supplier_id: None,
        receipt_number: None,
    }
}

#[rstest]
#[case(dec!(0))]
#[case(dec!(-250))]
#[tokio::test]
async fn test_non_positive_amount_rejected(#[case] amount: Decimal) {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let err = ExpenseRepository::new(db)
        .create(input(amount), None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ExpenseRepoError::Invalid(ExpenseError::NonPositiveAmount(_))
    ));
}

#[tokio::test]
async fn test_unknown_supplier_rejected() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<suppliers::Model>::new()])
        .into_connection();
    let supplier_id = Uuid::new_v4();
    let err = ExpenseRepository::new(db)
        .create(
            CreateExpenseInput {
                supplier_id: Some(supplier_id),
                ..input(dec!(1200))
            },
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ExpenseRepoError::SupplierNotFound(id) if id == supplier_id));
}
