//! Expense repository.

use chrono::NaiveDate;
use comptoir_core::expenses::{ExpenseError, ExpenseSummary, summarize, validate_expense};
use comptoir_shared::types::{PageRequest, PageResponse};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Select, Set,
};
use uuid::Uuid;

use super::common::fetch_page;
use crate::entities::{
    expenses,
    sea_orm_active_enums::{ExpenseCategory, PaymentMethod},
    suppliers,
};

/// Error types for expense operations.
#[derive(Debug, thiserror::Error)]
pub enum ExpenseRepoError {
    /// Expense not found.
    #[error("Expense not found: {0}")]
    NotFound(Uuid),

    /// Referenced supplier does not exist.
    #[error("Supplier not found: {0}")]
    SupplierNotFound(Uuid),

    /// Invalid amount or description.
    #[error(transparent)]
    Invalid(#[from] ExpenseError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for recording an expense.
#[derive(Debug, Clone)]
pub struct CreateExpenseInput {
    /// Category.
    pub category: ExpenseCategory,
    /// Description.
    pub description: String,
    /// Amount, strictly positive.
    pub amount: Decimal,
    /// Date; today when absent.
    pub expense_date: Option<NaiveDate>,
    /// Payment method.
    pub payment_method: PaymentMethod,
    /// Supplier paid, if any.
    pub supplier_id: Option<Uuid>,
    /// Receipt or invoice number.
    pub receipt_number: Option<String>,
}

/// Input for updating an expense.
#[derive(Debug, Clone, Default)]
pub struct UpdateExpenseInput {
    /// Category.
    pub category: Option<ExpenseCategory>,
    /// Description.
    pub description: Option<String>,
    /// Amount.
    pub amount: Option<Decimal>,
    /// Date.
    pub expense_date: Option<NaiveDate>,
    /// Payment method.
    pub payment_method: Option<PaymentMethod>,
    /// Supplier.
    pub supplier_id: Option<Option<Uuid>>,
    /// Receipt number.
    pub receipt_number: Option<Option<String>>,
}

/// Filter options for listing expenses.
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    /// Category.
    pub category: Option<ExpenseCategory>,
    /// Payment method.
    pub payment_method: Option<PaymentMethod>,
    /// From (inclusive).
    pub from: Option<NaiveDate>,
    /// To (inclusive).
    pub to: Option<NaiveDate>,
}

fn in_range(
    mut query: Select<expenses::Entity>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Select<expenses::Entity> {
    if let Some(from) = from {
        query = query.filter(expenses::Column::ExpenseDate.gte(from));
    }
    if let Some(to) = to {
        query = query.filter(expenses::Column::ExpenseDate.lte(to));
    }
    query
}

/// Expense repository.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    db: DatabaseConnection,
}

impl ExpenseRepository {
    /// Creates a new expense repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn check_supplier(&self, supplier_id: Option<Uuid>) -> Result<(), ExpenseRepoError> {
        if let Some(id) = supplier_id
            && suppliers::Entity::find_by_id(id)
                .one(&self.db)
                .await?
                .is_none()
        {
            return Err(ExpenseRepoError::SupplierNotFound(id));
        }
        Ok(())
    }

    /// Records an expense.
    ///
    /// # Errors
    ///
    /// Returns `Invalid` for a non-positive amount or blank description, and
    /// `SupplierNotFound` for an unknown supplier.
    pub async fn create(
        &self,
        input: CreateExpenseInput,
        user_id: Option<Uuid>,
    ) -> Result<expenses::Model, ExpenseRepoError> {
        validate_expense(input.amount, &input.description)?;
        self.check_supplier(input.supplier_id).await?;

        let now = chrono::Utc::now().into();
        let expense = expenses::ActiveModel {
            id: Set(Uuid::new_v4()),
            category: Set(input.category),
            description: Set(input.description.trim().to_string()),
            amount: Set(input.amount),
            expense_date: Set(input
                .expense_date
                .unwrap_or_else(|| chrono::Utc::now().date_naive())),
            payment_method: Set(input.payment_method),
            supplier_id: Set(input.supplier_id),
            receipt_number: Set(input.receipt_number),
            created_by: Set(user_id),
            created_at: Set(now),
            updated_at: Set(now),
        };
        Ok(expense.insert(&self.db).await?)
    }

    /// Finds an expense by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<expenses::Model>, DbErr> {
        expenses::Entity::find_by_id(id).one(&self.db).await
    }

    /// Lists expenses, latest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: &ExpenseFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<expenses::Model>, DbErr> {
        let mut query = in_range(expenses::Entity::find(), filter.from, filter.to);
        if let Some(category) = filter.category {
            query = query.filter(expenses::Column::Category.eq(category));
        }
        if let Some(method) = filter.payment_method {
            query = query.filter(expenses::Column::PaymentMethod.eq(method));
        }
        let query = query
            .order_by_desc(expenses::Column::ExpenseDate)
            .order_by_desc(expenses::Column::CreatedAt);
        fetch_page(&self.db, query, page).await
    }

    /// Updates an expense; the amount and description are re-validated.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Invalid` or `SupplierNotFound`.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateExpenseInput,
    ) -> Result<expenses::Model, ExpenseRepoError> {
        let expense = self
            .find_by_id(id)
            .await?
            .ok_or(ExpenseRepoError::NotFound(id))?;

        let amount = input.amount.unwrap_or(expense.amount);
        let description = input
            .description
            .map_or_else(|| expense.description.clone(), |d| d.trim().to_string());
        validate_expense(amount, &description)?;
        if let Some(supplier_id) = input.supplier_id {
            self.check_supplier(supplier_id).await?;
        }

        let mut active: expenses::ActiveModel = expense.into();
        active.amount = Set(amount);
        active.description = Set(description);
        if let Some(category) = input.category {
            active.category = Set(category);
        }
        if let Some(date) = input.expense_date {
            active.expense_date = Set(date);
        }
        if let Some(method) = input.payment_method {
            active.payment_method = Set(method);
        }
        if let Some(supplier_id) = input.supplier_id {
            active.supplier_id = Set(supplier_id);
        }
        if let Some(receipt) = input.receipt_number {
            active.receipt_number = Set(receipt);
        }
        active.updated_at = Set(chrono::Utc::now().into());
        Ok(active.update(&self.db).await?)
    }

    /// Deletes an expense.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if nothing was deleted.
    pub async fn delete(&self, id: Uuid) -> Result<(), ExpenseRepoError> {
        let result = expenses::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(ExpenseRepoError::NotFound(id));
        }
        Ok(())
    }

    /// Totals per category between two dates (both inclusive, both optional).
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn summary(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<ExpenseSummary, DbErr> {
        let rows: Vec<(ExpenseCategory, Decimal)> = in_range(expenses::Entity::find(), from, to)
            .select_only()
            .column(expenses::Column::Category)
            .column(expenses::Column::Amount)
            .into_tuple()
            .all(&self.db)
            .await?;
        Ok(summarize(
            rows.into_iter()
                .map(|(category, amount)| (category.into(), amount)),
        ))
    }
}

#[cfg(test)]
#[path = "expense_tests.rs"]
mod tests;
