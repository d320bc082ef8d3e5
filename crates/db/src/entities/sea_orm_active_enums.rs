//! Postgres enum types mapped with `DeriveActiveEnum`, plus conversions to
//! and from the domain enums in `comptoir-core`.

use comptoir_core::auth::UserRole as CoreUserRole;
use comptoir_core::expenses::{ExpenseCategory as CoreExpenseCategory, PaymentMethod as CorePaymentMethod};
use comptoir_core::hr::{AttendanceStatus as CoreAttendanceStatus, PayrollStatus as CorePayrollStatus};
use comptoir_core::inventory::{MovementType as CoreMovementType, ProductKind as CoreProductKind};
use comptoir_core::manufacturing::ProductionStatus as CoreProductionStatus;
use comptoir_core::purchasing::PurchaseStatus as CorePurchaseStatus;
use comptoir_core::sales::{PaymentStatus as CorePaymentStatus, SaleStatus as CoreSaleStatus};
use comptoir_core::van_sales::VanSaleStatus as CoreVanSaleStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Both enums share variant names; generates `From` in each direction.
macro_rules! mirror_enum {
    ($db:ident, $core:ident, [$($variant:ident),+ $(,)?]) => {
        impl From<$core> for $db {
            fn from(value: $core) -> Self {
                match value {
                    $($core::$variant => Self::$variant,)+
                }
            }
        }

        impl From<$db> for $core {
            fn from(value: $db) -> Self {
                match value {
                    $($db::$variant => Self::$variant,)+
                }
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "manager")]
    Manager,
    #[sea_orm(string_value = "staff")]
    Staff,
}

mirror_enum!(UserRole, CoreUserRole, [Admin, Manager, Staff]);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "product_kind")]
#[serde(rename_all = "snake_case")]
pub enum ProductKind {
    #[sea_orm(string_value = "raw_material")]
    RawMaterial,
    #[sea_orm(string_value = "finished_good")]
    FinishedGood,
    #[sea_orm(string_value = "merchandise")]
    Merchandise,
}

mirror_enum!(ProductKind, CoreProductKind, [RawMaterial, FinishedGood, Merchandise]);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "movement_type")]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    #[sea_orm(string_value = "purchase_receipt")]
    PurchaseReceipt,
    #[sea_orm(string_value = "sale")]
    Sale,
    #[sea_orm(string_value = "sale_cancellation")]
    SaleCancellation,
    #[sea_orm(string_value = "van_load")]
    VanLoad,
    #[sea_orm(string_value = "van_return")]
    VanReturn,
    #[sea_orm(string_value = "production_consumption")]
    ProductionConsumption,
    #[sea_orm(string_value = "production_output")]
    ProductionOutput,
    #[sea_orm(string_value = "adjustment")]
    Adjustment,
}

mirror_enum!(
    MovementType,
    CoreMovementType,
    [
        PurchaseReceipt,
        Sale,
        SaleCancellation,
        VanLoad,
        VanReturn,
        ProductionConsumption,
        ProductionOutput,
        Adjustment,
    ]
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "purchase_status")]
#[serde(rename_all = "snake_case")]
pub enum PurchaseStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
    #[sea_orm(string_value = "received")]
    Received,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

mirror_enum!(PurchaseStatus, CorePurchaseStatus, [Draft, Confirmed, Received, Cancelled]);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "sale_status")]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

mirror_enum!(SaleStatus, CoreSaleStatus, [Draft, Confirmed, Cancelled]);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_status")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[sea_orm(string_value = "unpaid")]
    Unpaid,
    #[sea_orm(string_value = "partial")]
    Partial,
    #[sea_orm(string_value = "paid")]
    Paid,
}

mirror_enum!(PaymentStatus, CorePaymentStatus, [Unpaid, Partial, Paid]);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "van_sale_status")]
#[serde(rename_all = "snake_case")]
pub enum VanSaleStatus {
    #[sea_orm(string_value = "loaded")]
    Loaded,
    #[sea_orm(string_value = "reconciled")]
    Reconciled,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

mirror_enum!(VanSaleStatus, CoreVanSaleStatus, [Loaded, Reconciled, Cancelled]);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "attendance_status")]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    #[sea_orm(string_value = "present")]
    Present,
    #[sea_orm(string_value = "half_day")]
    HalfDay,
    #[sea_orm(string_value = "leave")]
    Leave,
    #[sea_orm(string_value = "absent")]
    Absent,
}

mirror_enum!(AttendanceStatus, CoreAttendanceStatus, [Present, HalfDay, Leave, Absent]);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payroll_status")]
#[serde(rename_all = "snake_case")]
pub enum PayrollStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "paid")]
    Paid,
}

mirror_enum!(PayrollStatus, CorePayrollStatus, [Draft, Paid]);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "expense_category")]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    #[sea_orm(string_value = "rent")]
    Rent,
    #[sea_orm(string_value = "utilities")]
    Utilities,
    #[sea_orm(string_value = "salaries")]
    Salaries,
    #[sea_orm(string_value = "transport")]
    Transport,
    #[sea_orm(string_value = "supplies")]
    Supplies,
    #[sea_orm(string_value = "maintenance")]
    Maintenance,
    #[sea_orm(string_value = "marketing")]
    Marketing,
    #[sea_orm(string_value = "taxes")]
    Taxes,
    #[sea_orm(string_value = "other")]
    Other,
}

mirror_enum!(
    ExpenseCategory,
    CoreExpenseCategory,
    [Rent, Utilities, Salaries, Transport, Supplies, Maintenance, Marketing, Taxes, Other]
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_method")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[sea_orm(string_value = "cash")]
    Cash,
    #[sea_orm(string_value = "bank_transfer")]
    BankTransfer,
    #[sea_orm(string_value = "card")]
    Card,
    #[sea_orm(string_value = "check")]
    Check,
}

mirror_enum!(PaymentMethod, CorePaymentMethod, [Cash, BankTransfer, Card, Check]);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "production_status")]
#[serde(rename_all = "snake_case")]
pub enum ProductionStatus {
    #[sea_orm(string_value = "planned")]
    Planned,
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

mirror_enum!(
    ProductionStatus,
    CoreProductionStatus,
    [Planned, InProgress, Completed, Cancelled]
);

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ActiveEnum;

    #[test]
    fn test_db_values_match_domain_strings() {
        for status in PurchaseStatus::iter() {
            assert_eq!(status.to_value(), CorePurchaseStatus::from(status).as_str());
        }
        for status in ProductionStatus::iter() {
            assert_eq!(status.to_value(), CoreProductionStatus::from(status).as_str());
        }
        for status in AttendanceStatus::iter() {
            assert_eq!(status.to_value(), CoreAttendanceStatus::from(status).as_str());
        }
        for kind in MovementType::iter() {
            assert_eq!(kind.to_value(), CoreMovementType::from(kind).as_str());
        }
        for category in ExpenseCategory::iter() {
            assert_eq!(category.to_value(), CoreExpenseCategory::from(category).as_str());
        }
    }
}
