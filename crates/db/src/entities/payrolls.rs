//! `SeaORM` Entity for payrolls table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::PayrollStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "payrolls")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub employee_id: Uuid,
    pub period_year: i32,
    pub period_month: i32,
    #[sea_orm(column_type = "Decimal(Some((5, 1)))")]
    pub period_days: Decimal,
    #[sea_orm(column_type = "Decimal(Some((5, 1)))")]
    pub days_worked: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub base_salary: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub prorated_salary: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 4)))")]
    pub hourly_rate: Decimal,
    #[sea_orm(column_type = "Decimal(Some((7, 2)))")]
    pub overtime_hours: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub overtime_pay: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub bonus: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub deductions: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub gross_salary: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub net_salary: Decimal,
    pub status: PayrollStatus,
    pub paid_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::employees::Entity",
        from = "Column::EmployeeId",
        to = "super::employees::Column::Id"
    )]
    Employees,
}

impl Related<super::employees::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employees.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
