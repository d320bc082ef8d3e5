//! `SeaORM` Entity for van_sales table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::VanSaleStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "van_sales")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub reference: String,
    pub commercial_id: Uuid,
    pub status: VanSaleStatus,
    pub load_date: Date,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub total_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))", nullable)]
    pub cash_collected: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))", nullable)]
    pub discrepancy: Option<Decimal>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub created_by: Option<Uuid>,
    pub reconciled_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::commercials::Entity",
        from = "Column::CommercialId",
        to = "super::commercials::Column::Id"
    )]
    Commercials,
    #[sea_orm(has_many = "super::van_sale_items::Entity")]
    VanSaleItems,
}

impl Related<super::commercials::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Commercials.def()
    }
}

impl Related<super::van_sale_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VanSaleItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
