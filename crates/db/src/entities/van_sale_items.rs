//! `SeaORM` Entity for van_sale_items table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "van_sale_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub van_sale_id: Uuid,
    pub product_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((18, 3)))")]
    pub loaded_quantity: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 3)))")]
    pub sold_quantity: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 3)))")]
    pub returned_quantity: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub unit_price: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub line_total: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::van_sales::Entity",
        from = "Column::VanSaleId",
        to = "super::van_sales::Column::Id",
        on_delete = "Cascade"
    )]
    VanSales,
    #[sea_orm(
        belongs_to = "super::products::Entity",
        from = "Column::ProductId",
        to = "super::products::Column::Id"
    )]
    Products,
}

impl Related<super::van_sales::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VanSales.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
