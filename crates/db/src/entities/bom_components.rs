//! `SeaORM` Entity for bom_components table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "bom_components")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub bom_id: Uuid,
    pub component_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((18, 3)))")]
    pub quantity: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::bills_of_materials::Entity",
        from = "Column::BomId",
        to = "super::bills_of_materials::Column::Id",
        on_delete = "Cascade"
    )]
    BillsOfMaterials,
    #[sea_orm(
        belongs_to = "super::products::Entity",
        from = "Column::ComponentId",
        to = "super::products::Column::Id"
    )]
    Products,
}

impl Related<super::bills_of_materials::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BillsOfMaterials.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
