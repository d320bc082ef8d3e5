//! `SeaORM` entities, one module per table.

#![allow(missing_docs)]

pub mod prelude;
pub mod sea_orm_active_enums;

pub mod attendances;
pub mod bills_of_materials;
pub mod bom_components;
pub mod clients;
pub mod commercials;
pub mod employees;
pub mod expenses;
pub mod payrolls;
pub mod production_orders;
pub mod products;
pub mod purchase_items;
pub mod purchases;
pub mod sale_items;
pub mod sales;
pub mod stock_movements;
pub mod suppliers;
pub mod users;
pub mod van_sale_items;
pub mod van_sales;
