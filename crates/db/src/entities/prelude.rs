//! Entity aliases.

pub use super::attendances::Entity as Attendances;
pub use super::bills_of_materials::Entity as BillsOfMaterials;
pub use super::bom_components::Entity as BomComponents;
pub use super::clients::Entity as Clients;
pub use super::commercials::Entity as Commercials;
pub use super::employees::Entity as Employees;
pub use super::expenses::Entity as Expenses;
pub use super::payrolls::Entity as Payrolls;
pub use super::production_orders::Entity as ProductionOrders;
pub use super::products::Entity as Products;
pub use super::purchase_items::Entity as PurchaseItems;
pub use super::purchases::Entity as Purchases;
pub use super::sale_items::Entity as SaleItems;
pub use super::sales::Entity as Sales;
pub use super::stock_movements::Entity as StockMovements;
pub use super::suppliers::Entity as Suppliers;
pub use super::users::Entity as Users;
pub use super::van_sale_items::Entity as VanSaleItems;
pub use super::van_sales::Entity as VanSales;
