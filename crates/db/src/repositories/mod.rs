//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! Anything that moves stock goes through [`stock::StockWriter`] inside the
//! document's transaction.

pub mod attendance;
pub mod bom;
pub mod client;
pub mod commercial;
pub mod common;
pub mod dashboard;
pub mod employee;
pub mod expense;
pub mod payroll;
pub mod product;
pub mod production;
pub mod purchase;
pub mod sale;
pub mod stock;
pub mod supplier;
pub mod user;
pub mod van_sale;

pub use attendance::{
    AttendanceError, AttendanceFilter, AttendanceRepository, CreateAttendanceInput,
    UpdateAttendanceInput,
};
pub use bom::{BomCost, BomError, BomFilter, BomInput, BomRepository, BomWithComponents};
pub use client::{ClientError, ClientRepository, CreateClientInput, UpdateClientInput};
pub use commercial::{
    CommercialError, CommercialRepository, CreateCommercialInput, UpdateCommercialInput,
};
pub use dashboard::DashboardRepository;
pub use employee::{
    CreateEmployeeInput, EmployeeFilter, EmployeeRepoError, EmployeeRepository,
    UpdateEmployeeInput,
};
pub use expense::{
    CreateExpenseInput, ExpenseFilter, ExpenseRepoError, ExpenseRepository, UpdateExpenseInput,
};
pub use payroll::{
    GenerationReport, PayrollFilter, PayrollRepoError, PayrollRepository, SkipReason,
    SkippedEmployee,
};
pub use product::{
    AdjustStockInput, CreateProductInput, ProductError, ProductFilter, ProductRepository,
    UpdateProductInput,
};
pub use production::{
    CreateProductionInput, ProductionError, ProductionFilter, ProductionOrderRepository,
};
pub use purchase::{
    PurchaseError, PurchaseFilter, PurchaseInput, PurchaseRepository, PurchaseWithItems,
};
pub use sale::{SaleError, SaleFilter, SaleInput, SaleRepository, SaleWithItems};
pub use supplier::{
    ContactDetails, CreateSupplierInput, PartnerFilter, SupplierError, SupplierRepository,
    UpdateContactDetails, UpdateSupplierInput,
};
pub use user::{CreateUserInput, UserError, UserRepository};
pub use van_sale::{
    LoadVanInput, ReconcileVanInput, VanLoadLine, VanSaleFilter, VanSaleRepoError,
    VanSaleRepository, VanSaleWithItems,
};
