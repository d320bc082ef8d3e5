//! Initial database migration.
//!
//! Creates the enums, master data, documents and their lines, HR and
//! manufacturing tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: USERS & MASTER DATA
        // ============================================================
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(PRODUCTS_SQL).await?;
        db.execute_unprepared(PARTNERS_SQL).await?;

        // ============================================================
        // PART 3: STOCK
        // ============================================================
        db.execute_unprepared(STOCK_MOVEMENTS_SQL).await?;

        // ============================================================
        // PART 4: PURCHASING & SALES
        // ============================================================
        db.execute_unprepared(PURCHASES_SQL).await?;
        db.execute_unprepared(SALES_SQL).await?;
        db.execute_unprepared(VAN_SALES_SQL).await?;

        // ============================================================
        // PART 5: HR
        // ============================================================
        db.execute_unprepared(HR_SQL).await?;

        // ============================================================
        // PART 6: EXPENSES
        // ============================================================
        db.execute_unprepared(EXPENSES_SQL).await?;

        // ============================================================
        // PART 7: MANUFACTURING
        // ============================================================
        db.execute_unprepared(MANUFACTURING_SQL).await?;

        // ============================================================
        // PART 8: TRIGGERS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
CREATE TYPE user_role AS ENUM ('admin', 'manager', 'staff');

CREATE TYPE product_kind AS ENUM ('raw_material', 'finished_good', 'merchandise');

CREATE TYPE movement_type AS ENUM (
    'purchase_receipt',
    'sale',
    'sale_cancellation',
    'van_load',
    'van_return',
    'production_consumption',
    'production_output',
    'adjustment'
);

CREATE TYPE purchase_status AS ENUM ('draft', 'confirmed', 'received', 'cancelled');
CREATE TYPE sale_status AS ENUM ('draft', 'confirmed', 'cancelled');
CREATE TYPE payment_status AS ENUM ('unpaid', 'partial', 'paid');
CREATE TYPE van_sale_status AS ENUM ('loaded', 'reconciled', 'cancelled');

CREATE TYPE attendance_status AS ENUM ('present', 'half_day', 'leave', 'absent');
CREATE TYPE payroll_status AS ENUM ('draft', 'paid');

CREATE TYPE expense_category AS ENUM (
    'rent',
    'utilities',
    'salaries',
    'transport',
    'supplies',
    'maintenance',
    'marketing',
    'taxes',
    'other'
);
CREATE TYPE payment_method AS ENUM ('cash', 'bank_transfer', 'card', 'check');

CREATE TYPE production_status AS ENUM ('planned', 'in_progress', 'completed', 'cancelled');
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    email VARCHAR(255) NOT NULL UNIQUE,
    password_hash VARCHAR(255) NOT NULL,
    full_name VARCHAR(255) NOT NULL,
    role user_role NOT NULL DEFAULT 'staff',
    is_active BOOLEAN NOT NULL DEFAULT true,
    last_login_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_users_email ON users(email) WHERE is_active = true;
";

const PRODUCTS_SQL: &str = r"
CREATE TABLE products (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    sku VARCHAR(64) NOT NULL UNIQUE,
    name VARCHAR(255) NOT NULL,
    description TEXT,
    kind product_kind NOT NULL DEFAULT 'merchandise',
    unit VARCHAR(20) NOT NULL DEFAULT 'unit',
    sale_price NUMERIC(18, 2) NOT NULL DEFAULT 0,
    unit_cost NUMERIC(18, 4) NOT NULL DEFAULT 0,
    quantity NUMERIC(18, 3) NOT NULL DEFAULT 0,
    reorder_level NUMERIC(18, 3) NOT NULL DEFAULT 0,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_products_quantity_non_negative CHECK (quantity >= 0),
    CONSTRAINT chk_products_prices_non_negative CHECK (sale_price >= 0 AND unit_cost >= 0),
    CONSTRAINT chk_products_reorder_non_negative CHECK (reorder_level >= 0)
);

CREATE INDEX idx_products_name ON products(lower(name));
CREATE INDEX idx_products_kind ON products(kind) WHERE is_active = true;
";

const PARTNERS_SQL: &str = r"
CREATE TABLE suppliers (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    contact_name VARCHAR(255),
    email VARCHAR(255),
    phone VARCHAR(50),
    tax_id VARCHAR(50),
    address TEXT,
    notes TEXT,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE clients (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    contact_name VARCHAR(255),
    email VARCHAR(255),
    phone VARCHAR(50),
    tax_id VARCHAR(50),
    address TEXT,
    notes TEXT,
    credit_limit NUMERIC(18, 2) NOT NULL DEFAULT 0,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_clients_credit_limit CHECK (credit_limit >= 0)
);

CREATE TABLE commercials (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    phone VARCHAR(50),
    email VARCHAR(255),
    vehicle_plate VARCHAR(20),
    commission_rate NUMERIC(5, 2) NOT NULL DEFAULT 0,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_commercials_commission CHECK (commission_rate BETWEEN 0 AND 100)
);

CREATE INDEX idx_suppliers_name ON suppliers(lower(name));
CREATE INDEX idx_clients_name ON clients(lower(name));
";

const STOCK_MOVEMENTS_SQL: &str = r"
CREATE TABLE stock_movements (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    product_id UUID NOT NULL REFERENCES products(id) ON DELETE RESTRICT,
    movement_type movement_type NOT NULL,
    quantity NUMERIC(18, 3) NOT NULL,
    unit_cost NUMERIC(18, 4) NOT NULL DEFAULT 0,
    balance_after NUMERIC(18, 3) NOT NULL,
    reference_type VARCHAR(30),
    reference_id UUID,
    note TEXT,
    created_by UUID REFERENCES users(id) ON DELETE SET NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_movements_non_zero CHECK (quantity <> 0)
);

CREATE INDEX idx_movements_product ON stock_movements(product_id, created_at DESC);
CREATE INDEX idx_movements_reference ON stock_movements(reference_type, reference_id);
";

const PURCHASES_SQL: &str = r"
CREATE TABLE purchases (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    reference VARCHAR(30) NOT NULL UNIQUE,
    supplier_id UUID NOT NULL REFERENCES suppliers(id) ON DELETE RESTRICT,
    status purchase_status NOT NULL DEFAULT 'draft',
    order_date DATE NOT NULL,
    expected_date DATE,
    received_date DATE,
    total_amount NUMERIC(18, 2) NOT NULL DEFAULT 0,
    notes TEXT,
    created_by UUID REFERENCES users(id) ON DELETE SET NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE purchase_items (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    purchase_id UUID NOT NULL REFERENCES purchases(id) ON DELETE CASCADE,
    product_id UUID NOT NULL REFERENCES products(id) ON DELETE RESTRICT,
    quantity NUMERIC(18, 3) NOT NULL,
    received_quantity NUMERIC(18, 3) NOT NULL DEFAULT 0,
    unit_cost NUMERIC(18, 4) NOT NULL,
    line_total NUMERIC(18, 2) NOT NULL,
    CONSTRAINT chk_purchase_items_quantity CHECK (quantity > 0),
    CONSTRAINT chk_purchase_items_received CHECK (received_quantity >= 0 AND received_quantity <= quantity),
    CONSTRAINT chk_purchase_items_cost CHECK (unit_cost >= 0)
);

CREATE INDEX idx_purchases_supplier ON purchases(supplier_id);
CREATE INDEX idx_purchases_status ON purchases(status, order_date DESC);
CREATE INDEX idx_purchase_items_purchase ON purchase_items(purchase_id);
CREATE INDEX idx_purchase_items_product ON purchase_items(product_id);
";

const SALES_SQL: &str = r"
CREATE TABLE sales (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    reference VARCHAR(30) NOT NULL UNIQUE,
    client_id UUID REFERENCES clients(id) ON DELETE RESTRICT,
    commercial_id UUID REFERENCES commercials(id) ON DELETE RESTRICT,
    status sale_status NOT NULL DEFAULT 'draft',
    payment_status payment_status NOT NULL DEFAULT 'unpaid',
    sale_date DATE NOT NULL,
    subtotal NUMERIC(18, 2) NOT NULL DEFAULT 0,
    discount_amount NUMERIC(18, 2) NOT NULL DEFAULT 0,
    tax_rate NUMERIC(5, 2) NOT NULL DEFAULT 0,
    tax_amount NUMERIC(18, 2) NOT NULL DEFAULT 0,
    total_amount NUMERIC(18, 2) NOT NULL DEFAULT 0,
    paid_amount NUMERIC(18, 2) NOT NULL DEFAULT 0,
    notes TEXT,
    created_by UUID REFERENCES users(id) ON DELETE SET NULL,
    confirmed_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_sales_paid CHECK (paid_amount >= 0 AND paid_amount <= total_amount)
);

CREATE TABLE sale_items (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    sale_id UUID NOT NULL REFERENCES sales(id) ON DELETE CASCADE,
    product_id UUID NOT NULL REFERENCES products(id) ON DELETE RESTRICT,
    quantity NUMERIC(18, 3) NOT NULL,
    unit_price NUMERIC(18, 2) NOT NULL,
    discount_percent NUMERIC(5, 2) NOT NULL DEFAULT 0,
    unit_cost NUMERIC(18, 4),
    line_total NUMERIC(18, 2) NOT NULL,
    CONSTRAINT chk_sale_items_quantity CHECK (quantity > 0),
    CONSTRAINT chk_sale_items_price CHECK (unit_price >= 0),
    CONSTRAINT chk_sale_items_discount CHECK (discount_percent BETWEEN 0 AND 100)
);

CREATE INDEX idx_sales_client ON sales(client_id);
CREATE INDEX idx_sales_commercial ON sales(commercial_id);
CREATE INDEX idx_sales_status ON sales(status, sale_date DESC);
CREATE INDEX idx_sale_items_sale ON sale_items(sale_id);
CREATE INDEX idx_sale_items_product ON sale_items(product_id);
";

const VAN_SALES_SQL: &str = r"
CREATE TABLE van_sales (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    reference VARCHAR(30) NOT NULL UNIQUE,
    commercial_id UUID NOT NULL REFERENCES commercials(id) ON DELETE RESTRICT,
    status van_sale_status NOT NULL DEFAULT 'loaded',
    load_date DATE NOT NULL,
    total_amount NUMERIC(18, 2) NOT NULL DEFAULT 0,
    cash_collected NUMERIC(18, 2),
    discrepancy NUMERIC(18, 2),
    notes TEXT,
    created_by UUID REFERENCES users(id) ON DELETE SET NULL,
    reconciled_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE van_sale_items (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    van_sale_id UUID NOT NULL REFERENCES van_sales(id) ON DELETE CASCADE,
    product_id UUID NOT NULL REFERENCES products(id) ON DELETE RESTRICT,
    loaded_quantity NUMERIC(18, 3) NOT NULL,
    sold_quantity NUMERIC(18, 3) NOT NULL DEFAULT 0,
    returned_quantity NUMERIC(18, 3) NOT NULL DEFAULT 0,
    unit_price NUMERIC(18, 2) NOT NULL,
    line_total NUMERIC(18, 2) NOT NULL DEFAULT 0,
    CONSTRAINT chk_van_items_loaded CHECK (loaded_quantity > 0),
    CONSTRAINT chk_van_items_balance CHECK (sold_quantity + returned_quantity <= loaded_quantity)
);

CREATE INDEX idx_van_sales_commercial ON van_sales(commercial_id, load_date DESC);
CREATE INDEX idx_van_sale_items_van_sale ON van_sale_items(van_sale_id);
CREATE INDEX idx_van_sale_items_product ON van_sale_items(product_id);
";

const HR_SQL: &str = r"
CREATE TABLE employees (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    employee_code VARCHAR(30) NOT NULL UNIQUE,
    first_name VARCHAR(100) NOT NULL,
    last_name VARCHAR(100) NOT NULL,
    email VARCHAR(255),
    phone VARCHAR(50),
    position VARCHAR(100),
    department VARCHAR(100),
    hire_date DATE NOT NULL,
    termination_date DATE,
    base_salary NUMERIC(18, 2) NOT NULL,
    overtime_multiplier NUMERIC(5, 2),
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_employees_salary CHECK (base_salary >= 0),
    CONSTRAINT chk_employees_dates CHECK (termination_date IS NULL OR termination_date >= hire_date)
);

CREATE TABLE attendances (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    employee_id UUID NOT NULL REFERENCES employees(id) ON DELETE CASCADE,
    date DATE NOT NULL,
    status attendance_status NOT NULL,
    overtime_hours NUMERIC(5, 2) NOT NULL DEFAULT 0,
    notes TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    UNIQUE (employee_id, date),
    CONSTRAINT chk_attendances_overtime CHECK (overtime_hours >= 0)
);

CREATE TABLE payrolls (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    employee_id UUID NOT NULL REFERENCES employees(id) ON DELETE RESTRICT,
    period_year INTEGER NOT NULL,
    period_month INTEGER NOT NULL,
    period_days NUMERIC(5, 1) NOT NULL,
    days_worked NUMERIC(5, 1) NOT NULL,
    base_salary NUMERIC(18, 2) NOT NULL,
    prorated_salary NUMERIC(18, 2) NOT NULL,
    hourly_rate NUMERIC(18, 4) NOT NULL,
    overtime_hours NUMERIC(7, 2) NOT NULL DEFAULT 0,
    overtime_pay NUMERIC(18, 2) NOT NULL DEFAULT 0,
    bonus NUMERIC(18, 2) NOT NULL DEFAULT 0,
    deductions NUMERIC(18, 2) NOT NULL DEFAULT 0,
    gross_salary NUMERIC(18, 2) NOT NULL,
    net_salary NUMERIC(18, 2) NOT NULL,
    status payroll_status NOT NULL DEFAULT 'draft',
    paid_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    UNIQUE (employee_id, period_year, period_month),
    CONSTRAINT chk_payrolls_month CHECK (period_month BETWEEN 1 AND 12),
    CONSTRAINT chk_payrolls_net CHECK (net_salary >= 0)
);

CREATE INDEX idx_attendances_date ON attendances(date);
CREATE INDEX idx_payrolls_period ON payrolls(period_year, period_month);
";

const EXPENSES_SQL: &str = r"
CREATE TABLE expenses (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    category expense_category NOT NULL,
    description TEXT NOT NULL,
    amount NUMERIC(18, 2) NOT NULL,
    expense_date DATE NOT NULL,
    payment_method payment_method NOT NULL DEFAULT 'cash',
    supplier_id UUID REFERENCES suppliers(id) ON DELETE SET NULL,
    receipt_number VARCHAR(100),
    created_by UUID REFERENCES users(id) ON DELETE SET NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_expenses_amount_positive CHECK (amount > 0)
);

CREATE INDEX idx_expenses_date ON expenses(expense_date DESC);
CREATE INDEX idx_expenses_category ON expenses(category, expense_date);
";

const MANUFACTURING_SQL: &str = r"
CREATE TABLE bills_of_materials (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    product_id UUID NOT NULL REFERENCES products(id) ON DELETE RESTRICT,
    name VARCHAR(255) NOT NULL,
    output_quantity NUMERIC(18, 3) NOT NULL DEFAULT 1,
    notes TEXT,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_boms_output CHECK (output_quantity > 0)
);

CREATE TABLE bom_components (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    bom_id UUID NOT NULL REFERENCES bills_of_materials(id) ON DELETE CASCADE,
    component_id UUID NOT NULL REFERENCES products(id) ON DELETE RESTRICT,
    quantity NUMERIC(18, 3) NOT NULL,
    UNIQUE (bom_id, component_id),
    CONSTRAINT chk_bom_components_quantity CHECK (quantity > 0)
);

CREATE TABLE production_orders (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    reference VARCHAR(30) NOT NULL UNIQUE,
    bom_id UUID NOT NULL REFERENCES bills_of_materials(id) ON DELETE RESTRICT,
    product_id UUID NOT NULL REFERENCES products(id) ON DELETE RESTRICT,
    quantity NUMERIC(18, 3) NOT NULL,
    status production_status NOT NULL DEFAULT 'planned',
    planned_date DATE NOT NULL,
    unit_cost NUMERIC(18, 4),
    notes TEXT,
    created_by UUID REFERENCES users(id) ON DELETE SET NULL,
    started_at TIMESTAMPTZ,
    completed_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_production_quantity CHECK (quantity > 0)
);

CREATE INDEX idx_bom_components_component ON bom_components(component_id);
CREATE INDEX idx_production_orders_bom ON production_orders(bom_id);
CREATE INDEX idx_production_orders_status ON production_orders(status, planned_date);
";

const TRIGGERS_SQL: &str = r"
-- ============================================================
-- FUNCTION: touch_updated_at
-- Keeps updated_at current on every UPDATE
-- ============================================================
CREATE OR REPLACE FUNCTION touch_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = now();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

DO $$
DECLARE
    t TEXT;
BEGIN
    FOREACH t IN ARRAY ARRAY[
        'users', 'products', 'suppliers', 'clients', 'commercials',
        'purchases', 'sales', 'van_sales', 'employees', 'attendances',
        'payrolls', 'expenses', 'bills_of_materials', 'production_orders'
    ] LOOP
        EXECUTE format(
            'CREATE TRIGGER trg_%s_updated_at BEFORE UPDATE ON %I
             FOR EACH ROW EXECUTE FUNCTION touch_updated_at()',
            t, t
        );
    END LOOP;
END;
$$;
";

const DROP_ALL_SQL: &str = r"
-- ============================================================
-- DROP ALL: Rollback migration
-- Order matters due to foreign key constraints
-- ============================================================

DROP TABLE IF EXISTS production_orders CASCADE;
DROP TABLE IF EXISTS bom_components CASCADE;
DROP TABLE IF EXISTS bills_of_materials CASCADE;
DROP TABLE IF EXISTS expenses CASCADE;
DROP TABLE IF EXISTS payrolls CASCADE;
DROP TABLE IF EXISTS attendances CASCADE;
DROP TABLE IF EXISTS employees CASCADE;
DROP TABLE IF EXISTS van_sale_items CASCADE;
DROP TABLE IF EXISTS van_sales CASCADE;
DROP TABLE IF EXISTS sale_items CASCADE;
DROP TABLE IF EXISTS sales CASCADE;
DROP TABLE IF EXISTS purchase_items CASCADE;
DROP TABLE IF EXISTS purchases CASCADE;
DROP TABLE IF EXISTS stock_movements CASCADE;
DROP TABLE IF EXISTS commercials CASCADE;
DROP TABLE IF EXISTS clients CASCADE;
DROP TABLE IF EXISTS suppliers CASCADE;
DROP TABLE IF EXISTS products CASCADE;
DROP TABLE IF EXISTS users CASCADE;

DROP FUNCTION IF EXISTS touch_updated_at();

DROP TYPE IF EXISTS production_status;
DROP TYPE IF EXISTS payment_method;
DROP TYPE IF EXISTS expense_category;
DROP TYPE IF EXISTS payroll_status;
DROP TYPE IF EXISTS attendance_status;
DROP TYPE IF EXISTS van_sale_status;
DROP TYPE IF EXISTS payment_status;
DROP TYPE IF EXISTS sale_status;
DROP TYPE IF EXISTS purchase_status;
DROP TYPE IF EXISTS movement_type;
DROP TYPE IF EXISTS product_kind;
DROP TYPE IF EXISTS user_role;
";
