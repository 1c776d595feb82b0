//! Database service for procurement-service.

use crate::models::{
    Branch, Category, CreateBranch, CreateCategory, CreateProduct, CreatePurchaseOrder,
    CreateSupplier, ListOrdersFilter, OrderLine, Product, PurchaseOrder, Supplier, UpdateBranch,
    UpdateCategory, UpdateProduct, UpdateSupplier,
};
use crate::pricing::{generate_sku, DocumentNumber, DocumentSummary, MonthYear, PricedLine};
use crate::services::metrics::DB_QUERY_DURATION;
use crate::services::repository::OrderRepository;
use async_trait::async_trait;
use chrono::{Datelike, Duration, Utc};
use rust_decimal::Decimal;
use service_core::error::AppError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use uuid::Uuid;

use tracing::{info, instrument};

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool.
    #[instrument(skip(database_url), fields(service = "procurement-service"))]
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, AppError> {
        info!(
            max_connections = max_connections,
            min_connections = min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .idle_timeout(std::time::Duration::from_secs(600))
            .connect(database_url)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check database health.
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Health check failed: {}", e)))?;
        Ok(())
    }

    /// Run database migrations.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Product Operations
    // -------------------------------------------------------------------------

    /// Create a new product, assigning its SKU from the durable sequence.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_product(&self, input: &CreateProduct) -> Result<Product, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_product"])
            .start_timer();

        let serial: i64 = sqlx::query_scalar("SELECT nextval('product_sku_seq')")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to advance SKU sequence: {}", e))
            })?;

        let today = Utc::now().date_naive();
        let sku = generate_sku((serial - 1).max(0) as usize, MonthYear::from_date(today));

        let product_id = Uuid::new_v4();
        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (product_id, name, description, hsn_code, unit_price, discount_percent, sku, active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, TRUE)
            RETURNING product_id, name, description, hsn_code, unit_price, discount_percent, sku, active, created_utc
            "#,
        )
        .bind(product_id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.hsn_code)
        .bind(input.unit_price)
        .bind(input.discount_percent)
        .bind(&sku)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::Conflict(anyhow::anyhow!("SKU '{}' already exists", sku))
            }
            _ => AppError::DatabaseError(anyhow::anyhow!("Failed to create product: {}", e)),
        })?;

        timer.observe_duration();

        info!(product_id = %product.product_id, sku = %product.sku, "Product created");

        Ok(product)
    }

    /// Get a product by ID.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn get_product(&self, product_id: Uuid) -> Result<Option<Product>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_product"])
            .start_timer();

        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT product_id, name, description, hsn_code, unit_price, discount_percent, sku, active, created_utc
            FROM products
            WHERE product_id = $1
            "#,
        )
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get product: {}", e)))?;

        timer.observe_duration();

        Ok(product)
    }

    /// List products, optionally only active ones.
    #[instrument(skip(self))]
    pub async fn list_products(
        &self,
        active_only: bool,
        page_size: i32,
        page_token: Option<Uuid>,
    ) -> Result<Vec<Product>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_products"])
            .start_timer();

        let limit = page_size.clamp(1, 100) as i64;

        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT product_id, name, description, hsn_code, unit_price, discount_percent, sku, active, created_utc
            FROM products
            WHERE ($1::bool = FALSE OR active = TRUE)
              AND ($2::uuid IS NULL OR product_id > $2)
            ORDER BY product_id
            LIMIT $3
            "#,
        )
        .bind(active_only)
        .bind(page_token)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list products: {}", e)))?;

        timer.observe_duration();

        Ok(products)
    }

    /// Update a product. Absent fields keep their current value.
    #[instrument(skip(self, input), fields(product_id = %product_id))]
    pub async fn update_product(
        &self,
        product_id: Uuid,
        input: &UpdateProduct,
    ) -> Result<Option<Product>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_product"])
            .start_timer();

        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                hsn_code = COALESCE($4, hsn_code),
                unit_price = COALESCE($5, unit_price),
                discount_percent = COALESCE($6, discount_percent),
                active = COALESCE($7, active)
            WHERE product_id = $1
            RETURNING product_id, name, description, hsn_code, unit_price, discount_percent, sku, active, created_utc
            "#,
        )
        .bind(product_id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.hsn_code)
        .bind(input.unit_price)
        .bind(input.discount_percent)
        .bind(input.active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to update product: {}", e)))?;

        timer.observe_duration();

        Ok(product)
    }

    /// Delete a product. Existing order lines keep their snapshot of it.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn delete_product(&self, product_id: Uuid) -> Result<bool, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["delete_product"])
            .start_timer();

        let result = sqlx::query("DELETE FROM products WHERE product_id = $1")
            .bind(product_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to delete product: {}", e))
            })?;

        timer.observe_duration();

        Ok(result.rows_affected() > 0)
    }

    // -------------------------------------------------------------------------
    // Supplier Operations
    // -------------------------------------------------------------------------

    /// Create a new supplier.
    #[instrument(skip(self, input), fields(code = %input.code))]
    pub async fn create_supplier(&self, input: &CreateSupplier) -> Result<Supplier, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_supplier"])
            .start_timer();

        let supplier_id = Uuid::new_v4();
        let supplier = sqlx::query_as::<_, Supplier>(
            r#"
            INSERT INTO suppliers (
                supplier_id, code, company_name, contact_name, door_number, street, city, state,
                country, email, phone, gst_number, bank_name, bank_account_number, ifsc, upi,
                payment_terms, active
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, TRUE)
            RETURNING supplier_id, code, company_name, contact_name, door_number, street, city, state,
                      country, email, phone, gst_number, bank_name, bank_account_number, ifsc, upi,
                      payment_terms, active, created_utc
            "#,
        )
        .bind(supplier_id)
        .bind(&input.code)
        .bind(&input.company_name)
        .bind(&input.contact_name)
        .bind(&input.door_number)
        .bind(&input.street)
        .bind(&input.city)
        .bind(&input.state)
        .bind(&input.country)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.gst_number)
        .bind(&input.bank_name)
        .bind(&input.bank_account_number)
        .bind(&input.ifsc)
        .bind(&input.upi)
        .bind(&input.payment_terms)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::Conflict(anyhow::anyhow!("Supplier '{}' already exists", input.code))
            }
            _ => AppError::DatabaseError(anyhow::anyhow!("Failed to create supplier: {}", e)),
        })?;

        timer.observe_duration();

        info!(supplier_id = %supplier.supplier_id, code = %supplier.code, "Supplier created");

        Ok(supplier)
    }

    /// Get a supplier by ID.
    #[instrument(skip(self), fields(supplier_id = %supplier_id))]
    pub async fn get_supplier(&self, supplier_id: Uuid) -> Result<Option<Supplier>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_supplier"])
            .start_timer();

        let supplier = sqlx::query_as::<_, Supplier>(
            r#"
            SELECT supplier_id, code, company_name, contact_name, door_number, street, city, state,
                   country, email, phone, gst_number, bank_name, bank_account_number, ifsc, upi,
                   payment_terms, active, created_utc
            FROM suppliers
            WHERE supplier_id = $1
            "#,
        )
        .bind(supplier_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get supplier: {}", e)))?;

        timer.observe_duration();

        Ok(supplier)
    }

    /// List suppliers.
    #[instrument(skip(self))]
    pub async fn list_suppliers(
        &self,
        active_only: bool,
        page_size: i32,
        page_token: Option<Uuid>,
    ) -> Result<Vec<Supplier>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_suppliers"])
            .start_timer();

        let limit = page_size.clamp(1, 100) as i64;

        let suppliers = sqlx::query_as::<_, Supplier>(
            r#"
            SELECT supplier_id, code, company_name, contact_name, door_number, street, city, state,
                   country, email, phone, gst_number, bank_name, bank_account_number, ifsc, upi,
                   payment_terms, active, created_utc
            FROM suppliers
            WHERE ($1::bool = FALSE OR active = TRUE)
              AND ($2::uuid IS NULL OR supplier_id > $2)
            ORDER BY supplier_id
            LIMIT $3
            "#,
        )
        .bind(active_only)
        .bind(page_token)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list suppliers: {}", e)))?;

        timer.observe_duration();

        Ok(suppliers)
    }

    /// Update a supplier. Absent fields keep their current value.
    #[instrument(skip(self, input), fields(supplier_id = %supplier_id))]
    pub async fn update_supplier(
        &self,
        supplier_id: Uuid,
        input: &UpdateSupplier,
    ) -> Result<Option<Supplier>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_supplier"])
            .start_timer();

        let supplier = sqlx::query_as::<_, Supplier>(
            r#"
            UPDATE suppliers
            SET company_name = COALESCE($2, company_name),
                contact_name = COALESCE($3, contact_name),
                door_number = COALESCE($4, door_number),
                street = COALESCE($5, street),
                city = COALESCE($6, city),
                state = COALESCE($7, state),
                country = COALESCE($8, country),
                email = COALESCE($9, email),
                phone = COALESCE($10, phone),
                gst_number = COALESCE($11, gst_number),
                bank_name = COALESCE($12, bank_name),
                bank_account_number = COALESCE($13, bank_account_number),
                ifsc = COALESCE($14, ifsc),
                upi = COALESCE($15, upi),
                payment_terms = COALESCE($16, payment_terms),
                active = COALESCE($17, active)
            WHERE supplier_id = $1
            RETURNING supplier_id, code, company_name, contact_name, door_number, street, city, state,
                      country, email, phone, gst_number, bank_name, bank_account_number, ifsc, upi,
                      payment_terms, active, created_utc
            "#,
        )
        .bind(supplier_id)
        .bind(&input.company_name)
        .bind(&input.contact_name)
        .bind(&input.door_number)
        .bind(&input.street)
        .bind(&input.city)
        .bind(&input.state)
        .bind(&input.country)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.gst_number)
        .bind(&input.bank_name)
        .bind(&input.bank_account_number)
        .bind(&input.ifsc)
        .bind(&input.upi)
        .bind(&input.payment_terms)
        .bind(input.active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to update supplier: {}", e))
        })?;

        timer.observe_duration();

        Ok(supplier)
    }

    /// Delete a supplier. Fails if purchase documents still reference it.
    #[instrument(skip(self), fields(supplier_id = %supplier_id))]
    pub async fn delete_supplier(&self, supplier_id: Uuid) -> Result<bool, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["delete_supplier"])
            .start_timer();

        let result = sqlx::query("DELETE FROM suppliers WHERE supplier_id = $1")
            .bind(supplier_id)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                    AppError::Conflict(anyhow::anyhow!(
                        "Supplier is referenced by purchase documents"
                    ))
                }
                _ => AppError::DatabaseError(anyhow::anyhow!("Failed to delete supplier: {}", e)),
            })?;

        timer.observe_duration();

        Ok(result.rows_affected() > 0)
    }

    // -------------------------------------------------------------------------
    // Category Operations
    // -------------------------------------------------------------------------

    /// Create a category. A parent makes it a sub-category.
    #[instrument(skip(self, input), fields(code = %input.code))]
    pub async fn create_category(&self, input: &CreateCategory) -> Result<Category, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_category"])
            .start_timer();

        let category_id = Uuid::new_v4();
        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (category_id, name, code, parent_id, active)
            VALUES ($1, $2, $3, $4, TRUE)
            RETURNING category_id, name, code, parent_id, active, created_utc
            "#,
        )
        .bind(category_id)
        .bind(&input.name)
        .bind(&input.code)
        .bind(input.parent_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::Conflict(anyhow::anyhow!("Category '{}' already exists", input.code))
            }
            sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                AppError::BadRequest(anyhow::anyhow!("Parent category does not exist"))
            }
            _ => AppError::DatabaseError(anyhow::anyhow!("Failed to create category: {}", e)),
        })?;

        timer.observe_duration();

        Ok(category)
    }

    /// List categories, top-level or children of `parent_id`.
    #[instrument(skip(self))]
    pub async fn list_categories(
        &self,
        parent_id: Option<Uuid>,
        active_only: bool,
    ) -> Result<Vec<Category>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_categories"])
            .start_timer();

        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT category_id, name, code, parent_id, active, created_utc
            FROM categories
            WHERE ($1::uuid IS NULL OR parent_id = $1)
              AND ($2::bool = FALSE OR active = TRUE)
            ORDER BY name
            "#,
        )
        .bind(parent_id)
        .bind(active_only)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to list categories: {}", e))
        })?;

        timer.observe_duration();

        Ok(categories)
    }

    /// Update a category.
    #[instrument(skip(self, input), fields(category_id = %category_id))]
    pub async fn update_category(
        &self,
        category_id: Uuid,
        input: &UpdateCategory,
    ) -> Result<Option<Category>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_category"])
            .start_timer();

        let category = sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
            SET name = COALESCE($2, name),
                code = COALESCE($3, code),
                active = COALESCE($4, active)
            WHERE category_id = $1
            RETURNING category_id, name, code, parent_id, active, created_utc
            "#,
        )
        .bind(category_id)
        .bind(&input.name)
        .bind(&input.code)
        .bind(input.active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to update category: {}", e))
        })?;

        timer.observe_duration();

        Ok(category)
    }

    /// Delete a category and detach its children.
    #[instrument(skip(self), fields(category_id = %category_id))]
    pub async fn delete_category(&self, category_id: Uuid) -> Result<bool, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["delete_category"])
            .start_timer();

        let result = sqlx::query("DELETE FROM categories WHERE category_id = $1")
            .bind(category_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to delete category: {}", e))
            })?;

        timer.observe_duration();

        Ok(result.rows_affected() > 0)
    }

    // -------------------------------------------------------------------------
    // Branch Operations
    // -------------------------------------------------------------------------

    /// Create a branch.
    #[instrument(skip(self, input), fields(code = %input.code))]
    pub async fn create_branch(&self, input: &CreateBranch) -> Result<Branch, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_branch"])
            .start_timer();

        let branch_id = Uuid::new_v4();
        let branch = sqlx::query_as::<_, Branch>(
            r#"
            INSERT INTO branches (branch_id, name, code, location, mobile, email, is_main_branch, active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, TRUE)
            RETURNING branch_id, name, code, location, mobile, email, is_main_branch, active, created_utc
            "#,
        )
        .bind(branch_id)
        .bind(&input.name)
        .bind(&input.code)
        .bind(&input.location)
        .bind(&input.mobile)
        .bind(&input.email)
        .bind(input.is_main_branch)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::Conflict(anyhow::anyhow!("Branch '{}' already exists", input.code))
            }
            _ => AppError::DatabaseError(anyhow::anyhow!("Failed to create branch: {}", e)),
        })?;

        timer.observe_duration();

        Ok(branch)
    }

    /// List branches.
    #[instrument(skip(self))]
    pub async fn list_branches(&self, active_only: bool) -> Result<Vec<Branch>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_branches"])
            .start_timer();

        let branches = sqlx::query_as::<_, Branch>(
            r#"
            SELECT branch_id, name, code, location, mobile, email, is_main_branch, active, created_utc
            FROM branches
            WHERE ($1::bool = FALSE OR active = TRUE)
            ORDER BY name
            "#,
        )
        .bind(active_only)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list branches: {}", e)))?;

        timer.observe_duration();

        Ok(branches)
    }

    /// Update a branch.
    #[instrument(skip(self, input), fields(branch_id = %branch_id))]
    pub async fn update_branch(
        &self,
        branch_id: Uuid,
        input: &UpdateBranch,
    ) -> Result<Option<Branch>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_branch"])
            .start_timer();

        let branch = sqlx::query_as::<_, Branch>(
            r#"
            UPDATE branches
            SET name = COALESCE($2, name),
                location = COALESCE($3, location),
                mobile = COALESCE($4, mobile),
                email = COALESCE($5, email),
                is_main_branch = COALESCE($6, is_main_branch),
                active = COALESCE($7, active)
            WHERE branch_id = $1
            RETURNING branch_id, name, code, location, mobile, email, is_main_branch, active, created_utc
            "#,
        )
        .bind(branch_id)
        .bind(&input.name)
        .bind(&input.location)
        .bind(&input.mobile)
        .bind(&input.email)
        .bind(input.is_main_branch)
        .bind(input.active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to update branch: {}", e)))?;

        timer.observe_duration();

        Ok(branch)
    }

    /// Delete a branch. Fails if purchase documents still reference it.
    #[instrument(skip(self), fields(branch_id = %branch_id))]
    pub async fn delete_branch(&self, branch_id: Uuid) -> Result<bool, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["delete_branch"])
            .start_timer();

        let result = sqlx::query("DELETE FROM branches WHERE branch_id = $1")
            .bind(branch_id)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                    AppError::Conflict(anyhow::anyhow!(
                        "Branch is referenced by purchase documents"
                    ))
                }
                _ => AppError::DatabaseError(anyhow::anyhow!("Failed to delete branch: {}", e)),
            })?;

        timer.observe_duration();

        Ok(result.rows_affected() > 0)
    }
}

// -------------------------------------------------------------------------
// Purchase Document Operations
// -------------------------------------------------------------------------

#[async_trait]
impl OrderRepository for Database {
    /// Persist a document with its priced lines in one transaction.
    #[instrument(skip(self, input, lines, summary), fields(kind = input.kind.as_str()))]
    async fn save(
        &self,
        input: &CreatePurchaseOrder,
        lines: &[PricedLine],
        summary: &DocumentSummary,
    ) -> Result<(PurchaseOrder, Vec<OrderLine>), AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["save_order"])
            .start_timer();

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        let order_seq: i64 = sqlx::query_scalar("SELECT nextval('purchase_order_seq')")
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to advance order sequence: {}", e))
            })?;

        let created = Utc::now();
        let order_ref = DocumentNumber::OrderRef {
            epoch_millis: created.timestamp_millis(),
        }
        .to_string();
        let invoice_no = DocumentNumber::PurchaseInvoice {
            day: created.day(),
            month: created.month(),
            sequence: order_seq as u32,
        }
        .to_string();
        let credited_date = (created + Duration::days(i64::from(input.credited_days))).date_naive();

        let order_id = Uuid::new_v4();
        let order = sqlx::query_as::<_, PurchaseOrder>(
            r#"
            INSERT INTO purchase_orders (
                order_id, order_seq, order_ref, invoice_no, kind, status, supplier_id, branch_id,
                tax_enabled, tax_rate, sub_total, discount_total, taxable_amount, tax_total,
                grand_total, amount_paid, credited_days, credited_date, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
            RETURNING order_id, order_seq, order_ref, invoice_no, kind, status, supplier_id, branch_id,
                      tax_enabled, tax_rate, sub_total, discount_total, taxable_amount, tax_total,
                      grand_total, amount_paid, credited_days, credited_date, notes,
                      created_utc, updated_utc
            "#,
        )
        .bind(order_id)
        .bind(order_seq)
        .bind(&order_ref)
        .bind(&invoice_no)
        .bind(input.kind.as_str())
        .bind(crate::models::OrderStatus::New.as_str())
        .bind(input.supplier_id)
        .bind(input.branch_id)
        .bind(input.tax_enabled)
        .bind(input.tax_rate)
        .bind(summary.sub_total)
        .bind(summary.discount_total)
        .bind(summary.taxable_amount)
        .bind(summary.tax_total)
        .bind(summary.grand_total)
        .bind(input.amount_paid)
        .bind(input.credited_days)
        .bind(credited_date)
        .bind(&input.notes)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                AppError::BadRequest(anyhow::anyhow!("Unknown supplier or branch"))
            }
            _ => AppError::DatabaseError(anyhow::anyhow!("Failed to create order: {}", e)),
        })?;

        let mut order_lines = Vec::with_capacity(lines.len());
        for (index, line) in lines.iter().enumerate() {
            let order_line = sqlx::query_as::<_, OrderLine>(
                r#"
                INSERT INTO purchase_order_lines (
                    line_id, order_id, line_no, product_id, product_name, hsn_code, sku,
                    quantity, unit_price, discount_percent, discount_amount, line_total
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                RETURNING line_id, order_id, line_no, product_id, product_name, hsn_code, sku,
                          quantity, unit_price, discount_percent, discount_amount, line_total,
                          created_utc
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(order_id)
            .bind((index + 1) as i32)
            .bind(line.product.product_id)
            .bind(&line.product.name)
            .bind(&line.product.hsn_code)
            .bind(&line.sku)
            .bind(line.quantity)
            .bind(line.unit_price)
            .bind(line.discount_percent)
            .bind(line.discount_amount)
            .bind(line.line_total)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to insert line: {}", e))
            })?;
            order_lines.push(order_line);
        }

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to commit order: {}", e))
        })?;

        timer.observe_duration();

        info!(
            order_id = %order.order_id,
            order_ref = %order.order_ref,
            invoice_no = %order.invoice_no,
            lines = order_lines.len(),
            "Purchase document created"
        );

        Ok((order, order_lines))
    }

    /// Fetch a document with its lines.
    #[instrument(skip(self), fields(order_id = %order_id))]
    async fn get(
        &self,
        order_id: Uuid,
    ) -> Result<Option<(PurchaseOrder, Vec<OrderLine>)>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_order"])
            .start_timer();

        let order = sqlx::query_as::<_, PurchaseOrder>(
            r#"
            SELECT order_id, order_seq, order_ref, invoice_no, kind, status, supplier_id, branch_id,
                   tax_enabled, tax_rate, sub_total, discount_total, taxable_amount, tax_total,
                   grand_total, amount_paid, credited_days, credited_date, notes,
                   created_utc, updated_utc
            FROM purchase_orders
            WHERE order_id = $1
            "#,
        )
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get order: {}", e)))?;

        let Some(order) = order else {
            timer.observe_duration();
            return Ok(None);
        };

        let lines = sqlx::query_as::<_, OrderLine>(
            r#"
            SELECT line_id, order_id, line_no, product_id, product_name, hsn_code, sku,
                   quantity, unit_price, discount_percent, discount_amount, line_total, created_utc
            FROM purchase_order_lines
            WHERE order_id = $1
            ORDER BY line_no
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to get order lines: {}", e))
        })?;

        timer.observe_duration();

        Ok(Some((order, lines)))
    }

    /// List document headers matching the filter.
    #[instrument(skip(self, filter))]
    async fn list(&self, filter: &ListOrdersFilter) -> Result<Vec<PurchaseOrder>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_orders"])
            .start_timer();

        let limit = filter.page_size.clamp(1, 100) as i64;
        let kind = filter.kind.map(|k| k.as_str());
        let status = filter.status.map(|s| s.as_str());
        let payment_status = filter.payment_status.map(|p| p.as_str());

        let orders = sqlx::query_as::<_, PurchaseOrder>(
            r#"
            SELECT order_id, order_seq, order_ref, invoice_no, kind, status, supplier_id, branch_id,
                   tax_enabled, tax_rate, sub_total, discount_total, taxable_amount, tax_total,
                   grand_total, amount_paid, credited_days, credited_date, notes,
                   created_utc, updated_utc
            FROM purchase_orders
            WHERE ($1::text IS NULL OR kind = $1)
              AND ($2::text IS NULL OR status = $2)
              AND ($3::text IS NULL OR
                   (CASE WHEN amount_paid >= grand_total THEN 'paid' ELSE 'pending' END) = $3)
              AND ($4::uuid IS NULL OR order_id > $4)
            ORDER BY order_id
            LIMIT $5
            "#,
        )
        .bind(kind)
        .bind(status)
        .bind(payment_status)
        .bind(filter.page_token)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list orders: {}", e)))?;

        timer.observe_duration();

        Ok(orders)
    }

    /// Delete a document; lines cascade.
    #[instrument(skip(self), fields(order_id = %order_id))]
    async fn delete(&self, order_id: Uuid) -> Result<bool, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["delete_order"])
            .start_timer();

        let result = sqlx::query("DELETE FROM purchase_orders WHERE order_id = $1")
            .bind(order_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to delete order: {}", e))
            })?;

        timer.observe_duration();

        Ok(result.rows_affected() > 0)
    }

    /// Add a payment; the pending balance is derived on read and may go
    /// negative on overpayment.
    #[instrument(skip(self), fields(order_id = %order_id))]
    async fn record_payment(
        &self,
        order_id: Uuid,
        amount: Decimal,
    ) -> Result<Option<PurchaseOrder>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["record_payment"])
            .start_timer();

        let order = sqlx::query_as::<_, PurchaseOrder>(
            r#"
            UPDATE purchase_orders
            SET amount_paid = amount_paid + $2,
                updated_utc = NOW()
            WHERE order_id = $1
            RETURNING order_id, order_seq, order_ref, invoice_no, kind, status, supplier_id, branch_id,
                      tax_enabled, tax_rate, sub_total, discount_total, taxable_amount, tax_total,
                      grand_total, amount_paid, credited_days, credited_date, notes,
                      created_utc, updated_utc
            "#,
        )
        .bind(order_id)
        .bind(amount)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to record payment: {}", e))
        })?;

        timer.observe_duration();

        Ok(order)
    }
}
