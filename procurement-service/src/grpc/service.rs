//! ProcurementService gRPC implementation.

use crate::config::PricingConfig;
use crate::grpc::proto::{
    procurement_service_server::ProcurementService, Branch as ProtoBranch,
    Category as ProtoCategory, CreateBranchRequest, CreateBranchResponse, CreateCategoryRequest,
    CreateCategoryResponse, CreateProductRequest, CreateProductResponse,
    CreatePurchaseOrderRequest, CreatePurchaseOrderResponse, CreateSupplierRequest,
    CreateSupplierResponse, DeleteBranchRequest, DeleteBranchResponse, DeleteCategoryRequest,
    DeleteCategoryResponse, DeleteProductRequest, DeleteProductResponse,
    DeletePurchaseOrderRequest, DeletePurchaseOrderResponse, DeleteSupplierRequest,
    DeleteSupplierResponse, DocumentSummary as ProtoDocumentSummary, GetProductRequest,
    GetProductResponse, GetPurchaseOrderRequest, GetPurchaseOrderResponse, GetSupplierRequest,
    GetSupplierResponse, LineItem as ProtoLineItem, LineItemInput, ListBranchesRequest,
    ListBranchesResponse, ListCategoriesRequest, ListCategoriesResponse, ListProductsRequest,
    ListProductsResponse, ListPurchaseOrdersRequest, ListPurchaseOrdersResponse,
    ListSuppliersRequest, ListSuppliersResponse, OrderKind as ProtoOrderKind,
    OrderStatus as ProtoOrderStatus, PaymentStatus as ProtoPaymentStatus,
    PriceDocumentRequest, PriceDocumentResponse, Product as ProtoProduct,
    PurchaseOrder as ProtoPurchaseOrder, RecordPaymentRequest, RecordPaymentResponse,
    Supplier as ProtoSupplier, UpdateBranchRequest, UpdateBranchResponse, UpdateCategoryRequest,
    UpdateCategoryResponse, UpdateProductRequest, UpdateProductResponse, UpdateSupplierRequest,
    UpdateSupplierResponse,
};
use crate::models::{
    Branch, Category, CreateBranch, CreateCategory, CreateProduct, CreatePurchaseOrder,
    CreateSupplier, ListOrdersFilter, OrderKind, OrderLine, OrderStatus, PaymentStatus, Product,
    PurchaseOrder, Supplier, UpdateBranch, UpdateCategory, UpdateProduct, UpdateSupplier,
};
use crate::pricing::{
    compute_summary, price_line, DocumentSummary, LineInput, MonthYear, PricedLine, ProductRef,
};
use crate::services::metrics::{
    ERRORS_TOTAL, GRPC_REQUESTS_TOTAL, GRPC_REQUEST_DURATION, ORDERS_TOTAL, ORDER_AMOUNT_TOTAL,
    PAYMENTS_TOTAL,
};
use crate::services::{Database, OrderRepository};
use chrono::Utc;
use prost_types::Timestamp;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use service_core::error::AppError;
use service_core::grpc::IntoStatus;
use std::str::FromStr;
use std::sync::Arc;
use tonic::{Request, Response, Status};
use tracing::{info, instrument, warn, Span};
use uuid::Uuid;

/// ProcurementService implementation.
pub struct ProcurementServiceImpl {
    orders: Arc<dyn OrderRepository>,
    db: Arc<Database>,
    pricing: PricingConfig,
}

impl ProcurementServiceImpl {
    /// Create a new ProcurementService instance.
    pub fn new(orders: Arc<dyn OrderRepository>, db: Arc<Database>, pricing: PricingConfig) -> Self {
        Self {
            orders,
            db,
            pricing,
        }
    }

    // -------------------------------------------------------------------------
    // Request helpers
    // -------------------------------------------------------------------------

    /// Record an invalid-argument failure and build the status.
    fn invalid(method: &str, message: impl Into<String>) -> Status {
        GRPC_REQUESTS_TOTAL
            .with_label_values(&[method, "invalid_argument"])
            .inc();
        ERRORS_TOTAL.with_label_values(&["validation_error"]).inc();
        Status::invalid_argument(message)
    }

    /// Record a not-found outcome and build the status.
    fn not_found(method: &str, message: &str) -> Status {
        GRPC_REQUESTS_TOTAL
            .with_label_values(&[method, "not_found"])
            .inc();
        Status::not_found(message)
    }

    /// Record a store failure and convert it to a status.
    fn store_error(method: &str, error: AppError) -> Status {
        warn!(method = method, error = %error, "Store operation failed");
        GRPC_REQUESTS_TOTAL
            .with_label_values(&[method, "error"])
            .inc();
        ERRORS_TOTAL.with_label_values(&["db_error"]).inc();
        error.into_status()
    }

    fn record_ok(method: &str) {
        GRPC_REQUESTS_TOTAL
            .with_label_values(&[method, "ok"])
            .inc();
    }

    fn parse_uuid(method: &str, field: &str, value: &str) -> Result<Uuid, Status> {
        Uuid::parse_str(value)
            .map_err(|_| Self::invalid(method, format!("Invalid {} format", field)))
    }

    fn parse_decimal(method: &str, field: &str, value: &str) -> Result<Decimal, Status> {
        Decimal::from_str(value)
            .map_err(|_| Self::invalid(method, format!("Invalid {} format", field)))
    }

    /// Parse a decimal field that defaults to zero when empty.
    fn parse_decimal_or_zero(method: &str, field: &str, value: &str) -> Result<Decimal, Status> {
        if value.is_empty() {
            Ok(Decimal::ZERO)
        } else {
            Self::parse_decimal(method, field, value)
        }
    }

    fn non_empty(value: String) -> Option<String> {
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }

    fn datetime_to_timestamp(dt: chrono::DateTime<chrono::Utc>) -> Timestamp {
        Timestamp {
            seconds: dt.timestamp(),
            nanos: dt.timestamp_subsec_nanos() as i32,
        }
    }

    // -------------------------------------------------------------------------
    // Domain <-> proto mapping
    // -------------------------------------------------------------------------

    fn kind_from_proto(value: i32) -> Option<OrderKind> {
        match value {
            x if x == ProtoOrderKind::Purchase as i32 => Some(OrderKind::Purchase),
            x if x == ProtoOrderKind::GoodsReceived as i32 => Some(OrderKind::GoodsReceived),
            x if x == ProtoOrderKind::GoodsReturned as i32 => Some(OrderKind::GoodsReturned),
            _ => None,
        }
    }

    fn kind_to_proto(kind: OrderKind) -> i32 {
        match kind {
            OrderKind::Purchase => ProtoOrderKind::Purchase as i32,
            OrderKind::GoodsReceived => ProtoOrderKind::GoodsReceived as i32,
            OrderKind::GoodsReturned => ProtoOrderKind::GoodsReturned as i32,
        }
    }

    fn status_from_proto(value: i32) -> Option<OrderStatus> {
        match value {
            x if x == ProtoOrderStatus::New as i32 => Some(OrderStatus::New),
            x if x == ProtoOrderStatus::InProgress as i32 => Some(OrderStatus::InProgress),
            x if x == ProtoOrderStatus::Complete as i32 => Some(OrderStatus::Complete),
            _ => None,
        }
    }

    fn status_to_proto(status: OrderStatus) -> i32 {
        match status {
            OrderStatus::New => ProtoOrderStatus::New as i32,
            OrderStatus::InProgress => ProtoOrderStatus::InProgress as i32,
            OrderStatus::Complete => ProtoOrderStatus::Complete as i32,
        }
    }

    fn payment_status_from_proto(value: i32) -> Option<PaymentStatus> {
        match value {
            x if x == ProtoPaymentStatus::Pending as i32 => Some(PaymentStatus::Pending),
            x if x == ProtoPaymentStatus::Paid as i32 => Some(PaymentStatus::Paid),
            _ => None,
        }
    }

    fn payment_status_to_proto(status: PaymentStatus) -> i32 {
        match status {
            PaymentStatus::Pending => ProtoPaymentStatus::Pending as i32,
            PaymentStatus::Paid => ProtoPaymentStatus::Paid as i32,
        }
    }

    fn summary_to_proto(summary: &DocumentSummary) -> ProtoDocumentSummary {
        ProtoDocumentSummary {
            sub_total: summary.sub_total.to_string(),
            discount_total: summary.discount_total.to_string(),
            taxable_amount: summary.taxable_amount.to_string(),
            tax_total: summary.tax_total.to_string(),
            grand_total: summary.grand_total.to_string(),
            pending_payment: summary.pending_payment.to_string(),
        }
    }

    /// Rebuild the summary projection from a stored header.
    fn summary_from_order(order: &PurchaseOrder) -> ProtoDocumentSummary {
        ProtoDocumentSummary {
            sub_total: order.sub_total.to_string(),
            discount_total: order.discount_total.to_string(),
            taxable_amount: order.taxable_amount.to_string(),
            tax_total: order.tax_total.to_string(),
            grand_total: order.grand_total.to_string(),
            pending_payment: (order.grand_total - order.amount_paid).to_string(),
        }
    }

    fn priced_line_to_proto(index: usize, line: &PricedLine) -> ProtoLineItem {
        ProtoLineItem {
            line_id: String::new(),
            line_no: (index + 1) as i32,
            product_id: line.product.product_id.to_string(),
            product_name: line.product.name.clone(),
            hsn_code: line.product.hsn_code.clone(),
            sku: line.sku.clone(),
            quantity: line.quantity,
            unit_price: line.unit_price.to_string(),
            discount_percent: line.discount_percent.to_string(),
            discount_amount: line.discount_amount.to_string(),
            line_total: line.line_total.to_string(),
        }
    }

    fn order_line_to_proto(line: &OrderLine) -> ProtoLineItem {
        ProtoLineItem {
            line_id: line.line_id.to_string(),
            line_no: line.line_no,
            product_id: line.product_id.to_string(),
            product_name: line.product_name.clone(),
            hsn_code: line.hsn_code.clone(),
            sku: line.sku.clone(),
            quantity: line.quantity,
            unit_price: line.unit_price.to_string(),
            discount_percent: line.discount_percent.to_string(),
            discount_amount: line.discount_amount.to_string(),
            line_total: line.line_total.to_string(),
        }
    }

    fn order_to_proto(order: &PurchaseOrder, lines: &[OrderLine]) -> ProtoPurchaseOrder {
        ProtoPurchaseOrder {
            order_id: order.order_id.to_string(),
            order_seq: order.order_seq,
            order_ref: order.order_ref.clone(),
            invoice_no: order.invoice_no.clone(),
            kind: Self::kind_to_proto(OrderKind::from_string(&order.kind)),
            status: Self::status_to_proto(OrderStatus::from_string(&order.status)),
            supplier_id: order.supplier_id.to_string(),
            branch_id: order.branch_id.to_string(),
            tax_enabled: order.tax_enabled,
            tax_rate: order.tax_rate.to_string(),
            summary: Some(Self::summary_from_order(order)),
            payment_status: Self::payment_status_to_proto(order.payment_status()),
            credited_days: order.credited_days,
            credited_date: order.credited_date.format("%Y-%m-%d").to_string(),
            notes: order.notes.clone().unwrap_or_default(),
            lines: lines.iter().map(Self::order_line_to_proto).collect(),
            created_utc: Some(Self::datetime_to_timestamp(order.created_utc)),
            updated_utc: Some(Self::datetime_to_timestamp(order.updated_utc)),
        }
    }

    fn product_to_proto(product: &Product) -> ProtoProduct {
        ProtoProduct {
            product_id: product.product_id.to_string(),
            name: product.name.clone(),
            description: product.description.clone().unwrap_or_default(),
            hsn_code: product.hsn_code.clone(),
            unit_price: product.unit_price.to_string(),
            discount_percent: product.discount_percent.to_string(),
            sku: product.sku.clone(),
            active: product.active,
            created_utc: Some(Self::datetime_to_timestamp(product.created_utc)),
        }
    }

    fn supplier_to_proto(supplier: &Supplier) -> ProtoSupplier {
        ProtoSupplier {
            supplier_id: supplier.supplier_id.to_string(),
            code: supplier.code.clone(),
            company_name: supplier.company_name.clone(),
            contact_name: supplier.contact_name.clone().unwrap_or_default(),
            door_number: supplier.door_number.clone().unwrap_or_default(),
            street: supplier.street.clone().unwrap_or_default(),
            city: supplier.city.clone().unwrap_or_default(),
            state: supplier.state.clone().unwrap_or_default(),
            country: supplier.country.clone().unwrap_or_default(),
            email: supplier.email.clone().unwrap_or_default(),
            phone: supplier.phone.clone().unwrap_or_default(),
            gst_number: supplier.gst_number.clone().unwrap_or_default(),
            bank_name: supplier.bank_name.clone().unwrap_or_default(),
            bank_account_number: supplier.bank_account_number.clone().unwrap_or_default(),
            ifsc: supplier.ifsc.clone().unwrap_or_default(),
            upi: supplier.upi.clone().unwrap_or_default(),
            payment_terms: supplier.payment_terms.clone().unwrap_or_default(),
            active: supplier.active,
            created_utc: Some(Self::datetime_to_timestamp(supplier.created_utc)),
        }
    }

    fn category_to_proto(category: &Category) -> ProtoCategory {
        ProtoCategory {
            category_id: category.category_id.to_string(),
            name: category.name.clone(),
            code: category.code.clone(),
            parent_id: category
                .parent_id
                .map(|id| id.to_string())
                .unwrap_or_default(),
            active: category.active,
            created_utc: Some(Self::datetime_to_timestamp(category.created_utc)),
        }
    }

    fn branch_to_proto(branch: &Branch) -> ProtoBranch {
        ProtoBranch {
            branch_id: branch.branch_id.to_string(),
            name: branch.name.clone(),
            code: branch.code.clone(),
            location: branch.location.clone().unwrap_or_default(),
            mobile: branch.mobile.clone().unwrap_or_default(),
            email: branch.email.clone().unwrap_or_default(),
            is_main_branch: branch.is_main_branch,
            active: branch.active,
            created_utc: Some(Self::datetime_to_timestamp(branch.created_utc)),
        }
    }

    /// Parse and price candidate lines through the engine. Line SKUs derive
    /// from the position within the document and today's date.
    fn price_request_lines(
        method: &str,
        inputs: &[LineItemInput],
    ) -> Result<Vec<PricedLine>, Status> {
        let month_year = MonthYear::from_date(Utc::now().date_naive());
        let mut priced = Vec::with_capacity(inputs.len());

        for (index, input) in inputs.iter().enumerate() {
            let product_id = Self::parse_uuid(method, "product_id", &input.product_id)?;
            if input.product_name.is_empty() {
                return Err(Self::invalid(method, "product_name is required"));
            }
            let unit_price = Self::parse_decimal(method, "unit_price", &input.unit_price)?;
            let discount_percent =
                Self::parse_decimal_or_zero(method, "discount_percent", &input.discount_percent)?;

            let line = price_line(
                LineInput {
                    product: ProductRef {
                        product_id,
                        name: input.product_name.clone(),
                        hsn_code: if input.hsn_code.is_empty() {
                            "NA".to_string()
                        } else {
                            input.hsn_code.clone()
                        },
                    },
                    quantity: input.quantity,
                    unit_price,
                    discount_percent,
                },
                index,
                month_year,
            )
            .map_err(|e| Self::invalid(method, e.to_string()))?;

            priced.push(line);
        }

        Ok(priced)
    }
}

#[tonic::async_trait]
impl ProcurementService for ProcurementServiceImpl {
    // -------------------------------------------------------------------------
    // Pricing
    // -------------------------------------------------------------------------

    #[instrument(
        skip(self, request),
        fields(service = "procurement-service", method = "PriceDocument")
    )]
    async fn price_document(
        &self,
        request: Request<PriceDocumentRequest>,
    ) -> Result<Response<PriceDocumentResponse>, Status> {
        let timer = GRPC_REQUEST_DURATION
            .with_label_values(&["PriceDocument"])
            .start_timer();
        let req = request.into_inner();

        let amount_paid =
            Self::parse_decimal_or_zero("PriceDocument", "amount_paid", &req.amount_paid)?;
        let lines = Self::price_request_lines("PriceDocument", &req.lines)?;
        let summary = compute_summary(&lines, req.tax_enabled, self.pricing.tax_rate, amount_paid);

        Self::record_ok("PriceDocument");
        timer.observe_duration();

        Ok(Response::new(PriceDocumentResponse {
            lines: lines
                .iter()
                .enumerate()
                .map(|(i, l)| Self::priced_line_to_proto(i, l))
                .collect(),
            summary: Some(Self::summary_to_proto(&summary)),
        }))
    }

    // -------------------------------------------------------------------------
    // Purchase Documents
    // -------------------------------------------------------------------------

    #[instrument(
        skip(self, request),
        fields(service = "procurement-service", method = "CreatePurchaseOrder", order_id)
    )]
    async fn create_purchase_order(
        &self,
        request: Request<CreatePurchaseOrderRequest>,
    ) -> Result<Response<CreatePurchaseOrderResponse>, Status> {
        let timer = GRPC_REQUEST_DURATION
            .with_label_values(&["CreatePurchaseOrder"])
            .start_timer();
        let req = request.into_inner();

        let kind = Self::kind_from_proto(req.kind)
            .ok_or_else(|| Self::invalid("CreatePurchaseOrder", "kind is required"))?;
        let supplier_id = Self::parse_uuid("CreatePurchaseOrder", "supplier_id", &req.supplier_id)?;
        let branch_id = Self::parse_uuid("CreatePurchaseOrder", "branch_id", &req.branch_id)?;

        if req.lines.is_empty() {
            return Err(Self::invalid(
                "CreatePurchaseOrder",
                "at least one line item is required",
            ));
        }
        if req.credited_days < 0 {
            return Err(Self::invalid(
                "CreatePurchaseOrder",
                "credited_days must not be negative",
            ));
        }

        let amount_paid =
            Self::parse_decimal_or_zero("CreatePurchaseOrder", "amount_paid", &req.amount_paid)?;
        let lines = Self::price_request_lines("CreatePurchaseOrder", &req.lines)?;
        let summary = compute_summary(&lines, req.tax_enabled, self.pricing.tax_rate, amount_paid);

        let input = CreatePurchaseOrder {
            kind,
            supplier_id,
            branch_id,
            tax_enabled: req.tax_enabled,
            tax_rate: self.pricing.tax_rate,
            amount_paid,
            credited_days: req.credited_days,
            notes: Self::non_empty(req.notes),
        };

        let (order, order_lines) = self
            .orders
            .save(&input, &lines, &summary)
            .await
            .map_err(|e| Self::store_error("CreatePurchaseOrder", e))?;

        Span::current().record("order_id", order.order_id.to_string());
        Self::record_ok("CreatePurchaseOrder");
        ORDERS_TOTAL.with_label_values(&[kind.as_str()]).inc();
        ORDER_AMOUNT_TOTAL
            .with_label_values(&[kind.as_str()])
            .inc_by(order.grand_total.to_f64().unwrap_or(0.0));
        timer.observe_duration();

        info!(
            order_id = %order.order_id,
            invoice_no = %order.invoice_no,
            grand_total = %order.grand_total,
            "Purchase document created"
        );

        Ok(Response::new(CreatePurchaseOrderResponse {
            order: Some(Self::order_to_proto(&order, &order_lines)),
        }))
    }

    #[instrument(
        skip(self, request),
        fields(service = "procurement-service", method = "GetPurchaseOrder")
    )]
    async fn get_purchase_order(
        &self,
        request: Request<GetPurchaseOrderRequest>,
    ) -> Result<Response<GetPurchaseOrderResponse>, Status> {
        let timer = GRPC_REQUEST_DURATION
            .with_label_values(&["GetPurchaseOrder"])
            .start_timer();
        let req = request.into_inner();

        let order_id = Self::parse_uuid("GetPurchaseOrder", "order_id", &req.order_id)?;

        let result = self
            .orders
            .get(order_id)
            .await
            .map_err(|e| Self::store_error("GetPurchaseOrder", e))?;

        timer.observe_duration();

        match result {
            Some((order, lines)) => {
                Self::record_ok("GetPurchaseOrder");
                Ok(Response::new(GetPurchaseOrderResponse {
                    order: Some(Self::order_to_proto(&order, &lines)),
                }))
            }
            None => Err(Self::not_found("GetPurchaseOrder", "Purchase order not found")),
        }
    }

    #[instrument(
        skip(self, request),
        fields(service = "procurement-service", method = "ListPurchaseOrders")
    )]
    async fn list_purchase_orders(
        &self,
        request: Request<ListPurchaseOrdersRequest>,
    ) -> Result<Response<ListPurchaseOrdersResponse>, Status> {
        let timer = GRPC_REQUEST_DURATION
            .with_label_values(&["ListPurchaseOrders"])
            .start_timer();
        let req = request.into_inner();

        let page_size = if req.page_size > 0 { req.page_size } else { 50 };
        let page_token = if req.page_token.is_empty() {
            None
        } else {
            Some(Self::parse_uuid(
                "ListPurchaseOrders",
                "page_token",
                &req.page_token,
            )?)
        };

        let filter = ListOrdersFilter {
            kind: Self::kind_from_proto(req.kind),
            status: Self::status_from_proto(req.status),
            payment_status: Self::payment_status_from_proto(req.payment_status),
            page_size,
            page_token,
        };

        let orders = self
            .orders
            .list(&filter)
            .await
            .map_err(|e| Self::store_error("ListPurchaseOrders", e))?;

        let next_page_token = if orders.len() == page_size as usize {
            orders.last().map(|o| o.order_id.to_string())
        } else {
            None
        };

        Self::record_ok("ListPurchaseOrders");
        timer.observe_duration();

        Ok(Response::new(ListPurchaseOrdersResponse {
            orders: orders.iter().map(|o| Self::order_to_proto(o, &[])).collect(),
            next_page_token: next_page_token.unwrap_or_default(),
        }))
    }

    #[instrument(
        skip(self, request),
        fields(service = "procurement-service", method = "DeletePurchaseOrder")
    )]
    async fn delete_purchase_order(
        &self,
        request: Request<DeletePurchaseOrderRequest>,
    ) -> Result<Response<DeletePurchaseOrderResponse>, Status> {
        let timer = GRPC_REQUEST_DURATION
            .with_label_values(&["DeletePurchaseOrder"])
            .start_timer();
        let req = request.into_inner();

        let order_id = Self::parse_uuid("DeletePurchaseOrder", "order_id", &req.order_id)?;

        let deleted = self
            .orders
            .delete(order_id)
            .await
            .map_err(|e| Self::store_error("DeletePurchaseOrder", e))?;

        Self::record_ok("DeletePurchaseOrder");
        timer.observe_duration();

        info!(order_id = %order_id, deleted = deleted, "Purchase document delete requested");

        Ok(Response::new(DeletePurchaseOrderResponse { deleted }))
    }

    #[instrument(
        skip(self, request),
        fields(service = "procurement-service", method = "RecordPayment")
    )]
    async fn record_payment(
        &self,
        request: Request<RecordPaymentRequest>,
    ) -> Result<Response<RecordPaymentResponse>, Status> {
        let timer = GRPC_REQUEST_DURATION
            .with_label_values(&["RecordPayment"])
            .start_timer();
        let req = request.into_inner();

        let order_id = Self::parse_uuid("RecordPayment", "order_id", &req.order_id)?;
        let amount = Self::parse_decimal("RecordPayment", "amount", &req.amount)?;
        if amount <= Decimal::ZERO {
            return Err(Self::invalid(
                "RecordPayment",
                "amount must be greater than zero",
            ));
        }

        let order = self
            .orders
            .record_payment(order_id, amount)
            .await
            .map_err(|e| Self::store_error("RecordPayment", e))?
            .ok_or_else(|| Self::not_found("RecordPayment", "Purchase order not found"))?;

        Self::record_ok("RecordPayment");
        PAYMENTS_TOTAL.with_label_values(&[&order.kind]).inc();
        timer.observe_duration();

        info!(
            order_id = %order.order_id,
            amount = %amount,
            amount_paid = %order.amount_paid,
            "Payment recorded"
        );

        Ok(Response::new(RecordPaymentResponse {
            order: Some(Self::order_to_proto(&order, &[])),
        }))
    }

    // -------------------------------------------------------------------------
    // Products
    // -------------------------------------------------------------------------

    #[instrument(
        skip(self, request),
        fields(service = "procurement-service", method = "CreateProduct")
    )]
    async fn create_product(
        &self,
        request: Request<CreateProductRequest>,
    ) -> Result<Response<CreateProductResponse>, Status> {
        let timer = GRPC_REQUEST_DURATION
            .with_label_values(&["CreateProduct"])
            .start_timer();
        let req = request.into_inner();

        if req.name.is_empty() {
            return Err(Self::invalid("CreateProduct", "name is required"));
        }
        let unit_price = Self::parse_decimal_or_zero("CreateProduct", "unit_price", &req.unit_price)?;
        if unit_price < Decimal::ZERO {
            return Err(Self::invalid(
                "CreateProduct",
                "unit_price must not be negative",
            ));
        }
        let discount_percent =
            Self::parse_decimal_or_zero("CreateProduct", "discount_percent", &req.discount_percent)?;
        if discount_percent < Decimal::ZERO || discount_percent > Decimal::ONE_HUNDRED {
            return Err(Self::invalid(
                "CreateProduct",
                "discount_percent must be between 0 and 100",
            ));
        }

        let input = CreateProduct {
            name: req.name,
            description: Self::non_empty(req.description),
            hsn_code: if req.hsn_code.is_empty() {
                "NA".to_string()
            } else {
                req.hsn_code
            },
            unit_price,
            discount_percent,
        };

        let product = self
            .db
            .create_product(&input)
            .await
            .map_err(|e| Self::store_error("CreateProduct", e))?;

        Self::record_ok("CreateProduct");
        timer.observe_duration();

        Ok(Response::new(CreateProductResponse {
            product: Some(Self::product_to_proto(&product)),
        }))
    }

    #[instrument(
        skip(self, request),
        fields(service = "procurement-service", method = "GetProduct")
    )]
    async fn get_product(
        &self,
        request: Request<GetProductRequest>,
    ) -> Result<Response<GetProductResponse>, Status> {
        let timer = GRPC_REQUEST_DURATION
            .with_label_values(&["GetProduct"])
            .start_timer();
        let req = request.into_inner();

        let product_id = Self::parse_uuid("GetProduct", "product_id", &req.product_id)?;

        let product = self
            .db
            .get_product(product_id)
            .await
            .map_err(|e| Self::store_error("GetProduct", e))?;

        timer.observe_duration();

        match product {
            Some(product) => {
                Self::record_ok("GetProduct");
                Ok(Response::new(GetProductResponse {
                    product: Some(Self::product_to_proto(&product)),
                }))
            }
            None => Err(Self::not_found("GetProduct", "Product not found")),
        }
    }

    #[instrument(
        skip(self, request),
        fields(service = "procurement-service", method = "ListProducts")
    )]
    async fn list_products(
        &self,
        request: Request<ListProductsRequest>,
    ) -> Result<Response<ListProductsResponse>, Status> {
        let timer = GRPC_REQUEST_DURATION
            .with_label_values(&["ListProducts"])
            .start_timer();
        let req = request.into_inner();

        let page_size = if req.page_size > 0 { req.page_size } else { 50 };
        let page_token = if req.page_token.is_empty() {
            None
        } else {
            Some(Self::parse_uuid("ListProducts", "page_token", &req.page_token)?)
        };

        let products = self
            .db
            .list_products(req.active_only, page_size, page_token)
            .await
            .map_err(|e| Self::store_error("ListProducts", e))?;

        let next_page_token = if products.len() == page_size as usize {
            products.last().map(|p| p.product_id.to_string())
        } else {
            None
        };

        Self::record_ok("ListProducts");
        timer.observe_duration();

        Ok(Response::new(ListProductsResponse {
            products: products.iter().map(Self::product_to_proto).collect(),
            next_page_token: next_page_token.unwrap_or_default(),
        }))
    }

    #[instrument(
        skip(self, request),
        fields(service = "procurement-service", method = "UpdateProduct")
    )]
    async fn update_product(
        &self,
        request: Request<UpdateProductRequest>,
    ) -> Result<Response<UpdateProductResponse>, Status> {
        let timer = GRPC_REQUEST_DURATION
            .with_label_values(&["UpdateProduct"])
            .start_timer();
        let req = request.into_inner();

        let product_id = Self::parse_uuid("UpdateProduct", "product_id", &req.product_id)?;

        let unit_price = if req.unit_price.is_empty() {
            None
        } else {
            Some(Self::parse_decimal("UpdateProduct", "unit_price", &req.unit_price)?)
        };
        let discount_percent = if req.discount_percent.is_empty() {
            None
        } else {
            let value =
                Self::parse_decimal("UpdateProduct", "discount_percent", &req.discount_percent)?;
            if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
                return Err(Self::invalid(
                    "UpdateProduct",
                    "discount_percent must be between 0 and 100",
                ));
            }
            Some(value)
        };

        let input = UpdateProduct {
            name: Self::non_empty(req.name),
            description: Self::non_empty(req.description),
            hsn_code: Self::non_empty(req.hsn_code),
            unit_price,
            discount_percent,
            active: req.active,
        };

        let product = self
            .db
            .update_product(product_id, &input)
            .await
            .map_err(|e| Self::store_error("UpdateProduct", e))?
            .ok_or_else(|| Self::not_found("UpdateProduct", "Product not found"))?;

        Self::record_ok("UpdateProduct");
        timer.observe_duration();

        Ok(Response::new(UpdateProductResponse {
            product: Some(Self::product_to_proto(&product)),
        }))
    }

    #[instrument(
        skip(self, request),
        fields(service = "procurement-service", method = "DeleteProduct")
    )]
    async fn delete_product(
        &self,
        request: Request<DeleteProductRequest>,
    ) -> Result<Response<DeleteProductResponse>, Status> {
        let timer = GRPC_REQUEST_DURATION
            .with_label_values(&["DeleteProduct"])
            .start_timer();
        let req = request.into_inner();

        let product_id = Self::parse_uuid("DeleteProduct", "product_id", &req.product_id)?;

        let deleted = self
            .db
            .delete_product(product_id)
            .await
            .map_err(|e| Self::store_error("DeleteProduct", e))?;

        Self::record_ok("DeleteProduct");
        timer.observe_duration();

        Ok(Response::new(DeleteProductResponse { deleted }))
    }

    // -------------------------------------------------------------------------
    // Suppliers
    // -------------------------------------------------------------------------

    #[instrument(
        skip(self, request),
        fields(service = "procurement-service", method = "CreateSupplier")
    )]
    async fn create_supplier(
        &self,
        request: Request<CreateSupplierRequest>,
    ) -> Result<Response<CreateSupplierResponse>, Status> {
        let timer = GRPC_REQUEST_DURATION
            .with_label_values(&["CreateSupplier"])
            .start_timer();
        let req = request.into_inner();

        if req.code.is_empty() {
            return Err(Self::invalid("CreateSupplier", "code is required"));
        }
        if req.company_name.is_empty() {
            return Err(Self::invalid("CreateSupplier", "company_name is required"));
        }

        let input = CreateSupplier {
            code: req.code,
            company_name: req.company_name,
            contact_name: Self::non_empty(req.contact_name),
            door_number: Self::non_empty(req.door_number),
            street: Self::non_empty(req.street),
            city: Self::non_empty(req.city),
            state: Self::non_empty(req.state),
            country: Self::non_empty(req.country),
            email: Self::non_empty(req.email),
            phone: Self::non_empty(req.phone),
            gst_number: Self::non_empty(req.gst_number),
            bank_name: Self::non_empty(req.bank_name),
            bank_account_number: Self::non_empty(req.bank_account_number),
            ifsc: Self::non_empty(req.ifsc),
            upi: Self::non_empty(req.upi),
            payment_terms: Self::non_empty(req.payment_terms),
        };

        let supplier = self
            .db
            .create_supplier(&input)
            .await
            .map_err(|e| Self::store_error("CreateSupplier", e))?;

        Self::record_ok("CreateSupplier");
        timer.observe_duration();

        Ok(Response::new(CreateSupplierResponse {
            supplier: Some(Self::supplier_to_proto(&supplier)),
        }))
    }

    #[instrument(
        skip(self, request),
        fields(service = "procurement-service", method = "GetSupplier")
    )]
    async fn get_supplier(
        &self,
        request: Request<GetSupplierRequest>,
    ) -> Result<Response<GetSupplierResponse>, Status> {
        let timer = GRPC_REQUEST_DURATION
            .with_label_values(&["GetSupplier"])
            .start_timer();
        let req = request.into_inner();

        let supplier_id = Self::parse_uuid("GetSupplier", "supplier_id", &req.supplier_id)?;

        let supplier = self
            .db
            .get_supplier(supplier_id)
            .await
            .map_err(|e| Self::store_error("GetSupplier", e))?;

        timer.observe_duration();

        match supplier {
            Some(supplier) => {
                Self::record_ok("GetSupplier");
                Ok(Response::new(GetSupplierResponse {
                    supplier: Some(Self::supplier_to_proto(&supplier)),
                }))
            }
            None => Err(Self::not_found("GetSupplier", "Supplier not found")),
        }
    }

    #[instrument(
        skip(self, request),
        fields(service = "procurement-service", method = "ListSuppliers")
    )]
    async fn list_suppliers(
        &self,
        request: Request<ListSuppliersRequest>,
    ) -> Result<Response<ListSuppliersResponse>, Status> {
        let timer = GRPC_REQUEST_DURATION
            .with_label_values(&["ListSuppliers"])
            .start_timer();
        let req = request.into_inner();

        let page_size = if req.page_size > 0 { req.page_size } else { 50 };
        let page_token = if req.page_token.is_empty() {
            None
        } else {
            Some(Self::parse_uuid("ListSuppliers", "page_token", &req.page_token)?)
        };

        let suppliers = self
            .db
            .list_suppliers(req.active_only, page_size, page_token)
            .await
            .map_err(|e| Self::store_error("ListSuppliers", e))?;

        let next_page_token = if suppliers.len() == page_size as usize {
            suppliers.last().map(|s| s.supplier_id.to_string())
        } else {
            None
        };

        Self::record_ok("ListSuppliers");
        timer.observe_duration();

        Ok(Response::new(ListSuppliersResponse {
            suppliers: suppliers.iter().map(Self::supplier_to_proto).collect(),
            next_page_token: next_page_token.unwrap_or_default(),
        }))
    }

    #[instrument(
        skip(self, request),
        fields(service = "procurement-service", method = "UpdateSupplier")
    )]
    async fn update_supplier(
        &self,
        request: Request<UpdateSupplierRequest>,
    ) -> Result<Response<UpdateSupplierResponse>, Status> {
        let timer = GRPC_REQUEST_DURATION
            .with_label_values(&["UpdateSupplier"])
            .start_timer();
        let req = request.into_inner();

        let supplier_id = Self::parse_uuid("UpdateSupplier", "supplier_id", &req.supplier_id)?;

        let input = UpdateSupplier {
            company_name: Self::non_empty(req.company_name),
            contact_name: Self::non_empty(req.contact_name),
            door_number: Self::non_empty(req.door_number),
            street: Self::non_empty(req.street),
            city: Self::non_empty(req.city),
            state: Self::non_empty(req.state),
            country: Self::non_empty(req.country),
            email: Self::non_empty(req.email),
            phone: Self::non_empty(req.phone),
            gst_number: Self::non_empty(req.gst_number),
            bank_name: Self::non_empty(req.bank_name),
            bank_account_number: Self::non_empty(req.bank_account_number),
            ifsc: Self::non_empty(req.ifsc),
            upi: Self::non_empty(req.upi),
            payment_terms: Self::non_empty(req.payment_terms),
            active: req.active,
        };

        let supplier = self
            .db
            .update_supplier(supplier_id, &input)
            .await
            .map_err(|e| Self::store_error("UpdateSupplier", e))?
            .ok_or_else(|| Self::not_found("UpdateSupplier", "Supplier not found"))?;

        Self::record_ok("UpdateSupplier");
        timer.observe_duration();

        Ok(Response::new(UpdateSupplierResponse {
            supplier: Some(Self::supplier_to_proto(&supplier)),
        }))
    }

    #[instrument(
        skip(self, request),
        fields(service = "procurement-service", method = "DeleteSupplier")
    )]
    async fn delete_supplier(
        &self,
        request: Request<DeleteSupplierRequest>,
    ) -> Result<Response<DeleteSupplierResponse>, Status> {
        let timer = GRPC_REQUEST_DURATION
            .with_label_values(&["DeleteSupplier"])
            .start_timer();
        let req = request.into_inner();

        let supplier_id = Self::parse_uuid("DeleteSupplier", "supplier_id", &req.supplier_id)?;

        let deleted = self
            .db
            .delete_supplier(supplier_id)
            .await
            .map_err(|e| Self::store_error("DeleteSupplier", e))?;

        Self::record_ok("DeleteSupplier");
        timer.observe_duration();

        Ok(Response::new(DeleteSupplierResponse { deleted }))
    }

    // -------------------------------------------------------------------------
    // Categories
    // -------------------------------------------------------------------------

    #[instrument(
        skip(self, request),
        fields(service = "procurement-service", method = "CreateCategory")
    )]
    async fn create_category(
        &self,
        request: Request<CreateCategoryRequest>,
    ) -> Result<Response<CreateCategoryResponse>, Status> {
        let timer = GRPC_REQUEST_DURATION
            .with_label_values(&["CreateCategory"])
            .start_timer();
        let req = request.into_inner();

        if req.name.is_empty() {
            return Err(Self::invalid("CreateCategory", "name is required"));
        }
        if req.code.is_empty() {
            return Err(Self::invalid("CreateCategory", "code is required"));
        }
        let parent_id = if req.parent_id.is_empty() {
            None
        } else {
            Some(Self::parse_uuid("CreateCategory", "parent_id", &req.parent_id)?)
        };

        let input = CreateCategory {
            name: req.name,
            code: req.code,
            parent_id,
        };

        let category = self
            .db
            .create_category(&input)
            .await
            .map_err(|e| Self::store_error("CreateCategory", e))?;

        Self::record_ok("CreateCategory");
        timer.observe_duration();

        Ok(Response::new(CreateCategoryResponse {
            category: Some(Self::category_to_proto(&category)),
        }))
    }

    #[instrument(
        skip(self, request),
        fields(service = "procurement-service", method = "ListCategories")
    )]
    async fn list_categories(
        &self,
        request: Request<ListCategoriesRequest>,
    ) -> Result<Response<ListCategoriesResponse>, Status> {
        let timer = GRPC_REQUEST_DURATION
            .with_label_values(&["ListCategories"])
            .start_timer();
        let req = request.into_inner();

        let parent_id = if req.parent_id.is_empty() {
            None
        } else {
            Some(Self::parse_uuid("ListCategories", "parent_id", &req.parent_id)?)
        };

        let categories = self
            .db
            .list_categories(parent_id, req.active_only)
            .await
            .map_err(|e| Self::store_error("ListCategories", e))?;

        Self::record_ok("ListCategories");
        timer.observe_duration();

        Ok(Response::new(ListCategoriesResponse {
            categories: categories.iter().map(Self::category_to_proto).collect(),
        }))
    }

    #[instrument(
        skip(self, request),
        fields(service = "procurement-service", method = "UpdateCategory")
    )]
    async fn update_category(
        &self,
        request: Request<UpdateCategoryRequest>,
    ) -> Result<Response<UpdateCategoryResponse>, Status> {
        let timer = GRPC_REQUEST_DURATION
            .with_label_values(&["UpdateCategory"])
            .start_timer();
        let req = request.into_inner();

        let category_id = Self::parse_uuid("UpdateCategory", "category_id", &req.category_id)?;

        let input = UpdateCategory {
            name: Self::non_empty(req.name),
            code: Self::non_empty(req.code),
            active: req.active,
        };

        let category = self
            .db
            .update_category(category_id, &input)
            .await
            .map_err(|e| Self::store_error("UpdateCategory", e))?
            .ok_or_else(|| Self::not_found("UpdateCategory", "Category not found"))?;

        Self::record_ok("UpdateCategory");
        timer.observe_duration();

        Ok(Response::new(UpdateCategoryResponse {
            category: Some(Self::category_to_proto(&category)),
        }))
    }

    #[instrument(
        skip(self, request),
        fields(service = "procurement-service", method = "DeleteCategory")
    )]
    async fn delete_category(
        &self,
        request: Request<DeleteCategoryRequest>,
    ) -> Result<Response<DeleteCategoryResponse>, Status> {
        let timer = GRPC_REQUEST_DURATION
            .with_label_values(&["DeleteCategory"])
            .start_timer();
        let req = request.into_inner();

        let category_id = Self::parse_uuid("DeleteCategory", "category_id", &req.category_id)?;

        let deleted = self
            .db
            .delete_category(category_id)
            .await
            .map_err(|e| Self::store_error("DeleteCategory", e))?;

        Self::record_ok("DeleteCategory");
        timer.observe_duration();

        Ok(Response::new(DeleteCategoryResponse { deleted }))
    }

    // -------------------------------------------------------------------------
    // Branches
    // -------------------------------------------------------------------------

    #[instrument(
        skip(self, request),
        fields(service = "procurement-service", method = "CreateBranch")
    )]
    async fn create_branch(
        &self,
        request: Request<CreateBranchRequest>,
    ) -> Result<Response<CreateBranchResponse>, Status> {
        let timer = GRPC_REQUEST_DURATION
            .with_label_values(&["CreateBranch"])
            .start_timer();
        let req = request.into_inner();

        if req.name.is_empty() {
            return Err(Self::invalid("CreateBranch", "name is required"));
        }
        if req.code.is_empty() {
            return Err(Self::invalid("CreateBranch", "code is required"));
        }

        let input = CreateBranch {
            name: req.name,
            code: req.code,
            location: Self::non_empty(req.location),
            mobile: Self::non_empty(req.mobile),
            email: Self::non_empty(req.email),
            is_main_branch: req.is_main_branch,
        };

        let branch = self
            .db
            .create_branch(&input)
            .await
            .map_err(|e| Self::store_error("CreateBranch", e))?;

        Self::record_ok("CreateBranch");
        timer.observe_duration();

        Ok(Response::new(CreateBranchResponse {
            branch: Some(Self::branch_to_proto(&branch)),
        }))
    }

    #[instrument(
        skip(self, request),
        fields(service = "procurement-service", method = "ListBranches")
    )]
    async fn list_branches(
        &self,
        request: Request<ListBranchesRequest>,
    ) -> Result<Response<ListBranchesResponse>, Status> {
        let timer = GRPC_REQUEST_DURATION
            .with_label_values(&["ListBranches"])
            .start_timer();
        let req = request.into_inner();

        let branches = self
            .db
            .list_branches(req.active_only)
            .await
            .map_err(|e| Self::store_error("ListBranches", e))?;

        Self::record_ok("ListBranches");
        timer.observe_duration();

        Ok(Response::new(ListBranchesResponse {
            branches: branches.iter().map(Self::branch_to_proto).collect(),
        }))
    }

    #[instrument(
        skip(self, request),
        fields(service = "procurement-service", method = "UpdateBranch")
    )]
    async fn update_branch(
        &self,
        request: Request<UpdateBranchRequest>,
    ) -> Result<Response<UpdateBranchResponse>, Status> {
        let timer = GRPC_REQUEST_DURATION
            .with_label_values(&["UpdateBranch"])
            .start_timer();
        let req = request.into_inner();

        let branch_id = Self::parse_uuid("UpdateBranch", "branch_id", &req.branch_id)?;

        let input = UpdateBranch {
            name: Self::non_empty(req.name),
            location: Self::non_empty(req.location),
            mobile: Self::non_empty(req.mobile),
            email: Self::non_empty(req.email),
            is_main_branch: req.is_main_branch,
            active: req.active,
        };

        let branch = self
            .db
            .update_branch(branch_id, &input)
            .await
            .map_err(|e| Self::store_error("UpdateBranch", e))?
            .ok_or_else(|| Self::not_found("UpdateBranch", "Branch not found"))?;

        Self::record_ok("UpdateBranch");
        timer.observe_duration();

        Ok(Response::new(UpdateBranchResponse {
            branch: Some(Self::branch_to_proto(&branch)),
        }))
    }

    #[instrument(
        skip(self, request),
        fields(service = "procurement-service", method = "DeleteBranch")
    )]
    async fn delete_branch(
        &self,
        request: Request<DeleteBranchRequest>,
    ) -> Result<Response<DeleteBranchResponse>, Status> {
        let timer = GRPC_REQUEST_DURATION
            .with_label_values(&["DeleteBranch"])
            .start_timer();
        let req = request.into_inner();

        let branch_id = Self::parse_uuid("DeleteBranch", "branch_id", &req.branch_id)?;

        let deleted = self
            .db
            .delete_branch(branch_id)
            .await
            .map_err(|e| Self::store_error("DeleteBranch", e))?;

        Self::record_ok("DeleteBranch");
        timer.observe_duration();

        Ok(Response::new(DeleteBranchResponse { deleted }))
    }
}
