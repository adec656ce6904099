//! Field name table
//!
//! The dataset arrives with CSV-header names ("Customer Name") and is stored
//! under snake_case column names (`customer_name`). Every translation between
//! the two goes through [`FIELDS`].

/// One of the 26 sale attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    TransactionId,
    Date,
    CustomerId,
    CustomerName,
    PhoneNumber,
    Gender,
    Age,
    CustomerRegion,
    CustomerType,
    ProductId,
    ProductName,
    Brand,
    ProductCategory,
    Tags,
    Quantity,
    PricePerUnit,
    DiscountPercentage,
    TotalAmount,
    FinalAmount,
    PaymentMethod,
    OrderStatus,
    DeliveryType,
    StoreId,
    StoreLocation,
    SalespersonId,
    EmployeeName,
}

/// Storage representation of a field value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Non-negative whole number (age, quantity)
    Integer,
    /// Currency or percentage
    Decimal,
}

/// Row of the bidirectional name table
#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
    pub field: Field,
    pub external: &'static str,
    pub internal: &'static str,
    pub kind: FieldKind,
}

const fn def(field: Field, external: &'static str, internal: &'static str, kind: FieldKind) -> FieldDef {
    FieldDef {
        field,
        external,
        internal,
        kind,
    }
}

/// All sale fields in CSV column order
pub const FIELDS: [FieldDef; 26] = [
    def(Field::TransactionId, "Transaction ID", "transaction_id", FieldKind::Text),
    def(Field::Date, "Date", "date", FieldKind::Text),
    def(Field::CustomerId, "Customer ID", "customer_id", FieldKind::Text),
    def(Field::CustomerName, "Customer Name", "customer_name", FieldKind::Text),
    def(Field::PhoneNumber, "Phone Number", "phone_number", FieldKind::Text),
    def(Field::Gender, "Gender", "gender", FieldKind::Text),
    def(Field::Age, "Age", "age", FieldKind::Integer),
    def(Field::CustomerRegion, "Customer Region", "customer_region", FieldKind::Text),
    def(Field::CustomerType, "Customer Type", "customer_type", FieldKind::Text),
    def(Field::ProductId, "Product ID", "product_id", FieldKind::Text),
    def(Field::ProductName, "Product Name", "product_name", FieldKind::Text),
    def(Field::Brand, "Brand", "brand", FieldKind::Text),
    def(Field::ProductCategory, "Product Category", "product_category", FieldKind::Text),
    def(Field::Tags, "Tags", "tags", FieldKind::Text),
    def(Field::Quantity, "Quantity", "quantity", FieldKind::Integer),
    def(Field::PricePerUnit, "Price per Unit", "price_per_unit", FieldKind::Decimal),
    def(Field::DiscountPercentage, "Discount Percentage", "discount_percentage", FieldKind::Decimal),
    def(Field::TotalAmount, "Total Amount", "total_amount", FieldKind::Decimal),
    def(Field::FinalAmount, "Final Amount", "final_amount", FieldKind::Decimal),
    def(Field::PaymentMethod, "Payment Method", "payment_method", FieldKind::Text),
    def(Field::OrderStatus, "Order Status", "order_status", FieldKind::Text),
    def(Field::DeliveryType, "Delivery Type", "delivery_type", FieldKind::Text),
    def(Field::StoreId, "Store ID", "store_id", FieldKind::Text),
    def(Field::StoreLocation, "Store Location", "store_location", FieldKind::Text),
    def(Field::SalespersonId, "Salesperson ID", "salesperson_id", FieldKind::Text),
    def(Field::EmployeeName, "Employee Name", "employee_name", FieldKind::Text),
];

impl Field {
    pub fn def(self) -> &'static FieldDef {
        // FIELDS is declared in enum order
        &FIELDS[self as usize]
    }

    pub fn external(self) -> &'static str {
        self.def().external
    }

    pub fn internal(self) -> &'static str {
        self.def().internal
    }

    pub fn kind(self) -> FieldKind {
        self.def().kind
    }
}

/// Look up a field by its CSV header name
pub fn by_external(name: &str) -> Option<&'static FieldDef> {
    FIELDS.iter().find(|d| d.external == name)
}

/// Comma-separated column list for SELECT/INSERT statements
pub fn internal_column_list() -> String {
    FIELDS
        .iter()
        .map(|d| d.internal)
        .collect::<Vec<_>>()
        .join(", ")
}
