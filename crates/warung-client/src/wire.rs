//! # Wire Format
//!
//! DTOs matching the backend's JSON shapes, and their conversions to the
//! core domain types.
//!
//! The backend speaks snake_case (`is_package`, `total_amount`), sends
//! prices as plain JSON numbers, and is loose about id types (numbers in
//! some responses, strings in others). Everything crossing this boundary
//! is normalized here so the rest of the workspace never sees a raw
//! payload.

use serde::{Deserialize, Deserializer, Serialize};

use warung_core::{CartLine, HeldOrder, Money, PaymentMethod, PaymentStatus, Product};

// =============================================================================
// Products
// =============================================================================

/// `GET /products` element.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductDto {
    pub id: i64,
    pub name: String,
    /// Decimal-as-number on the wire; whole rupiah in practice.
    pub price: f64,
    pub category: String,
    pub unit: String,
    #[serde(default)]
    pub is_package: bool,
    #[serde(default)]
    pub image: Option<String>,
}

impl From<ProductDto> for Product {
    fn from(dto: ProductDto) -> Self {
        Product {
            id: dto.id,
            name: dto.name,
            price: Money::from_rupiah(dto.price.round() as i64),
            category: dto.category,
            unit: dto.unit,
            is_package: dto.is_package,
            image: dto.image,
        }
    }
}

// =============================================================================
// Orders
// =============================================================================

/// `GET /orders?status=...` response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct OrdersEnvelope {
    pub data: Vec<OrderDto>,
}

/// One order in a list response.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderDto {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    #[serde(default)]
    pub order_number: Option<String>,
    pub total_amount: f64,
    /// The customer-type tag (dine-in, GoFood, ...).
    pub order_type: String,
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub payment_method: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub paid_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// `GET /orders/{id}` response: the order plus its items.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderDetailDto {
    #[serde(flatten)]
    pub order: OrderDto,
    #[serde(default)]
    pub items: Vec<OrderItemDto>,
}

/// One line of an order detail.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderItemDto {
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i64,
    pub price: f64,
    #[serde(default)]
    pub note: Option<String>,
}

impl From<OrderItemDto> for CartLine {
    /// Reconstructs a cart line from an order-item payload.
    ///
    /// The order API does not return category or unit, so the product
    /// carries empty strings there.
    fn from(item: OrderItemDto) -> Self {
        CartLine {
            product: Product {
                id: item.product_id,
                name: item.product_name,
                price: Money::from_rupiah(item.price.round() as i64),
                category: String::new(),
                unit: String::new(),
                is_package: false,
                image: None,
            },
            quantity: item.quantity,
            note: item.note.unwrap_or_default(),
            discount_bps: 0,
        }
    }
}

impl From<OrderDetailDto> for HeldOrder {
    fn from(detail: OrderDetailDto) -> Self {
        HeldOrder {
            id: detail.order.id,
            items: detail.items.into_iter().map(CartLine::from).collect(),
            timestamp: detail.order.created_at,
            total: Money::from_rupiah(detail.order.total_amount.round() as i64),
            customer_type: detail.order.order_type,
            // Not part of the order payload; only known for orders held in
            // this session.
            discount: None,
        }
    }
}

// =============================================================================
// Order Submission
// =============================================================================

/// `POST /orders` body.
///
/// Used both for holding (`payment_status: "unpaid"`) and for paying
/// (`payment_status: "paid"`). Settling a previously held order adds
/// `order_id` and `action: "pay"` so the backend retires the unpaid row
/// instead of creating a second order.
#[derive(Debug, Clone, Serialize)]
pub struct CreateOrderRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    pub order: NewOrder,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewOrder {
    pub order_type: String,
    pub payment_status: PaymentStatus,
    pub payment_method: String,
    pub total_amount: i64,
    pub created_by: String,
    pub items: Vec<NewOrderItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewOrderItem {
    pub product_id: i64,
    pub quantity: i64,
    pub price: i64,
    pub note: String,
}

impl CreateOrderRequest {
    /// Builds a submission from a cart snapshot.
    ///
    /// `settle_held_id` carries the backend id of a recalled held order;
    /// when present the request settles that order (`action: "pay"`).
    pub fn from_cart(
        lines: &[CartLine],
        total: Money,
        customer_type: &str,
        payment_status: PaymentStatus,
        payment_method: PaymentMethod,
        created_by: &str,
        settle_held_id: Option<String>,
    ) -> Self {
        CreateOrderRequest {
            action: settle_held_id.as_ref().map(|_| "pay".to_string()),
            order_id: settle_held_id,
            order: NewOrder {
                order_type: customer_type.to_string(),
                payment_status,
                payment_method: payment_method.to_string(),
                total_amount: total.rupiah(),
                created_by: created_by.to_string(),
                items: lines
                    .iter()
                    .map(|line| NewOrderItem {
                        product_id: line.product.id,
                        quantity: line.quantity,
                        price: line.product.price.rupiah(),
                        note: line.note.clone(),
                    })
                    .collect(),
            },
        }
    }
}

/// What the session needs back from a successful `POST /orders`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedOrder {
    pub id: String,
    pub order_number: Option<String>,
}

impl From<OrderDto> for SubmittedOrder {
    fn from(order: OrderDto) -> Self {
        SubmittedOrder {
            id: order.id,
            order_number: order.order_number,
        }
    }
}

// =============================================================================
// Deserialization Helpers
// =============================================================================

/// Accepts an id as either a JSON number or a string and normalizes to
/// `String`.
fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IdRepr {
        Num(i64),
        Str(String),
    }

    Ok(match IdRepr::deserialize(deserializer)? {
        IdRepr::Num(n) => n.to_string(),
        IdRepr::Str(s) => s,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_dto_maps_is_package() {
        let json = r#"{
            "id": 7,
            "name": "Paket Ayam",
            "price": 25000,
            "category": "paket",
            "unit": "porsi",
            "is_package": true,
            "image": "ayam.jpg"
        }"#;

        let product: Product = serde_json::from_str::<ProductDto>(json).unwrap().into();

        assert_eq!(product.id, 7);
        assert!(product.is_package);
        assert_eq!(product.price.rupiah(), 25_000);
        assert_eq!(product.image.as_deref(), Some("ayam.jpg"));
    }

    #[test]
    fn test_orders_envelope() {
        let json = r#"{
            "data": [{
                "id": 42,
                "order_number": "ORD-0042",
                "total_amount": 99000,
                "order_type": "dine-in",
                "payment_status": "unpaid",
                "payment_method": "cash",
                "created_at": "2024-05-01 12:30",
                "paid_at": null,
                "updated_at": "2024-05-01 12:30"
            }]
        }"#;

        let envelope: OrdersEnvelope = serde_json::from_str(json).unwrap();
        let order = &envelope.data[0];

        // Numeric id normalized to string
        assert_eq!(order.id, "42");
        assert_eq!(order.payment_status, PaymentStatus::Unpaid);
        assert_eq!(order.order_type, "dine-in");
    }

    #[test]
    fn test_order_detail_to_held_order() {
        let json = r#"{
            "id": "42",
            "total_amount": 30000,
            "order_type": "gofood",
            "payment_status": "unpaid",
            "created_at": "2024-05-01 12:30",
            "items": [
                {"id": 1, "product_id": 3, "product_name": "Es Teh", "quantity": 2, "price": 5000, "note": "less sugar"},
                {"id": 2, "product_id": 9, "product_name": "Nasi Goreng", "quantity": 1, "price": 20000, "note": null}
            ]
        }"#;

        let held: HeldOrder = serde_json::from_str::<OrderDetailDto>(json).unwrap().into();

        assert_eq!(held.id, "42");
        assert_eq!(held.customer_type, "gofood");
        assert_eq!(held.total.rupiah(), 30_000);
        assert_eq!(held.items.len(), 2);
        assert_eq!(held.items[0].note, "less sugar");
        assert_eq!(held.items[1].note, "");
        // Category and unit are not on the wire
        assert_eq!(held.items[0].product.category, "");
        assert_eq!(held.items[0].product.unit, "");
        assert!(held.discount.is_none());
    }

    #[test]
    fn test_create_request_shape_for_hold() {
        let lines = vec![CartLine {
            product: Product {
                id: 3,
                name: "Es Teh".to_string(),
                price: Money::from_rupiah(5_000),
                category: "minuman".to_string(),
                unit: "gelas".to_string(),
                is_package: false,
                image: None,
            },
            quantity: 2,
            note: "less sugar".to_string(),
            discount_bps: 0,
        }];

        let request = CreateOrderRequest::from_cart(
            &lines,
            Money::from_rupiah(11_000),
            "dine-in",
            PaymentStatus::Unpaid,
            PaymentMethod::Cash,
            "user-7",
            None,
        );
        let json = serde_json::to_value(&request).unwrap();

        // Hold submissions carry neither order_id nor action
        assert!(json.get("order_id").is_none());
        assert!(json.get("action").is_none());
        assert_eq!(json["order"]["payment_status"], "unpaid");
        assert_eq!(json["order"]["total_amount"], 11000);
        assert_eq!(json["order"]["created_by"], "user-7");
        assert_eq!(json["order"]["items"][0]["product_id"], 3);
        assert_eq!(json["order"]["items"][0]["note"], "less sugar");
    }

    #[test]
    fn test_create_request_shape_for_settling_held_order() {
        let request = CreateOrderRequest::from_cart(
            &[],
            Money::from_rupiah(11_000),
            "dine-in",
            PaymentStatus::Paid,
            PaymentMethod::Qris,
            "user-7",
            Some("42".to_string()),
        );
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["order_id"], "42");
        assert_eq!(json["action"], "pay");
        assert_eq!(json["order"]["payment_status"], "paid");
        assert_eq!(json["order"]["payment_method"], "qris");
    }
}
