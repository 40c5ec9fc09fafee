//! # Sales Session
//!
//! The orchestrator behind the sales interface. One instance per cashier
//! terminal, owning the catalog snapshot, the active cart, the checkout
//! stage, payment inputs and the held-order store.
//!
//! ## Event Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  catalog (fetched once) ──► cart mutations ──► PriceBreakdown       │
//! │                                                   (derived, every   │
//! │                                                    render)          │
//! │        │                                                            │
//! │        ▼                                                            │
//! │  checkout stage transitions ──► order submission ──► held-order     │
//! │  (lock / unlock / reset)        (POST /orders)       refresh        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All methods take `&mut self`: the embedding event loop serializes
//! mutations, so last-writer-wins is the only conflict rule needed. The
//! only suspension points are the awaited backend calls and the
//! confirmation pause.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use warung_client::{Backend, CreateOrderRequest};
use warung_core::{
    Cart, CheckoutError, DiscountSpec, Money, PaymentMethod, PaymentStatus, PriceBreakdown,
    Product, Stage, CONFIRMATION_PAUSE,
};

use crate::catalog;
use crate::error::{SessionError, SessionResult};
use crate::held::HeldOrderStore;
use crate::receipt::Receipt;

// =============================================================================
// Sales Session
// =============================================================================

/// The state behind one cashier terminal.
pub struct SalesSession {
    backend: Arc<dyn Backend>,
    /// Cashier user id (from the token's `sub` claim), stamped into
    /// `created_by` on submissions.
    user_id: String,

    /// Per-checkout id carried in log fields; rotated on every new order.
    checkout_id: Uuid,

    catalog: Vec<Product>,
    cart: Cart,
    stage: Stage,

    discount: Option<DiscountSpec>,
    customer_type: String,
    /// Channel preselected whenever an order starts; the terminal sets
    /// this from its configuration.
    default_customer_type: String,
    payment_method: PaymentMethod,
    /// Raw text from the cash input field; parsed at confirm time.
    cash_input: String,

    /// Product id the note dialog is open for, if any.
    note_target: Option<i64>,

    /// Backend id of a recalled held order, retired on successful payment.
    recalled_held_id: Option<String>,

    held: HeldOrderStore,
    receipt: Option<Receipt>,
}

/// Default sales channel tag.
const DEFAULT_CUSTOMER_TYPE: &str = "dine-in";

impl SalesSession {
    /// Creates a session with an empty cart in the order stage.
    pub fn new(backend: Arc<dyn Backend>, user_id: impl Into<String>) -> Self {
        SalesSession {
            backend,
            user_id: user_id.into(),
            checkout_id: Uuid::new_v4(),
            catalog: Vec::new(),
            cart: Cart::new(),
            stage: Stage::default(),
            discount: None,
            customer_type: DEFAULT_CUSTOMER_TYPE.to_string(),
            default_customer_type: DEFAULT_CUSTOMER_TYPE.to_string(),
            payment_method: PaymentMethod::default(),
            cash_input: String::new(),
            note_target: None,
            recalled_held_id: None,
            held: HeldOrderStore::new(),
            receipt: None,
        }
    }

    /// Loads the catalog and the held-order list. Called once on mount;
    /// the catalog is read-only for the lifetime of the session.
    pub async fn load(&mut self) -> SessionResult<()> {
        self.catalog = self.backend.fetch_products().await?;
        info!(
            checkout_id = %self.checkout_id,
            products = self.catalog.len(),
            "Catalog loaded"
        );
        self.refresh_held().await?;
        Ok(())
    }

    // =========================================================================
    // Read Accessors
    // =========================================================================

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn catalog(&self) -> &[Product] {
        &self.catalog
    }

    pub fn discount(&self) -> Option<&DiscountSpec> {
        self.discount.as_ref()
    }

    pub fn customer_type(&self) -> &str {
        &self.customer_type
    }

    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    pub fn held_orders(&self) -> &HeldOrderStore {
        &self.held
    }

    pub fn receipt(&self) -> Option<&Receipt> {
        self.receipt.as_ref()
    }

    /// Catalog filtered by the search box and category selector.
    pub fn filtered_products(&self, query: &str, category: Option<&str>) -> Vec<&Product> {
        catalog::filter(&self.catalog, query, category)
    }

    /// Distinct catalog categories for the selector.
    pub fn categories(&self) -> Vec<String> {
        catalog::categories(&self.catalog)
    }

    /// The live pricing numbers, recomputed from the current cart and
    /// discount on every call.
    pub fn breakdown(&self) -> PriceBreakdown {
        PriceBreakdown::compute(self.cart.lines(), self.discount.as_ref())
    }

    // =========================================================================
    // Cart Mutations (gated by the stage lock)
    // =========================================================================

    /// Adds one unit of a catalog product. Returns false (and leaves the
    /// cart untouched) when the cart is locked or the id is unknown.
    pub fn add_product(&mut self, product_id: i64) -> bool {
        if self.refuse_if_locked("add") {
            return false;
        }
        let Some(product) = self.catalog.iter().find(|p| p.id == product_id).cloned() else {
            debug!(product_id, "Ignoring add for unknown product");
            return false;
        };
        self.cart.add_or_increment(&product);
        true
    }

    /// Removes one unit; the line disappears at quantity zero.
    pub fn decrement(&mut self, product_id: i64) -> bool {
        if self.refuse_if_locked("decrement") {
            return false;
        }
        self.cart.decrement(product_id);
        true
    }

    /// Sets a line quantity directly (`n <= 0` removes the line).
    pub fn set_quantity(&mut self, product_id: i64, n: i64) -> bool {
        if self.refuse_if_locked("set_quantity") {
            return false;
        }
        self.cart.set_quantity(product_id, n);
        true
    }

    /// Removes a line unconditionally.
    pub fn remove_line(&mut self, product_id: i64) -> bool {
        if self.refuse_if_locked("remove") {
            return false;
        }
        self.cart.remove(product_id);
        true
    }

    /// Sets or clears the order-level discount.
    pub fn set_discount(&mut self, spec: Option<DiscountSpec>) -> bool {
        if self.refuse_if_locked("set_discount") {
            return false;
        }
        self.discount = spec;
        true
    }

    /// Sets the sales channel tag.
    pub fn set_customer_type(&mut self, customer_type: impl Into<String>) -> bool {
        if self.refuse_if_locked("set_customer_type") {
            return false;
        }
        self.customer_type = customer_type.into();
        true
    }

    /// Sets the channel every new order starts with, and applies it to the
    /// current order when the cart is still editable.
    pub fn set_default_customer_type(&mut self, customer_type: impl Into<String>) {
        self.default_customer_type = customer_type.into();
        if !self.stage.locks_cart() {
            self.customer_type = self.default_customer_type.clone();
        }
    }

    // =========================================================================
    // Note Dialog
    // =========================================================================

    /// Opens the note editor for a line. Refused when locked or the line
    /// does not exist.
    pub fn open_note(&mut self, product_id: i64) -> bool {
        if self.refuse_if_locked("open_note") {
            return false;
        }
        if self.cart.lines().iter().any(|l| l.product.id == product_id) {
            self.note_target = Some(product_id);
            true
        } else {
            false
        }
    }

    /// Confirms the note dialog. A no-op when the targeted line was
    /// removed while the dialog was open.
    pub fn confirm_note(&mut self, text: impl Into<String>) {
        if let Some(product_id) = self.note_target.take() {
            self.cart.set_note(product_id, text);
        }
    }

    /// Closes the note dialog without saving.
    pub fn cancel_note(&mut self) {
        self.note_target = None;
    }

    // =========================================================================
    // Payment Inputs
    // =========================================================================

    pub fn set_payment_method(&mut self, method: PaymentMethod) {
        self.payment_method = method;
    }

    /// Raw text from the cash field; parsed only at confirm time.
    pub fn set_cash_input(&mut self, text: impl Into<String>) {
        self.cash_input = text.into();
    }

    // =========================================================================
    // Checkout Transitions
    // =========================================================================

    /// `Order -> Payment`. Refused while the cart is empty.
    pub fn proceed_to_payment(&mut self) -> SessionResult<()> {
        let transition = self.stage.proceed(self.cart.is_empty())?;
        debug!(checkout_id = %self.checkout_id, "Cart locked for payment");
        self.stage = transition.next;
        Ok(())
    }

    /// `Payment -> Order`, unlocking the cart for further edits.
    pub fn back_to_order(&mut self) -> SessionResult<()> {
        let transition = self.stage.go_back()?;
        debug!(checkout_id = %self.checkout_id, "Cart unlocked, back to order");
        self.stage = transition.next;
        Ok(())
    }

    /// Confirms payment: guards the inputs, submits the order as paid,
    /// retires a recalled held order, and advances to the confirmation
    /// stage with a frozen receipt snapshot.
    ///
    /// On a backend failure the stage stays at payment and the error is
    /// returned for the cashier; nothing is rolled back because nothing
    /// local was changed yet.
    pub async fn confirm_payment(&mut self) -> SessionResult<&Receipt> {
        let breakdown = self.breakdown();
        let tendered = parse_cash(&self.cash_input);

        let transition = self
            .stage
            .confirm(self.payment_method, tendered, breakdown.total)?;

        let request = CreateOrderRequest::from_cart(
            self.cart.lines(),
            breakdown.total,
            &self.customer_type,
            PaymentStatus::Paid,
            self.payment_method,
            &self.user_id,
            self.recalled_held_id.clone(),
        );
        let submitted = self.backend.submit_order(&request).await?;

        info!(
            checkout_id = %self.checkout_id,
            order_id = %submitted.id,
            total = %breakdown.total,
            method = %self.payment_method,
            "Order paid"
        );

        if let Some(held_id) = self.recalled_held_id.take() {
            self.held.remove_local(&held_id);
        }
        // Payment already succeeded; a refresh failure here must not fail
        // the checkout. The list catches up on the next refresh.
        if let Err(e) = self.refresh_held().await {
            warn!(error = %e, "Held-order refresh after payment failed");
        }

        let cash = (self.payment_method == PaymentMethod::Cash)
            .then_some(tendered)
            .flatten();
        let receipt = Receipt {
            order_id: submitted.id,
            order_number: submitted.order_number,
            lines: self.cart.lines().to_vec(),
            change: Receipt::change_for(cash, &breakdown),
            cash_tendered: cash,
            breakdown,
            payment_method: self.payment_method,
            customer_type: self.customer_type.clone(),
            timestamp: chrono::Local::now().format("%Y-%m-%d %H:%M").to_string(),
        };
        self.stage = transition.next;

        Ok(self.receipt.insert(receipt))
    }

    /// Waits out the confirmation pause, then advances to the receipt.
    /// Not cancellable by the cashier.
    pub async fn await_receipt(&mut self) -> SessionResult<()> {
        // Validate the stage before sleeping so a misuse fails fast
        if self.stage != Stage::Confirmation {
            return Err(CheckoutError::InvalidTransition {
                from: self.stage,
                action: "finish_confirmation",
            }
            .into());
        }
        tokio::time::sleep(CONFIRMATION_PAUSE).await;
        self.stage = self.stage.finish_confirmation()?.next;
        Ok(())
    }

    /// `Receipt -> Order`: clears the cart, discount, payment inputs and
    /// the lock, and starts the next checkout.
    pub fn start_new_order(&mut self) -> SessionResult<()> {
        let transition = self.stage.start_new_order()?;
        self.stage = transition.next;
        self.reset_order_state();
        info!(checkout_id = %self.checkout_id, "New order started");
        Ok(())
    }

    // =========================================================================
    // Held Orders
    // =========================================================================

    /// Re-fetches the unpaid-order list. The backend is authoritative; a
    /// response that raced a local mutation is discarded.
    pub async fn refresh_held(&mut self) -> SessionResult<()> {
        let token = self.held.begin_refresh();
        let orders = self.backend.fetch_unpaid_orders().await?;
        if self.held.apply_refresh(token, orders) {
            debug!(held = self.held.len(), "Held orders refreshed");
        }
        Ok(())
    }

    /// Parks the current cart on the backend as an unpaid order, then
    /// resets for the next customer. Only legal from the order stage with
    /// a non-empty cart.
    pub async fn hold_order(&mut self) -> SessionResult<()> {
        if self.stage != Stage::Order {
            return Err(SessionError::CartLocked);
        }
        if self.cart.is_empty() {
            return Err(CheckoutError::EmptyCart.into());
        }

        let breakdown = self.breakdown();
        let request = CreateOrderRequest::from_cart(
            self.cart.lines(),
            breakdown.total,
            &self.customer_type,
            PaymentStatus::Unpaid,
            self.payment_method,
            &self.user_id,
            None,
        );
        let submitted = self.backend.submit_order(&request).await?;

        info!(
            checkout_id = %self.checkout_id,
            order_id = %submitted.id,
            total = %breakdown.total,
            "Order held"
        );

        // The order API cannot return the discount, so remember it locally
        // before re-fetching the authoritative list
        if let Some(spec) = &self.discount {
            self.held.remember_discount(submitted.id, spec.clone());
        }
        self.refresh_held().await?;

        self.reset_order_state();
        Ok(())
    }

    /// Recalls a held order into the active cart: lines, channel and
    /// discount are restored, the payment method resets to cash, and the
    /// order id is remembered so paying retires the unpaid row.
    pub fn recall_held(&mut self, id: &str) -> SessionResult<()> {
        if self.stage.locks_cart() {
            return Err(SessionError::CartLocked);
        }
        let order = self
            .held
            .get(id)
            .ok_or_else(|| SessionError::HeldOrderNotFound(id.to_string()))?
            .clone();

        self.cart = Cart::from_lines(order.items);
        self.customer_type = order.customer_type;
        self.discount = order.discount;
        self.payment_method = PaymentMethod::Cash;
        self.cash_input.clear();
        self.note_target = None;
        self.recalled_held_id = Some(order.id);

        info!(checkout_id = %self.checkout_id, held_id = id, "Held order recalled");
        Ok(())
    }

    /// Deletes a held order from the local view only (no backend call; the
    /// unpaid row survives on the server).
    pub fn delete_held(&mut self, id: &str) -> SessionResult<()> {
        if !self.held.remove_local(id) {
            return Err(SessionError::HeldOrderNotFound(id.to_string()));
        }
        if self.recalled_held_id.as_deref() == Some(id) {
            self.recalled_held_id = None;
        }
        Ok(())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn refuse_if_locked(&self, action: &'static str) -> bool {
        if self.stage.locks_cart() {
            debug!(stage = %self.stage, action, "Cart mutation refused while locked");
            true
        } else {
            false
        }
    }

    fn reset_order_state(&mut self) {
        self.cart.clear();
        self.discount = None;
        self.payment_method = PaymentMethod::default();
        self.cash_input.clear();
        self.note_target = None;
        self.recalled_held_id = None;
        self.receipt = None;
        self.customer_type = self.default_customer_type.clone();
        self.checkout_id = Uuid::new_v4();
    }
}

/// Parses the cash field ("50000", "50000.0"). Unparseable text reads as
/// "nothing entered".
fn parse_cash(text: &str) -> Option<Money> {
    let amount: f64 = text.trim().parse().ok()?;
    if !amount.is_finite() {
        return None;
    }
    Some(Money::from_rupiah(amount.round() as i64))
}

// =============================================================================
// Unit Tests
// =============================================================================
