//! # Cart Module
//!
//! The in-memory order being composed: an ordered sequence of lines, unique
//! by product id.
//!
//! ## Invariants
//! - One line per product id. Re-adding an existing product increments its
//!   quantity instead of appending a duplicate line (enforced on every
//!   insert).
//! - Quantity is always >= 1. A line whose quantity would reach zero is
//!   removed, never retained at zero.
//! - Line subtotals are derived, never stored, so they cannot drift from
//!   `price * quantity`.
//!
//! Locking is not the cart's concern. The checkout stage decides whether
//! mutations are legal, and the session refuses them while locked; the cart
//! itself stays a plain data structure.

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::Product;

// =============================================================================
// Cart Line
// =============================================================================

/// One product entry in the cart with its quantity and note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Snapshot of the product at the time it was added.
    pub product: Product,

    /// Units ordered. Always >= 1 while the line exists.
    pub quantity: i64,

    /// Kitchen note for this line ("no chili", "extra ice", ...).
    pub note: String,

    /// Line-level percentage discount in basis points. The shipped design
    /// only applies order-level discounts, so this is always 0 today; the
    /// field is carried for extensibility.
    pub discount_bps: i64,
}

impl CartLine {
    fn new(product: Product) -> Self {
        CartLine {
            product,
            quantity: 1,
            note: String::new(),
            discount_bps: 0,
        }
    }

    /// Line subtotal: `price * quantity`, less the line discount when one
    /// is set (never in the current design).
    pub fn subtotal(&self) -> Money {
        let gross = self.product.price * self.quantity;
        if self.discount_bps == 0 {
            gross
        } else {
            gross - gross.percent_bps(self.discount_bps)
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The order under composition.
///
/// Kept as an ordered association list: lines display in the order they
/// were first added, and the uniqueness invariant is enforced by
/// [`Cart::add_or_increment`] being the only way a line gets in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Rebuilds a cart from existing lines (recalling a held order).
    ///
    /// Lines are folded through the normal insert path so the uniqueness
    /// invariant holds even if the payload carried duplicates.
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        let mut cart = Cart::new();
        for line in lines {
            match cart.find_mut(line.product.id) {
                Some(existing) => existing.quantity += line.quantity,
                None => cart.lines.push(line),
            }
        }
        cart
    }

    /// Adds one unit of a product, collapsing onto an existing line.
    pub fn add_or_increment(&mut self, product: &Product) {
        match self.find_mut(product.id) {
            Some(line) => line.quantity += 1,
            None => self.lines.push(CartLine::new(product.clone())),
        }
    }

    /// Removes one unit of a product. A line at quantity 1 is removed
    /// entirely. Unknown product ids are a no-op.
    pub fn decrement(&mut self, product_id: i64) {
        if let Some(line) = self.find_mut(product_id) {
            if line.quantity > 1 {
                line.quantity -= 1;
            } else {
                self.remove(product_id);
            }
        }
    }

    /// Sets the quantity of a line directly. `n <= 0` removes the line.
    pub fn set_quantity(&mut self, product_id: i64, n: i64) {
        if n <= 0 {
            self.remove(product_id);
        } else if let Some(line) = self.find_mut(product_id) {
            line.quantity = n;
        }
    }

    /// Removes a line unconditionally.
    pub fn remove(&mut self, product_id: i64) {
        self.lines.retain(|line| line.product.id != product_id);
    }

    /// Updates the note on a line. A no-op when the line is gone (the
    /// product was removed before the note dialog was confirmed).
    pub fn set_note(&mut self, product_id: i64, note: impl Into<String>) {
        if let Some(line) = self.find_mut(product_id) {
            line.note = note.into();
        }
    }

    /// Clears all lines (new order, or successful checkout).
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// The lines in display order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Checks if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total units across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Cart subtotal before any order-level discount.
    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    fn find_mut(&mut self, product_id: i64) -> Option<&mut CartLine> {
        self.lines
            .iter_mut()
            .find(|line| line.product.id == product_id)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i64, price: i64) -> Product {
        Product {
            id,
            name: format!("Product {}", id),
            price: Money::from_rupiah(price),
            category: "makanan".to_string(),
            unit: "porsi".to_string(),
            is_package: false,
            image: None,
        }
    }

    #[test]
    fn test_add_same_product_collapses_to_one_line() {
        let mut cart = Cart::new();
        let p = product(1, 15_000);

        cart.add_or_increment(&p);
        cart.add_or_increment(&p);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines()[0].quantity, 2);
        assert_eq!(cart.subtotal().rupiah(), 30_000);
    }

    #[test]
    fn test_decrement_to_zero_removes_line() {
        let mut cart = Cart::new();
        cart.add_or_increment(&product(1, 15_000));

        cart.decrement(1);

        assert!(cart.is_empty());
        assert!(cart.lines().iter().all(|l| l.quantity > 0));
    }

    #[test]
    fn test_decrement_above_one() {
        let mut cart = Cart::new();
        let p = product(1, 15_000);
        cart.add_or_increment(&p);
        cart.add_or_increment(&p);
        cart.add_or_increment(&p);

        cart.decrement(1);

        assert_eq!(cart.lines()[0].quantity, 2);
    }

    #[test]
    fn test_set_quantity_zero_or_negative_removes() {
        let mut cart = Cart::new();
        cart.add_or_increment(&product(1, 15_000));
        cart.set_quantity(1, 0);
        assert!(cart.is_empty());

        cart.add_or_increment(&product(2, 8_000));
        cart.set_quantity(2, -3);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_recomputes_subtotal() {
        let mut cart = Cart::new();
        cart.add_or_increment(&product(1, 15_000));

        cart.set_quantity(1, 4);

        assert_eq!(cart.subtotal().rupiah(), 60_000);
    }

    #[test]
    fn test_set_note_on_missing_line_is_noop() {
        let mut cart = Cart::new();
        cart.add_or_increment(&product(1, 15_000));
        cart.remove(1);

        // Note dialog confirmed after the target line was removed
        cart.set_note(1, "less sugar");

        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_note_updates_matching_line_only() {
        let mut cart = Cart::new();
        cart.add_or_increment(&product(1, 15_000));
        cart.add_or_increment(&product(2, 8_000));

        cart.set_note(2, "no ice");

        assert_eq!(cart.lines()[0].note, "");
        assert_eq!(cart.lines()[1].note, "no ice");
    }

    #[test]
    fn test_from_lines_folds_duplicates() {
        let mut a = CartLine::new(product(1, 15_000));
        a.quantity = 2;
        let b = CartLine::new(product(1, 15_000));

        let cart = Cart::from_lines(vec![a, b]);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines()[0].quantity, 3);
    }

    #[test]
    fn test_display_order_preserved() {
        let mut cart = Cart::new();
        cart.add_or_increment(&product(3, 1_000));
        cart.add_or_increment(&product(1, 2_000));
        cart.add_or_increment(&product(3, 1_000));

        let ids: Vec<i64> = cart.lines().iter().map(|l| l.product.id).collect();
        assert_eq!(ids, vec![3, 1]);
    }
}
