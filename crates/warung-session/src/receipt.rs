//! # Receipt Snapshot
//!
//! The finalized order as frozen at the moment payment was confirmed.
//! The receipt screen renders this snapshot and nothing else: the live
//! cart and discount may be reset underneath it without changing what the
//! customer sees.

use serde::Serialize;

use warung_core::{pricing, CartLine, Money, PaymentMethod, PriceBreakdown};

/// Frozen checkout summary for the receipt screen.
#[derive(Debug, Clone, Serialize)]
pub struct Receipt {
    /// Backend order id.
    pub order_id: String,

    /// Human-readable order number when the backend assigns one.
    pub order_number: Option<String>,

    /// The lines as sold.
    pub lines: Vec<CartLine>,

    /// The pricing numbers at confirm time.
    pub breakdown: PriceBreakdown,

    pub payment_method: PaymentMethod,
    pub customer_type: String,

    /// Cash received; `None` for non-cash methods.
    pub cash_tendered: Option<Money>,

    /// Change due (always zero for non-cash methods).
    pub change: Money,

    /// Local wall-clock time of the confirmation.
    pub timestamp: String,
}

impl Receipt {
    /// Change for a cash tender against this breakdown's total.
    pub(crate) fn change_for(tendered: Option<Money>, breakdown: &PriceBreakdown) -> Money {
        match tendered {
            Some(cash) => pricing::change(cash, breakdown.total),
            None => Money::zero(),
        }
    }
}

impl std::fmt::Display for Receipt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "================================")?;
        if let Some(number) = &self.order_number {
            writeln!(f, " Order   {}", number)?;
        }
        writeln!(f, " Time    {}", self.timestamp)?;
        writeln!(f, " Channel {}", self.customer_type)?;
        writeln!(f, "--------------------------------")?;
        for line in &self.lines {
            writeln!(
                f,
                " {} x{}  {}",
                line.product.name,
                line.quantity,
                line.subtotal()
            )?;
            if !line.note.is_empty() {
                writeln!(f, "   ({})", line.note)?;
            }
        }
        writeln!(f, "--------------------------------")?;
        writeln!(f, " Subtotal  {}", self.breakdown.subtotal)?;
        if !self.breakdown.discount.is_zero() {
            writeln!(f, " Discount  -{}", self.breakdown.discount)?;
        }
        writeln!(f, " Tax 10%   {}", self.breakdown.tax)?;
        writeln!(f, " TOTAL     {}", self.breakdown.total)?;
        writeln!(f, " Paid by   {}", self.payment_method)?;
        if let Some(cash) = self.cash_tendered {
            writeln!(f, " Cash      {}", cash)?;
            writeln!(f, " Change    {}", self.change)?;
        }
        write!(f, "================================")
    }
}
