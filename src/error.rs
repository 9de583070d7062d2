use crate::order::Order;
use crate::types::{OrderId, OrderStatus};
use rust_decimal::Decimal;
use thiserror::Error;

/// Construction-time validation failure for an [`Order`].
///
/// These are fatal to the construction call: no partially-initialized
/// order is ever produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidOrder {
    /// A limit order was requested without a price
    #[error("limit orders require a price")]
    MissingLimitPrice,
    /// A limit order was requested with a price of zero or below
    #[error("limit orders require a strictly positive price, got {0}")]
    NonPositiveLimitPrice(Decimal),
    /// The requested quantity was zero
    #[error("quantity must be a positive integer")]
    ZeroQuantity,
    /// The symbol was the empty string
    #[error("symbol must be a non-empty string")]
    EmptySymbol,
}

/// The reason an order was refused admission to the book.
///
/// Rejections are book-level precondition failures: the order is simply
/// not admitted and the book's state is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
    /// The order is for a different instrument than this book
    #[error("order is for symbol {got}, this book is for {expected}")]
    SymbolMismatch {
        /// The symbol the book was created for
        expected: String,
        /// The symbol carried by the rejected order
        got: String,
    },
    /// Market orders never rest in the book; they must be executed
    /// immediately by the matching engine
    #[error("market orders cannot rest in the book")]
    MarketOrder,
    /// Only live (open or partially filled) orders may be added
    #[error("order is {0}, only open or partially filled orders can be added")]
    NotLive(OrderStatus),
    /// Another live order with the same id, but different terms, is
    /// already in the book
    #[error("a different order with id {0} is already live in the book")]
    DuplicateOrderId(OrderId),
}

/// Returned when [`OrderBook::add_order`](crate::OrderBook::add_order)
/// refuses an order.
///
/// The rejected order is handed back to the caller, who may decide what
/// to do with it next (route it elsewhere, execute it, drop it).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{order} rejected: {reason}")]
pub struct OrderRejected {
    /// The order that was refused, returned unmodified
    pub order: Order,
    /// Why the book refused it
    pub reason: RejectReason,
}
