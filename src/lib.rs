//! A tested and benchmarked price-time priority limit order book for a
//! single instrument, using lazy deletion to keep cancellation cheap
//! without ever corrupting priority ordering.
//!
//! ## Architecture
//!
//! This library separates concerns into three pieces:
//!
//! 1. `Order`: the validated order entity with its fill/cancel lifecycle
//! 2. `OrderBook`: the core book, holding resting limit orders in two
//!    priority queues (one per side) plus an authoritative lookup table
//! 3. `MarketDepth`: a derived, read-only aggregation of the book's live
//!    orders per price level, for reporting
//!
//! The book indexes every resting order twice: by priority, in a binary
//! heap keyed by `(side-adjusted price, timestamp)`, and by identity, in a
//! lookup table keyed by order id. The lookup table is the single source
//! of truth for liveness: cancellation removes the table entry in $O(1)$
//! and leaves the heap entry behind as a stale marker, which the
//! best-price readers discard when it surfaces at the top of its heap.
//! This is the classic lazy-deletion discipline — eager deletion from the
//! middle of a heap would cost a rebuild, while skipping stale tops is
//! amortized across reads.
//!
//! ## Example Usage
//!
//! ```rust
//! use limit_order_book::{Order, OrderBook, OrderRequest, Side};
//! use rust_decimal_macros::dec;
//!
//! // One book per symbol
//! let mut book = OrderBook::new("ACME");
//!
//! // Construct validated orders and admit them to the book
//! let bid = Order::new(
//!     OrderRequest::limit("ACME", Side::Buy, dec!(99.50), 10).with_order_id("bid-1"),
//! )
//! .unwrap();
//! let ask = Order::new(OrderRequest::limit("ACME", Side::Sell, dec!(101.00), 5)).unwrap();
//! book.add_order(bid).unwrap();
//! book.add_order(ask).unwrap();
//!
//! // Top of book, in strict price-then-time priority
//! assert_eq!(book.best_bid(), Some(dec!(99.50)));
//! assert_eq!(book.best_ask(), Some(dec!(101.00)));
//! assert_eq!(book.spread(), Some(dec!(1.50)));
//!
//! // A matching engine consumes liquidity one order at a time
//! let resting = book.pop_best_ask_order().unwrap();
//! assert_eq!(resting.price(), Some(dec!(101.00)));
//!
//! // Cancellation flows through the lookup table; the heap entry is
//! // discarded lazily the next time it reaches the top
//! book.remove_order("bid-1").unwrap();
//! assert_eq!(book.best_bid(), None);
//! ```
//!
//! The book itself is single-threaded: no operation blocks or performs
//! I/O, and even the best-price readers mutate internal queue state (the
//! lazy purge), so there is nothing to be gained from a reader/writer
//! split. To drive one book from several threads, wrap it in the
//! re-exported [`Mutex`] so that all calls serialize — one writer at a
//! time, which is exactly the single-writer model a per-symbol matching
//! engine wants.

mod error;
mod market_depth;
mod order;
mod order_book;
mod types;

// Re-export public API
pub use error::{InvalidOrder, OrderRejected, RejectReason};
pub use market_depth::{DepthMap, MarketDepth, PriceLevel};
pub use order::{Order, OrderRequest};
pub use order_book::OrderBook;
pub use types::{OrderId, OrderStatus, OrderType, Side};

// Re-export commonly used external dependencies
pub use parking_lot::Mutex;
pub use rust_decimal::Decimal;
