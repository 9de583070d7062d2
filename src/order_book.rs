use crate::error::{OrderRejected, RejectReason};
use crate::market_depth::MarketDepth;
use crate::order::Order;
use crate::types::{OrderId, OrderType, Side};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use tracing::debug;

/// A bid-side priority queue entry: higher price first, ties broken by
/// earlier timestamp.
///
/// Entries carry only the priority key and the order id; the order itself
/// lives in the book's lookup table. An entry whose id is no longer live
/// in the table is stale and is skipped when it reaches the top.
#[derive(Debug, Clone, PartialEq, Eq)]
struct BidEntry {
    price: Decimal,
    timestamp: DateTime<Utc>,
    order_id: OrderId,
}

impl Ord for BidEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // `BinaryHeap` pops the greatest entry: the highest price wins,
        // and at equal prices the earlier timestamp must rank greater.
        // The id comparison makes the ordering total, so equal keys
        // cannot reorder across heap rebuilds.
        self.price
            .cmp(&other.price)
            .then_with(|| other.timestamp.cmp(&self.timestamp))
            .then_with(|| other.order_id.cmp(&self.order_id))
    }
}

impl PartialOrd for BidEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// An ask-side priority queue entry: lower price first, ties broken by
/// earlier timestamp. Same lazy-deletion discipline as [`BidEntry`].
#[derive(Debug, Clone, PartialEq, Eq)]
struct AskEntry {
    price: Decimal,
    timestamp: DateTime<Utc>,
    order_id: OrderId,
}

impl Ord for AskEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .price
            .cmp(&self.price)
            .then_with(|| other.timestamp.cmp(&self.timestamp))
            .then_with(|| other.order_id.cmp(&self.order_id))
    }
}

impl PartialOrd for AskEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A price-time priority order book for a single instrument.
///
/// The book keeps resting limit orders indexed two ways:
///
/// - by priority, in one binary heap per side, keyed by
///   `(side-adjusted price, timestamp)`
/// - by identity, in a lookup table mapping order id to the order
///
/// The lookup table is the single source of truth for whether an order is
/// live in the book. Cancellation removes the table entry and leaves the
/// heap entry in place; the stale entry is discarded the next time it
/// reaches the top of its heap ("lazy deletion"). Deleting from the middle
/// of a heap by key would cost a rebuild, while skipping stale tops is
/// amortized across reads — and most orders are consumed from the top by
/// the matching engine rather than cancelled mid-queue.
///
/// Insertion is $O(\log{N})$, best-price lookup is $O(1)$ amortized, and
/// logical cancellation is $O(1)$.
///
/// ### Thread safety
///
/// The book is single-threaded by design; one execution context owns all
/// calls for its symbol. Note that the best-price readers purge stale heap
/// tops, so even they take `&mut self`. To share a book across threads,
/// wrap it in the re-exported [`Mutex`](crate::Mutex) so that readers and
/// writers serialize.
#[derive(Debug)]
pub struct OrderBook {
    /// The one instrument this book holds orders for
    symbol: String,
    /// Bid side (buy orders): highest price at the top
    bids: BinaryHeap<BidEntry>,
    /// Ask side (sell orders): lowest price at the top
    asks: BinaryHeap<AskEntry>,
    /// All live orders, keyed by id; authoritative for liveness
    orders: HashMap<OrderId, Order>,
}

impl OrderBook {
    /// Creates an empty order book for one symbol.
    ///
    /// ## Examples
    ///
    /// ```
    /// use limit_order_book::OrderBook;
    ///
    /// let book = OrderBook::new("ACME");
    /// assert!(book.is_empty());
    /// ```
    pub fn new(symbol: impl Into<String>) -> Self {
        OrderBook {
            symbol: symbol.into(),
            bids: BinaryHeap::new(),
            asks: BinaryHeap::new(),
            orders: HashMap::new(),
        }
    }

    /// The symbol this book was created for.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// The number of live orders in the book, both sides combined.
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Returns `true` when no live orders rest in the book.
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Admits a limit order to the book.
    ///
    /// On success the order is inserted into the lookup table and a
    /// priority entry is pushed onto its side's heap; a reference to the
    /// resting order is returned. Re-adding an order identical to the one
    /// already live under its id is tolerated as idempotent and changes
    /// nothing.
    ///
    /// ## Errors
    ///
    /// The order is rejected — and handed back inside the error, with the
    /// book untouched — when its symbol does not match the book's, when it
    /// is a market order (those must be executed immediately, never
    /// rested), when it is not live, or when a *different* order is
    /// already live under the same id.
    ///
    /// ## Examples
    ///
    /// ```
    /// use limit_order_book::{Order, OrderBook, OrderRequest, RejectReason, Side};
    /// use rust_decimal_macros::dec;
    ///
    /// let mut book = OrderBook::new("ACME");
    ///
    /// let bid = Order::new(OrderRequest::limit("ACME", Side::Buy, dec!(99.50), 10)).unwrap();
    /// assert!(book.add_order(bid).is_ok());
    ///
    /// let market = Order::new(OrderRequest::market("ACME", Side::Buy, 10)).unwrap();
    /// let rejection = book.add_order(market).unwrap_err();
    /// assert_eq!(rejection.reason, RejectReason::MarketOrder);
    /// assert_eq!(book.len(), 1);
    /// ```
    pub fn add_order(&mut self, order: Order) -> Result<&Order, OrderRejected> {
        if order.symbol() != self.symbol {
            return Err(OrderRejected {
                reason: RejectReason::SymbolMismatch {
                    expected: self.symbol.clone(),
                    got: order.symbol().to_owned(),
                },
                order,
            });
        }
        if order.order_type() != OrderType::Limit {
            return Err(OrderRejected {
                reason: RejectReason::MarketOrder,
                order,
            });
        }
        if !order.is_live() {
            return Err(OrderRejected {
                reason: RejectReason::NotLive(order.status()),
                order,
            });
        }
        if self.orders.contains_key(order.order_id()) {
            if self.orders[order.order_id()] == order {
                // Identical to the live entry: idempotent, push nothing
                return Ok(&self.orders[order.order_id()]);
            }
            return Err(OrderRejected {
                reason: RejectReason::DuplicateOrderId(order.order_id().to_owned()),
                order,
            });
        }

        // A limit order always carries a price (enforced at construction);
        // market orders were rejected above.
        let price = match order.price() {
            Some(price) => price,
            None => {
                return Err(OrderRejected {
                    reason: RejectReason::MarketOrder,
                    order,
                })
            }
        };

        match order.side() {
            Side::Buy => self.bids.push(BidEntry {
                price,
                timestamp: order.timestamp(),
                order_id: order.order_id().to_owned(),
            }),
            Side::Sell => self.asks.push(AskEntry {
                price,
                timestamp: order.timestamp(),
                order_id: order.order_id().to_owned(),
            }),
        }

        let order_id = order.order_id().to_owned();
        Ok(self.orders.entry(order_id).or_insert(order))
    }

    /// Cancels a live order and removes it from the book.
    ///
    /// The order leaves the lookup table (the authoritative liveness
    /// signal), is marked cancelled, and is returned to the caller. Its
    /// heap entry is *not* touched: it goes stale and is discarded the
    /// next time it reaches the top of its side. Unknown ids return
    /// `None`, which keeps repeated cancellation requests benign.
    ///
    /// ## Examples
    ///
    /// ```
    /// use limit_order_book::{Order, OrderBook, OrderRequest, OrderStatus, Side};
    /// use rust_decimal_macros::dec;
    ///
    /// let mut book = OrderBook::new("ACME");
    /// let bid = Order::new(
    ///     OrderRequest::limit("ACME", Side::Buy, dec!(99.50), 10).with_order_id("bid-1"),
    /// )
    /// .unwrap();
    /// book.add_order(bid).unwrap();
    ///
    /// let cancelled = book.remove_order("bid-1").unwrap();
    /// assert_eq!(cancelled.status(), OrderStatus::Cancelled);
    /// assert!(book.remove_order("bid-1").is_none());
    /// ```
    pub fn remove_order(&mut self, order_id: &str) -> Option<Order> {
        let mut order = self.orders.remove(order_id)?;
        order.cancel();
        debug!(order_id, symbol = %self.symbol, "order removed from book");
        Some(order)
    }

    /// Looks up a live order by id. Pure read, no side effects.
    pub fn get_order(&self, order_id: &str) -> Option<&Order> {
        self.orders.get(order_id)
    }

    /// The highest price any live buy order is willing to pay.
    ///
    /// Stale entries at the top of the bid heap are purged before the
    /// price is read, which is the mechanism that keeps the lookup table
    /// authoritative — hence `&mut self` even though no order data
    /// changes.
    ///
    /// ## Examples
    ///
    /// ```
    /// use limit_order_book::{Order, OrderBook, OrderRequest, Side};
    /// use rust_decimal_macros::dec;
    ///
    /// let mut book = OrderBook::new("ACME");
    /// assert_eq!(book.best_bid(), None);
    ///
    /// let bid = Order::new(OrderRequest::limit("ACME", Side::Buy, dec!(99.50), 10)).unwrap();
    /// book.add_order(bid).unwrap();
    /// assert_eq!(book.best_bid(), Some(dec!(99.50)));
    /// ```
    pub fn best_bid(&mut self) -> Option<Decimal> {
        self.purge_stale_bids();
        self.bids.peek().map(|entry| entry.price)
    }

    /// The lowest price any live sell order is willing to accept.
    ///
    /// Same lazy purge as [`best_bid`](OrderBook::best_bid).
    pub fn best_ask(&mut self) -> Option<Decimal> {
        self.purge_stale_asks();
        self.asks.peek().map(|entry| entry.price)
    }

    /// The difference between the best ask and the best bid, when both
    /// sides are populated.
    pub fn spread(&mut self) -> Option<Decimal> {
        let best_bid = self.best_bid()?;
        let best_ask = self.best_ask()?;
        Some(best_ask - best_bid)
    }

    /// Removes and returns the highest-priority live buy order.
    ///
    /// This is the primitive a matching engine calls to consume liquidity
    /// one order at a time. The order leaves both the heap and the lookup
    /// table; ownership passes to the caller, who applies fills and
    /// decides what happens next. A popped order that is only partially
    /// filled is *not* re-inserted automatically — reinsertion, if
    /// desired, is the caller's explicit responsibility.
    ///
    /// ## Examples
    ///
    /// ```
    /// use limit_order_book::{Order, OrderBook, OrderRequest, Side};
    /// use rust_decimal_macros::dec;
    ///
    /// let mut book = OrderBook::new("ACME");
    /// for (price, id) in [(dec!(99.00), "a"), (dec!(99.50), "b")] {
    ///     let bid = Order::new(
    ///         OrderRequest::limit("ACME", Side::Buy, price, 10).with_order_id(id),
    ///     )
    ///     .unwrap();
    ///     book.add_order(bid).unwrap();
    /// }
    ///
    /// let best = book.pop_best_bid_order().unwrap();
    /// assert_eq!(best.order_id(), "b");
    /// assert_eq!(book.best_bid(), Some(dec!(99.00)));
    /// ```
    pub fn pop_best_bid_order(&mut self) -> Option<Order> {
        self.purge_stale_bids();
        let entry = self.bids.pop()?;
        self.orders.remove(&entry.order_id)
    }

    /// Removes and returns the highest-priority live sell order.
    ///
    /// The ask-side counterpart of
    /// [`pop_best_bid_order`](OrderBook::pop_best_bid_order).
    pub fn pop_best_ask_order(&mut self) -> Option<Order> {
        self.purge_stale_asks();
        let entry = self.asks.pop()?;
        self.orders.remove(&entry.order_id)
    }

    /// Takes a snapshot of the aggregated depth of the book: total
    /// remaining quantity and order count per distinct live price level,
    /// per side. Purely derived; the book is not mutated.
    pub fn market_depth(&self) -> MarketDepth {
        MarketDepth::from_orders(self.orders.values())
    }

    /// Discards bid heap tops whose order is no longer live in the lookup
    /// table. Stops at the first live entry, so the cost of each discard
    /// is paid once per cancelled order.
    fn purge_stale_bids(&mut self) {
        while let Some(entry) = self.bids.peek() {
            let live = self
                .orders
                .get(&entry.order_id)
                .map(|order| order.is_live())
                .unwrap_or(false);
            if live {
                break;
            }
            self.bids.pop();
        }
    }

    /// Ask-side counterpart of [`purge_stale_bids`](OrderBook::purge_stale_bids).
    fn purge_stale_asks(&mut self) {
        while let Some(entry) = self.asks.peek() {
            let live = self
                .orders
                .get(&entry.order_id)
                .map(|order| order.is_live())
                .unwrap_or(false);
            if live {
                break;
            }
            self.asks.pop();
        }
    }
}
