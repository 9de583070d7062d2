use crate::error::InvalidOrder;
use crate::types::{OrderId, OrderStatus, OrderType, Side};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::fmt;
use tracing::{debug, warn};
use uuid::Uuid;

/// The parameters from which an [`Order`] is constructed.
///
/// A request carries the caller-supplied fields; anything left unset is
/// generated when the order is built (`order_id` as a UUID v4 string,
/// `timestamp` as the current time). Tests and replay tooling inject
/// deterministic values through [`with_order_id`](OrderRequest::with_order_id)
/// and [`with_timestamp`](OrderRequest::with_timestamp) instead of relying
/// on the generated defaults.
///
/// ## Examples
///
/// ```
/// use limit_order_book::{Order, OrderRequest, Side};
/// use rust_decimal_macros::dec;
///
/// let order = Order::new(
///     OrderRequest::limit("ACME", Side::Buy, dec!(99.50), 10)
///         .with_order_id("bid-1"),
/// )
/// .unwrap();
///
/// assert_eq!(order.order_id(), "bid-1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    /// The ticker symbol of the instrument (e.g. `"ACME"`)
    pub symbol: String,
    /// Whether the order buys or sells
    pub side: Side,
    /// Limit or market execution style
    pub order_type: OrderType,
    /// The number of units to trade
    pub quantity: u64,
    /// The limit price; ignored (with a warning) for market orders
    pub price: Option<Decimal>,
    /// Caller-supplied id; generated when `None`
    pub order_id: Option<OrderId>,
    /// Caller-supplied creation time; generated when `None`
    pub timestamp: Option<DateTime<Utc>>,
}

impl OrderRequest {
    /// Creates a request for a limit order at the given price.
    pub fn limit(symbol: impl Into<String>, side: Side, price: Decimal, quantity: u64) -> Self {
        OrderRequest {
            symbol: symbol.into(),
            side,
            order_type: OrderType::Limit,
            quantity,
            price: Some(price),
            order_id: None,
            timestamp: None,
        }
    }

    /// Creates a request for a market order. Market orders carry no price.
    pub fn market(symbol: impl Into<String>, side: Side, quantity: u64) -> Self {
        OrderRequest {
            symbol: symbol.into(),
            side,
            order_type: OrderType::Market,
            quantity,
            price: None,
            order_id: None,
            timestamp: None,
        }
    }

    /// Overrides the generated order id with a caller-supplied one.
    pub fn with_order_id(mut self, order_id: impl Into<OrderId>) -> Self {
        self.order_id = Some(order_id.into());
        self
    }

    /// Overrides the generated creation timestamp.
    ///
    /// The timestamp is the tie-break key for orders resting at the same
    /// price, so deterministic tests set it explicitly.
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Sets (or replaces) the price on the request.
    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }
}

/// A single order: an immutable identity/economics record plus mutable
/// fill state.
///
/// Identity (`order_id`, `symbol`, `timestamp`) and economics (`side`,
/// `order_type`, `price`, `quantity`) are fixed at construction; only
/// `filled_quantity` and `status` change afterwards, through
/// [`fill`](Order::fill) and [`cancel`](Order::cancel).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    order_id: OrderId,
    symbol: String,
    side: Side,
    order_type: OrderType,
    /// `Some` with a strictly positive value iff this is a limit order
    price: Option<Decimal>,
    quantity: u64,
    filled_quantity: u64,
    status: OrderStatus,
    timestamp: DateTime<Utc>,
}

impl Order {
    /// Validates a request and constructs the order.
    ///
    /// ## Errors
    ///
    /// Returns [`InvalidOrder`] when the request names a limit order with
    /// a missing or non-positive price, a zero quantity, or an empty
    /// symbol. A price supplied alongside a market order is not an error:
    /// it is discarded with a warning and construction succeeds with no
    /// price.
    ///
    /// ## Examples
    ///
    /// ```
    /// use limit_order_book::{InvalidOrder, Order, OrderRequest, Side};
    /// use rust_decimal_macros::dec;
    ///
    /// let order = Order::new(OrderRequest::limit("ACME", Side::Buy, dec!(99.50), 10)).unwrap();
    /// assert_eq!(order.price(), Some(dec!(99.50)));
    ///
    /// let invalid = Order::new(OrderRequest::limit("ACME", Side::Buy, dec!(0), 10));
    /// assert_eq!(invalid, Err(InvalidOrder::NonPositiveLimitPrice(dec!(0))));
    /// ```
    pub fn new(request: OrderRequest) -> Result<Self, InvalidOrder> {
        if request.symbol.is_empty() {
            return Err(InvalidOrder::EmptySymbol);
        }
        if request.quantity == 0 {
            return Err(InvalidOrder::ZeroQuantity);
        }

        let price = match (request.order_type, request.price) {
            (OrderType::Limit, None) => return Err(InvalidOrder::MissingLimitPrice),
            (OrderType::Limit, Some(price)) if price <= Decimal::ZERO => {
                return Err(InvalidOrder::NonPositiveLimitPrice(price));
            }
            (OrderType::Limit, Some(price)) => Some(price),
            (OrderType::Market, Some(price)) => {
                warn!(%price, symbol = %request.symbol, "price supplied for market order will be ignored");
                None
            }
            (OrderType::Market, None) => None,
        };

        let order_id = request
            .order_id
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let timestamp = request.timestamp.unwrap_or_else(Utc::now);

        Ok(Order {
            order_id,
            symbol: request.symbol,
            side: request.side,
            order_type: request.order_type,
            price,
            quantity: request.quantity,
            filled_quantity: 0,
            status: OrderStatus::Open,
            timestamp,
        })
    }

    /// The unique identifier of this order.
    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    /// The instrument this order trades.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Whether this order buys or sells.
    pub fn side(&self) -> Side {
        self.side
    }

    /// Limit or market.
    pub fn order_type(&self) -> OrderType {
        self.order_type
    }

    /// The limit price, or `None` for market orders.
    pub fn price(&self) -> Option<Decimal> {
        self.price
    }

    /// The original requested quantity.
    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    /// How much of this order has been filled so far.
    pub fn filled_quantity(&self) -> u64 {
        self.filled_quantity
    }

    /// The current lifecycle state.
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// The creation time, used as the price-tie-break key in the book.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// The quantity yet to be filled.
    pub fn remaining_quantity(&self) -> u64 {
        self.quantity - self.filled_quantity
    }

    /// Returns `true` once the entire quantity has been filled.
    pub fn is_filled(&self) -> bool {
        self.remaining_quantity() == 0
    }

    /// Returns `true` while the order can still trade.
    pub fn is_live(&self) -> bool {
        self.status.is_live()
    }

    /// Marks a portion (or all) of the order as filled.
    ///
    /// A zero fill is a no-op, as is any fill against an order already in
    /// a terminal state. A fill larger than the remaining quantity is
    /// clamped to it and reported as a warning: it signals a logic error
    /// in the caller, not a corrupted order, and the order still lands
    /// exactly on `Filled`.
    pub fn fill(&mut self, quantity_filled: u64) {
        if quantity_filled == 0 {
            return;
        }
        if self.status.is_terminal() {
            warn!(
                order_id = %self.order_id,
                status = %self.status,
                "ignoring fill against an order in a terminal state"
            );
            return;
        }

        let remaining = self.remaining_quantity();
        let applied = if quantity_filled > remaining {
            warn!(
                order_id = %self.order_id,
                requested = quantity_filled,
                remaining,
                "fill exceeds remaining quantity, clamping to remaining"
            );
            remaining
        } else {
            quantity_filled
        };

        self.filled_quantity += applied;
        self.status = if self.is_filled() {
            OrderStatus::Filled
        } else {
            OrderStatus::PartiallyFilled
        };
    }

    /// Marks the order as cancelled.
    ///
    /// Cancelling an order that is already filled or already cancelled is
    /// a no-op: terminal states never change.
    pub fn cancel(&mut self) {
        if self.is_filled() || self.status == OrderStatus::Cancelled {
            debug!(
                order_id = %self.order_id,
                status = %self.status,
                "ignoring cancel of an order in a terminal state"
            );
            return;
        }
        self.status = OrderStatus::Cancelled;
    }
}

impl fmt::Display for Order {
    /// Compact one-line summary, intended for logs and consoles.
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.price {
            Some(price) => write!(
                formatter,
                "Order({}, {}, {} {} {} @ {}, filled {}/{}, {})",
                self.order_id,
                self.symbol,
                self.side,
                self.order_type,
                self.quantity,
                price,
                self.filled_quantity,
                self.quantity,
                self.status
            ),
            None => write!(
                formatter,
                "Order({}, {}, {} {} {}, filled {}/{}, {})",
                self.order_id,
                self.symbol,
                self.side,
                self.order_type,
                self.quantity,
                self.filled_quantity,
                self.quantity,
                self.status
            ),
        }
    }
}
