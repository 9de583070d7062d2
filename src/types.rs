use std::fmt;

/// Represents the side of an order.
///
/// - `Buy` orders rest on the bid side of the book (demand side)
/// - `Sell` orders rest on the ask side of the book (supply side)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Buy side: traders willing to purchase at a given price
    Buy,
    /// Sell side: traders willing to sell at a given price
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(formatter, "BUY"),
            Side::Sell => write!(formatter, "SELL"),
        }
    }
}

/// Represents the execution style of an order.
///
/// Only `Limit` orders may rest in the book; `Market` orders carry no
/// price and must be executed immediately by a matching engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderType {
    /// Executes only at the stated price or better; may rest in the book
    Limit,
    /// Executes at whatever price the opposite side offers; never rests
    Market,
}

impl fmt::Display for OrderType {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderType::Limit => write!(formatter, "LIMIT"),
            OrderType::Market => write!(formatter, "MARKET"),
        }
    }
}

/// Represents the lifecycle state of an order.
///
/// Transitions are monotone toward a terminal state:
///
/// - `Open` → `PartiallyFilled` → `Filled`
/// - `Open` / `PartiallyFilled` → `Cancelled`
///
/// Once `Filled` or `Cancelled`, the status never changes again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    /// No quantity has been filled yet
    Open,
    /// Some, but not all, of the quantity has been filled
    PartiallyFilled,
    /// The entire quantity has been filled (terminal)
    Filled,
    /// The order was cancelled before being fully filled (terminal)
    Cancelled,
}

impl OrderStatus {
    /// Returns `true` if the order can still trade (`Open` or `PartiallyFilled`).
    pub fn is_live(&self) -> bool {
        matches!(self, OrderStatus::Open | OrderStatus::PartiallyFilled)
    }

    /// Returns `true` if the order has reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Filled | OrderStatus::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Open => write!(formatter, "OPEN"),
            OrderStatus::PartiallyFilled => write!(formatter, "PARTIALLY_FILLED"),
            OrderStatus::Filled => write!(formatter, "FILLED"),
            OrderStatus::Cancelled => write!(formatter, "CANCELLED"),
        }
    }
}

/// Type alias for order identifiers.
///
/// Ids are opaque strings: the book never interprets them beyond equality,
/// so callers are free to supply ids from their own numbering scheme. When
/// no id is supplied at construction time a UUID v4 string is generated.
pub type OrderId = String;
