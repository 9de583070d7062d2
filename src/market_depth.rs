use crate::order::Order;
use crate::types::Side;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fmt;

/// The aggregate of all live orders resting at one price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PriceLevel {
    /// Total quantity still available at this price (remaining, not
    /// original, quantities)
    pub total_quantity: u64,
    /// How many distinct orders rest at this price
    pub order_count: usize,
}

/// Type alias for one side of the aggregated depth view.
///
/// Maps each distinct price (`Decimal`) to the [`PriceLevel`] aggregate of
/// the live orders resting there. `BTreeMap` keeps the levels
/// price-sorted, so the bid side reads best-first in reverse and the ask
/// side reads best-first forwards.
pub type DepthMap = BTreeMap<Decimal, PriceLevel>;

/// A snapshot of the book's aggregated market depth.
///
/// Produced by [`OrderBook::market_depth`](crate::OrderBook::market_depth).
/// Only live (open or partially filled) orders contribute, and the
/// snapshot is fully detached from the book: reading it never blocks or
/// mutates anything. The `Display` implementation renders a small textual
/// ladder for consoles and logs; the rendering is illustrative tooling,
/// not a stable format.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MarketDepth {
    /// Aggregated bid depth, keyed by exact price
    bids: DepthMap,
    /// Aggregated ask depth, keyed by exact price
    asks: DepthMap,
}

impl MarketDepth {
    /// Aggregates the given orders into per-price levels, one map per
    /// side. Orders that are not live are skipped.
    pub(crate) fn from_orders<'a>(orders: impl Iterator<Item = &'a Order>) -> Self {
        let mut depth = MarketDepth::default();

        for order in orders.filter(|order| order.is_live()) {
            // Only limit orders rest in a book, so a price is always present
            let price = match order.price() {
                Some(price) => price,
                None => continue,
            };
            let side_map = match order.side() {
                Side::Buy => &mut depth.bids,
                Side::Sell => &mut depth.asks,
            };
            let level = side_map.entry(price).or_default();
            level.total_quantity += order.remaining_quantity();
            level.order_count += 1;
        }

        depth
    }

    /// The aggregated bid side, keyed by exact price.
    pub fn bids(&self) -> &DepthMap {
        &self.bids
    }

    /// The aggregated ask side, keyed by exact price.
    pub fn asks(&self) -> &DepthMap {
        &self.asks
    }

    /// The number of distinct price levels on the bid side.
    pub fn bid_levels_count(&self) -> usize {
        self.bids.len()
    }

    /// The number of distinct price levels on the ask side.
    pub fn ask_levels_count(&self) -> usize {
        self.asks.len()
    }

    /// The total remaining quantity at a price level, or 0 if no live
    /// orders rest there.
    pub fn quantity_at_level(&self, price: Decimal, side: Side) -> u64 {
        let side_map = match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        };
        side_map
            .get(&price)
            .map(|level| level.total_quantity)
            .unwrap_or(0)
    }

    /// The number of live orders at a price level, or 0 if none rest there.
    pub fn orders_at_level(&self, price: Decimal, side: Side) -> usize {
        let side_map = match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        };
        side_map
            .get(&price)
            .map(|level| level.order_count)
            .unwrap_or(0)
    }
}

impl fmt::Display for MarketDepth {
    /// Renders the book as a textual ladder: asks descending toward the
    /// spread, then bids descending away from it, best prices adjacent in
    /// the middle.
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(formatter, "asks:")?;
        for (price, level) in self.asks.iter().rev() {
            writeln!(
                formatter,
                "  {:>12}  x {:<8} ({} orders)",
                price, level.total_quantity, level.order_count
            )?;
        }
        writeln!(formatter, "bids:")?;
        for (price, level) in self.bids.iter().rev() {
            writeln!(
                formatter,
                "  {:>12}  x {:<8} ({} orders)",
                price, level.total_quantity, level.order_count
            )?;
        }
        Ok(())
    }
}
