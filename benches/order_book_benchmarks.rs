use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use limit_order_book::{Decimal, Order, OrderBook, OrderRequest, Side};
use rust_decimal_macros::dec;

/// Builds a limit order with a deterministic id, priced off an index.
fn indexed_order(side: Side, index: u64) -> Order {
    let price = dec!(100.00) + Decimal::from(index) / dec!(100);
    Order::new(
        OrderRequest::limit("ACME", side, price, 100).with_order_id(format!("order-{index}")),
    )
    .unwrap()
}

/// Benchmark the performance of admitting a single order into the book.
fn benchmark_single_order_insertion(criterion: &mut Criterion) {
    let mut benchmark_group = criterion.benchmark_group("order_insertion");

    benchmark_group.bench_function("add_single_bid_order", |bencher| {
        let mut book = OrderBook::new("ACME");
        let mut index = 0u64;

        bencher.iter(|| {
            let order = indexed_order(Side::Buy, index);
            let resting = book.add_order(order);
            black_box(resting.is_ok());
            index += 1; // Ensure unique prices and ids
        });
    });

    benchmark_group.bench_function("add_single_ask_order", |bencher| {
        let mut book = OrderBook::new("ACME");
        let mut index = 0u64;

        bencher.iter(|| {
            let order = indexed_order(Side::Sell, index);
            let resting = book.add_order(order);
            black_box(resting.is_ok());
            index += 1;
        });
    });

    benchmark_group.finish();
}

/// Benchmark the best-price queries at various book sizes. With no
/// cancellations pending, the lazy purge finds a live top immediately.
fn benchmark_best_price_queries(criterion: &mut Criterion) {
    let mut benchmark_group = criterion.benchmark_group("best_price_queries");

    for book_size in [100u64, 1_000, 10_000, 100_000] {
        benchmark_group.throughput(Throughput::Elements(1));

        // Pre-populate the order book with both sides
        let mut book = OrderBook::new("ACME");
        for index in 0..book_size {
            book.add_order(indexed_order(Side::Buy, index)).unwrap();
            book.add_order(indexed_order(Side::Sell, book_size + index))
                .unwrap();
        }

        benchmark_group.bench_with_input(
            BenchmarkId::new("best_bid_and_ask", book_size),
            &book_size,
            |bencher, _| {
                bencher.iter(|| {
                    let best_bid = book.best_bid();
                    let best_ask = book.best_ask();
                    black_box((best_bid, best_ask));
                });
            },
        );
    }

    benchmark_group.finish();
}

/// Benchmark consuming liquidity from the top of the book, the way a
/// matching engine does.
fn benchmark_pop_best_order(criterion: &mut Criterion) {
    let mut benchmark_group = criterion.benchmark_group("pop_best_order");
    benchmark_group.throughput(Throughput::Elements(1));

    benchmark_group.bench_function("pop_best_bid_order", |bencher| {
        // Repopulate outside the timed closure whenever the book drains
        let mut book = OrderBook::new("ACME");
        let mut refill_index = 0u64;

        bencher.iter(|| {
            if book.is_empty() {
                for index in 0..10_000 {
                    book.add_order(indexed_order(Side::Buy, refill_index + index))
                        .unwrap();
                }
                refill_index += 10_000;
            }
            let popped = book.pop_best_bid_order();
            black_box(popped);
        });
    });

    benchmark_group.finish();
}

/// Benchmark the lazy-deletion path: cancel a batch of resting orders,
/// then measure the read that has to purge the stale queue tops.
fn benchmark_lazy_purge_after_cancellations(criterion: &mut Criterion) {
    let mut benchmark_group = criterion.benchmark_group("lazy_purge");

    for cancelled_fraction_percent in [10u64, 50, 90] {
        benchmark_group.bench_with_input(
            BenchmarkId::new("best_bid_after_cancels", cancelled_fraction_percent),
            &cancelled_fraction_percent,
            |bencher, &percent| {
                bencher.iter_batched(
                    || {
                        let mut book = OrderBook::new("ACME");
                        let book_size = 10_000u64;
                        for index in 0..book_size {
                            book.add_order(indexed_order(Side::Buy, index)).unwrap();
                        }
                        // Cancel the top `percent` of the book so the purge
                        // has to discard a stale run before finding a live top
                        let cancel_from = book_size - book_size * percent / 100;
                        for index in cancel_from..book_size {
                            book.remove_order(&format!("order-{index}"));
                        }
                        book
                    },
                    |mut book| {
                        let best_bid = book.best_bid();
                        black_box(best_bid);
                    },
                    criterion::BatchSize::LargeInput,
                );
            },
        );
    }

    benchmark_group.finish();
}

criterion_group!(
    benches,
    benchmark_single_order_insertion,
    benchmark_best_price_queries,
    benchmark_pop_best_order,
    benchmark_lazy_purge_after_cancellations
);
criterion_main!(benches);
