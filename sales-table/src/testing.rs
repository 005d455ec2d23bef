//! Fixtures for tests, here and in dependent crates.  Enable the
//! `test-support` feature to use them outside this crate.

use crate::{Order, OrderTable};
use chrono::{NaiveDate, NaiveDateTime};

/// Noon on the given day of 2019
pub fn date(month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2019, month, day)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

/// Three orders: X in NYC on Jan 1st, Y in NYC on Jan 2nd, X in LA on
/// Feb 1st
pub fn three_orders() -> OrderTable {
    OrderTable::new(vec![
        Order::new("X", "NYC", date(1, 1), 2, 10.),
        Order::new("Y", "NYC", date(1, 2), 1, 500.),
        Order::new("X", "LA", date(2, 1), 3, 10.),
    ])
}
