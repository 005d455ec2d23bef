/*! Filters and group-by aggregations over a table of retail orders.

## Example

Take a couple of orders, keep the cheap ones, and total them up per city.

```
# use sales_table::*;
# use chrono::NaiveDate;
let jan_1 = NaiveDate::from_ymd_opt(2019, 1, 1)
    .unwrap()
    .and_hms_opt(9, 30, 0)
    .unwrap();
let orders = OrderTable::new(vec![
    Order::new("USB-C Charging Cable", "Boston", jan_1, 2, 11.95),
    Order::new("Macbook Pro Laptop", "Boston", jan_1, 1, 1700.),
    Order::new("USB-C Charging Cable", "Dallas", jan_1, 1, 11.95),
]);

let cheap = filter_by_price_category(&orders, PriceCategory::LowPriced);
let by_city = group_by_city(&cheap);
assert_eq!(by_city.len(), 2);
assert_eq!(by_city[0].key, Key::from("Boston"));
assert_eq!(by_city[0].quantity_ordered, 2);
assert_eq!(by_city[0].measure(Measure::Sales), 23.9);
```

Every function here is pure: the same input table and parameters always
give the same output.  [`Cached`] memoizes them, keyed by the input
table's [`Lineage`].

*/

mod aggregate;
mod category;
mod error;
mod filter;
mod measure;
mod memo;
mod month;
mod order;
mod table;
#[cfg(any(test, feature = "test-support"))]
#[doc(hidden)]
pub mod testing;

pub use aggregate::*;
pub use category::*;
pub use error::*;
pub use filter::*;
pub use measure::*;
pub use memo::*;
pub use month::*;
pub use order::*;
pub use table::*;
