use crate::category::PriceCategory;
use crate::table::{OrderTable, Step};
use log::*;

/// The "no filter" choice.  Every filter passes the table through untouched
/// when given this value.
pub const ALL: &str = "All";

pub fn filter_by_price_category(table: &OrderTable, category: PriceCategory) -> OrderTable {
    if category == PriceCategory::All {
        return table.clone();
    }
    let out = table.derive(Step::Category(category), |x| category.contains(x.price_each));
    debug!("{}: {} -> {} orders", category, table.len(), out.len());
    out
}

/// Keeps the orders placed in the month with this (full, English,
/// case-sensitive) name.  A name which isn't a month gives an empty table.
pub fn filter_by_month(table: &OrderTable, month: &str) -> OrderTable {
    if month == ALL {
        return table.clone();
    }
    let out = table.derive(Step::Month(month.to_string()), |x| x.month_name() == month);
    if out.is_empty() && !table.is_empty() {
        warn!("No orders in month {:?}", month);
    }
    out
}

pub fn filter_by_city(table: &OrderTable, city: &str) -> OrderTable {
    if city == ALL {
        return table.clone();
    }
    let out = table.derive(Step::City(city.to_string()), |x| x.city == city);
    if out.is_empty() && !table.is_empty() {
        warn!("No orders from city {:?}", city);
    }
    out
}

pub fn filter_by_product(table: &OrderTable, product: &str) -> OrderTable {
    if product == ALL {
        return table.clone();
    }
    let out = table.derive(Step::Product(product.to_string()), |x| x.product == product);
    if out.is_empty() && !table.is_empty() {
        warn!("No orders for product {:?}", product);
    }
    out
}
