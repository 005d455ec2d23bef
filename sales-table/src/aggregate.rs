use crate::error::Error;
use crate::measure::Measure;
use crate::order::Order;
use crate::table::OrderTable;
use log::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A column orders can be grouped by
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub enum Dimension {
    Day,
    Product,
    City,
    Month,
}

impl Dimension {
    pub fn column(self) -> &'static str {
        match self {
            Dimension::Day => "Day",
            Dimension::Product => "Product",
            Dimension::City => "City",
            Dimension::Month => "Month",
        }
    }

    pub fn key_of(self, order: &Order) -> Key {
        match self {
            Dimension::Day => Key::Number(order.day()),
            Dimension::Product => Key::Text(order.product.clone()),
            Dimension::City => Key::Text(order.city.clone()),
            Dimension::Month => Key::Number(order.month()),
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for Dimension {
    type Err = Error;
    fn from_str(x: &str) -> Result<Dimension, Error> {
        match x.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(Dimension::Day),
            "product" => Ok(Dimension::Product),
            "city" => Ok(Dimension::City),
            "month" => Ok(Dimension::Month),
            _ => Err(Error::Unknown {
                what: "dimension",
                value: x.to_string(),
                expected: &["Day", "Product", "City", "Month"],
            }),
        }
    }
}

/// The value of a group's key column
#[derive(Debug, PartialEq, Eq, Clone, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum Key {
    Number(u32),
    Text(String),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Key::Number(x) => write!(f, "{}", x),
            Key::Text(x) => f.write_str(x),
        }
    }
}

impl From<u32> for Key {
    fn from(x: u32) -> Key {
        Key::Number(x)
    }
}

impl From<&str> for Key {
    fn from(x: &str) -> Key {
        Key::Text(x.to_string())
    }
}

/// The totals for one distinct key
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct AggregateRow {
    pub key: Key,
    pub quantity_ordered: u64,
    pub sales: f64,
}

impl AggregateRow {
    pub fn measure(&self, measure: Measure) -> f64 {
        match measure {
            Measure::QuantityOrdered => self.quantity_ordered as f64,
            Measure::Sales => self.sales,
        }
    }
}

/// Sums quantity and sales per distinct value of `dimension`.  Rows come
/// out sorted by key.
pub fn group_by(table: &OrderTable, dimension: Dimension) -> Vec<AggregateRow> {
    let mut groups: BTreeMap<Key, (u64, f64)> = BTreeMap::new();
    for order in table {
        let (quantity, sales) = groups.entry(dimension.key_of(order)).or_default();
        *quantity += u64::from(order.quantity_ordered);
        *sales += order.sales;
    }
    debug!(
        "Grouped {} orders into {} by {}",
        table.len(),
        groups.len(),
        dimension
    );
    groups
        .into_iter()
        .map(|(key, (quantity_ordered, sales))| AggregateRow {
            key,
            quantity_ordered,
            sales,
        })
        .collect()
}

pub fn group_by_day(table: &OrderTable) -> Vec<AggregateRow> {
    group_by(table, Dimension::Day)
}

pub fn group_by_product(table: &OrderTable) -> Vec<AggregateRow> {
    group_by(table, Dimension::Product)
}

pub fn group_by_city(table: &OrderTable) -> Vec<AggregateRow> {
    group_by(table, Dimension::City)
}

pub fn group_by_month(table: &OrderTable) -> Vec<AggregateRow> {
    group_by(table, Dimension::Month)
}

/// Each row's share of the measure's total, in percent.  If the total is
/// zero every share is zero.
pub fn percentage_of_total(rows: &[AggregateRow], measure: Measure) -> Vec<f64> {
    let total: f64 = rows.iter().map(|x| x.measure(measure)).sum();
    rows.iter()
        .map(|x| {
            if total == 0. {
                0.
            } else {
                100. * x.measure(measure) / total
            }
        })
        .collect()
}
