use crate::category::PriceCategory;
use crate::error::Error;
use crate::month::month_name;
use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{de, Deserialize, Deserializer};

/// Formats accepted in the "Order Date" column.  The first is what the
/// cleaned dataset uses; the last is the format of the raw monthly files.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%y %H:%M",
];

/// A single line-item.  Month, day and hour are derived from the order
/// date rather than stored.
#[derive(Clone, Debug, PartialEq)]
pub struct Order {
    pub order_id: u64,
    pub product: String,
    pub quantity_ordered: u32,
    /// Unit price in USD
    pub price_each: f64,
    pub order_date: NaiveDateTime,
    pub purchase_address: String,
    pub city: String,
    pub postal_code: Option<u32>,
    /// `price_each * quantity_ordered`, in USD
    pub sales: f64,
}

impl Order {
    pub fn new(
        product: impl Into<String>,
        city: impl Into<String>,
        order_date: NaiveDateTime,
        quantity_ordered: u32,
        price_each: f64,
    ) -> Order {
        Order {
            order_id: 0,
            product: product.into(),
            quantity_ordered,
            price_each,
            order_date,
            purchase_address: String::new(),
            city: city.into(),
            postal_code: None,
            sales: price_each * f64::from(quantity_ordered),
        }
    }

    /// 1-12
    pub fn month(&self) -> u32 {
        self.order_date.month()
    }

    /// Day of the month, from 1
    pub fn day(&self) -> u32 {
        self.order_date.day()
    }

    pub fn hour(&self) -> u32 {
        self.order_date.hour()
    }

    pub fn month_name(&self) -> &'static str {
        // chrono guarantees 1..=12
        month_name(self.month()).unwrap_or_default()
    }

    pub fn price_category(&self) -> PriceCategory {
        PriceCategory::of(self.price_each)
    }
}

pub(crate) fn parse_order_date(x: &str) -> Option<NaiveDateTime> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(x, fmt).ok())
}

/// A record as it appears in the CSV.  Unknown columns (the unnamed index,
/// "Month", "Day", "Hour") are ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct Row {
    #[serde(rename = "Order ID", deserialize_with = "whole_number")]
    order_id: u64,
    #[serde(rename = "Product")]
    product: String,
    #[serde(rename = "Quantity Ordered", deserialize_with = "whole_number")]
    quantity_ordered: u64,
    #[serde(rename = "Price Each")]
    price_each: f64,
    #[serde(rename = "Order Date")]
    order_date: String,
    #[serde(rename = "Purchase Address", default)]
    purchase_address: String,
    #[serde(rename = "City")]
    city: String,
    #[serde(rename = "Sales", default)]
    sales: Option<f64>,
    #[serde(rename = "Postal Code", default, deserialize_with = "opt_whole_number")]
    postal_code: Option<u64>,
}

impl Row {
    pub(crate) fn into_order(self, record: u64) -> Result<Order, Error> {
        let order_date = parse_order_date(&self.order_date).ok_or(Error::BadDate {
            record,
            value: self.order_date,
        })?;
        let narrow = |column: &'static str, value: u64| {
            u32::try_from(value).map_err(|_| Error::OutOfRange {
                record,
                column,
                value,
            })
        };
        let quantity_ordered = narrow("Quantity Ordered", self.quantity_ordered)?;
        let postal_code = self
            .postal_code
            .map(|x| narrow("Postal Code", x))
            .transpose()?;
        Ok(Order {
            order_id: self.order_id,
            product: self.product,
            quantity_ordered,
            price_each: self.price_each,
            order_date,
            purchase_address: self.purchase_address,
            city: self.city,
            postal_code,
            sales: self
                .sales
                .unwrap_or(self.price_each * f64::from(quantity_ordered)),
        })
    }
}

// pandas likes to write integer columns as "12.0"
fn parse_whole_number<E: de::Error>(x: &str) -> Result<u64, E> {
    if let Ok(n) = x.parse::<u64>() {
        return Ok(n);
    }
    match x.parse::<f64>() {
        Ok(f) if f >= 0. && f.fract() == 0. && f <= u64::MAX as f64 => Ok(f as u64),
        _ => Err(E::custom(format!("expected a whole number, got {:?}", x))),
    }
}

fn whole_number<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
    let x = String::deserialize(d)?;
    parse_whole_number(&x)
}

fn opt_whole_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
    match Option::<String>::deserialize(d)? {
        Some(x) if !x.is_empty() => parse_whole_number(&x).map(Some),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn date_formats() {
        let expected = NaiveDate::from_ymd_opt(2019, 4, 19)
            .unwrap()
            .and_hms_opt(8, 46, 0)
            .unwrap();
        assert_eq!(parse_order_date("2019-04-19 08:46:00"), Some(expected));
        assert_eq!(parse_order_date("2019-04-19T08:46:00"), Some(expected));
        assert_eq!(parse_order_date("2019-04-19 08:46"), Some(expected));
        assert_eq!(parse_order_date("04/19/19 08:46"), Some(expected));
        assert_eq!(parse_order_date("Order Date"), None);
    }

    #[test]
    fn derived_fields() {
        let date = NaiveDate::from_ymd_opt(2019, 12, 30)
            .unwrap()
            .and_hms_opt(0, 1, 0)
            .unwrap();
        let order = Order::new("iPhone", "Dallas", date, 2, 700.);
        assert_eq!(order.month(), 12);
        assert_eq!(order.month_name(), "December");
        assert_eq!(order.day(), 30);
        assert_eq!(order.hour(), 0);
        assert_eq!(order.sales, 1400.);
        assert_eq!(order.price_category(), PriceCategory::Expensive);
    }

    #[test]
    fn whole_numbers() {
        let p = |x| parse_whole_number::<de::value::Error>(x);
        assert_eq!(p("12").unwrap(), 12);
        assert_eq!(p("12.0").unwrap(), 12);
        assert!(p("12.5").is_err());
        assert!(p("-1").is_err());
        assert!(p("twelve").is_err());
    }
}
