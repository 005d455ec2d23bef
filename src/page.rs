use crate::chart::*;
use crate::linked::{Dashboard, LinkedDashboard};
use crate::selection::{Field, Selection};
use bpaf::Bpaf;
use log::*;
use sales_table::*;
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

/// A month to look at, or the whole year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MonthChoice {
    All,
    /// 1-12
    Month(u32),
}

impl MonthChoice {
    pub fn name(self) -> &'static str {
        match self {
            MonthChoice::All => ALL,
            MonthChoice::Month(m) => month_name(m).unwrap_or(ALL),
        }
    }
}

impl fmt::Display for MonthChoice {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MonthChoice {
    type Err = Error;
    /// Month names are matched case-insensitively
    fn from_str(x: &str) -> Result<MonthChoice, Error> {
        let x = x.trim();
        if x.eq_ignore_ascii_case(ALL) {
            return Ok(MonthChoice::All);
        }
        MONTH_NAMES
            .iter()
            .position(|name| name.eq_ignore_ascii_case(x))
            .map(|idx| MonthChoice::Month(idx as u32 + 1))
            .ok_or_else(|| Error::Unknown {
                what: "month",
                value: x.to_string(),
                expected: &[
                    "All",
                    "January",
                    "February",
                    "March",
                    "April",
                    "May",
                    "June",
                    "July",
                    "August",
                    "September",
                    "October",
                    "November",
                    "December",
                ],
            })
    }
}

/// The dashboard's widgets
#[derive(Debug, Clone, PartialEq, Bpaf)]
pub struct Filters {
    /// Category of products: All, Expensive, Moderate or Low Priced
    #[bpaf(long, argument("CATEGORY"), fallback(PriceCategory::All))]
    pub category: PriceCategory,
    /// Analysis on: Quantity Ordered or Sales
    #[bpaf(long("metric"), argument("MEASURE"), fallback(Measure::QuantityOrdered))]
    pub measure: Measure,
    /// A month name, or All for the linked view of the whole year
    #[bpaf(long, argument("MONTH"), fallback(MonthChoice::All))]
    pub month: MonthChoice,
    /// A city, or All.  Only used when a month is chosen.
    #[bpaf(long, argument("CITY"), fallback(ALL.to_string()))]
    pub city: String,
    /// A city to pick out on the city bars of a month with all cities
    #[bpaf(long, argument("CITY"))]
    pub select_city: Option<String>,
}

impl Default for Filters {
    fn default() -> Filters {
        Filters {
            category: PriceCategory::All,
            measure: Measure::QuantityOrdered,
            month: MonthChoice::All,
            city: ALL.to_string(),
            select_city: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Page {
    /// Line and product bars for the month, then either city bars and a
    /// pie by city (all cities) or an area and a pie by product (one city)
    Monthly([ChartSpec; 4]),
    /// The linked view of the whole year
    Yearly(Dashboard),
}

impl Page {
    #[cfg(test)]
    pub fn charts(&self) -> Vec<&ChartSpec> {
        match self {
            Page::Monthly(charts) => charts.iter().collect(),
            Page::Yearly(dash) => dash.panels().to_vec(),
        }
    }

    pub fn to_vega_lite(&self) -> Value {
        let mut doc = match self {
            Page::Monthly(charts) => {
                let [line, hbar, left, right] = charts;
                json!({
                    "params": hoist_params(&charts.iter().collect::<Vec<_>>()),
                    "vconcat": [
                        { "hconcat": [line.to_view(), hbar.to_view()] },
                        { "hconcat": [left.to_view(), right.to_view()] },
                    ],
                })
            }
            Page::Yearly(dash) => dash.to_vega_lite(),
        };
        doc["$schema"] = json!(SCHEMA);
        doc
    }
}

/// Builds the charts the dashboard shows for `filters`.  With no month
/// chosen, the city filter is ignored and the linked view is shown.
pub fn build(cache: &mut Cached, orders: &OrderTable, filters: &Filters) -> Page {
    let orders = cache.filter_by_price_category(orders, filters.category);
    let measure = filters.measure;
    let month = match filters.month {
        MonthChoice::All => {
            info!("{} orders in {}; showing the whole year", orders.len(), filters.category);
            let dash = LinkedDashboard::new(orders, measure);
            return Page::Yearly(dash.render(cache));
        }
        MonthChoice::Month(_) => filters.month.name(),
    };

    let in_month = cache.filter_by_month(&orders, month);
    info!("{} orders in {} ({})", in_month.len(), month, filters.category);
    let line = line_chart(&cache.group_by(&in_month, Dimension::Day), measure, month);
    let hbar = hbar_chart(&cache.group_by(&in_month, Dimension::Product), measure, month);

    let city = filters.city.as_str();
    let (left, right) = if city == ALL {
        let by_city = cache.group_by(&in_month, Dimension::City);
        let mut selection = Selection::new(Field::City);
        if let Some(city) = &filters.select_city {
            selection.click(city);
        }
        (
            vbar_chart(&by_city, measure, month, &selection),
            pie_chart(&by_city, measure, city),
        )
    } else {
        let in_city = cache.filter_by_city(&in_month, city);
        (
            area_chart(&cache.group_by(&in_city, Dimension::Day), measure, city, month),
            pie_chart(&cache.group_by(&in_city, Dimension::Product), measure, city),
        )
    };
    Page::Monthly([line, hbar, left, right])
}
