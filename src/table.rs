use crate::dataset::{self, Source};
use crate::page::MonthChoice;
use ansi_term::Style;
use anyhow::Result;
use bpaf::Bpaf;
use sales_table::*;
use serde::Serialize;
use std::io::{stdout, Write};

/// Prints the cities in the dataset, after "All"
pub fn cities(source: Source) -> Result<()> {
    let dataset = dataset::get_or_load(&source.data)?;
    let mut stdout = stdout().lock();
    writeln!(stdout, "{}", ALL)?;
    for city in &dataset.cities {
        writeln!(stdout, "{}", city)?;
    }
    Ok(())
}

/// Prints the filtered orders, or their totals
#[derive(Debug, Clone, Bpaf)]
pub struct Options {
    #[bpaf(external(dataset::source))]
    source: Source,
    /// All, Expensive, Moderate or Low Priced
    #[bpaf(long, argument("CATEGORY"), fallback(PriceCategory::All))]
    category: PriceCategory,
    /// A month name, or All
    #[bpaf(long, argument("MONTH"), fallback(MonthChoice::All))]
    month: MonthChoice,
    /// A city, or All
    #[bpaf(long, argument("CITY"), fallback(ALL.to_string()))]
    city: String,
    /// Print totals per day, product, city or month instead of orders
    #[bpaf(long, argument("DIMENSION"))]
    group_by: Option<Dimension>,
    /// Write CSV rather than an aligned table
    csv: bool,
}

pub fn table(opts: Options) -> Result<()> {
    let dataset = dataset::get_or_load(&opts.source.data)?;
    let orders = filter_by_price_category(&dataset.orders, opts.category);
    let orders = filter_by_month(&orders, opts.month.name());
    let orders = filter_by_city(&orders, &opts.city);
    let stdout = stdout().lock();
    match (opts.group_by, opts.csv) {
        (None, false) => print_orders(stdout, &orders),
        (None, true) => write_orders_csv(stdout, &orders),
        (Some(dim), false) => print_aggregates(stdout, dim, &group_by(&orders, dim)),
        (Some(dim), true) => write_aggregates_csv(stdout, dim, &group_by(&orders, dim)),
    }
}

const ORDER_COLUMNS: [&str; 8] = [
    "Order ID",
    "Product",
    "Quantity Ordered",
    "Price Each",
    "Order Date",
    "Purchase Address",
    "City",
    "Sales",
];

fn dollars(x: f64) -> String {
    format!("${:.2}", x)
}

fn order_date(order: &Order) -> String {
    order.order_date.format("%Y-%m-%d %H:%M").to_string()
}

fn header(out: &mut impl Write, columns: &[&str]) -> Result<()> {
    let bold = Style::new().bold();
    let line = columns
        .iter()
        .map(|x| bold.paint(*x).to_string())
        .collect::<Vec<_>>()
        .join("\t");
    writeln!(out, "{}", line)?;
    Ok(())
}

pub fn print_orders(out: impl Write, orders: &OrderTable) -> Result<()> {
    let mut out = tabwriter::TabWriter::new(out);
    header(&mut out, &ORDER_COLUMNS)?;
    for order in orders {
        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            order.order_id,
            order.product,
            order.quantity_ordered,
            dollars(order.price_each),
            order_date(order),
            order.purchase_address,
            order.city,
            dollars(order.sales),
        )?;
    }
    out.flush()?;
    Ok(())
}

pub fn print_aggregates(out: impl Write, dim: Dimension, rows: &[AggregateRow]) -> Result<()> {
    let mut out = tabwriter::TabWriter::new(out);
    header(&mut out, &[dim.column(), "Quantity Ordered", "Sales"])?;
    for row in rows {
        writeln!(
            out,
            "{}\t{}\t{}",
            row.key,
            row.quantity_ordered,
            dollars(row.sales)
        )?;
    }
    out.flush()?;
    Ok(())
}

/// An order as written to CSV
#[derive(Serialize)]
struct OrderRecord<'a> {
    #[serde(rename = "Order ID")]
    order_id: u64,
    #[serde(rename = "Product")]
    product: &'a str,
    #[serde(rename = "Quantity Ordered")]
    quantity_ordered: u32,
    #[serde(rename = "Price Each")]
    price_each: f64,
    #[serde(rename = "Order Date")]
    order_date: String,
    #[serde(rename = "Purchase Address")]
    purchase_address: &'a str,
    #[serde(rename = "City")]
    city: &'a str,
    #[serde(rename = "Sales")]
    sales: f64,
}

impl<'a> From<&'a Order> for OrderRecord<'a> {
    fn from(x: &'a Order) -> OrderRecord<'a> {
        OrderRecord {
            order_id: x.order_id,
            product: &x.product,
            quantity_ordered: x.quantity_ordered,
            price_each: x.price_each,
            order_date: order_date(x),
            purchase_address: &x.purchase_address,
            city: &x.city,
            sales: x.sales,
        }
    }
}

pub fn write_orders_csv(out: impl Write, orders: &OrderTable) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    for order in orders {
        wtr.serialize(OrderRecord::from(order))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_aggregates_csv(out: impl Write, dim: Dimension, rows: &[AggregateRow]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record([dim.column(), "Quantity Ordered", "Sales"])?;
    for row in rows {
        wtr.write_record([
            row.key.to_string(),
            row.quantity_ordered.to_string(),
            row.sales.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testdata::{orders, three_orders};

    fn lines(buf: Vec<u8>) -> Vec<String> {
        String::from_utf8(buf)
            .unwrap()
            .lines()
            .map(String::from)
            .collect()
    }

    #[test]
    fn orders_table() {
        let mut buf = vec![];
        print_orders(&mut buf, &three_orders()).unwrap();
        let out = lines(buf);
        assert_eq!(out.len(), 4);
        assert!(out[0].contains("Quantity Ordered"));
        assert!(out[2].contains("$500.00"));
        assert!(out[2].contains("2019-01-02 12:00"));
        assert!(out[3].contains("LA"));
        assert!(out[3].contains("$30.00"));
    }

    #[test]
    fn aggregate_table() {
        let mut buf = vec![];
        let rows = group_by(&orders(), Dimension::City);
        print_aggregates(&mut buf, Dimension::City, &rows).unwrap();
        let out = lines(buf);
        assert_eq!(out.len(), 3);
        assert!(out[0].contains("City"));
        assert!(out[1].starts_with("Boston"));
        assert!(out[1].contains("$737.58"));
        assert!(out[2].starts_with("Dallas"));
        assert!(out[2].contains("$730.31"));
    }

    #[test]
    fn orders_csv() {
        let mut buf = vec![];
        let jan = filter_by_month(&three_orders(), "January");
        write_orders_csv(&mut buf, &jan).unwrap();
        let mut rdr = csv::Reader::from_reader(buf.as_slice());
        assert_eq!(rdr.headers().unwrap(), ORDER_COLUMNS.as_slice());
        let records = rdr.records().map(|x| x.unwrap()).collect::<Vec<_>>();
        assert_eq!(records.len(), 2);
        assert_eq!(&records[0][1], "X");
        // Floats are written by serde, so keep their decimal point
        assert_eq!(&records[1][7], "500.0");
    }

    #[test]
    fn aggregates_csv() {
        let mut buf = vec![];
        let rows = group_by(&three_orders(), Dimension::Month);
        write_aggregates_csv(&mut buf, Dimension::Month, &rows).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "Month,Quantity Ordered,Sales\n1,3,520\n2,3,30\n"
        );
    }
}
