pub(crate) use sales_table::testing::three_orders;
use sales_table::testing::date;
use sales_table::{Order, OrderTable};
use serde_json::Value;

/// A few more orders: two cities, three products, three months
pub(crate) fn orders() -> OrderTable {
    OrderTable::new(vec![
        Order::new("iPhone", "Boston", date(3, 1), 1, 700.),
        Order::new("Lightning Cable", "Boston", date(3, 1), 2, 14.95),
        Order::new("Lightning Cable", "Dallas", date(3, 2), 1, 14.95),
        Order::new("AA Batteries", "Dallas", date(4, 9), 4, 3.84),
        Order::new("iPhone", "Dallas", date(4, 10), 1, 700.),
        Order::new("AA Batteries", "Boston", date(5, 20), 2, 3.84),
    ])
}

pub(crate) const CSV: &str = "\
,Order ID,Product,Quantity Ordered,Price Each,Order Date,Purchase Address,City,Month,Day,Hour,Sales,Postal Code
0,1,X,2,10.0,2019-01-01 12:00:00,\"1 Main St, NYC, NY 10001\",NYC,1,1,12,20.0,10001
1,2,Y,1,500.0,2019-01-02 12:00:00,\"2 Main St, NYC, NY 10001\",NYC,1,2,12,500.0,10001
2,3,X,3,10.0,2019-02-01 12:00:00,\"3 Main St, LA, CA 90001\",LA,2,1,12,30.0,90001
";

/// The names of every param declared anywhere in a document, in document
/// order
pub(crate) fn param_names(doc: &Value) -> Vec<String> {
    let mut names = vec![];
    walk(doc, &mut |x| {
        if let Some(params) = x.get("params").and_then(Value::as_array) {
            names.extend(params.iter().filter_map(|p| p["name"].as_str()).map(String::from));
        }
    });
    names
}

/// The names of every view in a document
pub(crate) fn view_names(doc: &Value) -> Vec<String> {
    let mut names = vec![];
    walk(doc, &mut |x| {
        if x.get("mark").is_some() || x.get("layer").is_some() {
            if let Some(name) = x.get("name").and_then(Value::as_str) {
                names.push(name.to_string());
            }
        }
    });
    names
}

fn walk(x: &Value, f: &mut impl FnMut(&Value)) {
    f(x);
    match x {
        Value::Object(map) => {
            for y in map.values() {
                walk(y, f);
            }
        }
        Value::Array(xs) => {
            for y in xs {
                walk(y, f);
            }
        }
        _ => (),
    }
}
