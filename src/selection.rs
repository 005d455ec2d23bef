use anyhow::*;
use sales_table::{Cached, Dimension, OrderTable, ALL};
use serde_json::{json, Map, Value};
use std::fmt;
use std::str::FromStr;

/// The columns a selection can be made over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    City,
    Product,
}

impl Field {
    pub fn dimension(self) -> Dimension {
        match self {
            Field::City => Dimension::City,
            Field::Product => Dimension::Product,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.dimension().column())
    }
}

impl FromStr for Field {
    type Err = Error;
    fn from_str(x: &str) -> Result<Field> {
        match x.parse::<Dimension>()? {
            Dimension::City => Ok(Field::City),
            Dimension::Product => Ok(Field::Product),
            d => bail!("Can't select by {}; only by City or Product", d),
        }
    }
}

/// A single-select, click-driven choice of one key along a dimension.
///
/// Starts empty.  Clicking a key selects it, clicking the selected key
/// again deselects it, and clicking a different key moves the selection.
/// While empty, the selection matches every key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    field: Field,
    value: Option<String>,
}

impl Selection {
    pub fn new(field: Field) -> Selection {
        Selection { field, value: None }
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_none()
    }

    pub fn click(&mut self, key: &str) {
        if self.value.as_deref() == Some(key) {
            self.value = None;
        } else {
            self.value = Some(key.to_string());
        }
    }

    /// Whether marks for `key` should be drawn at full strength
    pub fn highlights(&self, key: &str) -> bool {
        self.value.as_deref().map_or(true, |x| x == key)
    }

    /// Whether `key` is the selected key.  Unlike `highlights`, this is
    /// false for everything while the selection is empty.
    pub fn selects(&self, key: &str) -> bool {
        self.value.as_deref() == Some(key)
    }

    /// The orders matching the selection (all of them, while it's empty)
    pub fn apply(&self, cache: &mut Cached, orders: &OrderTable) -> OrderTable {
        let value = self.value.as_deref().unwrap_or(ALL);
        match self.field {
            Field::City => cache.filter_by_city(orders, value),
            Field::Product => cache.filter_by_product(orders, value),
        }
    }

    /// The name the rendering surface knows this selection by
    pub fn name(&self) -> String {
        format!("select_{}", self.field.dimension().column().to_ascii_lowercase())
    }

    /// A Vega-Lite point-selection parameter.  The surface reports clicks
    /// against it; they come back to us as [`Click`]s.
    pub fn param(&self) -> Value {
        let field = self.field.dimension().column();
        let mut param = json!({
            "name": self.name(),
            "select": { "type": "point", "fields": [field] },
        });
        if let Some(value) = &self.value {
            let mut selected = Map::new();
            selected.insert(field.to_string(), json!(value));
            param["value"] = json!([selected]);
        }
        param
    }
}

/// A click on a mark, as reported by the rendering surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Click {
    pub field: Field,
    pub key: String,
}

impl FromStr for Click {
    type Err = Error;
    /// Parses "<field> <key>", eg. "city New York City"
    fn from_str(x: &str) -> Result<Click> {
        let (field, key) = x
            .trim()
            .split_once(char::is_whitespace)
            .ok_or_else(|| anyhow!("Expected \"<field> <key>\", got {:?}", x))?;
        Ok(Click {
            field: field.parse()?,
            key: key.trim().to_string(),
        })
    }
}

impl fmt::Display for Click {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.field, self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testdata::three_orders;

    #[test]
    fn state_machine() {
        let mut sel = Selection::new(Field::City);
        assert!(sel.is_empty());
        sel.click("A");
        assert_eq!(sel.value(), Some("A"));
        sel.click("A");
        assert!(sel.is_empty());
        sel.click("A");
        sel.click("B");
        assert_eq!(sel.value(), Some("B"));
        sel.click("B");
        assert!(sel.is_empty());
    }

    #[test]
    fn highlighting() {
        let mut sel = Selection::new(Field::Product);
        assert!(sel.highlights("X") && sel.highlights("Y"));
        assert!(!sel.selects("X") && !sel.selects("Y"));
        sel.click("X");
        assert!(sel.highlights("X") && !sel.highlights("Y"));
        assert!(sel.selects("X") && !sel.selects("Y"));
    }

    #[test]
    fn apply() {
        let orders = three_orders();
        let mut cache = Cached::new();
        let mut sel = Selection::new(Field::City);
        assert_eq!(sel.apply(&mut cache, &orders).len(), 3);
        sel.click("LA");
        let out = sel.apply(&mut cache, &orders);
        assert_eq!(out.len(), 1);
        assert_eq!(out.rows()[0].city, "LA");

        let mut sel = Selection::new(Field::Product);
        sel.click("X");
        assert_eq!(sel.apply(&mut cache, &orders).len(), 2);
    }

    #[test]
    fn param() {
        let mut sel = Selection::new(Field::City);
        assert_eq!(
            sel.param(),
            json!({ "name": "select_city", "select": { "type": "point", "fields": ["City"] } })
        );
        sel.click("NYC");
        assert_eq!(sel.param()["value"], json!([{ "City": "NYC" }]));
    }

    #[test]
    fn parse_click() {
        let click: Click = "city New York City".parse().unwrap();
        assert_eq!(click.field, Field::City);
        assert_eq!(click.key, "New York City");
        assert_eq!(click.to_string(), "City New York City");
        assert!("city".parse::<Click>().is_err());
        assert!("colour red".parse::<Click>().is_err());
        assert!("month 3".parse::<Click>().is_err());
        assert_eq!(
            "Product  iPhone ".parse::<Click>().unwrap(),
            Click {
                field: Field::Product,
                key: "iPhone".into()
            }
        );
    }
}
