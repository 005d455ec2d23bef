use crate::error::Error;
use std::fmt;
use std::str::FromStr;

/// One of the two summable columns
#[derive(Debug, PartialEq, Clone, Copy, PartialOrd, Ord, Eq, Hash)]
pub enum Measure {
    QuantityOrdered,
    Sales,
}

impl Measure {
    pub const ALL: [Measure; 2] = [Measure::QuantityOrdered, Measure::Sales];

    /// The column name, which is also the field name in chart data
    pub fn column(self) -> &'static str {
        match self {
            Measure::QuantityOrdered => "Quantity Ordered",
            Measure::Sales => "Sales",
        }
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for Measure {
    type Err = Error;
    fn from_str(x: &str) -> Result<Measure, Error> {
        match x.trim().to_ascii_lowercase().replace(['-', '_'], " ").as_str() {
            "quantity ordered" | "quantity" => Ok(Measure::QuantityOrdered),
            "sales" => Ok(Measure::Sales),
            _ => Err(Error::Unknown {
                what: "measure",
                value: x.to_string(),
                expected: &["Quantity Ordered", "Sales"],
            }),
        }
    }
}

impl AsRef<str> for Measure {
    fn as_ref(&self) -> &str {
        self.column()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse() {
        assert_eq!(
            "Quantity Ordered".parse::<Measure>().unwrap(),
            Measure::QuantityOrdered
        );
        assert_eq!(
            "quantity-ordered".parse::<Measure>().unwrap(),
            Measure::QuantityOrdered
        );
        assert_eq!("sales".parse::<Measure>().unwrap(), Measure::Sales);
        assert!("profit".parse::<Measure>().is_err());
    }
}
