use crate::error::Error;
use std::fmt;
use std::str::FromStr;

/// Orders at or above this unit price are "Expensive"
pub const EXPENSIVE_FROM: f64 = 400.;
/// Orders at or above this unit price (and below [`EXPENSIVE_FROM`]) are
/// "Moderate"; anything cheaper is "Low Priced"
pub const MODERATE_FROM: f64 = 50.;

/// A partition of orders by unit price.  `All` selects every order.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub enum PriceCategory {
    All,
    Expensive,
    Moderate,
    LowPriced,
}

impl PriceCategory {
    /// The three real categories, in the order the dashboard lists them
    pub const PARTITION: [PriceCategory; 3] = [
        PriceCategory::Expensive,
        PriceCategory::Moderate,
        PriceCategory::LowPriced,
    ];

    const NAMES: &'static [&'static str] = &["All", "Expensive", "Moderate", "Low Priced"];

    /// The category a unit price falls into.  Never returns `All`.
    pub fn of(price: f64) -> PriceCategory {
        if price >= EXPENSIVE_FROM {
            PriceCategory::Expensive
        } else if price >= MODERATE_FROM {
            PriceCategory::Moderate
        } else {
            PriceCategory::LowPriced
        }
    }

    pub fn contains(self, price: f64) -> bool {
        self == PriceCategory::All || PriceCategory::of(price) == self
    }

    pub fn name(self) -> &'static str {
        match self {
            PriceCategory::All => "All",
            PriceCategory::Expensive => "Expensive",
            PriceCategory::Moderate => "Moderate",
            PriceCategory::LowPriced => "Low Priced",
        }
    }
}

impl fmt::Display for PriceCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PriceCategory {
    type Err = Error;
    fn from_str(x: &str) -> Result<PriceCategory, Error> {
        match x.trim().to_ascii_lowercase().replace(['-', '_'], " ").as_str() {
            "all" => Ok(PriceCategory::All),
            "expensive" => Ok(PriceCategory::Expensive),
            "moderate" => Ok(PriceCategory::Moderate),
            "low priced" | "low" => Ok(PriceCategory::LowPriced),
            _ => Err(Error::Unknown {
                what: "price category",
                value: x.to_string(),
                expected: PriceCategory::NAMES,
            }),
        }
    }
}
