use crate::category::PriceCategory;
use crate::error::Error;
use crate::measure::Measure;
use crate::order::{Order, Row};
use log::*;
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_SOURCE: AtomicU64 = AtomicU64::new(0);

/// A filter which has been applied to a table
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub enum Step {
    Category(PriceCategory),
    Month(String),
    City(String),
    Product(String),
}

/// Where a table came from: the source table it was loaded as, and the
/// filters applied since.  Tables with equal lineages have equal contents.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct Lineage {
    source: u64,
    steps: Vec<Step>,
}

impl Lineage {
    fn fresh() -> Lineage {
        Lineage {
            source: NEXT_SOURCE.fetch_add(1, Ordering::Relaxed),
            steps: vec![],
        }
    }

    /// The lineage of this table after applying `step`
    pub fn then(&self, step: Step) -> Lineage {
        let mut steps = self.steps.clone();
        steps.push(step);
        Lineage {
            source: self.source,
            steps,
        }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

/// An immutable, cheaply clonable table of orders
#[derive(Clone, Debug)]
pub struct OrderTable {
    rows: Arc<[Order]>,
    lineage: Lineage,
}

impl OrderTable {
    /// A new source table
    pub fn new(rows: Vec<Order>) -> OrderTable {
        OrderTable {
            rows: rows.into(),
            lineage: Lineage::fresh(),
        }
    }

    /// Reads orders from CSV with a header row
    pub fn from_reader(rdr: impl Read) -> Result<OrderTable, Error> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(rdr);
        let mut rows = vec![];
        for (idx, row) in rdr.deserialize::<Row>().enumerate() {
            // Record numbers count the header as record 0
            rows.push(row?.into_order(idx as u64 + 1)?);
        }
        debug!("Read {} orders", rows.len());
        Ok(OrderTable::new(rows))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<OrderTable, Error> {
        OrderTable::from_reader(File::open(path)?)
    }

    /// Keeps the rows matching `pred`, in order
    pub(crate) fn derive(&self, step: Step, pred: impl Fn(&Order) -> bool) -> OrderTable {
        let rows = self.rows.iter().filter(|x| pred(x)).cloned().collect();
        OrderTable {
            rows,
            lineage: self.lineage.then(step),
        }
    }

    pub fn rows(&self) -> &[Order] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Order> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn lineage(&self) -> &Lineage {
        &self.lineage
    }

    pub fn total(&self, measure: Measure) -> f64 {
        match measure {
            Measure::QuantityOrdered => self
                .rows
                .iter()
                .map(|x| f64::from(x.quantity_ordered))
                .sum(),
            Measure::Sales => self.rows.iter().map(|x| x.sales).sum(),
        }
    }

    /// Distinct cities, in order of first appearance
    pub fn cities(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.rows
            .iter()
            .map(|x| x.city.as_str())
            .filter(|x| seen.insert(*x))
            .collect()
    }
}

impl<'a> IntoIterator for &'a OrderTable {
    type Item = &'a Order;
    type IntoIter = std::slice::Iter<'a, Order>;
    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
