use crate::aggregate::{group_by, AggregateRow, Dimension};
use crate::category::PriceCategory;
use crate::filter::*;
use crate::table::{Lineage, OrderTable, Step};
use log::*;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

/// A cache of the results of one pure function, keyed by its arguments
pub struct Memo<K, V> {
    name: &'static str,
    entries: HashMap<K, V>,
    hits: u64,
    misses: u64,
}

impl<K: Eq + Hash + fmt::Debug, V: Clone> Memo<K, V> {
    pub fn new(name: &'static str) -> Memo<K, V> {
        Memo {
            name,
            entries: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    pub fn get_or_insert_with(&mut self, key: K, f: impl FnOnce() -> V) -> V {
        if let Some(x) = self.entries.get(&key) {
            self.hits += 1;
            trace!("{}: hit {:?}", self.name, key);
            return x.clone();
        }
        self.misses += 1;
        trace!("{}: miss {:?}", self.name, key);
        let x = f();
        self.entries.insert(key, x.clone());
        x
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<K, V> fmt::Debug for Memo<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Memo")
            .field("name", &self.name)
            .field("entries", &self.entries.len())
            .field("hits", &self.hits)
            .field("misses", &self.misses)
            .finish()
    }
}

/// The filter and aggregation functions, memoized.  Results are identical
/// to calling the functions directly; only the work done differs.
///
/// Filters are keyed by the lineage of the table they produce, group-bys by
/// the lineage of their input and the dimension.  Nothing is ever evicted,
/// so this is meant for a bounded set of widget choices over one dataset.
#[derive(Debug)]
pub struct Cached {
    filters: Memo<Lineage, OrderTable>,
    groups: Memo<(Lineage, Dimension), Arc<[AggregateRow]>>,
}

impl Default for Cached {
    fn default() -> Cached {
        Cached::new()
    }
}

impl Cached {
    pub fn new() -> Cached {
        Cached {
            filters: Memo::new("filter"),
            groups: Memo::new("group_by"),
        }
    }

    fn filter(
        &mut self,
        table: &OrderTable,
        step: Step,
        f: impl FnOnce() -> OrderTable,
    ) -> OrderTable {
        self.filters.get_or_insert_with(table.lineage().then(step), f)
    }

    pub fn filter_by_price_category(
        &mut self,
        table: &OrderTable,
        category: PriceCategory,
    ) -> OrderTable {
        if category == PriceCategory::All {
            return table.clone();
        }
        self.filter(table, Step::Category(category), || {
            filter_by_price_category(table, category)
        })
    }

    pub fn filter_by_month(&mut self, table: &OrderTable, month: &str) -> OrderTable {
        if month == ALL {
            return table.clone();
        }
        self.filter(table, Step::Month(month.to_string()), || {
            filter_by_month(table, month)
        })
    }

    pub fn filter_by_city(&mut self, table: &OrderTable, city: &str) -> OrderTable {
        if city == ALL {
            return table.clone();
        }
        self.filter(table, Step::City(city.to_string()), || {
            filter_by_city(table, city)
        })
    }

    pub fn filter_by_product(&mut self, table: &OrderTable, product: &str) -> OrderTable {
        if product == ALL {
            return table.clone();
        }
        self.filter(table, Step::Product(product.to_string()), || {
            filter_by_product(table, product)
        })
    }

    pub fn group_by(&mut self, table: &OrderTable, dimension: Dimension) -> Arc<[AggregateRow]> {
        self.groups
            .get_or_insert_with((table.lineage().clone(), dimension), || {
                group_by(table, dimension).into()
            })
    }

    /// (hits, misses) over all the memoized functions
    pub fn stats(&self) -> (u64, u64) {
        (
            self.filters.hits() + self.groups.hits(),
            self.filters.misses() + self.groups.misses(),
        )
    }

    pub fn clear(&mut self) {
        self.filters.clear();
        self.groups.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::group_by_day;
    use crate::filter::tests::random_orders;
    use crate::testing::three_orders;
    use rand::prelude::*;

    #[test]
    fn memo_counts() {
        let mut memo = Memo::new("square");
        let mut calls = 0;
        for x in [1, 2, 1, 1, 3] {
            let y = memo.get_or_insert_with(x, || {
                calls += 1;
                x * x
            });
            assert_eq!(y, x * x);
        }
        assert_eq!(calls, 3);
        assert_eq!((memo.hits(), memo.misses(), memo.len()), (2, 3, 3));
        memo.clear();
        assert!(memo.is_empty());
    }

    #[test]
    fn same_results_as_direct_calls() {
        let mut rng = StdRng::seed_from_u64(5);
        let table = random_orders(&mut rng, 500);
        let mut cached = Cached::new();
        for _ in 0..2 {
            for category in PriceCategory::PARTITION {
                let direct = filter_by_price_category(&table, category);
                let memoized = cached.filter_by_price_category(&table, category);
                assert_eq!(direct.rows(), memoized.rows());
                assert_eq!(direct.lineage(), memoized.lineage());

                let direct = filter_by_city(&filter_by_month(&direct, "March"), "Boston");
                let memoized = cached.filter_by_month(&memoized, "March");
                let memoized = cached.filter_by_city(&memoized, "Boston");
                assert_eq!(direct.rows(), memoized.rows());
                assert_eq!(&*cached.group_by(&memoized, Dimension::Day), &group_by_day(&direct)[..]);
            }
        }
        // The second pass is all hits
        let (hits, misses) = cached.stats();
        assert_eq!(misses, 3 * 4);
        assert_eq!(hits, 3 * 4);
    }

    #[test]
    fn pass_through_is_not_cached() {
        let table = three_orders();
        let mut cached = Cached::new();
        let out = cached.filter_by_city(&table, ALL);
        assert_eq!(out.lineage(), table.lineage());
        let out = cached.filter_by_product(&table, ALL);
        assert_eq!(out.lineage(), table.lineage());
        assert_eq!(cached.stats(), (0, 0));
    }

    #[test]
    fn distinct_sources_dont_collide() {
        let mut cached = Cached::new();
        let a = three_orders();
        let b = three_orders();
        cached.group_by(&a, Dimension::City);
        cached.group_by(&b, Dimension::City);
        assert_eq!(cached.stats(), (0, 2));
    }
}
