//! The process-wide dataset.
//!
//! The dataset is loaded on first use and then shared, read-only, for the
//! rest of the process.  Only `get_or_load` and `invalidate` write to the
//! cache, and in practice that happens once at startup.

use anyhow::{Context, Result};
use arc_swap::ArcSwapOption;
use bpaf::Bpaf;
use log::*;
use sales_table::OrderTable;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

pub const DEFAULT_DATA: &str = "Cleaned Sales Data 2019.csv";

static DATASET: ArcSwapOption<Dataset> = ArcSwapOption::const_empty();

#[derive(Debug, Clone, Bpaf)]
pub struct Source {
    /// The orders CSV.  Defaults to $SALESDASH_DATA, then to "Cleaned Sales
    /// Data 2019.csv" in the working directory.
    #[bpaf(
        long,
        short,
        env("SALESDASH_DATA"),
        argument("PATH"),
        fallback(PathBuf::from(DEFAULT_DATA))
    )]
    pub data: PathBuf,
}

#[derive(Debug)]
pub struct Dataset {
    pub path: PathBuf,
    pub orders: OrderTable,
    /// In order of first appearance
    pub cities: Vec<String>,
}

impl Dataset {
    pub fn load(path: &Path) -> Result<Dataset> {
        let start = Instant::now();
        let orders = OrderTable::from_path(path)
            .with_context(|| format!("Couldn't load orders from {}", path.display()))?;
        let cities = orders.cities().into_iter().map(String::from).collect::<Vec<_>>();
        info!(
            "Loaded {} orders from {} cities in {}",
            orders.len(),
            cities.len(),
            humantime::format_duration(start.elapsed())
        );
        Ok(Dataset {
            path: path.to_path_buf(),
            orders,
            cities,
        })
    }
}

/// The cached dataset, if it was loaded from `path`; otherwise loads it and
/// replaces the cache.
pub fn get_or_load(path: &Path) -> Result<Arc<Dataset>> {
    if let Some(dataset) = DATASET.load_full() {
        if dataset.path == path {
            debug!("Using cached dataset from {}", path.display());
            return Ok(dataset);
        }
    }
    let dataset = Arc::new(Dataset::load(path)?);
    DATASET.store(Some(dataset.clone()));
    Ok(dataset)
}

/// Drops the cached dataset.  The next `get_or_load` reads the file again.
pub fn invalidate() {
    if DATASET.swap(None).is_some() {
        debug!("Invalidated the cached dataset");
    }
}
