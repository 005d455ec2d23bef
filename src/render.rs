use crate::dataset::{self, Source};
use crate::linked::LinkedDashboard;
use crate::page::{self, Filters, Page};
use crate::selection::Click;
use anyhow::Result;
use bpaf::Bpaf;
use log::*;
use sales_table::*;
use serde_json::Value;
use std::io::{stdin, stdout, BufRead, BufReader, Write};

/// Prints the dashboard as a single Vega-Lite document
#[derive(Debug, Clone, Bpaf)]
pub struct Options {
    #[bpaf(external(dataset::source))]
    source: Source,
    #[bpaf(external(page::filters))]
    filters: Filters,
    /// Indent the output
    pretty: bool,
}

pub fn render(opts: Options) -> Result<()> {
    let dataset = dataset::get_or_load(&opts.source.data)?;
    let mut cache = Cached::new();
    let page = page::build(&mut cache, &dataset.orders, &opts.filters);
    let (hits, misses) = cache.stats();
    debug!("Cache: {} hits, {} misses", hits, misses);
    print(&mut stdout().lock(), &page.to_vega_lite(), opts.pretty)
}

/// Prints the linked dashboard for the whole year, then reads clicks from
/// stdin ("city <name>" or "product <name>", one per line) and prints the
/// dashboard again after each.  "reload" reads the data file again.
#[derive(Debug, Clone, Bpaf)]
pub struct LinkedOptions {
    #[bpaf(external(dataset::source))]
    source: Source,
    /// All, Expensive, Moderate or Low Priced
    #[bpaf(long, argument("CATEGORY"), fallback(PriceCategory::All))]
    category: PriceCategory,
    /// Quantity Ordered or Sales
    #[bpaf(long("metric"), argument("MEASURE"), fallback(Measure::QuantityOrdered))]
    measure: Measure,
}

pub fn linked(opts: LinkedOptions) -> Result<()> {
    let load = |cache: &mut Cached| -> Result<OrderTable> {
        let dataset = dataset::get_or_load(&opts.source.data)?;
        Ok(cache.filter_by_price_category(&dataset.orders, opts.category))
    };
    let mut cache = Cached::new();
    let mut dash = LinkedDashboard::new(load(&mut cache)?, opts.measure);
    let reload = |cache: &mut Cached| {
        dataset::invalidate();
        load(cache)
    };
    let input = BufReader::new(stdin());
    run_linked(&mut dash, &mut cache, input, stdout().lock(), reload)
}

fn run_linked(
    dash: &mut LinkedDashboard,
    cache: &mut Cached,
    input: impl BufRead,
    mut out: impl Write,
    mut reload: impl FnMut(&mut Cached) -> Result<OrderTable>,
) -> Result<()> {
    emit(dash, cache, &mut out)?;
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        if line.trim() == "reload" {
            cache.clear();
            dash.set_orders(reload(cache)?);
            emit(dash, cache, &mut out)?;
            continue;
        }
        let click = line.parse::<Click>();
        let Some(click) = click.map_err(|e| warn!("Ignoring {:?}: {}", line, e)).ok() else {
            continue;
        };
        dash.click(&click);
        emit(dash, cache, &mut out)?;
    }
    let (hits, misses) = cache.stats();
    debug!("Cache: {} hits, {} misses", hits, misses);
    Ok(())
}

fn emit(dash: &LinkedDashboard, cache: &mut Cached, out: &mut impl Write) -> Result<()> {
    let page = Page::Yearly(dash.render(cache));
    print(out, &page.to_vega_lite(), false)?;
    out.flush()?;
    Ok(())
}

fn print(out: &mut impl Write, doc: &Value, pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *out, doc)?;
    } else {
        serde_json::to_writer(&mut *out, doc)?;
    }
    writeln!(out)?;
    Ok(())
}
