mod chart;
mod dataset;
mod linked;
mod page;
mod render;
mod selection;
mod table;
#[cfg(test)]
mod testdata;

use bpaf::Bpaf;

/// Charts over a year of retail orders
#[derive(Bpaf)]
#[bpaf(options, version)]
enum Subcommand {
    /// Lists the cities to choose from
    #[bpaf(command)]
    Cities(#[bpaf(external(dataset::source))] dataset::Source),
    /// Prints the filtered orders, or their totals
    #[bpaf(command)]
    Table(#[bpaf(external(table::options))] table::Options),
    /// Prints the dashboard as a Vega-Lite document
    #[bpaf(command)]
    Render(#[bpaf(external(render::options))] render::Options),
    /// Prints the linked dashboard, then again after each click read from stdin
    #[bpaf(command)]
    Linked(#[bpaf(external(render::linked_options))] render::LinkedOptions),
}

fn main() {
    env_logger::init();
    let result = match subcommand().run() {
        Subcommand::Cities(source) => table::cities(source),
        Subcommand::Table(opts) => table::table(opts),
        Subcommand::Render(opts) => render::render(opts),
        Subcommand::Linked(opts) => render::linked(opts),
    };
    match result {
        Ok(()) => (),
        Err(e) => {
            // Ignore EPIPE
            if let Some(e) = e.downcast_ref::<std::io::Error>() {
                if e.kind() == std::io::ErrorKind::BrokenPipe {
                    return;
                }
            }
            eprintln!("Error: {:#}", e);
            std::process::exit(1)
        }
    }
}
