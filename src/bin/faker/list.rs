use std::io::IsTerminal;
use std::path::Path;
use std::process::ExitCode;

use faker::listing::{Listing, SortBy};
use faker::registry::Registry;

/// Print the store location and current settings.
pub fn print_settings(registry: &Registry, store_path: &Path) {
    println!("Store: {}", store_path.display());
    print!("{}", registry.settings);
}

/// Print the alias table followed by the settings.
pub fn run(registry: &Registry, store_path: &Path, sort: SortBy, namespace: &[String]) -> ExitCode {
    let listing = Listing {
        sort,
        namespace: namespace.to_vec(),
        color: std::io::stdout().is_terminal(),
    };
    println!("Commands:");
    print!("{}", listing.render(&registry.commands));
    println!();
    print_settings(registry, store_path);
    ExitCode::SUCCESS
}
