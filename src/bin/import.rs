// src/bin/import.rs
use table_scrape::cli;

fn main() {
    let _ = color_eyre::install();
    if let Err(e) = cli::run_import() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
