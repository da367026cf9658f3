use std::fs::File;
use std::io::BufReader;

use colored::Colorize;
use miette::{IntoDiagnostic, Result};
use strata_bundle::Bundle;

use crate::println_pad;
use crate::utils::format_size;

pub struct ListBundleArgs {
    pub file_path: String,
}

pub fn list_bundle(args: ListBundleArgs) -> Result<()> {
    let file = File::open(&args.file_path)
        .map_err(|e| miette::miette!("Failed to open '{}': {}", args.file_path, e))?;
    let bundle = Bundle::mount_from_reader(BufReader::new(file)).into_diagnostic()?;

    println_pad!(
        "{} {} {}",
        "📦 Bundle:".bright_blue().bold(),
        args.file_path.bright_cyan().bold(),
        format!("({} entries)", bundle.entries.len()).dimmed()
    );

    let mut paths: Vec<&str> = bundle.iter_paths().collect();
    paths.sort_unstable();
    for path in paths {
        let Some(entry) = bundle.get_entry(path) else {
            continue;
        };
        println_pad!(
            "   {} {} {}",
            "•".bright_cyan(),
            path.bright_white(),
            format!(
                "({}, {} packed, {})",
                format_size(entry.uncompressed_size),
                format_size(entry.compressed_size),
                entry.compression
            )
            .dimmed()
        );
    }

    Ok(())
}
