use colored::Colorize;
use miette::{IntoDiagnostic, Result};

use crate::println_pad;
use crate::utils::config::build_resolver;

pub struct InfoStackArgs {
    pub config: Option<String>,
    pub json: bool,
}

pub fn info_stack(args: InfoStackArgs) -> Result<()> {
    let resolver = build_resolver(args.config.as_deref())?;
    let snapshot = resolver.registry().snapshot();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot).into_diagnostic()?);
        return Ok(());
    }

    let flags = resolver.flags();
    println_pad!("{}", "🏗️  Overlay roots:".bright_magenta().bold());
    for root in resolver.stack().roots() {
        println_pad!(
            "   {} {} {}",
            "•".bright_cyan(),
            root.path.as_str().bright_cyan().bold(),
            format!("(priority: {})", root.priority).dimmed()
        );
    }

    println_pad!("\n{}", "📦 Archives:".bright_magenta().bold());
    if snapshot.is_empty() {
        println_pad!("   {}", "none found".dimmed());
    }
    for archive in &snapshot {
        println_pad!(
            "   {} {} {} {}",
            "•".bright_cyan(),
            archive.archive_id.bright_cyan().bold(),
            archive.url.as_str().bright_white(),
            format!("(priority: {}, version: {})", archive.priority, archive.version).dimmed()
        );
    }

    println_pad!("\n{}", "⚙️  Flags:".bright_magenta().bold());
    println_pad!("   bundles enabled: {}", flags.bundles_enabled);
    println_pad!("   strict archives only: {}", flags.strict_archives_only);
    println_pad!("   packaged container: {}", flags.packaged_container);

    let mut folders: Vec<&str> = resolver.clips().folders().collect();
    folders.sort_unstable();
    println_pad!(
        "\n{} {}",
        "🎞️  Animation folders:".bright_magenta().bold(),
        format!("({})", folders.len()).dimmed()
    );
    for folder in folders {
        println_pad!("   {} {}", "•".bright_cyan(), folder);
    }

    Ok(())
}
