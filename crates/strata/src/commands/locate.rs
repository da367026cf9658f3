use colored::Colorize;
use miette::Result;

use crate::errors::CliError;
use crate::println_pad;
use crate::utils::config::build_resolver;

pub struct LocateAssetArgs {
    pub config: Option<String>,
    pub name: String,
    pub include_type_path: bool,
    pub include_extension: bool,
    /// Fail when nothing is found instead of printing a notice.
    pub require: bool,
}

pub fn locate_asset(args: LocateAssetArgs) -> Result<()> {
    let resolver = build_resolver(args.config.as_deref())?;

    match resolver.locate(&args.name, args.include_type_path, args.include_extension) {
        Some(path) => {
            println_pad!(
                "{} {}",
                "📍 Found:".bright_green(),
                path.as_str().bright_white().bold()
            );
            Ok(())
        }
        None if args.require => Err(CliError::asset_not_found(args.name).into()),
        None => {
            println_pad!(
                "{} {}",
                "❔ Not on disk:".bright_yellow(),
                args.name.bright_white()
            );
            Ok(())
        }
    }
}
