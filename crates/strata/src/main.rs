use clap::builder::{styling::AnsiColor, Styles};
use clap::ColorChoice;
use clap::{ArgAction, CommandFactory, FromArgMatches, Parser, Subcommand};
use commands::{
    cat_asset, info_stack, list_bundle, list_clips, locate_asset, pack_bundle, CatAssetArgs,
    InfoStackArgs, ListBundleArgs, ListClipsArgs, LocateAssetArgs, PackBundleArgs, PackCompression,
};
use miette::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod errors;
mod utils;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The path to the stack config file (defaults to strata.toml next to the executable)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the file that would serve an asset
    Locate {
        /// The logical asset name
        name: String,

        /// Do not prefix the conventional type directory
        #[arg(long)]
        no_type_path: bool,

        /// Append the default extension to extensionless archive names
        #[arg(short, long)]
        extension: bool,
    },
    /// Check whether an asset exists on disk. Exits with an error if not.
    Exists {
        /// The logical asset name
        name: String,

        /// Do not prefix the conventional type directory
        #[arg(long)]
        no_type_path: bool,

        /// Append the default extension to extensionless archive names
        #[arg(short, long)]
        extension: bool,
    },
    /// Resolve an asset and print or write it
    Cat {
        /// The logical asset name
        name: String,

        /// The asset kind to resolve as
        #[arg(short, long, default_value = "text")]
        kind: String,

        /// Write the resolved bytes to this file instead of printing
        #[arg(short, long)]
        output: Option<String>,
    },
    /// List the clips registered under an animation folder
    Clips {
        /// The folder name from the animation manifest
        folder: String,
    },
    /// Show the overlay roots and registered archives
    Info {
        /// Print the archive registry as JSON
        #[arg(long)]
        json: bool,
    },
    /// Pack a directory into a bundle
    Pack {
        /// The directory to pack. Entry paths are relative to it.
        input_dir: String,

        /// The bundle file to create
        #[arg(short, long)]
        output: String,

        /// Compression for every entry
        #[arg(long, value_enum, default_value = "zstd")]
        compression: PackCompression,
    },
    /// List the entries of a bundle
    List {
        /// The path to the bundle file
        file_path: String,
    },
}

fn parse_args() -> Args {
    // Configure colored/styled help output
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default())
        .placeholder(AnsiColor::Blue.on_default());

    let matches = Args::command()
        .styles(styles)
        .color(ColorChoice::Auto)
        .get_matches();

    Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
}

fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "strata=info,strata_resolver=info,warn",
        _ => "strata=debug,strata_resolver=debug,info",
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let args = parse_args();
    init_logging(args.verbose);

    let config = args.config;
    match args.command {
        Commands::Locate {
            name,
            no_type_path,
            extension,
        } => locate_asset(LocateAssetArgs {
            config,
            name,
            include_type_path: !no_type_path,
            include_extension: extension,
            require: false,
        }),
        Commands::Exists {
            name,
            no_type_path,
            extension,
        } => locate_asset(LocateAssetArgs {
            config,
            name,
            include_type_path: !no_type_path,
            include_extension: extension,
            require: true,
        }),
        Commands::Cat { name, kind, output } => cat_asset(CatAssetArgs {
            config,
            name,
            kind,
            output,
        }),
        Commands::Clips { folder } => list_clips(ListClipsArgs { config, folder }),
        Commands::Info { json } => info_stack(InfoStackArgs { config, json }),
        Commands::Pack {
            input_dir,
            output,
            compression,
        } => pack_bundle(PackBundleArgs {
            input_dir,
            output,
            compression,
        }),
        Commands::List { file_path } => list_bundle(ListBundleArgs { file_path }),
    }
}
