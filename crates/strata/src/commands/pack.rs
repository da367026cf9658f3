use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Read, Write};

use camino::{Utf8Path, Utf8PathBuf};
use colored::Colorize;
use miette::{IntoDiagnostic, Result, WrapErr};
use strata_bundle::{BundleBuilder, BundleCompression, BundleEntryBuilder};
use tracing::debug;
use walkdir::WalkDir;

use crate::errors::CliError;
use crate::utils::format_size;

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum PackCompression {
    None,
    Zstd,
}

impl From<PackCompression> for BundleCompression {
    fn from(compression: PackCompression) -> Self {
        match compression {
            PackCompression::None => BundleCompression::None,
            PackCompression::Zstd => BundleCompression::Zstd,
        }
    }
}

#[derive(Debug)]
pub struct PackBundleArgs {
    pub input_dir: String,
    pub output: String,
    pub compression: PackCompression,
}

pub fn pack_bundle(args: PackBundleArgs) -> Result<()> {
    let input_dir = Utf8Path::new(&args.input_dir);
    if !input_dir.is_dir() {
        return Err(CliError::PackInputMissing {
            path: input_dir.to_path_buf(),
        }
        .into());
    }

    println!(
        "{} {}",
        "📦 Packing directory:".bright_blue().bold(),
        input_dir.as_str().bright_cyan().bold()
    );

    let files = collect_files(input_dir)?;
    let compression = BundleCompression::from(args.compression);

    let mut builder = BundleBuilder::default();
    let mut entry_files = HashMap::new();
    for (entry_path, file_path) in files {
        let entry = BundleEntryBuilder::new()
            .with_path(&entry_path)
            .with_compression(compression);
        debug!("Adding {} as {}", file_path, entry_path);
        entry_files.insert(entry.path_hash(), file_path);
        builder = builder.with_entry(entry);
    }
    let entry_count = builder.entries().len();

    let output = Utf8Path::new(&args.output);
    if let Some(parent) = output.parent().filter(|parent| !parent.as_str().is_empty()) {
        std::fs::create_dir_all(parent).into_diagnostic()?;
    }
    let mut writer = BufWriter::new(File::create(output).into_diagnostic()?);

    builder
        .build_to_writer(&mut writer, |entry, cursor| {
            let Some(file_path) = entry_files.get(&entry.path_hash()) else {
                return Err(std::io::Error::other(format!("no source file for {}", entry.path)).into());
            };

            let mut file = File::open(file_path)?;
            let mut buffer = Vec::new();
            file.read_to_end(&mut buffer)?;
            cursor.write_all(&buffer)?;

            Ok(())
        })
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to write bundle {}", output))?;
    writer.flush().into_diagnostic()?;
    drop(writer);

    let size = std::fs::metadata(output).map(|m| m.len()).unwrap_or_default();
    println!(
        "{} {} {}\n{} {}",
        "✅ Bundle created with".bright_green().bold(),
        entry_count.to_string().bright_white().bold(),
        "entries".bright_green().bold(),
        "📍 Path:".bright_green(),
        format!("{} ({})", output, format_size(size)).bright_white().bold()
    );

    Ok(())
}

/// Every regular file under `dir`, keyed by its `/`-separated path relative to `dir`.
fn collect_files(dir: &Utf8Path) -> Result<Vec<(String, Utf8PathBuf)>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir.as_std_path()).sort_by_file_name() {
        let entry = entry.into_diagnostic()?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = Utf8PathBuf::from_path_buf(entry.into_path())
            .map_err(|path| miette::miette!("Non UTF-8 path: {}", path.display()))?;
        let relative = path.strip_prefix(dir).into_diagnostic()?;
        let entry_path = relative
            .components()
            .map(|component| component.as_str())
            .collect::<Vec<_>>()
            .join("/");
        files.push((entry_path, path));
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collect_files_uses_forward_slashes() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8Path::from_path(dir.path()).unwrap();
        std::fs::create_dir_all(root.join("Assets/Resources/UI")).unwrap();
        std::fs::write(root.join("Assets/Resources/UI/Title.txt"), b"title").unwrap();
        std::fs::write(root.join("readme.md"), b"readme").unwrap();

        let files = collect_files(root).unwrap();
        let paths: Vec<&str> = files.iter().map(|(path, _)| path.as_str()).collect();
        assert_eq!(paths, vec!["Assets/Resources/UI/Title.txt", "readme.md"]);
    }

    #[test]
    fn pack_then_mount() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8Path::from_path(dir.path()).unwrap();
        let input = root.join("input");
        std::fs::create_dir_all(input.join("Assets/Resources/UI")).unwrap();
        std::fs::write(input.join("Assets/Resources/UI/Title.txt"), b"title").unwrap();
        let output = root.join("out/ui_linux.bundle");

        pack_bundle(PackBundleArgs {
            input_dir: input.to_string(),
            output: output.to_string(),
            compression: PackCompression::Zstd,
        })
        .unwrap();

        let file = File::open(&output).unwrap();
        let mut bundle = strata_bundle::Bundle::mount_from_reader(std::io::BufReader::new(file)).unwrap();
        assert_eq!(
            &*bundle.load_entry("Assets/Resources/UI/Title.txt").unwrap(),
            b"title"
        );
    }

    #[test]
    fn pack_missing_input_fails() {
        let result = pack_bundle(PackBundleArgs {
            input_dir: "/nonexistent/input".to_string(),
            output: "/nonexistent/out.bundle".to_string(),
            compression: PackCompression::None,
        });
        assert!(result.is_err());
    }
}
