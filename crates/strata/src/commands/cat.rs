use std::str::FromStr;

use camino::Utf8Path;
use colored::Colorize;
use miette::{IntoDiagnostic, Result};
use strata_resolver::decode::Texture;
use strata_resolver::{Asset, AssetKind, Origin};

use crate::errors::CliError;
use crate::println_pad;
use crate::utils::config::build_resolver;
use crate::utils::format_size;

pub struct CatAssetArgs {
    pub config: Option<String>,
    pub name: String,
    pub kind: String,
    pub output: Option<String>,
}

pub fn cat_asset(args: CatAssetArgs) -> Result<()> {
    let kind = AssetKind::from_str(&args.kind).map_err(|_| CliError::UnknownAssetKind {
        kind: args.kind.clone(),
    })?;
    let resolver = build_resolver(args.config.as_deref())?;

    let resolved = resolver
        .resolve(&args.name, kind)
        .map_err(|_| CliError::asset_not_found(&args.name))?;

    if let Some(output) = &args.output {
        let bytes = match &resolved.asset {
            Asset::Text(text) => text.as_bytes().to_vec(),
            Asset::Bytes(bytes) => bytes.clone(),
            Asset::Texture(texture) => texture.data.clone(),
            _ => {
                return Err(miette::miette!(
                    "{} assets cannot be written to a file, use text, bytes or texture",
                    kind
                ))
            }
        };
        let output = Utf8Path::new(output);
        if let Some(parent) = output.parent().filter(|parent| !parent.as_str().is_empty()) {
            std::fs::create_dir_all(parent).into_diagnostic()?;
        }
        std::fs::write(output, &bytes).into_diagnostic()?;

        println_pad!(
            "{} {} {}",
            "✅ Wrote".bright_green().bold(),
            output.as_str().bright_white().bold(),
            format!("({})", format_size(bytes.len() as u64)).dimmed()
        );
        return Ok(());
    }

    // Plain text goes to stdout untouched so it can be piped.
    if let Asset::Text(text) = &resolved.asset {
        print!("{}", text);
        return Ok(());
    }

    println_pad!(
        "{} {} {}",
        "🔎 Resolved:".bright_blue().bold(),
        args.name.bright_cyan().bold(),
        format!("as {}", kind).dimmed()
    );
    println_pad!("{} {}", "📍 Origin:".bright_green(), describe_origin(&resolved.origin));

    match &resolved.asset {
        Asset::Text(_) => {}
        Asset::Bytes(bytes) => println_pad!("{} {}", "📏 Size:".bright_yellow(), format_size(bytes.len() as u64)),
        Asset::Texture(texture) => print_texture(texture),
        Asset::Sprite(sprite) => {
            println_pad!(
                "{} {} {}",
                "🖼️  Sprite:".bright_yellow(),
                sprite.name.bright_white().bold(),
                format!("{}x{}", sprite.rect.width, sprite.rect.height).dimmed()
            );
            if let Some(texture) = &sprite.texture {
                print_texture(texture);
            }
        }
        Asset::AnimationClip(clip) => println_pad!(
            "{} {} {}",
            "🎞️  Clip:".bright_yellow(),
            clip.name.bright_white().bold(),
            format!("({:.2}s @ {} fps, {} curves)", clip.length, clip.frame_rate, clip.curves.len()).dimmed()
        ),
        Asset::SpriteAtlas(atlas) => {
            println_pad!(
                "{} {} {}",
                "🗺️  Atlas:".bright_yellow(),
                atlas.name.bright_white().bold(),
                format!("({} sprites)", atlas.sprites.len()).dimmed()
            );
            for sprite in &atlas.sprites {
                println_pad!(
                    "   {} {} {}",
                    "•".bright_cyan(),
                    sprite.name.bright_white(),
                    format!(
                        "{},{} {}x{}",
                        sprite.rect.x, sprite.rect.y, sprite.rect.width, sprite.rect.height
                    )
                    .dimmed()
                );
            }
        }
        Asset::Native(object) => println_pad!(
            "{} {} {}",
            "🧩 Native object:".bright_yellow(),
            object.name.bright_white().bold(),
            format!("({})", object.kind).dimmed()
        ),
    }

    if !resolved.sidecar.is_empty() {
        println_pad!("\n{}", "📝 Sidecar:".bright_magenta().bold());
        for line in &resolved.sidecar {
            println_pad!("   {}", line);
        }
    }

    Ok(())
}

fn print_texture(texture: &Texture) {
    let mut details = format!("{}x{} {}", texture.width, texture.height, texture.format);
    if texture.mip_chain {
        details.push_str(", mipmapped");
    }
    if texture.is_placeholder() {
        details.push_str(", placeholder");
    }
    println_pad!("{} {}", "🖼️  Texture:".bright_yellow(), details.bright_white());
    println_pad!(
        "{}",
        format!(
            "aniso {}, filter {}, wrap {}, mip bias {}",
            texture.sampler.aniso_level,
            texture.sampler.filter_mode,
            texture.sampler.wrap_mode,
            texture.sampler.mip_map_bias
        )
        .dimmed()
    );
}

fn describe_origin(origin: &Origin) -> String {
    match origin {
        Origin::Loose { path, .. } => format!("loose file {}", path),
        Origin::WorkingDir { path } => format!("working directory file {}", path),
        Origin::Archive { root, archive_id } => format!("archive '{}' in {}", archive_id, root),
        Origin::Embedded => "embedded table".to_string(),
        Origin::Container => "packaged container".to_string(),
    }
}
