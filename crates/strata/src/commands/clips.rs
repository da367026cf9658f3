use colored::Colorize;
use miette::Result;
use strata_resolver::AssetKind;

use crate::errors::CliError;
use crate::println_pad;
use crate::utils::config::build_resolver;

pub struct ListClipsArgs {
    pub config: Option<String>,
    pub folder: String,
}

pub fn list_clips(args: ListClipsArgs) -> Result<()> {
    let resolver = build_resolver(args.config.as_deref())?;

    let clips = resolver
        .resolve_all(&args.folder, AssetKind::AnimationClip)
        .ok_or_else(|| CliError::UnknownClipFolder {
            folder: args.folder.clone(),
        })?;

    println_pad!(
        "{} {} {}",
        "🎞️  Clips in".bright_blue().bold(),
        args.folder.bright_cyan().bold(),
        format!("({})", clips.len()).dimmed()
    );
    for clip in &clips {
        let model = resolver.model_of(&clip.name).unwrap_or("?");
        println_pad!(
            "   {} {} {}",
            "•".bright_cyan(),
            clip.name.bright_white().bold(),
            format!(
                "({:.2}s @ {} fps, {} curves, model {})",
                clip.length,
                clip.frame_rate,
                clip.curves.len(),
                model
            )
            .dimmed()
        );
    }

    Ok(())
}
