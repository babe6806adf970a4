use clap::Parser;
use uitree_inspect::cli::commands::{
    ViewportSource, build_recognizer, cmd_diff, cmd_match_ocr, cmd_visibility,
};
use uitree_inspect::cli::config::{
    Cli, Commands, build_diff_options, build_match_options, build_visibility_options, load_config,
};
use uitree_inspect::cli::logging::init_tracing;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = load_config(cli.config.as_deref());

    match cli.command {
        Commands::Visibility {
            snapshot,
            viewport,
            width,
            height,
            status_bar_offset,
            full_threshold,
            format,
            output,
        } => {
            let options = build_visibility_options(&config.visibility, full_threshold);
            let source = ViewportSource::from_args(viewport.as_deref(), width, height);
            let offset = status_bar_offset.unwrap_or(config.visibility.status_bar_offset);
            cmd_visibility(&snapshot, source, offset, &options, &format, output.as_deref())?;
        }
        Commands::Diff {
            before,
            after,
            max_distance,
            format,
            output,
        } => {
            let options = build_diff_options(&config.diff, max_distance);
            cmd_diff(&before, &after, &options, &format, output.as_deref())?;
        }
        Commands::MatchOcr {
            snapshot,
            ocr,
            endpoint,
            image,
            status_bar_offset,
            min_overlap,
            min_confidence,
            include_unmatched,
            format,
            output,
        } => {
            // Resolve OCR service: CLI > config
            let endpoint = endpoint.as_deref().or(config.ocr.endpoint.as_deref());
            let recognizer = build_recognizer(ocr.as_deref(), endpoint)?;
            let options =
                build_match_options(&config.ocr, min_overlap, min_confidence, include_unmatched);
            let offset = status_bar_offset.unwrap_or(config.visibility.status_bar_offset);
            cmd_match_ocr(
                &snapshot,
                recognizer.as_ref(),
                image.as_deref(),
                offset,
                &options,
                &format,
                output.as_deref(),
            )?;
        }
    }

    Ok(())
}
