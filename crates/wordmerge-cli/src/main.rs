use std::io::{IsTerminal, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use wordmerge_assembly::{ProgressEvent, TitleStyle, merge_folder};
use wordmerge_core::config_file::load_config;

mod output;

use output::ColorMode;

/// Merge every .docx in a folder into one document, one titled section per file.
#[derive(Parser, Debug)]
#[command(name = "wordmerge", version, about, long_about = None)]
struct Cli {
    /// Folder containing the documents to merge
    input_folder: PathBuf,

    /// Merged document to create (overwritten if it exists)
    output_file: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("WORDMERGE_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config();

    let color = ColorMode(std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none());
    let name_width = config.name_width();
    let style = TitleStyle::from_config(&config.title());

    let mut stdout = std::io::stdout();
    let mut header_printed = false;

    let report = merge_folder(
        &cli.input_folder,
        &cli.output_file,
        &config.extension(),
        style,
        |event| {
            if let ProgressEvent::Processing { total, .. } = &event {
                if !header_printed {
                    let _ = output::print_header(&mut stdout, &cli.input_folder, *total, color);
                    header_printed = true;
                }
            }
            let _ = output::print_progress(&mut stdout, &event, name_width, color);
            let _ = stdout.flush();
        },
    )
    .with_context(|| {
        format!(
            "Failed to merge {} into {}",
            cli.input_folder.display(),
            cli.output_file.display()
        )
    })?;

    if !header_printed {
        output::print_header(&mut stdout, &cli.input_folder, report.total, color)?;
    }
    output::print_summary(&mut stdout, &report, color)?;
    Ok(())
}
