use std::io::Write;
use std::path::Path;

use owo_colors::OwoColorize;
use wordmerge_assembly::{MergeReport, ProgressEvent};

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Header printed once the input list is known.
pub fn print_header(
    w: &mut dyn Write,
    input: &Path,
    count: usize,
    color: ColorMode,
) -> std::io::Result<()> {
    let msg = format!("Found {} document(s) in {}", count, input.display());
    if color.enabled() {
        writeln!(w, "{}", msg.bold())?;
    } else {
        writeln!(w, "{}", msg)?;
    }
    writeln!(w)?;
    Ok(())
}

/// Print a real-time progress event.
///
/// `Processing` starts a line; the outcome event that follows finishes it.
pub fn print_progress(
    w: &mut dyn Write,
    event: &ProgressEvent,
    name_width: usize,
    color: ColorMode,
) -> std::io::Result<()> {
    match event {
        ProgressEvent::Processing { index, total, name } => {
            write!(
                w,
                "[{}/{}] Processing: {}... ",
                index,
                total,
                truncate_chars(name, name_width)
            )?;
        }
        ProgressEvent::Extracted { paragraphs, .. } => {
            let msg = format!("OK ({} paragraphs)", paragraphs);
            if color.enabled() {
                writeln!(w, "{}", msg.green())?;
            } else {
                writeln!(w, "{}", msg)?;
            }
        }
        ProgressEvent::Empty { .. } => {
            if color.enabled() {
                writeln!(w, "{}", "no content".yellow())?;
            } else {
                writeln!(w, "no content")?;
            }
        }
        ProgressEvent::Failed { message, .. } => {
            let msg = format!("ERROR: {}", message);
            if color.enabled() {
                writeln!(w, "{}", msg.red())?;
            } else {
                writeln!(w, "{}", msg)?;
            }
        }
    }
    Ok(())
}

/// Print the final merge summary.
pub fn print_summary(
    w: &mut dyn Write,
    report: &MergeReport,
    color: ColorMode,
) -> std::io::Result<()> {
    writeln!(w)?;
    let sep = "=".repeat(60);
    if color.enabled() {
        writeln!(w, "{}", sep.bold())?;
        writeln!(w, "{}", "SUMMARY".bold())?;
        writeln!(w, "{}", sep.bold())?;
    } else {
        writeln!(w, "{}", sep)?;
        writeln!(w, "SUMMARY")?;
        writeln!(w, "{}", sep)?;
    }

    if let Some(output) = &report.output {
        writeln!(w, "  Output: {}", output.display())?;
    }
    writeln!(w, "  Documents: {}", report.total)?;

    if color.enabled() {
        writeln!(w, "  {} {}", "Merged:".green(), report.success)?;
    } else {
        writeln!(w, "  Merged: {}", report.success)?;
    }
    if color.enabled() {
        writeln!(w, "  {} {}", "No content:".yellow(), report.empty)?;
        writeln!(w, "  {} {}", "Failed:".red(), report.failed)?;
    } else {
        writeln!(w, "  No content: {}", report.empty)?;
        writeln!(w, "  Failed: {}", report.failed)?;
    }
    Ok(())
}

/// First `max` characters of `s`.
fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn render(events: &[ProgressEvent], width: usize) -> String {
        let mut buf = Vec::new();
        for event in events {
            print_progress(&mut buf, event, width, ColorMode(false)).unwrap();
        }
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_progress_lines() {
        let out = render(
            &[
                ProgressEvent::Processing {
                    index: 1,
                    total: 3,
                    name: "a.docx".into(),
                },
                ProgressEvent::Extracted {
                    index: 1,
                    total: 3,
                    paragraphs: 4,
                    strategy: Some("package"),
                },
                ProgressEvent::Processing {
                    index: 2,
                    total: 3,
                    name: "b.docx".into(),
                },
                ProgressEvent::Empty { index: 2, total: 3 },
                ProgressEvent::Processing {
                    index: 3,
                    total: 3,
                    name: "c.docx".into(),
                },
                ProgressEvent::Failed {
                    index: 3,
                    total: 3,
                    message: "boom".into(),
                },
            ],
            50,
        );
        assert_eq!(
            out,
            "[1/3] Processing: a.docx... OK (4 paragraphs)\n\
             [2/3] Processing: b.docx... no content\n\
             [3/3] Processing: c.docx... ERROR: boom\n"
        );
    }

    #[test]
    fn test_long_names_truncated_by_chars() {
        let name = "文".repeat(60);
        let out = render(
            &[ProgressEvent::Processing {
                index: 1,
                total: 1,
                name,
            }],
            50,
        );
        assert_eq!(out, format!("[1/1] Processing: {}... ", "文".repeat(50)));
    }

    #[test]
    fn test_summary_plain() {
        let report = MergeReport {
            total: 3,
            success: 1,
            empty: 1,
            failed: 1,
            output: Some(PathBuf::from("out.docx")),
        };
        let mut buf = Vec::new();
        print_summary(&mut buf, &report, ColorMode(false)).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("  Output: out.docx\n"));
        assert!(out.contains("  Documents: 3\n"));
        assert!(out.contains("  Merged: 1\n"));
        assert!(out.contains("  No content: 1\n"));
        assert!(out.contains("  Failed: 1\n"));
    }

    #[test]
    fn test_summary_keeps_zero_counts() {
        let report = MergeReport {
            total: 2,
            success: 2,
            ..MergeReport::default()
        };
        let mut buf = Vec::new();
        print_summary(&mut buf, &report, ColorMode(false)).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("  Documents: 2\n"));
        assert!(out.contains("  Merged: 2\n"));
        assert!(out.contains("  No content: 0\n"));
        assert!(out.contains("  Failed: 0\n"));
        assert!(!out.contains("Output:"));
    }
}
