//! CLI output formatting utilities.
//!
//! Human-readable rendering of engine results. Errors themselves are printed
//! by `main`.

use colored::Colorize;

use crate::wallpaper::{DeriveOutcome, SetReport};

/// Formats a boolean as a colored check mark.
#[must_use]
pub fn format_bool(value: bool) -> String {
    if value { "✓".green().to_string() } else { "✗".red().to_string() }
}

/// Prints the summary of a successful set.
///
/// The applied path goes to stdout. Partial failures go to stderr so scripts
/// reading the path are not disturbed.
pub fn print_set_report(report: &SetReport) {
    println!("{}", report.wallpaper.display());

    match &report.palette {
        Ok(0) => {}
        Ok(failed) => eprintln!(
            "{} {failed} theme reload(s) failed",
            format_bool(false)
        ),
        Err(err) => eprintln!("{} palette: {err}", format_bool(false)),
    }

    for effect in &report.effects {
        match &effect.outcome {
            Ok(DeriveOutcome::Generated(path)) => tracing::debug!(
                effect = effect.effect.name(),
                path = %path.display(),
                "effect generated"
            ),
            Ok(DeriveOutcome::Cached(_)) => {}
            Err(err) => eprintln!("{} {}: {err}", format_bool(false), effect.effect.name()),
        }
    }
}

/// Prints one line of `fill-cache` progress.
pub fn print_progress(position: usize, total: usize, report: &SetReport) {
    let generated = report.generated_count();
    let marker = format_bool(report.is_clean());
    let counter = format!("[{position}/{total}]").dimmed();
    println!(
        "{marker} {counter} {} ({generated} generated)",
        report.wallpaper.display()
    );
}
