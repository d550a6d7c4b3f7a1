use crate::models::{ProviderResult, UsageSnapshot};

const BAR_WIDTH: usize = 28;
const STATUS_DELIMITER: &str = " | ";

/// Multi-line report, one line per provider. Pure string building; the
/// caller prints it.
pub fn full_report(results: &[ProviderResult]) -> String {
    let name_width = results
        .iter()
        .map(|r| r.provider.display_name().len())
        .max()
        .unwrap_or(0);

    results
        .iter()
        .map(|result| {
            let name = result.provider.display_name();
            match &result.outcome {
                Ok(snapshot) => format!("{name:<name_width$}  {}", usage_line(snapshot)),
                Err(err) => format!("{name:<name_width$}  unavailable: {}", err.short_reason()),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Single-line status for embedding in tmux or a bar. Failed providers keep
/// their slot as `<label> --` so the line shape stays stable; the output
/// never contains a newline.
pub fn status_line(results: &[ProviderResult]) -> String {
    results
        .iter()
        .map(|result| match &result.outcome {
            Ok(snapshot) => format!(
                "{} {}%",
                result.provider.label(),
                snapshot.used_percent().round() as i64
            ),
            Err(_) => format!("{} --", result.provider.label()),
        })
        .collect::<Vec<_>>()
        .join(STATUS_DELIMITER)
}

fn usage_line(snapshot: &UsageSnapshot) -> String {
    let percent = snapshot.used_percent();
    format!(
        "{}  {:>3}% used  {:.0}/{:.0}{} ({}), {:.0} remaining",
        bar(percent),
        percent.round() as i64,
        snapshot.used,
        snapshot.limit,
        snapshot.unit.suffix(),
        snapshot.period,
        snapshot.remaining(),
    )
}

fn bar(percent: f64) -> String {
    let filled = ((BAR_WIDTH as f64 * percent / 100.0).round() as usize).min(BAR_WIDTH);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}
