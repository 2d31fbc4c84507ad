//! Plain-text rendering of the dashboard view models.
//!
//! Every function returns a `String` so the commands decide where output
//! goes. Tier colors are applied only when `color` is set.

use wqd_core::config::DashboardConfig;
use wqd_core::tier::Tier;
use wqd_state::store::ViewState;
use wqd_state::view::{
    self, DetectionView, GaugeView, HistoryTableRow, KpiCardView, SensorIdRow, VerdictView,
    AWAITING_RESULT_TEXT, HISTORY_COLUMNS,
};
use wqd_utils::dates;

/// Output options shared by all renderers.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    pub color: bool,
    /// Append the history table to the dashboard
    pub table: bool,
}

fn tint(tier: Tier, text: &str, color: bool) -> String {
    if color {
        tier.paint(text)
    } else {
        text.to_string()
    }
}

/// The whole dashboard: header, verdict, cards, detection, sensor ids and
/// optionally the history table.
pub fn render_dashboard(state: &ViewState, config: &DashboardConfig, opts: RenderOptions) -> String {
    let offset = config.display_offset();
    let mut sections = Vec::new();

    let mut header = String::from("Water Quality Dashboard");
    if let Some(updated) = view::last_updated_text(state, &offset) {
        header.push('\n');
        header.push_str(&updated);
    }
    sections.push(header);

    if let Some(error) = state.error.as_deref() {
        sections.push(tint(Tier::Danger, &format!("Error: {}", error), opts.color));
    }

    match view::verdict(state) {
        Some(verdict) => sections.push(render_verdict(&verdict, opts.color)),
        None => sections.push(AWAITING_RESULT_TEXT.to_string()),
    }

    sections.push(render_cards(
        &view::kpi_cards(state, config.coliform_unit),
        opts.color,
    ));
    sections.push(render_gauge(&view::gauge(state), opts.color));

    if let Some(detection) = view::detection(state) {
        sections.push(render_detection(&detection));
    }

    let sensor_rows = view::sensor_id_rows(state);
    if !sensor_rows.is_empty() {
        sections.push(render_sensor_ids(&sensor_rows));
    }

    if opts.table {
        let rows = view::history_table(&state.rows, config.coliform_unit, &offset);
        sections.push(render_history(&rows, config, opts.color));
    }

    sections.join("\n\n")
}

pub fn render_verdict(verdict: &VerdictView, color: bool) -> String {
    let title = format!("{} {} ({})", verdict.tier.symbol(), verdict.title, verdict.label());
    let mut lines = vec![tint(verdict.tier, &title, color), verdict.subtitle.to_string()];
    if let Some(line) = &verdict.coliform_line {
        lines.push(line.clone());
    }
    lines.join("\n")
}

/// One card per line: `✓ Temperature      27.8 °C   [Normal]`.
pub fn render_cards(cards: &[KpiCardView], color: bool) -> String {
    let title_width = cards.iter().map(|c| c.title.chars().count()).max().unwrap_or(0);
    let value_width = cards
        .iter()
        .map(|c| c.value.chars().count() + 1 + c.unit.chars().count())
        .max()
        .unwrap_or(0);

    cards
        .iter()
        .map(|card| {
            let value = format!("{} {}", card.value, card.unit);
            let badge = format!("[{}]", card.badge.label);
            let line = format!(
                "{} {:<tw$}  {:<vw$}  {}",
                card.tier.symbol(),
                card.title,
                value.trim_end(),
                badge,
                tw = title_width,
                vw = value_width
            );
            tint(card.tier, line.trim_end(), color)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_gauge(gauge: &GaugeView, color: bool) -> String {
    const WIDTH: usize = 20;
    let filled = usize::from(gauge.value) * WIDTH / 100;
    let bar = format!("[{}{}]", "#".repeat(filled), "-".repeat(WIDTH - filled));
    let line = format!("Potability {} {:>3}% {}", bar, gauge.value, gauge.label);
    tint(gauge.tier, &line, color)
}

fn bullet_list(title: &str, items: &[String], empty: Option<&str>) -> Vec<String> {
    let mut lines = vec![format!("{}:", title)];
    if items.is_empty() {
        if let Some(text) = empty {
            lines.push(format!("  {}", text));
        }
    } else {
        lines.extend(items.iter().map(|item| format!("  - {}", item)));
    }
    lines
}

pub fn render_detection(detection: &DetectionView) -> String {
    let mut lines = bullet_list(
        "Reasons",
        &detection.reasons,
        detection.reasons_empty_text(),
    );
    lines.extend(bullet_list(
        "Recommendations",
        &detection.recommendations,
        detection.recommendations_empty_text(),
    ));
    if !detection.alternative_use.is_empty() {
        lines.extend(bullet_list("Alternative use", &detection.alternative_use, None));
    }
    lines.push(detection.disclaimer.clone());
    lines.join("\n")
}

pub fn render_sensor_ids(rows: &[SensorIdRow]) -> String {
    let width = rows.iter().map(|r| r.label.chars().count()).max().unwrap_or(0);
    let mut lines = vec!["Sensor IDs:".to_string()];
    lines.extend(
        rows.iter()
            .map(|row| format!("  {:<w$}  {}", row.label, row.id, w = width)),
    );
    lines.join("\n")
}

/// Fixed-width table with the same columns as the browser table.
pub fn render_history(rows: &[HistoryTableRow], config: &DashboardConfig, color: bool) -> String {
    if rows.is_empty() {
        return "History: no stored readings.".to_string();
    }

    let coliform_header = format!("Coliform ({})", config.coliform_unit.unit_label());
    let headers: Vec<&str> = HISTORY_COLUMNS
        .iter()
        .map(|h| if *h == "Coliform" { coliform_header.as_str() } else { *h })
        .collect();

    let cells: Vec<[&str; 9]> = rows
        .iter()
        .map(|row| {
            [
                row.timestamp.as_str(),
                row.temp_c.as_str(),
                row.do_mgl.as_str(),
                row.ph.as_str(),
                row.conductivity.as_str(),
                row.coliform.as_str(),
                row.predicted.as_str(),
                row.interval.as_str(),
                row.verdict_text(),
            ]
        })
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let join = |items: &[&str]| {
        items
            .iter()
            .zip(widths.iter())
            .map(|(item, w)| format!("{:<w$}", item, w = *w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let offset = config.display_offset();
    let mut lines = vec![
        format!("History ({} rows, times in {})", rows.len(), dates::format_offset(&offset)),
        join(&headers[..]),
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    ];
    for (row, cell) in rows.iter().zip(cells.iter()) {
        lines.push(tint(row.tier, &join(&cell[..]), color));
    }
    lines.join("\n")
}
