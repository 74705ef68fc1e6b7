//! Formatted terminal output.
//!
//! Formatting stays here so the curve core never deals with presentation.

use crate::domain::{Dashboard, SummaryMetric};

/// Full dashboard: header, curve table, summary table.
pub fn format_dashboard(dashboard: &Dashboard) -> String {
    let mut out = String::new();

    out.push_str("=== gc - Government Yield Curve (Banxico) ===\n");
    out.push_str(&format!("As-of: {}\n", dashboard.anchor_date));
    out.push_str(&format!("Points: n={}\n\n", dashboard.curve.len()));

    out.push_str("Curve:\n");
    out.push_str(&format_curve_table(dashboard));
    out.push('\n');

    out.push_str("Summary:\n");
    out.push_str(&format_summary_table(dashboard.summary.values()));

    out
}

fn format_curve_table(dashboard: &Dashboard) -> String {
    let mut out = String::new();
    push_row(
        &mut out,
        format!("{:<14} {:>10} {:>10} {:>8} {:>12}", "label", "date", "yield", "dtm", "price"),
    );
    push_row(
        &mut out,
        format!("{:-<14} {:-<10} {:-<10} {:-<8} {:-<12}", "", "", "", "", ""),
    );

    for p in dashboard.curve.points() {
        push_row(
            &mut out,
            format!(
                "{:<14} {:>10} {:>10.6} {:>8} {:>12.6}",
                truncate(&p.label, 14),
                p.date,
                p.yield_,
                p.days_to_maturity,
                p.price
            ),
        );
    }

    out
}

fn format_summary_table<'a>(metrics: impl Iterator<Item = &'a SummaryMetric>) -> String {
    let mut out = String::new();
    push_row(&mut out, format!("{:<12} {:>14}  {}", "metric", "value", "date"));
    push_row(&mut out, format!("{:-<12} {:-<14}  {:-<10}", "", "", ""));

    for m in metrics {
        push_row(
            &mut out,
            format!("{:<12} {:>14.6}  {}", truncate(&m.name, 12), m.value, m.date),
        );
    }

    out
}

fn push_row(out: &mut String, row: String) {
    out.push_str(row.trim_end());
    out.push('\n');
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::domain::{CurveOutput, YieldCurvePoint};

    fn dashboard() -> Dashboard {
        let mut curve = CurveOutput::default();
        curve.push(YieldCurvePoint {
            label: "28D CETES".to_string(),
            date: "20/10/2025".to_string(),
            yield_: 7.4,
            days_to_maturity: 27,
            price: 9.944804,
        });
        let mut summary = BTreeMap::new();
        summary.insert(
            "Inflation".to_string(),
            SummaryMetric {
                name: "Inflation".to_string(),
                value: 3.76,
                date: "September 2024 - September 2025".to_string(),
            },
        );
        Dashboard {
            anchor_date: "20/10/2025".to_string(),
            curve,
            summary,
        }
    }

    #[test]
    fn dashboard_lists_points_and_metrics() {
        let text = format_dashboard(&dashboard());
        assert!(text.contains("As-of: 20/10/2025"));
        assert!(text.contains("28D CETES"));
        assert!(text.contains("7.400000"));
        assert!(text.contains("September 2024 - September 2025"));
        assert!(text.lines().all(|l| l == l.trim_end()));
    }

    #[test]
    fn truncate_marks_cut_labels() {
        assert_eq!(truncate("short", 14), "short");
        assert_eq!(truncate("abcdefgh", 4), "abc.");
    }
}
