use crate::core::Measurement;

/// The value charted for a reading: the smaller of the two sides.
pub fn plot_value(left: f64, right: f64) -> f64 {
    if left <= right {
        left
    } else {
        right
    }
}

/// Horizontal text bar chart of plot values, one line per measurement.
pub fn render_bar_chart(rows: &[Measurement], width: usize) -> String {
    if rows.is_empty() {
        return "(no data)".to_string();
    }

    let label_width = rows.iter().map(|m| m.test.chars().count()).max().unwrap_or(0);
    let max_value = rows
        .iter()
        .map(|m| plot_value(m.left, m.right))
        .fold(0.0_f64, f64::max);

    let mut lines = Vec::with_capacity(rows.len());
    for m in rows {
        let value = plot_value(m.left, m.right);
        let bar_len = if max_value > 0.0 && value > 0.0 {
            ((value / max_value) * width as f64).round() as usize
        } else {
            0
        };
        lines.push(format!(
            "{:>label_width$} | {} {}",
            m.test,
            "#".repeat(bar_len),
            value,
            label_width = label_width
        ));
    }

    lines.join("\n")
}
