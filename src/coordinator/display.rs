//! Rendering of a changelist as a plain-text table.

use crate::changelist::ChangeList;
use crate::store::ConfigStore;

const HEADERS: [&str; 4] = ["Collection", "Config", "Operation", "Directory"];

/// Render `changes` as a padded table with one row per name.
///
/// The Directory column lists the staged directories the object resolves to.
pub fn render_changes(changes: &ChangeList, staged: &dyn ConfigStore) -> String {
    let rows: Vec<[String; 4]> = changes
        .rows()
        .map(|(collection, op, name)| {
            let dirs: Vec<String> = staged
                .resolve_path(collection, name)
                .iter()
                .map(|d| d.display().to_string())
                .collect();
            [
                collection.to_string(),
                name.to_string(),
                op.to_string(),
                dirs.join(", "),
            ]
        })
        .collect();

    render_table(&rows)
}

fn render_table(rows: &[[String; 4]]) -> String {
    let mut widths = HEADERS.map(str::len);
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &HEADERS.map(String::from), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(rule.join("  ").as_str());
    out.push('\n');
    for row in rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String; 4], widths: &[usize; 4]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = width))
        .collect();
    out.push_str(padded.join("  ").trim_end());
    out.push('\n');
}
