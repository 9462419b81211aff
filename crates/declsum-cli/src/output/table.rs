use declsum_core::model::{CombinedTable, COLUMNS};
use declsum_core::ProcessOutcome;

pub fn print(outcome: &ProcessOutcome, summary: bool) {
    match &outcome.table {
        Some(table) if summary => print_totals(table),
        Some(table) => print_rows(table),
        None => println!("No valid table data found.\n"),
    }

    if !outcome.no_table_files.is_empty() {
        println!("Files without a declaration table:");
        for name in &outcome.no_table_files {
            println!("  {name}");
        }
        println!();
    }

    for w in &outcome.warnings {
        eprintln!("warning: {}", w.message);
    }
}

fn print_rows(table: &CombinedTable) {
    let cells: Vec<[String; 5]> = table
        .rows
        .iter()
        .map(|r| {
            [
                fmt_opt(r.sequence_no),
                fmt_opt(r.quantity),
                fmt_opt(r.total_value),
                fmt_opt(r.cumulative_quantity),
                fmt_opt(r.cumulative_total_value),
            ]
        })
        .collect();
    print_grid(&COLUMNS, &cells);
    println!("\n  {} row(s)\n", table.len());
}

fn print_totals(table: &CombinedTable) {
    let headers = [COLUMNS[0], COLUMNS[3], COLUMNS[4], "行数"];
    let cells: Vec<[String; 4]> = table
        .group_totals()
        .iter()
        .map(|t| {
            [
                fmt_opt(t.sequence_no),
                fmt_opt(t.cumulative_quantity),
                fmt_opt(t.cumulative_total_value),
                t.rows.to_string(),
            ]
        })
        .collect();
    print_grid(&headers, &cells);
    println!("\n  {} item(s)\n", cells.len());
}

fn print_grid<const N: usize>(headers: &[&str; N], rows: &[[String; N]]) {
    let mut widths = [0_usize; N];
    for (i, h) in headers.iter().enumerate() {
        widths[i] = display_width(h);
    }
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(display_width(cell));
        }
    }

    let header_line: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| pad(h, widths[i]))
        .collect();
    println!("  {}", header_line.join("  "));
    println!("  {}", "-".repeat(widths.iter().sum::<usize>() + 2 * (N - 1)));

    for row in rows {
        let line: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, c)| pad(c, widths[i]))
            .collect();
        println!("  {}", line.join("  "));
    }
}

fn fmt_opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Terminal column width, counting CJK characters as two columns.
fn display_width(s: &str) -> usize {
    s.chars()
        .map(|c| if c.len_utf8() > 1 { 2 } else { 1 })
        .sum()
}

fn pad(s: &str, width: usize) -> String {
    let fill = width.saturating_sub(display_width(s));
    format!("{s}{}", " ".repeat(fill))
}
