use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use ecds_cli::types::DeriveResult;
use ecds_reference::VerifySummary;
use ecds_transform::StageReport;

pub fn print_summary(result: &DeriveResult) {
    println!("Input: {}", result.input.display());
    println!("Output: {}", result.output.display());
    println!(
        "Reference release: {}",
        result.reference_release.as_deref().unwrap_or("unpinned")
    );
    if let Some(path) = &result.report_path {
        println!("Report: {}", path.display());
    }
    println!("{}", summary_table(result));
    if !result.report.skipped.is_empty() {
        let skipped: Vec<String> = result
            .report
            .skipped
            .iter()
            .map(ToString::to_string)
            .collect();
        println!("Skipped: {}", skipped.join(", "));
    }
}

pub fn summary_table(result: &DeriveResult) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Stage"),
        header_cell("Kind"),
        header_cell("Column"),
        header_cell("Mapped"),
        header_cell("Unmapped"),
        header_cell("Null in"),
        header_cell("Null out"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 3..=6 {
        align_column(&mut table, index, CellAlignment::Right);
    }

    let mut totals = [0usize; 4];
    for stage in &result.report.stages {
        for row in stage_rows(stage, &mut totals) {
            table.add_row(row);
        }
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!("{} rows", result.report.rows))
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(totals[0]).add_attribute(Attribute::Bold),
        count_cell(totals[1], Color::Yellow).add_attribute(Attribute::Bold),
        Cell::new(totals[2]).add_attribute(Attribute::Bold),
        Cell::new(totals[3]).add_attribute(Attribute::Bold),
    ]);
    table
}

fn stage_rows(stage: &StageReport, totals: &mut [usize; 4]) -> Vec<Vec<Cell>> {
    if stage.columns.is_empty() {
        return vec![vec![
            stage_cell(&stage.stage.to_string()),
            Cell::new(&stage.kind),
            dim_cell("no columns"),
            dim_cell("-"),
            dim_cell("-"),
            dim_cell("-"),
            dim_cell("-"),
        ]];
    }
    stage
        .columns
        .iter()
        .enumerate()
        .map(|(index, column)| {
            totals[0] += column.mapped;
            totals[1] += column.unmapped;
            totals[2] += column.missing_input;
            totals[3] += column.null_output;
            let (stage_label, kind_label) = if index == 0 {
                (stage_cell(&stage.stage.to_string()), Cell::new(&stage.kind))
            } else {
                (dim_cell(""), dim_cell(""))
            };
            vec![
                stage_label,
                kind_label,
                Cell::new(&column.target),
                Cell::new(column.mapped),
                count_cell(column.unmapped, Color::Yellow),
                Cell::new(column.missing_input),
                Cell::new(column.null_output),
            ]
        })
        .collect()
}

pub fn print_verify_summary(summary: &VerifySummary) {
    println!("Reference directory: {}", summary.reference_dir.display());
    println!(
        "Release: {}",
        summary.release.as_deref().unwrap_or("unpinned")
    );
    println!("Files: {} (all checksums match)", summary.file_count);

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Role"),
        header_cell("File"),
        header_cell("Entries"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for entry in &summary.tables {
        table.add_row(vec![
            Cell::new(&entry.role)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(&entry.path),
            Cell::new(entry.entries),
        ]);
    }
    println!("{table}");
    println!(
        "ACSC: {} codes in {} categories; age bins: {}",
        summary.acsc_code_count, summary.acsc_category_count, summary.age_bin_count
    );
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
}

pub fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

pub fn stage_cell(stage: &str) -> Cell {
    Cell::new(stage)
        .fg(Color::Blue)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

pub fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
