use super::{complexity_score, round3};
use crate::analysis::Analysis;
use crate::error::{GindentError, Result};
use crate::model::{CommitRecord, FileRecord};
use rust_xlsxwriter::{Chart, ChartType, Format, Formula, Workbook, Worksheet};
use std::path::Path;
use tracing::debug;

const REVISIONS_SHOWN: usize = 5;
const NUMBER_FORMAT: &str = "#,##0.000";

struct Formats {
    header: Format,
    number: Format,
}

impl Formats {
    fn new() -> Self {
        Self {
            header: Format::new().set_bold(),
            number: Format::new().set_num_format(NUMBER_FORMAT),
        }
    }
}

/// Writes the workbook, replacing any file already at `path`.
pub fn write_report(path: &Path, analysis: &Analysis, show_deleted_files: bool) -> Result<()> {
    remove_existing(path)?;

    let formats = Formats::new();
    let mut workbook = Workbook::new();
    workbook.push_worksheet(commits_sheet(&analysis.commits, &formats)?);
    workbook.push_worksheet(files_sheet(&analysis.files, show_deleted_files, &formats)?);
    workbook.save(path)?;

    debug!("Wrote report to {}", path.display());
    Ok(())
}

fn remove_existing(path: &Path) -> Result<()> {
    if path.is_file() {
        std::fs::remove_file(path).map_err(|e| {
            GindentError::Io(std::io::Error::new(
                e.kind(),
                format!("The file {} cannot be removed. Already in use? {e}", path.display()),
            ))
        })?;
    }
    Ok(())
}

fn write_optional(sheet: &mut Worksheet, row: u32, col: u16, value: Option<f64>, format: &Format) -> Result<()> {
    match value {
        Some(v) => sheet.write_number_with_format(row, col, v, format)?,
        None => sheet.write_blank(row, col, format)?,
    };
    Ok(())
}

fn commits_sheet(commits: &[CommitRecord], formats: &Formats) -> Result<Worksheet> {
    let mut sheet = Worksheet::new();
    sheet.set_name("commits")?;

    let headers = [
        "Commit",
        "Date",
        "Code lines",
        "Avg indent",
        "Stddev indent",
        "Max indent",
        "Complexity",
    ];
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &formats.header)?;
    }

    let mut row: u32 = 1;
    for record in commits {
        let stats = &record.stats;
        let excel_row = row + 1;
        sheet.write_string(row, 0, record.commit.as_str())?;
        sheet.write_string(row, 1, record.date.as_str())?;
        sheet.write_number(row, 2, stats.count as f64)?;
        write_optional(&mut sheet, row, 3, stats.average, &formats.number)?;
        write_optional(&mut sheet, row, 4, stats.stddev, &formats.number)?;
        sheet.write_number_with_format(row, 5, stats.max_depth as f64, &formats.number)?;
        let formula = Formula::new(format!("=F{excel_row}+E{excel_row}*10+D{excel_row}*5"))
            .set_result(complexity_score(stats).to_string());
        sheet.write_formula_with_format(row, 6, formula, &formats.number)?;
        row += 1;
    }

    sheet.set_column_width(0, 50)?;
    sheet.set_column_width(1, 20)?;
    for col in 2..=6 {
        sheet.set_column_width(col, 12)?;
    }

    if !commits.is_empty() {
        let last_row = row - 1;
        let mut chart = Chart::new(ChartType::Line);
        chart
            .add_series()
            .set_name("Lines of code")
            .set_values(("commits", 1, 2, last_row, 2));
        chart
            .add_series()
            .set_name("Complexity")
            .set_values(("commits", 1, 6, last_row, 6))
            .set_secondary_axis(true);
        chart.x_axis().set_reverse();
        chart.y_axis().set_name("Lines of code");
        chart.y2_axis().set_name("Complexity");
        chart.set_width(960).set_height(576);
        sheet.insert_chart(1, 8, &chart)?;
    }

    Ok(sheet)
}

fn files_sheet(files: &[FileRecord], show_deleted_files: bool, formats: &Formats) -> Result<Worksheet> {
    let mut sheet = Worksheet::new();
    sheet.set_name("files")?;

    let revision_col = 2u16;
    let complexity_col = revision_col + REVISIONS_SHOWN as u16;
    let avg_col = complexity_col + REVISIONS_SHOWN as u16;
    let deleted_col = avg_col + 3;

    sheet.write_string_with_format(0, 0, "File", &formats.header)?;
    sheet.write_string_with_format(0, 1, "Revisions", &formats.header)?;
    sheet.write_string_with_format(0, revision_col, "Lines code last 5 revisions", &formats.header)?;
    sheet.write_string_with_format(0, complexity_col, "Complexity in last 5 revisions", &formats.header)?;
    sheet.write_string_with_format(0, avg_col, "Avg indent", &formats.header)?;
    sheet.write_string_with_format(0, avg_col + 1, "Stddev indent", &formats.header)?;
    sheet.write_string_with_format(0, avg_col + 2, "Max indent", &formats.header)?;
    if show_deleted_files {
        sheet.write_string_with_format(0, deleted_col, "Deleted", &formats.header)?;
    }

    let mut row: u32 = 1;
    for file in files.iter().filter(|f| show_deleted_files || !f.deleted) {
        sheet.write_string(row, 0, file.name.as_str())?;
        sheet.write_number(row, 1, file.commits as f64)?;
        if show_deleted_files && file.deleted {
            sheet.write_boolean(row, deleted_col, true)?;
        }

        if let Some(latest) = file.latest() {
            write_optional(&mut sheet, row, avg_col, latest.stats.average, &formats.number)?;
            write_optional(&mut sheet, row, avg_col + 1, latest.stats.stddev, &formats.number)?;
            sheet.write_number_with_format(row, avg_col + 2, latest.stats.max_depth as f64, &formats.number)?;
        }

        for (i, snapshot) in file.complexity.iter().take(REVISIONS_SHOWN).enumerate() {
            let i = i as u16;
            sheet.write_number(row, revision_col + i, snapshot.lines_code as f64)?;
            sheet.write_number(row, complexity_col + i, round3(complexity_score(&snapshot.stats)))?;
        }
        row += 1;
    }

    sheet.set_column_width(0, 50)?;
    for col in 1..=deleted_col {
        sheet.set_column_width(col, 10)?;
    }

    Ok(sheet)
}
