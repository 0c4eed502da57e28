use crate::error::Result;
use crate::pivot::PivotedStatement;
use log::debug;
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError};
use std::path::Path;

// Merged company title sits in Excel row 3, column headers in row 6, data
// below.
const TITLE_ROW: u32 = 2;
const HEADER_ROW: u32 = 5;
const ACCOUNT_COLUMN_WIDTH: f64 = 50.0;
const AMOUNT_COLUMN_WIDTH: f64 = 15.0;

/// Writes one workbook with a "DRE" and a "DFC" sheet.
///
/// The workbook is assembled fully in memory and saved in a single step, so a
/// failure anywhere leaves no partial file behind.
pub fn write_statements(
    path: &Path,
    company_name: &str,
    dre: &PivotedStatement,
    dfc: &PivotedStatement,
) -> Result<()> {
    let mut workbook = Workbook::new();
    write_sheet(workbook.add_worksheet(), company_name, dre)?;
    write_sheet(workbook.add_worksheet(), company_name, dfc)?;
    workbook.save(path)?;

    debug!("Wrote statements for {company_name} to {}", path.display());
    Ok(())
}

fn write_sheet(
    sheet: &mut Worksheet,
    company_name: &str,
    statement: &PivotedStatement,
) -> std::result::Result<(), XlsxError> {
    sheet.set_name(statement.kind.sheet_name())?;

    let title_format = Format::new()
        .set_font_name("Calibri")
        .set_font_size(12)
        .set_bold()
        .set_align(FormatAlign::Left)
        .set_align(FormatAlign::VerticalCenter);
    let header_format = Format::new()
        .set_font_name("Calibri")
        .set_font_size(11)
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(0x4472C4))
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_border(FormatBorder::Thin);
    let account_format = Format::new()
        .set_font_name("Calibri")
        .set_font_size(10)
        .set_border(FormatBorder::Thin);
    let amount_format = Format::new()
        .set_font_name("Calibri")
        .set_font_size(10)
        .set_num_format("#,##0.00")
        .set_border(FormatBorder::Thin);

    // Account column + one column per present month + Total.
    let last_column = (statement.months.len() + 1) as u16;

    sheet.merge_range(
        TITLE_ROW,
        0,
        TITLE_ROW,
        last_column,
        &format!("Nome da Empresa: {company_name}"),
        &title_format,
    )?;

    sheet.write_string_with_format(HEADER_ROW, 0, "Plano de Contas", &header_format)?;
    for (index, label) in statement.month_labels().iter().enumerate() {
        sheet.write_string_with_format(HEADER_ROW, index as u16 + 1, *label, &header_format)?;
    }
    sheet.write_string_with_format(HEADER_ROW, last_column, "Total", &header_format)?;

    for (row_index, row) in statement.rows.iter().enumerate() {
        let sheet_row = HEADER_ROW + 1 + row_index as u32;
        sheet.write_string_with_format(sheet_row, 0, &row.account, &account_format)?;
        for (column_index, value) in row.values.iter().enumerate() {
            sheet.write_number_with_format(
                sheet_row,
                column_index as u16 + 1,
                value.to_f64().unwrap_or(0.0),
                &amount_format,
            )?;
        }
        sheet.write_number_with_format(
            sheet_row,
            last_column,
            row.total.to_f64().unwrap_or(0.0),
            &amount_format,
        )?;
    }

    sheet.set_column_width(0, ACCOUNT_COLUMN_WIDTH)?;
    for column in 1..=last_column {
        sheet.set_column_width(column, AMOUNT_COLUMN_WIDTH)?;
    }

    Ok(())
}
