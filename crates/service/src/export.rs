//! Product catalogue export to XLSX for the back office.

use std::collections::HashMap;
use std::io::Cursor;

use uuid::Uuid;

use models::{category, product};

use crate::errors::ServiceError;

pub const HEADERS: [&str; 8] = ["Name", "Slug", "Category", "Price", "Stock", "Featured", "Active", "Created At"];

const COLUMNS: [&str; 8] = ["A", "B", "C", "D", "E", "F", "G", "H"];
const SHEET: &str = "Sheet1";

fn yes_no(v: bool) -> &'static str { if v { "Yes" } else { "No" } }

/// One header row, then one row per product in the given order.
///
/// Blocking: call from `spawn_blocking` inside async code.
pub fn export_products_xlsx(products: &[product::Model], categories: &[category::Model]) -> Result<Vec<u8>, ServiceError> {
    let names: HashMap<Uuid, &str> = categories.iter().map(|c| (c.id, c.name.as_str())).collect();

    let mut book = umya_spreadsheet::new_file();
    let sheet = book
        .get_sheet_by_name_mut(SHEET)
        .ok_or_else(|| ServiceError::Export("default worksheet missing".into()))?;

    for (col, header) in COLUMNS.iter().zip(HEADERS) {
        sheet.get_cell_mut(format!("{col}1").as_str()).set_value(header);
    }
    for (idx, p) in products.iter().enumerate() {
        let row = idx + 2;
        let category = p.category_id.and_then(|id| names.get(&id).copied()).unwrap_or("");
        sheet.get_cell_mut(format!("A{row}").as_str()).set_value(p.name.clone());
        sheet.get_cell_mut(format!("B{row}").as_str()).set_value(p.slug.clone());
        sheet.get_cell_mut(format!("C{row}").as_str()).set_value(category);
        sheet.get_cell_mut(format!("D{row}").as_str()).set_value_number(p.price as f64);
        sheet.get_cell_mut(format!("E{row}").as_str()).set_value_number(f64::from(p.stock));
        sheet.get_cell_mut(format!("F{row}").as_str()).set_value(yes_no(p.is_featured));
        sheet.get_cell_mut(format!("G{row}").as_str()).set_value(yes_no(p.is_active));
        sheet
            .get_cell_mut(format!("H{row}").as_str())
            .set_value(p.created_at.format("%Y-%m-%d %H:%M").to_string());
    }

    let mut out = Cursor::new(Vec::new());
    umya_spreadsheet::writer::xlsx::write_writer(&book, &mut out).map_err(|e| ServiceError::Export(e.to_string()))?;
    Ok(out.into_inner())
}
