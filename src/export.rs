use crate::roster::{RosterError, RosterStore};
use anyhow::{anyhow, Context};
use rust_xlsxwriter::{Format, Workbook};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::path::{Component, Path, PathBuf};

pub const SHEET_NAME: &str = "Marksheet";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Int(i64),
    Number(f64),
}

impl Cell {
    fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Text(_) => None,
            Cell::Int(v) => Some(*v as f64),
            Cell::Number(v) => Some(*v),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub file_name: String,
    pub row_count: usize,
    pub column_count: usize,
    pub bytes: usize,
    pub sha256: String,
    pub exported_at: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error(transparent)]
    Rejected(#[from] RosterError),
    #[error(transparent)]
    Failed(#[from] anyhow::Error),
}

pub fn validate(store: &RosterStore) -> Result<(), RosterError> {
    if store.title().trim().is_empty() || store.students().is_empty() {
        return Err(RosterError::Validation(
            "enter a title and at least one student".to_string(),
        ));
    }
    Ok(())
}

fn is_unsafe_file_char(c: char) -> bool {
    c.is_control() || matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|')
}

/// Each whitespace run becomes one `_`, ends included, so ` Midterm  2025`
/// becomes `_Midterm_2025.xlsx`. Path separators and other characters not
/// allowed in file names also become `_`.
pub fn file_name(title: &str) -> String {
    let mut stem = String::with_capacity(title.len());
    let mut in_space = false;
    for c in title.chars() {
        if c.is_whitespace() {
            if !in_space {
                stem.push('_');
            }
            in_space = true;
            continue;
        }
        in_space = false;
        stem.push(if is_unsafe_file_char(c) { '_' } else { c });
    }
    format!("{}.xlsx", stem)
}

/// Joins `name` onto `out_dir`, refusing anything but a plain file name.
fn output_path(out_dir: &Path, name: &str) -> anyhow::Result<PathBuf> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(out_dir.join(name)),
        _ => Err(anyhow!("export file name is not a plain file name: {}", name)),
    }
}

pub fn build_table(store: &RosterStore) -> ExportTable {
    let criteria = store.criteria_columns();
    let rows = store
        .students()
        .iter()
        .map(|s| {
            let mut row = Vec::with_capacity(criteria.len() + 5);
            row.push(Cell::Text(s.display_name.clone()));
            row.push(Cell::Text(s.external_id.clone()));
            row.push(Cell::Text(s.section.clone()));
            row.extend(criteria.iter().map(|c| Cell::Int(s.mark(c))));
            row.push(Cell::Int(s.total));
            row.push(Cell::Number(s.grade_point));
            row
        })
        .collect();

    ExportTable {
        columns: store.display_columns(),
        rows,
    }
}

pub fn render_xlsx(table: &ExportTable) -> anyhow::Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header_fmt = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet
        .set_name(SHEET_NAME)
        .context("failed to name worksheet")?;

    for (c, name) in table.columns.iter().enumerate() {
        let col = u16::try_from(c).context("too many columns for a worksheet")?;
        sheet
            .write_string_with_format(0, col, name, &header_fmt)
            .context("failed to write header")?;
    }

    for (r, row) in table.rows.iter().enumerate() {
        let row_num = u32::try_from(r + 1).context("too many rows for a worksheet")?;
        for (c, cell) in row.iter().enumerate() {
            let col = u16::try_from(c).context("too many columns for a worksheet")?;
            match cell {
                Cell::Text(s) => {
                    sheet
                        .write_string(row_num, col, s)
                        .context("failed to write text cell")?;
                }
                _ => {
                    let v = cell.as_f64().unwrap_or(0.0);
                    sheet
                        .write_number(row_num, col, v)
                        .context("failed to write number cell")?;
                }
            }
        }
    }

    sheet
        .set_freeze_panes(1, 0)
        .context("failed to freeze header row")?;

    workbook
        .save_to_buffer()
        .context("failed to serialize workbook")
}

pub fn export_to_dir(store: &RosterStore, out_dir: &Path) -> Result<ExportSummary, ExportError> {
    validate(store)?;

    let table = build_table(store);
    let bytes = render_xlsx(&table)?;

    let name = file_name(store.title());
    let path = output_path(out_dir, &name)?;
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create directory {}", out_dir.to_string_lossy()))?;
    std::fs::write(&path, &bytes)
        .with_context(|| format!("failed to write {}", path.to_string_lossy()))?;

    let sha256 = format!("{:x}", Sha256::digest(&bytes));
    tracing::info!(
        path = %path.display(),
        rows = table.rows.len(),
        bytes = bytes.len(),
        "exported marksheet"
    );

    Ok(ExportSummary {
        path,
        file_name: name,
        row_count: table.rows.len(),
        column_count: table.columns.len(),
        bytes: bytes.len(),
        sha256,
        exported_at: chrono::Utc::now().to_rfc3339(),
    })
}
