//! Renders a sheet's cell grid as a plain paginated PDF table.
//!
//! Pages are landscape A4. Each page carries the sheet title with a page
//! counter followed by as many rows as fit; columns are sized from the longest
//! cell text and clipped to [`MAX_CELL_CHARS`]. Columns that do not fit the
//! page width are split into bands, and every row chunk gets one page per
//! band, left band first.

use std::ops::Range;
use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};

use crate::error::Result;

const PAGE_WIDTH: i64 = 842;
const PAGE_HEIGHT: i64 = 595;
const MARGIN: i64 = 36;
const TITLE_SIZE: i64 = 12;
const BODY_SIZE: i64 = 8;
const LEADING: i64 = 11;
const CHAR_WIDTH: i64 = 5;
const COLUMN_GAP: i64 = 8;
const MIN_COLUMN_WIDTH: i64 = 24;
/// Longest cell text drawn before truncation.
pub const MAX_CELL_CHARS: usize = 40;

/// Writes `rows` as a PDF document titled `title` to `destination`.
pub fn render_sheet(title: &str, rows: &[Vec<String>], destination: &Path) -> Result<()> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let body_font = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let title_font = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => body_font,
            "F2" => title_font,
        },
    });

    let widths = column_widths(rows);
    let bands = column_bands(&widths);
    let chunks: Vec<&[Vec<String>]> = if rows.is_empty() {
        vec![&[]]
    } else {
        rows.chunks(rows_per_page()).collect()
    };
    let page_count = chunks.len() * bands.len();

    let mut kids: Vec<Object> = Vec::with_capacity(page_count);
    for chunk in &chunks {
        for band in &bands {
            let page_number = kids.len() + 1;
            let heading = if bands.len() > 1 {
                format!(
                    "{title} (page {page_number} of {page_count}, columns {}-{})",
                    band.start + 1,
                    band.end
                )
            } else {
                format!("{title} (page {page_number} of {page_count})")
            };
            let content = page_content(&heading, chunk, &widths, band.clone());
            let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode()?));
            let page_id = add_page(&mut doc, pages_id, content_id, resources_id);
            kids.push(page_id.into());
        }
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(destination)?;
    Ok(())
}

fn add_page(
    doc: &mut Document,
    pages_id: ObjectId,
    content_id: ObjectId,
    resources_id: ObjectId,
) -> ObjectId {
    doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(PAGE_WIDTH),
            Object::Integer(PAGE_HEIGHT),
        ],
    })
}

fn rows_per_page() -> usize {
    let usable = PAGE_HEIGHT - 2 * MARGIN - TITLE_SIZE - LEADING;
    (usable / LEADING).max(1) as usize
}

fn column_widths(rows: &[Vec<String>]) -> Vec<i64> {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    (0..columns)
        .map(|col| {
            let chars = rows
                .iter()
                .filter_map(|row| row.get(col))
                .map(|cell| cell.chars().count().min(MAX_CELL_CHARS))
                .max()
                .unwrap_or(0);
            (chars as i64 * CHAR_WIDTH).max(MIN_COLUMN_WIDTH)
        })
        .collect()
}

/// Splits the columns into consecutive ranges that each fit between the
/// margins. Every band holds at least one column; a sheet without columns
/// still gets one empty band.
fn column_bands(widths: &[i64]) -> Vec<Range<usize>> {
    let usable = PAGE_WIDTH - 2 * MARGIN;
    let mut bands = Vec::new();
    let mut start = 0;
    let mut used = 0;
    for (col, width) in widths.iter().enumerate() {
        let needed = if col == start { *width } else { used + COLUMN_GAP + width };
        if col > start && needed > usable {
            bands.push(start..col);
            start = col;
            used = *width;
        } else {
            used = needed;
        }
    }
    bands.push(start..widths.len());
    bands
}

fn page_content(heading: &str, rows: &[Vec<String>], widths: &[i64], band: Range<usize>) -> Content {
    let mut operations = Vec::new();
    let mut y = PAGE_HEIGHT - MARGIN - TITLE_SIZE;
    push_text(&mut operations, "F2", TITLE_SIZE, MARGIN, y, heading);
    y -= LEADING + LEADING / 2;

    for row in rows {
        let mut x = MARGIN;
        for col in band.clone() {
            let width = widths[col];
            if let Some(cell) = row.get(col).filter(|cell| !cell.is_empty()) {
                push_text(&mut operations, "F1", BODY_SIZE, x, y, &truncate(cell));
            }
            x += width + COLUMN_GAP;
        }
        y -= LEADING;
    }

    Content { operations }
}

fn push_text(operations: &mut Vec<Operation>, font: &str, size: i64, x: i64, y: i64, text: &str) {
    operations.push(Operation::new("BT", vec![]));
    operations.push(Operation::new("Tf", vec![font.into(), size.into()]));
    operations.push(Operation::new("Td", vec![x.into(), y.into()]));
    operations.push(Operation::new(
        "Tj",
        vec![Object::string_literal(encode_win_ansi(text))],
    ));
    operations.push(Operation::new("ET", vec![]));
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_CELL_CHARS {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(MAX_CELL_CHARS - 1).collect();
    clipped.push('~');
    clipped
}

/// Maps text onto single-byte WinAnsi codes; characters outside Latin-1
/// become `?`.
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| match u32::from(ch) {
            code @ 0x20..=0x7E | code @ 0xA0..=0xFF => code as u8,
            _ => b'?',
        })
        .collect()
}
