use std::io::Cursor;

use docx_rs::{
    AlignmentType, BreakType, Docx, LineSpacing, Paragraph, Pic, Run, SpecialIndentType, Table,
    TableCell, TableRow, VAlignType, VMergeType, WidthType,
};

use super::grid::{self, GridCell};
use super::{validate, DocumentEncoder};
use crate::error::{ExportError, Result};
use crate::model::{
    Alignment, ContentElement, ContentModel, ImageElement, StyledParagraph, TableCellElement,
    TableElement, VerticalAlign,
};

/// Text width of an A4 page with default margins, in twentieths of a point
const CONTENT_WIDTH_TWIPS: usize = 9000;

/// Word processing document encoder
#[derive(Debug, Default, Clone, Copy)]
pub struct DocxEncoder;

impl DocxEncoder {
    pub fn new() -> Self {
        DocxEncoder
    }

    fn build(&self, model: &ContentModel) -> Docx {
        let mut docx = Docx::new();
        for element in &model.elements {
            docx = match element {
                ContentElement::Paragraph(paragraph) => docx.add_paragraph(paragraph_xml(paragraph)),
                ContentElement::Table(table) => docx.add_table(table_xml(table)),
                ContentElement::Image(image) => docx.add_paragraph(image_xml(image)),
            };
        }
        docx
    }
}

impl DocumentEncoder for DocxEncoder {
    fn name(&self) -> &str {
        "docx"
    }

    fn description(&self) -> &str {
        "Office Open XML word processing document"
    }

    fn extension(&self) -> &str {
        "docx"
    }

    fn encode(&self, model: &ContentModel) -> Result<Vec<u8>> {
        validate(model)?;

        let mut buffer = Vec::new();
        self.build(model)
            .build()
            .pack(&mut Cursor::new(&mut buffer))
            .map_err(|e| ExportError::Encoding(format!("failed to pack document: {e}")))?;

        log::debug!(
            "encoded {} elements into {} bytes",
            model.len(),
            buffer.len()
        );
        Ok(buffer)
    }
}

fn alignment_type(alignment: Alignment) -> AlignmentType {
    match alignment {
        Alignment::Start => AlignmentType::Left,
        Alignment::Center => AlignmentType::Center,
        Alignment::End => AlignmentType::Right,
    }
}

fn valign_type(align: VerticalAlign) -> VAlignType {
    match align {
        VerticalAlign::Top => VAlignType::Top,
        VerticalAlign::Center => VAlignType::Center,
        VerticalAlign::Bottom => VAlignType::Bottom,
    }
}

/// A run holding `text`, with line breaks between its lines.
fn text_run(text: &str) -> Run {
    let mut run = Run::new();
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            run = run.add_break(BreakType::TextWrapping);
        }
        run = run.add_text(line);
    }
    run
}

fn paragraph_xml(paragraph: &StyledParagraph) -> Paragraph {
    let format = &paragraph.format;

    let mut run = text_run(&paragraph.text);
    if let Some(size) = format.font_size {
        run = run.size(size);
    }
    if format.bold {
        run = run.bold();
    }

    let mut para = Paragraph::new()
        .add_run(run)
        .align(alignment_type(format.alignment))
        .line_spacing(LineSpacing::new().after(format.spacing_after));
    if let Some(indent) = format.first_line_indent {
        para = para.indent(None, Some(SpecialIndentType::FirstLine(indent)), None, None);
    }
    para
}

fn cell_paragraph(cell: &TableCellElement) -> Paragraph {
    Paragraph::new()
        .add_run(text_run(&cell.text))
        .align(alignment_type(cell.alignment))
}

fn table_xml(table: &TableElement) -> Table {
    let layout = grid::layout(&table.rows);
    let columns = layout.columns.max(1);
    let width = CONTENT_WIDTH_TWIPS * table.width_percent as usize / 100;
    let column_width = width / columns;

    let rows = layout
        .rows
        .iter()
        .zip(&table.rows)
        .map(|(slots, source)| {
            let cells = slots.iter().map(cell_xml).collect();
            let row = TableRow::new(cells);
            if source.cant_split {
                row.cant_split()
            } else {
                row
            }
        })
        .collect();

    // Pct widths are expressed in fiftieths of a percent
    Table::new(rows)
        .width(table.width_percent as usize * 50, WidthType::Pct)
        .set_grid(vec![column_width; columns])
}

fn cell_xml(slot: &GridCell<'_>) -> TableCell {
    match slot {
        GridCell::Origin(cell) => {
            let mut xml = TableCell::new()
                .add_paragraph(cell_paragraph(cell))
                .vertical_align(valign_type(cell.vertical_align));
            if cell.col_span > 1 {
                xml = xml.grid_span(cell.col_span as usize);
            }
            if cell.row_span > 1 {
                xml = xml.vertical_merge(VMergeType::Restart);
            }
            xml
        }
        GridCell::Continuation { col_span } => {
            let mut xml = TableCell::new()
                .add_paragraph(Paragraph::new())
                .vertical_merge(VMergeType::Continue);
            if *col_span > 1 {
                xml = xml.grid_span(*col_span as usize);
            }
            xml
        }
        GridCell::Filler => TableCell::new().add_paragraph(Paragraph::new()),
    }
}

fn image_xml(image: &ImageElement) -> Paragraph {
    let pic = Pic::new_with_dimensions(image.bytes.clone(), image.width, image.height);
    Paragraph::new()
        .add_run(Run::new().add_image(pic))
        .align(alignment_type(image.alignment))
}
