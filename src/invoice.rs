//! The fixed single-page invoice layout.

use std::path::Path;

use crate::builder::{PdfBuildError, PdfBuilder, RenderedPdf};
use crate::fonts::FontStyle;
use crate::layout::{
    Cell, HorizontalAlignment, Layout, LayoutContext, Margins, PageSize, Paint, Position, Rgb,
};
use crate::model::Invoice;
use crate::richtext::labelled;

/// Default output file, relative to the working directory.
pub const DEFAULT_OUTPUT: &str = "invoice.pdf";

/// `strftime` pattern for the date printed in the payment terms panel, e.g. `Sun, Oct 18, 2026`.
pub const DATE_FORMAT: &str = "%a, %b %e, %Y";

/// Title stored in the document information dictionary.
pub const DOCUMENT_TITLE: &str = "Invoice";

const SHADE: Rgb = Rgb::gray(240);

const TABLE_ROW_HEIGHT: f64 = 8.0;
const DESCRIPTION_WIDTH: f64 = 90.0;
const QUANTITY_WIDTH: f64 = 25.0;
const UNIT_PRICE_WIDTH: f64 = 25.0;
const SUBTOTAL_WIDTH: f64 = 30.0;

const TOTALS_X: f64 = 130.0;
const TOTALS_CELL_WIDTH: f64 = 30.0;

const PANEL_ORIGIN: Position = Position { x: 20.0, y: 135.0 };
const PANEL_WIDTH: f64 = 170.0;
const PANEL_HEIGHT: f64 = 45.0;
const PANEL_INDENT: f64 = 25.0;
const PANEL_TEXT_TOP: f64 = 138.0;
const DATE_X: f64 = 140.0;

/// Lays out `invoice` on one A4 page, printing `date` in the payment terms panel.
pub fn layout_invoice(invoice: &Invoice, date: &str) -> Layout {
    let mut ctx = LayoutContext::new(PageSize::A4, Margins::new(20.0, 30.0, 20.0));

    title(&mut ctx);
    customer_block(&mut ctx, invoice);
    items_table(&mut ctx, invoice);
    totals(&mut ctx, invoice);
    payment_terms(&mut ctx, invoice, date);

    ctx.finish()
}

/// Lays out `invoice` and writes it as a PDF to `path`.
pub fn render_invoice(
    invoice: &Invoice,
    date: &str,
    path: impl AsRef<Path>,
) -> Result<RenderedPdf, PdfBuildError> {
    PdfBuilder::new(layout_invoice(invoice, date))
        .with_title(DOCUMENT_TITLE)
        .write_to(path)
}

fn title(ctx: &mut LayoutContext) {
    ctx.set_font(FontStyle::Bold, 16.0);
    ctx.write(10.0, "INVOICE");
    ctx.line_break(13.0);
}

fn customer_block(ctx: &mut LayoutContext, invoice: &Invoice) {
    let customer = invoice.customer();

    ctx.set_style(FontStyle::Regular, true);
    ctx.set_font_size(7.0);
    ctx.cell(Cell::new(0.0, 7.0, "Prepared for"));
    ctx.line_break(4.0);

    ctx.set_style(FontStyle::Regular, false);
    ctx.set_font_size(8.0);

    let fields = [
        labelled("Company Name: ", customer.name.as_str()),
        labelled("Company Address: ", customer.street_address.as_str()),
        labelled("City, State, Zip: ", customer.locality()),
    ];
    let last = fields.len() - 1;
    for (index, spans) in fields.iter().enumerate() {
        ctx.write_spans(10.0, spans);
        ctx.line_break(if index == last { 20.0 } else { 4.0 });
    }
}

fn items_table(ctx: &mut LayoutContext, invoice: &Invoice) {
    let item = invoice.line_item();

    ctx.set_font(FontStyle::Regular, 9.0);
    ctx.set_fill_color(SHADE);
    let headers = [
        ("DESCRIPTION OF WORK", DESCRIPTION_WIDTH),
        ("QTY/HRS", QUANTITY_WIDTH),
        ("UNIT PRICE", UNIT_PRICE_WIDTH),
        ("SUBTOTAL", SUBTOTAL_WIDTH),
    ];
    let last = headers.len() - 1;
    for (index, (label, width)) in headers.into_iter().enumerate() {
        let mut cell = Cell::new(width, TABLE_ROW_HEIGHT, label).bordered().filled();
        if index == last {
            cell = cell.ends_line();
        }
        ctx.cell(cell);
    }

    ctx.set_fill_color(Rgb::WHITE);
    ctx.cell(Cell::new(DESCRIPTION_WIDTH, TABLE_ROW_HEIGHT, item.description()).bordered());
    ctx.cell(
        Cell::new(QUANTITY_WIDTH, TABLE_ROW_HEIGHT, item.quantity_label())
            .bordered()
            .aligned(HorizontalAlignment::Right),
    );
    ctx.cell(
        Cell::new(UNIT_PRICE_WIDTH, TABLE_ROW_HEIGHT, item.unit_price_label())
            .bordered()
            .aligned(HorizontalAlignment::Right),
    );
    ctx.cell(
        Cell::new(SUBTOTAL_WIDTH, TABLE_ROW_HEIGHT, item.total_label())
            .bordered()
            .aligned(HorizontalAlignment::Right)
            .ends_line(),
    );
    ctx.line_break(20.0);
}

fn totals(ctx: &mut LayoutContext, invoice: &Invoice) {
    ctx.set_x(TOTALS_X);
    ctx.set_fill_color(SHADE);

    ctx.set_style(FontStyle::Bold, false);
    ctx.cell(
        Cell::new(TOTALS_CELL_WIDTH, TABLE_ROW_HEIGHT, "GRAND TOTAL")
            .bordered()
            .filled()
            .aligned(HorizontalAlignment::Center),
    );
    ctx.set_style(FontStyle::Regular, false);
    ctx.cell(
        Cell::new(TOTALS_CELL_WIDTH, TABLE_ROW_HEIGHT, invoice.line_item().total_label())
            .bordered()
            .filled()
            .aligned(HorizontalAlignment::Right),
    );
}

fn payment_terms(ctx: &mut LayoutContext, invoice: &Invoice, date: &str) {
    let company = invoice.company();

    ctx.set_fill_color(SHADE);
    ctx.rect(PANEL_ORIGIN, PANEL_WIDTH, PANEL_HEIGHT, Paint::Fill);

    ctx.set_xy(PANEL_INDENT, PANEL_TEXT_TOP);
    ctx.set_style(FontStyle::Bold, false);
    ctx.cell(Cell::new(40.0, 10.0, "PAYMENT TERMS"));
    ctx.line_break(7.0);

    ctx.set_style(FontStyle::Regular, false);
    ctx.set_font_size(8.0);
    panel_line(ctx, 40.0, "To be made payable to", 6.0);

    // Everything below the heading stays bold, including the date.
    ctx.set_style(FontStyle::Bold, false);
    panel_line(ctx, 40.0, &company.representative_name, 4.0);
    panel_line(ctx, 40.0, &format!("CPF: {}", company.representative_cpf), 7.0);
    panel_line(ctx, 0.0, &company.company_name, 4.0);
    panel_line(ctx, 0.0, &format!("CNPJ: {}", company.company_cnpj), 4.0);

    ctx.set_xy(DATE_X, PANEL_TEXT_TOP);
    ctx.set_font_size(10.0);
    ctx.cell(Cell::new(0.0, 10.0, format!("DATE: {}", date)));
}

fn panel_line(ctx: &mut LayoutContext, width: f64, text: &str, advance: f64) {
    ctx.set_x(PANEL_INDENT);
    ctx.cell(Cell::new(width, 10.0, text));
    ctx.line_break(advance);
}
