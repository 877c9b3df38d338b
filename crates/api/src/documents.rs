//! PDF rendering: the staff profile export and the fallback brochure.
//!
//! Layout is a fixed A4 page with builtin Helvetica; long sub-record lists
//! continue on new pages.

use backoffice_db::models::staff::StaffDetail;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 20.0;
const LINE: f32 = 7.0;

#[derive(Debug, thiserror::Error)]
#[error("PDF rendering failed: {0}")]
pub struct RenderError(String);

impl From<printpdf::Error> for RenderError {
    fn from(e: printpdf::Error) -> Self {
        Self(e.to_string())
    }
}

/// Cursor that writes lines top-down and starts a new page when full.
struct Writer {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    y: f32,
}

impl Writer {
    fn new(title: &str) -> Result<Self, RenderError> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "content");
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
        let layer = doc.get_page(page).get_layer(layer);
        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            y: PAGE_HEIGHT - MARGIN,
        })
    }

    fn ensure_room(&mut self, lines: f32) {
        if self.y - lines * LINE < MARGIN {
            let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "content");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT - MARGIN;
        }
    }

    fn heading(&mut self, text: &str, size: f32) {
        self.ensure_room(2.0);
        self.layer
            .use_text(text, size, Mm(MARGIN), Mm(self.y), &self.bold);
        self.y -= LINE * 1.5;
    }

    fn line(&mut self, text: &str) {
        self.ensure_room(1.0);
        self.layer
            .use_text(text, 11.0, Mm(MARGIN), Mm(self.y), &self.regular);
        self.y -= LINE;
    }

    fn field(&mut self, label: &str, value: Option<&str>) {
        self.line(&format!("{label}: {}", value.unwrap_or("-")));
    }

    fn gap(&mut self) {
        self.y -= LINE / 2.0;
    }

    fn finish(self) -> Result<Vec<u8>, RenderError> {
        Ok(self.doc.save_to_bytes()?)
    }
}

/// Download name for a staff export.
pub fn staff_pdf_file_name(staff_id: i64) -> String {
    format!("staff_{staff_id}.pdf")
}

/// Render one staff record with its education and paper sub-records.
pub fn staff_pdf(detail: &StaffDetail) -> Result<Vec<u8>, RenderError> {
    let staff = &detail.staff;
    let mut w = Writer::new("Staff Profile")?;

    w.heading("Staff Profile", 18.0);
    w.field("Staff name", staff.staff_name.as_deref());
    w.field("Employee code", staff.employee_code.as_deref());
    w.field("Account name", staff.name.as_deref());
    w.field("Role", staff.role.as_deref());
    w.field("Email", staff.email.as_deref());
    w.field("Mobile", staff.mobile.as_deref());
    let dob = staff.date_of_birth.map(|d| d.format("%Y-%m-%d").to_string());
    w.field("Date of birth", dob.as_deref());
    w.field("Address", staff.address.as_deref());
    w.line(&format!("Images on file: {}", detail.images.len()));
    w.gap();

    w.heading("Education", 14.0);
    if detail.education.is_empty() {
        w.line("No education records.");
    }
    for entry in &detail.education {
        w.line(&format!(
            "{} - {}, {} ({}, {}%)",
            entry.qualification,
            entry.college_name,
            entry.board_university,
            entry.passing_year,
            entry.percentage
        ));
    }
    w.gap();

    w.heading("Papers", 14.0);
    if detail.papers.is_empty() {
        w.line("No papers.");
    }
    for paper in &detail.papers {
        let mut text = paper.title.clone();
        if let Some(journal) = &paper.journal {
            text.push_str(&format!(", {journal}"));
        }
        if let Some(year) = &paper.published_year {
            text.push_str(&format!(" ({year})"));
        }
        w.line(&text);
    }

    w.finish()
}

/// The one-page brochure sent when no brochure file is configured.
pub fn default_brochure() -> Result<Vec<u8>, RenderError> {
    let mut w = Writer::new("Company Brochure")?;
    w.heading("Company Brochure", 20.0);
    w.line("Thank you for your interest.");
    w.line("Our team will be in touch to discuss how we can work together.");
    w.finish()
}
