//! The downloadable PDF report.
use chrono::{DateTime, Utc};
use tracing::debug;

use stroke_core::types::PatientForm;

use crate::markup::list_items;
use crate::pdf::{Align, PdfDocument};

pub const DEFAULT_TITLE: &str = "Brain Stroke Prediction Report";

const HEADER_SIZE: f32 = 16.0;
const BODY_SIZE: f32 = 12.0;
const SECTION_SIZE: f32 = 14.0;
const LINE_HEIGHT: f32 = 10.0;

/// What the report shows: the submitted form, the outcome label and the
/// advice markup exactly as the page displayed them.
#[derive(Debug, Clone, Copy)]
pub struct ReportInput<'a> {
    pub patient: &'a PatientForm,
    pub result: &'a str,
    pub diet_plan: &'a str,
}

#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub title: String,
    /// Written to the document info dictionary; nothing else in the output
    /// depends on the clock.
    pub created_at: DateTime<Utc>,
}

impl ReportOptions {
    pub fn new(title: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self { title: title.into(), created_at }
    }

    pub fn now() -> Self { Self::new(DEFAULT_TITLE, Utc::now()) }
}

/// Lay out the report without serializing it.
pub fn build_report(input: &ReportInput<'_>, options: &ReportOptions) -> PdfDocument {
    let mut doc = PdfDocument::new();
    doc.set_title(&options.title);
    doc.set_creation_date(options.created_at);
    doc.set_header(&options.title, HEADER_SIZE, LINE_HEIGHT);
    doc.add_page();

    doc.set_font_size(BODY_SIZE);
    for (label, value) in input.patient.labeled_values() {
        doc.cell(0.0, LINE_HEIGHT, &format!("{label}: {value}"), Align::Left, true);
    }
    doc.cell(0.0, LINE_HEIGHT, &format!("Prediction Result: {}", input.result), Align::Left, true);

    doc.ln(LINE_HEIGHT);
    doc.set_font_size(SECTION_SIZE);
    doc.cell(0.0, LINE_HEIGHT, "Diet Plan", Align::Left, true);
    doc.ln(5.0);

    doc.set_font_size(BODY_SIZE);
    let items = list_items(input.diet_plan);
    debug!(items = items.len(), "Rendering diet plan");
    for item in &items {
        doc.multi_cell(0.0, LINE_HEIGHT, &format!("- {item}"));
    }
    doc
}

pub fn render_pdf(input: &ReportInput<'_>, options: &ReportOptions) -> Vec<u8> {
    let doc = build_report(input, options);
    debug!(pages = doc.page_count(), "Report laid out");
    doc.to_bytes()
}
