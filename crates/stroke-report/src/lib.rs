//! stroke-report
//!
//! Rendering for prediction results: the HTML form page (`html`), `<li>`
//! extraction from advice markup (`markup`), and the downloadable PDF report
//! (`report`, built on the small writer in `pdf`).
pub mod html;
pub mod markup;
pub mod pdf;
pub mod report;

pub use html::{render_index, IndexPage, PredictionView};
pub use markup::list_items;
pub use report::{build_report, render_pdf, ReportInput, ReportOptions};
