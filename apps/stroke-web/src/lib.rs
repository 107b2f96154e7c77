//! stroke-web
//!
//! HTTP front end: the form page, form-driven prediction and the PDF report
//! download. The classifier is injected through [`AppState`], so tests and
//! the server share one router.
pub mod cli;
pub mod logging;

use std::sync::Arc;

use axum::extract::rejection::FormRejection;
use axum::extract::{Form, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use chrono::Utc;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use stroke_core::assess::Assessor;
use stroke_core::config::ReportSettings;
use stroke_core::encoder::FeatureEncoder;
use stroke_core::traits::Classifier;
use stroke_core::types::PatientForm;
use stroke_report::{render_index, render_pdf, IndexPage, PredictionView, ReportInput, ReportOptions};

use crate::logging::redact_value;

pub type SharedClassifier = Arc<dyn Classifier>;

#[derive(Clone)]
pub struct AppState {
    pub assessor: Arc<Assessor<SharedClassifier>>,
    pub report: Arc<ReportSettings>,
}

impl AppState {
    pub fn new(classifier: SharedClassifier, encoder: FeatureEncoder, report: ReportSettings) -> Self {
        Self { assessor: Arc::new(Assessor::new(encoder, classifier)), report: Arc::new(report) }
    }
}

/// Body of `POST /generate_pdf`: the patient fields plus what the page showed.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportForm {
    #[serde(flatten)]
    pub patient: PatientForm,
    pub result: String,
    pub diet_plan: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid form submission: {0}")]
    Form(#[from] FormRejection),

    #[error(transparent)]
    Core(#[from] stroke_core::Error),

    #[error("Failed to render page: {0}")]
    Render(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Form(_) => StatusCode::BAD_REQUEST,
            AppError::Core(e) => match e {
                stroke_core::Error::InvalidNumber { .. } => StatusCode::BAD_REQUEST,
                stroke_core::Error::UnknownCategory { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
            return (status, "Request failed").into_response();
        }
        // Client error messages can quote the submitted value.
        let message = self.to_string();
        warn!(status = status.as_u16(), error = redact_value(&message), "Rejected request");
        (status, message).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/prediction", post(prediction))
        .route("/generate_pdf", post(generate_pdf))
        .route("/health", get(health))
        .with_state(state)
}

async fn index() -> Result<Html<String>, AppError> { Ok(Html(render_index(&IndexPage::default())?)) }

async fn health() -> &'static str { "ok" }

#[tracing::instrument(skip_all)]
async fn prediction(
    State(state): State<AppState>,
    form: Result<Form<PatientForm>, FormRejection>,
) -> Result<Html<String>, AppError> {
    let Form(form) = form?;
    for (name, value) in form.named_values() {
        debug!(field = name, value = redact_value(value), "Form field");
    }
    let record = form.parse()?;
    let assessment = state.assessor.assess(&record)?;
    info!(
        outcome = %assessment.recommendation.outcome,
        score = assessment.score,
        unknown = assessment.unknown.len(),
        "Prediction complete"
    );

    let view = PredictionView {
        label: assessment.recommendation.label().to_string(),
        advice_markup: assessment.recommendation.markup(),
    };
    Ok(Html(render_index(&IndexPage { form: Some(&form), prediction: Some(view) })?))
}

#[tracing::instrument(skip_all)]
async fn generate_pdf(
    State(state): State<AppState>,
    form: Result<Form<ReportForm>, FormRejection>,
) -> Result<Response, AppError> {
    let Form(form) = form?;
    let input = ReportInput { patient: &form.patient, result: &form.result, diet_plan: &form.diet_plan };
    let bytes = render_pdf(&input, &ReportOptions::new(state.report.title.clone(), Utc::now()));
    info!(bytes = bytes.len(), "Report generated");

    let disposition = format!("attachment; filename=\"{}\"", state.report.filename);
    Ok((
        [(header::CONTENT_TYPE, "application/pdf".to_string()), (header::CONTENT_DISPOSITION, disposition)],
        bytes,
    )
        .into_response())
}
