use std::fmt;

use actix_web::error::InternalError;
use actix_web::http::header::ContentType;
use actix_web::{web, App, HttpResponse, HttpServer};
use serde::Deserialize;
use tracing::{debug, info};

use crate::analytics::{dashboard_view, FeatureSet};
use crate::catalog::ALL_STUDENTS;
use crate::data::Dataset;
use crate::error::Result;
use crate::model::Classifier;
use crate::pages;
use crate::prediction::{predict_outcome, PredictionForm};

/// Read-only state shared by every request for the life of the process.
pub struct AppState {
    pub dataset: Dataset,
    pub classifier: Box<dyn Classifier>,
}

impl AppState {
    pub fn new(dataset: Dataset, classifier: Box<dyn Classifier>) -> Self {
        AppState {
            dataset,
            classifier,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub course: Option<String>,
    pub features: Option<FeatureSet>,
}

fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body)
}

async fn dashboard(
    state: web::Data<AppState>,
    query: web::Query<DashboardQuery>,
) -> Result<HttpResponse> {
    let course = query.course.as_deref().unwrap_or(ALL_STUDENTS);
    let features = query.features.unwrap_or_default();
    debug!(course, features = features.query_value(), "rendering dashboard");

    let view = dashboard_view(&state.dataset, course, features)?;
    Ok(html(pages::dashboard_page(&view)?))
}

async fn prediction_form() -> Result<HttpResponse> {
    Ok(html(pages::prediction_page(&PredictionForm::default(), None)?))
}

async fn submit_prediction(
    state: web::Data<AppState>,
    form: web::Form<PredictionForm>,
) -> Result<HttpResponse> {
    let form = form.into_inner();
    let result = predict_outcome(state.classifier.as_ref(), &form)?;
    Ok(html(pages::prediction_page(&form, Some(&result))?))
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().body("Student outcomes dashboard is running")
}

/// Malformed query strings and form bodies get the same HTML error page as
/// every other bad request.
fn rejected_input<E: fmt::Debug + fmt::Display + 'static>(err: E) -> actix_web::Error {
    debug!(error = %err, "rejected request input");
    let response = HttpResponse::BadRequest()
        .content_type(ContentType::html())
        .body(pages::error_page(&err.to_string()));
    InternalError::from_response(err, response).into()
}

/// Registers the dashboard routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    let query_config = web::QueryConfig::default()
        .error_handler(|err, _req| rejected_input(err));
    let form_config = web::FormConfig::default()
        .error_handler(|err, _req| rejected_input(err));

    cfg.app_data(query_config)
        .app_data(form_config)
        .route("/", web::get().to(dashboard))
        .route("/predict", web::get().to(prediction_form))
        .route("/predict", web::post().to(submit_prediction))
        .route("/health", web::get().to(health_check));
}

pub async fn run(state: web::Data<AppState>, host: &str, port: u16) -> std::io::Result<()> {
    info!("serving dashboard on http://{}:{}", host, port);

    HttpServer::new(move || App::new().app_data(state.clone()).configure(configure))
        .bind((host, port))?
        .run()
        .await
}
