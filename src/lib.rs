//! Student outcomes dashboard: dataset analytics, chart specs and a dropout
//! predictor served as a small local web app.

pub mod analytics;
pub mod catalog;
pub mod charts;
pub mod config;
pub mod data;
pub mod error;
pub mod model;
pub mod pages;
pub mod prediction;
pub mod server;

pub use config::Config;
pub use data::{Dataset, Status, StudentRecord};
pub use error::{DashboardError, Result};
pub use model::{Classifier, LogisticModel, Outcome};
pub use prediction::{predict_outcome, PredictionForm, PredictionInput, PredictionResult};
pub use server::AppState;
