use actix_web::web;
use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use student_outcomes_dashboard::analytics::{status_distribution, CourseFilter};
use student_outcomes_dashboard::{server, AppState, Config, Dataset, LogisticModel};

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    init_tracing(config.log_json);

    let dataset = Dataset::load(&config.data)
        .with_context(|| format!("failed to load dataset {}", config.data.display()))?;
    let all = CourseFilter::All.apply(dataset.records());
    for share in status_distribution(&all) {
        info!(status = %share.status, count = share.count, "status distribution");
    }
    if !dataset.quality_issues().is_empty() {
        info!(
            issues = dataset.quality_issues().len(),
            "dataset contains unmapped binary codes"
        );
    }

    let classifier = LogisticModel::load(&config.model)
        .with_context(|| format!("failed to load classifier {}", config.model.display()))?;

    let state = web::Data::new(AppState::new(dataset, Box::new(classifier)));
    server::run(state, &config.host, config.port)
        .await
        .context("dashboard server failed")?;

    Ok(())
}
