//! Plotly figure specifications for the dashboard and prediction pages.
//!
//! Every function here is a pure mapping from analytics output to a figure;
//! the browser draws it with plotly.js.

use serde::Serialize;

use crate::analytics::{AggregationRow, CorrelationReport, StatusShare};
use crate::data::{DemographicFeature, Status};
use crate::model::Outcome;
use crate::prediction::PredictionResult;

#[derive(Debug, Clone, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Bar(BarTrace),
    Pie(PieTrace),
}

#[derive(Debug, Clone, Serialize)]
pub struct BarTrace {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub x: Vec<String>,
    pub y: Vec<f64>,
    pub marker: Marker,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub textposition: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub texttemplate: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PieTrace {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub marker: Marker,
    pub textinfo: &'static str,
    pub textposition: &'static str,
    pub sort: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum MarkerColor {
    Single(&'static str),
    PerPoint(Vec<&'static str>),
    Scale(Vec<f64>),
}

#[derive(Debug, Clone, Serialize)]
pub struct Marker {
    pub color: MarkerColor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colorscale: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showscale: Option<bool>,
}

impl Marker {
    fn solid(color: &'static str) -> Self {
        Marker {
            color: MarkerColor::Single(color),
            colorscale: None,
            showscale: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Layout {
    pub title: Title,
    pub height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barmode: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<Margin>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Title {
    pub text: String,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Margin {
    pub l: u32,
    pub r: u32,
    pub t: u32,
    pub b: u32,
}

const TIGHT: Margin = Margin {
    l: 0,
    r: 0,
    t: 40,
    b: 0,
};

#[derive(Debug, Clone, Default, Serialize)]
pub struct Axis {
    pub title: Title,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categoryorder: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Legend {
    pub title: Title,
}

fn title(text: impl Into<String>) -> Title {
    Title { text: text.into() }
}

/// Stacked bar of counts per (feature label, status), one trace per status.
pub fn demographic_bar(feature: DemographicFeature, rows: &[AggregationRow]) -> Figure {
    let data = Status::ALL
        .iter()
        .filter_map(|&status| {
            let (x, counts): (Vec<String>, Vec<usize>) = rows
                .iter()
                .filter(|row| row.status == status)
                .map(|row| (row.value.clone(), row.count))
                .unzip();
            if x.is_empty() {
                return None;
            }
            Some(Trace::Bar(BarTrace {
                name: Some(status.to_string()),
                x,
                y: counts.iter().map(|&c| c as f64).collect(),
                marker: Marker::solid(status.color()),
                text: Some(counts.iter().map(|c| c.to_string()).collect()),
                textposition: Some("outside"),
                texttemplate: Some("%{text}"),
            }))
        })
        .collect();

    Figure {
        data,
        layout: Layout {
            title: title(format!("Student distribution by {}", feature.column())),
            height: 400,
            barmode: Some("stack"),
            margin: Some(TIGHT),
            xaxis: Some(Axis {
                title: title(feature.column()),
                categoryorder: None,
            }),
            yaxis: Some(Axis {
                title: title("Number of students"),
                categoryorder: None,
            }),
            legend: Some(Legend {
                title: title("Status"),
            }),
        },
    }
}

/// Correlation of each feature with `Status_Num`, colored on the RdBu scale.
/// Undefined coefficients never reach the figure.
pub fn correlation_bar(report: &CorrelationReport) -> Figure {
    let x = report.entries.iter().map(|e| e.feature.to_string()).collect();
    let y: Vec<f64> = report.entries.iter().map(|e| e.coefficient).collect();

    Figure {
        data: vec![Trace::Bar(BarTrace {
            name: None,
            x,
            y: y.clone(),
            marker: Marker {
                color: MarkerColor::Scale(y),
                colorscale: Some("RdBu"),
                showscale: Some(true),
            },
            text: None,
            textposition: None,
            texttemplate: None,
        })],
        layout: Layout {
            title: title("Correlation of Features with Status_Num"),
            height: 600,
            xaxis: Some(Axis {
                title: title("Features"),
                categoryorder: Some("total ascending"),
            }),
            yaxis: Some(Axis {
                title: title("Correlation"),
                categoryorder: None,
            }),
            ..Layout::default()
        },
    }
}

/// Share of each status among the filtered students.
pub fn status_pie(course: &str, shares: &[StatusShare]) -> Figure {
    Figure {
        data: vec![Trace::Pie(PieTrace {
            labels: shares.iter().map(|s| s.status.to_string()).collect(),
            values: shares.iter().map(|s| s.count as f64).collect(),
            marker: Marker {
                color: MarkerColor::PerPoint(shares.iter().map(|s| s.status.color()).collect()),
                colorscale: None,
                showscale: None,
            },
            textinfo: "percent+label",
            textposition: "inside",
            sort: false,
        })],
        layout: Layout {
            title: title(format!("Proportion of Student Status in {course}")),
            height: 500,
            margin: Some(TIGHT),
            ..Layout::default()
        },
    }
}

/// Graduate/Dropout probability split for one prediction.
pub fn prediction_pie(result: &PredictionResult) -> Figure {
    let outcomes = [
        (Outcome::Graduate, result.probability_graduate),
        (Outcome::Dropout, result.probability_dropout),
    ];

    Figure {
        data: vec![Trace::Pie(PieTrace {
            labels: outcomes.iter().map(|(o, _)| o.to_string()).collect(),
            values: outcomes.iter().map(|&(_, p)| p).collect(),
            marker: Marker {
                color: MarkerColor::PerPoint(outcomes.iter().map(|(o, _)| o.color()).collect()),
                colorscale: None,
                showscale: None,
            },
            textinfo: "percent+label",
            textposition: "inside",
            sort: false,
        })],
        layout: Layout {
            title: title("Probability Distribution"),
            height: 400,
            margin: Some(TIGHT),
            ..Layout::default()
        },
    }
}
