use std::collections::BTreeMap;

use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::catalog::{ALL_STUDENTS, COURSE};
use crate::data::{
    Dataset, DemographicFeature, Status, StudentRecord, CATEGORICAL_FEATURES, NUMERICAL_FEATURES,
};
use crate::error::Result;

/// Course selection resolved from the dashboard selector. A `Course` only
/// comes out of [`CourseFilter::resolve`], so its name is always a catalog label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseFilter {
    All,
    Course { code: i64, name: &'static str },
}

impl CourseFilter {
    pub fn resolve(name: &str) -> Result<Self> {
        if name == ALL_STUDENTS {
            return Ok(CourseFilter::All);
        }
        let (code, name) = COURSE.entry(name)?;
        Ok(CourseFilter::Course { code, name })
    }

    pub fn label(&self) -> &'static str {
        match self {
            CourseFilter::All => ALL_STUDENTS,
            CourseFilter::Course { name, .. } => *name,
        }
    }

    pub fn apply<'a>(&self, records: &'a [StudentRecord]) -> Vec<&'a StudentRecord> {
        match self {
            CourseFilter::All => records.iter().collect(),
            CourseFilter::Course { code, .. } => {
                records.iter().filter(|r| r.course == *code).collect()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregationRow {
    pub value: String,
    pub status: Status,
    pub count: usize,
}

/// Counts records per (feature label, status).
pub fn demographic_breakdown(
    records: &[&StudentRecord],
    feature: DemographicFeature,
) -> Vec<AggregationRow> {
    let mut groups: BTreeMap<(String, Status), usize> = BTreeMap::new();
    for record in records {
        let key = (feature.label(record).into_owned(), record.status);
        *groups.entry(key).or_insert(0) += 1;
    }

    groups
        .into_iter()
        .map(|((value, status), count)| AggregationRow {
            value,
            status,
            count,
        })
        .collect()
}

/// Feature group selected by the correlation radio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureSet {
    #[default]
    All,
    Numerical,
    Categorical,
}

impl FeatureSet {
    pub const ALL: [FeatureSet; 3] = [
        FeatureSet::All,
        FeatureSet::Numerical,
        FeatureSet::Categorical,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FeatureSet::All => "All Features",
            FeatureSet::Numerical => "Numerical Features",
            FeatureSet::Categorical => "Categorical Features",
        }
    }

    pub fn query_value(&self) -> &'static str {
        match self {
            FeatureSet::All => "all",
            FeatureSet::Numerical => "numerical",
            FeatureSet::Categorical => "categorical",
        }
    }

    /// Numeric columns of the group. The demographic columns are shown as
    /// labels, not numbers, so they never get a coefficient.
    /// `Previous_qualification` sits in both lists and appears once in the union.
    pub fn features(&self) -> Vec<&'static str> {
        let groups: &[&[&'static str]] = match self {
            FeatureSet::Numerical => &[&NUMERICAL_FEATURES],
            FeatureSet::Categorical => &[&CATEGORICAL_FEATURES],
            FeatureSet::All => &[&NUMERICAL_FEATURES, &CATEGORICAL_FEATURES],
        };

        let mut features = Vec::new();
        for &column in groups.iter().flat_map(|group| group.iter()) {
            if !is_label_mapped(column) && !features.contains(&column) {
                features.push(column);
            }
        }
        features
    }
}

fn is_label_mapped(column: &str) -> bool {
    DemographicFeature::ALL.iter().any(|f| f.column() == column)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationEntry {
    pub feature: &'static str,
    pub coefficient: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CorrelationReport {
    /// Defined coefficients, ascending.
    pub entries: Vec<CorrelationEntry>,
    /// Features whose correlation is undefined (constant column or status).
    pub undefined: Vec<&'static str>,
}

/// Pearson correlation, or `None` when either side has zero variance.
pub fn pearson(x: ArrayView1<f64>, y: ArrayView1<f64>) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 || is_constant(x) || is_constant(y) {
        return None;
    }

    let dx = &x - x.mean()?;
    let dy = &y - y.mean()?;
    let cov = dx.dot(&dy);
    let denom = (dx.dot(&dx) * dy.dot(&dy)).sqrt();
    let r = cov / denom;

    if r.is_finite() {
        Some(r.clamp(-1.0, 1.0))
    } else {
        None
    }
}

fn is_constant(values: ArrayView1<f64>) -> bool {
    let mut iter = values.iter();
    match iter.next() {
        Some(&first) => iter.all(|&v| v == first),
        None => true,
    }
}

/// Correlates every feature of `set` with the status ordinal.
pub fn status_correlations(
    records: &[StudentRecord],
    set: FeatureSet,
) -> Result<CorrelationReport> {
    let target: Array1<f64> = records.iter().map(|r| r.status.ordinal()).collect();

    let mut report = CorrelationReport::default();
    for feature in set.features() {
        let column = records
            .iter()
            .map(|r| r.value(feature))
            .collect::<Result<Array1<f64>>>()?;

        match pearson(column.view(), target.view()) {
            Some(coefficient) => report.entries.push(CorrelationEntry {
                feature,
                coefficient,
            }),
            None => report.undefined.push(feature),
        }
    }

    report
        .entries
        .sort_by(|a, b| a.coefficient.total_cmp(&b.coefficient));
    Ok(report)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusShare {
    pub status: Status,
    pub count: usize,
    pub proportion: f64,
}

/// Per-status counts of the filtered records; absent statuses are omitted.
pub fn status_distribution(records: &[&StudentRecord]) -> Vec<StatusShare> {
    let total = records.len();
    Status::ALL
        .iter()
        .filter_map(|&status| {
            let count = records.iter().filter(|r| r.status == status).count();
            (count > 0).then(|| StatusShare {
                status,
                count,
                proportion: count as f64 / total as f64,
            })
        })
        .collect()
}

/// Metric tiles shown above the dashboard charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewMetrics {
    pub total_students: usize,
    /// Percentage in [0, 100].
    pub dropout_rate: f64,
    pub special_needs: usize,
    pub total_graduates: usize,
}

impl OverviewMetrics {
    pub fn from_records(records: &[StudentRecord]) -> Self {
        let total_students = records.len();
        let dropouts = records.iter().filter(|r| r.status == Status::Dropout).count();
        let total_graduates = records.iter().filter(|r| r.status == Status::Graduate).count();
        let special_needs = records
            .iter()
            .filter(|r| DemographicFeature::EducationalSpecialNeeds.label(r) == "Yes")
            .count();

        let dropout_rate = if total_students > 0 {
            dropouts as f64 / total_students as f64 * 100.0
        } else {
            0.0
        };

        OverviewMetrics {
            total_students,
            dropout_rate,
            special_needs,
            total_graduates,
        }
    }

    pub fn dropout_rate_display(&self) -> String {
        format!("{:.2}%", self.dropout_rate)
    }
}

/// Everything the dashboard page needs for one selection.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub course: &'static str,
    pub feature_set: FeatureSet,
    pub filtered_count: usize,
    pub metrics: OverviewMetrics,
    pub demographics: Vec<(DemographicFeature, Vec<AggregationRow>)>,
    pub correlations: CorrelationReport,
    pub distribution: Vec<StatusShare>,
}

/// Metrics and correlations use the whole dataset; demographics and the
/// status distribution follow the course filter.
pub fn dashboard_view(
    dataset: &Dataset,
    course: &str,
    feature_set: FeatureSet,
) -> Result<DashboardView> {
    let filter = CourseFilter::resolve(course)?;
    let filtered = filter.apply(dataset.records());

    let demographics = DemographicFeature::ALL
        .iter()
        .map(|&feature| (feature, demographic_breakdown(&filtered, feature)))
        .collect();

    Ok(DashboardView {
        course: filter.label(),
        feature_set,
        filtered_count: filtered.len(),
        metrics: OverviewMetrics::from_records(dataset.records()),
        demographics,
        correlations: status_correlations(dataset.records(), feature_set)?,
        distribution: status_distribution(&filtered),
    })
}
