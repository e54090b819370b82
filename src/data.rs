use std::borrow::Cow;
use std::fmt;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::catalog::{CategoryMapping, ATTENDANCE, GENDER, YES_NO};
use crate::error::{DashboardError, Result};

/// Outcome recorded for a student at the end of the observation window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Status {
    Graduate,
    Dropout,
    Enrolled,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Graduate, Status::Dropout, Status::Enrolled];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Graduate => "Graduate",
            Status::Dropout => "Dropout",
            Status::Enrolled => "Enrolled",
        }
    }

    /// Ordinal used when correlating features against status.
    /// Graduate=1, Dropout=0, Enrolled=2 is kept as-is for comparability with
    /// previously published dashboards.
    pub fn ordinal(&self) -> f64 {
        match self {
            Status::Graduate => 1.0,
            Status::Dropout => 0.0,
            Status::Enrolled => 2.0,
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Status::Graduate => "#2ecc71",
            Status::Dropout => "#e74c3c",
            Status::Enrolled => "#3498db",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the `;`-delimited student outcomes file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    #[serde(rename = "Marital_status")]
    pub marital_status: i64,
    #[serde(rename = "Application_mode")]
    pub application_mode: i64,
    #[serde(rename = "Application_order")]
    pub application_order: i64,
    #[serde(rename = "Course")]
    pub course: i64,
    #[serde(rename = "Daytime_evening_attendance")]
    pub daytime_evening_attendance: i64,
    #[serde(rename = "Previous_qualification")]
    pub previous_qualification: i64,
    #[serde(rename = "Previous_qualification_grade")]
    pub previous_qualification_grade: f64,
    #[serde(rename = "Nacionality")]
    pub nacionality: i64,
    #[serde(rename = "Mothers_qualification")]
    pub mothers_qualification: i64,
    #[serde(rename = "Fathers_qualification")]
    pub fathers_qualification: i64,
    #[serde(rename = "Mothers_occupation")]
    pub mothers_occupation: i64,
    #[serde(rename = "Fathers_occupation")]
    pub fathers_occupation: i64,
    #[serde(rename = "Admission_grade")]
    pub admission_grade: f64,
    #[serde(rename = "Displaced")]
    pub displaced: i64,
    #[serde(rename = "Educational_special_needs")]
    pub educational_special_needs: i64,
    #[serde(rename = "Debtor")]
    pub debtor: i64,
    #[serde(rename = "Tuition_fees_up_to_date")]
    pub tuition_fees_up_to_date: i64,
    #[serde(rename = "Gender")]
    pub gender: i64,
    #[serde(rename = "Scholarship_holder")]
    pub scholarship_holder: i64,
    #[serde(rename = "Age_at_enrollment")]
    pub age_at_enrollment: i64,
    #[serde(rename = "International")]
    pub international: i64,
    #[serde(rename = "Curricular_units_1st_sem_credited")]
    pub units_1st_sem_credited: i64,
    #[serde(rename = "Curricular_units_1st_sem_enrolled")]
    pub units_1st_sem_enrolled: i64,
    #[serde(rename = "Curricular_units_1st_sem_evaluations")]
    pub units_1st_sem_evaluations: i64,
    #[serde(rename = "Curricular_units_1st_sem_approved")]
    pub units_1st_sem_approved: i64,
    #[serde(rename = "Curricular_units_1st_sem_grade")]
    pub units_1st_sem_grade: f64,
    #[serde(rename = "Curricular_units_1st_sem_without_evaluations")]
    pub units_1st_sem_without_evaluations: i64,
    #[serde(rename = "Curricular_units_2nd_sem_credited")]
    pub units_2nd_sem_credited: i64,
    #[serde(rename = "Curricular_units_2nd_sem_enrolled")]
    pub units_2nd_sem_enrolled: i64,
    #[serde(rename = "Curricular_units_2nd_sem_evaluations")]
    pub units_2nd_sem_evaluations: i64,
    #[serde(rename = "Curricular_units_2nd_sem_approved")]
    pub units_2nd_sem_approved: i64,
    #[serde(rename = "Curricular_units_2nd_sem_grade")]
    pub units_2nd_sem_grade: f64,
    #[serde(rename = "Curricular_units_2nd_sem_without_evaluations")]
    pub units_2nd_sem_without_evaluations: i64,
    #[serde(rename = "Unemployment_rate")]
    pub unemployment_rate: f64,
    #[serde(rename = "Inflation_rate")]
    pub inflation_rate: f64,
    #[serde(rename = "GDP")]
    pub gdp: f64,
    #[serde(rename = "Status")]
    pub status: Status,
}

pub const NUMERICAL_FEATURES: [&str; 19] = [
    "Application_order",
    "Previous_qualification",
    "Admission_grade",
    "Age_at_enrollment",
    "Curricular_units_1st_sem_credited",
    "Curricular_units_1st_sem_enrolled",
    "Curricular_units_1st_sem_evaluations",
    "Curricular_units_1st_sem_approved",
    "Curricular_units_1st_sem_grade",
    "Curricular_units_1st_sem_without_evaluations",
    "Curricular_units_2nd_sem_credited",
    "Curricular_units_2nd_sem_enrolled",
    "Curricular_units_2nd_sem_evaluations",
    "Curricular_units_2nd_sem_approved",
    "Curricular_units_2nd_sem_grade",
    "Curricular_units_2nd_sem_without_evaluations",
    "Unemployment_rate",
    "Inflation_rate",
    "GDP",
];

pub const CATEGORICAL_FEATURES: [&str; 17] = [
    "Marital_status",
    "Application_mode",
    "Course",
    "Daytime_evening_attendance",
    "Previous_qualification",
    "Nacionality",
    "Mothers_qualification",
    "Fathers_qualification",
    "Mothers_occupation",
    "Fathers_occupation",
    "Displaced",
    "Educational_special_needs",
    "Debtor",
    "Tuition_fees_up_to_date",
    "Gender",
    "Scholarship_holder",
    "International",
];

impl StudentRecord {
    /// Numeric value of a feature column, by its header name.
    pub fn value(&self, column: &str) -> Result<f64> {
        let v = match column {
            "Marital_status" => self.marital_status as f64,
            "Application_mode" => self.application_mode as f64,
            "Application_order" => self.application_order as f64,
            "Course" => self.course as f64,
            "Daytime_evening_attendance" => self.daytime_evening_attendance as f64,
            "Previous_qualification" => self.previous_qualification as f64,
            "Previous_qualification_grade" => self.previous_qualification_grade,
            "Nacionality" => self.nacionality as f64,
            "Mothers_qualification" => self.mothers_qualification as f64,
            "Fathers_qualification" => self.fathers_qualification as f64,
            "Mothers_occupation" => self.mothers_occupation as f64,
            "Fathers_occupation" => self.fathers_occupation as f64,
            "Admission_grade" => self.admission_grade,
            "Displaced" => self.displaced as f64,
            "Educational_special_needs" => self.educational_special_needs as f64,
            "Debtor" => self.debtor as f64,
            "Tuition_fees_up_to_date" => self.tuition_fees_up_to_date as f64,
            "Gender" => self.gender as f64,
            "Scholarship_holder" => self.scholarship_holder as f64,
            "Age_at_enrollment" => self.age_at_enrollment as f64,
            "International" => self.international as f64,
            "Curricular_units_1st_sem_credited" => self.units_1st_sem_credited as f64,
            "Curricular_units_1st_sem_enrolled" => self.units_1st_sem_enrolled as f64,
            "Curricular_units_1st_sem_evaluations" => self.units_1st_sem_evaluations as f64,
            "Curricular_units_1st_sem_approved" => self.units_1st_sem_approved as f64,
            "Curricular_units_1st_sem_grade" => self.units_1st_sem_grade,
            "Curricular_units_1st_sem_without_evaluations" => {
                self.units_1st_sem_without_evaluations as f64
            }
            "Curricular_units_2nd_sem_credited" => self.units_2nd_sem_credited as f64,
            "Curricular_units_2nd_sem_enrolled" => self.units_2nd_sem_enrolled as f64,
            "Curricular_units_2nd_sem_evaluations" => self.units_2nd_sem_evaluations as f64,
            "Curricular_units_2nd_sem_approved" => self.units_2nd_sem_approved as f64,
            "Curricular_units_2nd_sem_grade" => self.units_2nd_sem_grade,
            "Curricular_units_2nd_sem_without_evaluations" => {
                self.units_2nd_sem_without_evaluations as f64
            }
            "Unemployment_rate" => self.unemployment_rate,
            "Inflation_rate" => self.inflation_rate,
            "GDP" => self.gdp,
            other => return Err(DashboardError::UnknownColumn(other.to_string())),
        };
        Ok(v)
    }
}

/// Binary-coded columns that are displayed with human-readable labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DemographicFeature {
    Gender,
    DaytimeEveningAttendance,
    Displaced,
    EducationalSpecialNeeds,
    Debtor,
    ScholarshipHolder,
    International,
}

impl DemographicFeature {
    pub const ALL: [DemographicFeature; 7] = [
        DemographicFeature::Gender,
        DemographicFeature::DaytimeEveningAttendance,
        DemographicFeature::Displaced,
        DemographicFeature::EducationalSpecialNeeds,
        DemographicFeature::Debtor,
        DemographicFeature::ScholarshipHolder,
        DemographicFeature::International,
    ];

    pub fn column(&self) -> &'static str {
        match self {
            DemographicFeature::Gender => "Gender",
            DemographicFeature::DaytimeEveningAttendance => "Daytime_evening_attendance",
            DemographicFeature::Displaced => "Displaced",
            DemographicFeature::EducationalSpecialNeeds => "Educational_special_needs",
            DemographicFeature::Debtor => "Debtor",
            DemographicFeature::ScholarshipHolder => "Scholarship_holder",
            DemographicFeature::International => "International",
        }
    }

    pub fn mapping(&self) -> &'static CategoryMapping {
        match self {
            DemographicFeature::Gender => &GENDER,
            DemographicFeature::DaytimeEveningAttendance => &ATTENDANCE,
            _ => &YES_NO,
        }
    }

    pub fn code(&self, record: &StudentRecord) -> i64 {
        match self {
            DemographicFeature::Gender => record.gender,
            DemographicFeature::DaytimeEveningAttendance => record.daytime_evening_attendance,
            DemographicFeature::Displaced => record.displaced,
            DemographicFeature::EducationalSpecialNeeds => record.educational_special_needs,
            DemographicFeature::Debtor => record.debtor,
            DemographicFeature::ScholarshipHolder => record.scholarship_holder,
            DemographicFeature::International => record.international,
        }
    }

    /// Display label for the record's code; unmapped codes pass through as text.
    pub fn label(&self, record: &StudentRecord) -> Cow<'static, str> {
        let code = self.code(record);
        match self.mapping().label(code) {
            Some(label) => Cow::Borrowed(label),
            None => Cow::Owned(code.to_string()),
        }
    }
}

/// A binary-coded value that has no label in its catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualityIssue {
    pub row: usize,
    pub column: &'static str,
    pub value: i64,
}

/// The student outcomes table, loaded once and shared read-only.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<StudentRecord>,
    quality_issues: Vec<QualityIssue>,
}

impl Dataset {
    pub fn new(records: Vec<StudentRecord>) -> Self {
        let quality_issues = scan_unmapped(&records);
        Dataset {
            records,
            quality_issues,
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| DashboardError::DatasetRead {
            path: path.to_path_buf(),
            source: csv::Error::from(e),
        })?;
        let dataset = Self::from_reader(file)?;
        info!(
            path = %path.display(),
            records = dataset.len(),
            "loaded student dataset"
        );
        Ok(dataset)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(b';')
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(reader);

        let mut records = Vec::new();
        for result in rdr.deserialize() {
            let record: StudentRecord = result.map_err(|source| DashboardError::DatasetRow {
                row: source.position().map(|p| p.line()).unwrap_or(0),
                source,
            })?;
            records.push(record);
        }
        debug!(records = records.len(), "parsed student records");

        Ok(Self::new(records))
    }

    pub fn records(&self) -> &[StudentRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn quality_issues(&self) -> &[QualityIssue] {
        &self.quality_issues
    }
}

fn scan_unmapped(records: &[StudentRecord]) -> Vec<QualityIssue> {
    let mut issues = Vec::new();
    for (row, record) in records.iter().enumerate() {
        for feature in DemographicFeature::ALL {
            let value = feature.code(record);
            if feature.mapping().label(value).is_none() {
                warn!(row, column = feature.column(), value, "unmapped binary code");
                issues.push(QualityIssue {
                    row,
                    column: feature.column(),
                    value,
                });
            }
        }
    }
    issues
}
