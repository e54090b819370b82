//! Turns the prediction form into the classifier's feature vector and back
//! into a displayable result.

use ndarray::{arr2, Array2};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::catalog::{COURSE, FATHERS_OCCUPATION, YES_NO};
use crate::error::{DashboardError, Result};
use crate::model::{Classifier, Outcome, FEATURE_NAMES};

pub const GRADE_RANGE: (f64, f64) = (0.0, 1000.0);
pub const AGE_RANGE: (i64, i64) = (15, 60);
pub const UNITS_RANGE: (i64, i64) = (0, 60);

const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// Raw answers from the prediction page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionForm {
    pub course: String,
    pub previous_qualification_grade: f64,
    pub admission_grade: f64,
    pub tuition_fees_up_to_date: String,
    pub age_at_enrollment: i64,
    pub scholarship_holder: String,
    pub first_sem_grade: f64,
    pub second_sem_grade: f64,
    pub first_sem_evaluations: i64,
    pub second_sem_evaluations: i64,
    pub second_sem_approved: i64,
    pub fathers_occupation: String,
}

impl Default for PredictionForm {
    fn default() -> Self {
        PredictionForm {
            course: COURSE.labels().next().unwrap_or_default().to_string(),
            previous_qualification_grade: 10.0,
            admission_grade: 10.0,
            tuition_fees_up_to_date: "Yes".to_string(),
            age_at_enrollment: 20,
            scholarship_holder: "Yes".to_string(),
            first_sem_grade: 10.0,
            second_sem_grade: 10.0,
            first_sem_evaluations: 0,
            second_sem_evaluations: 0,
            second_sem_approved: 0,
            fathers_occupation: FATHERS_OCCUPATION
                .labels()
                .next()
                .unwrap_or_default()
                .to_string(),
        }
    }
}

fn check_range(field: &'static str, value: f64, (min, max): (f64, f64)) -> Result<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(DashboardError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

fn check_count(field: &'static str, value: i64, (min, max): (i64, i64)) -> Result<()> {
    check_range(field, value as f64, (min as f64, max as f64))
}

impl PredictionForm {
    pub fn validate(&self) -> Result<()> {
        check_range(
            "Previous Qualification Grade",
            self.previous_qualification_grade,
            GRADE_RANGE,
        )?;
        check_range("Admission Grade", self.admission_grade, GRADE_RANGE)?;
        check_count("Age at Enrollment", self.age_at_enrollment, AGE_RANGE)?;
        check_range("1st Semester Grade", self.first_sem_grade, GRADE_RANGE)?;
        check_range("2nd Semester Grade", self.second_sem_grade, GRADE_RANGE)?;
        check_count(
            "1st Semester Evaluations",
            self.first_sem_evaluations,
            UNITS_RANGE,
        )?;
        check_count(
            "2nd Semester Evaluations",
            self.second_sem_evaluations,
            UNITS_RANGE,
        )?;
        check_count(
            "2nd Semester Approved Units",
            self.second_sem_approved,
            UNITS_RANGE,
        )?;
        Ok(())
    }
}

/// One row of classifier input, fields in [`FEATURE_NAMES`] order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionInput {
    #[serde(rename = "Course")]
    pub course: i64,
    #[serde(rename = "Previous_qualification_grade")]
    pub previous_qualification_grade: f64,
    #[serde(rename = "Admission_grade")]
    pub admission_grade: f64,
    #[serde(rename = "Tuition_fees_up_to_date")]
    pub tuition_fees_up_to_date: i64,
    #[serde(rename = "Age_at_enrollment")]
    pub age_at_enrollment: i64,
    #[serde(rename = "Scholarship_holder")]
    pub scholarship_holder: i64,
    #[serde(rename = "Curricular_units_1st_sem_grade")]
    pub units_1st_sem_grade: f64,
    #[serde(rename = "Curricular_units_2nd_sem_grade")]
    pub units_2nd_sem_grade: f64,
    #[serde(rename = "Curricular_units_1st_sem_evaluations")]
    pub units_1st_sem_evaluations: i64,
    #[serde(rename = "Curricular_units_2nd_sem_evaluations")]
    pub units_2nd_sem_evaluations: i64,
    #[serde(rename = "Curricular_units_2nd_sem_approved")]
    pub units_2nd_sem_approved: i64,
    #[serde(rename = "Fathers_occupation")]
    pub fathers_occupation: i64,
}

impl PredictionInput {
    pub fn from_form(form: &PredictionForm) -> Result<Self> {
        form.validate()?;
        Ok(PredictionInput {
            course: COURSE.code(&form.course)?,
            previous_qualification_grade: form.previous_qualification_grade,
            admission_grade: form.admission_grade,
            tuition_fees_up_to_date: YES_NO.code(&form.tuition_fees_up_to_date)?,
            age_at_enrollment: form.age_at_enrollment,
            scholarship_holder: YES_NO.code(&form.scholarship_holder)?,
            units_1st_sem_grade: form.first_sem_grade,
            units_2nd_sem_grade: form.second_sem_grade,
            units_1st_sem_evaluations: form.first_sem_evaluations,
            units_2nd_sem_evaluations: form.second_sem_evaluations,
            units_2nd_sem_approved: form.second_sem_approved,
            fathers_occupation: FATHERS_OCCUPATION.code(&form.fathers_occupation)?,
        })
    }

    pub fn values(&self) -> [f64; 12] {
        [
            self.course as f64,
            self.previous_qualification_grade,
            self.admission_grade,
            self.tuition_fees_up_to_date as f64,
            self.age_at_enrollment as f64,
            self.scholarship_holder as f64,
            self.units_1st_sem_grade,
            self.units_2nd_sem_grade,
            self.units_1st_sem_evaluations as f64,
            self.units_2nd_sem_evaluations as f64,
            self.units_2nd_sem_approved as f64,
            self.fathers_occupation as f64,
        ]
    }

    /// (name, value) pairs in classifier order.
    pub fn named_values(&self) -> impl Iterator<Item = (&'static str, f64)> {
        FEATURE_NAMES.into_iter().zip(self.values())
    }

    /// Single-row matrix, shape `(1, 12)`.
    pub fn to_array(&self) -> Array2<f64> {
        arr2(&[self.values()])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub outcome: Outcome,
    pub probability_graduate: f64,
    pub probability_dropout: f64,
}

impl PredictionResult {
    pub fn graduate_percent(&self) -> String {
        format!("{:.2}%", self.probability_graduate * 100.0)
    }

    pub fn dropout_percent(&self) -> String {
        format!("{:.2}%", self.probability_dropout * 100.0)
    }
}

/// Runs one form submission through the classifier.
///
/// `predict` and `predict_proba` are each called exactly once with the same
/// single-row matrix.
pub fn predict_outcome(
    classifier: &dyn Classifier,
    form: &PredictionForm,
) -> Result<PredictionResult> {
    let input = PredictionInput::from_form(form)?;
    let features = input.to_array();

    let labels = classifier.predict(&features)?;
    let proba = classifier.predict_proba(&features)?;

    if labels.len() != 1 {
        return Err(DashboardError::InvalidModelOutput(format!(
            "expected 1 label, got {}",
            labels.len()
        )));
    }
    if proba.shape() != [1usize, 2] {
        return Err(DashboardError::InvalidModelOutput(format!(
            "expected a 1x2 probability matrix, got {:?}",
            proba.shape()
        )));
    }

    let outcome = Outcome::from_label(labels[0])?;
    let probability_dropout = proba[[0, 0]];
    let probability_graduate = proba[[0, 1]];

    let in_unit = |p: f64| (0.0..=1.0).contains(&p);
    if !in_unit(probability_dropout)
        || !in_unit(probability_graduate)
        || (probability_dropout + probability_graduate - 1.0).abs() > PROBABILITY_TOLERANCE
    {
        return Err(DashboardError::InvalidModelOutput(format!(
            "probabilities [{probability_dropout}, {probability_graduate}] do not form a distribution"
        )));
    }

    info!(
        outcome = %outcome,
        probability_graduate,
        course = input.course,
        "prediction served"
    );

    Ok(PredictionResult {
        outcome,
        probability_graduate,
        probability_dropout,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_form() {
        let form = PredictionForm::default();
        assert_eq!(form.course, "Biofuel Production Technologies");
        assert_eq!(form.fathers_occupation, "Student");
        assert_eq!(form.age_at_enrollment, 20);
        assert!(form.validate().is_ok());
    }

    #[test]
    fn vector_follows_classifier_order() {
        let form = PredictionForm {
            course: "Nursing".to_string(),
            fathers_occupation: "Teachers".to_string(),
            second_sem_approved: 5,
            ..PredictionForm::default()
        };
        let input = PredictionInput::from_form(&form).unwrap();
        let names: Vec<_> = input.named_values().map(|(n, _)| n).collect();
        assert_eq!(names, FEATURE_NAMES);

        let array = input.to_array();
        assert_eq!(array.shape(), &[1usize, 12]);
        assert_eq!(array[[0, 0]], 9500.0);
        assert_eq!(array[[0, 10]], 5.0);
        assert_eq!(array[[0, 11]], 123.0);
    }

    #[test]
    fn serialized_input_uses_training_column_names() {
        let input = PredictionInput::from_form(&PredictionForm::default()).unwrap();
        let value = serde_json::to_value(&input).unwrap();
        let object = value.as_object().unwrap();
        for name in FEATURE_NAMES {
            assert!(object.contains_key(name), "{name}");
        }
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let form = PredictionForm {
            age_at_enrollment: 61,
            ..PredictionForm::default()
        };
        assert!(matches!(
            PredictionInput::from_form(&form),
            Err(DashboardError::OutOfRange {
                field: "Age at Enrollment",
                ..
            })
        ));

        let form = PredictionForm {
            admission_grade: 1000.5,
            ..PredictionForm::default()
        };
        assert!(form.validate().is_err());

        let form = PredictionForm {
            first_sem_grade: f64::NAN,
            ..PredictionForm::default()
        };
        assert!(form.validate().is_err());
    }

    #[test]
    fn unknown_choices_are_rejected() {
        let form = PredictionForm {
            tuition_fees_up_to_date: "Maybe".to_string(),
            ..PredictionForm::default()
        };
        assert!(matches!(
            PredictionInput::from_form(&form),
            Err(DashboardError::UnknownLabel { catalog: "yes/no", .. })
        ));
    }

    #[test]
    fn percentages_use_two_decimals() {
        let result = PredictionResult {
            outcome: Outcome::Graduate,
            probability_graduate: 0.83456,
            probability_dropout: 0.16544,
        };
        assert_eq!(result.graduate_percent(), "83.46%");
        assert_eq!(result.dropout_percent(), "16.54%");
    }
}
