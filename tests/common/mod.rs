#![allow(dead_code)]

use std::sync::Mutex;

use ndarray::{Array1, Array2};
use student_outcomes_dashboard::{Classifier, Dataset, Result, Status, StudentRecord};

/// A first-year student with neutral values; tests override what they need.
pub fn student(course: i64, status: Status) -> StudentRecord {
    StudentRecord {
        marital_status: 1,
        application_mode: 1,
        application_order: 1,
        course,
        daytime_evening_attendance: 1,
        previous_qualification: 1,
        previous_qualification_grade: 130.0,
        nacionality: 1,
        mothers_qualification: 19,
        fathers_qualification: 12,
        mothers_occupation: 5,
        fathers_occupation: 9,
        admission_grade: 125.0,
        displaced: 1,
        educational_special_needs: 0,
        debtor: 0,
        tuition_fees_up_to_date: 1,
        gender: 0,
        scholarship_holder: 0,
        age_at_enrollment: 19,
        international: 0,
        units_1st_sem_credited: 0,
        units_1st_sem_enrolled: 6,
        units_1st_sem_evaluations: 6,
        units_1st_sem_approved: 6,
        units_1st_sem_grade: 13.0,
        units_1st_sem_without_evaluations: 0,
        units_2nd_sem_credited: 0,
        units_2nd_sem_enrolled: 6,
        units_2nd_sem_evaluations: 6,
        units_2nd_sem_approved: 6,
        units_2nd_sem_grade: 13.0,
        units_2nd_sem_without_evaluations: 0,
        unemployment_rate: 10.8,
        inflation_rate: 1.4,
        gdp: 1.74,
        status,
    }
}

/// 100 students: 40 Dropout, 50 Graduate, 10 Enrolled, spread over three
/// courses, with approved units and gender varying by outcome.
pub fn hundred_students() -> Dataset {
    let courses = [9500, 9254, 171];
    let mut records = Vec::with_capacity(100);
    for i in 0..100usize {
        let status = match i {
            0..=39 => Status::Dropout,
            40..=89 => Status::Graduate,
            _ => Status::Enrolled,
        };
        let mut r = student(courses[i % 3], status);
        r.units_2nd_sem_approved = match status {
            Status::Dropout => (i % 3) as i64,
            Status::Graduate => 5 + (i % 2) as i64,
            Status::Enrolled => 3,
        };
        r.gender = (i % 2) as i64;
        r.educational_special_needs = i64::from(i % 25 == 0);
        r.age_at_enrollment = 18 + (i % 7) as i64;
        records.push(r);
    }
    Dataset::new(records)
}

/// Classifier double that records every call and returns fixed outputs.
pub struct StubClassifier {
    pub label: usize,
    pub proba: [f64; 2],
    pub predict_calls: Mutex<Vec<Array2<f64>>>,
    pub proba_calls: Mutex<Vec<Array2<f64>>>,
}

impl StubClassifier {
    pub fn new(label: usize, proba: [f64; 2]) -> Self {
        StubClassifier {
            label,
            proba,
            predict_calls: Mutex::new(Vec::new()),
            proba_calls: Mutex::new(Vec::new()),
        }
    }
}

impl Classifier for StubClassifier {
    fn predict(&self, features: &Array2<f64>) -> Result<Array1<usize>> {
        self.predict_calls.lock().unwrap().push(features.clone());
        Ok(Array1::from_elem(features.nrows(), self.label))
    }

    fn predict_proba(&self, features: &Array2<f64>) -> Result<Array2<f64>> {
        self.proba_calls.lock().unwrap().push(features.clone());
        let mut out = Array2::zeros((features.nrows(), 2));
        for mut row in out.outer_iter_mut() {
            row[0] = self.proba[0];
            row[1] = self.proba[1];
        }
        Ok(out)
    }
}
