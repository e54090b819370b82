mod common;

use student_outcomes_dashboard::model::FEATURE_NAMES;
use student_outcomes_dashboard::{
    predict_outcome, Classifier, DashboardError, LogisticModel, Outcome, PredictionForm,
};

use common::StubClassifier;

fn bundled_model() -> LogisticModel {
    LogisticModel::load(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/model/dropout_model.json"
    ))
    .unwrap()
}

#[test]
fn form_encodes_choices_and_passes_numbers_through() {
    let stub = StubClassifier::new(1, [0.3, 0.7]);
    let form = PredictionForm {
        course: "Tourism".to_string(),
        previous_qualification_grade: 133.1,
        admission_grade: 127.4,
        tuition_fees_up_to_date: "Yes".to_string(),
        scholarship_holder: "No".to_string(),
        age_at_enrollment: 20,
        first_sem_grade: 12.5,
        second_sem_grade: 13.25,
        first_sem_evaluations: 8,
        second_sem_evaluations: 7,
        second_sem_approved: 6,
        fathers_occupation: "Unskilled Workers".to_string(),
    };

    let result = predict_outcome(&stub, &form).unwrap();
    assert_eq!(result.outcome, Outcome::Graduate);

    let calls = stub.predict_calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(stub.proba_calls.lock().unwrap().len(), 1);

    let row = calls[0].row(0).to_vec();
    assert_eq!(row.len(), FEATURE_NAMES.len());
    assert_eq!(
        row,
        vec![9254.0, 133.1, 127.4, 1.0, 20.0, 0.0, 12.5, 13.25, 8.0, 7.0, 6.0, 9.0]
    );
    assert_eq!(stub.proba_calls.lock().unwrap()[0], calls[0]);
}

#[test]
fn result_carries_both_probabilities() {
    let stub = StubClassifier::new(0, [0.81, 0.19]);
    let result = predict_outcome(&stub, &PredictionForm::default()).unwrap();

    assert_eq!(result.outcome, Outcome::Dropout);
    assert_eq!(result.dropout_percent(), "81.00%");
    assert_eq!(result.graduate_percent(), "19.00%");
    assert!((result.probability_graduate + result.probability_dropout - 1.0).abs() < 1e-6);
}

#[test]
fn invalid_classifier_output_is_reported() {
    let cases = [
        StubClassifier::new(2, [0.5, 0.5]),
        StubClassifier::new(1, [0.6, 0.6]),
        StubClassifier::new(1, [-0.2, 1.2]),
    ];
    for stub in &cases {
        let err = predict_outcome(stub, &PredictionForm::default()).unwrap_err();
        assert!(
            matches!(err, DashboardError::InvalidModelOutput(_)),
            "{err}"
        );
    }
}

#[test]
fn invalid_form_never_reaches_the_classifier() {
    let stub = StubClassifier::new(1, [0.2, 0.8]);
    let form = PredictionForm {
        second_sem_approved: -1,
        ..PredictionForm::default()
    };
    let err = predict_outcome(&stub, &form).unwrap_err();
    assert!(err.is_user_error());
    assert!(stub.predict_calls.lock().unwrap().is_empty());
    assert!(stub.proba_calls.lock().unwrap().is_empty());
}

#[test]
fn bundled_model_gives_a_distribution() {
    let model = bundled_model();
    let result = predict_outcome(&model, &PredictionForm::default()).unwrap();
    assert!((result.probability_graduate + result.probability_dropout - 1.0).abs() < 1e-6);
    assert!((0.0..=1.0).contains(&result.probability_graduate));
}

#[test]
fn bundled_model_favours_students_who_pass_units() {
    let model = bundled_model();
    let struggling = PredictionForm {
        course: "Management".to_string(),
        admission_grade: 110.0,
        previous_qualification_grade: 115.0,
        tuition_fees_up_to_date: "No".to_string(),
        scholarship_holder: "No".to_string(),
        age_at_enrollment: 34,
        first_sem_grade: 0.0,
        second_sem_grade: 0.0,
        first_sem_evaluations: 3,
        second_sem_evaluations: 2,
        second_sem_approved: 0,
        ..PredictionForm::default()
    };
    let thriving = PredictionForm {
        course: "Nursing".to_string(),
        admission_grade: 150.0,
        previous_qualification_grade: 150.0,
        tuition_fees_up_to_date: "Yes".to_string(),
        scholarship_holder: "Yes".to_string(),
        age_at_enrollment: 19,
        first_sem_grade: 14.5,
        second_sem_grade: 14.0,
        first_sem_evaluations: 8,
        second_sem_evaluations: 8,
        second_sem_approved: 8,
        ..PredictionForm::default()
    };

    let low = predict_outcome(&model, &struggling).unwrap();
    let high = predict_outcome(&model, &thriving).unwrap();
    assert_eq!(low.outcome, Outcome::Dropout);
    assert_eq!(high.outcome, Outcome::Graduate);
    assert!(high.probability_graduate > low.probability_graduate);
}

#[test]
fn classifier_is_object_safe() {
    let boxed: Box<dyn Classifier> = Box::new(bundled_model());
    assert!(predict_outcome(boxed.as_ref(), &PredictionForm::default()).is_ok());
}
