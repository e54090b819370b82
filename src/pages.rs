//! Server-rendered HTML for the two dashboard pages.

use std::fmt::Write;

use serde::Serialize;

use crate::analytics::{DashboardView, FeatureSet};
use crate::catalog::{course_options, COURSE, FATHERS_OCCUPATION, YES_NO};
use crate::charts::{self, Figure};
use crate::error::Result;
use crate::prediction::{PredictionForm, PredictionResult, AGE_RANGE, GRADE_RANGE, UNITS_RANGE};

const TITLE: &str = "Jaya Jaya Institut Dashboard";
const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

const STYLE: &str = r#"
    body { font-family: Arial, sans-serif; margin: 0; display: flex; background: #fafafa; }
    nav { width: 230px; min-height: 100vh; background: #2c3e50; color: white; padding: 20px; box-sizing: border-box; }
    nav h2 { font-size: 18px; }
    nav a { display: block; color: #ecf0f1; text-decoration: none; padding: 10px; border-radius: 4px; margin: 4px 0; }
    nav a.active, nav a:hover { background: #34495e; }
    main { flex: 1; padding: 25px; }
    .tiles { display: grid; grid-template-columns: repeat(4, 1fr); gap: 15px; margin: 20px 0; }
    .tile { background: white; padding: 15px; border-radius: 8px; border-left: 4px solid #3498db; }
    .tile h4 { margin: 0 0 8px 0; color: #555; }
    .tile p { font-size: 26px; margin: 0; }
    .row { display: grid; grid-template-columns: repeat(3, 1fr); gap: 15px; }
    .panel { background: white; padding: 15px; border-radius: 8px; margin: 10px 0; }
    .form-group { margin: 12px 0; }
    label { display: block; margin-bottom: 5px; font-weight: bold; }
    input, select { width: 100%; padding: 8px; border: 1px solid #ddd; border-radius: 4px; box-sizing: border-box; }
    input[type=radio] { width: auto; }
    .radios label { display: inline; font-weight: normal; margin-right: 15px; }
    button { background: #3498db; color: white; padding: 12px 24px; border: none; border-radius: 4px; cursor: pointer; }
    .result { padding: 20px; border-radius: 5px; margin: 20px 0; }
    .graduate { background: #d4edda; color: #155724; border: 1px solid #c3e6cb; }
    .dropout { background: #f8d7da; color: #721c24; border: 1px solid #f5c6cb; }
    .error { background: #f8d7da; color: #721c24; border: 1px solid #f5c6cb; }
    .muted { color: #777; font-size: 13px; }
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Dashboard,
    Prediction,
}

/// Escapes text for HTML element content and quoted attribute values.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// JSON that is safe to inline inside a `<script>` element.
fn script_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?
        .replace('<', "\\u003c")
        .replace('>', "\\u003e"))
}

fn chart(id: &str, figure: &Figure) -> Result<String> {
    Ok(format!(
        r#"<div class="panel"><div id="{id}"></div></div>
<script>(function () {{ var fig = {json}; Plotly.newPlot("{id}", fig.data, fig.layout, {{responsive: true}}); }})();</script>
"#,
        id = id,
        json = script_json(figure)?,
    ))
}

fn layout(active: Page, heading: &str, body: &str) -> String {
    let link = |page: Page, href: &str, text: &str| {
        let class = if page == active { " class=\"active\"" } else { "" };
        format!(r#"<a href="{href}"{class}>{text}</a>"#)
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>{title}</title>
    <script src="{plotly}"></script>
    <style>{style}</style>
</head>
<body>
    <nav>
        <h2>{title}</h2>
        {dashboard}
        {prediction}
    </nav>
    <main>
        <h1>{heading}</h1>
        {body}
    </main>
</body>
</html>
"#,
        title = TITLE,
        plotly = PLOTLY_CDN,
        style = STYLE,
        dashboard = link(Page::Dashboard, "/", "📊 Business Dashboard"),
        prediction = link(Page::Prediction, "/predict", "🔍 Prediction Page"),
        heading = escape_html(heading),
        body = body,
    )
}

fn options<'a>(choices: impl Iterator<Item = &'a str>, selected: &str) -> String {
    choices
        .map(|choice| {
            let escaped = escape_html(choice);
            let mark = if choice == selected { " selected" } else { "" };
            format!(r#"<option value="{escaped}"{mark}>{escaped}</option>"#)
        })
        .collect()
}

fn tile(label: &str, value: &str, color: &str) -> String {
    format!(
        r#"<div class="tile" style="border-left-color: {color};"><h4>{label}</h4><p>{value}</p></div>"#
    )
}

pub fn dashboard_page(view: &DashboardView) -> Result<String> {
    let mut body = String::new();

    let m = &view.metrics;
    let _ = write!(
        body,
        r#"<h2>🎓 Overview Metrics</h2><div class="tiles">{}{}{}{}</div><hr>"#,
        tile("Total Students", &m.total_students.to_string(), "#3498db"),
        tile("Dropout Rate (%)", &m.dropout_rate_display(), "#e74c3c"),
        tile("Special Educational Needs", &m.special_needs.to_string(), "#f39c12"),
        tile("Total Graduates", &m.total_graduates.to_string(), "#2ecc71"),
    );

    let radios: String = FeatureSet::ALL
        .iter()
        .map(|set| {
            let checked = if *set == view.feature_set { " checked" } else { "" };
            format!(
                r#"<label><input type="radio" name="features" value="{}"{checked} onchange="this.form.submit()"> {}</label>"#,
                set.query_value(),
                set.label()
            )
        })
        .collect();

    let _ = write!(
        body,
        r#"<form method="get" action="/" class="panel">
    <div class="form-group">
        <label for="course">Select Course:</label>
        <select id="course" name="course" onchange="this.form.submit()">{options}</select>
    </div>
    <div class="form-group radios"><label>Correlation features:</label><br>{radios}</div>
    <noscript><button type="submit">Apply</button></noscript>
</form>"#,
        options = options(course_options(), view.course),
        radios = radios,
    );

    let _ = write!(
        body,
        "<h3>🎓 Demographic Distribution - {} ({} students)</h3>",
        escape_html(view.course),
        view.filtered_count
    );
    for (i, row) in view.demographics.chunks(3).enumerate() {
        body.push_str(r#"<div class="row">"#);
        for (j, (feature, rows)) in row.iter().enumerate() {
            let id = format!("demographic-{}", i * 3 + j);
            body.push_str(&chart(&id, &charts::demographic_bar(*feature, rows))?);
        }
        body.push_str("</div>");
    }

    body.push_str("<hr><h2>🔍 Feature Correlation with Status</h2>");
    body.push_str(&chart("correlation", &charts::correlation_bar(&view.correlations))?);
    if !view.correlations.undefined.is_empty() {
        let _ = write!(
            body,
            r#"<p class="muted">Correlation undefined (constant values): {}</p>"#,
            view.correlations.undefined.join(", ")
        );
    }

    let _ = write!(
        body,
        "<hr><h2>📊 Status Distribution - {}</h2>",
        escape_html(view.course)
    );
    body.push_str(&chart("status", &charts::status_pie(view.course, &view.distribution))?);

    Ok(layout(
        Page::Dashboard,
        "📊 Business Dashboard - Students' Performance",
        &body,
    ))
}

fn number_input(
    name: &str,
    label: &str,
    value: String,
    min: f64,
    max: f64,
    step: &str,
) -> String {
    format!(
        r#"<div class="form-group"><label for="{name}">{label}</label><input type="number" id="{name}" name="{name}" min="{min}" max="{max}" step="{step}" value="{value}" required></div>"#
    )
}

fn select_input<'a>(
    name: &str,
    label: &str,
    choices: impl Iterator<Item = &'a str>,
    selected: &str,
) -> String {
    format!(
        r#"<div class="form-group"><label for="{name}">{label}</label><select id="{name}" name="{name}">{}</select></div>"#,
        options(choices, selected)
    )
}

pub fn prediction_page(form: &PredictionForm, result: Option<&PredictionResult>) -> Result<String> {
    let grade = |name: &str, label: &str, value: f64| {
        number_input(name, label, value.to_string(), GRADE_RANGE.0, GRADE_RANGE.1, "0.1")
    };
    let count = |name: &str, label: &str, value: i64, (min, max): (i64, i64)| {
        number_input(name, label, value.to_string(), min as f64, max as f64, "1")
    };

    let fields = [
        select_input("course", "Course", COURSE.labels(), &form.course),
        grade(
            "previous_qualification_grade",
            "Previous Qualification Grade",
            form.previous_qualification_grade,
        ),
        grade("admission_grade", "Admission Grade", form.admission_grade),
        select_input(
            "tuition_fees_up_to_date",
            "Tuition Fees Up-to-date",
            YES_NO.labels(),
            &form.tuition_fees_up_to_date,
        ),
        count("age_at_enrollment", "Age at Enrollment", form.age_at_enrollment, AGE_RANGE),
        select_input(
            "scholarship_holder",
            "Scholarship Holder",
            YES_NO.labels(),
            &form.scholarship_holder,
        ),
        grade("first_sem_grade", "1st Semester Grade", form.first_sem_grade),
        grade("second_sem_grade", "2nd Semester Grade", form.second_sem_grade),
        count(
            "first_sem_evaluations",
            "1st Semester Evaluations",
            form.first_sem_evaluations,
            UNITS_RANGE,
        ),
        count(
            "second_sem_evaluations",
            "2nd Semester Evaluations",
            form.second_sem_evaluations,
            UNITS_RANGE,
        ),
        count(
            "second_sem_approved",
            "2nd Semester Approved Units",
            form.second_sem_approved,
            UNITS_RANGE,
        ),
        select_input(
            "fathers_occupation",
            "Father's Occupation",
            FATHERS_OCCUPATION.labels(),
            &form.fathers_occupation,
        ),
    ];

    let mut body = format!(
        r#"<h3>🎓 Student Information Form</h3>
<form method="post" action="/predict" class="panel">
{}
<button type="submit">Predict Status</button>
</form>"#,
        fields.concat()
    );

    if let Some(result) = result {
        let class = result.outcome.as_str().to_lowercase();
        let _ = write!(
            body,
            r#"<h3>🎯 Prediction Result</h3>
<div class="result {class}">The student is predicted to <strong>{outcome}</strong>.</div>
{pie}
<div class="panel"><strong>Confidence Level:</strong>
<ul><li>Graduate: {graduate}</li><li>Dropout: {dropout}</li></ul></div>"#,
            class = class,
            outcome = result.outcome,
            pie = chart("prediction", &charts::prediction_pie(result))?,
            graduate = result.graduate_percent(),
            dropout = result.dropout_percent(),
        );
    }

    Ok(layout(
        Page::Prediction,
        "🔍 Prediction Page - Student Dropout Prediction",
        &body,
    ))
}

pub fn error_page(message: &str) -> String {
    let body = format!(
        r#"<div class="result error"><strong>Something went wrong:</strong> {}</div>
<p><a href="/">Back to the dashboard</a> · <a href="/predict">Back to the prediction form</a></p>"#,
        escape_html(message)
    );
    layout(Page::Dashboard, "Error", &body)
}
