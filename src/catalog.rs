//! Static code/label catalogs for the categorical columns shown in the UI.

use crate::error::{DashboardError, Result};

/// Sentinel course selection that disables the course filter.
pub const ALL_STUDENTS: &str = "All Students";

/// Fixed bijection between integer codes and display labels.
#[derive(Debug, Clone, Copy)]
pub struct CategoryMapping {
    name: &'static str,
    entries: &'static [(i64, &'static str)],
}

impl CategoryMapping {
    pub const fn new(name: &'static str, entries: &'static [(i64, &'static str)]) -> Self {
        CategoryMapping { name, entries }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn entries(&self) -> &'static [(i64, &'static str)] {
        self.entries
    }

    /// Display labels in catalog order.
    pub fn labels(&self) -> impl Iterator<Item = &'static str> {
        self.entries.iter().map(|&(_, label)| label)
    }

    pub fn label(&self, code: i64) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|&&(c, _)| c == code)
            .map(|&(_, label)| label)
    }

    /// Reverse lookup. A miss means the UI and the catalog are out of sync.
    pub fn code(&self, label: &str) -> Result<i64> {
        self.entry(label).map(|(code, _)| code)
    }

    /// Catalog entry for a display label, with the label borrowed from the catalog.
    pub fn entry(&self, label: &str) -> Result<(i64, &'static str)> {
        self.entries
            .iter()
            .find(|&&(_, l)| l == label)
            .copied()
            .ok_or_else(|| DashboardError::UnknownLabel {
                catalog: self.name,
                label: label.to_string(),
            })
    }
}

pub static GENDER: CategoryMapping = CategoryMapping::new("gender", &[(1, "Male"), (0, "Female")]);

pub static ATTENDANCE: CategoryMapping =
    CategoryMapping::new("attendance", &[(1, "Daytime"), (0, "Evening")]);

pub static YES_NO: CategoryMapping = CategoryMapping::new("yes/no", &[(1, "Yes"), (0, "No")]);

pub static COURSE: CategoryMapping = CategoryMapping::new(
    "course",
    &[
        (33, "Biofuel Production Technologies"),
        (171, "Animation and Multimedia Design"),
        (8014, "Social Service (evening attendance)"),
        (9003, "Agronomy"),
        (9070, "Communication Design"),
        (9085, "Veterinary Nursing"),
        (9119, "Informatics Engineering"),
        (9130, "Equinculture"),
        (9147, "Management"),
        (9238, "Social Service"),
        (9254, "Tourism"),
        (9500, "Nursing"),
        (9556, "Oral Hygiene"),
        (9670, "Advertising and Marketing Management"),
        (9773, "Journalism and Communication"),
        (9853, "Basic Education"),
        (9991, "Management (evening attendance)"),
    ],
);

pub static FATHERS_OCCUPATION: CategoryMapping = CategoryMapping::new(
    "father's occupation",
    &[
        (0, "Student"),
        (1, "Representatives of the Legislative Power and Executive Bodies, Directors, Directors and Executive Managers"),
        (2, "Specialists in Intellectual and Scientific Activities"),
        (3, "Intermediate Level Technicians and Professions"),
        (4, "Administrative staff"),
        (5, "Personal Services, Security and Safety Workers and Sellers"),
        (6, "Farmers and Skilled Workers in Agriculture, Fisheries and Forestry"),
        (7, "Skilled Workers in Industry, Construction and Craftsmen"),
        (8, "Installation and Machine Operators and Assembly Workers"),
        (9, "Unskilled Workers"),
        (10, "Armed Forces Professions"),
        (90, "Other Situation"),
        (99, "(blank)"),
        (101, "Armed Forces Officers"),
        (102, "Armed Forces Sergeants"),
        (103, "Other Armed Forces personnel"),
        (112, "Directors of administrative and commercial services"),
        (114, "Hotel, catering, trade and other services directors"),
        (121, "Specialists in the physical sciences, mathematics, engineering and related techniques"),
        (122, "Health professionals"),
        (123, "Teachers"),
        (124, "Specialists in finance, accounting, administrative organization, public and commercial relations"),
        (131, "Intermediate level science and engineering technicians and professions"),
        (132, "Technicians and professionals, of intermediate level of health"),
        (134, "Intermediate level technicians from legal, social, sports, cultural and similar services"),
        (135, "Information and communication technology technicians"),
        (141, "Office workers, secretaries in general and data processing operators"),
        (143, "Data, accounting, statistical, financial services and registry-related operators"),
        (144, "Other administrative support staff"),
        (151, "Personal service workers"),
        (152, "Sellers"),
        (153, "Personal care workers and the like"),
        (154, "Protection and security services personnel"),
        (161, "Market-oriented farmers and skilled agricultural and animal production workers"),
        (163, "Farmers, livestock keepers, fishermen, hunters and gatherers, subsistence"),
        (171, "Skilled construction workers and the like, except electricians"),
        (172, "Skilled workers in metallurgy, metalworking and similar"),
        (174, "Skilled workers in electricity and electronics"),
        (175, "Workers in food processing, woodworking, clothing and other industries and crafts"),
        (181, "Fixed plant and machine operators"),
        (182, "Assembly workers"),
        (183, "Vehicle drivers and mobile equipment operators"),
        (192, "Unskilled workers in agriculture, animal production, fisheries and forestry"),
        (193, "Unskilled workers in extractive industry, construction, manufacturing and transport"),
        (194, "Meal preparation assistants"),
        (195, "Street vendors (except food) and street service providers"),
    ],
);

/// Course names offered by the dashboard selector, sentinel first.
pub fn course_options() -> impl Iterator<Item = &'static str> {
    std::iter::once(ALL_STUDENTS).chain(COURSE.labels())
}
