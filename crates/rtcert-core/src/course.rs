//! # Course Model
//!
//! A course offering ("Schulung"): a scheduled training with a robot
//! manufacturer, a course type, and a date range. Read-only from the
//! certificate subsystem's perspective — issuance never mutates a course.

use serde::{Deserialize, Serialize};

use crate::identity::CourseId;
use crate::temporal::Timestamp;

/// Robot manufacturer a course is taught for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Manufacturer {
    Kuka,
    Abb,
    Mitsubishi,
    UniversalRobots,
    Other,
}

impl Manufacturer {
    /// Display label as printed on certificates.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Kuka => "KUKA",
            Self::Abb => "ABB",
            Self::Mitsubishi => "Mitsubishi",
            Self::UniversalRobots => "Universal Robots",
            Self::Other => "Sonstige",
        }
    }
}

/// Type of training a course delivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseType {
    Fundamentals,
    Practice,
    Online,
    Other,
}

impl CourseType {
    /// Display label as printed on certificates.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Fundamentals => "Grundlagen",
            Self::Practice => "Praxis",
            Self::Online => "Online",
            Self::Other => "Sonstige",
        }
    }
}

/// A scheduled course offering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    pub manufacturer: Manufacturer,
    pub course_type: CourseType,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    /// Duration in training days, as advertised (not derived from dates —
    /// multi-week courses may not train every calendar day).
    pub duration_days: u32,
    pub location: Option<String>,
    pub trainer: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manufacturer_serde_is_snake_case() {
        let json = serde_json::to_string(&Manufacturer::UniversalRobots).unwrap();
        assert_eq!(json, "\"universal_robots\"");
    }

    #[test]
    fn course_type_labels() {
        assert_eq!(CourseType::Fundamentals.label(), "Grundlagen");
        assert_eq!(CourseType::Practice.label(), "Praxis");
    }

    #[test]
    fn manufacturer_labels() {
        assert_eq!(Manufacturer::Kuka.label(), "KUKA");
        assert_eq!(Manufacturer::UniversalRobots.label(), "Universal Robots");
    }
}
