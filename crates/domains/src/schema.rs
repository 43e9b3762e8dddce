//! # Shared schema enumerations
//!
//! Every component that accepts a department, category, priority, process
//! stage or vote type parses it through this module, so the set of allowed
//! values cannot drift between the admin surface and the voting surface.
//!
//! Canonical wire form is snake_case. `parse` is deliberately forgiving
//! about the labels the admin UI historically sent ("Work has started",
//! "pending verification") and normalizes them before matching.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

fn normalize(input: &str) -> String {
    input.trim().to_ascii_lowercase().replace([' ', '-'], "_")
}

/// Municipal department a complaint is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Department {
    Roads,
    Electricity,
    Sanitation,
    Water,
    Waste,
}

impl Department {
    pub const ALL: [Department; 5] = [
        Department::Roads,
        Department::Electricity,
        Department::Sanitation,
        Department::Water,
        Department::Waste,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Department::Roads => "roads",
            Department::Electricity => "electricity",
            Department::Sanitation => "sanitation",
            Department::Water => "water",
            Department::Waste => "waste",
        }
    }

    pub fn parse(input: &str) -> Result<Self> {
        match normalize(input).as_str() {
            "roads" | "road_safety" => Ok(Department::Roads),
            "electricity" => Ok(Department::Electricity),
            "sanitation" => Ok(Department::Sanitation),
            "water" => Ok(Department::Water),
            "waste" | "waste_management" | "solid_waste" => Ok(Department::Waste),
            other => Err(AppError::Validation(format!("unknown department '{other}'"))),
        }
    }
}

impl std::fmt::Display for Department {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Citizen-facing issue category, optional on a complaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Potholes,
    Electricity,
    Water,
    Waste,
    Parks,
    GovtBuildings,
    Bridges,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Potholes => "potholes",
            Category::Electricity => "electricity",
            Category::Water => "water",
            Category::Waste => "waste",
            Category::Parks => "parks",
            Category::GovtBuildings => "govt_buildings",
            Category::Bridges => "bridges",
        }
    }

    pub fn parse(input: &str) -> Result<Self> {
        match normalize(input).as_str() {
            "potholes" => Ok(Category::Potholes),
            "electricity" => Ok(Category::Electricity),
            "water" => Ok(Category::Water),
            "waste" | "solid_waste" => Ok(Category::Waste),
            "parks" => Ok(Category::Parks),
            "govt_buildings" => Ok(Category::GovtBuildings),
            "bridges" => Ok(Category::Bridges),
            other => Err(AppError::Validation(format!("unknown category '{other}'"))),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Urgency level, mutable by admins only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub fn parse(input: &str) -> Result<Self> {
        match normalize(input).as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(AppError::Validation(format!("unknown urgency '{other}'"))),
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Workflow position of a complaint. Ordered for display, but transitions
/// are not monotonic: admins may move a complaint backward to re-open it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessStage {
    Unassigned,
    Assigned,
    WorkStarted,
    PendingVerification,
    ComplaintSent,
}

impl ProcessStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessStage::Unassigned => "unassigned",
            ProcessStage::Assigned => "assigned",
            ProcessStage::WorkStarted => "work_started",
            ProcessStage::PendingVerification => "pending_verification",
            ProcessStage::ComplaintSent => "complaint_sent",
        }
    }

    pub fn parse(input: &str) -> Result<Self> {
        match normalize(input).as_str() {
            "unassigned" => Ok(ProcessStage::Unassigned),
            "assigned" => Ok(ProcessStage::Assigned),
            "work_started" | "work_has_started" => Ok(ProcessStage::WorkStarted),
            "pending_verification" => Ok(ProcessStage::PendingVerification),
            "complaint_sent" => Ok(ProcessStage::ComplaintSent),
            other => Err(AppError::Validation(format!("unknown process stage '{other}'"))),
        }
    }
}

impl std::fmt::Display for ProcessStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final resolution flag, distinct from the process stage. Only the
/// lifecycle machine writes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStatus {
    Unresolved,
    Resolved,
}

impl ResolutionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionStatus::Unresolved => "unresolved",
            ResolutionStatus::Resolved => "resolved",
        }
    }

    pub fn parse(input: &str) -> Result<Self> {
        match normalize(input).as_str() {
            "unresolved" => Ok(ResolutionStatus::Unresolved),
            "resolved" => Ok(ResolutionStatus::Resolved),
            other => Err(AppError::Validation(format!("unknown status '{other}'"))),
        }
    }
}

impl std::fmt::Display for ResolutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A citizen's verdict on whether a pending complaint is actually fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteType {
    Resolved,
    NotResolved,
}

impl VoteType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteType::Resolved => "resolved",
            VoteType::NotResolved => "not_resolved",
        }
    }

    pub fn parse(input: &str) -> Result<Self> {
        match normalize(input).as_str() {
            "resolved" => Ok(VoteType::Resolved),
            "not_resolved" | "unresolved" => Ok(VoteType::NotResolved),
            other => Err(AppError::Validation(format!("unknown vote type '{other}'"))),
        }
    }
}

impl std::fmt::Display for VoteType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn department_accepts_aliases() {
        assert_eq!(Department::parse("Road Safety").unwrap(), Department::Roads);
        assert_eq!(Department::parse("waste management").unwrap(), Department::Waste);
        assert_eq!(Department::parse("WATER").unwrap(), Department::Water);
    }

    #[test]
    fn department_rejects_unknown_values() {
        assert!(matches!(
            Department::parse("plumbing"),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn process_stage_accepts_admin_ui_labels() {
        assert_eq!(
            ProcessStage::parse("Work has started").unwrap(),
            ProcessStage::WorkStarted
        );
        assert_eq!(
            ProcessStage::parse("pending verification").unwrap(),
            ProcessStage::PendingVerification
        );
        assert_eq!(
            ProcessStage::parse("complaint sent").unwrap(),
            ProcessStage::ComplaintSent
        );
    }

    #[test]
    fn priority_is_case_insensitive() {
        assert_eq!(Priority::parse("LOW").unwrap(), Priority::Low);
        assert_eq!(Priority::parse("Medium").unwrap(), Priority::Medium);
        assert!(Priority::parse("critical").is_err());
    }

    #[test]
    fn wire_form_round_trips_through_serde() {
        let json = serde_json::to_string(&ProcessStage::PendingVerification).unwrap();
        assert_eq!(json, "\"pending_verification\"");
        let back: ProcessStage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ProcessStage::PendingVerification);

        assert_eq!(
            serde_json::to_string(&VoteType::NotResolved).unwrap(),
            "\"not_resolved\""
        );
    }

    #[test]
    fn canonical_strings_parse_back() {
        for department in Department::ALL {
            assert_eq!(Department::parse(department.as_str()).unwrap(), department);
        }
    }
}
