//! Backend payloads and the fixed roster
//!
//! Payload structs mirror the backend JSON. Lists default to empty so a
//! backend that omits a key renders as "nothing found" instead of failing.

use crate::status::{self, CaseStatus, StatusCounts};
use crate::text;
use serde::{Deserialize, Serialize};

/// The people that can be picked in the selectors
pub const PERSONS: [&str; 8] = ["john", "mary", "alice", "bruno", "sophie", "pierre", "claire", "lucas"];

/// The crimes known to the knowledge base
pub const CRIMES: [&str; 3] = ["assassinat", "vol", "escroquerie"];

pub const PERSON_SELECTORS: [&str; 3] = ["suspect-person", "quick-person", "evidence-person"];
pub const CRIME_SELECTORS: [&str; 3] = ["suspect-crime", "quick-crime", "evidence-crime"];

fn options(placeholder: &str, values: &[&str]) -> String {
    let mut html = format!(r#"<option value="">{}</option>"#, placeholder);
    for value in values {
        html.push_str(&format!(
            r#"<option value="{}">{}</option>"#,
            text::escape_html(value),
            text::display_name(value)
        ));
    }
    html
}

pub fn person_options() -> String {
    options("Choisir une personne...", &PERSONS)
}

pub fn crime_options() -> String {
    options("Choisir un crime...", &CRIMES)
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EvidenceItem {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub description: String,
}

/// One line of `/evidence?crime=`. The backend nests the evidence under
/// `evidence`; a flat `{person, type, description}` is accepted too.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CrimeEvidenceItem {
    pub person: String,
    #[serde(flatten)]
    body: EvidenceBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
enum EvidenceBody {
    Nested { evidence: EvidenceItem },
    Flat(EvidenceItem),
}

impl CrimeEvidenceItem {
    pub fn evidence(&self) -> &EvidenceItem {
        match &self.body {
            EvidenceBody::Nested { evidence } => evidence,
            EvidenceBody::Flat(evidence) => evidence,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Investigation {
    pub person: String,
    pub crime: String,
    #[serde(default)]
    pub status: CaseStatus,
    #[serde(default)]
    pub evidence: Vec<EvidenceItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CrimeStatus {
    pub crime: String,
    #[serde(default)]
    pub status: CaseStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PersonSummary {
    pub name: String,
    #[serde(default)]
    pub crimes: Vec<CrimeStatus>,
}

impl PersonSummary {
    /// Worst status across this person's crimes
    pub fn aggregate_status(&self) -> CaseStatus {
        status::aggregate(self.crimes.iter().map(|c| c.status))
    }

    pub fn counts(&self) -> StatusCounts {
        StatusCounts::tally(self.crimes.iter().map(|c| c.status))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PersonsReply {
    #[serde(default)]
    pub persons: Vec<PersonSummary>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EvidenceReply {
    #[serde(default)]
    pub evidence: Vec<EvidenceItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CrimeEvidenceReply {
    #[serde(default)]
    pub evidence: Vec<CrimeEvidenceItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Accomplice {
    pub accomplice: String,
    pub main_criminal: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CrimeAnalysis {
    pub crime: String,
    #[serde(default)]
    pub guilty: Vec<String>,
    #[serde(default)]
    pub accomplices: Vec<Accomplice>,
    #[serde(default)]
    pub suspects: Vec<String>,
    #[serde(default)]
    pub innocents: Vec<String>,
}

impl CrimeAnalysis {
    pub fn is_empty(&self) -> bool {
        self.guilty.is_empty()
            && self.accomplices.is_empty()
            && self.suspects.is_empty()
            && self.innocents.is_empty()
    }

    pub fn counts(&self) -> StatusCounts {
        StatusCounts {
            guilty: self.guilty.len(),
            accomplice: self.accomplices.len(),
            suspect: self.suspects.len(),
            innocent: self.innocents.len(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FullAnalysisReply {
    #[serde(default)]
    pub crimes: Vec<CrimeAnalysis>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster() {
        assert_eq!(PERSONS.len(), 8);
        let html = person_options();
        assert!(html.starts_with(r#"<option value="">Choisir une personne...</option>"#));
        assert!(html.contains(r#"<option value="alice">Alice</option>"#));
        assert_eq!(html.matches("<option").count(), 9);
        assert!(crime_options().contains(r#"<option value="vol">Vol</option>"#));
    }

    #[test]
    fn test_investigation_payload() {
        let inv: Investigation = serde_json::from_str(
            r#"{"person":"alice","crime":"vol","status":"suspect",
                "evidence":[{"type":"testimony","description":"vue près du coffre"}]}"#,
        )
        .unwrap();
        assert_eq!(inv.status, CaseStatus::Suspect);
        assert_eq!(inv.evidence.len(), 1);
        assert_eq!(inv.evidence[0].kind, "testimony");
    }

    #[test]
    fn test_crime_evidence_nested_and_flat() {
        let reply: CrimeEvidenceReply = serde_json::from_str(
            r#"{"evidence":[
                {"person":"john","evidence":{"type":"empreinte","description":"sur la vitre"}},
                {"person":"mary","type":"alibi","description":"au cinéma"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(reply.evidence.len(), 2);
        assert_eq!(reply.evidence[0].person, "john");
        assert_eq!(reply.evidence[0].evidence().kind, "empreinte");
        assert_eq!(reply.evidence[1].evidence().description, "au cinéma");
    }

    #[test]
    fn test_person_summary_aggregate() {
        let person: PersonSummary = serde_json::from_str(
            r#"{"name":"bruno","crimes":[
                {"crime":"vol","status":"innocent"},
                {"crime":"assassinat","status":"suspect"},
                {"crime":"escroquerie","status":"innocent"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(person.aggregate_status(), CaseStatus::Suspect);
        assert_eq!(person.counts().innocent, 2);
    }

    #[test]
    fn test_crime_analysis_defaults() {
        let analysis: CrimeAnalysis = serde_json::from_str(r#"{"crime":"vol"}"#).unwrap();
        assert!(analysis.is_empty());
        assert_eq!(analysis.counts(), StatusCounts::default());
    }
}
