//! Case status: the four-way guilt classification returned by the backend
//!
//! Severity order is `Innocent < Suspect < Accomplice < Guilty`, which is what
//! the derived `Ord` encodes. Aggregating a person's statuses across crimes is
//! therefore just `max`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::AddAssign;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum CaseStatus {
    #[default]
    Innocent,
    Suspect,
    Accomplice,
    Guilty,
}

/// How a status is shown: label, Font Awesome icon, colour and CSS classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Presentation {
    pub label: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    /// Class for the large status indicator (`status-guilty`, ...)
    pub indicator_class: &'static str,
    /// Class for person tags and stat cards (`guilty`, `complice`, ...)
    pub tag_class: &'static str,
    /// ANSI colour for terminal output
    pub ansi: &'static str,
}

const GUILTY: Presentation = Presentation {
    label: "COUPABLE",
    icon: "fas fa-exclamation-triangle",
    color: "#FF3B30",
    indicator_class: "status-guilty",
    tag_class: "guilty",
    ansi: "\x1b[31m",
};

const ACCOMPLICE: Presentation = Presentation {
    label: "COMPLICE",
    icon: "fas fa-handshake",
    color: "#FF9500",
    indicator_class: "status-complice",
    tag_class: "complice",
    ansi: "\x1b[38;5;208m",
};

const SUSPECT: Presentation = Presentation {
    label: "SUSPECT",
    icon: "fas fa-search",
    color: "#FF2D92",
    indicator_class: "status-suspect",
    tag_class: "suspect",
    ansi: "\x1b[35m",
};

const INNOCENT: Presentation = Presentation {
    label: "INNOCENT",
    icon: "fas fa-check-circle",
    color: "#34C759",
    indicator_class: "status-innocent",
    tag_class: "innocent",
    ansi: "\x1b[32m",
};

impl CaseStatus {
    pub const ALL: [CaseStatus; 4] = [
        CaseStatus::Guilty,
        CaseStatus::Accomplice,
        CaseStatus::Suspect,
        CaseStatus::Innocent,
    ];

    /// Parse the backend's code. Anything unrecognized is innocent.
    pub fn parse(code: &str) -> Self {
        match code.trim().to_ascii_lowercase().as_str() {
            "coupable" => CaseStatus::Guilty,
            "complice" => CaseStatus::Accomplice,
            "suspect" => CaseStatus::Suspect,
            _ => CaseStatus::Innocent,
        }
    }

    /// Wire code used by the backend
    pub fn code(self) -> &'static str {
        match self {
            CaseStatus::Guilty => "coupable",
            CaseStatus::Accomplice => "complice",
            CaseStatus::Suspect => "suspect",
            CaseStatus::Innocent => "innocent",
        }
    }

    pub fn presentation(self) -> &'static Presentation {
        match self {
            CaseStatus::Guilty => &GUILTY,
            CaseStatus::Accomplice => &ACCOMPLICE,
            CaseStatus::Suspect => &SUSPECT,
            CaseStatus::Innocent => &INNOCENT,
        }
    }

    pub fn label(self) -> &'static str {
        self.presentation().label
    }
}

/// Worst status in the collection; innocent when empty.
pub fn aggregate<I>(statuses: I) -> CaseStatus
where
    I: IntoIterator<Item = CaseStatus>,
{
    statuses.into_iter().max().unwrap_or_default()
}

/// Per-status tally for a collection of statuses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub guilty: usize,
    pub accomplice: usize,
    pub suspect: usize,
    pub innocent: usize,
}

impl StatusCounts {
    pub fn tally<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = CaseStatus>,
    {
        let mut counts = Self::default();
        for status in statuses {
            match status {
                CaseStatus::Guilty => counts.guilty += 1,
                CaseStatus::Accomplice => counts.accomplice += 1,
                CaseStatus::Suspect => counts.suspect += 1,
                CaseStatus::Innocent => counts.innocent += 1,
            }
        }
        counts
    }

    pub fn get(&self, status: CaseStatus) -> usize {
        match status {
            CaseStatus::Guilty => self.guilty,
            CaseStatus::Accomplice => self.accomplice,
            CaseStatus::Suspect => self.suspect,
            CaseStatus::Innocent => self.innocent,
        }
    }
}

impl AddAssign for StatusCounts {
    fn add_assign(&mut self, other: Self) {
        self.guilty += other.guilty;
        self.accomplice += other.accomplice;
        self.suspect += other.suspect;
        self.innocent += other.innocent;
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Serialize for CaseStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

// Null, missing (with #[serde(default)]) and unknown codes all become innocent.
impl<'de> Deserialize<'de> for CaseStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = Option::<String>::deserialize(deserializer)?;
        Ok(code.as_deref().map(CaseStatus::parse).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==========================================================================
    // PRESENTATION TABLE TESTS
    // ==========================================================================
    //
    // One row per status, shared by every renderer. Unknown values fall back
    // to innocent.
    // ==========================================================================

    #[test]
    fn test_presentation_rows() {
        let guilty = CaseStatus::parse("coupable").presentation();
        assert_eq!(guilty.label, "COUPABLE");
        assert_eq!(guilty.icon, "fas fa-exclamation-triangle");
        assert_eq!(guilty.color, "#FF3B30");

        let accomplice = CaseStatus::parse("complice").presentation();
        assert_eq!(accomplice.label, "COMPLICE");
        assert_eq!(accomplice.icon, "fas fa-handshake");
        assert_eq!(accomplice.color, "#FF9500");

        let suspect = CaseStatus::parse("suspect").presentation();
        assert_eq!(suspect.label, "SUSPECT");
        assert_eq!(suspect.icon, "fas fa-search");
        assert_eq!(suspect.color, "#FF2D92");

        let innocent = CaseStatus::parse("innocent").presentation();
        assert_eq!(innocent.label, "INNOCENT");
        assert_eq!(innocent.icon, "fas fa-check-circle");
        assert_eq!(innocent.color, "#34C759");
    }

    #[test]
    fn test_each_row_used_exactly_once() {
        let labels: Vec<&str> = CaseStatus::ALL.iter().map(|s| s.label()).collect();
        for label in ["COUPABLE", "COMPLICE", "SUSPECT", "INNOCENT"] {
            assert_eq!(labels.iter().filter(|l| **l == label).count(), 1, "{}", label);
        }
    }

    #[test]
    fn test_unknown_status_is_innocent() {
        assert_eq!(CaseStatus::parse("témoin"), CaseStatus::Innocent);
        assert_eq!(CaseStatus::parse(""), CaseStatus::Innocent);
        assert_eq!(CaseStatus::parse("COUPABLE"), CaseStatus::Guilty);
    }

    #[test]
    fn test_code_roundtrip() {
        for status in CaseStatus::ALL {
            assert_eq!(CaseStatus::parse(status.code()), status);
        }
    }

    #[test]
    fn test_deserialize_missing_null_and_unknown() {
        #[derive(Deserialize)]
        struct Payload {
            #[serde(default)]
            status: CaseStatus,
        }

        let p: Payload = serde_json::from_str(r#"{"status":"complice"}"#).unwrap();
        assert_eq!(p.status, CaseStatus::Accomplice);
        let p: Payload = serde_json::from_str(r#"{"status":null}"#).unwrap();
        assert_eq!(p.status, CaseStatus::Innocent);
        let p: Payload = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(p.status, CaseStatus::Innocent);
        let p: Payload = serde_json::from_str(r#"{"status":"inconnu"}"#).unwrap();
        assert_eq!(p.status, CaseStatus::Innocent);
    }

    // ==========================================================================
    // AGGREGATION TESTS
    // ==========================================================================

    #[test]
    fn test_aggregate_worst_case() {
        use CaseStatus::*;
        assert_eq!(aggregate([Innocent, Suspect, Innocent]), Suspect);
        assert_eq!(aggregate([Suspect, Accomplice]), Accomplice);
        assert_eq!(aggregate([Accomplice, Guilty, Suspect]), Guilty);
        assert_eq!(aggregate([Innocent]), Innocent);
    }

    #[test]
    fn test_aggregate_matches_max_for_all_pairs() {
        for a in CaseStatus::ALL {
            for b in CaseStatus::ALL {
                let agg = aggregate([a, b]);
                assert!(agg >= a && agg >= b);
                assert!(agg == a || agg == b);
            }
        }
    }

    #[test]
    fn test_aggregate_empty_is_innocent() {
        assert_eq!(aggregate(Vec::new()), CaseStatus::Innocent);
    }

    #[test]
    fn test_status_counts() {
        use CaseStatus::*;
        let mut counts = StatusCounts::tally([Guilty, Innocent, Innocent, Suspect]);
        assert_eq!(counts, StatusCounts { guilty: 1, accomplice: 0, suspect: 1, innocent: 2 });
        counts += StatusCounts { guilty: 0, accomplice: 2, suspect: 0, innocent: 1 };
        assert_eq!(counts.get(Guilty), 1);
        assert_eq!(counts.get(Accomplice), 2);
        assert_eq!(counts.get(Suspect), 1);
        assert_eq!(counts.get(Innocent), 3);
    }
}
