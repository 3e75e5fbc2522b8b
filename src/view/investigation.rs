//! Investigation and quick-test renderers (`GET /investigate`)

use super::{evidence_entry, guarded_fetch, Context, Failure, Messages, Route, View};
use crate::animation::Reveal;
use crate::backend::Endpoint;
use crate::model::{EvidenceItem, Investigation};
use crate::status::CaseStatus;
use crate::text;
use crate::toast::{Toast, ToastKind};
use std::fmt;

pub const INVESTIGATION: Route = Route {
    name: "investigation",
    endpoint: Endpoint::Investigate,
    container: "investigation-result",
    loading: "investigation-loading",
    reveal: Reveal::SlideDown,
    messages: Messages {
        disconnected: "Serveur Prolog déconnecté. Veuillez réessayer lorsque la connexion sera rétablie.",
        missing_input: "Veuillez sélectionner une personne et un crime avant de lancer l'enquête.",
        backend: "Erreur lors de la consultation du moteur Prolog. Veuillez réessayer.",
        backend_toast: "Erreur lors de l'enquête",
    },
};

pub const QUICK_TEST: Route = Route {
    name: "quick-test",
    endpoint: Endpoint::Investigate,
    container: "quick-result",
    loading: "quick-loading",
    reveal: Reveal::SlideDown,
    messages: Messages {
        disconnected: "Serveur Prolog déconnecté",
        missing_input: "Veuillez sélectionner une personne et un crime",
        backend: "Erreur lors du test Prolog",
        backend_toast: "Erreur lors du test",
    },
};

#[derive(Debug, Clone)]
pub struct InvestigationView {
    pub person: String,
    pub crime: String,
    pub status: CaseStatus,
    pub evidence: Vec<EvidenceItem>,
}

impl From<Investigation> for InvestigationView {
    fn from(inv: Investigation) -> Self {
        Self {
            person: inv.person,
            crime: inv.crime,
            status: inv.status,
            evidence: inv.evidence,
        }
    }
}

impl View for InvestigationView {
    fn to_html(&self) -> String {
        let look = self.status.presentation();
        let mut html = format!(
            r#"<div class="investigation-header"><h4><i class="fas fa-search"></i> Enquête Prolog: {} - {}</h4></div>"#,
            text::display_name(&self.person),
            text::display_name(&self.crime)
        );
        html.push_str(&format!(
            r#"<div class="status-indicator-large {}"><i class="{}"></i><span>{}</span></div>"#,
            look.indicator_class, look.icon, look.label
        ));

        if !self.evidence.is_empty() {
            html.push_str(r#"<div class="evidence-section"><h5><i class="fas fa-clipboard-list"></i> Preuves Prolog:</h5><ul class="evidence-list">"#);
            for item in &self.evidence {
                html.push_str(&evidence_entry(
                    &text::normalize(&item.kind),
                    &text::normalize(&item.description),
                ));
            }
            html.push_str("</ul></div>");
        }
        html
    }

    fn toast(&self) -> Toast {
        Toast::success(format!("Enquête terminée pour {}", text::capitalize_first(&self.person)))
    }
}

impl fmt::Display for InvestigationView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let look = self.status.presentation();
        writeln!(
            f,
            "\x1b[1mEnquête Prolog: {} - {}\x1b[0m",
            text::capitalize_first(&self.person),
            text::capitalize_first(&self.crime)
        )?;
        writeln!(f, "{}{:<10}\x1b[0m", look.ansi, format!("[{}]", look.label))?;
        if !self.evidence.is_empty() {
            writeln!(f, "Preuves Prolog:")?;
            for item in &self.evidence {
                writeln!(
                    f,
                    "  • {:<14} {}",
                    text::fix_accented_text(&item.kind),
                    text::fix_accented_text(&item.description)
                )?;
            }
        }
        Ok(())
    }
}

pub fn investigate(ctx: &Context<'_>, person: &str, crime: &str) -> Result<InvestigationView, Failure> {
    guarded_fetch(ctx, &INVESTIGATION, &[("person", person), ("crime", crime)], |inv: Investigation| {
        InvestigationView::from(inv)
    })
}

/// One-line verdict, e.g. "Alice est SUSPECT"
#[derive(Debug, Clone)]
pub struct QuickTestView {
    pub person: String,
    pub status: CaseStatus,
}

impl QuickTestView {
    pub fn verdict(&self) -> String {
        format!("{} est {}", text::capitalize_first(&self.person), self.status.label())
    }

    fn message_class(&self) -> &'static str {
        match self.status {
            CaseStatus::Guilty | CaseStatus::Accomplice => "error-message",
            CaseStatus::Suspect => "",
            CaseStatus::Innocent => "success-message",
        }
    }
}

impl From<Investigation> for QuickTestView {
    fn from(inv: Investigation) -> Self {
        Self { person: inv.person, status: inv.status }
    }
}

impl View for QuickTestView {
    fn to_html(&self) -> String {
        format!(
            r#"<div class="{}" style="text-align: center; font-size: 1.1em;"><i class="{}"></i> {}</div>"#,
            self.message_class(),
            self.status.presentation().icon,
            text::normalize(&self.verdict())
        )
    }

    fn toast(&self) -> Toast {
        let kind = if self.status == CaseStatus::Innocent {
            ToastKind::Success
        } else {
            ToastKind::Error
        };
        Toast::new(kind, format!("Test rapide: {}", self.verdict()))
    }
}

impl fmt::Display for QuickTestView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}{}\x1b[0m", self.status.presentation().ansi, self.verdict())
    }
}

pub fn quick_test(ctx: &Context<'_>, person: &str, crime: &str) -> Result<QuickTestView, Failure> {
    guarded_fetch(ctx, &QUICK_TEST, &[("person", person), ("crime", crime)], |inv: Investigation| {
        QuickTestView::from(inv)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock::MockBackend;
    use crate::connectivity::ConnectionState;
    use crate::view::testing::{connected, ctx};
    use crate::view::{FailureKind, Rendered};

    const ALICE_SUSPECT: &str = r#"{"person":"alice","crime":"vol","status":"suspect",
        "evidence":[{"type":"testimony","description":"Vue prÃ¨s du coffre"}]}"#;

    // ==========================================================================
    // INVESTIGATION TESTS
    // ==========================================================================

    #[test]
    fn test_investigation_shows_label_and_evidence() {
        let backend = MockBackend::new().reply(Endpoint::Investigate, 200, ALICE_SUSPECT);
        let connection = connected();
        let view = investigate(&ctx(&backend, &connection), "alice", "vol").unwrap();
        let html = view.to_html();

        assert!(html.contains("SUSPECT"));
        assert!(html.contains("status-suspect"));
        assert!(html.contains("fas fa-search"));
        assert!(html.contains("Enquête Prolog: Alice - Vol"));
        assert_eq!(html.matches(r#"<li class="evidence-item">"#).count(), 1);
        assert!(html.contains("Vue près du coffre"));
        assert_eq!(
            backend.last_query(),
            vec![
                ("person".to_string(), "alice".to_string()),
                ("crime".to_string(), "vol".to_string()),
            ]
        );
        assert_eq!(view.toast().message, "Enquête terminée pour Alice");
    }

    #[test]
    fn test_investigation_without_evidence_has_no_section() {
        let backend = MockBackend::new().reply(
            Endpoint::Investigate,
            200,
            r#"{"person":"john","crime":"vol","status":"coupable","evidence":[]}"#,
        );
        let connection = connected();
        let html = investigate(&ctx(&backend, &connection), "john", "vol").unwrap().to_html();
        assert!(html.contains("COUPABLE"));
        assert!(html.contains("fas fa-exclamation-triangle"));
        assert!(!html.contains("evidence-section"));
    }

    #[test]
    fn test_investigation_requires_person_and_crime() {
        let backend = MockBackend::new().reply(Endpoint::Investigate, 200, ALICE_SUSPECT);
        let connection = connected();
        let failure = investigate(&ctx(&backend, &connection), "", "vol").unwrap_err();
        assert_eq!(failure.kind, FailureKind::Precondition);
        assert!(failure.message.starts_with("Veuillez sélectionner une personne et un crime"));
        assert_eq!(backend.call_count(), 0);

        let rendered = Rendered::from_outcome(&INVESTIGATION, &Err::<InvestigationView, _>(failure));
        assert_eq!(rendered.container, "investigation-result");
        assert!(rendered.html.contains("error-message"));
    }

    #[test]
    fn test_investigation_disconnected() {
        let backend = MockBackend::new().reply(Endpoint::Investigate, 200, ALICE_SUSPECT);
        let connection = ConnectionState::new();
        let failure = investigate(&ctx(&backend, &connection), "alice", "vol").unwrap_err();
        assert!(failure.message.starts_with("Serveur Prolog déconnecté."));
        assert_eq!(failure.toast.message, "Serveur déconnecté");
    }

    #[test]
    fn test_investigation_escapes_backend_text() {
        let backend = MockBackend::new().reply(
            Endpoint::Investigate,
            200,
            r#"{"person":"<b>x</b>","crime":"vol","status":"innocent",
                "evidence":[{"type":"<i>","description":"<script>"}]}"#,
        );
        let connection = connected();
        let html = investigate(&ctx(&backend, &connection), "x", "vol").unwrap().to_html();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("&lt;b&gt;x&lt;/b&gt;"));
    }

    // ==========================================================================
    // QUICK TEST TESTS
    // ==========================================================================

    #[test]
    fn test_quick_test_classes_per_status() {
        let cases = [
            ("coupable", "error-message", "Alice est COUPABLE", ToastKind::Error),
            ("complice", "error-message", "Alice est COMPLICE", ToastKind::Error),
            ("suspect", r#"class="""#, "Alice est SUSPECT", ToastKind::Error),
            ("innocent", "success-message", "Alice est INNOCENT", ToastKind::Success),
            ("bizarre", "success-message", "Alice est INNOCENT", ToastKind::Success),
        ];
        for (code, class, verdict, kind) in cases {
            let body = format!(r#"{{"person":"alice","crime":"vol","status":"{}"}}"#, code);
            let backend = MockBackend::new().reply(Endpoint::Investigate, 200, &body);
            let connection = connected();
            let view = quick_test(&ctx(&backend, &connection), "alice", "vol").unwrap();
            let html = view.to_html();
            assert!(html.contains(class), "{}: {}", code, html);
            assert!(html.contains(verdict), "{}", code);
            assert_eq!(view.toast().kind, kind, "{}", code);
            assert_eq!(view.toast().message, format!("Test rapide: {}", verdict));
        }
    }

    #[test]
    fn test_quick_test_backend_error() {
        let backend = MockBackend::new().reply(Endpoint::Investigate, 404, "{}");
        let connection = connected();
        let failure = quick_test(&ctx(&backend, &connection), "alice", "vol").unwrap_err();
        assert_eq!(failure.message, "Erreur lors du test Prolog");
        assert_eq!(failure.toast.message, "Erreur lors du test");
    }
}
