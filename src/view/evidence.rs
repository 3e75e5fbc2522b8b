//! Evidence listings (`GET /evidence?person=` and `GET /evidence?crime=`)

use super::{empty_notice, evidence_entry, guarded_fetch, Context, Failure, Messages, Route, View};
use crate::animation::Reveal;
use crate::backend::Endpoint;
use crate::model::{CrimeEvidenceItem, CrimeEvidenceReply, EvidenceItem, EvidenceReply};
use crate::text;
use crate::toast::Toast;
use std::fmt;

pub const PERSON_EVIDENCE: Route = Route {
    name: "person-evidence",
    endpoint: Endpoint::Evidence,
    container: "person-evidence-result",
    loading: "person-evidence-loading",
    reveal: Reveal::SlideDown,
    messages: Messages {
        disconnected: "Serveur Prolog déconnecté",
        missing_input: "Veuillez sélectionner une personne",
        backend: "Erreur lors du chargement des indices",
        backend_toast: "Erreur de chargement des indices",
    },
};

pub const CRIME_EVIDENCE: Route = Route {
    name: "crime-evidence",
    endpoint: Endpoint::Evidence,
    container: "crime-evidence-result",
    loading: "crime-evidence-loading",
    reveal: Reveal::SlideDown,
    messages: Messages {
        disconnected: "Serveur Prolog déconnecté",
        missing_input: "Veuillez sélectionner un crime",
        backend: "Erreur lors du chargement des indices",
        backend_toast: "Erreur de chargement des indices",
    },
};

fn header(subject: &str) -> String {
    format!(
        r#"<div class="evidence-header"><h4><i class="fas fa-clipboard-list"></i> Indices Prolog - {}</h4></div>"#,
        text::display_name(subject)
    )
}

#[derive(Debug, Clone)]
pub struct PersonEvidenceView {
    pub person: String,
    pub evidence: Vec<EvidenceItem>,
}

impl View for PersonEvidenceView {
    fn to_html(&self) -> String {
        let mut html = header(&self.person);
        if self.evidence.is_empty() {
            html.push_str(&empty_notice(
                "fas fa-search",
                "Aucun indice spécifique trouvé pour cette personne.",
            ));
            return html;
        }
        html.push_str(r#"<ul class="evidence-list">"#);
        for item in &self.evidence {
            html.push_str(&evidence_entry(
                &text::normalize(&item.kind),
                &text::normalize(&item.description),
            ));
        }
        html.push_str("</ul>");
        html
    }

    fn toast(&self) -> Toast {
        Toast::success(format!("Indices chargés pour {}", text::capitalize_first(&self.person)))
    }
}

impl fmt::Display for PersonEvidenceView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\x1b[1mIndices Prolog - {}\x1b[0m", text::capitalize_first(&self.person))?;
        if self.evidence.is_empty() {
            return writeln!(f, "\x1b[90mAucun indice spécifique trouvé pour cette personne.\x1b[0m");
        }
        for item in &self.evidence {
            writeln!(
                f,
                "  • {:<14} {}",
                text::fix_accented_text(&item.kind),
                text::fix_accented_text(&item.description)
            )?;
        }
        Ok(())
    }
}

pub fn load_person_evidence(ctx: &Context<'_>, person: &str) -> Result<PersonEvidenceView, Failure> {
    guarded_fetch(ctx, &PERSON_EVIDENCE, &[("person", person)], |reply: EvidenceReply| {
        PersonEvidenceView { person: person.trim().to_string(), evidence: reply.evidence }
    })
}

#[derive(Debug, Clone)]
pub struct CrimeEvidenceView {
    pub crime: String,
    pub evidence: Vec<CrimeEvidenceItem>,
}

impl View for CrimeEvidenceView {
    fn to_html(&self) -> String {
        let mut html = header(&self.crime);
        if self.evidence.is_empty() {
            html.push_str(&empty_notice("fas fa-search", "Aucun indice trouvé pour ce crime."));
            return html;
        }
        html.push_str(r#"<ul class="evidence-list">"#);
        for item in &self.evidence {
            let evidence = item.evidence();
            html.push_str(&evidence_entry(
                &format!(r#"<i class="fas fa-user"></i> {}"#, text::display_name(&item.person)),
                &format!(
                    r#"{} <span style="color: #007AFF; font-weight: 500;">({})</span>"#,
                    text::normalize(&evidence.description),
                    text::normalize(&evidence.kind)
                ),
            ));
        }
        html.push_str("</ul>");
        html
    }

    fn toast(&self) -> Toast {
        Toast::success(format!("Indices chargés pour {}", text::capitalize_first(&self.crime)))
    }
}

impl fmt::Display for CrimeEvidenceView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\x1b[1mIndices Prolog - {}\x1b[0m", text::capitalize_first(&self.crime))?;
        if self.evidence.is_empty() {
            return writeln!(f, "\x1b[90mAucun indice trouvé pour ce crime.\x1b[0m");
        }
        for item in &self.evidence {
            let evidence = item.evidence();
            writeln!(
                f,
                "  • {:<10} {} \x1b[34m({})\x1b[0m",
                text::capitalize_first(&item.person),
                text::fix_accented_text(&evidence.description),
                text::fix_accented_text(&evidence.kind)
            )?;
        }
        Ok(())
    }
}

pub fn load_crime_evidence(ctx: &Context<'_>, crime: &str) -> Result<CrimeEvidenceView, Failure> {
    guarded_fetch(ctx, &CRIME_EVIDENCE, &[("crime", crime)], |reply: CrimeEvidenceReply| {
        CrimeEvidenceView { crime: crime.trim().to_string(), evidence: reply.evidence }
    })
}
