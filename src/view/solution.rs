//! Final solution (`GET /full-analysis`)
//!
//! Lists every crime with its guilty parties, accomplices, remaining suspects
//! and cleared innocents, then a statistics block whose four counters count
//! up from zero once the fragment is shown.

use super::{guarded_fetch, Context, Failure, Messages, Route, StatCounter, View};
use crate::animation::Reveal;
use crate::backend::Endpoint;
use crate::model::{CrimeAnalysis, FullAnalysisReply};
use crate::status::{CaseStatus, StatusCounts};
use crate::text;
use crate::toast::Toast;
use std::fmt;

pub const FINAL_SOLUTION: Route = Route {
    name: "solution",
    endpoint: Endpoint::FullAnalysis,
    container: "final-solution",
    loading: "reveal-loading",
    reveal: Reveal::FadeIn,
    messages: Messages {
        disconnected: "Serveur Prolog déconnecté",
        missing_input: "",
        backend: "Erreur lors du calcul de la solution finale",
        backend_toast: "Erreur lors du calcul",
    },
};

/// (status, section class, heading, stat label, stat card id)
const SECTIONS: [(CaseStatus, &str, &str, &str, &str); 4] = [
    (CaseStatus::Guilty, "guilty-section", "COUPABLES PRINCIPAUX", "Coupables", "stat-guilty"),
    (CaseStatus::Accomplice, "accomplice-section", "COMPLICES", "Complices", "stat-complice"),
    (CaseStatus::Suspect, "suspect-section", "SUSPECTS RESTANTS", "Suspects", "stat-suspect"),
    (CaseStatus::Innocent, "innocent-section", "INNOCENTS", "Innocents", "stat-innocent"),
];

#[derive(Debug, Clone)]
pub struct SolutionView {
    pub crimes: Vec<CrimeAnalysis>,
}

impl From<FullAnalysisReply> for SolutionView {
    fn from(reply: FullAnalysisReply) -> Self {
        Self { crimes: reply.crimes }
    }
}

impl SolutionView {
    /// People per status, summed over all crimes
    pub fn totals(&self) -> StatusCounts {
        self.crimes.iter().fold(StatusCounts::default(), |mut acc, crime| {
            acc += crime.counts();
            acc
        })
    }
}

/// Person tags for one status within one crime, each with its own note
fn tags(crime: &CrimeAnalysis, status: CaseStatus) -> Vec<(String, Option<String>)> {
    let plain = |names: &[String]| -> Vec<(String, Option<String>)> {
        names.iter().map(|n| (n.clone(), None)).collect()
    };
    match status {
        CaseStatus::Guilty => plain(&crime.guilty),
        CaseStatus::Accomplice => crime
            .accomplices
            .iter()
            .map(|a| (a.accomplice.clone(), Some(format!("complice de {}", a.main_criminal))))
            .collect(),
        CaseStatus::Suspect => plain(&crime.suspects),
        CaseStatus::Innocent => plain(&crime.innocents),
    }
}

fn crime_block(crime: &CrimeAnalysis) -> String {
    let mut html = format!(
        r#"<div class="crime-analysis"><div class="crime-title"><i class="fas fa-balance-scale"></i> {}</div>"#,
        text::normalize(&text::fix_accented_text(&crime.crime).to_uppercase())
    );

    for (status, section, heading, _, _) in SECTIONS {
        let people = tags(crime, status);
        if people.is_empty() {
            continue;
        }
        let look = status.presentation();
        html.push_str(&format!(
            r#"<div class="status-section {}"><h5><i class="{}"></i> {}</h5><div class="person-list">"#,
            section, look.icon, heading
        ));
        for (name, note) in people {
            html.push_str(&format!(
                r#"<div class="person-tag {}"><i class="{}"></i> {}"#,
                look.tag_class,
                look.icon,
                text::display_name(&name)
            ));
            if let Some(note) = note {
                html.push_str(&format!("<small>({})</small>", text::normalize(&note)));
            }
            html.push_str("</div>");
        }
        html.push_str("</div></div>");
    }

    if crime.is_empty() {
        html.push_str(&super::empty_notice(
            "fas fa-question-circle",
            "Aucun résultat spécifique identifié par Prolog pour ce crime.",
        ));
    }

    html.push_str("</div>");
    html
}

impl View for SolutionView {
    fn to_html(&self) -> String {
        let mut html = String::from(r#"<div class="solution-container">"#);
        for crime in &self.crimes {
            html.push_str(&crime_block(crime));
        }

        let totals = self.totals();
        html.push_str(r#"<div class="solution-summary"><h3><i class="fas fa-chart-bar"></i> Résumé Statistique</h3><div class="stats-grid">"#);
        for (status, _, _, label, id) in SECTIONS {
            let look = status.presentation();
            html.push_str(&format!(
                r#"<div class="stat-card stat-{}"><div class="stat-icon"><i class="{}"></i></div><div class="stat-number" id="{}" data-target="{}">{}</div><div class="stat-label">{}</div></div>"#,
                look.tag_class,
                look.icon,
                id,
                totals.get(status),
                totals.get(status),
                label
            ));
        }
        html.push_str("</div></div></div>");
        html
    }

    fn toast(&self) -> Toast {
        Toast::success("Solution finale révélée")
    }

    fn counters(&self) -> Vec<StatCounter> {
        let totals = self.totals();
        SECTIONS
            .iter()
            .map(|(status, _, _, label, id)| StatCounter::new(*id, *label, totals.get(*status)))
            .collect()
    }
}

impl fmt::Display for SolutionView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for crime in &self.crimes {
            writeln!(f, "\x1b[1m⚖ {}\x1b[0m", text::fix_accented_text(&crime.crime).to_uppercase())?;
            if crime.is_empty() {
                writeln!(f, "  \x1b[90mAucun résultat spécifique identifié par Prolog pour ce crime.\x1b[0m")?;
                continue;
            }
            for (status, _, heading, _, _) in SECTIONS {
                let people = tags(crime, status);
                if people.is_empty() {
                    continue;
                }
                let names: Vec<String> = people
                    .into_iter()
                    .map(|(name, note)| match note {
                        Some(note) => format!("{} ({})", text::capitalize_first(&name), note),
                        None => text::capitalize_first(&name),
                    })
                    .collect();
                writeln!(
                    f,
                    "  {}{:<22}\x1b[0m {}",
                    status.presentation().ansi,
                    heading,
                    names.join(", ")
                )?;
            }
        }
        Ok(())
    }
}

pub fn reveal_final_solution(ctx: &Context<'_>) -> Result<SolutionView, Failure> {
    guarded_fetch(ctx, &FINAL_SOLUTION, &[], |reply: FullAnalysisReply| SolutionView::from(reply))
}
