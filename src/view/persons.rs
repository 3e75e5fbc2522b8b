//! Persons grid (`GET /persons`)
//!
//! One card per person. The big icon shows the person's worst status across
//! all crimes; the lines below list each crime separately.

use super::{guarded_fetch, Context, Failure, Messages, Route, View};
use crate::animation::{card_delay_css, Reveal};
use crate::backend::Endpoint;
use crate::model::{PersonSummary, PersonsReply};
use crate::status::{CaseStatus, StatusCounts};
use crate::text;
use crate::toast::Toast;
use std::fmt;

pub const PERSONS: Route = Route {
    name: "persons",
    endpoint: Endpoint::Persons,
    container: "persons-grid",
    loading: "persons-loading",
    reveal: Reveal::SlideDown,
    messages: Messages {
        disconnected: "Serveur Prolog déconnecté",
        missing_input: "",
        backend: "Erreur lors du chargement des données Prolog",
        backend_toast: "Erreur de chargement",
    },
};

#[derive(Debug, Clone)]
pub struct PersonsView {
    pub persons: Vec<PersonSummary>,
}

impl From<PersonsReply> for PersonsView {
    fn from(reply: PersonsReply) -> Self {
        Self { persons: reply.persons }
    }
}

fn card(index: usize, person: &PersonSummary) -> String {
    let overall = person.aggregate_status();
    let look = overall.presentation();

    let mut lines = String::new();
    for crime in &person.crimes {
        let row = crime.status.presentation();
        lines.push_str(&format!(
            r#"<div style="margin: 8px 0; font-size: 0.9em; display: flex; align-items: center; gap: 8px; color: {}"><i class="{}"></i><strong>{}:</strong> {}</div>"#,
            row.color,
            row.icon,
            text::display_name(&crime.crime),
            row.label
        ));
    }

    format!(
        r#"<div class="person-card {}" style="animation-delay: {};"><div class="person-name">{}</div><div style="font-size: 3em; margin: 16px 0; color: {};"><i class="{}"></i></div><div style="font-weight: 600; margin-bottom: 20px; text-transform: uppercase; color: {}; font-size: 1.1em;">{}</div><div style="border-top: 1px solid rgba(0,0,0,0.1); padding-top: 16px;">{}</div></div>"#,
        overall.code(),
        card_delay_css(index),
        text::display_name(&person.name),
        look.color,
        look.icon,
        look.color,
        overall.code(),
        lines
    )
}

impl View for PersonsView {
    fn to_html(&self) -> String {
        self.persons
            .iter()
            .enumerate()
            .map(|(i, person)| card(i, person))
            .collect()
    }

    fn toast(&self) -> Toast {
        Toast::success(format!("{} personnes chargées", self.persons.len()))
    }
}

/// "1 suspect, 2 innocent", worst status first, zero counts omitted
fn tally_line(counts: &StatusCounts) -> String {
    CaseStatus::ALL
        .iter()
        .filter(|s| counts.get(**s) > 0)
        .map(|s| format!("{} {}", counts.get(*s), s.code()))
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for PersonsView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for person in &self.persons {
            let overall = person.aggregate_status();
            writeln!(
                f,
                "{}{:<10}\x1b[0m \x1b[1m{}\x1b[0m  \x1b[90m{}\x1b[0m",
                overall.presentation().ansi,
                format!("[{}]", overall.label()),
                text::capitalize_first(&person.name),
                tally_line(&person.counts())
            )?;
            for crime in &person.crimes {
                writeln!(
                    f,
                    "           {}{:<14}\x1b[0m {}",
                    crime.status.presentation().ansi,
                    text::capitalize_first(&crime.crime),
                    crime.status.label()
                )?;
            }
        }
        Ok(())
    }
}

pub fn load_persons(ctx: &Context<'_>) -> Result<PersonsView, Failure> {
    guarded_fetch(ctx, &PERSONS, &[], |reply: PersonsReply| PersonsView::from(reply))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock::MockBackend;
    use crate::connectivity::ConnectionState;
    use crate::view::testing::{connected, ctx};
    use crate::view::FailureKind;

    const TWO_PERSONS: &str = r#"{"persons":[
        {"name":"bruno","crimes":[
            {"crime":"vol","status":"innocent"},
            {"crime":"assassinat","status":"suspect"},
            {"crime":"escroquerie","status":"innocent"}]},
        {"name":"mary","crimes":[
            {"crime":"vol","status":"complice"},
            {"crime":"assassinat","status":"coupable"}]}
    ]}"#;

    #[test]
    fn test_grid_uses_worst_status_per_card() {
        let backend = MockBackend::new().reply(Endpoint::Persons, 200, TWO_PERSONS);
        let connection = connected();
        let view = load_persons(&ctx(&backend, &connection)).unwrap();
        let html = view.to_html();

        assert_eq!(html.matches(r#"<div class="person-card "#).count(), 2);
        assert!(html.contains(r#"<div class="person-card suspect" style="animation-delay: 0.0s;">"#));
        assert!(html.contains(r#"<div class="person-card coupable" style="animation-delay: 0.1s;">"#));
        assert!(html.contains("<strong>Assassinat:</strong> SUSPECT"));
        assert!(html.contains("<strong>Vol:</strong> COMPLICE"));
        assert_eq!(view.toast().message, "2 personnes chargées");
    }

    #[test]
    fn test_terminal_lines_carry_tally() {
        let backend = MockBackend::new().reply(Endpoint::Persons, 200, TWO_PERSONS);
        let connection = connected();
        let text = load_persons(&ctx(&backend, &connection)).unwrap().to_string();
        assert!(text.contains("1 suspect, 2 innocent"));
        assert!(text.contains("1 coupable, 1 complice"));
    }

    #[test]
    fn test_empty_grid() {
        let backend = MockBackend::new().reply(Endpoint::Persons, 200, r#"{"persons":[]}"#);
        let connection = connected();
        let view = load_persons(&ctx(&backend, &connection)).unwrap();
        assert_eq!(view.to_html(), "");
        assert_eq!(view.toast().message, "0 personnes chargées");
    }

    #[test]
    fn test_disconnected_grid() {
        let backend = MockBackend::new().reply(Endpoint::Persons, 200, TWO_PERSONS);
        let connection = ConnectionState::new();
        let failure = load_persons(&ctx(&backend, &connection)).unwrap_err();
        assert_eq!(failure.kind, FailureKind::Precondition);
        assert_eq!(failure.message, "Serveur Prolog déconnecté");
        assert_eq!(backend.call_count(), 0);
    }

    #[test]
    fn test_reload_replaces_content() {
        let backend = MockBackend::new().reply(Endpoint::Persons, 200, TWO_PERSONS);
        let connection = connected();
        let first = load_persons(&ctx(&backend, &connection)).unwrap().to_html();
        let second = load_persons(&ctx(&backend, &connection)).unwrap().to_html();
        assert_eq!(first, second);
    }
}
