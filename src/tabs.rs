//! Single-page tab switching
//!
//! Exactly one tab is active at a time. Activating a tab returns what the page
//! has to do next: the staggered entrance delays for its cards and, for the
//! suspects view, a deferred reload of the persons grid.

use crate::animation::stagger_delay;
use crate::error::{Error, Result};
use serde::Serialize;
use std::time::Duration;

/// Delay before the persons grid reloads when the suspects tab opens
pub const PERSONS_RELOAD_DELAY: Duration = Duration::from_millis(200);

pub const SUSPECTS_TAB: &str = "suspects";

/// Upper bound on staggered cards per panel; larger counts are clamped
pub const MAX_CARDS: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub name: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
}

pub const DEFAULT_TABS: [Tab; 4] = [
    Tab { name: "investigation", label: "Enquête", icon: "fas fa-search" },
    Tab { name: SUSPECTS_TAB, label: "Suspects", icon: "fas fa-users" },
    Tab { name: "evidence", label: "Indices", icon: "fas fa-clipboard-list" },
    Tab { name: "solution", label: "Solution finale", icon: "fas fa-balance-scale" },
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Activation {
    pub tab: &'static str,
    pub previous: &'static str,
    /// Entrance delay for each card in the panel, in milliseconds
    pub card_delays_ms: Vec<u64>,
    /// When set, reload the persons grid after this many milliseconds
    pub reload_persons_ms: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct TabController {
    tabs: Vec<Tab>,
    active: usize,
}

impl Default for TabController {
    fn default() -> Self {
        Self { tabs: DEFAULT_TABS.to_vec(), active: 0 }
    }
}

impl TabController {
    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn active(&self) -> &'static str {
        self.tabs[self.active].name
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.active() == name
    }

    /// Switch to `name`. Unknown names leave the current tab active.
    pub fn activate(&mut self, name: &str, card_count: usize) -> Result<Activation> {
        let index = self
            .tabs
            .iter()
            .position(|t| t.name == name)
            .ok_or_else(|| Error::UnknownTab(name.to_string()))?;
        let previous = self.active();
        self.active = index;
        let tab = self.active();

        Ok(Activation {
            tab,
            previous,
            card_delays_ms: (0..card_count.min(MAX_CARDS))
                .map(|i| stagger_delay(i).as_millis() as u64)
                .collect(),
            reload_persons_ms: (tab == SUSPECTS_TAB)
                .then(|| PERSONS_RELOAD_DELAY.as_millis() as u64),
        })
    }

    pub fn render_bar(&self) -> String {
        let mut html = String::from(r#"<nav class="tabs">"#);
        for (i, tab) in self.tabs.iter().enumerate() {
            html.push_str(&format!(
                r##"<a href="#" class="tab{}" data-tab="{}"><i class="{}"></i> {}</a>"##,
                if i == self.active { " active" } else { "" },
                tab.name,
                tab.icon,
                tab.label
            ));
        }
        html.push_str("</nav>");
        html
    }
}
