//! Text helpers for backend strings
//!
//! The Prolog backend sometimes emits UTF-8 that was decoded as Latin-1 on the
//! way out, so "dépôt" arrives as "dÃ©pÃ´t". [`fix_accented_text`] repairs the
//! French letters we actually see. Everything that ends up in HTML goes through
//! [`escape_html`] afterwards; [`normalize`] does both.

/// Mojibake sequence -> intended character.
///
/// `Ã ` appears both with a no-break space (the real second byte of "à") and a
/// plain space (what survives copy/paste through the backend's logs).
const MOJIBAKE: &[(&str, &str)] = &[
    ("Ã©", "é"),
    ("Ã¨", "è"),
    ("Ã\u{a0}", "à"),
    ("Ã ", "à"),
    ("Ã§", "ç"),
    ("Ã´", "ô"),
    ("Ã»", "û"),
    ("Ã®", "î"),
    ("Ã¢", "â"),
    ("Ã«", "ë"),
    ("Ã¯", "ï"),
    ("Ã¹", "ù"),
    ("Ã‡", "Ç"),
    ("Ã‰", "É"),
    ("Ãˆ", "È"),
];

pub fn fix_accented_text(text: &str) -> String {
    if !text.contains('Ã') {
        return text.to_string();
    }
    MOJIBAKE
        .iter()
        .fold(text.to_string(), |acc, (broken, fixed)| acc.replace(broken, fixed))
}

/// Upper-case the first character, leave the rest alone ("alice" -> "Alice").
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Repair mojibake, then escape for HTML.
pub fn normalize(s: &str) -> String {
    escape_html(&fix_accented_text(s))
}

/// Capitalized display name, escaped for HTML.
pub fn display_name(s: &str) -> String {
    escape_html(&capitalize_first(&fix_accented_text(s)))
}
