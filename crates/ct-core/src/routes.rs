//! Addressable views.
//!
//! `/{locale}`, `/{locale}/project/{id}`, `/{locale}/not-found`

use serde::{Deserialize, Serialize};

use crate::ids::ProjectId;
use crate::locale::Locale;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewRoute {
    Home,
    Project(ProjectId),
    NotFound,
}

/// Percent-encode the characters that would break a single path segment.
fn encode_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for ch in segment.chars() {
        match ch {
            '%' => out.push_str("%25"),
            '/' => out.push_str("%2F"),
            '?' => out.push_str("%3F"),
            '#' => out.push_str("%23"),
            ' ' => out.push_str("%20"),
            _ => out.push(ch),
        }
    }
    out
}

fn decode_segment(segment: &str) -> String {
    segment
        .replace("%2F", "/")
        .replace("%2f", "/")
        .replace("%3F", "?")
        .replace("%3f", "?")
        .replace("%23", "#")
        .replace("%20", " ")
        .replace("%25", "%")
}

impl ViewRoute {
    pub fn path(&self, locale: Locale) -> String {
        match self {
            ViewRoute::Home => format!("/{locale}"),
            ViewRoute::Project(id) => {
                format!("/{locale}/project/{}", encode_segment(id.as_str()))
            }
            ViewRoute::NotFound => format!("/{locale}/not-found"),
        }
    }

    /// Parse a view path back into its locale and route.
    pub fn parse(path: &str) -> Option<(Locale, ViewRoute)> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let mut segments = path.trim_matches('/').split('/');
        let locale: Locale = segments.next()?.parse().ok()?;
        let route = match (segments.next(), segments.next(), segments.next()) {
            (None, _, _) | (Some(""), None, _) => ViewRoute::Home,
            (Some("not-found"), None, _) => ViewRoute::NotFound,
            (Some("project"), Some(id), None) if !id.is_empty() => {
                ViewRoute::Project(ProjectId::from(decode_segment(id)))
            }
            _ => return None,
        };
        Some((locale, route))
    }
}
