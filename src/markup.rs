//! Small query helpers over parsed listing markup.

use scraper::{ElementRef, Selector};

use crate::error::{Error, Result};

/// How `contains` checks compare text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    Sensitive,
    Insensitive,
}

pub fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| Error::Selector(format!("{css}: {e}")))
}

/// Trimmed text content of an element.
pub fn text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Trimmed text of the first match of `sel` under `el`, if any.
pub fn first_text(el: ElementRef<'_>, sel: &Selector) -> Option<String> {
    el.select(sel).next().map(text)
}

/// Attribute of the first match of `sel` under `el`.
pub fn first_attr<'a>(el: ElementRef<'a>, sel: &Selector, name: &str) -> Option<&'a str> {
    el.select(sel).next().and_then(|found| found.value().attr(name))
}

/// Text of `el` broken into lines at each `<br>`, trimmed.
///
/// Empty lines before a `<br>` are kept so a line's index matches its position in the
/// markup; trailing empty lines are dropped.
pub fn lines(el: ElementRef<'_>) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for node in el.descendants() {
        if let Some(t) = node.value().as_text() {
            current.push_str(t);
        } else if node.value().as_element().is_some_and(|e| e.name() == "br") {
            lines.push(std::mem::take(&mut current));
        }
    }
    lines.push(current);
    let mut lines: Vec<String> = lines.into_iter().map(|l| l.trim().to_string()).collect();
    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    lines
}

fn contains(haystack: &str, needle: &str, case: Case) -> bool {
    match case {
        Case::Sensitive => haystack.contains(needle),
        Case::Insensitive => haystack.to_lowercase().contains(&needle.to_lowercase()),
    }
}

/// First match of `sel` under `el` whose text contains `needle`.
pub fn find_containing<'a>(
    el: ElementRef<'a>,
    sel: &Selector,
    needle: &str,
    case: Case,
) -> Option<ElementRef<'a>> {
    el.select(sel).find(|found| contains(&text(*found), needle, case))
}

/// Last match of `sel` under `el` whose text contains `needle`.
pub fn find_last_containing<'a>(
    el: ElementRef<'a>,
    sel: &Selector,
    needle: &str,
    case: Case,
) -> Option<ElementRef<'a>> {
    el.select(sel).filter(|found| contains(&text(*found), needle, case)).last()
}
