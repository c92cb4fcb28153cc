/// Join the visible synopsis with its hidden continuation.
///
/// `toggle` is the text of the collapse control at the end of `expanded` (e.g. `« less`);
/// it is cut off so the label never ends up in the prose.
pub fn reconstruct(primary: &str, expanded: Option<&str>, toggle: Option<&str>) -> String {
    let mut rest = expanded.unwrap_or_default().trim().to_string();
    if let Some(toggle) = toggle.map(str::trim).filter(|t| !t.is_empty()) {
        if let Some(pos) = rest.rfind(toggle) {
            rest.replace_range(pos..pos + toggle.len(), "");
        }
    }

    let joined = match (primary.trim(), rest.trim()) {
        (p, "") => p.to_string(),
        ("", r) => r.to_string(),
        (p, r) => format!("{p} {r}"),
    };
    joined.replace('"', "").trim().to_string()
}
