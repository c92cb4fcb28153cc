//! Showtime normalization.
//!
//! Listings print times like `10:00  11:20am  1:00  2:20  4:00  5:10  6:50  8:10  9:40  10:55pm`,
//! marking am/pm only on the last time of each half of the day. Walking the list from the
//! end, every unmarked time takes the meridiem of the nearest later marked one.

fn clean(token: &str) -> String {
    token.chars().filter(char::is_ascii).collect::<String>().trim().to_string()
}

fn meridiem_of(token: &str) -> Option<&'static str> {
    if token.ends_with("am") {
        Some("am")
    } else if token.ends_with("pm") {
        Some("pm")
    } else {
        None
    }
}

/// Qualify every token with am/pm, keeping input order.
///
/// Tokens earlier than the last marked one stay unmarked when nothing after them carries
/// a meridiem. Empty tokens (from runs of whitespace) are dropped.
pub fn normalize<S: AsRef<str>>(tokens: &[S]) -> Vec<String> {
    let mut meridiem: Option<&'static str> = None;
    let mut out: Vec<String> = tokens
        .iter()
        .rev()
        .map(|token| clean(token.as_ref()))
        .filter(|token| !token.is_empty())
        .map(|token| match meridiem_of(&token) {
            Some(marked) => {
                meridiem = Some(marked);
                token
            }
            None => match meridiem {
                Some(m) => format!("{token}{m}"),
                None => token,
            },
        })
        .collect();
    out.reverse();
    out.into_iter().map(|t| t.trim().to_string()).collect()
}

/// Split raw `.times` text on whitespace and normalize it.
pub fn normalize_text(raw: &str) -> Vec<String> {
    let tokens: Vec<&str> = raw.split_ascii_whitespace().collect();
    normalize(&tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn back_fills_meridiem() {
        let out = normalize(&["10:00", "11:20am", "1:00", "2:20", "4:00pm"]);
        assert_eq!(out, vec!["10:00am", "11:20am", "1:00pm", "2:20pm", "4:00pm"]);
    }

    #[test]
    fn qualified_input_is_unchanged() {
        assert_eq!(normalize(&["10:00am", "11:20am"]), vec!["10:00am", "11:20am"]);
    }

    #[test]
    fn trailing_unmarked_times_stay_unmarked() {
        let out = normalize(&["9:00pm", "10:30"]);
        assert_eq!(out, vec!["9:00pm", "10:30"]);
    }

    #[test]
    fn strips_stray_characters() {
        let raw = "10:00\u{200e}\u{a0} 11:20am\u{200e}\u{a0} 1:00\u{200e}\u{a0} 4:00pm";
        assert_eq!(
            normalize_text(raw),
            vec!["10:00am", "11:20am", "1:00pm", "4:00pm"]
        );
    }

    #[test]
    fn empty_input() {
        assert!(normalize_text("").is_empty());
        assert!(normalize::<&str>(&[]).is_empty());
    }
}
