// src/utils/html.rs

/// Sanitizes the rich-text body of an Olympics announcement.
///
/// Safe formatting tags (<b>, <p>, <a>, lists) survive; scripts, iframes and
/// event-handler attributes are stripped. Running it twice yields the same output,
/// so re-saving a stored body leaves it unchanged.
pub fn clean_rich_text(input: &str) -> String {
    ammonia::clean(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_scripts_and_handlers() {
        let cleaned = clean_rich_text(r#"<p onclick="x()">Rules</p><script>alert(1)</script>"#);
        assert_eq!(cleaned, "<p>Rules</p>");
    }

    #[test]
    fn is_idempotent() {
        let once = clean_rich_text("Round 1 <b>starts</b> at 10:00 & ends at 12:00");
        assert_eq!(clean_rich_text(&once), once);
    }
}
