use ammonia;

/// Sanitize operator-supplied text before it reaches the question bank.
///
/// Generated and hand-edited question text flows to student browsers
/// unescaped in some clients, so strip script-capable markup here at the
/// publish/update boundary rather than trusting every consumer to escape.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_script_tags() {
        let dirty = "What is <script>alert('x')</script>2+2?";
        assert_eq!(clean_html(dirty), "What is 2+2?");
    }

    #[test]
    fn keeps_plain_text() {
        assert_eq!(clean_html("Photosynthesis occurs where?"), "Photosynthesis occurs where?");
    }
}
