/// Removes both mention encodings of `user_id` (`<@id>` and `<@!id>`) and
/// trims the remaining text.
pub fn strip_mentions(content: &str, user_id: u64) -> String {
    content
        .replace(&format!("<@{user_id}>"), "")
        .replace(&format!("<@!{user_id}>"), "")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOT: u64 = 42;

    #[test]
    fn strips_plain_and_nickname_mentions() {
        assert_eq!(strip_mentions("<@42> hello", BOT), "hello");
        assert_eq!(strip_mentions("<@!42> hello", BOT), "hello");
        assert_eq!(strip_mentions("hey <@42> and <@!42> again", BOT), "hey  and  again");
    }

    #[test]
    fn keeps_other_users_mentions() {
        assert_eq!(strip_mentions("<@42> ask <@7>", BOT), "ask <@7>");
        assert_eq!(strip_mentions("<@420> hi", BOT), "<@420> hi");
    }

    #[test]
    fn mention_only_is_empty() {
        assert_eq!(strip_mentions("<@42>", BOT), "");
        assert_eq!(strip_mentions("  <@!42>  \n", BOT), "");
    }
}
