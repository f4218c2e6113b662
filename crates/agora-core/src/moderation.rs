//! Block-word screening for new post bodies.

use crate::channel::{Channel, PostStatus};

/// Screens a post body against the channel's block words: any hit blocks the
/// post, otherwise it is approved. Matching is ASCII case-insensitive and on
/// whole words, so a block word never fires inside a longer word.
#[must_use]
pub fn screen_post_body(channel: &Channel, body: &str) -> PostStatus {
    let blocked = body
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .any(|word| {
            channel
                .block_words
                .iter()
                .any(|block_word| word.eq_ignore_ascii_case(block_word))
        });
    if blocked {
        tracing::debug!(
            event = "post_body_blocked",
            channel = channel.name.as_str(),
            "post body hit a block word"
        );
        PostStatus::Blocked
    } else {
        PostStatus::Approved
    }
}

#[cfg(test)]
mod tests {
    use super::screen_post_body;
    use crate::acl::ChannelAcl;
    use crate::channel::{Channel, PermissionModel, PostStatus};

    fn channel(block_words: &[&str]) -> Channel {
        Channel {
            org_id: String::from("org1"),
            name: String::from("general"),
            block_words: block_words.iter().map(|word| String::from(*word)).collect(),
            allow_post: true,
            allow_reply: true,
            allow_reaction: true,
            allow_as_anonymous: false,
            allowed_reactions: None,
            permissions: PermissionModel::Acl(ChannelAcl::default()),
        }
    }

    #[test]
    fn clean_bodies_are_approved() {
        let channel = channel(&["spoiler"]);
        assert_eq!(
            screen_post_body(&channel, "totally fine text"),
            PostStatus::Approved
        );
        assert_eq!(screen_post_body(&channel, ""), PostStatus::Approved);
    }

    #[test]
    fn block_words_match_case_insensitively() {
        let channel = channel(&["spoiler"]);
        assert_eq!(
            screen_post_body(&channel, "big SPOILER ahead"),
            PostStatus::Blocked
        );
    }

    #[test]
    fn block_words_match_whole_words_only() {
        let channel = channel(&["cat"]);
        assert_eq!(
            screen_post_body(&channel, "concatenate the files"),
            PostStatus::Approved
        );
        assert_eq!(
            screen_post_body(&channel, "the cat, again"),
            PostStatus::Blocked
        );
    }

    #[test]
    fn channels_without_block_words_approve_everything() {
        let channel = channel(&[]);
        assert_eq!(
            screen_post_body(&channel, "anything at all"),
            PostStatus::Approved
        );
    }
}
