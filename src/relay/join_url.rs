//! Outbound URL construction.
//!
//! Query order is fixed: `tc`, `emote_id`, then `uid1..uidN`. Emote servers
//! read the uid slots positionally, so a skipped entry leaves a gap in the
//! numbering instead of shifting later entries down.

use url::form_urlencoded;

use crate::relay::payload::EmoteJoin;

/// Path appended to the normalized server base.
pub const JOIN_PATH: &str = "/join";

/// Build the outbound join URL for a validated command.
pub fn build_join_url(join: &EmoteJoin) -> String {
    let server = join.server.trim_end_matches('/');
    let mut url = format!(
        "{}{}?tc={}&emote_id={}",
        server,
        JOIN_PATH,
        encode(join.tc.trim()),
        encode(join.emote_id.trim()),
    );

    for (index, uid) in join.uids.iter().enumerate() {
        if let Some(uid) = uid {
            url.push_str(&format!("&uid{}={}", index + 1, encode(uid.trim())));
        }
    }

    url
}

/// Form-encode a query value: alphanumerics and `-_.` pass through, space
/// becomes `+`, everything else is `%XX`.
pub fn encode(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('*', "%2A")
}
