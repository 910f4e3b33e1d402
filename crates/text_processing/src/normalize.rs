//! Slot normalization for item and query strings

use voice_shop_core::LanguageProfile;

/// Normalize an extracted item or query
///
/// Lowercases, strips one trailing period, drops characters outside the
/// profile's item charset (letters, digits, space, hyphen), collapses
/// whitespace and strips leading possessive particles. The result is a
/// fixed point: normalizing it again returns it unchanged. An empty input
/// yields an empty output.
pub fn normalize_slot(text: &str, profile: &dyn LanguageProfile) -> String {
    let lowered = text.trim().to_lowercase();
    let lowered = lowered.strip_suffix('.').unwrap_or(&lowered);

    let filtered: String = lowered
        .chars()
        .filter_map(|c| {
            if c.is_whitespace() {
                Some(' ')
            } else if c == '-' || profile.is_item_char(c) {
                Some(c)
            } else {
                None
            }
        })
        .collect();

    filtered
        .split_whitespace()
        .skip_while(|token| profile.is_possessive_particle(token))
        .collect::<Vec<_>>()
        .join(" ")
}
