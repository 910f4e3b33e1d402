//! Hindi profile rules
//!
//! Transcripts mix Devanagari with romanized or English words ("add",
//! "brand", "rs"), so every character class here accepts ASCII as well.

use voice_shop_core::Language;

use super::ProfileRules;
use crate::hindi::{fold_nukta, is_devanagari_letter, NUMBER_WORDS};

fn is_letter(c: char) -> bool {
    is_devanagari_letter(c) || c.is_ascii_alphanumeric()
}

fn is_item_char(c: char) -> bool {
    is_devanagari_letter(c) || c.is_alphanumeric()
}

fn is_short_form_char(c: char) -> bool {
    is_letter(c) || c == '-'
}

pub const RULES: ProfileRules = ProfileRules {
    language: Language::Hindi,
    tag: "hi",
    search_trigger: r"(?i)ढूँढ|ढूंढ|डूँढ|डूंढ|खोज|कहाँ|कहां|दिखा(?:ओ|इए|ना)?|\bfind\b|\bsearch\b",
    // जोड़ appears both precomposed (U+095C) and with a separate nukta
    add_trigger: r"(?i)जो(?:\x{0921}\x{093C}?|\x{095C})(?:\x{094B}|\x{0947}\x{0902}|ना|\x{093F}ए|\x{093F}ये)?|मुझे|चाहिए|चाहिये|लाना|ले\s*आओ|लाओ|ले\s*लो|खरीद(?:ो|ना|ें)?|\badd\b",
    remove_trigger: r"(?i)हटा(?:\s*दो|\s*दें|ओ|एँ|एं|ए|ना|नी)?|निकाल(?:\s*दो|ो|ें|ना)?|डिलीट(?:\s*करो)?|\bremove\b|\bdelete\b",
    price_patterns: &[
        r"(?i)(?:₹|rs\.?|रु\.?)?\s*(?P<amount>[0-9०-९]+(?:\.[0-9०-९]+)?)\s*(?:रुपये|रुपए|रुपया|रु\.?|rs\.?)?\s*(?:से\s*कम|के\s*अंदर|तक)\b",
        r"(?i)(?:से\s*कम|\bunder\b|\bbelow\b|less\s+than)\s*(?:₹|rs\.?|रु\.?)?\s*(?P<amount>[0-9०-९]+(?:\.[0-9०-९]+)?)(?:\s*(?:रुपये|रुपए|रुपया|रु))?",
    ],
    brand_patterns: &[
        r"(?i)(?P<brand>\S+)\s+(?:ब्रांड|brand)\s+(?:का|की|के)\b",
        r"(?i)(?:ब्रांड|brand)\s+(?P<brand>\S+)",
    ],
    list_reference: r"(?i)(?:(?:मेरी|मेरे|मेरा)\s+)?(?:लिस्ट|सूची)\s*(?:में|से|मे)|\b(?:to|from|in|on)\s+(?:my\s+|the\s+)?list\b",
    add_trigger_words: &[
        "जोड़ो", "जोड़ें", "जोड़", "जोडो", "जोड़ना", "जोड़िए", "मुझे", "चाहिए", "चाहिये", "लाना",
        "लाओ", "ले", "आओ", "लेआओ", "लो", "दे", "दीजिए", "खरीदो", "खरीदना", "add", "please",
        "कृपया",
    ],
    search_fillers: &[
        "कहाँ", "कहां", "है", "हैं", "मिलेगा", "मिलेगी", "मुझे", "करो", "कीजिए", "find", "search",
        "me", "for",
    ],
    search_stems: &["ढूँढ", "ढूंढ", "डूँढ", "डूंढ", "खोज", "दिखा"],
    filler_words: &[
        "और", "भी", "है", "हैं", "वाला", "वाली", "वाले", "पैकेट", "बोतल", "डिब्बा", "डिब्बे", "किलो",
        "को", "of",
    ],
    number_words: NUMBER_WORDS,
    possessive_particles: &["का", "की", "के"],
    letters: is_letter,
    item_chars: is_item_char,
    short_form_chars: is_short_form_char,
    short_form_max_tokens: 3,
    fold: fold_nukta,
};
