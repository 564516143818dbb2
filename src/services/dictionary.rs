//! Last-resort translation: a fixed English-to-Korean lookup table. Pure and
//! total; unknown input falls through unchanged.

use std::collections::HashMap;
use std::sync::OnceLock;

const WORD_PUNCTUATION: &[char] = &['.', ',', '!', '?', ';', ':', '(', ')'];
const SENTENCE_TERMINATORS: &[char] = &['.', '!', '?'];

static ENTRIES: &[(&str, &str)] = &[
    // Common phrases
    ("hello world", "안녕, 세상"),
    ("good morning", "좋은 아침"),
    ("good evening", "좋은 저녁"),
    ("good night", "잘 자"),
    ("thank you", "감사합니다"),
    ("how are you", "어떻게 지내세요"),
    ("i am fine", "저는 괜찮습니다"),
    ("what is your name", "이름이 뭐예요"),
    ("nice to meet you", "만나서 반갑습니다"),
    ("see you later", "나중에 봐요"),
    ("have a good day", "좋은 하루 보내세요"),
    // Single words
    ("hello", "안녕하세요"),
    ("hi", "안녕"),
    ("world", "세상"),
    ("good", "좋은"),
    ("bad", "나쁜"),
    ("morning", "아침"),
    ("afternoon", "오후"),
    ("evening", "저녁"),
    ("night", "밤"),
    ("today", "오늘"),
    ("tomorrow", "내일"),
    ("yesterday", "어제"),
    ("now", "지금"),
    ("later", "나중에"),
    ("here", "여기"),
    ("there", "저기"),
    ("this", "이것"),
    ("that", "저것"),
    ("these", "이것들"),
    ("those", "저것들"),
    // Pronouns
    ("i", "나는"),
    ("you", "당신은"),
    ("he", "그는"),
    ("she", "그녀는"),
    ("we", "우리는"),
    ("they", "그들은"),
    ("my", "나의"),
    ("your", "당신의"),
    ("his", "그의"),
    ("her", "그녀의"),
    ("our", "우리의"),
    ("their", "그들의"),
    ("me", "나를"),
    ("him", "그를"),
    ("us", "우리를"),
    ("them", "그들을"),
    // Verbs
    ("am", "입니다"),
    ("is", "입니다"),
    ("are", "입니다"),
    ("was", "였습니다"),
    ("were", "였습니다"),
    ("have", "가지고 있다"),
    ("has", "가지고 있다"),
    ("do", "하다"),
    ("does", "하다"),
    ("did", "했다"),
    ("will", "할 것이다"),
    ("would", "할 것이다"),
    ("can", "할 수 있다"),
    ("could", "할 수 있었다"),
    ("should", "해야 한다"),
    ("must", "해야 한다"),
    ("go", "가다"),
    ("come", "오다"),
    ("see", "보다"),
    ("look", "보다"),
    ("hear", "듣다"),
    ("listen", "듣다"),
    ("speak", "말하다"),
    ("talk", "이야기하다"),
    ("say", "말하다"),
    ("tell", "말하다"),
    ("know", "알다"),
    ("think", "생각하다"),
    ("want", "원하다"),
    ("need", "필요하다"),
    ("like", "좋아하다"),
    ("love", "사랑하다"),
    ("eat", "먹다"),
    ("drink", "마시다"),
    ("sleep", "자다"),
    ("work", "일하다"),
    ("play", "놀다"),
    ("study", "공부하다"),
    ("learn", "배우다"),
    ("teach", "가르치다"),
    ("read", "읽다"),
    ("write", "쓰다"),
    // Function words; articles map to nothing and drop out of the output
    ("the", ""),
    ("a", ""),
    ("an", ""),
    ("and", "그리고"),
    ("or", "또는"),
    ("but", "하지만"),
    ("so", "그래서"),
    ("if", "만약"),
    ("when", "언제"),
    ("where", "어디"),
    ("what", "무엇"),
    ("who", "누구"),
    ("why", "왜"),
    ("how", "어떻게"),
    ("yes", "네"),
    ("no", "아니오"),
    ("not", "않다"),
    ("very", "매우"),
    ("really", "정말"),
    ("please", "부탁합니다"),
    ("sorry", "죄송합니다"),
    ("excuse", "실례합니다"),
    ("thank", "감사"),
    ("welcome", "환영합니다"),
];

fn table() -> &'static HashMap<&'static str, &'static str> {
    static TABLE: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    TABLE.get_or_init(|| ENTRIES.iter().copied().collect())
}

/// Translates `text` against the dictionary. Resolution order: whole-text
/// phrase match, then per-sentence (exact sentence, else word-by-word), then
/// a single-word fallback; anything unmatched passes through unchanged.
pub fn get_basic_translation(text: &str) -> String {
    let whole = text.trim().to_lowercase();
    if let Some(hit) = table().get(whole.as_str()) {
        return (*hit).to_string();
    }

    let sentences: Vec<&str> = text
        .split(SENTENCE_TERMINATORS)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if !sentences.is_empty() {
        let translated: Vec<String> = sentences
            .iter()
            .map(|sentence| translate_sentence(sentence))
            .collect();
        return translated.join(". ");
    }

    let clean = clean_word(text.trim());
    table()
        .get(clean.as_str())
        .map(|hit| (*hit).to_string())
        .unwrap_or_else(|| text.to_string())
}

fn translate_sentence(sentence: &str) -> String {
    let key = sentence.to_lowercase();
    if let Some(hit) = table().get(key.as_str()) {
        return (*hit).to_string();
    }

    sentence
        .split_whitespace()
        .filter_map(|word| {
            let clean = clean_word(word);
            let out = table().get(clean.as_str()).copied().unwrap_or(word);
            if out.is_empty() {
                None
            } else {
                Some(out.to_string())
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn clean_word(word: &str) -> String {
    word.to_lowercase()
        .chars()
        .filter(|c| !WORD_PUNCTUATION.contains(c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn exact_phrase_match_wins() {
        assert_eq!(get_basic_translation("hello world"), "안녕, 세상");
        assert_eq!(get_basic_translation("  Thank You  "), "감사합니다");
    }

    #[test]
    fn lookup_is_case_insensitive_and_strips_punctuation() {
        assert_eq!(get_basic_translation("hello"), "안녕하세요");
        assert_eq!(get_basic_translation("Hello!"), "안녕하세요");
        assert_eq!(get_basic_translation("HELLO"), "안녕하세요");
    }

    #[test]
    fn word_by_word_substitution_keeps_unknown_words() {
        // "rust" has no entry and passes through unchanged; "love" maps.
        assert_eq!(get_basic_translation("i love rust"), "나는 사랑하다 rust");
    }

    #[test]
    fn articles_drop_out() {
        assert_eq!(get_basic_translation("the world"), "세상");
    }

    #[test]
    fn sentences_are_rejoined_with_period_space() {
        let out = get_basic_translation("good morning. good night.");
        assert_eq!(out, "좋은 아침. 잘 자");
    }

    #[test]
    fn unknown_input_passes_through() {
        assert_eq!(get_basic_translation("zxcvb"), "zxcvb");
    }

    #[test]
    fn punctuation_only_input_returns_input() {
        assert_eq!(get_basic_translation("?!"), "?!");
    }

    proptest! {
        // Total for any non-empty input: returns some string, never panics.
        #[test]
        fn translation_is_total(text in ".{1,200}") {
            let _ = get_basic_translation(&text);
        }
    }
}
