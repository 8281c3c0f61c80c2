use regex::Regex;
use std::sync::LazyLock;

/// Sentence-terminal mark (period, question, exclamation, ellipsis or closing
/// quote) followed by the whitespace that separates it from the next sentence.
static SENTENCE_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[.?!…”"']\s+"#).expect("sentence boundary pattern is valid"));

/// Split text into sentences on punctuation boundaries.
///
/// Rule based on purpose: abbreviations ("Dr. Kim") and quoted dialogue will
/// sometimes split in odd places. That only moves chunk seams, never the
/// reading order of the final audio.
pub fn split_sentences(text: &str) -> Vec<String> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    let mut sentences = Vec::new();
    let mut start = 0;

    for boundary in SENTENCE_BOUNDARY.find_iter(text) {
        // Keep the terminal mark with its sentence, drop the whitespace
        let terminal_len = text[boundary.start()..]
            .chars()
            .next()
            .map(char::len_utf8)
            .unwrap_or(0);
        push_sentence(&mut sentences, &text[start..boundary.start() + terminal_len]);
        start = boundary.end();
    }
    push_sentence(&mut sentences, &text[start..]);

    sentences
}

fn push_sentence(sentences: &mut Vec<String>, fragment: &str) {
    let fragment = fragment.trim();
    if !fragment.is_empty() {
        sentences.push(fragment.to_string());
    }
}
