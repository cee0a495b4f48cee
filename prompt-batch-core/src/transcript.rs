//! Bounded, readable previews of free-form conversation transcripts.
//!
//! Transcripts arrive in whatever shape the source system stored them: one
//! turn per line, speaker-labelled run-on text, or plain prose. The preview
//! tries the structural boundaries in that order and falls back to a
//! character cut when none are present.

use once_cell::sync::Lazy;
use regex::Regex;

/// Utterances kept in a preview unless the caller asks otherwise.
pub const DEFAULT_MAX_UTTERANCES: usize = 6;

pub const NO_TRANSCRIPT: &str = "No transcript available";
pub const ELLIPSIS: &str = "...";

const UNSTRUCTURED_PREVIEW_CHARS: usize = 300;
const MAX_PREVIEW_CHARS: usize = 500;

static SPEAKER_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:Agent|Customer|User|Bot|System|Rep):").expect("speaker label pattern")
});

static SENTENCE_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]+").expect("sentence terminator pattern"));

/// Produces the preview for `transcript`, keeping at most `max_utterances` turns.
///
/// Pure and total: every input, including empty and whitespace-only text,
/// yields a preview of at most 503 characters.
pub fn segment_transcript(transcript: Option<&str>, max_utterances: usize) -> String {
    let Some(text) = transcript else {
        return NO_TRANSCRIPT.to_string();
    };

    let utterances = split_lines(text)
        .or_else(|| split_speaker_turns(text))
        .or_else(|| split_sentences(text));

    match utterances {
        Some(utterances) => assemble(&utterances, max_utterances),
        None => truncate_chars(text, UNSTRUCTURED_PREVIEW_CHARS),
    }
}

fn split_lines(text: &str) -> Option<Vec<String>> {
    let lines: Vec<String> = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect();

    (lines.len() >= 2).then_some(lines)
}

/// Any label match counts as structure, even if every turn turns out empty.
fn split_speaker_turns(text: &str) -> Option<Vec<String>> {
    let labels: Vec<&str> = SPEAKER_LABEL.find_iter(text).map(|m| m.as_str()).collect();
    if labels.is_empty() {
        return None;
    }

    let mut segments = SPEAKER_LABEL.split(text);
    let mut utterances = Vec::with_capacity(labels.len() + 1);

    // Text ahead of the first label has no speaker; keep it unless it is blank.
    if let Some(lead) = segments.next() {
        let lead = lead.trim();
        if !lead.is_empty() {
            utterances.push(lead.to_string());
        }
    }

    for (label, segment) in labels.into_iter().zip(segments) {
        let segment = segment.trim();
        if !segment.is_empty() {
            utterances.push(format!("{}{}", label, segment));
        }
    }

    Some(utterances)
}

fn split_sentences(text: &str) -> Option<Vec<String>> {
    let sentences: Vec<String> = SENTENCE_END
        .split(text)
        .map(str::trim)
        .filter(|sentence| !sentence.is_empty())
        .map(|sentence| format!("{}.", sentence))
        .collect();

    (sentences.len() >= 2).then_some(sentences)
}

fn assemble(utterances: &[String], max_utterances: usize) -> String {
    let mut preview = utterances
        .iter()
        .take(max_utterances)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n");

    if utterances.len() > max_utterances {
        preview.push('\n');
        preview.push_str(ELLIPSIS);
    }

    if preview.chars().count() > MAX_PREVIEW_CHARS {
        return truncate_chars(&preview, MAX_PREVIEW_CHARS);
    }
    preview
}

fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}{}", &text[..cut], ELLIPSIS),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_char_boundaries() {
        let text = "é".repeat(301);
        let preview = truncate_chars(&text, 300);
        assert_eq!(preview.chars().count(), 303);
        assert!(preview.ends_with(ELLIPSIS));
    }

    #[test]
    fn leading_unlabelled_text_is_kept() {
        let turns = split_speaker_turns("Hello there Agent: hi Customer: bye").unwrap();
        assert_eq!(turns, vec!["Hello there", "Agent:hi", "Customer:bye"]);
    }

    #[test]
    fn label_only_text_still_counts_as_structured() {
        assert_eq!(split_speaker_turns("Agent:"), Some(vec![]));
        assert_eq!(segment_transcript(Some("Agent:"), 6), "");
    }
}
