//! Timestamp extraction rules for order-entry text.
//!
//! Order cells hold free text in a fixed, undocumented sub-format. Request and
//! reply timestamps sit at known character offsets, so each feature declares
//! its offsets as an [`ExtractionRule`] rather than slicing inline.
//!
//! All offsets count characters, not bytes, and clamp at the end of the text:
//! a span reaching past the end yields a shorter (possibly empty) string.

use std::fmt;

use serde::Serialize;

/// Half-open character range `[start, end)`; `end = None` runs to the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CharSpan {
    pub start: usize,
    pub end: Option<usize>,
}

impl CharSpan {
    pub const fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    pub const fn from_start(start: usize) -> Self {
        Self { start, end: None }
    }

    /// Returns the slice of `text` covered by this span.
    ///
    /// ```
    /// use ed_model::CharSpan;
    ///
    /// assert_eq!(CharSpan::new(2, 5).apply("abcdefg"), "cde");
    /// assert_eq!(CharSpan::from_start(4).apply("abcdefg"), "efg");
    /// assert_eq!(CharSpan::new(5, 20).apply("abcdefg"), "fg");
    /// assert_eq!(CharSpan::new(10, 20).apply("abcdefg"), "");
    /// ```
    pub fn apply(self, text: &str) -> &str {
        let start = byte_offset(text, self.start);
        let end = match self.end {
            Some(end) => byte_offset(text, end.max(self.start)),
            None => text.len(),
        };
        &text[start..end]
    }
}

impl fmt::Display for CharSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end {
            Some(end) => write!(f, "[{}:{})", self.start, end),
            None => write!(f, "[{}:)", self.start),
        }
    }
}

fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map_or(text.len(), |(index, _)| index)
}

/// How the timestamp segments of one record are cut out of its order entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntryLayout {
    /// Each entry is cut independently: `request` and `reply` spans of the
    /// entry are joined with `separator`.
    Fixed {
        request: CharSpan,
        separator: &'static str,
        reply: CharSpan,
    },
    /// Entries are rejoined with `joiner` and re-split on `marker`; the text
    /// before the first marker is dropped.
    Marker {
        joiner: &'static str,
        marker: &'static str,
    },
}

/// Whether an order entry carries a reply, judged by its text length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyClass {
    WithReply,
    WithoutReply,
    /// Longer than the expected reply layout; belongs to neither partition.
    Unclassified,
}

/// Extraction and classification rule for one order feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExtractionRule {
    pub layout: EntryLayout,
    /// Request timestamp within an extracted segment.
    pub request: CharSpan,
    /// Reply timestamp within an extracted segment.
    pub reply: CharSpan,
    /// Exact entry length of an order that received a reply.
    pub reply_threshold: usize,
}

/// Consultation entries: `REQUEST:dd/mm/yyyy hh:mm REPLY:dd/mm/yyyy hh:mm`.
pub const CONSULTATION_RULE: ExtractionRule = ExtractionRule {
    layout: EntryLayout::Fixed {
        request: CharSpan::new(8, 25),
        separator: "  ",
        reply: CharSpan::from_start(31),
    },
    request: CharSpan::new(0, 16),
    reply: CharSpan::from_start(19),
    reply_threshold: 47,
};

/// Lab test, radiology, and pharmacy entries:
/// `<name>, START: ,dd/mm/yyyy hh:mm, END: ,dd/mm/yyyy hh:mm`.
pub const START_END_RULE: ExtractionRule = ExtractionRule {
    layout: EntryLayout::Marker {
        joiner: " ",
        marker: "START: ,",
    },
    request: CharSpan::new(0, 16),
    reply: CharSpan::new(24, 40),
    reply_threshold: 58,
};

impl ExtractionRule {
    /// Cuts the request/reply timestamp segments out of one record's entries.
    ///
    /// Under [`EntryLayout::Fixed`] there is one segment per entry. Under
    /// [`EntryLayout::Marker`] there is one segment per marker occurrence.
    pub fn extract_segments<S: AsRef<str>>(&self, entries: &[S]) -> Vec<String> {
        match self.layout {
            EntryLayout::Fixed {
                request,
                separator,
                reply,
            } => entries
                .iter()
                .map(|entry| {
                    let entry = entry.as_ref();
                    format!("{}{}{}", request.apply(entry), separator, reply.apply(entry))
                })
                .collect(),
            EntryLayout::Marker { joiner, marker } => {
                let joined = entries
                    .iter()
                    .map(|entry| entry.as_ref())
                    .collect::<Vec<&str>>()
                    .join(joiner);
                joined.split(marker).skip(1).map(str::to_string).collect()
            }
        }
    }

    pub fn request_text(self, segment: &str) -> &str {
        self.request.apply(segment)
    }

    pub fn reply_text(self, segment: &str) -> &str {
        self.reply.apply(segment)
    }

    pub fn classify(self, length: usize) -> ReplyClass {
        match length.cmp(&self.reply_threshold) {
            std::cmp::Ordering::Less => ReplyClass::WithoutReply,
            std::cmp::Ordering::Equal => ReplyClass::WithReply,
            std::cmp::Ordering::Greater => ReplyClass::Unclassified,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_counts_characters_not_bytes() {
        assert_eq!(CharSpan::new(1, 3).apply("éàüx"), "àü");
        assert_eq!(CharSpan::from_start(3).apply("éàüx"), "x");
    }

    #[test]
    fn span_with_end_before_start_is_empty() {
        let span = CharSpan {
            start: 5,
            end: Some(2),
        };
        assert_eq!(span.apply("abcdefgh"), "");
    }

    #[test]
    fn span_display() {
        assert_eq!(CharSpan::new(8, 25).to_string(), "[8:25)");
        assert_eq!(CharSpan::from_start(31).to_string(), "[31:)");
    }

    #[test]
    fn consultation_segment_layout() {
        let entry = "REQUEST:01/02/2023 10:15 REPLY:01/02/2023 11:00";
        assert_eq!(entry.chars().count(), 47);
        let segments = CONSULTATION_RULE.extract_segments(&[entry]);
        assert_eq!(segments, vec!["01/02/2023 10:15   01/02/2023 11:00"]);
        assert_eq!(
            CONSULTATION_RULE.request_text(&segments[0]),
            "01/02/2023 10:15"
        );
        assert_eq!(CONSULTATION_RULE.reply_text(&segments[0]), "01/02/2023 11:00");
    }

    #[test]
    fn marker_layout_drops_header_segment() {
        let entries = [
            "CBC TEST, START: ,01/02/2023 10:15, END: ,01/02/2023 11:00",
            "UREA, START: ,01/02/2023 10:20, END: ,",
        ];
        let segments = START_END_RULE.extract_segments(&entries);
        assert_eq!(segments.len(), 2);
        assert_eq!(
            segments[0],
            "01/02/2023 10:15, END: ,01/02/2023 11:00 UREA, "
        );
        assert_eq!(START_END_RULE.request_text(&segments[0]), "01/02/2023 10:15");
        assert_eq!(START_END_RULE.reply_text(&segments[0]), "01/02/2023 11:00");
        assert_eq!(segments[1], "01/02/2023 10:20, END: ,");
        assert_eq!(START_END_RULE.reply_text(&segments[1]), "");
    }

    #[test]
    fn marker_layout_without_marker_yields_nothing() {
        let segments = START_END_RULE.extract_segments(&["no timestamps here"]);
        assert!(segments.is_empty());
    }

    #[test]
    fn classify_against_threshold() {
        assert_eq!(CONSULTATION_RULE.classify(47), ReplyClass::WithReply);
        assert_eq!(CONSULTATION_RULE.classify(30), ReplyClass::WithoutReply);
        assert_eq!(CONSULTATION_RULE.classify(48), ReplyClass::Unclassified);
        assert_eq!(START_END_RULE.classify(58), ReplyClass::WithReply);
        assert_eq!(START_END_RULE.classify(47), ReplyClass::WithoutReply);
    }
}
