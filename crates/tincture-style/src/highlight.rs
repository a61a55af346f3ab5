//! Overlap-safe regex highlighting.
//!
//! [`highlight`] decorates a line of text according to a keyword rule set.
//! The line as a whole is drawn in an *ambient* style (typically derived from
//! the log level); each keyword match is drawn in the ambient style combined
//! with the rule's style, after which the ambient style is put back in force.
//!
//! # Overlaps
//!
//! Rules are applied in rule set order. Every non-overlapping match of a rule
//! becomes a candidate span; a candidate that intersects a span already
//! accepted from an earlier rule is dropped as a whole. The first rule
//! wins, regardless of match length.
//!
//! ```rust
//! use tincture_style::{highlight, Capabilities, PatternRules, RuleDomain, Style};
//!
//! let rules = PatternRules::from_entries(
//!     RuleDomain::Keyword,
//!     [("ab", Style::new().red()), ("bc", Style::new().blue())],
//! )
//! .unwrap();
//!
//! let out = highlight("xabcx", &Style::new(), &rules, &Capabilities::ansi());
//! assert_eq!(out, "x\x1b[31mab\x1b[0mcx\x1b[0m");
//! ```
//!
//! # Escape sequences
//!
//! - With an empty ambient style and no matches the text comes back as is.
//! - After each highlighted span the output carries a reset followed by the
//!   ambient start sequence, so attributes the span added end with it.
//! - A single reset closes the line whenever any escape sequence was written.
//!   With [`Capabilities::none()`] nothing renders, so the output is the
//!   input text.

use std::collections::BTreeMap;
use std::ops::Range;

use crate::capability::Capabilities;
use crate::rules::PatternRules;
use crate::style::{Style, RESET};

/// A styled byte range of the input text.
///
/// Ranges always start and end on `char` boundaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub range: Range<usize>,
    pub style: Style,
}

impl Span {
    pub fn new(range: Range<usize>, style: Style) -> Self {
        Self { range, style }
    }
}

/// Decorates `text` with `rules` over an `ambient` style.
///
/// Never fails: unsupported facets are dropped according to `caps`.
pub fn highlight(text: &str, ambient: &Style, rules: &PatternRules, caps: &Capabilities) -> String {
    highlight_pinned(text, ambient, &[], rules, caps)
}

/// Like [`highlight`], with spans fixed in advance.
///
/// `pinned` spans outrank every rule: keyword matches touching them are
/// dropped. Pinned spans that are empty, out of bounds, not on `char`
/// boundaries or overlapping an earlier pinned span are ignored.
pub fn highlight_pinned(
    text: &str,
    ambient: &Style,
    pinned: &[Span],
    rules: &PatternRules,
    caps: &Capabilities,
) -> String {
    let spans = resolve_pinned_spans(text, pinned, rules);
    if ambient.is_empty() && spans.is_empty() {
        return text.to_string();
    }
    paint_spans(text, ambient, &spans, caps)
}

/// Finds the accepted spans of `rules` in `text`, sorted by start.
pub fn resolve_spans(text: &str, rules: &PatternRules) -> Vec<Span> {
    resolve_pinned_spans(text, &[], rules)
}

/// Finds the accepted spans of `pinned` and then `rules`, sorted by start.
pub fn resolve_pinned_spans(text: &str, pinned: &[Span], rules: &PatternRules) -> Vec<Span> {
    let mut accepted = Accepted::default();

    for span in pinned {
        let Range { start, end } = span.range;
        let valid = start < end
            && end <= text.len()
            && text.is_char_boundary(start)
            && text.is_char_boundary(end);
        if valid {
            accepted.try_insert(start, end, span.style);
        }
    }

    for (pattern, style) in rules.iter() {
        for m in pattern.regex().find_iter(text) {
            if m.start() == m.end() {
                continue;
            }
            accepted.try_insert(m.start(), m.end(), *style);
        }
    }

    accepted.into_spans()
}

/// Disjoint spans keyed by start offset.
#[derive(Default)]
struct Accepted {
    spans: BTreeMap<usize, (usize, Style)>,
}

impl Accepted {
    /// Inserts `[start, end)` unless it intersects an accepted span.
    fn try_insert(&mut self, start: usize, end: usize, style: Style) -> bool {
        // The accepted span starting last before `end` is the only one that
        // can reach past `start`.
        if let Some((_, (prev_end, _))) = self.spans.range(..end).next_back() {
            if *prev_end > start {
                return false;
            }
        }
        self.spans.insert(start, (end, style));
        true
    }

    fn into_spans(self) -> Vec<Span> {
        self.spans
            .into_iter()
            .map(|(start, (end, style))| Span::new(start..end, style))
            .collect()
    }
}

fn paint_spans(text: &str, ambient: &Style, spans: &[Span], caps: &Capabilities) -> String {
    let base = ambient.render(caps);
    let mut out = String::with_capacity(text.len() + base.len() + spans.len() * 16);
    let mut emitted = !base.is_empty();
    let mut cursor = 0;

    out.push_str(&base);
    for span in spans {
        out.push_str(&text[cursor..span.range.start]);
        let segment = &text[span.range.clone()];
        let code = ambient.combine(&span.style).render(caps);
        if code.is_empty() || code == base {
            out.push_str(segment);
        } else {
            out.push_str(&code);
            out.push_str(segment);
            // Reset clears the span's own attributes, then the ambient style resumes.
            out.push_str(RESET);
            out.push_str(&base);
            emitted = true;
        }
        cursor = span.range.end;
    }
    out.push_str(&text[cursor..]);

    if emitted {
        out.push_str(RESET);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{default_keyword_rules, RuleDomain};

    fn rules(entries: &[(&str, Style)]) -> PatternRules {
        PatternRules::from_entries(RuleDomain::Keyword, entries.iter().copied()).unwrap()
    }

    fn ranges(spans: &[Span]) -> Vec<Range<usize>> {
        spans.iter().map(|s| s.range.clone()).collect()
    }

    #[test]
    fn test_no_rules_no_ambient_is_identity() {
        let out = highlight("plain text", &Style::new(), &rules(&[]), &Capabilities::ansi());
        assert_eq!(out, "plain text");
    }

    #[test]
    fn test_first_rule_wins_overlap() {
        let rules = rules(&[("ab", Style::new().red()), ("bc", Style::new().blue())]);
        let out = highlight("xabcx", &Style::new(), &rules, &Capabilities::ansi());
        assert_eq!(out, "x\x1b[31mab\x1b[0mcx\x1b[0m");
    }

    #[test]
    fn test_later_rule_partial_overlap_dropped_entirely() {
        let rules = rules(&[("bcd", Style::new().red()), ("abc", Style::new().blue())]);
        let spans = resolve_spans("abcde", &rules);
        assert_eq!(ranges(&spans), vec![1..4]);
    }

    #[test]
    fn test_later_rule_enclosing_span_dropped() {
        let rules = rules(&[("c", Style::new().red()), ("abcde", Style::new().blue())]);
        let spans = resolve_spans("abcde", &rules);
        assert_eq!(ranges(&spans), vec![2..3]);
    }

    #[test]
    fn test_adjacent_spans_both_accepted() {
        let rules = rules(&[("ab", Style::new().red()), ("cd", Style::new().blue())]);
        let spans = resolve_spans("abcd", &rules);
        assert_eq!(ranges(&spans), vec![0..2, 2..4]);
    }

    #[test]
    fn test_spans_sorted_by_start() {
        let rules = rules(&[("z", Style::new().red()), ("a", Style::new().blue())]);
        let spans = resolve_spans("a z a", &rules);
        assert_eq!(ranges(&spans), vec![0..1, 2..3, 4..5]);
    }

    #[test]
    fn test_restores_ambient_after_span() {
        let rules = rules(&[("mid", Style::new().red())]);
        let out = highlight("premidpost", &Style::new().yellow(), &rules, &Capabilities::ansi());
        assert_eq!(out, "\x1b[33mpre\x1b[31mmid\x1b[0m\x1b[33mpost\x1b[0m");
    }

    #[test]
    fn test_error_line_with_quoted_string() {
        let rules = rules(&[(r#""[^"]*""#, Style::new().yellow())]);
        let ambient = Style::new().red().bold();
        let out = highlight(
            r#"Failed to open file "abc""#,
            &ambient,
            &rules,
            &Capabilities::ansi(),
        );
        assert_eq!(
            out,
            "\x1b[1;31mFailed to open file \x1b[1;33m\"abc\"\x1b[0m\x1b[1;31m\x1b[0m"
        );
    }

    #[test]
    fn test_span_matching_ambient_is_not_bracketed() {
        let rules = rules(&[("oops", Style::new().red())]);
        let out = highlight("oops!", &Style::new().red(), &rules, &Capabilities::ansi());
        assert_eq!(out, "\x1b[31moops!\x1b[0m");
    }

    #[test]
    fn test_ambient_only() {
        let out = highlight("hello", &Style::new().green(), &rules(&[]), &Capabilities::ansi());
        assert_eq!(out, "\x1b[32mhello\x1b[0m");
    }

    #[test]
    fn test_unsupported_terminal_emits_no_escapes() {
        let text = r#"ERROR: failed to read "config.yaml" **twice**"#;
        let out = highlight(
            text,
            &Style::new().red().bold(),
            &default_keyword_rules(),
            &Capabilities::none(),
        );
        assert_eq!(out, text);
    }

    #[test]
    fn test_partial_capabilities_drop_facets() {
        let caps = Capabilities::ansi().with_color(false);
        let rules = rules(&[("b", Style::new().red().underline())]);
        let out = highlight("abc", &Style::new(), &rules, &caps);
        assert_eq!(out, "a\x1b[4mb\x1b[0mc\x1b[0m");
    }

    #[test]
    fn test_zero_length_matches_skipped() {
        let rules = rules(&[("x*", Style::new().red())]);
        let spans = resolve_spans("abc", &rules);
        assert!(spans.is_empty());
        assert_eq!(
            highlight("abc", &Style::new(), &rules, &Capabilities::ansi()),
            "abc"
        );
    }

    #[test]
    fn test_capture_groups_style_whole_match() {
        let rules = rules(&[(r"id=(\d+)", Style::new().cyan())]);
        let spans = resolve_spans("user id=42 ok", &rules);
        assert_eq!(ranges(&spans), vec![5..10]);
    }

    #[test]
    fn test_multibyte_text() {
        let rules = rules(&[("é+", Style::new().red())]);
        let out = highlight("caféé!", &Style::new(), &rules, &Capabilities::ansi());
        assert_eq!(out, "caf\x1b[31méé\x1b[0m!\x1b[0m");
    }

    #[test]
    fn test_default_rules_bold_markdown_over_italic() {
        let spans = resolve_spans("a **strong** word", &default_keyword_rules());
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].range, 2..12);
        assert_eq!(spans[0].style, Style::new().bold());
    }

    #[test]
    fn test_default_rules_level_words_case_insensitive() {
        let spans = resolve_spans("Warning: retry FAILED", &default_keyword_rules());
        assert_eq!(ranges(&spans), vec![0..7, 15..21]);
    }

    #[test]
    fn test_pinned_spans_outrank_rules() {
        let rules = rules(&[("app", Style::new().red())]);
        let pinned = [Span::new(0..3, Style::new().cyan())];
        let out = highlight_pinned("app: app", &Style::new(), &pinned, &rules, &Capabilities::ansi());
        assert_eq!(
            out,
            "\x1b[36mapp\x1b[0m: \x1b[31mapp\x1b[0m\x1b[0m"
        );
    }

    #[test]
    fn test_invalid_pinned_spans_ignored() {
        let text = "héllo";
        let pinned = [
            Span::new(0..0, Style::new().red()),
            Span::new(2..3, Style::new().red()),
            Span::new(3..99, Style::new().red()),
            Span::new(0..1, Style::new().blue()),
            Span::new(0..3, Style::new().green()),
        ];
        let spans = resolve_pinned_spans(text, &pinned, &rules(&[]));
        assert_eq!(spans, vec![Span::new(0..1, Style::new().blue())]);
    }
}
