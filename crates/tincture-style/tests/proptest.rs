use proptest::prelude::*;
use tincture_style::{
    default_keyword_rules, highlight, resolve_spans, Attribute, Attributes, Capabilities, Color,
    PatternRules, RuleDomain, Style,
};

// Strategy for arbitrary styles: any color (or none), any attribute subset
fn style_strategy() -> impl Strategy<Value = Style> {
    let color = prop_oneof![
        Just(None::<Color>),
        (0u8..16).prop_map(Color::from_index),
    ];
    let attributes = prop::collection::vec(prop::sample::select(Attribute::ALL.to_vec()), 0..5)
        .prop_map(|attrs| attrs.into_iter().collect::<Attributes>());

    (color, attributes).prop_map(|(color, attributes)| {
        let base = attributes
            .iter()
            .fold(Style::new(), |style, attr| style.attr(attr));
        match color {
            Some(c) => base.fg(c),
            None => base,
        }
    })
}

// Strategy for arbitrary capability sets
fn caps_strategy() -> impl Strategy<Value = Capabilities> {
    (any::<bool>(), prop::collection::vec(any::<bool>(), 5)).prop_map(|(color, flags)| {
        Attribute::ALL
            .iter()
            .zip(flags)
            .fold(Capabilities::none().with_color(color), |caps, (attr, on)| {
                caps.with_attribute(*attr, on)
            })
    })
}

// Strategy for short keyword rule sets built from literal fragments
fn rules_strategy() -> impl Strategy<Value = PatternRules> {
    prop::collection::vec(("[a-c]{1,3}", style_strategy()), 0..5).prop_map(|entries| {
        let entries: Vec<(&str, Style)> = entries.iter().map(|(k, s)| (k.as_str(), *s)).collect();
        PatternRules::from_entries(RuleDomain::Keyword, entries).unwrap()
    })
}

proptest! {
    #[test]
    fn test_highlight_identity_without_rules(text in ".*") {
        let empty = PatternRules::empty(RuleDomain::Keyword);
        prop_assert_eq!(highlight(&text, &Style::new(), &empty, &Capabilities::ansi()), text);
    }

    #[test]
    fn test_render_fully_degrades(style in style_strategy()) {
        prop_assert_eq!(style.render(&Capabilities::none()), "");
    }

    #[test]
    fn test_highlight_plain_on_unsupported_terminal(
        text in "[a-c *_`\"]{0,40}",
        ambient in style_strategy(),
    ) {
        let out = highlight(&text, &ambient, &default_keyword_rules(), &Capabilities::none());
        prop_assert_eq!(out, text);
    }

    #[test]
    fn test_combine_associative(
        a in style_strategy(),
        b in style_strategy(),
        c in style_strategy(),
    ) {
        prop_assert_eq!(a.combine(&b).combine(&c), a.combine(&b.combine(&c)));
    }

    #[test]
    fn test_combine_identity(a in style_strategy()) {
        prop_assert_eq!(Style::new().combine(&a), a);
        prop_assert_eq!(a.combine(&Style::new()), a);
    }

    #[test]
    fn test_filtering_idempotent(a in style_strategy(), caps in caps_strategy()) {
        let filtered = a.filtered(&caps);
        prop_assert_eq!(filtered.combine(&filtered).render(&caps), a.render(&caps));
        prop_assert_eq!(filtered.filtered(&caps), filtered);
    }

    #[test]
    fn test_resolved_spans_disjoint_and_sorted(
        text in "[a-c ]{0,40}",
        rules in rules_strategy(),
    ) {
        let spans = resolve_spans(&text, &rules);
        for pair in spans.windows(2) {
            prop_assert!(pair[0].range.end <= pair[1].range.start);
        }
        for span in &spans {
            prop_assert!(span.range.start < span.range.end);
            prop_assert!(span.range.end <= text.len());
        }
    }

    #[test]
    fn test_highlight_preserves_text(
        text in "[a-c ]{0,40}",
        ambient in style_strategy(),
        rules in rules_strategy(),
    ) {
        let out = highlight(&text, &ambient, &rules, &Capabilities::ansi());
        prop_assert_eq!(console::strip_ansi_codes(&out), text.as_str());
    }
}
