use super::*;
use facet_testhelpers::test;

/// One-line dump of a forest: `(tag @name="value" children...)`, text quoted.
fn dump(nodes: &[Node]) -> String {
    nodes.iter().map(dump_node).collect::<Vec<_>>().join(" ")
}

fn dump_node(node: &Node) -> String {
    match node {
        Node::Text(text) => format!("{:?}", text),
        Node::Tag(tag) => {
            let mut out = format!("({}", tag.name);
            for (name, value) in tag.attributes.iter() {
                out.push_str(&format!(" @{}={:?}", name, value));
            }
            for child in &tag.children {
                out.push(' ');
                out.push_str(&dump_node(child));
            }
            out.push(')');
            out
        }
    }
}

fn parse_clean(source: &str) -> String {
    let parsed = parse(source);
    assert!(parsed.is_clean(), "unexpected errors: {:?}", parsed.errors);
    dump(&parsed.nodes)
}

#[test]
fn test_simple_tag() {
    insta::assert_snapshot!(parse_clean("[b]bold[/b]"), @r#"(b "bold")"#);
}

#[test]
fn test_nested_tags() {
    insta::assert_snapshot!(parse_clean("[b][i]x[/i]y[/b]"), @r#"(b (i "x") "y")"#);
}

#[test]
fn test_list_items_are_self_contained() {
    insta::assert_snapshot!(
        parse_clean("[list]\n[*]one\n[*]two\n[/list]"),
        @r#"(list "\n" (*) "one" "\n" (*) "two" "\n")"#
    );
}

#[test]
fn test_bare_value_is_keyed_by_itself() {
    insta::assert_snapshot!(
        parse_clean("[url=https://x.org]link[/url]"),
        @r#"(url @https://x.org="https://x.org" "link")"#
    );
}

#[test]
fn test_named_attributes_in_order() {
    insta::assert_snapshot!(
        parse_clean("[style color=red size=\"2em\"]x[/style]"),
        @r#"(style @color="red" @size="2em" "x")"#
    );
}

#[test]
fn test_boolean_attribute_gets_empty_value() {
    insta::assert_snapshot!(
        parse_clean("[video autoplay src=a.mp4]"),
        @r#"(video @autoplay="" @src="a.mp4")"#
    );
}

#[test]
fn test_self_contained_tag_keeps_its_attributes() {
    let parsed = parse("[img=cat.png] ok");
    let img = parsed.nodes[0].as_tag().unwrap();
    assert_eq!(img.attr("cat.png"), Some("cat.png"));
    assert_eq!(img.span, Some(Span::new(0, 13)));
    insta::assert_snapshot!(dump(&parsed.nodes), @r#"(img @cat.png="cat.png") " " "ok""#);
}

#[test]
fn test_stray_closer_is_reported_and_dropped() {
    let parsed = parse("[/y]");
    assert!(parsed.nodes.is_empty());
    assert_eq!(parsed.errors.len(), 1);
    assert_eq!(parsed.errors[0].tag_name(), "y");
    assert_eq!(
        parsed.errors[0].kind,
        ParseErrorKind::InconsistentTag {
            name: "y".to_string()
        }
    );
}

#[test]
fn test_stray_closer_keeps_surrounding_text() {
    let source = "a [/y] b\n  [/q]";
    let parsed = parse(source);
    insta::assert_snapshot!(dump(&parsed.nodes), @r#""a" " " " " "b" "\n" " " " ""#);

    let positions: Vec<_> = parsed
        .errors
        .iter()
        .map(|e| (e.tag_name(), e.line, e.column, e.span.slice(source)))
        .collect();
    assert_eq!(positions, vec![("y", 0, 2, "[/y]"), ("q", 1, 2, "[/q]")]);
    assert_eq!(
        parsed.errors[1].to_string(),
        "Inconsistent tag 'q' on line 1 and column 2"
    );
}

#[test]
fn test_mismatched_closer_closes_innermost() {
    insta::assert_snapshot!(parse_clean("[b][i]x[/b][/i]"), @r#"(b (i "x"))"#);
}

#[test]
fn test_allow_list_keeps_other_tags_as_text() {
    let options = ParseOptions::new().only_allow_tags(["b"]);
    let parsed = parse_with("[b]x[/b] [i]y[/i]", &options);
    insta::assert_snapshot!(dump(&parsed.nodes), @r#"(b "x") " " "[i]" "y" "[/i]""#);

    let parsed = parse_with("[color=red]x[/color]", &options);
    assert!(parsed.is_clean());
    insta::assert_snapshot!(dump(&parsed.nodes), @r#""[color=red]" "x" "[/color]""#);
}

#[test]
fn test_malformed_tags_stay_text() {
    insta::assert_snapshot!(
        parse_clean("[] [=] [sc"),
        @r#""[]" " " "[=]" " " "[sc""#
    );
}

#[test]
fn test_phrase_tag() {
    let parsed = parse("[Single Tag]x[/Single Tag]");
    assert_eq!(parsed.nodes[0].tag_name(), Some("Single Tag"));
    assert_eq!(text_content(&parsed.nodes), "x");
}

#[test]
fn test_custom_delimiters() {
    let options = ParseOptions::new().delimiters('<', '>');
    let parsed = parse_with("<b>x</b> [b]", &options);
    insta::assert_snapshot!(dump(&parsed.nodes), @r#"(b "x") " " "[b]""#);
}

/// A source that says no tag ever waits for a closer.
struct NeverNested<'src>(Tokenizer<'src>);

impl<'src> Iterator for NeverNested<'src> {
    type Item = Token<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }
}

impl<'src> TokenSource<'src> for NeverNested<'src> {
    fn is_nested(&self, _name: &str) -> bool {
        false
    }
}

#[test]
fn test_custom_token_source() {
    let parsed = parse_tokens(NeverNested(Tokenizer::new("[b]x[/b]")), &ParseOptions::new());
    insta::assert_snapshot!(dump(&parsed.nodes), @r#"(b) "x""#);
    assert_eq!(parsed.errors.len(), 1);
    assert_eq!(parsed.errors[0].tag_name(), "b");
}

#[test]
fn test_whitespace_is_preserved() {
    let source = "[quote]\n\tone  two\n[/quote]";
    let parsed = parse(source);
    assert_eq!(parsed.nodes.len(), 1);
    assert_eq!(text_content(&parsed.nodes), "\n\tone  two\n");
}

#[test]
fn test_parallel_parses_are_independent() {
    let inputs = ["[b]a[/b]", "[/x]", "[i]b[/i][/i]"];
    let results: Vec<Parsed> = std::thread::scope(|scope| {
        let handles: Vec<_> = inputs
            .iter()
            .map(|input| scope.spawn(move || parse(input)))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("parse thread panicked"))
            .collect()
    });

    let error_counts: Vec<_> = results.iter().map(|p| p.errors.len()).collect();
    assert_eq!(error_counts, vec![0, 1, 1]);
    assert_eq!(results[0], parse("[b]a[/b]"));
}

#[test]
fn test_many_list_items_parse_flat() {
    let items = "[*]".repeat(20_000);
    let parsed = parse(&items);
    assert!(parsed.is_clean());
    assert_eq!(parsed.nodes.len(), 20_000);
    assert!(parsed.nodes.iter().all(|n| n.tag_name() == Some("*")));

    // a stray closer up front makes every item wait for a closer that never comes
    let parsed = parse(&format!("[/*]{items}"));
    assert_eq!(parsed.errors.len(), 1);
    assert_eq!(parsed.nodes.len(), 20_000);
    assert!(parsed.nodes.iter().all(|n| n.as_text() == Some("[*]")));
}

mod proptests {
    use super::super::*;
    use proptest::prelude::*;

    /// Balanced markup with plain text inside each tag, plus the expected text.
    fn balanced() -> impl Strategy<Value = (String, String)> {
        let text = prop::string::string_regex("[a-z \t\n]{0,12}").unwrap();
        let tag = prop_oneof![Just("b"), Just("i"), Just("quote")];
        prop::collection::vec((tag, text), 0..6).prop_map(|parts| {
            let mut source = String::from("[list]");
            let mut expected = String::new();
            for (tag, text) in parts {
                source.push_str(&format!("[{tag}]{text}[/{tag}]"));
                expected.push_str(&text);
            }
            source.push_str("[/list]");
            (source, expected)
        })
    }

    proptest! {
        #[test]
        fn text_leaves_round_trip((source, expected) in balanced()) {
            let parsed = parse(&source);
            prop_assert!(parsed.is_clean());
            prop_assert_eq!(parsed.nodes.len(), 1);
            prop_assert_eq!(text_content(&parsed.nodes), expected);
        }

        #[test]
        fn any_input_parses(input in r#"[ab/*=" \n\[\]]{0,40}"#) {
            let parsed = parse(&input);
            for error in &parsed.errors {
                prop_assert!(error.span.slice(&input).starts_with("[/"));
            }
        }
    }
}
