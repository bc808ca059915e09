//! Property tests over the scanner and parser.

use moka::{compile, parse, scan, Diagnostics};
use proptest::prelude::*;

const VALID_PROGRAMS: &[&str] = &[
    "class C {}",
    "class A {} class B extends A { A a = new A(); }",
    "class P { int age = 12; boolean ok; P(int a) { age = a; } }",
    "class M { void run() { while (i < 10 || done) { i = i; } return; } }",
    "class N { int f(int a, int b) {
        if (a >= b && a == 1) return a; else return b;
    } }",
    "class Q { void g() { ; { this.x.y = f(1, true); } break; } }",
];

const FRAGMENTS: &[&str] = &[
    "class", "extends", "new", "int", "void", "true", "false", "x", "y1",
    "intboolean", "elseclass", "42", "0", "{", "}", "(", ")", ".", ",", ";",
    "=", "==", "<", "<=", ">", ">=", "&&", "||",
];

const GAPS: &[&str] = &[" ", "\n", "\t", "  \r\n"];

fn proptest_config() -> ProptestConfig {
    let default = ProptestConfig::default();
    ProptestConfig {
        cases: default.cases.max(512),
        ..default
    }
}

proptest! {
    #![proptest_config(proptest_config())]

    #[test]
    fn scanner_never_panics(input in "\\PC{0,300}") {
        let _tokens = scan(&input, &mut Diagnostics::default());
    }

    #[test]
    fn offsets_are_strictly_increasing(input in "\\PC{0,300}") {
        let tokens = scan(&input, &mut Diagnostics::default());
        for window in tokens.windows(2) {
            prop_assert!(
                window[0].offset < window[1].offset,
                "{:?} then {:?} in {:?}",
                window[0],
                window[1],
                input,
            );
        }
        for token in &tokens {
            prop_assert!(token.offset < input.len());
        }
    }

    /// The text between consecutive tokens is only whitespace and each
    /// token's text rescans to the same token.
    #[test]
    fn tokens_and_whitespace_partition_the_input(
        fragments in prop::collection::vec(
            (prop::sample::select(FRAGMENTS), prop::sample::select(GAPS)),
            0..60,
        )
    ) {
        let input: String = fragments
            .iter()
            .flat_map(|(fragment, gap)| [*fragment, *gap])
            .collect();
        let mut diagnostics = Diagnostics::default();
        let tokens = scan(&input, &mut diagnostics);
        prop_assert!(diagnostics.is_empty(), "{:?}", diagnostics.items);

        let mut ends =
            tokens.iter().skip(1).map(|t| t.offset).collect::<Vec<_>>();
        ends.push(input.len());
        let mut cursor = 0;
        for (token, end) in tokens.iter().zip(ends) {
            prop_assert!(input[cursor..token.offset].trim().is_empty());
            let text = input[token.offset..end].trim_end();
            let rescanned = scan(text, &mut Diagnostics::default());
            prop_assert_eq!(rescanned.len(), 1);
            prop_assert_eq!(&rescanned[0].kind, &token.kind);
            cursor = token.offset + text.len();
        }
        prop_assert!(input[cursor..].trim().is_empty());
    }

    #[test]
    fn valid_programs_parse_deterministically(
        source in prop::sample::select(VALID_PROGRAMS)
    ) {
        let first = compile(source);
        let second = compile(source);
        prop_assert!(first.is_ok(), "{:?}", first);
        prop_assert_eq!(format!("{first:?}"), format!("{second:?}"));
    }

    #[test]
    fn parser_never_panics_on_scanned_input(input in "\\PC{0,300}") {
        let mut diagnostics = Diagnostics::default();
        let tokens = scan(&input, &mut diagnostics);
        let before = diagnostics.len();
        let result = parse(&tokens, &mut diagnostics);
        prop_assert_eq!(
            diagnostics.len() - before,
            usize::from(result.is_err())
        );
    }
}
