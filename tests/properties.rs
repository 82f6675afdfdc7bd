use fountain_html::{normalize, parse, tokenize, ParserOptions, TokenKind};
use proptest::prelude::*;

// 覆盖大部分语法标记的字符集
const SCRIPT_CHARS: &str = "[a-zA-Z0-9 .:#=>/<*_~^@()\\[\\]\\\\\t\r\n-]{0,200}";

proptest! {
    #[test]
    fn normalize_is_idempotent(script in SCRIPT_CHARS) {
        let once = normalize(&script);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn tokenize_is_total(script in SCRIPT_CHARS) {
        let tokens = tokenize(&script);
        prop_assert_eq!(tokens.is_empty(), normalize(&script).is_empty());
    }

    #[test]
    fn dialogue_containers_balance(script in SCRIPT_CHARS) {
        let tokens = tokenize(&script);
        let begins = tokens.iter().filter(|t| t.kind == TokenKind::DialogueBegin).count();
        let ends = tokens.iter().filter(|t| t.kind == TokenKind::DialogueEnd).count();
        prop_assert_eq!(begins, ends);
    }

    #[test]
    fn pages_partition_fragments(script in SCRIPT_CHARS) {
        let options = ParserOptions { emit_script_html_array: true, ..ParserOptions::default() };
        let document = parse(&script, options);
        let fragments: String = document
            .script_html_array
            .unwrap_or_default()
            .into_iter()
            .filter(|f| f != "<hr class=\"page-break\" />")
            .collect();
        let pages: String = document.script_pages.iter().map(|p| p.html.as_str()).collect();
        prop_assert_eq!(pages, fragments);
    }
}
