use lazy_static::lazy_static;
use regex::{Captures, Regex};

/// 语法规则，对应每一种块级或行内识别器
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    TitlePage,
    SceneHeading,
    SceneNumber,
    Centered,
    Transition,
    Dialogue,
    Parenthetical,
    Section,
    Synopsis,
    Note,
    NoteInline,
    Boneyard,
    PageBreak,
    LineBreak,
    Lyrics,
}

/// 行内强调样式，按优先级排列
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineStyle {
    BoldItalicUnderline,
    BoldUnderline,
    ItalicUnderline,
    BoldItalic,
    Bold,
    Italic,
    Underline,
}

pub struct FountainConstants;

impl FountainConstants {
    // 转义字符的占位符，使用私有区字符，不会与正文冲突
    pub const ESCAPED_STAR: &'static str = "\u{E000}";
    pub const ESCAPED_UNDERLINE: &'static str = "\u{E001}";

    pub const LINE_BREAK_HTML: &'static str = "<br />";

    /// 按规则匹配文本，未匹配返回 None
    pub fn matches(rule: Rule, text: &str) -> Option<Captures<'_>> {
        // synopsis 不能以 == 开头
        if rule == Rule::Synopsis && text.starts_with("==") {
            return None;
        }
        Self::regex(rule).captures(text)
    }

    pub fn is_match(rule: Rule, text: &str) -> bool {
        Self::matches(rule, text).is_some()
    }

    pub fn regex(rule: Rule) -> &'static Regex {
        match rule {
            Rule::TitlePage => &*TITLE_PAGE,
            Rule::SceneHeading => &*SCENE_HEADING,
            Rule::SceneNumber => &*SCENE_NUMBER,
            Rule::Centered => &*CENTERED,
            Rule::Transition => &*TRANSITION,
            Rule::Dialogue => &*DIALOGUE,
            Rule::Parenthetical => &*PARENTHETICAL,
            Rule::Section => &*SECTION,
            Rule::Synopsis => &*SYNOPSIS,
            Rule::Note => &*NOTE,
            Rule::NoteInline => &*NOTE_INLINE,
            Rule::Boneyard => &*BONEYARD,
            Rule::PageBreak => &*PAGE_BREAK,
            Rule::LineBreak => &*LINE_BREAK,
            Rule::Lyrics => &*LYRICS,
        }
    }

    /// 统一换行符为 \n
    pub fn standardize(text: &str) -> String {
        STANDARDIZER.replace_all(text, "\n").to_string()
    }

    /// 把 /* 和 */ 单独分成一块
    ///
    /// 只处理两侧都是空白或文本边界的标记，`**and**/or` 这类强调符号相连的不算
    pub fn isolate_boneyard(text: &str) -> String {
        let is_blank = |c: char| c == ' ' || c == '\t' || c == '\n';
        let mut out = String::with_capacity(text.len());
        let mut last = 0;

        for m in BONEYARD_DELIMITER.find_iter(text) {
            let before = text[..m.start()].chars().next_back();
            let after = text[m.end()..].chars().next();
            if !before.map_or(true, is_blank) || !after.map_or(true, is_blank) {
                continue;
            }
            out.push_str(text[last..m.start()].trim_end_matches(is_blank));
            out.push_str("\n\n");
            out.push_str(m.as_str());
            out.push_str("\n\n");

            let rest = &text[m.end()..];
            last = m.end() + (rest.len() - rest.trim_start_matches(is_blank).len());
        }

        out.push_str(&text[last..]);
        out
    }

    /// 去除行首的 tab 或三个以上空格的缩进
    pub fn strip_indentation(text: &str) -> String {
        WHITESPACER.replace_all(text, "").to_string()
    }

    /// 纯空白行置空，恰好两个空格的强制换行行除外
    pub fn blank_whitespace_lines(text: &str) -> String {
        text.split('\n')
            .map(|line| {
                if line != "  " && line.trim().is_empty() {
                    ""
                } else {
                    line
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// 连续多个空行合并成一个块分隔
    pub fn collapse_blank_runs(text: &str) -> String {
        BLANK_RUN.replace_all(text, "\n\n").to_string()
    }

    /// 按空行切分成块
    pub fn split_blocks(text: &str) -> Vec<&str> {
        SPLITTER.split(text).collect()
    }

    /// 对白正文按括号注释行切分
    pub fn dialogue_splitter() -> &'static Regex {
        &*DIALOGUE_SPLITTER
    }

    pub fn html_tag() -> &'static Regex {
        &*HTML_TAG
    }

    /// 行内样式表，顺序即优先级
    pub fn inline_styles() -> &'static [(InlineStyle, Regex, String)] {
        &*INLINE_STYLES
    }
}

const UNDERLINE_OPEN: &str = r#"<span style="text-decoration:underline !important">"#;

lazy_static! {
    // 块级元素正则
    static ref TITLE_PAGE: Regex = Regex::new(
        r"(?im)^((?:title|credit|author[s]?|source|notes|draft date|date|contact|copyright):)"
    ).unwrap();
    static ref SCENE_HEADING: Regex = Regex::new(
        r"(?i)^(?:((?:\*{0,3}_?)?(?:int|ext|est|i/e)[. ].+)|\.([^.\n].*))"
    ).unwrap();
    static ref SCENE_NUMBER: Regex = Regex::new(r"( *#(.+)# *)").unwrap();
    static ref CENTERED: Regex = Regex::new(r"^> *(.+) *<(\n.+)*").unwrap();
    static ref TRANSITION: Regex = Regex::new(
        r"^((?:FADE (?:TO BLACK|OUT)|CUT TO BLACK)\.|.+ TO:)|^> *(.+)"
    ).unwrap();
    static ref DIALOGUE: Regex = Regex::new(
        r"^(@?[A-Za-z*_]+[0-9A-Z (._\-'’)]*)(\^?)\n([^\n][\s\S]*)"
    ).unwrap();
    static ref PARENTHETICAL: Regex = Regex::new(r"^(\(.+\))$").unwrap();
    static ref SECTION: Regex = Regex::new(r"^(#+) *(.*)").unwrap();
    static ref SYNOPSIS: Regex = Regex::new(r"^= *(.*)").unwrap();
    static ref NOTE: Regex = Regex::new(r"^\[\[([^\[].*)\]\]$").unwrap();
    static ref NOTE_INLINE: Regex = Regex::new(r"\[\[([^\[][\s\S]*?)\]\]").unwrap();
    static ref BONEYARD: Regex = Regex::new(r"^(/\*|\*/)$").unwrap();
    static ref PAGE_BREAK: Regex = Regex::new(r"^={3,}$").unwrap();
    static ref LINE_BREAK: Regex = Regex::new(r"^ {2}$").unwrap();
    static ref LYRICS: Regex = Regex::new(r"^~(.+)").unwrap();

    // 文本清理
    static ref STANDARDIZER: Regex = Regex::new(r"\r\n|\r").unwrap();
    static ref BONEYARD_DELIMITER: Regex = Regex::new(r"/\*|\*/").unwrap();
    static ref WHITESPACER: Regex = Regex::new(r"(?m)^(?:\t| {3,})[\t ]*").unwrap();
    static ref BLANK_RUN: Regex = Regex::new(r"\n{3,}").unwrap();
    static ref SPLITTER: Regex = Regex::new(r"\n{2,}").unwrap();
    static ref DIALOGUE_SPLITTER: Regex = Regex::new(r"(\(.+\))\n+").unwrap();
    static ref HTML_TAG: Regex = Regex::new(r"<[^>]*>").unwrap();

    // 行内样式正则
    static ref INLINE_STYLES: Vec<(InlineStyle, Regex, String)> = vec![
        (
            InlineStyle::BoldItalicUnderline,
            Regex::new(r"(_\*{3}|\*{3}_)(.+?)(\*{3}_|_\*{3})").unwrap(),
            format!("<strong><em>{}${{2}}</span></em></strong>", UNDERLINE_OPEN),
        ),
        (
            InlineStyle::BoldUnderline,
            Regex::new(r"(_\*{2}|\*{2}_)(.+?)(\*{2}_|_\*{2})").unwrap(),
            format!("<strong>{}${{2}}</span></strong>", UNDERLINE_OPEN),
        ),
        (
            InlineStyle::ItalicUnderline,
            Regex::new(r"(_\*|\*_)(.+?)(\*_|_\*)").unwrap(),
            format!("<em>{}${{2}}</span></em>", UNDERLINE_OPEN),
        ),
        (
            InlineStyle::BoldItalic,
            Regex::new(r"(\*{3})(.+?)(\*{3})").unwrap(),
            "<strong><em>${2}</em></strong>".to_string(),
        ),
        (
            InlineStyle::Bold,
            Regex::new(r"(\*{2})(.+?)(\*{2})").unwrap(),
            "<strong>${2}</strong>".to_string(),
        ),
        (
            InlineStyle::Italic,
            Regex::new(r"(\*)(.+?)(\*)").unwrap(),
            "<em>${2}</em>".to_string(),
        ),
        (
            InlineStyle::Underline,
            Regex::new(r"(_)(.+?)(_)").unwrap(),
            format!("{}${{2}}</span>", UNDERLINE_OPEN),
        ),
    ];
}
