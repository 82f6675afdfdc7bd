use log::{debug, trace};
use crate::models::{DualSide, Token, TokenKind};
use crate::utils::{ends_with_forced_break, trim_preserving_break, FountainConstants, Rule};

/// 块分类器，匹配成功时写入 token 并返回 true
type Classifier = fn(&mut TokenStream, &str) -> bool;

/// 按优先级排列的分类器，全部不匹配时归为 action
const CLASSIFIERS: [(&str, Classifier); 12] = [
    ("title_page", classify_title_page),
    ("scene_heading", classify_scene_heading),
    ("centered", classify_centered),
    ("transition", classify_transition),
    ("dialogue", classify_dialogue),
    ("section", classify_section),
    ("synopsis", classify_synopsis),
    ("note", classify_note),
    ("boneyard", classify_boneyard),
    ("page_break", classify_page_break),
    ("line_break", classify_line_break),
    ("lyrics", classify_lyrics),
];

/// 清理剧本文本，使之可以按块切分
///
/// 对已清理过的文本再次调用不会产生变化
pub fn normalize(script: &str) -> String {
    let s = FountainConstants::standardize(script);
    let s = FountainConstants::isolate_boneyard(&s);
    let s = FountainConstants::strip_indentation(&s);
    let s = FountainConstants::blank_whitespace_lines(&s);
    let s = FountainConstants::collapse_blank_runs(&s);
    s.trim_matches('\n').to_string()
}

/// 把剧本文本切分成 token 序列
///
/// 任何输入都会得到结果，无法识别的块一律作为 action
pub fn tokenize(script: &str) -> Vec<Token> {
    let normalized = normalize(script);
    if normalized.is_empty() {
        return Vec::new();
    }

    let mut stream = TokenStream::default();
    for block in FountainConstants::split_blocks(&normalized) {
        classify_block(&mut stream, block);
    }
    stream.finish()
}

fn classify_block(stream: &mut TokenStream, block: &str) {
    for (name, classifier) in CLASSIFIERS.iter() {
        if classifier(stream, block) {
            trace!("块归类为 {}: {:?}", name, block);
            return;
        }
    }
    trace!("块归类为 action: {:?}", block);
    stream.emit(Token::with_text(TokenKind::Action, block));
}

/// token 输出流
///
/// 最近一段对白先放在缓冲区，直到确认它不是双对话的左侧才提交
#[derive(Default)]
struct TokenStream {
    tokens: Vec<Token>,
    pending_dialogue: Vec<Token>,
    scene_number: usize,
}

impl TokenStream {
    fn emit(&mut self, token: Token) {
        self.commit_dialogue();
        self.tokens.push(token);
    }

    fn commit_dialogue(&mut self) {
        self.tokens.append(&mut self.pending_dialogue);
    }

    fn emit_dialogue(&mut self, mut run: Vec<Token>, dual: bool) {
        if dual && !self.pending_dialogue.is_empty() {
            let mut left = std::mem::take(&mut self.pending_dialogue);
            if let Some(begin) = left.first_mut() {
                begin.dual = Some(DualSide::Left);
            }
            if let Some(begin) = run.first_mut() {
                begin.dual = Some(DualSide::Right);
            }
            debug!("双对话: {} / {}", character_of(&left), character_of(&run));

            self.tokens.push(Token::new(TokenKind::DualDialogueBegin));
            self.tokens.append(&mut left);
            self.tokens.append(&mut run);
            self.tokens.push(Token::new(TokenKind::DualDialogueEnd));
            return;
        }

        if dual {
            debug!("双对话标记 {} 前面没有紧邻的对白，按普通对白处理", character_of(&run));
        }
        self.commit_dialogue();
        self.pending_dialogue = run;
    }

    fn finish(mut self) -> Vec<Token> {
        self.commit_dialogue();
        self.tokens
    }
}

fn character_of(run: &[Token]) -> &str {
    run.iter()
        .find(|t| t.is_type(&[TokenKind::Character]))
        .map(|t| t.text_or_empty())
        .unwrap_or("")
}

// 标题页
fn classify_title_page(stream: &mut TokenStream, block: &str) -> bool {
    let starts: Vec<usize> = FountainConstants::regex(Rule::TitlePage)
        .find_iter(block)
        .map(|m| m.start())
        .collect();
    let Some(&first) = starts.first() else {
        return false;
    };

    let lead = block[..first].trim();
    if !lead.is_empty() {
        debug!("忽略标题页中无法识别的内容: {:?}", lead);
    }

    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(block.len());
        let segment = block[start..end].trim_matches('\n');
        // 值里面的冒号保留，只按第一个冒号分开
        let (key, value) = segment.split_once(':').unwrap_or((segment, ""));
        match TokenKind::from_title_key(key) {
            Some(kind) => stream.emit(Token::with_text(kind, value.trim())),
            None => debug!("未知的标题页字段: {:?}", key),
        }
    }
    true
}

// 场景标题
fn classify_scene_heading(stream: &mut TokenStream, block: &str) -> bool {
    let Some(caps) = FountainConstants::matches(Rule::SceneHeading, block) else {
        return false;
    };
    let heading = caps
        .get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str())
        .unwrap_or("");

    // 以强制换行结尾的不是场景标题
    if ends_with_forced_break(heading) {
        return false;
    }

    let mut text = heading.to_string();
    if let Some(number_caps) = FountainConstants::matches(Rule::SceneNumber, heading) {
        if let (Some(marker), Some(value)) = (number_caps.get(1), number_caps.get(2)) {
            text = format!("{}{}", &heading[..marker.start()], &heading[marker.end()..]);
            match value.as_str().trim().parse::<usize>() {
                Ok(number) => stream.scene_number = number,
                Err(_) => debug!("场景编号不是数字，保持自动编号: {:?}", value.as_str()),
            }
        }
    }

    let mut synopses = Vec::new();
    for line in block.lines().skip(1) {
        match FountainConstants::matches(Rule::Synopsis, line) {
            Some(s) => synopses.push(s[1].trim().to_string()),
            None => debug!("场景标题块中的多余内容被忽略: {:?}", line),
        }
    }

    let mut token = Token::with_text(TokenKind::SceneHeading, text.trim());
    token.scene_number = Some(stream.scene_number);
    if !synopses.is_empty() {
        token.synopsis = Some(synopses.join("\n"));
    }
    stream.emit(token);
    stream.scene_number = stream.scene_number.saturating_add(1);
    true
}

// 居中文本
fn classify_centered(stream: &mut TokenStream, block: &str) -> bool {
    let Some(m) = FountainConstants::regex(Rule::Centered).find(block) else {
        return false;
    };
    let text = m
        .as_str()
        .replace(['>', '<'], "")
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n");
    stream.emit(Token::with_text(TokenKind::Centered, text));
    true
}

// 转场
fn classify_transition(stream: &mut TokenStream, block: &str) -> bool {
    let Some(caps) = FountainConstants::matches(Rule::Transition, block) else {
        return false;
    };
    let text = caps
        .get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().trim())
        .unwrap_or("");
    stream.emit(Token::with_text(TokenKind::Transition, text));
    true
}

// 对白块：角色、括号注释、对白
fn classify_dialogue(stream: &mut TokenStream, block: &str) -> bool {
    let Some(caps) = FountainConstants::matches(Rule::Dialogue, block) else {
        return false;
    };
    let cue = caps.get(1).map(|m| m.as_str()).unwrap_or("");
    if ends_with_forced_break(cue) {
        return false;
    }
    let dual = caps.get(2).map_or(false, |m| !m.as_str().is_empty());
    let body = caps.get(3).map(|m| m.as_str()).unwrap_or("");

    let mut run = vec![
        Token::new(TokenKind::DialogueBegin),
        Token::with_text(TokenKind::Character, cue.trim()),
    ];
    for part in split_dialogue_body(body) {
        let text = trim_preserving_break(part);
        if text.trim().is_empty() {
            continue;
        }
        if FountainConstants::is_match(Rule::Parenthetical, text.trim()) {
            run.push(Token::with_text(TokenKind::Parenthetical, text.trim()));
        } else {
            run.push(Token::with_text(TokenKind::Dialogue, text));
        }
    }
    run.push(Token::new(TokenKind::DialogueEnd));

    stream.emit_dialogue(run, dual);
    true
}

/// 按独占一行的括号注释切分对白正文，保留顺序，括号注释本身也作为一段
fn split_dialogue_body(body: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut last = 0;
    for caps in FountainConstants::dialogue_splitter().captures_iter(body) {
        if let (Some(whole), Some(paren)) = (caps.get(0), caps.get(1)) {
            parts.push(&body[last..whole.start()]);
            parts.push(paren.as_str());
            last = whole.end();
        }
    }
    parts.push(&body[last..]);
    parts
}

// 章节
fn classify_section(stream: &mut TokenStream, block: &str) -> bool {
    let Some(caps) = FountainConstants::matches(Rule::Section, block) else {
        return false;
    };
    let mut token = Token::with_text(TokenKind::Section, caps[2].trim());
    token.depth = Some(caps[1].len());
    stream.emit(token);
    true
}

// 概要
fn classify_synopsis(stream: &mut TokenStream, block: &str) -> bool {
    let Some(caps) = FountainConstants::matches(Rule::Synopsis, block) else {
        return false;
    };
    stream.emit(Token::with_text(TokenKind::Synopsis, caps[1].trim()));
    true
}

// 注解
fn classify_note(stream: &mut TokenStream, block: &str) -> bool {
    let Some(caps) = FountainConstants::matches(Rule::Note, block) else {
        return false;
    };
    stream.emit(Token::with_text(TokenKind::Note, &caps[1]));
    true
}

// boneyard 开闭标记
fn classify_boneyard(stream: &mut TokenStream, block: &str) -> bool {
    if !FountainConstants::is_match(Rule::Boneyard, block) {
        return false;
    }
    let kind = if block.starts_with('/') {
        TokenKind::BoneyardBegin
    } else {
        TokenKind::BoneyardEnd
    };
    stream.emit(Token::new(kind));
    true
}

// 分页符
fn classify_page_break(stream: &mut TokenStream, block: &str) -> bool {
    if !FountainConstants::is_match(Rule::PageBreak, block) {
        return false;
    }
    stream.emit(Token::new(TokenKind::PageBreak));
    true
}

// 强制空行
fn classify_line_break(stream: &mut TokenStream, block: &str) -> bool {
    if !FountainConstants::is_match(Rule::LineBreak, block) {
        return false;
    }
    stream.emit(Token::new(TokenKind::LineBreak));
    true
}

// 歌词
fn classify_lyrics(stream: &mut TokenStream, block: &str) -> bool {
    if !FountainConstants::is_match(Rule::Lyrics, block) {
        return false;
    }
    let text = block
        .lines()
        .map(|line| line.strip_prefix('~').unwrap_or(line))
        .collect::<Vec<_>>()
        .join("\n");
    stream.emit(Token::with_text(TokenKind::Lyrics, text));
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn classifier_order_is_fixed() {
        let names: Vec<&str> = CLASSIFIERS.iter().map(|(name, _)| *name).collect();
        assert_eq!(
            names,
            vec![
                "title_page", "scene_heading", "centered", "transition", "dialogue", "section",
                "synopsis", "note", "boneyard", "page_break", "line_break", "lyrics",
            ]
        );
    }

    #[rstest]
    #[case("> THE END <", TokenKind::Centered, Some("THE END"))]
    #[case("CUT TO:", TokenKind::Transition, Some("CUT TO:"))]
    #[case("FADE OUT.", TokenKind::Transition, Some("FADE OUT."))]
    #[case("> BURN TO WHITE", TokenKind::Transition, Some("BURN TO WHITE"))]
    #[case("# Act One", TokenKind::Section, Some("Act One"))]
    #[case("= They meet.", TokenKind::Synopsis, Some("They meet."))]
    #[case("[[call back later]]", TokenKind::Note, Some("call back later"))]
    #[case("/*", TokenKind::BoneyardBegin, None)]
    #[case("*/", TokenKind::BoneyardEnd, None)]
    #[case("===", TokenKind::PageBreak, None)]
    #[case("~Row, row, row", TokenKind::Lyrics, Some("Row, row, row"))]
    #[case("He sits down.", TokenKind::Action, Some("He sits down."))]
    #[case("==", TokenKind::Action, Some("=="))]
    fn classifies_single_blocks(#[case] input: &str, #[case] kind: TokenKind, #[case] text: Option<&str>) {
        let tokens = tokenize(input);
        assert_eq!(tokens.len(), 1, "{:?}", tokens);
        assert_eq!(tokens[0].kind, kind);
        assert_eq!(tokens[0].text.as_deref(), text);
    }

    #[test]
    fn section_depth_counts_hashes() {
        let tokens = tokenize("### Sequence");
        assert_eq!(tokens[0].depth, Some(3));
    }

    #[test]
    fn scene_numbers_count_from_zero() {
        let tokens = tokenize("INT. A - DAY\n\nEXT. B - NIGHT\n\n.MONTAGE");
        let numbers: Vec<Option<usize>> = tokens.iter().map(|t| t.scene_number).collect();
        assert_eq!(numbers, vec![Some(0), Some(1), Some(2)]);
    }

    #[test]
    fn scene_number_marker_resets_counter() {
        let tokens = tokenize("INT. A\n\nINT. B #10#\n\nINT. C");
        assert_eq!(tokens[1].text.as_deref(), Some("INT. B"));
        assert_eq!(tokens[1].scene_number, Some(10));
        assert_eq!(tokens[2].scene_number, Some(11));
    }

    #[test]
    fn non_numeric_scene_marker_is_stripped() {
        let tokens = tokenize("INT. A #1A#\n\nINT. B");
        assert_eq!(tokens[0].text.as_deref(), Some("INT. A"));
        assert_eq!(tokens[0].scene_number, Some(0));
        assert_eq!(tokens[1].scene_number, Some(1));
    }

    #[test]
    fn huge_scene_number_does_not_overflow() {
        let tokens = tokenize(&format!("INT. A #{}#\n\nINT. B", usize::MAX));
        assert_eq!(tokens[0].scene_number, Some(usize::MAX));
        assert_eq!(tokens[1].scene_number, Some(usize::MAX));
    }

    #[test]
    fn emphasis_before_slash_stays_action() {
        let tokens = tokenize("She means **and**/or.");
        assert_eq!(kinds(&tokens), vec![TokenKind::Action]);
        assert_eq!(tokens[0].text.as_deref(), Some("She means **and**/or."));
    }

    #[test]
    fn synopsis_under_scene_heading_is_attached() {
        let tokens = tokenize("INT. LAB - NIGHT\n= The experiment fails.\n\n= Standalone.");
        assert_eq!(kinds(&tokens), vec![TokenKind::SceneHeading, TokenKind::Synopsis]);
        assert_eq!(tokens[0].synopsis.as_deref(), Some("The experiment fails."));
        assert_eq!(tokens[1].text.as_deref(), Some("Standalone."));
    }

    #[test]
    fn heading_ending_in_forced_break_falls_through() {
        let tokens = tokenize("INT. HOUSE  ");
        assert_eq!(tokens[0].kind, TokenKind::Action);
    }

    #[test]
    fn dialogue_with_parentheticals() {
        let tokens = tokenize("JOHN\n(quietly)\nHello.\n(beat)\nBye.");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::DialogueBegin,
                TokenKind::Character,
                TokenKind::Parenthetical,
                TokenKind::Dialogue,
                TokenKind::Parenthetical,
                TokenKind::Dialogue,
                TokenKind::DialogueEnd,
            ]
        );
        let texts: Vec<&str> = tokens.iter().filter_map(|t| t.text.as_deref()).collect();
        assert_eq!(texts, vec!["JOHN", "(quietly)", "Hello.", "(beat)", "Bye."]);
    }

    #[test]
    fn dialogue_keeps_trailing_forced_break() {
        let tokens = tokenize("JOHN\nWait  \nfor it.");
        assert_eq!(tokens[2].text.as_deref(), Some("Wait  \nfor it."));
    }

    #[test]
    fn dual_dialogue_wraps_left_then_right() {
        let tokens = tokenize("CHARA\nline A\n\nCHARB^\nline B");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::DualDialogueBegin,
                TokenKind::DialogueBegin,
                TokenKind::Character,
                TokenKind::Dialogue,
                TokenKind::DialogueEnd,
                TokenKind::DialogueBegin,
                TokenKind::Character,
                TokenKind::Dialogue,
                TokenKind::DialogueEnd,
                TokenKind::DualDialogueEnd,
            ]
        );
        assert_eq!(tokens[2].text.as_deref(), Some("CHARA"));
        assert_eq!(tokens[1].dual, Some(DualSide::Left));
        assert_eq!(tokens[6].text.as_deref(), Some("CHARB"));
        assert_eq!(tokens[5].dual, Some(DualSide::Right));
    }

    #[test]
    fn dual_marker_without_partner_is_plain_dialogue() {
        let tokens = tokenize("ALICE\nHi.\n\nShe waves.\n\nBOB^\nHey.");
        assert!(!tokens.iter().any(|t| t.kind == TokenKind::DualDialogueBegin));
        assert_eq!(tokens[4].kind, TokenKind::Action);
        assert_eq!(tokens[6].text.as_deref(), Some("BOB"));
        assert_eq!(tokens[5].dual, None);
    }

    #[test]
    fn completed_pair_is_not_reopened() {
        let tokens = tokenize("A\nx\n\nB^\ny\n\nC^\nz");
        let begins = tokens.iter().filter(|t| t.kind == TokenKind::DualDialogueBegin).count();
        assert_eq!(begins, 1);
        assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::DialogueEnd));
    }

    #[test]
    fn title_page_splits_keys() {
        let tokens = tokenize("Title: My Play\nCredit: written by\nAuthor: Jane Doe\nDraft date: 10:30");
        assert_eq!(
            kinds(&tokens),
            vec![TokenKind::Title, TokenKind::Credit, TokenKind::Author, TokenKind::DraftDate]
        );
        assert_eq!(tokens[0].text.as_deref(), Some("My Play"));
        assert_eq!(tokens[3].text.as_deref(), Some("10:30"));
    }

    #[test]
    fn title_page_multiline_value() {
        let tokens = tokenize("Title:\n    _**BRICK & STEEL**_\nContact:\n    Jane\n    555-0100");
        assert_eq!(tokens[0].text.as_deref(), Some("_**BRICK & STEEL**_"));
        assert_eq!(tokens[1].text.as_deref(), Some("Jane\n555-0100"));
    }

    #[test]
    fn inline_boneyard_is_isolated() {
        let tokens = tokenize("Hello /* gone */ there");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Action,
                TokenKind::BoneyardBegin,
                TokenKind::Action,
                TokenKind::BoneyardEnd,
                TokenKind::Action,
            ]
        );
    }

    #[test]
    fn two_space_block_is_line_break() {
        let tokens = tokenize("a\n\n  \n\nb");
        assert_eq!(kinds(&tokens), vec![TokenKind::Action, TokenKind::LineBreak, TokenKind::Action]);
    }

    #[test]
    fn normalize_cleans_input() {
        assert_eq!(normalize("\r\n\r\nINT. A\r\n\t\tHe sits.\r\n \r\n\r\n\r\nEnd\n\n"), "INT. A\nHe sits.\n\nEnd");
        assert!(tokenize("\n \n\t\n").is_empty());
    }
}
