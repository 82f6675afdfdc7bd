use serde::{Deserialize, Serialize};
use std::fmt;

/// token类型，固定的封闭集合
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    // 标题页字段
    Title,
    Credit,
    Author,
    Authors,
    Source,
    Notes,
    DraftDate,
    Date,
    Contact,
    Copyright,

    SceneHeading,
    Transition,
    DialogueBegin,
    Character,
    Parenthetical,
    Dialogue,
    DialogueEnd,
    DualDialogueBegin,
    DualDialogueEnd,
    Section,
    Synopsis,
    Note,
    BoneyardBegin,
    BoneyardEnd,
    Lyrics,
    Action,
    Centered,
    PageBreak,
    LineBreak,
}

impl TokenKind {
    /// 根据标题页的 key 查找对应的类型，key 不区分大小写
    pub fn from_title_key(key: &str) -> Option<TokenKind> {
        let key = key.trim().to_lowercase().replacen(' ', "_", 1);
        match key.as_str() {
            "title" => Some(TokenKind::Title),
            "credit" => Some(TokenKind::Credit),
            "author" => Some(TokenKind::Author),
            "authors" => Some(TokenKind::Authors),
            "source" => Some(TokenKind::Source),
            "notes" => Some(TokenKind::Notes),
            "draft_date" => Some(TokenKind::DraftDate),
            "date" => Some(TokenKind::Date),
            "contact" => Some(TokenKind::Contact),
            "copyright" => Some(TokenKind::Copyright),
            _ => None,
        }
    }

    pub fn is_title_page(&self) -> bool {
        matches!(
            self,
            TokenKind::Title
                | TokenKind::Credit
                | TokenKind::Author
                | TokenKind::Authors
                | TokenKind::Source
                | TokenKind::Notes
                | TokenKind::DraftDate
                | TokenKind::Date
                | TokenKind::Contact
                | TokenKind::Copyright
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Title => "title",
            TokenKind::Credit => "credit",
            TokenKind::Author => "author",
            TokenKind::Authors => "authors",
            TokenKind::Source => "source",
            TokenKind::Notes => "notes",
            TokenKind::DraftDate => "draft_date",
            TokenKind::Date => "date",
            TokenKind::Contact => "contact",
            TokenKind::Copyright => "copyright",
            TokenKind::SceneHeading => "scene_heading",
            TokenKind::Transition => "transition",
            TokenKind::DialogueBegin => "dialogue_begin",
            TokenKind::Character => "character",
            TokenKind::Parenthetical => "parenthetical",
            TokenKind::Dialogue => "dialogue",
            TokenKind::DialogueEnd => "dialogue_end",
            TokenKind::DualDialogueBegin => "dual_dialogue_begin",
            TokenKind::DualDialogueEnd => "dual_dialogue_end",
            TokenKind::Section => "section",
            TokenKind::Synopsis => "synopsis",
            TokenKind::Note => "note",
            TokenKind::BoneyardBegin => "boneyard_begin",
            TokenKind::BoneyardEnd => "boneyard_end",
            TokenKind::Lyrics => "lyrics",
            TokenKind::Action => "action",
            TokenKind::Centered => "centered",
            TokenKind::PageBreak => "page_break",
            TokenKind::LineBreak => "line_break",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 双对话位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DualSide {
    Left,
    Right,
}

impl DualSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            DualSide::Left => "left",
            DualSide::Right => "right",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,                  // token类型
    pub text: Option<String>,             // 原始文本，未经样式处理
    pub scene_number: Option<usize>,      // 场景编号(仅场景标题)
    pub depth: Option<usize>,             // 章节层级(仅 section)
    pub dual: Option<DualSide>,           // 双对话位置(仅 dialogue_begin)
    pub synopsis: Option<String>,         // 场景标题块内紧随的概要
}

impl Token {
    pub fn new(kind: TokenKind) -> Self {
        Token {
            kind,
            text: None,
            scene_number: None,
            depth: None,
            dual: None,
            synopsis: None,
        }
    }

    pub fn with_text(kind: TokenKind, text: impl Into<String>) -> Self {
        Token {
            text: Some(text.into()),
            ..Token::new(kind)
        }
    }

    // 检查token类型是否匹配
    pub fn is_type(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.kind)
    }

    pub fn text_or_empty(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}
