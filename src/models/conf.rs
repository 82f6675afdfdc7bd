use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use crate::api::FountainError;

/// 每页行数预设
///
/// 推荐 Normal，最接近"一页一分钟"的经验值
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinesPerPage {
    None,
    #[default]
    Loose,
    Normal,
    Tight,
    VeryTight,
}

impl LinesPerPage {
    /// 对应的片段预算，None 表示不按预算分页
    pub fn line_budget(&self) -> Option<usize> {
        match self {
            LinesPerPage::None => None,
            LinesPerPage::Loose => Some(47),
            LinesPerPage::Normal => Some(54),
            LinesPerPage::Tight => Some(58),
            LinesPerPage::VeryTight => Some(64),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LinesPerPage::None => "none",
            LinesPerPage::Loose => "loose",
            LinesPerPage::Normal => "normal",
            LinesPerPage::Tight => "tight",
            LinesPerPage::VeryTight => "very_tight",
        }
    }
}

impl fmt::Display for LinesPerPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LinesPerPage {
    type Err = FountainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "none" => Ok(LinesPerPage::None),
            "loose" => Ok(LinesPerPage::Loose),
            "normal" => Ok(LinesPerPage::Normal),
            "tight" => Ok(LinesPerPage::Tight),
            "very_tight" => Ok(LinesPerPage::VeryTight),
            _ => Err(FountainError::InvalidLinesPerPage(s.to_string())),
        }
    }
}

/// 解析选项，每次调用按值传入
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserOptions {
    /// 是否分页
    pub paginate: bool,
    /// 每页行数预设
    pub lines_per_page: LinesPerPage,
    /// 是否输出完整的剧本HTML
    pub emit_script_html: bool,
    /// 是否输出HTML片段数组
    pub emit_script_html_array: bool,
    /// 是否输出注解
    pub include_notes: bool,
    /// 是否输出草稿日期
    pub include_draft_date: bool,
    /// 是否输出 boneyard 注释
    pub include_boneyard: bool,
    /// 是否附带原始 token 列表
    pub include_tokens: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions {
            paginate: true,
            lines_per_page: LinesPerPage::Loose,
            emit_script_html: false,
            emit_script_html_array: false,
            include_notes: true,
            include_draft_date: true,
            include_boneyard: true,
            include_tokens: false,
        }
    }
}
