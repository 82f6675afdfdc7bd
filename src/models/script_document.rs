use serde::{Deserialize, Serialize};
use crate::models::script_token::Token;

/// 分页后的一页
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptPage {
    /// 分页时生成的唯一标识
    pub id: String,
    pub html: String,
}

/// 解析结果
///
/// 所有字段都可能为空，调用方不应假设某个字段一定有内容
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScriptDocument {
    pub title: String,
    pub credit: String,
    pub authors: Vec<String>,
    pub source: String,
    pub notes: String,
    pub draft_date: String,
    pub date: String,
    pub contact: String,
    pub copyright: String,
    /// 场景标题列表，按出现顺序
    pub scenes: Vec<String>,
    pub title_page_html: String,
    /// 仅在 emit_script_html 时输出
    pub script_html: Option<String>,
    /// 仅在 paginate 时输出
    pub script_pages: Vec<ScriptPage>,
    pub script_pages_html: Vec<Vec<String>>,
    /// 仅在 emit_script_html_array 时输出
    pub script_html_array: Option<Vec<String>>,
    /// 仅在 include_tokens 时输出
    pub tokens: Option<Vec<Token>>,
}

impl ScriptDocument {
    pub fn new() -> Self {
        Self::default()
    }
}
