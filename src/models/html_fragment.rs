use serde::{Deserialize, Serialize};

/// HTML 容器类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerKind {
    Dialogue,
    DualDialogue,
    Boneyard,
}

impl ContainerKind {
    /// 对白组需要整体缓冲
    pub fn is_dialogue_group(&self) -> bool {
        matches!(self, ContainerKind::Dialogue | ContainerKind::DualDialogue)
    }
}

/// 片段类型，分页器据此维护状态，不再检查HTML字符串
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FragmentKind {
    Open(ContainerKind),
    Close(ContainerKind),
    Leaf,
    /// 分页控制信号，不输出
    PageBreak,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HtmlFragment {
    pub kind: FragmentKind,
    pub html: String,
}

impl HtmlFragment {
    pub fn leaf(html: impl Into<String>) -> Self {
        HtmlFragment { kind: FragmentKind::Leaf, html: html.into() }
    }

    pub fn open(container: ContainerKind, html: impl Into<String>) -> Self {
        HtmlFragment { kind: FragmentKind::Open(container), html: html.into() }
    }

    pub fn close(container: ContainerKind, html: impl Into<String>) -> Self {
        HtmlFragment { kind: FragmentKind::Close(container), html: html.into() }
    }

    pub fn page_break(html: impl Into<String>) -> Self {
        HtmlFragment { kind: FragmentKind::PageBreak, html: html.into() }
    }
}
