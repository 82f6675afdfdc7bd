pub mod fountain_constants;

pub use fountain_constants::{FountainConstants, InlineStyle, Rule};

/// 文本是否以强制换行的两个空格结尾，且文本中没有更早出现的双空格
pub fn ends_with_forced_break(text: &str) -> bool {
    text.len() >= 2 && text.find("  ") == Some(text.len() - 2)
}

/// 去除首尾空白，但保留结尾恰好两个空格的强制换行
pub fn trim_preserving_break(text: &str) -> String {
    let body = text.trim_start().trim_end_matches('\n');
    let trimmed = body.trim_end();
    let tail = &body[trimmed.len()..];
    if tail == "  " {
        body.to_string()
    } else {
        trimmed.to_string()
    }
}

/// 去除所有HTML标签
pub fn strip_tags(html: &str) -> String {
    FountainConstants::html_tag().replace_all(html, "").to_string()
}
