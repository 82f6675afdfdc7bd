use crate::utils::{FountainConstants, Rule};

/// 处理token文本的行内样式，输出HTML
///
/// 空文本返回 None。转义的 `\*` 和 `\_` 先换成占位符，样式替换完成后再还原，
/// 因此不会被当作强调标记。
pub fn process_token_text_style(text: Option<&str>, include_notes: bool) -> Option<String> {
    let text = text.filter(|t| !t.is_empty())?;

    // 行内注解
    let note_replacement = if include_notes { "<!-- ${1} -->" } else { "" };
    let mut s = FountainConstants::regex(Rule::NoteInline)
        .replace_all(text, note_replacement)
        .to_string();

    s = s
        .replace(r"\*", FountainConstants::ESCAPED_STAR)
        .replace(r"\_", FountainConstants::ESCAPED_UNDERLINE)
        .replace('\n', FountainConstants::LINE_BREAK_HTML);

    // 长标记优先，避免短标记提前吃掉长标记的分隔符
    for (_, regex, replacement) in FountainConstants::inline_styles() {
        if regex.is_match(&s) {
            s = regex.replace_all(&s, replacement.as_str()).to_string();
        }
    }

    Some(
        s.replace(FountainConstants::ESCAPED_STAR, "*")
            .replace(FountainConstants::ESCAPED_UNDERLINE, "_")
            .trim()
            .to_string(),
    )
}
