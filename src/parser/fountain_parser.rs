use log::{debug, info};
use crate::models::{
    ContainerKind,
    HtmlFragment,
    ParserOptions,
    ScriptDocument,
    Token,
    TokenKind,
};
use crate::parser::paginator::paginate;
use crate::parser::text_processor::process_token_text_style;
use crate::parser::tokenizer::tokenize;
use crate::utils::{strip_tags, FountainConstants};

/// 渲染结果：元数据和扁平的HTML片段序列
#[derive(Debug, Clone, Default)]
pub struct RenderOutput {
    /// 标题页HTML和元数据字段，分页相关字段为空
    pub document: ScriptDocument,
    pub fragments: Vec<HtmlFragment>,
}

/// Fountain 解析器
///
/// 只持有不可变的选项，可以在多个线程间共享
#[derive(Debug, Clone, Copy, Default)]
pub struct FountainParser {
    options: ParserOptions,
}

impl FountainParser {
    pub fn new(options: ParserOptions) -> Self {
        FountainParser { options }
    }

    /// 解析Fountain格式文本
    ///
    /// # Arguments
    ///
    /// * `script` - Fountain格式的剧本文本
    ///
    /// # Returns
    ///
    /// 解析结果对象，按选项决定是否包含完整HTML、片段数组、分页和token
    pub fn parse(&self, script: &str) -> ScriptDocument {
        let tokens = tokenize(script);
        let RenderOutput { mut document, fragments } = self.render(&tokens);

        if self.options.emit_script_html {
            document.script_html = Some(fragments.iter().map(|f| f.html.as_str()).collect());
        }

        if self.options.emit_script_html_array {
            document.script_html_array = Some(fragments.iter().map(|f| f.html.clone()).collect());
        }

        if self.options.paginate {
            let pagination = paginate(&fragments, self.options.lines_per_page.line_budget());
            document.script_pages = pagination.pages;
            document.script_pages_html = pagination.pages_html;
        }

        info!(
            "解析完成: {} 个token, {} 个场景, {} 页",
            tokens.len(),
            document.scenes.len(),
            document.script_pages.len()
        );

        if self.options.include_tokens {
            document.tokens = Some(tokens);
        }

        document
    }

    /// 遍历 token 生成标题页、元数据和正文HTML片段
    pub fn render(&self, tokens: &[Token]) -> RenderOutput {
        let options = &self.options;
        let mut document = ScriptDocument::new();
        let mut title_page_html: Vec<String> = Vec::new();
        let mut fragments: Vec<HtmlFragment> = Vec::new();
        let mut dialogue_counter = 0usize;
        let mut suppressed_boneyard = 0usize;

        for token in tokens {
            // 不输出 boneyard 时，连同其中的内容一起跳过
            if !options.include_boneyard {
                match token.kind {
                    TokenKind::BoneyardBegin => {
                        suppressed_boneyard += 1;
                        continue;
                    }
                    TokenKind::BoneyardEnd => {
                        suppressed_boneyard = suppressed_boneyard.saturating_sub(1);
                        continue;
                    }
                    _ if suppressed_boneyard > 0 => continue,
                    _ => {}
                }
            }

            let text = process_token_text_style(token.text.as_deref(), options.include_notes)
                .unwrap_or_default();

            match token.kind {
                TokenKind::Title => {
                    title_page_html.push(format!("<h1>{}</h1>", text));
                    document.title = strip_tags(&text.replace(FountainConstants::LINE_BREAK_HTML, " "));
                }
                TokenKind::Credit => {
                    title_page_html.push(format!("<p class=\"credit\">{}</p>", text));
                    document.credit = text;
                }
                TokenKind::Author => {
                    title_page_html.push(format!("<p class=\"authors\">{}</p>", text));
                    document.authors.push(text);
                }
                TokenKind::Authors => {
                    title_page_html.push(format!("<p class=\"authors\">{}</p>", text));
                    document.authors.extend(split_authors(&text));
                }
                TokenKind::Source => {
                    title_page_html.push(format!("<p class=\"source\">{}</p>", text));
                    document.source = text;
                }
                TokenKind::Notes => {
                    if options.include_notes {
                        title_page_html.push(format!("<p class=\"notes\">{}</p>", text));
                        document.notes = text;
                    }
                }
                TokenKind::DraftDate => {
                    if options.include_draft_date {
                        title_page_html.push(format!("<p class=\"draft-date\">{}</p>", text));
                        document.draft_date = text;
                    }
                }
                TokenKind::Date => {
                    title_page_html.push(format!("<p class=\"date\">{}</p>", text));
                    document.date = text;
                }
                TokenKind::Contact => {
                    title_page_html.push(format!("<p class=\"contact\">{}</p>", text));
                    document.contact = text;
                }
                TokenKind::Copyright => {
                    title_page_html.push(format!("<p class=\"copyright\">{}</p>", text));
                    document.copyright = text;
                }

                TokenKind::SceneHeading => {
                    let mut html = match token.scene_number {
                        Some(n) => format!(
                            "<h6 id=\"scene-heading--{n}\" class=\"scene-heading\" data-scene-heading-index=\"{n}\">{}</h6>",
                            text
                        ),
                        None => format!("<h6 class=\"scene-heading\">{}</h6>", text),
                    };
                    // 场景标题块内的概要和标题放在同一个片段里
                    if let Some(synopsis) =
                        process_token_text_style(token.synopsis.as_deref(), options.include_notes)
                    {
                        html.push_str(&format!("<p class=\"synopsis\">{}</p>", synopsis));
                    }
                    fragments.push(HtmlFragment::leaf(html));
                    document.scenes.push(text);
                }
                TokenKind::Transition => {
                    fragments.push(HtmlFragment::leaf(format!("<p class=\"transition\">{}</p>", text)));
                }

                TokenKind::DualDialogueBegin => {
                    fragments.push(HtmlFragment::open(
                        ContainerKind::DualDialogue,
                        format!("<div class=\"dual-dialogue\" data-dialogue-index=\"{}\">", dialogue_counter),
                    ));
                    dialogue_counter += 1;
                }
                TokenKind::DialogueBegin => {
                    let dual = token
                        .dual
                        .map(|side| format!(" {}", side.as_str()))
                        .unwrap_or_default();
                    fragments.push(HtmlFragment::open(
                        ContainerKind::Dialogue,
                        format!("<div class=\"dialogue{}\" data-dialogue-index=\"{}\">", dual, dialogue_counter),
                    ));
                    dialogue_counter += 1;
                }
                TokenKind::Character => {
                    let name = text.strip_prefix('@').unwrap_or(&text);
                    fragments.push(HtmlFragment::leaf(format!("<p class=\"character\">{}</p>", name)));
                }
                TokenKind::Parenthetical => {
                    fragments.push(HtmlFragment::leaf(format!("<p class=\"parenthetical\">{}</p>", text)));
                }
                TokenKind::Dialogue => {
                    fragments.push(HtmlFragment::leaf(format!("<p>{}</p>", text)));
                }
                TokenKind::DialogueEnd => {
                    fragments.push(HtmlFragment::close(ContainerKind::Dialogue, "</div>"));
                }
                TokenKind::DualDialogueEnd => {
                    fragments.push(HtmlFragment::close(ContainerKind::DualDialogue, "</div>"));
                }

                TokenKind::Section => {
                    fragments.push(HtmlFragment::leaf(format!(
                        "<p class=\"section\" data-depth=\"{}\">{}</p>",
                        token.depth.unwrap_or(1),
                        text
                    )));
                }
                TokenKind::Synopsis => {
                    fragments.push(HtmlFragment::leaf(format!("<p class=\"synopsis\">{}</p>", text)));
                }

                TokenKind::Note => {
                    if options.include_notes {
                        fragments.push(HtmlFragment::leaf(format!("<!-- {} -->", text)));
                    }
                }
                TokenKind::BoneyardBegin => {
                    fragments.push(HtmlFragment::open(ContainerKind::Boneyard, "<!-- "));
                }
                TokenKind::BoneyardEnd => {
                    fragments.push(HtmlFragment::close(ContainerKind::Boneyard, " -->"));
                }

                TokenKind::Lyrics => {
                    fragments.push(HtmlFragment::leaf(format!("<p class=\"lyrics\">{}</p>", text)));
                }
                TokenKind::Action => {
                    fragments.push(HtmlFragment::leaf(format!("<p class=\"action\">{}</p>", text)));
                }
                TokenKind::Centered => {
                    fragments.push(HtmlFragment::leaf(format!("<p class=\"centered\">{}</p>", text)));
                }

                TokenKind::PageBreak => {
                    fragments.push(HtmlFragment::page_break("<hr class=\"page-break\" />"));
                }
                TokenKind::LineBreak => {
                    fragments.push(HtmlFragment::leaf(FountainConstants::LINE_BREAK_HTML));
                }
            }
        }

        if suppressed_boneyard > 0 {
            debug!("boneyard 未闭合，其后的内容均未输出");
        }

        document.title_page_html = title_page_html.concat();
        RenderOutput { document, fragments }
    }
}

/// Authors 字段按换行和逗号拆分
fn split_authors(text: &str) -> Vec<String> {
    text.replace(FountainConstants::LINE_BREAK_HTML, "\n")
        .split(['\n', ','])
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string)
        .collect()
}
