pub mod models;
pub mod utils;
pub mod parser;
pub mod api;

pub use models::{
    Token,
    TokenKind,
    DualSide,
    ScriptDocument,
    ScriptPage,
    HtmlFragment,
    FragmentKind,
    ContainerKind,
    ParserOptions,
    LinesPerPage
};

pub use parser::{
    FountainParser,
    RenderOutput,
    Pagination,
    normalize,
    tokenize,
    paginate
};

pub use api::{
    FountainError,
    FountainResult,
    parse_fountain_text,
    parse_fountain_bytes,
    parse_fountain_file,
    load_options
};

/// 解析Fountain格式文本
///
/// # Arguments
///
/// * `script` - Fountain格式的剧本文本
/// * `options` - 解析选项
///
/// # Returns
///
/// 解析结果对象
pub fn parse(script: &str, options: ParserOptions) -> ScriptDocument {
    FountainParser::new(options).parse(script)
}
