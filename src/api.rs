//! 对外接口
//!
//! 解析流程本身不会失败，这里只处理文件读写、文本解码和配置加载的错误

use std::fs;
use std::path::Path;
use log::debug;
use thiserror::Error;
use crate::models::{ParserOptions, ScriptDocument};
use crate::parser::FountainParser;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Error, Debug)]
pub enum FountainError {
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("输入不是有效的UTF-8文本: {0}")]
    InvalidText(#[from] std::string::FromUtf8Error),

    #[error("无效的配置: {0}")]
    Config(serde_json::Error),

    #[error("未知的每页行数预设: {0}")]
    InvalidLinesPerPage(String),

    #[error("结果序列化失败: {0}")]
    Serialize(serde_json::Error),
}

pub type FountainResult<T> = Result<T, FountainError>;

/// 解析Fountain文本，返回JSON格式的结果
pub fn parse_fountain_text(text: &str, options: Option<ParserOptions>) -> FountainResult<String> {
    let document = FountainParser::new(options.unwrap_or_default()).parse(text);
    serde_json::to_string(&document).map_err(FountainError::Serialize)
}

/// 解析原始字节，开头的 BOM 会被去掉
pub fn parse_fountain_bytes(bytes: &[u8], options: ParserOptions) -> FountainResult<ScriptDocument> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let text = String::from_utf8(bytes.to_vec())?;
    Ok(FountainParser::new(options).parse(&text))
}

/// 读取并解析剧本文件
pub fn parse_fountain_file(path: impl AsRef<Path>, options: ParserOptions) -> FountainResult<ScriptDocument> {
    let path = path.as_ref();
    debug!("读取剧本文件: {}", path.display());
    let bytes = fs::read(path)?;
    parse_fountain_bytes(&bytes, options)
}

/// 从JSON文件加载解析选项，缺少的字段使用默认值
pub fn load_options(path: impl AsRef<Path>) -> FountainResult<ParserOptions> {
    let content = fs::read_to_string(path.as_ref())?;
    serde_json::from_str(&content).map_err(FountainError::Config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LinesPerPage;
    use std::path::PathBuf;
    use uuid::Uuid;

    fn temp_file(name: &str, content: &[u8]) -> PathBuf {
        let path = std::env::temp_dir().join(format!("{}-{}", Uuid::new_v4(), name));
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn text_is_returned_as_json() {
        let json = parse_fountain_text("Title: Test\n\nINT. ROOM - DAY", None).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["title"], "Test");
        assert_eq!(value["scenes"][0], "INT. ROOM - DAY");
    }

    #[test]
    fn bom_is_stripped() {
        let document = parse_fountain_bytes(b"\xEF\xBB\xBFTitle: Bom", ParserOptions::default()).unwrap();
        assert_eq!(document.title, "Bom");
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let err = parse_fountain_bytes(&[0x66, 0xff, 0xfe], ParserOptions::default()).unwrap_err();
        assert!(matches!(err, FountainError::InvalidText(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = parse_fountain_file("/nonexistent/script.fountain", ParserOptions::default()).unwrap_err();
        assert!(matches!(err, FountainError::Io(_)));
    }

    #[test]
    fn reads_script_file() {
        let path = temp_file("script.fountain", "EXT. 公园 - 日\n\n小明\n你好。".as_bytes());
        let document = parse_fountain_file(&path, ParserOptions::default()).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(document.scenes, vec!["EXT. 公园 - 日".to_string()]);
    }

    #[test]
    fn options_load_from_json() {
        let path = temp_file("options.json", br#"{"lines_per_page": "normal", "paginate": false}"#);
        let options = load_options(&path).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(options.lines_per_page, LinesPerPage::Normal);
        assert!(!options.paginate);
        assert!(options.include_notes);
    }

    #[test]
    fn bad_options_are_config_errors() {
        let path = temp_file("bad.json", br#"{"lines_per_page": "huge"}"#);
        let err = load_options(&path).unwrap_err();
        fs::remove_file(&path).ok();
        assert!(matches!(err, FountainError::Config(_)));
    }
}
