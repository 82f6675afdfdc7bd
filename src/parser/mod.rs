pub mod tokenizer;
pub mod text_processor;
pub mod fountain_parser;
pub mod paginator;

pub use tokenizer::{normalize, tokenize};
pub use text_processor::process_token_text_style;
pub use fountain_parser::{FountainParser, RenderOutput};
pub use paginator::{paginate, Pagination};
