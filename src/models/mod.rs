pub mod script_token;
pub mod script_document;
pub mod html_fragment;
pub mod conf;

pub use script_token::{Token, TokenKind, DualSide};
pub use script_document::{ScriptDocument, ScriptPage};
pub use html_fragment::{HtmlFragment, FragmentKind, ContainerKind};
pub use conf::{ParserOptions, LinesPerPage};
