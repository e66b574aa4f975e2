pub mod patch_reader;
pub mod support_lexer;
pub mod support_parser;
pub mod values;

pub use patch_reader::{PatchCursor, PatchLine};
pub use support_parser::{
    AliasEntry, DehSupp, RenderStyleEntry, StateMapEntry, SupportParseError, ThingBitEntry,
    parse_dehsupp,
};
