//! Translation resource input
/// Parse error type
mod error;
/// `.ts` document model
mod ts_file;
/// Element tree reader
mod xml;

pub use error::ResourceParseError;
pub use ts_file::{
    GLOBAL_CONTEXT,
    TranslationType,
    TsContext,
    TsDocument,
    TsMessage,
    TsTranslation,
    parse_ts,
};
