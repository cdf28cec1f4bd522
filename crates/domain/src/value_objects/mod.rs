//! Value objects - immutable, validated building blocks.

mod column_mapping;
mod conversion;
mod expression_map;
mod names;
mod row;

pub use column_mapping::{ColumnMapping, ColumnRole};
pub use conversion::{
    ConversionResult, ConversionStatus, FALLBACK_ID_WARNING, ID_GENERATION_FAILED_MESSAGE,
    MISSING_CHARACTER_MESSAGE, SUCCESS_MESSAGE, UNREGISTERED_CHARACTER_PREFIX,
};
pub use expression_map::{ExpressionMap, DEFAULT_EXPRESSION_SUFFIX};
pub use names::{CharacterName, StringId};
pub use row::{columns, normalize_column, Row};
