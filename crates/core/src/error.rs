/// A structurally unusable input table.
///
/// Unparseable cells and unmatched join keys are never errors; they are
/// carried through the rules as undefined values. Only a table the engine
/// cannot evaluate at all aborts the call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Table '{table}' has no rows")]
    EmptyTable { table: String },

    #[error("Table '{table}' is missing required column '{column}'")]
    MissingColumn { table: String, column: String },

    #[error("Column '{column}' of table '{table}' is not numeric: {value}")]
    NonNumericReference {
        table: String,
        column: String,
        value: String,
    },

    #[error("Column '{column}' of table '{table}' has {actual} values, expected {expected}")]
    RaggedColumns {
        table: String,
        column: String,
        expected: usize,
        actual: usize,
    },
}
