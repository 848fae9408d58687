//! Loads the emergency-department visit log into memory.

pub mod error;
pub mod reader;

pub use error::{IngestError, Result};
pub use reader::{
    MAX_CSV_FILE_SIZE, check_file_size, check_file_size_with_limit, read_visit_log,
    validate_encoding, validate_table_shape,
};
