//! Sample containers, column type inference, and file loaders.

pub mod array;
pub mod schema;
pub mod source;

pub use array::{ArrayLike, Table};
pub use schema::{ColumnType, infer_column_type};
pub use source::{
    CsvSource, DataSource, DataSourceInfo, DataSourceType, JsonSource, JsonlSource, load_table,
};
