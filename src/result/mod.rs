mod dc;
pub mod mapper;
mod result;

pub use dc::DcDto;
pub use mapper::{map_count, map_rows, map_rows_as_key_value};
pub use result::QueryResult;
