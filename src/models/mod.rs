pub mod todo;

pub use todo::{Todo, date_input_value, format_date};
