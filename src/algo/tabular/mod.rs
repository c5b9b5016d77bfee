pub mod trainer;
pub mod value_table;
