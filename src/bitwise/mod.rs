// Binary parsing for GP-8 SysEx dumps

pub mod parser;

pub use parser::{
    parse_all_records, parse_char_array, parse_record, parse_record_name, parse_records,
};
