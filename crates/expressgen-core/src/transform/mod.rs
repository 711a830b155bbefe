pub mod name_sanitizer;

pub use name_sanitizer::{
    NameSanitizer, ReservedWords, escape_quotation_mark, escape_string_literal,
    escape_unsafe_characters, remove_non_name_element_to_camel_case, to_api_filename,
};
