//! XML utilities: positional navigation and indented display.

mod pretty;
mod utils;

pub use pretty::pretty_print;

pub use utils::{
    element_at_path, element_children, format_path, get_attribute, get_tag_name, get_text,
    nth_element_child,
};
