pub mod arguments;
pub mod document;
pub mod fragment;
pub mod operation;
pub mod path;
pub mod selection_item;
pub mod selection_set;
pub mod value;
