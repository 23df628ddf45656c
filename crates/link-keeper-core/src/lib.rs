pub mod anchor;
pub mod edit;
pub mod error;
pub mod event;
pub mod glob_filter;
pub mod heading;
pub mod link_parser;
pub mod path;
pub mod rename;

pub use edit::{apply_edits, Edit, Position, Range};
pub use error::{Error, Result};
pub use event::{compute_edits, ChangeEvent, Document, RenamePayload, SavePayload};
pub use glob_filter::{GlobFilter, Options};
pub use link_parser::{get_all_links, LinkOccurrence};
