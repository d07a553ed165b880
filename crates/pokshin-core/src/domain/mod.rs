//! Domain entities - the core business objects.

mod draft;
mod group;
mod post;
pub mod richtext;

pub use draft::{ComposerForm, DraftRecord, MISSING_FIELDS_MESSAGE};
pub use group::{GroupId, GroupMeta, UnknownGroup};
pub use post::{ANONYMOUS, Genre, NewPost, Post};
pub use richtext::{Color, EditCommand, RichText, Selection};
