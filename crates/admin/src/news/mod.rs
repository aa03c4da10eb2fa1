//! News editor and the cancellation scope its backend calls run in.

mod editor;
mod scope;

pub use editor::{
    DELETE_PROMPT, EditorError, Mutation, NewsEditor, Operation, PUBLISHED_MESSAGE,
};
pub use scope::{Cancelled, RequestScope};
