//! The object graph: `Book → Volume → Chapter → Release → Page`.
//!
//! Parents own their children through [`Arc`](std::sync::Arc); children keep
//! a non-owning [`Weak`](std::sync::Weak) back-reference to their parent
//! which is set once, while the parent is being constructed, and never again.
//! Equality is node identity, not structure.

mod book;
mod chapter;
mod group;
mod page;
mod release;
mod volume;

pub use self::book::Book;
pub use self::chapter::{Chapter, ChapterNumber};
pub use self::group::Group;
pub use self::page::Page;
pub use self::release::Release;
pub use self::volume::Volume;
