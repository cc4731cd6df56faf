//! Caching primitives shared by every entity in the model.
//!
//! [`LazyMap`] is the identity map behind each "id -> entity" relationship,
//! [`AttrCache`] holds the raw port values an object has already read and
//! [`Memo`] backs every derived attribute. All three are single-threaded
//! (`RefCell`/`OnceCell` based): an `EventGroup` is built, read and dropped
//! within one request.

mod attr_cache;
mod lazy_map;
mod memo;

pub use attr_cache::AttrCache;
pub use lazy_map::LazyMap;
pub use memo::Memo;
