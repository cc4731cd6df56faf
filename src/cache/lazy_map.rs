use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::shared::{DataError, EntityKind, Result};

type ExistsFn = Box<dyn Fn(u32) -> Result<bool>>;
type BuildFn<V> = Box<dyn Fn(u32) -> Result<V>>;
type ListFn = Box<dyn Fn() -> Result<Vec<u32>>>;

#[derive(Debug)]
struct MapState<V> {
    entries: HashMap<u32, Rc<V>>,
    missing: HashSet<u32>,
    /// Every key, in the order the store listed them, once fully materialized
    all_keys: Option<Vec<u32>>,
}

/// An id -> object mapping whose values are built on first access.
///
/// Backed by three store-supplied functions: an existence test, a
/// single-item constructor and a full-id-list enumerator. At most one
/// object is ever built per id, so repeated lookups return the same `Rc`.
/// Misses are remembered too. Enumerating the map builds everything
/// once; after that it behaves as a plain completed mapping and no longer
/// consults the store.
pub struct LazyMap<V> {
    kind: EntityKind,
    exists: ExistsFn,
    build: BuildFn<V>,
    list: ListFn,
    state: RefCell<MapState<V>>,
}

impl<V> LazyMap<V> {
    pub fn new(
        kind: EntityKind,
        exists: impl Fn(u32) -> Result<bool> + 'static,
        build: impl Fn(u32) -> Result<V> + 'static,
        list: impl Fn() -> Result<Vec<u32>> + 'static,
    ) -> Self {
        Self {
            kind,
            exists: Box::new(exists),
            build: Box::new(build),
            list: Box::new(list),
            state: RefCell::new(MapState {
                entries: HashMap::new(),
                missing: HashSet::new(),
                all_keys: None,
            }),
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Looks up `id`, building the object if the store says it exists.
    pub fn get(&self, id: u32) -> Result<Option<Rc<V>>> {
        {
            let state = self.state.borrow();
            if let Some(value) = state.entries.get(&id) {
                return Ok(Some(value.clone()));
            }
            if state.all_keys.is_some() || state.missing.contains(&id) {
                return Ok(None);
            }
        }

        if !(self.exists)(id)? {
            trace!(kind = %self.kind, id, "Identity map miss");
            self.state.borrow_mut().missing.insert(id);
            return Ok(None);
        }

        let built = Rc::new((self.build)(id)?);
        trace!(kind = %self.kind, id, "Identity map built entry");
        let mut state = self.state.borrow_mut();
        // A reentrant lookup may have built the same id already; keep the first.
        Ok(Some(state.entries.entry(id).or_insert(built).clone()))
    }

    /// Like [`LazyMap::get`], but a missing id is an error.
    pub fn require(&self, id: u32) -> Result<Rc<V>> {
        self.get(id)?
            .ok_or(DataError::NotFound { kind: self.kind, id })
    }

    pub fn contains(&self, id: u32) -> Result<bool> {
        Ok(self.get(id)?.is_some())
    }

    /// All keys in store order, materializing every entry.
    pub fn keys(&self) -> Result<Vec<u32>> {
        self.ensure_all()?;
        Ok(self.state.borrow().all_keys.clone().unwrap_or_default())
    }

    /// All entries in store order, materializing every entry.
    pub fn values(&self) -> Result<Vec<Rc<V>>> {
        let keys = self.keys()?;
        let state = self.state.borrow();
        Ok(keys
            .iter()
            .filter_map(|id| state.entries.get(id).cloned())
            .collect())
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.keys()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn ensure_all(&self) -> Result<()> {
        if self.state.borrow().all_keys.is_some() {
            return Ok(());
        }

        let keys = (self.list)()?;
        let mut seen = HashSet::with_capacity(keys.len());
        for &id in &keys {
            if !seen.insert(id) {
                return Err(DataError::DuplicateId {
                    kind: self.kind,
                    id,
                });
            }
        }

        for &id in &keys {
            if self.state.borrow().entries.contains_key(&id) {
                continue;
            }
            let built = Rc::new((self.build)(id)?);
            self.state.borrow_mut().entries.entry(id).or_insert(built);
        }

        debug!(kind = %self.kind, count = keys.len(), "Identity map fully materialized");
        let mut state = self.state.borrow_mut();
        state.missing.clear();
        state.all_keys = Some(keys);
        Ok(())
    }
}

impl<V> fmt::Debug for LazyMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("LazyMap")
            .field("kind", &self.kind)
            .field("built", &state.entries.len())
            .field("complete", &state.all_keys.is_some())
            .finish()
    }
}
