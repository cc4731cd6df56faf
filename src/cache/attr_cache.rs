use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;

use crate::source::{AttrValue, Attribute, FromAttr};
use crate::shared::Result;

/// Port values already fetched for one object, keyed by attribute name.
///
/// Each attribute is fetched from the store at most once; later reads are
/// served from the table.
pub struct AttrCache<A> {
    values: RefCell<HashMap<A, AttrValue>>,
}

impl<A: Attribute> AttrCache<A> {
    pub fn new() -> Self {
        Self {
            values: RefCell::new(HashMap::new()),
        }
    }

    pub fn get_or_fetch(
        &self,
        attr: A,
        fetch: impl FnOnce() -> Result<AttrValue>,
    ) -> Result<AttrValue> {
        if let Some(value) = self.values.borrow().get(&attr) {
            return Ok(value.clone());
        }
        let value = fetch()?;
        Ok(self
            .values
            .borrow_mut()
            .entry(attr)
            .or_insert(value)
            .clone())
    }

    /// Fetches (or reuses) the raw value and converts it.
    pub fn typed<T: FromAttr>(
        &self,
        attr: A,
        fetch: impl FnOnce() -> Result<AttrValue>,
    ) -> Result<T> {
        self.get_or_fetch(attr, fetch)?
            .into_typed(A::KIND, attr.name())
    }

    pub fn len(&self) -> usize {
        self.values.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<A: Attribute> Default for AttrCache<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> fmt::Debug for AttrCache<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttrCache")
            .field("cached", &self.values.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::DataError;
    use crate::source::EventAttr;
    use std::cell::Cell;

    #[test]
    fn fetches_each_attribute_once() {
        let cache = AttrCache::new();
        let fetches = Cell::new(0);
        let fetch = || {
            fetches.set(fetches.get() + 1);
            Ok(AttrValue::Text("2021".to_string()))
        };

        let first: String = cache.typed(EventAttr::Year, fetch).unwrap();
        let second: String = cache.typed(EventAttr::Year, fetch).unwrap();

        assert_eq!(first, "2021");
        assert_eq!(second, "2021");
        assert_eq!(fetches.get(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn failed_fetches_are_retried() {
        let cache: AttrCache<EventAttr> = AttrCache::new();

        let failed = cache.get_or_fetch(EventAttr::HostCity, || {
            Err(DataError::unsupported(EventAttr::KIND, "host_city"))
        });
        assert!(failed.is_err());
        assert!(cache.is_empty());

        let value = cache
            .get_or_fetch(EventAttr::HostCity, || Ok(AttrValue::Absent))
            .unwrap();
        assert!(value.is_absent());
    }

    #[test]
    fn wrong_shape_names_the_attribute() {
        let cache = AttrCache::new();
        let result: Result<i64> =
            cache.typed(EventAttr::GoldBoundary, || Ok(AttrValue::Bool(true)));

        assert_eq!(
            result,
            Err(DataError::AttributeType {
                kind: EventAttr::KIND,
                name: "gold_boundary".to_string(),
                expected: "an integer",
            })
        );
    }
}
