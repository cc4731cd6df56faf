use std::cell::OnceCell;
use std::fmt;

use crate::shared::Result;

/// A value computed at most once per owning object.
///
/// Unlike `OnceCell::get_or_init`, the computation runs with the cell
/// unborrowed, so it may read other memoized attributes (including ones
/// that end up filling this very cell as a side effect). The first value
/// stored wins.
pub struct Memo<T> {
    cell: OnceCell<T>,
}

impl<T> Memo<T> {
    pub fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }

    /// Stores `value` unless a value is already present.
    pub fn fill(&self, value: T) -> &T {
        self.cell.get_or_init(move || value)
    }

    pub fn get_or_init(&self, compute: impl FnOnce() -> T) -> &T {
        if let Some(value) = self.cell.get() {
            return value;
        }
        let value = compute();
        self.fill(value)
    }

    /// Failed computations are not cached.
    pub fn get_or_try_init(&self, compute: impl FnOnce() -> Result<T>) -> Result<&T> {
        if let Some(value) = self.cell.get() {
            return Ok(value);
        }
        let value = compute()?;
        Ok(self.fill(value))
    }
}

impl<T> Default for Memo<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Memo<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cell.get() {
            Some(value) => f.debug_tuple("Memo").field(value).finish(),
            None => f.write_str("Memo(<unset>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::DataError;
    use std::cell::Cell;

    #[test]
    fn computes_once() {
        let memo = Memo::new();
        let calls = Cell::new(0);

        for _ in 0..3 {
            let value = memo.get_or_init(|| {
                calls.set(calls.get() + 1);
                42
            });
            assert_eq!(*value, 42);
        }
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn errors_are_not_cached() {
        let memo: Memo<u32> = Memo::new();

        let first = memo.get_or_try_init(|| Err(DataError::InvalidDate {
            value: "soon".to_string(),
        }));
        assert!(first.is_err());
        assert!(memo.get().is_none());

        let second = memo.get_or_try_init(|| Ok(7));
        assert_eq!(second, Ok(&7));
    }

    #[test]
    fn tolerates_fill_during_compute() {
        let memo = Memo::new();

        let value = memo.get_or_init(|| {
            memo.fill(1);
            2
        });

        assert_eq!(*value, 1);
    }
}
