use std::fmt;

use once_cell::sync::OnceCell;

use crate::error::SchemaError;

type ThunkInit<T> = Box<dyn Fn() -> Result<T, SchemaError> + Send + Sync>;

/// A member map that is built on first access and memoized afterwards.
///
/// Schema graphs are cyclic, so the members of a composite type can only be
/// materialized once every type they point to exists. A failed initialization
/// is not memoized and is reported again on the next access.
pub struct Thunk<T> {
    cell: OnceCell<T>,
    init: Option<ThunkInit<T>>,
}

impl<T> Thunk<T> {
    pub fn ready(value: T) -> Self {
        Self {
            cell: OnceCell::with_value(value),
            init: None,
        }
    }

    pub fn lazy<F>(init: F) -> Self
    where
        F: Fn() -> Result<T, SchemaError> + Send + Sync + 'static,
    {
        Self {
            cell: OnceCell::new(),
            init: Some(Box::new(init)),
        }
    }

    pub fn get(&self) -> Result<&T, SchemaError> {
        match &self.init {
            Some(init) => self.cell.get_or_try_init(|| init()),
            None => Ok(self
                .cell
                .get()
                .unwrap_or_else(|| unreachable!("ready thunk without a value"))),
        }
    }

    pub fn is_materialized(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<T: Default> Default for Thunk<T> {
    fn default() -> Self {
        Self::ready(T::default())
    }
}

impl<T> fmt::Debug for Thunk<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_materialized() {
            f.write_str("Thunk(<materialized>)")
        } else {
            f.write_str("Thunk(<lazy>)")
        }
    }
}
