use std::sync::Arc;

use parking_lot::RwLock;

pub type Atomic<T> = Arc<RwLock<T>>;

#[inline]
pub fn atomic<T>(t: T) -> Atomic<T> {
    Arc::new(RwLock::new(t))
}

pub trait ReadExecutor<T: ?Sized> {
    fn read_with<R>(&self, f: impl FnOnce(&T) -> R) -> R;
}

impl<T> ReadExecutor<T> for Atomic<T> {
    #[inline]
    fn read_with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let read_guard = self.read();
        f(&*read_guard)
    }
}

pub trait WriteExecutor<T: ?Sized> {
    fn write_with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R;
}

impl<T> WriteExecutor<T> for Atomic<T> {
    #[inline]
    fn write_with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut write_guard = self.write();
        f(&mut *write_guard)
    }
}

/// Lower-cases the first character, leaving the rest untouched.
///
/// `"Address"` becomes `"address"`, `"URL"` becomes `"uRL"`.
pub fn uncapitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atomic() {
        let atomic_value = atomic(5);
        assert_eq!(*atomic_value.read(), 5);
    }

    #[test]
    fn test_read_with() {
        let atomic_value = atomic(5);
        let result = atomic_value.read_with(|value| *value);
        assert_eq!(result, 5);
    }

    #[test]
    fn test_write_with() {
        let atomic_value = atomic(5);
        atomic_value.write_with(|value| *value = 10);
        assert_eq!(*atomic_value.read(), 10);
    }

    #[test]
    fn test_uncapitalize() {
        assert_eq!(uncapitalize("Address"), "address");
        assert_eq!(uncapitalize("address"), "address");
        assert_eq!(uncapitalize("URL"), "uRL");
        assert_eq!(uncapitalize(""), "");
    }
}
