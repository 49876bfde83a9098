//! Offset pager
//!
//! Count heuristic: a page shorter than requested is the last one. A page
//! that is exactly full always gets a next offset, so a set whose size is a
//! multiple of the page size ends with one extra empty page.

/// Integer offset types
pub trait Offset: Copy + Default {
    /// Offset advanced by `by` records, saturating at the type's maximum
    fn advance(self, by: usize) -> Self;
}

macro_rules! impl_offset {
    ($($ty:ty),*) => {
        $(
            impl Offset for $ty {
                fn advance(self, by: usize) -> Self {
                    self.saturating_add(<$ty>::try_from(by).unwrap_or(<$ty>::MAX))
                }
            }
        )*
    };
}

impl_offset!(i32, i64, u32, u64, usize);

/// Next offset after a page of `returned` records out of `requested`
pub fn next_offset<T: Offset>(returned: usize, requested: usize, current: T) -> Option<T> {
    if returned < requested {
        None
    } else {
        Some(current.advance(returned))
    }
}
