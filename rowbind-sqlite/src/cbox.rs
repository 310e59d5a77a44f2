use std::{
    ops::{Deref, DerefMut},
    ptr,
};

/// Owner of a sqlite handle, released once when dropped unless still null.
#[derive(Debug)]
pub(crate) struct CBox<T> {
    pub(crate) ptr: *mut T,
    release: fn(*mut T),
}

impl<T> CBox<T> {
    pub(crate) fn new(ptr: *mut T, release: fn(*mut T)) -> Self {
        Self { ptr, release }
    }

    /// A null handle, ready to be filled by an out parameter.
    pub(crate) fn null(release: fn(*mut T)) -> Self {
        Self::new(ptr::null_mut(), release)
    }

    /// A copy of the handle that does not release it.
    pub(crate) fn borrowed(&self) -> CBox<T> {
        CBox::new(self.ptr, |_| {})
    }
}

impl<T> Drop for CBox<T> {
    fn drop(&mut self) {
        if !self.ptr.is_null() {
            (self.release)(self.ptr);
        }
    }
}

impl<T> Deref for CBox<T> {
    type Target = *mut T;

    fn deref(&self) -> &Self::Target {
        &self.ptr
    }
}

impl<T> DerefMut for CBox<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.ptr
    }
}

unsafe impl<T> Send for CBox<T> {}
unsafe impl<T> Sync for CBox<T> {}
