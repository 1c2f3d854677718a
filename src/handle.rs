//! Owners for opaque native handles (textures, fonts, sound chunks, ...) that must be
//! released through a type-specific function exactly once.

use std::{fmt, ops::Deref, rc::Rc};

type Release<T> = Box<dyn FnOnce(T)>;

/// Move-only owner of a handle; runs `release` when dropped.
///
/// The release step may capture whatever it needs to free the handle, e.g. the renderer
/// that created a texture.
pub struct ScopedHandle<T: Copy> {
    handle: T,
    release: Option<Release<T>>,
}

impl<T: Copy> ScopedHandle<T> {
    pub fn new(handle: T, release: impl FnOnce(T) + 'static) -> Self {
        Self {
            handle,
            release: Some(Box::new(release)),
        }
    }

    pub fn get(&self) -> T {
        self.handle
    }

    /// Give up ownership without releasing
    pub fn into_inner(mut self) -> T {
        self.release = None;
        self.handle
    }

    /// Share the handle; it is released when the last clone is dropped
    pub fn into_shared(self) -> SharedHandle<T> {
        SharedHandle(Rc::new(self))
    }
}

impl<T: Copy> Drop for ScopedHandle<T> {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release(self.handle);
        }
    }
}

impl<T: Copy + fmt::Debug> fmt::Debug for ScopedHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedHandle")
            .field("handle", &self.handle)
            .field("armed", &self.release.is_some())
            .finish()
    }
}

/// Reference counted handle
#[derive(Debug)]
pub struct SharedHandle<T: Copy>(Rc<ScopedHandle<T>>);

impl<T: Copy> SharedHandle<T> {
    pub fn new(handle: T, release: impl FnOnce(T) + 'static) -> Self {
        ScopedHandle::new(handle, release).into_shared()
    }

    pub fn strong_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }
}

impl<T: Copy> Clone for SharedHandle<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T: Copy> Deref for SharedHandle<T> {
    type Target = ScopedHandle<T>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
