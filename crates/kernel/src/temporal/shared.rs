use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::net::TriangleNet4d;
use super::TemporalError;
use crate::traits::Net4d;

/// A net shared between threads: many readers or one writer.
///
/// Writers never wait. If the lock is held by anyone, `write` fails with
/// [`TemporalError::WriterBusy`].
#[derive(Debug)]
pub struct SharedNet<N: Net4d = TriangleNet4d> {
    inner: Arc<RwLock<N>>,
}

impl<N: Net4d> Clone for SharedNet<N> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<N: Net4d> SharedNet<N> {
    pub fn new(net: N) -> Self {
        Self {
            inner: Arc::new(RwLock::new(net)),
        }
    }

    pub fn read(&self) -> RwLockReadGuard<'_, N> {
        self.inner.read()
    }

    pub fn try_read(&self) -> Option<RwLockReadGuard<'_, N>> {
        self.inner.try_read()
    }

    pub fn write(&self) -> Result<RwLockWriteGuard<'_, N>, TemporalError> {
        self.inner.try_write().ok_or(TemporalError::WriterBusy)
    }

    /// Run one mutation under the write lock.
    pub fn update<R>(
        &self,
        f: impl FnOnce(&mut N) -> Result<R, TemporalError>,
    ) -> Result<R, TemporalError> {
        let mut guard = self.write()?;
        f(&mut guard)
    }
}
