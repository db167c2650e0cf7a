//! Scoped store sessions.
//!
//! A [`ScopedSession`] releases its session when dropped, so every exit path of a
//! unit of work (early `?` return, error, panic) gives the session back exactly
//! once.

use log::trace;
use std::ops::{Deref, DerefMut};

use super::repository::{RepositoryError, SessionProvider};

/// Session guard bound to the provider it came from.
pub struct ScopedSession<'a, P: SessionProvider + ?Sized> {
    provider: &'a P,
    session: P::Session,
}

impl<'a, P: SessionProvider + ?Sized> ScopedSession<'a, P> {
    pub fn acquire(provider: &'a P) -> Result<Self, RepositoryError> {
        let session = provider.acquire()?;
        trace!("store session acquired");
        Ok(Self { provider, session })
    }
}

impl<P: SessionProvider + ?Sized> Deref for ScopedSession<'_, P> {
    type Target = P::Session;

    fn deref(&self) -> &Self::Target {
        &self.session
    }
}

impl<P: SessionProvider + ?Sized> DerefMut for ScopedSession<'_, P> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.session
    }
}

impl<P: SessionProvider + ?Sized> Drop for ScopedSession<'_, P> {
    fn drop(&mut self) {
        self.provider.release(&mut self.session);
        trace!("store session released");
    }
}

/// Run `f` inside a freshly acquired session.
///
/// Acquisition failures are converted into `E`; the session is released before
/// this function returns, whatever `f` returned.
pub fn with_session<P, T, E, F>(provider: &P, f: F) -> Result<T, E>
where
    P: SessionProvider + ?Sized,
    E: From<RepositoryError>,
    F: FnOnce(&mut P::Session) -> Result<T, E>,
{
    let mut scope = ScopedSession::acquire(provider)?;
    f(&mut scope)
}
