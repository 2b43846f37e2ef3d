//! # Certificate Store
//!
//! Thread-safe in-memory store for issued certificates, holding the two
//! indexes the workflows need: by certificate id and by (course,
//! participant) pair.
//!
//! All operations are synchronous (the lock is `parking_lot`, not
//! `tokio::sync`) because the lock is never held across `.await` points.
//! `parking_lot::RwLock` is non-poisonable — a panicking writer does not
//! permanently corrupt the store.
//!
//! ## Uniqueness invariant
//!
//! At most one certificate per (course, participant) pair. The
//! check-then-create sequence in [`CertificateStore::get_or_insert_for_pair`]
//! runs entirely under one write lock, so two concurrent issuance calls
//! for the same pair serialize: the first creates, the second observes and
//! returns the existing record. When a database sits behind this store,
//! its UNIQUE constraint is the second, authoritative line of defense.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use rtcert_core::{Certificate, CertificateId, CourseId, ParticipantId, StatusError};

use crate::error::IssuanceError;

#[derive(Debug, Default)]
struct Inner {
    by_id: HashMap<CertificateId, Certificate>,
    by_pair: HashMap<(CourseId, ParticipantId), CertificateId>,
}

/// Thread-safe, cloneable certificate store.
#[derive(Debug, Default)]
pub struct CertificateStore {
    inner: Arc<RwLock<Inner>>,
}

impl Clone for CertificateStore {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl CertificateStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieve a certificate by id.
    pub fn get(&self, id: &CertificateId) -> Option<Certificate> {
        self.inner.read().by_id.get(id).cloned()
    }

    /// Retrieve the certificate for a (course, participant) pair, if any.
    pub fn find_by_pair(
        &self,
        course_id: &CourseId,
        participant_id: &ParticipantId,
    ) -> Option<Certificate> {
        let guard = self.inner.read();
        let id = guard.by_pair.get(&(*course_id, *participant_id))?;
        guard.by_id.get(id).cloned()
    }

    /// Number of certificates issued in the given calendar year.
    pub fn count_for_year(&self, year: i32) -> u32 {
        self.inner
            .read()
            .by_id
            .values()
            .filter(|c| c.issued_at.year() == year)
            .count() as u32
    }

    /// Atomic check-then-create for a (course, participant) pair.
    ///
    /// If a certificate for the pair already exists, returns it with
    /// `created = false` and never calls `build`. Otherwise calls `build`
    /// with the count of certificates already issued in `year`, inserts
    /// the result, and returns it with `created = true`. The entire
    /// sequence runs under a single write lock.
    pub fn get_or_insert_for_pair(
        &self,
        course_id: CourseId,
        participant_id: ParticipantId,
        year: i32,
        build: impl FnOnce(u32) -> Certificate,
    ) -> (Certificate, bool) {
        let mut guard = self.inner.write();

        if let Some(id) = guard.by_pair.get(&(course_id, participant_id)) {
            if let Some(existing) = guard.by_id.get(id) {
                return (existing.clone(), false);
            }
        }

        let prior_count = guard
            .by_id
            .values()
            .filter(|c| c.issued_at.year() == year)
            .count() as u32;

        let certificate = build(prior_count);
        guard
            .by_pair
            .insert((course_id, participant_id), certificate.id);
        guard.by_id.insert(certificate.id, certificate.clone());
        (certificate, true)
    }

    /// Insert a certificate loaded from persistent storage.
    ///
    /// # Errors
    ///
    /// Returns [`IssuanceError::CorruptPair`] if a certificate for the
    /// same pair is already present — two rows for one pair means the
    /// storage-level uniqueness constraint was violated.
    pub fn insert_hydrated(&self, certificate: Certificate) -> Result<(), IssuanceError> {
        let mut guard = self.inner.write();
        let pair = (certificate.course_id, certificate.participant_id);
        if guard.by_pair.contains_key(&pair) {
            return Err(IssuanceError::CorruptPair {
                course_id: certificate.course_id,
                participant_id: certificate.participant_id,
            });
        }
        guard.by_pair.insert(pair, certificate.id);
        guard.by_id.insert(certificate.id, certificate);
        Ok(())
    }

    /// Replace the certificate for a (course, participant) pair with an
    /// authoritative record, returning the displaced one.
    ///
    /// Durable storage can disagree with this store: another process may
    /// have persisted a different certificate for the pair, or a
    /// freshly issued certificate may need a new number after a sequence
    /// collision. In both cases the record already written (or about to
    /// be written) to storage wins, and the locally created one is
    /// dropped from both indexes.
    pub fn replace_for_pair(&self, certificate: Certificate) -> Option<Certificate> {
        let mut guard = self.inner.write();
        let pair = (certificate.course_id, certificate.participant_id);
        let displaced = guard.by_pair.insert(pair, certificate.id);
        let previous = displaced.and_then(|old_id| guard.by_id.remove(&old_id));
        guard.by_id.insert(certificate.id, certificate);
        previous
    }

    /// Remove a certificate from both indexes, returning it.
    ///
    /// Rollback path: when the durable write for a freshly issued
    /// certificate fails outright, the local record must not survive,
    /// or it would vanish on the next restart while this process keeps
    /// serving it.
    pub fn remove(&self, id: &CertificateId) -> Option<Certificate> {
        let mut guard = self.inner.write();
        let certificate = guard.by_id.remove(id)?;
        guard
            .by_pair
            .remove(&(certificate.course_id, certificate.participant_id));
        Some(certificate)
    }

    /// Atomically revoke a certificate.
    ///
    /// Returns `None` if the id is unknown, otherwise the transition
    /// result with the updated record. Only `number`-preserving status
    /// mutation exists; no code path updates the immutable fields.
    pub fn revoke(&self, id: &CertificateId) -> Option<Result<Certificate, StatusError>> {
        let mut guard = self.inner.write();
        let cert = guard.by_id.get_mut(id)?;
        Some(cert.revoke().map(|()| cert.clone()))
    }

    /// List all certificates (hydration checks, admin listings).
    pub fn list(&self) -> Vec<Certificate> {
        self.inner.read().by_id.values().cloned().collect()
    }

    /// Number of stored certificates.
    pub fn len(&self) -> usize {
        self.inner.read().by_id.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
