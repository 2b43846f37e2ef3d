//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! Courses and participants live in generic in-memory [`Store`]s;
//! certificates live in the [`CertificateStore`] from `rtcert-issuance`,
//! which enforces the one-certificate-per-(course, participant) invariant
//! under its own write lock. When a Postgres pool is configured, the
//! in-memory stores remain authoritative at request time and the database
//! is write-through plus startup hydration.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::RwLock;
use sqlx::PgPool;

use rtcert_core::{Course, Participant};
use rtcert_crypto::TokenDeriver;
use rtcert_issuance::CertificateStore;
use rtcert_pdf::{CertificateRenderer, MinimalPdfRenderer};

// -- Generic In-Memory Store ----------------------------------------------

/// Thread-safe, cloneable in-memory key-value store.
///
/// All operations are synchronous (the RwLock is `parking_lot`, not
/// `tokio::sync`) because the lock is never held across `.await` points,
/// and `parking_lot::RwLock` is non-poisonable.
#[derive(Debug)]
pub struct Store<K, T> {
    data: Arc<RwLock<HashMap<K, T>>>,
}

impl<K, T> Clone for Store<K, T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

impl<K: Eq + Hash + Copy, T: Clone> Store<K, T> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert a record, returning the previous value if the key existed.
    pub fn insert(&self, id: K, value: T) -> Option<T> {
        self.data.write().insert(id, value)
    }

    /// Retrieve a record by ID.
    pub fn get(&self, id: &K) -> Option<T> {
        self.data.read().get(id).cloned()
    }

    /// List all records.
    pub fn list(&self) -> Vec<T> {
        self.data.read().values().cloned().collect()
    }

    /// Return the number of records.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K: Eq + Hash + Copy, T: Clone> Default for Store<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

// -- Application State ------------------------------------------------------

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Public base URL embedded in validation URLs printed on certificates.
    pub public_base_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            public_base_url: "http://localhost:8080".to_string(),
        }
    }
}

/// Shared application state accessible to all route handlers.
///
/// Clone-friendly via `Arc` internals in each store. The signing secret
/// itself is not held here: it lives inside the [`TokenDeriver`], which
/// redacts it from `Debug` output.
#[derive(Clone)]
pub struct AppState {
    pub courses: Store<rtcert_core::CourseId, Course>,
    pub participants: Store<rtcert_core::ParticipantId, Participant>,
    pub certificates: CertificateStore,

    /// Keyed token deriver, constructed once at startup from
    /// `CERTIFICATE_SECRET`.
    pub deriver: Arc<TokenDeriver>,

    /// PDF renderer behind the trait seam, so layout work can swap the
    /// implementation without touching issuance.
    pub renderer: Arc<dyn CertificateRenderer>,

    /// PostgreSQL connection pool for durable persistence.
    /// `None` means in-memory-only mode.
    pub db_pool: Option<PgPool>,

    pub config: AppConfig,
}

impl AppState {
    /// Create application state with the given configuration and optional
    /// database pool.
    pub fn with_config(config: AppConfig, deriver: TokenDeriver, db_pool: Option<PgPool>) -> Self {
        Self {
            courses: Store::new(),
            participants: Store::new(),
            certificates: CertificateStore::new(),
            deriver: Arc::new(deriver),
            renderer: Arc::new(MinimalPdfRenderer::new()),
            db_pool,
            config,
        }
    }

    /// Hydrate in-memory stores from the database.
    ///
    /// Called once on startup when a database pool is available, so that
    /// read operations remain fast and synchronous afterwards.
    pub async fn hydrate_from_db(&self) -> Result<(), String> {
        let pool = match &self.db_pool {
            Some(pool) => pool,
            None => return Ok(()),
        };

        let courses = crate::db::courses::load_all(pool)
            .await
            .map_err(|e| format!("failed to load courses: {e}"))?;
        let course_count = courses.len();
        for course in courses {
            self.courses.insert(course.id, course);
        }

        let participants = crate::db::participants::load_all(pool)
            .await
            .map_err(|e| format!("failed to load participants: {e}"))?;
        let participant_count = participants.len();
        for participant in participants {
            self.participants.insert(participant.id, participant);
        }

        let certificates = crate::db::certificates::load_all(pool)
            .await
            .map_err(|e| format!("failed to load certificates: {e}"))?;
        let certificate_count = certificates.len();
        for certificate in certificates {
            self.certificates
                .insert_hydrated(certificate)
                .map_err(|e| format!("corrupt certificate data: {e}"))?;
        }

        tracing::info!(
            courses = course_count,
            participants = participant_count,
            certificates = certificate_count,
            "hydrated in-memory stores from database"
        );

        Ok(())
    }
}
