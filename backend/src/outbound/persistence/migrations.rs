//! Schema migration runner.
//!
//! The migration chain is strictly linear: every migration has exactly one
//! predecessor, and applying the full chain from an empty database must
//! reproduce the live schema exactly. The runner enforces that shape
//! (duplicate versions are rejected as branch ambiguity) and fronts Diesel's
//! `MigrationHarness` with operator-facing operations: apply everything,
//! revert one step, revert to a target version, and status listing.
//!
//! # Irreversible migrations
//!
//! One migration is a documented exception to exact reversibility: the
//! `diagnostic_requested` backfill collapsed NULLs into FALSE, and the
//! original per-row values are gone. Its down step restores only the column
//! shape. Reverting it is allowed but warns loudly so operators never
//! mistake the no-op for a restore.

use diesel::migration::{Migration, MigrationSource};
use diesel::pg::Pg;
use diesel::{Connection, PgConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::{info, warn};

/// All migrations compiled into the binary from `backend/migrations/`.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Migrations whose down step cannot restore the pre-migration data.
///
/// Each entry is the full migration directory name. Keep this list in sync
/// with the commentary in the corresponding `down.sql`.
const IRREVERSIBLE_MIGRATIONS: &[&str] = &["2025-04-02-000009_backfill_diagnostic_requested"];

/// Errors surfaced by the migration runner.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// Could not open a database connection.
    #[error("failed to connect to database: {0}")]
    Connection(#[from] diesel::ConnectionError),
    /// Two migrations share a version; the chain is no longer linear.
    #[error("duplicate migration version {version}; the chain must be strictly linear")]
    DuplicateVersion {
        /// The ambiguous version id.
        version: String,
    },
    /// The operator asked to revert to a version that is not applied.
    #[error("target version {version} is not in the applied migration history")]
    UnknownTarget {
        /// The requested version id.
        version: String,
    },
    /// The underlying harness failed to run or revert a migration.
    #[error("migration harness failed: {0}")]
    Harness(String),
}

impl MigrationError {
    fn harness(error: impl std::fmt::Display) -> Self {
        Self::Harness(error.to_string())
    }
}

/// Status of a single migration in the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStatus {
    /// Full migration name (`<version>_<slug>`).
    pub name: String,
    /// Version prefix as stored in the schema history table.
    pub version: String,
    /// Whether the migration has been applied to this database.
    pub applied: bool,
    /// Whether reverting it is a documented no-op for data.
    pub irreversible: bool,
}

/// Operator-facing migration runner over one database connection.
pub struct MigrationRunner {
    conn: PgConnection,
}

impl MigrationRunner {
    /// Connect to the given database.
    pub fn connect(database_url: &str) -> Result<Self, MigrationError> {
        let conn = PgConnection::establish(database_url)?;
        Ok(Self { conn })
    }

    /// Wrap an existing connection.
    pub fn new(conn: PgConnection) -> Self {
        Self { conn }
    }

    /// Apply every pending migration in version order.
    ///
    /// Returns the versions applied by this run, oldest first.
    pub fn apply_all(&mut self) -> Result<Vec<String>, MigrationError> {
        Self::verify_linear_chain()?;
        let applied = self
            .conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(MigrationError::harness)?;
        let versions: Vec<String> = applied.iter().map(ToString::to_string).collect();
        for version in &versions {
            info!(version = version.as_str(), "applied migration");
        }
        Ok(versions)
    }

    /// Revert the most recently applied migration.
    ///
    /// Returns the reverted version. Reverting the documented irreversible
    /// backfill warns that the original data is not restored.
    pub fn revert_one(&mut self) -> Result<String, MigrationError> {
        Self::verify_linear_chain()?;
        if let Some(top) = self.applied_versions()?.last() {
            warn_if_irreversible(top);
        }
        let reverted = self
            .conn
            .revert_last_migration(MIGRATIONS)
            .map_err(MigrationError::harness)?;
        let version = reverted.to_string();
        info!(version = version.as_str(), "reverted migration");
        Ok(version)
    }

    /// Revert until `target_version` is the newest applied migration.
    ///
    /// Accepts the stored history form (`20250115000003`) and the dashed
    /// directory prefix (`2025-01-15-000003`) interchangeably. Returns the
    /// reverted versions, newest first. Fails without touching the database
    /// when the target is not in the applied history.
    pub fn revert_to(&mut self, target_version: &str) -> Result<Vec<String>, MigrationError> {
        Self::verify_linear_chain()?;
        let target = normalize_version(target_version);
        let applied = self.applied_versions()?;
        if !applied.iter().any(|v| *v == target) {
            return Err(MigrationError::UnknownTarget {
                version: target_version.to_owned(),
            });
        }

        let mut reverted = Vec::new();
        while let Some(top) = self.applied_versions()?.last() {
            if *top == target {
                break;
            }
            reverted.push(self.revert_one()?);
        }
        Ok(reverted)
    }

    /// Status of every migration in the chain, oldest first.
    pub fn status(&mut self) -> Result<Vec<MigrationStatus>, MigrationError> {
        Self::verify_linear_chain()?;
        let applied = self.applied_versions()?;
        let mut entries: Vec<MigrationStatus> = source_migrations()?
            .iter()
            .map(|migration| {
                let name = migration.name().to_string();
                let version = migration.name().version().to_string();
                let is_applied = applied.iter().any(|v| *v == version);
                MigrationStatus {
                    applied: is_applied,
                    irreversible: IRREVERSIBLE_MIGRATIONS.contains(&name.as_str()),
                    name,
                    version,
                }
            })
            .collect();
        entries.sort_by(|a, b| a.version.cmp(&b.version));
        Ok(entries)
    }

    /// Applied versions, oldest first.
    fn applied_versions(&mut self) -> Result<Vec<String>, MigrationError> {
        let mut versions: Vec<String> = self
            .conn
            .applied_migrations()
            .map_err(MigrationError::harness)?
            .iter()
            .map(ToString::to_string)
            .collect();
        versions.sort();
        Ok(versions)
    }

    /// Reject a migration set whose versions collide.
    fn verify_linear_chain() -> Result<(), MigrationError> {
        let mut versions: Vec<String> = source_migrations()?
            .iter()
            .map(|m| m.name().version().to_string())
            .collect();
        versions.sort();
        for pair in versions.windows(2) {
            if pair[0] == pair[1] {
                return Err(MigrationError::DuplicateVersion {
                    version: pair[0].clone(),
                });
            }
        }
        Ok(())
    }
}

/// List the embedded migrations without touching a database.
pub(crate) fn source_migrations() -> Result<Vec<Box<dyn Migration<Pg>>>, MigrationError> {
    MigrationSource::<Pg>::migrations(&MIGRATIONS).map_err(MigrationError::harness)
}

/// Full migration directory name for a stored history version, when known.
///
/// The harness strips punctuation from directory timestamps before recording
/// them, so `2025-04-02-000009_...` is stored as `20250402000009`. Matching
/// must go through each migration's own version; comparing against the dashed
/// directory prefix never hits.
fn name_for_version(version: &str) -> Option<String> {
    let migrations = source_migrations().ok()?;
    migrations
        .iter()
        .find(|m| m.name().version().to_string() == version)
        .map(|m| m.name().to_string())
}

fn warn_if_irreversible(version: &str) {
    if let Some(name) = name_for_version(version) {
        if IRREVERSIBLE_MIGRATIONS.contains(&name.as_str()) {
            warn!(
                migration = name.as_str(),
                "reverting an irreversible data backfill: the down step restores \
                 only the column shape, backfilled values are NOT recovered"
            );
        }
    }
}

/// Strip the dashes of a directory-style version; history versions are
/// stored as bare digits.
fn normalize_version(version: &str) -> String {
    version.chars().filter(|c| *c != '-').collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn chain_is_complete_and_strictly_ordered() {
        let migrations = source_migrations().expect("embedded migrations load");
        // Initial Diesel setup plus the ten schema steps.
        assert_eq!(migrations.len(), 11);

        let versions: Vec<String> = migrations
            .iter()
            .map(|m| m.name().version().to_string())
            .collect();
        let mut sorted = versions.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), versions.len(), "duplicate versions present");
    }

    #[rstest]
    fn linear_chain_verification_accepts_the_embedded_set() {
        MigrationRunner::verify_linear_chain().expect("embedded chain is linear");
    }

    #[rstest]
    fn irreversible_backfill_is_part_of_the_chain() {
        let names: Vec<String> = source_migrations()
            .expect("embedded migrations load")
            .iter()
            .map(|m| m.name().to_string())
            .collect();
        for irreversible in IRREVERSIBLE_MIGRATIONS {
            assert!(
                names.iter().any(|n| n == irreversible),
                "irreversible list references unknown migration {irreversible}"
            );
        }
    }

    #[rstest]
    fn stored_version_resolves_the_irreversible_backfill() {
        let migrations = source_migrations().expect("embedded migrations load");
        let backfill = migrations
            .iter()
            .find(|m| m.name().to_string() == "2025-04-02-000009_backfill_diagnostic_requested")
            .expect("backfill migration present");

        // The history table stores versions with the dashes stripped; the
        // revert warning must match on that form, not the directory prefix.
        let stored = backfill.name().version().to_string();
        assert!(
            !stored.contains('-'),
            "stored form is bare digits: {stored}"
        );

        let name = name_for_version(&stored).expect("stored version resolves to a name");
        assert!(
            IRREVERSIBLE_MIGRATIONS.contains(&name.as_str()),
            "resolved name is flagged irreversible: {name}"
        );
    }

    #[rstest]
    fn dashed_directory_prefix_does_not_resolve_directly() {
        assert_eq!(name_for_version("2025-04-02-000009"), None);
        assert_eq!(
            name_for_version(&normalize_version("2025-04-02-000009")).as_deref(),
            Some("2025-04-02-000009_backfill_diagnostic_requested")
        );
    }

    #[rstest]
    #[case("2025-01-15-000003", "20250115000003")]
    #[case("20250115000003", "20250115000003")]
    #[case("00000000000000", "00000000000000")]
    fn version_normalization_strips_dashes(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_version(input), expected);
    }

    #[rstest]
    fn expected_schema_steps_are_present() {
        let names: Vec<String> = source_migrations()
            .expect("embedded migrations load")
            .iter()
            .map(|m| m.name().to_string())
            .collect();
        for expected in [
            "create_users",
            "create_bookings",
            "create_messages_and_validation_proofs",
            "widen_check_in_code_hash",
            "backfill_diagnostic_requested",
            "ensure_availability_lookup_index",
        ] {
            assert!(
                names.iter().any(|n| n.ends_with(expected)),
                "missing migration step {expected}"
            );
        }
    }
}
