//! Embedded schema migrations, tracked with `PRAGMA user_version`.

use rusqlite::Connection;
use tracing::info;

use crate::error::Result;

/// Facet tables share one shape; `tools` adds a category.
const MIGRATION_001_FACETS: &str = r"
CREATE TABLE IF NOT EXISTS skills (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    slug TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS locations (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    slug TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS service_types (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    slug TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS tools (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    slug TEXT NOT NULL UNIQUE,
    category TEXT
);
";

const MIGRATION_002_MARKETPLACE: &str = r"
CREATE TABLE IF NOT EXISTS accounts (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    created_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS company_profiles (
    id INTEGER PRIMARY KEY,
    account_id INTEGER NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    slug TEXT NOT NULL UNIQUE,
    company_size TEXT,
    location_id INTEGER REFERENCES locations(id)
);

CREATE TABLE IF NOT EXISTS job_listings (
    id INTEGER PRIMARY KEY,
    company_profile_id INTEGER NOT NULL REFERENCES company_profiles(id) ON DELETE CASCADE,
    location_id INTEGER REFERENCES locations(id),
    title TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    employment_type TEXT NOT NULL,
    salary_min INTEGER,
    salary_max INTEGER,
    remote_ok INTEGER NOT NULL DEFAULT 0,
    status TEXT NOT NULL DEFAULT 'active',
    posted_at INTEGER NOT NULL,
    expires_at INTEGER,
    slug TEXT NOT NULL UNIQUE
);

CREATE INDEX IF NOT EXISTS idx_job_listings_status_posted ON job_listings(status, posted_at);
CREATE INDEX IF NOT EXISTS idx_job_listings_location ON job_listings(location_id);
CREATE INDEX IF NOT EXISTS idx_job_listings_company ON job_listings(company_profile_id);

CREATE TABLE IF NOT EXISTS marketer_profiles (
    id INTEGER PRIMARY KEY,
    account_id INTEGER NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
    title TEXT NOT NULL,
    bio TEXT NOT NULL DEFAULT '',
    hourly_rate INTEGER,
    location_id INTEGER REFERENCES locations(id),
    service_type_id INTEGER REFERENCES service_types(id),
    availability TEXT,
    experience_level TEXT,
    slug TEXT NOT NULL UNIQUE,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_marketer_profiles_location ON marketer_profiles(location_id);
CREATE INDEX IF NOT EXISTS idx_marketer_profiles_service_type ON marketer_profiles(service_type_id);
CREATE INDEX IF NOT EXISTS idx_marketer_profiles_rate ON marketer_profiles(hourly_rate);

CREATE TABLE IF NOT EXISTS marketer_skills (
    marketer_profile_id INTEGER NOT NULL REFERENCES marketer_profiles(id) ON DELETE CASCADE,
    skill_id INTEGER NOT NULL REFERENCES skills(id) ON DELETE CASCADE,
    PRIMARY KEY (marketer_profile_id, skill_id)
);

CREATE INDEX IF NOT EXISTS idx_marketer_skills_skill ON marketer_skills(skill_id);

CREATE TABLE IF NOT EXISTS marketer_tools (
    marketer_profile_id INTEGER NOT NULL REFERENCES marketer_profiles(id) ON DELETE CASCADE,
    tool_id INTEGER NOT NULL REFERENCES tools(id) ON DELETE CASCADE,
    PRIMARY KEY (marketer_profile_id, tool_id)
);

CREATE INDEX IF NOT EXISTS idx_marketer_tools_tool ON marketer_tools(tool_id);
";

/// FTS rowids equal the owning row id. The write helpers rewrite a row's
/// searchable text whenever its inputs change.
const MIGRATION_003_FTS: &str = r"
CREATE VIRTUAL TABLE IF NOT EXISTS job_listings_fts USING fts5(
    searchable_text,
    tokenize = 'porter unicode61'
);

CREATE VIRTUAL TABLE IF NOT EXISTS marketer_profiles_fts USING fts5(
    searchable_text,
    tokenize = 'porter unicode61'
);
";

const MIGRATIONS: &[&str] = &[
    MIGRATION_001_FACETS,
    MIGRATION_002_MARKETPLACE,
    MIGRATION_003_FTS,
];

/// Schema version after all migrations ran.
#[allow(clippy::cast_possible_truncation)]
pub const SCHEMA_VERSION: u32 = MIGRATIONS.len() as u32;

/// Apply pending migrations, returning the resulting schema version.
pub fn run_migrations(conn: &Connection) -> Result<u32> {
    let current: u32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

    for (index, sql) in MIGRATIONS.iter().enumerate().skip(current as usize) {
        let version = index + 1;
        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", version as u32)?;
        tx.commit()?;
        info!(target: "storage", version, "applied migration");
    }

    Ok(current.max(SCHEMA_VERSION))
}
