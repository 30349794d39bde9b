//! SQLite schema definitions.

/// Complete schema for the local database: named test records with
/// their ordered word lists, plus the singleton vocabulary snapshot.
pub const SCHEMA: &str = r#"
-- Named missed-word test records
CREATE TABLE IF NOT EXISTS test_records (
    name TEXT PRIMARY KEY,
    updated_at TEXT NOT NULL
);

-- Ordered words belonging to a test record
CREATE TABLE IF NOT EXISTS test_words (
    test_name TEXT NOT NULL REFERENCES test_records(name) ON DELETE CASCADE,
    position INTEGER NOT NULL,
    en TEXT NOT NULL,
    ja TEXT NOT NULL,
    PRIMARY KEY (test_name, position)
);

-- The active vocabulary snapshot (replaced wholesale on import)
CREATE TABLE IF NOT EXISTS vocabulary_words (
    position INTEGER PRIMARY KEY,
    en TEXT NOT NULL,
    ja TEXT NOT NULL
);
"#;
