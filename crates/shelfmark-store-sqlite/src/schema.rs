//! SQL schema for the Shelfmark SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS books (
    user_id      TEXT NOT NULL,
    book_id      TEXT NOT NULL,   -- catalog volume id
    title        TEXT NOT NULL,
    authors      TEXT NOT NULL DEFAULT '[]',   -- JSON array of names
    cover_image  TEXT,
    genre        TEXT,
    status       TEXT NOT NULL DEFAULT 'notStarted',
    total_pages  INTEGER,
    current_page INTEGER,
    started_at   TEXT,            -- RFC 3339 UTC
    completed_at TEXT,            -- RFC 3339 UTC
    notes        TEXT,
    added_at     TEXT NOT NULL,   -- server-assigned; drives listing order
    PRIMARY KEY (user_id, book_id)
);

-- Sessions are append-only: no UPDATE or DELETE is ever issued against
-- this table, apart from the cascade when the owning book is removed.
CREATE TABLE IF NOT EXISTS reading_sessions (
    session_id       TEXT PRIMARY KEY,
    user_id          TEXT NOT NULL,
    book_id          TEXT NOT NULL,
    duration_minutes INTEGER NOT NULL,
    pages_read       INTEGER,
    session_date     TEXT NOT NULL,   -- RFC 3339 UTC
    notes            TEXT,
    FOREIGN KEY (user_id, book_id)
      REFERENCES books(user_id, book_id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS wishlist (
    user_id     TEXT NOT NULL,
    book_id     TEXT NOT NULL,    -- catalog volume id
    title       TEXT NOT NULL,
    authors     TEXT NOT NULL DEFAULT '[]',
    cover_image TEXT,
    added_at    TEXT NOT NULL,    -- server-assigned
    PRIMARY KEY (user_id, book_id)
);

CREATE INDEX IF NOT EXISTS books_added_idx    ON books(user_id, added_at);
CREATE INDEX IF NOT EXISTS sessions_book_idx  ON reading_sessions(user_id, book_id, session_date);
CREATE INDEX IF NOT EXISTS wishlist_added_idx ON wishlist(user_id, added_at);

PRAGMA user_version = 1;
";
