//! SQLite schema for Rusty-Fund.
//!
//! Cascades and uniqueness live here, not in the core: a project takes its
//! rewards with it, a reward or user takes its backings, and a user may back
//! a given reward only once.

pub(crate) const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id              BLOB PRIMARY KEY NOT NULL,
    email           TEXT NOT NULL UNIQUE,
    name            TEXT NOT NULL,
    image_url       TEXT NOT NULL DEFAULT 'https://i.imgur.com/rfxjQeS.png',
    password_digest TEXT NOT NULL,
    created_at      TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS projects (
    id               BLOB PRIMARY KEY NOT NULL,
    user_id          BLOB NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    category         TEXT NOT NULL,
    title            TEXT NOT NULL,
    short_blurb      TEXT NOT NULL,
    description      TEXT NOT NULL,
    image_url        TEXT NOT NULL,
    funding_amount   INTEGER NOT NULL CHECK (funding_amount > 0),
    funding_end_date TEXT NOT NULL,
    created_at       TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS index_projects_on_user_id ON projects(user_id);
CREATE INDEX IF NOT EXISTS index_projects_on_category ON projects(category);
CREATE INDEX IF NOT EXISTS index_projects_on_funding_amount ON projects(funding_amount);
CREATE INDEX IF NOT EXISTS index_projects_on_funding_end_date ON projects(funding_end_date);

CREATE TABLE IF NOT EXISTS rewards (
    id          BLOB PRIMARY KEY NOT NULL,
    project_id  BLOB NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    amount      INTEGER NOT NULL CHECK (amount > 0),
    title       TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    created_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS index_rewards_on_project_id ON rewards(project_id);

CREATE TABLE IF NOT EXISTS backings (
    id         BLOB PRIMARY KEY NOT NULL,
    reward_id  BLOB NOT NULL REFERENCES rewards(id) ON DELETE CASCADE,
    user_id    BLOB NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    created_at TEXT NOT NULL,
    UNIQUE (user_id, reward_id)
);

CREATE INDEX IF NOT EXISTS index_backings_on_reward_id ON backings(reward_id);
"#;
