//! SQLite schema definition.

/// Complete database schema for the clinic.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Users (accounts + physician directory)
-- ============================================================================

CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    role TEXT NOT NULL CHECK (role IN ('admin', 'physician', 'receptionist')),
    password_hash TEXT NOT NULL,
    password_salt TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_users_role ON users(role);

-- ============================================================================
-- Patients
-- ============================================================================

CREATE TABLE IF NOT EXISTS patients (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    date_of_birth TEXT,                          -- YYYY-MM-DD
    phone TEXT,
    email TEXT,
    address TEXT,
    notes TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_patients_last_name ON patients(last_name);

-- ============================================================================
-- Appointments
-- ============================================================================

CREATE TABLE IF NOT EXISTS appointments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    patient_id INTEGER NOT NULL REFERENCES patients(id),
    physician_id INTEGER NOT NULL REFERENCES users(id),
    scheduled_at TEXT NOT NULL,                  -- YYYY-MM-DDTHH:MM:SS
    duration_minutes INTEGER NOT NULL,
    reason TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'scheduled'
        CHECK (status IN ('scheduled', 'completed', 'cancelled')),
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_appointments_patient ON appointments(patient_id);
CREATE INDEX IF NOT EXISTS idx_appointments_scheduled ON appointments(scheduled_at);

-- ============================================================================
-- Consultations (medical records)
-- ============================================================================

CREATE TABLE IF NOT EXISTS consultations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    patient_id INTEGER NOT NULL REFERENCES patients(id),
    physician_id INTEGER NOT NULL REFERENCES users(id),
    examined_at TEXT NOT NULL,                   -- YYYY-MM-DDTHH:MM:SS
    reason TEXT NOT NULL,
    observations TEXT NOT NULL DEFAULT '',
    diagnosis TEXT NOT NULL,
    treatment TEXT NOT NULL DEFAULT '',
    notes TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_consultations_patient ON consultations(patient_id);
CREATE INDEX IF NOT EXISTS idx_consultations_examined ON consultations(examined_at);

-- ============================================================================
-- Gardes (on-call assignments)
-- ============================================================================

CREATE TABLE IF NOT EXISTS gardes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    starts_at TEXT NOT NULL,                     -- YYYY-MM-DDTHH:MM:SS
    ends_at TEXT NOT NULL,
    physician_id INTEGER NOT NULL REFERENCES users(id),
    shift_type TEXT NOT NULL CHECK (shift_type IN ('day', 'night', 'weekend')),
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now')),
    CHECK (starts_at < ends_at)
);

CREATE INDEX IF NOT EXISTS idx_gardes_starts ON gardes(starts_at);
CREATE INDEX IF NOT EXISTS idx_gardes_physician ON gardes(physician_id);
"#;
