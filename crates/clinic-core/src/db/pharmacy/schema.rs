//! Pharmacy database schema.

/// Complete schema for the pharmacy store. Idempotent: safe to run on
/// every open.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Medicine master: WHAT exists (Arnica, Belladonna, ...)
-- ============================================================================

CREATE TABLE IF NOT EXISTS medicine_master (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    category TEXT NOT NULL CHECK (category IN ('Q', 'DILUTION', 'BIOCHEMIC', 'COMPLEX', 'NOSODE', 'GLOBULE', 'OTHER')),
    manufacturer TEXT,
    is_active INTEGER NOT NULL DEFAULT 1,
    is_restricted INTEGER NOT NULL DEFAULT 0,
    notes TEXT
);

-- ============================================================================
-- Medicine variants: HOW it exists (Arnica 30C 30ml liquid)
-- ============================================================================

CREATE TABLE IF NOT EXISTS medicine_variants (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    medicine_id INTEGER NOT NULL REFERENCES medicine_master(id) ON DELETE CASCADE,
    potency TEXT,
    form TEXT,
    bottle_size TEXT,
    unit_type TEXT,
    min_stock_level INTEGER NOT NULL DEFAULT 5,
    expiry_date TEXT
);

CREATE INDEX IF NOT EXISTS idx_variants_medicine ON medicine_variants(medicine_id);

-- ============================================================================
-- Inventory stock: CURRENT state, exactly one row per variant
-- ============================================================================

CREATE TABLE IF NOT EXISTS inventory_stock (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    variant_id INTEGER NOT NULL UNIQUE REFERENCES medicine_variants(id) ON DELETE CASCADE,
    quantity_available INTEGER NOT NULL DEFAULT 0,
    last_updated TEXT NOT NULL DEFAULT (datetime('now'))
);

-- ============================================================================
-- Inventory movements: HISTORY, append-only
-- ============================================================================

CREATE TABLE IF NOT EXISTS inventory_movements (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    variant_id INTEGER NOT NULL REFERENCES medicine_variants(id) ON DELETE CASCADE,
    movement_type TEXT NOT NULL CHECK (movement_type IN ('IN', 'OUT', 'EXPIRED', 'ADJUST', 'RETURN')),
    quantity INTEGER NOT NULL,
    reference_type TEXT NOT NULL CHECK (reference_type IN ('PURCHASE', 'PRESCRIPTION', 'DISPOSAL', 'ADJUSTMENT')),
    reference_id TEXT,
    notes TEXT NOT NULL DEFAULT '',
    recorded_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_movements_variant ON inventory_movements(variant_id);

-- ============================================================================
-- Globule stock: consumables by size class, outside the variant hierarchy
-- ============================================================================

CREATE TABLE IF NOT EXISTS globule_stock (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    size INTEGER NOT NULL UNIQUE,
    quantity_available INTEGER NOT NULL DEFAULT 0,
    min_level INTEGER NOT NULL DEFAULT 10
);
"#;
