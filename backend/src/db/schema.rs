//! SQL DDL for the factory database.
//!
//! Every statement is `IF NOT EXISTS`, so the whole list can run on every
//! startup.

/// Tables, in foreign key dependency order
pub const TABLES: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS vendors (
        vendor_id      INTEGER PRIMARY KEY,
        name           TEXT NOT NULL UNIQUE,
        vendor_type    TEXT NOT NULL DEFAULT 'other'
                       CHECK (vendor_type IN ('raw_leather', 'chemical', 'service', 'other')),
        contact_person TEXT,
        phone          TEXT,
        email          TEXT,
        address        TEXT,
        active         INTEGER NOT NULL DEFAULT 1,
        created_at     TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS chemicals (
        chemical_id         INTEGER PRIMARY KEY,
        name                TEXT NOT NULL UNIQUE,
        default_unit        TEXT NOT NULL DEFAULT 'kg'
                            CHECK (default_unit IN ('kg', 'g', 'L', 'mL', 'pcs')),
        unit_cost           REAL,
        preferred_vendor_id INTEGER REFERENCES vendors(vendor_id) ON DELETE SET NULL,
        created_at          TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS processes (
        process_id  INTEGER PRIMARY KEY,
        name        TEXT NOT NULL UNIQUE,
        description TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS articles (
        article_id   INTEGER PRIMARY KEY,
        article_code TEXT NOT NULL UNIQUE,
        description  TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS article_process_flow (
        apf_id         INTEGER PRIMARY KEY,
        article_id     INTEGER NOT NULL,
        process_id     INTEGER NOT NULL,
        sequence_order INTEGER NOT NULL,
        UNIQUE (article_id, process_id),
        FOREIGN KEY (article_id) REFERENCES articles(article_id) ON DELETE CASCADE,
        FOREIGN KEY (process_id) REFERENCES processes(process_id) ON DELETE RESTRICT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS raw_leather_lots (
        lot_id        INTEGER PRIMARY KEY,
        lot_code      TEXT NOT NULL UNIQUE,
        vendor_id     INTEGER REFERENCES vendors(vendor_id) ON DELETE RESTRICT,
        purchase_date TEXT,
        weight_kg     REAL,
        unit_cost     REAL,
        currency      TEXT NOT NULL DEFAULT 'USD',
        notes         TEXT,
        created_at    TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS batches (
        batch_id            INTEGER PRIMARY KEY,
        batch_code          TEXT NOT NULL UNIQUE,
        lot_id              INTEGER NOT NULL REFERENCES raw_leather_lots(lot_id) ON DELETE RESTRICT,
        article_id          INTEGER REFERENCES articles(article_id) ON DELETE SET NULL,
        start_date          TEXT,
        planned_finish_date TEXT,
        actual_finish_date  TEXT,
        notes               TEXT,
        created_at          TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS batch_process_runs (
        run_id          INTEGER PRIMARY KEY,
        batch_id        INTEGER NOT NULL REFERENCES batches(batch_id) ON DELETE CASCADE,
        process_id      INTEGER NOT NULL REFERENCES processes(process_id) ON DELETE RESTRICT,
        started_at      TEXT,
        ended_at        TEXT,
        operator        TEXT,
        yield_weight_kg REAL,
        notes           TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS batch_run_chemicals (
        brc_id      INTEGER PRIMARY KEY,
        run_id      INTEGER NOT NULL REFERENCES batch_process_runs(run_id) ON DELETE CASCADE,
        chemical_id INTEGER NOT NULL REFERENCES chemicals(chemical_id) ON DELETE RESTRICT,
        quantity    REAL NOT NULL,
        unit        TEXT CHECK (unit IS NULL OR unit IN ('kg', 'g', 'L', 'mL', 'pcs')),
        unit_cost   REAL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS finished_lots (
        finished_lot_id INTEGER PRIMARY KEY,
        finished_code   TEXT NOT NULL UNIQUE,
        batch_id        INTEGER NOT NULL REFERENCES batches(batch_id) ON DELETE RESTRICT,
        grade           TEXT,
        color           TEXT,
        thickness_mm    REAL,
        area_sqft       REAL,
        weight_kg       REAL,
        created_at      TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS bank_statements (
        statement_id INTEGER PRIMARY KEY,
        txn_date     TEXT NOT NULL,
        description  TEXT NOT NULL,
        amount       REAL NOT NULL,
        currency     TEXT NOT NULL DEFAULT 'USD',
        reference    TEXT,
        category     TEXT,
        imported_at  TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS bank_rules (
        rule_id  INTEGER PRIMARY KEY,
        pattern  TEXT NOT NULL UNIQUE,
        category TEXT NOT NULL,
        priority INTEGER NOT NULL DEFAULT 0
    )
    "#,
];

/// Indexes on foreign key columns
pub const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_chemicals_preferred_vendor_id ON chemicals(preferred_vendor_id)",
    "CREATE INDEX IF NOT EXISTS idx_article_process_flow_article_id ON article_process_flow(article_id)",
    "CREATE INDEX IF NOT EXISTS idx_article_process_flow_process_id ON article_process_flow(process_id)",
    "CREATE INDEX IF NOT EXISTS idx_raw_leather_lots_vendor_id ON raw_leather_lots(vendor_id)",
    "CREATE INDEX IF NOT EXISTS idx_batches_lot_id ON batches(lot_id)",
    "CREATE INDEX IF NOT EXISTS idx_batches_article_id ON batches(article_id)",
    "CREATE INDEX IF NOT EXISTS idx_batch_process_runs_batch_id ON batch_process_runs(batch_id)",
    "CREATE INDEX IF NOT EXISTS idx_batch_process_runs_process_id ON batch_process_runs(process_id)",
    "CREATE INDEX IF NOT EXISTS idx_batch_run_chemicals_run_id ON batch_run_chemicals(run_id)",
    "CREATE INDEX IF NOT EXISTS idx_batch_run_chemicals_chemical_id ON batch_run_chemicals(chemical_id)",
    "CREATE INDEX IF NOT EXISTS idx_finished_lots_batch_id ON finished_lots(batch_id)",
];

/// Cost roll-up views. Each stage reads the previous one; missing costs
/// count as zero. Results are cast to REAL so empty sums still decode as
/// floating point.
pub const VIEWS: &[&str] = &[
    r#"
    CREATE VIEW IF NOT EXISTS v_chemical_usage_cost AS
    SELECT
        brc.brc_id,
        brc.run_id,
        r.batch_id,
        brc.chemical_id,
        c.name AS chemical_name,
        brc.quantity,
        brc.unit,
        CAST(COALESCE(brc.unit_cost, c.unit_cost, 0) AS REAL) AS effective_unit_cost,
        CAST(brc.quantity * COALESCE(brc.unit_cost, c.unit_cost, 0) AS REAL) AS line_cost
    FROM batch_run_chemicals brc
    JOIN batch_process_runs r ON r.run_id = brc.run_id
    LEFT JOIN chemicals c ON c.chemical_id = brc.chemical_id
    "#,
    r#"
    CREATE VIEW IF NOT EXISTS v_run_chemical_cost AS
    SELECT
        r.run_id,
        r.batch_id,
        r.process_id,
        p.name AS process_name,
        CAST(COALESCE(SUM(u.line_cost), 0) AS REAL) AS chemical_cost
    FROM batch_process_runs r
    LEFT JOIN processes p ON p.process_id = r.process_id
    LEFT JOIN v_chemical_usage_cost u ON u.run_id = r.run_id
    GROUP BY r.run_id, r.batch_id, r.process_id, p.name
    "#,
    r#"
    CREATE VIEW IF NOT EXISTS v_batch_chemical_cost AS
    SELECT
        b.batch_id,
        CAST(COALESCE(SUM(rc.chemical_cost), 0) AS REAL) AS chemical_cost
    FROM batches b
    LEFT JOIN v_run_chemical_cost rc ON rc.batch_id = b.batch_id
    GROUP BY b.batch_id
    "#,
    r#"
    CREATE VIEW IF NOT EXISTS v_batch_total_cost AS
    SELECT
        b.batch_id,
        b.batch_code,
        l.lot_code,
        a.article_code,
        CAST(COALESCE(l.weight_kg, 0) * COALESCE(l.unit_cost, 0) AS REAL) AS raw_material_cost,
        CAST(COALESCE(bc.chemical_cost, 0) AS REAL) AS chemical_cost,
        CAST(COALESCE(l.weight_kg, 0) * COALESCE(l.unit_cost, 0)
             + COALESCE(bc.chemical_cost, 0) AS REAL) AS total_cost
    FROM batches b
    LEFT JOIN raw_leather_lots l ON l.lot_id = b.lot_id
    LEFT JOIN articles a ON a.article_id = b.article_id
    LEFT JOIN v_batch_chemical_cost bc ON bc.batch_id = b.batch_id
    "#,
];

/// Every schema statement in execution order
pub fn statements() -> impl Iterator<Item = &'static str> {
    TABLES
        .iter()
        .chain(INDEXES.iter())
        .chain(VIEWS.iter())
        .copied()
}
