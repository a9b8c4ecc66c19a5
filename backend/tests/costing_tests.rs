//! Batch costing tests: the cost roll-up views and the in-memory report
//! must agree, and missing costs always count as zero.

use leather_factory_backend::config::DatabaseConfig;
use leather_factory_backend::db;
use leather_factory_backend::services::batch::{
    BatchService, CreateBatchInput, RecordFinishedLotInput, RecordRunInput, RecordUsageInput,
};
use leather_factory_backend::services::chemical::{ChemicalService, CreateChemicalInput};
use leather_factory_backend::services::lot::{CreateLotInput, LotService};
use leather_factory_backend::services::process::{CreateProcessInput, ProcessService};
use leather_factory_backend::services::CostingService;
use leather_factory_backend::AppError;
use rust_decimal::Decimal;
use shared::{BatchCost, ChemicalUnit};
use sqlx::SqlitePool;

async fn test_pool() -> SqlitePool {
    let pool = db::create_pool(&DatabaseConfig::in_memory()).await.unwrap();
    db::init_schema(&pool).await.unwrap();
    pool
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

async fn lot(pool: &SqlitePool, code: &str, weight: Option<&str>, cost: Option<&str>) -> i64 {
    LotService::new(pool.clone())
        .create_lot(CreateLotInput {
            lot_code: code.to_string(),
            vendor_id: None,
            purchase_date: None,
            weight_kg: weight.map(dec),
            unit_cost: cost.map(dec),
            currency: "USD".to_string(),
            notes: None,
        })
        .await
        .unwrap()
        .lot_id
}

async fn batch(pool: &SqlitePool, code: &str, lot_id: i64) -> i64 {
    BatchService::new(pool.clone())
        .create_batch(CreateBatchInput {
            batch_code: code.to_string(),
            lot_id,
            article_id: None,
            start_date: None,
            planned_finish_date: None,
            actual_finish_date: None,
            notes: None,
        })
        .await
        .unwrap()
        .batch_id
}

async fn process(pool: &SqlitePool, name: &str) -> i64 {
    ProcessService::new(pool.clone())
        .create_process(CreateProcessInput {
            name: name.to_string(),
            description: None,
        })
        .await
        .unwrap()
        .process_id
}

async fn run(pool: &SqlitePool, batch_id: i64, process_id: i64) -> i64 {
    BatchService::new(pool.clone())
        .record_run(
            batch_id,
            RecordRunInput {
                process_id,
                started_at: None,
                ended_at: None,
                operator: Some("Deniz".to_string()),
                yield_weight_kg: None,
                notes: None,
            },
        )
        .await
        .unwrap()
        .run_id
}

async fn chemical(pool: &SqlitePool, name: &str, cost: Option<&str>) -> i64 {
    ChemicalService::new(pool.clone())
        .create_chemical(CreateChemicalInput {
            name: name.to_string(),
            default_unit: ChemicalUnit::Kilogram,
            unit_cost: cost.map(dec),
            preferred_vendor_id: None,
        })
        .await
        .unwrap()
        .chemical_id
}

async fn usage(pool: &SqlitePool, run_id: i64, chemical_id: i64, qty: &str, cost: Option<&str>) {
    BatchService::new(pool.clone())
        .record_chemical_usage(
            run_id,
            RecordUsageInput {
                chemical_id,
                quantity: dec(qty),
                unit: Some(ChemicalUnit::Kilogram),
                unit_cost: cost.map(dec),
            },
        )
        .await
        .unwrap();
}

fn rounded(rows: Vec<BatchCost>) -> Vec<(i64, Decimal, Decimal, Decimal)> {
    rows.into_iter()
        .map(|b| {
            (
                b.batch_id,
                b.raw_material_cost.round_dp(6),
                b.chemical_cost.round_dp(6),
                b.total_cost.round_dp(6),
            )
        })
        .collect()
}

// ============================================================================
// Usage lines
// ============================================================================

#[tokio::test]
async fn test_line_falls_back_to_catalog_cost() {
    let pool = test_pool().await;
    let lot_id = lot(&pool, "L-1", Some("100"), Some("2")).await;
    let batch_id = batch(&pool, "B-1", lot_id).await;
    let run_id = run(&pool, batch_id, process(&pool, "Tanning").await).await;
    let chrome = chemical(&pool, "Chrome", Some("4.0")).await;
    usage(&pool, run_id, chrome, "2.5", None).await;

    let lines = CostingService::new(pool).usage_lines().await.unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].effective_unit_cost, dec("4"));
    assert_eq!(lines[0].line_cost, dec("10"));
    assert_eq!(lines[0].batch_id, batch_id);
    assert_eq!(lines[0].unit.as_deref(), Some("kg"));
}

#[tokio::test]
async fn test_line_override_beats_catalog_cost() {
    let pool = test_pool().await;
    let lot_id = lot(&pool, "L-1", None, None).await;
    let batch_id = batch(&pool, "B-1", lot_id).await;
    let run_id = run(&pool, batch_id, process(&pool, "Dyeing").await).await;
    let dye = chemical(&pool, "Black dye", Some("8")).await;
    usage(&pool, run_id, dye, "3", Some("1.5")).await;

    let lines = CostingService::new(pool).usage_lines().await.unwrap();
    assert_eq!(lines[0].effective_unit_cost, dec("1.5"));
    assert_eq!(lines[0].line_cost, dec("4.5"));
}

#[tokio::test]
async fn test_line_without_any_cost_is_zero() {
    let pool = test_pool().await;
    let lot_id = lot(&pool, "L-1", None, None).await;
    let batch_id = batch(&pool, "B-1", lot_id).await;
    let run_id = run(&pool, batch_id, process(&pool, "Soaking").await).await;
    let salt = chemical(&pool, "Salt", None).await;
    usage(&pool, run_id, salt, "50", None).await;

    let lines = CostingService::new(pool).usage_lines().await.unwrap();
    assert_eq!(lines[0].line_cost, Decimal::ZERO);
}

// ============================================================================
// Runs and batches
// ============================================================================

#[tokio::test]
async fn test_run_without_lines_costs_zero() {
    let pool = test_pool().await;
    let lot_id = lot(&pool, "L-1", None, None).await;
    let batch_id = batch(&pool, "B-1", lot_id).await;
    let run_id = run(&pool, batch_id, process(&pool, "Soaking").await).await;

    let runs = CostingService::new(pool).run_costs().await.unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].run_id, run_id);
    assert_eq!(runs[0].chemical_cost, Decimal::ZERO);
    assert_eq!(runs[0].process_name.as_deref(), Some("Soaking"));
}

#[tokio::test]
async fn test_batch_total_combines_raw_material_and_chemicals() {
    let pool = test_pool().await;
    let lot_id = lot(&pool, "L-1", Some("100"), Some("2.0")).await;
    let batch_id = batch(&pool, "B-1", lot_id).await;
    let tanning = process(&pool, "Tanning").await;
    let dyeing = process(&pool, "Dyeing").await;
    let chrome = chemical(&pool, "Chrome", Some("4.0")).await;

    let first = run(&pool, batch_id, tanning).await;
    let second = run(&pool, batch_id, dyeing).await;
    usage(&pool, first, chrome, "1.5", None).await;
    usage(&pool, second, chrome, "1", None).await;

    let cost = CostingService::new(pool).batch_cost(batch_id).await.unwrap();
    assert_eq!(cost.raw_material_cost, dec("200"));
    assert_eq!(cost.chemical_cost, dec("10"));
    assert_eq!(cost.total_cost, dec("210"));
    assert_eq!(cost.lot_code.as_deref(), Some("L-1"));
}

#[tokio::test]
async fn test_batch_without_runs_has_zero_chemical_cost() {
    let pool = test_pool().await;
    let lot_id = lot(&pool, "L-1", Some("10"), Some("3")).await;
    let batch_id = batch(&pool, "B-1", lot_id).await;

    let cost = CostingService::new(pool).batch_cost(batch_id).await.unwrap();
    assert_eq!(cost.chemical_cost, Decimal::ZERO);
    assert_eq!(cost.total_cost, dec("30"));
}

#[tokio::test]
async fn test_lot_missing_weight_or_cost_counts_zero() {
    let pool = test_pool().await;
    let no_weight = lot(&pool, "L-1", None, Some("3")).await;
    let no_cost = lot(&pool, "L-2", Some("10"), None).await;
    batch(&pool, "B-1", no_weight).await;
    batch(&pool, "B-2", no_cost).await;

    let costs = CostingService::new(pool).batch_costs().await.unwrap();
    assert_eq!(costs.len(), 2);
    assert!(costs.iter().all(|c| c.total_cost == Decimal::ZERO));
}

#[tokio::test]
async fn test_unknown_batch_cost_is_not_found() {
    let err = CostingService::new(test_pool().await)
        .batch_cost(42)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_views_agree_with_in_memory_report() {
    let pool = test_pool().await;
    let tanning = process(&pool, "Tanning").await;
    let dyeing = process(&pool, "Dyeing").await;
    let chrome = chemical(&pool, "Chrome", Some("4.25")).await;
    let dye = chemical(&pool, "Dye", None).await;

    let a = batch(&pool, "B-A", lot(&pool, "L-A", Some("120.5"), Some("1.75")).await).await;
    let b = batch(&pool, "B-B", lot(&pool, "L-B", None, Some("9")).await).await;
    batch(&pool, "B-C", lot(&pool, "L-C", Some("40"), Some("2")).await).await;

    let ra = run(&pool, a, tanning).await;
    usage(&pool, ra, chrome, "3.5", None).await;
    usage(&pool, ra, dye, "2", Some("6.5")).await;
    let rb = run(&pool, b, dyeing).await;
    usage(&pool, rb, dye, "7", None).await;
    run(&pool, b, tanning).await;

    let service = CostingService::new(pool);
    let from_views = rounded(service.batch_costs().await.unwrap());
    let in_memory = rounded(service.batch_costs_in_memory().await.unwrap());
    assert_eq!(from_views, in_memory);
    assert_eq!(from_views.len(), 3);
}

#[tokio::test]
async fn test_cost_beyond_decimal_range_is_an_error() {
    let pool = test_pool().await;
    let lot_id = lot(&pool, "L-BIG", Some("1000000000000000"), Some("1000000000000000")).await;
    batch(&pool, "B-BIG", lot_id).await;
    let service = CostingService::new(pool);

    // 1e30 fits a REAL but not a Decimal: never reported as zero
    let err = service.batch_costs().await.unwrap_err();
    assert!(matches!(err, AppError::Internal(_)), "got {err:?}");

    let err = service.batch_costs_in_memory().await.unwrap_err();
    assert!(matches!(err, AppError::CostOverflow(_)), "got {err:?}");
}

// ============================================================================
// Referential integrity in production records
// ============================================================================

#[tokio::test]
async fn test_batch_requires_existing_lot() {
    let pool = test_pool().await;
    let err = BatchService::new(pool)
        .create_batch(CreateBatchInput {
            batch_code: "B-404".to_string(),
            lot_id: 404,
            article_id: None,
            start_date: None,
            planned_finish_date: None,
            actual_finish_date: None,
            notes: None,
        })
        .await
        .unwrap_err();
    assert!(err.is_conflict());
}

#[tokio::test]
async fn test_runs_of_missing_batch_are_not_found() {
    let err = BatchService::new(test_pool().await)
        .list_runs(7)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_finished_lots_filter_by_batch() {
    let pool = test_pool().await;
    let lot_id = lot(&pool, "L-1", None, None).await;
    let first = batch(&pool, "B-1", lot_id).await;
    let second = batch(&pool, "B-2", lot_id).await;
    let service = BatchService::new(pool);

    for (code, batch_id) in [("F-1", first), ("F-2", first), ("F-3", second)] {
        service
            .record_finished_lot(RecordFinishedLotInput {
                finished_code: code.to_string(),
                batch_id,
                grade: Some("A".to_string()),
                color: None,
                thickness_mm: Some(dec("1.2")),
                area_sqft: None,
                weight_kg: None,
            })
            .await
            .unwrap();
    }

    assert_eq!(service.list_finished_lots(None).await.unwrap().len(), 3);
    assert_eq!(service.list_finished_lots(Some(first)).await.unwrap().len(), 2);
}

// ============================================================================
// CSV export
// ============================================================================

#[tokio::test]
async fn test_batch_report_exports_to_csv() {
    let pool = test_pool().await;
    let lot_id = lot(&pool, "L-1", Some("100"), Some("2")).await;
    batch(&pool, "B-1", lot_id).await;

    let rows = CostingService::new(pool).batch_costs().await.unwrap();
    let csv = CostingService::export_to_csv(&rows).unwrap();

    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("batch_id,batch_code,lot_code,article_code,raw_material_cost,chemical_cost,total_cost")
    );
    let row = lines.next().unwrap();
    assert!(row.starts_with("1,B-1,L-1,,"));
}
