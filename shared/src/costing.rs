//! Batch cost aggregation
//!
//! Costs roll up in four stages:
//! 1. usage line: `quantity × effective unit cost`
//! 2. process run: sum of its usage lines
//! 3. batch chemicals: sum of its runs
//! 4. batch total: `lot weight × lot unit cost` + batch chemicals
//!
//! Missing figures count as zero at every stage, so a batch with incomplete
//! data entry still yields a numeric estimate. The same policy is expressed
//! by the database views created by the backend schema loader; this module
//! computes it over in-memory records.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Treat a missing figure as zero
pub fn or_zero(value: Option<Decimal>) -> Decimal {
    value.unwrap_or(Decimal::ZERO)
}

/// Resolve the unit cost used for a usage line: the line's own override,
/// else the chemical's catalog cost, else zero.
pub fn effective_unit_cost(override_cost: Option<Decimal>, catalog_cost: Option<Decimal>) -> Decimal {
    or_zero(override_cost.or(catalog_cost))
}

/// A roll-up figure left the range of `Decimal`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cost overflow in {stage}")]
pub struct CostOverflow {
    pub stage: &'static str,
}

pub type CostResult<T> = Result<T, CostOverflow>;

fn mul(a: Decimal, b: Decimal, stage: &'static str) -> CostResult<Decimal> {
    a.checked_mul(b).ok_or(CostOverflow { stage })
}

fn add(a: Decimal, b: Decimal, stage: &'static str) -> CostResult<Decimal> {
    a.checked_add(b).ok_or(CostOverflow { stage })
}

/// Cost of one usage line
pub fn line_cost(
    quantity: Decimal,
    override_cost: Option<Decimal>,
    catalog_cost: Option<Decimal>,
) -> CostResult<Decimal> {
    mul(quantity, effective_unit_cost(override_cost, catalog_cost), "usage line")
}

/// Purchase cost of the raw hide a batch was cut from
pub fn raw_material_cost(
    weight_kg: Option<Decimal>,
    unit_cost: Option<Decimal>,
) -> CostResult<Decimal> {
    mul(or_zero(weight_kg), or_zero(unit_cost), "raw material")
}

/// A chemical usage record as needed for costing
#[derive(Debug, Clone, PartialEq)]
pub struct UsageLineInput {
    pub brc_id: i64,
    pub run_id: i64,
    pub chemical_id: i64,
    pub quantity: Decimal,
    pub unit_cost: Option<Decimal>,
}

/// A process run as needed for costing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunInput {
    pub run_id: i64,
    pub batch_id: i64,
}

/// A batch joined with its source lot
#[derive(Debug, Clone, PartialEq)]
pub struct BatchInput {
    pub batch_id: i64,
    pub batch_code: String,
    pub lot_code: Option<String>,
    pub article_code: Option<String>,
    pub lot_weight_kg: Option<Decimal>,
    pub lot_unit_cost: Option<Decimal>,
}

/// Per-line cost row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageLineCost {
    pub brc_id: i64,
    pub run_id: i64,
    pub batch_id: i64,
    pub chemical_id: i64,
    pub chemical_name: Option<String>,
    pub quantity: Decimal,
    pub unit: Option<String>,
    pub effective_unit_cost: Decimal,
    pub line_cost: Decimal,
}

/// Per-run chemical cost row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunCost {
    pub run_id: i64,
    pub batch_id: i64,
    pub process_id: i64,
    pub process_name: Option<String>,
    pub chemical_cost: Decimal,
}

/// Costing report row for one batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchCost {
    pub batch_id: i64,
    pub batch_code: String,
    pub lot_code: Option<String>,
    pub article_code: Option<String>,
    pub raw_material_cost: Decimal,
    pub chemical_cost: Decimal,
    pub total_cost: Decimal,
}

/// Snapshot of every record that feeds the batch costing report
#[derive(Debug, Clone, Default)]
pub struct CostLedger {
    /// Catalog unit cost keyed by chemical id
    pub chemical_costs: HashMap<i64, Option<Decimal>>,
    pub batches: Vec<BatchInput>,
    pub runs: Vec<RunInput>,
    pub lines: Vec<UsageLineInput>,
}

impl CostLedger {
    /// Cost of a single usage line, resolving the catalog cost from the ledger
    pub fn cost_of(&self, line: &UsageLineInput) -> CostResult<Decimal> {
        let catalog = self.chemical_costs.get(&line.chemical_id).copied().flatten();
        line_cost(line.quantity, line.unit_cost, catalog)
    }

    /// Chemical cost of every run; runs without usage lines cost zero
    pub fn run_costs(&self) -> CostResult<BTreeMap<i64, Decimal>> {
        let mut costs: BTreeMap<i64, Decimal> =
            self.runs.iter().map(|r| (r.run_id, Decimal::ZERO)).collect();

        for line in &self.lines {
            if let Some(total) = costs.get_mut(&line.run_id) {
                *total = add(*total, self.cost_of(line)?, "run")?;
            }
        }

        Ok(costs)
    }

    /// Chemical cost of every batch; batches without runs cost zero
    pub fn batch_chemical_costs(&self) -> CostResult<BTreeMap<i64, Decimal>> {
        let run_costs = self.run_costs()?;
        let mut costs: BTreeMap<i64, Decimal> = self
            .batches
            .iter()
            .map(|b| (b.batch_id, Decimal::ZERO))
            .collect();

        for run in &self.runs {
            if let (Some(total), Some(run_cost)) =
                (costs.get_mut(&run.batch_id), run_costs.get(&run.run_id))
            {
                *total = add(*total, *run_cost, "batch chemicals")?;
            }
        }

        Ok(costs)
    }

    /// Full costing report, ordered by batch id
    pub fn batch_costs(&self) -> CostResult<Vec<BatchCost>> {
        let chemical = self.batch_chemical_costs()?;

        let mut report = self
            .batches
            .iter()
            .map(|b| -> CostResult<BatchCost> {
                let raw_material_cost = raw_material_cost(b.lot_weight_kg, b.lot_unit_cost)?;
                let chemical_cost = chemical.get(&b.batch_id).copied().unwrap_or_default();
                Ok(BatchCost {
                    batch_id: b.batch_id,
                    batch_code: b.batch_code.clone(),
                    lot_code: b.lot_code.clone(),
                    article_code: b.article_code.clone(),
                    raw_material_cost,
                    chemical_cost,
                    total_cost: add(raw_material_cost, chemical_cost, "batch total")?,
                })
            })
            .collect::<CostResult<Vec<_>>>()?;

        report.sort_by_key(|r| r.batch_id);
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn batch(batch_id: i64, weight: Option<&str>, cost: Option<&str>) -> BatchInput {
        BatchInput {
            batch_id,
            batch_code: format!("B-{batch_id}"),
            lot_code: Some(format!("LOT-{batch_id}")),
            article_code: None,
            lot_weight_kg: weight.map(dec),
            lot_unit_cost: cost.map(dec),
        }
    }

    fn line(brc_id: i64, run_id: i64, chemical_id: i64, qty: &str, cost: Option<&str>) -> UsageLineInput {
        UsageLineInput {
            brc_id,
            run_id,
            chemical_id,
            quantity: dec(qty),
            unit_cost: cost.map(dec),
        }
    }

    #[test]
    fn test_effective_unit_cost_prefers_override() {
        assert_eq!(effective_unit_cost(Some(dec("3.5")), Some(dec("4.0"))), dec("3.5"));
    }

    #[test]
    fn test_effective_unit_cost_falls_back_to_catalog() {
        assert_eq!(effective_unit_cost(None, Some(dec("4.0"))), dec("4.0"));
    }

    #[test]
    fn test_effective_unit_cost_defaults_to_zero() {
        assert_eq!(effective_unit_cost(None, None), Decimal::ZERO);
    }

    #[test]
    fn test_override_of_zero_is_kept() {
        assert_eq!(effective_unit_cost(Some(Decimal::ZERO), Some(dec("9"))), Decimal::ZERO);
    }

    #[test]
    fn test_line_cost_uses_catalog_when_no_override() {
        assert_eq!(line_cost(dec("2.5"), None, Some(dec("4.0"))).unwrap(), dec("10.0"));
    }

    #[test]
    fn test_raw_material_cost_null_weight_or_cost_is_zero() {
        assert_eq!(raw_material_cost(None, Some(dec("2"))).unwrap(), Decimal::ZERO);
        assert_eq!(raw_material_cost(Some(dec("100")), None).unwrap(), Decimal::ZERO);
        assert_eq!(raw_material_cost(Some(dec("100")), Some(dec("2.0"))).unwrap(), dec("200"));
    }

    #[test]
    fn test_run_without_lines_costs_zero() {
        let ledger = CostLedger {
            runs: vec![RunInput { run_id: 1, batch_id: 1 }],
            ..Default::default()
        };
        assert_eq!(ledger.run_costs().unwrap().get(&1), Some(&Decimal::ZERO));
    }

    #[test]
    fn test_batch_without_runs_costs_zero_chemicals() {
        let ledger = CostLedger {
            batches: vec![batch(1, Some("50"), Some("3"))],
            ..Default::default()
        };
        let report = ledger.batch_costs().unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].chemical_cost, Decimal::ZERO);
        assert_eq!(report[0].total_cost, dec("150"));
    }

    #[test]
    fn test_total_batch_cost_example() {
        // 100 kg at 2.0 plus 2.5 units of a chemical at catalog cost 4.0
        let ledger = CostLedger {
            chemical_costs: HashMap::from([(1, Some(dec("4.0")))]),
            batches: vec![batch(1, Some("100"), Some("2.0"))],
            runs: vec![RunInput { run_id: 10, batch_id: 1 }],
            lines: vec![line(100, 10, 1, "2.5", None)],
        };

        let report = ledger.batch_costs().unwrap();
        assert_eq!(report[0].raw_material_cost, dec("200"));
        assert_eq!(report[0].chemical_cost, dec("10"));
        assert_eq!(report[0].total_cost, dec("210.0"));
    }

    #[test]
    fn test_costs_roll_up_across_runs_and_batches() {
        let ledger = CostLedger {
            chemical_costs: HashMap::from([(1, Some(dec("4"))), (2, None)]),
            batches: vec![batch(1, None, None), batch(2, Some("10"), Some("1"))],
            runs: vec![
                RunInput { run_id: 10, batch_id: 1 },
                RunInput { run_id: 11, batch_id: 1 },
                RunInput { run_id: 20, batch_id: 2 },
            ],
            lines: vec![
                line(1, 10, 1, "1", None),         // 4
                line(2, 10, 2, "3", Some("2")),    // 6
                line(3, 11, 2, "5", None),         // 0
                line(4, 20, 1, "0.5", Some("10")), // 5
            ],
        };

        let runs = ledger.run_costs().unwrap();
        assert_eq!(runs[&10], dec("10"));
        assert_eq!(runs[&11], Decimal::ZERO);
        assert_eq!(runs[&20], dec("5"));

        let report = ledger.batch_costs().unwrap();
        assert_eq!(report[0].batch_id, 1);
        assert_eq!(report[0].chemical_cost, dec("10"));
        assert_eq!(report[0].total_cost, dec("10"));
        assert_eq!(report[1].chemical_cost, dec("5"));
        assert_eq!(report[1].total_cost, dec("15"));
    }

    #[test]
    fn test_lines_for_unknown_runs_are_ignored() {
        let ledger = CostLedger {
            chemical_costs: HashMap::from([(1, Some(dec("4")))]),
            batches: vec![batch(1, None, None)],
            runs: vec![],
            lines: vec![line(1, 99, 1, "1", None)],
        };
        assert!(ledger.run_costs().unwrap().is_empty());
        assert_eq!(ledger.batch_costs().unwrap()[0].total_cost, Decimal::ZERO);
    }

    #[test]
    fn test_raw_material_overflow_is_reported() {
        let huge = Some(dec("1000000000000000"));
        let err = raw_material_cost(huge, huge).unwrap_err();
        assert_eq!(err.stage, "raw material");
    }

    #[test]
    fn test_roll_up_overflow_is_reported_not_panicking() {
        // each line fits, their sum does not
        let ledger = CostLedger {
            chemical_costs: HashMap::from([(1, Some(Decimal::MAX))]),
            batches: vec![batch(1, None, None)],
            runs: vec![RunInput { run_id: 1, batch_id: 1 }],
            lines: vec![line(1, 1, 1, "1", None), line(2, 1, 1, "1", None)],
        };
        assert_eq!(ledger.run_costs().unwrap_err().stage, "run");
        assert!(ledger.batch_costs().is_err());
    }

    #[test]
    fn test_report_is_ordered_by_batch_id() {
        let ledger = CostLedger {
            batches: vec![batch(3, None, None), batch(1, None, None), batch(2, None, None)],
            ..Default::default()
        };
        let ids: Vec<i64> = ledger.batch_costs().unwrap().iter().map(|b| b.batch_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn amount() -> impl Strategy<Value = Decimal> {
            (0i64..=50_000i64).prop_map(|n| Decimal::new(n, 2))
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(100))]

            #[test]
            fn prop_run_cost_is_sum_of_lines(
                lines in prop::collection::vec((amount(), prop::option::of(amount())), 0..8),
                catalog in prop::option::of(amount())
            ) {
                let ledger = CostLedger {
                    chemical_costs: HashMap::from([(1, catalog)]),
                    runs: vec![RunInput { run_id: 1, batch_id: 1 }],
                    lines: lines
                        .iter()
                        .enumerate()
                        .map(|(i, (qty, cost))| UsageLineInput {
                            brc_id: i as i64,
                            run_id: 1,
                            chemical_id: 1,
                            quantity: *qty,
                            unit_cost: *cost,
                        })
                        .collect(),
                    ..Default::default()
                };

                let expected: Decimal = lines
                    .iter()
                    .map(|(qty, cost)| line_cost(*qty, *cost, catalog).unwrap())
                    .sum();
                prop_assert_eq!(ledger.run_costs().unwrap()[&1], expected);
            }
        }
    }
}
