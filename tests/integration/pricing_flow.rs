//! Form input → parsed strategy → simulation → benchmark, through the
//! public library API only.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use pricing_simulator::competitors;
use pricing_simulator::pricing::{
    benchmark_against_competitors, parse_tiers, PricingEngine, SimulationInput, DEFAULT_TIERS,
};
use pricing_simulator::types::{
    CompetitorRow, CostStructure, PricingError, PricingStrategy, StrategyKind,
};

const COMPETITOR_CSV: &str = "\
Competitor,Price,Notes
Acme,20.00,budget
Globex,25.00,premium
Initech,,unlisted
Hooli,22.3333333333,close
";

#[test]
fn tiered_strategy_against_uploaded_competitors() {
    let costs = CostStructure::new(dec!(4), dec!(6.5), dec!(1.5)).unwrap();
    let tiers = parse_tiers(DEFAULT_TIERS).unwrap();
    let table = competitors::from_csv_str(COMPETITOR_CSV).unwrap();
    assert_eq!(table.dropped_rows, 1);

    let sim = PricingEngine::simulate(&SimulationInput {
        costs,
        strategy: PricingStrategy::Tiered { tiers },
        competitors: table.rows.clone(),
    })
    .unwrap();

    assert_eq!(sim.strategy, StrategyKind::Tiered);
    assert_eq!(sim.result.recommended_price.round_dp(2), dec!(22.33));
    assert_eq!(sim.result.total_unit_cost, dec!(12));
    assert_eq!(
        sim.result.profit_per_unit,
        sim.result.recommended_price - dec!(12)
    );

    let bench = sim.benchmark.unwrap();
    let names: Vec<_> = bench.iter().map(|b| b.competitor.as_str()).collect();
    assert_eq!(names, ["Acme", "Globex", "Hooli"]);
    assert_eq!(bench[0].delta_vs_recommended.round_dp(2), dec!(-2.33));
    assert_eq!(bench[1].delta_vs_recommended.round_dp(2), dec!(2.67));
    assert_eq!(bench[2].delta_vs_recommended.round_dp(2), Decimal::ZERO);
}

#[test]
fn benchmark_skipped_without_price_column() {
    let table = competitors::from_csv_str("Competitor,List\nAcme,20\n").unwrap();
    let sim = PricingEngine::simulate(&SimulationInput {
        costs: CostStructure::new(dec!(1), dec!(1), dec!(1)).unwrap(),
        strategy: PricingStrategy::CostPlus { margin_pct: 30 },
        competitors: table.rows,
    })
    .unwrap();
    assert!(sim.benchmark.is_none());
    assert_eq!(sim.result.recommended_price, dec!(3.9));
}

#[test]
fn benchmark_deltas_unrounded() {
    let rows = vec![
        CompetitorRow::new("A", dec!(20.0)),
        CompetitorRow::new("B", dec!(25.0)),
    ];
    let bench = benchmark_against_competitors(dec!(22.33), &rows).unwrap();
    assert_eq!(bench[0].delta_vs_recommended, dec!(-2.33));
    assert_eq!(bench[1].delta_vs_recommended, dec!(2.67));
}

#[test]
fn every_strategy_reports_consistent_margin() {
    let costs = CostStructure::new(dec!(7), dec!(2), dec!(1)).unwrap();
    let strategies = [
        PricingStrategy::CostPlus { margin_pct: 25 },
        PricingStrategy::Tiered { tiers: parse_tiers("1,10,8\n11,20,14").unwrap() },
        PricingStrategy::ValueBased { perceived_value: dec!(40) },
    ];
    for strategy in &strategies {
        let r = PricingEngine::compute_price(&costs, strategy).unwrap();
        assert_eq!(r.total_unit_cost, dec!(10));
        assert_eq!(r.profit_per_unit, r.recommended_price - r.total_unit_cost);
        let expected = r.profit_per_unit / r.recommended_price * dec!(100);
        assert_eq!(r.margin_pct, expected, "{strategy:?}");
    }
}

#[test]
fn malformed_tier_text_is_a_parse_error() {
    let err = parse_tiers("abc,100,25").unwrap_err();
    assert!(matches!(err, PricingError::Parse { .. }));
}

#[test]
fn negative_cost_never_reaches_pricing() {
    let err = CostStructure::new(dec!(0), dec!(0), dec!(-0.01)).unwrap_err();
    assert!(matches!(err, PricingError::Validation { .. }));
}
