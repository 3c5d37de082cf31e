//! Property tests for detection invariants.
//!
//! 1. Probabilistic OR stays in [0, 1] and never decreases when an input rises
//! 2. Round trips that lose money are never flagged
//! 3. Output covers every tick between the first and last trade, for every combiner

use arbsim_core::{Action, AgentId, TradeRecord};
use arbsim_detect::{
    CombinerKind, DetectionConfig, DetectionEngine, FieldSet, ProbabilisticOr, RuleKind,
    RuleParams,
};
use proptest::prelude::*;

fn arb_trade() -> impl Strategy<Value = TradeRecord> {
    (1u64..60, 0u32..6, any::<bool>(), 1u64..20, 1.0..200.0_f64, 0.0..5000.0_f64).prop_map(
        |(tick, agent, buy, units, price, cash)| {
            let action = if buy { Action::Buy } else { Action::Sell };
            let mut t = TradeRecord::bare(tick, AgentId(agent), action, units, price);
            t.cash_before = cash;
            t.cash_after = cash - action.sign() * units as f64 * price;
            t.spread = price * 0.01;
            t.mid = price;
            t.holdings_before = units;
            t
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn probabilistic_or_bounded_and_monotone(
        probs in prop::collection::vec(0.0..=1.0_f64, 0..8),
        pick in any::<prop::sample::Index>(),
        bump in 0.0..=1.0_f64,
    ) {
        let base = ProbabilisticOr::combine_probabilities(probs.iter().copied());
        prop_assert!((0.0..=1.0).contains(&base));

        if !probs.is_empty() {
            let mut raised = probs.clone();
            let i = pick.index(raised.len());
            raised[i] = (raised[i] + bump).min(1.0);
            let after = ProbabilisticOr::combine_probabilities(raised.iter().copied());
            prop_assert!((0.0..=1.0).contains(&after));
            prop_assert!(after >= base - 1e-12);
        }
    }

    #[test]
    fn losing_round_trips_never_flagged(
        legs in prop::collection::vec((1u64..20, 1.0..100.0_f64, 0.01..1.0_f64), 1..10),
    ) {
        let mut trades = Vec::new();
        let mut tick = 1;
        let mut cash = 10_000.0;
        for (units, price, loss) in legs {
            let cost = units as f64 * price;
            let mut buy = TradeRecord::bare(tick, AgentId(0), Action::Buy, units, price);
            buy.cash_before = cash;
            buy.cash_after = cash - cost;
            cash -= cost;
            let proceeds = cost * (1.0 - loss);
            let mut sell = TradeRecord::bare(tick + 1, AgentId(0), Action::Sell, units, price);
            sell.cash_before = cash;
            sell.cash_after = cash + proceeds;
            cash += proceeds;
            trades.push(buy);
            trades.push(sell);
            tick += 2;
        }
        let params = RuleParams { profit_threshold: 0.0, time_window: 100, ..RuleParams::default() };
        let engine = DetectionEngine::new(
            vec![RuleKind::RoundTripProfit],
            params,
            FieldSet::observable(),
            Box::new(ProbabilisticOr),
        ).unwrap();
        prop_assert!(engine.score(&trades).unwrap().is_empty());
    }

    #[test]
    fn output_is_gapless(trades in prop::collection::vec(arb_trade(), 1..40)) {
        let lo = trades.iter().map(|t| t.tick).min().unwrap();
        let hi = trades.iter().map(|t| t.tick).max().unwrap();
        for kind in [
            CombinerKind::ProbabilisticOr,
            CombinerKind::WeightedLogistic,
            CombinerKind::WeightedAverage,
        ] {
            let config = DetectionConfig { combiner: kind, ..DetectionConfig::default() };
            let engine = DetectionEngine::from_config(&config).unwrap();
            let table = engine.detect(&trades).unwrap();
            let ticks: Vec<u64> = table.ticks().collect();
            prop_assert_eq!(ticks, (lo..=hi).collect::<Vec<_>>());
            for (_, row) in table.rows() {
                prop_assert!(row.iter().all(|p| (0.0..=1.0).contains(p)));
            }
        }
    }
}
