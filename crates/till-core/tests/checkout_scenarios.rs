//! End-to-end basket scenarios and pricing properties.

use std::sync::Arc;

use proptest::prelude::*;
use rstest::{fixture, rstest};
use till_core::{
    Catalog, Checkout, CheckoutError, Money, PricingRule, QuantityRounding, RawRule, RuleSet,
    ScanOutcome,
};

// =============================================================================
// Fixtures
// =============================================================================

/// Tea buy-one-get-one-free, strawberries 10% off from 3, coffee 33.33% off from 3.
fn standard_rules(catalog: &Catalog) -> RuleSet {
    RuleSet::from_rules(
        catalog,
        vec![
            PricingRule::buy_x_get_y_free(["GR1"], 1, 1).unwrap(),
            PricingRule::threshold_percent(["SR1"], 3, 10.0).unwrap(),
            PricingRule::threshold_percent(["CF1"], 3, 33.33).unwrap(),
        ],
    )
    .unwrap()
}

#[fixture]
fn checkout() -> Checkout {
    let catalog = Catalog::standard();
    let rules = standard_rules(&catalog);
    Checkout::new(catalog, rules)
}

fn scan_all(co: &mut Checkout, codes: &[&str]) {
    for code in codes {
        co.scan(code).unwrap();
    }
}

// =============================================================================
// Scenarios
// =============================================================================

#[rstest]
#[case(&["GR1", "SR1", "GR1", "GR1", "CF1"], "£22.45")]
#[case(&["GR1", "GR1"], "£3.11")]
#[case(&["SR1", "SR1", "GR1", "SR1"], "£16.61")]
#[case(&["GR1", "CF1", "SR1", "CF1", "CF1"], "£30.57")]
fn test_standard_baskets(mut checkout: Checkout, #[case] codes: &[&str], #[case] expected: &str) {
    scan_all(&mut checkout, codes);
    assert_eq!(checkout.formatted_total(), expected);
}

/// The same baskets priced from configuration, with tea as a 50% bulk
/// discount that bills pairs.
#[rstest]
#[case(&["GR1", "SR1", "GR1", "GR1", "CF1"], "£22.45")]
#[case(&["GR1", "GR1"], "£3.11")]
#[case(&["SR1", "SR1", "GR1", "SR1"], "£16.61")]
#[case(&["GR1", "CF1", "SR1", "CF1", "CF1"], "£30.57")]
fn test_standard_baskets_from_config(#[case] codes: &[&str], #[case] expected: &str) {
    let rules: Vec<RawRule> = serde_json::from_str(
        r#"[
            {"strategy": "bulk_discount", "min_quantity": 1, "discount": 50,
             "quantity_rounding": "up_to_even", "codes": ["GR1"]},
            {"min_quantity": 3, "discount": 10, "codes": ["SR1"]},
            {"min_quantity": 3, "discount": 33.33, "codes": ["CF1"]}
        ]"#,
    )
    .unwrap();

    let mut co = Checkout::from_raw(Catalog::standard(), &rules).unwrap();
    scan_all(&mut co, codes);

    assert_eq!(co.formatted_total(), expected);
}

#[test]
fn test_plain_half_price_tea_does_not_bill_unscanned_units() {
    let catalog = Catalog::standard();
    let rules = RuleSet::from_rules(
        &catalog,
        vec![PricingRule::bulk_discount(["GR1"], 1, 50.0, QuantityRounding::None).unwrap()],
    )
    .unwrap();
    let mut co = Checkout::new(catalog, rules);

    scan_all(&mut co, &["GR1", "GR1", "GR1"]);

    // 3 × £3.11 × 50% = £4.665
    assert_eq!(co.formatted_total(), "£4.67");
}

#[rstest]
#[case(2, 1000)]
#[case(3, 1350)]
fn test_threshold_discount_at_boundary(#[case] quantity: usize, #[case] expected_cents: i64) {
    let catalog = Catalog::standard();
    let rules = RuleSet::from_rules(
        &catalog,
        vec![PricingRule::threshold_percent(["SR1"], 3, 10.0).unwrap()],
    )
    .unwrap();
    let mut co = Checkout::new(catalog, rules);

    scan_all(&mut co, &vec!["SR1"; quantity]);

    assert_eq!(co.total(), Money::from_cents(expected_cents));
}

#[rstest]
fn test_unknown_code_leaves_basket_untouched(mut checkout: Checkout) {
    scan_all(&mut checkout, &["GR1", "CF1"]);
    let before = checkout.lines();

    let outcome = checkout.scan("GX").unwrap();

    assert_eq!(
        outcome,
        ScanOutcome::OutOfStock {
            code: "GX".to_string()
        }
    );
    assert_eq!(checkout.lines(), before);
}

#[rstest]
#[case(Catalog::standard(), RuleSet::empty())]
#[case(Catalog::new(Vec::new()).unwrap(), RuleSet::empty())]
fn test_empty_code_is_always_invalid(#[case] catalog: Catalog, #[case] rules: RuleSet) {
    let mut co = Checkout::new(catalog, rules);
    assert!(matches!(co.scan(""), Err(CheckoutError::InvalidInput(_))));
}

#[rstest]
fn test_empty_code_is_invalid_with_rules(mut checkout: Checkout) {
    assert!(matches!(checkout.scan(""), Err(CheckoutError::InvalidInput(_))));
}

// =============================================================================
// Properties
// =============================================================================

const CODES: [&str; 3] = ["GR1", "SR1", "CF1"];

fn basket(quantities: [u8; 3], rules: RuleSet, catalog: Arc<Catalog>) -> Checkout {
    let mut co = Checkout::new(catalog, rules);
    for (code, quantity) in CODES.iter().zip(quantities) {
        for _ in 0..quantity {
            co.scan(code).unwrap();
        }
    }
    co
}

fn quantity_rounding() -> impl Strategy<Value = QuantityRounding> {
    prop_oneof![Just(QuantityRounding::None), Just(QuantityRounding::UpToEven)]
}

/// Any rule for `code`. With `monotonic`, percentage rules keep
/// `percent ≤ 100 / min_quantity` so adding a unit never lowers a line.
fn rule_for(code: &'static str, monotonic: bool) -> impl Strategy<Value = Option<PricingRule>> {
    let max_bps = move |min: u32| if monotonic { 10_000 / min } else { 10_000 };
    prop_oneof![
        Just(None),
        (1u32..6).prop_flat_map(move |min| {
            (0u32..=max_bps(min)).prop_map(move |bps| {
                Some(PricingRule::threshold_percent([code], min, bps as f64 / 100.0).unwrap())
            })
        }),
        (1u32..6, 1u32..6).prop_map(move |(paid, free)| {
            Some(PricingRule::buy_x_get_y_free([code], paid, free).unwrap())
        }),
        (1u32..6, quantity_rounding()).prop_flat_map(move |(min, rounding)| {
            (0u32..=max_bps(min)).prop_map(move |bps| {
                Some(
                    PricingRule::bulk_discount([code], min, bps as f64 / 100.0, rounding)
                        .unwrap(),
                )
            })
        }),
    ]
}

fn rule_sets(monotonic: bool) -> impl Strategy<Value = Vec<PricingRule>> {
    (
        rule_for("GR1", monotonic),
        rule_for("SR1", monotonic),
        rule_for("CF1", monotonic),
    )
        .prop_map(|(a, b, c)| [a, b, c].into_iter().flatten().collect())
}

proptest! {
    #[test]
    fn prop_total_never_decreases_when_adding_an_item(
        quantities in prop::array::uniform3(0u8..12),
        line in 0usize..3,
        rules in rule_sets(true),
    ) {
        let catalog = Arc::new(Catalog::standard());
        let rule_set = RuleSet::from_rules(&catalog, rules).unwrap();

        let before = basket(quantities, rule_set.clone(), Arc::clone(&catalog)).total();
        let mut after = basket(quantities, rule_set, catalog);
        after.scan(CODES[line]).unwrap();

        prop_assert!(after.total() >= before);
    }

    #[test]
    fn prop_total_is_idempotent(quantities in prop::array::uniform3(0u8..20)) {
        let catalog = Arc::new(Catalog::standard());
        let co = basket(quantities, standard_rules(&catalog), catalog);

        prop_assert_eq!(co.total(), co.total());
        prop_assert_eq!(co.formatted_total(), co.formatted_total());
    }

    #[test]
    fn prop_no_rules_means_full_price(quantities in prop::array::uniform3(0u8..50)) {
        let catalog = Arc::new(Catalog::standard());
        let co = basket(quantities, RuleSet::empty(), Arc::clone(&catalog));

        let expected: i64 = catalog
            .products()
            .zip(quantities)
            .map(|(product, quantity)| product.unit_price().cents() * quantity as i64)
            .sum();

        prop_assert_eq!(co.total().cents(), expected);
    }

    #[test]
    fn prop_line_totals_never_exceed_full_price(
        quantities in prop::array::uniform3(0u8..20),
        rules in rule_sets(false),
    ) {
        let catalog = Arc::new(Catalog::standard());
        let co = basket(quantities, RuleSet::from_rules(&catalog, rules).unwrap(), catalog);

        for line in co.lines() {
            prop_assert!(line.line_total <= line.full_price());
            prop_assert!(line.line_total >= Money::zero());
        }
        prop_assert!(co.receipt().savings >= Money::zero());
    }
}
