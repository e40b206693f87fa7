use exclude_core::{
    resolve_with_lookup, Cart, CartLine, CandidateGateways, CategoryId, ExclusionLookup,
    ExclusionSet, GatewayDescriptor, ProductId, RuleSnapshot,
};
use proptest::prelude::*;
use proptest::sample::subsequence;

const METHODS: [&str; 5] = ["bacs", "cod", "cheque", "paypal", "stripe"];

fn method_set() -> impl Strategy<Value = ExclusionSet> {
    subsequence(METHODS.to_vec(), 0..=METHODS.len())
        .prop_map(|m| m.into_iter().collect::<ExclusionSet>())
}

// p0..p3 and c0..c2 have rules; p4, p5 and c3 were never configured
fn rules() -> impl Strategy<Value = RuleSnapshot> {
    (
        proptest::collection::vec(method_set(), 4),
        proptest::collection::vec(method_set(), 3),
    )
        .prop_map(|(products, categories)| {
            let mut snapshot = RuleSnapshot::new();
            for (i, methods) in products.into_iter().enumerate() {
                snapshot.insert_product(ProductId::new(format!("p{i}")), methods);
            }
            for (i, methods) in categories.into_iter().enumerate() {
                snapshot.insert_category(CategoryId::new(format!("c{i}")), methods);
            }
            snapshot
        })
}

fn cart_line() -> impl Strategy<Value = CartLine> {
    (0..6usize, subsequence(vec!["c0", "c1", "c2", "c3"], 0..=4))
        .prop_map(|(p, categories)| CartLine::new(format!("p{p}")).with_categories(categories))
}

fn cart() -> impl Strategy<Value = Cart> {
    proptest::collection::vec(cart_line(), 0..6).prop_map(Cart::from_iter)
}

// "klarna" is never excluded by any rule
fn candidates() -> impl Strategy<Value = CandidateGateways> {
    subsequence(
        vec!["bacs", "cod", "cheque", "paypal", "stripe", "klarna"],
        0..=6,
    )
    .prop_map(|ids| {
        ids.into_iter()
            .map(|id| (id, GatewayDescriptor::new(id.to_uppercase())))
            .collect::<CandidateGateways>()
    })
}

fn union_for(cart: &Cart, rules: &RuleSnapshot) -> ExclusionSet {
    let mut excluded = ExclusionSet::new();
    for line in &cart.lines {
        excluded.merge(&rules.product_exclusions(&line.product).unwrap());
        for category in &line.categories {
            excluded.merge(&rules.category_exclusions(category).unwrap());
        }
    }
    excluded
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn test_result_is_candidates_minus_exclusions(
        rules in rules(),
        cart in cart(),
        candidates in candidates(),
    ) {
        let resolved = resolve_with_lookup(&cart, &rules, &candidates).unwrap();
        let excluded = union_for(&cart, &rules);

        for (id, descriptor) in resolved.iter() {
            prop_assert_eq!(candidates.get(id), Some(descriptor));
            prop_assert!(!excluded.contains(id));
        }
        for id in candidates.ids() {
            prop_assert_eq!(resolved.contains(id), !excluded.contains(id));
        }

        let order: Vec<_> = candidates.ids().filter(|id| resolved.contains(id)).collect();
        prop_assert_eq!(resolved.ids().collect::<Vec<_>>(), order);
    }

    #[test]
    fn test_line_order_does_not_matter(
        rules in rules(),
        cart in cart(),
        candidates in candidates(),
        shift in any::<usize>(),
    ) {
        let expected = resolve_with_lookup(&cart, &rules, &candidates).unwrap();

        let mut reversed = cart.clone();
        reversed.lines.reverse();
        prop_assert_eq!(&resolve_with_lookup(&reversed, &rules, &candidates).unwrap(), &expected);

        let mut rotated = cart.clone();
        if !rotated.is_empty() {
            let len = rotated.len();
            rotated.lines.rotate_left(shift % len);
        }
        prop_assert_eq!(&resolve_with_lookup(&rotated, &rules, &candidates).unwrap(), &expected);
    }

    #[test]
    fn test_duplicate_lines_do_not_matter(
        rules in rules(),
        cart in cart(),
        candidates in candidates(),
        pick in any::<usize>(),
    ) {
        prop_assume!(!cart.is_empty());
        let expected = resolve_with_lookup(&cart, &rules, &candidates).unwrap();

        let mut duplicated = cart.clone();
        let line = duplicated.lines[pick % duplicated.len()].clone();
        duplicated.add_line(line);

        prop_assert_eq!(resolve_with_lookup(&duplicated, &rules, &candidates).unwrap(), expected);
    }

    #[test]
    fn test_empty_cart_returns_candidates(rules in rules(), candidates in candidates()) {
        let resolved = resolve_with_lookup(&Cart::new(), &rules, &candidates).unwrap();
        prop_assert_eq!(resolved, candidates);
    }

    #[test]
    fn test_no_candidates_resolves_to_none(rules in rules(), cart in cart()) {
        let resolved = resolve_with_lookup(&cart, &rules, &CandidateGateways::new()).unwrap();
        prop_assert!(resolved.is_empty());
    }

    #[test]
    fn test_resolving_twice_is_stable(
        rules in rules(),
        cart in cart(),
        candidates in candidates(),
    ) {
        let once = resolve_with_lookup(&cart, &rules, &candidates).unwrap();
        let twice = resolve_with_lookup(&cart, &rules, &once).unwrap();
        prop_assert_eq!(once, twice);
    }
}
