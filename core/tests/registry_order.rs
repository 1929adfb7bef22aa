use kaiwabako_core::DialogRegistry;

fn register_n(registry: &mut DialogRegistry, n: usize) -> Vec<u32> {
    (0..n).map(|_| registry.register().id).collect()
}

#[test]
fn sequential_claims_form_dense_permutation() {
    let mut registry = DialogRegistry::new();
    let ids = register_n(&mut registry, 4);

    for id in &ids {
        let assignments = registry.claim_top(*id);
        assert_eq!(assignments.len(), 4);
        let mut zs: Vec<usize> = assignments.iter().map(|assignment| assignment.z).collect();
        zs.sort_unstable();
        assert_eq!(zs, vec![0, 1, 2, 3]);
        assert_eq!(registry.z_of(*id), Some(3));
    }

    // claimed in registration order, so recency order matches id order
    let final_zs: Vec<usize> = ids.iter().map(|id| registry.z_of(*id).unwrap()).collect();
    assert_eq!(final_zs, vec![0, 1, 2, 3]);
}

#[test]
fn most_recent_claimant_holds_the_maximum() {
    let mut registry = DialogRegistry::new();
    let ids = register_n(&mut registry, 3);

    registry.claim_top(ids[2]);
    registry.claim_top(ids[0]);
    assert_eq!(registry.z_of(ids[0]), Some(2));
    assert_eq!(registry.ids_by_z().last().copied(), Some(ids[0]));
}

#[test]
fn unclaimed_entries_keep_insertion_order_below_the_claimant() {
    let mut registry = DialogRegistry::new();
    let ids = register_n(&mut registry, 3);

    registry.claim_top(ids[0]);
    assert_eq!(registry.ids_by_z(), vec![ids[1], ids[2], ids[0]]);
}

#[test]
fn deregister_then_claim_stays_dense() {
    let mut registry = DialogRegistry::new();
    let ids = register_n(&mut registry, 3);

    assert!(registry.deregister(ids[1]));
    assert!(!registry.deregister(ids[1]));
    assert_eq!(registry.len(), 2);

    let assignments = registry.claim_top(ids[2]);
    assert_eq!(assignments.len(), 2);
    assert_eq!(registry.z_of(ids[0]), Some(0));
    assert_eq!(registry.z_of(ids[2]), Some(1));
}

#[test]
fn ids_survive_deregistration_without_reuse() {
    let mut registry = DialogRegistry::new();
    let first = registry.register().id;
    registry.deregister(first);
    let second = registry.register().id;
    assert!(second > first);
}
