use simdbg::{WatchError, Watchpoints};

#[test]
fn test_create_list_delete_round() {
    let mut pool = Watchpoints::default();

    let a = pool.create("1+2*3").unwrap();
    let b = pool.create("(4+4)/2").unwrap();
    assert_eq!((a, b), (0, 1));

    let entries = pool.list();
    assert_eq!(entries.len(), 2);
    assert_eq!((entries[0].expr, entries[0].value), ("1+2*3", 7));
    assert_eq!((entries[1].expr, entries[1].value), ("(4+4)/2", 4));

    pool.delete(a).unwrap();
    let entries = pool.list();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id, b);
}

#[test]
fn test_capacity_exhaustion_and_reuse() {
    let mut pool = Watchpoints::new(3);
    for i in 0..3 {
        assert_eq!(pool.create("7").unwrap(), i);
    }
    assert_eq!(pool.create("8"), Err(WatchError::PoolExhausted));
    assert_eq!(pool.len(), 3);

    pool.delete(1).unwrap();
    assert_eq!(pool.create("9").unwrap(), 1);
    assert_eq!(pool.create("10"), Err(WatchError::PoolExhausted));
}

#[test]
fn test_creation_order_survives_interleaved_deletions() {
    let mut pool = Watchpoints::default();
    let ids: Vec<_> = (0..5)
        .map(|i| pool.create(&format!("{}", i * 10)).unwrap())
        .collect();

    pool.delete(ids[1]).unwrap();
    pool.delete(ids[3]).unwrap();

    let listed: Vec<_> = pool.list().iter().map(|e| e.id).collect();
    assert_eq!(listed, vec![ids[0], ids[2], ids[4]]);

    let reused = pool.create("99").unwrap();
    let listed: Vec<_> = pool.list().iter().map(|e| e.id).collect();
    assert_eq!(listed, vec![ids[0], ids[2], ids[4], reused]);
}

#[test]
fn test_bad_expressions_never_take_a_slot() {
    let mut pool = Watchpoints::new(1);

    assert!(matches!(
        pool.create("1+"),
        Err(WatchError::Expression(_))
    ));
    assert!(matches!(
        pool.create("oops"),
        Err(WatchError::Expression(_))
    ));
    assert!(pool.is_empty());

    pool.create("1").unwrap();
    assert_eq!(pool.create("5/0"), Err(WatchError::PoolExhausted));
}

#[test]
fn test_delete_rejects_stale_and_unknown_ids() {
    let mut pool = Watchpoints::default();
    assert_eq!(pool.delete(0), Err(WatchError::NotFound { id: 0 }));

    let id = pool.create("42").unwrap();
    pool.delete(id).unwrap();
    assert_eq!(pool.delete(id), Err(WatchError::NotFound { id }));
    assert_eq!(pool.delete(1000), Err(WatchError::NotFound { id: 1000 }));
}

#[test]
fn test_checks_stay_quiet_without_state_changes() {
    let mut pool = Watchpoints::default();
    pool.create("1+1").unwrap();
    pool.create("100/10/5").unwrap();

    let report = pool.check_all();
    assert!(!report.any_changed());
    assert!(report.changed.is_empty());
    assert!(report.failures.is_empty());

    // Baselines were untouched by the pass.
    let values: Vec<u32> = pool.list().iter().map(|e| e.value).collect();
    assert_eq!(values, vec![2, 2]);
}
