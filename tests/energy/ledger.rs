use cardia::energy::{EnergyLedger, EnergyState};

#[test]
fn given_full_ledger_when_regenerate_then_capped_at_max() {
    let mut ledger = EnergyLedger::new(EnergyState {
        current: 100.0,
        max: 100.0,
        base_regen: 10.0,
    });

    ledger.regenerate();

    assert_eq!(ledger.available(), 100.0);
}

#[test]
fn given_partial_ledger_when_regenerate_then_full_carry_over_plus_regen() {
    let mut ledger = EnergyLedger::new(EnergyState {
        current: 37.5,
        max: 100.0,
        base_regen: 10.0,
    });

    ledger.regenerate();

    assert_eq!(ledger.available(), 47.5);
}

#[test]
fn given_sufficient_balance_when_try_charge_then_subtracts() {
    let mut ledger = EnergyLedger::new(EnergyState {
        current: 10.0,
        max: 10.0,
        base_regen: 0.0,
    });

    assert!(ledger.try_charge(6.0));
    assert_eq!(ledger.available(), 4.0);
}

#[test]
fn given_insufficient_balance_when_try_charge_then_refused_without_mutation() {
    let mut ledger = EnergyLedger::new(EnergyState {
        current: 3.0,
        max: 10.0,
        base_regen: 0.0,
    });

    assert!(!ledger.try_charge(3.5));
    assert_eq!(ledger.available(), 3.0);
}

#[test]
fn given_exact_balance_when_try_charge_then_floor_is_zero() {
    let mut ledger = EnergyLedger::new(EnergyState {
        current: 5.0,
        max: 10.0,
        base_regen: 0.0,
    });

    assert!(ledger.try_charge(5.0));
    assert_eq!(ledger.available(), 0.0);
    assert!(!ledger.try_charge(0.1));
}

#[test]
fn given_out_of_range_persisted_state_when_constructed_then_clamped() {
    let ledger = EnergyLedger::new(EnergyState {
        current: 240.0,
        max: 100.0,
        base_regen: 10.0,
    });

    assert_eq!(ledger.available(), 100.0);
}
