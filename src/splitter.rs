//! Lazy splitting: turning a machine that reached an undefined transition into every
//! distinct machine that commits to one choice for it.

use log::trace;

use crate::machine::PartialMachine;
use crate::types::{Direction, State, Transition, SYMBOLS};

/// Expands `machine` at its current, undefined transition.
///
/// Returns one clone per possible entry for the current key, in a fixed order: the halting
/// entry first, then for each target state, each allowed direction and each written symbol,
/// a moving entry. Target states range over every state already used plus at most one new
/// state, capped by the machine's size.
///
/// The first transition a machine ever receives may only move right. A machine whose first
/// move is to the left is the mirror image of one that moves right and halts after the same
/// number of steps.
///
/// Every returned machine has an entry for the current key, so it can be stepped immediately.
///
/// # Panics
///
/// Panics if `machine` has halted or already defines its current transition.
pub fn expand(machine: &PartialMachine) -> Vec<PartialMachine> {
    let key = machine
        .lookup_key()
        .expect("cannot expand a halted machine");
    assert!(
        machine.transition(key).is_none(),
        "cannot expand {key:?}: transition already defined"
    );

    let directions: &[Direction] = if machine.is_table_empty() {
        &[Direction::Right]
    } else {
        &Direction::ALL
    };
    let reachable = (machine.highest_state_used() as usize + 2).min(machine.size());

    let mut machines = Vec::with_capacity(1 + reachable * directions.len() * SYMBOLS.len());

    let mut halting = machine.clone();
    halting.assign(key, Transition::Halt);
    machines.push(halting);

    for next_state in 0..reachable {
        for &direction in directions {
            for &write in &SYMBOLS {
                let mut continuation = machine.clone();
                continuation.assign(
                    key,
                    Transition::Move {
                        next_state: next_state as State,
                        write,
                        direction,
                    },
                );
                machines.push(continuation);
            }
        }
    }

    trace!(
        "split {} at {:?} into {} machines",
        machine,
        key,
        machines.len()
    );
    machines
}
