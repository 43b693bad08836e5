use crate::communication::messages::ControllerEvent;
use crate::control_system::timing::reset_timers;
use crate::models::intersection::{IntersectionState, Mode};
use crate::storage::settings::TimingPlan;

/// Loads the plan's allotments, restarts the rotation from the default order
/// and grants go to its head.
pub fn start_automated(state: &mut IntersectionState, plan: &TimingPlan) -> ControllerEvent {
    plan.apply_to(&mut state.directions);
    state.mode = Mode::Automated;
    state.all_red_phase = false;
    state.order = Default::default();
    reset_timers(&mut state.directions, &state.order);
    if let Some(head) = state.order.head() {
        state.current_direction = head;
        state.directions[head].open();
    }
    log::info!(
        "Automated rotation started at {} ({})",
        state.current_direction,
        state.sequence_label()
    );
    ControllerEvent::Started {
        head: state.current_direction,
    }
}

/// Advances the automated plan by one second.
///
/// Returns the rotation event when the current direction ran out of time.
/// Does nothing outside automated mode.
pub fn tick(state: &mut IntersectionState) -> Option<ControllerEvent> {
    if state.mode != Mode::Automated {
        return None;
    }
    if state.order.head().is_none() {
        log::warn!("Tick with an empty rotation order ignored");
        return None;
    }

    for &approach in state.order.as_slice() {
        let dir = &mut state.directions[approach];
        dir.decrement_countdowns();
        dir.update_statuses();
    }

    if state.directions[state.current_direction].is_exhausted() {
        rotate(state)
    } else {
        None
    }
}

/// Hands primary green to the next approach in the order.
pub fn rotate(state: &mut IntersectionState) -> Option<ControllerEvent> {
    let from = state.current_direction;
    state.order.rotate();
    let to = state.order.head()?;
    state.current_direction = to;
    reset_timers(&mut state.directions, &state.order);
    state.directions[to].open();

    log::info!("Rotation {} -> {} ({})", from, to, state.sequence_label());
    Some(ControllerEvent::Rotated {
        from,
        to,
        order: state.order.as_slice().to_vec(),
    })
}
