//! Property-based tests for the state machine
//!
//! These tests drive `transition` with arbitrary event sequences and apply
//! the resulting effects to a model transcript, checking the invariants
//! hold across all inputs.

use super::state::*;
use super::transition::*;
use super::*;
use crate::transcript::{Role, Transcript, Turn};
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

/// State plus the transcript its effects have built so far
struct Model {
    state: ExchangeState,
    transcript: Transcript,
    requests: Vec<String>,
}

impl Model {
    fn new() -> Self {
        Self {
            state: ExchangeState::Idle,
            transcript: Transcript::new(),
            requests: vec![],
        }
    }

    fn apply(
        &mut self,
        ctx: &SessionContext,
        event: Event,
    ) -> Result<Vec<Effect>, TransitionError> {
        let result = transition(&self.state, ctx, event)?;
        self.state = result.new_state;
        for effect in &result.effects {
            match effect {
                Effect::AppendTurn(turn) => {
                    self.transcript.append(turn.clone());
                }
                Effect::ClearTranscript => self.transcript.clear(),
                Effect::RequestReply { prompt } => self.requests.push(prompt.clone()),
                Effect::NotifyPending(_) => {}
            }
        }
        Ok(result.effects)
    }
}

fn count_role(turns: &[Turn], role: Role) -> usize {
    turns.iter().filter(|t| t.role() == role).count()
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_outcome() -> impl Strategy<Value = ExchangeOutcome> {
    prop_oneof![
        "[a-zA-Z ]{0,20}".prop_map(ExchangeOutcome::Success),
        proptest::option::of("[a-zA-Z ]{0,20}").prop_map(ExchangeOutcome::ApplicationError),
        Just(ExchangeOutcome::TransportFailure),
    ]
}

fn arb_raw_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z \n\t]{0,30}",
        Just(String::new()),
        "[ \t\n]{1,5}",
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        arb_raw_text().prop_map(|raw| Event::Submit { raw }),
        arb_outcome().prop_map(|outcome| Event::ReplyReceived { outcome }),
        Just(Event::Clear),
    ]
}

fn arb_policy() -> impl Strategy<Value = ClearPolicy> {
    prop_oneof![
        Just(ClearPolicy::KeepInFlightReply),
        Just(ClearPolicy::DiscardInFlightReply),
    ]
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // Without clears the transcript only grows, and earlier turns never change
    #[test]
    fn prop_append_only_between_clears(
        events in proptest::collection::vec(arb_event(), 0..40),
        policy in arb_policy(),
    ) {
        let ctx = SessionContext::new(policy);
        let mut model = Model::new();

        for event in events {
            let is_clear = matches!(event, Event::Clear);
            let before = model.transcript.snapshot();
            let _ = model.apply(&ctx, event);
            let after = model.transcript.turns();

            if is_clear {
                prop_assert!(after.is_empty());
            } else {
                prop_assert!(after.len() >= before.len());
                prop_assert_eq!(&after[..before.len()], &before[..]);
            }
        }
    }

    // Rejected transitions change nothing
    #[test]
    fn prop_rejections_are_no_ops(
        events in proptest::collection::vec(arb_event(), 0..40),
        policy in arb_policy(),
    ) {
        let ctx = SessionContext::new(policy);
        let mut model = Model::new();

        for event in events {
            let state_before = model.state.clone();
            let turns_before = model.transcript.snapshot();
            let requests_before = model.requests.len();

            if model.apply(&ctx, event).is_err() {
                prop_assert_eq!(&model.state, &state_before);
                prop_assert_eq!(model.transcript.turns(), &turns_before[..]);
                prop_assert_eq!(model.requests.len(), requests_before);
            }
        }
    }

    // With the keep policy and no clears, bot turns trail user turns by the
    // pending flag: every resolved exchange produced exactly one bot turn
    #[test]
    fn prop_one_bot_turn_per_exchange(
        events in proptest::collection::vec(arb_event(), 0..40),
    ) {
        let ctx = SessionContext::new(ClearPolicy::KeepInFlightReply);
        let mut model = Model::new();

        for event in events.into_iter().filter(|e| !matches!(e, Event::Clear)) {
            let _ = model.apply(&ctx, event);

            let turns = model.transcript.turns();
            let users = count_role(turns, Role::User);
            let bots = count_role(turns, Role::Bot);
            let in_flight = usize::from(model.state.is_pending());
            prop_assert_eq!(users, bots + in_flight);
            prop_assert_eq!(model.requests.len(), users);
        }
    }

    // Turns alternate user/bot when nothing is cleared
    #[test]
    fn prop_turns_alternate(
        events in proptest::collection::vec(arb_event(), 0..40),
    ) {
        let ctx = SessionContext::new(ClearPolicy::KeepInFlightReply);
        let mut model = Model::new();

        for event in events.into_iter().filter(|e| !matches!(e, Event::Clear)) {
            let _ = model.apply(&ctx, event);
        }

        for (i, turn) in model.transcript.turns().iter().enumerate() {
            let expected = if i % 2 == 0 { Role::User } else { Role::Bot };
            prop_assert_eq!(turn.role(), expected);
        }
    }

    // At most one request is ever outstanding
    #[test]
    fn prop_at_most_one_in_flight(
        events in proptest::collection::vec(arb_event(), 0..40),
        policy in arb_policy(),
    ) {
        let ctx = SessionContext::new(policy);
        let mut model = Model::new();
        let mut outstanding = 0usize;

        for event in events {
            if let Ok(effects) = model.apply(&ctx, event) {
                for effect in effects {
                    match effect {
                        Effect::RequestReply { .. } => outstanding += 1,
                        Effect::NotifyPending(false) => outstanding -= 1,
                        _ => {}
                    }
                }
            }
            prop_assert!(outstanding <= 1);
            prop_assert_eq!(outstanding == 1, model.state.is_pending());
        }
    }

    // Whatever happened before, delivering the reply always returns to Idle
    #[test]
    fn prop_pending_always_resolves(
        events in proptest::collection::vec(arb_event(), 0..40),
        outcome in arb_outcome(),
        policy in arb_policy(),
    ) {
        let ctx = SessionContext::new(policy);
        let mut model = Model::new();

        for event in events {
            let _ = model.apply(&ctx, event);
        }

        if model.state.is_pending() {
            let effects = model.apply(&ctx, Event::ReplyReceived { outcome });
            prop_assert!(effects.is_ok());
        }
        prop_assert_eq!(model.state, ExchangeState::Idle);
    }

    // Submitted prompts are the trimmed input, and the user turn matches
    #[test]
    fn prop_prompt_is_trimmed_input(raw in "[ \t\n]{0,3}[a-z]{1,10}[ a-z]{0,10}[ \t\n]{0,3}") {
        let ctx = SessionContext::default();
        let mut model = Model::new();

        let effects = model.apply(&ctx, Event::Submit { raw: raw.clone() }).unwrap();
        let trimmed = raw.trim().to_string();

        prop_assert_eq!(model.requests.clone(), vec![trimmed.clone()]);
        prop_assert_eq!(model.transcript.snapshot(), vec![Turn::user(trimmed)]);
        prop_assert!(effects.contains(&Effect::NotifyPending(true)));
    }

    // Clearing twice is the same as clearing once
    #[test]
    fn prop_clear_idempotent(
        events in proptest::collection::vec(arb_event(), 0..20),
        policy in arb_policy(),
    ) {
        let ctx = SessionContext::new(policy);
        let mut model = Model::new();
        for event in events {
            let _ = model.apply(&ctx, event);
        }

        model.apply(&ctx, Event::Clear).unwrap();
        let state_once = model.state.clone();
        model.apply(&ctx, Event::Clear).unwrap();

        prop_assert!(model.transcript.is_empty());
        prop_assert_eq!(model.state, state_once);
    }
}
