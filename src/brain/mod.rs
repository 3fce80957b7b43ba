//! Brain domain: the boss decision core.
//!
//! Pattern selection, phases, escalation, poise and the state machine that
//! ties them together. Nothing here touches the ECS world; hosts feed a
//! [`FrameInput`] per frame and drain [`BossCommand`]s back out.

mod boss;
mod collaborators;
mod escalation;
mod fsm;
mod ledger;
mod pattern;
mod phase;
mod poise;
mod selector;
mod states;
#[cfg(test)]
mod tests;

pub use boss::{BossBrain, BossConfig, BossCore, BrainSnapshot};
pub use collaborators::{
    AllyCensus, AnimationCue, AnimationDriver, AnimationSlot, AnimationTicket, AttackIntent,
    BossCommand, BossEvent, CombatResolver, FrameInput, MovementDriver, MovementReport, Outbox,
};
pub use escalation::{EscalationConfig, EscalationMonitor, EscalationTrigger};
pub use fsm::{DispatchError, State, StateDispatcher};
pub use ledger::{
    ComboQueue, CooldownLedger, DEFAULT_COMBO_MIN_PHASE, DEFAULT_COMBO_PROBABILITY,
    effective_cooldown,
};
pub use pattern::{Pattern, PatternTable, PatternTuning};
pub use phase::{EnabledPatterns, PhaseDescriptor, PhaseState, PhaseTable};
pub use poise::{PoiseConfig, PoiseTracker};
pub use selector::{
    PatternCandidate, PatternSelector, Selection, SelectionContext, SelectorTuning, pick_weighted,
};
pub use states::BossStateTag;
