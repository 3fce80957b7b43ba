//! Brain domain: unit tests for selection, phases, escalation, poise and
//! the boss state machine.

use std::collections::BTreeMap;

use bevy::math::Vec2;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::{
    AnimationCue, BossBrain, BossCommand, BossConfig, BossEvent, BossStateTag, ComboQueue,
    CooldownLedger, DispatchError, EnabledPatterns, EscalationConfig, EscalationMonitor,
    EscalationTrigger, FrameInput, Pattern, PatternCandidate, PatternSelector, PatternTable,
    PatternTuning, PhaseDescriptor, PhaseState, PhaseTable, PoiseConfig, PoiseTracker,
    SelectionContext, SelectorTuning, State, StateDispatcher, pick_weighted,
};

// ============================================================================
// Helpers
// ============================================================================

/// Every `random::<f32>()` draw yields 0.0
struct ZeroRng;

impl RngCore for ZeroRng {
    fn next_u32(&mut self) -> u32 {
        0
    }

    fn next_u64(&mut self) -> u64 {
        0
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        dst.fill(0);
    }
}

/// Every `random::<f32>()` draw yields the largest value below 1.0
struct OneRng;

impl RngCore for OneRng {
    fn next_u32(&mut self) -> u32 {
        u32::MAX
    }

    fn next_u64(&mut self) -> u64 {
        u64::MAX
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        dst.fill(u8::MAX);
    }
}

#[derive(Default)]
struct CountingRng {
    draws: usize,
}

impl RngCore for CountingRng {
    fn next_u32(&mut self) -> u32 {
        self.draws += 1;
        0
    }

    fn next_u64(&mut self) -> u64 {
        self.draws += 1;
        0
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        self.draws += 1;
        dst.fill(0);
    }
}

fn context(distance: f32, health_ratio: f32) -> SelectionContext<'static> {
    SelectionContext {
        distance,
        health_ratio,
        alive_allies: 0,
        phase: None,
        phase_number: 1,
        escalation_cooldown_multiplier: 1.0,
    }
}

fn three_phases() -> Vec<PhaseDescriptor> {
    vec![
        PhaseDescriptor::new("opening", 1.0),
        PhaseDescriptor::new("pressure", 0.7),
        PhaseDescriptor::new("desperation", 0.4),
    ]
}

/// Target standing inside melee range
fn melee_input(health_ratio: f32) -> FrameInput {
    FrameInput::at(Vec2::ZERO, Vec2::new(1.5, 0.0), health_ratio)
}

/// Tick a fresh brain from Idle into its first Execute state.
fn brain_in_execute(config: BossConfig) -> BossBrain {
    let mut brain = BossBrain::new(config, 7);
    brain.tick(0.7, melee_input(1.0));
    assert_eq!(brain.state(), Some(BossStateTag::Engage));
    brain.tick(0.1, melee_input(1.0));
    brain
}

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-5
}

// ============================================================================
// Cooldown ledger
// ============================================================================

#[test]
fn test_initial_cooldowns_stagger_openers() {
    let table = PatternTable::default();
    let ledger = CooldownLedger::new(&table);

    assert!(ledger.is_ready(Pattern::MeleeAttack));
    assert!(!ledger.is_ready(Pattern::Charge));
    assert_eq!(ledger.remaining(Pattern::Charge), table.charge.base_cooldown * 0.5);
    assert_eq!(ledger.remaining(Pattern::Summon), table.summon.base_cooldown * 0.5);
    // Idle is never tracked
    assert!(ledger.is_ready(Pattern::Idle));
}

#[test]
fn test_cooldown_ready_once_ticks_cover_consumed_time() {
    let mut ledger = CooldownLedger::default();
    ledger.consume(Pattern::Charge, 6.0);
    assert!(!ledger.is_ready(Pattern::Charge));

    for step in 0..24 {
        assert!(!ledger.is_ready(Pattern::Charge), "ready too early at step {step}");
        ledger.tick(0.25);
    }
    assert!(ledger.is_ready(Pattern::Charge));

    for _ in 0..10 {
        ledger.tick(0.25);
        assert!(ledger.is_ready(Pattern::Charge));
        assert_eq!(ledger.remaining(Pattern::Charge), 0.0);
    }

    ledger.consume(Pattern::Charge, 1.0);
    assert!(!ledger.is_ready(Pattern::Charge));
}

#[test]
fn test_cooldown_invalid_input_is_clamped() {
    let mut ledger = CooldownLedger::default();

    ledger.consume(Pattern::AreaBreath, -3.0);
    assert!(ledger.is_ready(Pattern::AreaBreath));

    ledger.consume(Pattern::AreaBreath, f32::NAN);
    assert!(ledger.is_ready(Pattern::AreaBreath));

    ledger.consume(Pattern::AreaBreath, 2.0);
    ledger.tick(-5.0);
    ledger.tick(f32::NAN);
    assert_eq!(ledger.remaining(Pattern::AreaBreath), 2.0);
}

#[test]
fn test_reset_all_makes_everything_ready() {
    let mut ledger = CooldownLedger::new(&PatternTable::default());
    ledger.consume(Pattern::MeleeAttack, 5.0);
    ledger.reset_all();

    for pattern in Pattern::ACTIONS {
        assert!(ledger.is_ready(pattern), "{pattern} still cooling down");
    }
}

// ============================================================================
// Combo queue
// ============================================================================

#[test]
fn test_combo_never_starts_before_min_phase() {
    let mut combo = ComboQueue::new(1.0, 3);
    let mut rng = CountingRng::default();

    for phase_number in 1..3 {
        assert!(!combo.try_start(Pattern::MeleeAttack, phase_number, |_| true, &mut rng));
    }
    assert!(combo.is_empty());
    assert!(!combo.is_active());
    assert_eq!(rng.draws, 0);
}

#[test]
fn test_combo_queues_exact_tail_on_success() {
    let mut combo = ComboQueue::new(0.3, 3);
    assert!(combo.try_start(Pattern::MeleeAttack, 3, |_| true, &mut ZeroRng));
    assert_eq!(
        combo.pending().collect::<Vec<_>>(),
        vec![Pattern::MeleeAttack, Pattern::MeleeAttack]
    );

    let mut combo = ComboQueue::new(0.3, 3);
    assert!(combo.try_start(Pattern::Charge, 4, |_| true, &mut ZeroRng));
    assert_eq!(combo.pending().collect::<Vec<_>>(), vec![Pattern::MeleeAttack]);

    assert_eq!(combo.dequeue_next(), Some(Pattern::MeleeAttack));
    assert!(!combo.is_active());
    assert_eq!(combo.dequeue_next(), None);
}

#[test]
fn test_combo_roll_and_tail_gates() {
    let mut combo = ComboQueue::new(0.3, 3);
    assert!(!combo.try_start(Pattern::MeleeAttack, 3, |_| true, &mut OneRng));

    // No tail to queue
    assert!(!combo.try_start(Pattern::Summon, 3, |_| true, &mut ZeroRng));

    // A disabled follow-up cancels the whole combo
    assert!(!combo.try_start(
        Pattern::AreaBreath,
        3,
        |p| p != Pattern::RangedVolley,
        &mut ZeroRng
    ));
    assert!(combo.is_empty());
}

// ============================================================================
// Weighted draw and selector
// ============================================================================

#[test]
fn test_weighted_draws_converge_to_weight_ratios() {
    let candidates = [
        PatternCandidate {
            pattern: Pattern::MeleeAttack,
            weight: 10.0,
        },
        PatternCandidate {
            pattern: Pattern::Charge,
            weight: 6.0,
        },
        PatternCandidate {
            pattern: Pattern::RangedVolley,
            weight: 4.0,
        },
    ];
    let total: f32 = candidates.iter().map(|c| c.weight).sum();
    let draws = 10_000;

    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut counts: BTreeMap<Pattern, u32> = BTreeMap::new();
    for _ in 0..draws {
        let pick = pick_weighted(&candidates, &mut rng).expect("non-empty candidates");
        *counts.entry(pick).or_default() += 1;
    }

    let chi_squared: f32 = candidates
        .iter()
        .map(|c| {
            let expected = draws as f32 * c.weight / total;
            let observed = counts.get(&c.pattern).copied().unwrap_or(0) as f32;
            (observed - expected).powi(2) / expected
        })
        .sum();

    // Two degrees of freedom; 13.8 is the 0.1% critical value
    assert!(chi_squared < 20.0, "chi squared too large: {chi_squared}");
}

#[test]
fn test_pick_weighted_edge_cases() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    assert_eq!(pick_weighted(&[], &mut rng), None);

    let zeroed = [
        PatternCandidate {
            pattern: Pattern::MeleeAttack,
            weight: 0.0,
        },
        PatternCandidate {
            pattern: Pattern::Summon,
            weight: 0.0,
        },
    ];
    assert_eq!(pick_weighted(&zeroed, &mut rng), Some(Pattern::Summon));

    let weighted = [
        PatternCandidate {
            pattern: Pattern::Charge,
            weight: 1.0,
        },
        PatternCandidate {
            pattern: Pattern::AreaBreath,
            weight: 1.0,
        },
    ];
    assert_eq!(pick_weighted(&weighted, &mut ZeroRng), Some(Pattern::Charge));
    assert_eq!(pick_weighted(&weighted, &mut OneRng), Some(Pattern::AreaBreath));
}

#[test]
fn test_distance_weight_is_floored() {
    let tuning = PatternTuning::new(1.0, 10.0, 1.5, 4.0);
    assert_eq!(tuning.weight_at(1.5, 0.1), 10.0);
    assert!(tuning.weight_at(3.5, 0.1) < 10.0);
    assert!(approx_eq(tuning.weight_at(500.0, 0.1), 1.0));
}

#[test]
fn test_distance_bands_gate_candidates() {
    let mut selector = PatternSelector::default();
    selector.ledger_mut().reset_all();

    let mid_range: Vec<_> = selector
        .candidates(&context(8.0, 1.0))
        .into_iter()
        .map(|c| c.pattern)
        .collect();
    assert_eq!(mid_range, vec![Pattern::Charge, Pattern::RangedVolley]);

    let close: Vec<_> = selector
        .candidates(&context(1.0, 1.0))
        .into_iter()
        .map(|c| c.pattern)
        .collect();
    assert_eq!(close, vec![Pattern::MeleeAttack, Pattern::AreaBreath]);

    let mut wounded = context(30.0, 0.4);
    wounded.alive_allies = 3;
    assert!(!selector.is_eligible(Pattern::Summon, &wounded));
    wounded.alive_allies = 2;
    assert!(selector.is_eligible(Pattern::Summon, &wounded));
}

#[test]
fn test_phase_disables_patterns() {
    let mut selector = PatternSelector::default();
    selector.ledger_mut().reset_all();

    let phase = PhaseDescriptor {
        enabled: EnabledPatterns::melee_only(),
        ..PhaseDescriptor::new("grounded", 1.0)
    };
    let ctx = SelectionContext {
        phase: Some(&phase),
        ..context(1.0, 1.0)
    };

    let picks: Vec<_> = selector.candidates(&ctx).into_iter().map(|c| c.pattern).collect();
    assert_eq!(picks, vec![Pattern::MeleeAttack]);
}

#[test]
fn test_zero_candidates_returns_idle_and_keeps_ledger() {
    let mut selector = PatternSelector::default();
    selector.ledger_mut().reset_all();
    let before = selector.ledger().clone();

    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let selection = selector.select(&context(100.0, 1.0), &mut rng);

    assert_eq!(selection.pattern, Pattern::Idle);
    assert!(!selection.from_combo);
    assert_eq!(selector.ledger(), &before);
    assert_eq!(selector.last_pick(), None);
}

#[test]
fn test_repetition_decay_is_monotonic_and_floored() {
    let mut tuning = SelectorTuning::default();
    tuning.patterns.melee_attack = PatternTuning::new(0.0, 10.0, 1.5, 4.0);
    let mut selector = PatternSelector::new(tuning);

    let phase = PhaseDescriptor {
        enabled: EnabledPatterns::melee_only(),
        ..PhaseDescriptor::new("grounded", 1.0)
    };
    let ctx = SelectionContext {
        phase: Some(&phase),
        ..context(1.5, 1.0)
    };
    let base = selector.base_weight(Pattern::MeleeAttack, 1.5);

    let mut rng = ChaCha8Rng::seed_from_u64(9);
    let mut weights = Vec::new();
    for _ in 0..5 {
        let candidates = selector.candidates(&ctx);
        assert_eq!(candidates.len(), 1);
        weights.push(candidates[0].weight);
        assert_eq!(selector.select(&ctx, &mut rng).pattern, Pattern::MeleeAttack);
    }

    assert_eq!(weights[0], base);
    for pair in weights.windows(2) {
        assert!(pair[1] <= pair[0], "weight increased: {:?}", weights);
    }
    for weight in &weights {
        assert!(*weight >= base * 0.3 - 1e-4);
    }
    assert!(approx_eq(weights[4], base * 0.3));
    assert_eq!(selector.consecutive_uses(), 5);
}

#[test]
fn test_combo_steps_bypass_weighting_and_cooldowns() {
    let tuning = SelectorTuning {
        combo_probability: 1.0,
        combo_min_phase: 1,
        ..SelectorTuning::default()
    };
    let mut selector = PatternSelector::new(tuning);
    let ctx = context(1.5, 1.0);

    let opener = selector.select(&ctx, &mut ZeroRng);
    assert_eq!(opener.pattern, Pattern::MeleeAttack);
    assert!(opener.combo_started);
    let cooldown = selector.ledger().remaining(Pattern::MeleeAttack);
    assert!(cooldown > 0.0);

    for _ in 0..2 {
        let step = selector.select(&ctx, &mut ZeroRng);
        assert_eq!(step.pattern, Pattern::MeleeAttack);
        assert!(step.from_combo);
        assert_eq!(selector.ledger().remaining(Pattern::MeleeAttack), cooldown);
        assert_eq!(selector.consecutive_uses(), 1);
    }
    assert!(!selector.combo_pending());
}

#[test]
fn test_consumed_cooldown_scales_with_phase_and_escalation() {
    let mut selector = PatternSelector::default();
    let phase = PhaseDescriptor {
        cooldown_multiplier: 0.5,
        ..PhaseDescriptor::new("quick", 1.0)
    };
    let ctx = SelectionContext {
        phase: Some(&phase),
        escalation_cooldown_multiplier: 0.7,
        ..context(1.5, 1.0)
    };

    let selection = selector.select(&ctx, &mut ZeroRng);
    assert_eq!(selection.pattern, Pattern::MeleeAttack);
    assert!(approx_eq(
        selector.ledger().remaining(Pattern::MeleeAttack),
        1.5 * 0.5 * 0.7
    ));
}

#[test]
fn test_phase_transition_resets_rhythm() {
    let tuning = SelectorTuning {
        combo_probability: 1.0,
        combo_min_phase: 1,
        ..SelectorTuning::default()
    };
    let mut selector = PatternSelector::new(tuning);
    selector.select(&context(1.5, 1.0), &mut ZeroRng);
    assert!(selector.combo_pending());

    selector.on_phase_transition();
    assert!(!selector.combo_pending());
    for pattern in Pattern::ACTIONS {
        assert!(selector.ledger().is_ready(pattern));
    }
}

// ============================================================================
// Phases
// ============================================================================

#[test]
fn test_phase_table_sorts_and_resolves() {
    let table = PhaseTable::new(vec![
        PhaseDescriptor::new("desperation", 0.4),
        PhaseDescriptor::new("opening", 1.0),
        PhaseDescriptor::new("pressure", 0.7),
    ]);

    assert_eq!(table.descriptor(0).map(|p| p.name.as_str()), Some("opening"));
    assert_eq!(table.resolve_phase_index(1.0), 0);
    assert_eq!(table.resolve_phase_index(0.71), 0);
    assert_eq!(table.resolve_phase_index(0.7), 1);
    assert_eq!(table.resolve_phase_index(0.25), 2);
    assert_eq!(table.resolve_phase_index(0.0), 2);

    let empty = PhaseTable::default();
    assert_eq!(empty.resolve_phase_index(0.1), 0);
    assert_eq!(empty.damage_multiplier(0), 1.0);
    assert!(empty.is_enabled(0, Pattern::Summon));
}

#[test]
fn test_phase_evaluate_never_moves_backward() {
    let table = PhaseTable::new(three_phases());
    let mut state = PhaseState::default();

    for hp in [1.0, 0.6, 0.9, 1.0, 0.3, 0.8, 0.5, 0.1, 1.0] {
        let before = state.index();
        if let Some(next) = table.evaluate(hp, &state) {
            assert!(next > before, "evaluate went from {before} to {next}");
            assert!(state.begin_transition(next));
            assert!(state.complete_transition());
        }
        assert!(state.index() >= before);
    }
    assert_eq!(state.index(), 2);
}

#[test]
fn test_phase_evaluate_waits_for_transition() {
    let table = PhaseTable::new(three_phases());
    let mut state = PhaseState::default();

    assert!(state.begin_transition(1));
    assert_eq!(table.evaluate(0.1, &state), None);
    assert!(!state.begin_transition(0));

    assert!(state.complete_transition());
    assert!(!state.complete_transition());
    assert_eq!(table.evaluate(0.1, &state), Some(2));
}

// ============================================================================
// Escalation
// ============================================================================

#[test]
fn test_quarter_health_resolves_last_phase_and_escalates_once() {
    let table = PhaseTable::new(three_phases());
    assert_eq!(table.resolve_phase_index(0.25), 2);

    let config = EscalationConfig::default();
    let mut monitor = EscalationMonitor::new(config.clone());
    assert!(!monitor.is_escalated());

    assert_eq!(
        monitor.evaluate(0.25, 10.0, false),
        Some(EscalationTrigger::LowHealth)
    );
    assert!(monitor.is_escalated());
    assert_eq!(monitor.damage_multiplier(), config.damage_multiplier);
    assert_eq!(monitor.speed_multiplier(), config.speed_multiplier);
    assert_eq!(monitor.cooldown_multiplier(), config.cooldown_multiplier);

    assert_eq!(monitor.evaluate(0.6, 11.0, false), None);
    assert_eq!(monitor.evaluate(0.2, 12.0, false), None);
    assert!(monitor.is_escalated());
    assert_eq!(monitor.trigger(), Some(EscalationTrigger::LowHealth));
}

#[test]
fn test_escalation_triggers_latch_independently() {
    let mut monitor = EscalationMonitor::default();
    assert_eq!(
        monitor.evaluate(1.0, 200.0, true),
        Some(EscalationTrigger::Timeout)
    );
    assert!(monitor.is_latched(EscalationTrigger::Timeout));
    assert!(monitor.is_latched(EscalationTrigger::AllyWipe));
    assert!(!monitor.is_latched(EscalationTrigger::LowHealth));

    assert_eq!(monitor.evaluate(0.1, 201.0, true), None);
    assert!(monitor.is_latched(EscalationTrigger::LowHealth));
}

#[test]
fn test_end_escalation_is_permanent() {
    let mut monitor = EscalationMonitor::default();
    monitor.evaluate(0.1, 0.0, false);
    monitor.end_escalation();

    assert!(!monitor.is_escalated());
    assert_eq!(monitor.damage_multiplier(), 1.0);
    assert_eq!(monitor.evaluate(0.05, 500.0, true), None);
    assert!(!monitor.is_escalated());
}

// ============================================================================
// Poise
// ============================================================================

#[test]
fn test_poise_break_fires_once() {
    let mut poise = PoiseTracker::new(&PoiseConfig {
        max: 100.0,
        ..PoiseConfig::default()
    });

    let breaks: Vec<bool> = (0..6).map(|_| poise.apply_damage(30.0)).collect();
    assert_eq!(breaks, vec![false, false, false, true, false, false]);
    assert!(poise.is_broken());
    assert_eq!(poise.current(), 0.0);
}

#[test]
fn test_poise_ignores_invalid_and_infinite_damage() {
    let mut poise = PoiseTracker::default();
    assert!(!poise.apply_damage(-10.0));
    assert!(!poise.apply_damage(f32::NAN));
    assert_eq!(poise.current(), poise.max());

    poise.set_infinite(true);
    assert!(!poise.apply_damage(1_000.0));
    assert_eq!(poise.current(), poise.max());

    poise.set_infinite(false);
    assert!(poise.apply_damage(1_000.0));
    assert_eq!(poise.recover(None), poise.max());
    assert!(!poise.is_broken());
}

#[test]
fn test_poise_regenerates_after_delay() {
    let mut poise = PoiseTracker::new(&PoiseConfig {
        max: 100.0,
        regen_per_second: 10.0,
        regen_delay_seconds: 3.0,
    });
    poise.apply_damage(50.0);

    assert_eq!(poise.regenerate(2.0), None);
    assert_eq!(poise.regenerate(1.5), Some(65.0));

    poise.apply_damage(70.0);
    assert!(poise.is_broken());
    assert_eq!(poise.regenerate(10.0), None);
}

// ============================================================================
// State dispatcher
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Step {
    Start,
    Reacting,
    Missing,
}

#[derive(Default)]
struct Journal {
    entries: Vec<String>,
}

struct Probe {
    tag: Step,
    reentrant: bool,
    next: Option<Step>,
}

impl Probe {
    fn new(tag: Step) -> Self {
        Self {
            tag,
            reentrant: false,
            next: None,
        }
    }
}

impl State<Step, Journal> for Probe {
    fn tag(&self) -> Step {
        self.tag
    }

    fn enter(&mut self, ctx: &mut Journal) {
        ctx.entries.push(format!("enter {:?}", self.tag));
    }

    fn update(&mut self, _ctx: &mut Journal) -> Option<Step> {
        self.next
    }

    fn exit(&mut self, ctx: &mut Journal) {
        ctx.entries.push(format!("exit {:?}", self.tag));
    }

    fn supports_reentry(&self) -> bool {
        self.reentrant
    }

    fn re_enter(&mut self, ctx: &mut Journal) {
        ctx.entries.push(format!("reenter {:?}", self.tag));
    }
}

fn dispatcher() -> StateDispatcher<Step, Journal> {
    StateDispatcher::new()
        .with_state(Box::new(Probe {
            next: Some(Step::Reacting),
            ..Probe::new(Step::Start)
        }))
        .with_state(Box::new(Probe {
            reentrant: true,
            ..Probe::new(Step::Reacting)
        }))
}

#[test]
fn test_dispatcher_requires_registered_initial_state() {
    let mut fsm = dispatcher();
    let mut journal = Journal::default();

    assert_eq!(fsm.update(&mut journal), Err(DispatchError::NotInitialized));
    assert_eq!(
        fsm.initialize(Step::Missing, &mut journal),
        Err(DispatchError::UnregisteredState(Step::Missing))
    );
    assert_eq!(fsm.current(), None);

    assert!(fsm.initialize(Step::Start, &mut journal).is_ok());
    assert_eq!(fsm.current(), Some(Step::Start));
    assert_eq!(journal.entries, vec!["enter Start"]);
}

#[test]
fn test_dispatcher_keeps_state_on_missing_tag() {
    let mut fsm = dispatcher();
    let mut journal = Journal::default();
    fsm.initialize(Step::Start, &mut journal).ok();
    journal.entries.clear();

    assert!(fsm.change_state(Step::Missing, &mut journal).is_err());
    assert_eq!(fsm.current(), Some(Step::Start));
    assert!(journal.entries.is_empty());
}

#[test]
fn test_dispatcher_transitions_and_reentry() {
    let mut fsm = dispatcher();
    let mut journal = Journal::default();
    fsm.initialize(Step::Start, &mut journal).ok();

    // Start does not support re-entry
    assert!(fsm.change_state(Step::Start, &mut journal).is_ok());
    assert_eq!(journal.entries, vec!["enter Start"]);

    // Start requests Reacting on update
    assert!(fsm.update(&mut journal).is_ok());
    assert_eq!(fsm.current(), Some(Step::Reacting));
    assert_eq!(fsm.previous(), Some(Step::Start));

    assert!(fsm.change_state(Step::Reacting, &mut journal).is_ok());
    assert_eq!(
        journal.entries,
        vec!["enter Start", "exit Start", "enter Reacting", "reenter Reacting"]
    );
}

// ============================================================================
// Boss brain
// ============================================================================

#[test]
fn test_brain_engages_and_executes_pattern() {
    let mut brain = BossBrain::new(BossConfig::default(), 7);
    assert_eq!(brain.state(), Some(BossStateTag::Idle));
    let commands = brain.drain_commands();
    assert!(commands.contains(&BossCommand::SetSpeed(3.0)));
    assert!(commands.contains(&BossCommand::StopMovement));

    brain.tick(0.7, melee_input(1.0));
    assert_eq!(brain.state(), Some(BossStateTag::Engage));
    assert!(brain.drain_commands().contains(&BossCommand::ResumeMovement));

    brain.tick(0.1, melee_input(1.0));
    assert_eq!(
        brain.state(),
        Some(BossStateTag::Execute(Pattern::MeleeAttack))
    );

    let commands = brain.drain_commands();
    assert!(commands.iter().any(|c| matches!(
        c,
        BossCommand::CommitAttack(intent)
            if intent.pattern == Pattern::MeleeAttack && intent.damage_multiplier == 1.0
    )));
    assert!(commands.iter().any(|c| matches!(
        c,
        BossCommand::PlayAnimation { cue: AnimationCue::Pattern(Pattern::MeleeAttack), .. }
    )));
    assert!(brain.drain_events().iter().any(|e| matches!(
        e,
        BossEvent::PatternSelected { pattern: Pattern::MeleeAttack, from_combo: false, .. }
    )));
}

#[test]
fn test_execute_waits_for_animation_and_ignores_stale_tickets() {
    let mut brain = brain_in_execute(BossConfig::default());
    let Some((ticket, _)) = brain.outstanding_animation() else {
        panic!("execute should have requested an animation");
    };

    brain.tick(0.5, melee_input(1.0));
    assert_eq!(
        brain.state(),
        Some(BossStateTag::Execute(Pattern::MeleeAttack))
    );

    assert!(brain.on_animation_complete(ticket));
    assert!(!brain.on_animation_complete(ticket));

    brain.tick(0.1, melee_input(1.0));
    assert_eq!(brain.state(), Some(BossStateTag::Idle));
}

#[test]
fn test_phase_drop_interrupts_execute() {
    let config = BossConfig {
        phases: three_phases(),
        ..BossConfig::default()
    };
    let mut brain = brain_in_execute(config);
    let Some((attack_ticket, _)) = brain.outstanding_animation() else {
        panic!("execute should have requested an animation");
    };
    brain.drain_events();

    brain.tick(0.1, melee_input(0.5));
    assert_eq!(brain.state(), Some(BossStateTag::PhaseTransition));
    assert_eq!(brain.phase_index(), 1);
    assert!(brain.is_transitioning());
    assert!(brain.poise().is_infinite());
    assert!(!brain.on_animation_complete(attack_ticket));
    assert!(brain.drain_events().iter().any(|e| matches!(
        e,
        BossEvent::PhaseTransitionBegan { index: 1, .. }
    )));

    let Some((transition_ticket, cue)) = brain.outstanding_animation() else {
        panic!("phase transition should play its cue");
    };
    assert_eq!(cue, AnimationCue::PhaseTransition);

    // Damage during the transition is absorbed
    assert!(!brain.apply_poise_damage(1_000.0));
    assert_eq!(brain.state(), Some(BossStateTag::PhaseTransition));

    assert!(brain.on_animation_complete(transition_ticket));
    brain.tick(0.1, melee_input(0.5));
    assert_eq!(brain.state(), Some(BossStateTag::Idle));
    assert!(!brain.is_transitioning());
    assert!(!brain.poise().is_infinite());
    assert!(brain.drain_events().iter().any(|e| matches!(
        e,
        BossEvent::PhaseTransitionCompleted { index: 1 }
    )));
}

#[test]
fn test_poise_break_forces_hit_reaction() {
    let config = BossConfig {
        poise: PoiseConfig {
            max: 50.0,
            ..PoiseConfig::default()
        },
        ..BossConfig::default()
    };
    let mut brain = BossBrain::new(config, 11);

    assert!(!brain.apply_poise_damage(30.0));
    assert_eq!(brain.state(), Some(BossStateTag::Idle));
    assert!(brain.apply_poise_damage(30.0));
    assert_eq!(brain.state(), Some(BossStateTag::HitReaction));
    assert!(brain.drain_events().contains(&BossEvent::PoiseBroken));

    brain.tick(1.5, FrameInput::default());
    assert_eq!(brain.state(), Some(BossStateTag::HitReaction));

    // Another hit restarts the reaction instead of breaking again
    assert!(!brain.apply_poise_damage(10.0));
    brain.tick(1.5, FrameInput::default());
    assert_eq!(brain.state(), Some(BossStateTag::HitReaction));

    brain.tick(1.0, FrameInput::default());
    assert_eq!(brain.state(), Some(BossStateTag::Idle));
    assert_eq!(brain.poise().current(), 50.0);
    assert!(brain.drain_events().contains(&BossEvent::PoiseRecovered { value: 50.0 }));
}

#[test]
fn test_scripted_infinite_poise_survives_phase_transition() {
    let config = BossConfig {
        phases: three_phases(),
        ..BossConfig::default()
    };
    let mut brain = BossBrain::new(config, 3);
    brain.set_poise_infinite(true);

    brain.tick(0.1, melee_input(0.5));
    assert_eq!(brain.state(), Some(BossStateTag::PhaseTransition));
    let Some((ticket, _)) = brain.outstanding_animation() else {
        panic!("phase transition should play its cue");
    };
    assert!(brain.on_animation_complete(ticket));
    brain.tick(0.1, melee_input(0.5));
    assert_eq!(brain.state(), Some(BossStateTag::Idle));

    assert!(brain.poise().is_infinite());
    assert!(!brain.apply_poise_damage(1_000.0));
    assert_eq!(brain.state(), Some(BossStateTag::Idle));
}

#[test]
fn test_infinite_poise_does_not_extend_hit_reaction() {
    let config = BossConfig {
        poise: PoiseConfig {
            max: 50.0,
            ..PoiseConfig::default()
        },
        ..BossConfig::default()
    };
    let mut brain = BossBrain::new(config, 11);

    assert!(brain.apply_poise_damage(60.0));
    assert_eq!(brain.state(), Some(BossStateTag::HitReaction));
    brain.set_poise_infinite(true);

    brain.tick(1.5, FrameInput::default());
    brain.drain_commands();
    assert!(!brain.apply_poise_damage(10.0));
    assert!(!brain.drain_commands().iter().any(|c| matches!(
        c,
        BossCommand::PlayAnimation { cue: AnimationCue::HitReaction, .. }
    )));

    brain.tick(0.6, FrameInput::default());
    assert_eq!(brain.state(), Some(BossStateTag::Idle));
}

#[test]
fn test_death_during_hit_reaction_skips_poise_recovery() {
    let config = BossConfig {
        poise: PoiseConfig {
            max: 50.0,
            ..PoiseConfig::default()
        },
        ..BossConfig::default()
    };
    let mut brain = BossBrain::new(config, 11);

    assert!(brain.apply_poise_damage(60.0));
    brain.drain_events();

    brain.kill();
    assert_eq!(brain.state(), Some(BossStateTag::Dead));
    let events = brain.drain_events();
    assert!(events.contains(&BossEvent::Died));
    assert!(!events.iter().any(|e| matches!(e, BossEvent::PoiseRecovered { .. })));
}

#[test]
fn test_zero_health_is_terminal() {
    let mut brain = brain_in_execute(BossConfig::default());
    brain.drain_events();

    brain.tick(0.1, melee_input(0.0));
    assert_eq!(brain.state(), Some(BossStateTag::Dead));
    assert!(brain.is_dead());
    assert_eq!(
        brain.outstanding_animation().map(|(_, cue)| cue),
        Some(AnimationCue::Death)
    );

    let elapsed = brain.elapsed_combat_seconds();
    brain.tick(5.0, melee_input(1.0));
    brain.kill();
    assert!(!brain.apply_poise_damage(500.0));
    assert_eq!(brain.state(), Some(BossStateTag::Dead));
    assert_eq!(brain.elapsed_combat_seconds(), elapsed);

    let deaths = brain
        .drain_events()
        .into_iter()
        .filter(|e| *e == BossEvent::Died)
        .count();
    assert_eq!(deaths, 1);
}

#[test]
fn test_paused_clock_holds_timeout() {
    let config = BossConfig {
        escalation: EscalationConfig {
            timeout_seconds: 10.0,
            ..EscalationConfig::default()
        },
        ..BossConfig::default()
    };
    let mut brain = BossBrain::new(config, 5);

    brain.set_clock_paused(true);
    brain.tick(20.0, FrameInput::default());
    assert!(!brain.is_escalated());
    assert_eq!(brain.elapsed_combat_seconds(), 0.0);

    brain.set_clock_paused(false);
    brain.tick(10.0, FrameInput::default());
    assert!(brain.is_escalated());
    assert_eq!(brain.escalation().trigger(), Some(EscalationTrigger::Timeout));
}

#[test]
fn test_ally_wipe_escalates_and_speeds_up() {
    let config = BossConfig::default();
    let expected_speed = config.base_move_speed * config.escalation.speed_multiplier;
    let mut brain = BossBrain::new(config, 5);
    brain.drain_commands();

    brain.notify_all_allies_dead();
    brain.tick(0.1, FrameInput::default());
    assert!(brain.is_escalated());
    assert!(brain.drain_commands().contains(&BossCommand::SetSpeed(expected_speed)));
    assert!(brain.drain_events().iter().any(|e| matches!(
        e,
        BossEvent::Escalated { trigger: EscalationTrigger::AllyWipe, .. }
    )));

    brain.end_escalation();
    assert!(!brain.is_escalated());
    assert!(brain.drain_commands().contains(&BossCommand::SetSpeed(3.0)));
}

#[test]
fn test_attack_scales_with_phase_and_escalation() {
    let config = BossConfig {
        phases: vec![
            PhaseDescriptor::new("opening", 1.0),
            PhaseDescriptor {
                damage_multiplier: 2.0,
                attack_speed_multiplier: 1.25,
                plays_transition: false,
                ..PhaseDescriptor::new("frenzy", 0.5)
            },
        ],
        ..BossConfig::default()
    };
    let mut brain = BossBrain::new(config, 21);

    // No transition cue, so the phase completes within the same tick
    brain.tick(0.1, melee_input(0.25));
    assert_eq!(brain.phase_index(), 1);
    assert!(brain.is_escalated());
    assert_eq!(brain.state(), Some(BossStateTag::Idle));
    brain.drain_commands();

    brain.tick(0.5, melee_input(0.25));
    assert_eq!(brain.state(), Some(BossStateTag::Engage));
    brain.tick(0.1, melee_input(0.25));
    assert!(matches!(brain.state(), Some(BossStateTag::Execute(_))));

    let commands = brain.drain_commands();
    assert!(commands.iter().any(|c| matches!(
        c,
        BossCommand::CommitAttack(intent) if approx_eq(intent.damage_multiplier, 3.0)
    )));
    assert!(commands.iter().any(|c| matches!(
        c,
        BossCommand::PlayAnimation { playback_speed, .. } if *playback_speed == 1.25
    )));
}

#[test]
fn test_snapshot_serializes_to_json() {
    let brain = BossBrain::new(BossConfig::default(), 1);
    let snapshot = brain.snapshot();
    assert_eq!(snapshot.state, Some(BossStateTag::Idle));
    assert_eq!(snapshot.phase_number, 1);

    let json = serde_json::to_value(&snapshot).expect("snapshot serializes");
    assert_eq!(json["state"], "Idle");
    assert_eq!(json["escalated"], false);
}
