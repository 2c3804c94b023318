//! Action dispatch — executes resolved action lists against the game state.
//!
//! Dispatch is a pure match over the action kind. Each action in a batch
//! is isolated: a failure is logged and surfaced to the local player, and
//! the remaining actions still run. Composite effects (TNT rain, batched
//! summons, rocket fuses) schedule their sub-steps through the task
//! scheduler and return immediately — a dispatch call never blocks and
//! nothing retries automatically.

use tracing::warn;

use crate::action::{Action, ActionKind};
use crate::config::EffectsConfig;
use crate::context::{GameContext, ScreenOptions, SummonOptions};
use crate::error::Result;
use crate::scheduler::TaskScheduler;

/// Entity type dropped by TNT rain waves.
const TNT_ENTITY: &str = "tnt";
/// Scatter radius for TNT rain waves.
const TNT_RAIN_SPREAD: f32 = 8.0;
/// Entity type for the rocket itself.
const ROCKET_ENTITY: &str = "tnt_rocket";
/// TNT summoned when a rocket detonates.
const ROCKET_BURST_COUNT: u32 = 8;
/// Scatter radius of the rocket burst.
const ROCKET_BURST_SPREAD: f32 = 4.0;

/// Execute a single action against the game context.
///
/// # Errors
/// Returns the collaborator's error when its call fails. Scheduled
/// sub-steps report their own failures through the scheduler's logging;
/// a failing wave cancels its remaining waves rather than retrying.
pub fn execute<C: GameContext>(
    sched: &mut TaskScheduler<C>,
    ctx: &mut C,
    action: &Action,
    effects: &EffectsConfig,
) -> Result<()> {
    match &action.kind {
        ActionKind::Summon { entity_type, count, spread } => summon_in_waves(
            sched,
            ctx,
            entity_type,
            *count,
            *spread,
            effects.summon_wave_size,
            effects.summon_wave_interval_ticks,
            "summon-wave",
        ),
        ActionKind::ClearBlocks => ctx.clear_blocks(),
        ActionKind::Fill { block, hollow } => ctx.fill_blocks(crate::context::FillOptions {
            block: block.clone(),
            hollow: *hollow,
        }),
        ActionKind::PlaySound { sound_id } => ctx.play_sound(sound_id),
        ActionKind::ScreenTitle { text } => ctx.display_screen(ScreenOptions {
            title: Some(text.clone()),
            subtitle: None,
        }),
        ActionKind::ScreenSubtitle { text } => ctx.display_screen(ScreenOptions {
            title: None,
            subtitle: Some(text.clone()),
        }),
        ActionKind::RunCommand { command } => ctx.run_command(command),
        ActionKind::Jail { duration_ticks, effects: status } => {
            ctx.jail(*duration_ticks, status)
        }
        ActionKind::Win { delta } => ctx.adjust_wins(*delta),
        ActionKind::TntRain { count, wave_size, wave_interval_ticks } => summon_in_waves(
            sched,
            ctx,
            TNT_ENTITY,
            *count,
            TNT_RAIN_SPREAD,
            *wave_size,
            *wave_interval_ticks,
            "tnt-rain",
        ),
        ActionKind::TntRocket { fuse_ticks } => {
            ctx.summon_entities(SummonOptions {
                entity_type: ROCKET_ENTITY.to_string(),
                count: 1,
                spread: 0.0,
            })?;
            let fuse = if *fuse_ticks == 0 {
                effects.tnt_rocket_fuse_ticks
            } else {
                *fuse_ticks
            };
            let id = sched.unique_task_id("rocket-fuse");
            sched.add(
                id,
                fuse,
                Box::new(move |_, ctx| {
                    ctx.play_sound("random.explode")?;
                    ctx.summon_entities(SummonOptions {
                        entity_type: TNT_ENTITY.to_string(),
                        count: ROCKET_BURST_COUNT,
                        spread: ROCKET_BURST_SPREAD,
                    })
                }),
            );
            Ok(())
        }
    }
}

/// Execute an ordered action list with per-action isolation.
///
/// A failing action is logged, reported to the local player, and does not
/// prevent the actions after it. The caller receives no fault.
pub fn execute_all<C: GameContext>(
    sched: &mut TaskScheduler<C>,
    ctx: &mut C,
    actions: &[Action],
    effects: &EffectsConfig,
) {
    for action in actions {
        if let Err(err) = execute(sched, ctx, action, effects) {
            warn!(
                kind = action.kind.name(),
                key = %action.event_key,
                %err,
                "action failed"
            );
            let _ = ctx.send_message(&format!(
                "Action {} for '{}' failed: {err}",
                action.kind.name(),
                action.event_key
            ));
        }
    }
}

/// Summon `total` entities: one immediate batch, then scheduler-staggered
/// waves of `wave_size` every `interval_ticks` until done. A failing wave
/// cancels the remaining waves.
#[allow(clippy::too_many_arguments)]
fn summon_in_waves<C: GameContext>(
    sched: &mut TaskScheduler<C>,
    ctx: &mut C,
    entity_type: &str,
    total: u32,
    spread: f32,
    wave_size: u32,
    interval_ticks: u64,
    id_prefix: &str,
) -> Result<()> {
    let wave_size = wave_size.max(1);
    let first = total.min(wave_size);
    ctx.summon_entities(SummonOptions {
        entity_type: entity_type.to_string(),
        count: first,
        spread,
    })?;

    let mut remaining = total - first;
    if remaining == 0 {
        return Ok(());
    }
    let id = sched.unique_task_id(id_prefix);
    let task_id = id.clone();
    let entity_type = entity_type.to_string();
    sched.add_repeating(
        id,
        interval_ticks.max(1),
        Box::new(move |sched, ctx| {
            let batch = remaining.min(wave_size);
            if let Err(err) = ctx.summon_entities(SummonOptions {
                entity_type: entity_type.clone(),
                count: batch,
                spread,
            }) {
                sched.clear(&task_id);
                return Err(err);
            }
            remaining -= batch;
            if remaining == 0 {
                sched.clear(&task_id);
            }
            Ok(())
        }),
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
