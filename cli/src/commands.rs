use lmeter_core::codec;
use lmeter_core::types::{ConnectionStatus, JobType, MeterDataType, VisibilityOption};
use lmeter_core::{
    ClipRect, Clipboard, CombatFeed, CustomJobEditor, EncounterInfo, FrameSink, LIVE_EVENT, MenuAction,
    MeterFrame, NoFonts, Snapshot,
};
use std::io::Write;

use crate::context::CliContext;

/// Prints frames as plain text tables
struct TextSink;

impl FrameSink for TextSink {
    fn draw_frame(&mut self, frame: &MeterFrame) {
        let header = match (&frame.title, &frame.duration) {
            (Some(title), Some(duration)) => format!("{title} ({duration})"),
            _ => "No data".to_string(),
        };
        let preview = if frame.preview { " [preview]" } else { "" };
        println!(
            "== {} #{}{} : {} ({}) at {:?}",
            frame.name,
            frame.window_id,
            preview,
            header,
            frame.data_type.rate_label(),
            frame.position
        );

        for bar in &frame.bars.bars {
            let share = if frame.bars.top > 0.0 {
                bar.value / frame.bars.top * 100.0
            } else {
                0.0
            };
            println!(
                "{:>3}  {:<28} {:<4} {:>12.0} {:>5.1}%",
                bar.rank,
                bar.display_name(),
                bar.combatant.job,
                bar.value,
                share
            );
        }
        if frame.bars.total > frame.bars.bars.len() {
            println!(
                "     ({} of {} shown, scroll {})",
                frame.bars.bars.len(),
                frame.bars.total,
                frame.bars.scroll
            );
        }
    }
}

pub fn list_meters(ctx: &CliContext) {
    let meters = ctx.manager.meters();
    if meters.is_empty() {
        println!("No meters configured");
        return;
    }

    println!("{:<24} {:<14} {:<12} {:>5}", "Name", "Metric", "State", "Bars");
    println!("{}", "-".repeat(58));
    for meter in meters {
        println!(
            "{:<24} {:<14} {:<12} {:>5}",
            meter.name(),
            format!("{:?}", meter.config.general.data_type),
            format!("{:?}", meter.state()),
            meter.config.bars.bar_count
        );
    }
}

pub fn add_meter(ctx: &mut CliContext, name: &str) -> Result<(), String> {
    ctx.manager.add_meter(name)?;
    println!("Added meter '{name}'");
    Ok(())
}

pub fn remove_meter(ctx: &mut CliContext, name: &str) -> Result<(), String> {
    ctx.manager.remove_meter(name)?;
    println!("Removed meter '{name}'");
    Ok(())
}

pub fn set_preview(ctx: &mut CliContext, name: &str, on: bool) -> Result<(), String> {
    let meter = ctx.manager.meter_mut(name).ok_or("Meter not found")?;
    meter.set_preview(on);
    Ok(())
}

pub fn set_metric(ctx: &mut CliContext, name: &str, data_type: MeterDataType) -> Result<(), String> {
    let meter = ctx.manager.meter_mut(name).ok_or("Meter not found")?;
    meter.config.general.data_type = data_type;
    Ok(())
}

pub fn draw(ctx: &mut CliContext) {
    let drawn = ctx.manager.draw(
        &ctx.env,
        &ctx.feed,
        &ctx.occluders,
        &NoFonts,
        &mut TextSink,
        [0.0, 0.0],
    );
    if drawn == 0 {
        println!("No visible meters");
    }
}

pub fn scroll(ctx: &mut CliContext, name: &str, delta: i32) -> Result<(), String> {
    let meter = ctx.manager.meter_mut(name).ok_or("Meter not found")?;
    meter.on_mouse_wheel(delta);
    Ok(())
}

pub fn show_menu(ctx: &CliContext, name: &str) -> Result<(), String> {
    let meter = ctx.manager.meter(name).ok_or("Meter not found")?;
    for entry in meter.menu_entries(&ctx.feed) {
        let key = match entry.action {
            MenuAction::Current => "current".to_string(),
            MenuAction::Event(index) => index.to_string(),
            MenuAction::Clear => "clear".to_string(),
            MenuAction::Configure => "configure".to_string(),
        };
        println!("{key:>10}  {}", entry.label);
    }
    Ok(())
}

/// Apply a context menu choice by its key from `menu`
pub fn choose(ctx: &mut CliContext, name: &str, key: &str) -> Result<(), String> {
    let action = match key {
        "current" => MenuAction::Current,
        "clear" => MenuAction::Clear,
        "configure" => MenuAction::Configure,
        other => other
            .parse::<i32>()
            .map_err(|_| format!("Unknown menu entry '{other}'"))
            .map(|index| match usize::try_from(index) {
                Ok(index) => MenuAction::Event(index),
                Err(_) => MenuAction::Current,
            })?,
    };
    ctx.manager.handle_menu(name, action, &mut ctx.feed)?;

    if let Some(meter) = ctx.manager.configuring() {
        println!("Configuring '{}'", meter.name());
        for page in meter.pages() {
            println!("  {}", page.title());
        }
        ctx.manager.close_configuration();
    }
    Ok(())
}

pub fn clear(ctx: &mut CliContext) {
    ctx.manager.clear(&mut ctx.feed);
    println!("Cleared combat data");
}

/// Restrict a meter to a custom job list, creating a visibility option if needed
pub fn set_jobs(ctx: &mut CliContext, name: &str, option: usize, jobs: &str) -> Result<(), String> {
    let meter = ctx.manager.meter_mut(name).ok_or("Meter not found")?;
    let options = &mut meter.config.visibility2.options;
    if options.is_empty() {
        options.push(VisibilityOption {
            name: "Default".to_string(),
            ..Default::default()
        });
    }
    let rules = &mut options.get_mut(option).ok_or("Visibility option not found")?.rules;

    let mut editor = CustomJobEditor::new();
    editor.set_pending(jobs);
    editor.commit(rules).map_err(|e| e.to_string())?;
    rules.show_for_job_types = JobType::Custom;
    println!("Showing '{name}' for {}", rules.custom_job_string);
    Ok(())
}

pub fn export(ctx: &mut CliContext, name: &str, page: Option<&str>) {
    let note = match page {
        Some(page) => ctx.manager.export_page(name, page, &mut ctx.clipboard),
        None => ctx.manager.export_meter(name, &mut ctx.clipboard),
    };
    println!("{note}");
    if !note.is_error()
        && let Some(text) = ctx.clipboard.text()
    {
        println!("{text}");
    }
}

/// Import from `blob`, or from the clipboard when no blob is given
pub fn import(ctx: &mut CliContext, blob: Option<&str>, into: Option<&str>) {
    let blob = blob
        .map(str::to_string)
        .or_else(|| ctx.clipboard.text())
        .unwrap_or_default();
    let note = match into {
        Some(name) => ctx.manager.import_page(name, &blob),
        None => ctx.manager.import_meter(&blob),
    };
    println!("{note}");
}

pub fn set_status(ctx: &mut CliContext, status: ConnectionStatus) {
    ctx.feed.set_status(status);
}

pub fn occlude(ctx: &mut CliContext, rect: Option<[f32; 4]>) {
    match rect {
        Some([x, y, w, h]) => ctx.occluders.rects.push(ClipRect {
            min: [x, y],
            max: [x + w, y + h],
        }),
        None => ctx.occluders.rects.clear(),
    }
}

/// Publish demo data as the live snapshot
pub fn publish(ctx: &mut CliContext, title: &str, duration_secs: u64) {
    ctx.published += 1;
    let round = ctx.published;

    let mut snapshot = Snapshot::preview().with_encounter(EncounterInfo::new(title, duration_secs));
    for combatant in snapshot.combatants.values_mut() {
        let spread = combatant.name.len() as u32 + round;
        let factor = 1.0 + f64::from(spread % 7) * 0.04;
        combatant.damage_total = combatant.damage_total.map(|v| v * factor);
        combatant.effective_healing = combatant.effective_healing.map(|v| v * factor);
    }

    let live = ctx.feed.publish(snapshot);
    println!(
        "Published '{title}' with {} combatants at {}",
        live.combatants.len(),
        live.timestamp.format("%H:%M:%S%.3f")
    );
}

pub fn end_encounter(ctx: &mut CliContext) {
    ctx.feed.end_encounter();
    println!("{} past encounters", ctx.feed.past_events().len());
}

pub fn show_feed(ctx: &CliContext) {
    println!("Status: {:?}", ctx.feed.status());
    match ctx.feed.event(LIVE_EVENT) {
        Some(live) => println!("Live: {} combatants", live.combatants.len()),
        None => println!("Live: none"),
    }
    println!("History: {}", ctx.feed.past_events().len());
}

pub fn show_config(ctx: &CliContext) -> Result<(), String> {
    let text = codec::to_config_text(&ctx.manager.config()).map_err(|e| e.to_string())?;
    println!("{text}");
    Ok(())
}

pub fn save(ctx: &CliContext) -> Result<(), String> {
    ctx.manager.save().map_err(|e| e.to_string())?;
    println!("Saved to {}", ctx.manager.store().path().display());
    Ok(())
}

pub fn exit() -> Result<(), String> {
    write!(std::io::stdout(), "quitting...").map_err(|e| e.to_string())?;
    std::io::stdout().flush().map_err(|e| e.to_string())
}
