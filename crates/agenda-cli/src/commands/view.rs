//! Prioritized, bucketed and today views.

use std::collections::BTreeMap;

use agenda_core::collect_prioritized;
use agenda_core::item::hhmm;

use super::{views, CmdResult, Context, EntryView};

/// Prioritized list with urgency labels. Read-only.
pub fn list(ctx: &Context, days: Option<u32>, json: bool) -> CmdResult {
    let agenda = ctx.agenda()?;
    let today = ctx.today();
    let rows = views(&collect_prioritized(&agenda, today, days), today);

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }
    if rows.is_empty() {
        println!("nothing to do");
    }
    for row in &rows {
        println!("{}", row.line());
    }
    Ok(())
}

/// Full allocation pass, printed as day buckets. The pass is saved.
pub fn plan(ctx: &Context, json: bool) -> CmdResult {
    let planner = ctx.planner()?;
    let mut agenda = ctx.agenda()?;
    let today = ctx.today();

    let output = {
        let buckets = planner.bucketed(&mut agenda, ctx.now);
        if json {
            let keyed: BTreeMap<_, Vec<EntryView>> = buckets
                .iter()
                .map(|(bucket, entries)| (*bucket, views(entries, today)))
                .collect();
            serde_json::to_string_pretty(&keyed)?
        } else {
            let mut lines = Vec::new();
            for (bucket, entries) in &buckets {
                lines.push(format!("== {bucket} ({})", entries.len()));
                lines.extend(views(entries, today).iter().map(EntryView::line));
            }
            lines.join("\n")
        }
    };
    ctx.save(&agenda)?;
    println!("{output}");
    Ok(())
}

/// Today's events and placements in start order. The pass is saved.
pub fn today(ctx: &Context, json: bool) -> CmdResult {
    let planner = ctx.planner()?;
    let mut agenda = ctx.agenda()?;
    let today = ctx.today();

    let output = {
        let rows = views(&planner.today_plan(&mut agenda, ctx.now), today);
        if json {
            serde_json::to_string_pretty(&rows)?
        } else if rows.is_empty() {
            format!("nothing planned for {today}")
        } else {
            let mut lines = vec![format!("{today} (now {})", hhmm::format(ctx.now.time()))];
            lines.extend(rows.iter().map(EntryView::line));
            lines.join("\n")
        }
    };
    ctx.save(&agenda)?;
    println!("{output}");
    Ok(())
}
