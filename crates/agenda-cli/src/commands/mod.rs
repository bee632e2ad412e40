pub mod config;
pub mod event;
pub mod lesson;
pub mod slot;
pub mod task;
pub mod view;

use std::path::PathBuf;

use agenda_core::item::hhmm;
use agenda_core::{Agenda, AgendaEntry, AgendaStore, Config, Planner};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use tracing::debug;

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Store, preferences and clock shared by the item commands.
pub struct Context {
    pub store: AgendaStore,
    pub config: Config,
    pub now: NaiveDateTime,
}

impl Context {
    pub fn load(
        file: Option<PathBuf>,
        now: Option<NaiveDateTime>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let store = match file {
            Some(path) => AgendaStore::new(path),
            None => AgendaStore::default_location()?,
        };
        let now = now.unwrap_or_else(|| Local::now().naive_local());
        debug!(file = %store.path().display(), %now, "context loaded");
        Ok(Self {
            store,
            config: Config::load()?,
            now,
        })
    }

    pub fn today(&self) -> NaiveDate {
        self.now.date()
    }

    pub fn planner(&self) -> Result<Planner, Box<dyn std::error::Error>> {
        Ok(Planner::new(self.config.scheduler_config()?))
    }

    pub fn agenda(&self) -> Result<Agenda, Box<dyn std::error::Error>> {
        Ok(self.store.load()?)
    }

    pub fn save(&self, agenda: &Agenda) -> CmdResult {
        self.store.save(agenda)?;
        Ok(())
    }
}

/// `--now` format: `YYYY-MM-DDTHH:MM`.
pub fn parse_now(value: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .map_err(|e| format!("expected YYYY-MM-DDTHH:MM: {e}"))
}

pub fn parse_time(value: &str) -> Result<NaiveTime, String> {
    hhmm::parse(value).ok_or_else(|| format!("expected HH:MM, got '{value}'"))
}

/// One item as printed by the view commands.
#[derive(Serialize)]
pub struct EntryView {
    pub kind: String,
    pub index: usize,
    pub title: String,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    pub label: String,
    pub duration_minutes: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planned_date: Option<NaiveDate>,
}

impl EntryView {
    pub fn new(entry: &AgendaEntry<'_>, today: NaiveDate) -> Self {
        let item = entry.item;
        let schedule = item.schedule();
        Self {
            kind: entry.id.kind.to_string(),
            index: entry.id.index,
            title: item.title().to_string(),
            date: item.priority_date(),
            time: item.priority_time().map(hhmm::format),
            label: item.priority_label(today).to_string(),
            duration_minutes: item.duration_minutes(),
            start_time: schedule.start_time().map(hhmm::format),
            end_time: schedule.end_time().map(hhmm::format),
            planned_date: schedule.planned_date(),
        }
    }

    pub fn line(&self) -> String {
        let slot = match (&self.start_time, &self.end_time) {
            (Some(start), Some(end)) => match self.planned_date {
                Some(date) if date != self.date => format!("  {date} {start}-{end}"),
                _ => format!("  {start}-{end}"),
            },
            _ => "  unscheduled".to_string(),
        };
        format!(
            "[{}#{}] {:<10} {} ({}){}",
            self.kind, self.index, self.label, self.title, self.date, slot
        )
    }
}

pub fn views(entries: &[AgendaEntry<'_>], today: NaiveDate) -> Vec<EntryView> {
    entries.iter().map(|e| EntryView::new(e, today)).collect()
}
