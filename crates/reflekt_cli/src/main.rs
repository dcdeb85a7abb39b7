//! Command-line front end for the journal core.
//!
//! # Responsibility
//! - Load `.env` and `REFLEKT_*` settings, open the SQLite journal.
//! - Expose list/search/calendar/export/add over one owner's entries.
//!
//! Usage:
//!   reflekt ping | version
//!   reflekt list <owner>
//!   reflekt search <owner> <query>
//!   reflekt calendar <owner> [YYYY-MM]
//!   reflekt export <json|md> <owner> [dir]
//!   reflekt add <owner> <title> <content> [mood]

use chrono::{Local, NaiveDate, Timelike};
use reflekt_core::search::SearchOptions;
use reflekt_core::service::{ErrorInfo, ServiceResponse};
use reflekt_core::view::calendar::{month_grid, CalendarCell, CalendarMonth};
use reflekt_core::view::dates::{greeting_for_hour, relative_date_label};
use reflekt_core::{
    AppConfig, Entry, EntryDraft, EntryService, ExportFormat, Mood, SqliteEntryRepository,
};
use std::error::Error;
use std::process::ExitCode;

type CliResult<T> = Result<T, Box<dyn Error>>;

const USAGE: &str = "usage: reflekt <ping|version|list|search|calendar|export|add> [args]";

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("reflekt: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> CliResult<()> {
    let Some(command) = args.first() else {
        return Err(USAGE.into());
    };

    match command.as_str() {
        "ping" => {
            println!("reflekt_core ping={}", reflekt_core::ping());
            Ok(())
        }
        "version" => {
            println!("reflekt_core version={}", reflekt_core::core_version());
            Ok(())
        }
        _ => run_with_journal(command, &args[1..]),
    }
}

fn run_with_journal(command: &str, args: &[String]) -> CliResult<()> {
    let config = AppConfig::from_env()?;
    reflekt_core::init_from_config(&config)?;
    log::info!("event=cli_command module=cli status=start command={command}");

    let conn = reflekt_core::open_db(&config.db_path)?;
    let service = EntryService::new(SqliteEntryRepository::try_new(&conn)?);

    match (command, args) {
        ("list", [owner]) => {
            let entries = into_data(service.list_entries(owner))?;
            println!(
                "{}. {} entries.",
                greeting_for_hour(Local::now().hour()),
                entries.len()
            );
            print_entries(&entries);
        }
        ("search", [owner, query]) => {
            let entries = into_data(service.search_entries(owner, query, &SearchOptions::quick()))?;
            print_entries(&entries);
        }
        ("calendar", [owner, rest @ ..]) if rest.len() <= 1 => {
            let today = Local::now().date_naive();
            let month = match rest.first() {
                Some(value) => parse_month(value)?,
                None => CalendarMonth::containing(today),
            };
            let groups = into_data(service.calendar(owner))?;
            print_month(month, &month_grid(month, &groups, today));
        }
        ("export", [format, owner, rest @ ..]) if rest.len() <= 1 => {
            let format = ExportFormat::parse(format)
                .ok_or_else(|| format!("unknown export format `{format}`; expected json|md"))?;
            let today = Local::now().date_naive();
            let document = into_data(service.export(owner, format, &config.export_prefix, today))?
                .ok_or("export produced no document")?;
            let dir = rest.first().map(String::as_str).unwrap_or(".");
            let path = document.write_to_dir(dir)?;
            println!("wrote {}", path.display());
        }
        ("add", [owner, title, content, rest @ ..]) if rest.len() <= 1 => {
            let mood = match rest.first() {
                Some(value) => Mood::parse(value).ok_or_else(|| format!("unknown mood `{value}`"))?,
                None => Mood::default(),
            };
            let draft = EntryDraft::new(title.as_str(), content.as_str()).with_mood(mood);
            let entry = into_data(service.create_entry(owner, &draft))?
                .ok_or("create returned no entry")?;
            println!("created {}", entry.id);
        }
        _ => return Err(USAGE.into()),
    }
    Ok(())
}

fn into_data<T>(response: ServiceResponse<T>) -> CliResult<T> {
    response
        .into_result()
        .map_err(|ErrorInfo { code, message }| format!("{code}: {message}").into())
}

fn parse_month(value: &str) -> CliResult<CalendarMonth> {
    let date = NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d")
        .map_err(|_| format!("invalid month `{value}`; expected YYYY-MM"))?;
    Ok(CalendarMonth::containing(date))
}

fn print_entries(entries: &[Entry]) {
    for entry in entries {
        println!(
            "{}  {:<10} {:<10} {}",
            entry.id,
            relative_date_label(&entry.created_at),
            entry.mood.as_str(),
            entry.display_title()
        );
    }
}

fn print_month(month: CalendarMonth, cells: &[CalendarCell]) {
    println!("{}", month.label());
    println!(" Su  Mo  Tu  We  Th  Fr  Sa");
    for week in cells.chunks(7) {
        let line = week
            .iter()
            .map(|cell| {
                let marker = if cell.is_today {
                    '*'
                } else if cell.has_entries {
                    '+'
                } else {
                    ' '
                };
                if cell.current {
                    format!("{:>3}{marker}", cell.day)
                } else {
                    "    ".to_string()
                }
            })
            .collect::<String>();
        println!("{}", line.trim_end());
    }
}
