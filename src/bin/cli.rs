use std::io::{self, Write};

use tracing_subscriber::EnvFilter;
use vridge_schedule::{
    PhaseDurationConfig, ScheduleResult, calculate_total_duration, format_date,
    generate_auto_schedule, generate_auto_schedule_from, load_schedule_from_csv,
    load_schedule_from_json, parse_date, save_schedule_to_csv, save_schedule_to_json,
};

const HEADERS: [&str; 5] = ["phase", "name", "start_date", "end_date", "duration"];

fn render_schedule_as_text_table(schedule: &ScheduleResult) -> String {
    let rows: Vec<[String; 5]> = schedule
        .phases()
        .iter()
        .map(|p| {
            [
                p.phase.to_string(),
                p.name.clone(),
                format_date(p.start_date),
                format_date(p.end_date),
                p.duration.to_string(),
            ]
        })
        .collect();

    // Widths count chars, so Hangul labels render slightly wider.
    let mut widths: Vec<usize> = HEADERS.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (ci, cell) in row.iter().enumerate() {
            widths[ci] = widths[ci].max(cell.chars().count());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let render_row = |cells: &[&str]| {
        let mut line = String::from("|");
        for (ci, cell) in cells.iter().enumerate() {
            line.push(' ');
            line.push_str(cell);
            line.push_str(&" ".repeat(widths[ci].saturating_sub(cell.chars().count())));
            line.push_str(" |");
        }
        line
    };

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_row(&HEADERS));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in &rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        out.push_str(&render_row(&cells));
        out.push('\n');
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  show                               Show current schedule\n  schedule <YYYY-MM-DD>              Generate a schedule starting on the anchor date\n  total                              Show total duration for the current config\n  config show                        Show phase durations\n  config set <planning> <shooting> <editing>\n                                     Update phase durations (days)\n  config reset                       Restore default durations (7/1/14)\n  add <YYYY-MM-DD> <days>            Print the date <days> later\n  save <json|csv> <path>             Persist current schedule to disk\n  load <json|csv> <path>             Load a schedule from disk\n  quit|exit                          Exit"
    );
}

fn print_config(config: &PhaseDurationConfig) {
    println!("Planning days      : {}", config.planning);
    println!("Shooting days      : {}", config.shooting);
    println!("Editing days       : {}", config.editing);
    match calculate_total_duration(Some(config)) {
        Ok(total) => println!("Total days         : {}", total),
        Err(e) => println!("Total days         : invalid ({})", e),
    }
}

fn print_schedule(schedule: Option<&ScheduleResult>) {
    match schedule {
        Some(schedule) => println!("{}", render_schedule_as_text_table(schedule)),
        None => println!("No schedule yet. Use 'schedule <YYYY-MM-DD>'."),
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let mut config = PhaseDurationConfig::default();
    let mut schedule: Option<ScheduleResult> = None;

    println!("VRidge Schedule (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        io::stdout().flush()?;
        line.clear();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "show" => print_schedule(schedule.as_ref()),
            "schedule" => match parts.next() {
                Some(anchor) => match generate_auto_schedule(anchor, Some(&config)) {
                    Ok(generated) => {
                        println!("Schedule generated ({}).", generated.to_cli_summary());
                        println!("{}", render_schedule_as_text_table(&generated));
                        schedule = Some(generated);
                    }
                    Err(e) => println!("Error: {}", e),
                },
                None => println!("Usage: schedule <YYYY-MM-DD>"),
            },
            "total" => match calculate_total_duration(Some(&config)) {
                Ok(total) => println!("Total duration: {} days", total),
                Err(e) => println!("Error: {}", e),
            },
            "config" => match parts.next() {
                Some("show") => print_config(&config),
                Some("reset") => {
                    config = PhaseDurationConfig::default();
                    println!("Durations reset to defaults.");
                    print_config(&config);
                }
                Some("set") => {
                    let values: Vec<Option<i64>> =
                        parts.by_ref().take(3).map(|v| v.parse::<i64>().ok()).collect();
                    match values.as_slice() {
                        [Some(p), Some(s), Some(e)] => {
                            let candidate = PhaseDurationConfig::new(*p, *s, *e);
                            match candidate.validate() {
                                Ok(()) => {
                                    config = candidate;
                                    println!("Durations updated.");
                                    let anchor = schedule.as_ref().map(|s| s.start_date());
                                    if let Some(anchor) = anchor {
                                        match generate_auto_schedule_from(anchor, Some(&config)) {
                                            Ok(regenerated) => {
                                                println!(
                                                    "{}",
                                                    render_schedule_as_text_table(&regenerated)
                                                );
                                                schedule = Some(regenerated);
                                            }
                                            Err(e) => println!("Error: {}", e),
                                        }
                                    }
                                }
                                Err(e) => println!("Error: {}", e),
                            }
                        }
                        _ => println!("Usage: config set <planning> <shooting> <editing>"),
                    }
                }
                _ => println!("Usage: config <show|set|reset>"),
            },
            "add" => {
                let date_s = parts.next();
                let days_s = parts.next();
                match (date_s, days_s) {
                    (Some(date_s), Some(days_s)) => {
                        let date = match parse_date(date_s) {
                            Ok(d) => d,
                            Err(e) => {
                                println!("Error: {}", e);
                                continue;
                            }
                        };
                        let days: i64 = match days_s.parse() {
                            Ok(v) => v,
                            Err(_) => {
                                println!("Invalid day count");
                                continue;
                            }
                        };
                        println!("{}", format_date(date.add_days(days)));
                    }
                    _ => println!("Usage: add <YYYY-MM-DD> <days>"),
                }
            }
            "save" => {
                let fmt = parts.next();
                let path = parts.next();
                match (fmt, path, schedule.as_ref()) {
                    (_, _, None) => println!("Nothing to save. Generate a schedule first."),
                    (Some(fmt), Some(path), Some(current)) => {
                        let res = match fmt {
                            "json" => save_schedule_to_json(current, path),
                            "csv" => save_schedule_to_csv(current, path),
                            _ => {
                                println!("Unknown format '{}'. Use json or csv.", fmt);
                                continue;
                            }
                        };
                        match res {
                            Ok(()) => println!("Schedule saved to {}", path),
                            Err(e) => println!("Save error: {}", e),
                        }
                    }
                    _ => println!("Usage: save <json|csv> <path>"),
                }
            }
            "load" => {
                let fmt = parts.next();
                let path = parts.next();
                match (fmt, path) {
                    (Some(fmt), Some(path)) => {
                        let res = match fmt {
                            "json" => load_schedule_from_json(path),
                            "csv" => load_schedule_from_csv(path),
                            _ => {
                                println!("Unknown format '{}'. Use json or csv.", fmt);
                                continue;
                            }
                        };
                        match res {
                            Ok(loaded) => {
                                config = loaded.config();
                                println!("Schedule loaded from {}", path);
                                println!("{}", render_schedule_as_text_table(&loaded));
                                schedule = Some(loaded);
                            }
                            Err(e) => println!("Load error: {}", e),
                        }
                    }
                    _ => println!("Usage: load <json|csv> <path>"),
                }
            }
            other => println!("Unknown command '{}'. Type 'help'.", other),
        }
    }
    Ok(())
}
