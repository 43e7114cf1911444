//! `residents` - CLI for the building resident register
//!
//! Each invocation loads the register, applies one command and exits.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::{bail, Context};
use chrono::Local;
use clap::Parser;

use residents::cli::{
    AddCommand, Cli, Command, ConfigCommand, DeleteCommand, EditCommand, ExportCommand,
    OutputFormat,
};
use residents::export::arabic_short_date;
use residents::{
    init_logging, Config, Error, FormController, HtmlFileExporter, Resident, ResidentForm,
    ResidentStore, Roster, RosterStats, SqliteStore, Submission, TerminalPrompt, FLOORS,
};

type AppRoster = Roster<SqliteStore>;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone())?;

    match cli.command {
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
        Command::Floors => {
            handle_floors();
            Ok(())
        }
        command => {
            let db_path = config.database_path();
            let store = SqliteStore::open(&db_path)
                .with_context(|| format!("cannot open register at {}", db_path.display()))?;
            let mut roster = Roster::open(ResidentStore::new(store, &config.storage.slot_key));

            let result = run(&config, &mut roster, command);
            if !roster.is_persisted() {
                eprintln!(
                    "warning: changes could not be saved to {}; they are lost when this command exits",
                    db_path.display()
                );
            }
            result
        }
    }
}

fn run(config: &Config, roster: &mut AppRoster, command: Command) -> anyhow::Result<()> {
    let mut controller = FormController::new();

    match command {
        Command::List(cmd) => handle_list(roster, cmd.format),
        Command::Add(cmd) => handle_add(&mut controller, roster, &cmd),
        Command::Edit(cmd) => handle_edit(&mut controller, roster, &cmd),
        Command::Delete(cmd) => handle_delete(&mut controller, roster, &cmd),
        Command::Clear(cmd) => {
            let mut prompt = TerminalPrompt::stdio(cmd.yes);
            if !controller.clear_all(roster, &mut prompt) {
                println!("Nothing removed.");
            }
            Ok(())
        }
        Command::Export(cmd) => handle_export(config, &controller, roster, cmd),
        Command::Stats(flag) => handle_stats(roster, flag.json),
        Command::Debug(flag) => {
            let mut prompt = TerminalPrompt::stdio(false);
            let info = controller.debug_info(roster, &mut prompt);
            if flag.json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            }
            Ok(())
        }
        Command::Config(_) | Command::Floors => unreachable!("handled before opening storage"),
    }
}

fn handle_list(roster: &AppRoster, format: OutputFormat) -> anyhow::Result<()> {
    let residents = roster.residents();
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(residents)?),
        OutputFormat::Plain => {
            for (i, r) in residents.iter().enumerate() {
                println!(
                    "{}. {} | {} | {} | {} | {}",
                    i + 1,
                    r.name,
                    r.floor,
                    r.apartment,
                    r.phone,
                    r.notes_or_dash()
                );
            }
        }
        OutputFormat::Table => print_table(residents),
    }
    Ok(())
}

fn print_table(residents: &[Resident]) {
    if residents.is_empty() {
        println!("No residents recorded.");
        return;
    }

    let header = ["#", "الاسم", "الدور", "الشقة", "الهاتف", "ملاحظات"].map(String::from);
    let rows: Vec<[String; 6]> = residents
        .iter()
        .enumerate()
        .map(|(i, r)| {
            [
                (i + 1).to_string(),
                r.name.clone(),
                r.floor.clone(),
                r.apartment.to_string(),
                r.phone.clone(),
                r.notes_or_dash().to_string(),
            ]
        })
        .collect();

    let mut widths = [0usize; 6];
    for row in std::iter::once(&header).chain(&rows) {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    for row in std::iter::once(&header).chain(&rows) {
        let line: Vec<String> = row
            .iter()
            .zip(widths)
            .map(|(cell, width)| {
                let pad = width - cell.chars().count();
                format!("{cell}{}", " ".repeat(pad))
            })
            .collect();
        println!("{}", line.join("  ").trim_end());
    }
    println!();
    println!("إجمالي عدد السكان {}", residents.len());
}

fn handle_add(
    controller: &mut FormController,
    roster: &mut AppRoster,
    cmd: &AddCommand,
) -> anyhow::Result<()> {
    submit(controller, roster, cmd.to_form())
}

fn handle_edit(
    controller: &mut FormController,
    roster: &mut AppRoster,
    cmd: &EditCommand,
) -> anyhow::Result<()> {
    let loaded = controller.begin_edit(roster, cmd.position())?.clone();
    submit(controller, roster, cmd.apply_to(&loaded))
}

fn submit(
    controller: &mut FormController,
    roster: &mut AppRoster,
    form: ResidentForm,
) -> anyhow::Result<()> {
    match controller.submit(roster, form) {
        Ok(submission) => {
            let number = submission.position() + 1;
            match submission {
                Submission::Added { .. } => println!("Added resident #{number}."),
                Submission::Updated { .. } => println!("Updated resident #{number}."),
            }
            Ok(())
        }
        Err(Error::Validation(errors)) => {
            for (field, message) in errors.iter() {
                eprintln!("  {field}: {message}");
            }
            bail!("resident not saved: {} invalid field(s)", errors.len())
        }
        Err(e) => Err(e.into()),
    }
}

fn handle_delete(
    controller: &mut FormController,
    roster: &mut AppRoster,
    cmd: &DeleteCommand,
) -> anyhow::Result<()> {
    let mut prompt = TerminalPrompt::stdio(cmd.yes);
    match controller.delete(roster, cmd.position(), &mut prompt)? {
        Some(removed) => println!("Removed #{} ({}).", cmd.number, removed.name),
        None => println!("Nothing removed."),
    }
    Ok(())
}

fn handle_export(
    config: &Config,
    controller: &FormController,
    roster: &AppRoster,
    cmd: ExportCommand,
) -> anyhow::Result<()> {
    let path = cmd.output.unwrap_or_else(|| config.export_path());
    let mut exporter = HtmlFileExporter::new(path);
    let mut prompt = TerminalPrompt::stdio(false);

    let written = controller.export(
        roster,
        &mut exporter,
        &mut prompt,
        &config.export.title,
        Local::now().date_naive(),
    )?;
    println!("{}", written.display());
    Ok(())
}

fn handle_stats(roster: &AppRoster, json: bool) -> anyhow::Result<()> {
    let stats = RosterStats::compute(roster.residents(), roster.store().last_saved());

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("إجمالي السكان:     {}", stats.total_residents);
    println!("الشقق المشغولة:    {}", stats.occupied_apartments);
    match stats.last_updated {
        Some(at) => println!(
            "آخر تحديث:         {}",
            arabic_short_date(at.with_timezone(&Local).date_naive())
        ),
        None => println!("آخر تحديث:         -"),
    }
    println!();
    for floor in stats.per_floor.iter().filter(|f| f.residents > 0) {
        println!("  {}: {}", floor.floor, floor.residents);
    }
    if stats.unknown_floor > 0 {
        println!("  ?: {}", stats.unknown_floor);
    }
    Ok(())
}

fn handle_floors() {
    for (i, floor) in FLOORS.iter().enumerate() {
        println!("{:>2}  {}", i + 1, floor);
    }
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:  {}", config.database_path().display());
                println!("  Slot key:       {}", config.storage.slot_key);
                println!();
                println!("[Export]");
                println!("  Output path:    {}", config.export_path().display());
                println!("  Title:          {}", config.export.title);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
