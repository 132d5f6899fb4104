use clap::{Parser, Subcommand, ValueEnum};
use lmeter_cli::commands;
use lmeter_cli::logging;
use lmeter_cli::readline;
use lmeter_cli::CliContext;
use lmeter_core::ConfigStore;
use lmeter_core::types::{ConnectionStatus, MeterDataType};
use std::io::Write;

fn main() -> Result<(), String> {
    logging::init();

    let store = match std::env::var_os("LMETER_CONFIG") {
        Some(path) => ConfigStore::new(path),
        None => ConfigStore::default_location(),
    };
    let mut ctx = CliContext::new(store);

    loop {
        let line = readline()?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match respond(line, &mut ctx) {
            Ok(quit) => {
                if quit {
                    break;
                }
            }
            Err(err) => {
                writeln!(std::io::stdout(), "{err}").map_err(|e| e.to_string())?;
                std::io::stdout().flush().map_err(|e| e.to_string())?;
            }
        }
    }

    Ok(())
}

#[derive(Parser)]
#[command(version, about = "lmeter shell")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Metric {
    Damage,
    Healing,
    DamageTaken,
}

impl From<Metric> for MeterDataType {
    fn from(metric: Metric) -> Self {
        match metric {
            Metric::Damage => MeterDataType::Damage,
            Metric::Healing => MeterDataType::Healing,
            Metric::DamageTaken => MeterDataType::DamageTaken,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Status {
    Disconnected,
    Connecting,
    Connected,
    ShuttingDown,
    Failed,
}

impl From<Status> for ConnectionStatus {
    fn from(status: Status) -> Self {
        match status {
            Status::Disconnected => ConnectionStatus::Disconnected,
            Status::Connecting => ConnectionStatus::Connecting,
            Status::Connected => ConnectionStatus::Connected,
            Status::ShuttingDown => ConnectionStatus::ShuttingDown,
            Status::Failed => ConnectionStatus::Failed,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Flag {
    Combat,
    Duty,
    Performing,
    Pvp,
    GoldenSaucer,
    FieldOperation,
}

#[derive(Subcommand)]
enum Commands {
    List,
    Add {
        name: String,
    },
    Remove {
        name: String,
    },
    Preview {
        name: String,
        #[arg(long)]
        off: bool,
    },
    Metric {
        name: String,
        metric: Metric,
    },
    /// Render every visible meter
    Draw,
    Scroll {
        name: String,
        #[arg(allow_negative_numbers = true)]
        delta: i32,
    },
    Menu {
        name: String,
    },
    /// Pick a context menu entry by key (`current`, an event index, `clear`, `configure`)
    Choose {
        name: String,
        key: String,
    },
    Clear,
    Jobs {
        name: String,
        jobs: String,
        #[arg(short, long, default_value_t = 0)]
        option: usize,
    },
    Export {
        name: String,
        #[arg(short, long)]
        page: Option<String>,
    },
    Import {
        blob: Option<String>,
        /// Import a single page into this meter
        #[arg(short, long)]
        into: Option<String>,
    },
    Set {
        flag: Flag,
        #[arg(action = clap::ArgAction::Set)]
        value: bool,
    },
    Player {
        name: Option<String>,
    },
    Job {
        job: String,
    },
    Status {
        status: Status,
    },
    Occlude {
        #[arg(num_args = 4, value_names = ["X", "Y", "W", "H"])]
        rect: Option<Vec<f32>>,
    },
    Publish {
        title: String,
        #[arg(short, long, default_value_t = 60)]
        seconds: u64,
    },
    End,
    Feed,
    Config,
    Save,
    Exit,
}

fn respond(line: &str, ctx: &mut CliContext) -> Result<bool, String> {
    let mut args = shlex::split(line).ok_or("error: Invalid quoting")?;
    args.insert(0, "lmeter".to_string());
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;

    match cli.command {
        Some(Commands::List) => commands::list_meters(ctx),
        Some(Commands::Add { name }) => commands::add_meter(ctx, &name)?,
        Some(Commands::Remove { name }) => commands::remove_meter(ctx, &name)?,
        Some(Commands::Preview { name, off }) => commands::set_preview(ctx, &name, !off)?,
        Some(Commands::Metric { name, metric }) => {
            commands::set_metric(ctx, &name, metric.into())?
        }
        Some(Commands::Draw) => commands::draw(ctx),
        Some(Commands::Scroll { name, delta }) => commands::scroll(ctx, &name, delta)?,
        Some(Commands::Menu { name }) => commands::show_menu(ctx, &name)?,
        Some(Commands::Choose { name, key }) => commands::choose(ctx, &name, &key)?,
        Some(Commands::Clear) => commands::clear(ctx),
        Some(Commands::Jobs { name, jobs, option }) => {
            commands::set_jobs(ctx, &name, option, &jobs)?
        }
        Some(Commands::Export { name, page }) => commands::export(ctx, &name, page.as_deref()),
        Some(Commands::Import { blob, into }) => {
            commands::import(ctx, blob.as_deref(), into.as_deref())
        }
        Some(Commands::Set { flag, value }) => {
            let env = &mut ctx.env;
            match flag {
                Flag::Combat => env.in_combat = value,
                Flag::Duty => env.in_duty = value,
                Flag::Performing => env.performing = value,
                Flag::Pvp => env.in_pvp = value,
                Flag::GoldenSaucer => env.in_golden_saucer = value,
                Flag::FieldOperation => env.in_field_operation = value,
            }
        }
        Some(Commands::Player { name }) => ctx.env.player_name = name,
        Some(Commands::Job { job }) => {
            ctx.env.job = job.parse().map_err(|e: lmeter_core::types::ParseJobError| e.to_string())?
        }
        Some(Commands::Status { status }) => commands::set_status(ctx, status.into()),
        Some(Commands::Occlude { rect }) => {
            let rect = rect.and_then(|r| <[f32; 4]>::try_from(r).ok());
            commands::occlude(ctx, rect)
        }
        Some(Commands::Publish { title, seconds }) => commands::publish(ctx, &title, seconds),
        Some(Commands::End) => commands::end_encounter(ctx),
        Some(Commands::Feed) => commands::show_feed(ctx),
        Some(Commands::Config) => commands::show_config(ctx)?,
        Some(Commands::Save) => commands::save(ctx)?,
        Some(Commands::Exit) => {
            commands::exit()?;
            return Ok(true);
        }
        None => {}
    }
    Ok(false)
}
