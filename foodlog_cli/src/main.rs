use clap::{Args, Parser, Subcommand};
use foodlog_core::reports::default_week_start;
use foodlog_core::*;
use serde::Serialize;
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "foodlogr")]
#[command(about = "Food logging with macro tracking and weekly reports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Read configuration from this file instead of the default path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// API key returned by `register`
    #[arg(long, global = true, env = "FOODLOGR_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
}

#[derive(Args)]
struct FoodArgs {
    /// Food name
    #[arg(long)]
    name: String,

    /// Optional details (brand, preparation)
    #[arg(long)]
    description: Option<String>,

    #[arg(long)]
    calories: u32,

    /// Protein in grams
    #[arg(long)]
    protein: f64,

    /// Carbohydrates in grams
    #[arg(long)]
    carbs: f64,

    /// Fat in grams
    #[arg(long)]
    fat: f64,
}

impl From<FoodArgs> for NewFood {
    fn from(args: FoodArgs) -> Self {
        NewFood {
            name: args.name,
            description: args.description,
            calories: args.calories,
            protein: args.protein,
            carbs: args.carbs,
            fat: args.fat,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new user and print the API key (shown once)
    Register {
        #[arg(long)]
        email: String,
    },

    /// Set daily goals and resting energy
    Setup {
        #[arg(long)]
        calories: u32,

        #[arg(long)]
        protein: u32,

        #[arg(long)]
        carbs: u32,

        /// Optional fat goal in grams
        #[arg(long)]
        fat: Option<u32>,

        /// Resting energy expenditure (cal/day)
        #[arg(long)]
        resting_energy: u32,
    },

    /// Show current settings
    Settings,

    /// Log a food entry
    Log {
        #[command(flatten)]
        food: FoodArgs,

        /// Day to log to (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Update fields of a logged entry
    Update {
        entry_id: Uuid,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        calories: Option<u32>,

        #[arg(long)]
        protein: Option<f64>,

        #[arg(long)]
        carbs: Option<f64>,

        #[arg(long)]
        fat: Option<f64>,

        #[arg(long)]
        date: Option<String>,
    },

    /// Delete a logged entry
    Delete {
        entry_id: Uuid,

        #[arg(long)]
        date: Option<String>,
    },

    /// Show today's log with summary
    Today,

    /// Show a specific day's log
    Day {
        /// YYYY-MM-DD
        date: String,
    },

    /// Weekly report (last 7 days by default)
    Week {
        /// First day of the week (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,
    },

    /// Search the food cache by name
    Search { query: String },

    /// Save a food to the cache for quick logging
    CacheAdd {
        #[command(flatten)]
        food: FoodArgs,
    },

    /// Log a cached food
    CacheLog {
        food_id: Uuid,

        #[arg(long)]
        date: Option<String>,
    },

    /// Export logged entries to CSV
    Export {
        /// First day to export (default: 6 days before --end)
        #[arg(long)]
        start: Option<String>,

        /// Last day to export (default: today)
        #[arg(long)]
        end: Option<String>,

        #[arg(long)]
        out: PathBuf,
    },
}

#[derive(Serialize)]
struct Registration {
    api_key: String,
    user_id: String,
    message: String,
}

fn main() -> Result<()> {
    // Initialize logging
    foodlog_core::logging::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| config.data.data_dir.clone());
    tracing::debug!("Using data directory {:?}", data_dir);
    let store = FileStore::new(data_dir);
    let auth = AuthClient::new(&store);

    if let Commands::Register { email } = &cli.command {
        let (api_key, user_id) = auth.register_user(email)?;
        return print_json(&Registration {
            api_key,
            user_id,
            message: "Registration successful! Save your API key - it won't be shown again."
                .into(),
        });
    }

    let api_key = cli.api_key.as_deref().ok_or_else(|| {
        Error::Unauthorized("API key required (--api-key or FOODLOGR_API_KEY)".into())
    })?;
    let user_id = auth.validate_api_key(api_key)?;
    tracing::debug!("Authenticated user {}", foodlog_core::logging::short_id(&user_id));
    let tools = Tools::new(&store, user_id).with_search_limit(config.cache.search_limit);

    run(&tools, cli.command)
}

fn run<S: FoodLogStore>(tools: &Tools<'_, S>, command: Commands) -> Result<()> {
    match command {
        Commands::Register { .. } => Err(Error::Other("register handled before auth".into())),
        Commands::Setup {
            calories,
            protein,
            carbs,
            fat,
            resting_energy,
        } => print_json(&tools.setup_user(UserSettings {
            calorie_goal: calories,
            protein_goal: protein,
            carb_goal: carbs,
            fat_goal: fat,
            resting_energy,
        })?),
        Commands::Settings => print_json(&tools.get_settings()?),
        Commands::Log { food, date } => {
            print_json(&tools.log_food(food.into(), parse_opt_date(date)?)?)
        }
        Commands::Update {
            entry_id,
            name,
            description,
            calories,
            protein,
            carbs,
            fat,
            date,
        } => {
            let update = FoodEntryUpdate {
                name,
                description,
                calories,
                protein,
                carbs,
                fat,
            };
            print_json(&tools.update_food(entry_id, update, parse_opt_date(date)?)?)
        }
        Commands::Delete { entry_id, date } => {
            print_json(&tools.delete_food(entry_id, parse_opt_date(date)?)?)
        }
        Commands::Today => print_json(&tools.get_today()?),
        Commands::Day { date } => print_json(&tools.get_day(&date)?),
        Commands::Week { start } => print_json(&tools.get_weekly_report(parse_opt_date(start)?)?),
        Commands::Search { query } => print_json(&tools.search_cache(&query)?),
        Commands::CacheAdd { food } => print_json(&tools.add_to_cache(food.into())?),
        Commands::CacheLog { food_id, date } => {
            print_json(&tools.log_cached(food_id, parse_opt_date(date)?)?)
        }
        Commands::Export { start, end, out } => {
            let end = parse_opt_date(end)?.unwrap_or_else(|| tools.today());
            let start = parse_opt_date(start)?.unwrap_or_else(|| default_week_start(end));
            print_json(&tools.export_csv(start, end, &out)?)
        }
    }
}

fn parse_opt_date(date: Option<String>) -> Result<Option<chrono::NaiveDate>> {
    date.as_deref().map(parse_log_date).transpose()
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
