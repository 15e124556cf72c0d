use clap::Parser;
use dietgen::{
    logger::{self, LoggerConfig, LogLevel},
    models::{COMMON_CONDITIONS, AGE_RANGE, HEIGHT_RANGE_IN, WEIGHT_RANGE_KG},
    render::{render_plan, ReportFormat},
    DietPlanEngine, DietaryHabit, GeneratorConfig, Profile,
};
use std::path::PathBuf;
use std::process::ExitCode;

/// Generate a personalized daily diet plan with a Hugging Face hosted model.
#[derive(Debug, Parser)]
#[command(name = "dietgen", version)]
struct Cli {
    /// Age in years
    #[arg(long, required_unless_present = "options")]
    age: Option<u32>,

    /// Weight in kg
    #[arg(long, required_unless_present = "options")]
    weight: Option<f64>,

    /// Height in inches
    #[arg(long, required_unless_present = "options")]
    height: Option<u32>,

    /// Nationality or cuisine preference (defaults to Indian)
    #[arg(long)]
    nationality: Option<String>,

    /// vegetarian, non-vegetarian, or both
    #[arg(long, default_value = "both")]
    habit: String,

    /// Comma-separated health conditions
    #[arg(long, value_delimiter = ',')]
    conditions: Vec<String>,

    /// Hugging Face model id (defaults to DIETGEN_MODEL or the built-in default)
    #[arg(long)]
    model: Option<String>,

    /// Hugging Face API token (falls back to HUGGINGFACE_API_TOKEN)
    #[arg(long)]
    token: Option<String>,

    #[arg(long)]
    max_new_tokens: Option<u32>,

    /// Print the plan as JSON instead of a report
    #[arg(long)]
    json: bool,

    /// Write the printed output to this file
    #[arg(long, conflicts_with = "save_default")]
    save: Option<PathBuf>,

    /// Write the printed output to diet_plan_<timestamp>.txt (.json with --json)
    #[arg(long)]
    save_default: bool,

    /// Show supported habits, common conditions, and input ranges
    #[arg(long)]
    options: bool,

    #[arg(short, long)]
    verbose: bool,
}

fn print_options() {
    println!("Food habits:");
    for habit in DietaryHabit::ALL {
        println!("   • {}", habit);
    }
    println!("Common health conditions:");
    for condition in COMMON_CONDITIONS {
        println!("   • {}", condition);
    }
    println!("Age range: {}-{} years", AGE_RANGE.0, AGE_RANGE.1);
    println!("Weight range: {}-{} kg", WEIGHT_RANGE_KG.0, WEIGHT_RANGE_KG.1);
    println!("Height range: {}-{} inches", HEIGHT_RANGE_IN.0, HEIGHT_RANGE_IN.1);
}

fn build_profile(cli: &Cli) -> Result<Profile, String> {
    let (Some(age), Some(weight), Some(height)) = (cli.age, cli.weight, cli.height) else {
        return Err("--age, --weight, and --height are required".to_string());
    };
    let profile = Profile::new(age, weight, height)
        .map_err(|e| e.to_string())?
        .with_nationality(cli.nationality.as_deref())
        .with_habit(DietaryHabit::parse_or_default(&cli.habit))
        .with_conditions(&cli.conditions);
    Ok(profile)
}

#[tokio::main]
async fn main() -> ExitCode {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    let cli = Cli::parse();
    let level = if cli.verbose { LogLevel::Debug } else { LogLevel::Info };
    if let Err(e) = logger::init_with_config(LoggerConfig::new().with_level(level)) {
        eprintln!("{}", e);
    }
    if !dotenv_loaded {
        log::debug!("No .env file found, using process environment");
    }

    if cli.options {
        print_options();
        return ExitCode::SUCCESS;
    }

    let profile = match build_profile(&cli) {
        Ok(profile) => profile,
        Err(e) => {
            log::error!("❌ Invalid profile: {}", e);
            return ExitCode::from(2);
        }
    };
    log::info!("✅ Profile: {}", profile);

    let mut config = GeneratorConfig::from_env();
    if let Some(model) = &cli.model {
        config = config.with_model(model.as_str());
    }
    if let Some(max_new_tokens) = cli.max_new_tokens {
        config = config.with_max_new_tokens(max_new_tokens);
    }
    logger::log_config_info(&config);

    let engine = match DietPlanEngine::new(config) {
        Ok(engine) => engine,
        Err(e) => {
            log::error!("❌ {}", e);
            return ExitCode::FAILURE;
        }
    };

    let plan = {
        let _timer = logger::timer("diet plan generation");
        engine.generate_default(&profile, cli.token.as_deref()).await
    };
    let plan = match plan {
        Ok(plan) => plan,
        Err(e) => {
            log::error!("❌ Failed to generate diet plan ({}): {}", e.kind, e);
            return ExitCode::FAILURE;
        }
    };

    let format = if cli.json { ReportFormat::Json } else { ReportFormat::Text };
    let output = match render_plan(&profile, &plan, &engine.config().model, format) {
        Ok(output) => output,
        Err(e) => {
            log::error!("❌ Failed to serialize plan: {}", e);
            return ExitCode::FAILURE;
        }
    };
    println!("{}", output);

    let extension = if cli.json { "json" } else { "txt" };
    let save_path = cli.save.clone().or_else(|| {
        cli.save_default.then(|| {
            PathBuf::from(format!(
                "diet_plan_{}.{}",
                chrono::Local::now().format("%Y%m%d_%H%M%S"),
                extension
            ))
        })
    });
    if let Some(path) = save_path {
        match std::fs::write(&path, &output) {
            Ok(()) => log::info!("💾 Diet plan saved to {}", path.display()),
            Err(e) => {
                log::error!("❌ Failed to save {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
