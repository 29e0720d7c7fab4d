//! Employee Attrition Prediction CLI
//!
//! Assembles an employee record from form values and asks the pre-trained SVC
//! pipeline whether the employee is likely to leave.

use clap::{Parser, Subcommand};
use attrition::predict::OutputFormat;
use attrition::{Config, Result};

#[derive(Parser)]
#[command(name = "attrition")]
#[command(about = "Employee attrition prediction from a pre-trained SVC pipeline", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict attrition for one employee
    Predict {
        /// Field value, e.g. --set Age=30 --set "Department=Research & Development"
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        set: Vec<String>,
        /// TOML file of field values (applied before --set)
        #[arg(long)]
        input: Option<String>,
        /// Output format
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },
    /// Fill in the form interactively
    Session,
    /// List the form controls and the values they accept
    Form,
    /// Model management commands
    Model {
        #[command(subcommand)]
        action: ModelCommands,
    },
    /// Write a default config file
    Init,
}

#[derive(Subcommand)]
enum ModelCommands {
    /// Show artifact information
    Info,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load or create config
    let config = if std::path::Path::new(&cli.config).exists() {
        match Config::load(&cli.config) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        Config::default()
    };

    let result = match cli.command {
        Commands::Predict { set, input, format } => commands::predict(&config, set, input, format),
        Commands::Session => commands::session(&config),
        Commands::Form => commands::form(),
        Commands::Model { action } => match action {
            ModelCommands::Info => commands::model_info(&config),
        },
        Commands::Init => commands::init(&cli.config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

mod commands {
    use super::*;
    use attrition::features::UserInput;
    use attrition::form::{self, CONTROLS};
    use attrition::model::{Classifier, SvcPipeline};
    use attrition::predict::{self as predict_mod, InferenceService};
    use attrition::session::{self, Session};
    use burn::backend::NdArray;

    type InferenceBackend = NdArray<f32>;

    /// Load the artifact once; a failure here is fatal
    fn load_service(config: &Config) -> Result<InferenceService<SvcPipeline<InferenceBackend>>> {
        let device = Default::default();
        let pipeline = SvcPipeline::<InferenceBackend>::load(&config.data.model_path, device)?;
        Ok(InferenceService::new(pipeline))
    }

    pub fn init(config_path: &str) -> Result<()> {
        let config = Config::default();
        config.save(config_path)?;
        println!("Created default config at {}", config_path);

        println!("\nNext steps:");
        println!("  1. Point data.model_path in {} at your exported artifact", config_path);
        println!("  2. Run 'attrition form' to see the accepted values");
        println!("  3. Run 'attrition predict --set Age=30 --set OverTime=Yes'");

        Ok(())
    }

    pub fn predict(
        config: &Config,
        set: Vec<String>,
        input: Option<String>,
        format: OutputFormat,
    ) -> Result<()> {
        let service = load_service(config)?;

        let mut user = UserInput::new();
        if let Some(path) = input {
            let content = std::fs::read_to_string(&path)?;
            user.extend(form::parse_input_table(&content)?);
        }
        user.extend(form::parse_assignments(set.iter().map(String::as_str))?);
        log::debug!("{} field(s) supplied, the rest come from defaults", user.len());

        let (record, result) = service.predict_input(&user)?;
        let text = predict_mod::render(format, &record, &result, &config.display)?;
        println!("{}", text);

        Ok(())
    }

    pub fn session(config: &Config) -> Result<()> {
        let service = load_service(config)?;
        let mut session = Session::new(&service);

        let stdin = std::io::stdin();
        let mut stdout = std::io::stdout();
        session::run(&mut session, stdin.lock(), &mut stdout, &config.display)
    }

    pub fn form() -> Result<()> {
        println!("Form Controls");
        println!("───────────────────────────────");
        for control in CONTROLS {
            println!(
                "  {:<26} {:<28} initial: {}",
                control.field,
                control.label,
                control.display_value(&control.initial_value())
            );
            println!("  {:<26} {}", "", control.describe());
        }
        println!("\nFields not on the form are filled from the median/mode defaults.");
        Ok(())
    }

    pub fn model_info(config: &Config) -> Result<()> {
        let service = load_service(config)?;
        let pipeline = service.classifier();

        println!("Model Information");
        println!("───────────────────────────────");
        println!("  Path:            {}", config.data.model_path);
        println!("  Name:            {}", pipeline.name());
        println!("  Classes:         {}", pipeline.classes().join(", "));
        println!("  Kernel:          {}", pipeline.kernel());
        println!("  Support vectors: {}", pipeline.n_support());
        println!("  Input columns:   {}", pipeline.feature_names().count());
        println!("  Encoded width:   {}", pipeline.encoded_width());

        Ok(())
    }
}
