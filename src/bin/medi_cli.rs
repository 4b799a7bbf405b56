use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use structopt::StructOpt;

use medinnovate::accounts::{
    AccountRegistrar, AuthOutcome, AuthenticationService, RegistrationOutcome,
};
use medinnovate::alerting::AlertDispatcher;
use medinnovate::assistant::{Assistant, GeminiClient};
use medinnovate::config::Config;
use medinnovate::geolocation::GeoLookupService;
use medinnovate::models::{AlertEvent, BloodGroup, DispatchReport, Gender, NewAccount};
use medinnovate::output::{OutcomeReporter, ReportFormat};
use medinnovate::store::CsvRecordStore;

/// MedInnovate health assistant command line interface
#[derive(StructOpt, Debug)]
#[structopt(name = "medi", about = "Health assistant: accounts, AI chat and emergency alerts")]
pub enum Cli {
    /// Generate a default configuration file
    Config {
        /// Output path for the configuration file
        #[structopt(short, long, default_value = "config.toml")]
        output: PathBuf,
    },
    /// Create a new account
    Register {
        #[structopt(long)]
        user_id: String,
        #[structopt(long)]
        user_name: String,
        #[structopt(long)]
        password: String,
        #[structopt(long)]
        email: String,
        /// Date of birth, e.g. 1990-05-14
        #[structopt(long)]
        date_of_birth: NaiveDate,
        #[structopt(long)]
        height_cm: f64,
        #[structopt(long)]
        weight_kg: f64,
        /// Male, Female or Other
        #[structopt(long)]
        gender: Gender,
        /// One of A+ A- B+ B- O+ O- AB+ AB-
        #[structopt(long)]
        blood_group: BloodGroup,
        /// Path to configuration file
        #[structopt(short, long, default_value = "config.toml")]
        config: PathBuf,
    },
    /// Log in with a user id and password
    Login {
        #[structopt(long)]
        user_id: String,
        #[structopt(long)]
        password: String,
        /// Path to configuration file
        #[structopt(short, long, default_value = "config.toml")]
        config: PathBuf,
    },
    /// Send an emergency alert to the configured contacts
    Alert {
        /// Name shown to the recipients
        #[structopt(long)]
        sender: String,
        /// Free-text emergency message
        #[structopt(long)]
        message: String,
        /// Coordinate or place text; resolved from the host IP when omitted
        #[structopt(long)]
        location: Option<String>,
        /// Path to configuration file
        #[structopt(short, long, default_value = "config.toml")]
        config: PathBuf,
    },
    /// Ask the AI assistant
    Ask {
        /// Prompt text
        prompt: String,
        /// Path to configuration file
        #[structopt(short, long, default_value = "config.toml")]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::from_args();

    match cli {
        Cli::Config { output } => {
            let config = Config::default();
            config.to_file(&output)?;
            println!("Default configuration written to: {:?}", output);
        }
        Cli::Register {
            user_id,
            user_name,
            password,
            email,
            date_of_birth,
            height_cm,
            weight_kg,
            gender,
            blood_group,
            config,
        } => {
            let config = load_config(&config)?;
            let store = Arc::new(CsvRecordStore::new(&config.store.users_file));
            let registrar = match config.store.primary_key {
                Some(column) => AccountRegistrar::with_uniqueness_key(store, column),
                None => AccountRegistrar::new(store),
            };

            let candidate = NewAccount {
                user_id,
                user_name,
                password,
                email,
                date_of_birth,
                height_cm,
                weight_kg,
                gender,
                blood_group,
            };
            match registrar.register(candidate)? {
                RegistrationOutcome::Created => {
                    println!("Account created successfully!");
                }
                RegistrationOutcome::PasswordTooShort => {
                    eprintln!("Password must be at least 8 characters long.");
                    std::process::exit(1);
                }
                RegistrationOutcome::DuplicateUsername => {
                    eprintln!("Username already exists. Choose a different username.");
                    std::process::exit(1);
                }
            }
        }
        Cli::Login {
            user_id,
            password,
            config,
        } => {
            let config = load_config(&config)?;
            let store = Arc::new(CsvRecordStore::new(&config.store.users_file));
            let service = match config.store.primary_key {
                Some(column) => AuthenticationService::with_login_key(store, column),
                None => AuthenticationService::new(store),
            };

            match service.authenticate(&user_id, &password)? {
                AuthOutcome::Authenticated(id) => {
                    println!("Login successful! Welcome, {}.", id);
                }
                AuthOutcome::InvalidCredentials => {
                    eprintln!("Incorrect password. Please try again.");
                    std::process::exit(1);
                }
                AuthOutcome::UnknownUser => {
                    eprintln!("Username not found. Please create a new account.");
                    std::process::exit(1);
                }
            }
        }
        Cli::Alert {
            sender,
            message,
            location,
            config,
        } => {
            let config = load_config(&config)?;
            let dispatcher =
                AlertDispatcher::from_config(&config.alerting, GeoLookupService::new())?;

            let event = AlertEvent {
                sender_name: sender,
                message,
                location,
            };
            let outcomes = dispatcher.dispatch(&event).await?;
            let report = DispatchReport::new(event.sender_name.clone(), outcomes);

            let format = ReportFormat::from_str(&config.report.format);
            let mut reporter = OutcomeReporter::new(format, config.report.file_path.clone())?;
            reporter.write_report(&report)?;
            reporter.flush()?;

            if report.failed_count() > 0 {
                eprintln!(
                    "{} of {} deliveries failed.",
                    report.failed_count(),
                    report.outcomes.len()
                );
                std::process::exit(1);
            }
        }
        Cli::Ask { prompt, config } => {
            let config = load_config(&config)?;
            let api_key = config.assistant.api_key.ok_or(
                "API Key not found. Set GEMINI_API_KEY as an environment variable.",
            )?;

            let client = GeminiClient::new(api_key).with_model(config.assistant.model);
            let assistant = Assistant::new(Box::new(client));
            println!("{}", assistant.respond(&prompt).await);
        }
    }

    Ok(())
}

/// Load the configuration file if present, then let the environment win.
fn load_config(path: &PathBuf) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = if path.exists() {
        Config::from_file(path)?
    } else {
        log::warn!("Config file not found, using defaults");
        Config::default()
    };
    config.apply_env();
    Ok(config)
}
