use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use pethospital::booking::BookingError;
use pethospital::config::Config;
use pethospital::state::AppState;
use pethospital_core::hospital::{Actor, AppointmentStatus};

/// Pet hospital booking service, run against a seeded in-memory hospital
#[derive(Parser, Debug)]
#[command(name = "pethospital")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Maximum cache entries before LRU eviction
    #[arg(long, env = "CACHE_MAX_ENTRIES")]
    cache_max_entries: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the seeded users, pets and veterinarians
    Demo,
    /// List appointments for a user or a veterinarian
    Appointments(AppointmentsArgs),
    /// Book a new appointment
    Book(BookArgs),
    /// Move an appointment to a new slot
    Reschedule(RescheduleArgs),
    /// Change an appointment's status
    Status(StatusArgs),
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct AppointmentsArgs {
    /// Pet owner ID
    #[arg(long)]
    user: Option<Uuid>,
    /// Veterinarian ID
    #[arg(long)]
    vet: Option<Uuid>,
}

#[derive(Args, Debug)]
struct BookArgs {
    /// Acting pet owner
    #[arg(long)]
    user: Uuid,
    #[arg(long)]
    pet: Uuid,
    #[arg(long)]
    vet: Uuid,
    /// Appointment date (YYYY-MM-DD)
    #[arg(long)]
    date: NaiveDate,
    /// Appointment time (HH:MM)
    #[arg(long)]
    time: String,
    #[arg(long)]
    reason: String,
    #[arg(long)]
    notes: Option<String>,
}

#[derive(Args, Debug)]
struct ActorArgs {
    /// ID of the caller
    #[arg(long = "as")]
    actor: Uuid,
    /// Role of the caller
    #[arg(long, value_enum, default_value_t = Role::User)]
    role: Role,
}

#[derive(Args, Debug)]
struct RescheduleArgs {
    #[command(flatten)]
    actor: ActorArgs,
    #[arg(long)]
    appointment: Uuid,
    #[arg(long)]
    date: NaiveDate,
    #[arg(long)]
    time: String,
}

#[derive(Args, Debug)]
struct StatusArgs {
    #[command(flatten)]
    actor: ActorArgs,
    #[arg(long)]
    appointment: Uuid,
    /// New status (pending, confirmed, completed, cancelled, rejected)
    #[arg(long)]
    status: AppointmentStatus,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Role {
    User,
    Veterinarian,
    Admin,
}

impl ActorArgs {
    fn actor(&self) -> Actor {
        match self.role {
            Role::User => Actor::user(self.actor),
            Role::Veterinarian => Actor::veterinarian(self.actor),
            Role::Admin => Actor::admin(self.actor),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pethospital=debug,pethospital_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = Config::from_env();
    if let Some(max_entries) = cli.cache_max_entries {
        config.cache_max_entries = max_entries.max(1);
    }

    let state = AppState::new(&config).with_demo_data().await?;
    let sweeper = config
        .sweep_interval()
        .map(|interval| state.cache.spawn_sweeper(interval));

    let outcome = run(&state, cli.command).await;

    if let Some(sweeper) = sweeper {
        sweeper.abort();
    }
    tracing::debug!(cached_entries = state.cache.len().await, "Done");
    outcome
}

async fn run(state: &AppState, command: Command) -> Result<()> {
    match command {
        Command::Demo => {
            let users = state.users.list_active().await?;
            let mut pets = Vec::new();
            for user in &users {
                pets.extend(state.pets.find_by_owner(user.id).await?);
            }
            let veterinarians = state.veterinarians.list_approved().await?;
            print_json(&json!({
                "users": users,
                "pets": pets,
                "veterinarians": veterinarians,
            }))
        }
        Command::Appointments(args) => {
            let appointments = match (args.user, args.vet) {
                (Some(user), _) => state.appointments.find_by_user(user).await?,
                (None, Some(vet)) => state.appointments.find_by_veterinarian(vet).await?,
                (None, None) => Vec::new(),
            };
            print_json(&appointments)
        }
        Command::Book(args) => {
            let request = json!({
                "petId": args.pet.to_string(),
                "veterinarianId": args.vet.to_string(),
                "date": args.date.to_string(),
                "time": args.time,
                "reason": args.reason,
                "notes": args.notes,
            });
            let result = state.booking.book(&Actor::user(args.user), request).await;
            respond(result)
        }
        Command::Reschedule(args) => {
            let request = json!({
                "date": args.date.to_string(),
                "time": args.time,
            });
            let result = state
                .booking
                .reschedule(&args.actor.actor(), args.appointment, request)
                .await;
            respond(result)
        }
        Command::Status(args) => {
            let result = state
                .booking
                .update_status(&args.actor.actor(), args.appointment, args.status)
                .await;
            respond(result)
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Prints the outcome the way an API response body would look.
fn respond<T: Serialize>(result: std::result::Result<T, BookingError>) -> Result<()> {
    match result {
        Ok(value) => print_json(&value),
        Err(err) => {
            let status = err.status_code();
            print_json(&json!({ "status": status, "error": err.to_string() }))?;
            Err(anyhow::Error::new(err).context(format!("request failed with status {status}")))
        }
    }
}
