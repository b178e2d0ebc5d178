use std::{path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use revmod_application::{error::AppError, DbRatingAggregator, ModerationService};
use revmod_boundary as json;
use revmod_core::{
    entities::{Decision, EmailAddress, RatingValue, ReviewContent, ReviewStatus, Role},
    gateways::notify::NotificationGateway,
    usecases,
};
use revmod_db_sqlite::{run_embedded_database_migrations, Connections};
use revmod_gateways::{
    email::{send_to_json_file::SendToJsonFile, sendmail::Sendmail},
    notify::Notify,
};

use crate::{
    adapters::{self, NoEmailGateway},
    config::{Config, EmailGateway},
};

/// Review moderation by supervisor consensus
#[derive(Parser, Debug)]
#[command(name = "revmod", version)]
#[command(about = "Review moderation by supervisor consensus", long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// URL to the database (overrides the configuration and DATABASE_URL)
    #[arg(long, global = true, value_name = "DATABASE_URL")]
    db_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage users and their roles
    #[command(subcommand)]
    User(UserCommands),
    /// Write, edit and delete reviews
    #[command(subcommand)]
    Review(ReviewCommands),
    /// Cast or change the vote of a supervisor
    Vote(VoteArgs),
    /// Show the vote counts of a review
    Tally {
        review: String,
    },
    /// Show the decision of a single supervisor
    Decision {
        review: String,
        #[arg(long)]
        supervisor: String,
    },
    /// List all votes of a review
    Decisions {
        review: String,
        #[arg(long)]
        caller: String,
    },
    /// Set the status of a review directly (arbiters only)
    Override(OverrideArgs),
    /// Decide a conflicted review (arbiters only)
    Resolve(ResolveArgs),
    /// List reviews for moderation, most recent first
    Queue {
        #[arg(long)]
        caller: String,
        /// pending, approved, rejected, conflict or all
        #[arg(long, default_value = "pending")]
        status: String,
    },
    /// List conflicted reviews with their votes (arbiters only)
    Conflicts {
        #[arg(long)]
        caller: String,
    },
    /// Moderation statistics
    #[command(subcommand)]
    Stats(StatsCommands),
    /// Show the average rating of an item over its approved reviews
    Rating {
        item: String,
    },
}

#[derive(Subcommand, Debug)]
enum UserCommands {
    /// Register a new user
    Add {
        username: String,
        #[arg(long)]
        email: Option<EmailAddress>,
        #[arg(long = "role", value_name = "ROLE")]
        roles: Vec<Role>,
    },
    /// Grant a role to a user
    Grant { username: String, role: Role },
    /// Revoke a role from a user
    Revoke { username: String, role: Role },
    Activate { username: String },
    /// Inactive supervisors neither vote nor count for the tally
    Deactivate { username: String },
    List,
}

#[derive(Subcommand, Debug)]
enum ReviewCommands {
    Create {
        #[arg(long)]
        author: String,
        #[arg(long)]
        item: String,
        #[command(flatten)]
        content: ContentArgs,
    },
    /// Replace the content of a review, reopening it if already decided
    Edit {
        review: String,
        #[arg(long)]
        author: String,
        #[command(flatten)]
        content: ContentArgs,
    },
    /// Delete a pending review
    Delete {
        review: String,
        #[arg(long)]
        author: String,
    },
    Show {
        review: String,
    },
}

#[derive(Args, Debug)]
struct ContentArgs {
    /// Rating from 1 to 5
    #[arg(long)]
    rating: u8,
    #[arg(long)]
    body: String,
    #[arg(long)]
    title: Option<String>,
    #[arg(long = "tag", value_name = "TAG")]
    tags: Vec<String>,
}

impl From<ContentArgs> for ReviewContent {
    fn from(from: ContentArgs) -> Self {
        let ContentArgs {
            rating,
            body,
            title,
            tags,
        } = from;
        Self {
            title,
            body,
            rating: RatingValue::from(rating),
            tags,
        }
    }
}

#[derive(Args, Debug)]
struct VoteArgs {
    review: String,
    #[arg(long)]
    supervisor: String,
    /// approved or rejected
    #[arg(long)]
    decision: Decision,
    #[arg(long)]
    comment: Option<String>,
}

#[derive(Args, Debug)]
struct OverrideArgs {
    review: String,
    #[arg(long)]
    arbiter: String,
    #[arg(long)]
    status: ReviewStatus,
    #[arg(long)]
    reason: Option<String>,
}

#[derive(Args, Debug)]
struct ResolveArgs {
    review: String,
    #[arg(long)]
    arbiter: String,
    /// approved or rejected
    #[arg(long)]
    decision: Decision,
    #[arg(long)]
    notes: Option<String>,
}

#[derive(Subcommand, Debug)]
enum StatsCommands {
    Supervisor { supervisor: String },
    Author { author: String },
}

pub fn run() -> Result<ExitCode> {
    let Cli {
        config,
        db_url,
        command,
    } = Cli::parse();

    let mut cfg = Config::try_load_from_file_or_default(config.as_ref())?;
    if let Some(db_url) = db_url {
        cfg.db.conn_sqlite = db_url;
    }
    let service = moderation_service(&cfg)?;

    match execute(&service, command) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            if matches!(err, AppError::Other(_)) {
                log::error!("{err:#}");
            }
            eprintln!("{}", serde_json::to_string(&adapters::error_response(&err))?);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn moderation_service(cfg: &Config) -> Result<ModerationService> {
    log::info!(
        "Connecting to SQLite database '{}' (pool size = {})",
        cfg.db.conn_sqlite,
        cfg.db.conn_pool_size
    );
    let connections = Connections::init(
        &cfg.db.conn_sqlite,
        cfg.db.conn_pool_size,
        cfg.db.conn_timeout,
    )?;

    log::info!("Running embedded database migrations");
    run_embedded_database_migrations(connections.exclusive()?)?;

    let rating_aggregator = DbRatingAggregator::new(connections.clone());
    let notification_gateway: Arc<dyn NotificationGateway + Send + Sync> =
        match &cfg.email.gateway {
            Some(EmailGateway::Sendmail { sender_address }) => {
                Arc::new(Notify::new(Sendmail::new(sender_address.clone())))
            }
            Some(EmailGateway::EmailToJsonFile { dir }) => {
                Arc::new(Notify::new(SendToJsonFile::try_new(dir)?))
            }
            None => {
                log::warn!("No e-mail gateway was configured");
                Arc::new(NoEmailGateway)
            }
        };

    Ok(ModerationService::new(
        connections,
        Arc::new(rating_aggregator),
        notification_gateway,
        cfg.notifications,
    ))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(value).map_err(anyhow::Error::from)?;
    println!("{json}");
    Ok(())
}

fn execute(service: &ModerationService, command: Commands) -> Result<(), AppError> {
    match command {
        Commands::User(cmd) => execute_user_command(service, cmd),
        Commands::Review(cmd) => execute_review_command(service, cmd),
        Commands::Vote(VoteArgs {
            review,
            supervisor,
            decision,
            comment,
        }) => {
            let cast_vote = service.submit_vote(usecases::NewVote {
                review_id: review.into(),
                supervisor_id: supervisor.into(),
                decision,
                comment,
            })?;
            print_json(&adapters::vote_response(&cast_vote))
        }
        Commands::Tally { review } => {
            let review_tally = service.tally(&review)?;
            print_json(&adapters::tally_response(&review_tally))
        }
        Commands::Decision { review, supervisor } => {
            let decision = service.decision_of(&review, &supervisor)?;
            print_json(&json::MyDecision::from(decision))
        }
        Commands::Decisions { review, caller } => {
            let decisions = service.list_decisions(&caller, &review)?;
            print_json(&adapters::review_decisions(decisions))
        }
        Commands::Override(OverrideArgs {
            review,
            arbiter,
            status,
            reason,
        }) => {
            let overridden = service.override_status(usecases::StatusOverride {
                review_id: review.into(),
                arbiter_id: arbiter.into(),
                new_status: status,
                reason,
            })?;
            print_json(&json::Review::from(overridden.review))
        }
        Commands::Resolve(ResolveArgs {
            review,
            arbiter,
            decision,
            notes,
        }) => {
            let resolved = service.resolve_conflict(usecases::ConflictResolution {
                review_id: review.into(),
                arbiter_id: arbiter.into(),
                decision,
                notes,
            })?;
            print_json(&adapters::conflict_resolution(
                resolved.id.as_str(),
                decision,
            ))
        }
        Commands::Queue { caller, status } => {
            let status = adapters::parse_status_filter(&status)?;
            let entries: Vec<_> = service
                .reviews_for_moderation(&caller, status)?
                .into_iter()
                .map(adapters::moderation_entry)
                .collect();
            print_json(&entries)
        }
        Commands::Conflicts { caller } => {
            let conflicts: Vec<_> = service
                .conflicted_reviews(&caller)?
                .into_iter()
                .map(adapters::conflicted_review)
                .collect();
            print_json(&conflicts)
        }
        Commands::Stats(StatsCommands::Supervisor { supervisor }) => {
            let stats = service.supervisor_stats(&supervisor)?;
            print_json(&adapters::supervisor_stats(stats))
        }
        Commands::Stats(StatsCommands::Author { author }) => {
            let stats = service.author_stats(&author)?;
            print_json(&adapters::author_stats(stats))
        }
        Commands::Rating { item } => {
            let rating = service.item_rating(&item)?;
            print_json(&json::ItemRating::from(rating))
        }
    }
}

fn execute_user_command(service: &ModerationService, cmd: UserCommands) -> Result<(), AppError> {
    let user = match cmd {
        UserCommands::Add {
            username,
            email,
            roles,
        } => service.create_user(usecases::NewUser {
            username,
            email,
            roles: roles.into_iter().collect(),
        })?,
        UserCommands::Grant { username, role } => {
            service.change_user_role(&username, role, true)?
        }
        UserCommands::Revoke { username, role } => {
            service.change_user_role(&username, role, false)?
        }
        UserCommands::Activate { username } => service.change_user_activation(&username, true)?,
        UserCommands::Deactivate { username } => {
            service.change_user_activation(&username, false)?
        }
        UserCommands::List => {
            let users: Vec<_> = service
                .users()?
                .into_iter()
                .map(json::User::from)
                .collect();
            return print_json(&users);
        }
    };
    print_json(&json::User::from(user))
}

fn execute_review_command(
    service: &ModerationService,
    cmd: ReviewCommands,
) -> Result<(), AppError> {
    let review = match cmd {
        ReviewCommands::Create {
            author,
            item,
            content,
        } => service.create_review(&author, &item, content.into())?,
        ReviewCommands::Edit {
            review,
            author,
            content,
        } => service.edit_review(&author, &review, content.into())?.review,
        ReviewCommands::Delete { review, author } => service.delete_review(&author, &review)?,
        ReviewCommands::Show { review } => service.review(&review)?,
    };
    print_json(&json::Review::from(review))
}
