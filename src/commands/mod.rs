//! CLI commands. Each one drives a controller the way a screen would.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Subcommand, ValueEnum};

use crate::auth::{validate_registration, AuthClient};
use crate::enrollment::Enrollment;
use crate::errors::ClientError;
use crate::models::{DecisionAction, Visit, VisitStatus};
use crate::notifications::{self, NotificationData, NotificationRoute};
use crate::visits::{DecisionFlow, VisitorList};
use crate::AppContext;

#[derive(Subcommand)]
pub enum Command {
    /// Sign in and remember the session
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },
    /// Create an account
    Register {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
        /// Repeat the password
        #[arg(long)]
        confirm: String,
    },
    /// Sign out and detach this device's push token
    Logout,
    /// Show the signed-in account
    Whoami,
    /// Change the account password
    ChangePassword {
        #[arg(long)]
        old: String,
        #[arg(long)]
        new: String,
    },
    /// Show the visitor history
    Visits {
        /// Load pages up to and including this one
        #[arg(short, long, default_value_t = 1)]
        pages: u32,
    },
    /// List visitors waiting at the door
    Pending,
    /// Let a visitor in
    Approve { visit_id: String },
    /// Turn a visitor away
    Deny { visit_id: String },
    /// Register a push token for this device
    Device { push_token: String },
    /// Enroll a known visitor from one or more photos
    Memorize {
        #[arg(short, long)]
        name: String,
        #[arg(required = true)]
        photos: Vec<PathBuf>,
    },
    /// Handle a push notification payload (JSON)
    Notification {
        payload: String,
        /// Answer the visitor request carried by the payload
        #[arg(long, value_enum)]
        decide: Option<DecisionArg>,
    },
    /// Check whether notifications reach this account
    NotificationStatus,
    /// Ask the backend for a test notification
    NotifyTest {
        /// Simulate the door camera detecting this visitor instead
        #[arg(long)]
        visitor: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum DecisionArg {
    Accept,
    Reject,
}

impl From<DecisionArg> for DecisionAction {
    fn from(arg: DecisionArg) -> Self {
        match arg {
            DecisionArg::Accept => DecisionAction::Accept,
            DecisionArg::Reject => DecisionAction::Reject,
        }
    }
}

pub async fn run(ctx: &AppContext, command: Command) -> Result<(), ClientError> {
    match command {
        Command::Login { email, password } => {
            let user = AuthClient::new(ctx.clone())
                .try_login(&email, &password)
                .await
                .map_err(|e| match e {
                    ClientError::Http { status, .. } if status == 400 || status == 401 => {
                        ClientError::Http {
                            status,
                            message: "Invalid email or password".to_string(),
                        }
                    }
                    other => other,
                })?;
            println!("Signed in as {} <{}>", user.name, user.email);
        }
        Command::Register {
            name,
            email,
            password,
            confirm,
        } => {
            validate_registration(&name, &email, &password, &confirm)?;
            AuthClient::new(ctx.clone())
                .try_register(&name, &email, &password)
                .await?;
            println!("Account created successfully! Please login.");
        }
        Command::Logout => {
            AuthClient::new(ctx.clone()).logout().await;
            println!("Signed out");
        }
        Command::Whoami => match ctx.session.current_user().await {
            Some(user) => println!("{} <{}> (id {})", user.name, user.email, user.id),
            None => println!("Not signed in"),
        },
        Command::ChangePassword { old, new } => {
            AuthClient::new(ctx.clone())
                .change_password(&old, &new)
                .await?;
            println!("Password changed");
        }
        Command::Visits { pages } => {
            let list = VisitorList::new(ctx.clone());
            list.fetch_page(1, false).await?;
            while list.snapshot().await.current_page < pages && list.load_more().await? {}

            let state = list.snapshot().await;
            if state.visits.is_empty() {
                println!("No visitors yet");
            }
            for visit in &state.visits {
                print_visit(visit);
            }
            if !state.visits.is_empty() && !state.has_more {
                println!("You've reached the end");
            }
        }
        Command::Pending => {
            let list = load_all(ctx).await?;
            let pending = list.pending().await;
            println!(
                "{} visitor request{} waiting for approval",
                pending.len(),
                if pending.len() == 1 { "" } else { "s" }
            );
            for visit in &pending {
                print_visit(visit);
            }
        }
        Command::Approve { visit_id } => {
            decide(ctx, &visit_id, DecisionAction::Accept).await?;
        }
        Command::Deny { visit_id } => {
            decide(ctx, &visit_id, DecisionAction::Reject).await?;
        }
        Command::Device { push_token } => {
            let user = ctx.session.current_user().await;
            let registered = ctx
                .devices
                .token_acquired(push_token, user.as_ref())
                .await;
            if registered {
                println!("Device registered for notifications");
            } else {
                println!("Push token saved; it will be registered after sign-in");
            }
        }
        Command::Memorize { name, photos } => {
            let mut enrollment = Enrollment::new(ctx.clone());
            enrollment.set_name(name);
            for path in photos {
                enrollment.add_photo(path)?;
            }
            let enrolled = enrollment.submit().await?;
            println!("{}", enrolled.message());
        }
        Command::Notification { payload, decide: answer } => {
            let data = NotificationData::parse(&payload)?;
            match data.route() {
                NotificationRoute::VisitDetails { visit_id } => {
                    println!("Open visit {}", visit_id);
                }
                NotificationRoute::VisitorAlert(request) => {
                    println!("{} is at your door", request.name);
                    for photo in &request.photos {
                        println!("  {}", photo);
                    }
                    if let Some(answer) = answer {
                        let list = Arc::new(VisitorList::new(ctx.clone()));
                        let flow = DecisionFlow::new(ctx.clone(), list);
                        let visit_id = request.id.clone();
                        flow.present_request(request).await;
                        let action = DecisionAction::from(answer);
                        flow.decide(&visit_id, action).await?;
                        println!("Visitor {} successfully", action.past_tense());
                    }
                }
                NotificationRoute::None => println!("Nothing to open"),
            }
        }
        Command::NotificationStatus => {
            let status = notifications::status(ctx).await?;
            println!("Notifications enabled: {}", status.notifications_enabled);
            println!("Registered devices: {}", status.registered_devices);
            for device in &status.devices {
                println!("  {}", device);
            }
        }
        Command::NotifyTest { visitor } => match visitor {
            Some(name) => {
                notifications::simulate_visitor(ctx, &name).await?;
                println!("Visitor detection notification sent!");
            }
            None => {
                notifications::send_test(ctx).await?;
                println!("Test notification sent from server!");
            }
        },
    }

    Ok(())
}

async fn load_all(ctx: &AppContext) -> Result<VisitorList, ClientError> {
    let list = VisitorList::new(ctx.clone());
    list.fetch_page(1, false).await?;
    while list.load_more().await? {}
    Ok(list)
}

async fn decide(
    ctx: &AppContext,
    visit_id: &str,
    action: DecisionAction,
) -> Result<(), ClientError> {
    let list = Arc::new(load_all(ctx).await?);
    let flow = DecisionFlow::new(ctx.clone(), Arc::clone(&list));
    if list.find(visit_id).await.is_some() {
        let request = flow.present(visit_id).await?;
        println!("{} is at your door", request.name);
    }
    flow.decide(visit_id, action).await?;
    println!("Visitor {} successfully", action.past_tense());
    Ok(())
}

fn print_visit(visit: &Visit) {
    let marker = match visit.status {
        VisitStatus::Pending => "?",
        VisitStatus::Accepted => "+",
        VisitStatus::Rejected => "x",
    };
    println!(
        "[{}] {:>6}  {:<24} {} {}  {}",
        marker,
        visit.id,
        visit.visitor_name,
        visit.date,
        visit.time,
        visit.status.as_str()
    );
}
