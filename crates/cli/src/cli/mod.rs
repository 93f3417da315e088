// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use ys_core::{RequestStatus, ServiceType};

/// Parse a string that must not be empty or whitespace-only.
fn non_empty_string(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        Err("cannot be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}

/// Parse a `QUESTION:OPTION` pricing answer.
fn parse_answer(s: &str) -> Result<(u64, u64), String> {
    let (question, option) = s
        .split_once(':')
        .ok_or_else(|| "expected QUESTION:OPTION".to_string())?;
    let question = question
        .trim()
        .parse()
        .map_err(|_| format!("invalid question id '{}'", question))?;
    let option = option
        .trim()
        .parse()
        .map_err(|_| format!("invalid option id '{}'", option))?;
    Ok((question, option))
}

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "ys")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Roadside service requests for insurance agencies")]
#[command(
    long_about = "Roadside service requests for insurance agencies.\n\n\
    Create tow, crane, road-assistance and moving requests, follow provider offers \
    live, and collect a customer's location by SMS."
)]
pub struct Cli {
    /// Enable debug logging on stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Use this config file instead of the default
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    // ─────────────────────────────────────────────────────────────────────────
    // Session
    // ─────────────────────────────────────────────────────────────────────────
    /// Log in as an agency
    Login {
        /// Agency account email
        #[arg(long, value_parser = non_empty_string)]
        email: String,

        /// Password (read from YS_PASSWORD when omitted)
        #[arg(long, env = crate::env::vars::YS_PASSWORD, hide_env_values = true)]
        password: String,
    },

    /// Forget the stored credentials
    Logout,

    /// Show configuration
    #[command(subcommand)]
    Config(ConfigCommand),

    // ─────────────────────────────────────────────────────────────────────────
    // Requests
    // ─────────────────────────────────────────────────────────────────────────
    /// List requests
    #[command(after_help = "Examples:\n  \
        ys list                            First page of all requests\n  \
        ys list -s awaiting_approval       Requests waiting for an offer\n  \
        ys list --page 2 --page-size 50    Second page, 50 per page")]
    List {
        /// Only requests in this status
        #[arg(long, short)]
        status: Option<RequestStatus>,

        #[arg(long)]
        page: Option<u32>,

        #[arg(long)]
        page_size: Option<u32>,

        #[arg(long, short, value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Show one request
    Show {
        id: u64,

        #[arg(long, short, value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Create a request
    #[command(after_help = "Examples:\n  \
        ys create towTruck --name \"Ayse Ozturk\" --phone 05551112233 \\\n    \
        --pickup \"Fatih, Istanbul\" --pickup-lat 41.0082 --pickup-lng 28.9784 \\\n    \
        --dropoff \"Kadikoy, Istanbul\" --dropoff-lat 40.9917 --dropoff-lng 29.0277\n  \
        ys create roadAssistance ... --details '{\"problem_types\":[\"battery_boost\"]}'\n  \
        ys create crane ... --from-share 3f9c2a --watch      Pickup from 'ys locate', then follow")]
    Create(CreateArgs),

    /// Cancel a request
    Cancel { id: u64 },

    /// List the live offers on a request
    Offers {
        id: u64,

        #[arg(long, short, value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Accept a provider's offer
    Accept { id: u64, offer_id: u64 },

    /// Text the insured a payment link for the accepted price
    PayLink { id: u64 },

    /// Follow a request live until it completes or is cancelled
    Watch {
        id: u64,

        #[arg(long, short, value_enum, default_value = "text")]
        output: OutputFormat,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Location share
    // ─────────────────────────────────────────────────────────────────────────
    /// Ask a customer for their location by SMS and wait for it
    Locate {
        /// Customer's phone number
        #[arg(long, value_parser = non_empty_string)]
        phone: String,

        /// Poll the status endpoint instead of listening for the push
        #[arg(long)]
        poll: bool,

        /// Seconds between polls
        #[arg(long, default_value = "5", requires = "poll")]
        interval: u64,

        #[arg(long, short, value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Submit a position for a location-share link (customer side)
    Share {
        token: String,

        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
    },

    /// Show the pricing questionnaire
    Questions {
        #[arg(long, short, value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Generate shell completions
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,
    /// Print the config file path
    Path,
}

#[derive(Args)]
pub struct CreateArgs {
    /// towTruck, crane, roadAssistance, homeToHomeMoving or cityToCity
    pub service: ServiceType,

    /// Insured's full name
    #[arg(long, value_parser = non_empty_string)]
    pub name: String,

    /// Insured's phone number
    #[arg(long, value_parser = non_empty_string)]
    pub phone: String,

    #[arg(long)]
    pub plate: Option<String>,

    #[arg(long)]
    pub policy: Option<String>,

    /// Insurance company name
    #[arg(long)]
    pub insurer: Option<String>,

    /// Pickup address
    #[arg(long, required_unless_present = "from_share")]
    pub pickup: Option<String>,

    #[arg(long, allow_negative_numbers = true, required_unless_present = "from_share")]
    pub pickup_lat: Option<f64>,

    #[arg(long, allow_negative_numbers = true, required_unless_present = "from_share")]
    pub pickup_lng: Option<f64>,

    /// Take the pickup from the location the customer shared for this token
    #[arg(long, value_name = "TOKEN", conflicts_with_all = ["pickup", "pickup_lat", "pickup_lng"])]
    pub from_share: Option<String>,

    /// Dropoff address (tow truck, moving and city-to-city only)
    #[arg(long)]
    pub dropoff: Option<String>,

    #[arg(long, allow_negative_numbers = true, requires = "dropoff")]
    pub dropoff_lat: Option<f64>,

    #[arg(long, allow_negative_numbers = true, requires = "dropoff")]
    pub dropoff_lng: Option<f64>,

    /// Distance between pickup and dropoff in km
    #[arg(long)]
    pub km: Option<u32>,

    /// Service details as a JSON object
    #[arg(long)]
    pub details: Option<String>,

    /// Pricing answer as QUESTION:OPTION (repeatable)
    #[arg(long = "answer", value_parser = parse_answer)]
    pub answers: Vec<(u64, u64)>,

    /// Keep following the request after it is created
    #[arg(long)]
    pub watch: bool,

    #[arg(long, short, value_enum, default_value = "text")]
    pub output: OutputFormat,
}
