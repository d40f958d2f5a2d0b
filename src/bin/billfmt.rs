//! CLI binary for billfmt.
//!
//! A thin shim over the library crate that reads bill HTML from a file or
//! stdin and prints the messaging-ready result.

use anyhow::{Context, Result};
use billfmt::{
    build_document_handoff_message, build_messaging_link, build_order_message, format_bill_text,
    LinkVariant, OrderSummary,
};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "billfmt",
    version,
    about = "Reformat rendered HTML restaurant bills for messaging"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Reformat an HTML bill into messaging-ready plain text
    Format {
        /// HTML file to read; stdin when omitted
        input: Option<PathBuf>,
    },

    /// Build a WhatsApp deep link for a phone number and message text
    Link {
        /// Phone number in any common formatting
        phone: String,
        /// Message text to pre-fill
        text: String,
        /// Emit the web-client link instead of the mobile one
        #[arg(long)]
        web: bool,
    },

    /// Compose a full order-confirmation message from an HTML bill
    Message {
        /// HTML file to read; stdin when omitted
        input: Option<PathBuf>,
        #[arg(long)]
        restaurant: String,
        #[arg(long)]
        table: String,
        /// Comma-separated order numbers
        #[arg(long, value_delimiter = ',')]
        orders: Vec<String>,
        #[arg(long)]
        total: f64,
        /// Emit the PDF-handoff variant instead of embedding the bill
        #[arg(long)]
        handoff: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Format { input } => {
            let html = read_input(input)?;
            println!("{}", format_bill_text(&html));
        }
        Command::Link { phone, text, web } => {
            let variant = if web {
                LinkVariant::Web
            } else {
                LinkVariant::Mobile
            };
            println!("{}", build_messaging_link(&phone, &text, variant)?);
        }
        Command::Message {
            input,
            restaurant,
            table,
            orders,
            total,
            handoff,
        } => {
            let bill_html = read_input(input)?;
            let order = OrderSummary {
                restaurant_name: restaurant,
                table_number: table,
                order_numbers: orders,
                total_amount: total,
                bill_html,
            };
            let message = if handoff {
                build_document_handoff_message(&order)
            } else {
                build_order_message(&order)
            };
            println!("{message}");
        }
    }

    Ok(())
}

fn read_input(path: Option<PathBuf>) -> Result<String> {
    match path {
        Some(p) => std::fs::read_to_string(&p)
            .with_context(|| format!("Failed to read bill HTML from {}", p.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read bill HTML from stdin")?;
            Ok(buf)
        }
    }
}
