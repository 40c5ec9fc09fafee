//! # Warung Terminal
//!
//! A line-oriented cashier terminal over a [`SalesSession`].
//!
//! ## Architecture
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Cashier Terminal                         │
//! │                                                              │
//! │  stdin commands ──► SalesSession ──► ApiClient ──► backend   │
//! │                          │                                   │
//! │                          ▼                                   │
//! │                  cart / totals / receipt printed to stdout   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! One command per line; `help` lists them. The terminal never touches
//! pricing or checkout rules itself, it only renders session state.

mod config;

use std::io::{BufRead, Write};
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use warung_client::ApiClient;
use warung_core::{DiscountSpec, PaymentMethod};
use warung_session::SalesSession;

use crate::config::TerminalConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env("WARUNG_LOG").unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let config = TerminalConfig::load(None)?;
    info!(base_url = %config.api.base_url, "Configuration loaded");

    let client = ApiClient::new(&config.api.base_url, config.api.token)?;
    info!(user_id = client.user_id(), "Authenticated");

    let user_id = client.user_id().to_string();
    let mut session = SalesSession::new(Arc::new(client), user_id);
    session.load().await?;
    session.set_default_customer_type(config.terminal.customer_type.as_str());

    println!(
        "Warung POS terminal. {} products loaded. Type 'help' for commands.",
        session.catalog().len()
    );

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("{}> ", session.stage());
        std::io::stdout().flush()?;

        let Some(line) = lines.next() else { break };
        let line = line?;
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            continue;
        };
        let args: Vec<&str> = words.collect();

        match run_command(&mut session, command, &args).await {
            Ok(Outcome::Continue) => {}
            Ok(Outcome::Quit) => break,
            Err(e) => println!("! {}", e),
        }
    }

    Ok(())
}

enum Outcome {
    Continue,
    Quit,
}

async fn run_command(
    session: &mut SalesSession,
    command: &str,
    args: &[&str],
) -> Result<Outcome, Box<dyn std::error::Error>> {
    match command {
        "help" => print_help(),
        "quit" | "exit" => return Ok(Outcome::Quit),

        // Catalog
        "list" => {
            let query = args.first().copied().unwrap_or("");
            let category = args.get(1).copied();
            for product in session.filtered_products(query, category) {
                println!(
                    "  #{:<4} {:<30} {:>12}  [{}]",
                    product.id, product.name, product.price, product.category
                );
            }
        }
        "categories" => {
            for category in session.categories() {
                println!("  {}", category);
            }
        }

        // Cart
        "add" => {
            let id = parse_id(args.first())?;
            if !session.add_product(id) {
                println!("! Cannot add (locked stage or unknown product)");
            }
            print_cart(session);
        }
        "sub" => {
            let id = parse_id(args.first())?;
            session.decrement(id);
            print_cart(session);
        }
        "qty" => {
            let id = parse_id(args.first())?;
            let n: i64 = args.get(1).unwrap_or(&"1").parse()?;
            session.set_quantity(id, n);
            print_cart(session);
        }
        "rm" => {
            let id = parse_id(args.first())?;
            session.remove_line(id);
            print_cart(session);
        }
        "note" => {
            let id = parse_id(args.first())?;
            if session.open_note(id) {
                session.confirm_note(args[1..].join(" "));
            } else {
                println!("! No such line");
            }
        }
        "cart" => print_cart(session),

        // Order-level inputs
        "disc" => match args.first() {
            None | Some(&"off") => {
                session.set_discount(None);
            }
            Some(&"pct") => {
                let value = args.get(1).copied().unwrap_or("0");
                session.set_discount(Some(DiscountSpec::percentage(value)));
                print_cart(session);
            }
            Some(&"rp") => {
                let value = args.get(1).copied().unwrap_or("0");
                session.set_discount(Some(DiscountSpec::nominal(value)));
                print_cart(session);
            }
            Some(other) => println!("! Unknown discount kind '{}' (pct, rp, off)", other),
        },
        "channel" => {
            let channel = args.first().copied().unwrap_or("dine-in");
            session.set_customer_type(channel);
        }

        // Held orders
        "hold" => {
            session.hold_order().await?;
            println!("Order held ({} parked)", session.held_orders().len());
        }
        "helds" => {
            for order in session.held_orders().orders() {
                println!(
                    "  {}  {}  {}  {}",
                    order.id, order.timestamp, order.customer_type, order.total
                );
            }
        }
        "recall" => {
            let id = args.first().ok_or("Usage: recall <id>")?;
            session.recall_held(id)?;
            print_cart(session);
        }
        "del" => {
            let id = args.first().ok_or("Usage: del <id>")?;
            session.delete_held(id)?;
            println!("Removed from this terminal (still unpaid on the server)");
        }

        // Checkout
        "next" => {
            session.proceed_to_payment()?;
            print_cart(session);
            println!("Payment: cash | qris | transfer, then 'pay'. 'cash <amount>' to tender.");
        }
        "back" => session.back_to_order()?,
        "cash" => {
            session.set_payment_method(PaymentMethod::Cash);
            if let Some(amount) = args.first() {
                session.set_cash_input(*amount);
            }
        }
        "qris" => session.set_payment_method(PaymentMethod::Qris),
        "transfer" => session.set_payment_method(PaymentMethod::Transfer),
        "pay" => {
            let receipt = session.confirm_payment().await?;
            println!("{}", receipt);
            session.await_receipt().await?;
        }
        "new" => {
            session.start_new_order()?;
            println!("Ready for the next order");
        }

        other => println!("! Unknown command '{}'. Type 'help'.", other),
    }

    Ok(Outcome::Continue)
}

fn parse_id(arg: Option<&&str>) -> Result<i64, Box<dyn std::error::Error>> {
    Ok(arg.ok_or("Missing product id")?.parse()?)
}

fn print_cart(session: &SalesSession) {
    if session.cart().is_empty() {
        println!("  (cart empty)");
        return;
    }
    for line in session.cart().lines() {
        println!(
            "  #{:<4} {:<30} x{:<3} {:>12}",
            line.product.id,
            line.product.name,
            line.quantity,
            line.subtotal()
        );
        if !line.note.is_empty() {
            println!("        ({})", line.note);
        }
    }
    let breakdown = session.breakdown();
    println!("  Subtotal {}", breakdown.subtotal);
    if !breakdown.discount.is_zero() {
        println!(
            "  Discount -{}  -> {}",
            breakdown.discount, breakdown.subtotal_after_discount
        );
    }
    println!("  Tax      {}", breakdown.tax);
    println!("  TOTAL    {}", breakdown.total);
}

fn print_help() {
    println!(
        "\
Catalog:   list [query] [category] | categories
Cart:      add <id> | sub <id> | qty <id> <n> | rm <id> | note <id> <text> | cart
Order:     disc pct <n> | disc rp <n> | disc off | channel <tag>
Held:      hold | helds | recall <id> | del <id>
Checkout:  next | back | cash [amount] | qris | transfer | pay | new
Other:     help | quit"
    );
}
