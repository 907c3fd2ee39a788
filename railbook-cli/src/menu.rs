//! Interactive text front end. Thin by design: every input collected
//! here is re-validated by the engine, and all state changes go through
//! the services in railbook-store.

use anyhow::Result;
use railbook_core::SessionContext;
use railbook_store::admin::is_admin;
use railbook_store::app_config::Config;
use railbook_store::{
    AdminMaintenance, AuthService, DbClient, EngineError, ReservationEngine, StatsReporter,
};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// Typing this instead of a menu number opens the admin login path.
const ADMIN_SECRET_CODE: &str = "ADMIN";

struct App {
    auth: AuthService,
    engine: ReservationEngine,
    admin: AdminMaintenance,
    stats: StatsReporter,
    admin_username: String,
}

pub async fn run(config: &Config, db: &DbClient) -> Result<()> {
    let app = App {
        auth: AuthService::new(db.pool.clone(), config.auth.password_salt.as_str()),
        engine: ReservationEngine::new(db.pool.clone(), config.auth.admin_username.as_str()),
        admin: AdminMaintenance::new(
            db.pool.clone(),
            config.auth.password_salt.as_str(),
            config.auth.admin_username.as_str(),
        ),
        stats: StatsReporter::new(db.pool.clone()),
        admin_username: config.auth.admin_username.clone(),
    };

    let mut rl = DefaultEditor::new()?;

    loop {
        match auth_menu(&app, &mut rl).await? {
            Some(session) => main_menu(&app, &mut rl, session).await?,
            None => break,
        }
    }

    println!("Goodbye!");
    Ok(())
}

/// Returns a logged-in session, or None when the user wants to exit.
async fn auth_menu(app: &App, rl: &mut DefaultEditor) -> Result<Option<SessionContext>> {
    loop {
        println!();
        println!("==============================================");
        println!("  RAILBOOK RESERVATION SYSTEM");
        println!("==============================================");
        println!("1. Login");
        println!("2. Register");
        println!("3. Exit");

        let Some(choice) = prompt(rl, "Choice (1-3): ")? else {
            return Ok(None);
        };

        match choice.to_uppercase().as_str() {
            "1" => {
                if let Some(session) = login_flow(app, rl).await? {
                    return Ok(Some(session));
                }
            }
            "2" => register_flow(app, rl).await?,
            "3" => return Ok(None),
            ADMIN_SECRET_CODE => admin_login_flow(app, rl).await?,
            _ => println!("Invalid choice."),
        }
    }
}

async fn login_flow(app: &App, rl: &mut DefaultEditor) -> Result<Option<SessionContext>> {
    let Some(username) = prompt(rl, "Username: ")? else {
        return Ok(None);
    };
    let Some(password) = prompt(rl, "Password: ")? else {
        return Ok(None);
    };

    match app.auth.login(&username, &password).await? {
        Some(identity) => {
            println!("Welcome, {identity}!");
            let mut session = SessionContext::new();
            session.login(identity);
            Ok(Some(session))
        }
        None => {
            println!("Login failed: invalid username or password.");
            Ok(None)
        }
    }
}

async fn register_flow(app: &App, rl: &mut DefaultEditor) -> Result<()> {
    let Some(username) = prompt(rl, "New username: ")? else {
        return Ok(());
    };
    let Some(password) = prompt(rl, "New password: ")? else {
        return Ok(());
    };

    match app.auth.register(&username, &password).await {
        Ok(()) => println!("Account '{username}' registered. You can log in now."),
        Err(err) => report(err),
    }
    Ok(())
}

async fn admin_login_flow(app: &App, rl: &mut DefaultEditor) -> Result<()> {
    let Some(mut session) = login_flow(app, rl).await? else {
        return Ok(());
    };
    let authorized = session
        .current()
        .is_some_and(|identity| is_admin(identity, &app.admin_username));
    if !authorized {
        println!("Admin access denied: not the designated administrator account.");
        return Ok(());
    }
    admin_menu(app, rl, &mut session).await
}

async fn main_menu(app: &App, rl: &mut DefaultEditor, session: SessionContext) -> Result<()> {
    loop {
        let user = match session.current() {
            Some(identity) => identity.to_string(),
            None => return Ok(()),
        };
        println!();
        println!("==============================================");
        println!("  RAILBOOK | User: {user}");
        println!("==============================================");
        println!("1. Search & book a train");
        println!("2. View my reservation (by PNR)");
        println!("3. Cancel my reservation (by PNR)");
        println!("4. Logout");

        let Some(choice) = prompt(rl, "Choice (1-4): ")? else {
            return Ok(());
        };

        match choice.as_str() {
            "1" => search_and_book(app, rl, &session).await?,
            "2" => view_reservation(app, rl, &session).await?,
            "3" => cancel_reservation(app, rl, &session).await?,
            "4" => {
                println!("Logged out.");
                return Ok(());
            }
            _ => println!("Invalid choice."),
        }
    }
}

async fn search_and_book(app: &App, rl: &mut DefaultEditor, session: &SessionContext) -> Result<()> {
    let Some(source) = prompt(rl, "Source station: ")? else {
        return Ok(());
    };
    let Some(destination) = prompt(rl, "Destination station: ")? else {
        return Ok(());
    };

    let trains = app.engine.search(&source, &destination).await?;
    if trains.is_empty() {
        println!("No direct trains with free seats on this route.");
        return Ok(());
    }

    println!();
    println!(
        "{:<10} {:<30} {:<15} {:<15} {:<6}",
        "Number", "Name", "Source", "Destination", "Seats"
    );
    for train in &trains {
        println!(
            "{:<10} {:<30} {:<15} {:<15} {:<6}",
            train.train_number, train.name, train.source, train.destination, train.available_seats
        );
    }

    let Some(train_number) = prompt(rl, "Train number to book (blank to go back): ")? else {
        return Ok(());
    };
    if train_number.is_empty() {
        return Ok(());
    }
    let Some(passenger_name) = prompt(rl, "Passenger name: ")? else {
        return Ok(());
    };
    let Some(age_input) = prompt(rl, "Passenger age: ")? else {
        return Ok(());
    };
    let Ok(age) = age_input.parse::<i32>() else {
        println!("Invalid age.");
        return Ok(());
    };

    match app.engine.book(&train_number, session, &passenger_name, age).await {
        Ok(confirmation) => {
            println!("--- BOOKING SUCCESSFUL ---");
            println!("PNR: {}", confirmation.pnr);
            println!("Train: {train_number} - Seat: {}", confirmation.seat_number);
        }
        Err(err) => report(err),
    }
    Ok(())
}

async fn view_reservation(app: &App, rl: &mut DefaultEditor, session: &SessionContext) -> Result<()> {
    let Some(pnr) = prompt(rl, "PNR to view: ")? else {
        return Ok(());
    };
    match app.engine.view(&pnr.to_uppercase(), session).await {
        Ok(detail) => {
            println!("--- RESERVATION DETAILS ---");
            println!("PNR: {}", detail.pnr);
            println!("Booked by: {}", detail.username);
            println!("Train: {} - {}", detail.train_number, detail.train_name);
            println!("Route: {} to {}", detail.source, detail.destination);
            println!("Passenger: {} (age {})", detail.passenger_name, detail.age);
            println!("Seat: {}", detail.seat_number);
            println!(
                "Booked on: {}",
                detail.booking_timestamp.format("%Y-%m-%d %H:%M:%S")
            );
        }
        Err(err) => report(err),
    }
    Ok(())
}

async fn cancel_reservation(
    app: &App,
    rl: &mut DefaultEditor,
    session: &SessionContext,
) -> Result<()> {
    let Some(pnr) = prompt(rl, "PNR to cancel: ")? else {
        return Ok(());
    };
    match app.engine.cancel(&pnr.to_uppercase(), session).await {
        Ok(()) => println!("PNR {} cancelled, seat released.", pnr.to_uppercase()),
        Err(err) => report(err),
    }
    Ok(())
}

async fn admin_menu(app: &App, rl: &mut DefaultEditor, session: &mut SessionContext) -> Result<()> {
    loop {
        if session.current().is_none() {
            // reset_accounts logged us out
            return Ok(());
        }

        println!();
        println!("==============================================");
        println!("  ADMINISTRATION DASHBOARD");
        println!("==============================================");
        match app.stats.stats().await {
            Ok(snapshot) => {
                println!("Registered accounts:  {}", snapshot.total_accounts);
                println!("Trains in catalog:    {}", snapshot.total_trains);
                println!("Active reservations:  {}", snapshot.total_reservations);
                println!("System seat capacity: {}", snapshot.total_seats);
                println!("Seats booked:         {}", snapshot.booked_seats);
                println!("Occupancy:            {:.2}%", snapshot.occupancy_percent);
            }
            Err(err) => report(err),
        }
        println!();
        println!("1. Reset all seats & clear bookings (DANGER)");
        println!("2. Reset all accounts & re-register admin (DANGER)");
        println!("3. Back");

        let Some(choice) = prompt(rl, "Choice (1-3): ")? else {
            return Ok(());
        };

        match choice.as_str() {
            "1" => {
                if confirmed(rl, "Delete ALL reservations and reset every seat?")? {
                    match app.admin.reset_seating(session).await {
                        Ok(purged) => println!("Cleared {purged} reservations, all seats reset."),
                        Err(err) => report(err),
                    }
                }
            }
            "2" => {
                if confirmed(rl, "Delete ALL accounts and their reservations?")? {
                    let Some(new_password) = prompt(rl, "New admin password: ")? else {
                        continue;
                    };
                    match app.admin.reset_accounts(session, &new_password).await {
                        Ok(()) => {
                            println!("All accounts cleared, admin re-registered.");
                            println!("You have been logged out; log in with the new password.");
                        }
                        Err(err) => report(err),
                    }
                }
            }
            "3" => return Ok(()),
            _ => println!("Invalid choice."),
        }
    }
}

fn confirmed(rl: &mut DefaultEditor, warning: &str) -> Result<bool> {
    println!("DANGER: {warning}");
    let answer = prompt(rl, "Type 'YES' to confirm: ")?;
    Ok(answer.as_deref() == Some("YES"))
}

fn report(err: EngineError) {
    println!("Failed: {err}");
}

/// Read one trimmed line; None means the user hit Ctrl-C/Ctrl-D.
fn prompt(rl: &mut DefaultEditor, text: &str) -> Result<Option<String>> {
    match rl.readline(text) {
        Ok(line) => Ok(Some(line.trim().to_string())),
        Err(ReadlineError::Interrupted | ReadlineError::Eof) => Ok(None),
        Err(err) => Err(err.into()),
    }
}
