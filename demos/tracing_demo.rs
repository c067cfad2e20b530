//! Demonstrates tracing integration with guards
//!
//! Run with: cargo run --example tracing_demo --features tracing

use plainguard::prelude::*;

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    tracing::info!("Starting tracing demo");

    match register("ada", 36) {
        Ok(()) => tracing::info!("Registration accepted"),
        Err(e) => tracing::error!("Registration rejected: {}", e),
    }

    match register(" ", 12) {
        Ok(()) => tracing::info!("Registration accepted"),
        Err(e) => tracing::error!("Registration rejected: {}", e),
    }

    // Every violation, not just the first
    let age = Expr::named("Age", 12);
    let report = check_all([
        (age.clone().ge(18), ErrorKind::ArgumentOutOfRange),
        (age.le(130), ErrorKind::ArgumentOutOfRange),
        (Expr::is_null_or_whitespace(Expr::named("Name", "")).not(), ErrorKind::Argument),
    ]);
    tracing::info!("Collected report: {:?}", report);
}

fn register(name: &str, age: i32) -> Result<(), GuardError> {
    name.is("Name").not_null_or_whitespace()?;
    age.is("Age").in_range(18, 130)?;
    Ok(())
}
