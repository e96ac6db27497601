//! End-to-end walk through the registration flows against the simulated
//! registry. Run with:
//!
//! ```text
//! cargo run --example registration_flow
//! ```

use std::sync::Arc;

use mlah_core::api::SimulatedRegistry;
use mlah_core::app::App;
use mlah_core::config::Config;
use mlah_core::domain::session::UserType;
use mlah_core::domain::tourist::{HotelBookingDraft, TouristProfileDraft};
use mlah_core::security::InMemoryCredentialStore;
use mlah_core::storage::Database;

use chrono::NaiveDate;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut config = Config::default();
    config.api.simulate = true;
    config.api.simulated_latency_ms = 200;

    let db = Database::in_memory().await?;
    let app = App::assemble(
        db,
        Arc::new(SimulatedRegistry::new(config.api.latency())),
        Arc::new(InMemoryCredentialStore::new()),
        &config,
    )
    .await?;

    // Phone/OTP handshake; the simulated registry accepts "1234"
    app.session().request_otp("9876543210").await?;
    let identity = app.session().verify_otp("9876543210", "1234").await?;
    println!("signed in as {:?}", identity.name);

    app.session().set_user_type(UserType::Tourist).await?;

    let profile = app
        .tourist()
        .create_profile(TouristProfileDraft {
            name: "Asha Verma".into(),
            email: Some("asha@example.com".into()),
            phone: identity.phone,
            address: Some("12 Lake Road".into()),
            nationality: Some("Indian".into()),
            passport_number: None,
            profile_image: None,
            id_proof_images: None,
        })
        .await?;
    println!("registered tourist profile {}", profile.id);

    let booking = app
        .tourist()
        .book_hotel(HotelBookingDraft {
            hotel_name: "Lakeview".into(),
            check_in: NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date"),
            check_out: NaiveDate::from_ymd_opt(2025, 1, 4).expect("valid date"),
            guests: 2,
        })
        .await?;
    println!("hotel booked: {} ({})", booking.hotel_name, booking.status);

    app.session().complete_registration().await?;
    app.session().logout().await?;
    println!("signed out; profile retained: {}", app.tourist().profile().is_some());

    Ok(())
}
