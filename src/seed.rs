//! Guest account seeding.

use tracing::{info, instrument};

use crate::auth;
use crate::db::{GameRepository, NewUser};
use crate::service::ServiceError;

/// The pre-seeded guest roster. Usable without registration, persisted like
/// regular accounts for stats purposes.
const GUEST_ACCOUNTS: [(&str, &str); 10] = [
    ("EcoWarrior GreenHeart", "guest1pass"),
    ("SolarPump Champion", "guest2pass"),
    ("GeothermalGuru", "guest3pass"),
    ("HeatWave Hero", "guest4pass"),
    ("EfficientEagle", "guest5pass"),
    ("GreenEnergy Wizard", "guest6pass"),
    ("ThermalThunder", "guest7pass"),
    ("EcoFriendly Phoenix", "guest8pass"),
    ("RenewableRanger", "guest9pass"),
    ("SustainableSage", "guest10pass"),
];

/// Creates any guest accounts that do not exist yet.
///
/// Idempotent: existing accounts are left untouched. Returns how many
/// accounts were created.
///
/// # Errors
///
/// Returns [`ServiceError`] on a database or hashing failure.
#[instrument(skip(repository))]
pub fn seed_guest_accounts(repository: &GameRepository) -> Result<usize, ServiceError> {
    let mut created = 0;
    for (username, password) in GUEST_ACCOUNTS {
        if repository.get_user_by_username(username)?.is_some() {
            info!(username, "Guest account already exists");
            continue;
        }
        let password_hash = auth::hash_password(password)?;
        let user = repository.create_user(NewUser::new(
            username.to_string(),
            username.to_string(),
            password_hash,
            true,
        ))?;
        info!(user_id = user.id(), username, "Created guest account");
        created += 1;
    }
    info!(created, "Guest account seeding completed");
    Ok(created)
}
