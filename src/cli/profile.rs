use crate::{cli::spinner, error, info, session::Session, spotify};

/// Prints the profile of the signed-in user.
///
/// Fields Spotify only returns for certain scopes (email, country, plan) are
/// printed when present.
pub async fn me(session: &Session) {
    let pb = spinner("Fetching profile...");
    let result = spotify::profile::current_user(&session.dispatcher).await;
    pb.finish_and_clear();

    match result {
        Ok(profile) => {
            info!("Id: {}", profile.id);
            if let Some(name) = profile.display_name {
                info!("Name: {}", name);
            }
            if let Some(email) = profile.email {
                info!("Email: {}", email);
            }
            if let Some(country) = profile.country {
                info!("Country: {}", country);
            }
            if let Some(product) = profile.product {
                info!("Plan: {}", product);
            }
        }
        Err(e) => error!("Failed to fetch profile: {}", e),
    }
}
