use crate::{error::RequestError, spotify::RequestDispatcher, types::UserProfile};

/// Retrieves the profile of the signed-in user (`GET /me`).
pub async fn current_user(dispatcher: &RequestDispatcher) -> Result<UserProfile, RequestError> {
    dispatcher.get_json("/me").await
}
