use crate::models::CurrentUser;
use tokio::sync::watch;

/// Source of the current user and of sign-in state changes
pub trait IdentityProvider: Send + Sync {
    /// The signed-in user, if any
    fn current_user(&self) -> Option<CurrentUser>;

    /// Receiver that observes every sign-in and sign-out
    fn subscribe(&self) -> watch::Receiver<Option<CurrentUser>>;
}

/// In-process session holding the signed-in user
#[derive(Clone)]
pub struct AuthSession {
    user: watch::Sender<Option<CurrentUser>>,
}

impl AuthSession {
    pub fn new() -> Self {
        let (user, _) = watch::channel(None);
        Self { user }
    }

    pub fn set_user(&self, user: CurrentUser) {
        log::info!("Session started for {}", user.uid);
        self.user.send_replace(Some(user));
    }

    pub fn sign_out(&self) {
        if self.user.send_replace(None).is_some() {
            log::info!("Signed out");
        }
    }
}

impl Default for AuthSession {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityProvider for AuthSession {
    fn current_user(&self) -> Option<CurrentUser> {
        self.user.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<CurrentUser>> {
        self.user.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ada() -> CurrentUser {
        CurrentUser {
            uid: "u1".to_string(),
            display_name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            id_token: "token".to_string(),
        }
    }

    #[test]
    fn test_sign_in_and_out() {
        let session = AuthSession::new();
        assert!(session.current_user().is_none());

        session.set_user(ada());
        assert_eq!(session.current_user().unwrap().uid, "u1");

        session.sign_out();
        assert!(session.current_user().is_none());
    }

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let session = AuthSession::new();
        let mut rx = session.subscribe();

        session.set_user(ada());
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().as_ref().unwrap().display_name, "Ada");

        session.sign_out();
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_none());
    }

    #[test]
    fn test_clones_share_state() {
        let session = AuthSession::new();
        let other = session.clone();
        session.set_user(ada());
        assert_eq!(other.current_user(), Some(ada()));
    }
}
