//! # Session Flows
//!
//! Sign-in, cached identity restoration, and sign-out through the wired desk.

#[cfg(test)]
mod tests {
    use crate::support::{user_json, Backend, PASSWORD, USERNAME};
    use cr_03_lifecycle::{LifecycleApi, LifecycleError};
    use cr_05_session::SessionError;
    use serde_json::json;
    use shared_bus::{DeskEvent, EventFilter, EventSubscriber, EventTopic};
    use shared_types::{LoginCredentials, SessionView};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, ResponseTemplate};

    #[tokio::test]
    async fn login_caches_identity_for_next_start() {
        let backend = Backend::start().await;
        let desk = backend.signed_in_desk().await;
        let cache = desk.config().session.identity_cache_path.clone();
        assert!(cache.exists());
        assert_eq!(desk.session().identity().unwrap().username, USERNAME);

        Mock::given(method("GET"))
            .and(path("/api/users/current"))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
            .expect(1)
            .mount(&backend.server)
            .await;

        let restarted = backend.desk();
        assert!(!restarted.session().is_authenticated());
        let restored = restarted.session().initialize().await.unwrap();
        assert_eq!(restored.username, USERNAME);
        assert!(restarted.session().is_authenticated());
    }

    #[tokio::test]
    async fn stale_cached_identity_is_discarded() {
        let backend = Backend::start().await;
        let desk = backend.signed_in_desk().await;
        let cache = desk.config().session.identity_cache_path.clone();
        assert!(cache.exists());

        Mock::given(method("GET"))
            .and(path("/api/users/current"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "Not authenticated" })))
            .mount(&backend.server)
            .await;

        let restarted = backend.desk();
        let mut notices = restarted
            .bus()
            .subscribe(EventFilter::topics(vec![EventTopic::Session]));
        assert!(restarted.session().initialize().await.is_none());
        assert!(!restarted.session().is_authenticated());
        assert!(!cache.exists());
        assert_eq!(
            notices.try_recv().unwrap(),
            Some(DeskEvent::SessionEnded {
                username: Some(USERNAME.to_string())
            })
        );
    }

    #[tokio::test]
    async fn nothing_cached_makes_no_request() {
        let backend = Backend::start().await;
        let desk = backend.desk();
        assert!(desk.session().initialize().await.is_none());
        assert_eq!(backend.hits("GET", "/api/users/current").await, 0);
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let backend = Backend::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({ "error": "Invalid username or password" })),
            )
            .mount(&backend.server)
            .await;

        let desk = backend.desk();
        let err = desk
            .session()
            .login(&LoginCredentials::new(USERNAME, "wrong"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            SessionError::InvalidCredentials("Invalid username or password".into())
        );
        assert!(!desk.session().is_authenticated());
        assert!(!desk.config().session.identity_cache_path.exists());
    }

    #[tokio::test]
    async fn logout_clears_state_even_when_backend_fails() {
        let backend = Backend::start().await;
        let desk = backend.signed_in_desk().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/logout"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&backend.server)
            .await;

        assert!(desk.session().logout().await.is_err());
        assert!(!desk.session().is_authenticated());
        assert!(!desk.config().session.identity_cache_path.exists());

        // Record operations now refuse without contacting the backend.
        let err = desk.lifecycle().refresh().await.unwrap_err();
        assert!(matches!(err, LifecycleError::Unauthenticated));
        assert_eq!(backend.hits("GET", "/api/students").await, 0);

        // Signing in again works.
        desk.session()
            .login(&LoginCredentials::new(USERNAME, PASSWORD))
            .await
            .unwrap();
        assert!(desk.session().is_authenticated());
    }
}
