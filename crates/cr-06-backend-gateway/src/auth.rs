//! `AuthGateway` over `/auth` and `/users`.

use crate::client::BackendClient;
use crate::decode;
use async_trait::async_trait;
use cr_05_session::AuthGateway;
use shared_types::{GatewayError, LoginCredentials, NewAdministrator, SystemStatus, UserProfile};

#[async_trait]
impl AuthGateway for BackendClient {
    async fn current_user(&self) -> Result<UserProfile, GatewayError> {
        let body = self.send(self.http.get(self.url("/users/current"))).await?;
        decode::user(&body)
    }

    async fn login(&self, credentials: &LoginCredentials) -> Result<UserProfile, GatewayError> {
        let body = self
            .send(self.http.post(self.url("/auth/login")).json(credentials))
            .await?;
        decode::user(&body)
    }

    async fn logout(&self) -> Result<(), GatewayError> {
        self.send(self.http.post(self.url("/auth/logout"))).await?;
        Ok(())
    }

    async fn system_status(&self) -> Result<SystemStatus, GatewayError> {
        let body = self.send(self.http.get(self.url("/auth/status"))).await?;
        decode::json(&body)
    }

    async fn setup_admin(&self, admin: &NewAdministrator) -> Result<UserProfile, GatewayError> {
        let body = self
            .send(self.http.post(self.url("/users/setup")).json(admin))
            .await?;
        decode::user(&body)
    }
}
