//! Identities sub-client — register, list and look up identities.

use crate::client::CaClient;
use crate::context::Context;
use crate::domain::identity::wire::{IdentityListResponse, RegistrationResponse};
use crate::domain::identity::{Identity, RegistrationRequest};
use crate::error::SdkError;
use crate::http::Auth;
use crate::network::{IDENTITIES_PATH, REGISTER_PATH};

pub struct Identities<'a> {
    pub(crate) client: &'a CaClient,
}

impl<'a> Identities<'a> {
    /// Register a new identity. Returns its enrollment secret, generated by
    /// the CA when the request leaves it empty.
    pub async fn register(
        &self,
        ctx: &Context,
        request: &RegistrationRequest,
    ) -> Result<String, SdkError> {
        ctx.run(async {
            let resp: RegistrationResponse = self
                .client
                .http
                .post(REGISTER_PATH, None, request, Auth::Token, &[201])
                .await?;
            Ok(resp.secret)
        })
        .await
        .map_err(|kind| SdkError::new("register identity", kind))
    }

    /// All identities visible to the caller, in server order.
    pub async fn list(&self, ctx: &Context) -> Result<Vec<Identity>, SdkError> {
        ctx.run(async {
            let resp: IdentityListResponse = self
                .client
                .http
                .get(IDENTITIES_PATH, None, Auth::Token, &[200])
                .await?;
            Ok(resp.identities)
        })
        .await
        .map_err(|kind| SdkError::new("list identities", kind))
    }

    pub async fn get(&self, ctx: &Context, id: &str) -> Result<Identity, SdkError> {
        let path = format!("{}/{}", IDENTITIES_PATH, urlencoding::encode(id));
        ctx.run(self.client.http.get(&path, None, Auth::Token, &[200]))
            .await
            .map_err(|kind| SdkError::new("get identity", kind))
    }
}
