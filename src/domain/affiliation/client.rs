//! Affiliations sub-client — list, create and delete affiliations.

use crate::client::CaClient;
use crate::context::Context;
use crate::domain::affiliation::wire::{AddAffiliationRequest, AffiliationCreateResponse};
use crate::domain::affiliation::{AffiliationOptions, AffiliationTree};
use crate::error::SdkError;
use crate::http::Auth;
use crate::network::AFFILIATIONS_PATH;

pub struct Affiliations<'a> {
    pub(crate) client: &'a CaClient,
}

impl<'a> Affiliations<'a> {
    /// The affiliation tree under `root`, or under the caller's own
    /// affiliation when `root` is `None`.
    pub async fn list(
        &self,
        ctx: &Context,
        root: Option<&str>,
    ) -> Result<AffiliationTree, SdkError> {
        let path = affiliation_path(root);
        ctx.run(self.client.http.get(&path, None, Auth::Token, &[200, 201]))
            .await
            .map_err(|kind| SdkError::new("list affiliations", kind))
    }

    pub async fn create(
        &self,
        ctx: &Context,
        name: &str,
        options: &AffiliationOptions,
    ) -> Result<(), SdkError> {
        ctx.run(async {
            let query = options.to_query()?;
            let body = AddAffiliationRequest {
                name: name.to_string(),
            };
            let resp: AffiliationCreateResponse = self
                .client
                .http
                .post(AFFILIATIONS_PATH, query.as_deref(), &body, Auth::Token, &[201])
                .await?;
            tracing::debug!(name = %resp.name, ca = %resp.ca_name, "Affiliation created");
            Ok(())
        })
        .await
        .map_err(|kind| SdkError::new("create affiliation", kind))
    }

    /// Delete `name`. Returns the removed subtree.
    pub async fn delete(
        &self,
        ctx: &Context,
        name: &str,
        options: &AffiliationOptions,
    ) -> Result<AffiliationTree, SdkError> {
        let path = affiliation_path(Some(name));
        ctx.run(async {
            let query = options.to_query()?;
            self.client
                .http
                .delete(&path, query.as_deref(), Auth::Token, &[200])
                .await
        })
        .await
        .map_err(|kind| SdkError::new("delete affiliation", kind))
    }
}

fn affiliation_path(name: Option<&str>) -> String {
    match name {
        Some(name) => format!("{}/{}", AFFILIATIONS_PATH, urlencoding::encode(name)),
        None => AFFILIATIONS_PATH.to_string(),
    }
}
