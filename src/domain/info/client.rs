//! CA info sub-client.

use crate::client::CaClient;
use crate::context::Context;
use crate::domain::info::CaInfo;
use crate::error::SdkError;
use crate::http::Auth;
use crate::network::CA_INFO_PATH;

pub struct Info<'a> {
    pub(crate) client: &'a CaClient,
}

impl<'a> Info<'a> {
    /// Fetch CA name, version and chain. Unauthenticated.
    pub async fn get(&self, ctx: &Context) -> Result<CaInfo, SdkError> {
        ctx.run(self.client.http.get(CA_INFO_PATH, None, Auth::None, &[200]))
            .await
            .map_err(|kind| SdkError::new("get CA info", kind))
    }
}
