//! Certificates sub-client — listing and revocation.

use crate::client::CaClient;
use crate::context::Context;
use crate::crypto::Certificate;
use crate::domain::certificate::convert::decode_certificates;
use crate::domain::certificate::wire::{CertificateListResponse, RevocationResponse};
use crate::domain::certificate::{CertificateListParams, RevocationRequest, RevocationResult};
use crate::error::{ErrorKind, SdkError};
use crate::http::Auth;
use crate::network::{CERTIFICATES_PATH, REVOKE_PATH};

pub struct Certificates<'a> {
    pub(crate) client: &'a CaClient,
}

impl<'a> Certificates<'a> {
    /// Certificates matching `params`, in server order.
    ///
    /// Fails as a whole if any entry does not decode.
    pub async fn list(
        &self,
        ctx: &Context,
        params: &CertificateListParams,
    ) -> Result<Vec<Certificate>, SdkError> {
        ctx.run(async {
            let query = params.to_query()?;
            let resp: CertificateListResponse = self
                .client
                .http
                .get(CERTIFICATES_PATH, query.as_deref(), Auth::Token, &[200])
                .await?;
            decode_certificates(ctx, &resp.certs)
        })
        .await
        .map_err(|kind| SdkError::new("list certificates", kind))
    }

    /// Revoke one certificate or every certificate of an identity.
    pub async fn revoke(
        &self,
        ctx: &Context,
        request: &RevocationRequest,
    ) -> Result<RevocationResult, SdkError> {
        ctx.run(async {
            if request.id.is_empty() && (request.serial.is_empty() || request.aki.is_empty()) {
                return Err(ErrorKind::InvalidRequest(
                    "revocation needs an id, or a serial with its aki".to_string(),
                ));
            }
            let resp: RevocationResponse = self
                .client
                .http
                .post(REVOKE_PATH, None, request, Auth::Token, &[200])
                .await?;
            ctx.check()?;
            Ok(RevocationResult::try_from(resp)?)
        })
        .await
        .map_err(|kind| SdkError::new("revoke", kind))
    }
}
