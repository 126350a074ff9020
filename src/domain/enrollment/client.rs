//! Enrollment sub-client.

use crate::client::CaClient;
use crate::context::Context;
use crate::crypto::{Certificate, PrivateKey};
use crate::domain::enrollment::csr::build_csr;
use crate::domain::enrollment::wire::{EnrollmentResponse, SignRequest};
use crate::domain::enrollment::{CertificateRequestTemplate, EnrollmentOptions};
use crate::error::{ErrorKind, SdkError};
use crate::http::Auth;
use crate::network::ENROLL_PATH;

pub struct Enrollment<'a> {
    pub(crate) client: &'a CaClient,
}

impl<'a> Enrollment<'a> {
    /// Enroll `name` with its registration `secret`.
    ///
    /// Uses HTTP Basic auth, so the client needs no identity. Returns the
    /// issued certificate and the key it certifies; persisting both is up to
    /// the caller.
    pub async fn enroll(
        &self,
        ctx: &Context,
        name: &str,
        secret: &str,
        template: &CertificateRequestTemplate,
        options: EnrollmentOptions,
    ) -> Result<(Certificate, PrivateKey), SdkError> {
        ctx.run(self.enroll_inner(ctx, name, secret, template, options))
            .await
            .map_err(|kind| SdkError::new("enroll", kind))
    }

    async fn enroll_inner(
        &self,
        ctx: &Context,
        name: &str,
        secret: &str,
        template: &CertificateRequestTemplate,
        options: EnrollmentOptions,
    ) -> Result<(Certificate, PrivateKey), ErrorKind> {
        let profile = options.profile_or_default().to_string();
        let key = match options.private_key {
            Some(key) => key,
            None => PrivateKey::generate(options.key_algorithm),
        };

        let request = SignRequest {
            request: build_csr(template, &key)?,
            profile,
            label: options.label,
            ca_name: options.ca_name,
        };

        let resp: EnrollmentResponse = self
            .client
            .http
            .post(
                ENROLL_PATH,
                None,
                &request,
                Auth::Basic { name, secret },
                &[201],
            )
            .await?;

        ctx.check()?;
        let certificate = Certificate::try_from(&resp)?;

        tracing::debug!(
            name,
            serial = certificate.serial(),
            not_after = %certificate.not_after(),
            "Enrolled"
        );
        Ok((certificate, key))
    }
}
