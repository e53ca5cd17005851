use der::Encode;
use der::asn1::BitString;

use crate::cert::Certificate;
use crate::cert::params::DistinguishedName;
use crate::error::{Result, RootCaError};
use crate::key::KeyPair;
use crate::tbs_certificate::TbsCertificate;

/// Represents an entity capable of signing certificate templates.
pub trait Issuer {
    /// Returns the distinguished name of the issuer.
    fn issuer_name(&self) -> &DistinguishedName;

    /// Returns the signing key of the issuer.
    fn signing_key(&self) -> &KeyPair;

    /// Signs `tbs_cert` and returns the DER-encoded certificate.
    ///
    /// The template's issuer is overwritten with [`Issuer::issuer_name`]. Every
    /// failure, including a template whose signature algorithm does not match
    /// the signing key, is reported as [`RootCaError::SigningError`].
    fn sign(&self, mut tbs_cert: TbsCertificate) -> Result<Certificate> {
        let key = self.signing_key();
        let algorithm = key.signature_algorithm();
        if tbs_cert.signature_algorithm != algorithm {
            return Err(RootCaError::SigningError(format!(
                "template expects {:?} but the signing key produces {algorithm:?}",
                tbs_cert.signature_algorithm
            )));
        }
        tbs_cert.issuer = self.issuer_name().clone();

        let tbs_cert_inner = tbs_cert
            .to_tbs_certificate_inner()
            .map_err(|e| RootCaError::SigningError(e.to_string()))?;
        let tbs_der = tbs_cert_inner
            .to_der()
            .map_err(|e| RootCaError::SigningError(e.to_string()))?;
        let signature = key.sign_data(&tbs_der)?;

        let cert_inner = x509_cert::Certificate {
            tbs_certificate: tbs_cert_inner,
            signature_algorithm: algorithm.into(),
            signature: BitString::from_bytes(&signature)
                .map_err(|e| RootCaError::SigningError(e.to_string()))?,
        };
        let cert_der = cert_inner
            .to_der()
            .map_err(|e| RootCaError::SigningError(e.to_string()))?;

        tracing::debug!(
            issuer = %self.issuer_name().common_name,
            ?algorithm,
            len = cert_der.len(),
            "signed certificate"
        );
        Ok(Certificate::from_signed_der(cert_der))
    }
}

/// Issuer for self-signed certificates: the subject signs with its own key.
pub struct SelfIssuer<'a> {
    name: &'a DistinguishedName,
    key: &'a KeyPair,
}

impl<'a> SelfIssuer<'a> {
    pub fn new(name: &'a DistinguishedName, key: &'a KeyPair) -> Self {
        Self { name, key }
    }
}

impl Issuer for SelfIssuer<'_> {
    fn issuer_name(&self) -> &DistinguishedName {
        self.name
    }

    fn signing_key(&self) -> &KeyPair {
        self.key
    }
}
