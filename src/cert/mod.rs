pub mod constraints;
pub mod extensions;
pub mod options;
pub mod params;

use der::{Decode, Encode};
use extensions::{
    BasicConstraints, FlagSet, KeyUsage, KeyUsages, NameConstraints, SubjectKeyIdentifier,
    ToAndFromX509Extension,
};
use params::DistinguishedName;
use time::OffsetDateTime;
use x509_cert::spki::AlgorithmIdentifierOwned;

use crate::error::{Result, RootCaError};
use crate::key::PublicKey;

const CERTIFICATE_PEM_LABEL: &str = "CERTIFICATE";

/// Represents the supported signature algorithms for certificates.
///
/// This enum provides a mapping to the corresponding OIDs for each algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    /// SHA-256 with RSA encryption.
    Sha256WithRSA,
    /// SHA-256 with ECDSA.
    Sha256WithECDSA,
}

impl From<SignatureAlgorithm> for AlgorithmIdentifierOwned {
    /// Converts a `SignatureAlgorithm` into an `AlgorithmIdentifierOwned`.
    ///
    /// RSA carries explicit NULL parameters (RFC 4055 section 5), ECDSA none
    /// (RFC 5758 section 3.2).
    fn from(value: SignatureAlgorithm) -> Self {
        match value {
            SignatureAlgorithm::Sha256WithRSA => AlgorithmIdentifierOwned {
                oid: const_oid::db::rfc5912::SHA_256_WITH_RSA_ENCRYPTION,
                parameters: Some(der::asn1::AnyRef::NULL.into()),
            },
            SignatureAlgorithm::Sha256WithECDSA => AlgorithmIdentifierOwned {
                oid: const_oid::db::rfc5912::ECDSA_WITH_SHA_256,
                parameters: None,
            },
        }
    }
}

impl TryFrom<&AlgorithmIdentifierOwned> for SignatureAlgorithm {
    type Error = RootCaError;

    fn try_from(value: &AlgorithmIdentifierOwned) -> Result<Self> {
        match value.oid {
            const_oid::db::rfc5912::SHA_256_WITH_RSA_ENCRYPTION => {
                Ok(SignatureAlgorithm::Sha256WithRSA)
            }
            const_oid::db::rfc5912::ECDSA_WITH_SHA_256 => Ok(SignatureAlgorithm::Sha256WithECDSA),
            other => Err(RootCaError::DecodingError(format!(
                "Unsupported signature algorithm {other}"
            ))),
        }
    }
}

/// A signed X.509 certificate, held in its DER encoding.
///
/// The bytes never change after construction; [`Certificate::decode`] derives
/// a structured view from them on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    der: Vec<u8>,
}

impl Certificate {
    /// Wraps DER produced by this crate's signer.
    pub(crate) fn from_signed_der(der: Vec<u8>) -> Self {
        Self { der }
    }

    /// Parses a DER-encoded certificate, rejecting anything that does not decode.
    pub fn from_der(der: &[u8]) -> Result<Self> {
        x509_cert::Certificate::from_der(der)?;
        Ok(Self { der: der.to_vec() })
    }

    /// Parses the first `CERTIFICATE` block of a PEM document.
    pub fn from_pem(pem_str: &str) -> Result<Self> {
        let parsed = pem::parse(pem_str).map_err(|e| RootCaError::DecodingError(e.to_string()))?;
        if parsed.tag() != CERTIFICATE_PEM_LABEL {
            return Err(RootCaError::InvalidInput(format!(
                "expected a {CERTIFICATE_PEM_LABEL} PEM block, found {}",
                parsed.tag()
            )));
        }
        Self::from_der(parsed.contents())
    }

    pub fn to_der(&self) -> &[u8] {
        &self.der
    }

    /// Encodes the certificate into PEM format with LF line endings.
    pub fn to_pem(&self) -> String {
        let pem = pem::Pem::new(CERTIFICATE_PEM_LABEL, self.der.as_slice());
        pem::encode_config(
            &pem,
            pem::EncodeConfig::new().set_line_ending(pem::LineEnding::LF),
        )
    }

    /// Decodes the stored bytes into a [`RawCertificate`].
    ///
    /// Each call decodes afresh, so repeated calls return equal values.
    pub fn decode(&self) -> Result<RawCertificate> {
        let inner = x509_cert::Certificate::from_der(&self.der)?;
        Ok(RawCertificate { inner })
    }
}

/// Decoded view of a certificate, with accessors for the fields a root CA sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCertificate {
    /// The inner representation of the certificate.
    pub inner: x509_cert::Certificate,
}

impl RawCertificate {
    pub fn subject(&self) -> Result<DistinguishedName> {
        DistinguishedName::from_x509_name(&self.inner.tbs_certificate.subject)
    }

    pub fn issuer(&self) -> Result<DistinguishedName> {
        DistinguishedName::from_x509_name(&self.inner.tbs_certificate.issuer)
    }

    /// Big-endian magnitude of the serial number.
    pub fn serial_number(&self) -> Vec<u8> {
        self.inner
            .tbs_certificate
            .serial_number
            .as_bytes()
            .to_vec()
    }

    pub fn not_before(&self) -> OffsetDateTime {
        params::from_x509_time(&self.inner.tbs_certificate.validity.not_before)
    }

    pub fn not_after(&self) -> OffsetDateTime {
        params::from_x509_time(&self.inner.tbs_certificate.validity.not_after)
    }

    pub fn signature_algorithm(&self) -> Result<SignatureAlgorithm> {
        SignatureAlgorithm::try_from(&self.inner.signature_algorithm)
    }

    pub fn public_key(&self) -> Result<PublicKey> {
        PublicKey::from_spki(&self.inner.tbs_certificate.subject_public_key_info)
    }

    /// Finds and decodes an extension, returning it with its critical flag.
    pub fn extension<E: ToAndFromX509Extension>(&self) -> Result<Option<(bool, E)>> {
        let Some(extensions) = self.inner.tbs_certificate.extensions.as_ref() else {
            return Ok(None);
        };
        extensions
            .iter()
            .find(|ext| ext.extn_id == E::OID)
            .map(|ext| {
                E::from_x509_extension_value(ext.extn_value.as_bytes())
                    .map(|value| (ext.critical, value))
            })
            .transpose()
    }

    pub fn basic_constraints(&self) -> Result<Option<BasicConstraints>> {
        Ok(self.extension::<BasicConstraints>()?.map(|(_, bc)| bc))
    }

    pub fn is_ca(&self) -> Result<bool> {
        Ok(self.basic_constraints()?.is_some_and(|bc| bc.is_ca))
    }

    /// The path length limit, `-1` when the certificate carries none.
    pub fn max_path_len(&self) -> Result<i32> {
        Ok(self
            .basic_constraints()?
            .and_then(|bc| bc.max_path_length)
            .map(i32::from)
            .unwrap_or(-1))
    }

    /// True when an explicit limit of zero is present.
    pub fn max_path_len_zero(&self) -> Result<bool> {
        Ok(self
            .basic_constraints()?
            .is_some_and(|bc| bc.max_path_length == Some(0)))
    }

    pub fn key_usage(&self) -> Result<Option<FlagSet<KeyUsages>>> {
        Ok(self.extension::<KeyUsage>()?.map(|(_, ku)| ku.0))
    }

    pub fn subject_key_id(&self) -> Result<Option<Vec<u8>>> {
        Ok(self
            .extension::<SubjectKeyIdentifier>()?
            .map(|(_, ski)| ski.key_identifier))
    }

    pub fn permitted_dns_domains(&self) -> Result<Vec<String>> {
        Ok(self
            .extension::<NameConstraints>()?
            .map(|(_, nc)| nc.permitted_dns_domains)
            .unwrap_or_default())
    }

    pub fn excluded_dns_domains(&self) -> Result<Vec<String>> {
        Ok(self
            .extension::<NameConstraints>()?
            .map(|(_, nc)| nc.excluded_dns_domains)
            .unwrap_or_default())
    }

    /// Whether the name constraints extension is present and critical.
    pub fn permitted_dns_domains_critical(&self) -> Result<bool> {
        Ok(self
            .extension::<NameConstraints>()?
            .is_some_and(|(critical, _)| critical))
    }

    /// Checks that `parent` is a CA and that its key produced this
    /// certificate's signature. For a self-signed root pass the certificate itself.
    pub fn check_signature_from(&self, parent: &RawCertificate) -> Result<()> {
        if !parent.is_ca()? {
            return Err(RootCaError::VerificationError(
                "parent certificate is not a CA".to_string(),
            ));
        }
        let algorithm = self.signature_algorithm()?;
        let tbs_der = self
            .inner
            .tbs_certificate
            .to_der()
            .map_err(|e| RootCaError::EncodingError(e.to_string()))?;
        parent
            .public_key()?
            .verify(&algorithm, &tbs_der, self.inner.signature.raw_bytes())
    }
}
