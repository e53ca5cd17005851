use sha1::{Digest, Sha1};
use x509_cert::Version;
use x509_cert::serial_number::SerialNumber;
use x509_cert::spki::SubjectPublicKeyInfoOwned;

use crate::cert::SignatureAlgorithm;
use crate::cert::extensions::{KeyUsage, SubjectKeyIdentifier};
use crate::cert::params::{DistinguishedName, ExtensionParam, Validity};
use crate::error::{Result, RootCaError};
use crate::key::PublicKey;

/// Length of generated serial numbers in bytes. The top bit is cleared, which
/// leaves 127 random bits and keeps the encoding within 20 octets.
const SERIAL_NUMBER_LEN: usize = 16;

/// Represents the "To Be Signed" (TBS) portion of an X.509 certificate.
///
/// # Fields
/// * `serial_number` - The unique identifier for the certificate.
/// * `signature_algorithm` - The algorithm used to sign the certificate.
/// * `issuer` - The distinguished name of the certificate issuer.
/// * `validity` - The certificate's validity period.
/// * `subject` - The distinguished name of the certificate subject.
/// * `subject_public_key_info` - The public key of the certificate subject.
/// * `extensions` - Additional X.509 extensions for the certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TbsCertificate {
    /// Certificate serial number, big-endian
    pub serial_number: Vec<u8>,
    /// Certificate signature algorithm
    pub signature_algorithm: SignatureAlgorithm,
    /// Certificate issuer distinguished name
    pub issuer: DistinguishedName,
    /// Not before / not after
    pub validity: Validity,
    /// Certificate subject distinguished name
    pub subject: DistinguishedName,
    /// Subject's public key
    pub subject_public_key_info: SubjectPublicKeyInfoOwned,
    /// Certificate extensions
    pub extensions: Vec<ExtensionParam>,
}

impl TbsCertificate {
    /// Builds the unsigned template of a self-issued CA certificate.
    ///
    /// `constraints` comes from [`crate::cert::constraints::build_constraints`];
    /// KeyUsage (certificate and CRL signing, critical) and a SubjectKeyIdentifier
    /// are appended. The issuer is the subject and the signature algorithm is the
    /// one `public_key`'s private half produces.
    pub fn for_authority(
        subject: &DistinguishedName,
        validity: &Validity,
        constraints: Vec<ExtensionParam>,
        public_key: &PublicKey,
    ) -> Result<Self> {
        let validity = Validity::new(validity.not_before, validity.not_after)?;
        let subject_public_key_info = public_key.to_spki()?;

        let key_identifier = Sha1::digest(subject_public_key_info.subject_public_key.raw_bytes());
        let subject_key_id = SubjectKeyIdentifier {
            key_identifier: key_identifier.to_vec(),
        };

        let mut extensions = constraints;
        extensions.push(ExtensionParam::from_extension(
            &KeyUsage::certificate_authority(),
            true,
        )?);
        extensions.push(ExtensionParam::from_extension(&subject_key_id, false)?);

        Ok(Self {
            serial_number: random_serial_number(),
            signature_algorithm: public_key.signature_algorithm(),
            issuer: subject.clone(),
            validity,
            subject: subject.clone(),
            subject_public_key_info,
            extensions,
        })
    }

    /// Converts the `TbsCertificate` into the `x509-cert` structure for DER encoding.
    pub fn to_tbs_certificate_inner(&self) -> Result<x509_cert::TbsCertificate> {
        let extensions = self
            .extensions
            .iter()
            .map(ExtensionParam::to_x509_extension)
            .collect::<Result<Vec<_>>>()?;

        let serial_number = SerialNumber::new(self.serial_number.as_slice())
            .map_err(|e| RootCaError::EncodingError(format!("serial number: {e}")))?;

        Ok(x509_cert::TbsCertificate {
            version: Version::V3,
            serial_number,
            signature: self.signature_algorithm.into(),
            issuer: self.issuer.as_x509_name()?,
            validity: self.validity.to_x509_validity()?,
            subject: self.subject.as_x509_name()?,
            subject_public_key_info: self.subject_public_key_info.clone(),
            issuer_unique_id: None,
            subject_unique_id: None,
            extensions: Some(extensions),
        })
    }
}

/// A positive serial number with 127 bits of entropy.
fn random_serial_number() -> Vec<u8> {
    let mut serial: [u8; SERIAL_NUMBER_LEN] = rand::random();
    serial[0] &= 0x7f;
    serial.to_vec()
}
