use const_oid::AssociatedOid;
use der::{
    Decode, Encode,
    asn1::{Ia5String, OctetString},
    oid::ObjectIdentifier,
};
use x509_cert::ext::pkix::constraints::name::GeneralSubtree;
use x509_cert::ext::pkix::name::GeneralName;

use crate::error::{Result, RootCaError};

/// Trait for converting to and from X.509 extensions.
///
/// This trait provides methods to encode and decode X.509 extension values.
///
/// # Example
/// ```
/// use rootca::cert::extensions::{NameConstraints, ToAndFromX509Extension};
/// let nc = NameConstraints {
///     permitted_dns_domains: vec![".example.com".to_string()],
///     excluded_dns_domains: vec![],
/// };
/// let encoded = nc.to_x509_extension_value().unwrap();
/// let decoded = NameConstraints::from_x509_extension_value(&encoded).unwrap();
/// assert_eq!(nc, decoded);
/// ```
pub trait ToAndFromX509Extension {
    /// The Object Identifier (OID) for the extension.
    const OID: ObjectIdentifier;

    /// Encodes the extension into a DER-encoded byte vector.
    fn to_x509_extension_value(&self) -> Result<Vec<u8>>;

    /// Decodes the extension from a DER-encoded byte slice.
    fn from_x509_extension_value(extension: &[u8]) -> Result<Self>
    where
        Self: Sized;
}

/// Represents the Basic Constraints extension.
///
/// # Fields
/// * `is_ca` - Indicates if the certificate is a CA.
/// * `max_path_length` - The maximum number of intermediate CAs allowed below
///   this one. `None` means no limit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BasicConstraints {
    pub is_ca: bool,
    pub max_path_length: Option<u8>,
}

impl ToAndFromX509Extension for BasicConstraints {
    const OID: ObjectIdentifier = x509_cert::ext::pkix::BasicConstraints::OID;

    fn to_x509_extension_value(&self) -> Result<Vec<u8>> {
        let bc = x509_cert::ext::pkix::BasicConstraints {
            ca: self.is_ca,
            path_len_constraint: self.max_path_length,
        };

        Ok(bc.to_der()?)
    }

    fn from_x509_extension_value(der_bytes: &[u8]) -> Result<Self> {
        let bc = x509_cert::ext::pkix::BasicConstraints::from_der(der_bytes)?;
        Ok(Self {
            is_ca: bc.ca,
            max_path_length: bc.path_len_constraint,
        })
    }
}

pub use der::flagset::FlagSet;
use x509_cert::ext::pkix::KeyUsage as X509KeyUsage;
pub use x509_cert::ext::pkix::KeyUsages;

/// Represents the Key Usage extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyUsage(pub FlagSet<KeyUsages>);

impl KeyUsage {
    /// Certificate and CRL signing, the usages a root CA needs.
    pub fn certificate_authority() -> Self {
        Self(KeyUsages::KeyCertSign | KeyUsages::CRLSign)
    }
}

impl ToAndFromX509Extension for KeyUsage {
    const OID: ObjectIdentifier = <X509KeyUsage as AssociatedOid>::OID;

    fn to_x509_extension_value(&self) -> Result<Vec<u8>> {
        let ku = X509KeyUsage(self.0);
        Ok(ku.to_der()?)
    }

    fn from_x509_extension_value(extension: &[u8]) -> Result<Self> {
        let ku = X509KeyUsage::from_der(extension)?;
        Ok(Self(ku.0))
    }
}

/// Represents the Name Constraints extension, restricted to `dNSName` subtrees.
///
/// Each entry becomes one GeneralSubtree whose base is the string as given, so
/// `.example.com` permits subdomains only while `example.com` also permits the
/// domain itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameConstraints {
    pub permitted_dns_domains: Vec<String>,
    pub excluded_dns_domains: Vec<String>,
}

fn dns_subtrees(domains: &[String]) -> Result<Option<Vec<GeneralSubtree>>> {
    if domains.is_empty() {
        return Ok(None);
    }
    domains
        .iter()
        .map(|domain| {
            let base = Ia5String::new(domain)
                .map(GeneralName::DnsName)
                .map_err(|e| RootCaError::InvalidInput(format!("{domain:?}: {e}")))?;
            Ok(GeneralSubtree {
                base,
                minimum: 0,
                maximum: None,
            })
        })
        .collect::<Result<Vec<_>>>()
        .map(Some)
}

fn dns_domains(subtrees: Option<&Vec<GeneralSubtree>>) -> Result<Vec<String>> {
    subtrees
        .into_iter()
        .flatten()
        .map(|subtree| match &subtree.base {
            GeneralName::DnsName(dns) => Ok(dns.to_string()),
            _ => Err(RootCaError::InvalidInput(
                "Unsupported general name type".to_string(),
            )),
        })
        .collect()
}

impl ToAndFromX509Extension for NameConstraints {
    const OID: ObjectIdentifier = x509_cert::ext::pkix::NameConstraints::OID;

    fn to_x509_extension_value(&self) -> Result<Vec<u8>> {
        let nc = x509_cert::ext::pkix::NameConstraints {
            permitted_subtrees: dns_subtrees(&self.permitted_dns_domains)?,
            excluded_subtrees: dns_subtrees(&self.excluded_dns_domains)?,
        };
        Ok(nc.to_der()?)
    }

    fn from_x509_extension_value(extension: &[u8]) -> Result<Self> {
        let nc = x509_cert::ext::pkix::NameConstraints::from_der(extension)?;
        Ok(Self {
            permitted_dns_domains: dns_domains(nc.permitted_subtrees.as_ref())?,
            excluded_dns_domains: dns_domains(nc.excluded_subtrees.as_ref())?,
        })
    }
}

/// Represents the Subject Key Identifier extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectKeyIdentifier {
    pub key_identifier: Vec<u8>,
}

impl ToAndFromX509Extension for SubjectKeyIdentifier {
    const OID: ObjectIdentifier = x509_cert::ext::pkix::SubjectKeyIdentifier::OID;

    fn to_x509_extension_value(&self) -> Result<Vec<u8>> {
        let ski = x509_cert::ext::pkix::SubjectKeyIdentifier(OctetString::new(
            self.key_identifier.as_slice(),
        )?);
        Ok(ski.to_der()?)
    }

    fn from_x509_extension_value(extension: &[u8]) -> Result<Self> {
        let ski = x509_cert::ext::pkix::SubjectKeyIdentifier::from_der(extension)?;
        Ok(Self {
            key_identifier: ski.0.as_bytes().to_vec(),
        })
    }
}
