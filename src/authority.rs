use crate::cert::constraints::{NameConstraintSet, build_constraints};
use crate::cert::options::{CaOption, CaOptions};
use crate::cert::params::{DistinguishedName, Validity};
use crate::cert::{Certificate, RawCertificate};
use crate::error::Result;
use crate::issuer::{Issuer, SelfIssuer};
use crate::key::KeyPair;
use crate::tbs_certificate::TbsCertificate;

/// A self-signed root certificate authority.
///
/// Holds the signed certificate only; the private key stays with the caller.
/// Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateAuthority {
    certificate: Certificate,
}

impl CertificateAuthority {
    pub fn certificate(&self) -> &Certificate {
        &self.certificate
    }

    /// Decodes the signed certificate. Calls are independent and return equal
    /// values; an error means the stored encoding is corrupt.
    pub fn raw_certificate(&self) -> Result<RawCertificate> {
        self.certificate.decode()
    }

    pub fn to_der(&self) -> &[u8] {
        self.certificate.to_der()
    }

    pub fn to_pem(&self) -> String {
        self.certificate.to_pem()
    }
}

impl From<CertificateAuthority> for Certificate {
    fn from(ca: CertificateAuthority) -> Self {
        ca.certificate
    }
}

/// Creates a self-signed root CA with no optional parameters.
///
/// Same as [`create_certificate_authority_with_options`] with no options: the
/// certificate carries no path length limit.
pub fn create_certificate_authority(
    key: &KeyPair,
    subject: &DistinguishedName,
    validity: &Validity,
    domains: &NameConstraintSet,
) -> Result<CertificateAuthority> {
    create_certificate_authority_with_options(key, subject, validity, domains, std::iter::empty())
}

/// Creates a self-signed root CA.
///
/// `options` are applied in order, see [`crate::cert::options`]. The
/// certificate is signed by `key` and embeds its public half.
///
/// ```no_run
/// use rootca::authority::create_certificate_authority_with_options;
/// use rootca::cert::constraints::NameConstraintSet;
/// use rootca::cert::options::with_pathlen_option;
/// use rootca::cert::params::{DistinguishedName, Validity};
/// use rootca::key::KeyPair;
///
/// # fn main() -> Result<(), rootca::error::RootCaError> {
/// let key = KeyPair::generate_rsa(2048)?;
/// let subject = DistinguishedName::builder()
///     .common_name("Example Root CA")
///     .organization("Example Corp")
///     .country("US")
///     .build();
/// let ca = create_certificate_authority_with_options(
///     &key,
///     &subject,
///     &Validity::for_days(5 * 365)?,
///     &NameConstraintSet::permitted([".example.com"]),
///     [with_pathlen_option(0, false)],
/// )?;
/// println!("{}", ca.to_pem());
/// # Ok(())
/// # }
/// ```
pub fn create_certificate_authority_with_options<I>(
    key: &KeyPair,
    subject: &DistinguishedName,
    validity: &Validity,
    domains: &NameConstraintSet,
    options: I,
) -> Result<CertificateAuthority>
where
    I: IntoIterator<Item = CaOption>,
{
    let options = CaOptions::from_options(options);
    let constraints = build_constraints(domains, &options)?;
    let tbs_cert = TbsCertificate::for_authority(subject, validity, constraints, &key.public_key())?;
    let certificate = SelfIssuer::new(subject, key).sign(tbs_cert)?;

    tracing::debug!(
        common_name = %subject.common_name,
        not_after = %validity.not_after,
        "created certificate authority"
    );
    Ok(CertificateAuthority { certificate })
}
