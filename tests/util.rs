#![allow(dead_code)]

use rootca::authority::{CertificateAuthority, create_certificate_authority_with_options};
use rootca::cert::constraints::NameConstraintSet;
use rootca::cert::options::CaOption;
use rootca::cert::params::{DistinguishedName, Validity};
use rootca::key::KeyPair;
use time::OffsetDateTime;

pub const RSA_BITS: usize = 2048;

pub fn ca_subject() -> DistinguishedName {
    DistinguishedName::builder()
        .organizational_unit("OU")
        .organization("test")
        .country("US")
        .state("California")
        .locality("San Francisco")
        .common_name("CA Name")
        .build()
}

/// Valid from now until five years from now.
pub fn five_years() -> Validity {
    Validity::until(OffsetDateTime::now_utc() + time::Duration::days(5 * 365))
        .expect("five year window is valid")
}

pub fn generate_ca<I>(key: &KeyPair, options: I) -> CertificateAuthority
where
    I: IntoIterator<Item = CaOption>,
{
    create_certificate_authority_with_options(
        key,
        &ca_subject(),
        &five_years(),
        &NameConstraintSet::permitted([".example.com"]),
        options,
    )
    .expect("Failed creating certificate authority")
}
