//! # rootca - Self-Signed Root Certificate Authorities in Pure Rust
//!
//! rootca builds self-signed X.509 root CA certificates from a subject identity,
//! a validity window and the extensions that constrain what the CA may sign.
//! It is built on the RustCrypto crates and has no OpenSSL or ring dependency
//! outside of tests.
//!
//! ## Supported Key Types
//!
//! - **RSA**: any size the `rsa` crate accepts (2048 bits and up in practice)
//! - **ECDSA**: P-256
//!
//! ## What Goes Into the Certificate
//!
//! - **Basic Constraints** (critical): `cA = true`, with an optional
//!   `pathLenConstraint`
//! - **Key Usage** (critical): certificate signing and CRL signing
//! - **Name Constraints** (critical, only when domains are given): permitted
//!   and excluded `dNSName` subtrees
//! - **Subject Key Identifier**: SHA-1 of the subject public key
//!
//! Serial numbers are random, and the issuer is always the subject.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rootca::{
//!     authority::create_certificate_authority_with_options,
//!     cert::{
//!         constraints::NameConstraintSet,
//!         options::with_pathlen_option,
//!         params::{DistinguishedName, Validity},
//!     },
//!     key::KeyPair,
//! };
//!
//! # fn main() -> Result<(), rootca::error::RootCaError> {
//! let key = KeyPair::generate_rsa(2048)?;
//!
//! let subject = DistinguishedName::builder()
//!     .common_name("CA Name")
//!     .organizational_unit("OU")
//!     .organization("test")
//!     .country("US")
//!     .state("California")
//!     .locality("San Francisco")
//!     .build();
//!
//! let ca = create_certificate_authority_with_options(
//!     &key,
//!     &subject,
//!     &Validity::for_days(5 * 365)?,
//!     &NameConstraintSet::permitted([".example.com"]),
//!     [with_pathlen_option(0, false)],
//! )?;
//!
//! let raw = ca.raw_certificate()?;
//! raw.check_signature_from(&raw)?;
//! assert_eq!(raw.max_path_len()?, 0);
//!
//! println!("{}", ca.to_pem());
//! println!("{}", key.to_pkcs8_pem()?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Path Length
//!
//! [`cert::options::with_pathlen_option`] takes a limit and an `exclude` flag.
//! With `exclude` set the limit is explicitly removed; otherwise the limit is
//! written, `0` included. Leaving the option out and excluding the limit produce
//! the same certificate, and [`cert::RawCertificate::max_path_len`] reports `-1`
//! for both.
//!
//! ## Error Handling
//!
//! ```rust
//! use rootca::{error::RootCaError, key::KeyPair};
//!
//! match KeyPair::generate_rsa(0) {
//!     Ok(_) => unreachable!(),
//!     Err(RootCaError::KeyGenerationError(msg)) => println!("Failed to generate key: {}", msg),
//!     Err(e) => println!("Other error: {}", e),
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`key`]: Key generation, signing and verification, PKCS#8 import/export
//! - [`cert`]: Certificate encoding, decoded view, extensions, constraints and options
//! - [`tbs_certificate`]: The unsigned certificate template
//! - [`issuer`]: Signing templates into certificates
//! - [`authority`]: Root CA construction entry points
//! - [`error`]: Error types

pub mod authority;
pub mod cert;
pub mod error;
pub mod issuer;
pub mod key;
pub mod tbs_certificate;
