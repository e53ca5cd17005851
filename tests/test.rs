mod util;

use rootca::authority::{create_certificate_authority, create_certificate_authority_with_options};
use rootca::cert::Certificate;
use rootca::cert::constraints::NameConstraintSet;
use rootca::cert::extensions::KeyUsages;
use rootca::cert::options::with_pathlen_option;
use rootca::cert::params::Validity;
use rootca::error::RootCaError;
use rootca::key::KeyPair;
use time::OffsetDateTime;

#[test]
fn test_create_certificate_authority() {
    let key = KeyPair::generate_rsa(util::RSA_BITS).expect("Failed creating rsa key");
    let ca = create_certificate_authority(
        &key,
        &util::ca_subject(),
        &util::five_years(),
        &NameConstraintSet::permitted([".example.com"]),
    )
    .expect("Failed creating certificate authority");
    let raw = ca.raw_certificate().expect("Failed to decode certificate");

    raw.check_signature_from(&raw)
        .expect("Failed to check signature");

    assert_eq!(raw.subject().unwrap().organizational_unit, "OU");
    assert_eq!(raw.subject().unwrap(), util::ca_subject());
    assert_eq!(raw.issuer().unwrap(), util::ca_subject());

    let now = OffsetDateTime::now_utc();
    assert!(now > raw.not_before(), "Failed to be after NotBefore");
    assert!(now < raw.not_after(), "Failed to be before NotAfter");

    assert!(
        raw.permitted_dns_domains_critical().unwrap(),
        "Permitted DNS Domains is not set to critical"
    );
    assert_eq!(raw.permitted_dns_domains().unwrap(), vec![".example.com"]);
    assert!(raw.excluded_dns_domains().unwrap().is_empty());

    assert!(raw.is_ca().unwrap());
    assert_eq!(raw.max_path_len().unwrap(), -1);
    assert!(!raw.max_path_len_zero().unwrap());
}

#[test]
fn test_create_certificate_authority_with_options() {
    let cases = [(0, false), (1, false), (0, true), (1, true)];

    for (pathlen, exclude_pathlen) in cases {
        let name = format!("pathlen: {pathlen}, excludePathlen: {exclude_pathlen}");
        let key = KeyPair::generate_ecdsa_p256();
        let ca = util::generate_ca(&key, [with_pathlen_option(pathlen, exclude_pathlen)]);
        let raw = ca.raw_certificate().expect("Failed to decode certificate");

        raw.check_signature_from(&raw)
            .unwrap_or_else(|e| panic!("{name}: Failed to check signature: {e}"));
        assert_eq!(raw.subject().unwrap().organizational_unit, "OU", "{name}");

        let now = OffsetDateTime::now_utc();
        assert!(now > raw.not_before(), "{name}");
        assert!(now < raw.not_after(), "{name}");

        assert!(raw.permitted_dns_domains_critical().unwrap(), "{name}");
        assert_eq!(
            raw.permitted_dns_domains().unwrap(),
            vec![".example.com"],
            "{name}"
        );

        let expected = if exclude_pathlen {
            -1
        } else {
            i32::from(pathlen)
        };
        assert_eq!(raw.max_path_len().unwrap(), expected, "{name}: Wrong MaxPathLen value");
        assert_eq!(
            raw.max_path_len_zero().unwrap(),
            !exclude_pathlen && pathlen == 0,
            "{name}"
        );
    }
}

#[test]
fn test_key_usage_and_subject_key_id() {
    let key = KeyPair::generate_ecdsa_p256();
    let raw = util::generate_ca(&key, std::iter::empty()).raw_certificate().unwrap();

    let usage = raw.key_usage().unwrap().expect("key usage is present");
    assert!(usage.contains(KeyUsages::KeyCertSign));
    assert!(usage.contains(KeyUsages::CRLSign));

    let (critical, _) = raw
        .extension::<rootca::cert::extensions::KeyUsage>()
        .unwrap()
        .unwrap();
    assert!(critical);

    let ski = raw.subject_key_id().unwrap().expect("subject key id is present");
    assert_eq!(ski.len(), 20);
    assert_eq!(raw.public_key().unwrap(), key.public_key());
}

#[test]
fn test_excluded_domains() {
    let key = KeyPair::generate_ecdsa_p256();
    let domains = NameConstraintSet::builder()
        .permitted_dns_domains(vec![".example.com".to_string(), ".example.org".to_string()])
        .excluded_dns_domains(vec![".dev.example.com".to_string()])
        .build();
    let ca = create_certificate_authority(&key, &util::ca_subject(), &util::five_years(), &domains)
        .unwrap();
    let raw = ca.raw_certificate().unwrap();

    assert_eq!(
        raw.permitted_dns_domains().unwrap(),
        vec![".example.com", ".example.org"]
    );
    assert_eq!(raw.excluded_dns_domains().unwrap(), vec![".dev.example.com"]);
    assert!(raw.permitted_dns_domains_critical().unwrap());
}

#[test]
fn test_raw_certificate_is_deterministic() {
    let key = KeyPair::generate_ecdsa_p256();
    let ca = util::generate_ca(&key, [with_pathlen_option(1, false)]);

    let first = ca.raw_certificate().unwrap();
    let second = ca.raw_certificate().unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_concurrent_construction_is_independent() {
    let (first, second) = std::thread::scope(|scope| {
        let build = || {
            let key = KeyPair::generate_ecdsa_p256();
            util::generate_ca(&key, std::iter::empty()).raw_certificate().unwrap()
        };
        let a = scope.spawn(build);
        let b = scope.spawn(build);
        (a.join().unwrap(), b.join().unwrap())
    });

    assert_ne!(first.serial_number(), second.serial_number());
    assert_ne!(first.public_key().unwrap(), second.public_key().unwrap());
    first.check_signature_from(&first).unwrap();
    second.check_signature_from(&second).unwrap();
}

#[test]
fn test_signature_from_other_ca_is_rejected() {
    let first = util::generate_ca(&KeyPair::generate_ecdsa_p256(), std::iter::empty())
        .raw_certificate()
        .unwrap();
    let second = util::generate_ca(&KeyPair::generate_ecdsa_p256(), std::iter::empty())
        .raw_certificate()
        .unwrap();

    let err = first.check_signature_from(&second).unwrap_err();
    assert!(matches!(err, RootCaError::VerificationError(_)));
}

#[test]
fn test_pem_round_trip() {
    let key = KeyPair::generate_ecdsa_p256();
    let ca = util::generate_ca(&key, [with_pathlen_option(0, false)]);

    let pem = ca.to_pem();
    assert!(pem.starts_with("-----BEGIN CERTIFICATE-----\n"));

    let parsed = Certificate::from_pem(&pem).unwrap();
    assert_eq!(&parsed, ca.certificate());
    assert_eq!(parsed.decode().unwrap(), ca.raw_certificate().unwrap());
}

#[test]
fn test_rsa_and_ecdsa_keys_sign_with_matching_algorithms() -> Result<(), RootCaError> {
    let rsa_key = KeyPair::generate_rsa(util::RSA_BITS)?;
    let ec_key = KeyPair::generate_ecdsa_p256();

    for key in [rsa_key, ec_key] {
        let ca = create_certificate_authority_with_options(
            &key,
            &util::ca_subject(),
            &util::five_years(),
            &NameConstraintSet::default(),
            [with_pathlen_option(2, false)],
        )?;
        let raw = ca.raw_certificate()?;
        assert_eq!(raw.signature_algorithm()?, key.signature_algorithm());
        assert_eq!(raw.max_path_len()?, 2);
        raw.check_signature_from(&raw)?;
    }
    Ok(())
}

#[test]
fn test_corrupt_der_is_rejected() {
    let key = KeyPair::generate_ecdsa_p256();
    let ca = util::generate_ca(&key, std::iter::empty());
    let mut der = ca.to_der().to_vec();
    der.truncate(der.len() / 2);

    let err = Certificate::from_der(&der).unwrap_err();
    assert!(matches!(err, RootCaError::DecodingError(_)));
}

#[test]
fn test_sub_second_validity_window_is_rejected() {
    let second = OffsetDateTime::now_utc().replace_nanosecond(0).unwrap();
    let validity = Validity {
        not_before: second + time::Duration::milliseconds(100),
        not_after: second + time::Duration::milliseconds(600),
    };

    let err = create_certificate_authority(
        &KeyPair::generate_ecdsa_p256(),
        &util::ca_subject(),
        &validity,
        &NameConstraintSet::default(),
    )
    .unwrap_err();
    assert!(matches!(err, RootCaError::InvalidInput(_)));
}

#[test]
fn test_validity_with_local_offset_keeps_the_instant() {
    let offset = time::UtcOffset::from_hms(-5, 0, 0).unwrap();
    let not_after = (OffsetDateTime::now_utc() + time::Duration::days(30))
        .replace_nanosecond(0)
        .unwrap()
        .to_offset(offset);
    let key = KeyPair::generate_ecdsa_p256();
    let ca = create_certificate_authority(
        &key,
        &util::ca_subject(),
        &Validity::until(not_after).unwrap(),
        &NameConstraintSet::default(),
    )
    .unwrap();

    assert_eq!(ca.raw_certificate().unwrap().not_after(), not_after);
}
