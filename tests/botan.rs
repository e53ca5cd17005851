mod util;

use botan::Certificate as BotanCertificate;

use rootca::cert::options::with_pathlen_option;
use rootca::key::KeyPair;

fn check_cert(cert_der: &[u8]) {
    // Use botan crate to parse the DER and assert it succeeds
    BotanCertificate::load(cert_der).expect("Botan failed to parse certificate");
}

#[test]
#[ignore]
fn test_botan_ecdsa_p256() {
    let key_pair = KeyPair::generate_ecdsa_p256();
    let ca = util::generate_ca(&key_pair, [with_pathlen_option(0, false)]);
    check_cert(ca.to_der());
}

#[test]
#[ignore]
fn test_botan_rsa() {
    let key_pair = KeyPair::generate_rsa(util::RSA_BITS).unwrap();
    let ca = util::generate_ca(&key_pair, [with_pathlen_option(1, true)]);
    check_cert(ca.to_der());
}
