use bon::Builder;
use const_oid::ObjectIdentifier;
use der::asn1::{
    Any, GeneralizedTime, OctetString, PrintableStringRef, SetOfVec, UtcTime, Utf8StringRef,
};
use der::{DateTime, Tag, Tagged};
use time::{Duration, OffsetDateTime, UtcOffset};
use x509_cert::attr::AttributeTypeAndValue;
use x509_cert::name::{Name, RdnSequence, RelativeDistinguishedName};

use super::extensions::ToAndFromX509Extension;
use crate::error::{Result, RootCaError};

const COUNTRY: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.6");
const ORGANIZATION: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.10");
const ORGANIZATIONAL_UNIT: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.11");
const LOCALITY: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.7");
const STATE_OR_PROVINCE: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.8");
const COMMON_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.3");

/// How far `not_before` is pushed into the past by [`Validity::until`].
pub const CLOCK_SKEW_ALLOWANCE: Duration = Duration::minutes(1);

/// Years a DER `Time` can carry.
const ENCODABLE_YEARS: std::ops::RangeInclusive<i32> = 1970..=9999;
/// Years RFC 5280 requires to be written as UTCTime.
const UTC_TIME_YEARS: std::ops::Range<i32> = 1950..2050;

/// Subject identity of the certificate authority.
///
/// Values are copied into the certificate verbatim. Empty fields are left
/// out of the encoded name rather than encoded as empty strings.
///
/// # Fields
/// * `common_name` - The common name (CN).
/// * `country` - The country (C).
/// * `state` - The state or province (ST).
/// * `locality` - The locality or city (L).
/// * `organization` - The organization (O).
/// * `organizational_unit` - The organizational unit (OU).
#[derive(Clone, Debug, Builder, Default, PartialEq, Eq)]
pub struct DistinguishedName {
    #[builder(default, into)]
    pub common_name: String,
    #[builder(default, into)]
    pub country: String,
    #[builder(default, into)]
    pub state: String,
    #[builder(default, into)]
    pub locality: String,
    #[builder(default, into)]
    pub organization: String,
    #[builder(default, into)]
    pub organizational_unit: String,
}

impl DistinguishedName {
    /// Converts the distinguished name to an X.509 `Name`.
    ///
    /// Attributes are emitted in the order C, O, OU, L, ST, CN, one per RDN.
    /// A value is a PrintableString when the character set allows it and a
    /// UTF8String otherwise.
    pub fn as_x509_name(&self) -> Result<Name> {
        let attributes = [
            (COUNTRY, &self.country),
            (ORGANIZATION, &self.organization),
            (ORGANIZATIONAL_UNIT, &self.organizational_unit),
            (LOCALITY, &self.locality),
            (STATE_OR_PROVINCE, &self.state),
            (COMMON_NAME, &self.common_name),
        ];

        let mut rdns = Vec::new();
        for (oid, value) in attributes {
            if value.is_empty() {
                continue;
            }
            let atv = AttributeTypeAndValue {
                oid,
                value: encode_directory_string(value)?,
            };
            let set = SetOfVec::try_from(vec![atv])
                .map_err(|e| RootCaError::EncodingError(e.to_string()))?;
            rdns.push(RelativeDistinguishedName(set));
        }
        Ok(RdnSequence(rdns))
    }

    /// Reads the six supported attributes back out of an X.509 `Name`.
    ///
    /// Unknown attributes are skipped. When an attribute repeats, the first
    /// occurrence wins.
    pub fn from_x509_name(name: &Name) -> Result<Self> {
        let mut dn = DistinguishedName::default();
        for rdn in name.0.iter() {
            for attr in rdn.0.iter() {
                let field = match attr.oid {
                    COUNTRY => &mut dn.country,
                    ORGANIZATION => &mut dn.organization,
                    ORGANIZATIONAL_UNIT => &mut dn.organizational_unit,
                    LOCALITY => &mut dn.locality,
                    STATE_OR_PROVINCE => &mut dn.state,
                    COMMON_NAME => &mut dn.common_name,
                    _ => continue,
                };
                if field.is_empty() {
                    *field = decode_directory_string(&attr.value)?;
                }
            }
        }
        Ok(dn)
    }
}

fn encode_directory_string(value: &str) -> Result<Any> {
    let encoded = match PrintableStringRef::new(value) {
        Ok(printable) => Any::encode_from(&printable),
        Err(_) => Utf8StringRef::new(value).and_then(|utf8| Any::encode_from(&utf8)),
    };
    encoded.map_err(|e| RootCaError::EncodingError(e.to_string()))
}

fn decode_directory_string(value: &Any) -> Result<String> {
    match value.tag() {
        Tag::PrintableString | Tag::Utf8String | Tag::Ia5String => {
            std::str::from_utf8(value.value())
                .map(str::to_owned)
                .map_err(|e| RootCaError::DecodingError(e.to_string()))
        }
        other => Err(RootCaError::DecodingError(format!(
            "unsupported directory string type {other}"
        ))),
    }
}

/// Certificate validity period.
///
/// Bounds built through [`Validity::new`] are in UTC with whole seconds, and
/// `not_before` is strictly earlier than `not_after`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Validity {
    pub not_before: OffsetDateTime,
    pub not_after: OffsetDateTime,
}

impl Validity {
    /// Sub-second precision is dropped before the bounds are compared, since
    /// certificates only carry whole seconds.
    pub fn new(not_before: OffsetDateTime, not_after: OffsetDateTime) -> Result<Self> {
        let not_before = to_encodable_instant(not_before)?;
        let not_after = to_encodable_instant(not_after)?;
        if not_before >= not_after {
            return Err(RootCaError::InvalidInput(format!(
                "validity window is empty: not_before {not_before} is not before not_after {not_after}"
            )));
        }
        Ok(Self {
            not_before,
            not_after,
        })
    }

    /// A window that opens now, backdated by [`CLOCK_SKEW_ALLOWANCE`], and
    /// closes at `not_after`.
    pub fn until(not_after: OffsetDateTime) -> Result<Self> {
        Self::new(OffsetDateTime::now_utc() - CLOCK_SKEW_ALLOWANCE, not_after)
    }

    /// Creates a validity period starting now for the given number of days.
    pub fn for_days(days: i64) -> Result<Self> {
        Self::until(OffsetDateTime::now_utc() + Duration::days(days))
    }

    pub fn to_x509_validity(&self) -> Result<x509_cert::time::Validity> {
        Ok(x509_cert::time::Validity {
            not_before: to_x509_time(self.not_before)?,
            not_after: to_x509_time(self.not_after)?,
        })
    }
}

fn to_encodable_instant(instant: OffsetDateTime) -> Result<OffsetDateTime> {
    let utc = instant
        .checked_to_offset(UtcOffset::UTC)
        .filter(|utc| ENCODABLE_YEARS.contains(&utc.year()))
        .ok_or_else(|| {
            RootCaError::InvalidInput(format!(
                "{instant} is outside the years {}..={} a certificate can carry",
                ENCODABLE_YEARS.start(),
                ENCODABLE_YEARS.end()
            ))
        })?;
    utc.replace_nanosecond(0)
        .map_err(|e| RootCaError::InvalidInput(e.to_string()))
}

/// RFC 5280 4.1.2.5: UTCTime for 1950 through 2049, GeneralizedTime otherwise.
/// The year is taken in UTC, whatever offset `instant` carries.
fn to_x509_time(instant: OffsetDateTime) -> Result<x509_cert::time::Time> {
    let utc = to_encodable_instant(instant)?;
    let year = u16::try_from(utc.year())
        .map_err(|e| RootCaError::EncodingError(format!("{instant}: {e}")))?;
    let time = DateTime::new(
        year,
        u8::from(utc.month()),
        utc.day(),
        utc.hour(),
        utc.minute(),
        utc.second(),
    )
    .and_then(|datetime| {
        if UTC_TIME_YEARS.contains(&utc.year()) {
            UtcTime::from_date_time(datetime).map(x509_cert::time::Time::UtcTime)
        } else {
            Ok(x509_cert::time::Time::GeneralTime(
                GeneralizedTime::from_date_time(datetime),
            ))
        }
    });
    time.map_err(|e| RootCaError::EncodingError(format!("{instant}: {e}")))
}

pub(crate) fn from_x509_time(time: &x509_cert::time::Time) -> OffsetDateTime {
    match time {
        x509_cert::time::Time::UtcTime(ut) => OffsetDateTime::from(ut.to_system_time()),
        x509_cert::time::Time::GeneralTime(gt) => OffsetDateTime::from(gt.to_system_time()),
    }
}

/// Represents an X.509 extension.
///
/// # Fields
/// * `oid` - The object identifier of the extension.
/// * `critical` - Indicates if the extension is critical.
/// * `value` - The DER-encoded value of the extension.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtensionParam {
    pub oid: ObjectIdentifier,
    pub critical: bool,
    /// DER-encoded extension value
    pub value: Vec<u8>,
}

impl ExtensionParam {
    /// Creates an `ExtensionParam` from a specific extension.
    pub fn from_extension<E: ToAndFromX509Extension>(
        extension: &E,
        critical: bool,
    ) -> Result<Self> {
        Ok(Self {
            oid: E::OID,
            critical,
            value: extension.to_x509_extension_value()?,
        })
    }

    /// Decodes an `ExtensionParam` into a specific extension.
    pub fn to_extension<E: ToAndFromX509Extension>(&self) -> Result<E> {
        E::from_x509_extension_value(&self.value)
    }

    pub fn to_x509_extension(&self) -> Result<x509_cert::ext::Extension> {
        Ok(x509_cert::ext::Extension {
            extn_id: self.oid,
            critical: self.critical,
            extn_value: OctetString::new(self.value.clone())
                .map_err(|e| RootCaError::EncodingError(e.to_string()))?,
        })
    }
}
