use bon::Builder;

use super::extensions::{BasicConstraints, NameConstraints};
use super::options::CaOptions;
use super::params::ExtensionParam;
use crate::error::Result;

/// DNS suffixes a CA may, or may not, issue certificates for.
///
/// Strings are used as given. A leading dot (`.example.com`) restricts a
/// subtree to subdomains; without it the domain itself matches as well.
#[derive(Clone, Debug, Default, Builder, PartialEq, Eq)]
pub struct NameConstraintSet {
    #[builder(default)]
    pub permitted_dns_domains: Vec<String>,
    #[builder(default)]
    pub excluded_dns_domains: Vec<String>,
}

impl NameConstraintSet {
    /// A set with only permitted suffixes.
    pub fn permitted<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            permitted_dns_domains: domains.into_iter().map(Into::into).collect(),
            excluded_dns_domains: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.permitted_dns_domains.is_empty() && self.excluded_dns_domains.is_empty()
    }
}

/// Translates CA options and name constraints into certificate extensions.
///
/// BasicConstraints is always present with `cA` set and marked critical;
/// `pathLenConstraint` is only written for a bounded path length. The
/// NameConstraints extension is left out entirely when `domains` is empty and
/// is critical otherwise.
pub fn build_constraints(
    domains: &NameConstraintSet,
    options: &CaOptions,
) -> Result<Vec<ExtensionParam>> {
    let basic_constraints = BasicConstraints {
        is_ca: true,
        max_path_length: options.path_len.path_len_constraint(),
    };
    let mut extensions = vec![ExtensionParam::from_extension(&basic_constraints, true)?];

    if !domains.is_empty() {
        let name_constraints = NameConstraints {
            permitted_dns_domains: domains.permitted_dns_domains.clone(),
            excluded_dns_domains: domains.excluded_dns_domains.clone(),
        };
        extensions.push(ExtensionParam::from_extension(&name_constraints, true)?);
    }

    tracing::debug!(
        path_len = ?options.path_len,
        permitted = domains.permitted_dns_domains.len(),
        excluded = domains.excluded_dns_domains.len(),
        "built CA constraint extensions"
    );
    Ok(extensions)
}
