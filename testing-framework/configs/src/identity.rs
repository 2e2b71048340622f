use std::{fmt, str::FromStr};

use serde_with::{DeserializeFromStr, SerializeDisplay};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentityParseError {
    #[error("attribute '{attribute}' is missing a '=' separator")]
    MissingSeparator { attribute: String },
    #[error("unknown attribute '{key}'")]
    UnknownAttribute { key: String },
    #[error("attribute '{key}' is declared more than once")]
    DuplicateAttribute { key: &'static str },
    #[error("attribute '{key}' must not be empty")]
    EmptyValue { key: &'static str },
    #[error("attribute '{key}' value '{value}' must not contain ','")]
    ReservedCharacter { key: &'static str, value: String },
    #[error("required attribute '{key}' is missing")]
    MissingAttribute { key: &'static str },
    #[error("country code '{country}' must be two upper-case ASCII letters")]
    InvalidCountry { country: String },
}

/// X.500 style name of a network participant.
///
/// Attribute order in the parsed string is irrelevant; `Display` always
/// renders the canonical `CN, OU, O, L, ST, C` order so equal identities print
/// identically.
#[derive(
    Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, SerializeDisplay, DeserializeFromStr,
)]
pub struct Identity {
    common_name: Option<String>,
    organization_unit: Option<String>,
    organization: String,
    locality: String,
    state: Option<String>,
    country: String,
}

impl Identity {
    pub fn new(
        organization: impl Into<String>,
        locality: impl Into<String>,
        country: impl Into<String>,
    ) -> Result<Self, IdentityParseError> {
        let identity = Self {
            common_name: None,
            organization_unit: None,
            organization: attribute_value("O", organization)?,
            locality: attribute_value("L", locality)?,
            state: None,
            country: attribute_value("C", country)?,
        };
        identity.check_country()?;
        Ok(identity)
    }

    #[must_use]
    pub fn common_name(&self) -> Option<&str> {
        self.common_name.as_deref()
    }

    #[must_use]
    pub fn organization_unit(&self) -> Option<&str> {
        self.organization_unit.as_deref()
    }

    #[must_use]
    pub fn organization(&self) -> &str {
        &self.organization
    }

    #[must_use]
    pub fn locality(&self) -> &str {
        &self.locality
    }

    #[must_use]
    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    #[must_use]
    pub fn country(&self) -> &str {
        &self.country
    }

    /// Copy of this identity with the common name replaced.
    pub fn with_common_name(
        &self,
        common_name: impl Into<String>,
    ) -> Result<Self, IdentityParseError> {
        Ok(Self {
            common_name: Some(attribute_value("CN", common_name)?),
            ..self.clone()
        })
    }

    pub fn with_organization_unit(
        mut self,
        unit: impl Into<String>,
    ) -> Result<Self, IdentityParseError> {
        self.organization_unit = Some(attribute_value("OU", unit)?);
        Ok(self)
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Result<Self, IdentityParseError> {
        self.state = Some(attribute_value("ST", state)?);
        Ok(self)
    }

    /// Copy with `tag` appended to the common name, or used as the common
    /// name when there is none. `tag` must be a valid attribute value.
    pub(crate) fn with_common_name_tag(&self, tag: &str) -> Self {
        let common_name = match &self.common_name {
            Some(common_name) => format!("{common_name} {tag}"),
            None => tag.to_owned(),
        };
        Self {
            common_name: Some(common_name),
            ..self.clone()
        }
    }

    fn check_country(&self) -> Result<(), IdentityParseError> {
        let country_ok =
            self.country.len() == 2 && self.country.chars().all(|c| c.is_ascii_uppercase());
        if !country_ok {
            return Err(IdentityParseError::InvalidCountry {
                country: self.country.clone(),
            });
        }
        Ok(())
    }
}

/// Trimmed attribute value that renders back through `Display` unchanged.
fn attribute_value(
    key: &'static str,
    value: impl Into<String>,
) -> Result<String, IdentityParseError> {
    let value = value.into();
    let value = value.trim();
    if value.is_empty() {
        return Err(IdentityParseError::EmptyValue { key });
    }
    if value.contains(',') {
        return Err(IdentityParseError::ReservedCharacter {
            key,
            value: value.to_owned(),
        });
    }
    Ok(value.to_owned())
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let attributes = [
            ("CN", self.common_name.as_deref()),
            ("OU", self.organization_unit.as_deref()),
            ("O", Some(self.organization.as_str())),
            ("L", Some(self.locality.as_str())),
            ("ST", self.state.as_deref()),
            ("C", Some(self.country.as_str())),
        ];

        let mut first = true;
        for (key, value) in attributes {
            let Some(value) = value else {
                continue;
            };
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{key}={value}")?;
            first = false;
        }
        Ok(())
    }
}

impl FromStr for Identity {
    type Err = IdentityParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let mut common_name = None;
        let mut organization_unit = None;
        let mut organization = None;
        let mut locality = None;
        let mut state = None;
        let mut country = None;

        for attribute in raw.split(',') {
            let (key, value) = attribute.split_once('=').ok_or_else(|| {
                IdentityParseError::MissingSeparator {
                    attribute: attribute.trim().to_owned(),
                }
            })?;

            let (key, slot) = match key.trim().to_ascii_uppercase().as_str() {
                "CN" => ("CN", &mut common_name),
                "OU" => ("OU", &mut organization_unit),
                "O" => ("O", &mut organization),
                "L" => ("L", &mut locality),
                "ST" => ("ST", &mut state),
                "C" => ("C", &mut country),
                _ => {
                    return Err(IdentityParseError::UnknownAttribute {
                        key: key.trim().to_owned(),
                    });
                }
            };

            if slot.is_some() {
                return Err(IdentityParseError::DuplicateAttribute { key });
            }

            *slot = Some(attribute_value(key, value)?);
        }

        let identity = Self {
            common_name,
            organization_unit,
            organization: organization.ok_or(IdentityParseError::MissingAttribute { key: "O" })?,
            locality: locality.ok_or(IdentityParseError::MissingAttribute { key: "L" })?,
            state,
            country: country.ok_or(IdentityParseError::MissingAttribute { key: "C" })?,
        };
        identity.check_country()?;

        Ok(identity)
    }
}
