//! The normalized identity handed back to the host.

use crate::authenticator::provider::UserProfile;
use serde::Serialize;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Name {
    pub formatted: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Photo {
    pub value: String,
    pub primary: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Name>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub photos: Vec<Photo>,
    #[serde(rename = "stackExchangeUserId", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

/// Attributes describing the authentication itself rather than the user.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct ContextAttributes {
    pub access_token: String,
}

impl fmt::Debug for ContextAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextAttributes")
            .field("access_token", &"<redacted>")
            .finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AuthenticationResult {
    pub subject: String,
    pub subject_attributes: SubjectAttributes,
    pub context_attributes: ContextAttributes,
}

impl AuthenticationResult {
    pub fn from_profile(profile: UserProfile, access_token: String) -> Self {
        let subject_attributes = SubjectAttributes {
            profile_url: profile.link,
            country: profile.location,
            name: profile.display_name.clone().map(|formatted| Name { formatted }),
            display_name: profile.display_name,
            photos: profile
                .profile_image
                .map(|value| Photo {
                    value,
                    primary: false,
                })
                .into_iter()
                .collect(),
            user_id: profile.user_id,
            website: profile.website_url,
        };

        Self {
            subject: profile.account_id,
            subject_attributes,
            context_attributes: ContextAttributes { access_token },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ada() -> UserProfile {
        UserProfile {
            account_id: "42".into(),
            user_id: Some("1001".into()),
            display_name: Some("Ada".into()),
            link: Some("https://stackoverflow.com/users/1001/ada".into()),
            location: Some("SE".into()),
            profile_image: Some("https://img.example/ada.png".into()),
            website_url: Some("https://ada.example".into()),
        }
    }

    #[test]
    fn maps_every_profile_field() {
        let result = AuthenticationResult::from_profile(ada(), "T1".into());
        assert_eq!(result.subject, "42");
        assert_eq!(result.context_attributes.access_token, "T1");

        let attrs = result.subject_attributes;
        assert_eq!(attrs.display_name.as_deref(), Some("Ada"));
        assert_eq!(attrs.name, Some(Name { formatted: "Ada".into() }));
        assert_eq!(attrs.country.as_deref(), Some("SE"));
        assert_eq!(attrs.user_id.as_deref(), Some("1001"));
        assert_eq!(attrs.website.as_deref(), Some("https://ada.example"));
        assert_eq!(
            attrs.photos,
            vec![Photo {
                value: "https://img.example/ada.png".into(),
                primary: false
            }]
        );
    }

    #[test]
    fn missing_fields_are_omitted_from_json() {
        let profile = UserProfile {
            account_id: "7".into(),
            user_id: None,
            display_name: None,
            link: None,
            location: None,
            profile_image: None,
            website_url: None,
        };
        let result = AuthenticationResult::from_profile(profile, "tok".into());
        assert_eq!(serde_json::to_value(&result.subject_attributes).unwrap(), json!({}));
    }

    #[test]
    fn serializes_with_host_attribute_names() {
        let result = AuthenticationResult::from_profile(ada(), "T1".into());
        let value = serde_json::to_value(&result.subject_attributes).unwrap();
        assert_eq!(value["profileUrl"], "https://stackoverflow.com/users/1001/ada");
        assert_eq!(value["displayName"], "Ada");
        assert_eq!(value["name"]["formatted"], "Ada");
        assert_eq!(value["photos"][0]["primary"], false);
        assert_eq!(value["stackExchangeUserId"], "1001");
    }

    #[test]
    fn debug_output_hides_access_token() {
        let result = AuthenticationResult::from_profile(ada(), "super-secret".into());
        assert!(!format!("{result:?}").contains("super-secret"));
    }
}
