//! The StackExchange network site a profile is looked up on.
//!
//! The `/me` endpoint is scoped to a single site, so a user without an account
//! on the configured site has no profile there.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_SITE: &str = "stackoverflow";

/// API site parameters accepted for the `site` setting.
pub const KNOWN_SITES: &[&str] = &[
    "stackoverflow", "serverfault", "superuser", "meta", "webapps", "gaming",
    "webmasters", "cooking", "gamedev", "photo", "stats", "math", "diy", "gis",
    "tex", "askubuntu", "money", "english", "stackapps", "ux", "unix",
    "wordpress", "cstheory", "apple", "rpg", "bicycles", "softwareengineering",
    "electronics", "android", "boardgames", "physics", "homebrew", "security",
    "writers", "video", "graphicdesign", "dba", "scifi", "codereview",
    "codegolf", "quant", "pm", "skeptics", "fitness", "drupal", "mechanics",
    "parenting", "sharepoint", "music", "sqa", "judaism", "german", "japanese",
    "philosophy", "gardening", "travel", "productivity", "crypto", "dsp",
    "french", "christianity", "bitcoin", "linguistics", "hermeneutics",
    "history", "bricks", "spanish", "scicomp", "movies", "chinese", "biology",
    "poker", "mathematica", "psychology", "outdoors", "martialarts", "sports",
    "academia", "cs", "workplace", "windowsphone", "chemistry", "chess",
    "raspberrypi", "russian", "islam", "salesforce", "patents", "genealogy",
    "robotics", "expressionengine", "politics", "anime", "magento", "ell",
    "sustainability", "tridion", "reverseengineering", "networkengineering",
    "opendata", "freelancing", "blender", "mathoverflow", "space", "sound",
    "astronomy", "tor", "pets", "ham", "italian", "pt", "aviation", "ebooks",
    "alcohol", "softwarerecs", "arduino", "expatriates", "matheducators",
    "earthscience", "joomla", "datascience", "puzzling", "craftcms",
    "buddhism", "hinduism", "communitybuilding", "worldbuilding", "ja",
    "emacs", "hsm", "economics", "lifehacks", "engineering", "coffee", "vi",
    "musicfans", "woodworking", "civicrm", "health", "ru", "rus", "mythology",
    "law", "opensource", "elementaryos", "portuguese", "computergraphics",
    "hardwarerecs", "es", "ethereum", "latin", "languagelearning",
    "retrocomputing", "crafts", "korean", "monero", "ai", "esperanto",
    "sitecore", "iot", "literature", "vegetarianism", "ukrainian", "devops",
    "bioinformatics", "cseducators", "interpersonal", "augur", "iota",
];

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown StackExchange site: {0}")]
pub struct UnknownSite(pub String);

/// A site name known to be in [`KNOWN_SITES`].
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Site(String);

impl Site {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Site {
    fn default() -> Self {
        Site(DEFAULT_SITE.to_string())
    }
}

impl FromStr for Site {
    type Err = UnknownSite;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        if KNOWN_SITES.contains(&name) {
            Ok(Site(name.to_string()))
        } else {
            Err(UnknownSite(s.to_string()))
        }
    }
}

impl TryFrom<String> for Site {
    type Error = UnknownSite;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_stackoverflow() {
        assert_eq!(Site::default().as_str(), "stackoverflow");
    }

    #[test]
    fn parses_known_sites() {
        let site: Site = "mathoverflow".parse().unwrap();
        assert_eq!(site.to_string(), "mathoverflow");
        assert!(" superuser ".parse::<Site>().is_ok());
    }

    #[test]
    fn rejects_unknown_sites() {
        assert_eq!(
            "stackunderflow".parse::<Site>(),
            Err(UnknownSite("stackunderflow".into()))
        );
        assert!("StackOverflow".parse::<Site>().is_err());
    }

    #[test]
    fn deserializes_through_validation() {
        let site: Site = serde_json::from_str("\"askubuntu\"").unwrap();
        assert_eq!(site.as_str(), "askubuntu");
        assert!(serde_json::from_str::<Site>("\"nope\"").is_err());
    }
}
