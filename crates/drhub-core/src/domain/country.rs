use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Resolved home market of a DR's underlying instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Country {
    Us,
    Cn,
    Hk,
    Jp,
    Sg,
    Vn,
    Eu,
    Tw,
    Kr,
}

impl Country {
    pub const ALL: [Self; 9] = [
        Self::Us,
        Self::Cn,
        Self::Hk,
        Self::Jp,
        Self::Sg,
        Self::Vn,
        Self::Eu,
        Self::Tw,
        Self::Kr,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Us => "US",
            Self::Cn => "CN",
            Self::Hk => "HK",
            Self::Jp => "JP",
            Self::Sg => "SG",
            Self::Vn => "VN",
            Self::Eu => "EU",
            Self::Tw => "TW",
            Self::Kr => "KR",
        }
    }

    /// Thai display name used by the listing views.
    pub const fn name_th(self) -> &'static str {
        match self {
            Self::Us => "สหรัฐอเมริกา",
            Self::Cn => "จีน",
            Self::Hk => "ฮ่องกง",
            Self::Jp => "ญี่ปุ่น",
            Self::Sg => "สิงคโปร์",
            Self::Vn => "เวียดนาม",
            Self::Eu => "ยุโรป",
            Self::Tw => "ไต้หวัน",
            Self::Kr => "เกาหลีใต้",
        }
    }

    pub const fn flag(self) -> &'static str {
        match self {
            Self::Us => "🇺🇸",
            Self::Cn => "🇨🇳",
            Self::Hk => "🇭🇰",
            Self::Jp => "🇯🇵",
            Self::Sg => "🇸🇬",
            Self::Vn => "🇻🇳",
            Self::Eu => "🇪🇺",
            Self::Tw => "🇹🇼",
            Self::Kr => "🇰🇷",
        }
    }
}

impl Display for Country {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Country {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "US" => Ok(Self::Us),
            "CN" => Ok(Self::Cn),
            "HK" => Ok(Self::Hk),
            "JP" => Ok(Self::Jp),
            "SG" => Ok(Self::Sg),
            "VN" => Ok(Self::Vn),
            "EU" => Ok(Self::Eu),
            "TW" => Ok(Self::Tw),
            "KR" => Ok(Self::Kr),
            other => Err(ValidationError::InvalidCountry {
                value: other.to_owned(),
            }),
        }
    }
}

/// Business sector label attached to every DR record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sector {
    #[serde(rename = "ETF")]
    Etf,
    Finance,
    Technology,
    Auto,
    Consumer,
    Healthcare,
    Luxury,
    Entertainment,
    Energy,
    #[serde(rename = "Real Estate")]
    RealEstate,
    Telecom,
}

impl Sector {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Etf => "ETF",
            Self::Finance => "Finance",
            Self::Technology => "Technology",
            Self::Auto => "Auto",
            Self::Consumer => "Consumer",
            Self::Healthcare => "Healthcare",
            Self::Luxury => "Luxury",
            Self::Entertainment => "Entertainment",
            Self::Energy => "Energy",
            Self::RealEstate => "Real Estate",
            Self::Telecom => "Telecom",
        }
    }
}

impl Display for Sector {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
