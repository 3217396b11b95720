//! 由郵遞區號推算省份。
//!
//! 區間來源: https://nl.wikipedia.org/wiki/Postcode ，只涵蓋 Vlaanderen。
//! 省份不另外儲存，任何地方需要時都重新計算，以這裡的規則為準。

use crate::utils::error::{Result, StoreError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Province {
    #[serde(rename = "West-Vlaanderen")]
    WestVlaanderen,
    #[serde(rename = "Oost-Vlaanderen")]
    OostVlaanderen,
    #[serde(rename = "Antwerpen")]
    Antwerpen,
    #[serde(rename = "Vlaams-Brabant")]
    VlaamsBrabant,
    #[serde(rename = "Limburg")]
    Limburg,
}

impl Province {
    pub const ALL: [Province; 5] = [
        Province::WestVlaanderen,
        Province::OostVlaanderen,
        Province::Antwerpen,
        Province::VlaamsBrabant,
        Province::Limburg,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Province::WestVlaanderen => "West-Vlaanderen",
            Province::OostVlaanderen => "Oost-Vlaanderen",
            Province::Antwerpen => "Antwerpen",
            Province::VlaamsBrabant => "Vlaams-Brabant",
            Province::Limburg => "Limburg",
        }
    }
}

impl fmt::Display for Province {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Province {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self> {
        Province::ALL
            .into_iter()
            .find(|p| p.label() == s)
            .ok_or_else(|| StoreError::InvalidConfigValue {
                field: "province".to_string(),
                value: s.to_string(),
                reason: format!(
                    "Expected one of: {}",
                    Province::ALL.map(|p| p.label()).join(", ")
                ),
            })
    }
}

/// 區間為 [low, high)，不重疊，先符合者優先
const RANGES: [(u16, u16, Province); 6] = [
    (1500, 2000, Province::VlaamsBrabant),
    (3000, 3500, Province::VlaamsBrabant),
    (2000, 3000, Province::Antwerpen),
    (3500, 4000, Province::Limburg),
    (8000, 9000, Province::WestVlaanderen),
    (9000, 10000, Province::OostVlaanderen),
];

fn parse_postal_code(postal_code: &str) -> Result<u16> {
    let well_formed = postal_code.len() == 4 && postal_code.bytes().all(|b| b.is_ascii_digit());
    if !well_formed {
        return Err(StoreError::InvalidFormat {
            postal_code: postal_code.to_string(),
        });
    }
    postal_code
        .parse::<u16>()
        .map_err(|_| StoreError::InvalidFormat {
            postal_code: postal_code.to_string(),
        })
}

pub fn classify(postal_code: &str) -> Result<Province> {
    let code = parse_postal_code(postal_code)?;
    RANGES
        .iter()
        .find(|(low, high, _)| (*low..*high).contains(&code))
        .map(|(_, _, province)| *province)
        .ok_or_else(|| StoreError::OutOfRegion {
            postal_code: postal_code.to_string(),
        })
}

/// 有些全國性郵遞區號 (例如參議院) 不屬於任何省份，批次處理時直接略過
pub fn is_in_covered_region(postal_code: &str) -> bool {
    classify(postal_code).is_ok()
}
