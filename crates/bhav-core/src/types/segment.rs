//! 거래소/세그먼트 식별자.
//!
//! 아카이브는 (거래소, 세그먼트) 쌍 단위로 관리됩니다.
//! 식별자는 `NSE_EQ` 처럼 `<거래소>_<세그먼트>` 형식이며 대소문자를 구분하지 않습니다.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::BhavError;

/// 데이터 스트림 식별자.
///
/// 다운로더와 저장 경로를 선택하는 키로 사용됩니다. 유효한 값의 집합은 고정되어 있습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExchangeSegment {
    /// NSE 주식 (Capital Market)
    NseEq,
    /// NSE 선물/옵션
    NseFo,
    /// NSE SME 보드
    NseSme,
    /// NSE 지수
    NseIndex,
    /// BSE 주식
    BseEq,
    /// BSE 지수
    BseIndex,
}

impl ExchangeSegment {
    /// 알려진 모든 세그먼트 (정의 순서).
    pub const ALL: [ExchangeSegment; 6] = [
        ExchangeSegment::NseEq,
        ExchangeSegment::NseFo,
        ExchangeSegment::NseSme,
        ExchangeSegment::NseIndex,
        ExchangeSegment::BseEq,
        ExchangeSegment::BseIndex,
    ];

    /// 정규 식별자 (예: "NSE_EQ").
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NseEq => "NSE_EQ",
            Self::NseFo => "NSE_FO",
            Self::NseSme => "NSE_SME",
            Self::NseIndex => "NSE_INDEX",
            Self::BseEq => "BSE_EQ",
            Self::BseIndex => "BSE_INDEX",
        }
    }

    /// 거래소 이름 (예: "NSE").
    pub fn exchange(&self) -> &'static str {
        match self {
            Self::NseEq | Self::NseFo | Self::NseSme | Self::NseIndex => "NSE",
            Self::BseEq | Self::BseIndex => "BSE",
        }
    }

    /// 세그먼트 이름 (예: "EQ").
    pub fn segment(&self) -> &'static str {
        match self {
            Self::NseEq | Self::BseEq => "EQ",
            Self::NseFo => "FO",
            Self::NseSme => "SME",
            Self::NseIndex | Self::BseIndex => "INDEX",
        }
    }

    /// 유효한 식별자 목록.
    pub fn valid_ids() -> Vec<String> {
        Self::ALL.iter().map(|s| s.as_str().to_string()).collect()
    }

    /// 기본 다운로드 URL 템플릿 (chrono `strftime` 패턴).
    pub fn default_url_template(&self) -> &'static str {
        match self {
            Self::NseEq => {
                "https://nsearchives.nseindia.com/content/cm/BhavCopy_NSE_CM_0_0_0_%Y%m%d_F_0000.csv.zip"
            }
            Self::NseFo => {
                "https://nsearchives.nseindia.com/content/fo/BhavCopy_NSE_FO_0_0_0_%Y%m%d_F_0000.csv.zip"
            }
            Self::NseSme => "https://nsearchives.nseindia.com/archives/sme/bhavcopy/sme%d%m%y.csv",
            Self::NseIndex => "https://nsearchives.nseindia.com/content/indices/ind_close_all_%d%m%Y.csv",
            Self::BseEq => {
                "https://www.bseindia.com/download/BhavCopy/Equity/BhavCopy_BSE_CM_0_0_0_%Y%m%d_F_0000.CSV"
            }
            Self::BseIndex => "https://www.bseindia.com/bsedata/Index_Bhavcopy/INDEXSummary_%d%m%Y.csv",
        }
    }

    /// 식별자 목록을 검증하고 파싱합니다.
    ///
    /// 하나라도 알 수 없는 식별자가 있으면 전체를 거부합니다 (all-or-nothing).
    /// 중복 식별자는 처음 등장한 순서대로 하나만 남깁니다.
    pub fn parse_many<S: AsRef<str>>(ids: &[S]) -> Result<Vec<Self>, BhavError> {
        let mut parsed = Vec::with_capacity(ids.len());
        let mut invalid = Vec::new();

        for id in ids {
            match id.as_ref().parse::<Self>() {
                Ok(segment) => {
                    if !parsed.contains(&segment) {
                        parsed.push(segment);
                    }
                }
                Err(_) => invalid.push(id.as_ref().to_string()),
            }
        }

        if invalid.is_empty() {
            Ok(parsed)
        } else {
            Err(BhavError::UnknownSegments {
                invalid,
                valid: Self::valid_ids(),
            })
        }
    }
}

impl fmt::Display for ExchangeSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExchangeSegment {
    type Err = BhavError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();
        Self::ALL
            .iter()
            .copied()
            .find(|segment| segment.as_str() == normalized)
            .ok_or_else(|| BhavError::UnknownSegments {
                invalid: vec![s.to_string()],
                valid: Self::valid_ids(),
            })
    }
}

impl Serialize for ExchangeSegment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ExchangeSegment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
