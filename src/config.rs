//! Service endpoints and HTTP client settings.
use std::time::Duration;

pub const TRIBAL_LEADERS_URL: &str = "https://www.bia.gov/tribal-leaders-json";
pub const BIA_REGIONS_URL: &str =
    "https://www.bia.gov/sites/bia.gov/files/assets/mapfiles/IARegionPolygonGeo.json";
/// Region numbers are appended to this prefix.
pub const CMT_BASIC_URL: &str = "https://systems.fws.gov/cmt/getCMTBasic.do?REGION=";
pub const FWS_TAXONOMY_URL: &str = "https://ecos.fws.gov/ServCatServices/v2/rest/taxonomy/";

pub const USER_AGENT: &str = concat!("fws-data/", env!("CARGO_PKG_VERSION"), " reqwest/0.12");
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where each data source lives. Defaults point at the public services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub tribal_leaders: String,
    pub bia_regions: String,
    pub cmt_basic: String,
    pub fws_taxonomy: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            tribal_leaders: TRIBAL_LEADERS_URL.to_string(),
            bia_regions: BIA_REGIONS_URL.to_string(),
            cmt_basic: CMT_BASIC_URL.to_string(),
            fws_taxonomy: FWS_TAXONOMY_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSettings {
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            user_agent: USER_AGENT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}
