//! Geocoding definitions.

use std::sync::LazyLock;

use regex::Regex;

use super::rental::{Latitude, Longitude};

define_text! {
    /// Free-text address to be geocoded.
    Address, max_len = 512
}

/// Address prefix ending with a city (`市`/`縣`) and a district
/// (`區`/`鄉`/`鎮`/`市`).
static CITY_DISTRICT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<head>.+?[市縣].+?[區鄉鎮市])").unwrap_or_else(|e| {
        panic!("invalid `CITY_DISTRICT` regex: {e}")
    })
});

/// Address prefix preceding a building number (`7號`, `7之1號`).
static HOUSE_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<head>.+?)\d+(?:[之\-－]\d+)?號").unwrap_or_else(|e| {
        panic!("invalid `HOUSE_NUMBER` regex: {e}")
    })
});

/// Address prefix preceding a lane (`123巷`) or an alley (`4弄`) number.
static LANE_OR_ALLEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<head>.+?)\d+[巷弄]").unwrap_or_else(|e| {
        panic!("invalid `LANE_OR_ALLEY` regex: {e}")
    })
});

/// Address prefix ending with a road name (`路`, `街`, `大道`).
static ROAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<head>.+?[市縣].+?[區鄉鎮市].+?(?:大道|路|街))")
        .unwrap_or_else(|e| panic!("invalid `ROAD` regex: {e}"))
});

impl Address {
    /// Returns progressively less specific variants of this [`Address`],
    /// from the most specific one to the least.
    ///
    /// The variants are: without the building number, without the lane or
    /// alley, truncated to the road name, and truncated to the city and
    /// district. Duplicates and variants equal to this [`Address`] are
    /// omitted.
    ///
    /// Returns nothing if this [`Address`] doesn't contain both city and
    /// district markers.
    #[must_use]
    pub fn simplifications(&self) -> Vec<Self> {
        let address = self.0.as_str();
        let Some(city_district) = head_of(&CITY_DISTRICT, address) else {
            return Vec::new();
        };

        let candidates = [
            head_of(&HOUSE_NUMBER, address),
            head_of(&LANE_OR_ALLEY, address),
            head_of(&ROAD, address),
            Some(city_district),
        ];

        let mut variants: Vec<Self> = Vec::with_capacity(candidates.len());
        for candidate in candidates.into_iter().flatten() {
            let Some(variant) = Self::new(candidate.trim()) else {
                continue;
            };
            if variant != *self && !variants.contains(&variant) {
                variants.push(variant);
            }
        }
        variants
    }
}

/// Returns the `head` capture group of the provided [`Regex`] matched against
/// the provided `address`.
fn head_of<'a>(regex: &Regex, address: &'a str) -> Option<&'a str> {
    regex
        .captures(address)
        .and_then(|c| c.name("head"))
        .map(|m| m.as_str())
}

/// Geographic location resolved out of an [`Address`].
#[derive(Clone, Debug, PartialEq)]
pub struct Location {
    /// Human-readable address of this [`Location`] as formatted by the
    /// geocoder.
    pub formatted_address: String,

    /// [`Latitude`] of this [`Location`].
    pub lat: Latitude,

    /// [`Longitude`] of this [`Location`].
    pub lng: Longitude,
}

#[cfg(test)]
mod spec {
    use super::Address;

    fn simplify(address: &str) -> Vec<String> {
        Address::new(address)
            .unwrap()
            .simplifications()
            .into_iter()
            .map(|a| a.to_string())
            .collect()
    }

    #[test]
    fn strips_number_then_section_then_road() {
        assert_eq!(
            simplify("台北市信義區信義路五段7號"),
            ["台北市信義區信義路五段", "台北市信義區信義路", "台北市信義區"],
        );
    }

    #[test]
    fn strips_floor_and_sub_number() {
        assert_eq!(
            simplify("台北市中山區南京東路二段100之1號3樓"),
            [
                "台北市中山區南京東路二段",
                "台北市中山區南京東路",
                "台北市中山區",
            ],
        );
    }

    #[test]
    fn strips_lane_and_alley() {
        assert_eq!(
            simplify("台北市大安區復興南路一段123巷4弄5號"),
            [
                "台北市大安區復興南路一段123巷4弄",
                "台北市大安區復興南路一段",
                "台北市大安區復興南路",
                "台北市大安區",
            ],
        );
    }

    #[test]
    fn handles_counties_and_townships() {
        assert_eq!(
            simplify("彰化縣鹿港鎮中山路88號"),
            ["彰化縣鹿港鎮中山路", "彰化縣鹿港鎮"],
        );
    }

    #[test]
    fn omits_variants_equal_to_original() {
        assert!(simplify("台北市信義區").is_empty());
        assert_eq!(simplify("台北市信義區信義路"), ["台北市信義區"]);
    }

    #[test]
    fn requires_city_and_district_markers() {
        assert!(simplify("信義路五段7號").is_empty());
        assert!(simplify("1600 Amphitheatre Parkway").is_empty());
    }
}
