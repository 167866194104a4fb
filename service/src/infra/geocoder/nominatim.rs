//! [Nominatim] [`Geocoder`] implementation.
//!
//! [Nominatim]: https://nominatim.org

use common::operations::{By, Select};
use secrecy::{ExposeSecret as _, SecretString};
use serde::Deserialize;
use smart_default::SmartDefault;
use tracerr::Traced;

use crate::{
    domain::{
        geocoding::{Address, Location},
        rental::{Latitude, Longitude},
    },
    infra::geocoder::{self, Geocoder},
};

/// [`Nominatim`] configuration.
#[derive(Clone, Debug, SmartDefault)]
pub struct Config {
    /// Base URL of the [Nominatim]-compatible service.
    ///
    /// [Nominatim]: https://nominatim.org
    #[default("https://nominatim.openstreetmap.org".to_owned())]
    pub base_url: String,

    /// `User-Agent` header identifying this application to the service.
    #[default("RentalExperienceMap/1.0".to_owned())]
    pub user_agent: String,

    /// API key of the service, if it requires one.
    pub api_key: Option<SecretString>,
}

/// [Nominatim]-compatible HTTP [`Geocoder`].
///
/// [Nominatim]: https://nominatim.org
#[derive(Clone, Debug)]
pub struct Nominatim {
    /// HTTP client to perform requests with.
    client: reqwest::Client,

    /// URL of the search endpoint.
    search_url: String,

    /// API key of the service, if any.
    api_key: Option<SecretString>,
}

impl Nominatim {
    /// Creates a new [`Nominatim`] [`Geocoder`] with the provided [`Config`].
    ///
    /// # Errors
    ///
    /// If failed to initialize an HTTP client.
    pub fn new(conf: Config) -> Result<Self, Traced<geocoder::Error>> {
        let Config {
            base_url,
            user_agent,
            api_key,
        } = conf;

        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(tracerr::from_and_wrap!(=> geocoder::Error))?;

        Ok(Self {
            client,
            search_url: format!("{}/search", base_url.trim_end_matches('/')),
            api_key,
        })
    }
}

/// Single place in a [Nominatim] search response.
///
/// [Nominatim]: https://nominatim.org
#[derive(Debug, Deserialize)]
struct Place {
    /// Full human-readable address of this [`Place`].
    display_name: String,

    /// Latitude of this [`Place`], as a decimal string.
    lat: String,

    /// Longitude of this [`Place`], as a decimal string.
    lon: String,
}

impl TryFrom<Place> for Location {
    type Error = geocoder::Error;

    fn try_from(place: Place) -> Result<Self, Self::Error> {
        let Place {
            display_name,
            lat,
            lon,
        } = place;

        let lat = lat
            .trim()
            .parse()
            .ok()
            .and_then(Latitude::new)
            .ok_or_else(|| {
                geocoder::Error::Malformed(format!("invalid `lat`: {lat}"))
            })?;
        let lng = lon
            .trim()
            .parse()
            .ok()
            .and_then(Longitude::new)
            .ok_or_else(|| {
                geocoder::Error::Malformed(format!("invalid `lon`: {lon}"))
            })?;

        Ok(Self {
            formatted_address: display_name,
            lat,
            lng,
        })
    }
}

impl Geocoder<Select<By<Option<Location>, Address>>> for Nominatim {
    type Ok = Option<Location>;
    type Err = Traced<geocoder::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Location>, Address>>,
    ) -> Result<Self::Ok, Self::Err> {
        let address = by.into_inner();

        let mut params = vec![
            ("format", "json"),
            ("q", address.as_ref()),
            ("limit", "1"),
            ("addressdetails", "1"),
        ];
        if let Some(key) = &self.api_key {
            params.push(("key", key.expose_secret()));
        }

        let places = self
            .client
            .get(&self.search_url)
            .query(&params)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(tracerr::from_and_wrap!(=> geocoder::Error))?
            .json::<Vec<Place>>()
            .await
            .map_err(tracerr::from_and_wrap!(=> geocoder::Error))?;

        places
            .into_iter()
            .next()
            .map(Location::try_from)
            .transpose()
            .map_err(tracerr::wrap!())
    }
}

#[cfg(test)]
mod spec {
    use common::operations::{By, Select};
    use mockito::Matcher;
    use secrecy::SecretString;

    use crate::{
        domain::geocoding::Address,
        infra::geocoder::{self, Geocoder as _},
    };

    use super::{Config, Nominatim};

    fn geocoder(server: &mockito::ServerGuard, key: Option<&str>) -> Nominatim {
        Nominatim::new(Config {
            base_url: server.url(),
            api_key: key.map(|k| SecretString::from(k.to_owned())),
            ..Config::default()
        })
        .unwrap()
    }

    fn address(s: &str) -> Address {
        Address::new(s).unwrap()
    }

    #[tokio::test]
    async fn resolves_first_place() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/search")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("format".into(), "json".into()),
                Matcher::UrlEncoded("q".into(), "台北101".into()),
                Matcher::UrlEncoded("limit".into(), "1".into()),
                Matcher::UrlEncoded("addressdetails".into(), "1".into()),
            ]))
            .match_header("user-agent", "RentalExperienceMap/1.0")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[{"display_name":"台北101, 信義區, 臺北市",
                     "lat":"25.0339639","lon":"121.5644722"}]"#,
            )
            .create_async()
            .await;

        let location = geocoder(&server, None)
            .execute(Select(By::new(address("台北101"))))
            .await
            .unwrap()
            .unwrap();

        mock.assert_async().await;
        assert_eq!(location.formatted_address, "台北101, 信義區, 臺北市");
        assert!((f64::from(location.lat) - 25.033_963_9).abs() < 1e-9);
        assert!((f64::from(location.lng) - 121.564_472_2).abs() < 1e-9);
    }

    #[tokio::test]
    async fn returns_nothing_on_empty_response() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let location = geocoder(&server, None)
            .execute(Select(By::new(address("nowhere"))))
            .await
            .unwrap();

        assert_eq!(location, None);
    }

    #[tokio::test]
    async fn passes_api_key() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/search")
            .match_query(Matcher::UrlEncoded("key".into(), "s3cr3t".into()))
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let _ = geocoder(&server, Some("s3cr3t"))
            .execute(Select(By::new(address("anywhere"))))
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn fails_on_upstream_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let err = geocoder(&server, None)
            .execute(Select(By::new(address("anywhere"))))
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), geocoder::Error::Request(_)));
    }

    #[tokio::test]
    async fn fails_on_malformed_coordinates() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"[{"display_name":"x","lat":"north","lon":"1"}]"#)
            .create_async()
            .await;

        let err = geocoder(&server, None)
            .execute(Select(By::new(address("anywhere"))))
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), geocoder::Error::Malformed(_)));
    }
}
