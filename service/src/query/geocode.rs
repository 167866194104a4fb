//! [`Query`] for geocoding an [`Address`].

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    domain::geocoding::{Address, Location},
    infra::{geocoder, Geocoder},
    read::geocoding::Outcome,
    Service,
};

use super::Query;

/// [`Query`] for resolving an [`Address`] into a [`Location`].
///
/// If the [`Address`] doesn't resolve as is, its
/// [simplifications](Address::simplifications) are tried one by one, waiting
/// for [`Config::geocoding_retry_delay`] before each retry.
///
/// [`Config::geocoding_retry_delay`]: crate::Config::geocoding_retry_delay
#[derive(Clone, Debug)]
pub struct Geocode {
    /// [`Address`] to be geocoded.
    pub address: Address,
}

impl<Db, Geo> Query<Geocode> for Service<Db, Geo>
where
    Geo: Geocoder<
        Select<By<Option<Location>, Address>>,
        Ok = Option<Location>,
        Err = Traced<geocoder::Error>,
    >,
{
    type Ok = Outcome;
    type Err = Traced<geocoder::Error>;

    async fn execute(&self, query: Geocode) -> Result<Self::Ok, Self::Err> {
        let Geocode { address: original } = query;

        let found = self
            .geocoder()
            .execute(Select(By::new(original.clone())))
            .await
            .map_err(tracerr::wrap!())?;
        if let Some(location) = found {
            return Ok(Outcome::Found {
                matched: original.clone(),
                original,
                location,
            });
        }

        let delay = self.config().geocoding_retry_delay;
        for variant in original.simplifications() {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            tracing::debug!(
                original = %original,
                variant = %variant,
                "retrying geocoding with simplified address",
            );
            let found = self
                .geocoder()
                .execute(Select(By::new(variant.clone())))
                .await
                .map_err(tracerr::wrap!())?;
            if let Some(location) = found {
                return Ok(Outcome::Found {
                    original,
                    matched: variant,
                    location,
                });
            }
        }

        tracing::info!(address = %original, "address cannot be geocoded");
        Ok(Outcome::NotFound)
    }
}
