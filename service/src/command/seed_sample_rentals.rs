//! [`Command`] for seeding an empty database with sample [`Rental`]s.

use common::operations::{By, Commit, Insert, Select, Transact, Transacted};
use tracerr::Traced;

use crate::{
    domain::{
        rating::Score,
        rental::{self, Rental},
    },
    infra::{database, Database},
    read, Service,
};

use super::{create_rental::CreateRental, Command};

/// [`Command`] for seeding an empty database with sample [`Rental`]s.
///
/// Does nothing if there is at least one [`Rental`] already.
#[derive(Clone, Copy, Debug)]
pub struct SeedSampleRentals;

impl<Db, Geo> Command<SeedSampleRentals> for Service<Db, Geo>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<read::rental::TotalCount, ()>>,
            Ok = read::rental::TotalCount,
            Err = Traced<database::Error>,
        > + Database<
            Insert<rental::New>,
            Ok = Rental,
            Err = Traced<database::Error>,
        > + Database<Commit, Err = Traced<database::Error>>,
{
    /// Inserted sample [`Rental`]s.
    type Ok = Vec<Rental>;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        _: SeedSampleRentals,
    ) -> Result<Self::Ok, Self::Err> {
        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::wrap!())?;

        let total = tx
            .execute(Select(By::<read::rental::TotalCount, _>::new(())))
            .await
            .map_err(tracerr::wrap!())?;
        if !total.is_zero() {
            tracing::debug!(
                total = u64::from(total),
                "database is not empty, skipping sample `Rental`s",
            );
            return Ok(Vec::new());
        }

        let mut seeded = Vec::with_capacity(2);
        for sample in samples() {
            seeded.push(
                tx.execute(Insert(rental::New::from(sample)))
                    .await
                    .map_err(tracerr::wrap!())?,
            );
        }

        tx.execute(Commit)
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;

        tracing::info!(count = seeded.len(), "seeded sample `Rental`s");

        Ok(seeded)
    }
}

/// Error of [`SeedSampleRentals`] [`Command`] execution.
pub type ExecutionError = database::Error;

/// Returns the sample [`Rental`]s to seed.
fn samples() -> [CreateRental; 2] {
    let score = |v: u8| Score::new(v).expect("valid sample `Score`");

    [
        CreateRental {
            address: rental::Address::new("台北市信義區信義路五段7號")
                .expect("valid sample `Address`"),
            descriptive_address: None,
            lat: rental::Latitude::new(25.0330)
                .expect("valid sample `Latitude`"),
            lng: rental::Longitude::new(121.5654)
                .expect("valid sample `Longitude`"),
            description: rental::Description::new(
                "交通便利，近101大樓。房東人很好，但房租偏高。\
                 周邊生活機能完善，有很多餐廳和便利商店。",
            ),
            rent_price: rental::RentPrice::new(25000),
            room_type: rental::RoomType::new("套房"),
            area_size: rental::AreaSize::new(15.5),
            facilities: rental::Facilities::new("冷氣,洗衣機,網路,電視"),
            landlord_rating: Some(score(4)),
            location_rating: Some(score(5)),
            value_rating: Some(score(3)),
        },
        CreateRental {
            address: rental::Address::new("台北市中山區南京東路二段100號")
                .expect("valid sample `Address`"),
            descriptive_address: None,
            lat: rental::Latitude::new(25.0478)
                .expect("valid sample `Latitude`"),
            lng: rental::Longitude::new(121.5170)
                .expect("valid sample `Longitude`"),
            description: rental::Description::new(
                "老公寓但維護良好，房東會定期修繕。\
                 附近有捷運站，上班很方便。唯一缺點是隔音稍差。",
            ),
            rent_price: rental::RentPrice::new(18000),
            room_type: rental::RoomType::new("雅房"),
            area_size: rental::AreaSize::new(12.0),
            facilities: rental::Facilities::new("冷氣,網路,共用洗衣機"),
            landlord_rating: Some(score(5)),
            location_rating: Some(score(4)),
            value_rating: Some(score(4)),
        },
    ]
}
