//! [`Rental`]-related [`Database`] implementations.

use common::operations::{By, Delete, Insert, Select, Update};
use sqlx::Row as _;
use tracerr::Traced;

use crate::{
    domain::{rental, Rental},
    infra::{
        database::{
            self,
            sqlite::{self, connection, Connection},
            Sqlite,
        },
        Database,
    },
    read,
};

/// Columns of the `rentals` table in the order [`from_row()`] expects them.
const COLUMNS: &str = "\
    id, address, descriptive_address, lat, lng, \
    description, rent_price, room_type, area_size, facilities, \
    landlord_rating, location_rating, value_rating, overall_rating, \
    created_at, updated_at";

/// Decodes a [`Rental`] out of the provided [`connection::Row`].
fn from_row(row: &connection::Row) -> Result<Rental, connection::Error> {
    Ok(Rental {
        id: row.try_get("id")?,
        address: row.try_get("address")?,
        descriptive_address: row.try_get("descriptive_address")?,
        lat: row.try_get("lat")?,
        lng: row.try_get("lng")?,
        description: row.try_get("description")?,
        rent_price: row.try_get("rent_price")?,
        room_type: row.try_get("room_type")?,
        area_size: row.try_get("area_size")?,
        facilities: row.try_get("facilities")?,
        landlord_rating: row.try_get("landlord_rating")?,
        location_rating: row.try_get("location_rating")?,
        value_rating: row.try_get("value_rating")?,
        overall_rating: row.try_get("overall_rating")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

impl<C> Database<Select<By<Option<Rental>, rental::Id>>> for Sqlite<C>
where
    C: Connection,
{
    type Ok = Option<Rental>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Rental>, rental::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id: rental::Id = by.into_inner();

        let sql = format!("SELECT {COLUMNS} FROM rentals WHERE id = ?1");
        self.fetch_optional(sqlx::query(&sql).bind(id))
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row)
            .transpose()
            .map_err(tracerr::from_and_wrap!(=> sqlite::Error))
            .map_err(tracerr::map_from)
    }
}

impl<C> Database<Select<By<read::rental::TotalCount, ()>>> for Sqlite<C>
where
    C: Connection,
{
    type Ok = read::rental::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<read::rental::TotalCount, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "SELECT COUNT(*) AS total FROM rentals";
        let row = self
            .fetch_optional(sqlx::query(SQL))
            .await
            .map_err(tracerr::wrap!())?;
        let total = row
            .as_ref()
            .map(|r| r.try_get::<i64, _>("total"))
            .transpose()
            .map_err(tracerr::from_and_wrap!(=> sqlite::Error))
            .map_err(tracerr::map_from)?
            .unwrap_or_default();

        Ok(read::rental::TotalCount::from(u64::try_from(total).unwrap_or(0)))
    }
}

impl<C>
    Database<
        Select<By<read::rental::list::Page, read::rental::list::Selector>>,
    > for Sqlite<C>
where
    C: Connection,
{
    type Ok = read::rental::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::rental::list::Page, read::rental::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::rental::list::Selector {
            arguments,
            sort,
            order,
            filter: (),
        } = by.into_inner();

        let limit = i64::from(arguments.limit());
        let offset = i64::try_from(arguments.offset()).unwrap_or(i64::MAX);

        // Both `sort.column()` and `order.sql()` come from closed sets of
        // static strings.
        let sql = format!(
            "SELECT {COLUMNS} \
             FROM rentals \
             ORDER BY {column} {order}, id {order} \
             LIMIT ?1 OFFSET ?2",
            column = sort.column(),
            order = order.sql(),
        );
        let rentals = self
            .fetch_all(sqlx::query(&sql).bind(limit).bind(offset))
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(tracerr::from_and_wrap!(=> sqlite::Error))
            .map_err(tracerr::map_from)?;

        Ok(read::rental::list::Page::new(rentals))
    }
}

impl<C> Database<Insert<rental::New>> for Sqlite<C>
where
    C: Connection,
{
    type Ok = Rental;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(new): Insert<rental::New>,
    ) -> Result<Self::Ok, Self::Err> {
        let rental::New {
            address,
            descriptive_address,
            lat,
            lng,
            description,
            rent_price,
            room_type,
            area_size,
            facilities,
            landlord_rating,
            location_rating,
            value_rating,
            overall_rating,
            created_at,
        } = new;

        let sql = format!(
            "INSERT INTO rentals (\
                address, descriptive_address, lat, lng, \
                description, rent_price, room_type, area_size, facilities, \
                landlord_rating, location_rating, value_rating, \
                overall_rating, \
                created_at, updated_at\
             ) VALUES (\
                ?1, ?2, ?3, ?4, \
                ?5, ?6, ?7, ?8, ?9, \
                ?10, ?11, ?12, \
                ?13, \
                ?14, ?14\
             ) \
             RETURNING {COLUMNS}",
        );
        let query = sqlx::query(&sql)
            .bind(address)
            .bind(descriptive_address)
            .bind(lat)
            .bind(lng)
            .bind(description)
            .bind(rent_price)
            .bind(room_type)
            .bind(area_size)
            .bind(facilities)
            .bind(landlord_rating)
            .bind(location_rating)
            .bind(value_rating)
            .bind(overall_rating)
            .bind(created_at);
        let row = self
            .fetch_optional(query)
            .await
            .map_err(tracerr::wrap!())?
            .ok_or(connection::Error::RowNotFound)
            .map_err(tracerr::from_and_wrap!(=> sqlite::Error))
            .map_err(tracerr::map_from)?;

        from_row(&row)
            .map_err(tracerr::from_and_wrap!(=> sqlite::Error))
            .map_err(tracerr::map_from)
    }
}

impl<C> Database<Update<Rental>> for Sqlite<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(rental): Update<Rental>,
    ) -> Result<Self::Ok, Self::Err> {
        let Rental {
            id,
            address,
            descriptive_address,
            lat,
            lng,
            description,
            rent_price,
            room_type,
            area_size,
            facilities,
            landlord_rating,
            location_rating,
            value_rating,
            overall_rating,
            created_at: _,
            updated_at,
        } = rental;

        const SQL: &str = "\
            UPDATE rentals \
            SET address = ?2, \
                descriptive_address = ?3, \
                lat = ?4, \
                lng = ?5, \
                description = ?6, \
                rent_price = ?7, \
                room_type = ?8, \
                area_size = ?9, \
                facilities = ?10, \
                landlord_rating = ?11, \
                location_rating = ?12, \
                value_rating = ?13, \
                overall_rating = ?14, \
                updated_at = ?15 \
            WHERE id = ?1";
        let query = sqlx::query(SQL)
            .bind(id)
            .bind(address)
            .bind(descriptive_address)
            .bind(lat)
            .bind(lng)
            .bind(description)
            .bind(rent_price)
            .bind(room_type)
            .bind(area_size)
            .bind(facilities)
            .bind(landlord_rating)
            .bind(location_rating)
            .bind(value_rating)
            .bind(overall_rating)
            .bind(updated_at);
        self.exec(query).await.map_err(tracerr::wrap!()).map(drop)
    }
}

impl<C> Database<Delete<By<Rental, rental::Id>>> for Sqlite<C>
where
    C: Connection,
{
    /// Indicator whether the [`Rental`] existed.
    type Ok = bool;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Rental, rental::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id: rental::Id = by.into_inner();

        const SQL: &str = "DELETE FROM rentals WHERE id = ?1";
        self.exec(sqlx::query(SQL).bind(id))
            .await
            .map_err(tracerr::wrap!())
            .map(|affected| affected > 0)
    }
}
