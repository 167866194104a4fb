//! [`Rating`]-related [`Database`] implementations.

use common::operations::{By, Delete, Insert, Select, Update};
use sqlx::Row as _;
use tracerr::Traced;

use crate::{
    domain::{rating, rental, Rating},
    infra::{
        database::{
            self,
            sqlite::{self, connection, Connection},
            Sqlite,
        },
        Database,
    },
};

/// Columns of the `ratings` table in the order [`from_row()`] expects them.
const COLUMNS: &str = "\
    id, rental_id, user_name, \
    landlord_rating, location_rating, value_rating, overall_rating, \
    comment, created_at, updated_at";

/// Decodes a [`Rating`] out of the provided [`connection::Row`].
fn from_row(row: &connection::Row) -> Result<Rating, connection::Error> {
    Ok(Rating {
        id: row.try_get("id")?,
        rental_id: row.try_get("rental_id")?,
        user_name: row.try_get("user_name")?,
        landlord_rating: row.try_get("landlord_rating")?,
        location_rating: row.try_get("location_rating")?,
        value_rating: row.try_get("value_rating")?,
        overall_rating: row.try_get("overall_rating")?,
        comment: row.try_get("comment")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

impl<C> Database<Select<By<Vec<Rating>, rental::Id>>> for Sqlite<C>
where
    C: Connection,
{
    type Ok = Vec<Rating>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Rating>, rental::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let rental_id: rental::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM ratings \
             WHERE rental_id = ?1 \
             ORDER BY created_at DESC, id DESC",
        );
        self.fetch_all(sqlx::query(&sql).bind(rental_id))
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(tracerr::from_and_wrap!(=> sqlite::Error))
            .map_err(tracerr::map_from)
    }
}

impl<C> Database<Select<By<Option<Rating>, (rental::Id, rating::Id)>>>
    for Sqlite<C>
where
    C: Connection,
{
    type Ok = Option<Rating>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Rating>, (rental::Id, rating::Id)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (rental_id, id) = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM ratings \
             WHERE id = ?1 \
               AND rental_id = ?2",
        );
        self.fetch_optional(sqlx::query(&sql).bind(id).bind(rental_id))
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row)
            .transpose()
            .map_err(tracerr::from_and_wrap!(=> sqlite::Error))
            .map_err(tracerr::map_from)
    }
}

impl<C> Database<Insert<rating::New>> for Sqlite<C>
where
    C: Connection,
{
    type Ok = Rating;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(new): Insert<rating::New>,
    ) -> Result<Self::Ok, Self::Err> {
        let rating::New {
            rental_id,
            user_name,
            landlord_rating,
            location_rating,
            value_rating,
            overall_rating,
            comment,
            created_at,
        } = new;

        let sql = format!(
            "INSERT INTO ratings (\
                rental_id, user_name, \
                landlord_rating, location_rating, value_rating, \
                overall_rating, comment, \
                created_at, updated_at\
             ) VALUES (\
                ?1, ?2, \
                ?3, ?4, ?5, \
                ?6, ?7, \
                ?8, ?8\
             ) \
             RETURNING {COLUMNS}",
        );
        let query = sqlx::query(&sql)
            .bind(rental_id)
            .bind(user_name)
            .bind(landlord_rating)
            .bind(location_rating)
            .bind(value_rating)
            .bind(overall_rating)
            .bind(comment)
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

impl<C> Database<Update<Rating>> for Sqlite<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(rating): Update<Rating>,
    ) -> Result<Self::Ok, Self::Err> {
        let Rating {
            id,
            rental_id: _,
            user_name,
            landlord_rating,
            location_rating,
            value_rating,
            overall_rating,
            comment,
            created_at: _,
            updated_at,
        } = rating;

        const SQL: &str = "\
            UPDATE ratings \
            SET user_name = ?2, \
                landlord_rating = ?3, \
                location_rating = ?4, \
                value_rating = ?5, \
                overall_rating = ?6, \
                comment = ?7, \
                updated_at = ?8 \
            WHERE id = ?1";
        let query = sqlx::query(SQL)
            .bind(id)
            .bind(user_name)
            .bind(landlord_rating)
            .bind(location_rating)
            .bind(value_rating)
            .bind(overall_rating)
            .bind(comment)
            .bind(updated_at);
        self.exec(query).await.map_err(tracerr::wrap!()).map(drop)
    }
}

impl<C> Database<Delete<By<Rating, rating::Id>>> for Sqlite<C>
where
    C: Connection,
{
    /// Indicator whether the [`Rating`] existed.
    type Ok = bool;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Rating, rating::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: rating::Id = by.into_inner();

        const SQL: &str = "DELETE FROM ratings WHERE id = ?1";
        self.exec(sqlx::query(SQL).bind(id))
            .await
            .map_err(tracerr::wrap!())
            .map(|affected| affected > 0)
    }
}

impl<C> Database<Delete<By<Vec<Rating>, rental::Id>>> for Sqlite<C>
where
    C: Connection,
{
    /// Number of deleted [`Rating`]s.
    type Ok = u64;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Vec<Rating>, rental::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let rental_id: rental::Id = by.into_inner();

        const SQL: &str = "DELETE FROM ratings WHERE rental_id = ?1";
        self.exec(sqlx::query(SQL).bind(rental_id))
            .await
            .map_err(tracerr::wrap!())
    }
}
